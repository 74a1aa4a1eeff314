//! Device-unit geometry.
//!
//! [§ 4.3 Canvas](https://www.w3.org/TR/CSS2/intro.html#canvas)
//!
//! "For all media, the term canvas describes the space where the formatting
//! structure is rendered."
//!
//! All coordinates are whole device units. Layout hands the paint engine
//! integer geometry, so there is no rounding anywhere in the paint passes.

use serde::{Deserialize, Serialize};

/// A point on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// The canvas origin.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Raise each axis of `self` to `other` when `other` is strictly greater.
    ///
    /// Used to reduce per-box extents into a running maximum. An axis is
    /// never lowered.
    pub const fn move_if_greater(&mut self, other: Self) {
        if other.x > self.x {
            self.x = other.x;
        }
        if other.y > self.y {
            self.y = other.y;
        }
    }

    /// Offset this point by `dx`, `dy`.
    #[must_use]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// A rectangle positioned on the canvas.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: i32,
    /// Vertical position of the top-left corner.
    pub y: i32,
    /// Width of the rectangle.
    pub width: i32,
    /// Height of the rectangle.
    pub height: i32,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The right edge (exclusive), clamped to the `i32` range.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// The bottom edge (exclusive).
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// A rectangle with no area covers nothing and intersects nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether the two rectangles share any area.
    ///
    /// Rectangles that only touch along an edge do not intersect.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Shrink the trailing (right and bottom) edges by `amount`.
    ///
    /// The viewport rectangle handed to fixed-position boxes is pulled in by
    /// one device unit so that content anchored to the trailing edges does
    /// not bleed past the visible area.
    #[must_use]
    pub const fn shrink_trailing(self, amount: i32) -> Self {
        Self {
            x: self.x,
            y: self.y,
            width: self.width.saturating_sub(amount),
            height: self.height.saturating_sub(amount),
        }
    }
}
