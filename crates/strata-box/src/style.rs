//! Computed style values consumed by the paint engine.
//!
//! Only the properties that influence stacking, positioning and the opaque
//! background/border paint operations are carried here. Everything else stays
//! with the cascade.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// [§ 9.3.1 Choosing a positioning scheme: 'position' property](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
///
/// "The 'position' and 'float' properties determine which of the CSS 2
/// positioning algorithms is used to calculate the position of a box."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Position {
    /// "The box is a normal box, laid out according to the normal flow."
    #[default]
    Static,
    /// "The box's position is calculated according to the normal flow.
    /// Then the box is offset relative to its normal position."
    Relative,
    /// "The box's position (and possibly size) is specified with the
    /// 'top', 'right', 'bottom', and 'left' properties."
    Absolute,
    /// "The box's position is calculated according to the 'absolute' model,
    /// but in addition, the box is fixed with respect to some reference."
    Fixed,
    /// [CSS Positioned Layout Module Level 3 § 3.2](https://www.w3.org/TR/css-position-3/#sticky-position)
    ///
    /// Painted as relative; sticky offsets are not tracked.
    Sticky,
}

/// [§ 9.9.1 Specifying the stack level: the 'z-index' property](https://www.w3.org/TR/CSS2/visuren.html#z-index)
///
/// "For a positioned box, the 'z-index' property specifies:
///
/// 1. The stack level of the box in the current stacking context.
/// 2. Whether the box establishes a stacking context."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZIndex {
    /// "The stack level of the generated box in the current stacking context
    /// is 0. The box does not establish a new stacking context unless it is
    /// the root element."
    #[default]
    Auto,
    /// "This integer is the stack level of the generated box in the current
    /// stacking context. The box also establishes a new stacking context."
    Integer(i32),
}

impl ZIndex {
    /// The stack level; `auto` stacks at level 0.
    #[must_use]
    pub const fn level(self) -> i32 {
        match self {
            Self::Auto => 0,
            Self::Integer(level) => level,
        }
    }
}

impl From<Option<i32>> for ZIndex {
    fn from(value: Option<i32>) -> Self {
        value.map_or(Self::Auto, Self::Integer)
    }
}

/// [§ 9.3.2 Box offsets: 'top', 'right', 'bottom', 'left'](https://www.w3.org/TR/CSS2/visuren.html#position-props)
///
/// `None` means `auto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoxOffsets {
    /// Offset of the top margin edge below the containing block's top edge.
    #[serde(default)]
    pub top: Option<i32>,
    /// Offset of the right margin edge left of the containing block's right edge.
    #[serde(default)]
    pub right: Option<i32>,
    /// Offset of the bottom margin edge above the containing block's bottom edge.
    #[serde(default)]
    pub bottom: Option<i32>,
    /// Offset of the left margin edge right of the containing block's left edge.
    #[serde(default)]
    pub left: Option<i32>,
}

/// An opaque sRGB color handed to the drawing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    #[serde(default = "opaque")]
    pub a: u8,
}

const fn opaque() -> u8 {
    255
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// An opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// A uniform border on all four sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Border {
    /// Border width in device units.
    pub width: i32,
    /// Border color.
    pub color: Color,
}

/// The computed style of a box, as far as painting is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoxStyle {
    /// Positioning scheme.
    pub position: Position,
    /// Stack level; read live at paint time.
    pub z_index: ZIndex,
    /// Box offsets for positioned boxes.
    pub offsets: BoxOffsets,
    /// [§ 3.2 'background-color'](https://www.w3.org/TR/css-backgrounds-3/#background-color)
    pub background_color: Option<Color>,
    /// [§ 3.5 'background-attachment'](https://www.w3.org/TR/css-backgrounds-3/#background-attachment)
    ///
    /// "fixed: The background is fixed with regard to the viewport."
    pub background_fixed: bool,
    /// Border drawn around the padding box.
    pub border: Option<Border>,
}

impl BoxStyle {
    /// A style using the given positioning scheme and defaults elsewhere.
    #[must_use]
    pub fn positioned(position: Position) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Set the z-index.
    #[must_use]
    pub const fn with_z_index(mut self, level: i32) -> Self {
        self.z_index = ZIndex::Integer(level);
        self
    }

    /// Set the box offsets.
    #[must_use]
    pub const fn with_offsets(mut self, offsets: BoxOffsets) -> Self {
        self.offsets = offsets;
        self
    }

    /// Set the background color.
    #[must_use]
    pub const fn with_background(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    /// `position: fixed`
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.position == Position::Fixed
    }

    /// `position: absolute`
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.position == Position::Absolute
    }

    /// `position: relative`, which includes sticky boxes.
    #[must_use]
    pub const fn is_relative(&self) -> bool {
        matches!(self.position, Position::Relative | Position::Sticky)
    }

    /// Any positioning scheme other than `static`.
    #[must_use]
    pub fn is_positioned(&self) -> bool {
        self.position != Position::Static
    }

    /// `z-index: auto`
    #[must_use]
    pub const fn is_auto_z_index(&self) -> bool {
        matches!(self.z_index, ZIndex::Auto)
    }

    /// `top: auto`
    #[must_use]
    pub const fn is_top_auto(&self) -> bool {
        self.offsets.top.is_none()
    }

    /// `bottom: auto`
    #[must_use]
    pub const fn is_bottom_auto(&self) -> bool {
        self.offsets.bottom.is_none()
    }

    /// The numeric stack level.
    #[must_use]
    pub const fn z_index(&self) -> i32 {
        self.z_index.level()
    }
}
