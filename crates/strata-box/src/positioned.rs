//! Placement of positioned boxes.
//!
//! [§ 9.3 Positioning schemes](https://www.w3.org/TR/CSS2/visuren.html#positioning-scheme)
//!
//! Layout sizes positioned boxes; this module turns their box offsets into
//! coordinates against a containing block. It runs again whenever a
//! containing block changes (fixed boxes re-anchored to the viewport, relative
//! layout changes), so every function here is idempotent.

use strata_common::Rect;
use strata_common::warning::warn_once;

use crate::style::Position;
use crate::{BoxId, BoxTree};

/// [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainingBlock {
    /// "The containing block is formed by the padding edge of the ancestor."
    Box(BoxId),
    /// "If the element has 'position: fixed', the containing block is
    /// established by the viewport."
    Viewport(Rect),
}

impl BoxTree {
    /// The rectangle offsets of `id` resolve against.
    ///
    /// A box containing block contributes its size at the origin, because
    /// child coordinates are already relative to it. A box without a
    /// containing block resolves against its parent.
    #[must_use]
    pub fn containing_block_rect(&self, id: BoxId) -> Rect {
        let Some(node) = self.get(id) else {
            return Rect::default();
        };
        let container = match node.containing_block {
            Some(ContainingBlock::Viewport(rect)) => return rect,
            Some(ContainingBlock::Box(container)) => Some(container),
            None => node.parent,
        };
        container
            .and_then(|container| self.get(container))
            .map_or_else(Rect::default, |block| {
                Rect::new(0, 0, block.width, block.height)
            })
    }

    /// [§ 9.3.2 Box offsets](https://www.w3.org/TR/CSS2/visuren.html#position-props)
    ///
    /// Recompute `x`/`y` of a positioned box from its offsets.
    ///
    /// - absolute/fixed: "'left' ... specifies how far a box's left margin
    ///   edge is offset to the right of the left edge of the box's containing
    ///   block", with `right` used when `left` is auto. An axis whose offsets
    ///   are both auto keeps its current coordinate.
    /// - relative: [§ 9.4.3](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
    ///   "If neither 'left' nor 'right' is 'auto', the position is
    ///   over-constrained ... the value of 'left' wins". Offsets apply to the
    ///   normal-flow position.
    /// - static: nothing to do.
    pub fn position_positioned(&mut self, id: BoxId) {
        let cb = self.containing_block_rect(id);
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let offsets = node.style.offsets;

        match node.style.position {
            Position::Static => {}
            Position::Absolute | Position::Fixed => {
                if let Some(left) = offsets.left {
                    node.x = cb.x.saturating_add(left);
                } else if let Some(right) = offsets.right {
                    node.x = cb.right().saturating_sub(right).saturating_sub(node.width);
                }
                if let Some(top) = offsets.top {
                    node.y = cb.y.saturating_add(top);
                } else if let Some(bottom) = offsets.bottom {
                    node.y = cb.bottom().saturating_sub(bottom).saturating_sub(node.height);
                }
            }
            position @ (Position::Relative | Position::Sticky) => {
                if position == Position::Sticky {
                    let _ = warn_once("position", "sticky positioning is painted as relative");
                }
                let dx = offsets
                    .left
                    .or_else(|| offsets.right.map(i32::saturating_neg))
                    .unwrap_or(0);
                let dy = offsets
                    .top
                    .or_else(|| offsets.bottom.map(i32::saturating_neg))
                    .unwrap_or(0);
                node.x = node.flow.x.saturating_add(dx);
                node.y = node.flow.y.saturating_add(dy);
            }
        }
    }

    /// [§ 10.3.7 Absolutely positioned, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#abs-non-replaced-width)
    ///
    /// "The static position for 'top' is the distance from the top edge of the
    /// containing block to the top margin edge of a hypothetical box that
    /// would have been the first box of the element if its specified
    /// 'position' value had been 'static'."
    ///
    /// Re-anchor an absolutely positioned box with auto offsets to the
    /// absolute position of its static-position equivalent. The box is then
    /// contained by the block its placeholder sits in. Boxes without a
    /// placeholder are left alone.
    pub fn align_to_static_equivalent(&mut self, id: BoxId) {
        let Some(equivalent) = self.get(id).and_then(|node| node.static_equivalent) else {
            return;
        };
        let Some((abs_x, abs_y, container)) = self
            .get(equivalent)
            .map(|placeholder| (placeholder.abs_x, placeholder.abs_y, placeholder.parent))
        else {
            return;
        };

        if let Some(node) = self.get_mut(id) {
            log::trace!(
                target: "strata::position",
                "aligning {id:?} to static position ({abs_x}, {abs_y})"
            );
            node.abs_x = abs_x;
            node.abs_y = abs_y;
            node.containing_block = container.map(ContainingBlock::Box);
        }
    }
}
