//! Visible-box collection for one layer.
//!
//! A layer paints the boxes of its master's subtree that no other painter is
//! responsible for. Boxes wrapped by another layer paint themselves when that
//! layer is painted, and floats are painted as pseudo-layers by their
//! stacking context. Everything else is gathered here in document order and
//! culled against the clip.

use strata_box::{BoxId, BoxKind, BoxTree};
use strata_common::Rect;

use crate::layer::LayerTree;

/// Boxes a layer paints itself, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collected {
    /// Visible block-level boxes, master excluded.
    pub blocks: Vec<BoxId>,
    /// Visible line boxes.
    pub lines: Vec<BoxId>,
}

/// Collect the boxes under `master` that intersect `clip`.
///
/// Line boxes are leaves for painting: their runs are painted as a whole, so
/// the walk does not descend into them. Subtrees are entered even when their
/// root is clipped, since positioned or overflowing descendants may still be
/// visible.
#[must_use]
pub fn collect(boxes: &BoxTree, layers: &LayerTree, clip: Rect, master: BoxId) -> Collected {
    let mut collected = Collected::default();
    collect_into(boxes, layers, clip, master, master, &mut collected);
    collected
}

fn collect_into(
    boxes: &BoxTree,
    layers: &LayerTree,
    clip: Rect,
    master: BoxId,
    id: BoxId,
    out: &mut Collected,
) {
    let Some(node) = boxes.get(id) else {
        return;
    };
    if id != master && (node.kind.is_float() || layers.layer_for(id).is_some()) {
        return;
    }

    let visible = clip.intersects(&node.absolute_bounds());
    if matches!(node.kind, BoxKind::Line(_)) {
        if visible {
            out.lines.push(id);
        }
        return;
    }
    if id != master && visible && node.kind.is_block_level() {
        out.blocks.push(id);
    }

    for child in boxes.child_boxes(id) {
        collect_into(boxes, layers, clip, master, child, out);
    }
}
