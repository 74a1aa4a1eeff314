//! Absolute position resolution.
//!
//! [§ 9.3 Positioning schemes](https://www.w3.org/TR/CSS2/visuren.html#positioning-scheme)
//!
//! Layout produces coordinates relative to each box's parent. Painting needs
//! document-absolute ones. This pass walks a layer's subtree once, stamps
//! `abs_x`/`abs_y` on every box, and reports the largest extent it touched,
//! which is the scrollable size of the document.
//!
//! Positioned layers are resolved from their layer parent rather than from
//! their place in the box tree:
//!
//! - fixed children are skipped, they resolve against the viewport when they
//!   paint;
//! - absolute children resolve from the master's absolute position;
//! - relative children already sit in the flow, so only their own child
//!   layers are resolved.

use strata_box::{BoxId, BoxKind, BoxTree};
use strata_common::Point;

use crate::error::{LayerError, Result};
use crate::layer::{LayerId, LayerTree};

impl LayerTree {
    /// Whether painting `layer` depends on the viewport: the master paints
    /// a fixed background, or a direct child layer is `position: fixed`.
    ///
    /// Such content defeats the position cache.
    ///
    /// # Errors
    ///
    /// [`LayerError::StaleLayer`] or [`LayerError::UnknownBox`].
    pub fn contains_fixed_content(&self, boxes: &BoxTree, layer: LayerId) -> Result<bool> {
        let node = self.get(layer)?;
        if node.has_fixed_background() {
            return Ok(true);
        }
        for &child in node.children() {
            let master = self.get(child)?.master();
            let style = &boxes.get(master).ok_or(LayerError::UnknownBox(master))?.style;
            if style.is_fixed() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Resolve absolute positions for `layer` and its positioned
    /// descendants, starting at `origin`.
    ///
    /// With `update_self`, the master's subtree is stamped first. Returns the
    /// running maximum `(x, y)` over `origin` and every box resolved.
    ///
    /// # Errors
    ///
    /// [`LayerError::StaleLayer`] or [`LayerError::UnknownBox`] if the
    /// trees disagree.
    pub fn update_all_absolute_locations(
        &self,
        boxes: &mut BoxTree,
        layer: LayerId,
        origin: Point,
        update_self: bool,
    ) -> Result<Point> {
        let master = self.get(layer)?.master();
        let mut extent = origin;

        if update_self {
            extent.move_if_greater(update_box_locations(boxes, master, origin, true)?);
        }

        let anchor = {
            let node = boxes.get(master).ok_or(LayerError::UnknownBox(master))?;
            Point::new(node.abs_x, node.abs_y)
        };

        for &child in self.get(layer)?.children() {
            let child_master = self.get(child)?.master();
            let style = &boxes
                .get(child_master)
                .ok_or(LayerError::UnknownBox(child_master))?
                .style;

            let child_extent = if style.is_fixed() {
                continue;
            } else if style.is_absolute() {
                self.update_all_absolute_locations(boxes, child, anchor, true)?
            } else if style.is_relative() {
                self.update_all_absolute_locations(boxes, child, Point::ORIGIN, false)?
            } else {
                continue;
            };
            extent.move_if_greater(child_extent);
        }

        Ok(extent)
    }

    /// Resolve the root layer from the canvas origin, or answer from the
    /// position cache when it is still valid.
    ///
    /// The cache is valid once a root pass has run, as long as
    /// [`Self::invalidate_positions`] was not called and the root holds no
    /// fixed content.
    pub(crate) fn resolve_root(&mut self, boxes: &mut BoxTree, origin: Point) -> Result<Point> {
        let Some(root) = self.root() else {
            return Ok(origin);
        };
        let fixed = self.contains_fixed_content(boxes, root)?;
        if self.positions.finalized
            && !fixed
            && let Some(extent) = self.positions.extent
        {
            return Ok(extent);
        }

        log::debug!(
            target: "strata::position",
            "resolving root positions from ({}, {}) (fixed content: {fixed})",
            origin.x,
            origin.y
        );
        let extent = self.update_all_absolute_locations(boxes, root, origin, true)?;
        self.positions.extent = Some(extent);
        self.positions.finalized = true;
        Ok(extent)
    }

    /// The maximum `(x, y)` extent of the document: the scrollable size of
    /// the canvas.
    ///
    /// An empty tree has no extent beyond the origin.
    ///
    /// # Errors
    ///
    /// [`LayerError::StaleLayer`] or [`LayerError::UnknownBox`].
    pub fn max_offset(&mut self, boxes: &mut BoxTree) -> Result<Point> {
        self.resolve_root(boxes, Point::ORIGIN)
    }

    /// Re-run positioned placement for the master of every direct child
    /// layer of `layer`.
    ///
    /// Layout calls this after the containing block of those children has
    /// been sized.
    ///
    /// # Errors
    ///
    /// [`LayerError::StaleLayer`] if a layer was destroyed.
    pub fn position_children(&self, boxes: &mut BoxTree, layer: LayerId) -> Result<()> {
        for &child in self.get(layer)?.children() {
            boxes.position_positioned(self.get(child)?.master());
        }
        Ok(())
    }
}

/// Resolve one box and its descendants.
///
/// STEP 1: Stamp the box itself unless `update_self` is false.
/// STEP 2: Start the extent at the box's far corner.
/// STEP 3: Re-anchor an absolute box with auto vertical offsets to its
///         static position.
/// STEP 4: Keep the external placement of replaced content in sync.
/// STEP 5: Re-resolve floats of the box's formatting context in place.
/// STEP 6: Recurse into children from the box's content edge.
pub(crate) fn update_box_locations(
    boxes: &mut BoxTree,
    id: BoxId,
    origin: Point,
    update_self: bool,
) -> Result<Point> {
    // STEP 1
    let node = boxes.get_mut(id).ok_or(LayerError::UnknownBox(id))?;
    if update_self {
        node.abs_x = node.x.saturating_add(origin.x);
        node.abs_y = node.y.saturating_add(origin.y);
    }

    // STEP 2
    let bounds = node.absolute_bounds();
    let mut extent = Point::new(bounds.right(), bounds.bottom());

    // STEP 3
    let style = &node.style;
    if style.is_absolute() && style.is_top_auto() && style.is_bottom_auto() {
        boxes.align_to_static_equivalent(id);
    }

    // STEP 4
    let node = boxes.get_mut(id).ok_or(LayerError::UnknownBox(id))?;
    let (abs_x, abs_y) = (node.abs_x, node.abs_y);
    if let BoxKind::Replaced(data) = &mut node.kind {
        let location = Point::new(abs_x, abs_y);
        if data.content.location != location {
            data.content.location = location;
        }
    }
    let next = Point::new(abs_x, abs_y).translate(node.tx, node.ty);

    // STEP 5
    boxes.update_float_locations(id, |boxes, floater| {
        let offset = update_box_locations(boxes, floater, Point::ORIGIN, false)?;
        extent.move_if_greater(offset);
        Ok::<(), LayerError>(())
    })?;

    // STEP 6
    for child in boxes.child_boxes(id) {
        extent.move_if_greater(update_box_locations(boxes, child, next, true)?);
    }

    Ok(extent)
}
