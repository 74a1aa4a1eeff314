//! Painter - walks the layer tree and emits the display list
//!
//! [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
//!
//! Each layer paints its own master subtree and then hands off to the layers
//! stacked above or below it. Positions are resolved lazily: the root
//! resolves the whole document on its first paint, and fixed layers
//! re-resolve against the viewport on every paint.

use strata_box::{BoxId, BoxKind, BoxNode, BoxTree, ContainingBlock};
use strata_common::{Point, Rect};

use super::collector::{self, Collected};
use super::{DisplayCommand, DisplayList};
use crate::error::{LayerError, Result};
use crate::layer::{LayerId, LayerTree};
use crate::zorder::LayerGroup;

/// Per-paint state handed down the layer tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderingContext {
    /// Region being repainted, in document coordinates. Boxes outside it are
    /// culled.
    pub clip: Rect,
    /// The visible viewport, in document coordinates. Fixed boxes anchor to
    /// it.
    pub fixed_rectangle: Rect,
    /// Replaced content is managed by the host (live widgets) and must not
    /// be painted.
    pub interactive: bool,
    /// Paint operations emitted so far.
    pub display_list: DisplayList,
}

impl RenderingContext {
    /// A non-interactive context repainting the whole `viewport`.
    #[must_use]
    pub const fn new(viewport: Rect) -> Self {
        Self {
            clip: viewport,
            fixed_rectangle: viewport,
            interactive: false,
            display_list: DisplayList::new(),
        }
    }

    /// Restrict painting to `clip`.
    #[must_use]
    pub const fn with_clip(mut self, clip: Rect) -> Self {
        self.clip = clip;
        self
    }

    /// Set whether replaced content is left to the host.
    #[must_use]
    pub const fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Take the emitted paint operations.
    #[must_use]
    pub fn into_display_list(self) -> DisplayList {
        self.display_list
    }
}

/// Painter that emits display commands for a layer tree.
///
/// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
///
/// The painter borrows both trees mutably: painting writes absolute
/// positions, re-anchors fixed boxes, and wraps floats in transient layers.
#[derive(Debug)]
pub struct Painter<'a> {
    layers: &'a mut LayerTree,
    boxes: &'a mut BoxTree,
}

impl<'a> Painter<'a> {
    /// Create a painter over a layer tree and the box tree it wraps.
    #[must_use]
    pub const fn new(layers: &'a mut LayerTree, boxes: &'a mut BoxTree) -> Self {
        Self { layers, boxes }
    }

    /// Paint the root layer from the canvas origin.
    ///
    /// # Errors
    ///
    /// See [`Self::paint`]. An empty layer tree paints nothing.
    pub fn paint_root(&mut self, ctx: &mut RenderingContext) -> Result<()> {
        match self.layers.root() {
            Some(root) => self.paint(ctx, root, Point::ORIGIN),
            None => Ok(()),
        }
    }

    /// Paint `layer` and everything stacked within it.
    ///
    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    ///
    /// "Within each stacking context, the following layers are painted in
    /// back-to-front order:
    ///
    /// 1. the background and borders of the element forming the stacking context.
    /// 2. the child stacking contexts with negative stack levels (most negative first).
    /// 3. the in-flow, non-inline-level, non-positioned descendants.
    /// 4. the non-positioned floats.
    /// 5. the in-flow, inline-level, non-positioned descendants, including
    ///    inline tables and inline blocks.
    /// 6. the child stacking contexts with stack level 0 and the positioned
    ///    descendants with stack level 0.
    /// 7. the child stacking contexts with positive stack levels (least positive first)."
    ///
    /// # Errors
    ///
    /// Aborts on the first [`LayerError`]; commands emitted before the
    /// failure stay in the context's display list.
    pub fn paint(&mut self, ctx: &mut RenderingContext, layer: LayerId, origin: Point) -> Result<()> {
        let master = self.layers.get(layer)?.master();
        let fixed = self.node(master)?.style.is_fixed();
        let root_layer = self.layers.is_root_layer(layer)?;

        log::debug!(
            target: "strata::paint",
            "painting {layer:?} (master {master:?}) at ({}, {})",
            origin.x,
            origin.y
        );

        if fixed {
            self.position_fixed_layer(ctx, master)?;
        }

        if root_layer && self.layers.root() == Some(layer) && !fixed {
            let _ = self.layers.resolve_root(self.boxes, origin)?;
        } else if root_layer || fixed {
            let _ = self
                .layers
                .update_all_absolute_locations(self.boxes, layer, origin, true)?;
        }

        if self.node(master)?.kind.is_replaced() {
            self.paint_replaced(ctx, master)?;
            return Ok(());
        }

        // STEP 1: Gather what this layer paints itself.
        let Collected { blocks, lines } = collector::collect(self.boxes, self.layers, ctx.clip, master);
        log::trace!(
            target: "strata::paint",
            "{layer:?}: {} visible blocks, {} visible lines",
            blocks.len(),
            lines.len()
        );

        // STEP 2: The master's own background and border.
        if self.node(master)?.kind.is_block_level() {
            self.paint_background_and_border(ctx, master)?;
        }

        let stacking = root_layer || self.layers.get(layer)?.is_stacking_context();
        let anchor = self.absolute_origin(master)?;

        // STEP 3: Negative stack levels.
        if stacking {
            self.paint_layers(ctx, layer, LayerGroup::Negative, anchor)?;
        }

        // STEP 4: In-flow blocks.
        for &block in &blocks {
            self.paint_background_and_border(ctx, block)?;
        }

        // STEP 5: Floats, most recently registered first.
        let floats = self.layers.get(layer)?.floats().to_vec();
        for &floater in floats.iter().rev() {
            self.paint_as_layer(ctx, floater)?;
        }

        // STEP 6: Line boxes.
        for &line in &lines {
            self.paint_inline_content(ctx, line)?;
        }

        // STEP 7: List markers.
        self.paint_list_marker(ctx, master)?;
        for &block in &blocks {
            self.paint_list_marker(ctx, block)?;
        }

        // STEP 8: Replaced content.
        for &block in &blocks {
            if self.node(block)?.kind.is_replaced() {
                self.paint_replaced(ctx, block)?;
            }
        }

        // STEP 9: Positioned descendants and stacking contexts at or above
        // level zero.
        if stacking {
            for group in [LayerGroup::Auto, LayerGroup::Zero, LayerGroup::Positive] {
                self.paint_layers(ctx, layer, group, anchor)?;
            }
        }

        Ok(())
    }

    /// Paint a single box atomically, as though it established a layer.
    ///
    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    ///
    /// "For each one of these, treat the element as if it created a new
    /// stacking context, but any positioned descendants and descendants which
    /// actually create a new stacking context should be considered part of
    /// the parent stacking context, not this new one."
    ///
    /// The box is wrapped in a transient layer that is discarded afterwards,
    /// also when painting fails.
    ///
    /// # Errors
    ///
    /// See [`Self::paint`].
    pub fn paint_as_layer(&mut self, ctx: &mut RenderingContext, master: BoxId) -> Result<()> {
        let _ = self.node(master)?;
        let (transient, previous) = self.layers.create_transient(master);
        let result = self.paint(ctx, transient, Point::ORIGIN);
        self.layers.discard_transient(transient, previous);
        result
    }

    fn paint_layers(
        &mut self,
        ctx: &mut RenderingContext,
        layer: LayerId,
        group: LayerGroup,
        origin: Point,
    ) -> Result<()> {
        let layers = if group == LayerGroup::Auto {
            self.layers.collect_layers(self.boxes, layer, group)?
        } else {
            self.layers.sorted_layers(self.boxes, layer, group)?
        };
        if !layers.is_empty() {
            log::trace!(target: "strata::paint", "{layer:?}: {} {group} layers", layers.len());
        }
        for child in layers {
            self.paint(ctx, child, origin)?;
        }
        Ok(())
    }

    /// [§ 9.6.1 Fixed positioning](https://www.w3.org/TR/CSS2/visuren.html#fixed-positioning)
    ///
    /// "For continuous media, fixed boxes do not move when the document is
    /// scrolled."
    fn position_fixed_layer(&mut self, ctx: &RenderingContext, master: BoxId) -> Result<()> {
        let viewport = ctx.fixed_rectangle.shrink_trailing(1);
        let node = self.node_mut(master)?;
        node.x = 0;
        node.y = viewport.y.saturating_neg();
        node.abs_x = 0;
        node.abs_y = 0;
        node.containing_block = Some(ContainingBlock::Viewport(viewport));
        self.boxes.position_positioned(master);
        Ok(())
    }

    fn paint_background_and_border(&self, ctx: &mut RenderingContext, id: BoxId) -> Result<()> {
        let node = self.node(id)?;
        let bounds = node.absolute_bounds();
        ctx.display_list.push(DisplayCommand::Background {
            box_id: id,
            bounds,
            color: node.style.background_color,
        });
        ctx.display_list.push(DisplayCommand::Border {
            box_id: id,
            bounds,
            border: node.style.border,
        });
        Ok(())
    }

    fn paint_inline_content(&self, ctx: &mut RenderingContext, id: BoxId) -> Result<()> {
        let node = self.node(id)?;
        if let BoxKind::Line(data) = &node.kind {
            ctx.display_list.push(DisplayCommand::InlineContent {
                box_id: id,
                bounds: node.absolute_bounds(),
                runs: data.runs.clone(),
            });
        }
        Ok(())
    }

    fn paint_list_marker(&self, ctx: &mut RenderingContext, id: BoxId) -> Result<()> {
        let node = self.node(id)?;
        if let Some(marker) = node.kind.block_data().and_then(|block| block.list_marker) {
            ctx.display_list.push(DisplayCommand::ListMarker {
                box_id: id,
                bounds: node.absolute_bounds(),
                marker,
            });
        }
        Ok(())
    }

    fn paint_replaced(&self, ctx: &mut RenderingContext, id: BoxId) -> Result<()> {
        if ctx.interactive {
            return Ok(());
        }
        let node = self.node(id)?;
        if let BoxKind::Replaced(data) = &node.kind {
            ctx.display_list.push(DisplayCommand::ReplacedContent {
                box_id: id,
                bounds: node.absolute_bounds(),
                source: data.content.source.clone(),
            });
        }
        Ok(())
    }

    fn absolute_origin(&self, id: BoxId) -> Result<Point> {
        let node = self.node(id)?;
        Ok(Point::new(node.abs_x, node.abs_y))
    }

    fn node(&self, id: BoxId) -> Result<&BoxNode> {
        self.boxes.get(id).ok_or(LayerError::UnknownBox(id))
    }

    fn node_mut(&mut self, id: BoxId) -> Result<&mut BoxNode> {
        self.boxes.get_mut(id).ok_or(LayerError::UnknownBox(id))
    }
}
