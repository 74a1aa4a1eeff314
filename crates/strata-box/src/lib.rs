//! Box tree consumed by the Strata paint engine.
//!
//! This crate provides an arena-based box tree: the read-mostly output of CSS
//! layout that the layer tree positions and paints.
//!
//! # Design
//!
//! The tree uses arena allocation with [`BoxId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Box
//! kinds are a closed set ([`BoxKind`]); the engine matches on them instead of
//! asking a box what it is at runtime.
//!
//! # Ownership of fields
//!
//! Layout owns everything except:
//! - `abs_x` / `abs_y`, written by the position pass,
//! - `containing_block`, reassigned for fixed boxes and for absolutely
//!   positioned boxes re-anchored to their static position,
//! - the external placement of replaced content.

pub mod float;
pub mod kind;
pub mod positioned;
pub mod style;

pub use float::FloatManager;
pub use kind::{
    BlockData, BoxKind, FloatData, FloatSide, InlineChild, InlineData, LineData, ListMarker,
    ReplacedContent, ReplacedData,
};
pub use positioned::ContainingBlock;
pub use style::{Border, BoxOffsets, BoxStyle, Color, Position, ZIndex};

use serde::{Deserialize, Serialize};
use strata_common::{Point, Rect};

/// A type-safe index into the box tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoxId(pub usize);

/// A box produced by layout.
///
/// `x`/`y` are relative to the content edge of the parent box; `abs_x`/`abs_y`
/// are document-absolute and only valid after a position pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxNode {
    /// What kind of box this is.
    pub kind: BoxKind,
    /// Computed style.
    pub style: BoxStyle,
    /// Horizontal offset from the parent's content edge.
    pub x: i32,
    /// Vertical offset from the parent's content edge.
    pub y: i32,
    /// Border-box width.
    pub width: i32,
    /// Border-box height.
    pub height: i32,
    /// Document-absolute horizontal position.
    pub abs_x: i32,
    /// Document-absolute vertical position.
    pub abs_y: i32,
    /// Horizontal distance from the border edge to the content edge.
    pub tx: i32,
    /// Vertical distance from the border edge to the content edge.
    pub ty: i32,
    /// Position the box had in normal flow, before relative offsets.
    pub flow: Point,
    /// Parent box.
    pub parent: Option<BoxId>,
    /// Child boxes in document order. Inline boxes keep theirs in
    /// [`InlineData::content`] instead.
    pub children: Vec<BoxId>,
    /// [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
    pub containing_block: Option<ContainingBlock>,
    /// The in-flow placeholder marking where this box would sit if it were
    /// not taken out of flow.
    pub static_equivalent: Option<BoxId>,
}

impl BoxNode {
    /// Create a box of the given kind occupying `bounds`.
    #[must_use]
    pub fn new(kind: BoxKind, bounds: Rect) -> Self {
        Self {
            kind,
            style: BoxStyle::default(),
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            abs_x: 0,
            abs_y: 0,
            tx: 0,
            ty: 0,
            flow: bounds.origin(),
            parent: None,
            children: Vec::new(),
            containing_block: None,
            static_equivalent: None,
        }
    }

    /// A block box.
    #[must_use]
    pub fn block(bounds: Rect) -> Self {
        Self::new(BoxKind::block(), bounds)
    }

    /// A floated block box.
    #[must_use]
    pub fn float(side: FloatSide, bounds: Rect) -> Self {
        Self::new(
            BoxKind::Float(FloatData {
                side,
                block: BlockData::default(),
            }),
            bounds,
        )
    }

    /// A replaced box embedding `source`.
    #[must_use]
    pub fn replaced(source: impl Into<String>, bounds: Rect) -> Self {
        Self::new(BoxKind::Replaced(ReplacedData::new(source)), bounds)
    }

    /// A line box holding text runs.
    #[must_use]
    pub fn line(runs: Vec<String>, bounds: Rect) -> Self {
        Self::new(BoxKind::Line(LineData { runs }), bounds)
    }

    /// An inline box with no content yet.
    #[must_use]
    pub fn inline(bounds: Rect) -> Self {
        Self::new(BoxKind::Inline(InlineData::default()), bounds)
    }

    /// Replace the computed style.
    #[must_use]
    pub const fn with_style(mut self, style: BoxStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the content offset applied to children.
    #[must_use]
    pub const fn with_content_offset(mut self, tx: i32, ty: i32) -> Self {
        self.tx = tx;
        self.ty = ty;
        self
    }

    /// Layout-relative border box.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Document-absolute border box.
    #[must_use]
    pub const fn absolute_bounds(&self) -> Rect {
        Rect::new(self.abs_x, self.abs_y, self.width, self.height)
    }
}

/// Arena-based box tree with O(1) node access and traversal.
///
/// Boxes are stored in allocation order; the first box allocated is the root.
#[derive(Debug, Clone, Default)]
pub struct BoxTree {
    /// All boxes in the tree, indexed by `BoxId`.
    nodes: Vec<BoxNode>,
}

impl BoxTree {
    /// Create an empty box tree.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// The root box, if any box was allocated.
    #[must_use]
    pub fn root(&self) -> Option<BoxId> {
        (!self.nodes.is_empty()).then_some(BoxId(0))
    }

    /// Get a box by its ID.
    #[must_use]
    pub fn get(&self, id: BoxId) -> Option<&BoxNode> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a box by its ID.
    pub fn get_mut(&mut self, id: BoxId) -> Option<&mut BoxNode> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of boxes in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree has no boxes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new box and return its ID.
    /// The box is not yet attached to the tree.
    pub fn alloc(&mut self, node: BoxNode) -> BoxId {
        let id = BoxId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Appends `child` as the last child of `parent`.
    ///
    /// Inline parents record the child as an [`InlineChild::Box`] entry of
    /// their mixed inline content.
    pub fn append_child(&mut self, parent: BoxId, child: BoxId) {
        let Some(parent_node) = self.nodes.get_mut(parent.0) else {
            return;
        };
        match &mut parent_node.kind {
            BoxKind::Inline(data) => data.content.push(InlineChild::Box(child)),
            _ => parent_node.children.push(child),
        }
        if let Some(child_node) = self.nodes.get_mut(child.0) {
            child_node.parent = Some(parent);
        }
    }

    /// Allocate `node` and append it to `parent` in one step.
    pub fn append_new(&mut self, parent: BoxId, node: BoxNode) -> BoxId {
        let id = self.alloc(node);
        self.append_child(parent, id);
        id
    }

    /// Append a text run to an inline box. Other kinds of boxes ignore text.
    pub fn append_text(&mut self, parent: BoxId, text: impl Into<String>) {
        if let Some(BoxKind::Inline(data)) = self.nodes.get_mut(parent.0).map(|node| &mut node.kind) {
            data.content.push(InlineChild::Text(text.into()));
        }
    }

    /// Get the parent of a box.
    #[must_use]
    pub fn parent(&self, id: BoxId) -> Option<BoxId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// Get the block-level children of a box.
    #[must_use]
    pub fn children(&self, id: BoxId) -> &[BoxId] {
        self.get(id).map_or(&[], |node| node.children.as_slice())
    }

    /// Get the mixed inline content of an inline box.
    #[must_use]
    pub fn inline_children(&self, id: BoxId) -> &[InlineChild] {
        match self.get(id).map(|node| &node.kind) {
            Some(BoxKind::Inline(data)) => &data.content,
            _ => &[],
        }
    }

    /// Every child box of `id` in document order, whatever kind of box it is.
    #[must_use]
    pub fn child_boxes(&self, id: BoxId) -> Vec<BoxId> {
        match self.get(id).map(|node| &node.kind) {
            Some(BoxKind::Inline(data)) => data
                .content
                .iter()
                .filter_map(|child| match child {
                    InlineChild::Box(id) => Some(*id),
                    InlineChild::Text(_) => None,
                })
                .collect(),
            _ => self.children(id).to_vec(),
        }
    }

    /// Record the in-flow placeholder of an out-of-flow box.
    pub fn set_static_equivalent(&mut self, id: BoxId, equivalent: BoxId) {
        if let Some(node) = self.get_mut(id) {
            node.static_equivalent = Some(equivalent);
        }
    }
}
