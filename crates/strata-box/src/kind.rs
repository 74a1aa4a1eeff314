//! Box kinds.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! The paint engine distinguishes a closed set of boxes. Each variant carries
//! only the data that kind of box needs.

use serde::{Deserialize, Serialize};
use strata_common::Point;
use strum_macros::Display;

use crate::BoxId;
use crate::float::FloatManager;

/// The kind of a box together with its kind-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoxKind {
    /// [§ 9.2.1 Block-level elements and block boxes](https://www.w3.org/TR/CSS2/visuren.html#block-boxes)
    Block(BlockData),
    /// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
    ///
    /// A floated block box. Floats are painted atomically as pseudo-layers.
    Float(FloatData),
    /// [§ 3.1 Replaced element](https://www.w3.org/TR/CSS2/conform.html#replaced-element)
    ///
    /// "An element whose content is outside the scope of the CSS formatting
    /// model, such as an image, embedded document, or applet."
    Replaced(ReplacedData),
    /// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
    ///
    /// "The rectangular area that contains the boxes that form a line is
    /// called a line box."
    Line(LineData),
    /// [§ 9.2.2 Inline-level elements and inline boxes](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
    Inline(InlineData),
}

impl BoxKind {
    /// A plain block box.
    #[must_use]
    pub fn block() -> Self {
        Self::Block(BlockData::default())
    }

    /// Block-level boxes paint a background and border of their own.
    #[must_use]
    pub const fn is_block_level(&self) -> bool {
        matches!(self, Self::Block(_) | Self::Float(_) | Self::Replaced(_))
    }

    /// Whether the box embeds foreign visual content.
    #[must_use]
    pub const fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced(_))
    }

    /// Whether the box is floated.
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    /// Whether the box is an inline box with mixed inline children.
    #[must_use]
    pub const fn is_inline(&self) -> bool {
        matches!(self, Self::Inline(_))
    }

    /// The block data of block and float boxes.
    #[must_use]
    pub const fn block_data(&self) -> Option<&BlockData> {
        match self {
            Self::Block(data) | Self::Float(FloatData { block: data, .. }) => Some(data),
            Self::Replaced(_) | Self::Line(_) | Self::Inline(_) => None,
        }
    }

    /// Mutable block data of block and float boxes.
    pub const fn block_data_mut(&mut self) -> Option<&mut BlockData> {
        match self {
            Self::Block(data) | Self::Float(FloatData { block: data, .. }) => Some(data),
            Self::Replaced(_) | Self::Line(_) | Self::Inline(_) => None,
        }
    }
}

/// Data carried by block containers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockData {
    /// [§ 12.5 Lists](https://www.w3.org/TR/CSS2/generate.html#lists)
    ///
    /// The marker of a list item.
    pub list_marker: Option<ListMarker>,
    /// The persistent block formatting context this box establishes, if any.
    ///
    /// [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
    pub formatting_context: Option<FloatManager>,
}

impl BlockData {
    /// Block data for a box that establishes a block formatting context.
    #[must_use]
    pub fn with_formatting_context() -> Self {
        Self {
            list_marker: None,
            formatting_context: Some(FloatManager::new()),
        }
    }
}

/// [§ 9.5.1 Positioning the float: the 'float' property](https://www.w3.org/TR/CSS2/visuren.html#float-position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FloatSide {
    /// "The element generates a block box that is floated to the left."
    Left,
    /// "The element generates a block box that is floated to the right."
    Right,
}

/// A floated block box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatData {
    /// Which side the box floats to.
    pub side: FloatSide,
    /// The float's own block data.
    pub block: BlockData,
}

/// [§ 12.6.2 Lists: the 'list-style-type' property](https://www.w3.org/TR/CSS2/generate.html#propdef-list-style-type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListMarker {
    /// A filled circle.
    Disc,
    /// A hollow circle.
    Circle,
    /// A filled square.
    Square,
    /// Decimal numbering, carrying the item's ordinal.
    Decimal(u32),
}

/// Foreign content embedded by a replaced element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacedContent {
    /// Resource key of the content (image source, widget name).
    pub source: String,
    /// External placement of the content, kept in sync with the box's
    /// absolute position by the position pass.
    pub location: Point,
}

/// Data carried by replaced boxes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacedData {
    /// The embedded content.
    pub content: ReplacedContent,
}

impl ReplacedData {
    /// Replaced data for content identified by `source`.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            content: ReplacedContent {
                source: source.into(),
                location: Point::ORIGIN,
            },
        }
    }
}

/// Text content of a line box.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineData {
    /// Text runs in visual order.
    pub runs: Vec<String>,
}

/// An entry of an inline box's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineChild {
    /// A nested box (inline box or atomic inline-level box).
    Box(BoxId),
    /// A run of text, which has no geometry of its own.
    Text(String),
}

/// Data carried by inline boxes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InlineData {
    /// Mixed inline content in document order.
    pub content: Vec<InlineChild>,
}
