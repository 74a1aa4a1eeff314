//! Display List - a sequence of paint operations
//!
//! [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! The display list is the output of the painting phase. It records what is
//! painted for which box, in painting order, without rasterizing anything.

use serde::Serialize;
use strata_box::{Border, BoxId, Color, ListMarker};
use strata_common::Rect;

/// A single paint operation.
///
/// [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
///
/// Commands are added to the display list in painting order (back to front).
/// Every command carries the box it was produced for and that box's absolute
/// border box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DisplayCommand {
    /// "the background color of the element"
    ///
    /// `color` is `None` for a transparent background; the command is still
    /// emitted so the painting order of every block stays observable.
    Background {
        /// The painted box.
        box_id: BoxId,
        /// Absolute border box.
        bounds: Rect,
        /// Background color, if any.
        color: Option<Color>,
    },

    /// "the border of the element"
    Border {
        /// The painted box.
        box_id: BoxId,
        /// Absolute border box.
        bounds: Rect,
        /// Border, if any.
        border: Option<Border>,
    },

    /// The text of a line box.
    ///
    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    /// Step 7: "the element's text"
    InlineContent {
        /// The line box.
        box_id: BoxId,
        /// Absolute bounds of the line box.
        bounds: Rect,
        /// Text runs in visual order.
        runs: Vec<String>,
    },

    /// The marker of a list item.
    ///
    /// [§ 12.5 Lists](https://www.w3.org/TR/CSS2/generate.html#lists)
    ListMarker {
        /// The list item.
        box_id: BoxId,
        /// Absolute border box of the list item.
        bounds: Rect,
        /// Marker style.
        marker: ListMarker,
    },

    /// The content of a replaced element.
    ///
    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    /// Step 5: "the replaced content of replaced inline-level elements"
    ///
    /// The `source` string is the lookup key the renderer resolves the
    /// content with.
    ReplacedContent {
        /// The replaced box.
        box_id: BoxId,
        /// Absolute border box.
        bounds: Rect,
        /// Content source key.
        source: String,
    },
}

impl DisplayCommand {
    /// The box the command was emitted for.
    #[must_use]
    pub const fn box_id(&self) -> BoxId {
        match self {
            Self::Background { box_id, .. }
            | Self::Border { box_id, .. }
            | Self::InlineContent { box_id, .. }
            | Self::ListMarker { box_id, .. }
            | Self::ReplacedContent { box_id, .. } => *box_id,
        }
    }

    /// The absolute bounds the command paints into.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        match self {
            Self::Background { bounds, .. }
            | Self::Border { bounds, .. }
            | Self::InlineContent { bounds, .. }
            | Self::ListMarker { bounds, .. }
            | Self::ReplacedContent { bounds, .. } => *bounds,
        }
    }

    /// Short name of the operation, as used in JSON output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Background { .. } => "background",
            Self::Border { .. } => "border",
            Self::InlineContent { .. } => "inline_content",
            Self::ListMarker { .. } => "list_marker",
            Self::ReplacedContent { .. } => "replaced_content",
        }
    }
}

/// A list of paint operations in painting order.
///
/// [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
///
/// Commands are stored in back-to-front order, so a renderer can simply
/// iterate and execute each command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Add a command to the display list.
    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// Get the commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// Get the number of commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the display list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
