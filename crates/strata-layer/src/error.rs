//! Errors raised by the layer tree.
//!
//! Every variant signals a bug in the caller or the layout stage rather than
//! a runtime condition: the current paint pass is aborted and the error is
//! handed to the pipeline driver.

use strata_box::BoxId;
use thiserror::Error;

use crate::layer::LayerId;

/// Error type for layer tree operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayerError {
    /// A layer was removed from a parent that does not contain it.
    #[error("invariant violation: layer not found ({child:?} is not a child of {parent:?})")]
    LayerNotFound {
        /// The layer whose children were searched.
        parent: LayerId,
        /// The layer that was expected among them.
        child: LayerId,
    },
    /// A handle refers to a layer that has been destroyed.
    #[error("stale layer handle {0:?}")]
    StaleLayer(LayerId),
    /// A box id does not exist in the box tree.
    #[error("box {0:?} is not part of the box tree")]
    UnknownBox(BoxId),
    /// A second layer was requested for a box that already has one.
    #[error("invariant violation: box {master:?} already owns layer {existing:?}")]
    DuplicateLayer {
        /// The box both layers would wrap.
        master: BoxId,
        /// The layer registered first.
        existing: LayerId,
    },
    /// A layer that already has a parent was attached again.
    #[error("invariant violation: layer {child:?} is already a child of {parent:?}")]
    AlreadyAttached {
        /// The layer being attached.
        child: LayerId,
        /// Its current parent.
        parent: LayerId,
    },
    /// Attaching `child` under `parent` would make a layer its own ancestor.
    #[error("invariant violation: attaching {child:?} under {parent:?} would form a cycle")]
    WouldCycle {
        /// The requested parent.
        parent: LayerId,
        /// The layer being attached.
        child: LayerId,
    },
    /// A root layer was requested while the tree already has one.
    #[error("layer tree already has root layer {0:?}")]
    RootExists(LayerId),
    /// A float walked past a parentless layer that is not a stacking context.
    #[error("invariant violation: no stacking context encloses layer {0:?}")]
    NoStackingContext(LayerId),
}

impl LayerError {
    /// Whether the error reports a corrupted layer tree, as opposed to a bad
    /// handle passed in by the caller.
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::LayerNotFound { .. }
                | Self::DuplicateLayer { .. }
                | Self::AlreadyAttached { .. }
                | Self::WouldCycle { .. }
                | Self::NoStackingContext(_)
        )
    }
}

/// Result type for layer tree operations.
pub type Result<T> = std::result::Result<T, LayerError>;
