//! Stacking contexts and painting order for the Strata paint engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Layer tree** ([§ 9.9 Layered presentation](https://www.w3.org/TR/CSS2/visuren.html#layers))
//!   - One layer per positioned box, the root, and floats painted atomically
//!   - Stacking contexts for explicit `z-index` values
//!   - Float registration with the nearest stacking context
//!
//! - **Z-order** ([§ 9.9.1 'z-index'](https://www.w3.org/TR/CSS2/visuren.html#z-index))
//!   - Negative, auto, zero, and positive groups derived from document order
//!
//! - **Position resolution** ([§ 9.3 Positioning schemes](https://www.w3.org/TR/CSS2/visuren.html#positioning-scheme))
//!   - Absolute coordinates for every box and the document extent
//!   - Fixed boxes re-anchored to the viewport
//!
//! - **Painting** ([CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html))
//!   - Display list emission in painting order, culled against a clip
//!
//! # Not Yet Implemented
//!
//! - Opacity, transforms and other CSS3 stacking-context triggers
//! - Atomic painting of `z-index: 0` stacking contexts

/// Layer tree construction from a finished box tree.
pub mod builder;
/// Layer tree errors.
pub mod error;
/// The layer arena and its structural operations.
pub mod layer;
/// Display list and painting per [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html).
pub mod paint;
/// Absolute position resolution.
pub mod position;
/// Z-order grouping of layers.
pub mod zorder;

pub use builder::LayerTreeBuilder;
pub use error::{LayerError, Result};
pub use layer::{Layer, LayerId, LayerTree, PositionCache, StackingContextState};
pub use paint::{DisplayCommand, DisplayList, Painter, RenderingContext};
pub use zorder::LayerGroup;
