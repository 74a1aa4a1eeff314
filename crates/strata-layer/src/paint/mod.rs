//! CSS Painting
//!
//! [CSS 2.1 Appendix E - Elaborate description of Stacking Contexts](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! This module implements the painting phase, which walks the layer tree and
//! converts it into a display list of paint operations. The display list can
//! then be executed by any renderer.
//!
//! # Architecture
//!
//! ```text
//! Layout → Layers → Paint → Render
//!                     ↓
//!               DisplayList
//! ```
//!
//! Painting only decides *what* is drawn and in *which order*; pixels are
//! the renderer's business.

pub mod collector;
mod display_list;
mod painter;

pub use display_list::{DisplayCommand, DisplayList};
pub use painter::{Painter, RenderingContext};
