//! Common utilities for the Strata paint engine.
//!
//! This crate provides shared infrastructure used by all engine components:
//! - **Geometry** - integer device-unit points and rectangles
//! - **Warning System** - deduplicated warnings for unsupported features
//! - **Media Queries** - OR-combined media query lists

pub mod geometry;
pub mod media;
pub mod warning;

pub use geometry::{Point, Rect};
