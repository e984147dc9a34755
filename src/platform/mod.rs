//! Platform abstraction layer
//!
//! Turns host pointer events into simulation input:
//! - Viewport hit-testing
//! - Screen-to-world mapping for an orthographic camera
//! - Per-frame input accumulation

pub mod input;

pub use input::{InputCollector, OrthoCamera, Viewport};
