//! Rendering hand-off
//!
//! The core never draws. The display collaborator pulls texels for the whole
//! mask or only the dirty region each frame and uploads them to its texture.

pub mod texel;

pub use texel::{Texel, mask_texels, region_texels, texel_bytes};
