//! Dust Scrub - a scratch-off reveal game core
//!
//! Core modules:
//! - `sim`: Deterministic scrubbing simulation (dust mask, hazards, speed gate, game state)
//! - `renderer`: Mask texel export for the display surface
//! - `platform`: Pointer input and screen-to-world mapping
//! - `audio`: Scrub sound cue gating
//! - `settings`: Session setup parameters

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{ConfigError, SessionConfig};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Frame interval assumed when a sample arrives with a non-increasing timestamp
    pub const NOMINAL_FRAME_DT: f32 = 1.0 / 60.0;
    /// Lower bound on dt when turning distance into speed
    pub const MIN_SPEED_DT: f32 = 0.0001;
    /// Maximum stamps along one drag segment (guards against huge jumps)
    pub const MAX_SUBDIVISION_STEPS: u32 = 4096;
    /// Scroll deltas at or below this magnitude do not resize the brush
    pub const SCROLL_DEADZONE: f32 = 0.01;
    /// Placement attempts per scattered hazard before giving up
    pub const SCATTER_MAX_ATTEMPTS: u32 = 100;
    /// Largest accepted mask side, in pixels
    pub const MAX_MASK_DIMENSION: u32 = 8192;
    /// Largest accepted scattered hazard count
    pub const MAX_HAZARD_COUNT: u32 = 1024;

    /// Dust mask defaults
    pub const MASK_WIDTH: u32 = 512;
    pub const MASK_HEIGHT: u32 = 512;
    pub const PIXELS_PER_UNIT: f32 = 64.0;
    pub const DUST_COLOR: [u8; 4] = [180, 180, 180, 255];

    /// Brush defaults (world units)
    pub const BRUSH_RADIUS: f32 = 0.25;
    pub const MIN_BRUSH_RADIUS: f32 = 0.1;
    pub const MAX_BRUSH_RADIUS: f32 = 0.8;
    pub const SCROLL_SENSITIVITY: f32 = 0.1;
    /// Stamp spacing as a fraction of brush radius
    pub const SUBDIVISION_FACTOR: f32 = 0.25;

    /// Speed gate defaults
    pub const MAX_ALLOWED_SPEED: f32 = 5.0;
    pub const SPEED_SMOOTHING: f32 = 8.0;
    pub const SPEED_FORGIVENESS_TIME: f32 = 0.12;

    /// Fraction of the mask that must be cleared to win
    pub const WIN_CLEAR_PERCENT: f32 = 0.9;

    /// Hazard defaults
    pub const HAZARD_RADIUS: f32 = 0.25;
    pub const HAZARD_COUNT: u32 = 4;
    pub const HAZARD_MIN_DISTANCE_FROM_CENTER: f32 = 1.5;
    pub const HAZARD_MAX_DISTANCE_FROM_CENTER: f32 = 3.5;
    pub const HAZARD_MIN_DISTANCE_BETWEEN: f32 = 1.0;
}

/// True when both coordinates are finite
#[inline]
pub fn is_finite_point(p: Vec2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Point `t` of the way from `a` to `b`
#[inline]
pub fn lerp_point(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}
