//! Brush size, adjustable by scroll within fixed bounds

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// The scrubbing brush (radius in world units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub scroll_sensitivity: f32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            radius: BRUSH_RADIUS,
            min_radius: MIN_BRUSH_RADIUS,
            max_radius: MAX_BRUSH_RADIUS,
            scroll_sensitivity: SCROLL_SENSITIVITY,
        }
    }
}

impl Brush {
    pub fn new(radius: f32, min_radius: f32, max_radius: f32, scroll_sensitivity: f32) -> Self {
        let mut brush = Self {
            radius: min_radius,
            min_radius,
            max_radius,
            scroll_sensitivity,
        };
        brush.set_radius(radius);
        brush
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Set the radius, clamped to bounds; non-finite or non-positive values are ignored
    pub fn set_radius(&mut self, radius: f32) {
        if !radius.is_finite() || radius <= 0.0 {
            log::debug!("Ignoring brush radius {}", radius);
            return;
        }
        self.radius = radius.clamp(self.min_radius, self.max_radius);
    }

    /// Grow or shrink by a scroll wheel delta, clamped to bounds
    pub fn scroll(&mut self, delta: f32) {
        if !delta.is_finite() || delta.abs() <= SCROLL_DEADZONE {
            return;
        }
        let radius = self.radius + delta * self.scroll_sensitivity;
        if radius.is_finite() {
            self.radius = radius.clamp(self.min_radius, self.max_radius);
        }
    }
}
