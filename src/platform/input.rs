//! Pointer input mapping
//!
//! Screen coordinates are in pixels with the origin at the top-left and y
//! growing downward. World space is y-up, centered on the camera.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{PointerSample, TickInput};

/// Half-height of the visible world for the default camera
pub const DEFAULT_ORTHO_SIZE: f32 = 5.0;

/// Pixel rectangle of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zero-sized viewports contain nothing
    pub fn contains(&self, screen: Vec2) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && screen.x >= 0.0
            && screen.x < self.width
            && screen.y >= 0.0
            && screen.y < self.height
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// Orthographic 2D camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrthoCamera {
    /// World point at the viewport center
    pub position: Vec2,
    /// Half of the visible world height
    pub ortho_size: f32,
    pub viewport: Viewport,
}

impl OrthoCamera {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            position: Vec2::ZERO,
            ortho_size: DEFAULT_ORTHO_SIZE,
            viewport,
        }
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let ndc = Vec2::new(
            screen.x / self.viewport.width * 2.0 - 1.0,
            1.0 - screen.y / self.viewport.height * 2.0, // Screen y is flipped
        );
        self.position
            + Vec2::new(
                ndc.x * self.ortho_size * self.viewport.aspect(),
                ndc.y * self.ortho_size,
            )
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let local = world - self.position;
        let ndc = Vec2::new(
            local.x / (self.ortho_size * self.viewport.aspect()),
            local.y / self.ortho_size,
        );
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.width,
            (1.0 - ndc.y) * 0.5 * self.viewport.height,
        )
    }

    /// World length in screen pixels (brush cursor size)
    pub fn world_to_screen_length(&self, length: f32) -> f32 {
        length / self.ortho_size * self.viewport.height * 0.5
    }

    /// World-space sample for a screen position, or None outside the viewport
    pub fn sample(&self, screen: Vec2, timestamp: f64) -> Option<PointerSample> {
        if !self.viewport.contains(screen) {
            return None;
        }
        Some(PointerSample::new(self.screen_to_world(screen), timestamp))
    }
}

/// Accumulates host pointer events into the next frame's input
#[derive(Debug, Default)]
pub struct InputCollector {
    pending: TickInput,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Presses outside the viewport do not start a gesture
    ///
    /// A press after a pending release supersedes it: starting a gesture
    /// already ends the previous one.
    pub fn pointer_down(&mut self, camera: &OrthoCamera, screen: Vec2, timestamp: f64) {
        if let Some(sample) = camera.sample(screen, timestamp) {
            self.pending.press = true;
            self.pending.release = false;
            self.pending.sample = Some(sample);
        }
    }

    /// Latest position wins; leaving the viewport drops the frame's sample
    ///
    /// Moves after a release in the same frame are hover, not drag.
    pub fn pointer_move(&mut self, camera: &OrthoCamera, screen: Vec2, timestamp: f64) {
        if self.pending.release {
            return;
        }
        self.pending.sample = camera.sample(screen, timestamp);
    }

    pub fn pointer_up(&mut self) {
        self.pending.release = true;
    }

    pub fn scroll(&mut self, delta: f32) {
        self.pending.scroll += delta;
    }

    /// Take the accumulated input, clearing one-shot flags
    pub fn take(&mut self) -> TickInput {
        std::mem::take(&mut self.pending)
    }
}
