//! Per-frame scrub processing
//!
//! Each frame the pointer moves from where it was to where it is now. The
//! speed gate sees the move first; if it passes, the segment is cut into
//! stamps spaced a fraction of the brush radius apart so that fast drags
//! leave no gaps and cannot skip over a hazard.

use glam::Vec2;

use super::brush::Brush;
use super::hazard::HazardField;
use super::mask::{DirtyRect, DustMask, MaskTransform};
use super::motion::{MotionValidator, Verdict};
use super::state::{GameEvent, GamePhase, GameState, LoseReason, SessionOutcome};
use crate::consts::MAX_SUBDIVISION_STEPS;
use crate::settings::{ConfigError, SessionConfig};
use crate::{is_finite_point, lerp_point};

/// A pointer position in world space with its timestamp (seconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub position: Vec2,
    pub timestamp: f64,
}

impl PointerSample {
    pub fn new(position: Vec2, timestamp: f64) -> Self {
        Self {
            position,
            timestamp,
        }
    }
}

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer pressed this frame (gesture start)
    pub press: bool,
    /// Pointer released this frame (gesture end)
    pub release: bool,
    /// Latest pointer sample, if the pointer is over the viewport
    pub sample: Option<PointerSample>,
    /// Scroll wheel delta for brush size
    pub scroll: f32,
}

/// What happened during one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// None when nothing was processed (no gesture, or run already over)
    pub outcome: Option<SessionOutcome>,
    /// Terminal edge caused by this frame
    pub event: Option<GameEvent>,
    /// Brush was scrubbing this frame (drives the scrub sound)
    pub scrubbing: bool,
    /// Stamps placed along the segment
    pub stamps: u32,
    /// Cells newly cleared
    pub cleared: usize,
}

/// Number of subdivisions for a drag segment
///
/// `ceil(distance / (brush_radius * factor))`, at least 1. Stamps are placed at
/// both ends, so a segment receives `steps + 1` stamps.
pub fn subdivision_steps(distance: f32, brush_radius: f32, factor: f32) -> u32 {
    let spacing = brush_radius * factor;
    if spacing.is_nan() || spacing <= 0.0 || !distance.is_finite() || distance <= 0.0 {
        return 1;
    }
    let steps = (distance / spacing).ceil();
    if steps >= MAX_SUBDIVISION_STEPS as f32 {
        log::debug!("Clamping {} subdivisions to {}", steps, MAX_SUBDIVISION_STEPS);
        MAX_SUBDIVISION_STEPS
    } else {
        (steps as u32).max(1)
    }
}

/// One scrubbing run: the mask, its hazards, the speed gate and the outcome
#[derive(Debug, Clone)]
pub struct ScrubSession {
    mask: DustMask,
    transform: MaskTransform,
    hazards: HazardField,
    motion: MotionValidator,
    state: GameState,
    brush: Brush,
    subdivision_factor: f32,
    /// Previous pointer position while a gesture is active
    drag_from: Option<Vec2>,
}

impl ScrubSession {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mask: DustMask,
        transform: MaskTransform,
        hazards: HazardField,
        motion: MotionValidator,
        state: GameState,
        brush: Brush,
        subdivision_factor: f32,
    ) -> Self {
        Self {
            mask,
            transform,
            hazards,
            motion,
            state,
            brush,
            subdivision_factor,
            drag_from: None,
        }
    }

    /// Build a session from validated setup parameters
    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mask = DustMask::new(config.mask_width, config.mask_height);
        let transform = MaskTransform::for_mask(&mask, config.mask_center, config.pixels_per_unit);
        let hazards = config.build_hazards();

        log::info!(
            "Session: {}x{} mask ({:.2}x{:.2} units), {} hazards, win at {:.0}%",
            mask.width(),
            mask.height(),
            transform.world_size.x,
            transform.world_size.y,
            hazards.len(),
            config.win_clear_percent * 100.0
        );

        Ok(Self::new(
            mask,
            transform,
            hazards,
            MotionValidator::new(config.motion),
            GameState::new(config.win_clear_percent),
            config.brush(),
            config.subdivision_factor,
        ))
    }

    /// Advance by one frame of input
    pub fn tick(&mut self, input: &TickInput) -> FrameReport {
        self.brush.scroll(input.scroll);

        if input.press {
            self.begin_gesture(input.sample);
        }

        let mut report = FrameReport::default();
        if self.drag_from.is_some() && !self.state.is_terminal() {
            if let Some(sample) = input.sample {
                report = self.drag_to(sample);
            }
        }

        if input.release {
            self.end_gesture();
        }

        report
    }

    /// Erase along `from -> to` and check hazards at every stamp
    ///
    /// Returns the outcome, stamps placed and cells newly cleared. Stops at the
    /// first stamp that touches a hazard. Finished sessions are left untouched.
    fn stroke(&mut self, from: Vec2, to: Vec2) -> (SessionOutcome, u32, usize) {
        if self.state.is_terminal() {
            return (SessionOutcome::Continue(self.state.progress), 0, 0);
        }

        let radius = self.brush.radius();
        let radius_px = self.transform.radius_to_pixels(radius);
        let steps = subdivision_steps(from.distance(to), radius, self.subdivision_factor);

        let mut stamps = 0;
        let mut cleared = 0;
        for i in 0..=steps {
            let p = lerp_point(from, to, i as f32 / steps as f32);
            cleared += self.mask.erase_circle(self.transform.normalize(p), radius_px);
            stamps += 1;

            if self.hazards.intersects(p, radius) {
                log::debug!("Stamp {} at {:?} touched a hazard", i, p);
                return (SessionOutcome::Lose(LoseReason::Hazard), stamps, cleared);
            }
        }

        (
            SessionOutcome::Continue(self.mask.cleared_fraction()),
            stamps,
            cleared,
        )
    }

    /// Start over with a fresh mask and the same hazards
    pub fn restart(&mut self) {
        self.mask.reset();
        self.state = GameState::new(self.state.win_threshold);
        self.motion.reset();
        self.drag_from = None;
        log::info!("Session restarted");
    }

    fn begin_gesture(&mut self, sample: Option<PointerSample>) {
        let Some(sample) = sample else {
            return;
        };
        if !is_finite_point(sample.position) || !sample.timestamp.is_finite() {
            return;
        }
        self.motion.reset();
        self.drag_from = Some(sample.position);
        log::debug!("Gesture start at {:?}", sample.position);
    }

    fn end_gesture(&mut self) {
        if self.drag_from.take().is_some() {
            log::debug!("Gesture end");
        }
        self.motion.reset();
    }

    fn drag_to(&mut self, sample: PointerSample) -> FrameReport {
        let Some(from) = self.drag_from else {
            return FrameReport::default();
        };

        if !is_finite_point(sample.position) || !sample.timestamp.is_finite() {
            log::debug!("Dropping malformed sample {:?}", sample);
            let progress = self.mask.cleared_fraction();
            return self.finish_frame(SessionOutcome::Continue(progress), 0, 0);
        }

        if self.motion.on_sample(sample.position, sample.timestamp) == Verdict::Violation {
            log::debug!(
                "Smoothed speed {:.2} over limit for {:.3}s",
                self.motion.smoothed_speed(),
                self.motion.overspeed_time()
            );
            return self.finish_frame(SessionOutcome::Lose(LoseReason::Speed), 0, 0);
        }

        let (outcome, stamps, cleared) = self.stroke(from, sample.position);
        self.drag_from = Some(sample.position);
        self.finish_frame(outcome, stamps, cleared)
    }

    fn finish_frame(&mut self, outcome: SessionOutcome, stamps: u32, cleared: usize) -> FrameReport {
        let event = self.state.apply(outcome);
        FrameReport {
            outcome: Some(outcome),
            event,
            scrubbing: stamps > 0 && !self.state.is_terminal(),
            stamps,
            cleared,
        }
    }

    pub fn mask(&self) -> &DustMask {
        &self.mask
    }

    /// Region of the mask changed since the last call
    pub fn take_dirty(&mut self) -> Option<DirtyRect> {
        self.mask.take_dirty()
    }

    pub fn transform(&self) -> &MaskTransform {
        &self.transform
    }

    pub fn hazards(&self) -> &HazardField {
        &self.hazards
    }

    pub fn motion(&self) -> &MotionValidator {
        &self.motion
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Cleared fraction of the mask
    pub fn progress(&self) -> f32 {
        self.mask.cleared_fraction()
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn brush_mut(&mut self) -> &mut Brush {
        &mut self.brush
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }
}
