//! Deterministic scrubbing simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Simulated time only (timestamps come from the caller)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod brush;
pub mod hazard;
pub mod mask;
pub mod motion;
pub mod state;
pub mod tick;

pub use brush::Brush;
pub use hazard::{HazardField, HazardZone, ScatterConfig};
pub use mask::{DirtyRect, DustMask, MaskTransform};
pub use motion::{MotionLimits, MotionValidator, Verdict};
pub use state::{GameEvent, GamePhase, GameState, LoseReason, SessionOutcome};
pub use tick::{FrameReport, PointerSample, ScrubSession, TickInput, subdivision_steps};
