//! Game state and per-frame outcomes
//!
//! `GameState` is the only authority on win/loss. Once it reaches a terminal
//! phase nothing moves it again.

use serde::{Deserialize, Serialize};

/// Why a run was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoseReason {
    /// Scrubbed too fast for too long
    Speed,
    /// Brush touched a hazard zone
    Hazard,
}

impl LoseReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoseReason::Speed => "speed",
            LoseReason::Hazard => "hazard",
        }
    }

    /// Player-facing message
    pub fn message(&self) -> &'static str {
        match self {
            LoseReason::Speed => "TooFast, the glass broke! :(",
            LoseReason::Hazard => "try to avoid the cracked glass! :(",
        }
    }
}

impl std::fmt::Display for LoseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of processing one frame of input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionOutcome {
    /// Still scrubbing; carries the cleared fraction
    Continue(f32),
    Lose(LoseReason),
    Win,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Won,
    Lost(LoseReason),
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// Terminal edge, emitted exactly once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Won,
    Lost(LoseReason),
}

/// Win/loss state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Last reported cleared fraction, in [0,1]
    pub progress: f32,
    /// Cleared fraction needed to win
    pub win_threshold: f32,
    /// Outcomes applied while playing
    pub frames: u64,
}

impl GameState {
    pub fn new(win_threshold: f32) -> Self {
        Self {
            phase: GamePhase::Playing,
            progress: 0.0,
            win_threshold,
            frames: 0,
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Apply a frame outcome, returning the terminal event if this caused one
    pub fn apply(&mut self, outcome: SessionOutcome) -> Option<GameEvent> {
        if self.is_terminal() {
            return None;
        }
        self.frames += 1;

        match outcome {
            SessionOutcome::Continue(progress) => {
                if progress.is_finite() {
                    self.progress = self.progress.max(progress.clamp(0.0, 1.0));
                }
                if self.progress >= self.win_threshold {
                    self.finish(GamePhase::Won)
                } else {
                    None
                }
            }
            SessionOutcome::Lose(reason) => self.finish(GamePhase::Lost(reason)),
            SessionOutcome::Win => self.finish(GamePhase::Won),
        }
    }

    fn finish(&mut self, phase: GamePhase) -> Option<GameEvent> {
        self.phase = phase;
        match phase {
            GamePhase::Won => {
                log::info!("Won at {:.1}% cleared", self.progress * 100.0);
                Some(GameEvent::Won)
            }
            GamePhase::Lost(reason) => {
                log::info!("Lost ({}): {}", reason, reason.message());
                Some(GameEvent::Lost(reason))
            }
            GamePhase::Playing => None,
        }
    }
}
