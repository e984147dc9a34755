//! Scrub sound gating
//!
//! The core does not play audio. `ScrubAudio` turns the per-frame "scrubbing"
//! signal into start/stop cues for a looping scrub sound, throttling restarts
//! so a jittery drag does not retrigger the loop every frame.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Scrub sound parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Seconds between play requests before another is honoured
    pub min_time_between_sounds: f64,
    /// Loop volume before master/sfx scaling
    pub base_volume: f32,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            min_time_between_sounds: 0.5,
            base_volume: 0.5,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

/// Instruction for the audio backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCue {
    /// Start the scrub loop
    Start { pitch: f32, volume: f32 },
    /// Stop the scrub loop
    Stop,
}

/// Scrub loop state
pub struct ScrubAudio {
    settings: AudioSettings,
    playing: bool,
    last_play_time: Option<f64>,
    rng: Pcg32,
}

impl ScrubAudio {
    pub fn new(settings: AudioSettings, seed: u64) -> Self {
        Self {
            settings,
            playing: false,
            last_play_time: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.settings.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.settings.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute; muting while the loop plays stops it
    pub fn set_muted(&mut self, muted: bool) -> Option<AudioCue> {
        self.settings.muted = muted;
        if muted { self.stop() } else { None }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    fn effective_volume(&self) -> f32 {
        if self.settings.muted {
            0.0
        } else {
            self.settings.base_volume * self.settings.master_volume * self.settings.sfx_volume
        }
    }

    /// Feed this frame's scrubbing signal at time `now` (seconds)
    pub fn update(&mut self, scrubbing: bool, now: f64) -> Option<AudioCue> {
        if !scrubbing {
            return self.stop();
        }

        if let Some(last) = self.last_play_time {
            if now - last < self.settings.min_time_between_sounds {
                return None;
            }
        }
        self.last_play_time = Some(now);

        if self.playing {
            return None;
        }
        let volume = self.effective_volume();
        if volume <= 0.0 {
            return None;
        }

        self.playing = true;
        Some(AudioCue::Start {
            pitch: self.rng.random_range(0.9..=1.1),
            volume,
        })
    }

    /// Stop the loop if it is playing
    pub fn stop(&mut self) -> Option<AudioCue> {
        if self.playing {
            self.playing = false;
            Some(AudioCue::Stop)
        } else {
            None
        }
    }
}
