//! Session setup parameters
//!
//! Supplied once when a session is created. Loaded from JSON; every field has
//! a default so partial files are fine.

use std::path::Path;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::audio::AudioSettings;
use crate::consts::*;
use crate::sim::{Brush, HazardField, HazardZone, MotionLimits, ScatterConfig};

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config: {message}")]
    Invalid { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid {
            message: msg.into(),
        }
    }
}

/// Everything needed to start a scrub session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    // === Mask ===
    /// Mask resolution in cells
    pub mask_width: u32,
    pub mask_height: u32,
    /// Mask cells per world unit
    pub pixels_per_unit: f32,
    /// World-space center of the mask
    pub mask_center: Vec2,
    /// RGBA of covered cells
    pub dust_color: [u8; 4],

    // === Brush ===
    pub brush_radius: f32,
    pub min_brush_radius: f32,
    pub max_brush_radius: f32,
    pub scroll_sensitivity: f32,
    /// Stamp spacing along a drag, as a fraction of brush radius
    pub subdivision_factor: f32,

    // === Rules ===
    pub motion: MotionLimits,
    /// Cleared fraction needed to win, in [0,1]
    pub win_clear_percent: f32,

    // === Hazards ===
    /// Fixed zones
    pub hazards: Vec<HazardZone>,
    /// Procedural zones placed around the mask center
    pub scatter: Option<ScatterConfig>,
    /// Seed for scatter placement and audio jitter
    pub seed: u64,

    // === Audio ===
    pub audio: AudioSettings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mask_width: MASK_WIDTH,
            mask_height: MASK_HEIGHT,
            pixels_per_unit: PIXELS_PER_UNIT,
            mask_center: Vec2::ZERO,
            dust_color: DUST_COLOR,

            brush_radius: BRUSH_RADIUS,
            min_brush_radius: MIN_BRUSH_RADIUS,
            max_brush_radius: MAX_BRUSH_RADIUS,
            scroll_sensitivity: SCROLL_SENSITIVITY,
            subdivision_factor: SUBDIVISION_FACTOR,

            motion: MotionLimits::default(),
            win_clear_percent: WIN_CLEAR_PERCENT,

            hazards: Vec::new(),
            scatter: Some(ScatterConfig::default()),
            seed: 0,

            audio: AudioSettings::default(),
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded session config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every parameter is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mask_width == 0 || self.mask_height == 0 {
            return Err(ConfigError::invalid(format!(
                "mask must be non-empty, got {}x{}",
                self.mask_width, self.mask_height
            )));
        }
        if self.mask_width > MAX_MASK_DIMENSION || self.mask_height > MAX_MASK_DIMENSION {
            return Err(ConfigError::invalid(format!(
                "mask sides must be <= {}, got {}x{}",
                MAX_MASK_DIMENSION, self.mask_width, self.mask_height
            )));
        }
        positive("pixels_per_unit", self.pixels_per_unit)?;
        if !crate::is_finite_point(self.mask_center) {
            return Err(ConfigError::invalid("mask_center must be finite"));
        }

        positive("min_brush_radius", self.min_brush_radius)?;
        positive("max_brush_radius", self.max_brush_radius)?;
        if self.min_brush_radius > self.max_brush_radius {
            return Err(ConfigError::invalid(format!(
                "brush bounds inverted: {} > {}",
                self.min_brush_radius, self.max_brush_radius
            )));
        }
        positive("brush_radius", self.brush_radius)?;
        if !self.scroll_sensitivity.is_finite() {
            return Err(ConfigError::invalid("scroll_sensitivity must be finite"));
        }
        positive("subdivision_factor", self.subdivision_factor)?;

        positive("max_allowed_speed", self.motion.max_allowed_speed)?;
        positive("speed_smoothing", self.motion.speed_smoothing)?;
        non_negative("speed_forgiveness_time", self.motion.speed_forgiveness_time)?;
        positive("nominal_frame_dt", self.motion.nominal_frame_dt)?;

        if !(0.0..=1.0).contains(&self.win_clear_percent) {
            return Err(ConfigError::invalid(format!(
                "win_clear_percent must be in [0,1], got {}",
                self.win_clear_percent
            )));
        }

        if let Some(scatter) = &self.scatter {
            if scatter.count > MAX_HAZARD_COUNT {
                return Err(ConfigError::invalid(format!(
                    "scatter.count must be <= {}, got {}",
                    MAX_HAZARD_COUNT, scatter.count
                )));
            }
            non_negative("scatter.min_distance_from_center", scatter.min_distance_from_center)?;
            non_negative("scatter.max_distance_from_center", scatter.max_distance_from_center)?;
            non_negative("scatter.min_distance_between", scatter.min_distance_between)?;
            non_negative("scatter.radius", scatter.radius)?;
        }

        if !self.audio.min_time_between_sounds.is_finite() || self.audio.min_time_between_sounds < 0.0
        {
            return Err(ConfigError::invalid("audio.min_time_between_sounds must be >= 0"));
        }

        Ok(())
    }

    /// Brush with configured bounds
    pub fn brush(&self) -> Brush {
        Brush::new(
            self.brush_radius,
            self.min_brush_radius,
            self.max_brush_radius,
            self.scroll_sensitivity,
        )
    }

    /// Fixed zones plus any scattered ones
    pub fn build_hazards(&self) -> HazardField {
        let mut field = HazardField::from_zones(self.hazards.iter().copied());
        if let Some(scatter) = &self.scatter {
            let mut rng = Pcg32::seed_from_u64(self.seed);
            field.extend(HazardField::scatter(scatter, self.mask_center, &mut rng));
        }
        field
    }
}

fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(format!("{name} must be > 0, got {value}")))
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(format!("{name} must be >= 0, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.build_hazards().len(), HAZARD_COUNT as usize);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SessionConfig::from_json_str(
            r#"{ "mask_width": 64, "win_clear_percent": 0.5, "scatter": null,
                 "hazards": [{ "center": [1.0, 2.0], "radius": 0.3 }] }"#,
        )
        .unwrap();
        assert_eq!(config.mask_width, 64);
        assert_eq!(config.mask_height, MASK_HEIGHT);
        assert_eq!(config.win_clear_percent, 0.5);
        assert_eq!(config.motion.max_allowed_speed, MAX_ALLOWED_SPEED);

        let hazards = config.build_hazards();
        assert_eq!(hazards.len(), 1);
        assert_eq!(hazards.zones()[0].center, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_json_round_trip() {
        let config = SessionConfig {
            seed: 99,
            ..Default::default()
        };
        let back = SessionConfig::from_json_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(back.seed, 99);
        assert_eq!(back.build_hazards().zones(), config.build_hazards().zones());
    }

    #[test]
    fn test_rejects_bad_values() {
        let cases = [
            SessionConfig {
                mask_width: 0,
                ..Default::default()
            },
            SessionConfig {
                min_brush_radius: 1.0,
                max_brush_radius: 0.5,
                ..Default::default()
            },
            SessionConfig {
                win_clear_percent: 1.5,
                ..Default::default()
            },
            SessionConfig {
                subdivision_factor: 0.0,
                ..Default::default()
            },
            SessionConfig {
                pixels_per_unit: f32::NAN,
                ..Default::default()
            },
        ];
        for config in cases {
            assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
        }
    }

    #[test]
    fn test_rejects_oversized_allocations() {
        let huge_count = SessionConfig::from_json_str(r#"{ "scatter": { "count": 4294967295 } }"#)
            .unwrap();
        assert!(matches!(huge_count.validate(), Err(ConfigError::Invalid { .. })));

        let huge_mask = SessionConfig {
            mask_width: 100_000,
            mask_height: 100_000,
            ..Default::default()
        };
        assert!(matches!(huge_mask.validate(), Err(ConfigError::Invalid { .. })));
        assert!(crate::sim::ScrubSession::from_config(&huge_mask).is_err());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            SessionConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            SessionConfig::load("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
