//! Hazard zones: cracked-glass spots the brush must stay clear of
//!
//! Hazards are pure geometry. A brush of radius `r` at `p` touches a zone when
//! the two circles overlap, boundary included.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::is_finite_point;

/// A circular penalty zone in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardZone {
    pub center: Vec2,
    pub radius: f32,
}

impl HazardZone {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Circle-circle overlap, inclusive of touching
    #[inline]
    pub fn overlaps(&self, point: Vec2, radius: f32) -> bool {
        point.distance(self.center) <= self.radius + radius
    }

    fn is_valid(&self) -> bool {
        is_finite_point(self.center) && self.radius.is_finite() && self.radius >= 0.0
    }
}

/// Procedural hazard layout around the mask center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    /// Number of zones to place
    pub count: u32,
    pub min_distance_from_center: f32,
    pub max_distance_from_center: f32,
    /// Minimum spacing between zone centers
    pub min_distance_between: f32,
    /// Radius of each placed zone
    pub radius: f32,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            count: HAZARD_COUNT,
            min_distance_from_center: HAZARD_MIN_DISTANCE_FROM_CENTER,
            max_distance_from_center: HAZARD_MAX_DISTANCE_FROM_CENTER,
            min_distance_between: HAZARD_MIN_DISTANCE_BETWEEN,
            radius: HAZARD_RADIUS,
        }
    }
}

/// The fixed set of hazard zones for a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HazardField {
    zones: Vec<HazardZone>,
}

impl HazardField {
    pub fn new() -> Self {
        Self { zones: Vec::new() }
    }

    /// Build from a list, dropping zones with non-finite or negative geometry
    pub fn from_zones(zones: impl IntoIterator<Item = HazardZone>) -> Self {
        let mut field = Self::new();
        for zone in zones {
            field.add(zone.center, zone.radius);
        }
        field
    }

    /// Add a zone during setup
    pub fn add(&mut self, center: Vec2, radius: f32) {
        let zone = HazardZone::new(center, radius);
        if zone.is_valid() {
            self.zones.push(zone);
        } else {
            log::warn!("Ignoring malformed hazard zone {:?}", zone);
        }
    }

    pub fn zones(&self) -> &[HazardZone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// True if a brush of `radius` at `point` overlaps any zone
    pub fn intersects(&self, point: Vec2, radius: f32) -> bool {
        self.zones.iter().any(|zone| zone.overlaps(point, radius))
    }

    /// Place zones at random angles and distances around `origin`
    ///
    /// Candidates closer than `min_distance_between` to an already placed zone
    /// are rejected. A zone that cannot be placed within the attempt budget is
    /// skipped.
    pub fn scatter(config: &ScatterConfig, origin: Vec2, rng: &mut impl Rng) -> Self {
        let (near, far) = if config.min_distance_from_center <= config.max_distance_from_center {
            (config.min_distance_from_center, config.max_distance_from_center)
        } else {
            (config.max_distance_from_center, config.min_distance_from_center)
        };

        let capacity = config.count.min(MAX_HAZARD_COUNT) as usize;
        let mut placed: Vec<Vec2> = Vec::with_capacity(capacity);
        for i in 0..config.count {
            let mut found = None;
            for _ in 0..SCATTER_MAX_ATTEMPTS {
                let distance = rng.random_range(near..=far);
                let angle = rng.random_range(0.0..std::f32::consts::TAU);
                let candidate = Vec2::new(angle.cos(), angle.sin()) * distance;
                if placed
                    .iter()
                    .all(|p| p.distance(candidate) >= config.min_distance_between)
                {
                    found = Some(candidate);
                    break;
                }
            }

            match found {
                Some(pos) => placed.push(pos),
                None => log::warn!(
                    "Hazard {} could not be placed after {} attempts",
                    i,
                    SCATTER_MAX_ATTEMPTS
                ),
            }
        }

        log::debug!("Scattered {}/{} hazard zones", placed.len(), config.count);
        Self::from_zones(
            placed
                .into_iter()
                .map(|p| HazardZone::new(origin + p, config.radius)),
        )
    }

    /// Merge another field's zones into this one (setup only)
    pub fn extend(&mut self, other: HazardField) {
        self.zones.extend(other.zones);
    }
}
