//! Scrub speed gate
//!
//! Speed is low-pass filtered in continuous time so a single jittery sample
//! cannot end the run. Only overspeed that persists for the forgiveness window
//! counts as a violation; time spent under the limit pays the window back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::is_finite_point;

/// Speed gate tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionLimits {
    /// World units per second
    pub max_allowed_speed: f32,
    /// Low-pass rate (1/s); higher tracks raw speed more closely
    pub speed_smoothing: f32,
    /// Seconds of sustained overspeed tolerated
    pub speed_forgiveness_time: f32,
    /// dt substituted when timestamps do not advance
    pub nominal_frame_dt: f32,
}

impl Default for MotionLimits {
    fn default() -> Self {
        Self {
            max_allowed_speed: MAX_ALLOWED_SPEED,
            speed_smoothing: SPEED_SMOOTHING,
            speed_forgiveness_time: SPEED_FORGIVENESS_TIME,
            nominal_frame_dt: NOMINAL_FRAME_DT,
        }
    }
}

/// Classification of one pointer sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Ok,
    Violation,
}

/// Tracks smoothed pointer speed across one gesture
#[derive(Debug, Clone)]
pub struct MotionValidator {
    limits: MotionLimits,
    /// Last accepted position and timestamp (None until a gesture is seeded)
    last: Option<(Vec2, f64)>,
    smoothed_speed: f32,
    overspeed_time: f32,
}

impl MotionValidator {
    pub fn new(limits: MotionLimits) -> Self {
        Self {
            limits,
            last: None,
            smoothed_speed: 0.0,
            overspeed_time: 0.0,
        }
    }

    pub fn limits(&self) -> &MotionLimits {
        &self.limits
    }

    #[inline]
    pub fn smoothed_speed(&self) -> f32 {
        self.smoothed_speed
    }

    #[inline]
    pub fn overspeed_time(&self) -> f32 {
        self.overspeed_time
    }

    #[inline]
    pub fn last_position(&self) -> Option<Vec2> {
        self.last.map(|(p, _)| p)
    }

    /// Whether a gesture has been seeded
    #[inline]
    pub fn is_seeded(&self) -> bool {
        self.last.is_some()
    }

    /// Feed one sample; the first sample of a gesture only seeds state
    ///
    /// Non-finite samples are ignored and leave state untouched.
    pub fn on_sample(&mut self, position: Vec2, timestamp: f64) -> Verdict {
        if !is_finite_point(position) || !timestamp.is_finite() {
            return Verdict::Ok;
        }

        let Some((last_pos, last_time)) = self.last else {
            self.last = Some((position, timestamp));
            return Verdict::Ok;
        };

        let mut dt = (timestamp - last_time) as f32;
        if dt <= 0.0 {
            dt = self.limits.nominal_frame_dt;
        }

        let inst_speed = position.distance(last_pos) / dt.max(MIN_SPEED_DT);
        let blend = 1.0 - (-self.limits.speed_smoothing * dt).exp();
        self.smoothed_speed += (inst_speed - self.smoothed_speed) * blend;

        self.last = Some((position, timestamp));

        if self.smoothed_speed > self.limits.max_allowed_speed {
            self.overspeed_time += dt;
            if self.overspeed_time >= self.limits.speed_forgiveness_time {
                return Verdict::Violation;
            }
        } else {
            self.overspeed_time = (self.overspeed_time - dt).max(0.0);
        }

        Verdict::Ok
    }

    /// Forget the gesture (pointer released)
    pub fn reset(&mut self) {
        self.last = None;
        self.smoothed_speed = 0.0;
        self.overspeed_time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    fn feed(validator: &mut MotionValidator, start: usize, positions: &[Vec2]) -> Vec<Verdict> {
        positions
            .iter()
            .enumerate()
            .map(|(i, p)| validator.on_sample(*p, (start + i) as f64 * DT))
            .collect()
    }

    #[test]
    fn test_first_sample_seeds() {
        let mut v = MotionValidator::new(MotionLimits::default());
        assert!(!v.is_seeded());
        assert_eq!(v.on_sample(Vec2::new(100.0, 100.0), 5.0), Verdict::Ok);
        assert_eq!(v.smoothed_speed(), 0.0);
        assert_eq!(v.last_position(), Some(Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn test_constant_slow_drag_never_violates() {
        // 3 units/s against a 5 units/s limit, for several minutes
        let mut v = MotionValidator::new(MotionLimits::default());
        for i in 0..20_000 {
            let p = Vec2::new(i as f32 * 0.05, 0.0);
            assert_eq!(v.on_sample(p, i as f64 * DT), Verdict::Ok);
        }
        assert!(v.smoothed_speed() < 5.0);
        assert_eq!(v.overspeed_time(), 0.0);
    }

    #[test]
    fn test_brief_spike_forgiven() {
        let mut v = MotionValidator::new(MotionLimits::default());
        let mut path = vec![Vec2::ZERO, Vec2::ZERO, Vec2::new(1.0, 0.0)];
        path.extend(std::iter::repeat_n(Vec2::new(1.0, 0.0), 60));

        let verdicts = feed(&mut v, 0, &path);
        assert!(verdicts.iter().all(|v| *v == Verdict::Ok));
        assert!(v.smoothed_speed() < 1.0);
        assert_eq!(v.overspeed_time(), 0.0);
    }

    #[test]
    fn test_sustained_overspeed_violates() {
        let mut v = MotionValidator::new(MotionLimits::default());
        // 30 units/s
        let path: Vec<Vec2> = (0..60).map(|i| Vec2::new(i as f32 * 0.5, 0.0)).collect();
        let verdicts = feed(&mut v, 0, &path);

        let first = verdicts
            .iter()
            .position(|v| *v == Verdict::Violation)
            .expect("sustained overspeed should violate");
        // Not before the forgiveness window has elapsed
        assert!(first as f64 * DT >= 0.12);
    }

    #[test]
    fn test_overspeed_decays_when_slowing() {
        let mut v = MotionValidator::new(MotionLimits::default());
        let mut path = vec![Vec2::ZERO, Vec2::new(1.0, 0.0)];
        path.extend(std::iter::repeat_n(Vec2::new(1.0, 0.0), 3));
        feed(&mut v, 0, &path);
        let accumulated = v.overspeed_time();
        assert!(accumulated > 0.0);

        feed(&mut v, path.len(), &[Vec2::new(1.0, 0.0); 30]);
        assert_eq!(v.overspeed_time(), 0.0);
    }

    #[test]
    fn test_non_increasing_timestamp_uses_nominal_dt() {
        let mut v = MotionValidator::new(MotionLimits::default());
        v.on_sample(Vec2::ZERO, 1.0);
        assert_eq!(v.on_sample(Vec2::new(0.01, 0.0), 1.0), Verdict::Ok);
        // 0.01 units over a nominal 1/60 s frame = 0.6 units/s raw
        assert!(v.smoothed_speed() > 0.0);
        assert!(v.smoothed_speed().is_finite());
    }

    #[test]
    fn test_non_finite_sample_ignored() {
        let mut v = MotionValidator::new(MotionLimits::default());
        v.on_sample(Vec2::ZERO, 0.0);
        assert_eq!(v.on_sample(Vec2::new(f32::NAN, 0.0), DT), Verdict::Ok);
        assert_eq!(v.on_sample(Vec2::ONE, f64::INFINITY), Verdict::Ok);
        assert_eq!(v.last_position(), Some(Vec2::ZERO));
        assert_eq!(v.smoothed_speed(), 0.0);
    }

    #[test]
    fn test_reset_forgets_gap() {
        let mut v = MotionValidator::new(MotionLimits::default());
        v.on_sample(Vec2::ZERO, 0.0);
        v.on_sample(Vec2::new(0.05, 0.0), DT);
        v.reset();
        assert!(!v.is_seeded());
        assert_eq!(v.smoothed_speed(), 0.0);

        // A far-away restart is a fresh seed, not a teleport
        assert_eq!(v.on_sample(Vec2::new(50.0, 50.0), 2.0 * DT), Verdict::Ok);
        assert_eq!(v.smoothed_speed(), 0.0);
    }
}
