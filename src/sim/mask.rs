//! Dust mask and world-to-mask mapping
//!
//! The mask is a grid of cells that start covered and can only ever be
//! cleared. `cleared_cells` always equals the number of cleared cells, so
//! progress is monotonic within a session.
//!
//! Row 0 is the bottom edge of the mask (world -y), matching the way the
//! normalized y coordinate grows upward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::is_finite_point;

/// Inclusive rectangle of cells touched since the renderer last drained it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirtyRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl DirtyRect {
    #[inline]
    pub fn width(&self) -> u32 {
        self.x1 - self.x0 + 1
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.y1 - self.y0 + 1
    }

    /// Smallest rectangle covering both
    pub fn union(self, other: DirtyRect) -> DirtyRect {
        DirtyRect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// The occluding dust layer
#[derive(Debug, Clone)]
pub struct DustMask {
    width: u32,
    height: u32,
    /// Row-major, `true` = cleared
    cleared: Vec<bool>,
    cleared_cells: usize,
    dirty: Option<DirtyRect>,
}

impl DustMask {
    /// Create a fully covered mask
    pub fn new(width: u32, height: u32) -> Self {
        let total = width as usize * height as usize;
        Self {
            width,
            height,
            cleared: vec![false; total],
            cleared_cells: 0,
            dirty: None,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn total_cells(&self) -> usize {
        self.cleared.len()
    }

    #[inline]
    pub fn cleared_cells(&self) -> usize {
        self.cleared_cells
    }

    /// True for a zero-area mask
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cleared.is_empty()
    }

    /// Whether the cell at (x, y) has been cleared (out of range reads as covered)
    pub fn is_cleared(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.cleared[self.index(x, y)]
    }

    /// One row of cells, bottom row first
    pub fn row(&self, y: u32) -> &[bool] {
        let start = y as usize * self.width as usize;
        &self.cleared[start..start + self.width as usize]
    }

    /// Fraction of cells cleared, 0 for an empty mask
    pub fn cleared_fraction(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        self.cleared_cells as f32 / self.total_cells() as f32
    }

    /// Stamp a circular erase centered at a normalized mask position
    ///
    /// Centers outside [0,1] on either axis are ignored: the mask does not
    /// cover world space beyond its visual bounds. The radius is floored to
    /// one pixel; a cell is inside the stamp when its squared distance to the
    /// stamp center is strictly below `radius^2`, so a radius-1 stamp clears
    /// exactly one cell. This departs from the inclusive `<= radius^2` test,
    /// which would also clear the four rim neighbours at radius 1; only cells
    /// exactly on the rim differ. Returns the number of cells that went from
    /// covered to cleared.
    pub fn erase_circle(&mut self, center: Vec2, radius_px: i32) -> usize {
        if self.is_empty() || !is_finite_point(center) {
            return 0;
        }
        if !(0.0..=1.0).contains(&center.x) || !(0.0..=1.0).contains(&center.y) {
            return 0;
        }

        let w = i64::from(self.width);
        let h = i64::from(self.height);
        let cx = (center.x * (w - 1) as f32).round() as i64;
        let cy = (center.y * (h - 1) as f32).round() as i64;
        let r = i64::from(radius_px.max(1));
        let r2 = r * r;

        let x0 = (cx - r).clamp(0, w - 1);
        let x1 = (cx + r).clamp(0, w - 1);
        let y0 = (cy - r).clamp(0, h - 1);
        let y1 = (cy + r).clamp(0, h - 1);

        let mut newly_cleared = 0;
        for y in y0..=y1 {
            let dy = y - cy;
            let dy2 = dy * dy;
            for x in x0..=x1 {
                let dx = x - cx;
                if dx * dx + dy2 < r2 {
                    let index = self.index(x as u32, y as u32);
                    let cell = &mut self.cleared[index];
                    if !*cell {
                        *cell = true;
                        newly_cleared += 1;
                    }
                }
            }
        }

        if newly_cleared > 0 {
            self.cleared_cells += newly_cleared;
            self.mark_dirty(DirtyRect {
                x0: x0 as u32,
                y0: y0 as u32,
                x1: x1 as u32,
                y1: y1 as u32,
            });
        }

        newly_cleared
    }

    /// Take the region changed since the last call
    pub fn take_dirty(&mut self) -> Option<DirtyRect> {
        self.dirty.take()
    }

    /// Cover every cell again (session restart)
    pub fn reset(&mut self) {
        self.cleared.fill(false);
        self.cleared_cells = 0;
        if !self.is_empty() {
            self.dirty = Some(DirtyRect {
                x0: 0,
                y0: 0,
                x1: self.width - 1,
                y1: self.height - 1,
            });
        }
    }

    fn mark_dirty(&mut self, rect: DirtyRect) {
        self.dirty = Some(match self.dirty {
            Some(existing) => existing.union(rect),
            None => rect,
        });
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Maps world-space points onto the mask's normalized [0,1]² footprint
///
/// The mask is drawn center-anchored at `center`, `width / pixels_per_unit`
/// world units wide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaskTransform {
    pub center: Vec2,
    pub world_size: Vec2,
    pub pixels_per_unit: f32,
}

impl MaskTransform {
    pub fn new(center: Vec2, width_px: u32, height_px: u32, pixels_per_unit: f32) -> Self {
        Self {
            center,
            world_size: Vec2::new(width_px as f32, height_px as f32) / pixels_per_unit,
            pixels_per_unit,
        }
    }

    /// Transform matching a mask's resolution
    pub fn for_mask(mask: &DustMask, center: Vec2, pixels_per_unit: f32) -> Self {
        Self::new(center, mask.width(), mask.height(), pixels_per_unit)
    }

    /// World point to normalized mask coordinates (may fall outside [0,1])
    #[inline]
    pub fn normalize(&self, world: Vec2) -> Vec2 {
        (world - self.center) / self.world_size + Vec2::splat(0.5)
    }

    /// World-space radius to whole mask pixels
    #[inline]
    pub fn radius_to_pixels(&self, radius: f32) -> i32 {
        (radius * self.pixels_per_unit).round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn count_cleared(mask: &DustMask) -> usize {
        mask.cleared.iter().filter(|c| **c).count()
    }

    #[test]
    fn test_new_mask_fully_covered() {
        let mask = DustMask::new(8, 6);
        assert_eq!(mask.total_cells(), 48);
        assert_eq!(mask.cleared_cells(), 0);
        assert_eq!(mask.cleared_fraction(), 0.0);
        assert!(!mask.is_cleared(3, 3));
    }

    #[test]
    fn test_empty_mask_fraction_is_zero() {
        let mut mask = DustMask::new(0, 10);
        assert_eq!(mask.cleared_fraction(), 0.0);
        assert_eq!(mask.erase_circle(Vec2::splat(0.5), 4), 0);
    }

    #[test]
    fn test_radius_one_clears_single_cell() {
        let mut mask = DustMask::new(10, 10);
        assert_eq!(mask.erase_circle(Vec2::new(0.5, 0.5), 1), 1);
        assert_eq!(mask.erase_circle(Vec2::new(0.5, 0.5), 1), 0);
        assert_eq!(mask.cleared_cells(), 1);
    }

    #[test]
    fn test_radius_floored_to_one() {
        let mut mask = DustMask::new(10, 10);
        assert_eq!(mask.erase_circle(Vec2::new(0.5, 0.5), 0), 1);
        assert_eq!(mask.erase_circle(Vec2::new(0.0, 0.0), -3), 1);
        assert!(mask.is_cleared(0, 0));
    }

    #[test]
    fn test_outside_unit_square_is_noop() {
        let mut mask = DustMask::new(10, 10);
        assert_eq!(mask.erase_circle(Vec2::new(1.01, 0.5), 3), 0);
        assert_eq!(mask.erase_circle(Vec2::new(0.5, -0.01), 3), 0);
        assert_eq!(mask.erase_circle(Vec2::new(f32::NAN, 0.5), 3), 0);
        assert_eq!(mask.cleared_cells(), 0);
        assert!(mask.take_dirty().is_none());
    }

    #[test]
    fn test_stamp_clipped_at_corner() {
        let mut mask = DustMask::new(10, 10);
        // Center at (0,0), radius 2: quarter disc dx,dy in 0..=1 plus none at distance 2
        let cleared = mask.erase_circle(Vec2::ZERO, 2);
        assert_eq!(cleared, 4);
        assert!(mask.is_cleared(1, 1));
        assert!(!mask.is_cleared(2, 0));
    }

    #[test]
    fn test_overlapping_stamps_match_distinct_cells() {
        let mut mask = DustMask::new(20, 20);
        let stamps = [(Vec2::new(0.3, 0.3), 4), (Vec2::new(0.4, 0.35), 4), (Vec2::new(0.3, 0.3), 2)];

        let mut expected = HashSet::new();
        for (center, r) in stamps {
            mask.erase_circle(center, r);
            let cx = (center.x * 19.0).round() as i64;
            let cy = (center.y * 19.0).round() as i64;
            for y in 0..20i64 {
                for x in 0..20i64 {
                    if (x - cx).pow(2) + (y - cy).pow(2) < (r as i64).pow(2) {
                        expected.insert((x, y));
                    }
                }
            }
        }

        assert_eq!(mask.cleared_cells(), expected.len());
        assert_eq!(count_cleared(&mask), expected.len());
    }

    #[test]
    fn test_dirty_rect_accumulates_and_drains() {
        let mut mask = DustMask::new(10, 10);
        mask.erase_circle(Vec2::new(0.0, 0.0), 1);
        mask.erase_circle(Vec2::new(1.0, 1.0), 1);
        let dirty = mask.take_dirty().unwrap();
        assert_eq!(dirty, DirtyRect { x0: 0, y0: 0, x1: 9, y1: 9 });
        assert!(mask.take_dirty().is_none());

        // Re-stamping cleared cells changes nothing
        mask.erase_circle(Vec2::new(0.0, 0.0), 1);
        assert!(mask.take_dirty().is_none());
    }

    #[test]
    fn test_reset_covers_everything() {
        let mut mask = DustMask::new(4, 4);
        mask.erase_circle(Vec2::splat(0.5), 3);
        assert!(mask.cleared_cells() > 0);
        mask.reset();
        assert_eq!(mask.cleared_cells(), 0);
        assert_eq!(count_cleared(&mask), 0);
    }

    #[test]
    fn test_transform_round_trip_and_bounds() {
        let mask = DustMask::new(512, 256);
        let t = MaskTransform::for_mask(&mask, Vec2::new(1.0, -1.0), 64.0);
        assert_eq!(t.world_size, Vec2::new(8.0, 4.0));
        assert_eq!(t.normalize(Vec2::new(1.0, -1.0)), Vec2::splat(0.5));
        assert_eq!(t.normalize(Vec2::new(-3.0, -3.0)), Vec2::ZERO);
        assert_eq!(t.normalize(Vec2::new(5.0, 1.0)), Vec2::ONE);
        assert!(t.normalize(Vec2::new(5.1, 0.0)).x > 1.0);
        assert_eq!(t.radius_to_pixels(0.25), 16);
    }

    proptest! {
        #[test]
        fn prop_cleared_counter_is_exact_and_monotonic(
            stamps in proptest::collection::vec((0.0f32..=1.0, 0.0f32..=1.0, 0i32..6), 1..24)
        ) {
            let mut mask = DustMask::new(24, 16);
            let mut last = 0.0;
            for (x, y, r) in stamps {
                mask.erase_circle(Vec2::new(x, y), r);
                let fraction = mask.cleared_fraction();
                prop_assert!(fraction >= last);
                last = fraction;
            }
            prop_assert_eq!(mask.cleared_cells(), count_cleared(&mask));
            prop_assert!(mask.cleared_cells() <= mask.total_cells());
        }
    }
}
