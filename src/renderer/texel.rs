//! Texel export for the dust mask

use bytemuck::{Pod, Zeroable};

use crate::sim::{DirtyRect, DustMask};

/// One RGBA8 texel
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct Texel {
    pub rgba: [u8; 4],
}

impl Texel {
    /// Fully transparent (cleared cell)
    pub const CLEAR: Texel = Texel::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { rgba: [r, g, b, a] }
    }

    pub const fn from_rgba(rgba: [u8; 4]) -> Self {
        Self { rgba }
    }

    #[inline]
    fn for_cell(cleared: bool, dust: Texel) -> Texel {
        if cleared { Texel::CLEAR } else { dust }
    }
}

/// Texels for the whole mask, bottom row first
pub fn mask_texels(mask: &DustMask, dust: Texel) -> Vec<Texel> {
    let mut out = Vec::with_capacity(mask.total_cells());
    for y in 0..mask.height() {
        out.extend(mask.row(y).iter().map(|&c| Texel::for_cell(c, dust)));
    }
    out
}

/// Texels for a sub-rectangle, clipped to the mask, bottom row first
pub fn region_texels(mask: &DustMask, rect: DirtyRect, dust: Texel) -> Vec<Texel> {
    if mask.is_empty() || rect.x0 >= mask.width() || rect.y0 >= mask.height() {
        return Vec::new();
    }
    let x1 = rect.x1.min(mask.width() - 1);
    let y1 = rect.y1.min(mask.height() - 1);
    if x1 < rect.x0 || y1 < rect.y0 {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(((x1 - rect.x0 + 1) * (y1 - rect.y0 + 1)) as usize);
    for y in rect.y0..=y1 {
        let row = &mask.row(y)[rect.x0 as usize..=x1 as usize];
        out.extend(row.iter().map(|&c| Texel::for_cell(c, dust)));
    }
    out
}

/// Raw bytes ready for a texture upload
#[inline]
pub fn texel_bytes(texels: &[Texel]) -> &[u8] {
    bytemuck::cast_slice(texels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const DUST: Texel = Texel::new(180, 180, 180, 255);

    #[test]
    fn test_full_mask_export() {
        let mut mask = DustMask::new(3, 2);
        mask.erase_circle(Vec2::new(0.0, 0.0), 1);
        let texels = mask_texels(&mask, DUST);
        assert_eq!(texels.len(), 6);
        assert_eq!(texels[0], Texel::CLEAR);
        assert!(texels[1..].iter().all(|t| *t == DUST));
    }

    #[test]
    fn test_dirty_region_export() {
        let mut mask = DustMask::new(10, 10);
        mask.erase_circle(Vec2::new(0.5, 0.5), 2);
        let rect = mask.take_dirty().unwrap();
        let texels = region_texels(&mask, rect, DUST);
        assert_eq!(texels.len(), (rect.width() * rect.height()) as usize);
        // Stamp center lands mid-region
        let center = (rect.height() / 2 * rect.width() + rect.width() / 2) as usize;
        assert_eq!(texels[center], Texel::CLEAR);
    }

    #[test]
    fn test_region_clipped_to_mask() {
        let mask = DustMask::new(4, 4);
        let rect = DirtyRect {
            x0: 2,
            y0: 2,
            x1: 20,
            y1: 20,
        };
        assert_eq!(region_texels(&mask, rect, DUST).len(), 4);
        let outside = DirtyRect {
            x0: 5,
            y0: 0,
            x1: 6,
            y1: 1,
        };
        assert!(region_texels(&mask, outside, DUST).is_empty());
    }

    #[test]
    fn test_bytes_are_rgba8() {
        let texels = [DUST, Texel::CLEAR];
        assert_eq!(texel_bytes(&texels), &[180, 180, 180, 255, 0, 0, 0, 0]);
    }
}
