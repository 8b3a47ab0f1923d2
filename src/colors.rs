//! Color constants and packing helpers.
//!
//! Pixels are packed as ARGB8888 `u32` values (`0xAARRGGBB`), the layout SDL
//! streams without conversion. Shading math works on [`Rgb`] floats in
//! `[0, 1]` and packs at the end.

use std::ops::{Add, AddAssign, Mul};

pub const BACKGROUND: u32 = 0xFF1E1E24;
pub const WIREFRAME: u32 = 0xFFE0E0E0;
pub const OUTLINE: u32 = 0xFF101010;
pub const BOUNDING_BOX: u32 = 0xFFFFB000;

/// Grey level of the shaded material before lighting, in `[0, 1]`.
pub const BASE_GREY: f32 = 0.8;

#[inline]
pub fn pack_color(r: f32, g: f32, b: f32) -> u32 {
    let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u32;
    0xFF00_0000 | (to_byte(r) << 16) | (to_byte(g) << 8) | to_byte(b)
}

#[inline]
pub fn unpack_color(color: u32) -> (f32, f32, f32) {
    let (r, g, b) = channels(color);
    (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

#[inline]
pub fn channels(color: u32) -> (u8, u8, u8) {
    (
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
    )
}

#[inline]
pub fn from_channels(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Uniform grey of the given brightness.
#[inline]
pub fn grey(level: f32) -> u32 {
    pack_color(level, level, level)
}

/// Blends `src` over `dst` with 8-bit coverage: 0 keeps `dst`, 255 takes
/// `src`, anything between mixes linearly per channel.
#[inline]
pub fn blend(dst: u32, src: u32, alpha: u8) -> u32 {
    match alpha {
        0 => dst,
        255 => src,
        a => {
            let a = a as u32;
            let mix = |d: u8, s: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
            let (dr, dg, db) = channels(dst);
            let (sr, sg, sb) = channels(src);
            from_channels(mix(dr, sr), mix(dg, sg), mix(db, sb))
        }
    }
}

/// Linear RGB color with `f32` channels, used by the ray tracer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_packed(color: u32) -> Self {
        let (r, g, b) = unpack_color(color);
        Self::new(r, g, b)
    }

    /// Clamps to `[0, 1]` and packs to ARGB.
    pub fn to_packed(self) -> u32 {
        pack_color(self.r, self.g, self.b)
    }
}

impl Add for Rgb {
    type Output = Rgb;

    fn add(self, rhs: Rgb) -> Rgb {
        Rgb::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for Rgb {
    fn add_assign(&mut self, rhs: Rgb) {
        *self = *self + rhs;
    }
}

impl Mul<f32> for Rgb {
    type Output = Rgb;

    fn mul(self, rhs: f32) -> Rgb {
        Rgb::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

/// Component-wise product (filtering one color by another).
impl Mul<Rgb> for Rgb {
    type Output = Rgb;

    fn mul(self, rhs: Rgb) -> Rgb {
        Rgb::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_round_trips_channels() {
        let c = from_channels(12, 200, 255);
        assert_eq!(channels(c), (12, 200, 255));
        assert_eq!(pack_color(1.0, 0.0, 0.0), 0xFFFF0000);
    }

    #[test]
    fn pack_clamps_out_of_range() {
        assert_eq!(pack_color(2.0, -1.0, 0.5), 0xFFFF0080);
    }

    #[test]
    fn blend_extremes() {
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 255), 0xFFFFFFFF);
    }

    #[test]
    fn blend_halfway_mixes_linearly() {
        let c = blend(from_channels(0, 0, 200), from_channels(255, 100, 0), 128);
        let (r, g, b) = channels(c);
        assert_eq!(r, 128);
        assert_eq!(g, 50);
        assert_eq!(b, 100);
    }
}
