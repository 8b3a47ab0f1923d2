//! Glyph compositing.
//!
//! Glyph metrics follow the usual baseline convention: `bearing_x` shifts the
//! bitmap right of the pen, `bearing_y` is the height of the bitmap's top
//! row above the baseline, and `advance` moves the pen after the glyph.

use std::collections::HashMap;

use super::surface::Surface;
use crate::colors;

/// An 8-bit coverage bitmap, rows top-down.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub width: u32,
    pub height: u32,
    pub bearing_x: i32,
    pub bearing_y: i32,
    pub advance: i32,
    pub coverage: Vec<u8>,
}

impl Glyph {
    /// Builds a glyph from text rows where `#` is full coverage, `+` half
    /// coverage and anything else empty. Bearing y equals the row count so
    /// the bottom row sits on the baseline.
    pub fn from_rows(rows: &[&str], advance: i32) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let mut coverage = Vec::with_capacity(width as usize * rows.len());
        for row in rows {
            let mut cells: Vec<u8> = row
                .chars()
                .map(|c| match c {
                    '#' => 255,
                    '+' => 128,
                    _ => 0,
                })
                .collect();
            cells.resize(width as usize, 0);
            coverage.extend(cells);
        }
        Self {
            width,
            height: rows.len() as u32,
            bearing_x: 0,
            bearing_y: rows.len() as i32,
            advance,
            coverage,
        }
    }
}

/// Source of glyph bitmaps and metrics.
pub trait Font {
    fn glyph(&self, ch: char) -> Option<&Glyph>;

    /// Extra pen movement between two consecutive characters.
    fn kerning(&self, _left: char, _right: char) -> i32 {
        0
    }
}

/// In-memory font.
#[derive(Debug, Clone, Default)]
pub struct BitmapFont {
    glyphs: HashMap<char, Glyph>,
    kerning: HashMap<(char, char), i32>,
}

impl BitmapFont {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ch: char, glyph: Glyph) -> &mut Self {
        self.glyphs.insert(ch, glyph);
        self
    }

    pub fn set_kerning(&mut self, left: char, right: char, amount: i32) -> &mut Self {
        self.kerning.insert((left, right), amount);
        self
    }
}

impl Font for BitmapFont {
    fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    fn kerning(&self, left: char, right: char) -> i32 {
        self.kerning.get(&(left, right)).copied().unwrap_or(0)
    }
}

/// Blends one glyph with its pen at `(pen_x, baseline)`.
///
/// Pixels a short `coverage` buffer does not hold are left untouched.
pub fn draw_glyph(surface: &mut Surface, glyph: &Glyph, pen_x: i32, baseline: i32, color: u32) {
    if glyph.width == 0 {
        return;
    }
    let top = baseline + glyph.bearing_y - 1;
    let left = pen_x + glyph.bearing_x;
    let rows = glyph.coverage.chunks(glyph.width as usize).take(glyph.height as usize);
    for (row, cells) in rows.enumerate() {
        let y = top - row as i32;
        for (col, &alpha) in cells.iter().enumerate() {
            if alpha == 0 {
                continue;
            }
            let x = left + col as i32;
            if let Some(dst) = surface.get_pixel(x, y) {
                surface.set_pixel(x, y, colors::blend(dst, color, alpha));
            }
        }
    }
}

/// Draws `text` starting at `(x, baseline)` and returns the final pen x.
/// Characters the font lacks are skipped without advancing.
pub fn draw_text(
    surface: &mut Surface,
    font: &dyn Font,
    text: &str,
    x: i32,
    baseline: i32,
    color: u32,
) -> i32 {
    let mut pen = x;
    let mut previous: Option<char> = None;
    for ch in text.chars() {
        let Some(glyph) = font.glyph(ch) else {
            continue;
        };
        if let Some(prev) = previous {
            pen += font.kerning(prev, ch);
        }
        draw_glyph(surface, glyph, pen, baseline, color);
        pen += glyph.advance;
        previous = Some(ch);
    }
    pen
}
