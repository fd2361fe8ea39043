// Copyright (c) 2026 rezky_nightky

use crate::color::Rgb;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn full(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            w: width,
            h: height,
        }
    }
}

/// A 2D raster addressed in pixels.
///
/// Glyph positions follow canvas text conventions: `y` is the baseline, so a
/// glyph drawn at `y = font_size` occupies the first text row.
pub trait Surface {
    fn size(&self) -> (f32, f32);

    fn fill_rect(&mut self, rect: Rect, color: Rgb, alpha: f32);

    fn draw_glyph(&mut self, x: f32, y: f32, glyph: char, font_size: f32, color: Rgb);
}

#[cfg(test)]
pub use recording::{Op, RecordingSurface};
