// Copyright (c) 2026 rezky_nightky

use crate::cell::{Cell, Ink};
use crate::color::Rgb;
use crate::runtime::ColorMode;
use crate::surface::{Rect, Surface};

/// Ink closer than this to the fill color (per channel) is treated as gone.
const FADE_EPSILON: f32 = 6.0;

/// Pixel size of one terminal cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellMetrics {
    pub width: f32,
    pub height: f32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width: 7.0,
            height: 14.0,
        }
    }
}

/// Terminal-cell raster. Drawing goes into `ink`; `resolve` quantizes it
/// into `cells` and records which cells changed.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    metrics: CellMetrics,
    bg: Rgb,
    ink: Vec<Ink>,
    cells: Vec<Cell>,
    dirty_all: bool,
    dirty_map: Vec<bool>,
    dirty: Vec<usize>,
}

impl Frame {
    pub fn new(width: u16, height: u16, metrics: CellMetrics, bg: Rgb) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            metrics,
            bg,
            ink: vec![Ink::blank(bg); len],
            cells: vec![Cell::blank_with_bg(None); len],
            dirty_all: true,
            dirty_map: vec![false; len],
            dirty: Vec::new(),
        }
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    /// Wipes all ink and forces a full redraw.
    pub fn clear(&mut self, bg: Rgb) {
        self.bg = bg;
        self.ink.fill(Ink::blank(bg));
        self.dirty_all = true;
        self.dirty.clear();
    }

    pub fn is_dirty_all(&self) -> bool {
        self.dirty_all
    }

    pub fn dirty_indices(&self) -> &[usize] {
        &self.dirty
    }

    pub fn clear_dirty(&mut self) {
        if self.dirty_all {
            self.dirty_all = false;
            self.dirty_map.fill(false);
            self.dirty.clear();
            return;
        }
        for &i in &self.dirty {
            if let Some(v) = self.dirty_map.get_mut(i) {
                *v = false;
            }
        }
        self.dirty.clear();
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[allow(dead_code)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    #[allow(dead_code)]
    pub fn ink(&self, x: u16, y: u16) -> Option<&Ink> {
        self.index(x, y).map(|i| &self.ink[i])
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        self.cells
            .get(i)
            .copied()
            .unwrap_or_else(|| Cell::blank_with_bg(None))
    }

    /// Quantizes ink into terminal cells for `mode`.
    pub fn resolve(&mut self, mode: ColorMode) {
        let bg = self.bg.to_terminal(mode);
        for i in 0..self.ink.len() {
            let ink = self.ink[i];
            let cell = if ink.is_blank() {
                Cell::blank_with_bg(bg)
            } else {
                Cell {
                    ch: ink.ch,
                    fg: Rgb::from_channels(ink.rgb).to_terminal(mode),
                    bg,
                    bold: ink.fresh,
                }
            };
            self.set_index(i, cell);
        }
    }

    fn set_index(&mut self, i: usize, cell: Cell) {
        let Some(cur) = self.cells.get_mut(i) else {
            return;
        };
        if *cur == cell {
            return;
        }
        *cur = cell;
        if !self.dirty_all && !self.dirty_map[i] {
            self.dirty_map[i] = true;
            self.dirty.push(i);
        }
    }

    /// Cell under a glyph whose baseline sits at `(x, y)`.
    fn glyph_cell(&self, x: f32, y: f32) -> Option<usize> {
        if !x.is_finite() || !y.is_finite() || x < 0.0 {
            return None;
        }
        let col = (x / self.metrics.width).floor();
        let row = (y / self.metrics.height).ceil() - 1.0;
        if row < 0.0 || col >= self.width as f32 || row >= self.height as f32 {
            return None;
        }
        self.index(col as u16, row as u16)
    }
}

impl Surface for Frame {
    fn size(&self) -> (f32, f32) {
        (
            self.width as f32 * self.metrics.width,
            self.height as f32 * self.metrics.height,
        )
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb, alpha: f32) {
        let a = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            return;
        };
        let mw = self.metrics.width;
        let mh = self.metrics.height;
        let x0 = (rect.x / mw).floor().max(0.0) as usize;
        let y0 = (rect.y / mh).floor().max(0.0) as usize;
        let x1 = ((rect.x + rect.w) / mw).ceil().clamp(0.0, self.width as f32) as usize;
        let y1 = ((rect.y + rect.h) / mh).ceil().clamp(0.0, self.height as f32) as usize;

        let target = color.channels();
        let w = self.width as usize;
        for row in y0..y1 {
            for col in x0..x1 {
                let ink = &mut self.ink[row * w + col];
                ink.fresh = false;
                let mut near = true;
                for (c, t) in ink.rgb.iter_mut().zip(target) {
                    *c += (t - *c) * a;
                    near &= (*c - t).abs() < FADE_EPSILON;
                }
                if near {
                    *ink = Ink::blank(color);
                }
            }
        }
    }

    fn draw_glyph(&mut self, x: f32, y: f32, glyph: char, _font_size: f32, color: Rgb) {
        // one glyph per cell; the terminal picks the font size
        if let Some(i) = self.glyph_cell(x, y) {
            self.ink[i] = Ink {
                ch: glyph,
                rgb: color.channels(),
                fresh: true,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame::new(4, 3, CellMetrics::default(), Rgb::BLACK)
    }

    #[test]
    fn glyph_at_first_baseline_lands_in_row_zero() {
        let mut f = frame();
        f.draw_glyph(7.0, 14.0, 'x', 14.0, Rgb::GREEN);
        assert_eq!(f.ink(1, 0).unwrap().ch, 'x');
        f.draw_glyph(0.0, 15.0, 'y', 14.0, Rgb::GREEN);
        assert_eq!(f.ink(0, 1).unwrap().ch, 'y');
    }

    #[test]
    fn off_surface_glyphs_are_clipped() {
        let mut f = frame();
        f.draw_glyph(-1.0, 14.0, 'a', 14.0, Rgb::GREEN);
        f.draw_glyph(0.0, 0.0, 'b', 14.0, Rgb::GREEN);
        f.draw_glyph(28.0, 14.0, 'c', 14.0, Rgb::GREEN);
        f.draw_glyph(0.0, 100.0, 'd', 14.0, Rgb::GREEN);
        for y in 0..3 {
            for x in 0..4 {
                assert!(f.ink(x, y).unwrap().is_blank());
            }
        }
    }

    #[test]
    fn translucent_fill_fades_then_blanks() {
        let mut f = frame();
        f.draw_glyph(0.0, 14.0, 'x', 14.0, Rgb::GREEN);
        let (w, h) = f.size();
        f.fill_rect(Rect::full(w, h), Rgb::BLACK, 0.05);
        let ink = *f.ink(0, 0).unwrap();
        assert_eq!(ink.ch, 'x');
        assert!(!ink.fresh);
        assert!((ink.rgb[1] - 242.25).abs() < 1e-3);

        for _ in 0..200 {
            f.fill_rect(Rect::full(w, h), Rgb::BLACK, 0.05);
        }
        assert!(f.ink(0, 0).unwrap().is_blank());
    }

    #[test]
    fn resolve_marks_only_changed_cells_dirty() {
        let mut f = frame();
        f.resolve(ColorMode::TrueColor);
        f.clear_dirty();

        f.draw_glyph(0.0, 14.0, 'x', 14.0, Rgb::GREEN);
        f.resolve(ColorMode::TrueColor);
        assert_eq!(f.dirty_indices(), &[0]);
        let cell = f.get(0, 0).unwrap();
        assert_eq!(cell.ch, 'x');
        assert!(cell.bold);

        f.clear_dirty();
        f.resolve(ColorMode::TrueColor);
        assert!(f.dirty_indices().is_empty());
    }

    #[test]
    fn clear_forces_full_redraw() {
        let mut f = frame();
        f.clear_dirty();
        f.draw_glyph(0.0, 14.0, 'x', 14.0, Rgb::GREEN);
        f.clear(Rgb::BLACK);
        assert!(f.is_dirty_all());
        assert!(f.ink(0, 0).unwrap().is_blank());
    }

    #[test]
    fn size_is_in_pixels() {
        assert_eq!(frame().size(), (28.0, 42.0));
    }
}
