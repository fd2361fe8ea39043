// Copyright (c) 2026 rezky_nightky

use rand::Rng;

/// Chance per tick that a drop below the bottom edge restarts at the top.
/// Keeping it low staggers restarts so columns never fall back into step.
pub const DEFAULT_RESTART_CHANCE: f64 = 0.025;

/// One falling cursor per column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drop {
    pub column: usize,
    pub row: u32,
    pub origin_x: f32,
}

impl Drop {
    fn fresh(column: usize, font_size: f32) -> Self {
        Self {
            column,
            row: 1,
            origin_x: column as f32 * font_size,
        }
    }

    pub fn y(&self, font_size: f32) -> f32 {
        self.row as f32 * font_size
    }
}

/// Dimensions a grid was last built for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridShape {
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
}

impl GridShape {
    pub fn columns(&self) -> usize {
        if self.font_size <= 0.0 || !self.width.is_finite() || self.width <= 0.0 {
            return 0;
        }
        (self.width / self.font_size).floor() as usize
    }
}

#[derive(Clone, Debug)]
pub struct DropGrid {
    drops: Vec<Drop>,
    shape: Option<GridShape>,
    restart_chance: f64,
}

impl Default for DropGrid {
    fn default() -> Self {
        Self::new(DEFAULT_RESTART_CHANCE)
    }
}

impl DropGrid {
    pub fn new(restart_chance: f64) -> Self {
        Self {
            drops: Vec::new(),
            shape: None,
            restart_chance: clamp_chance(restart_chance),
        }
    }

    pub fn drops(&self) -> &[Drop] {
        &self.drops
    }

    pub fn columns(&self) -> usize {
        self.drops.len()
    }

    #[allow(dead_code)]
    pub fn shape(&self) -> Option<GridShape> {
        self.shape
    }

    pub fn restart_chance(&self) -> f64 {
        self.restart_chance
    }

    pub fn set_restart_chance(&mut self, chance: f64) {
        self.restart_chance = clamp_chance(chance);
    }

    /// Discards all row progress and lays out one drop per column.
    pub fn rebuild(&mut self, width: f32, height: f32, font_size: f32) {
        let shape = GridShape {
            width,
            height,
            font_size,
        };
        let columns = shape.columns();

        self.drops.truncate(columns);
        for d in &mut self.drops {
            *d = Drop::fresh(d.column, font_size);
        }
        let have = self.drops.len();
        self.drops
            .extend((have..columns).map(|c| Drop::fresh(c, font_size)));

        self.shape = Some(shape);
        log::debug!(
            "drop grid rebuilt: {} columns for {}x{} px at font size {}",
            columns,
            width,
            height,
            font_size
        );
    }

    /// Rebuilds only when the requested shape differs from the current one.
    pub fn rebuild_if_needed(&mut self, width: f32, height: f32, font_size: f32) -> bool {
        let wanted = GridShape {
            width,
            height,
            font_size,
        };
        if self.shape == Some(wanted) {
            return false;
        }
        self.rebuild(width, height, font_size);
        true
    }

    /// Moves every drop down one row, then gives each drop that fell past
    /// the bottom a chance to restart at row 0.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let Some(shape) = self.shape else {
            return;
        };

        for d in &mut self.drops {
            d.row = d.row.saturating_add(1);
        }

        for d in &mut self.drops {
            if d.y(shape.font_size) > shape.height && rng.random_bool(self.restart_chance) {
                d.row = 0;
                d.origin_x = d.column as f32 * shape.font_size;
            }
        }
    }
}

fn clamp_chance(p: f64) -> f64 {
    if p.is_nan() {
        DEFAULT_RESTART_CHANCE
    } else {
        p.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn rebuild_lays_out_columns_at_row_one() {
        let mut grid = DropGrid::default();
        grid.rebuild(140.0, 100.0, 14.0);
        assert_eq!(grid.columns(), 10);
        for (i, d) in grid.drops().iter().enumerate() {
            assert_eq!(d.column, i);
            assert_eq!(d.row, 1);
            assert_eq!(d.origin_x, i as f32 * 14.0);
        }
    }

    #[test]
    fn rebuild_shrinks_and_grows() {
        let mut grid = DropGrid::default();
        grid.rebuild(140.0, 100.0, 14.0);
        grid.rebuild(70.0, 100.0, 14.0);
        assert_eq!(grid.columns(), 5);
        grid.rebuild(280.0, 100.0, 14.0);
        assert_eq!(grid.columns(), 20);
        assert!(grid.drops().iter().all(|d| d.row == 1));
    }

    #[test]
    fn rebuild_discards_row_progress() {
        let mut grid = DropGrid::new(0.0);
        let mut rng = StdRng::seed_from_u64(5);
        grid.rebuild(140.0, 100.0, 14.0);
        grid.advance(&mut rng);
        grid.advance(&mut rng);
        grid.rebuild(140.0, 100.0, 7.0);
        assert_eq!(grid.columns(), 20);
        assert!(grid.drops().iter().all(|d| d.row == 1));
    }

    #[test]
    fn zero_width_or_font_gives_empty_grid() {
        let mut grid = DropGrid::default();
        grid.rebuild(0.0, 100.0, 14.0);
        assert_eq!(grid.columns(), 0);
        grid.rebuild(100.0, 100.0, 0.0);
        assert_eq!(grid.columns(), 0);
    }

    #[test]
    fn advance_without_restarts_is_monotonic() {
        let mut grid = DropGrid::new(0.0);
        let mut rng = StdRng::seed_from_u64(9);
        grid.rebuild(140.0, 100.0, 14.0);
        for _ in 0..50 {
            grid.advance(&mut rng);
        }
        assert!(grid.drops().iter().all(|d| d.row == 51));
    }

    #[test]
    fn advance_with_certain_restart_resets_only_overflowing_drops() {
        let mut grid = DropGrid::new(1.0);
        let mut rng = StdRng::seed_from_u64(9);
        grid.rebuild(140.0, 100.0, 14.0);
        // rows 2..=7 stay within 100px
        for _ in 0..6 {
            grid.advance(&mut rng);
            assert!(grid.drops().iter().all(|d| d.row >= 2));
        }
        assert!(grid.drops().iter().all(|d| d.row == 7));
        // row 8 is 112px, past the bottom
        grid.advance(&mut rng);
        assert!(grid.drops().iter().all(|d| d.row == 0));
    }

    #[test]
    fn rebuild_if_needed_skips_same_shape() {
        let mut grid = DropGrid::new(0.0);
        let mut rng = StdRng::seed_from_u64(2);
        assert!(grid.rebuild_if_needed(140.0, 100.0, 14.0));
        grid.advance(&mut rng);
        assert!(!grid.rebuild_if_needed(140.0, 100.0, 14.0));
        assert_eq!(grid.drops()[0].row, 2);
        assert!(grid.rebuild_if_needed(140.0, 120.0, 14.0));
        assert_eq!(grid.drops()[0].row, 1);
    }

    #[test]
    fn nan_chance_uses_default() {
        let grid = DropGrid::new(f64::NAN);
        assert_eq!(grid.restart_chance(), DEFAULT_RESTART_CHANCE);
    }
}
