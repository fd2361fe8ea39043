// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use rand::rngs::StdRng;

use crate::controller::Controller;
use crate::interaction::{displace, Displacement};
use crate::palette::color_for;
use crate::runtime::InteractionMode;
use crate::surface::{Rect, Surface};
use crate::ticker::TickSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Reconfiguring,
}

/// Drives the rain: owns the controller, the tick source and the rng, and
/// paints one frame per tick.
pub struct Cloud<T: TickSource> {
    pub controller: Controller,
    ticker: T,
    state: LoopState,
    rng: StdRng,
    ticks: u64,
}

impl<T: TickSource> Cloud<T> {
    pub fn new(controller: Controller, ticker: T, rng: StdRng) -> Self {
        Self {
            controller,
            ticker,
            state: LoopState::Running,
            rng,
            ticks: 0,
        }
    }

    pub fn start(&mut self, now: Instant) {
        let interval = self.controller.settings().tick_interval();
        self.ticker.start(interval, now);
        self.state = LoopState::Running;
        log::info!(
            "rain started: {} columns, tick {}ms",
            self.controller.grid().columns(),
            interval.as_millis()
        );
    }

    #[allow(dead_code)]
    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[allow(dead_code)]
    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.ticker.deadline()
    }

    /// Tears down the current cadence and installs the new one. A tick that
    /// was pending under the old cadence is dropped, not carried over.
    pub fn set_tick_interval(&mut self, ms: u64, now: Instant) {
        if !self.controller.set_tick_interval_ms(ms) {
            return;
        }
        self.state = LoopState::Reconfiguring;
        let interval = self.controller.settings().tick_interval();
        self.ticker.reschedule(interval, now);
        self.state = LoopState::Running;
    }

    /// Runs one tick if the ticker says one is due.
    pub fn pump<S: Surface>(&mut self, surface: &mut S, now: Instant, wall: Duration) -> bool {
        if self.state != LoopState::Running || !self.ticker.take_tick(now) {
            return false;
        }
        self.tick(surface, wall);
        true
    }

    /// Paints one frame and advances the simulation. `wall` is wall-clock
    /// time used by the rainbow and revolve effects.
    pub fn tick<S: Surface>(&mut self, surface: &mut S, wall: Duration) {
        let (width, height) = surface.size();
        if self.controller.surface_size() != (width, height) {
            self.controller.resize(width, height);
        }
        self.controller.rebuild_if_needed();

        let settings = self.controller.settings();
        let font_size = settings.font_size;

        surface.fill_rect(
            Rect::full(width, height),
            settings.background,
            settings.trail_alpha,
        );

        let pointer = self.controller.pointer();
        let interact = settings.interaction != InteractionMode::None && pointer.is_active();
        let glyphs = self.controller.glyphs();

        for d in self.controller.grid().drops() {
            let y = d.y(font_size);
            let displacement = if interact {
                displace(pointer, (d.origin_x, y), settings.interaction, wall)
            } else {
                Displacement::None
            };
            let (dx, dy) = displacement.apply(d.origin_x, y);

            let color = color_for(
                y,
                height,
                settings.mix_mode,
                settings.primary,
                settings.secondary,
                wall,
                &mut self.rng,
            );
            let glyph = glyphs.glyph(settings.charset, &mut self.rng);
            surface.draw_glyph(dx, dy, glyph, font_size, color);
        }

        self.controller.grid_mut().advance(&mut self.rng);
        self.ticks = self.ticks.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::charset::KATAKANA_GLYPHS;
    use crate::color::Rgb;
    use crate::runtime::{CharsetId, MixMode};
    use crate::settings::Settings;
    use crate::surface::{Op, RecordingSurface};
    use crate::ticker::ManualTicker;

    fn cloud(settings: Settings, w: f32, h: f32) -> Cloud<ManualTicker> {
        let controller = Controller::new(settings, w, h);
        let mut c = Cloud::new(controller, ManualTicker::default(), StdRng::seed_from_u64(42));
        c.start(Instant::now());
        c
    }

    #[test]
    fn tick_fades_then_draws_one_glyph_per_column_then_advances() {
        let mut c = cloud(Settings::default(), 140.0, 100.0);
        let mut s = RecordingSurface::new(140.0, 100.0);
        c.tick(&mut s, Duration::ZERO);

        assert_eq!(
            s.ops[0],
            Op::Fill(Rect::full(140.0, 100.0), Rgb::BLACK, 0.05)
        );
        let glyphs: Vec<_> = s.glyphs().collect();
        assert_eq!(glyphs.len(), 10);
        for (i, op) in glyphs.iter().enumerate() {
            let Op::Glyph { x, y, color, font_size, .. } = op else {
                unreachable!()
            };
            assert_eq!(*x, i as f32 * 14.0);
            assert_eq!(*y, 14.0);
            assert_eq!(*font_size, 14.0);
            assert_eq!(*color, Rgb::GREEN);
        }
        assert!(c.controller.grid().drops().iter().all(|d| d.row == 2));
        assert_eq!(c.ticks(), 1);
    }

    #[test]
    fn resize_through_the_surface_rebuilds_before_drawing() {
        let settings = Settings {
            font_size: 20.0,
            restart_chance: 0.0,
            ..Settings::default()
        };
        let mut c = cloud(settings, 100.0, 100.0);
        let mut s = RecordingSurface::new(400.0, 200.0);
        c.tick(&mut s, Duration::ZERO);
        assert_eq!(s.glyphs().count(), 20);
        assert!(c.controller.grid().drops().iter().all(|d| d.row == 2));
    }

    #[test]
    fn gradient_color_uses_pre_interaction_height() {
        let settings = Settings {
            mix_mode: MixMode::Gradient,
            interaction: InteractionMode::Revolve,
            primary: Rgb::new(0, 0, 0),
            secondary: Rgb::new(200, 200, 200),
            ..Settings::default()
        };
        let mut c = cloud(settings, 14.0, 140.0);
        c.controller.pointer_moved(0.0, 100.0);
        let mut s = RecordingSurface::new(14.0, 140.0);
        c.tick(&mut s, Duration::ZERO);

        let Some(Op::Glyph { x, y, color, .. }) = s.glyphs().next().cloned() else {
            panic!("no glyph drawn");
        };
        // drop at (0, 14) is 86px above the pointer, so it is pulled onto the orbit
        assert!((x - 0.0).abs() < 1e-3);
        assert!((y - 50.0).abs() < 1e-3);
        assert_eq!(color, Rgb::new(20, 20, 20));
    }

    #[test]
    fn interaction_is_skipped_without_a_pointer() {
        let settings = Settings {
            interaction: InteractionMode::Push,
            ..Settings::default()
        };
        let mut c = cloud(settings, 28.0, 100.0);
        let mut s = RecordingSurface::new(28.0, 100.0);
        c.tick(&mut s, Duration::ZERO);
        let xs: Vec<f32> = s
            .glyphs()
            .map(|op| match op {
                Op::Glyph { x, .. } => *x,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(xs, vec![0.0, 14.0]);
    }

    #[test]
    fn katakana_charset_draws_katakana() {
        let settings = Settings {
            charset: CharsetId::Katakana,
            ..Settings::default()
        };
        let mut c = cloud(settings, 140.0, 100.0);
        let mut s = RecordingSurface::new(140.0, 100.0);
        for _ in 0..5 {
            c.tick(&mut s, Duration::ZERO);
        }
        for op in s.glyphs() {
            let Op::Glyph { glyph, .. } = op else {
                unreachable!()
            };
            assert!(KATAKANA_GLYPHS.contains(*glyph));
        }
    }

    #[test]
    fn pump_runs_only_when_the_ticker_fires() {
        let mut c = cloud(Settings::default(), 140.0, 100.0);
        let mut s = RecordingSurface::new(140.0, 100.0);
        let now = Instant::now();
        assert!(!c.pump(&mut s, now, Duration::ZERO));
        c.ticker_mut().fire();
        assert!(c.pump(&mut s, now, Duration::ZERO));
        assert!(!c.pump(&mut s, now, Duration::ZERO));
        assert_eq!(c.ticks(), 1);
    }

    #[test]
    fn changing_the_interval_restarts_the_cadence_without_carry_over() {
        let mut c = cloud(Settings::default(), 140.0, 100.0);
        let mut s = RecordingSurface::new(140.0, 100.0);
        let now = Instant::now();
        c.ticker_mut().fire();
        c.set_tick_interval(50, now);
        assert_eq!(c.state(), LoopState::Running);
        assert_eq!(c.ticker().interval, Some(Duration::from_millis(50)));
        assert_eq!(c.ticker().starts, 2);
        assert!(!c.pump(&mut s, now, Duration::ZERO));

        // same value is a no-op
        c.set_tick_interval(50, now);
        assert_eq!(c.ticker().starts, 2);
    }

    #[test]
    fn zero_height_surface_still_ticks() {
        let settings = Settings {
            mix_mode: MixMode::Gradient,
            ..Settings::default()
        };
        let mut c = cloud(settings, 140.0, 0.0);
        let mut s = RecordingSurface::new(140.0, 0.0);
        c.tick(&mut s, Duration::ZERO);
        for op in s.glyphs() {
            let Op::Glyph { color, .. } = op else {
                unreachable!()
            };
            assert_eq!(*color, Rgb::GREEN);
        }
    }
}
