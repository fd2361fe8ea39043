// Copyright (c) 2026 rezky_nightky

use std::ops::RangeInclusive;
use std::time::Duration;

use crate::color::Rgb;
use crate::droplet::DEFAULT_RESTART_CHANCE;
use crate::runtime::{CharsetId, InteractionMode, MixMode};

pub const FONT_SIZE_RANGE: RangeInclusive<f32> = 4.0..=96.0;
pub const TICK_MS_RANGE: RangeInclusive<u64> = 1..=1000;
pub const TRAIL_ALPHA_RANGE: RangeInclusive<f32> = 0.01..=1.0;

/// Live rendering configuration. Read once per tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub font_size: f32,
    pub tick_interval_ms: u64,
    pub primary: Rgb,
    pub secondary: Rgb,
    pub background: Rgb,
    pub mix_mode: MixMode,
    pub charset: CharsetId,
    pub custom_chars: String,
    pub interaction: InteractionMode,
    pub trail_alpha: f32,
    pub restart_chance: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            tick_interval_ms: 33,
            primary: Rgb::GREEN,
            secondary: Rgb::RED,
            background: Rgb::BLACK,
            mix_mode: MixMode::Single,
            charset: CharsetId::Default,
            custom_chars: String::new(),
            interaction: InteractionMode::None,
            trail_alpha: 0.05,
            restart_chance: DEFAULT_RESTART_CHANCE,
        }
    }
}

impl Settings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

pub fn clamp_font_size(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(*FONT_SIZE_RANGE.start(), *FONT_SIZE_RANGE.end())
    } else {
        Settings::default().font_size
    }
}

pub fn clamp_tick_ms(v: u64) -> u64 {
    v.clamp(*TICK_MS_RANGE.start(), *TICK_MS_RANGE.end())
}

pub fn clamp_trail_alpha(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(*TRAIL_ALPHA_RANGE.start(), *TRAIL_ALPHA_RANGE.end())
    } else {
        Settings::default().trail_alpha
    }
}
