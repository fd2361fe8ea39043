// Copyright (c) 2026 rezky_nightky

use crate::charset::CharacterSource;
use crate::color::Rgb;
use crate::droplet::DropGrid;
use crate::interaction::PointerState;
use crate::runtime::{CharsetId, InteractionMode, MixMode};
use crate::settings::{clamp_font_size, clamp_tick_ms, clamp_trail_alpha, Settings};

/// Owns the live configuration together with the state that depends on it:
/// the drop grid, the glyph alphabets and the pointer.
///
/// Setters only store values; the render loop reads them on its next tick.
/// Font size and surface size are the exception: both rebuild the grid
/// before returning so no tick ever sees a grid of the wrong shape.
#[derive(Clone, Debug)]
pub struct Controller {
    settings: Settings,
    glyphs: CharacterSource,
    grid: DropGrid,
    pointer: PointerState,
    surface: (f32, f32),
}

impl Controller {
    pub fn new(settings: Settings, width: f32, height: f32) -> Self {
        let mut glyphs = CharacterSource::new();
        glyphs.set_custom(&settings.custom_chars);
        let mut settings = settings;
        settings.font_size = clamp_font_size(settings.font_size);
        settings.tick_interval_ms = clamp_tick_ms(settings.tick_interval_ms);
        settings.trail_alpha = clamp_trail_alpha(settings.trail_alpha);
        let mut grid = DropGrid::new(settings.restart_chance);
        settings.restart_chance = grid.restart_chance();
        grid.rebuild(width, height, settings.font_size);
        Self {
            settings,
            glyphs,
            grid,
            pointer: PointerState::Inactive,
            surface: (width, height),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn glyphs(&self) -> &CharacterSource {
        &self.glyphs
    }

    pub fn grid(&self) -> &DropGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut DropGrid {
        &mut self.grid
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn surface_size(&self) -> (f32, f32) {
        self.surface
    }

    pub fn set_font_size(&mut self, px: f32) {
        let px = clamp_font_size(px);
        if px == self.settings.font_size {
            return;
        }
        self.settings.font_size = px;
        log::info!("font size set to {}px", px);
        self.rebuild_if_needed();
    }

    /// Returns whether the value changed, so the caller knows to reschedule.
    pub fn set_tick_interval_ms(&mut self, ms: u64) -> bool {
        let ms = clamp_tick_ms(ms);
        if ms == self.settings.tick_interval_ms {
            return false;
        }
        self.settings.tick_interval_ms = ms;
        log::info!("tick interval set to {}ms", ms);
        true
    }

    #[allow(dead_code)]
    pub fn set_primary_color(&mut self, c: Rgb) {
        self.settings.primary = c;
    }

    #[allow(dead_code)]
    pub fn set_secondary_color(&mut self, c: Rgb) {
        self.settings.secondary = c;
    }

    #[allow(dead_code)]
    pub fn set_background(&mut self, c: Rgb) {
        self.settings.background = c;
    }

    pub fn set_mix_mode(&mut self, m: MixMode) {
        self.settings.mix_mode = m;
    }

    #[allow(dead_code)]
    pub fn set_mix_mode_named(&mut self, name: &str) {
        let m = MixMode::from_name(name).unwrap_or_else(|| {
            log::warn!("unknown mix mode {:?}, using single", name);
            MixMode::Single
        });
        self.set_mix_mode(m);
    }

    pub fn cycle_mix_mode(&mut self) -> MixMode {
        self.set_mix_mode(self.settings.mix_mode.next());
        self.settings.mix_mode
    }

    pub fn set_charset(&mut self, id: CharsetId) {
        self.settings.charset = id;
    }

    #[allow(dead_code)]
    pub fn set_charset_named(&mut self, name: &str) {
        let id = CharsetId::from_name(name).unwrap_or_else(|| {
            log::warn!("unknown charset {:?}, using default", name);
            CharsetId::Default
        });
        self.set_charset(id);
    }

    pub fn cycle_charset(&mut self) -> CharsetId {
        self.set_charset(self.settings.charset.next());
        self.settings.charset
    }

    #[allow(dead_code)]
    pub fn set_custom_chars(&mut self, glyphs: &str) {
        self.settings.custom_chars = glyphs.to_string();
        self.glyphs.set_custom(glyphs);
        if self.glyphs.custom().is_empty() && !glyphs.is_empty() {
            log::warn!("custom characters contain nothing drawable, using default set");
        }
    }

    pub fn set_interaction(&mut self, m: InteractionMode) {
        self.settings.interaction = m;
    }

    #[allow(dead_code)]
    pub fn set_interaction_named(&mut self, name: &str) {
        let m = InteractionMode::from_name(name).unwrap_or_else(|| {
            log::warn!("unknown interaction mode {:?}, using none", name);
            InteractionMode::None
        });
        self.set_interaction(m);
    }

    pub fn cycle_interaction(&mut self) -> InteractionMode {
        self.set_interaction(self.settings.interaction.next());
        self.settings.interaction
    }

    #[allow(dead_code)]
    pub fn set_trail_alpha(&mut self, alpha: f32) {
        self.settings.trail_alpha = clamp_trail_alpha(alpha);
    }

    #[allow(dead_code)]
    pub fn set_restart_chance(&mut self, chance: f64) {
        self.grid.set_restart_chance(chance);
        self.settings.restart_chance = self.grid.restart_chance();
    }

    /// New surface dimensions from the host; rebuilds the grid immediately.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.surface = (width, height);
        self.rebuild_if_needed();
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer = PointerState::at(x, y);
    }

    pub fn pointer_left(&mut self) {
        self.pointer = PointerState::Inactive;
    }

    pub fn rebuild_if_needed(&mut self) -> bool {
        let (w, h) = self.surface;
        self.grid.rebuild_if_needed(w, h, self.settings.font_size)
    }

    /// Unconditional rebuild, restarting every column at the top.
    pub fn rebuild(&mut self) {
        let (w, h) = self.surface;
        self.grid.rebuild(w, h, self.settings.font_size);
    }
}
