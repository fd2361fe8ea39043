// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;

use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::frame::CellMetrics;
use crate::runtime::{CharsetId, InteractionMode, MixMode};
use crate::settings::{Settings, FONT_SIZE_RANGE, TICK_MS_RANGE, TRAIL_ALPHA_RANGE};

pub const KEYS_USAGE: &str = "KEYS:\n  Up/Down  faster/slower   +/-  font size   m  mix mode   c  charset\n  i  interaction   Space  restart columns   q/Esc  quit";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn heading(text: &str) {
    if color_enabled_stdout() {
        println!("\x1b[1;36m{}\x1b[0m", text);
    } else {
        println!("{}", text);
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "digirain", version, disable_version_flag = true, after_help = KEYS_USAGE)]
pub struct Args {
    #[arg(
        long = "font-size",
        default_value_t = 14.0,
        help_heading = "APPEARANCE",
        help = "Glyph size and row step in pixels (min 4 max 96)"
    )]
    pub font_size: f32,

    #[arg(
        short = 'S',
        long = "speed",
        default_value_t = 33,
        help_heading = "PERFORMANCE",
        help = "Milliseconds between ticks (min 1 max 1000)"
    )]
    pub speed_ms: u64,

    #[arg(
        short = 'c',
        long = "color",
        default_value = "#00ff00",
        help_heading = "APPEARANCE",
        help = "Primary color (#rrggbb)"
    )]
    pub color: String,

    #[arg(
        long = "color2",
        default_value = "#ff0000",
        help_heading = "APPEARANCE",
        help = "Secondary color for gradient and random mixing (#rrggbb)"
    )]
    pub color2: String,

    #[arg(
        long = "color-bg",
        default_value = "#000000",
        help_heading = "APPEARANCE",
        help = "Background color the trails fade into (#rrggbb)"
    )]
    pub color_bg: String,

    #[arg(
        short = 'x',
        long = "mix",
        default_value = "single",
        help_heading = "APPEARANCE",
        help = "Color mix mode (see --list-mixmodes)"
    )]
    pub mix: String,

    #[arg(
        long = "trail",
        default_value_t = 0.05,
        help_heading = "APPEARANCE",
        help = "Fade overlay opacity per tick (min 0.01 max 1)"
    )]
    pub trail: f32,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8,24). Default: 24-bit if COLORTERM says so, else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "charset",
        default_value = "default",
        help_heading = "CHARSET",
        help = "Charset (see --list-charsets)"
    )]
    pub charset: String,

    #[arg(
        long = "chars",
        help_heading = "CHARSET",
        help = "Custom characters; selects the custom charset"
    )]
    pub chars: Option<String>,

    #[arg(
        short = 'I',
        long = "interaction",
        default_value = "none",
        help_heading = "MOUSE",
        help = "Mouse interaction: none, push, revolve"
    )]
    pub interaction: String,

    #[arg(
        long = "restart-pct",
        default_value_t = 2.5,
        help_heading = "PERFORMANCE",
        help = "Chance per tick in percent that a finished column restarts (min 0 max 100)"
    )]
    pub restart_pct: f64,

    #[arg(
        long = "cell-width",
        default_value_t = 7.0,
        help_heading = "PERFORMANCE",
        help = "Pixel width of one terminal cell (min 1 max 64)"
    )]
    pub cell_width: f32,

    #[arg(
        long = "cell-height",
        default_value_t = 14.0,
        help_heading = "PERFORMANCE",
        help = "Pixel height of one terminal cell (min 1 max 128)"
    )]
    pub cell_height: f32,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed the random generator for a repeatable run"
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "log-file",
        value_name = "PATH",
        help_heading = "GENERAL",
        help = "Write logs to PATH (level from RUST_LOG, default info)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "list-charsets",
        help_heading = "HELP",
        help = "List available charsets and exit"
    )]
    pub list_charsets: bool,

    #[arg(
        long = "list-mixmodes",
        help_heading = "HELP",
        help = "List available color mix modes and exit"
    )]
    pub list_mixmodes: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

fn require_f32(name: &'static str, v: f32, min: f32, max: f32) -> Result<f32> {
    if !v.is_finite() {
        return Err(Error::NotFinite {
            name,
            value: v.to_string(),
        });
    }
    if v < min || v > max {
        return Err(Error::out_of_range(name, v, min, max));
    }
    Ok(v)
}

fn require_f64(name: &'static str, v: f64, min: f64, max: f64) -> Result<f64> {
    if !v.is_finite() {
        return Err(Error::NotFinite {
            name,
            value: v.to_string(),
        });
    }
    if v < min || v > max {
        return Err(Error::out_of_range(name, v, min, max));
    }
    Ok(v)
}

fn require_u64(name: &'static str, v: u64, min: u64, max: u64) -> Result<u64> {
    if v < min || v > max {
        return Err(Error::out_of_range(name, v, min, max));
    }
    Ok(v)
}

impl Args {
    /// Validated startup configuration. Numbers out of range and malformed
    /// colors are errors here; unknown mode names are not, they fall back to
    /// their defaults the same way a live change would.
    pub fn settings(&self) -> Result<Settings> {
        let font_size = require_f32(
            "--font-size",
            self.font_size,
            *FONT_SIZE_RANGE.start(),
            *FONT_SIZE_RANGE.end(),
        )?;
        let tick_interval_ms = require_u64(
            "--speed",
            self.speed_ms,
            *TICK_MS_RANGE.start(),
            *TICK_MS_RANGE.end(),
        )?;
        let trail_alpha = require_f32(
            "--trail",
            self.trail,
            *TRAIL_ALPHA_RANGE.start(),
            *TRAIL_ALPHA_RANGE.end(),
        )?;
        let restart_pct = require_f64("--restart-pct", self.restart_pct, 0.0, 100.0)?;

        let mix_mode = MixMode::from_name(&self.mix).unwrap_or_else(|| {
            eprintln!("unknown mix mode {:?}, using single", self.mix);
            MixMode::Single
        });
        let interaction = InteractionMode::from_name(&self.interaction).unwrap_or_else(|| {
            eprintln!("unknown interaction {:?}, using none", self.interaction);
            InteractionMode::None
        });
        let charset = match &self.chars {
            Some(_) => CharsetId::Custom,
            None => CharsetId::from_name(&self.charset).unwrap_or_else(|| {
                eprintln!("unknown charset {:?}, using default", self.charset);
                CharsetId::Default
            }),
        };

        Ok(Settings {
            font_size,
            tick_interval_ms,
            primary: self.color.parse::<Rgb>()?,
            secondary: self.color2.parse::<Rgb>()?,
            background: self.color_bg.parse::<Rgb>()?,
            mix_mode,
            charset,
            custom_chars: self.chars.clone().unwrap_or_default(),
            interaction,
            trail_alpha,
            restart_chance: restart_pct / 100.0,
        })
    }

    pub fn cell_metrics(&self) -> Result<CellMetrics> {
        Ok(CellMetrics {
            width: require_f32("--cell-width", self.cell_width, 1.0, 64.0)?,
            height: require_f32("--cell-height", self.cell_height, 1.0, 128.0)?,
        })
    }

    pub fn duration_secs(&self) -> Result<Option<f64>> {
        match self.duration {
            None => Ok(None),
            Some(s) if s.is_finite() && s <= 0.0 => Ok(None),
            Some(s) => require_f64("--duration", s, 0.1, 86400.0).map(Some),
        }
    }
}

pub fn print_list_charsets() {
    heading("AVAILABLE CHARSETS:");
    println!();
    println!("VALUE        DESCRIPTION");
    println!("default      Latin letters, digits, punctuation and katakana");
    println!("katakana     Half of the classic look: katakana only");
    println!("binary       0 and 1 (aliases: bin, 01)");
    println!("custom       Characters given with --chars (falls back to default when empty)");
}

pub fn print_list_mixmodes() {
    heading("AVAILABLE MIX MODES:");
    println!();
    println!("VALUE        DESCRIPTION");
    println!("single       Every glyph in --color (alias: solid)");
    println!("gradient     --color at the top blending into --color2 at the bottom");
    println!("random       Each glyph randomly --color or --color2");
    println!("rainbow      Hue sweeps down the screen and drifts over time");
}
