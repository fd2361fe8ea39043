// Copyright (c) 2026 rezky_nightky

mod cell;
mod charset;
mod cloud;
mod color;
mod config;
mod controller;
mod droplet;
mod error;
mod frame;
mod interaction;
mod palette;
mod runtime;
mod settings;
mod surface;
mod terminal;
mod ticker;

use std::env;
use std::fs::File;
use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind, MouseEventKind};
use rand::{rngs::StdRng, SeedableRng};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::cloud::Cloud;
use crate::config::{color_enabled_stdout, print_list_charsets, print_list_mixmodes, Args};
use crate::controller::Controller;
use crate::error::{Error, Result};
use crate::frame::{CellMetrics, Frame};
use crate::runtime::ColorMode;
use crate::surface::Surface;
use crate::terminal::{restore_terminal_best_effort, Terminal};
use crate::ticker::IntervalTicker;

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

const SPEED_STEP_MS: u64 = 5;
const FONT_STEP_PX: f32 = 2.0;
const IDLE_POLL: Duration = Duration::from_millis(50);

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }
    if env::var("TERM").unwrap_or_default().eq_ignore_ascii_case("dumb") {
        return ColorMode::Mono;
    }
    ColorMode::Color256
}

fn detect_color_mode(args: &Args) -> Result<ColorMode> {
    match args.colormode {
        None => Ok(detect_color_mode_auto()),
        Some(0) => Ok(ColorMode::Mono),
        Some(16) => Ok(ColorMode::Color16),
        Some(8) | Some(256) => Ok(ColorMode::Color256),
        Some(24) | Some(32) => Ok(ColorMode::TrueColor),
        Some(m) => Err(Error::ColorMode(m)),
    }
}

fn color_mode_label(m: ColorMode) -> &'static str {
    match m {
        ColorMode::TrueColor => "24-bit truecolor",
        ColorMode::Color256 => "8-bit (256-color)",
        ColorMode::Color16 => "16-color",
        ColorMode::Mono => "mono",
    }
}

fn wall_clock() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

/// The terminal owns stderr while raining, so logs only go to a file.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).map_err(|source| Error::LogFile {
        path: path.to_path_buf(),
        source,
    })?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

enum Control {
    Continue,
    Quit,
    Resize(u16, u16),
}

fn handle_event(
    ev: Event,
    cloud: &mut Cloud<IntervalTicker>,
    frame: &mut Frame,
    screensaver: bool,
) -> Control {
    match ev {
        Event::Resize(w, h) => Control::Resize(w, h),
        Event::FocusLost => {
            cloud.controller.pointer_left();
            Control::Continue
        }
        Event::Mouse(m) => {
            if matches!(m.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
                let metrics = frame.metrics();
                cloud.controller.pointer_moved(
                    (m.column as f32 + 0.5) * metrics.width,
                    (m.row as f32 + 0.5) * metrics.height,
                );
            }
            Control::Continue
        }
        Event::Key(k) if k.kind == KeyEventKind::Press => {
            if screensaver {
                return Control::Quit;
            }
            let tick_ms = cloud.controller.settings().tick_interval_ms;
            match k.code {
                KeyCode::Esc | KeyCode::Char('q') => return Control::Quit,
                KeyCode::Up => {
                    let ms = tick_ms.saturating_sub(SPEED_STEP_MS).max(1);
                    cloud.set_tick_interval(ms, Instant::now());
                }
                KeyCode::Down => {
                    cloud.set_tick_interval(tick_ms + SPEED_STEP_MS, Instant::now());
                }
                KeyCode::Char('+') | KeyCode::Char('=') => {
                    let c = &mut cloud.controller;
                    c.set_font_size(c.settings().font_size + FONT_STEP_PX);
                }
                KeyCode::Char('-') => {
                    let c = &mut cloud.controller;
                    c.set_font_size(c.settings().font_size - FONT_STEP_PX);
                }
                KeyCode::Char('m') => {
                    let m = cloud.controller.cycle_mix_mode();
                    log::info!("mix mode: {}", m.name());
                }
                KeyCode::Char('c') => {
                    let id = cloud.controller.cycle_charset();
                    log::info!("charset: {}", id.name());
                }
                KeyCode::Char('i') => {
                    let m = cloud.controller.cycle_interaction();
                    log::info!("interaction: {}", m.name());
                }
                KeyCode::Char(' ') => {
                    cloud.controller.rebuild();
                    frame.clear(cloud.controller.settings().background);
                }
                _ => {}
            }
            Control::Continue
        }
        _ => Control::Continue,
    }
}

fn run(args: Args) -> Result<()> {
    if args.list_charsets {
        print_list_charsets();
        return Ok(());
    }
    if args.list_mixmodes {
        print_list_mixmodes();
        return Ok(());
    }
    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", env!("DIGIRAIN_BUILD"));
        let sha = env!("DIGIRAIN_GIT_SHA");
        if !sha.is_empty() {
            println!("Commit: {}", sha);
        }
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        return Ok(());
    }

    let color_mode = detect_color_mode(&args)?;
    if args.check_bitcolor {
        let colorterm = env::var("COLORTERM").unwrap_or_default();
        let term = env::var("TERM").unwrap_or_default();
        let unset = |v: &str| if v.is_empty() { "(unset)".to_string() } else { v.to_string() };
        println!("BITCOLOR CHECK:");
        println!("  COLORTERM: {}", unset(&colorterm));
        println!("  TERM: {}", unset(&term));
        println!("  auto_detected: {}", color_mode_label(detect_color_mode_auto()));
        println!("  effective: {}", color_mode_label(color_mode));
        return Ok(());
    }

    let settings = args.settings()?;
    let metrics: CellMetrics = args.cell_metrics()?;
    let duration = args.duration_secs()?;
    init_logging(args.log_file.as_deref())?;
    log::info!(
        "starting: {:?}, color mode {}",
        settings,
        color_mode_label(color_mode)
    );

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut term = Terminal::new()?;
    let (w, h) = term.size()?;
    let mut frame = Frame::new(w, h, metrics, settings.background);
    let (px_w, px_h) = frame.size();

    let controller = Controller::new(settings, px_w, px_h);
    let mut cloud = Cloud::new(controller, IntervalTicker::new(), rng);

    let start = Instant::now();
    let end_time = duration.map(|s| start + Duration::from_secs_f64(s));
    cloud.start(start);

    'rain: loop {
        let now = Instant::now();
        if end_time.is_some_and(|end| now >= end) {
            break;
        }

        let mut timeout = cloud
            .next_deadline()
            .map(|d| d.saturating_duration_since(now))
            .unwrap_or(IDLE_POLL);
        if let Some(end) = end_time {
            timeout = timeout.min(end.saturating_duration_since(now));
        }

        let mut pending_resize: Option<(u16, u16)> = None;
        if Terminal::poll_event(timeout)? {
            while Terminal::poll_event(Duration::ZERO)? {
                match handle_event(Terminal::read_event()?, &mut cloud, &mut frame, args.screensaver) {
                    Control::Continue => {}
                    Control::Quit => break 'rain,
                    Control::Resize(nw, nh) => pending_resize = Some((nw, nh)),
                }
            }
        }

        if let Some((nw, nh)) = pending_resize {
            frame = Frame::new(nw, nh, metrics, cloud.controller.settings().background);
            let (px_w, px_h) = frame.size();
            cloud.controller.resize(px_w, px_h);
            log::debug!("resized to {}x{} cells", nw, nh);
        }

        if cloud.pump(&mut frame, Instant::now(), wall_clock()) {
            frame.resolve(color_mode);
            term.draw(&mut frame)?;
        }
    }

    drop(term);
    log::info!(
        "stopped after {} ticks in {:.1}s",
        cloud.ticks(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn main() -> ExitCode {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.help_template(if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    });
    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
