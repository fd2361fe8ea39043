// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;

/// Raw-mode alternate-screen session with mouse and focus reporting.
/// Dropping it puts the terminal back.
pub struct Terminal {
    stdout: Stdout,
    size: Option<(u16, u16)>,
    order: Vec<usize>,
}

/// Pen state while queueing a frame, so attributes are only sent on change.
#[derive(Default)]
struct Pen {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
    pos: Option<(u16, u16)>,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(EnableMouseCapture)?;
            // not every terminal reports focus; the rain works without it
            let _ = out.execute(EnableFocusChange);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()
        })();
        if let Err(e) = init {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            size: None,
            order: Vec::new(),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    /// Writes the cells of `frame` that changed since the last call.
    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let resized = self.size != Some((frame.width, frame.height));
        let full = resized || frame.is_dirty_all();
        if resized {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.size = Some((frame.width, frame.height));
        }

        self.order.clear();
        if full {
            self.order
                .extend(0..frame.width as usize * frame.height as usize);
        } else {
            self.order.extend_from_slice(frame.dirty_indices());
            self.order.sort_unstable();
        }

        let width = frame.width.max(1) as usize;
        let mut pen = Pen::default();
        for &idx in &self.order {
            let x = (idx % width) as u16;
            let y = (idx / width) as u16;
            if y >= frame.height {
                continue;
            }
            queue_cell(&mut self.stdout, &mut pen, x, y, frame.cell_at_index(idx))?;
            // only trust the cursor after narrow glyphs
            pen.pos = if x + 1 < frame.width && frame.cell_at_index(idx).ch.is_ascii() {
                Some((x + 1, y))
            } else {
                None
            };
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }
}

fn queue_cell(out: &mut Stdout, pen: &mut Pen, x: u16, y: u16, cell: Cell) -> Result<()> {
    if pen.pos != Some((x, y)) {
        out.queue(cursor::MoveTo(x, y))?;
    }
    if cell.fg != pen.fg {
        out.queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
        pen.fg = cell.fg;
    }
    if cell.bg != pen.bg {
        out.queue(SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
        pen.bg = cell.bg;
    }
    if cell.bold != pen.bold {
        out.queue(SetAttribute(if cell.bold {
            Attribute::Bold
        } else {
            Attribute::NormalIntensity
        }))?;
        pen.bold = cell.bold;
    }
    out.queue(Print(cell.ch))?;
    Ok(())
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore_terminal_best_effort();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(DisableFocusChange);
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
