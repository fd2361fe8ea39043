// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::color::Rgb;

/// What the terminal shows at one position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
}

impl Cell {
    pub fn blank_with_bg(bg: Option<Color>) -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg,
            bold: false,
        }
    }
}

/// Glyph plus unquantized color, blended by translucent fills.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ink {
    pub ch: char,
    pub rgb: [f32; 3],
    pub fresh: bool,
}

impl Ink {
    pub fn blank(bg: Rgb) -> Self {
        Self {
            ch: ' ',
            rgb: bg.channels(),
            fresh: false,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.ch == ' '
    }
}
