// Copyright (c) 2025 rezk_nightky

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

/// How the draw color varies with position and time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MixMode {
    #[default]
    Single,
    Gradient,
    Random,
    Rainbow,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CharsetId {
    #[default]
    Default,
    Katakana,
    Binary,
    Custom,
}

/// How pointer proximity perturbs where a glyph is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionMode {
    #[default]
    None,
    Push,
    Revolve,
}

impl MixMode {
    pub const ALL: [MixMode; 4] = [
        MixMode::Single,
        MixMode::Gradient,
        MixMode::Random,
        MixMode::Rainbow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MixMode::Single => "single",
            MixMode::Gradient => "gradient",
            MixMode::Random => "random",
            MixMode::Rainbow => "rainbow",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "solid" => Some(MixMode::Single),
            "gradient" => Some(MixMode::Gradient),
            "random" => Some(MixMode::Random),
            "rainbow" => Some(MixMode::Rainbow),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self)
    }
}

impl CharsetId {
    pub const ALL: [CharsetId; 4] = [
        CharsetId::Default,
        CharsetId::Katakana,
        CharsetId::Binary,
        CharsetId::Custom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CharsetId::Default => "default",
            CharsetId::Katakana => "katakana",
            CharsetId::Binary => "binary",
            CharsetId::Custom => "custom",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Some(CharsetId::Default),
            "katakana" => Some(CharsetId::Katakana),
            "binary" | "bin" | "01" => Some(CharsetId::Binary),
            "custom" => Some(CharsetId::Custom),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self)
    }
}

impl InteractionMode {
    pub const ALL: [InteractionMode; 3] = [
        InteractionMode::None,
        InteractionMode::Push,
        InteractionMode::Revolve,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InteractionMode::None => "none",
            InteractionMode::Push => "push",
            InteractionMode::Revolve => "revolve",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Some(InteractionMode::None),
            "push" => Some(InteractionMode::Push),
            "revolve" | "orbit" => Some(InteractionMode::Revolve),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self)
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], cur: T) -> T {
    let i = all.iter().position(|&v| v == cur).unwrap_or(0);
    all[(i + 1) % all.len()]
}
