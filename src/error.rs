// Copyright (c) 2026 rezky_nightky

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid color {0:?} (expected #rrggbb or #rgb)")]
    InvalidColor(String),

    #[error("failed to apply {name} {value} (min {min} max {max})")]
    OutOfRange {
        name: &'static str,
        value: String,
        min: String,
        max: String,
    },

    #[error("failed to apply {name} {value} (must be a finite number)")]
    NotFinite { name: &'static str, value: String },

    #[error("invalid --colormode: {0} (allowed: 0,16,8,24)")]
    ColorMode(u16),

    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn out_of_range<T: std::fmt::Display>(name: &'static str, value: T, min: T, max: T) -> Self {
        Self::OutOfRange {
            name,
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }
}
