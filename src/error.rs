use std::io;

use thiserror::Error;

/// Rejected configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid display size `{0}`, expected WIDTHxHEIGHT")]
    DisplaySize(String),
    #[error("display must be at least {min}x{min} pixels, got {width}x{height}")]
    DisplayTooSmall { width: i32, height: i32, min: i32 },
    #[error("shelf height {shelf} leaves no work area on a {height}px display")]
    ShelfTooTall { shelf: i32, height: i32 },
    #[error("animation scale must be between 0 and 10, got {0}")]
    AnimationScale(f64),
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },
}

/// Errors surfaced by the terminal playground.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal i/o error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
