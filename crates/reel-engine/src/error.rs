//! Error types for configuration loading and spin requests.
//!
//! Nothing in the reel motion path returns these: a bad target or index
//! degrades to a nearest-boundary stop instead.

use thiserror::Error;

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("invalid slot configuration format: {0}")]
    InvalidFormat(#[from] serde_json::Error),

    /// No reel strips were given.
    #[error("configuration defines no reels")]
    NoReels,

    /// A reel strip has no symbols.
    #[error("reel {reel} has an empty symbol strip")]
    EmptyStrip { reel: usize },

    /// Symbol height must be positive and finite.
    #[error("symbol height must be positive, got {0}")]
    InvalidSymbolHeight(f64),

    /// A `[min, max]` timing pair is inverted or negative.
    #[error("invalid {name} bounds: min {min} ms, max {max} ms")]
    InvalidTimingBounds { name: &'static str, min: f64, max: f64 },

    /// Spin speed must be positive.
    #[error("spin speed must be positive, got {0}")]
    InvalidSpinSpeed(f64),

    /// A probability or weight is negative or not finite.
    #[error("{name} must be a finite non-negative number, got {value}")]
    InvalidProbability { name: String, value: f64 },

    /// Easing name not recognized.
    #[error("unknown easing function '{0}'")]
    UnknownEasing(String),
}

/// Reasons a spin request is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpinError {
    /// A spin is already running.
    #[error("a spin is already in progress")]
    AlreadySpinning,

    /// A bet of zero credits.
    #[error("bet must be at least 1 credit")]
    ZeroBet,

    /// The balance does not cover the bet.
    #[error("insufficient credits: bet {bet}, balance {balance}")]
    InsufficientCredits { bet: u64, balance: u64 },
}
