//! Error types for request validation, authentication and configuration.

use std::num::ParseIntError;

use thiserror::Error;

/// A request parameter that failed decoding or bounds checks.
///
/// These are all raised before any key derivation or hashing happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid delay {input:?}: {source}")]
    Delay {
        input: String,
        source: ParseIntError,
    },

    #[error("expected delay in (0, {max}], got {got}")]
    DelayOutOfRange { max: u64, got: i64 },

    #[error("expected user of length (0, {max}], got {got}")]
    UserLength { max: usize, got: usize },

    #[error("expected an even number of hex digits, got {0}")]
    OddTagLength(usize),

    #[error("expected tag of length {expected}, got {got}")]
    TagLength { expected: usize, got: usize },

    #[error("expected hex tag, got bad byte on position {position}")]
    TagNotHex { position: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error(transparent)]
    Malformed(#[from] ValidationError),

    // Deliberately says nothing about where the tags diverged.
    #[error("tag mis-match")]
    TagMismatch,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max delay must be positive")]
    MaxDelay,

    #[error("max user length must be positive")]
    MaxUser,

    #[error("tag length must be in [1, {max}], got {got}")]
    TagLength { max: usize, got: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttackError {
    #[error("invalid server url: {0}")]
    InvalidUrl(String),

    #[error("no guess was accepted, best guess was {}", hex::encode(best_guess))]
    Exhausted { best_guess: Vec<u8> },
}
