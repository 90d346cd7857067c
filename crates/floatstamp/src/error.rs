//! Error types for floatstamp operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StampError {
    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid float string: {0}")]
    InvalidFloatString(String),

    #[error("Invalid format pattern: {0}")]
    InvalidFormat(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StampError>;
