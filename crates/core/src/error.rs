//! Error types for rule compilation, number reading and configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LipsyncError {
    #[error("malformed rule {rule:?}: {reason}")]
    MalformedRule { rule: String, reason: String },

    #[error("unknown viseme {0:?}")]
    UnknownViseme(String),

    #[error("cannot verbalize an empty number")]
    EmptyNumber,

    #[error("invalid digit {0:?} in number")]
    InvalidDigit(char),

    #[error("invalid timing value {field} = {value}: {reason}")]
    InvalidTiming {
        field: String,
        value: f64,
        reason: &'static str,
    },

    #[error("failed to read timing config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid timing config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LipsyncError>;
