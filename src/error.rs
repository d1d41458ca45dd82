// src/error.rs
//! Boundary errors. The reconciliation core itself never fails; these cover
//! decoding, configuration and I/O around it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A string or wrapped decimal that is not a float
    #[error("Invalid decimal in field `{field}`: {value:?}")]
    InvalidDecimal { field: &'static str, value: String },

    /// Open/current price decoded to NaN or infinity
    #[error("Non-finite {field} for {symbol}")]
    NonFinitePrice { symbol: String, field: &'static str },

    /// Required field absent from the wire payload
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Malformed batch: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The report consumer dropped its receiver
    #[error("Report channel closed")]
    ChannelClosed,
}

pub type ReconcileResult<T> = Result<T, ReconcileError>;
