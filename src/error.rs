//! Error types for the loaders and registry
//!
//! The projection functions themselves never fail: degenerate input is clamped
//! and unknown names fall back to defaults. Errors only arise at the edges where
//! files are read or a caller asks for something that does not exist.

use thiserror::Error;

use crate::fund::FundId;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {value}")]
    InvalidField { field: String, value: String },

    #[error("Unknown fund id: {0}")]
    UnknownFund(FundId),
}

pub type ForecastResult<T> = Result<T, ForecastError>;
