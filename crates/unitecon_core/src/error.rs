//! Error types for the unit economics engine.
//!
//! The calculators themselves never fail: degenerate inputs produce
//! infinity, zero or NaN sentinels. Errors only arise at the edges, when
//! building an [`Assumptions`](crate::model::Assumptions) from loosely typed
//! data or when exporting results.

/// Errors raised while constructing assumptions from external data
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },

    #[error("malformed assumptions: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors raised while exporting results to JSON or CSV
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("exported text was not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, InputError>;
