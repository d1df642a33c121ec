//! Error types for the vayu_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for vayu_core operations
///
/// Out-of-range concentrations and missing readings are not errors; the AQI
/// functions report those as `None` / [`crate::Exposure::NoData`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The HTTP request itself failed (network, DNS, TLS, decoding)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The air-quality API answered with a non-2xx status
    #[error("Upstream API error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Dataset content error
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
