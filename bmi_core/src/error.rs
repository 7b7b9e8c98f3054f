//! Error types for the bmi_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for bmi_core operations
///
/// The classifier and plan builder are total and never produce one of these;
/// errors come from validation, persistence and configuration.
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

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before it reaches the calculation layer
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Measurement history error
    #[error("History error: {0}")]
    History(String),

    /// Profile storage error
    #[error("Profile error: {0}")]
    Profile(String),
}
