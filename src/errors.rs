//! # Error Types Module
//!
//! This module defines the error types for model loading, prediction and
//! external nutrition lookups. Startup code wraps these in `anyhow` with
//! file context; per-ingredient code turns them into inline markers.

/// Errors raised while loading or evaluating the rating model
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Artifact could not be read or decoded
    Artifact(String),
    /// Artifact declares a format version this build cannot read
    UnsupportedVersion(u32),
    /// Artifact content is internally inconsistent
    Shape(String),
    /// Input vector length differs from the model's feature count
    DimensionMismatch { expected: usize, actual: usize },
    /// Scoring produced NaN or infinity
    NonFiniteScore,
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::Artifact(msg) => write!(f, "Model artifact error: {msg}"),
            ModelError::UnsupportedVersion(v) => {
                write!(f, "Unsupported model format version: {v}")
            }
            ModelError::Shape(msg) => write!(f, "Model shape error: {msg}"),
            ModelError::DimensionMismatch { expected, actual } => write!(
                f,
                "Feature vector has {actual} cells but the model expects {expected}"
            ),
            ModelError::NonFiniteScore => write!(f, "Model produced a non-finite score"),
        }
    }
}

impl std::error::Error for ModelError {}

/// Errors raised by the external nutrition-data lookup path
#[derive(Debug, Clone, PartialEq)]
pub enum LookupError {
    /// No API key is configured
    MissingApiKey,
    /// HTTP 429 or 500; worth retrying
    Transient(u16),
    /// Any other non-success HTTP status
    Status(u16),
    /// Connection failure or timeout
    Network(String),
    /// Response body was not the expected JSON
    Decode(String),
    /// Cache could not be written
    Cache(String),
}

impl LookupError {
    /// Whether another attempt may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, LookupError::Transient(_))
    }

    /// Classify an HTTP status code that is not a success
    pub fn from_status(status: u16) -> Self {
        match status {
            429 | 500 => LookupError::Transient(status),
            _ => LookupError::Status(status),
        }
    }
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::MissingApiKey => write!(f, "no API key configured"),
            LookupError::Transient(status) => write!(f, "transient HTTP status {status}"),
            LookupError::Status(status) => write!(f, "HTTP status {status}"),
            LookupError::Network(msg) => write!(f, "network error: {msg}"),
            LookupError::Decode(msg) => write!(f, "unexpected response: {msg}"),
            LookupError::Cache(msg) => write!(f, "cache error: {msg}"),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return LookupError::from_status(status.as_u16());
        }
        if err.is_decode() {
            LookupError::Decode(err.to_string())
        } else {
            LookupError::Network(err.to_string())
        }
    }
}
