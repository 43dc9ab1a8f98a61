//! Domain error types
//!
//! This module defines the error hierarchy for Vigil.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Vigil error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum VigilError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failures of the external model collaborators (NER, analyzer, toxicity)
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Model service errors
///
/// Errors raised by the NER pipeline, the generic entity analyzer or the
/// toxicity classifier. These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Failed to reach the model service
    #[error("Failed to connect to model service: {0}")]
    ConnectionFailed(String),

    /// Response could not be interpreted
    #[error("Invalid response from model service: {0}")]
    InvalidResponse(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

/// Reasons a checksum-bearing identifier is rejected
///
/// These never escape the structural validators: every variant collapses
/// to "invalid".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdValidationError {
    /// Wrong number of digits for the scheme
    #[error("identifier has an invalid length")]
    InvalidLength,

    /// Non-digit characters left after compaction
    #[error("identifier has an invalid format")]
    InvalidFormat,

    /// Check digits do not match the payload
    #[error("identifier checksum does not match")]
    InvalidChecksum,
}

// Conversion from std::io::Error
impl From<std::io::Error> for VigilError {
    fn from(err: std::io::Error) -> Self {
        VigilError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for VigilError {
    fn from(err: serde_json::Error) -> Self {
        VigilError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for VigilError {
    fn from(err: toml::de::Error) -> Self {
        VigilError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<regex::Error> for VigilError {
    fn from(err: regex::Error) -> Self {
        VigilError::Configuration(format!("Invalid regex: {err}"))
    }
}
