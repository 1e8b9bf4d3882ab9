//! Error types for Docview.
//!
//! This module provides a unified error type for all Docview operations,
//! with specific error variants for different failure modes.

use std::io;

use thiserror::Error;

/// A specialized `Result` type for Docview operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Docview.
#[derive(Error, Debug)]
pub enum Error {
    /// Conversion endpoint reported a failure (E001)
    #[error("document conversion failed: {0}")]
    ConversionFailed(String),

    /// Conversion request could not be completed (E002)
    #[error("conversion request failed: {0}")]
    ConversionRequest(String),

    /// Conversion endpoint answered with an unexpected body (E003)
    #[error("invalid conversion response: {0}")]
    InvalidResponse(String),

    /// Operation timeout (E004)
    #[error("operation timed out after {0} seconds")]
    Timeout(u64),

    /// Configuration file error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Invalid configuration value
    #[error("invalid configuration value for '{key}': {reason}")]
    InvalidConfig {
        /// Configuration key
        key: String,
        /// Reason for invalidity
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Internal failure, such as a panicking converter task
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns the error code associated with this error, if any.
    ///
    /// Error codes follow the pattern EXXX where XXX is a 3-digit number.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::ConversionFailed(_) => Some("E001"),
            Self::ConversionRequest(_) => Some("E002"),
            Self::InvalidResponse(_) => Some("E003"),
            Self::Timeout(_) => Some("E004"),
            Self::InvalidConfig { .. } => Some("E005"),
            _ => None,
        }
    }

    /// Returns whether this error is recoverable (can be retried).
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::ConversionRequest(_) | Self::Timeout(_))
    }

    /// Returns a helpful suggestion for resolving the error, if applicable.
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::ConversionRequest(_) | Self::Timeout(_) => Some(
                "Check that the conversion endpoint is reachable:\n\
                   docview config get converter.endpoint\n\
                 The original file can still be downloaded directly.",
            ),
            Self::ConversionFailed(_) => {
                Some("The converter could not render this document. Download it instead.")
            }
            Self::InvalidConfig { .. } | Self::ConfigError(_) => Some(
                "Inspect the configuration with:\n\
                   docview config show\n\
                 Or restore defaults with:\n\
                   docview config reset",
            ),
            _ => None,
        }
    }
}
