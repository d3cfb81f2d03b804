//! Error types for cbor_string_audit
//!
//! This module provides structured error handling using thiserror.
//! Every error maps onto an [`ErrorKind`] so callers can tell a broken
//! input apart from a broken configuration or a broken analysis.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Coarse classification of an [`AuditError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Reading the input or writing the report failed
    Io,
    /// The input is not a valid CBOR document
    Decode,
    /// Missing schema source or unusable configuration
    Configuration,
    /// Internal bookkeeping disagreed with itself
    Invariant,
}

impl ErrorKind {
    /// Process exit code used by the CLI for this kind of failure
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io | Self::Configuration => 1,
            Self::Decode => 2,
            Self::Invariant => 3,
        }
    }
}

/// Errors that can occur during an analysis run
#[derive(Error, Debug)]
pub enum AuditError {
    /// IO error while reading input or schema
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be decoded
    #[error("CBOR decode error: {0}")]
    Decode(#[from] ciborium::de::Error<std::io::Error>),

    /// A complete item was decoded but bytes remain after it
    #[error("CBOR decode error: {remaining} trailing bytes after offset {offset}")]
    TrailingBytes { offset: usize, remaining: usize },

    /// The document nests containers deeper than the configured limit
    #[error("CBOR decode error: nesting exceeds max_depth of {limit}; raise max_depth to accept this document")]
    DepthLimitExceeded { limit: usize },

    /// Schema source not found
    #[error("Schema source not found: {path}")]
    SchemaNotFound { path: PathBuf },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// JSON parsing or rendering error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Per-value counts do not add up to the number of text occurrences seen
    #[error("Internal invariant violated: {counted} text occurrences visited but {recorded} recorded per value")]
    InvariantViolation { counted: usize, recorded: usize },

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AuditError>,
    },
}

impl AuditError {
    /// Wrap an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AuditError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        AuditError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Classify this error; context wrappers report the kind of their source
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::Decode(_) | Self::TrailingBytes { .. } | Self::DepthLimitExceeded { .. } => {
                ErrorKind::Decode
            }
            Self::SchemaNotFound { .. } | Self::InvalidConfig { .. } | Self::Json(_) => {
                ErrorKind::Configuration
            }
            Self::InvariantViolation { .. } => ErrorKind::Invariant,
            Self::WithContext { source, .. } => source.kind(),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(ctx))
    }
}
