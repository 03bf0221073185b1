//! Error types for depcheck-task

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for task operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error used for failures the task does not recognize
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Message surfaced when the engine cannot reach its database
pub const DATABASE_UNAVAILABLE_MESSAGE: &str =
    "Unable to connect to the dependency-check database; unable to update the NVD data";

/// Main error type returned to the host build system
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Engine Errors
    // -------------------------------------------------------------------------
    #[error("{}", DATABASE_UNAVAILABLE_MESSAGE)]
    DatabaseUnavailable {
        #[source]
        source: DatabaseError,
    },

    /// Any engine failure other than database connectivity, passed through as-is
    #[error(transparent)]
    Engine(BoxError),

    // -------------------------------------------------------------------------
    // Purge Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Purge(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(String),

    // -------------------------------------------------------------------------
    // Property Errors
    // -------------------------------------------------------------------------
    #[error("Unknown task attribute: {0}")]
    UnknownAttribute(String),

    #[error("Invalid value for attribute {name}: {reason}")]
    InvalidAttribute { name: String, reason: String },

    #[error("Invalid setting value for {key}: {reason}")]
    InvalidSettingValue { key: String, reason: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this is the wrapped database connectivity failure
    #[must_use]
    pub fn is_database_unavailable(&self) -> bool {
        matches!(self, Error::DatabaseUnavailable { .. })
    }
}

impl From<EngineError> for Error {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Database(source) => Error::DatabaseUnavailable { source },
            EngineError::Other(source) => Error::Engine(source),
        }
    }
}

// =============================================================================
// Engine-side errors
// =============================================================================

/// The engine could not connect to or use its vulnerability database
#[derive(Error, Debug)]
#[error("{message}")]
pub struct DatabaseError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl DatabaseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failures an [`Engine`](crate::Engine) may report
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Other(BoxError),
}

impl EngineError {
    /// Wrap an arbitrary engine failure
    pub fn other(err: impl Into<BoxError>) -> Self {
        EngineError::Other(err.into())
    }
}
