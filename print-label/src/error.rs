//! Error types for the label printing library

use thiserror::Error;

/// Label printing error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// `send` called on a connection that is not open
    #[error("Connection not open")]
    NotOpen,

    /// Transport could not be established (resolution, refusal, permissions)
    #[error("Connection failed: {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// Field name already present in the label
    #[error("Field name already exists: {0}")]
    FieldNameConflict(String),

    /// Label data cannot be represented by the dialect
    #[error("Encoding failed: {0}")]
    Encoding(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload handed to a text stream is not UTF-8
    #[error("Payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// IO error on an open connection
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid transport configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl PrintError {
    pub(crate) fn connection(target: impl Into<String>, source: std::io::Error) -> Self {
        Self::Connection {
            target: target.into(),
            source,
        }
    }

    /// True for sends attempted on a closed connection
    pub fn is_not_open(&self) -> bool {
        matches!(self, Self::NotOpen)
    }

    /// True when the transport could not be established
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// True when a dialect could not represent the label
    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Encoding(_) | Self::Json(_))
    }
}

/// Result type for label printing operations
pub type PrintResult<T> = Result<T, PrintError>;
