use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Error type covering the different failure cases that can occur while the
/// tool reads the address book, talks to the contacts service, or manages
/// credentials.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Wrapper for IO failures such as reading the address book or token file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the address book cannot be parsed as delimited text.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport level failures talking to the contacts service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The contacts service answered with a non-success status.
    #[error("contacts service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Raised when no usable credential is available.
    #[error("authorization error: {0}")]
    Auth(String),

    /// Raised when the configuration file holds invalid values.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Raised when the configuration file is not valid TOML.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Raised when a local row is too short to build a remote contact body.
    #[error("record {record_id:?} has {fields} fields, {required} required")]
    MalformedRecord {
        record_id: Option<String>,
        fields: usize,
        required: usize,
    },

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
