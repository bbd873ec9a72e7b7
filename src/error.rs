//! Error types for media-batch-dl
//!
//! Every fallible operation in the crate returns [`Result`]. Per-task errors are
//! captured into that task's [`DownloadOutcome`](crate::types::DownloadOutcome) by the
//! orchestrator and never escape a batch.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for media-batch-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for media-batch-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Task rejected before any I/O (e.g. empty or whitespace-only URL)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Batch configuration could not be read or parsed
    #[error("failed to load configuration from {path}: {message}")]
    ConfigLoad {
        /// Configuration file that failed to load
        path: PathBuf,
        /// Underlying reason
        message: String,
    },

    /// The media fetch provider reported an error (network, format, decode, post-process)
    #[error("Error downloading {url}: {message}")]
    Fetch {
        /// URL of the item that failed
        url: String,
        /// Provider error message
        message: String,
    },

    /// The provider reported success but no output file could be resolved
    #[error("Error downloading {url}: no files were downloaded to {target_dir}")]
    NoOutputFile {
        /// URL of the item
        url: String,
        /// Directory the output was expected in
        target_dir: PathBuf,
    },

    /// Appending to the progress log failed
    #[error("failed to append to progress log {path}: {source}")]
    ProgressLog {
        /// Progress log path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML parse error
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// External tool execution failed (yt-dlp could not be started, etc.)
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// Operation not supported (missing binary)
    #[error("not supported: {0}")]
    NotSupported(String),

    /// The batch was cancelled before this task finished
    #[error("cancelled")]
    Cancelled,
}

impl Error {
    /// Wrap any provider-side error with the URL it belongs to.
    ///
    /// Errors that already carry a URL (or that never reached the provider) are
    /// returned unchanged so the message is not wrapped twice.
    pub fn with_url(self, url: &str) -> Self {
        match self {
            Error::Fetch { .. }
            | Error::NoOutputFile { .. }
            | Error::InvalidInput(_)
            | Error::Cancelled => self,
            other => Error::Fetch {
                url: url.to_string(),
                message: other.to_string(),
            },
        }
    }
}
