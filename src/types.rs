//! Core types for media-batch-dl

use crate::config::{TaskDefaults, default_target_dir};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Quality preference for the selected media stream
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    /// Best available stream (default)
    #[default]
    Highest,
    /// Smallest available stream
    Lowest,
}

impl Quality {
    /// Whether this is [`Quality::Highest`]
    pub fn is_highest(self) -> bool {
        matches!(self, Self::Highest)
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Highest => write!(f, "highest"),
            Self::Lowest => write!(f, "lowest"),
        }
    }
}

/// One requested download
///
/// Built from a [`BatchConfig`](crate::config::BatchConfig) by the task source or
/// directly by the caller, and consumed exactly once by the orchestrator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Media page URL (must be non-empty after trimming)
    pub url: String,

    /// Output directory (default: "./downloads")
    #[serde(default = "default_target_dir")]
    pub target_dir: PathBuf,

    /// Extract audio instead of downloading video (default: false)
    #[serde(default)]
    pub only_audio: bool,

    /// Stream quality (default: highest)
    #[serde(default)]
    pub quality: Quality,

    /// Output file name without extension (provider title if None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Task {
    /// Create a task with the per-task defaults: video, highest quality, "./downloads"
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            target_dir: default_target_dir(),
            only_audio: false,
            quality: Quality::default(),
            title: None,
        }
    }

    /// Create a task for `url` taking every other field from batch defaults
    pub fn from_defaults(url: impl Into<String>, defaults: &TaskDefaults) -> Self {
        Self {
            url: url.into(),
            target_dir: defaults.target_dir.clone(),
            only_audio: defaults.only_audio,
            quality: defaults.quality,
            title: None,
        }
    }

    /// Set the output directory
    pub fn target_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.target_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Download audio only
    pub fn only_audio(mut self, only_audio: bool) -> Self {
        self.only_audio = only_audio;
        self
    }

    /// Set the quality preference
    pub fn quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Set an explicit output file name
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Reject tasks whose URL is empty or whitespace-only
    pub fn validate(&self) -> Result<()> {
        validate_url(&self.url)
    }
}

/// Reject empty and whitespace-only URLs before any I/O happens
pub fn validate_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(Error::InvalidInput("URL cannot be empty".to_string()));
    }
    Ok(())
}

/// Result of one task: exactly one per input task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DownloadOutcome {
    /// The file was downloaded and resolved on disk
    Success {
        /// Task URL
        url: String,
        /// Resolved output file
        path: PathBuf,
    },
    /// The task failed; nothing was recorded in the progress log
    Failure {
        /// Task URL
        url: String,
        /// Human-readable error
        error: String,
    },
}

impl DownloadOutcome {
    /// URL of the task this outcome belongs to
    pub fn url(&self) -> &str {
        match self {
            Self::Success { url, .. } | Self::Failure { url, .. } => url,
        }
    }

    /// Whether the task succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Output path on success
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Success { path, .. } => Some(path),
            Self::Failure { .. } => None,
        }
    }

    /// Error message on failure
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }
}

impl std::fmt::Display for DownloadOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success { url, path } => write!(f, "{} -> {}", url, path.display()),
            Self::Failure { url, error } => write!(f, "{} failed: {}", url, error),
        }
    }
}

/// Event emitted while a batch runs
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A worker picked up the task
    TaskStarted {
        /// Task URL
        url: String,
    },

    /// The task finished successfully
    TaskCompleted {
        /// Task URL
        url: String,
        /// Resolved output file
        path: PathBuf,
    },

    /// The task failed
    TaskFailed {
        /// Task URL
        url: String,
        /// Error message
        error: String,
    },

    /// The download succeeded but could not be recorded in the progress log
    ProgressLogFailed {
        /// Task URL
        url: String,
        /// Error message
        error: String,
    },

    /// Every task of the batch produced an outcome
    BatchCompleted {
        /// Number of successful tasks
        succeeded: usize,
        /// Number of failed tasks
        failed: usize,
    },
}
