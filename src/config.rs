//! Configuration types for media-batch-dl
//!
//! Two documents are configured here:
//! - [`BatchConfig`]: the user's list of URLs plus the defaults applied to each of them
//! - [`Config`]: runtime settings for the downloader itself (worker cap, progress log,
//!   external tool locations)

use crate::types::Quality;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Defaults applied uniformly to every URL of a batch
///
/// Each field falls back independently, so a `defaults` block that only sets
/// `only_audio` still gets `quality = "lowest"` and `target_dir = "./downloads"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefaults {
    /// Quality preference (default: lowest)
    #[serde(default = "default_batch_quality")]
    pub quality: Quality,

    /// Download audio only (default: false)
    #[serde(default)]
    pub only_audio: bool,

    /// Directory the files are written to (default: "./downloads")
    #[serde(default = "default_target_dir")]
    pub target_dir: PathBuf,
}

impl Default for TaskDefaults {
    fn default() -> Self {
        Self {
            quality: default_batch_quality(),
            only_audio: false,
            target_dir: default_target_dir(),
        }
    }
}

/// A batch of downloads as written in `configuration.json` / `configuration.toml`
///
/// ```json
/// {
///   "defaults": { "quality": "highest", "only_audio": true, "target_dir": "./music" },
///   "urls": ["https://www.youtube.com/watch?v=..."]
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Defaults for every URL (absent = [`TaskDefaults::default`])
    #[serde(default)]
    pub defaults: Option<TaskDefaults>,

    /// URLs to download
    #[serde(default)]
    pub urls: Vec<String>,
}

/// External tool locations
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Path to the yt-dlp executable (auto-detected if None)
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,

    /// Arguments placed before the generated ones, e.g. `["-m", "yt_dlp"]` when
    /// `ytdlp_path` points at a Python interpreter
    #[serde(default)]
    pub ytdlp_args: Vec<String>,

    /// Path to ffmpeg, forwarded to yt-dlp for post-processing (yt-dlp's own lookup if None)
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    /// Whether to search PATH for yt-dlp if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            ytdlp_args: Vec::new(),
            ffmpeg_path: None,
            search_path: true,
        }
    }
}

/// Runtime configuration for [`BatchDownloader`](crate::BatchDownloader)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of downloads running at once (default: 10)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_downloads: usize,

    /// Append-only file receiving one line per successfully downloaded URL
    /// (default: "downloads.txt")
    #[serde(default = "default_progress_log")]
    pub progress_log: PathBuf,

    /// External tool paths
    #[serde(default)]
    pub tools: ToolsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: default_max_concurrent(),
            progress_log: default_progress_log(),
            tools: ToolsConfig::default(),
        }
    }
}

// Default value functions
fn default_batch_quality() -> Quality {
    Quality::Lowest
}

pub(crate) fn default_target_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_max_concurrent() -> usize {
    10
}

fn default_progress_log() -> PathBuf {
    PathBuf::from("downloads.txt")
}

fn default_true() -> bool {
    true
}
