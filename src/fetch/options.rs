//! Per-fetch options derived from a task

use crate::types::{Quality, Task};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Codec audio-only downloads are converted to
pub const AUDIO_CODEC: &str = "mp3";
/// Target bitrate (kbps) for extracted audio
pub const AUDIO_QUALITY_KBPS: u32 = 192;
/// Single container video downloads are constrained to and converted into
pub const VIDEO_CONTAINER: &str = "mp4";

/// Resilience policy applied to every fetch regardless of mode
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Retries for the whole item (default: 10)
    pub retries: u32,
    /// Retries for each fragment (default: 10)
    pub fragment_retries: u32,
    /// Socket timeout (default: 30 seconds)
    pub socket_timeout: Duration,
    /// Resume partially downloaded files (default: true)
    pub continue_partial: bool,
    /// Keep going past individual fragment errors (default: true)
    pub ignore_errors: bool,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            retries: 10,
            fragment_retries: 10,
            socket_timeout: Duration::from_secs(30),
            continue_partial: true,
            ignore_errors: true,
        }
    }
}

/// Post-processing applied by the provider after the download
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostProcessor {
    /// Extract the audio track and transcode it
    ExtractAudio {
        /// Target codec, e.g. "mp3"
        codec: String,
        /// Target bitrate in kbps
        quality_kbps: u32,
    },
    /// Convert/remux the result into a single container
    ConvertVideo {
        /// Target container, e.g. "mp4"
        container: String,
    },
}

/// Options for a single provider invocation
///
/// Built once per task by [`DownloadOptions::new`] and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Provider format selector
    pub format: String,
    /// Output path template (`%(title)s` / `%(ext)s` are expanded by the provider)
    pub output_template: PathBuf,
    /// Post-processing step
    pub post_processor: PostProcessor,
    /// Keep the intermediate video after audio extraction
    pub keep_video: bool,
    /// Download uploaded subtitles
    pub write_subtitles: bool,
    /// Download automatic subtitles
    pub write_auto_subtitles: bool,
    /// Retry and timeout policy
    pub policy: FetchPolicy,
}

impl DownloadOptions {
    /// Resolve options for one download
    pub fn new(target_dir: &Path, only_audio: bool, quality: Quality, title: Option<&str>) -> Self {
        let title = title.filter(|t| !t.trim().is_empty());

        let (format, output_template, post_processor) = if only_audio {
            let format = if quality.is_highest() {
                "bestaudio"
            } else {
                "worstaudio"
            };
            let name = match title {
                Some(title) => format!("{title}.%(ext)s"),
                None => "%(title)s.%(ext)s".to_string(),
            };
            (
                format.to_string(),
                target_dir.join(name),
                PostProcessor::ExtractAudio {
                    codec: AUDIO_CODEC.to_string(),
                    quality_kbps: AUDIO_QUALITY_KBPS,
                },
            )
        } else {
            // Pin a single container so the provider cannot produce several outputs
            let format = if quality.is_highest() {
                "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]"
            } else {
                "worstvideo[ext=mp4]+worstaudio[ext=m4a]/worst[ext=mp4]"
            };
            let name = match title {
                Some(title) => format!("{title}.{VIDEO_CONTAINER}"),
                None => format!("%(title)s.{VIDEO_CONTAINER}"),
            };
            (
                format.to_string(),
                target_dir.join(name),
                PostProcessor::ConvertVideo {
                    container: VIDEO_CONTAINER.to_string(),
                },
            )
        };

        Self {
            format,
            output_template,
            post_processor,
            keep_video: false,
            write_subtitles: false,
            write_auto_subtitles: false,
            policy: FetchPolicy::default(),
        }
    }

    /// Resolve options for a task
    pub fn for_task(task: &Task) -> Self {
        Self::new(
            &task.target_dir,
            task.only_audio,
            task.quality,
            task.title.as_deref(),
        )
    }

    /// Whether these options extract audio
    pub fn is_audio(&self) -> bool {
        matches!(self.post_processor, PostProcessor::ExtractAudio { .. })
    }
}
