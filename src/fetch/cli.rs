//! CLI-based fetcher using the external yt-dlp binary

use super::options::{DownloadOptions, PostProcessor};
use super::parser::{ExitStatus, FILE_MARKER, NAME_MARKER, parse_ytdlp_output};
use super::traits::{FetchReport, MediaFetcher};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// CLI-based fetcher that runs `yt-dlp` once per download
///
/// yt-dlp is asked to print the final path of every produced file (after
/// post-processing renames it) and the nominal filename, both prefixed with markers so
/// they can be picked out of the rest of its output.
///
/// # Examples
///
/// ```no_run
/// use media_batch_dl::fetch::YtDlpFetcher;
/// use std::path::PathBuf;
///
/// // Explicit binary
/// let fetcher = YtDlpFetcher::new(PathBuf::from("/usr/local/bin/yt-dlp"));
///
/// // Run the Python module instead of a standalone binary
/// let fetcher = YtDlpFetcher::new(PathBuf::from("python3"))
///     .with_leading_args(["-m", "yt_dlp"]);
///
/// // Or auto-discover from PATH
/// let fetcher = YtDlpFetcher::from_path().expect("yt-dlp not found in PATH");
/// ```
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    program: PathBuf,
    leading_args: Vec<OsString>,
    ffmpeg_location: Option<PathBuf>,
}

impl YtDlpFetcher {
    /// Create a fetcher with an explicit binary path
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            leading_args: Vec::new(),
            ffmpeg_location: None,
        }
    }

    /// Attempt to find yt-dlp in PATH
    ///
    /// # Returns
    ///
    /// `Some(YtDlpFetcher)` if the binary is found, `None` otherwise.
    pub fn from_path() -> Option<Self> {
        which::which("yt-dlp").ok().map(Self::new)
    }

    /// Arguments placed before the generated ones
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Forward an ffmpeg location to yt-dlp
    pub fn with_ffmpeg_location(mut self, path: PathBuf) -> Self {
        self.ffmpeg_location = Some(path);
        self
    }

    /// Program this fetcher runs
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Full argument list for one invocation
    pub fn build_args(&self, url: &str, options: &DownloadOptions) -> Vec<OsString> {
        let policy = &options.policy;
        let mut args = self.leading_args.clone();

        let mut push = |arg: &str| args.push(OsString::from(arg));

        push("--no-simulate");
        push("--no-progress");
        push("--print");
        push(&format!("before_dl:{NAME_MARKER}%(filename)s"));
        push("--print");
        push(&format!("after_move:{FILE_MARKER}%(filepath)s"));

        push("-f");
        push(&options.format);

        push("--retries");
        push(&policy.retries.to_string());
        push("--fragment-retries");
        push(&policy.fragment_retries.to_string());
        push("--socket-timeout");
        push(&policy.socket_timeout.as_secs().to_string());
        push(if policy.continue_partial {
            "--continue"
        } else {
            "--no-continue"
        });
        push(if policy.ignore_errors {
            "--ignore-errors"
        } else {
            "--abort-on-error"
        });

        push(if options.write_subtitles {
            "--write-subs"
        } else {
            "--no-write-subs"
        });
        push(if options.write_auto_subtitles {
            "--write-auto-subs"
        } else {
            "--no-write-auto-subs"
        });

        match &options.post_processor {
            PostProcessor::ExtractAudio {
                codec,
                quality_kbps,
            } => {
                push("--extract-audio");
                push("--audio-format");
                push(codec);
                push("--audio-quality");
                push(&format!("{quality_kbps}K"));
                push(if options.keep_video {
                    "--keep-video"
                } else {
                    "--no-keep-video"
                });
            }
            PostProcessor::ConvertVideo { container } => {
                push("--recode-video");
                push(container);
            }
        }

        args.push(OsString::from("-o"));
        args.push(options.output_template.clone().into_os_string());

        if let Some(ffmpeg) = &self.ffmpeg_location {
            args.push(OsString::from("--ffmpeg-location"));
            args.push(ffmpeg.clone().into_os_string());
        }

        // URLs starting with '-' must not be read as options
        args.push(OsString::from("--"));
        args.push(OsString::from(url));
        args
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    async fn extract_and_download(
        &self,
        url: &str,
        options: &DownloadOptions,
    ) -> crate::Result<FetchReport> {
        tracing::debug!(
            program = %self.program.display(),
            url = %url,
            format = %options.format,
            "Running yt-dlp"
        );

        let output = Command::new(&self.program)
            .args(self.build_args(url, options))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| crate::Error::ExternalTool(format!("Failed to execute yt-dlp: {}", e)))?;

        parse_ytdlp_output(
            url,
            &output.stdout,
            &output.stderr,
            ExitStatus::from(output.status.success()),
        )
    }

    fn name(&self) -> &'static str {
        "cli-yt-dlp"
    }
}
