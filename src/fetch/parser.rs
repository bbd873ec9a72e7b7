//! Parser for yt-dlp command output

use super::traits::FetchReport;
use std::path::PathBuf;

/// Prefix of the line yt-dlp prints for every file left after post-processing
pub(crate) const FILE_MARKER: &str = "mbdl-file ";
/// Prefix of the line yt-dlp prints with the nominal output filename
pub(crate) const NAME_MARKER: &str = "mbdl-name ";

/// Exit status of an external command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// The command exited successfully (exit code 0)
    Success,
    /// The command exited with a non-zero exit code
    Failure,
}

impl ExitStatus {
    /// Returns `true` if the exit status represents success
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<bool> for ExitStatus {
    fn from(success: bool) -> Self {
        if success {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// Parse the output of one yt-dlp invocation
///
/// Only marker-prefixed lines are interpreted; everything else yt-dlp prints is
/// ignored. A non-zero exit becomes [`Error::Fetch`](crate::Error::Fetch) carrying the
/// most relevant stderr line.
pub fn parse_ytdlp_output(
    url: &str,
    stdout: &[u8],
    stderr: &[u8],
    exit_status: ExitStatus,
) -> crate::Result<FetchReport> {
    if !exit_status.is_success() {
        let message = summarize_stderr(stderr)
            .unwrap_or_else(|| "yt-dlp exited with a non-zero status".to_string());
        return Err(crate::Error::Fetch {
            url: url.to_string(),
            message,
        });
    }

    let output = String::from_utf8_lossy(stdout);
    let mut report = FetchReport::default();

    for line in output.lines() {
        let line = line.trim_end_matches('\r');

        if let Some(path) = line.strip_prefix(FILE_MARKER)
            && !path.trim().is_empty()
        {
            let path = PathBuf::from(path.trim());
            if !report.produced_files.contains(&path) {
                report.produced_files.push(path);
            }
        } else if let Some(name) = line.strip_prefix(NAME_MARKER)
            && !name.trim().is_empty()
            && report.nominal_filename.is_none()
        {
            report.nominal_filename = Some(name.trim().to_string());
        }
    }

    Ok(report)
}

/// Pick the line that best explains a failure: the last `ERROR:` line, else the last
/// non-empty line.
fn summarize_stderr(stderr: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR"))
        .or_else(|| lines.last())
        .map(|l| l.to_string())
}
