//! Output path resolution
//!
//! A provider does not always say where the final file ended up (post-processing may
//! rename the extension), so the path is resolved from three sources in order, the
//! first non-empty one winning:
//!
//! 1. files the provider reported for this invocation
//! 2. every entry of the target directory, hidden ones included
//! 3. the provider's nominal filename, if a file of that name exists in the target
//!    directory
//!
//! Several candidates are narrowed down to the most recently modified one. The
//! directory listing makes this a heuristic: when two tasks write into the same
//! directory at the same time either may pick up the other's file. Callers that run
//! concurrent tasks against one directory should give every task an explicit title
//! (so the provider reports a distinct file) or use distinct target directories.
//! Leftover partial files (`*.part`) are candidates like any other entry.

use super::traits::FetchReport;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Resolve the single output file of a fetch
pub fn resolve_output(url: &str, report: &FetchReport, target_dir: &Path) -> Result<PathBuf> {
    resolve_with_listing(url, report, target_dir, list_entries)
}

/// [`resolve_output`] with the directory listing step supplied by the caller
fn resolve_with_listing(
    url: &str,
    report: &FetchReport,
    target_dir: &Path,
    list: impl FnOnce(&Path) -> Result<Vec<PathBuf>>,
) -> Result<PathBuf> {
    let mut candidates = report.produced_files.clone();

    if candidates.is_empty() {
        candidates = list(target_dir)?;
        if !candidates.is_empty() {
            tracing::debug!(
                url = %url,
                dir = %target_dir.display(),
                candidates = candidates.len(),
                "Provider reported no files, falling back to directory listing"
            );
        }
    }

    if candidates.is_empty()
        && let Some(path) = nominal_candidate(report, target_dir)
    {
        candidates.push(path);
    }

    match candidates.len() {
        0 => Err(Error::NoOutputFile {
            url: url.to_string(),
            target_dir: target_dir.to_path_buf(),
        }),
        1 => Ok(candidates.remove(0)),
        _ => Ok(most_recently_modified(candidates)),
    }
}

/// The nominal filename placed in `target_dir`, if such a file exists
///
/// yt-dlp prints the full output path, so only its final component is used.
fn nominal_candidate(report: &FetchReport, target_dir: &Path) -> Option<PathBuf> {
    let name = Path::new(report.nominal_filename.as_deref()?).file_name()?;
    let path = target_dir.join(name);
    path.exists().then_some(path)
}

/// Every entry of `dir`; a missing directory has no entries
fn list_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut paths = Vec::new();
    for entry in entries {
        paths.push(entry?.path());
    }
    Ok(paths)
}

fn most_recently_modified(candidates: Vec<PathBuf>) -> PathBuf {
    let mut newest: Option<(SystemTime, PathBuf)> = None;

    for path in candidates {
        // Unreadable metadata sorts last
        let modified = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let is_newer = newest.as_ref().is_none_or(|(best, _)| modified > *best);
        if is_newer {
            newest = Some((modified, path));
        }
    }

    newest.map(|(_, path)| path).unwrap_or_default()
}
