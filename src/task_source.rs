//! Building task lists from batch configuration files
//!
//! A batch file holds one `defaults` block and a list of `urls`; every URL becomes a
//! [`Task`] carrying those defaults. Loading never fails past this module: a missing
//! or malformed file is logged and produces an empty task list.

use crate::config::BatchConfig;
use crate::error::{Error, Result};
use crate::types::Task;
use std::path::Path;

/// Turn a parsed batch configuration into one task per URL
pub fn build_tasks(config: &BatchConfig) -> Vec<Task> {
    let defaults = config.defaults.clone().unwrap_or_default();

    config
        .urls
        .iter()
        .map(|url| Task::from_defaults(url.clone(), &defaults))
        .collect()
}

/// Parse a batch configuration from JSON text
pub fn parse_batch_config_json(text: &str) -> Result<BatchConfig> {
    Ok(serde_json::from_str(text)?)
}

/// Parse a batch configuration from TOML text
pub fn parse_batch_config_toml(text: &str) -> Result<BatchConfig> {
    Ok(toml::from_str(text)?)
}

/// Parse a batch configuration from YAML text
pub fn parse_batch_config_yaml(text: &str) -> Result<BatchConfig> {
    Ok(serde_yaml::from_str(text)?)
}

/// Load tasks from a JSON batch file, or an empty list if it cannot be loaded
pub fn load_tasks_from_json(path: impl AsRef<Path>) -> Vec<Task> {
    load_with(path.as_ref(), parse_batch_config_json)
}

/// Load tasks from a TOML batch file, or an empty list if it cannot be loaded
pub fn load_tasks_from_toml(path: impl AsRef<Path>) -> Vec<Task> {
    load_with(path.as_ref(), parse_batch_config_toml)
}

/// Load tasks from a YAML batch file, or an empty list if it cannot be loaded
pub fn load_tasks_from_yaml(path: impl AsRef<Path>) -> Vec<Task> {
    load_with(path.as_ref(), parse_batch_config_yaml)
}

/// Load tasks from a batch file, picking the format from the extension
///
/// `.toml` files are read as TOML and `.yaml`/`.yml` files as YAML; anything else is
/// read as JSON.
pub fn load_tasks(path: impl AsRef<Path>) -> Vec<Task> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

    match extension.as_deref() {
        Some("toml") => load_tasks_from_toml(path),
        Some("yaml" | "yml") => load_tasks_from_yaml(path),
        _ => load_tasks_from_json(path),
    }
}

fn load_with(path: &Path, parse: fn(&str) -> Result<BatchConfig>) -> Vec<Task> {
    match read_batch_config(path, parse) {
        Ok(config) => {
            let tasks = build_tasks(&config);
            tracing::info!(path = %path.display(), tasks = tasks.len(), "Loaded batch configuration");
            tasks
        }
        Err(e) => {
            tracing::error!(error = %e, "Could not load batch configuration");
            Vec::new()
        }
    }
}

fn read_batch_config(path: &Path, parse: fn(&str) -> Result<BatchConfig>) -> Result<BatchConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    parse(&text).map_err(|e| Error::ConfigLoad {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
