//! Internal implementation for project module
//!
//! Handles uvtask.toml - optional overrides for the configuration record.

use crate::error::Error;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const SETTINGS_FILE: &str = "uvtask.toml";

// =============================================================================
// Settings Types
// =============================================================================

/// Settings stored in uvtask.toml
/// All keys are optional; `None` means "use the built-in default"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Pinned interpreter version (e.g. "3.12")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python_version: Option<String>,
    /// Environment directory, relative to the project or absolute; `~` and `$VAR` expand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venv_dir: Option<String>,
    /// Dependency manager executable (name on PATH or a path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv: Option<String>,
    /// Version manager used to find the interpreter prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_manager: Option<String>,
}

// =============================================================================
// Path Functions
// =============================================================================

fn settings_path(project_path: &Path) -> PathBuf {
    project_path.join(SETTINGS_FILE)
}

// =============================================================================
// Load
// =============================================================================

pub fn load(project_path: &Path) -> Result<Settings> {
    let path = settings_path(project_path);

    if !path.exists() {
        debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(Settings::default());
    }

    let settings = read(&path).map_err(|source| Error::Settings {
        path: path.clone(),
        source: source.into(),
    })?;
    debug!(path = %path.display(), ?settings, "loaded settings");
    Ok(settings)
}

fn read(path: &Path) -> Result<Settings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}
