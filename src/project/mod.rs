//! Project module - per-project settings
//!
//! Reads the optional `uvtask.toml` at the project root. Every key is
//! optional; missing keys keep the built-in defaults.
//!
//! # Example
//!
//! ```no_run
//! use uvtask::project;
//! use std::path::Path;
//!
//! let settings = project::load(Path::new("."))?;
//! if let Some(version) = &settings.python_version {
//!     println!("Pinned Python: {}", version);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ```toml
//! python_version = "3.11"
//! venv_dir = "~/.venvs/myproject"
//! uv = "/opt/uv/bin/uv"
//! version_manager = "pyenv"
//! ```

mod internal;

use anyhow::Result;
use std::path::Path;

pub use internal::Settings;

/// Load settings from `uvtask.toml`
///
/// Returns default (empty) settings if the file doesn't exist.
pub fn load(project_path: &Path) -> Result<Settings> {
    internal::load(project_path)
}
