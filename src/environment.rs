//! Host lookups: binaries on `PATH` and interpreter prefixes from the
//! version manager.

use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Lookups against the machine uvtask runs on.
///
/// Resolution goes through this trait so the configuration record can be
/// built without touching the host in tests.
pub trait HostProbe {
    /// Locate `program` on the search path.
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Ask `version_manager` for the install prefix of `version`.
    fn interpreter_prefix(&self, version_manager: &str, version: &str) -> Option<String>;
}

/// Probe backed by the real `PATH` and child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl HostProbe for SystemProbe {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        match which::which(program) {
            Ok(path) => {
                debug!(program, path = %path.display(), "located on PATH");
                Some(path)
            }
            Err(e) => {
                debug!(program, error = %e, "not found on PATH");
                None
            }
        }
    }

    fn interpreter_prefix(&self, version_manager: &str, version: &str) -> Option<String> {
        let output = Command::new(version_manager)
            .args(["prefix", version])
            .output()
            .ok()?;

        if !output.status.success() {
            debug!(
                version_manager,
                version,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "version manager has no prefix"
            );
            return None;
        }

        first_line(&String::from_utf8_lossy(&output.stdout))
    }
}

/// First non-empty line of a command's output, trimmed.
fn first_line(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
