//! Errors raised by uvtask itself.
//!
//! Failures of the delegated tools are never interpreted; they only carry the
//! child's exit status back to `main` through [`Error::ToolFailed`].

use std::path::PathBuf;
use thiserror::Error;

/// Exit status for errors that originate in uvtask rather than in a child.
pub const USAGE_EXIT_CODE: i32 = 2;

#[derive(Debug, Error)]
pub enum Error {
    #[error("No rule to make target '{0}'. Run 'uvtask help' for the list of targets")]
    UnknownTarget(String),

    #[error("Unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("Empty value for '{0}'; omit the assignment to use the default")]
    EmptyValue(String),

    #[error("Failed to start '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with status {code}")]
    ToolFailed { program: String, code: i32 },

    #[error("Failed to load settings from {}", path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Exit status the process should terminate with for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ToolFailed { code, .. } => *code,
            _ => USAGE_EXIT_CODE,
        }
    }
}

/// Map an `anyhow` error back to a process exit status.
pub fn exit_code_of(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<Error>()
        .map(Error::exit_code)
        .unwrap_or(USAGE_EXIT_CODE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failure_keeps_child_status() {
        let err = anyhow::Error::new(Error::ToolFailed {
            program: "uv".to_string(),
            code: 7,
        });
        assert_eq!(exit_code_of(&err), 7);
    }

    #[test]
    fn test_own_errors_use_usage_status() {
        let err = anyhow::Error::new(Error::UnknownTarget("deploy".to_string()));
        assert_eq!(exit_code_of(&err), USAGE_EXIT_CODE);

        let err = anyhow::anyhow!("something else");
        assert_eq!(exit_code_of(&err), USAGE_EXIT_CODE);
    }

    #[test]
    fn test_context_does_not_hide_status() {
        let err = anyhow::Error::new(Error::ToolFailed {
            program: "uv".to_string(),
            code: 3,
        })
        .context("target 'lock' failed");
        assert_eq!(exit_code_of(&err), 3);
    }
}
