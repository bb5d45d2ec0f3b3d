//! Child process execution.
//!
//! Targets never build shell strings: each external step is an [`Invocation`]
//! (program plus argument list) handed to a [`Runner`].

use crate::error::Error;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::{debug, info};

/// One external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: PathBuf,
    /// Quiet invocations are not echoed before they run
    pub quiet: bool,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
            quiet: false,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Short program name for messages ("uv" rather than "/usr/local/bin/uv")
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .to_string()
    }
}

/// Renders the command line the way a shell user would type it
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", quote(&arg.to_string_lossy()))?;
        }
        Ok(())
    }
}

fn quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:+,@%".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Executes invocations one at a time
pub trait Runner {
    /// Run `invocation` to completion. A non-zero exit is an
    /// [`Error::ToolFailed`] carrying the child's status.
    fn run(&mut self, invocation: &Invocation) -> Result<(), Error>;
}

/// Spawns real child processes, inheriting stdio
pub struct ProcessRunner<W: Write> {
    echo: W,
}

impl ProcessRunner<std::io::Stdout> {
    pub fn new() -> Self {
        Self {
            echo: std::io::stdout(),
        }
    }
}

impl Default for ProcessRunner<std::io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ProcessRunner<W> {
    /// Runner that echoes command lines to `echo` instead of stdout
    pub fn with_echo(echo: W) -> Self {
        Self { echo }
    }
}

impl<W: Write> Runner for ProcessRunner<W> {
    fn run(&mut self, invocation: &Invocation) -> Result<(), Error> {
        if !invocation.quiet {
            // Echo failures must not stop the build
            let _ = writeln!(self.echo, "{}", invocation);
            let _ = self.echo.flush();
        }
        info!(command = %invocation, cwd = %invocation.cwd.display(), "running");

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .status()
            .map_err(|source| Error::Spawn {
                program: invocation.program_name(),
                source,
            })?;

        debug!(command = %invocation, %status, "finished");
        check_status(invocation, status)
    }
}

fn check_status(invocation: &Invocation, status: ExitStatus) -> Result<(), Error> {
    if status.success() {
        return Ok(());
    }
    Err(Error::ToolFailed {
        program: invocation.program_name(),
        code: exit_code(status),
    })
}

/// Exit status to propagate; signals map to 128+N on Unix like a shell
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

/// Prints command lines without running anything (`--dry-run`)
pub struct DryRunner<W: Write> {
    out: W,
}

impl DryRunner<std::io::Stdout> {
    pub fn new() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl Default for DryRunner<std::io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> DryRunner<W> {
    pub fn with_output(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Runner for DryRunner<W> {
    fn run(&mut self, invocation: &Invocation) -> Result<(), Error> {
        // Quiet only hides the echo of a real run; a dry run always shows it
        let _ = writeln!(self.out, "{}", invocation);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_only_when_needed() {
        let inv = Invocation::new("/usr/bin/uv", Path::new("."))
            .args(["venv", "--prompt", "my project"])
            .arg("it's");
        assert_eq!(
            inv.to_string(),
            r"/usr/bin/uv venv --prompt 'my project' 'it'\''s'"
        );
    }

    #[test]
    fn test_program_name_strips_directories() {
        let inv = Invocation::new("/usr/local/bin/uv", Path::new("."));
        assert_eq!(inv.program_name(), "uv");
        let inv = Invocation::new("uv", Path::new("."));
        assert_eq!(inv.program_name(), "uv");
    }

    #[test]
    fn test_dry_runner_prints_everything() {
        let mut runner = DryRunner::with_output(Vec::new());
        runner
            .run(&Invocation::new("uv", Path::new(".")).arg("lock"))
            .unwrap();
        runner
            .run(&Invocation::new("uv", Path::new(".")).arg("venv").quiet())
            .unwrap();

        let out = String::from_utf8(runner.into_inner()).unwrap();
        assert_eq!(out, "uv lock\nuv venv\n");
    }

    #[test]
    fn test_spawn_failure_is_typed() {
        let mut runner = ProcessRunner::with_echo(Vec::new());
        let err = runner
            .run(&Invocation::new("uvtask-no-such-program", Path::new(".")))
            .unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_is_propagated() {
        let mut runner = ProcessRunner::with_echo(Vec::new());
        let err = runner
            .run(&Invocation::new("sh", Path::new(".")).args(["-c", "exit 5"]))
            .unwrap_err();
        assert!(matches!(err, Error::ToolFailed { code: 5, .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_signal_maps_to_shell_status() {
        let mut runner = ProcessRunner::with_echo(Vec::new());
        let err = runner
            .run(&Invocation::new("sh", Path::new(".")).args(["-c", "kill -TERM $$"]))
            .unwrap_err();
        // SIGTERM is 15
        assert!(
            matches!(err, Error::ToolFailed { code: 143, .. }),
            "unexpected error: {:?}",
            err
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_quiet_invocations_are_not_echoed() {
        let mut runner = ProcessRunner::with_echo(Vec::new());
        runner
            .run(&Invocation::new("true", Path::new(".")).quiet())
            .unwrap();
        runner
            .run(&Invocation::new("true", Path::new(".")).arg("loud"))
            .unwrap();
        assert_eq!(String::from_utf8(runner.echo).unwrap(), "true loud\n");
    }
}
