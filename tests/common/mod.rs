//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uvtask::environment::HostProbe;
use uvtask::project::Settings;
use uvtask::runner::{Invocation, Runner};
use uvtask::{Config, Error, Overrides};

/// Probe that knows nothing about the host
pub struct NoHost;

impl HostProbe for NoHost {
    fn locate(&self, _program: &str) -> Option<PathBuf> {
        None
    }

    fn interpreter_prefix(&self, _version_manager: &str, _version: &str) -> Option<String> {
        None
    }
}

/// Scratch project directory named `loanapp...`
pub fn project_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("loanapp")
        .tempdir()
        .unwrap()
}

pub fn config_for(dir: &Path) -> Config {
    Config::resolve(dir, &Settings::default(), &Overrides::default(), &NoHost).unwrap()
}

/// Records invocations instead of spawning them.
///
/// `uv venv ... <dir>` creates `<dir>` like the real tool would, and the
/// invocation at index `fail_at` (if any) fails with `fail_code`.
#[derive(Default)]
pub struct RecordingRunner {
    pub calls: Vec<Invocation>,
    pub fail_at: Option<usize>,
    pub fail_code: i32,
}

impl RecordingRunner {
    pub fn failing_at(index: usize, code: i32) -> Self {
        Self {
            fail_at: Some(index),
            fail_code: code,
            ..Default::default()
        }
    }

    /// First argument of every recorded call ("venv", "lock", ...)
    pub fn subcommands(&self) -> Vec<String> {
        self.calls
            .iter()
            .map(|inv| {
                inv.args
                    .first()
                    .map(|a| a.to_string_lossy().to_string())
                    .unwrap_or_default()
            })
            .collect()
    }
}

impl Runner for RecordingRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<(), Error> {
        let index = self.calls.len();
        self.calls.push(invocation.clone());

        if self.fail_at == Some(index) {
            return Err(Error::ToolFailed {
                program: invocation.program_name(),
                code: self.fail_code,
            });
        }

        if invocation.args.first().map(|a| a == "venv").unwrap_or(false) {
            if let Some(dir) = invocation.args.last() {
                fs::create_dir_all(invocation.cwd.join(dir)).unwrap();
            }
        }
        Ok(())
    }
}

/// Every path under `root`, sorted, relative to `root`
pub fn snapshot(root: &Path) -> Vec<PathBuf> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            out.push(path.strip_prefix(root).unwrap().to_path_buf());
            if path.is_dir() {
                walk(root, &path, out);
            }
        }
    }

    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}

/// Shell script standing in for `uv`: logs its arguments to `uv.log` in
/// `dir`, creates the directory named by the last argument of `venv`, and
/// exits with `fail_code` when its first argument is `fail_on`.
#[cfg(unix)]
pub fn fake_uv(dir: &Path, fail_on: Option<(&str, i32)>) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let log = dir.join("uv.log");
    let fail = match fail_on {
        Some((sub, code)) => format!("if [ \"$1\" = \"{}\" ]; then exit {}; fi\n", sub, code),
        None => String::new(),
    };
    let script = format!(
        "#!/bin/sh\n\
         echo \"$*\" >> '{log}'\n\
         {fail}\
         if [ \"$1\" = \"venv\" ]; then\n\
         \x20 for last; do :; done\n\
         \x20 mkdir -p \"$last\"\n\
         \x20 echo \"Creating virtual environment at: $last\"\n\
         fi\n",
        log = log.display(),
        fail = fail,
    );

    let path = dir.join("fake-uv");
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Lines logged by [`fake_uv`]
#[cfg(unix)]
pub fn uv_log(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("uv.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
