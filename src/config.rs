use crate::environment::HostProbe;
use crate::error::Error;
use crate::project::Settings;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

pub const DEFAULT_PYTHON_VERSION: &str = "3.12";
pub const DEFAULT_VENV_DIR: &str = ".venv";
pub const DEFAULT_UV: &str = "uv";
pub const DEFAULT_VERSION_MANAGER: &str = "pyenv";

/// Variables printed by `debug`, in output order
pub const DEBUG_VARIABLES: [Variable; 6] = [
    Variable::ProjectName,
    Variable::PythonVersion,
    Variable::PythonBin,
    Variable::VenvDir,
    Variable::VenvName,
    Variable::Uv,
];

/// Names a resolved configuration value, as used by `print-<VAR>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    ProjectName,
    PythonVersion,
    PythonPrefix,
    PythonBin,
    VenvDir,
    VenvName,
    VenvBin,
    Uv,
}

impl Variable {
    pub const ALL: [Variable; 8] = [
        Variable::ProjectName,
        Variable::PythonVersion,
        Variable::PythonPrefix,
        Variable::PythonBin,
        Variable::VenvDir,
        Variable::VenvName,
        Variable::VenvBin,
        Variable::Uv,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Variable::ProjectName => "PROJECTNAME",
            Variable::PythonVersion => "PYTHON_VERSION",
            Variable::PythonPrefix => "PYTHON_PREFIX",
            Variable::PythonBin => "PYTHON_BIN",
            Variable::VenvDir => "VENV_DIR",
            Variable::VenvName => "VENV_NAME",
            Variable::VenvBin => "VENV_BIN",
            Variable::Uv => "UV",
        }
    }

    /// Whether `VAR=value` on the command line may set this variable.
    /// Derived variables are always recomputed.
    pub fn overridable(self) -> bool {
        matches!(
            self,
            Variable::ProjectName | Variable::PythonVersion | Variable::VenvDir | Variable::Uv
        )
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variable::ALL
            .into_iter()
            .find(|var| var.name() == s)
            .ok_or_else(|| Error::UnknownVariable(s.to_string()))
    }
}

/// Make-style `VAR=value` assignments given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub project_name: Option<String>,
    pub python_version: Option<String>,
    pub venv_dir: Option<String>,
    pub uv: Option<String>,
}

impl Overrides {
    /// True if `word` looks like an assignment rather than a target name
    pub fn is_assignment(word: &str) -> bool {
        match word.split_once('=') {
            Some((name, _)) => {
                !name.is_empty()
                    && name
                        .chars()
                        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
            }
            None => false,
        }
    }

    /// Apply one `VAR=value` assignment
    pub fn apply(&mut self, assignment: &str) -> Result<(), Error> {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| Error::UnknownVariable(assignment.to_string()))?;

        let var: Variable = name.parse()?;
        let slot = match var {
            Variable::ProjectName => &mut self.project_name,
            Variable::PythonVersion => &mut self.python_version,
            Variable::VenvDir => &mut self.venv_dir,
            Variable::Uv => &mut self.uv,
            _ => return Err(Error::UnknownVariable(name.to_string())),
        };
        if value.trim().is_empty() {
            return Err(Error::EmptyValue(name.to_string()));
        }
        *slot = Some(value.to_string());
        Ok(())
    }
}

/// Configuration record, resolved once per run and shared by every target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Directory the tool runs in
    #[serde(skip)]
    pub project_dir: PathBuf,
    #[serde(rename = "PROJECTNAME")]
    pub project_name: String,
    #[serde(rename = "PYTHON_VERSION")]
    pub python_version: String,
    /// Empty when the version manager could not report a prefix
    #[serde(rename = "PYTHON_PREFIX")]
    pub python_prefix: String,
    #[serde(rename = "PYTHON_BIN")]
    pub python_bin: PathBuf,
    /// As configured; relative paths are relative to `project_dir`
    #[serde(rename = "VENV_DIR")]
    pub venv_dir: PathBuf,
    #[serde(rename = "VENV_NAME")]
    pub venv_name: String,
    #[serde(rename = "VENV_BIN")]
    pub venv_bin: PathBuf,
    #[serde(rename = "UV")]
    pub uv: PathBuf,
}

impl Config {
    /// Resolve every variable for `project_dir`.
    ///
    /// Precedence, lowest first: built-in defaults, `settings`, `overrides`.
    pub fn resolve(
        project_dir: &Path,
        settings: &Settings,
        overrides: &Overrides,
        probe: &dyn HostProbe,
    ) -> Result<Self> {
        let project_name = overrides
            .project_name
            .clone()
            .unwrap_or_else(|| directory_name(project_dir));

        let python_version = overrides
            .python_version
            .clone()
            .or_else(|| settings.python_version.clone())
            .unwrap_or_else(|| DEFAULT_PYTHON_VERSION.to_string());

        let version_manager = settings
            .version_manager
            .as_deref()
            .unwrap_or(DEFAULT_VERSION_MANAGER);
        let python_prefix = probe
            .interpreter_prefix(version_manager, &python_version)
            .unwrap_or_default();
        let python_bin = interpreter_in_prefix(&python_prefix, &python_version);

        let venv_raw = overrides
            .venv_dir
            .as_deref()
            .or(settings.venv_dir.as_deref())
            .unwrap_or(DEFAULT_VENV_DIR);
        let venv_dir = PathBuf::from(
            shellexpand::full(venv_raw)
                .with_context(|| format!("Failed to expand VENV_DIR '{}'", venv_raw))?
                .into_owned(),
        );
        let venv_name = format!("{}-{}", project_name, python_version);
        let venv_bin = interpreter_in_venv(&venv_dir);

        let uv_raw = overrides
            .uv
            .as_deref()
            .or(settings.uv.as_deref())
            .unwrap_or(DEFAULT_UV);
        let uv = locate_tool(uv_raw, probe);

        let config = Self {
            project_dir: project_dir.to_path_buf(),
            project_name,
            python_version,
            python_prefix,
            python_bin,
            venv_dir,
            venv_name,
            venv_bin,
            uv,
        };
        debug!(?config, "resolved configuration");
        Ok(config)
    }

    /// Resolved value of `var` as printed by `print-<VAR>`
    pub fn value(&self, var: Variable) -> String {
        match var {
            Variable::ProjectName => self.project_name.clone(),
            Variable::PythonVersion => self.python_version.clone(),
            Variable::PythonPrefix => self.python_prefix.clone(),
            Variable::PythonBin => self.python_bin.display().to_string(),
            Variable::VenvDir => self.venv_dir.display().to_string(),
            Variable::VenvName => self.venv_name.clone(),
            Variable::VenvBin => self.venv_bin.display().to_string(),
            Variable::Uv => self.uv.display().to_string(),
        }
    }

    /// Environment directory as an absolute-or-project-relative path
    pub fn venv_path(&self) -> PathBuf {
        self.project_dir.join(&self.venv_dir)
    }

    /// Interpreter inside the environment, anchored at the project directory
    pub fn venv_interpreter(&self) -> PathBuf {
        self.project_dir.join(&self.venv_bin)
    }
}

fn directory_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string())
}

fn interpreter_in_prefix(prefix: &str, version: &str) -> PathBuf {
    if prefix.is_empty() {
        return PathBuf::from(format!("python{}", version));
    }
    if cfg!(windows) {
        Path::new(prefix).join("python.exe")
    } else {
        Path::new(prefix).join("bin").join("python")
    }
}

fn interpreter_in_venv(venv_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        venv_dir.join("Scripts").join("python.exe")
    } else {
        venv_dir.join("bin").join("python")
    }
}

/// Explicit paths are kept as given; bare names are looked up on PATH and
/// fall back to the bare name so the spawn error names the missing program.
fn locate_tool(program: &str, probe: &dyn HostProbe) -> PathBuf {
    if program.contains(std::path::MAIN_SEPARATOR) || program.contains('/') {
        return PathBuf::from(program);
    }
    probe
        .locate(program)
        .unwrap_or_else(|| PathBuf::from(program))
}
