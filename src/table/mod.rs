//! Command table - maps target names to external invocations
//!
//! This module follows the dependable-rust pattern:
//! - Public interface (this file): `Target`, parsing, help text
//! - Internal implementation: the table rows and per-target plans in internal.rs
//!
//! # Example
//!
//! ```no_run
//! use uvtask::table::Target;
//!
//! let target: Target = "lock/up".parse()?;
//! assert_eq!(target, Target::LockUpgrade);
//! assert_eq!(target.name(), "lock/upgrade");
//! # Ok::<(), uvtask::Error>(())
//! ```

mod internal;

use crate::config::{Config, Variable};
use crate::error::Error;
use crate::runner::Invocation;
use std::fmt;
use std::str::FromStr;

/// Prefix of the generic variable-printing target
pub const PRINT_PREFIX: &str = "print-";

/// A named operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Help,
    Print(Variable),
    Debug,
    Venv,
    Versions,
    Lock,
    LockUpgrade,
    SyncDry,
    SyncDev,
    SyncProd,
    Tree,
    List,
    Outdated,
    Package,
    Dev,
}

impl Target {
    /// Canonical name (aliases resolve to this)
    pub fn name(&self) -> String {
        match self {
            Target::Print(var) => format!("{}{}", PRINT_PREFIX, var),
            other => internal::row(*other)
                .map(|row| row.name.to_string())
                .unwrap_or_default(),
        }
    }

    /// Targets that only write to stdout and never spawn a child
    pub fn is_builtin(&self) -> bool {
        matches!(self, Target::Help | Target::Print(_) | Target::Debug)
    }

    /// Component targets of a composite, in execution order.
    /// Non-composite targets return an empty list.
    pub fn steps(&self) -> &'static [Target] {
        match self {
            Target::Dev => &[Target::Venv, Target::LockUpgrade, Target::SyncDev],
            _ => &[],
        }
    }

    /// External invocations for this target.
    ///
    /// Empty for builtins and composites. `Venv` is planned unconditionally;
    /// the existence check happens at dispatch time.
    pub fn plan(&self, config: &Config) -> Vec<Invocation> {
        internal::plan(*self, config)
    }

    /// Every table target (no `print-<VAR>` entries), in help order
    pub fn all() -> impl Iterator<Item = Target> {
        internal::TABLE.iter().map(|row| row.target)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(var) = s.strip_prefix(PRINT_PREFIX) {
            return var.parse().map(Target::Print);
        }
        internal::lookup(s).ok_or_else(|| Error::UnknownTarget(s.to_string()))
    }
}

/// Usage text generated from the table
pub fn help_text() -> String {
    internal::help_text()
}
