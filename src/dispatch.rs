//! Runs targets against a resolved configuration.

use crate::config::{Config, Overrides, DEBUG_VARIABLES};
use crate::error::Error;
use crate::runner::Runner;
use crate::table::{self, Target};
use anyhow::{Context, Result};
use std::io::Write;
use tracing::{debug, info, info_span};

/// Command-line words split into targets and `VAR=value` overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub targets: Vec<Target>,
    pub overrides: Overrides,
}

impl Request {
    /// Parse the positional words. No targets means `help`.
    pub fn parse<S: AsRef<str>>(words: &[S]) -> Result<Self, Error> {
        let mut request = Request::default();
        for word in words.iter().map(AsRef::as_ref) {
            if Overrides::is_assignment(word) {
                request.overrides.apply(word)?;
            } else {
                request.targets.push(word.parse()?);
            }
        }
        if request.targets.is_empty() {
            request.targets.push(Target::Help);
        }
        Ok(request)
    }
}

/// Executes targets in order, stopping at the first failure
pub struct Dispatcher<'a, R: Runner, W: Write> {
    config: &'a Config,
    runner: R,
    out: W,
    json: bool,
}

impl<'a, R: Runner, W: Write> Dispatcher<'a, R, W> {
    pub fn new(config: &'a Config, runner: R, out: W) -> Self {
        Self {
            config,
            runner,
            out,
            json: false,
        }
    }

    /// Print `debug` output as JSON
    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn run_all(&mut self, targets: &[Target]) -> Result<()> {
        for target in targets {
            self.run(*target)?;
        }
        Ok(())
    }

    pub fn run(&mut self, target: Target) -> Result<()> {
        let span = info_span!("target", name = %target);
        let _guard = span.enter();

        match target {
            Target::Help => {
                write!(self.out, "{}", table::help_text())?;
            }
            Target::Print(var) => {
                writeln!(self.out, "{}", self.config.value(var))?;
            }
            Target::Debug => self.debug()?,
            Target::Venv => self.venv()?,
            composite if !composite.steps().is_empty() => {
                for step in composite.steps() {
                    self.run(*step)?;
                }
            }
            external => self.spawn_all(external)?,
        }
        Ok(())
    }

    fn debug(&mut self) -> Result<()> {
        if self.json {
            writeln!(self.out, "{}", serde_json::to_string_pretty(self.config)?)?;
            return Ok(());
        }
        for var in DEBUG_VARIABLES {
            writeln!(self.out, "{}={}", var, self.config.value(var))?;
        }
        Ok(())
    }

    fn venv(&mut self) -> Result<()> {
        let path = self.config.venv_path();
        if path.exists() {
            debug!(path = %path.display(), "environment exists, nothing to do");
            return Ok(());
        }
        info!(path = %path.display(), "creating environment");
        self.spawn_all(Target::Venv)
    }

    fn spawn_all(&mut self, target: Target) -> Result<()> {
        for invocation in target.plan(self.config) {
            self.runner
                .run(&invocation)
                .with_context(|| format!("[{}] failed", target))?;
        }
        Ok(())
    }

    pub fn into_parts(self) -> (R, W) {
        (self.runner, self.out)
    }
}
