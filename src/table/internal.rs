//! Internal implementation for the command table

use super::{Target, PRINT_PREFIX};
use crate::config::{Config, Variable};
use crate::runner::Invocation;

// =============================================================================
// Table
// =============================================================================

pub(super) struct Row {
    pub target: Target,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

pub(super) const TABLE: &[Row] = &[
    Row {
        target: Target::Help,
        name: "help",
        aliases: &[],
        description: "Show this help",
    },
    Row {
        target: Target::Debug,
        name: "debug",
        aliases: &[],
        description: "Print the resolved configuration",
    },
    Row {
        target: Target::Venv,
        name: "venv",
        aliases: &[],
        description: "Create the virtual environment if it does not exist",
    },
    Row {
        target: Target::Versions,
        name: "versions",
        aliases: &[],
        description: "Print Python, uv and project versions",
    },
    Row {
        target: Target::Lock,
        name: "lock",
        aliases: &[],
        description: "Lock dependencies",
    },
    Row {
        target: Target::LockUpgrade,
        name: "lock/upgrade",
        aliases: &["lock/up"],
        description: "Lock dependencies, upgrading to the newest compatible versions",
    },
    Row {
        target: Target::SyncDry,
        name: "sync/dry",
        aliases: &[],
        description: "Show what sync would install, without installing",
    },
    Row {
        target: Target::SyncDev,
        name: "sync",
        aliases: &["sync/dev"],
        description: "Install all dependencies, including extras and dev groups",
    },
    Row {
        target: Target::SyncProd,
        name: "sync/prod",
        aliases: &[],
        description: "Install production dependencies only",
    },
    Row {
        target: Target::Tree,
        name: "tree",
        aliases: &[],
        description: "Show the dependency tree with outdated markers",
    },
    Row {
        target: Target::List,
        name: "list",
        aliases: &[],
        description: "List installed packages",
    },
    Row {
        target: Target::Outdated,
        name: "outdated",
        aliases: &[],
        description: "List installed packages with newer versions available",
    },
    Row {
        target: Target::Package,
        name: "package",
        aliases: &["pkg"],
        description: "Build source and wheel distributions",
    },
    Row {
        target: Target::Dev,
        name: "dev",
        aliases: &[],
        description: "venv, then lock/upgrade, then sync/dev",
    },
];

pub(super) fn row(target: Target) -> Option<&'static Row> {
    TABLE.iter().find(|row| row.target == target)
}

pub(super) fn lookup(name: &str) -> Option<Target> {
    TABLE
        .iter()
        .find(|row| row.name == name || row.aliases.contains(&name))
        .map(|row| row.target)
}

// =============================================================================
// Plans
// =============================================================================

pub(super) fn plan(target: Target, config: &Config) -> Vec<Invocation> {
    let uv = || Invocation::new(&config.uv, &config.project_dir);

    match target {
        Target::Help | Target::Print(_) | Target::Debug | Target::Dev => vec![],
        Target::Venv => vec![uv()
            .arg("venv")
            .arg("--quiet")
            .arg("--python")
            .arg(&config.python_bin)
            .arg("--prompt")
            .arg(&config.venv_name)
            .arg(&config.venv_dir)
            .quiet()],
        Target::Versions => vec![
            Invocation::new(config.venv_interpreter(), &config.project_dir)
                .arg("--version")
                .quiet(),
            uv().arg("--version").quiet(),
            uv().arg("version").quiet(),
        ],
        Target::Lock => vec![uv().arg("lock")],
        Target::LockUpgrade => vec![uv().args(["lock", "--upgrade"])],
        Target::SyncDry => vec![uv().args(["sync", "--all-extras", "--dry-run"])],
        Target::SyncDev => vec![uv().args(["sync", "--all-extras"])],
        Target::SyncProd => vec![uv().args(["sync", "--no-dev"])],
        Target::Tree => vec![uv().args(["tree", "--outdated"])],
        Target::List => vec![uv().args(["pip", "list"])],
        Target::Outdated => vec![uv().args(["pip", "list", "--outdated"])],
        Target::Package => vec![uv().arg("build")],
    }
}

// =============================================================================
// Help
// =============================================================================

pub(super) fn help_text() -> String {
    let label = |row: &Row| {
        let mut names = vec![row.name];
        names.extend(row.aliases);
        names.join(", ")
    };
    let print_label = format!("{}<VAR>", PRINT_PREFIX);
    let width = TABLE
        .iter()
        .map(|row| label(row).len())
        .chain(std::iter::once(print_label.len()))
        .max()
        .unwrap_or(0);

    let mut text = String::new();
    text.push_str("Usage: uvtask [OPTIONS] [TARGET | VAR=value]...\n\n");
    text.push_str("Targets:\n");
    for row in TABLE {
        text.push_str(&format!(
            "  {:<width$}  {}\n",
            label(row),
            row.description,
            width = width
        ));
    }
    text.push_str(&format!(
        "  {:<width$}  {}\n",
        print_label,
        "Print the value of a variable",
        width = width
    ));

    let vars: Vec<&str> = Variable::ALL.iter().map(|v| v.name()).collect();
    text.push_str(&format!("\nVariables: {}\n", vars.join(" ")));
    text
}
