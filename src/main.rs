use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use uvtask::environment::SystemProbe;
use uvtask::runner::{DryRunner, ProcessRunner};
use uvtask::{error, logging, project, Config, Dispatcher, Request};

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Make-style targets for uv-managed Python projects", long_about = None)]
struct Cli {
    /// Targets to run in order, and VAR=value overrides (run 'uvtask help' for the list)
    #[arg(value_name = "TARGET | VAR=value")]
    words: Vec<String>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Print the commands that would run without running them
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Print `debug` output as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("uvtask: *** {:#}", err);
        std::process::exit(error::exit_code_of(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    let project_dir = match cli.directory {
        Some(dir) => dir
            .canonicalize()
            .with_context(|| format!("Failed to enter directory {}", dir.display()))?,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let request = Request::parse(cli.words.as_slice())?;
    let settings = project::load(&project_dir)?;
    let config = Config::resolve(&project_dir, &settings, &request.overrides, &SystemProbe)?;

    if cli.dry_run {
        Dispatcher::new(&config, DryRunner::new(), io::stdout())
            .json(cli.json)
            .run_all(&request.targets)
    } else {
        Dispatcher::new(&config, ProcessRunner::new(), io::stdout())
            .json(cli.json)
            .run_all(&request.targets)
    }
}
