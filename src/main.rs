mod cli;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;
use trellis::config::Settings;
use trellis::error::{Result, TrellisError};
use trellis::registry::StageRegistry;

use cli::{dispatch, Cli};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "trellis=debug" } else { "trellis=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load()?;
    let registry = StageRegistry::from_settings(&settings)?;
    dispatch(cli.command, &settings, &registry)
}

fn report(err: &TrellisError) {
    eprintln!("{} {err}", "✗".red().bold());
    if let TrellisError::Incomplete { completed, .. } = err {
        eprintln!("{}", "Completed before the failure:".bold());
        for step in completed {
            eprintln!("  {} {step}", "✓".green());
        }
        eprintln!("{}", "Nothing was rolled back.".dimmed());
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        report(&err);
        std::process::exit(err.exit_code());
    }
}
