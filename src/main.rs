mod activity;
mod classify;
mod cli;
mod config;
mod error;
mod github;
mod measure;
mod org;
mod ratio;
mod report;
mod team;

use std::error::Error;
use std::io;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, MeasureArgs};
use config::Config;

/// Environment variable a flag stands in for, and the flag's value.
fn override_for(args: &MeasureArgs, key: &str) -> Option<String> {
    match key {
        "REPOSITORY" => args.repository.clone(),
        "ORG_DATA" => args.org_data.as_ref().map(|p| p.display().to_string()),
        "OWNING_TEAM" => args.owning_team.clone(),
        "CHUNK_SIZE" => args.chunk_size.clone(),
        "OUTPUT_FILE" => args.output.as_ref().map(|p| p.display().to_string()),
        "REPORT_TITLE" => args.title.clone(),
        _ => None,
    }
}

fn run_measure(args: &MeasureArgs) -> Result<(), Box<dyn Error>> {
    config::load_dotenv()?;
    let config = Config::from_lookup(|key| {
        override_for(args, key).or_else(|| std::env::var(key).ok())
    })?;
    measure::run(&config, args.json)
}

fn log_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so `--json` output on stdout stays clean.
    let subscriber = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(log_filter(cli.log_level.as_deref()))
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || match cli.command {
        Commands::Measure { args } => run_measure(&args),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "innersource", &mut io::stdout());
            Ok(())
        }
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
