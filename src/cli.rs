//! CLI argument definitions for the `innersource` command.
//!
//! Settings come from environment variables (see `config`); the flags here
//! override them for a single run.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Top-level CLI parser with a single subcommand selector.
#[derive(Parser)]
#[command(
    name = "innersource",
    version,
    about = "Measure InnerSource collaboration on a GitHub repository"
)]
pub struct Cli {
    /// Log level filter (e.g. info, debug, warn). Overrides RUST_LOG.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Per-run overrides of the environment configuration.
#[derive(Args, Default)]
pub struct MeasureArgs {
    /// Repository to measure, as owner/repo (overrides REPOSITORY)
    #[arg(long)]
    pub repository: Option<String>,

    /// Org chart file mapping each username to its manager (overrides ORG_DATA)
    #[arg(long)]
    pub org_data: Option<PathBuf>,

    /// Comma-separated usernames that own the repository (overrides OWNING_TEAM)
    #[arg(long)]
    pub owning_team: Option<String>,

    /// Items per chunk when reading pull requests and issues (overrides CHUNK_SIZE)
    #[arg(long)]
    pub chunk_size: Option<String>,

    /// Markdown report file (overrides OUTPUT_FILE)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report title (overrides REPORT_TITLE)
    #[arg(long)]
    pub title: Option<String>,

    /// Also print the report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Measure the InnerSource contribution ratio of a repository
    #[command(long_about = "\
Measure the InnerSource contribution ratio of a repository.

The owning team is either given explicitly (OWNING_TEAM / --owning-team) or
inferred from the org chart: the author of the oldest commit, their manager,
and everyone who reports to that manager, directly or transitively.

Every contributor found in the org chart is then classified as a team member
or an InnerSource contributor (bots excluded). Commits, pull requests and
issues are counted per author and the ratio is:

  InnerSource contributions / (InnerSource + team contributions)

Environment (a .env file in the working directory is also read):
  GH_TOKEN            GitHub token (unless GitHub App credentials are set)
  GH_APP_ID           GitHub App ID
  GH_APP_INSTALLATION_ID
                      GitHub App installation ID
  GH_APP_PRIVATE_KEY  GitHub App private key (PEM)
  GITHUB_APP_ENTERPRISE_ONLY
                      true if the App lives on GH_ENTERPRISE_URL
  GH_ENTERPRISE_URL   GitHub Enterprise Server URL
  REPOSITORY          owner/repo (required)
  ORG_DATA            org chart file (default: org-data.json)
  OWNING_TEAM         comma-separated owning team
  CHUNK_SIZE          items per chunk (default: 100, minimum: 10)
  REPORT_TITLE        report title (default: InnerSource Report)
  OUTPUT_FILE         report file (default: innersource_report.md)

Examples:
  innersource measure
  innersource measure --repository octo/hello --owning-team alice,bob
  innersource measure --org-data org.toml --json")]
    Measure {
        #[command(flatten)]
        args: MeasureArgs,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}
