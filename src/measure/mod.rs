//! Measurement pipeline: org chart → team boundary → activity → partition →
//! ratio → report.
//!
//! Every stage runs sequentially. Stream fetch errors abort the run and
//! nothing partial is written.

use std::error::Error;

use tracing::{debug, info, warn};

use crate::activity::{self, ActivityCounts, ActivitySource, Author, CommitLog};
use crate::classify::classify;
use crate::config::Config;
use crate::error::{MeasureError, Result};
use crate::github::GitHubClient;
use crate::org::OrgChart;
use crate::ratio;
use crate::report::{self, CollaborationReport};
use crate::team::{BoundaryOrigin, TeamBoundary};

/// Measure collaboration on the repository behind `source`.
///
/// With `roster` the team is taken as given; otherwise it is inferred from
/// the author of the oldest commit.
pub fn measure(
    source: &mut dyn ActivitySource,
    chart: &OrgChart,
    roster: Option<&[String]>,
    chunk_size: usize,
) -> Result<CollaborationReport> {
    info!("Using chunk size of {chunk_size} for data processing");

    info!("Fetching commits...");
    let commits = CommitLog::fetch(source.commits().as_mut(), chunk_size)?;
    info!("Found {} commits", commits.len());

    let team = match roster {
        Some(roster) => {
            info!("Using explicitly specified owning team: {roster:?}");
            TeamBoundary::explicit(roster.to_vec())
        }
        None => {
            info!("Analyzing first commit...");
            let author = match commits.oldest_author() {
                Some(Author::Login(login)) => login.clone(),
                Some(Author::Unknown) => return Err(MeasureError::UnattributedOldestCommit),
                None => return Err(MeasureError::EmptyCommitHistory),
            };
            TeamBoundary::infer(chart, &author)?
        }
    };

    info!("Analyzing all contributors in the repository...");
    let contributors = source.contributors()?;
    debug!("All contributors: {contributors:?}");
    let partition = classify(&contributors, chart, &team);
    info!(
        "{} team members and {} InnerSource contributors ({} not in org chart, {} bots excluded)",
        partition.team_members.len(),
        partition.innersource.len(),
        partition.unlisted.len(),
        partition.bots.len()
    );

    info!("Processing commits...");
    let commit_counts = commits.counts();
    debug!(
        "{} attributed commits from {} authors",
        commit_counts.total(),
        commit_counts.authors()
    );
    drop(commits);

    info!("Processing pull requests in chunks...");
    let pull_requests =
        activity::tally(source.pull_requests().as_mut(), chunk_size, "pull requests")?;

    info!("Processing issues in chunks...");
    let issues = activity::tally(source.issues().as_mut(), chunk_size, "issues")?;

    let counts = ActivityCounts {
        commits: commit_counts,
        pull_requests: pull_requests.counts,
        issues: issues.counts,
    };
    let totals = ratio::compute(&counts, &partition, &team);

    let (original_author, original_manager) = match team.origin() {
        BoundaryOrigin::Inferred { author, manager } => {
            (Some(author.clone()), Some(manager.clone()))
        }
        BoundaryOrigin::Explicit => (None, None),
    };

    Ok(CollaborationReport {
        repository: source.full_name().to_string(),
        ratio: totals.ratio,
        original_author,
        original_manager,
        team_explicit: team.is_explicit(),
        team_members: team.members().to_vec(),
        all_contributors: contributors,
        innersource_contributors: partition.innersource,
        innersource_counts: totals.innersource,
        team_counts: totals.team,
    })
}

/// Entry point for `innersource measure`: connect to GitHub, load the org
/// chart, measure, and write the report.
pub fn run(config: &Config, json: bool) -> std::result::Result<(), Box<dyn Error>> {
    info!("Starting innersource measurement...");

    let client = GitHubClient::connect(&config.api_url, &config.auth)?;
    info!(
        "Fetching repository data for {}/{}...",
        config.owner, config.repo
    );
    let mut repo = client.repository(&config.owner, &config.repo)?;
    info!("Repository {} found.", repo.full_name());

    info!("Reading in org data from {}...", config.org_data.display());
    let chart = OrgChart::load(&config.org_data)?;
    info!("Org data read successfully ({} entries).", chart.len());

    let report = match measure(
        &mut repo,
        &chart,
        config.owning_team.as_deref(),
        config.chunk_size,
    ) {
        Ok(report) => report,
        Err(
            err @ (MeasureError::AuthorNotInOrgChart(_) | MeasureError::UnattributedOldestCommit),
        ) => {
            warn!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    report::write_markdown(&report, &config.report_title, &config.output_file)?;
    info!(
        "InnerSource report written to {}",
        config.output_file.display()
    );

    if json {
        report::print_json(&report)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
