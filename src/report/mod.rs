//! Collaboration report: the payload handed to the writers, plus the
//! markdown file and JSON outputs.

/// Markdown rendering of the report.
mod markdown;
/// Splitting oversized markdown files for issue bodies.
pub mod split;

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::ratio::AuthorTotal;

pub use markdown::render_markdown;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollaborationReport {
    pub repository: String,
    /// InnerSource share of all contributions, in `[0, 1]`.
    pub ratio: f64,
    pub original_author: Option<String>,
    pub original_manager: Option<String>,
    pub team_explicit: bool,
    pub team_members: Vec<String>,
    pub all_contributors: Vec<String>,
    pub innersource_contributors: Vec<String>,
    pub innersource_counts: Vec<AuthorTotal>,
    pub team_counts: Vec<AuthorTotal>,
}

/// Render the report to `path`, splitting it when it is too large to post
/// as an issue body.
pub fn write_markdown(report: &CollaborationReport, title: &str, path: &Path) -> Result<()> {
    fs::write(path, render_markdown(report, title))?;
    let parts = split::fit_issue_body(path, split::ISSUE_BODY_MAX_CHARS)?;
    if !parts.is_empty() {
        info!(
            "The markdown file is too large for a GitHub issue body and has been split into {} files; \
             the full report is kept in {}",
            parts.len(),
            split::full_path(path).display()
        );
    }
    Ok(())
}

pub fn print_json(report: &CollaborationReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
