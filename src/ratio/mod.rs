//! Collaboration ratio: InnerSource contributions over all contributions.

use serde::Serialize;
use tracing::{debug, info};

use crate::activity::ActivityCounts;
use crate::classify::ContributorPartition;
use crate::team::TeamBoundary;

/// Total contributions (commits + pull requests + issues) of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorTotal {
    pub author: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollaborationTotals {
    pub innersource: Vec<AuthorTotal>,
    /// One entry per roster member, including those with zero contributions.
    pub team: Vec<AuthorTotal>,
    pub ratio: f64,
}

/// Merge per-stream counts into per-user totals and compute the ratio.
/// The team side covers the whole roster, not only observed contributors.
pub fn compute(
    counts: &ActivityCounts,
    partition: &ContributorPartition,
    team: &TeamBoundary,
) -> CollaborationTotals {
    let innersource = totals(counts, &partition.innersource);
    let team = totals(counts, team.members());

    for t in &innersource {
        debug!("  {}: {} contributions", t.author, t.count);
    }
    for t in team.iter().filter(|t| t.count > 0) {
        debug!("  {}: {} contributions", t.author, t.count);
    }

    let ratio = ratio(sum(&innersource), sum(&team));
    info!("Innersource contribution ratio: {:.2}%", ratio * 100.0);

    CollaborationTotals {
        innersource,
        team,
        ratio,
    }
}

/// `inner / (inner + team)`, or exactly 0 when there is nothing to divide.
pub fn ratio(innersource: usize, team: usize) -> f64 {
    let total = innersource + team;
    if total == 0 {
        0.0
    } else {
        innersource as f64 / total as f64
    }
}

fn totals(counts: &ActivityCounts, users: &[String]) -> Vec<AuthorTotal> {
    users
        .iter()
        .map(|u| AuthorTotal {
            author: u.clone(),
            count: counts.total_for(u),
        })
        .collect()
}

fn sum(totals: &[AuthorTotal]) -> usize {
    totals.iter().map(|t| t.count).sum()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
