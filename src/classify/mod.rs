//! Contributor classification: team members vs. InnerSource contributors.

use serde::Serialize;
use tracing::{debug, warn};

use crate::org::OrgChart;
use crate::team::TeamBoundary;

/// Marker GitHub appends to app/bot account logins.
pub const BOT_MARKER: &str = "[bot]";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ContributorPartition {
    /// Contributors on the owning team.
    pub team_members: Vec<String>,
    /// Contributors from outside the owning team.
    pub innersource: Vec<String>,
    /// Contributors missing from the org chart, left out of both lists.
    pub unlisted: Vec<String>,
    /// Bot accounts outside the team, left out of the InnerSource list.
    pub bots: Vec<String>,
}

pub fn is_bot(login: &str) -> bool {
    login.contains(BOT_MARKER)
}

/// Partition `contributors` against the org chart and team boundary.
pub fn classify(
    contributors: &[String],
    chart: &OrgChart,
    team: &TeamBoundary,
) -> ContributorPartition {
    let mut partition = ContributorPartition::default();

    for login in contributors {
        if !chart.contains(login) {
            warn!(
                "Contributor '{login}' not found in org chart. Excluding from InnerSource analysis."
            );
            partition.unlisted.push(login.clone());
        } else if team.contains(login) {
            partition.team_members.push(login.clone());
        } else if is_bot(login) {
            partition.bots.push(login.clone());
        } else {
            partition.innersource.push(login.clone());
        }
    }

    debug!("Innersource contributors: {:?}", partition.innersource);
    partition
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
