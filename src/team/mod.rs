//! Team boundary: the set of usernames that own a repository.
//!
//! The roster is either configured explicitly or inferred from the author of
//! the oldest commit: that author, their manager, and everyone who reports
//! (directly or transitively) to the manager.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{MeasureError, Result};
use crate::org::{OrgChart, fold};

/// How the boundary was determined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BoundaryOrigin {
    Explicit,
    Inferred { author: String, manager: String },
}

#[derive(Debug, Clone)]
pub struct TeamBoundary {
    members: Vec<String>,
    keys: HashSet<String>,
    origin: BoundaryOrigin,
}

impl TeamBoundary {
    /// Use a configured roster as-is. No traversal happens.
    pub fn explicit(roster: Vec<String>) -> Self {
        let keys = roster.iter().map(|m| fold(m)).collect();
        Self {
            members: roster,
            keys,
            origin: BoundaryOrigin::Explicit,
        }
    }

    /// Infer the owning team from the oldest commit's author.
    pub fn infer(chart: &OrgChart, author: &str) -> Result<Self> {
        let manager = chart
            .lookup(author)
            .ok_or_else(|| MeasureError::AuthorNotInOrgChart(author.to_string()))?
            .to_string();
        info!("Original commit author: {author}, with manager: {manager}");

        let reports = reports_by_manager(chart);
        let mut boundary = Self {
            members: Vec::new(),
            keys: HashSet::new(),
            origin: BoundaryOrigin::Inferred {
                author: author.to_string(),
                manager: manager.clone(),
            },
        };

        // Breadth-first over "reports to": the closure of everyone below the
        // manager, seeded with the author and the manager themselves.
        let mut queue = VecDeque::new();
        for seed in [author, manager.as_str()] {
            if boundary.insert(seed) {
                queue.push_back(fold(seed));
            }
        }
        while let Some(key) = queue.pop_front() {
            let Some(direct) = reports.get(&key) else {
                continue;
            };
            for &user in direct {
                if boundary.insert(user) {
                    queue.push_back(fold(user));
                }
            }
        }

        debug!("Team members that own the repo: {:?}", boundary.members);
        Ok(boundary)
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, username: &str) -> bool {
        self.keys.contains(&fold(username))
    }

    pub fn origin(&self) -> &BoundaryOrigin {
        &self.origin
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self.origin, BoundaryOrigin::Explicit)
    }

    fn insert(&mut self, username: &str) -> bool {
        if self.keys.insert(fold(username)) {
            self.members.push(username.to_string());
            true
        } else {
            false
        }
    }
}

/// Manager key → direct reports, built once from the chart.
fn reports_by_manager(chart: &OrgChart) -> HashMap<String, Vec<&str>> {
    let mut reports: HashMap<String, Vec<&str>> = HashMap::new();
    for (user, manager) in chart.entries() {
        reports.entry(fold(manager)).or_default().push(user);
    }
    reports
}

/// Parse a comma-separated roster. Entries are trimmed and empty ones
/// dropped; `None` when nothing is left.
pub fn parse_roster(raw: &str) -> Option<Vec<String>> {
    let roster: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if roster.is_empty() {
        None
    } else {
        Some(roster)
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
