//! Org chart: who reports to whom.
//!
//! Usernames are compared case-insensitively (plain lowercase folding) but
//! stored with the case they were authored in. Two entries that only differ
//! by case are rejected at construction, so every lookup has exactly one
//! answer.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{MeasureError, Result};

/// Fold a username into its lookup key.
pub fn fold(name: &str) -> String {
    name.to_lowercase()
}

struct OrgEntry {
    username: String,
    manager: String,
}

/// Immutable username → manager mapping with case-insensitive lookup.
pub struct OrgChart {
    entries: Vec<OrgEntry>,
    index: HashMap<String, usize>,
}

/// One record of the org data file. Fields other than `manager` are ignored.
#[derive(Deserialize)]
struct OrgRecord {
    manager: String,
}

impl OrgChart {
    /// Build from `(username, manager)` pairs, failing on case-insensitive
    /// key collisions.
    pub fn build<I, U, M>(raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = (U, M)>,
        U: Into<String>,
        M: Into<String>,
    {
        let mut entries = Vec::new();
        let mut index = HashMap::new();

        for (username, manager) in raw {
            let username = username.into();
            let key = fold(&username);
            if index.contains_key(&key) {
                return Err(MeasureError::DuplicateIdentity(username));
            }
            index.insert(key, entries.len());
            entries.push(OrgEntry {
                username,
                manager: manager.into(),
            });
        }

        Ok(Self { entries, index })
    }

    /// Load org data from a JSON (or `.toml`) file shaped as
    /// `{ "<username>": { "manager": "<username>" }, ... }`.
    /// A file with no entries counts as missing.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MeasureError::OrgDataMissing(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        let records = if is_toml {
            parse_toml(&content)
        } else {
            parse_json(&content)
        }
        .map_err(|reason| MeasureError::OrgData {
            path: path.to_path_buf(),
            reason,
        })?;
        if records.is_empty() {
            return Err(MeasureError::OrgDataMissing(path.to_path_buf()));
        }

        Self::build(records.into_iter().map(|(user, rec)| (user, rec.manager)))
    }

    /// Manager of `username`, if the user is in the chart.
    pub fn lookup(&self, username: &str) -> Option<&str> {
        self.index
            .get(&fold(username))
            .map(|&i| self.entries[i].manager.as_str())
    }

    pub fn contains(&self, username: &str) -> bool {
        self.index.contains_key(&fold(username))
    }

    /// All `(username, manager)` pairs in load order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.username.as_str(), e.manager.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// serde_json keeps the last value for a repeated key, so an exact duplicate
// collapses silently; only case variants can reach `build` as collisions.
fn parse_json(content: &str) -> std::result::Result<BTreeMap<String, OrgRecord>, String> {
    serde_json::from_str(content).map_err(|e| e.to_string())
}

fn parse_toml(content: &str) -> std::result::Result<BTreeMap<String, OrgRecord>, String> {
    toml::from_str(content).map_err(|e| e.to_string())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
