//! Activity ingestion: per-author counts for commits, pull requests and
//! issues, read through a chunked cursor.
//!
//! Pull requests and issues are reduced chunk by chunk and never retained,
//! so memory is bounded by the chunk size. Commits are kept in full because
//! the oldest one (last in the newest-first feed) seeds team inference.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::org::fold;

/// Who authored an activity item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Author {
    Login(String),
    /// No hosting account could be resolved (e.g. a commit email that is
    /// not linked to any user).
    Unknown,
}

impl Author {
    pub fn login(&self) -> Option<&str> {
        match self {
            Author::Login(name) => Some(name.as_str()),
            Author::Unknown => None,
        }
    }
}

impl From<Option<String>> for Author {
    fn from(login: Option<String>) -> Self {
        login.map_or(Author::Unknown, Author::Login)
    }
}

/// One batch pulled from a cursor.
#[derive(Debug, Default)]
pub struct Chunk {
    pub items: Vec<Author>,
    pub has_more: bool,
}

/// A paginated activity stream, read `size` items at a time.
pub trait ActivityCursor {
    fn next_chunk(&mut self, size: usize) -> Result<Chunk>;
}

/// A repository's activity as seen by the measurement pipeline.
pub trait ActivitySource {
    /// Display name of the repository (e.g. `owner/repo`).
    fn full_name(&self) -> &str;

    /// Every contributor login, in the order the host lists them.
    fn contributors(&mut self) -> Result<Vec<String>>;

    /// Commits, newest first.
    fn commits(&mut self) -> Box<dyn ActivityCursor + '_>;

    fn pull_requests(&mut self) -> Box<dyn ActivityCursor + '_>;

    fn issues(&mut self) -> Box<dyn ActivityCursor + '_>;
}

/// Per-author item counts for one activity kind, keyed by folded login so
/// lookups match the org chart and team boundary regardless of case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthorCounts(HashMap<String, usize>);

impl AuthorCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one item. Items without a resolvable author are skipped.
    pub fn record(&mut self, author: &Author) {
        if let Some(login) = author.login() {
            *self.0.entry(fold(login)).or_insert(0) += 1;
        }
    }

    /// Count for `login` in any case, zero if never seen.
    pub fn get(&self, login: &str) -> usize {
        self.0.get(&fold(login)).copied().unwrap_or(0)
    }

    /// Number of distinct authors.
    pub fn authors(&self) -> usize {
        self.0.len()
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }
}

impl<'a> FromIterator<&'a Author> for AuthorCounts {
    fn from_iter<I: IntoIterator<Item = &'a Author>>(iter: I) -> Self {
        let mut counts = Self::new();
        for author in iter {
            counts.record(author);
        }
        counts
    }
}

/// Counts for a stream plus how many items were read.
#[derive(Debug, Default)]
pub struct Tally {
    pub counts: AuthorCounts,
    pub items: usize,
}

/// The full, newest-first commit history.
#[derive(Debug, Default)]
pub struct CommitLog {
    commits: Vec<Author>,
}

impl CommitLog {
    pub fn new(commits: Vec<Author>) -> Self {
        Self { commits }
    }

    /// Read every commit from the cursor, preserving feed order.
    pub fn fetch(cursor: &mut dyn ActivityCursor, chunk_size: usize) -> Result<Self> {
        let mut commits = Vec::new();
        drain(cursor, chunk_size, |chunk| commits.extend(chunk))?;
        Ok(Self::new(commits))
    }

    /// Author of the oldest commit: the last item of the feed.
    pub fn oldest_author(&self) -> Option<&Author> {
        self.commits.last()
    }

    pub fn counts(&self) -> AuthorCounts {
        self.commits.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }
}

/// Reduce a stream into per-author counts one chunk at a time.
pub fn tally(cursor: &mut dyn ActivityCursor, chunk_size: usize, kind: &str) -> Result<Tally> {
    let mut tally = Tally::default();
    drain(cursor, chunk_size, |chunk| {
        for author in &chunk {
            tally.counts.record(author);
        }
        tally.items += chunk.len();
        debug!("  Processed {} {kind} so far...", tally.items);
    })?;
    info!("Found and processed {} {kind}", tally.items);
    Ok(tally)
}

/// Pull chunks until the stream is exhausted: a short or empty chunk, or
/// the cursor reporting nothing more.
fn drain(
    cursor: &mut dyn ActivityCursor,
    chunk_size: usize,
    mut on_chunk: impl FnMut(Vec<Author>),
) -> Result<()> {
    let size = chunk_size.max(1);
    loop {
        let chunk = cursor.next_chunk(size)?;
        let received = chunk.items.len();
        if received == 0 {
            return Ok(());
        }
        on_chunk(chunk.items);
        if received < size || !chunk.has_more {
            return Ok(());
        }
    }
}

/// Counts for all three streams, kept separate.
#[derive(Debug, Default)]
pub struct ActivityCounts {
    pub commits: AuthorCounts,
    pub pull_requests: AuthorCounts,
    pub issues: AuthorCounts,
}

impl ActivityCounts {
    /// Commits + pull requests + issues for one login.
    pub fn total_for(&self, login: &str) -> usize {
        self.commits.get(login) + self.pull_requests.get(login) + self.issues.get(login)
    }
}

#[cfg(test)]
pub(crate) mod memory;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
