//! In-memory cursor for tests.

use std::collections::VecDeque;

use super::{ActivityCursor, Author, Chunk};
use crate::error::Result;

pub struct MemoryCursor {
    items: VecDeque<Author>,
    /// Size of every chunk handed out, one entry per `next_chunk` call.
    pub calls: Vec<usize>,
}

impl MemoryCursor {
    pub fn new(items: Vec<Author>) -> Self {
        Self {
            items: items.into(),
            calls: Vec::new(),
        }
    }

    pub fn logins(logins: &[&str]) -> Self {
        Self::new(logins.iter().map(|l| login(l)).collect())
    }
}

pub fn login(name: &str) -> Author {
    Author::Login(name.to_string())
}

impl ActivityCursor for MemoryCursor {
    fn next_chunk(&mut self, size: usize) -> Result<Chunk> {
        let take = size.min(self.items.len());
        let items: Vec<Author> = self.items.drain(..take).collect();
        self.calls.push(items.len());
        Ok(Chunk {
            items,
            has_more: !self.items.is_empty(),
        })
    }
}
