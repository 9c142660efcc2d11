//! In-memory corpus, for embedding hosts and tests.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{CorpusProvider, Document};
use crate::error::CorpusError;

#[derive(Debug, Clone)]
struct Entry {
    modified_at: DateTime<Utc>,
    content: String,
}

/// Documents held in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    entries: BTreeMap<String, Entry>,
    failing: BTreeSet<String>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document.
    pub fn insert(
        &mut self,
        path: impl Into<String>,
        modified_at: DateTime<Utc>,
        content: impl Into<String>,
    ) -> &mut Self {
        self.entries.insert(
            path.into(),
            Entry {
                modified_at,
                content: content.into(),
            },
        );
        self
    }

    /// Builder form of [`MemoryCorpus::insert`].
    pub fn with_document(
        mut self,
        path: impl Into<String>,
        modified_at: DateTime<Utc>,
        content: impl Into<String>,
    ) -> Self {
        self.insert(path, modified_at, content);
        self
    }

    /// Make reads of `path` fail while it stays listed.
    pub fn fail_reads_of(mut self, path: impl Into<String>) -> Self {
        self.failing.insert(path.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CorpusProvider for MemoryCorpus {
    async fn documents(&self) -> Result<Vec<Document>, CorpusError> {
        Ok(self
            .entries
            .iter()
            .map(|(path, entry)| Document::new(path.clone(), entry.modified_at))
            .collect())
    }

    async fn read(&self, document: &Document) -> Result<String, CorpusError> {
        if self.failing.contains(&document.path) {
            return Err(CorpusError::ReadFailed {
                path: document.path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "simulated read failure"),
            });
        }
        self.entries
            .get(&document.path)
            .map(|entry| entry.content.clone())
            .ok_or_else(|| CorpusError::NotFound(document.path.clone()))
    }

    async fn exists(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }
}
