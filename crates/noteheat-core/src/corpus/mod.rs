//! Document corpus access.
//!
//! The aggregator never touches storage directly. It enumerates documents
//! and reads their content through a [`CorpusProvider`], which may fail per
//! document without failing the whole corpus.

mod fs;
mod memory;

pub use fs::FsCorpus;
pub use memory::MemoryCorpus;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CorpusError;

/// A document known to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// `/`-separated path relative to the corpus root.
    pub path: String,
    pub modified_at: DateTime<Utc>,
}

impl Document {
    pub fn new(path: impl Into<String>, modified_at: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            modified_at,
        }
    }
}

/// Every document store implements this trait.
#[async_trait]
pub trait CorpusProvider: Send + Sync {
    /// Enumerate every document. Failure here rejects the whole aggregation.
    async fn documents(&self) -> Result<Vec<Document>, CorpusError>;

    /// Read the text content of one document.
    async fn read(&self, document: &Document) -> Result<String, CorpusError>;

    /// Whether a document exists at `path`.
    async fn exists(&self, path: &str) -> bool;
}
