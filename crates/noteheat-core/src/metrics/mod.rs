//! Per-day activity metrics.
//!
//! This module folds a document corpus into a date-keyed histogram: each
//! non-excluded document is read, normalized, measured (words or completed
//! tasks) and added to the total for its local modification date.

mod content;
mod exclusion;

pub use content::{count_completed_tasks, count_words, measure, normalize};
pub use exclusion::ExclusionRules;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

use crate::calendar::local_date_key;
use crate::corpus::{CorpusProvider, Document};
use crate::error::{Result, ValidationError};

/// Default number of documents read at once.
pub const DEFAULT_READ_CONCURRENCY: usize = 8;

/// Which scalar is measured per document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingMode {
    #[default]
    Words,
    Tasks,
}

impl TrackingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingMode::Words => "words",
            TrackingMode::Tasks => "tasks",
        }
    }
}

impl fmt::Display for TrackingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackingMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "words" => Ok(TrackingMode::Words),
            "tasks" => Ok(TrackingMode::Tasks),
            other => Err(ValidationError::InvalidValue {
                field: "tracking_mode".into(),
                message: format!("expected 'words' or 'tasks', got '{other}'"),
            }),
        }
    }
}

/// Date key (`YYYY-MM-DD`) to total, ordered by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricMap(BTreeMap<String, u64>);

impl MetricMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the total for `date_key`, creating it at 0 if absent.
    pub fn add(&mut self, date_key: impl Into<String>, amount: u64) {
        *self.0.entry(date_key.into()).or_insert(0) += amount;
    }

    /// Total for `date_key`, 0 when there is none.
    pub fn get(&self, date_key: &str) -> u64 {
        self.0.get(date_key).copied().unwrap_or(0)
    }

    pub fn contains(&self, date_key: &str) -> bool {
        self.0.contains_key(date_key)
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, u64)> for MetricMap {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut map = MetricMap::new();
        for (key, amount) in iter {
            map.add(key, amount);
        }
        map
    }
}

/// Settings one aggregation run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationConfig {
    /// Comma-separated folder list.
    pub excluded_folders: String,
    pub tracking_mode: TrackingMode,
    pub read_concurrency: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            excluded_folders: String::new(),
            tracking_mode: TrackingMode::Words,
            read_concurrency: DEFAULT_READ_CONCURRENCY,
        }
    }
}

/// Metric map plus what happened while building it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationReport {
    pub metrics: MetricMap,
    pub documents_read: usize,
    pub documents_excluded: usize,
    /// Paths whose content could not be read; they contributed nothing.
    pub read_failures: Vec<String>,
}

/// Builds a [`MetricMap`] from a corpus.
#[derive(Debug, Clone)]
pub struct MetricAggregator {
    rules: ExclusionRules,
    mode: TrackingMode,
    concurrency: usize,
}

impl MetricAggregator {
    pub fn new(config: &AggregationConfig) -> Self {
        Self {
            rules: ExclusionRules::parse(&config.excluded_folders),
            mode: config.tracking_mode,
            concurrency: config.read_concurrency.max(1),
        }
    }

    pub fn rules(&self) -> &ExclusionRules {
        &self.rules
    }

    pub fn mode(&self) -> TrackingMode {
        self.mode
    }

    /// Aggregate the whole corpus.
    ///
    /// # Errors
    ///
    /// Returns an error only if the corpus cannot be enumerated. Individual
    /// read failures are logged and listed in the report.
    pub async fn aggregate<C>(&self, corpus: &C) -> Result<AggregationReport>
    where
        C: CorpusProvider + ?Sized,
    {
        let documents = corpus.documents().await?;
        let total = documents.len();

        let (included, excluded): (Vec<Document>, Vec<Document>) = documents
            .into_iter()
            .partition(|doc| !self.rules.excludes(&doc.path));

        let mode = self.mode;
        let mut reads = stream::iter(included)
            .map(|doc| async move {
                let outcome = corpus.read(&doc).await;
                (doc, outcome)
            })
            .buffer_unordered(self.concurrency);

        let mut report = AggregationReport {
            documents_excluded: excluded.len(),
            ..AggregationReport::default()
        };

        while let Some((doc, outcome)) = reads.next().await {
            match outcome {
                Ok(text) => {
                    report
                        .metrics
                        .add(local_date_key(doc.modified_at), measure(&text, mode));
                    report.documents_read += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %doc.path, error = %e, "skipping unreadable document");
                    report.read_failures.push(doc.path);
                }
            }
        }
        report.read_failures.sort();

        tracing::info!(
            documents = total,
            read = report.documents_read,
            excluded = report.documents_excluded,
            failed = report.read_failures.len(),
            days = report.metrics.len(),
            mode = %mode,
            "aggregation complete"
        );

        Ok(report)
    }

    /// Aggregate and keep only the metric map.
    ///
    /// # Errors
    ///
    /// Same as [`MetricAggregator::aggregate`].
    pub async fn compute_metrics<C>(&self, corpus: &C) -> Result<MetricMap>
    where
        C: CorpusProvider + ?Sized,
    {
        Ok(self.aggregate(corpus).await?.metrics)
    }
}

/// One-shot form of [`MetricAggregator::compute_metrics`].
///
/// # Errors
///
/// Returns an error if the corpus cannot be enumerated.
pub async fn compute_metrics<C>(corpus: &C, config: &AggregationConfig) -> Result<MetricMap>
where
    C: CorpusProvider + ?Sized,
{
    MetricAggregator::new(config).compute_metrics(corpus).await
}
