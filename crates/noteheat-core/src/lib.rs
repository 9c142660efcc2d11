//! # noteheat Core Library
//!
//! This library provides the core logic behind the noteheat activity
//! heatmap: it measures a vault of Markdown notes day by day and lays the
//! totals out as a GitHub-style calendar covering the last year. The
//! `noteheat` CLI is a thin presentation layer over the same library.
//!
//! ## Architecture
//!
//! - **Metrics**: folds a document corpus into a date-keyed histogram of word
//!   counts or completed tasks, with folder exclusions and frontmatter/code
//!   stripping
//! - **Layout**: turns the histogram into week columns chunked into rows that
//!   fit the available width, with intensity bands and axis labels
//! - **View**: request sequencing (last request wins), caching, resize
//!   handling and daily-note navigation for a presentation layer
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`MetricAggregator`]: corpus to [`MetricMap`]
//! - [`CalendarLayoutEngine`]: [`MetricMap`] to [`GridLayout`]
//! - [`HeatmapView`]: controller driven by a [`HeatmapPresenter`]
//! - [`CorpusProvider`]: trait for document stores
//! - [`Config`]: application configuration management

pub mod calendar;
pub mod corpus;
pub mod error;
pub mod layout;
pub mod metrics;
pub mod navigation;
pub mod request;
pub mod storage;
pub mod view;

pub use calendar::{Clock, FixedClock, SystemClock};
pub use corpus::{CorpusProvider, Document, FsCorpus, MemoryCorpus};
pub use error::{ConfigError, CoreError, CorpusError, Result, ValidationError};
pub use layout::{
    build_layout, render_text, CalendarLayoutEngine, DayAxis, DayCell, GridLayout, GridRow,
    Intensity, LayoutOptions, Palette, ThresholdSet, WeekColumn,
};
pub use metrics::{
    compute_metrics, AggregationConfig, AggregationReport, ExclusionRules, MetricAggregator,
    MetricMap, TrackingMode,
};
pub use navigation::{resolve_daily_note, DailyNoteSettings, NavigationOutcome};
pub use request::{RequestSequencer, RequestToken};
pub use storage::Config;
pub use view::{HeatmapPresenter, HeatmapView, LoadOutcome};
