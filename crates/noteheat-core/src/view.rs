//! Heatmap view controller.
//!
//! [`HeatmapView`] sits between a presentation layer and the core. It runs
//! aggregations, keeps only the newest result, caches the metric map and
//! re-lays it out whenever the container is resized. Drawing is delegated to
//! a [`HeatmapPresenter`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::calendar::{Clock, SystemClock};
use crate::corpus::CorpusProvider;
use crate::error::ValidationError;
use crate::layout::{CalendarLayoutEngine, GridLayout};
use crate::metrics::{MetricAggregator, MetricMap};
use crate::navigation::{resolve_daily_note, NavigationOutcome};
use crate::request::{RequestSequencer, RequestToken};
use crate::storage::Config;

/// Horizontal padding inside the heatmap container.
pub const CONTAINER_PADDING_PX: u32 = 20;

/// Capabilities the presentation layer provides.
pub trait HeatmapPresenter: Send {
    /// Draw a freshly built layout, replacing whatever was shown.
    fn render(&mut self, layout: &GridLayout);

    /// An aggregation has started.
    fn show_loading(&mut self) {}

    /// Show a transient, user-visible message.
    fn notice(&mut self, message: &str);

    /// Open a corpus document.
    fn open_document(&mut self, path: &str);
}

/// What happened to one [`HeatmapView::load_data`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The result became the cached data and was rendered.
    Applied,
    /// A newer request was issued while this one ran; its result was dropped.
    Stale,
    /// Aggregation failed; previously cached data is untouched.
    Failed,
}

#[derive(Debug, Default)]
struct ViewState {
    metrics: Option<Arc<MetricMap>>,
    container_width: u32,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct HeatmapView<C, P, K = SystemClock>
where
    C: CorpusProvider,
    P: HeatmapPresenter,
    K: Clock,
{
    corpus: Arc<C>,
    presenter: Mutex<P>,
    engine: CalendarLayoutEngine<K>,
    sequencer: RequestSequencer,
    config: Mutex<Config>,
    state: Mutex<ViewState>,
}

impl<C, P> HeatmapView<C, P, SystemClock>
where
    C: CorpusProvider,
    P: HeatmapPresenter,
{
    pub fn new(corpus: Arc<C>, presenter: P, config: Config) -> Self {
        Self::with_clock(corpus, presenter, config, SystemClock)
    }
}

impl<C, P, K> HeatmapView<C, P, K>
where
    C: CorpusProvider,
    P: HeatmapPresenter,
    K: Clock,
{
    pub fn with_clock(corpus: Arc<C>, presenter: P, config: Config, clock: K) -> Self {
        Self {
            corpus,
            presenter: Mutex::new(presenter),
            engine: CalendarLayoutEngine::with_clock(clock),
            sequencer: RequestSequencer::new(),
            config: Mutex::new(config),
            state: Mutex::new(ViewState::default()),
        }
    }

    pub fn config(&self) -> Config {
        lock(&self.config).clone()
    }

    /// The metric map currently on screen, if any.
    pub fn cached_metrics(&self) -> Option<Arc<MetricMap>> {
        lock(&self.state).metrics.clone()
    }

    /// Run `f` against the presenter.
    pub fn with_presenter<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        f(&mut lock(&self.presenter))
    }

    /// Aggregate the corpus and render the result, unless a newer request
    /// has been issued in the meantime.
    pub async fn load_data(&self) -> LoadOutcome {
        let token = self.sequencer.issue();
        let aggregation = lock(&self.config).aggregation();
        tracing::debug!(generation = token.generation(), "heatmap request issued");

        lock(&self.presenter).show_loading();
        let result = MetricAggregator::new(&aggregation)
            .aggregate(self.corpus.as_ref())
            .await;

        if !self.sequencer.is_current(token) {
            tracing::debug!(generation = token.generation(), "dropping stale heatmap result");
            return LoadOutcome::Stale;
        }

        match result {
            Ok(report) => self.publish(token, report.metrics),
            Err(e) => {
                tracing::error!(error = %e, "heatmap update failed");
                lock(&self.presenter).notice(&format!("Failed to update heatmap: {e}"));
                LoadOutcome::Failed
            }
        }
    }

    /// Cache `metrics` and render them if `token` is still the newest
    /// request. The check happens under the cache lock, so a result that
    /// was superseded after aggregation finished is never stored.
    fn publish(&self, token: RequestToken, metrics: MetricMap) -> LoadOutcome {
        {
            let mut state = lock(&self.state);
            if !self.sequencer.is_current(token) {
                tracing::debug!(generation = token.generation(), "dropping stale heatmap result");
                return LoadOutcome::Stale;
            }
            state.metrics = Some(Arc::new(metrics));
        }
        self.regenerate();
        LoadOutcome::Applied
    }

    /// Record the new container width and reflow the cached data.
    pub fn on_resize(&self, container_width_px: u32) -> Option<GridLayout> {
        lock(&self.state).container_width = container_width_px;
        self.regenerate()
    }

    /// Lay out the cached metrics and hand them to the presenter. Does
    /// nothing until a load has been applied.
    pub fn regenerate(&self) -> Option<GridLayout> {
        let (metrics, width) = {
            let state = lock(&self.state);
            (state.metrics.clone()?, state.container_width)
        };
        let options = lock(&self.config).layout_options();
        let layout = self
            .engine
            .build(&metrics, width.saturating_sub(CONTAINER_PADDING_PX), &options);

        lock(&self.presenter).render(&layout);
        Some(layout)
    }

    /// Replace the settings and reload.
    pub async fn update_config(&self, config: Config) -> LoadOutcome {
        *lock(&self.config) = config;
        self.load_data().await
    }

    /// Handle a click on the cell for `date_key`. Returns `None` when click
    /// navigation is disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if `date_key` is not a valid date.
    pub async fn on_cell_click(
        &self,
        date_key: &str,
    ) -> Result<Option<NavigationOutcome>, ValidationError> {
        let (enabled, settings) = {
            let config = lock(&self.config);
            (config.daily_note_on_click, config.daily_notes.clone())
        };
        if !enabled {
            return Ok(None);
        }

        let outcome = resolve_daily_note(self.corpus.as_ref(), date_key, &settings).await?;
        {
            let mut presenter = lock(&self.presenter);
            match &outcome {
                NavigationOutcome::Found { path } => presenter.open_document(path),
                NavigationOutcome::NotFound { .. } => {
                    if let Some(message) = outcome.notice() {
                        presenter.notice(&message);
                    }
                }
            }
        }
        Ok(Some(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;
    use crate::corpus::MemoryCorpus;
    use chrono::{Local, NaiveDate, TimeZone, Utc};

    #[derive(Default)]
    struct Recorder {
        layouts: Vec<GridLayout>,
        notices: Vec<String>,
        opened: Vec<String>,
        loading: usize,
    }

    impl HeatmapPresenter for Recorder {
        fn render(&mut self, layout: &GridLayout) {
            self.layouts.push(layout.clone());
        }

        fn show_loading(&mut self) {
            self.loading += 1;
        }

        fn notice(&mut self, message: &str) {
            self.notices.push(message.to_string());
        }

        fn open_document(&mut self, path: &str) {
            self.opened.push(path.to_string());
        }
    }

    fn view(corpus: MemoryCorpus, config: Config) -> HeatmapView<MemoryCorpus, Recorder, FixedClock> {
        HeatmapView::with_clock(
            Arc::new(corpus),
            Recorder::default(),
            config,
            FixedClock(NaiveDate::from_ymd_opt(2024, 6, 20).unwrap()),
        )
    }

    fn corpus() -> MemoryCorpus {
        let noon = Local.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap().with_timezone(&Utc);
        MemoryCorpus::new()
            .with_document("Daily/2024-06-15.md", noon, "one two three")
            .with_document("Templates/daily.md", noon, "template words here")
    }

    #[test]
    fn test_regenerate_without_data_is_noop() {
        let view = view(MemoryCorpus::new(), Config::default());
        assert!(view.on_resize(800).is_none());
        view.with_presenter(|p| assert!(p.layouts.is_empty()));
    }

    #[tokio::test]
    async fn test_load_applies_and_renders() {
        let view = view(corpus(), Config::default());
        view.on_resize(12 * 60 + CONTAINER_PADDING_PX);

        assert_eq!(view.load_data().await, LoadOutcome::Applied);
        assert_eq!(view.cached_metrics().unwrap().get("2024-06-15"), 6);
        view.with_presenter(|p| {
            assert_eq!(p.loading, 1);
            assert_eq!(p.layouts.len(), 1);
            assert_eq!(p.layouts[0].weeks_per_row, 60);
        });
    }

    #[tokio::test]
    async fn test_resize_reflows_cached_data() {
        let view = view(corpus(), Config::default());
        view.load_data().await;

        let layout = view.on_resize(12 * 10 + CONTAINER_PADDING_PX).unwrap();
        assert_eq!(layout.weeks_per_row, 10);
        assert_eq!(layout.cell("2024-06-15").unwrap().count, 6);
        view.with_presenter(|p| assert_eq!(p.layouts.len(), 2));
    }

    #[test]
    fn test_superseded_result_is_not_published() {
        let view = view(MemoryCorpus::new(), Config::default());
        let older = view.sequencer.issue();
        let newer = view.sequencer.issue();

        let metrics = |count| [("2024-06-15".to_string(), count)].into_iter().collect::<MetricMap>();

        // The newer request finishes first; the older one arrives afterwards.
        assert_eq!(view.publish(newer, metrics(7)), LoadOutcome::Applied);
        assert_eq!(view.publish(older, metrics(1)), LoadOutcome::Stale);

        assert_eq!(view.cached_metrics().unwrap().get("2024-06-15"), 7);
        view.with_presenter(|p| assert_eq!(p.layouts.len(), 1));
    }

    #[test]
    fn test_publish_rechecks_after_newer_request_issued() {
        let view = view(MemoryCorpus::new(), Config::default());
        let token = view.sequencer.issue();
        // Superseded between the aggregation finishing and the publish.
        view.sequencer.issue();

        let metrics: MetricMap = [("2024-06-15".to_string(), 3)].into_iter().collect();
        assert_eq!(view.publish(token, metrics), LoadOutcome::Stale);
        assert!(view.cached_metrics().is_none());
    }

    #[tokio::test]
    async fn test_update_config_reloads() {
        let view = view(corpus(), Config::default());
        view.load_data().await;

        let mut config = Config::default();
        config.apply("excluded_folders", "Templates").unwrap();
        assert_eq!(view.update_config(config).await, LoadOutcome::Applied);
        assert_eq!(view.cached_metrics().unwrap().get("2024-06-15"), 3);
    }

    #[tokio::test]
    async fn test_cell_click_disabled_by_default() {
        let view = view(corpus(), Config::default());
        assert_eq!(view.on_cell_click("2024-06-15").await.unwrap(), None);
        view.with_presenter(|p| assert!(p.opened.is_empty() && p.notices.is_empty()));
    }

    #[tokio::test]
    async fn test_cell_click_opens_or_notifies() {
        let mut config = Config::default();
        config.apply("daily_note_on_click", "true").unwrap();
        config.apply("daily_notes.folder", "Daily").unwrap();
        let view = view(corpus(), config);

        let found = view.on_cell_click("2024-06-15").await.unwrap();
        assert!(matches!(found, Some(NavigationOutcome::Found { .. })));

        let missing = view.on_cell_click("2024-06-16").await.unwrap();
        assert!(matches!(missing, Some(NavigationOutcome::NotFound { .. })));

        assert!(view.on_cell_click("not-a-date").await.is_err());

        view.with_presenter(|p| {
            assert_eq!(p.opened, vec!["Daily/2024-06-15.md".to_string()]);
            assert_eq!(p.notices, vec!["No daily note found for 2024-06-16".to_string()]);
        });
    }
}
