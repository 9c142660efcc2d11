//! Calendar heatmap layout.
//!
//! Turns a [`MetricMap`] into rows of week columns for a rolling one-year
//! window ending today. The number of weeks per row follows the available
//! width, so the same data reflows on every resize. Layout is a pure
//! function of its inputs: the reference date comes from the caller or from
//! a [`Clock`].

mod render;
mod thresholds;

pub use render::{render_text, Palette, Rgb, DEFAULT_ACCENT};
pub use thresholds::{Intensity, ThresholdSet};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::{self, Clock, SystemClock};
use crate::metrics::{MetricMap, TrackingMode};

/// Width of one week column: a 10px cell plus a 2px gap.
pub const WEEK_UNIT_WIDTH_PX: u32 = 12;
/// Width of the day-label axis when it is shown.
pub const DAY_AXIS_WIDTH_PX: u32 = 25;
/// Day-axis text, Sunday first.
pub const DAY_AXIS_LABELS: [&str; 7] = ["", "Mon", "", "Wed", "", "Fri", ""];

/// Display options read from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutOptions {
    pub thresholds: ThresholdSet,
    pub show_day_labels: bool,
    pub show_month_labels: bool,
    /// Only affects the accessible cell labels.
    pub tracking_mode: TrackingMode,
}

/// One day in a week column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub date_key: String,
    pub count: u64,
    pub intensity: Intensity,
    /// e.g. `2024-06-15: 3 words`
    pub label: String,
}

/// A Sunday-started week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekColumn {
    pub start: NaiveDate,
    pub month_label: Option<String>,
    /// Always 7 cells, Sunday first.
    pub days: Vec<DayCell>,
}

/// Left axis of a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAxis {
    /// Blank entry above the day labels, aligned with the month line.
    pub leading_spacer: bool,
    pub labels: Vec<String>,
}

impl DayAxis {
    fn new(leading_spacer: bool) -> Self {
        Self {
            leading_spacer,
            labels: DAY_AXIS_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Entries top to bottom, spacer included.
    pub fn entries(&self) -> Vec<&str> {
        let spacer = self.leading_spacer.then_some("");
        spacer
            .into_iter()
            .chain(self.labels.iter().map(String::as_str))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRow {
    pub day_axis: Option<DayAxis>,
    pub weeks: Vec<WeekColumn>,
}

/// Render-ready heatmap grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub today: NaiveDate,
    /// Sunday starting the first week.
    pub window_start: NaiveDate,
    pub weeks_per_row: usize,
    pub show_day_labels: bool,
    pub show_month_labels: bool,
    pub rows: Vec<GridRow>,
}

impl GridLayout {
    /// Every week column in chronological order.
    pub fn weeks(&self) -> impl Iterator<Item = &WeekColumn> {
        self.rows.iter().flat_map(|row| row.weeks.iter())
    }

    pub fn week_count(&self) -> usize {
        self.rows.iter().map(|row| row.weeks.len()).sum()
    }

    /// The cell for `date_key`, if it is inside the window.
    pub fn cell(&self, date_key: &str) -> Option<&DayCell> {
        self.weeks()
            .flat_map(|week| week.days.iter())
            .find(|cell| cell.date_key == date_key)
    }
}

/// Number of week columns that fit in one row; never 0.
pub fn weeks_per_row(viewport_width_px: u32, show_day_labels: bool) -> usize {
    let axis = if show_day_labels { DAY_AXIS_WIDTH_PX } else { 0 };
    let fit = viewport_width_px.saturating_sub(axis) / WEEK_UNIT_WIDTH_PX;
    (fit as usize).max(1)
}

/// Week starts from the week containing `today - 1 year` to the week
/// containing `today`.
pub fn window_weeks(today: NaiveDate) -> Vec<NaiveDate> {
    let mut weeks = Vec::with_capacity(54);
    let mut start = calendar::start_of_week(calendar::one_year_before(today));
    while start <= today {
        weeks.push(start);
        start += Duration::weeks(1);
    }
    weeks
}

fn cell_label(date_key: &str, count: u64, mode: TrackingMode) -> String {
    format!("{date_key}: {count} {mode}")
}

fn build_week(start: NaiveDate, metrics: &MetricMap, options: &LayoutOptions) -> Vec<DayCell> {
    (0..7)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let date_key = calendar::date_key(date);
            let count = metrics.get(&date_key);
            DayCell {
                date,
                intensity: options.thresholds.band(count),
                label: cell_label(&date_key, count, options.tracking_mode),
                date_key,
                count,
            }
        })
        .collect()
}

/// Lay out `metrics` for the year ending at `today`.
pub fn build_layout(
    metrics: &MetricMap,
    viewport_width_px: u32,
    options: &LayoutOptions,
    today: NaiveDate,
) -> GridLayout {
    let per_row = weeks_per_row(viewport_width_px, options.show_day_labels);
    let weeks = window_weeks(today);
    let window_start = weeks.first().copied().unwrap_or(today);

    // Persists across rows so a month split over a row break is labeled once.
    let mut last_labeled_month: Option<u32> = None;

    let rows = weeks
        .chunks(per_row)
        .map(|chunk| {
            let day_axis = options
                .show_day_labels
                .then(|| DayAxis::new(options.show_month_labels));

            let weeks = chunk
                .iter()
                .map(|&start| {
                    let month_label = if options.show_month_labels
                        && last_labeled_month != Some(start.month())
                    {
                        last_labeled_month = Some(start.month());
                        Some(calendar::month_abbrev(start.month()).to_string())
                    } else {
                        None
                    };

                    WeekColumn {
                        start,
                        month_label,
                        days: build_week(start, metrics, options),
                    }
                })
                .collect();

            GridRow { day_axis, weeks }
        })
        .collect();

    GridLayout {
        today,
        window_start,
        weeks_per_row: per_row,
        show_day_labels: options.show_day_labels,
        show_month_labels: options.show_month_labels,
        rows,
    }
}

/// Layout with an injectable reference date.
#[derive(Debug, Clone, Default)]
pub struct CalendarLayoutEngine<K: Clock = SystemClock> {
    clock: K,
}

impl<K: Clock> CalendarLayoutEngine<K> {
    pub fn with_clock(clock: K) -> Self {
        Self { clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn build(
        &self,
        metrics: &MetricMap,
        viewport_width_px: u32,
        options: &LayoutOptions,
    ) -> GridLayout {
        build_layout(metrics, viewport_width_px, options, self.clock.today())
    }
}

impl CalendarLayoutEngine<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn labeled() -> LayoutOptions {
        LayoutOptions {
            show_day_labels: true,
            show_month_labels: true,
            ..LayoutOptions::default()
        }
    }

    #[test]
    fn test_weeks_per_row() {
        assert_eq!(weeks_per_row(120, false), 10);
        assert_eq!(weeks_per_row(131, false), 10);
        assert_eq!(weeks_per_row(145, true), 10);
        assert_eq!(weeks_per_row(12, false), 1);
    }

    #[test]
    fn test_weeks_per_row_clamps_to_one() {
        assert_eq!(weeks_per_row(0, false), 1);
        assert_eq!(weeks_per_row(11, false), 1);
        // Narrower than the axis itself
        assert_eq!(weeks_per_row(10, true), 1);
    }

    #[test]
    fn test_window_bounds() {
        // Thursday 2024-06-20; a year earlier is Tuesday 2023-06-20
        let weeks = window_weeks(date(2024, 6, 20));
        assert_eq!(weeks.first(), Some(&date(2023, 6, 18)));
        assert_eq!(weeks.last(), Some(&date(2024, 6, 16)));
        assert_eq!(weeks.len(), 53);
        assert!(weeks.windows(2).all(|w| w[1] - w[0] == Duration::weeks(1)));
    }

    #[test]
    fn test_window_when_today_is_sunday() {
        let weeks = window_weeks(date(2024, 6, 16));
        assert_eq!(weeks.last(), Some(&date(2024, 6, 16)));
    }

    #[test]
    fn test_rows_partition_all_weeks() {
        let layout = build_layout(&MetricMap::new(), 10 * 12, &LayoutOptions::default(), date(2024, 6, 20));
        assert_eq!(layout.weeks_per_row, 10);
        assert_eq!(layout.rows.len(), 6);
        assert!(layout.rows[..5].iter().all(|r| r.weeks.len() == 10));
        assert_eq!(layout.rows[5].weeks.len(), 3);
        assert_eq!(layout.week_count(), 53);

        let starts: Vec<_> = layout.weeks().map(|w| w.start).collect();
        assert_eq!(starts, window_weeks(date(2024, 6, 20)));
    }

    #[test]
    fn test_single_week_rows_when_narrow() {
        let layout = build_layout(&MetricMap::new(), 3, &LayoutOptions::default(), date(2024, 6, 20));
        assert_eq!(layout.rows.len(), 53);
        assert!(layout.rows.iter().all(|r| r.weeks.len() == 1));
    }

    #[test]
    fn test_cells_carry_counts_and_bands() {
        let metrics: MetricMap = vec![
            ("2024-06-15".to_string(), 3),
            ("2024-06-17".to_string(), 5000),
        ]
        .into_iter()
        .collect();
        let layout = build_layout(&metrics, 800, &LayoutOptions::default(), date(2024, 6, 20));

        let cell = layout.cell("2024-06-15").unwrap();
        assert_eq!(cell.count, 3);
        assert_eq!(cell.intensity, Intensity::Low);
        assert_eq!(cell.label, "2024-06-15: 3 words");

        assert_eq!(layout.cell("2024-06-17").unwrap().intensity, Intensity::Extreme);
        assert_eq!(layout.cell("2024-06-18").unwrap().intensity, Intensity::Empty);
        assert!(layout.cell("2022-01-01").is_none());
    }

    #[test]
    fn test_week_has_seven_consecutive_days() {
        let layout = build_layout(&MetricMap::new(), 800, &LayoutOptions::default(), date(2024, 6, 20));
        for week in layout.weeks() {
            assert_eq!(week.days.len(), 7);
            assert_eq!(week.days[0].date, week.start);
            assert_eq!(week.days[0].date.weekday(), chrono::Weekday::Sun);
            assert_eq!(week.days[6].date, week.start + Duration::days(6));
        }
    }

    #[test]
    fn test_day_axis_spacer_follows_month_labels() {
        let layout = build_layout(&MetricMap::new(), 800, &labeled(), date(2024, 6, 20));
        let axis = layout.rows[0].day_axis.as_ref().unwrap();
        assert!(axis.leading_spacer);
        assert_eq!(axis.entries(), vec!["", "", "Mon", "", "Wed", "", "Fri", ""]);

        let days_only = LayoutOptions {
            show_day_labels: true,
            ..LayoutOptions::default()
        };
        let layout = build_layout(&MetricMap::new(), 800, &days_only, date(2024, 6, 20));
        let axis = layout.rows[0].day_axis.as_ref().unwrap();
        assert!(!axis.leading_spacer);
        assert_eq!(axis.entries().len(), 7);

        let none = build_layout(&MetricMap::new(), 800, &LayoutOptions::default(), date(2024, 6, 20));
        assert!(none.rows.iter().all(|r| r.day_axis.is_none()));
    }

    #[test]
    fn test_month_labels_once_per_run() {
        let layout = build_layout(&MetricMap::new(), 800, &labeled(), date(2024, 6, 20));
        let labels: Vec<_> = layout
            .weeks()
            .filter_map(|w| w.month_label.clone())
            .collect();
        assert_eq!(
            labels,
            vec!["Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec", "Jan", "Feb", "Mar", "Apr", "May", "Jun"]
        );
        // First week of the window always gets a label
        assert_eq!(layout.rows[0].weeks[0].month_label.as_deref(), Some("Jun"));
    }

    #[test]
    fn test_month_labels_not_repeated_after_row_break() {
        // One week per row: every row break falls inside a month.
        let layout = build_layout(&MetricMap::new(), 1, &labeled(), date(2024, 6, 20));
        let labeled_weeks = layout.weeks().filter(|w| w.month_label.is_some()).count();
        assert_eq!(labeled_weeks, 13);

        let mut previous_month = None;
        for week in layout.weeks() {
            let changed = previous_month != Some(week.start.month());
            assert_eq!(week.month_label.is_some(), changed, "week {}", week.start);
            previous_month = Some(week.start.month());
        }
    }

    #[test]
    fn test_no_month_labels_when_disabled() {
        let layout = build_layout(&MetricMap::new(), 800, &LayoutOptions::default(), date(2024, 6, 20));
        assert!(layout.weeks().all(|w| w.month_label.is_none()));
    }

    #[test]
    fn test_task_mode_label() {
        let options = LayoutOptions {
            tracking_mode: TrackingMode::Tasks,
            ..LayoutOptions::default()
        };
        let layout = build_layout(&MetricMap::new(), 800, &options, date(2024, 6, 20));
        assert_eq!(layout.cell("2024-06-20").unwrap().label, "2024-06-20: 0 tasks");
    }

    #[test]
    fn test_engine_uses_clock() {
        let engine = CalendarLayoutEngine::with_clock(FixedClock(date(2024, 6, 20)));
        let layout = engine.build(&MetricMap::new(), 800, &LayoutOptions::default());
        assert_eq!(layout.today, date(2024, 6, 20));
        assert_eq!(layout.window_start, date(2023, 6, 18));
        assert_eq!(engine.build(&MetricMap::new(), 800, &LayoutOptions::default()), layout);
    }
}
