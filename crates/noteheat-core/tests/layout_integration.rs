//! Integration tests for the calendar layout.
//!
//! This test file verifies:
//! - Row chunking for arbitrary widths
//! - Month labels across row boundaries
//! - Determinism for a fixed reference date
//! - Leap-day and year-boundary windows

use chrono::{Datelike, Duration, NaiveDate};
use noteheat_core::layout::{weeks_per_row, window_weeks, WEEK_UNIT_WIDTH_PX};
use noteheat_core::{
    build_layout, CalendarLayoutEngine, FixedClock, Intensity, LayoutOptions, MetricMap,
    ThresholdSet,
};
use proptest::prelude::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn all_labels() -> LayoutOptions {
    LayoutOptions {
        show_day_labels: true,
        show_month_labels: true,
        ..LayoutOptions::default()
    }
}

fn sample_metrics() -> MetricMap {
    vec![
        ("2024-01-03".to_string(), 50),
        ("2024-02-29".to_string(), 700),
        ("2024-06-15".to_string(), 3),
        ("2024-06-18".to_string(), 2500),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_layout_is_deterministic() {
    let engine = CalendarLayoutEngine::with_clock(FixedClock(date(2024, 6, 20)));
    let metrics = sample_metrics();

    let first = engine.build(&metrics, 333, &all_labels());
    let second = engine.build(&metrics, 333, &all_labels());
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_leap_day_today() {
    let layout = build_layout(&MetricMap::new(), 800, &LayoutOptions::default(), date(2024, 2, 29));
    // A year before is 2023-02-28 (Tuesday); its week starts 2023-02-26.
    assert_eq!(layout.window_start, date(2023, 2, 26));
    assert!(layout.cell("2024-02-29").is_some());
}

#[test]
fn test_window_crossing_new_year_labels() {
    let layout = build_layout(&MetricMap::new(), 12 * 7, &all_labels(), date(2025, 1, 10));
    let labels: Vec<_> = layout.weeks().filter_map(|w| w.month_label.as_deref()).collect();
    assert_eq!(labels.first(), Some(&"Jan"));
    assert_eq!(labels.last(), Some(&"Jan"));
    assert_eq!(labels.len(), 13);
}

#[test]
fn test_bands_follow_thresholds() {
    let options = LayoutOptions {
        thresholds: ThresholdSet::new([10, 100, 1000, 5000]),
        ..LayoutOptions::default()
    };
    let layout = build_layout(&sample_metrics(), 800, &options, date(2024, 6, 20));

    assert_eq!(layout.cell("2024-01-03").unwrap().intensity, Intensity::Moderate);
    assert_eq!(layout.cell("2024-02-29").unwrap().intensity, Intensity::High);
    assert_eq!(layout.cell("2024-06-15").unwrap().intensity, Intensity::Low);
    assert_eq!(layout.cell("2024-06-18").unwrap().intensity, Intensity::Extreme);
    assert_eq!(layout.cell("2024-06-19").unwrap().intensity, Intensity::Empty);
}

#[test]
fn test_day_axis_repeats_on_every_row() {
    let layout = build_layout(&MetricMap::new(), 25 + 12 * 20, &all_labels(), date(2024, 6, 20));
    assert_eq!(layout.weeks_per_row, 20);
    assert_eq!(layout.rows.len(), 3);
    for row in &layout.rows {
        let axis = row.day_axis.as_ref().unwrap();
        assert_eq!(axis.labels, vec!["", "Mon", "", "Wed", "", "Fri", ""]);
        assert!(axis.leading_spacer);
    }
}

proptest! {
    #[test]
    fn prop_rows_cover_window_in_order(
        width in 0u32..2000,
        day_labels in any::<bool>(),
        offset in 0i64..3000,
    ) {
        let today = date(2020, 1, 1) + Duration::days(offset);
        let options = LayoutOptions {
            show_day_labels: day_labels,
            ..LayoutOptions::default()
        };
        let layout = build_layout(&MetricMap::new(), width, &options, today);
        let per_row = weeks_per_row(width, day_labels);

        prop_assert!(per_row >= 1);
        prop_assert_eq!(layout.weeks_per_row, per_row);

        let starts: Vec<_> = layout.weeks().map(|w| w.start).collect();
        prop_assert_eq!(&starts, &window_weeks(today));
        prop_assert!(starts.len() == 53 || starts.len() == 54);

        let last = layout.rows.len() - 1;
        for (i, row) in layout.rows.iter().enumerate() {
            if i < last {
                prop_assert_eq!(row.weeks.len(), per_row);
            } else {
                prop_assert!(!row.weeks.is_empty() && row.weeks.len() <= per_row);
            }
        }
    }

    #[test]
    fn prop_month_label_once_per_run(width in 0u32..400, offset in 0i64..3000) {
        let today = date(2020, 1, 1) + Duration::days(offset);
        let layout = build_layout(&MetricMap::new(), width, &all_labels(), today);

        let mut previous = None;
        for week in layout.weeks() {
            let starts_run = previous != Some(week.start.month());
            prop_assert_eq!(week.month_label.is_some(), starts_run);
            if let Some(label) = &week.month_label {
                prop_assert_eq!(label.len(), 3);
            }
            previous = Some(week.start.month());
        }
    }

    #[test]
    fn prop_width_monotonic(width in 0u32..2000) {
        prop_assert!(weeks_per_row(width + WEEK_UNIT_WIDTH_PX, false) >= weeks_per_row(width, false));
    }
}
