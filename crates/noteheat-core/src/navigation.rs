//! Daily-note lookup for heatmap cells.
//!
//! A cell's date key is formatted with the daily-note filename pattern and
//! folder, then checked against the corpus.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::{self, parse_date_key};
use crate::corpus::CorpusProvider;
use crate::error::ValidationError;

pub const DEFAULT_DAILY_NOTE_FORMAT: &str = "YYYY-MM-DD";

/// Where daily notes live and how they are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyNoteSettings {
    /// Moment-style pattern, e.g. `YYYY-MM-DD` or `[Journal] dddd, MMMM Do YYYY`.
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub folder: String,
}

fn default_format() -> String {
    DEFAULT_DAILY_NOTE_FORMAT.into()
}

impl Default for DailyNoteSettings {
    fn default() -> Self {
        Self {
            format: default_format(),
            folder: String::new(),
        }
    }
}

/// Result of a cell click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationOutcome {
    Found { path: String },
    NotFound { date_key: String },
}

impl NavigationOutcome {
    /// Message to show the user when nothing was found.
    pub fn notice(&self) -> Option<String> {
        match self {
            NavigationOutcome::Found { .. } => None,
            NavigationOutcome::NotFound { date_key } => {
                Some(format!("No daily note found for {date_key}"))
            }
        }
    }
}

const TOKENS: [&str; 11] = [
    "YYYY", "MMMM", "dddd", "MMM", "ddd", "YY", "MM", "DD", "Do", "M", "D",
];

fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}

fn expand(token: &str, date: NaiveDate) -> String {
    let weekday = date.weekday().num_days_from_sunday();
    match token {
        "YYYY" => format!("{:04}", date.year()),
        "YY" => format!("{:02}", date.year().rem_euclid(100)),
        "MMMM" => calendar::month_name(date.month()).to_string(),
        "MMM" => calendar::month_abbrev(date.month()).to_string(),
        "MM" => format!("{:02}", date.month()),
        "M" => date.month().to_string(),
        "DD" => format!("{:02}", date.day()),
        "Do" => ordinal(date.day()),
        "D" => date.day().to_string(),
        "dddd" => calendar::weekday_name(weekday).to_string(),
        "ddd" => calendar::weekday_abbrev(weekday).to_string(),
        _ => token.to_string(),
    }
}

/// Format `date` with a moment-style pattern. Text inside `[...]` is copied
/// verbatim; unknown characters pass through.
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    let mut output = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;

    while let Some(ch) = rest.chars().next() {
        if ch == '[' {
            if let Some(end) = rest.find(']') {
                output.push_str(&rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }
        if let Some(token) = TOKENS.iter().find(|t| rest.starts_with(**t)) {
            output.push_str(&expand(token, date));
            rest = &rest[token.len()..];
            continue;
        }
        output.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    output
}

/// Corpus path of the daily note for `date_key`.
pub fn daily_note_path(
    date_key: &str,
    settings: &DailyNoteSettings,
) -> Result<String, ValidationError> {
    let date = parse_date_key(date_key)?;
    let pattern = if settings.format.trim().is_empty() {
        DEFAULT_DAILY_NOTE_FORMAT
    } else {
        settings.format.as_str()
    };
    let file_name = format_date(date, pattern);
    let folder = settings.folder.trim().trim_end_matches('/');

    Ok(if folder.is_empty() {
        format!("{file_name}.md")
    } else {
        format!("{folder}/{file_name}.md")
    })
}

/// Look up the daily note for `date_key` in `corpus`.
///
/// # Errors
///
/// Returns an error if `date_key` is not a valid `YYYY-MM-DD` date.
pub async fn resolve_daily_note<C>(
    corpus: &C,
    date_key: &str,
    settings: &DailyNoteSettings,
) -> Result<NavigationOutcome, ValidationError>
where
    C: CorpusProvider + ?Sized,
{
    let path = daily_note_path(date_key, settings)?;
    if corpus.exists(&path).await {
        Ok(NavigationOutcome::Found { path })
    } else {
        tracing::debug!(%path, "daily note missing");
        Ok(NavigationOutcome::NotFound {
            date_key: date_key.to_string(),
        })
    }
}
