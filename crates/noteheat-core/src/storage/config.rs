//! TOML-based application configuration.
//!
//! Stores heatmap preferences including:
//! - Intensity thresholds and the custom base color
//! - Day/month axis labels
//! - Folder exclusions and the tracking mode
//! - Daily-note naming for click-through navigation
//!
//! Configuration is stored at `~/.config/noteheat/config.toml`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::layout::{LayoutOptions, Palette, ThresholdSet};
use crate::metrics::{AggregationConfig, TrackingMode, DEFAULT_READ_CONCURRENCY};
use crate::navigation::DailyNoteSettings;

/// Scan tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_read_concurrency")]
    pub read_concurrency: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/noteheat/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub color_thresholds: ThresholdSet,
    #[serde(default)]
    pub show_day_labels: bool,
    #[serde(default)]
    pub show_month_labels: bool,
    /// Open the daily note when a cell is clicked.
    #[serde(default)]
    pub daily_note_on_click: bool,
    /// Empty means the default accent.
    #[serde(default)]
    pub custom_color: String,
    /// Comma-separated folder list, e.g. `Templates, Assets/Images`.
    #[serde(default)]
    pub excluded_folders: String,
    #[serde(default)]
    pub tracking_mode: TrackingMode,
    #[serde(default)]
    pub daily_notes: DailyNoteSettings,
    #[serde(default)]
    pub scan: ScanConfig,
}

fn default_read_concurrency() -> usize {
    DEFAULT_READ_CONCURRENCY
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            read_concurrency: default_read_concurrency(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color_thresholds: ThresholdSet::default(),
            show_day_labels: false,
            show_month_labels: false,
            daily_note_on_click: false,
            custom_color: String::new(),
            excluded_folders: String::new(),
            tracking_mode: TrackingMode::Words,
            daily_notes: DailyNoteSettings::default(),
            scan: ScanConfig::default(),
        }
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

impl Config {
    fn child<'a>(value: &'a Value, part: &str) -> Option<&'a Value> {
        match value {
            Value::Object(map) => map.get(part),
            Value::Array(items) => items.get(part.parse::<usize>().ok()?),
            _ => None,
        }
    }

    fn child_mut<'a>(value: &'a mut Value, part: &str) -> Option<&'a mut Value> {
        match value {
            Value::Object(map) => map.get_mut(part),
            Value::Array(items) => items.get_mut(part.parse::<usize>().ok()?),
            _ => None,
        }
    }

    fn get_json_value_by_path<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
        if key.is_empty() {
            return None;
        }
        key.split('.')
            .try_fold(root, |current, part| Self::child(current, part))
    }

    /// Replace the value at `key`, parsed to match the type already there.
    fn set_json_value_by_path(root: &mut Value, key: &str, value: &str) -> Result<(), ConfigError> {
        if key.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }
        let target = key
            .split('.')
            .try_fold(root, |current, part| Self::child_mut(current, part))
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let new_value = match target {
            Value::Bool(_) => Value::Bool(
                value
                    .trim()
                    .parse::<bool>()
                    .map_err(|_| invalid(key, format!("cannot parse '{value}' as bool")))?,
            ),
            Value::Number(_) => Value::Number(
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| invalid(key, format!("cannot parse '{value}' as a whole number")))?
                    .into(),
            ),
            Value::Object(_) | Value::Array(_) => serde_json::from_str(value)
                .map_err(|e| invalid(key, e.to_string()))?,
            _ => Value::String(value.into()),
        };

        *target = new_value;
        Ok(())
    }

    /// `config.toml` inside the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be determined or created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if it does not exist.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// See [`Config::save`].
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    /// Array elements are addressed by index, e.g. `color_thresholds.0`.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match Self::get_json_value_by_path(&json, key)? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory. On any error `self` is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse
    /// as the field's type.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(key, e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(key, e.to_string()))?;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Update one intensity threshold (level 1 to 4) from user input.
    /// Non-numeric input is rejected and the previous value kept.
    ///
    /// # Errors
    ///
    /// Returns an error for a level outside 1..=4 or a non-numeric value.
    pub fn set_threshold(&mut self, level: usize, value: &str) -> Result<(), ConfigError> {
        let key = "color_thresholds";
        if !(1..=4).contains(&level) {
            return Err(invalid(key, format!("level must be 1 to 4, got {level}")));
        }
        let parsed = value
            .trim()
            .parse::<u64>()
            .map_err(|_| invalid(key, format!("level {level}: '{value}' is not a whole number")))?;
        self.color_thresholds.0[level - 1] = parsed;
        Ok(())
    }

    pub fn aggregation(&self) -> AggregationConfig {
        AggregationConfig {
            excluded_folders: self.excluded_folders.clone(),
            tracking_mode: self.tracking_mode,
            read_concurrency: self.scan.read_concurrency,
        }
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            thresholds: self.color_thresholds,
            show_day_labels: self.show_day_labels,
            show_month_labels: self.show_month_labels,
            tracking_mode: self.tracking_mode,
        }
    }

    pub fn palette(&self) -> Palette {
        Palette::from_custom_color(&self.custom_color)
    }
}
