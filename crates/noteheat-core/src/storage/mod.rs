mod config;

pub use config::{Config, ScanConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory.
///
/// `NOTEHEAT_HOME` wins when set. Otherwise `~/.config/noteheat[-dev]/`,
/// based on `NOTEHEAT_ENV` (set it to `dev` for the development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("NOTEHEAT_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("NOTEHEAT_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("noteheat-dev")
            } else {
                base_dir.join("noteheat")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DirUnavailable(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
