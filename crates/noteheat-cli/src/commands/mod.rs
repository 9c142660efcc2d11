pub mod completions;
pub mod config;
pub mod open;
pub mod render;
pub mod scan;

use noteheat_core::Config;

/// Vault options shared by the commands that read notes.
#[derive(clap::Args)]
pub struct VaultArgs {
    /// Vault root directory
    pub vault: std::path::PathBuf,
    /// What to count: "words" or "tasks"
    #[arg(long)]
    pub mode: Option<String>,
    /// Comma-separated folders to skip (replaces the configured list)
    #[arg(long)]
    pub exclude: Option<String>,
}

impl VaultArgs {
    /// Stored configuration with command-line overrides applied.
    pub fn config(&self) -> Result<Config, Box<dyn std::error::Error>> {
        let mut config = Config::load()?;
        if let Some(mode) = &self.mode {
            config.apply("tracking_mode", mode)?;
        }
        if let Some(exclude) = &self.exclude {
            config.excluded_folders = exclude.clone();
        }
        Ok(config)
    }
}
