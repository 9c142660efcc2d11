use clap::Subcommand;
use noteheat_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// Dot-separated key (e.g. "tracking_mode", "daily_notes.format")
        key: String,
    },
    /// Change one setting and save
    Set {
        key: String,
        value: String,
    },
    /// Change one color threshold and save
    Threshold {
        /// Intensity level, 1 to 4
        level: usize,
        /// Upper bound of that level
        value: String,
    },
    /// Print every setting as JSON
    List,
    /// Print the location of config.toml
    Path,
    /// Overwrite config.toml with the defaults
    Reset,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?
                .get(&key)
                .ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            Config::load()?.set(&key, &value)?;
            tracing::debug!(key, value, "setting saved");
            println!("ok");
        }
        ConfigAction::Threshold { level, value } => {
            let mut config = Config::load()?;
            config.set_threshold(level, &value)?;
            config.save()?;
            println!("{}", serde_json::to_string(&config.color_thresholds)?);
        }
        ConfigAction::List => {
            println!("{}", serde_json::to_string_pretty(&Config::load()?)?);
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
