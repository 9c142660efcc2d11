use std::path::PathBuf;

use clap::Args;
use noteheat_core::{resolve_daily_note, Config, FsCorpus, NavigationOutcome};

#[derive(Args)]
pub struct OpenArgs {
    /// Vault root directory
    pub vault: PathBuf,
    /// Date key (YYYY-MM-DD)
    pub date: String,
    /// Print the note path instead of opening it
    #[arg(long)]
    pub print: bool,
}

pub async fn run(args: OpenArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let corpus = FsCorpus::new(&args.vault);

    match resolve_daily_note(&corpus, &args.date, &config.daily_notes).await? {
        NavigationOutcome::Found { path } => {
            let target = corpus.resolve(&path);
            if args.print {
                println!("{}", target.display());
            } else {
                tracing::debug!(path = %target.display(), "opening daily note");
                open::that(&target)?;
            }
        }
        outcome @ NavigationOutcome::NotFound { .. } => {
            if let Some(message) = outcome.notice() {
                println!("{message}");
            }
        }
    }
    Ok(())
}
