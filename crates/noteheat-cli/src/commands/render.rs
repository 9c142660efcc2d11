use std::sync::Arc;

use chrono::NaiveDate;
use clap::Args;
use noteheat_core::calendar::{self, Clock};
use noteheat_core::view::CONTAINER_PADDING_PX;
use noteheat_core::{
    render_text, FixedClock, FsCorpus, GridLayout, HeatmapPresenter, HeatmapView, LoadOutcome,
    Palette, SystemClock,
};

use super::VaultArgs;

#[derive(Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub vault: VaultArgs,
    /// Container width in pixels (12px per week column)
    #[arg(long, default_value_t = 720)]
    pub width: u32,
    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long, value_parser = parse_date)]
    pub today: Option<NaiveDate>,
    /// Color cells using the configured accent
    #[arg(long)]
    pub color: bool,
    /// Print the layout as JSON instead of drawing it
    #[arg(long)]
    pub json: bool,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    calendar::parse_date_key(value).map_err(|e| e.to_string())
}

/// Keeps the last drawing instead of writing to the terminal directly.
struct TerminalPresenter {
    palette: Option<Palette>,
    drawn: Option<GridLayout>,
    notices: Vec<String>,
}

impl HeatmapPresenter for TerminalPresenter {
    fn render(&mut self, layout: &GridLayout) {
        self.drawn = Some(layout.clone());
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn open_document(&mut self, path: &str) {
        tracing::debug!(path, "ignoring open request while rendering");
    }
}

pub async fn run(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.vault.config()?;
    let presenter = TerminalPresenter {
        palette: args.color.then(|| config.palette()),
        drawn: None,
        notices: Vec::new(),
    };
    let today = args.today.unwrap_or_else(|| SystemClock.today());
    let corpus = Arc::new(FsCorpus::new(&args.vault.vault));

    let view = HeatmapView::with_clock(corpus, presenter, config, FixedClock(today));
    view.on_resize(args.width.saturating_add(CONTAINER_PADDING_PX));

    if view.load_data().await != LoadOutcome::Applied {
        let message = view.with_presenter(|p| p.notices.join("\n"));
        return Err(message.into());
    }

    let output = view.with_presenter(|p| {
        p.drawn.as_ref().map(|layout| {
            if args.json {
                serde_json::to_string_pretty(layout)
            } else {
                Ok(render_text(layout, p.palette.as_ref()))
            }
        })
    });
    match output {
        Some(text) => print!("{}", text?),
        None => return Err("nothing to render".into()),
    }
    if args.json {
        println!();
    }
    Ok(())
}
