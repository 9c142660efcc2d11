use clap::Args;
use noteheat_core::{FsCorpus, MetricAggregator};

use super::VaultArgs;

#[derive(Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub vault: VaultArgs,
    /// Maximum concurrent document reads
    #[arg(long)]
    pub concurrency: Option<usize>,
}

pub async fn run(args: ScanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.vault.config()?;
    let mut aggregation = config.aggregation();
    if let Some(n) = args.concurrency {
        aggregation.read_concurrency = n;
    }

    let corpus = FsCorpus::new(&args.vault.vault);
    let report = MetricAggregator::new(&aggregation).aggregate(&corpus).await?;

    println!("{}", serde_json::to_string_pretty(&report.metrics)?);
    eprintln!(
        "{} documents read, {} excluded, {} unreadable, {} days, {} {} total",
        report.documents_read,
        report.documents_excluded,
        report.read_failures.len(),
        report.metrics.len(),
        report.metrics.total(),
        aggregation.tracking_mode,
    );
    for path in &report.read_failures {
        eprintln!("  unreadable: {path}");
    }
    Ok(())
}
