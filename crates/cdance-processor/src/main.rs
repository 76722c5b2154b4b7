//! Choreography processor binary.

use anyhow::Context;
use clap::Parser;
use tracing::info;

use cdance_processor::{init_tracing, ChoreographyProcessor, Cli, ProcessorConfig};

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    info!("Starting cdance-processor");

    let config = ProcessorConfig::load_or_create(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?
        .with_env_overrides();
    let config = cli.apply(config);
    info!("Processor config: {:?}", config);

    let processor = ChoreographyProcessor::new(config).context("invalid configuration")?;
    let (_, path) = processor
        .process(&cli.request())
        .with_context(|| format!("processing {}", cli.input.display()))?;

    info!(output = %path.display(), "cdance-processor finished");
    Ok(())
}
