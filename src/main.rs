use anyhow::{Context, Result};
use clap::Parser;
use metric_crawler::{
	init_logger, load_config, output, validate, CrawlMode, HttpFetcher, Orchestrator,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(about, version, author)]
struct Args {
	#[arg(short, long, default_value = "config.json")]
	config: PathBuf,

	#[arg(short, long, value_enum, default_value_t = CrawlMode::Locations)]
	mode: CrawlMode,

	#[arg(short, long, default_value = "data")]
	output_dir: PathBuf,

	#[arg(short, long, default_value_t = 0)]
	retries: u32,

	#[clap(long)]
	no_shuffle: bool,
}

// Main Function
#[tokio::main]
async fn main() -> Result<()> {
	init_logger();

	let args = Args::parse();

	let raw_config = load_config(&args.config)?;
	let config = validate(&raw_config, args.mode)
		.with_context(|| format!("invalid config {}", args.config.display()))?;
	log::info!("{}", config);

	let mode = config.mode;
	let fetcher = HttpFetcher::new()?;
	let orchestrator = Orchestrator::new(fetcher)
		.with_shuffle(!args.no_shuffle)
		.with_retries(args.retries);

	let results = orchestrator.run(config).await;

	let today = chrono::Local::now().date_naive();
	output::write_results(&results, &args.output_dir, mode, today)
		.context("failed to save crawled data")?;

	Ok(())
}
