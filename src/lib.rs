pub mod checks;
pub mod config;
pub mod crawler;
pub mod entity;
pub mod extract;
pub mod orchestrator;
pub mod output;
pub mod pacing;
pub mod progress;
pub mod user_agent;

pub use config::{load_config, validate, ConfigError, CrawlMode, RawConfig, RunConfig};
pub use crawler::{Fetch, FetchError, HttpFetcher, SourceCrawler};
pub use entity::{AggregatedResult, Entity, EntityReport, MetricRecord, Source};
pub use orchestrator::Orchestrator;

/// Installs the logger, defaulting to `info` unless `RUST_LOG` says otherwise.
pub fn init_logger() {
	let mut builder = pretty_env_logger::formatted_timed_builder();
	builder.filter_level(log::LevelFilter::Info);
	if let Ok(filters) = std::env::var("RUST_LOG") {
		builder.parse_filters(&filters);
	}

	if builder.try_init().is_err() {
		log::warn!("Logger is already initialized.");
	}
}
