use crate::config::RunConfig;
use crate::crawler::{Fetch, SourceCrawler};
use crate::entity::{AggregatedResult, EntityReport, MetricRecord, Source};
use crate::pacing::Pacing;
use crate::progress::Progress;
use chrono::Utc;
use futures::FutureExt;
use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;
use std::{
	collections::{BTreeMap, HashMap},
	panic::AssertUnwindSafe,
	time::{Duration, Instant},
};

/// Crawls every entity of a run, one (entity, source) pair at a time.
pub struct Orchestrator<F: Fetch> {
	fetcher: F,
	base_urls: HashMap<Source, String>,
	shuffle: bool,
	retries: u32,
}

impl<F: Fetch> Orchestrator<F> {
	pub fn new(fetcher: F) -> Self {
		Orchestrator {
			fetcher,
			base_urls: HashMap::new(),
			shuffle: true,
			retries: 0,
		}
	}

	pub fn with_base_url(mut self, source: Source, base_url: impl Into<String>) -> Self {
		self.base_urls.insert(source, base_url.into());
		self
	}

	pub fn with_shuffle(mut self, shuffle: bool) -> Self {
		self.shuffle = shuffle;
		self
	}

	pub fn with_retries(mut self, retries: u32) -> Self {
		self.retries = retries;
		self
	}

	fn base_url(&self, source: Source) -> &str {
		self.base_urls
			.get(&source)
			.map(String::as_str)
			.unwrap_or_else(|| source.default_base_url())
	}

	pub async fn run(&self, config: RunConfig) -> AggregatedResult {
		let RunConfig {
			min_delay,
			max_delay,
			mode,
			mut entities,
		} = config;

		if self.shuffle {
			entities.shuffle(&mut rand::thread_rng());
		}

		let pacing = Pacing::from_secs(min_delay, max_delay);
		let mut progress = Progress::new(entities.len());
		let progress_bar = ProgressBar::new(entities.len() as u64);
		if let Ok(style) = ProgressStyle::default_bar().template(
			"{msg} {spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7}",
		) {
			progress_bar.set_style(style.progress_chars("##-"));
		}
		progress_bar.set_message(format!("Crawling {}", mode));

		let mut results: AggregatedResult = Vec::with_capacity(entities.len());
		let mut first_attempt = true;

		for entity in entities {
			let started = Instant::now();
			let mut metrics = BTreeMap::new();

			for (source, locator) in entity.sources() {
				if !first_attempt {
					pacing.pause().await;
				}
				first_attempt = false;

				let record = self.attempt(entity.name(), source, locator).await;
				metrics.insert(source, record);
			}

			if metrics.is_empty() {
				log::warn!("'{}' has no source configured - nothing crawled.", entity.name());
			}

			progress.record(started.elapsed());
			progress.log();
			progress_bar.inc(1);

			results.push(EntityReport {
				entity,
				crawled_at: Utc::now(),
				metrics,
			});
		}

		progress_bar.finish_with_message("Done");
		results
	}

	async fn attempt(&self, entity_name: &str, source: Source, locator: &str) -> MetricRecord {
		let crawler = SourceCrawler::new(&self.fetcher, source, self.base_url(source));
		let mut retries = 0;

		loop {
			let record = match AssertUnwindSafe(crawler.crawl(entity_name, locator))
				.catch_unwind()
				.await
			{
				Ok(record) => record,
				Err(_) => {
					log::error!(
						"Crawling {} for '{}' aborted unexpectedly.",
						source,
						entity_name
					);
					MetricRecord::failed(entity_name, source)
				}
			};

			if record.succeeded || retries >= self.retries {
				return record;
			}

			retries += 1;
			let backoff = Duration::from_secs(2 * u64::from(retries));
			log::warn!(
				"Retrying {} for '{}' in {} seconds ({}/{})",
				source,
				entity_name,
				backoff.as_secs(),
				retries,
				self.retries
			);
			tokio::time::sleep(backoff).await;
		}
	}
}
