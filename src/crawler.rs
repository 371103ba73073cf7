use crate::entity::{MetricRecord, Source};
use crate::extract::{ButtonExtractor, MetricExtractor, TableExtractor};
use crate::user_agent::random_user_agent;
use async_trait::async_trait;
use scraper::Html;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
	#[error("request failed: {0}")]
	Transport(#[from] reqwest::Error),

	#[error("failed to retrieve '{url}'. Status code: {status}")]
	Status { url: String, status: u16 },
}

/// Fetches the raw document behind a URL.
#[async_trait]
pub trait Fetch: Send + Sync {
	async fn fetch(&self, url: &str, user_agent: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
	client: reqwest::Client,
}

impl HttpFetcher {
	pub fn new() -> Result<Self, FetchError> {
		let client = reqwest::Client::builder()
			.timeout(std::time::Duration::from_secs(60))
			.build()?;
		Ok(HttpFetcher { client })
	}
}

#[async_trait]
impl Fetch for HttpFetcher {
	async fn fetch(&self, url: &str, user_agent: &str) -> Result<String, FetchError> {
		let response = self
			.client
			.get(url)
			.header(reqwest::header::USER_AGENT, user_agent)
			.send()
			.await?;

		log::debug!("Received status {} from {}", response.status(), url);

		if !response.status().is_success() {
			return Err(FetchError::Status {
				url: url.to_string(),
				status: response.status().as_u16(),
			});
		}

		Ok(response.text().await?)
	}
}

impl Source {
	pub fn extractor(&self) -> &'static dyn MetricExtractor {
		match self {
			Source::Wikipedia => &TableExtractor,
			Source::Instagram | Source::Facebook | Source::Youtube | Source::Tiktok => {
				&ButtonExtractor
			}
		}
	}
}

/// Joins a configured locator onto the source's base URL, unless the locator
/// already is an absolute URL.
pub fn resolve_url(base_url: &str, locator: &str) -> String {
	let locator = locator.trim();
	if locator.starts_with("http://") || locator.starts_with("https://") {
		return locator.to_string();
	}

	format!(
		"{}/{}",
		base_url.trim_end_matches('/'),
		locator.trim_start_matches('/')
	)
}

/// Reads every metric of `source` out of an already fetched document.
pub fn extract_metrics(source: Source, body: &str) -> BTreeMap<String, u64> {
	let document = Html::parse_document(body);
	let extractor = source.extractor();

	source
		.metric_keys()
		.iter()
		.map(|(key, metric)| (metric.to_string(), extractor.extract(&document, key)))
		.collect()
}

pub struct SourceCrawler<'a, F: Fetch> {
	fetcher: &'a F,
	source: Source,
	base_url: &'a str,
}

impl<'a, F: Fetch> SourceCrawler<'a, F> {
	pub fn new(fetcher: &'a F, source: Source, base_url: &'a str) -> Self {
		SourceCrawler {
			fetcher,
			source,
			base_url,
		}
	}

	/// One attempt, no retries. Transport failures come back as a failed
	/// record with zeroed metrics.
	pub async fn crawl(&self, entity_name: &str, locator: &str) -> MetricRecord {
		let url = resolve_url(self.base_url, locator);
		let user_agent = random_user_agent();

		log::info!("Crawling data for '{}' from '{}'", entity_name, url);
		log::debug!("Using user agent: {}", user_agent);

		match self.fetcher.fetch(&url, user_agent).await {
			Ok(body) => {
				let record = MetricRecord::succeeded(
					entity_name,
					self.source,
					extract_metrics(self.source, &body),
				);
				log::info!("Result: {:?}", record.metrics);
				record
			}
			Err(e) => {
				log::error!(
					"Failed to crawl {} for '{}': {}",
					self.source,
					entity_name,
					e
				);
				MetricRecord::failed(entity_name, self.source)
			}
		}
	}
}
