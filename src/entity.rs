use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{collections::BTreeMap, fmt};

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Location {
	pub name: String,
	#[serde(rename = "wikipedia")]
	pub source_reference: String,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialMediaProfiles {
	pub instagram: Option<String>,
	pub facebook: Option<String>,
	pub youtube: Option<String>,
	pub tiktok: Option<String>,
}

impl SocialMediaProfiles {
	pub fn get(&self, source: Source) -> Option<&str> {
		match source {
			Source::Instagram => self.instagram.as_deref(),
			Source::Facebook => self.facebook.as_deref(),
			Source::Youtube => self.youtube.as_deref(),
			Source::Tiktok => self.tiktok.as_deref(),
			Source::Wikipedia => None,
		}
	}
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Team {
	pub name: String,
	pub sport: String,
	pub league: Option<String>,
	pub division: Option<String>,
	#[serde(rename = "location")]
	pub home_location: Option<String>,
	#[serde(rename = "social_media")]
	pub profiles: SocialMediaProfiles,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entity {
	Location(Location),
	Team(Team),
}

impl Entity {
	pub fn name(&self) -> &str {
		match self {
			Entity::Location(location) => &location.name,
			Entity::Team(team) => &team.name,
		}
	}

	/// Every source this entity has a locator for, in crawl order.
	pub fn sources(&self) -> Vec<(Source, &str)> {
		match self {
			Entity::Location(location) => {
				vec![(Source::Wikipedia, location.source_reference.as_str())]
			}
			Entity::Team(team) => Source::SOCIAL
				.iter()
				.filter_map(|&source| team.profiles.get(source).map(|locator| (source, locator)))
				.collect(),
		}
	}
}

impl fmt::Display for Entity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Entity::Location(location) => {
				write!(f, "{} ({})", location.name, location.source_reference)
			}
			Entity::Team(team) => write!(f, "{} [{}]", team.name, team.sport),
		}
	}
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Source {
	Wikipedia,
	Instagram,
	Facebook,
	Youtube,
	Tiktok,
}

impl Source {
	pub const SOCIAL: [Source; 4] = [
		Source::Instagram,
		Source::Facebook,
		Source::Youtube,
		Source::Tiktok,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Source::Wikipedia => "wikipedia",
			Source::Instagram => "instagram",
			Source::Facebook => "facebook",
			Source::Youtube => "youtube",
			Source::Tiktok => "tiktok",
		}
	}

	pub fn default_base_url(&self) -> &'static str {
		match self {
			Source::Wikipedia => "https://de.wikipedia.org/wiki/",
			Source::Instagram => "https://instagram.com/",
			Source::Facebook => "https://facebook.com/",
			Source::Youtube => "https://youtube.com/",
			Source::Tiktok => "https://tiktok.com/",
		}
	}

	// (key searched in the document, metric name in the record)
	pub fn metric_keys(&self) -> &'static [(&'static str, &'static str)] {
		match self {
			Source::Wikipedia => &[
				("Einwohner:", "population"),
				("Bevölkerungsdichte:", "population_density"),
			],
			Source::Instagram => &[("followers", "followers"), ("posts", "posts")],
			Source::Facebook | Source::Tiktok => {
				&[("followers", "followers"), ("likes", "likes")]
			}
			Source::Youtube => &[("subscribers", "subscribers"), ("videos", "videos")],
		}
	}
}

impl fmt::Display for Source {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MetricRecord {
	pub entity_name: String,
	pub source: Source,
	pub succeeded: bool,
	pub metrics: BTreeMap<String, u64>,
}

impl MetricRecord {
	pub fn succeeded(entity_name: &str, source: Source, metrics: BTreeMap<String, u64>) -> Self {
		MetricRecord {
			entity_name: entity_name.to_string(),
			source,
			succeeded: true,
			metrics,
		}
	}

	/// A failed attempt still reports every metric of the source, zeroed.
	pub fn failed(entity_name: &str, source: Source) -> Self {
		let metrics = source
			.metric_keys()
			.iter()
			.map(|(_, metric)| (metric.to_string(), 0))
			.collect();

		MetricRecord {
			entity_name: entity_name.to_string(),
			source,
			succeeded: false,
			metrics,
		}
	}
}

#[derive(Serialize, Debug, Clone)]
pub struct EntityReport {
	#[serde(flatten)]
	pub entity: Entity,
	pub crawled_at: DateTime<Utc>,
	pub metrics: BTreeMap<Source, MetricRecord>,
}

pub type AggregatedResult = Vec<EntityReport>;
