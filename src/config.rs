use crate::checks::{self, HomeCheck};
use crate::entity::{Entity, Location, SocialMediaProfiles, Team};
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read config {path}: {source}")]
	Read {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("malformed config: {0}")]
	Parse(#[from] serde_json::Error),

	#[error("{0} not found - crawling aborted")]
	MissingDelay(&'static str),

	#[error("min_delay_in_seconds ({min}) is greater than max_delay_in_seconds ({max}) - crawling aborted")]
	InvertedDelay { min: u64, max: u64 },

	#[error("no {0} found - crawling aborted")]
	NoEntities(CrawlMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CrawlMode {
	Locations,
	Teams,
}

impl CrawlMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			CrawlMode::Locations => "locations",
			CrawlMode::Teams => "teams",
		}
	}
}

impl fmt::Display for CrawlMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

// Raw records keep every field optional so a single bad entry can be skipped
// instead of failing the whole file.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RawLocation {
	pub name: Option<String>,
	#[serde(alias = "wikipedia_url")]
	pub wikipedia: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RawSocialMedia {
	pub instagram: Option<String>,
	pub facebook: Option<String>,
	pub youtube: Option<String>,
	pub tiktok: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RawTeam {
	pub name: Option<String>,
	pub sport: Option<String>,
	pub league: Option<String>,
	pub division: Option<String>,
	pub location: Option<String>,
	#[serde(default)]
	pub social_media: RawSocialMedia,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RawConfig {
	pub min_delay_in_seconds: Option<u64>,
	pub max_delay_in_seconds: Option<u64>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub locations: Vec<RawLocation>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub teams: Vec<RawTeam>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
	pub min_delay: u64,
	pub max_delay: u64,
	pub mode: CrawlMode,
	pub entities: Vec<Entity>,
}

impl RunConfig {
	pub fn to_raw(&self) -> RawConfig {
		let mut raw = RawConfig {
			min_delay_in_seconds: Some(self.min_delay),
			max_delay_in_seconds: Some(self.max_delay),
			..Default::default()
		};

		for entity in &self.entities {
			match entity {
				Entity::Location(location) => raw.locations.push(RawLocation {
					name: Some(location.name.clone()),
					wikipedia: Some(location.source_reference.clone()),
				}),
				Entity::Team(team) => raw.teams.push(RawTeam {
					name: Some(team.name.clone()),
					sport: Some(team.sport.clone()),
					league: team.league.clone(),
					division: team.division.clone(),
					location: team.home_location.clone(),
					social_media: RawSocialMedia {
						instagram: team.profiles.instagram.clone(),
						facebook: team.profiles.facebook.clone(),
						youtube: team.profiles.youtube.clone(),
						tiktok: team.profiles.tiktok.clone(),
					},
				}),
			}
		}

		raw
	}
}

impl fmt::Display for RunConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(
			f,
			"Delay between crawls: {} - {} seconds",
			self.min_delay, self.max_delay
		)?;
		write!(f, "{} to crawl:", capitalize(self.mode.as_str()))?;
		for entity in &self.entities {
			write!(f, "\n\t- {}", entity)?;
		}
		Ok(())
	}
}

fn capitalize(text: &str) -> String {
	let mut chars = text.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

pub fn load_config(path: &Path) -> Result<RawConfig, ConfigError> {
	let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
		path: path.display().to_string(),
		source,
	})?;
	Ok(serde_json::from_str(&contents)?)
}

fn non_empty(value: &Option<String>) -> Option<String> {
	value
		.as_deref()
		.map(str::trim)
		.filter(|v| !v.is_empty())
		.map(str::to_string)
}

fn surface_location(raw: &RawLocation) -> Option<Location> {
	Some(Location {
		name: non_empty(&raw.name)?,
		source_reference: non_empty(&raw.wikipedia)?,
	})
}

fn validate_location(raw: &RawLocation) -> Option<Location> {
	let location = surface_location(raw);
	if location.is_none() {
		log::error!(
			"Location '{}': name or Wikipedia not found - crawling skipped.",
			raw.name.as_deref().unwrap_or_default()
		);
	}
	location
}

fn validate_profile(team: &str, network: &str, locator: &Option<String>) -> Option<String> {
	let profile = non_empty(locator);
	if locator.is_some() && profile.is_none() {
		log::warn!(
			"Team '{}': {} profile is empty - {} skipped for this team.",
			team,
			network,
			network
		);
	}
	profile
}

fn validate_team(raw: &RawTeam) -> Option<Team> {
	let (Some(name), Some(sport)) = (non_empty(&raw.name), non_empty(&raw.sport)) else {
		log::error!(
			"Team '{}': name or sport not found - crawling for this team skipped.",
			raw.name.as_deref().unwrap_or_default()
		);
		return None;
	};

	let social = &raw.social_media;
	let profiles = SocialMediaProfiles {
		instagram: validate_profile(&name, "instagram", &social.instagram),
		facebook: validate_profile(&name, "facebook", &social.facebook),
		youtube: validate_profile(&name, "youtube", &social.youtube),
		tiktok: validate_profile(&name, "tiktok", &social.tiktok),
	};

	Some(Team {
		name,
		sport,
		league: non_empty(&raw.league),
		division: non_empty(&raw.division),
		home_location: non_empty(&raw.location),
		profiles,
	})
}

/// Compares team hometowns against the locations that would survive
/// validation. Only runs when the config lists locations next to teams.
fn team_home_check(raw: &RawConfig, entities: &[Entity]) -> Option<HomeCheck> {
	let locations: Vec<String> = raw
		.locations
		.iter()
		.filter_map(surface_location)
		.map(|location| location.name)
		.collect();
	if locations.is_empty() {
		return None;
	}

	let homes: Vec<&str> = entities
		.iter()
		.filter_map(|entity| match entity {
			Entity::Team(team) => team.home_location.as_deref(),
			Entity::Location(_) => None,
		})
		.collect();
	if homes.is_empty() {
		return None;
	}

	Some(checks::check_team_homes(&homes, &locations))
}

/// Turns a raw config into a [`RunConfig`] for the given mode.
///
/// Missing delay bounds and an empty entity list abort the run. Entities
/// missing a required field are logged and dropped. Duplicate names and,
/// for teams, home locations absent from the configured locations are
/// only reported.
pub fn validate(raw: &RawConfig, mode: CrawlMode) -> Result<RunConfig, ConfigError> {
	let min_delay = raw
		.min_delay_in_seconds
		.ok_or(ConfigError::MissingDelay("min_delay_in_seconds"))?;
	let max_delay = raw
		.max_delay_in_seconds
		.ok_or(ConfigError::MissingDelay("max_delay_in_seconds"))?;

	if min_delay > max_delay {
		return Err(ConfigError::InvertedDelay {
			min: min_delay,
			max: max_delay,
		});
	}

	let entities: Vec<Entity> = match mode {
		CrawlMode::Locations => raw
			.locations
			.iter()
			.filter_map(validate_location)
			.map(Entity::Location)
			.collect(),
		CrawlMode::Teams => raw
			.teams
			.iter()
			.filter_map(validate_team)
			.map(Entity::Team)
			.collect(),
	};

	if entities.is_empty() {
		return Err(ConfigError::NoEntities(mode));
	}

	let names: Vec<&str> = entities.iter().map(Entity::name).collect();
	checks::report_duplicates(&names, mode.as_str());

	if let Some(home_check) = team_home_check(raw, &entities) {
		home_check.log();
	}

	Ok(RunConfig {
		min_delay,
		max_delay,
		mode,
		entities,
	})
}
