use anyhow::Result;
use clap::Parser;
use metric_crawler::{checks, init_logger, load_config};
use std::path::PathBuf;

/// Reports duplicate names and hometown mismatches in a crawler config.
#[derive(Parser, Debug)]
#[clap(about, version, author)]
struct Args {
	#[arg(short, long, default_value = "config.json")]
	config: PathBuf,
}

fn main() -> Result<()> {
	init_logger();

	let args = Args::parse();
	let config = load_config(&args.config)?;

	let location_names: Vec<&str> = config
		.locations
		.iter()
		.filter_map(|location| location.name.as_deref())
		.collect();
	let team_names: Vec<&str> = config
		.teams
		.iter()
		.filter_map(|team| team.name.as_deref())
		.collect();
	let team_homes: Vec<&str> = config
		.teams
		.iter()
		.filter_map(|team| team.location.as_deref())
		.collect();

	checks::report_duplicates(&location_names, "locations");
	checks::report_duplicates(&team_names, "teams");
	checks::report_duplicates(&team_homes, "hometowns");

	checks::check_team_homes(&team_homes, &location_names).log();

	Ok(())
}
