use std::collections::HashMap;

/// Names occurring more than once, in order of first appearance. Exact,
/// case-sensitive comparison.
pub fn find_duplicates<S: AsRef<str>>(names: &[S]) -> Vec<String> {
	let mut counts: HashMap<&str, usize> = HashMap::new();
	let mut order: Vec<&str> = Vec::new();

	for name in names {
		let name = name.as_ref();
		let count = counts.entry(name).or_insert(0);
		if *count == 0 {
			order.push(name);
		}
		*count += 1;
	}

	order
		.into_iter()
		.filter(|name| counts[name] > 1)
		.map(str::to_string)
		.collect()
}

/// Logs how many names were configured and which of them repeat.
pub fn report_duplicates<S: AsRef<str>>(names: &[S], kind: &str) -> Vec<String> {
	let duplicates = find_duplicates(names);

	if duplicates.is_empty() {
		log::info!("Config includes {} unique {}.", names.len(), kind);
	} else {
		log::warn!(
			"Config includes {} {} from which {} are included at least twice.",
			names.len(),
			kind,
			duplicates.len()
		);
		log::warn!("Duplicate {} found: {:?}", kind, duplicates);
	}

	duplicates
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct HomeCheck {
	/// Team home locations with no matching configured location.
	pub missing_team_homes: Vec<String>,
	/// Configured locations no team calls home.
	pub homeless_locations: Vec<String>,
}

impl HomeCheck {
	pub fn log(&self) {
		if self.missing_team_homes.is_empty() {
			log::info!("All hometowns are included in the configured locations.");
		} else {
			log::warn!(
				"The following hometowns are not included in the configured locations: {:?}",
				self.missing_team_homes
			);
		}

		if self.homeless_locations.is_empty() {
			log::info!("No location is configured without a corresponding hometown.");
		} else {
			log::warn!(
				"The following locations do not have a corresponding hometown: {:?}",
				self.homeless_locations
			);
		}
	}
}

pub fn check_team_homes<S: AsRef<str>, T: AsRef<str>>(
	team_homes: &[S],
	locations: &[T],
) -> HomeCheck {
	let homes: Vec<&str> = team_homes.iter().map(|home| home.as_ref()).collect();
	let locations: Vec<&str> = locations.iter().map(|location| location.as_ref()).collect();

	HomeCheck {
		missing_team_homes: homes
			.iter()
			.filter(|home| !locations.contains(*home))
			.map(|home| home.to_string())
			.collect(),
		homeless_locations: locations
			.iter()
			.filter(|location| !homes.contains(*location))
			.map(|location| location.to_string())
			.collect(),
	}
}

#[test]
fn test_find_duplicates() {
	assert_eq!(find_duplicates(&["A", "B", "A"]), vec!["A"]);
	assert_eq!(find_duplicates(&["A", "B", "C"]), Vec::<String>::new());
	assert_eq!(find_duplicates(&["a", "A"]), Vec::<String>::new());
	assert_eq!(find_duplicates(&["B", "A", "A", "B", "B"]), vec!["B", "A"]);
	assert_eq!(find_duplicates::<&str>(&[]), Vec::<String>::new());
}

#[test]
fn test_check_team_homes() {
	let check = check_team_homes(&["Ulm", "Kempten", "Ulm"], &["Ulm", "Ravensburg"]);

	assert_eq!(
		check,
		HomeCheck {
			missing_team_homes: vec!["Kempten".to_string()],
			homeless_locations: vec!["Ravensburg".to_string()],
		}
	);

	assert_eq!(
		check_team_homes(&["Ulm"], &["Ulm"]),
		HomeCheck::default()
	);
}
