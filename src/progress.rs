use std::time::Duration;

/// Formats whole seconds as "H hours, M minutes, S seconds", dropping
/// leading units that are zero.
pub fn format_duration(duration: Duration) -> String {
	let total = duration.as_secs();
	let (hours, remainder) = (total / 3600, total % 3600);
	let (minutes, seconds) = (remainder / 60, remainder % 60);

	if hours > 0 {
		format!("{} hours, {} minutes, {} seconds", hours, minutes, seconds)
	} else if minutes > 0 {
		format!("{} minutes, {} seconds", minutes, seconds)
	} else {
		format!("{} seconds", seconds)
	}
}

#[test]
fn test_format_duration() {
	const TEST_DURATIONS: [(u64, &str); 5] = [
		(0, "0 seconds"),
		(59, "59 seconds"),
		(61, "1 minutes, 1 seconds"),
		(3600, "1 hours, 0 minutes, 0 seconds"),
		(7384, "2 hours, 3 minutes, 4 seconds"),
	];

	for (input, expected) in TEST_DURATIONS {
		assert_eq!(format_duration(Duration::from_secs(input)), expected);
	}
}

/// Per-entity crawl durations of one run, used for the remaining runtime.
#[derive(Debug)]
pub struct Progress {
	total: usize,
	durations: Vec<Duration>,
}

impl Progress {
	pub fn new(total: usize) -> Self {
		Progress {
			total,
			durations: Vec::with_capacity(total),
		}
	}

	pub fn record(&mut self, duration: Duration) {
		self.durations.push(duration);
	}

	pub fn completed(&self) -> usize {
		self.durations.len()
	}

	pub fn total(&self) -> usize {
		self.total
	}

	pub fn mean(&self) -> Option<Duration> {
		if self.durations.is_empty() {
			return None;
		}
		let sum: Duration = self.durations.iter().sum();
		Some(sum / self.durations.len() as u32)
	}

	/// Entities left times the mean duration so far. `None` once nothing is
	/// left or the estimate rounds down to zero seconds.
	pub fn remaining(&self) -> Option<Duration> {
		let left = self.total.saturating_sub(self.completed()) as u32;
		let remaining = self.mean()? * left;
		if remaining.as_secs() > 0 {
			Some(remaining)
		} else {
			None
		}
	}

	pub fn log(&self) {
		log::info!("{}/{} entities crawled.", self.completed(), self.total);
		if let Some(remaining) = self.remaining() {
			log::info!("Remaining runtime: {}", format_duration(remaining));
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn remaining_uses_mean_of_recorded_durations() {
		let mut progress = Progress::new(5);
		progress.record(Duration::from_secs(10));
		progress.record(Duration::from_secs(20));

		assert_eq!(progress.completed(), 2);
		assert_eq!(progress.mean(), Some(Duration::from_secs(15)));
		assert_eq!(progress.remaining(), Some(Duration::from_secs(45)));
	}

	#[test]
	fn no_estimate_before_first_entity() {
		assert_eq!(Progress::new(3).remaining(), None);
	}

	#[test]
	fn no_estimate_when_done_or_instant() {
		let mut progress = Progress::new(2);
		progress.record(Duration::from_millis(10));
		assert_eq!(progress.remaining(), None);

		progress.record(Duration::from_secs(30));
		assert_eq!(progress.completed(), progress.total());
		assert_eq!(progress.remaining(), None);
	}
}
