use rand::Rng;
use std::time::Duration;
use tokio::time;

/// A delay range to wait in between requests so crawls don't land at a
/// fixed, fingerprintable interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
	min: Duration,
	max: Duration,
}

impl Pacing {
	pub fn new(min: Duration, max: Duration) -> Self {
		if min <= max {
			Pacing { min, max }
		} else {
			Pacing { min: max, max: min }
		}
	}

	pub fn from_secs(min: u64, max: u64) -> Self {
		Self::new(Duration::from_secs(min), Duration::from_secs(max))
	}

	/// Draws a delay uniformly from the range. Whole-second ranges yield
	/// whole seconds.
	pub fn draw<R: Rng>(&self, rng: &mut R) -> Duration {
		if self.min.subsec_nanos() == 0 && self.max.subsec_nanos() == 0 {
			Duration::from_secs(rng.gen_range(self.min.as_secs()..=self.max.as_secs()))
		} else {
			Duration::from_nanos(
				rng.gen_range(self.min.as_nanos() as u64..=self.max.as_nanos() as u64),
			)
		}
	}

	pub async fn pause(&self) -> Duration {
		let delay = self.draw(&mut rand::thread_rng());
		log::info!(
			"Waiting for {} seconds before the next request...",
			delay.as_secs()
		);
		time::sleep(delay).await;
		delay
	}
}

/// Waits between two crawl attempts.
pub async fn idle(min: u64, max: u64) -> Duration {
	Pacing::from_secs(min, max).pause().await
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Instant;

	#[test]
	fn draws_stay_within_bounds() {
		let mut rng = rand::thread_rng();
		for (min, max) in [(0, 0), (1, 1), (2, 5), (0, 30)] {
			let pacing = Pacing::from_secs(min, max);
			for _ in 0..200 {
				let delay = pacing.draw(&mut rng);
				assert!(delay >= Duration::from_secs(min) && delay <= Duration::from_secs(max));
				assert_eq!(delay.subsec_nanos(), 0);
			}
		}
	}

	#[test]
	fn sub_second_ranges_are_sampled() {
		let mut rng = rand::thread_rng();
		let pacing = Pacing::new(Duration::from_millis(100), Duration::from_millis(500));
		for _ in 0..200 {
			let delay = pacing.draw(&mut rng);
			assert!(delay >= Duration::from_millis(100) && delay <= Duration::from_millis(500));
		}
	}

	#[test]
	fn swapped_bounds_are_ordered() {
		assert_eq!(Pacing::from_secs(5, 2), Pacing::from_secs(2, 5));
	}

	#[tokio::test]
	async fn idle_suspends_for_drawn_delay() {
		let started = Instant::now();
		let delay = idle(1, 1).await;

		assert_eq!(delay, Duration::from_secs(1));
		assert!(started.elapsed() >= Duration::from_secs(1));
	}

	#[tokio::test]
	async fn zero_idle_returns_immediately() {
		let started = Instant::now();
		assert_eq!(idle(0, 0).await, Duration::ZERO);
		assert!(started.elapsed() < Duration::from_secs(1));
	}
}
