use std::time::{Duration, Instant};

/// Longest uninterrupted sleep between two event pumps
pub const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Milliseconds since the clock was created; never goes backward
#[derive(Debug, Clone, Copy)]
pub struct MsClock {
    epoch: Instant,
}

impl MsClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for MsClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Block for the whole `duration`, calling `between` after every slice
pub fn pace(duration: Duration, mut between: impl FnMut()) {
    let deadline = Instant::now() + duration;
    loop {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        std::thread::sleep((deadline - now).min(SLEEP_SLICE));
        between();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_monotonic() {
        let clock = MsClock::new();
        let first = clock.elapsed_ms();
        std::thread::sleep(Duration::from_millis(5));
        let second = clock.elapsed_ms();
        assert!(second >= first + 5);
    }

    #[test]
    fn pace_runs_full_duration_in_slices() {
        let mut slices = 0;
        let start = Instant::now();
        pace(Duration::from_millis(120), || slices += 1);
        assert!(start.elapsed() >= Duration::from_millis(120));
        assert!(slices >= 3);
    }

    #[test]
    fn zero_duration_returns_immediately() {
        let mut slices = 0;
        pace(Duration::ZERO, || slices += 1);
        assert_eq!(slices, 0);
    }
}
