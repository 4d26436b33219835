//! Configuration for the journey planner.

use std::time::Duration;

/// Configuration parameters for journey planning.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Maximum number of timetables fetched concurrently per request.
    pub batch_size: usize,

    /// Give up on a single timetable fetch after this many seconds.
    pub fetch_timeout_secs: u64,
}

impl PlannerConfig {
    pub fn new(batch_size: usize, fetch_timeout_secs: u64) -> Self {
        Self {
            batch_size,
            fetch_timeout_secs,
        }
    }

    /// Returns the fetch timeout as a Duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            batch_size: 8,
            fetch_timeout_secs: 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlannerConfig::default();
        assert_eq!(config.batch_size, 8);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(15));
    }
}
