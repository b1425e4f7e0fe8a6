//! Search configuration for the alternative-venue search.

use std::time::Duration;

/// Configuration parameters for venue search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Widening attempts after the initial search finds nothing available.
    pub max_attempts: usize,

    /// Candidates requested by the initial search.
    pub initial_limit: usize,

    /// Candidates requested per page during widening.
    pub alternative_limit: usize,

    /// Rating floor before any relaxation. Attempt `n` uses
    /// `base_min_rating - n * rating_step`.
    pub base_min_rating: f64,

    /// How much the rating floor drops per attempt.
    pub rating_step: f64,

    /// Maximum provider pages drained per widening attempt.
    pub max_pages: usize,

    /// Pause between consecutive provider pages (milliseconds).
    /// Directories typically reject a page token used too soon.
    pub page_delay_ms: u64,

    /// Per-venue availability check timeout (milliseconds).
    pub probe_timeout_ms: Option<u64>,

    /// Overall time budget for one search (milliseconds). When it runs out the
    /// search returns what it has found so far.
    pub deadline_ms: Option<u64>,
}

impl SearchConfig {
    /// Set the number of widening attempts.
    pub fn with_max_attempts(mut self, n: usize) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the pause between provider pages.
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay_ms = millis(delay);
        self
    }

    /// Set the per-venue probe timeout.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout_ms = Some(millis(timeout));
        self
    }

    /// Set the overall search deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_ms = Some(millis(deadline));
        self
    }

    /// Rating floor for widening attempt `attempt` (1-based). Never below 0.
    pub fn min_rating_for_attempt(&self, attempt: usize) -> f64 {
        (self.base_min_rating - attempt as f64 * self.rating_step).max(0.0)
    }

    /// Returns the page delay as a Duration.
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    /// Returns the probe timeout as a Duration.
    pub fn probe_timeout(&self) -> Option<Duration> {
        self.probe_timeout_ms.map(Duration::from_millis)
    }

    /// Returns the search deadline as a Duration.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_limit: 5,
            alternative_limit: 5,
            base_min_rating: 3.5,
            rating_step: 0.3,
            max_pages: 3,
            page_delay_ms: 2000,
            probe_timeout_ms: None,
            deadline_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn default_config() {
        let config = SearchConfig::default();

        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.initial_limit, 5);
        assert_eq!(config.alternative_limit, 5);
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.page_delay(), Duration::from_secs(2));
        assert!(config.probe_timeout().is_none());
        assert!(config.deadline().is_none());
    }

    #[test]
    fn rating_floor_relaxes_per_attempt() {
        let config = SearchConfig::default();

        assert!(close(config.min_rating_for_attempt(1), 3.2));
        assert!(close(config.min_rating_for_attempt(2), 2.9));
        assert!(close(config.min_rating_for_attempt(3), 2.6));
    }

    #[test]
    fn rating_floor_stops_at_zero() {
        let config = SearchConfig::default();

        assert!(close(config.min_rating_for_attempt(11), 0.2));
        assert_eq!(config.min_rating_for_attempt(12), 0.0);
        assert_eq!(config.min_rating_for_attempt(1000), 0.0);
    }

    #[test]
    fn huge_durations_saturate() {
        let config = SearchConfig::default()
            .with_page_delay(Duration::MAX)
            .with_probe_timeout(Duration::MAX)
            .with_deadline(Duration::MAX);

        assert_eq!(config.page_delay_ms, u64::MAX);
        assert_eq!(config.probe_timeout_ms, Some(u64::MAX));
        assert_eq!(config.deadline_ms, Some(u64::MAX));
    }

    #[test]
    fn builders() {
        let config = SearchConfig::default()
            .with_max_attempts(5)
            .with_page_delay(Duration::from_millis(10))
            .with_probe_timeout(Duration::from_secs(3))
            .with_deadline(Duration::from_secs(30));

        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.page_delay(), Duration::from_millis(10));
        assert_eq!(config.probe_timeout(), Some(Duration::from_secs(3)));
        assert_eq!(config.deadline(), Some(Duration::from_secs(30)));
    }
}
