//! Local alert synthesis from a fixed pool of canned messages.

use super::AlertEntry;
use chrono::{DateTime, Local, TimeZone};
use rand::seq::IndexedRandom;
use rand::Rng;

/// Messages the synthesizer draws from
pub const CANNED_ALERTS: [&str; 5] = [
    "Delay predicted: Train 12456 (Mumbai–Delhi) +12 min",
    "Track maintenance scheduled at Station X",
    "Congestion detected near Junction Y",
    "Priority assigned to Passenger Train 22222",
    "Freight Train 88901 rerouted to avoid delay",
];

/// Picks a canned alert uniformly at random and stamps it.
#[derive(Debug, Clone)]
pub struct AlertSynthesizer {
    pool: Vec<String>,
}

impl AlertSynthesizer {
    pub fn new() -> Self {
        Self::with_pool(CANNED_ALERTS.iter().map(|s| s.to_string()).collect())
    }

    /// Use a custom pool. An empty pool falls back to the canned messages.
    pub fn with_pool(pool: Vec<String>) -> Self {
        if pool.is_empty() {
            return Self::new();
        }
        Self { pool }
    }

    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    /// Draw one alert stamped with `now`.
    pub fn synthesize<R, Tz>(&self, rng: &mut R, now: &DateTime<Tz>) -> AlertEntry
    where
        R: Rng + ?Sized,
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        // Pool is never empty
        let text = self.pool.choose(rng).cloned().unwrap_or_default();
        AlertEntry::local(text, format_clock(now))
    }

    /// Draw one alert stamped with the current local time.
    pub fn next_now(&self) -> AlertEntry {
        self.synthesize(&mut rand::rng(), &Local::now())
    }
}

impl Default for AlertSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

/// 12-hour wall clock, e.g. `3:07:42 PM`
pub(crate) fn format_clock<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    time.format("%-I:%M:%S %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::AlertOrigin;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_synthesized_alert_comes_from_pool() {
        let synth = AlertSynthesizer::new();
        let mut rng = StdRng::seed_from_u64(1);
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 15, 7, 42).unwrap();

        let entry = synth.synthesize(&mut rng, &now);
        assert!(CANNED_ALERTS.contains(&entry.text.as_str()));
        assert_eq!(entry.timestamp, "3:07:42 PM");
        assert_eq!(entry.origin, AlertOrigin::Local);
    }

    #[test]
    fn test_every_canned_alert_is_reachable() {
        let synth = AlertSynthesizer::new();
        let mut rng = StdRng::seed_from_u64(99);
        let now = Utc::now();

        let seen: HashSet<_> = (0..200)
            .map(|_| synth.synthesize(&mut rng, &now).text)
            .collect();
        assert_eq!(seen.len(), CANNED_ALERTS.len());
    }

    #[test]
    fn test_empty_pool_falls_back_to_canned() {
        let synth = AlertSynthesizer::with_pool(Vec::new());
        assert_eq!(synth.pool().len(), 5);
    }
}
