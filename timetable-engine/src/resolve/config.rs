//! Engine configuration.

use chrono::Duration;

/// Environment variable that switches the variation stage on.
pub const APPLY_VARIATIONS_VAR: &str = "APPLY_VARIATIONS";

/// Configuration parameters for one resolution run.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Reconcile real-time cancellations, reinstatements and changes of
    /// origin against the resolved schedules. Timetable-only runs leave
    /// this off.
    pub apply_variations: bool,

    /// How far a stop's time may be from an event's timestamp and still
    /// match it (seconds).
    pub match_window_secs: i64,
}

impl EngineConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(apply_variations: bool, match_window_secs: i64) -> Self {
        Self {
            apply_variations,
            match_window_secs,
        }
    }

    /// Default configuration with the variation stage taken from
    /// `APPLY_VARIATIONS` ("true" or "1" enable it).
    pub fn from_env() -> Self {
        let apply_variations = std::env::var(APPLY_VARIATIONS_VAR)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        Self {
            apply_variations,
            ..Self::default()
        }
    }

    /// Returns the station match window as a Duration.
    pub fn match_window(&self) -> Duration {
        Duration::seconds(self.match_window_secs)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            apply_variations: false,
            match_window_secs: 900, // 15 minutes
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1")
}
