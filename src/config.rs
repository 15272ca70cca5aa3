//! Configuration Module
//!
//! Loads cache construction parameters from environment variables.

use std::env;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Number of entries the in-memory map pre-allocates
    pub map_capacity: usize,
    /// Whether statistics collection starts enabled
    pub stats_enabled: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAP_CAPACITY` - Map capacity hint (default: 0)
    /// - `CACHE_STATS_ENABLED` - `1`/`true`/`yes`/`on` or `0`/`false`/`no`/`off` (default: false)
    pub fn from_env() -> Self {
        Self {
            map_capacity: env::var("CACHE_MAP_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            stats_enabled: env::var("CACHE_STATS_ENABLED")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }
}

/// Parses a boolean environment flag, case-insensitively.
///
/// Accepts `1`/`true`/`yes`/`on` and `0`/`false`/`no`/`off`; anything else is `None`.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
