//! Runtime knobs for the exam engine services.

use serde::Deserialize;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_TICK_MS: u64 = 1_000;
const DEFAULT_LOG_FILTER: &str = "info";

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Period of the elapsed-time ticker. Each tick adds one second.
    pub tick_interval: Duration,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    tick_interval_ms: Option<u64>,
    log_filter: Option<String>,
}

impl EngineConfig {
    /// Read `EXAM_TICK_MS` and `EXAM_LOG`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTickInterval` if `EXAM_TICK_MS` is not a
    /// positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let tick_interval_ms = std::env::var("EXAM_TICK_MS")
            .ok()
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidTickInterval { raw })
            })
            .transpose()?;
        let log_filter = std::env::var("EXAM_LOG").ok();
        Self::from_raw(RawConfig {
            tick_interval_ms,
            log_filter,
        })
    }

    /// Parse a TOML document with optional `tick_interval_ms` and `log_filter`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Toml` for malformed input and
    /// `ConfigError::InvalidTickInterval` for a zero interval.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let tick_interval = match raw.tick_interval_ms {
            Some(0) => {
                return Err(ConfigError::InvalidTickInterval {
                    raw: "0".to_owned(),
                });
            }
            Some(ms) => Duration::from_millis(ms),
            None => defaults.tick_interval,
        };
        let log_filter = raw
            .log_filter
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        Ok(Self {
            tick_interval,
            log_filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.tick_interval, Duration::from_secs(1));
    }

    #[test]
    fn toml_overrides_fields() {
        let config =
            EngineConfig::from_toml_str("tick_interval_ms = 250\nlog_filter = \"debug\"\n")
                .unwrap();
        assert_eq!(config.tick_interval, Duration::from_millis(250));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = EngineConfig::from_toml_str("tick_interval_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTickInterval { .. }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = EngineConfig::from_toml_str("time_limit = 60").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
