//! Runner configuration.
//!
//! The surrounding engine supplies one ambient setting: the heartbeat
//! interval. It is carried as an explicit config value injected at call
//! sites rather than read from global state, so the primitives stay testable
//! in isolation.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, RunnerError};

/// Default heartbeat interval in seconds.
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Environment variable overriding the heartbeat interval.
pub const HEARTBEAT_INTERVAL_ENV: &str = "TASKPULSE_HEARTBEAT_INTERVAL_SECS";

/// Configuration consumed by the task-execution primitives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Seconds between full heartbeat signals as understood by the
    /// supervisor contract. Must be positive.
    pub heartbeat_interval_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: DEFAULT_HEARTBEAT_INTERVAL_SECS,
        }
    }
}

impl RunnerConfig {
    /// Build a config from defaults plus environment overrides.
    ///
    /// An unparseable or invalid override is ignored with a warning rather
    /// than failing startup.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(HEARTBEAT_INTERVAL_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => {
                    config.heartbeat_interval_secs = secs;
                    if config.validate().is_err() {
                        warn!(
                            "Ignoring invalid {}={:?}; using {}s",
                            HEARTBEAT_INTERVAL_ENV, raw, DEFAULT_HEARTBEAT_INTERVAL_SECS
                        );
                        config.heartbeat_interval_secs = DEFAULT_HEARTBEAT_INTERVAL_SECS;
                    }
                }
                Err(_) => warn!(
                    "Ignoring unparseable {}={:?}; using {}s",
                    HEARTBEAT_INTERVAL_ENV, raw, config.heartbeat_interval_secs
                ),
            }
        }
        config
    }

    /// Parse a config from a JSON document; missing fields take defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the heartbeat contract cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.heartbeat_interval_secs == 0 {
            return Err(RunnerError::Config(
                "heartbeat_interval_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
