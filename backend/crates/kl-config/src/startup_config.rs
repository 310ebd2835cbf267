use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_STARTUP_POLL_INTERVAL_MS, DEFAULT_STARTUP_TIMEOUT_SECS,
    MAX_STARTUP_TIMEOUT_SECS,
};

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    /// Detach the server into the background on `start`
    pub daemonize: bool,
    /// How long `start` waits for a daemonized server to report RUNNING
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            daemonize: cfg!(unix),
            timeout_secs: DEFAULT_STARTUP_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_STARTUP_POLL_INTERVAL_MS,
        }
    }
}

impl StartupConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.timeout_secs == 0 || self.timeout_secs > MAX_STARTUP_TIMEOUT_SECS {
            return Err(ConfigError::startup(format!(
                "startup.timeout_secs must be 1-{MAX_STARTUP_TIMEOUT_SECS}, got {}",
                self.timeout_secs
            )));
        }

        let timeout_ms = self.timeout_secs.saturating_mul(1000);
        if self.poll_interval_ms == 0 || self.poll_interval_ms > timeout_ms {
            return Err(ConfigError::startup(format!(
                "startup.poll_interval_ms must be 1-{timeout_ms}, got {}",
                self.poll_interval_ms
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
