use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_PROBE_HOST, DEFAULT_PROBE_TIMEOUT_SECS,
    MAX_PROBE_TIMEOUT_SECS,
};

use std::net::IpAddr;
use std::time::Duration;

use serde::Deserialize;

/// Settings for the HTTP liveness probe used by `status`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub host: String,
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_PROBE_HOST),
            timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
        }
    }
}

impl ProbeConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.host.parse::<IpAddr>().is_err() {
            return Err(ConfigError::probe(format!(
                "probe.host must be an IP address, got '{}'",
                self.host
            )));
        }

        if self.timeout_secs == 0 || self.timeout_secs > MAX_PROBE_TIMEOUT_SECS {
            return Err(ConfigError::probe(format!(
                "probe.timeout_secs must be 1-{}, got {}",
                MAX_PROBE_TIMEOUT_SECS, self.timeout_secs
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
