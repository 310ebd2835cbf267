use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_WORKER_ENABLED, DEFAULT_WORKER_HEARTBEAT_SECS,
};

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Spawn the background task worker next to the server (never on Windows)
    pub enabled: bool,
    pub heartbeat_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_WORKER_ENABLED,
            heartbeat_secs: DEFAULT_WORKER_HEARTBEAT_SECS,
        }
    }
}

impl WorkerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.heartbeat_secs == 0 {
            return Err(ConfigError::worker("worker.heartbeat_secs must be > 0"));
        }
        Ok(())
    }

    pub fn heartbeat(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs)
    }
}
