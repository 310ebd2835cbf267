mod config;
mod error;
mod log_level;
mod logging_config;
mod paths;
mod probe_config;
mod server_config;
mod startup_config;
mod worker_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use paths::Paths;
pub use probe_config::ProbeConfig;
pub use server_config::ServerConfig;
pub use startup_config::StartupConfig;
pub use worker_config::WorkerConfig;

/// Environment variable naming the home directory (PID record, lock, logs, config).
pub const HOME_ENV_VAR: &str = "KOLIBRI_HOME";

const DEFAULT_HOME_DIRNAME: &str = ".kolibri";
const CONFIG_FILENAME: &str = "config.toml";
const PID_FILENAME: &str = "server.pid";
const STARTUP_LOCK_FILENAME: &str = "server.lock";
const DAEMON_LOG_FILENAME: &str = "server.log";

const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STATIC_URL: &str = "/static";
const DEFAULT_CONTENT_URL: &str = "/content";

const DEFAULT_PROBE_HOST: &str = "127.0.0.1";
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 3;
const MAX_PROBE_TIMEOUT_SECS: u64 = 60;

const DEFAULT_STARTUP_TIMEOUT_SECS: u64 = 30;
const MAX_STARTUP_TIMEOUT_SECS: u64 = 3600;
const DEFAULT_STARTUP_POLL_INTERVAL_MS: u64 = 250;

const DEFAULT_WORKER_ENABLED: bool = true;
const DEFAULT_WORKER_HEARTBEAT_SECS: u64 = 60;

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "logs";
