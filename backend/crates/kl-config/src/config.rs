use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_HOME_DIRNAME, HOME_ENV_VAR, LoggingConfig, Paths,
    ProbeConfig, ServerConfig, StartupConfig, WorkerConfig,
};

use std::path::{Path, PathBuf};

use log::{Level, log};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub probe: ProbeConfig,
    pub startup: StartupConfig,
    pub worker: WorkerConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config from the default home directory.
    ///
    /// Loading order:
    /// 1. KOLIBRI_HOME env var, else ~/.kolibri
    /// 2. Auto-create the home directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply KOLIBRI_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let home = Self::home_dir()?;
        Self::load_in(&home)
    }

    /// Load config from an explicit home directory.
    pub fn load_in(home: &Path) -> ConfigErrorResult<Self> {
        if !home.exists() {
            std::fs::create_dir_all(home).map_err(|e| ConfigError::Io {
                path: home.to_path_buf(),
                source: e,
            })?;
        }

        let config_path = Paths::new(home).config_file;

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &PathBuf) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the home directory.
    /// Priority: KOLIBRI_HOME env var > ~/.kolibri
    pub fn home_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(HOME_ENV_VAR)
            && !dir.trim().is_empty()
        {
            return Ok(PathBuf::from(dir));
        }

        dirs::home_dir()
            .map(|home| home.join(DEFAULT_HOME_DIRNAME))
            .ok_or(ConfigError::NoHomeDir)
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.probe.validate()?;
        self.startup.validate()?;
        self.worker.validate()?;

        let log_dir = Path::new(&self.logging.dir);
        if log_dir.is_absolute() || self.logging.dir.contains("..") {
            return Err(ConfigError::config(
                "logging.dir must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }

    /// Log configuration summary.
    pub fn log_summary(&self, level: Level) {
        log!(level, "Configuration loaded:");
        log!(
            level,
            "  server: {}:{}",
            self.server.listen_address, self.server.port
        );
        log!(
            level,
            "  static: {} -> {}, content: {} -> {}",
            self.server.static_url,
            self.server.static_root.as_deref().unwrap_or("(none)"),
            self.server.content_url,
            self.server.content_dir.as_deref().unwrap_or("(none)")
        );
        log!(
            level,
            "  probe: {} (timeout {}s)",
            self.probe.host, self.probe.timeout_secs
        );
        log!(
            level,
            "  startup: daemonize={}, timeout={}s, poll={}ms",
            self.startup.daemonize, self.startup.timeout_secs, self.startup.poll_interval_ms
        );
        log!(
            level,
            "  worker: {} (heartbeat {}s)",
            if self.worker.enabled {
                "enabled"
            } else {
                "disabled"
            },
            self.worker.heartbeat_secs
        );
        log!(
            level,
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("KOLIBRI_LISTEN_ADDRESS", &mut self.server.listen_address);
        Self::apply_env_parse("KOLIBRI_LISTEN_PORT", &mut self.server.port);
        Self::apply_env_option_string("KOLIBRI_STATIC_ROOT", &mut self.server.static_root);
        Self::apply_env_option_string("KOLIBRI_CONTENT_DIR", &mut self.server.content_dir);

        // Probe
        Self::apply_env_string("KOLIBRI_PROBE_HOST", &mut self.probe.host);
        Self::apply_env_parse("KOLIBRI_PROBE_TIMEOUT_SECS", &mut self.probe.timeout_secs);

        // Startup
        Self::apply_env_bool("KOLIBRI_DAEMONIZE", &mut self.startup.daemonize);
        Self::apply_env_parse(
            "KOLIBRI_STARTUP_TIMEOUT_SECS",
            &mut self.startup.timeout_secs,
        );
        Self::apply_env_parse(
            "KOLIBRI_STARTUP_POLL_INTERVAL_MS",
            &mut self.startup.poll_interval_ms,
        );

        // Worker
        Self::apply_env_bool("KOLIBRI_WORKER_ENABLED", &mut self.worker.enabled);
        Self::apply_env_parse(
            "KOLIBRI_WORKER_HEARTBEAT_SECS",
            &mut self.worker.heartbeat_secs,
        );

        // Logging
        Self::apply_env_parse("KOLIBRI_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("KOLIBRI_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("KOLIBRI_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
