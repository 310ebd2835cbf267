//! File locations derived from the home directory.

use crate::{
    CONFIG_FILENAME, DAEMON_LOG_FILENAME, LoggingConfig, PID_FILENAME, STARTUP_LOCK_FILENAME,
};

use std::path::{Path, PathBuf};

/// Every well-known file the lifecycle commands touch.
///
/// Built once from the home directory and handed to whoever needs it;
/// nothing here is global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub home: PathBuf,
    /// PID and port of the running server
    pub pid_file: PathBuf,
    /// PID and port written during the exclusive startup window
    pub startup_lock: PathBuf,
    /// stdout/stderr of a daemonized server
    pub daemon_log: PathBuf,
    pub config_file: PathBuf,
}

impl Paths {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            pid_file: home.join(PID_FILENAME),
            startup_lock: home.join(STARTUP_LOCK_FILENAME),
            daemon_log: home.join(DAEMON_LOG_FILENAME),
            config_file: home.join(CONFIG_FILENAME),
            home,
        }
    }

    /// Application log directory for the given logging settings.
    pub fn log_dir(&self, logging: &LoggingConfig) -> PathBuf {
        self.resolve(&logging.dir)
    }

    /// Resolve a possibly-relative path against the home directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.home.join(path)
        }
    }
}
