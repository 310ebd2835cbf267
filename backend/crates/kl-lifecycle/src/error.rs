use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("Failed to read PID record {path}: {source} {location}")]
    PidFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Invalid PID record {path}: {source} {location}")]
    PidFileInvalid {
        path: PathBuf,
        #[source]
        source: crate::PidRecordParseError,
        location: ErrorLocation,
    },

    #[error("Failed to write PID record {path}: {source} {location}")]
    PidFileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Failed to remove PID record {path}: {source} {location}")]
    PidFileRemove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Server is already starting (PID {pid}, startup lock: {path}) {location}")]
    AlreadyStarting {
        pid: u32,
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Failed to acquire startup lock at {path}: {source} {location}")]
    LockAcquisition {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("No PID given to stop {location}")]
    MissingPid { location: ErrorLocation },

    #[error("Failed to terminate process {pid}: {message} {location}")]
    Terminate {
        pid: u32,
        message: String,
        location: ErrorLocation,
    },

    #[error("Failed to spawn background worker {program}: {source} {location}")]
    WorkerSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Configuration error: {source} {location}")]
    Config {
        #[source]
        source: kl_config::ConfigError,
        location: ErrorLocation,
    },

    #[error("HTTP client error: {source} {location}")]
    Http {
        #[source]
        source: reqwest::Error,
        location: ErrorLocation,
    },
}

impl LifecycleError {
    #[track_caller]
    pub fn missing_pid() -> Self {
        Self::MissingPid {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn terminate<S: Into<String>>(pid: u32, message: S) -> Self {
        Self::Terminate {
            pid,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<kl_config::ConfigError> for LifecycleError {
    #[track_caller]
    fn from(source: kl_config::ConfigError) -> Self {
        Self::Config {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for LifecycleError {
    #[track_caller]
    fn from(source: reqwest::Error) -> Self {
        Self::Http {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, LifecycleError>;
