use kl_lifecycle::StatusCode;

use std::net::SocketAddr;
use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Config error: {0}")]
    Config(#[from] kl_config::ConfigError),

    #[error("{0}")]
    Lifecycle(#[from] kl_lifecycle::LifecycleError),

    #[error("Failed to initialize logger: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },

    #[error("Failed to bind {address}: {source} {location}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Server error: {source} {location}")]
    Serve {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Failed to launch background server: {source} {location}")]
    Spawn {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Background server exited during startup ({status}), see {log}")]
    DaemonExited { status: String, log: PathBuf },

    #[error("Server failed to start: {status}")]
    StartFailed { status: StatusCode },

    #[error("Server did not come up within {secs}s, see {log}")]
    StartupTimeout { secs: u64, log: PathBuf },

    #[error("IO error: {source} {location}")]
    Io {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },
}

impl ServerError {
    #[track_caller]
    pub fn logger<S: Into<String>>(message: S) -> Self {
        Self::Logger {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Process exit code for this error.
    ///
    /// Startup failures that map onto a status report that status; anything
    /// else is a generic failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::StartFailed { status } => status.code() as u8,
            Self::DaemonExited { .. } => StatusCode::FailedToStart.code() as u8,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for ServerError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
