//! PID record file shared by the PID file and the startup lock.
//!
//! Plain text, one value per line:
//!
//! ```text
//! <pid>
//! <port>
//! ```
//!
//! The pid is required and must be a positive integer. The port line is
//! optional; a missing or unparsable port reads back as `None`.

use crate::{LifecycleError, LifecycleResult};

use std::fmt;
use std::io::ErrorKind;
use std::panic::Location;
use std::path::Path;
use std::str::FromStr;

use error_location::ErrorLocation;
use log::debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PidRecordParseError {
    #[error("record is empty")]
    Empty,

    #[error("'{0}' is not a valid process id")]
    InvalidPid(String),

    #[error("expected at most 2 lines, found {0}")]
    TooManyLines(usize),
}

/// Process id and (optionally) listening port of a server process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PidRecord {
    pub pid: u32,
    pub port: Option<u16>,
}

impl PidRecord {
    pub fn new(pid: u32, port: Option<u16>) -> Self {
        Self { pid, port }
    }

    /// Record for the calling process.
    pub fn current(port: u16) -> Self {
        Self::new(std::process::id(), Some(port))
    }

    /// Read a record from disk.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    #[track_caller]
    pub fn read(path: &Path) -> LifecycleResult<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(LifecycleError::PidFileRead {
                    path: path.to_path_buf(),
                    source: e,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        content
            .parse()
            .map(Some)
            .map_err(|e| LifecycleError::PidFileInvalid {
                path: path.to_path_buf(),
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Write the record, replacing any previous file.
    #[track_caller]
    pub fn write(&self, path: &Path) -> LifecycleResult<()> {
        std::fs::write(path, self.to_string()).map_err(|e| LifecycleError::PidFileWrite {
            path: path.to_path_buf(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Delete a record file.
    ///
    /// Returns `Ok(false)` if there was nothing to delete.
    #[track_caller]
    pub fn remove(path: &Path) -> LifecycleResult<bool> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(LifecycleError::PidFileRemove {
                path: path.to_path_buf(),
                source: e,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    fn parse_pid(value: &str) -> Result<u32, PidRecordParseError> {
        match value.parse::<u32>() {
            Ok(pid) if pid > 0 => Ok(pid),
            _ => Err(PidRecordParseError::InvalidPid(value.to_string())),
        }
    }
}

impl FromStr for PidRecord {
    type Err = PidRecordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        match lines.as_slice() {
            [] => Err(PidRecordParseError::Empty),
            [pid] => Ok(Self::new(Self::parse_pid(pid)?, None)),
            [pid, raw_port] => {
                let pid = Self::parse_pid(pid)?;
                let port = raw_port.parse::<u16>().ok().filter(|port| *port != 0);
                if port.is_none() {
                    debug!("Ignoring unparsable port '{raw_port}' in PID record");
                }
                Ok(Self::new(pid, port))
            }
            more => Err(PidRecordParseError::TooManyLines(more.len())),
        }
    }
}

impl fmt::Display for PidRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}\n{}", self.pid, port),
            None => writeln!(f, "{}", self.pid),
        }
    }
}
