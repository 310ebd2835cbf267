//! Lock file held while the server is starting up.

use crate::{LifecycleError, LifecycleResult, PidRecord, ProcessControl};

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::panic::Location;
use std::path::{Path, PathBuf};

use error_location::ErrorLocation;
use log::{info, warn};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

#[cfg(unix)]
const LOCK_FILE_MODE: u32 = 0o600; // Owner read/write only

/// Marks the startup window of a server process.
///
/// The lock holds the same `pid` / `port` record as the PID file. While it
/// exists and its process is alive the server counts as starting up; a lock
/// left behind by a dead process means startup failed.
#[derive(Debug)]
pub struct StartupLock {
    path: PathBuf,
    held: bool,
}

impl StartupLock {
    /// Try to take the startup lock at `path`.
    ///
    /// Fails with [`LifecycleError::AlreadyStarting`] if another live process
    /// holds it. A lock whose holder is gone, or whose content is unreadable,
    /// is treated as stale and replaced.
    #[track_caller]
    pub fn acquire<P: ProcessControl + ?Sized>(
        path: &Path,
        port: u16,
        process: &P,
    ) -> LifecycleResult<Self> {
        match PidRecord::read(path) {
            Ok(Some(existing)) if process.process_exists(existing.pid) => {
                return Err(LifecycleError::AlreadyStarting {
                    pid: existing.pid,
                    path: path.to_path_buf(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            Ok(Some(existing)) => {
                info!(
                    "Removing stale startup lock (PID {} not running)",
                    existing.pid
                );
                PidRecord::remove(path)?;
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Removing unreadable startup lock: {e}");
                PidRecord::remove(path)?;
            }
        }

        let lock_error = |source: std::io::Error| LifecycleError::LockAcquisition {
            path: path.to_path_buf(),
            source,
            location: ErrorLocation::from(Location::caller()),
        };

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(LOCK_FILE_MODE);

        let mut file = match options.open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                // Lost a race against another starting process.
                let pid = PidRecord::read(path)
                    .ok()
                    .flatten()
                    .map(|record| record.pid)
                    .unwrap_or_default();
                return Err(LifecycleError::AlreadyStarting {
                    pid,
                    path: path.to_path_buf(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            Err(e) => return Err(lock_error(e)),
        };

        // Hold the lock before writing so a failed write still cleans up.
        let lock = Self {
            path: path.to_path_buf(),
            held: true,
        };

        file.write_all(PidRecord::current(port).to_string().as_bytes())
            .map_err(lock_error)?;
        file.sync_all().map_err(lock_error)?;

        Ok(lock)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock file.
    ///
    /// Called automatically on drop, but can be called explicitly once the
    /// server is accepting connections.
    pub fn release(&mut self) {
        if !self.held {
            return;
        }
        self.held = false;

        if let Err(e) = PidRecord::remove(&self.path) {
            warn!("{e}");
        }
    }
}

impl Drop for StartupLock {
    fn drop(&mut self) {
        self.release();
    }
}
