//! Start, stop and status detection for the kolibri server process.
//!
//! The running server is identified by a PID record in the home directory.
//! Status is never cached: every query re-reads the PID record and startup
//! lock, asks the OS whether the recorded process exists, and probes the
//! server over HTTP.

mod error;
mod exit_hooks;
mod manager;
mod not_running;
mod pid_record;
mod probe;
mod process;
mod startup_lock;
mod status_code;

#[cfg(test)]
mod tests;

pub use error::{LifecycleError, Result as LifecycleResult};
pub use exit_hooks::ExitHooks;
pub use manager::LifecycleManager;
pub use not_running::{NotRunning, RunningServer, StatusResult};
pub use pid_record::{PidRecord, PidRecordParseError};
pub use probe::{HealthProbe, HttpProbe, ProbeOutcome};
pub use process::{ProcessControl, SystemProcess, WorkerCommand};
pub use startup_lock::StartupLock;
pub use status_code::StatusCode;
