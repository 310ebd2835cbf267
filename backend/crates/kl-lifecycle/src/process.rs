//! OS process control: liveness checks, termination, worker spawning.

use crate::{LifecycleError, LifecycleResult};

use std::fs::OpenOptions;
use std::panic::Location;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use error_location::ErrorLocation;
use log::info;

/// Everything the lifecycle logic needs from the operating system.
///
/// Kept behind a trait so the status decision procedure can be exercised
/// with fake processes.
pub trait ProcessControl: Send + Sync {
    /// Whether `pid` currently refers to a running process.
    fn process_exists(&self, pid: u32) -> bool;

    /// Ask the process to terminate.
    fn terminate(&self, pid: u32) -> LifecycleResult<()>;

    /// Spawn the background task worker and return its pid.
    fn spawn_worker(&self, command: &WorkerCommand) -> LifecycleResult<u32>;
}

/// How to launch the background task worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
    /// Append worker stdout/stderr here; discarded when `None`
    pub log_file: Option<PathBuf>,
}

impl WorkerCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            log_file: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    fn output(&self) -> std::io::Result<(Stdio, Stdio)> {
        match &self.log_file {
            Some(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Ok((Stdio::from(file.try_clone()?), Stdio::from(file)))
            }
            None => Ok((Stdio::null(), Stdio::null())),
        }
    }
}

/// The real operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcess;

impl ProcessControl for SystemProcess {
    #[cfg(unix)]
    fn process_exists(&self, pid: u32) -> bool {
        use nix::errno::Errno;
        use nix::sys::signal::kill;
        use nix::unistd::Pid;

        // Pids that don't fit a positive pid_t would address process groups.
        let Ok(raw) = i32::try_from(pid) else {
            return false;
        };
        if raw <= 0 {
            return false;
        }

        // Signal 0 only checks existence. EPERM means it exists but belongs
        // to someone else.
        match kill(Pid::from_raw(raw), None) {
            Ok(()) | Err(Errno::EPERM) => true,
            Err(_) => false,
        }
    }

    #[cfg(windows)]
    fn process_exists(&self, pid: u32) -> bool {
        use windows_sys::Win32::Foundation::{CloseHandle, STILL_ACTIVE};
        use windows_sys::Win32::System::Threading::{
            GetExitCodeProcess, OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION,
        };

        // SAFETY: OpenProcess returns null on failure, the handle is closed
        // before returning.
        unsafe {
            let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, 0, pid);
            if handle.is_null() {
                return false;
            }

            let mut exit_code: u32 = 0;
            let result = GetExitCodeProcess(handle, &mut exit_code);
            CloseHandle(handle);

            result != 0 && exit_code == STILL_ACTIVE as u32
        }
    }

    #[cfg(unix)]
    fn terminate(&self, pid: u32) -> LifecycleResult<()> {
        use nix::sys::signal::{Signal, kill};
        use nix::unistd::Pid;

        let raw = i32::try_from(pid)
            .ok()
            .filter(|raw| *raw > 0)
            .ok_or_else(|| LifecycleError::terminate(pid, "not a valid process id"))?;

        info!("Sending SIGTERM to PID {pid}");
        kill(Pid::from_raw(raw), Signal::SIGTERM)
            .map_err(|errno| LifecycleError::terminate(pid, errno.desc()))
    }

    #[cfg(windows)]
    fn terminate(&self, pid: u32) -> LifecycleResult<()> {
        info!("Terminating PID {pid}");
        let output = Command::new("taskkill")
            .args(["/F", "/PID", &pid.to_string()])
            .output()
            .map_err(|e| LifecycleError::terminate(pid, e.to_string()))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(LifecycleError::terminate(
                pid,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }

    fn spawn_worker(&self, command: &WorkerCommand) -> LifecycleResult<u32> {
        let spawn_error = |source: std::io::Error| LifecycleError::WorkerSpawn {
            program: command.program.clone(),
            source,
            location: ErrorLocation::from(Location::caller()),
        };

        let (stdout, stderr) = command.output().map_err(spawn_error)?;

        let child = Command::new(&command.program)
            .args(&command.args)
            .envs(command.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
            .map_err(spawn_error)?;

        // The worker outlives this handle; it is stopped by pid at exit.
        let pid = child.id();
        drop(child);

        info!(
            "Spawned background worker {} (PID {pid})",
            command.program.display()
        );
        Ok(pid)
    }
}
