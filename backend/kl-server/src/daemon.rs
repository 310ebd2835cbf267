//! Background (daemonized) server startup.

use crate::error::{Result as ServerErrorResult, ServerError};

use kl_config::{Paths, StartupConfig};
use kl_lifecycle::{
    HealthProbe, LifecycleManager, NotRunning, ProcessControl, RunningServer, StatusCode,
};

use std::fs::OpenOptions;
use std::panic::Location;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Instant;

use error_location::ErrorLocation;
use log::{debug, info};

/// Launch `kolibri start --foreground` as a detached child process.
///
/// The child's stdout and stderr are appended to the daemon log.
pub fn spawn_background(paths: &Paths, port: u16) -> ServerErrorResult<Child> {
    let spawn_error = |source: std::io::Error| ServerError::Spawn {
        source,
        location: ErrorLocation::from(Location::caller()),
    };

    let exe = std::env::current_exe().map_err(spawn_error)?;
    let log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.daemon_log)
        .map_err(spawn_error)?;

    let mut cmd = Command::new(exe);
    cmd.arg("--home")
        .arg(&paths.home)
        .arg("start")
        .arg("--foreground")
        .arg("--port")
        .arg(port.to_string())
        .env("KOLIBRI_LOG_COLORED", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::from(log.try_clone().map_err(spawn_error)?))
        .stderr(Stdio::from(log));

    // Detach from the controlling terminal
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // SAFETY: setsid is async-signal-safe.
        unsafe {
            cmd.pre_exec(|| {
                nix::unistd::setsid()
                    .map(|_| ())
                    .map_err(std::io::Error::from)
            });
        }
    }

    let child = cmd.spawn().map_err(spawn_error)?;
    info!(
        "Spawned background server (PID {}), logging to {}",
        child.id(),
        paths.daemon_log.display()
    );
    Ok(child)
}

/// Statuses that won't resolve by waiting longer.
pub fn is_startup_failure(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::FailedToStart
            | StatusCode::UnknownInstance
            | StatusCode::ServerConfigurationError
            | StatusCode::PidFileReadError
            | StatusCode::PidFileInvalid
    )
}

/// Poll the server status until it is running, fails, or times out.
pub async fn wait_until_running<P, H>(
    manager: &LifecycleManager<P, H>,
    child: &mut Child,
    startup: &StartupConfig,
    log: &Path,
) -> ServerErrorResult<RunningServer>
where
    P: ProcessControl,
    H: HealthProbe,
{
    let started = Instant::now();

    loop {
        match manager.get_status().await {
            Ok(server) => return Ok(server),
            Err(NotRunning { status }) if is_startup_failure(status) => {
                return Err(ServerError::StartFailed { status });
            }
            Err(NotRunning { status }) => debug!("Waiting for server ({})", status.as_str()),
        }

        if let Some(exit) = child.try_wait()? {
            return Err(ServerError::DaemonExited {
                status: exit.to_string(),
                log: log.to_path_buf(),
            });
        }

        if started.elapsed() >= startup.timeout() {
            return Err(ServerError::StartupTimeout {
                secs: startup.timeout_secs,
                log: log.to_path_buf(),
            });
        }

        tokio::time::sleep(startup.poll_interval()).await;
    }
}
