//! Server start, stop and status detection.

use crate::{
    ExitHooks, HealthProbe, HttpProbe, LifecycleError, LifecycleResult, NotRunning, PidRecord,
    ProbeOutcome, ProcessControl, RunningServer, StatusCode, StatusResult, SystemProcess,
    WorkerCommand,
};

use std::future::Future;
use std::net::{IpAddr, SocketAddr};

use kl_config::{Config, Paths};
use log::{debug, error, info, warn};

/// Starts, stops and inspects the server process that owns `paths`.
///
/// Holds no state of its own beyond configuration: every status query goes
/// back to the filesystem, the OS and the network.
pub struct LifecycleManager<P = SystemProcess, H = HttpProbe> {
    paths: Paths,
    listen_address: IpAddr,
    process: P,
    probe: H,
    worker: Option<WorkerCommand>,
}

impl LifecycleManager {
    /// Manager backed by the real OS and an HTTP probe built from `config`.
    pub fn from_config(config: &Config, paths: Paths) -> LifecycleResult<Self> {
        let probe = HttpProbe::new(config.probe.host.clone(), config.probe.timeout())?;
        Ok(Self::new(
            paths,
            config.server.listen_ip()?,
            SystemProcess,
            probe,
        ))
    }
}

impl<P, H> LifecycleManager<P, H>
where
    P: ProcessControl,
    H: HealthProbe,
{
    pub fn new(paths: Paths, listen_address: IpAddr, process: P, probe: H) -> Self {
        Self {
            paths,
            listen_address,
            process,
            probe,
            worker: None,
        }
    }

    /// Spawn `command` as the background task worker on [`start`](Self::start).
    pub fn with_worker(mut self, command: WorkerCommand) -> Self {
        self.worker = Some(command);
        self
    }

    pub fn process(&self) -> &P {
        &self.process
    }

    /// Run the server in this process until `serve` returns.
    ///
    /// Spawns the background worker, records this process in the PID file
    /// and hands the listen address to `serve`. Whatever `serve` returns,
    /// the PID record is removed and the worker terminated before this
    /// returns. Failing to write the PID record aborts before `serve` runs.
    pub async fn start<F, Fut, E>(&self, port: u16, serve: F) -> Result<(), E>
    where
        P: Clone + 'static,
        F: FnOnce(SocketAddr) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: From<LifecycleError> + std::fmt::Display,
    {
        let mut hooks = ExitHooks::new();

        match &self.worker {
            Some(_) if cfg!(windows) => {
                info!("Background worker is not supported on Windows, skipping");
            }
            Some(command) => {
                let worker_pid = self.process.spawn_worker(command)?;
                let process = self.process.clone();
                hooks.register("terminate background worker", move || {
                    if let Err(e) = process.terminate(worker_pid) {
                        warn!("{e}");
                    }
                });
            }
            None => debug!("No background worker configured"),
        }

        let record = PidRecord::current(port);
        record.write(&self.paths.pid_file)?;
        info!(
            "Wrote PID record {} (PID {}, port {port})",
            self.paths.pid_file.display(),
            record.pid
        );

        let pid_file = self.paths.pid_file.clone();
        hooks.register("remove PID record", move || {
            match PidRecord::remove(&pid_file) {
                Ok(_) => debug!("Removed PID record {}", pid_file.display()),
                Err(e) => warn!("{e}"),
            }
        });

        let address = SocketAddr::new(self.listen_address, port);
        let result = serve(address).await;

        if let Err(e) = &result {
            error!("Server exited with an error: {e}");
        }

        hooks.run();
        result
    }

    /// Stop a running server.
    ///
    /// Without `force`, terminates `pid`. With `force`, terminates whatever
    /// the PID record names and only logs failures. Either way the PID
    /// record is deleted afterwards without waiting for the process to exit.
    pub fn stop(&self, pid: Option<u32>, force: bool) -> LifecycleResult<()> {
        if force {
            self.force_terminate();
        } else {
            let pid = pid.ok_or_else(LifecycleError::missing_pid)?;
            self.process.terminate(pid)?;
        }

        // TODO: wait for the process to exit before deleting its record.
        if !PidRecord::remove(&self.paths.pid_file)? {
            warn!(
                "PID record {} was already removed",
                self.paths.pid_file.display()
            );
        }

        Ok(())
    }

    fn force_terminate(&self) {
        match PidRecord::read(&self.paths.pid_file) {
            Ok(Some(record)) => {
                if let Err(e) = self.process.terminate(record.pid) {
                    error!("Forced stop: {e}");
                }
            }
            Ok(None) => warn!(
                "Forced stop: no PID record at {}",
                self.paths.pid_file.display()
            ),
            Err(e) => error!("Forced stop: {e}"),
        }
    }

    /// Work out whether the server is running.
    ///
    /// On success, the server's pid, address and port. Otherwise the status
    /// code explaining why it isn't usable.
    pub async fn get_status(&self) -> StatusResult {
        let record = match PidRecord::read(&self.paths.pid_file) {
            Ok(Some(record)) => record,
            Ok(None) => return Err(self.status_without_pid_record().into()),
            Err(LifecycleError::PidFileInvalid { .. }) => {
                return Err(StatusCode::PidFileInvalid.into());
            }
            Err(e) => {
                warn!("{e}");
                return Err(StatusCode::PidFileReadError.into());
            }
        };

        if !self.process.process_exists(record.pid) {
            debug!("PID {} from the PID record is not running", record.pid);
            return Err(self.status_if_starting(StatusCode::FailedToStart).into());
        }

        let Some(port) = record.port else {
            debug!("PID record has no port, cannot probe");
            return Err(self.status_if_starting(StatusCode::StartingUp).into());
        };

        match self.probe.probe(port).await {
            ProbeOutcome::Status(200) => Ok(RunningServer {
                pid: record.pid,
                address: self.listen_address,
                port,
            }),
            ProbeOutcome::Status(404) => Err(StatusCode::UnknownInstance.into()),
            ProbeOutcome::Status(code) => {
                debug!("Probe on port {port} answered HTTP {code}");
                Err(StatusCode::ServerConfigurationError.into())
            }
            ProbeOutcome::Unreachable(_) => Err(StatusCode::NotResponding.into()),
            ProbeOutcome::Failed(_) => {
                Err(self.status_if_starting(StatusCode::StartingUp).into())
            }
        }
    }

    /// URLs the running server can be reached on, with the current status.
    pub async fn get_urls(&self) -> (StatusCode, Vec<String>) {
        match self.get_status().await {
            Ok(server) => (StatusCode::Running, vec![server.url()]),
            Err(NotRunning { status }) => (status, Vec::new()),
        }
    }

    /// Status when there is no PID record: decided by the startup lock.
    fn status_without_pid_record(&self) -> StatusCode {
        match PidRecord::read(&self.paths.startup_lock) {
            Ok(Some(lock)) if self.process.process_exists(lock.pid) => StatusCode::StartingUp,
            Ok(Some(_)) => StatusCode::FailedToStart,
            Ok(None) => StatusCode::Stopped,
            Err(e) => {
                debug!("Ignoring startup lock: {e}");
                StatusCode::Stopped
            }
        }
    }

    /// `status` if the startup lock is present, else an unclean shutdown.
    fn status_if_starting(&self, status: StatusCode) -> StatusCode {
        if self.paths.startup_lock.is_file() {
            status
        } else {
            StatusCode::UncleanShutdown
        }
    }
}
