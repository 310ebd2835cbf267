mod pid_record;

use crate::{
    HealthProbe, LifecycleError, LifecycleManager, LifecycleResult, PidRecord, ProbeOutcome,
    ProcessControl, WorkerCommand,
};

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kl_config::Paths;
use tempfile::TempDir;

pub(crate) const WORKER_PID: u32 = 4242;

#[derive(Default)]
struct FakeProcessState {
    alive: HashSet<u32>,
    terminated: Vec<u32>,
    spawned: Vec<WorkerCommand>,
    fail_terminate: bool,
}

/// In-memory process table.
#[derive(Clone, Default)]
pub(crate) struct FakeProcess {
    state: Arc<Mutex<FakeProcessState>>,
}

impl FakeProcess {
    pub(crate) fn with_alive(pids: &[u32]) -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().alive.extend(pids);
        fake
    }

    pub(crate) fn failing_terminate(self) -> Self {
        self.state.lock().unwrap().fail_terminate = true;
        self
    }

    pub(crate) fn terminated(&self) -> Vec<u32> {
        self.state.lock().unwrap().terminated.clone()
    }

    pub(crate) fn spawned(&self) -> Vec<WorkerCommand> {
        self.state.lock().unwrap().spawned.clone()
    }
}

impl ProcessControl for FakeProcess {
    fn process_exists(&self, pid: u32) -> bool {
        self.state.lock().unwrap().alive.contains(&pid)
    }

    fn terminate(&self, pid: u32) -> LifecycleResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_terminate {
            return Err(LifecycleError::terminate(pid, "operation not permitted"));
        }
        state.alive.remove(&pid);
        state.terminated.push(pid);
        Ok(())
    }

    fn spawn_worker(&self, command: &WorkerCommand) -> LifecycleResult<u32> {
        let mut state = self.state.lock().unwrap();
        state.spawned.push(command.clone());
        state.alive.insert(WORKER_PID);
        Ok(WORKER_PID)
    }
}

/// Probe that always answers the same way and counts calls.
#[derive(Clone)]
pub(crate) struct FakeProbe {
    outcome: ProbeOutcome,
    ports: Arc<Mutex<Vec<u16>>>,
}

impl FakeProbe {
    pub(crate) fn new(outcome: ProbeOutcome) -> Self {
        Self {
            outcome,
            ports: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn probed_ports(&self) -> Vec<u16> {
        self.ports.lock().unwrap().clone()
    }
}

#[async_trait]
impl HealthProbe for FakeProbe {
    async fn probe(&self, port: u16) -> ProbeOutcome {
        self.ports.lock().unwrap().push(port);
        self.outcome.clone()
    }
}

pub(crate) fn manager(
    home: &TempDir,
    process: FakeProcess,
    probe: FakeProbe,
) -> LifecycleManager<FakeProcess, FakeProbe> {
    LifecycleManager::new(
        Paths::new(home.path()),
        IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        process,
        probe,
    )
}

pub(crate) fn write_pid_record(home: &TempDir, pid: u32, port: Option<u16>) {
    PidRecord::new(pid, port)
        .write(&Paths::new(home.path()).pid_file)
        .unwrap();
}

pub(crate) fn write_startup_lock(home: &TempDir, pid: u32) {
    PidRecord::new(pid, Some(8080))
        .write(&Paths::new(home.path()).startup_lock)
        .unwrap();
}
