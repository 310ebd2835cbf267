//! The background task worker process.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::info;
use signal_hook::consts::TERM_SIGNALS;

const DEFAULT_TICK: Duration = Duration::from_millis(250);

/// Runs next to the server and reports a heartbeat until told to stop.
pub struct Worker {
    heartbeat: Duration,
    tick: Duration,
    stop: Arc<AtomicBool>,
}

impl Worker {
    pub fn new(heartbeat: Duration) -> Self {
        Self {
            heartbeat,
            tick: DEFAULT_TICK.min(heartbeat),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// How often the stop flag is checked.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Stop on SIGTERM / SIGINT (and SIGQUIT on Unix).
    pub fn register_signals(&self) -> std::io::Result<()> {
        for signal in TERM_SIGNALS {
            signal_hook::flag::register(*signal, Arc::clone(&self.stop))?;
        }
        Ok(())
    }

    /// Block until the stop flag is set. Returns the number of heartbeats.
    pub fn run(&self) -> u64 {
        info!("Background worker started (PID {})", std::process::id());

        let mut beats = 0;
        let mut last_beat = Instant::now();

        while !self.stop.load(Ordering::SeqCst) {
            std::thread::sleep(self.tick);

            if last_beat.elapsed() >= self.heartbeat {
                beats += 1;
                info!("Background worker heartbeat #{beats}");
                last_beat = Instant::now();
            }
        }

        info!("Background worker stopping after {beats} heartbeats");
        beats
    }
}
