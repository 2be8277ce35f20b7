//! Live monitor runtime
//!
//! Wires the synchronous `Monitor` tick functions to tokio timers. Two
//! periodic tasks drive the engine (signal and scorer cadence); each posted
//! notification schedules a single deferred hide task that is aborted and
//! replaced by the next post. Everything is cancelable: `shutdown` (or
//! dropping the handle) aborts all tasks.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant};

use hydro_alert::Posted;
use hydro_core::{HydroResult, MonotonicClock, SimTime};

use crate::{Monitor, MonitorConfig, MonitorSnapshot};

/// Schedules the deferred hide for posted notifications
///
/// Holds at most one outstanding task; scheduling a new hide aborts the
/// previous one. The generation guard in `expire_generation` covers the
/// window where the old task already woke but has not yet run.
#[derive(Clone)]
struct ExpiryScheduler {
    monitor: Monitor,
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ExpiryScheduler {
    fn new(monitor: Monitor) -> Self {
        ExpiryScheduler {
            monitor,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    fn schedule(&self, posted: Posted) {
        let monitor = self.monitor.clone();
        let task = tokio::spawn(async move {
            sleep(posted.duration).await;
            monitor.expire_generation(posted.generation);
        });

        if let Some(previous) = self.pending.lock().replace(task) {
            previous.abort();
        }
    }

    fn abort(&self) {
        if let Some(task) = self.pending.lock().take() {
            task.abort();
        }
    }
}

/// Handle to a live monitor
///
/// Owns the periodic tasks; dropping the handle stops them.
pub struct MonitorHandle {
    monitor: Monitor,
    clock: MonotonicClock,
    expiry: ExpiryScheduler,
    signal_task: JoinHandle<()>,
    scorer_task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Start a monitor with entropy-seeded generators
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: MonitorConfig) -> HydroResult<Self> {
        let monitor = Monitor::new(config.clone())?;
        Ok(Self::run(monitor, config))
    }

    /// Start a monitor whose random draws are reproducible
    pub fn spawn_seeded(config: MonitorConfig, seed: u64) -> HydroResult<Self> {
        let monitor = Monitor::seeded(config.clone(), seed)?;
        Ok(Self::run(monitor, config))
    }

    fn run(monitor: Monitor, config: MonitorConfig) -> Self {
        let clock = MonotonicClock::start();
        let expiry = ExpiryScheduler::new(monitor.clone());

        let signal_task = {
            let monitor = monitor.clone();
            let period = config.signal_interval;
            tokio::spawn(async move {
                // First firing after one full period, matching the cadence
                // contract: no sample at t = 0.
                let mut ticker = interval_at(Instant::now() + period, period);
                loop {
                    ticker.tick().await;
                    monitor.signal_tick();
                }
            })
        };

        let scorer_task = {
            let monitor = monitor.clone();
            let expiry = expiry.clone();
            let period = config.scorer_interval;
            tokio::spawn(async move {
                let mut ticker = interval_at(Instant::now() + period, period);
                loop {
                    ticker.tick().await;
                    if let Some(posted) = monitor.scorer_tick(clock.now()) {
                        expiry.schedule(posted);
                    }
                }
            })
        };

        tracing::info!(
            signal_interval = ?config.signal_interval,
            scorer_interval = ?config.scorer_interval,
            "monitor started"
        );

        MonitorHandle {
            monitor,
            clock,
            expiry,
            signal_task,
            scorer_task,
        }
    }

    // ------------------------------------------------------------------
    // Control surface
    // ------------------------------------------------------------------

    pub fn toggle_pump(&self) {
        let posted = self.monitor.toggle_pump(self.now());
        self.expiry.schedule(posted);
    }

    pub fn toggle_fault(&self) -> bool {
        self.monitor.toggle_fault()
    }

    pub fn emergency_shut_off(&self) {
        let posted = self.monitor.emergency_shut_off(self.now());
        self.expiry.schedule(posted);
    }

    // ------------------------------------------------------------------
    // Read surface
    // ------------------------------------------------------------------

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        self.monitor.snapshot()
    }

    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    /// Stop all periodic tasks and any pending notification hide
    pub fn shutdown(self) {
        // Drop does the aborting.
        tracing::info!("monitor shut down");
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.signal_task.abort();
        self.scorer_task.abort();
        self.expiry.abort();
    }
}
