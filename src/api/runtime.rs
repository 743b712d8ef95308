//! Monitoring runtime: one thread, three sensor streams, one timer
//!
//! The runtime owns the session on a dedicated worker thread. Sensor
//! integrations clone the event sender and push samples at whatever rate
//! their platform delivers them; the worker interleaves sample ingestion
//! with refresh ticks at the configured cadence. Because the worker is the
//! only code touching the session, every tick sees a consistent orientation
//! snapshot without locking.

use crate::api::session::OverlaySession;
use crate::api::types::{OverlayError, OverlayResult};
use crate::sensors::SensorEvent;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

/// Handle to a running overlay monitor.
///
/// Dropping the handle stops the worker. [`stop`](MonitorHandle::stop)
/// does the same but returns the session for inspection or reuse.
pub struct MonitorHandle {
    sender: Sender<SensorEvent>,
    stop_flag: Arc<AtomicBool>,
    worker: Option<JoinHandle<OverlaySession>>,
}

impl MonitorHandle {
    /// Start monitoring: spawns the worker thread that owns the session.
    pub fn spawn(session: OverlaySession) -> Self {
        let (sender, receiver) = mpsc::channel::<SensorEvent>();
        let stop_flag = Arc::new(AtomicBool::new(false));

        let worker_flag = Arc::clone(&stop_flag);
        let worker = std::thread::spawn(move || {
            let mut session = session;
            let frequency = session.config().frequency();
            let mut next_tick = Instant::now() + frequency;

            tracing::info!(frequency_ms = frequency.as_millis() as u64, "monitoring started");

            loop {
                if worker_flag.load(Ordering::Relaxed) {
                    break;
                }

                let timeout = next_tick.saturating_duration_since(Instant::now());
                match receiver.recv_timeout(timeout) {
                    Ok(event) => session.apply(&event),
                    Err(RecvTimeoutError::Timeout) => {
                        session.tick();
                        next_tick += frequency;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            tracing::info!("monitoring stopped");
            session
        });

        Self {
            sender,
            stop_flag,
            worker: Some(worker),
        }
    }

    /// Clone the event sender for a sensor integration. Each platform source
    /// pushes its samples through this channel on its own schedule.
    pub fn sender(&self) -> Sender<SensorEvent> {
        self.sender.clone()
    }

    /// Push one sensor event into the runtime
    pub fn send(&self, event: SensorEvent) -> OverlayResult<()> {
        self.sender
            .send(event)
            .map_err(|_| OverlayError::RuntimeStopped)
    }

    /// True while the worker thread is alive
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .map(|worker| !worker.is_finished())
            .unwrap_or(false)
    }

    /// Stop monitoring and return the session. Halts sample ingestion and
    /// the periodic tick; queued events past the stop request are dropped.
    pub fn stop(mut self) -> OverlayResult<OverlaySession> {
        self.stop_flag.store(true, Ordering::Relaxed);
        let worker = self.worker.take().ok_or(OverlayError::NotMonitoring)?;
        worker.join().map_err(|_| OverlayError::RuntimeStopped)
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
