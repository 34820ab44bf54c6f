//! Background heartbeat loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::Result;

/// Callback invoked on each qualifying tick. Shares the liveness-probe
/// signature; the returned `bool` is ignored by the loop.
pub type BeatFn = Arc<dyn Fn() -> Result<bool> + Send + Sync>;

/// A periodic liveness signal that runs alongside a long task.
///
/// The loop runs on a dedicated worker thread (tokio's blocking pool) and
/// invokes the callback roughly once per tick until cancelled. The `running`
/// flag is the sole coordination signal between owner and loop: one writer,
/// one reader, and the loop may observe a cleared flag up to one tick late,
/// so no further synchronization is needed.
///
/// `cancel` is the owner's responsibility. A `Heartbeat` dropped without
/// cancelling still clears the flag, so an abandoned loop stops within one
/// tick instead of outliving its owner.
pub struct Heartbeat {
    interval: u64,
    tick_rate: u64,
    tick: Duration,
    callback: BeatFn,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl Heartbeat {
    /// Create a heartbeat firing its callback at least once per
    /// `interval_secs` seconds. Intervals below 1 second are clamped up.
    pub fn new(interval_secs: u64, callback: BeatFn) -> Self {
        let interval = interval_secs.max(1);
        // Polling granularity: never coarser than 1s, so cancellation is
        // observed promptly even for long intervals.
        let tick_rate = interval.min(1);
        Self {
            interval,
            tick_rate,
            tick: Duration::from_secs(tick_rate),
            callback,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Test-only constructor with a shortened sleep per tick. Counter
    /// arithmetic is unchanged; only the wall-clock tick length shrinks.
    #[cfg(test)]
    pub(crate) fn with_tick(interval_secs: u64, tick: Duration, callback: BeatFn) -> Self {
        let mut heartbeat = Self::new(interval_secs, callback);
        heartbeat.tick = tick;
        heartbeat
    }

    /// Launch the background loop.
    ///
    /// Must be called from within a tokio runtime: the loop is dispatched to
    /// the runtime's blocking pool, and calling `start` outside one panics.
    ///
    /// Not idempotent: calling `start` twice launches two loops sharing one
    /// flag, which is caller misuse. The loop holds a dedicated thread from
    /// the blocking pool for the lifetime of the heartbeat.
    pub fn start(&mut self) {
        self.running.store(true, Ordering::Release);

        let running = Arc::clone(&self.running);
        let callback = Arc::clone(&self.callback);
        let interval = self.interval;
        let tick_rate = self.tick_rate;
        let tick = self.tick;

        debug!("Heartbeat started (interval={}s)", interval);

        self.worker = Some(tokio::task::spawn_blocking(move || {
            let mut iters: u64 = 0;
            while running.load(Ordering::Acquire) {
                if iters % tick_rate == 0 {
                    if let Err(e) = callback() {
                        warn!("Heartbeat tick failed: {}", e);
                    }
                }
                iters = (iters + 1) % interval;
                std::thread::sleep(tick);
            }
            debug!("Heartbeat loop exited");
        }));
    }

    /// Request loop exit and wait for the worker thread to finish.
    ///
    /// A graceful join, not a forced stop: the loop observes the cleared flag
    /// at most one tick late. Safe to call repeatedly, and safe to call on a
    /// heartbeat that was never started (returns immediately).
    pub async fn cancel(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                warn!("Heartbeat worker did not join cleanly: {}", e);
            }
        }
    }

    /// Whether the loop has been started and not yet told to stop.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Polling granularity in seconds, `min(interval, 1)`.
    pub fn tick_rate(&self) -> u64 {
        self.tick_rate
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        // Signal only; joining is not possible here. The loop exits within
        // one tick of observing the flag.
        self.running.store(false, Ordering::Release);
    }
}
