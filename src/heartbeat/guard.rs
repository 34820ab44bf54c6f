//! Heartbeat-guarded execution of a supervised operation.
//!
//! Starts a [`Heartbeat`] before a runner method executes and guarantees the
//! heartbeat is cancelled exactly once before control leaves the wrapper,
//! whether the operation returns normally or fails.

use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

use super::ticker::{BeatFn, Heartbeat};
use crate::error::Result;

/// A heartbeat-capable collaborator: something that can assert to an external
/// supervisor that its current run is still alive.
///
/// `report_liveness` is used both as a pre-flight check (should heartbeating
/// run at all for this subject?) and as the recurring heartbeat callback. It
/// is invoked from a background thread and must be safe to run concurrently
/// with the supervised operation itself.
pub trait Liveness: Send + Sync {
    /// Emit one liveness signal. Returns whether heartbeating should run.
    fn report_liveness(&self) -> Result<bool>;
}

/// Run `op` with a heartbeat reporting on behalf of `subject`.
///
/// Pre-flight: `report_liveness` is called once synchronously. If it returns
/// `Ok(true)`, a [`Heartbeat`] with the given interval is started with the
/// probe as its callback. If it fails, the failure is downgraded to a warning
/// and the run proceeds unmonitored — a missing heartbeat is better than
/// blocking a legitimate run.
///
/// The operation's result or failure passes through unchanged, and any
/// started heartbeat is cancelled exactly once on both exit paths. If the
/// returned future is dropped mid-operation, the heartbeat's own drop
/// handling stops the loop within one tick.
pub async fn run_with_heartbeat<L, T, F, Fut>(
    subject: Arc<L>,
    interval_secs: u64,
    op: F,
) -> Result<T>
where
    L: Liveness + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut heartbeat = match subject.report_liveness() {
        Ok(true) => {
            let probe = Arc::clone(&subject);
            let callback: BeatFn = Arc::new(move || probe.report_liveness());
            let mut heartbeat = Heartbeat::new(interval_secs, callback);
            heartbeat.start();
            Some(heartbeat)
        }
        Ok(false) => {
            debug!("Liveness probe declined heartbeating for this run");
            None
        }
        Err(e) => {
            warn!(
                "Heartbeat failed to start; this could result in a zombie run: {}",
                e
            );
            None
        }
    };

    let result = op().await;

    if let Some(heartbeat) = heartbeat.as_mut() {
        heartbeat.cancel().await;
    }

    result
}
