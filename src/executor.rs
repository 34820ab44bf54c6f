//! Deadline-bounded execution of blocking units of work.
//!
//! Bounds the caller's *wait*, not the work: there is no safe way to preempt
//! an in-flight closure, so a call that outlives its deadline is abandoned.
//! The worker thread runs to natural completion and its eventual output is
//! discarded.

use std::time::Duration;

use tracing::debug;

use crate::context::{self, ScopedContext};
use crate::error::{Result, RunnerError};

/// Run `f` with an optional wall-clock deadline on the caller's wait.
///
/// Without a deadline, `f` runs inline on the caller's thread — no dispatch,
/// no overhead — and its result or failure is returned unchanged.
///
/// With a deadline, the caller's current [`ContextSnapshot`] is captured and
/// restored on a dedicated worker thread (scoped to the call, reverted when
/// the closure finishes), and the caller waits at most `deadline` for the
/// result. On overrun the call fails with [`RunnerError::Timeout`] while the
/// worker keeps running; nothing ever synchronizes on the orphan's
/// completion.
///
/// A zero deadline behaves as already expired.
///
/// [`ContextSnapshot`]: crate::context::ContextSnapshot
pub async fn run_with_deadline<T, F>(f: F, deadline: Option<Duration>) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let Some(deadline) = deadline else {
        return f();
    };

    let snapshot = context::capture();
    let worker = tokio::task::spawn_blocking(move || {
        let _ctx = ScopedContext::enter(snapshot);
        f()
    });

    match tokio::time::timeout(deadline, worker).await {
        Ok(joined) => joined.unwrap_or_else(|e| Err(RunnerError::Worker(e.to_string()))),
        Err(_) => {
            debug!(
                "Deadline of {:?} elapsed; abandoning the worker to run to completion",
                deadline
            );
            Err(RunnerError::Timeout)
        }
    }
}
