//! TaskPulse - concurrency primitives for workflow task runners.
//!
//! Two primitives, plus the orchestration that ties them together:
//!
//! - [`executor::run_with_deadline`]: run a blocking unit of work with a
//!   wall-clock bound on the caller's *wait*. An overrun never blocks the
//!   caller; the worker is abandoned and runs to natural completion with its
//!   output discarded.
//! - [`heartbeat::Heartbeat`]: a periodic liveness signal emitted on a
//!   background thread while a long task executes, so an external supervisor
//!   can detect stalled runs.
//! - [`heartbeat::run_with_heartbeat`]: starts a heartbeat around a
//!   supervised operation and guarantees it is cancelled on every exit path.
//!
//! Both primitives propagate the ambient [`context::ContextSnapshot`] across
//! thread boundaries by explicit capture/restore, never by shared reference.

pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod heartbeat;

pub use config::RunnerConfig;
pub use context::{ContextSnapshot, ScopedContext};
pub use error::{Result, RunnerError};
pub use executor::run_with_deadline;
pub use heartbeat::{run_with_heartbeat, Heartbeat, Liveness};
