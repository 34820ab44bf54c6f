//! Heartbeat service - periodic liveness reporting for supervised runs.

mod guard;
mod ticker;

pub use guard::{run_with_heartbeat, Liveness};
pub use ticker::{BeatFn, Heartbeat};
