//! GazeLens Session Runtime
//!
//! Drives the conditioning pipeline from a sample source on a fixed tick:
//!
//! - **Ticker:** One synchronous poll → fold → gate → emit step
//! - **Tracking session:** Runs the ticker on a tokio interval between
//!   `start` and `stop`, publishing stable updates on a watch channel
//! - **Status monitor:** Probes channel freshness on its own cadence
//!
//! Ticks never overlap: each runs to completion under one lock, and
//! overrun ticks are dropped rather than queued.

pub mod publish;
pub mod session;
pub mod status;
pub mod ticker;

use std::sync::{Mutex, MutexGuard, PoisonError};

use gazelens_common::error::{GazeError, GazeResult};
use tokio::runtime::Handle;

pub use publish::WatchConsumer;
pub use session::{SessionConfig, TrackingSession};
pub use status::StatusMonitor;
pub use ticker::{GazeTicker, TickOutcome};

/// Lock a mutex, recovering the data if a previous holder panicked.
///
/// Tick state is plain data with no invariants spanning an unwind, so a
/// poisoned lock is still usable.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle of the ambient tokio runtime, for spawning background tasks.
pub(crate) fn runtime_handle() -> GazeResult<Handle> {
    Handle::try_current().map_err(|e| GazeError::session(format!("no tokio runtime: {e}")))
}
