//! GazeLens Sample Source
//!
//! Turns the producer's periodically rewritten channel into discrete
//! `RawSample` readings, one per poll tick. Sources are pluggable:
//!
//! - **File channel:** Reads the JSON record the producer rewrites on disk
//! - **Scripted:** Replays a fixed sequence of readings (tests, demos)
//!
//! Channel absence and partial writes are expected during normal
//! operation. They surface as `ChannelError` values so the caller can
//! skip the tick; they are never fatal.

pub mod channel;
pub mod probe;
pub mod scripted;

use std::path::PathBuf;

use gazelens_model::sample::RawSample;

pub use channel::FileChannel;
pub use probe::{refresh_channel, ConnectivityProbe};
pub use scripted::ScriptedSource;

/// Recoverable per-tick channel failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChannelError {
    /// The producer is not running or has not written yet.
    #[error("gaze channel not found at {path}")]
    NotFound { path: PathBuf },

    /// Empty, partially written, or otherwise unreadable content.
    #[error("gaze channel unreadable: {reason}")]
    Transient { reason: String },
}

impl ChannelError {
    pub fn transient(reason: impl Into<String>) -> Self {
        Self::Transient {
            reason: reason.into(),
        }
    }

    /// Whether the failure should be kept out of user-facing output.
    ///
    /// Every channel failure is silent at the polling layer; the tick is
    /// simply skipped.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            ChannelError::NotFound { .. } | ChannelError::Transient { .. }
        )
    }
}

/// A source of raw gaze samples.
pub trait SampleSource: Send {
    /// Take the latest reading. Must not block beyond a best-effort read.
    fn poll(&mut self) -> Result<RawSample, ChannelError>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn poll(&mut self) -> Result<RawSample, ChannelError> {
        (**self).poll()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
