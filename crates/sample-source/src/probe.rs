//! Channel connectivity probing.
//!
//! The producer rewrites the channel continuously while it runs, so the
//! channel's modification time doubles as a heartbeat.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use gazelens_common::clock::age_of;
use gazelens_common::error::GazeResult;
use gazelens_model::status::ChannelStatus;

/// Reports whether the producer is alive based on channel freshness.
#[derive(Debug, Clone)]
pub struct ConnectivityProbe {
    path: PathBuf,
    freshness: Duration,
}

impl ConnectivityProbe {
    pub fn new(path: impl Into<PathBuf>, freshness: Duration) -> Self {
        Self {
            path: path.into(),
            freshness,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn freshness(&self) -> Duration {
        self.freshness
    }

    /// Probe the channel against the current time.
    pub fn check_status(&self) -> ChannelStatus {
        self.check_status_at(SystemTime::now())
    }

    /// Probe the channel against an explicit `now`.
    pub fn check_status_at(&self, now: SystemTime) -> ChannelStatus {
        let modified = match std::fs::metadata(&self.path).and_then(|meta| meta.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                tracing::trace!(path = %self.path.display(), error = %e, "Channel not inspectable");
                return ChannelStatus::absent(self.path.clone());
            }
        };

        ChannelStatus {
            connected: age_of(modified, now) < self.freshness,
            last_update: Some(DateTime::<Utc>::from(modified)),
            path: self.path.clone(),
        }
    }
}

/// Bump the channel's modification time to now.
///
/// Returns `false` without touching anything when the channel does not
/// exist.
pub fn refresh_channel(path: &Path) -> GazeResult<bool> {
    if !path.exists() {
        return Ok(false);
    }
    let file = File::options().write(true).open(path)?;
    file.set_modified(SystemTime::now())?;
    tracing::info!(path = %path.display(), "Refreshed gaze channel timestamp");
    Ok(true)
}
