//! Channel connectivity and user-facing warnings.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a connectivity probe against the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStatus {
    /// Channel was rewritten within the freshness threshold.
    pub connected: bool,
    /// Last modification time of the channel, if it exists.
    pub last_update: Option<DateTime<Utc>>,
    /// Channel location.
    pub path: PathBuf,
}

impl ChannelStatus {
    /// Status for a channel that does not exist or cannot be inspected.
    pub fn absent(path: PathBuf) -> Self {
        Self {
            connected: false,
            last_update: None,
            path,
        }
    }
}

/// Recoverable conditions surfaced to the user without halting a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GazeWarning {
    /// Tracking is active but the producer reports `(0, 0)`.
    DegenerateSample,
}

impl GazeWarning {
    /// Short advice for a status line.
    pub fn message(&self) -> &'static str {
        match self {
            GazeWarning::DegenerateSample => {
                "Receiving (0,0) coordinates - check tracker calibration"
            }
        }
    }
}

/// Everything a status display needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerStatus {
    #[serde(flatten)]
    pub channel: ChannelStatus,
    pub warning: Option<GazeWarning>,
}

impl TrackerStatus {
    pub fn new(channel: ChannelStatus) -> Self {
        Self {
            channel,
            warning: None,
        }
    }

    pub fn connected(&self) -> bool {
        self.channel.connected
    }
}
