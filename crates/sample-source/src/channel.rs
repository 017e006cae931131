//! File-backed gaze channel.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use gazelens_common::clock::GazeClock;
use gazelens_model::sample::{ChannelRecord, RawSample};

use crate::{ChannelError, SampleSource};

/// Reads the JSON record the producer rewrites at its own cadence.
///
/// Each poll is a single whole-file read. The producer does not write
/// atomically, so a poll can land mid-write; that reads as `Transient`.
pub struct FileChannel {
    path: PathBuf,
    clock: GazeClock,
}

impl FileChannel {
    /// Open a channel at `path`. The file does not need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            clock: GazeClock::start(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_record(&self) -> Result<ChannelRecord, ChannelError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ChannelError::NotFound {
                path: self.path.clone(),
            },
            _ => ChannelError::transient(format!("read failed: {e}")),
        })?;

        ChannelRecord::parse(&content).map_err(|e| ChannelError::transient(e.to_string()))
    }
}

impl SampleSource for FileChannel {
    fn poll(&mut self) -> Result<RawSample, ChannelError> {
        match self.read_record() {
            Ok(record) => Ok(RawSample::from_record(&record, self.clock.elapsed_ns())),
            Err(e) => {
                tracing::trace!(path = %self.path.display(), error = %e, "Skipping tick");
                Err(e)
            }
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}
