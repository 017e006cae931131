//! Scripted source that replays a fixed sequence of readings.

use gazelens_model::sample::RawSample;

use crate::{ChannelError, SampleSource};

/// Replays pre-loaded readings in order, one per poll.
///
/// Once exhausted, every poll reports the channel as transient, the same
/// as a producer that has stopped refreshing mid-write.
pub struct ScriptedSource {
    readings: Vec<Result<RawSample, ChannelError>>,
    index: usize,
    repeat: bool,
}

impl ScriptedSource {
    /// Create a source from readings, errors included.
    pub fn new(readings: Vec<Result<RawSample, ChannelError>>) -> Self {
        Self {
            readings,
            index: 0,
            repeat: false,
        }
    }

    /// Create a source that yields only the given samples.
    pub fn from_samples(samples: impl IntoIterator<Item = RawSample>) -> Self {
        Self::new(samples.into_iter().map(Ok).collect())
    }

    /// Cycle back to the first reading instead of running dry.
    pub fn repeating(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// Number of polls served so far.
    pub fn polls(&self) -> usize {
        self.index
    }
}

impl SampleSource for ScriptedSource {
    fn poll(&mut self) -> Result<RawSample, ChannelError> {
        if self.readings.is_empty() {
            return Err(ChannelError::transient("script is empty"));
        }
        let slot = if self.repeat {
            self.index % self.readings.len()
        } else if self.index < self.readings.len() {
            self.index
        } else {
            return Err(ChannelError::transient("script exhausted"));
        };
        self.index += 1;
        self.readings[slot].clone()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
