//! Raw samples read from the producer's channel.
//!
//! The producer rewrites one JSON object per refresh:
//!
//! ```json
//! {"x": 812.4, "y": 377.9, "tracking": true, "tracker_connected": true}
//! ```
//!
//! Unknown fields are ignored and a missing `tracking` flag reads as
//! inactive.

use serde::{Deserialize, Serialize};

/// Monotonic timestamp in nanoseconds since the source's clock epoch.
pub type TimestampNs = u64;

/// The record as the producer writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    /// Screen X coordinate.
    pub x: f64,
    /// Screen Y coordinate.
    pub y: f64,
    /// Whether the producer currently has a gaze lock.
    #[serde(default)]
    pub tracking: bool,
    /// Whether the tracker hardware is attached, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker_connected: Option<bool>,
}

/// Why channel content could not be turned into a record.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("channel content is empty")]
    Empty,

    #[error("channel content is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ChannelRecord {
    /// Parse the full content of the channel.
    pub fn parse(content: &str) -> Result<Self, RecordError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(RecordError::Empty);
        }
        Ok(serde_json::from_str(trimmed)?)
    }
}

/// One reading taken on a poll tick. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    pub x: f64,
    pub y: f64,
    pub tracking_active: bool,
    /// Monotonic capture time.
    #[serde(rename = "t")]
    pub captured_at: TimestampNs,
}

/// How the pipeline should treat a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleClass {
    /// Usable coordinate.
    Valid,
    /// Producer reports no gaze lock; no usable coordinate, not an error.
    TrackingInactive,
    /// `(0, 0)` while tracking: the tracker's invalid-calibration signal.
    Degenerate,
}

impl RawSample {
    pub fn new(x: f64, y: f64, tracking_active: bool, captured_at: TimestampNs) -> Self {
        Self {
            x,
            y,
            tracking_active,
            captured_at,
        }
    }

    /// Build a sample from a parsed channel record.
    pub fn from_record(record: &ChannelRecord, captured_at: TimestampNs) -> Self {
        Self::new(record.x, record.y, record.tracking, captured_at)
    }

    /// Classify this sample. Inactive tracking wins over the degenerate check.
    pub fn classify(&self) -> SampleClass {
        if !self.tracking_active {
            SampleClass::TrackingInactive
        } else if self.x == 0.0 && self.y == 0.0 {
            SampleClass::Degenerate
        } else {
            SampleClass::Valid
        }
    }

    pub fn is_valid(&self) -> bool {
        self.classify() == SampleClass::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let record =
            ChannelRecord::parse(r#"{"x": 812.4, "y": 377.9, "tracking": true, "extra": 1}"#)
                .unwrap();
        assert_eq!(record.x, 812.4);
        assert_eq!(record.y, 377.9);
        assert!(record.tracking);
        assert_eq!(record.tracker_connected, None);
    }

    #[test]
    fn test_missing_tracking_reads_inactive() {
        let record = ChannelRecord::parse(r#"{"x": 1.0, "y": 2.0}"#).unwrap();
        assert!(!record.tracking);
        let sample = RawSample::from_record(&record, 0);
        assert_eq!(sample.classify(), SampleClass::TrackingInactive);
    }

    #[test]
    fn test_empty_and_partial_content() {
        assert!(matches!(ChannelRecord::parse("  \n"), Err(RecordError::Empty)));
        assert!(matches!(
            ChannelRecord::parse(r#"{"x": 10.0, "y": 2"#),
            Err(RecordError::Malformed(_))
        ));
        assert!(matches!(
            ChannelRecord::parse(r#"{"x": "ten", "y": 2, "tracking": true}"#),
            Err(RecordError::Malformed(_))
        ));
    }

    #[test]
    fn test_classification() {
        assert_eq!(RawSample::new(0.0, 0.0, true, 0).classify(), SampleClass::Degenerate);
        assert_eq!(
            RawSample::new(0.0, 0.0, false, 0).classify(),
            SampleClass::TrackingInactive
        );
        assert_eq!(RawSample::new(0.0, 5.0, true, 0).classify(), SampleClass::Valid);
        assert!(RawSample::new(640.25, 360.75, true, 0).is_valid());
    }
}
