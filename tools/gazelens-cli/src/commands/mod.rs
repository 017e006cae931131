pub mod config;
pub mod monitor;
pub mod read;
pub mod refresh;
pub mod status;
pub mod track;

use gazelens_model::sample::{RawSample, SampleClass};
use gazelens_source::ChannelError;

/// Render one adapter reading the way the single-read and monitor
/// commands print it. `Err` holds the message for unusable readings.
pub fn describe_reading(reading: &Result<RawSample, ChannelError>) -> Result<String, String> {
    match reading {
        Ok(sample) => match sample.classify() {
            SampleClass::Valid => Ok(format!(
                "X: {}, Y: {}",
                sample.x.round() as i64,
                sample.y.round() as i64
            )),
            SampleClass::TrackingInactive => Err("Eye tracking not active".to_string()),
            SampleClass::Degenerate => {
                Err("Invalid coordinates (0,0) - check tracker calibration".to_string())
            }
        },
        Err(ChannelError::NotFound { path }) => Err(format!(
            "Gaze channel not found at {}. Make sure the tracker producer is running.",
            path.display()
        )),
        Err(ChannelError::Transient { reason }) => Err(format!("No gaze data available ({reason})")),
    }
}
