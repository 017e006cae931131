//! Conditioned gaze values.

use serde::{Deserialize, Serialize};

use crate::sample::TimestampNs;

/// A 2D gaze coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GazePoint {
    pub x: f64,
    pub y: f64,
}

impl GazePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &GazePoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Exponential blend: `self * (1 - alpha) + target * alpha`, per axis.
    pub fn blend(&self, target: &GazePoint, alpha: f64) -> GazePoint {
        GazePoint {
            x: self.x * (1.0 - alpha) + target.x * alpha,
            y: self.y * (1.0 - alpha) + target.y * alpha,
        }
    }
}

/// One slot of the rolling history window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,
}

impl HistoryEntry {
    pub fn point(&self) -> GazePoint {
        GazePoint::new(self.x, self.y)
    }
}

/// The only value handed to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StableGazeUpdate {
    pub x: f64,
    pub y: f64,
    pub tracking_active: bool,
}

impl StableGazeUpdate {
    pub fn point(&self) -> GazePoint {
        GazePoint::new(self.x, self.y)
    }

    /// Coordinates rounded to whole pixels for display.
    pub fn rounded(&self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }
}
