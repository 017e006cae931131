//! GazeLens Model
//!
//! Defines the data contracts shared by the gaze crates:
//! - **Samples:** The producer's channel record and the per-tick `RawSample`
//! - **Gaze:** History entries, smoothed points, and `StableGazeUpdate`
//! - **Status:** Channel connectivity and user-facing warnings
//! - **Overlay:** Coordinate math that places a pointer and focus region
//!
//! Coordinates are kept at full `f64` precision; rounding is a consumer
//! decision.

pub mod gaze;
pub mod overlay;
pub mod sample;
pub mod status;

pub use gaze::*;
pub use overlay::*;
pub use sample::*;
pub use status::*;
