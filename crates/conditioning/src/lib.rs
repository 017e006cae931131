//! GazeLens Conditioning Pipeline
//!
//! Converts a noisy stream of raw gaze samples into low-jitter,
//! rate-limited stable updates:
//! - **History:** Rolling window with recency-weighted averaging
//! - **Smoothing:** Single-pole exponential filter over the weighted average
//! - **Gating:** Suppress updates that move less than a threshold
//!
//! This crate is pure computation with no I/O and no timers. Samples are fed in
//! by the caller; updates come out as values and through registered
//! consumers.

pub mod conditioner;
pub mod consumer;
pub mod history;

pub use conditioner::{Conditioned, ConditionerState, ConditionerStats, GazeConditioner};
pub use consumer::GazeConsumer;
pub use gazelens_common::config::ConditioningConfig;
pub use history::RollingHistory;
