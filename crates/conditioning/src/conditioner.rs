//! The conditioning session state machine.
//!
//! Per accepted sample:
//! 1. Reject inactive or `(0, 0)` samples without touching state
//! 2. Push into the rolling history
//! 3. Take the recency-weighted average of the window
//! 4. Blend it into the smoothed state with factor `α`
//! 5. Gate against the last *emitted* point with threshold `T`
//! 6. Emit to consumers and remember the emission

use gazelens_common::config::ConditioningConfig;
use gazelens_common::error::GazeResult;
use gazelens_model::gaze::{GazePoint, HistoryEntry, StableGazeUpdate};
use gazelens_model::sample::{RawSample, SampleClass};
use serde::Serialize;

use crate::consumer::GazeConsumer;
use crate::history::RollingHistory;

/// Whether a conditioning session is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionerState {
    /// No session; samples are ignored.
    Idle,
    /// Session running; samples are folded in.
    Active,
}

/// What happened to one ingested sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conditioned {
    /// No session is active; the sample was ignored.
    Idle,
    /// Sample was not usable; state is unchanged.
    Rejected(SampleClass),
    /// State advanced but movement stayed under the gate.
    Suppressed,
    /// State advanced and consumers were notified.
    Emitted(StableGazeUpdate),
}

impl Conditioned {
    pub fn update(&self) -> Option<StableGazeUpdate> {
        match self {
            Conditioned::Emitted(update) => Some(*update),
            _ => None,
        }
    }
}

/// Per-session counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConditionerStats {
    pub accepted: u64,
    pub rejected: u64,
    pub emitted: u64,
    pub suppressed: u64,
}

/// State that lives exactly as long as one session.
#[derive(Debug)]
struct Session {
    history: RollingHistory,
    smoothed: Option<GazePoint>,
    last_emitted: Option<StableGazeUpdate>,
    stats: ConditionerStats,
}

impl Session {
    fn new(window_size: usize) -> Self {
        Self {
            history: RollingHistory::new(window_size),
            smoothed: None,
            last_emitted: None,
            stats: ConditionerStats::default(),
        }
    }
}

/// Gaze conditioning pipeline.
///
/// Each instance is independent; nothing is shared between conditioners.
/// History, smoothed state, and the last emission are created on `start`
/// and dropped on `stop`, so no state leaks from one session into the
/// next.
pub struct GazeConditioner {
    config: ConditioningConfig,
    session: Option<Session>,
    consumers: Vec<Box<dyn GazeConsumer>>,
}

impl GazeConditioner {
    /// Create an idle conditioner with validated tunables.
    pub fn new(config: ConditioningConfig) -> GazeResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            session: None,
            consumers: Vec::new(),
        })
    }

    /// Create a conditioner with default tunables (H=5, α=0.3, T=2).
    pub fn with_defaults() -> Self {
        Self {
            config: ConditioningConfig::default(),
            session: None,
            consumers: Vec::new(),
        }
    }

    pub fn config(&self) -> &ConditioningConfig {
        &self.config
    }

    /// Register a consumer. Consumers outlive sessions.
    pub fn subscribe(&mut self, consumer: impl GazeConsumer + 'static) {
        self.consumers.push(Box::new(consumer));
    }

    pub fn state(&self) -> ConditionerState {
        if self.session.is_some() {
            ConditionerState::Active
        } else {
            ConditionerState::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Begin a session. Starting an active conditioner is a no-op.
    pub fn start(&mut self) -> bool {
        if self.session.is_none() {
            self.session = Some(Session::new(self.config.window_size));
            tracing::debug!(
                window = self.config.window_size,
                alpha = self.config.smoothing_factor,
                gate = self.config.gate_threshold,
                "Conditioning session started"
            );
        }
        true
    }

    /// End the session and discard its state. Stopping an idle conditioner
    /// is a no-op.
    pub fn stop(&mut self) -> bool {
        if let Some(session) = self.session.take() {
            tracing::debug!(stats = ?session.stats, "Conditioning session stopped");
        }
        true
    }

    /// Fold one sample into the session.
    pub fn ingest(&mut self, sample: &RawSample) -> Conditioned {
        let config = self.config;
        let Some(session) = self.session.as_mut() else {
            return Conditioned::Idle;
        };

        let class = sample.classify();
        if class != SampleClass::Valid {
            session.stats.rejected += 1;
            return Conditioned::Rejected(class);
        }
        session.stats.accepted += 1;

        session.history.push(HistoryEntry {
            x: sample.x,
            y: sample.y,
            timestamp_ns: sample.captured_at,
        });

        let Some(average) = session.history.weighted_average() else {
            return Conditioned::Suppressed;
        };

        // The first sample of a session seeds the filter.
        let smoothed = match session.smoothed {
            Some(previous) => previous.blend(&average, config.smoothing_factor),
            None => average,
        };
        session.smoothed = Some(smoothed);

        if let Some(last) = session.last_emitted {
            if smoothed.distance_to(&last.point()) < config.gate_threshold {
                session.stats.suppressed += 1;
                return Conditioned::Suppressed;
            }
        }

        let update = StableGazeUpdate {
            x: smoothed.x,
            y: smoothed.y,
            tracking_active: true,
        };
        session.last_emitted = Some(update);
        session.stats.emitted += 1;

        for consumer in &mut self.consumers {
            consumer.on_update(&update);
        }

        Conditioned::Emitted(update)
    }

    /// Current smoothed coordinate, if the session has accepted a sample.
    pub fn smoothed(&self) -> Option<GazePoint> {
        self.session.as_ref().and_then(|s| s.smoothed)
    }

    /// Last update handed to consumers in this session.
    pub fn last_emitted(&self) -> Option<StableGazeUpdate> {
        self.session.as_ref().and_then(|s| s.last_emitted)
    }

    /// Entries currently in the history window (zero when idle).
    pub fn history_len(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.history.len())
    }

    /// Recency-weighted average of the current window.
    pub fn weighted_average(&self) -> Option<GazePoint> {
        self.session
            .as_ref()
            .and_then(|s| s.history.weighted_average())
    }

    /// Counters for the running session.
    pub fn stats(&self) -> ConditionerStats {
        self.session.as_ref().map(|s| s.stats).unwrap_or_default()
    }
}
