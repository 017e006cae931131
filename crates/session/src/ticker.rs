//! Synchronous tick: poll the source once and fold the result.

use gazelens_conditioning::{Conditioned, ConditionerStats, GazeConditioner, GazeConsumer};
use gazelens_model::gaze::StableGazeUpdate;
use gazelens_model::sample::SampleClass;
use gazelens_model::status::GazeWarning;
use gazelens_source::{ChannelError, SampleSource};

/// What one tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No session active; the source was not polled.
    Idle,
    /// The channel produced no sample this tick.
    Skipped(ChannelError),
    /// A sample arrived but carried no usable coordinate.
    Rejected(SampleClass),
    /// The pipeline advanced without notifying consumers.
    Suppressed,
    /// Consumers were notified.
    Emitted(StableGazeUpdate),
}

/// Couples a sample source with a conditioner.
///
/// The ticker has no notion of time; whoever owns it decides when to
/// call [`GazeTicker::tick`]. Tests drive it directly.
pub struct GazeTicker<S = Box<dyn SampleSource>> {
    source: S,
    conditioner: GazeConditioner,
    warning: Option<GazeWarning>,
    skipped: u64,
}

impl<S: SampleSource> GazeTicker<S> {
    pub fn new(source: S, conditioner: GazeConditioner) -> Self {
        Self {
            source,
            conditioner,
            warning: None,
            skipped: 0,
        }
    }

    /// Register a consumer on the underlying conditioner.
    pub fn subscribe(&mut self, consumer: impl GazeConsumer + 'static) {
        self.conditioner.subscribe(consumer);
    }

    pub fn start(&mut self) -> bool {
        self.skipped = 0;
        self.conditioner.start()
    }

    /// Stop the session, returning the counters it ended with.
    pub fn stop(&mut self) -> ConditionerStats {
        let stats = self.conditioner.stats();
        self.conditioner.stop();
        self.set_warning(None);
        stats
    }

    pub fn is_active(&self) -> bool {
        self.conditioner.is_active()
    }

    pub fn conditioner(&self) -> &GazeConditioner {
        &self.conditioner
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Current user-facing warning, if any.
    pub fn warning(&self) -> Option<GazeWarning> {
        self.warning
    }

    /// Ticks in this session that produced no sample.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Run one poll → fold → gate → emit step.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.conditioner.is_active() {
            return TickOutcome::Idle;
        }

        let sample = match self.source.poll() {
            Ok(sample) => sample,
            Err(e) => {
                self.skipped += 1;
                return TickOutcome::Skipped(e);
            }
        };

        match self.conditioner.ingest(&sample) {
            Conditioned::Idle => TickOutcome::Idle,
            Conditioned::Rejected(SampleClass::Degenerate) => {
                self.set_warning(Some(GazeWarning::DegenerateSample));
                TickOutcome::Rejected(SampleClass::Degenerate)
            }
            Conditioned::Rejected(class) => TickOutcome::Rejected(class),
            Conditioned::Suppressed => {
                self.set_warning(None);
                TickOutcome::Suppressed
            }
            Conditioned::Emitted(update) => {
                self.set_warning(None);
                TickOutcome::Emitted(update)
            }
        }
    }

    fn set_warning(&mut self, warning: Option<GazeWarning>) {
        if self.warning == warning {
            return;
        }
        match warning {
            Some(w) => tracing::warn!(warning = ?w, "{}", w.message()),
            None => tracing::info!("Gaze coordinates valid again"),
        }
        self.warning = warning;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazelens_model::sample::RawSample;
    use gazelens_source::ScriptedSource;
    use std::path::PathBuf;

    fn ticker(readings: Vec<Result<RawSample, ChannelError>>) -> GazeTicker<ScriptedSource> {
        GazeTicker::new(
            ScriptedSource::new(readings),
            GazeConditioner::with_defaults(),
        )
    }

    fn valid(x: f64, y: f64) -> Result<RawSample, ChannelError> {
        Ok(RawSample::new(x, y, true, 0))
    }

    #[test]
    fn test_idle_ticker_does_not_poll() {
        let mut ticker = ticker(vec![valid(1.0, 1.0)]);
        assert_eq!(ticker.tick(), TickOutcome::Idle);
        ticker.start();
        assert!(matches!(ticker.tick(), TickOutcome::Emitted(_)));
    }

    #[test]
    fn test_channel_errors_skip_the_tick() {
        let mut ticker = ticker(vec![
            Err(ChannelError::NotFound {
                path: PathBuf::from("/tmp/none.json"),
            }),
            Err(ChannelError::transient("partial write")),
            valid(200.0, 100.0),
        ]);
        ticker.start();

        assert!(matches!(ticker.tick(), TickOutcome::Skipped(ChannelError::NotFound { .. })));
        assert!(matches!(ticker.tick(), TickOutcome::Skipped(ChannelError::Transient { .. })));
        assert!(matches!(ticker.tick(), TickOutcome::Emitted(_)));
        assert_eq!(ticker.skipped(), 2);
    }

    #[test]
    fn test_ticks_without_samples_never_emit() {
        let mut ticker = ticker(vec![valid(300.0, 300.0)]);
        ticker.start();
        assert!(matches!(ticker.tick(), TickOutcome::Emitted(_)));
        for _ in 0..10 {
            assert!(matches!(ticker.tick(), TickOutcome::Skipped(_)));
        }
        assert_eq!(ticker.conditioner().stats().emitted, 1);
    }

    #[test]
    fn test_degenerate_sample_raises_and_clears_warning() {
        let mut ticker = ticker(vec![
            valid(0.0, 0.0),
            Ok(RawSample::new(5.0, 5.0, false, 0)),
            valid(400.0, 250.0),
        ]);
        ticker.start();

        assert_eq!(ticker.tick(), TickOutcome::Rejected(SampleClass::Degenerate));
        assert_eq!(ticker.warning(), Some(GazeWarning::DegenerateSample));

        assert_eq!(ticker.tick(), TickOutcome::Rejected(SampleClass::TrackingInactive));
        assert_eq!(ticker.warning(), Some(GazeWarning::DegenerateSample));

        assert!(matches!(ticker.tick(), TickOutcome::Emitted(_)));
        assert_eq!(ticker.warning(), None);
    }

    #[test]
    fn test_stop_clears_warning_and_returns_stats() {
        let mut ticker = ticker(vec![valid(10.0, 10.0), valid(0.0, 0.0)]);
        ticker.start();
        ticker.tick();
        ticker.tick();

        let stats = ticker.stop();
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(ticker.warning(), None);
        assert_eq!(ticker.tick(), TickOutcome::Idle);
    }
}
