//! Tracking session management.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gazelens_common::config::{ChannelConfig, ConditioningConfig};
use gazelens_common::error::GazeResult;
use gazelens_conditioning::{GazeConditioner, GazeConsumer};
use gazelens_model::gaze::StableGazeUpdate;
use gazelens_model::status::GazeWarning;
use gazelens_source::SampleSource;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::{lock, runtime_handle};
use crate::publish::WatchConsumer;
use crate::ticker::{GazeTicker, TickOutcome};

/// Configuration for a tracking session.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Interval between sample polls.
    pub poll_interval: Duration,

    /// Conditioning tunables.
    pub conditioning: ConditioningConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(20),
            conditioning: ConditioningConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_app(channel: &ChannelConfig, conditioning: &ConditioningConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(channel.poll_interval_ms.max(1)),
            conditioning: *conditioning,
        }
    }
}

type SharedTicker = Arc<Mutex<GazeTicker>>;

/// A tracking session that polls a source on a fixed tick and publishes
/// stable gaze updates.
///
/// `start` and `stop` may be called any number of times; each start opens
/// a fresh conditioning session. Requires a tokio runtime to start.
pub struct TrackingSession {
    config: SessionConfig,
    ticker: SharedTicker,
    updates: watch::Sender<Option<StableGazeUpdate>>,
    warnings: watch::Sender<Option<GazeWarning>>,
    stop_flag: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl TrackingSession {
    /// Create an idle session over `source`.
    pub fn new(source: Box<dyn SampleSource>, config: SessionConfig) -> GazeResult<Self> {
        let (updates, _) = watch::channel(None);
        let (warnings, _) = watch::channel(None);

        let mut conditioner = GazeConditioner::new(config.conditioning)?;
        conditioner.subscribe(WatchConsumer::new(updates.clone()));

        Ok(Self {
            config,
            ticker: Arc::new(Mutex::new(GazeTicker::new(source, conditioner))),
            updates,
            warnings,
            stop_flag: Arc::new(AtomicBool::new(false)),
            task: None,
        })
    }

    /// Latest stable update; `None` before the first emission and after stop.
    pub fn subscribe(&self) -> watch::Receiver<Option<StableGazeUpdate>> {
        self.updates.subscribe()
    }

    /// Current user-facing warning.
    pub fn warnings(&self) -> watch::Receiver<Option<GazeWarning>> {
        self.warnings.subscribe()
    }

    /// Register an additional consumer, called inline on every emission.
    ///
    /// Consumers run on the tick task while the ticker lock is held, so
    /// they must return quickly and never block. Anything slow belongs
    /// behind [`TrackingSession::subscribe`], which only ever holds the
    /// latest update.
    pub fn add_consumer(&self, consumer: impl GazeConsumer + 'static) {
        lock(&self.ticker).subscribe(consumer);
    }

    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Start polling. Returns `true` if the session is running afterwards.
    pub fn start(&mut self) -> bool {
        if self.task.is_some() {
            return true;
        }

        let runtime = match runtime_handle() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(error = %e, "Cannot start tracking");
                return false;
            }
        };

        let source = {
            let mut ticker = lock(&self.ticker);
            ticker.start();
            ticker.source_name().to_string()
        };

        self.stop_flag = Arc::new(AtomicBool::new(false));
        self.task = Some(runtime.spawn(run_ticks(
            self.ticker.clone(),
            self.config.poll_interval,
            self.stop_flag.clone(),
            self.warnings.clone(),
        )));

        tracing::info!(
            source = %source,
            poll_ms = self.config.poll_interval.as_millis() as u64,
            window = self.config.conditioning.window_size,
            alpha = self.config.conditioning.smoothing_factor,
            gate = self.config.conditioning.gate_threshold,
            "Tracking session started"
        );
        true
    }

    /// Stop polling and discard conditioning state. Returns `true`.
    ///
    /// Once this returns no tick of the stopped session can run or
    /// publish: an in-flight tick finishes first (it holds the ticker lock
    /// while publishing), and any later tick sees the stop flag under that
    /// same lock.
    pub fn stop(&mut self) -> bool {
        let Some(task) = self.task.take() else {
            return true;
        };

        self.stop_flag.store(true, Ordering::SeqCst);
        task.abort();

        let (stats, skipped) = {
            let mut ticker = lock(&self.ticker);
            let skipped = ticker.skipped();
            let stats = ticker.stop();
            self.updates.send_replace(None);
            self.warnings.send_replace(None);
            (stats, skipped)
        };

        tracing::info!(
            accepted = stats.accepted,
            rejected = stats.rejected,
            emitted = stats.emitted,
            suppressed = stats.suppressed,
            skipped,
            "Tracking session stopped"
        );
        true
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_ticks(
    ticker: SharedTicker,
    poll_interval: Duration,
    stop_flag: Arc<AtomicBool>,
    warnings: watch::Sender<Option<GazeWarning>>,
) {
    let mut ticks = tokio::time::interval(poll_interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticks.tick().await;

        let outcome = {
            let mut ticker = lock(&ticker);
            if stop_flag.load(Ordering::SeqCst) {
                break;
            }
            let outcome = ticker.tick();
            let warning = ticker.warning();
            warnings.send_if_modified(|current| {
                if *current == warning {
                    false
                } else {
                    *current = warning;
                    true
                }
            });
            outcome
        };

        match outcome {
            TickOutcome::Idle => break,
            TickOutcome::Skipped(e) => tracing::trace!(error = %e, "Tick skipped"),
            TickOutcome::Emitted(update) => {
                tracing::trace!(x = update.x, y = update.y, "Stable gaze update")
            }
            TickOutcome::Rejected(_) | TickOutcome::Suppressed => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazelens_model::sample::RawSample;
    use gazelens_source::{ChannelError, ScriptedSource};

    /// Reports the tracker's "no calibration" coordinate, slowly.
    struct SlowDegenerateSource;

    impl SampleSource for SlowDegenerateSource {
        fn poll(&mut self) -> Result<RawSample, ChannelError> {
            std::thread::sleep(Duration::from_micros(300));
            Ok(RawSample::new(0.0, 0.0, true, 0))
        }

        fn name(&self) -> &str {
            "slow-degenerate"
        }
    }

    fn fast_config() -> SessionConfig {
        SessionConfig {
            poll_interval: Duration::from_millis(5),
            ..Default::default()
        }
    }

    fn steady_source(x: f64, y: f64) -> Box<dyn SampleSource> {
        Box::new(ScriptedSource::from_samples([RawSample::new(x, y, true, 0)]).repeating())
    }

    #[test]
    fn test_start_outside_runtime_fails_softly() {
        let mut session = TrackingSession::new(steady_source(1.0, 1.0), fast_config()).unwrap();
        assert!(!session.start());
        assert!(!session.is_active());
        assert!(session.stop());
    }

    #[tokio::test]
    async fn test_session_publishes_updates() {
        let mut session =
            TrackingSession::new(steady_source(640.0, 360.0), fast_config()).unwrap();
        let mut updates = session.subscribe();

        assert!(session.start());
        tokio::time::timeout(Duration::from_secs(2), updates.changed())
            .await
            .expect("update within timeout")
            .unwrap();

        let update = (*updates.borrow()).unwrap();
        assert_eq!((update.x, update.y), (640.0, 360.0));
        assert!(session.stop());
    }

    #[tokio::test]
    async fn test_start_stop_idempotent_and_clears_output() {
        let mut session =
            TrackingSession::new(steady_source(100.0, 100.0), fast_config()).unwrap();
        let updates = session.subscribe();

        assert!(session.stop());
        assert!(session.start());
        assert!(session.start());
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(updates.borrow().is_some());

        assert!(session.stop());
        assert!(session.stop());
        assert!(!session.is_active());
        assert!(updates.borrow().is_none());

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(updates.borrow().is_none(), "no tick may fire after stop");
    }

    #[tokio::test]
    async fn test_degenerate_source_raises_warning() {
        let source = Box::new(
            ScriptedSource::from_samples([RawSample::new(0.0, 0.0, true, 0)]).repeating(),
        );
        let mut session = TrackingSession::new(source, fast_config()).unwrap();
        let mut warnings = session.warnings();

        session.start();
        tokio::time::timeout(Duration::from_secs(2), warnings.changed())
            .await
            .expect("warning within timeout")
            .unwrap();
        assert_eq!(*warnings.borrow(), Some(GazeWarning::DegenerateSample));
        assert!(session.subscribe().borrow().is_none());

        session.stop();
        assert_eq!(*warnings.borrow(), None);
    }

    #[tokio::test]
    async fn test_extra_consumers_are_notified() {
        let seen = Arc::new(Mutex::new(0u32));
        let counter = seen.clone();

        let mut session =
            TrackingSession::new(steady_source(50.0, 50.0), fast_config()).unwrap();
        session.add_consumer(move |_: &StableGazeUpdate| {
            *counter.lock().unwrap() += 1;
        });

        session.start();
        tokio::time::sleep(Duration::from_millis(60)).await;
        session.stop();

        // Steady gaze: only the first tick passes the movement gate.
        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_no_warning_survives_stop_while_ticking() {
        let config = SessionConfig {
            poll_interval: Duration::from_millis(1),
            ..Default::default()
        };
        let mut session = TrackingSession::new(Box::new(SlowDegenerateSource), config).unwrap();
        let warnings = session.warnings();

        for round in 0..100 {
            assert!(session.start());
            tokio::time::sleep(Duration::from_millis(3)).await;
            assert!(session.stop());
            tokio::time::sleep(Duration::from_millis(5)).await;
            assert_eq!(*warnings.borrow(), None, "warning left behind in round {round}");
        }
    }
}
