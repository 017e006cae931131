//! Periodic connectivity reporting.

use std::time::Duration;

use gazelens_model::status::{GazeWarning, TrackerStatus};
use gazelens_source::ConnectivityProbe;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::runtime_handle;

/// Probes the channel on its own cadence and publishes `TrackerStatus`.
///
/// Runs independently of tracking sessions. When given a session's
/// warning receiver, warning changes are folded in immediately rather
/// than waiting for the next probe.
pub struct StatusMonitor {
    probe: ConnectivityProbe,
    interval: Duration,
    status: watch::Sender<TrackerStatus>,
    task: Option<JoinHandle<()>>,
}

impl StatusMonitor {
    pub fn new(probe: ConnectivityProbe, interval: Duration) -> Self {
        let initial = TrackerStatus::new(probe.check_status());
        let (status, _) = watch::channel(initial);
        Self {
            probe,
            interval,
            status,
            task: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<TrackerStatus> {
        self.status.subscribe()
    }

    /// Probe now, publish, and return the result. Keeps the current warning.
    pub fn check_now(&self) -> TrackerStatus {
        let warning = self.status.borrow().warning;
        let status = TrackerStatus {
            channel: self.probe.check_status(),
            warning,
        };
        self.status.send_replace(status.clone());
        status
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Start periodic probing. Returns `true` if running afterwards.
    pub fn start(&mut self, warnings: Option<watch::Receiver<Option<GazeWarning>>>) -> bool {
        if self.task.is_some() {
            return true;
        }
        let runtime = match runtime_handle() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(error = %e, "Cannot start status monitor");
                return false;
            }
        };

        self.task = Some(runtime.spawn(run_probes(
            self.probe.clone(),
            self.interval,
            self.status.clone(),
            warnings,
        )));
        tracing::debug!(
            path = %self.probe.path().display(),
            interval_ms = self.interval.as_millis() as u64,
            "Status monitor started"
        );
        true
    }

    pub fn stop(&mut self) -> bool {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        true
    }
}

impl Drop for StatusMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_probes(
    probe: ConnectivityProbe,
    interval: Duration,
    status: watch::Sender<TrackerStatus>,
    mut warnings: Option<watch::Receiver<Option<GazeWarning>>>,
) {
    let mut ticks = tokio::time::interval(interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut was_connected = status.borrow().connected();

    loop {
        tokio::select! {
            _ = ticks.tick() => {}
            changed = next_warning(&mut warnings) => {
                if changed.is_err() {
                    warnings = None;
                }
            }
        }

        let warning = warnings.as_ref().and_then(|rx| *rx.borrow());
        let next = TrackerStatus {
            channel: probe.check_status(),
            warning,
        };

        if next.connected() != was_connected {
            if next.connected() {
                tracing::info!(path = %next.channel.path.display(), "Gaze channel connected");
            } else {
                tracing::warn!(
                    last_update = ?next.channel.last_update,
                    "Gaze channel disconnected; is the tracker producer running?"
                );
            }
            was_connected = next.connected();
        }

        status.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

async fn next_warning(
    warnings: &mut Option<watch::Receiver<Option<GazeWarning>>>,
) -> Result<(), watch::error::RecvError> {
    match warnings {
        Some(rx) => rx.changed().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gazelens_test_status_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    async fn wait_for(
        status: &mut watch::Receiver<TrackerStatus>,
        expected: impl Fn(&TrackerStatus) -> bool,
    ) {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if expected(&status.borrow_and_update()) {
                    break;
                }
                status.changed().await.unwrap();
            }
        })
        .await
        .expect("status within timeout");
    }

    #[test]
    fn test_check_now_reflects_channel() {
        let dir = test_dir("check_now");
        let path = dir.join("gaze.json");
        let monitor = StatusMonitor::new(
            ConnectivityProbe::new(&path, Duration::from_secs(5)),
            Duration::from_millis(2000),
        );
        assert!(!monitor.check_now().connected());

        std::fs::write(&path, r#"{"x": 1, "y": 1, "tracking": true}"#).unwrap();
        assert!(monitor.check_now().connected());
        assert!(monitor.subscribe().borrow().connected());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_warning_changes_are_published() {
        let dir = test_dir("warnings");
        let mut monitor = StatusMonitor::new(
            ConnectivityProbe::new(dir.join("gaze.json"), Duration::from_secs(5)),
            Duration::from_secs(60),
        );
        let mut status = monitor.subscribe();
        let (warn_tx, warn_rx) = watch::channel(None);

        assert!(monitor.start(Some(warn_rx)));
        warn_tx.send_replace(Some(GazeWarning::DegenerateSample));

        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if status.borrow_and_update().warning.is_some() {
                    break;
                }
                status.changed().await.unwrap();
            }
        })
        .await
        .expect("warning published");

        assert!(monitor.stop());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_periodic_probe_follows_connectivity() {
        let dir = test_dir("periodic");
        let path = dir.join("gaze.json");
        let mut monitor = StatusMonitor::new(
            ConnectivityProbe::new(&path, Duration::from_secs(5)),
            Duration::from_millis(10),
        );
        let mut status = monitor.subscribe();
        assert!(!status.borrow_and_update().connected());
        assert!(monitor.start(None));

        std::fs::write(&path, r#"{"x": 1, "y": 1, "tracking": true}"#).unwrap();
        wait_for(&mut status, |s| s.connected()).await;

        let file = std::fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(60))
            .unwrap();
        wait_for(&mut status, |s| !s.connected()).await;
        assert!(status.borrow().channel.last_update.is_some());

        assert!(monitor.stop());
        std::fs::remove_dir_all(&dir).ok();
    }
}
