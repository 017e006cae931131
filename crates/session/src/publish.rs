//! Non-blocking fan-out of stable updates.

use gazelens_conditioning::GazeConsumer;
use gazelens_model::gaze::StableGazeUpdate;
use tokio::sync::watch;

/// Publishes every update into a watch channel.
///
/// Receivers always see the most recent update; a slow receiver skips
/// intermediate values instead of holding up the tick.
pub struct WatchConsumer {
    sender: watch::Sender<Option<StableGazeUpdate>>,
}

impl WatchConsumer {
    pub fn new(sender: watch::Sender<Option<StableGazeUpdate>>) -> Self {
        Self { sender }
    }
}

impl GazeConsumer for WatchConsumer {
    fn on_update(&mut self, update: &StableGazeUpdate) {
        self.sender.send_replace(Some(*update));
    }
}
