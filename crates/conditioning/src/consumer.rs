//! Consumers of stable gaze updates.

use gazelens_model::gaze::StableGazeUpdate;

/// Receives every emitted update, in emission order.
///
/// Consumers run on the conditioning tick and must return quickly. Slow
/// consumers should hand off to a channel (see `WatchConsumer` in
/// `gazelens-session`) rather than doing work inline.
pub trait GazeConsumer: Send {
    fn on_update(&mut self, update: &StableGazeUpdate);
}

impl<F> GazeConsumer for F
where
    F: FnMut(&StableGazeUpdate) + Send,
{
    fn on_update(&mut self, update: &StableGazeUpdate) {
        self(update)
    }
}
