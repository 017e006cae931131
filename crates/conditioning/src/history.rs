//! Rolling sample history with recency-weighted averaging.

use std::collections::VecDeque;

use gazelens_model::gaze::{GazePoint, HistoryEntry};

/// Fixed-capacity FIFO of the most recent accepted samples.
#[derive(Debug, Clone)]
pub struct RollingHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl RollingHistory {
    /// Create an empty history holding at most `capacity` entries.
    ///
    /// A zero capacity is raised to one so an accepted sample is never
    /// dropped on arrival.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest when full.
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Recency-weighted average of the window.
    ///
    /// Entry `i` (oldest first) of `n` carries weight `(i + 1) / n`.
    /// Returns `None` for an empty window.
    pub fn weighted_average(&self) -> Option<GazePoint> {
        let n = self.entries.len();
        if n == 0 {
            return None;
        }

        let nf = n as f64;
        let (sum_x, sum_y) = self
            .entries
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(sx, sy), (i, entry)| {
                let w = (i + 1) as f64 / nf;
                (sx + entry.x * w, sy + entry.y * w)
            });

        let total = weight_sum(n);
        Some(GazePoint::new(sum_x / total, sum_y / total))
    }
}

/// Sum of the recency weights for a window of `n` entries: `Σ i/n` for
/// `i = 1..=n`, which is `(n + 1) / 2`.
pub fn weight_sum(n: usize) -> f64 {
    let nf = n as f64;
    (1..=n).map(|i| i as f64 / nf).sum()
}
