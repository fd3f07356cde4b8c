//! Bounded record of recent predictions.

use std::collections::VecDeque;

use neuropilot_core::models::PredictionResult;

/// FIFO of the most recent predictions. Pushing past capacity evicts the
/// oldest entry.
#[derive(Debug, Clone)]
pub(crate) struct PredictionHistory {
    entries: VecDeque<PredictionResult>,
    capacity: usize,
}

impl PredictionHistory {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub(crate) fn push(&mut self, result: PredictionResult) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(result);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
