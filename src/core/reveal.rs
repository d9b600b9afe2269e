use crate::domain::model::MarkerId;
use std::collections::VecDeque;

/// Ordered queue of markers waiting to be revealed one at a time.
///
/// Clearing the queue drops every pending reveal at once, so a new location
/// set never races reveals scheduled for the previous one.
#[derive(Debug, Default)]
pub struct RevealQueue {
    pending: VecDeque<MarkerId>,
}

impl RevealQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: MarkerId) {
        self.pending.push_back(id);
    }

    pub fn pop_next(&mut self) -> Option<MarkerId> {
        self.pending.pop_front()
    }

    /// Drops a pending reveal. Returns whether it was queued.
    pub fn remove(&mut self, id: MarkerId) -> bool {
        match self.pending.iter().position(|p| *p == id) {
            Some(pos) => {
                self.pending.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
