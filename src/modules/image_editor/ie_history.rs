use image::RgbImage;
use std::collections::VecDeque;

pub const MAX_UNDO: usize = 10;

/// Bounded stack of full-image snapshots, most recent at the back.
/// Pushing past `capacity` evicts the oldest snapshot.
#[derive(Debug, Clone)]
pub struct EditHistory {
    snapshots: VecDeque<RgbImage>,
    capacity: usize,
}

impl Default for EditHistory {
    fn default() -> Self { Self::with_capacity(MAX_UNDO) }
}

impl EditHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { snapshots: VecDeque::with_capacity(capacity + 1), capacity }
    }

    pub fn push(&mut self, snapshot: RgbImage) {
        self.snapshots.push_back(snapshot);
        if self.snapshots.len() > self.capacity { self.snapshots.pop_front(); }
    }

    pub fn pop(&mut self) -> Option<RgbImage> { self.snapshots.pop_back() }
    pub fn clear(&mut self) { self.snapshots.clear(); }
    pub fn len(&self) -> usize { self.snapshots.len() }
    pub fn is_empty(&self) -> bool { self.snapshots.is_empty() }
    pub fn capacity(&self) -> usize { self.capacity }
}
