use std::collections::VecDeque;

use glam::Vec2;

pub const HISTORY_CAPACITY: usize = 3;

/// One authoritative observation of the controlled entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub position: Vec2,
    pub orientation: f32,
    pub tick: u32,
}

impl Snapshot {
    pub fn new(position: Vec2, orientation: f32, tick: u32) -> Self {
        Self {
            position,
            orientation,
            tick,
        }
    }
}

/// The last three snapshots in arrival order. Reordered packets are kept
/// as they came.
#[derive(Debug, Default)]
pub struct SnapshotHistory {
    samples: VecDeque<Snapshot>,
}

impl SnapshotHistory {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        if self.samples.len() == HISTORY_CAPACITY {
            self.samples.pop_front();
        }
        self.samples.push_back(snapshot);
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == HISTORY_CAPACITY
    }

    /// The three samples oldest-first, once the buffer is full.
    pub fn window(&self) -> Option<[Snapshot; HISTORY_CAPACITY]> {
        if !self.is_full() {
            return None;
        }
        Some([self.samples[0], self.samples[1], self.samples[2]])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(tick: u32) -> Snapshot {
        Snapshot::new(Vec2::new(tick as f32, 0.0), 0.0, tick)
    }

    #[test]
    fn keeps_three_most_recent() {
        let mut history = SnapshotHistory::new();
        for tick in [10, 11, 12, 13, 14] {
            history.push(sample(tick));
        }

        assert_eq!(history.len(), HISTORY_CAPACITY);
        let ticks: Vec<u32> = history.iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![12, 13, 14]);
    }

    #[test]
    fn full_only_at_capacity() {
        let mut history = SnapshotHistory::new();
        assert!(history.window().is_none());

        history.push(sample(1));
        history.push(sample(2));
        assert!(!history.is_full());
        assert!(history.window().is_none());

        history.push(sample(3));
        assert!(history.is_full());
        assert_eq!(history.window().map(|w| w[0].tick), Some(1));
    }

    #[test]
    fn arrival_order_is_preserved() {
        let mut history = SnapshotHistory::new();
        history.push(sample(5));
        history.push(sample(3));
        history.push(sample(4));

        let ticks: Vec<u32> = history.iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![5, 3, 4]);
    }
}
