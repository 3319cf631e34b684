//! Keyboard Trap Detection
//!
//! Watches (before, after) pairs from a walk and flags a node that keeps focus
//! across more than `threshold` consecutive shifts.

use crate::snapshot::NodeSnapshot;

/// Default number of tolerated consecutive no-move shifts
pub const DEFAULT_TRAP_THRESHOLD: u32 = 3;

/// Per-walk trap counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrapState {
    pub consecutive_no_move: u32,
}

/// A node that refused to release focus
#[derive(Debug, Clone, PartialEq)]
pub struct Trap {
    pub snapshot: NodeSnapshot,
    /// Zero-based index of the pair that tripped the threshold
    pub step: usize,
    pub held_for: u32,
}

/// Outcome of observing one pair
#[derive(Debug, Clone, PartialEq)]
pub enum TrapSignal {
    Moved,
    /// Focus stayed put; count so far
    Held(u32),
    Trapped(Trap),
}

/// Trap classifier for one walk, identical for both directions
#[derive(Debug, Clone)]
pub struct TrapClassifier {
    threshold: u32,
    state: TrapState,
    observed: usize,
}

impl TrapClassifier {
    pub fn new(threshold: u32) -> Self {
        Self { threshold, state: TrapState::default(), observed: 0 }
    }

    pub fn state(&self) -> TrapState {
        self.state
    }

    /// Pairs observed so far
    pub fn observed(&self) -> usize {
        self.observed
    }

    pub fn observe(&mut self, before: &NodeSnapshot, after: &NodeSnapshot) -> TrapSignal {
        let step = self.observed;
        self.observed += 1;

        if before.identity != after.identity {
            self.state.consecutive_no_move = 0;
            return TrapSignal::Moved;
        }

        self.state.consecutive_no_move += 1;
        if self.state.consecutive_no_move > self.threshold {
            tracing::warn!("Keyboard trap detected at: {}", after.describe());
            return TrapSignal::Trapped(Trap {
                snapshot: after.clone(),
                step,
                held_for: self.state.consecutive_no_move,
            });
        }

        TrapSignal::Held(self.state.consecutive_no_move)
    }
}

impl Default for TrapClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_TRAP_THRESHOLD)
    }
}
