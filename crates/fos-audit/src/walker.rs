//! Cycle-Aware Focus Walker
//!
//! Walks a tab order that cannot be enumerated up front. Each step reads the
//! focused node, stops if that node was already seen, and otherwise records it
//! and shifts focus. The walk ends on the first repeat or when the step budget
//! runs out. The budget counts shifts, so the read that closes a cycle is free.

use std::collections::HashSet;

use crate::host::{Direction, FocusHost, HostError};
use crate::session::Session;
use crate::snapshot::{NodeIdentity, NodeSnapshot};

/// Mutable state of one walk
#[derive(Debug, Clone)]
pub struct WalkState {
    visited: Vec<NodeIdentity>,
    index: HashSet<NodeIdentity>,
    direction: Direction,
    step_budget: usize,
}

impl WalkState {
    pub fn new(direction: Direction, step_budget: usize) -> Self {
        Self {
            visited: Vec::new(),
            index: HashSet::new(),
            direction,
            step_budget,
        }
    }

    /// Mark an identity as already visited. Returns false if it was present.
    pub fn seed(&mut self, identity: NodeIdentity) -> bool {
        if !self.index.insert(identity.clone()) {
            return false;
        }
        self.visited.push(identity);
        true
    }

    pub fn contains(&self, identity: &NodeIdentity) -> bool {
        self.index.contains(identity)
    }

    /// Visited identities in discovery order
    pub fn visited(&self) -> &[NodeIdentity] {
        &self.visited
    }

    pub fn last(&self) -> Option<&NodeIdentity> {
        self.visited.last()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn remaining(&self) -> usize {
        self.step_budget
    }

    fn spend(&mut self) {
        self.step_budget = self.step_budget.saturating_sub(1);
    }
}

/// Result of one single-read step
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// New node recorded; focus has been shifted past it
    Visited(NodeSnapshot),
    /// The focused node was seen before; focus was not shifted
    Closed(NodeSnapshot),
    /// The read hit a stale handle; focus was shifted anyway
    Skipped,
    /// No budget left
    Exhausted,
}

impl Step {
    pub fn closed_cycle(&self) -> bool {
        matches!(self, Self::Closed(_))
    }
}

/// Result of one before/after step
#[derive(Debug, Clone, PartialEq)]
pub enum PairStep {
    /// Focus was shifted once between the two reads
    Pair { before: NodeSnapshot, after: NodeSnapshot },
    Closed(NodeSnapshot),
    Skipped,
    Exhausted,
}

/// How a walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The focused node repeated after `steps` shifts
    CycleClosed { steps: usize },
    /// The budget ran out after `steps` shifts without a repeat
    BudgetExhausted { steps: usize },
}

impl Termination {
    pub fn steps(&self) -> usize {
        match self {
            Self::CycleClosed { steps } | Self::BudgetExhausted { steps } => *steps,
        }
    }
}

/// A completed walk
#[derive(Debug, Clone)]
pub struct Walk {
    /// Snapshots of every visited node, in discovery order
    pub stops: Vec<NodeSnapshot>,
    /// Stale reads that were skipped
    pub skipped: usize,
    pub termination: Termination,
}

/// Focus walker owning one [`WalkState`]
#[derive(Debug, Clone)]
pub struct CycleAwareWalker {
    state: WalkState,
    steps: usize,
}

impl CycleAwareWalker {
    pub fn new(direction: Direction, step_budget: usize) -> Self {
        Self::with_state(WalkState::new(direction, step_budget))
    }

    /// Start from a pre-seeded state
    pub fn with_state(state: WalkState) -> Self {
        Self { state, steps: 0 }
    }

    pub fn state(&self) -> &WalkState {
        &self.state
    }

    /// Shifts issued so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Read the focused node; record it and shift, or report the cycle closed
    pub async fn step<H: FocusHost>(&mut self, session: &mut Session<H>) -> Result<Step, HostError> {
        let node = match session.active().await {
            Ok(node) => node,
            Err(e) if e.is_stale() => {
                let exhausted = self.skip(session, e).await?;
                return Ok(if exhausted { Step::Exhausted } else { Step::Skipped });
            }
            Err(e) => return Err(e),
        };

        if self.state.contains(&node.identity) {
            tracing::debug!("Step {}: {} already visited, cycle closed", self.steps, node.identity);
            return Ok(Step::Closed(node));
        }
        if self.state.remaining() == 0 {
            return Ok(Step::Exhausted);
        }

        self.state.seed(node.identity.clone());
        self.advance(session).await?;
        Ok(Step::Visited(node))
    }

    /// Read, shift, read again. A repeat of the node visited last is a hold
    /// (focus did not move) rather than a closed cycle.
    pub async fn step_pair<H: FocusHost>(
        &mut self,
        session: &mut Session<H>,
    ) -> Result<PairStep, HostError> {
        let before = match session.active().await {
            Ok(node) => node,
            Err(e) if e.is_stale() => {
                let exhausted = self.skip(session, e).await?;
                return Ok(if exhausted { PairStep::Exhausted } else { PairStep::Skipped });
            }
            Err(e) => return Err(e),
        };

        let held = self.state.last() == Some(&before.identity);
        if !held && self.state.contains(&before.identity) {
            tracing::debug!("Step {}: {} already visited, cycle closed", self.steps, before.identity);
            return Ok(PairStep::Closed(before));
        }
        if self.state.remaining() == 0 {
            return Ok(PairStep::Exhausted);
        }
        if !held {
            self.state.seed(before.identity.clone());
        }

        self.advance(session).await?;

        match session.active().await {
            Ok(after) => Ok(PairStep::Pair { before, after }),
            Err(e) if e.is_stale() => {
                tracing::debug!("Step {}: {} after shift - skipping", self.steps, e);
                Ok(PairStep::Skipped)
            }
            Err(e) => Err(e),
        }
    }

    /// Step until the cycle closes or the budget runs out
    pub async fn walk<H: FocusHost>(mut self, session: &mut Session<H>) -> Result<Walk, HostError> {
        let mut stops = Vec::new();
        let mut skipped = 0;

        let termination = loop {
            match self.step(session).await? {
                Step::Visited(node) => stops.push(node),
                Step::Skipped => skipped += 1,
                Step::Closed(_) => break Termination::CycleClosed { steps: self.steps },
                Step::Exhausted => break Termination::BudgetExhausted { steps: self.steps },
            }
        };

        tracing::info!(
            "{} walk finished: {} unique stops, {:?}",
            self.state.direction().key_label(),
            stops.len(),
            termination
        );

        Ok(Walk { stops, skipped, termination })
    }

    /// Shift past a stale read. Returns true when no budget was left to do so.
    async fn skip<H: FocusHost>(&mut self, session: &mut Session<H>, error: HostError) -> Result<bool, HostError> {
        if self.state.remaining() == 0 {
            return Ok(true);
        }
        tracing::debug!("Step {}: {} - skipping", self.steps, error);
        self.advance(session).await?;
        Ok(false)
    }

    async fn advance<H: FocusHost>(&mut self, session: &mut Session<H>) -> Result<(), HostError> {
        self.state.spend();
        self.steps += 1;
        session.shift(self.state.direction()).await
    }
}
