//! Property-based invariant tests for focus walks and size predicates.
//!
//! 1. A walk never visits an identity twice and never outruns its budget.
//! 2. A walk over n stops closes after exactly n + 1 shifts (the body is
//!    passed through once) when the budget allows it.
//! 3. A walk with a budget of at most n reports exhaustion after the budget.
//! 4. A hold of k shifts is flagged as a trap iff k exceeds the threshold.
//! 5. Growing a touch target never makes it fail.
//! 6. Fewer small text blocks never turns a passing ratio into a failure.

use std::collections::HashSet;
use std::time::Duration;

use fos_audit::classify::{meets_minimum, ratio_passes};
use fos_audit::{
    AuditConfig, CycleAwareWalker, DeviceProfile, Direction, Geometry, KeyboardAudit, NodeSnapshot,
    Session, SimulatedHost, Termination,
};
use fos_audit::audit::TrapOutcome;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn page(n: usize) -> SimulatedHost {
    let nodes = (0..n)
        .map(|i| NodeSnapshot::new(format!("n{}", i), "button").with_size(48.0, 48.0))
        .collect();
    let mut host = SimulatedHost::new(nodes);
    host.focus_index(0);
    host
}

fn session(host: SimulatedHost) -> Session<SimulatedHost> {
    Session::new(host, DeviceProfile::default(), Duration::from_secs(1))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Visited set is duplicate-free and bounded by the budget
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn walk_visits_unique_within_budget(n in 1usize..40, budget in 1usize..60) {
        let mut session = session(page(n));
        let walk = smol::block_on(CycleAwareWalker::new(Direction::Forward, budget).walk(&mut session)).unwrap();

        let unique: HashSet<_> = walk.stops.iter().map(|s| s.identity.clone()).collect();
        prop_assert_eq!(unique.len(), walk.stops.len(), "duplicate stop in {:?}", walk.stops);
        prop_assert!(walk.stops.len() <= budget);
        prop_assert!(walk.termination.steps() <= budget);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Cycle of n stops plus the body closes after n + 1 shifts
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cycle_closes_after_n_shifts(n in 1usize..40, slack in 0usize..20) {
        let mut session = session(page(n));
        let walk = smol::block_on(CycleAwareWalker::new(Direction::Forward, n + 1 + slack).walk(&mut session)).unwrap();

        prop_assert_eq!(walk.termination, Termination::CycleClosed { steps: n + 1 });
        prop_assert_eq!(walk.stops.len(), n + 1);
        prop_assert!(walk.stops[n].is_document_body());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Budget below the cycle length is exhausted, not an error
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn short_budget_is_exhausted(n in 1usize..40, cut in 1usize..39) {
        let budget = cut.min(n);
        let mut session = session(page(n));
        let walk = smol::block_on(CycleAwareWalker::new(Direction::Backward, budget).walk(&mut session)).unwrap();

        prop_assert_eq!(walk.termination, Termination::BudgetExhausted { steps: budget });
        prop_assert_eq!(walk.stops.len(), budget);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Trap iff hold exceeds threshold
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn trap_iff_hold_exceeds_threshold(n in 1usize..10, target in 0usize..10, hold in 0u32..8, threshold in 1u32..6) {
        let target = target % n;
        let mut host = page(n);
        host.hold_focus(&format!("n{}", target), hold);
        let mut session = session(host);

        let config = AuditConfig { trap_threshold: threshold, ..AuditConfig::default() };
        let walk = smol::block_on(
            KeyboardAudit::new(&config).trap_walk(&mut session, Direction::Forward, 100),
        ).unwrap();

        let trapped = matches!(walk.outcome, TrapOutcome::Trapped(_));
        prop_assert_eq!(trapped, hold > threshold, "hold={} threshold={} outcome={:?}", hold, threshold, walk.outcome);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Touch target monotonicity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn touch_target_monotone(w in 0.0f64..200.0, h in 0.0f64..200.0, dw in 0.0f64..50.0, dh in 0.0f64..50.0) {
        if meets_minimum(Geometry::new(w, h), 44.0) {
            prop_assert!(meets_minimum(Geometry::new(w + dw, h + dh), 44.0));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Readability ratio monotonicity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fewer_small_blocks_keep_passing(small in 0usize..100, good in 0usize..1000, fewer in 0usize..100) {
        if ratio_passes(small, good, 0.10) {
            prop_assert!(ratio_passes(small.saturating_sub(fewer), good, 0.10));
        }
    }
}
