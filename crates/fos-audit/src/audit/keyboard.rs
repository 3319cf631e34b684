//! Keyboard Audit
//!
//! Checks that drive the focus cursor: reachability, visible focus, traps in
//! both directions, Enter activation, and skip links. Every check starts from
//! a fresh page load.

use crate::classify::{has_visible_focus, FocusabilityTally, SkipLinkScan};
use crate::config::AuditConfig;
use crate::host::{Direction, ElementQuery, FocusHost, HostError};
use crate::session::Session;
use crate::snapshot::{NodeSnapshot, Role};
use crate::trap::{Trap, TrapClassifier, TrapSignal};
use crate::verdict::{Check, Verdict};
use crate::walker::{CycleAwareWalker, PairStep, Termination, Walk};

/// How a trap walk ended
#[derive(Debug, Clone, PartialEq)]
pub enum TrapOutcome {
    Trapped(Trap),
    /// Focus kept moving until the walk ended
    Released(Termination),
}

/// A pair walk watched by a [`TrapClassifier`]
#[derive(Debug, Clone)]
pub struct TrapWalk {
    pub outcome: TrapOutcome,
    /// Unique identities visited
    pub unique: usize,
    /// Shifts issued
    pub steps: usize,
}

/// Keyboard checks for one session
#[derive(Debug, Clone, Copy)]
pub struct KeyboardAudit<'a> {
    config: &'a AuditConfig,
}

impl<'a> KeyboardAudit<'a> {
    pub fn new(config: &'a AuditConfig) -> Self {
        Self { config }
    }

    /// Tab into the page and walk forward until focus comes back around
    pub async fn tab_navigation<H: FocusHost>(&self, session: &mut Session<H>) -> Result<Verdict, HostError> {
        let walk = self.entry_walk(session).await?;
        let evidence = walk
            .stops
            .iter()
            .enumerate()
            .map(|(i, node)| format!("{}. {}", i + 1, node.describe()))
            .collect();

        let verdict = match walk.termination {
            Termination::CycleClosed { steps } => Verdict::passed(
                Check::TabNavigation,
                format!(
                    "Found {} unique focusable elements; focus returned to a visited element after {} Tab presses",
                    walk.stops.len(),
                    steps
                ),
            ),
            Termination::BudgetExhausted { steps } => Verdict::warning(
                Check::TabNavigation,
                format!(
                    "Stopped after {} Tab presses without focus returning; {} unique focusable elements found",
                    steps,
                    walk.stops.len()
                ),
            ),
        };
        Ok(verdict.with_evidence(evidence))
    }

    /// Negative tabindex and href-less links among interactive elements
    pub async fn focusability<H: FocusHost>(&self, session: &mut Session<H>) -> Result<Verdict, HostError> {
        let elements = session.query(ElementQuery::Interactive).await?;

        let mut tally = FocusabilityTally::default();
        for node in elements.iter().filter(|n| n.is_classifiable()) {
            tally.add(node);
        }

        let (total, inaccessible) = (tally.total(), tally.inaccessible());
        if total == 0 {
            return Ok(Verdict::warning(Check::Focusability, "No interactive elements found"));
        }

        let mut evidence = vec![
            format!("Links: {}, buttons: {}, inputs: {}", tally.links, tally.buttons, tally.inputs),
            format!("Keyboard accessible: {}", tally.focusable),
        ];

        if inaccessible == 0 {
            evidence.extend(tally.elements);
            return Ok(Verdict::passed(
                Check::Focusability,
                format!("All {} interactive elements are keyboard accessible", total),
            )
            .with_evidence(evidence));
        }

        evidence.push(format!(
            "Negative tabindex: {}, links without href: {}",
            tally.negative_tabindex, tally.missing_href
        ));
        evidence.extend(tally.failures);
        Ok(Verdict::failed(
            Check::Focusability,
            format!("{} of {} interactive elements are not keyboard accessible", inaccessible, total),
        )
        .with_evidence(evidence))
    }

    /// Classify the focus indicator of every stop of a forward walk
    pub async fn focus_visibility<H: FocusHost>(&self, session: &mut Session<H>) -> Result<Verdict, HostError> {
        let walk = self.entry_walk(session).await?;
        let mode = self.config.css_matching;

        let checked: Vec<&NodeSnapshot> = walk.stops.iter().filter(|n| n.is_classifiable()).collect();
        if checked.is_empty() {
            return Ok(Verdict::warning(Check::FocusVisibility, "No element received focus"));
        }

        let missing: Vec<String> = checked
            .iter()
            .filter(|node| !has_visible_focus(node, mode))
            .map(|node| {
                format!(
                    "{} | outline: {}, box-shadow: {}, border: {}",
                    node.describe(),
                    node.style_value("outline"),
                    node.style_value("box-shadow"),
                    node.style_value("border")
                )
            })
            .collect();

        if missing.is_empty() {
            return Ok(Verdict::passed(
                Check::FocusVisibility,
                format!("All {} focused elements show a visible focus indicator", checked.len()),
            ));
        }

        Ok(Verdict::failed(
            Check::FocusVisibility,
            format!("{} of {} focused elements have no visible focus indicator", missing.len(), checked.len()),
        )
        .with_evidence(missing))
    }

    pub async fn forward_trap<H: FocusHost>(&self, session: &mut Session<H>) -> Result<Verdict, HostError> {
        session.reload().await?;
        let walk = self.trap_walk(session, Direction::Forward, self.config.forward_trap_budget).await?;
        Ok(self.trap_verdict(Check::ForwardTrap, Direction::Forward, &walk, Vec::new()))
    }

    /// Tab deep into the page first, then walk back with Shift+Tab
    pub async fn backward_trap<H: FocusHost>(&self, session: &mut Session<H>) -> Result<Verdict, HostError> {
        session.reload().await?;
        for _ in 0..self.config.backward_prime_steps {
            session.shift(Direction::Forward).await?;
        }

        let walk = self.trap_walk(session, Direction::Backward, self.config.backward_trap_budget).await?;
        let evidence = vec![format!(
            "Primed with {} Tab presses, then {} Shift+Tab presses",
            self.config.backward_prime_steps, walk.steps
        )];
        Ok(self.trap_verdict(Check::BackwardTrap, Direction::Backward, &walk, evidence))
    }

    /// Press Enter on the first link or button that receives focus
    pub async fn enter_activation<H: FocusHost>(&self, session: &mut Session<H>) -> Result<Verdict, HostError> {
        session.reload().await?;

        for step in 1..=self.config.activation_probe_steps {
            session.shift(Direction::Forward).await?;
            let Some(node) = read_active(session).await? else {
                continue;
            };
            if !matches!(node.role, Role::Link | Role::Button) || !node.is_classifiable() {
                continue;
            }

            let before = session.current_url().await?;
            tracing::debug!("Activating {} after {} Tab presses", node.describe(), step);
            session.activate().await?;
            let after = session.current_url().await?;

            let outcome = if before != after {
                format!("navigated to {}", after)
            } else {
                "triggered an in-page action".to_string()
            };
            return Ok(Verdict::passed(
                Check::EnterActivation,
                format!("Enter on focused {} {}", node.role.label(), outcome),
            )
            .with_evidence(vec![node.describe(), format!("Reached after {} Tab presses", step)]));
        }

        Ok(Verdict::warning(
            Check::EnterActivation,
            format!("No link or button received focus within {} Tab presses", self.config.activation_probe_steps),
        ))
    }

    /// Look for skip links among the first tab stops
    pub async fn skip_links<H: FocusHost>(&self, session: &mut Session<H>) -> Result<Verdict, HostError> {
        session.reload().await?;

        let probe = self.config.skip_link_probe_steps;
        let mut scan = SkipLinkScan::default();
        for _ in 0..probe {
            session.shift(Direction::Forward).await?;
            if let Some(node) = read_active(session).await? {
                scan.add(&node);
            }
        }

        let missing = scan.missing();
        let mut evidence: Vec<String> = scan.found.iter().map(|t| format!("Found: {}", t.label())).collect();
        evidence.extend(missing.iter().map(|t| format!("Missing: {}", t.label())));

        let verdict = if missing.is_empty() {
            Verdict::passed(Check::SkipLinks, "All skip links present")
        } else if scan.found.is_empty() {
            Verdict::failed(Check::SkipLinks, format!("No skip links in the first {} tab stops", probe))
        } else {
            let names: Vec<&str> = missing.iter().map(|t| t.label()).collect();
            Verdict::failed(Check::SkipLinks, format!("Missing skip links: {}", names.join(", ")))
        };
        Ok(verdict.with_evidence(evidence))
    }

    /// Reload, Tab once into the page, and walk forward. The document body
    /// is passed through at the end of the order but is not a stop.
    async fn entry_walk<H: FocusHost>(&self, session: &mut Session<H>) -> Result<Walk, HostError> {
        session.reload().await?;
        session.shift(Direction::Forward).await?;
        let mut walk = CycleAwareWalker::new(Direction::Forward, self.config.navigation_budget)
            .walk(session)
            .await?;
        walk.stops.retain(|node| !node.is_document_body());
        Ok(walk)
    }

    /// Pair walk in `direction` until a trap trips or the walk ends
    pub async fn trap_walk<H: FocusHost>(
        &self,
        session: &mut Session<H>,
        direction: Direction,
        budget: usize,
    ) -> Result<TrapWalk, HostError> {
        let mut walker = CycleAwareWalker::new(direction, budget);
        let mut classifier = TrapClassifier::new(self.config.trap_threshold);

        let outcome = loop {
            match walker.step_pair(session).await? {
                PairStep::Pair { before, after } => {
                    if let TrapSignal::Trapped(trap) = classifier.observe(&before, &after) {
                        break TrapOutcome::Trapped(trap);
                    }
                }
                PairStep::Skipped => {}
                PairStep::Closed(_) => {
                    break TrapOutcome::Released(Termination::CycleClosed { steps: walker.steps() });
                }
                PairStep::Exhausted => {
                    break TrapOutcome::Released(Termination::BudgetExhausted { steps: walker.steps() });
                }
            }
        };

        Ok(TrapWalk {
            outcome,
            unique: walker.state().visited().len(),
            steps: walker.steps(),
        })
    }

    fn trap_verdict(&self, check: Check, direction: Direction, walk: &TrapWalk, mut evidence: Vec<String>) -> Verdict {
        let key = direction.key_label();
        match &walk.outcome {
            TrapOutcome::Trapped(trap) => {
                evidence.push(format!("Trapped element: {}", trap.snapshot.describe()));
                evidence.push(format!("HTML: {}", trap.snapshot.html_snippet()));
                evidence.push(format!("Detected after {} {} presses", walk.steps, key));
                Verdict::failed(
                    check,
                    format!("Keyboard trap: focus did not move for {} consecutive {} presses", trap.held_for, key),
                )
                .with_evidence(evidence)
            }
            TrapOutcome::Released(Termination::CycleClosed { steps }) => {
                evidence.push(format!("Focus cycled through {} elements", walk.unique));
                Verdict::passed(check, format!("No keyboard trap in {} {} presses", steps, key)).with_evidence(evidence)
            }
            TrapOutcome::Released(Termination::BudgetExhausted { steps }) => {
                evidence.push(format!("{} unique elements visited before the step limit", walk.unique));
                Verdict::passed(check, format!("No keyboard trap within {} {} presses", steps, key)).with_evidence(evidence)
            }
        }
    }
}

/// Focused node, or `None` for a stale read
async fn read_active<H: FocusHost>(session: &mut Session<H>) -> Result<Option<NodeSnapshot>, HostError> {
    match session.active().await {
        Ok(node) => Ok(Some(node)),
        Err(e) if e.is_stale() => {
            tracing::debug!("{} - skipping", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
