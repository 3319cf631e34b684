//! Page Audit Runner
//!
//! Runs a list of checks against one session and records a verdict for
//! each. A host failure ends only the check it happened in.

use crate::config::AuditConfig;
use crate::host::{FocusHost, HostError};
use crate::session::Session;
use crate::verdict::{AuditReport, Check, ReportSink, Verdict};

use super::keyboard::KeyboardAudit;
use super::mobile::MobileAudit;

/// Checks that move the focus cursor
pub const KEYBOARD_CHECKS: [Check; 7] = [
    Check::TabNavigation,
    Check::Focusability,
    Check::FocusVisibility,
    Check::ForwardTrap,
    Check::BackwardTrap,
    Check::EnterActivation,
    Check::SkipLinks,
];

/// Checks over the device viewport
pub const MOBILE_CHECKS: [Check; 8] = [
    Check::TouchTargets,
    Check::ViewportZoom,
    Check::Orientation,
    Check::GestureAlternatives,
    Check::TextReadability,
    Check::FormInputs,
    Check::MobileMenu,
    Check::HorizontalOverflow,
];

/// Configured set of checks for a page
#[derive(Debug, Clone)]
pub struct PageAudit<'a> {
    config: &'a AuditConfig,
    checks: Vec<Check>,
}

impl<'a> PageAudit<'a> {
    /// All keyboard checks followed by all mobile checks
    pub fn new(config: &'a AuditConfig) -> Self {
        Self::with_checks(config, KEYBOARD_CHECKS.iter().chain(MOBILE_CHECKS.iter()).copied().collect())
    }

    pub fn with_checks(config: &'a AuditConfig, checks: Vec<Check>) -> Self {
        Self { config, checks }
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Run every check in order, recording one verdict per check
    pub async fn run<H: FocusHost, S: ReportSink>(&self, session: &mut Session<H>, sink: &mut S) {
        tracing::info!("Auditing {} checks on {}", self.checks.len(), session.device().name);

        for &check in &self.checks {
            let verdict = match self.run_check(check, session).await {
                Ok(verdict) => verdict,
                Err(e) => {
                    tracing::error!("{} aborted: {}", check.title(), e);
                    Verdict::error(check, e.to_string())
                }
            };
            sink.record(verdict);
        }
    }

    /// Run all checks into a fresh report for the session's device
    pub async fn report<H: FocusHost>(&self, session: &mut Session<H>) -> AuditReport {
        let mut report = AuditReport::new(&session.device().name);
        self.run(session, &mut report).await;
        report
    }

    pub async fn run_check<H: FocusHost>(&self, check: Check, session: &mut Session<H>) -> Result<Verdict, HostError> {
        let keyboard = KeyboardAudit::new(self.config);
        let mobile = MobileAudit::new(self.config);

        match check {
            Check::TabNavigation => keyboard.tab_navigation(session).await,
            Check::Focusability => keyboard.focusability(session).await,
            Check::FocusVisibility => keyboard.focus_visibility(session).await,
            Check::ForwardTrap => keyboard.forward_trap(session).await,
            Check::BackwardTrap => keyboard.backward_trap(session).await,
            Check::EnterActivation => keyboard.enter_activation(session).await,
            Check::SkipLinks => keyboard.skip_links(session).await,
            Check::TouchTargets => mobile.touch_targets(session).await,
            Check::ViewportZoom => mobile.viewport_zoom(session).await,
            Check::Orientation => mobile.orientation(session).await,
            Check::GestureAlternatives => mobile.gesture_alternatives(session).await,
            Check::TextReadability => mobile.text_readability(session).await,
            Check::FormInputs => mobile.form_inputs(session).await,
            Check::MobileMenu => mobile.mobile_menu(session).await,
            Check::HorizontalOverflow => mobile.horizontal_overflow(session).await,
        }
    }
}

/// Audit independent sessions concurrently on one thread. Reports come back
/// in session order.
pub fn audit_sessions<H: FocusHost>(audit: &PageAudit<'_>, sessions: Vec<Session<H>>) -> Vec<AuditReport> {
    let executor = smol::LocalExecutor::new();

    let tasks: Vec<_> = sessions
        .into_iter()
        .map(|mut session| executor.spawn(async move { audit.report(&mut session).await }))
        .collect();

    smol::block_on(executor.run(async {
        let mut reports = Vec::with_capacity(tasks.len());
        for task in tasks {
            reports.push(task.await);
        }
        reports
    }))
}
