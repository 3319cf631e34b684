//! Verdicts and Report Sinks
//!
//! Checks produce `(check, status, summary, evidence)` records. Persisting and
//! formatting them is up to whatever implements [`ReportSink`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Verdict status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Passed,
    Failed,
    /// Feature absent or result inconclusive
    Warning,
    /// The host could not be driven
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        })
    }
}

/// Named audit checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Check {
    TabNavigation,
    Focusability,
    FocusVisibility,
    ForwardTrap,
    BackwardTrap,
    EnterActivation,
    SkipLinks,
    TouchTargets,
    ViewportZoom,
    Orientation,
    GestureAlternatives,
    TextReadability,
    FormInputs,
    MobileMenu,
    HorizontalOverflow,
}

impl Check {
    pub fn title(&self) -> &'static str {
        match self {
            Self::TabNavigation => "Tab Navigation - Verify All Elements Reachable",
            Self::Focusability => "Interactive Elements - Validate Tabindex and Focusability",
            Self::FocusVisibility => "Focus Visibility - Check Visual Focus Indicators",
            Self::ForwardTrap => "Keyboard Trap Detection - Forward Navigation",
            Self::BackwardTrap => "Backward Navigation - Shift+Tab Keyboard Trap Detection",
            Self::EnterActivation => "Enter Key Activation - Verify Links and Buttons Respond",
            Self::SkipLinks => "Skip Links - Bypass Blocks Mechanism Validation",
            Self::TouchTargets => "Touch Target Size",
            Self::ViewportZoom => "Viewport Zoom",
            Self::Orientation => "Orientation",
            Self::GestureAlternatives => "Touch Gestures",
            Self::TextReadability => "Text Readability",
            Self::FormInputs => "Mobile Forms",
            Self::MobileMenu => "Mobile Navigation",
            Self::HorizontalOverflow => "Horizontal Overflow",
        }
    }

    /// WCAG success criteria this check covers
    pub fn wcag_criteria(&self) -> &'static str {
        match self {
            Self::TabNavigation | Self::Focusability | Self::EnterActivation => "2.1.1 Keyboard",
            Self::FocusVisibility => "2.4.7 Focus Visible",
            Self::ForwardTrap | Self::BackwardTrap => "2.1.2 No Keyboard Trap",
            Self::SkipLinks => "2.4.1 Bypass Blocks",
            Self::TouchTargets => "2.5.5 Target Size",
            Self::ViewportZoom => "1.4.4 Resize Text, 1.4.10 Reflow",
            Self::Orientation => "1.3.4 Orientation",
            Self::GestureAlternatives => "2.5.1 Pointer Gestures",
            Self::TextReadability => "1.4.4 Resize Text, 1.4.12 Text Spacing",
            Self::FormInputs => "3.3.2 Labels or Instructions, 1.3.5 Identify Input Purpose",
            Self::MobileMenu => "2.4.1 Bypass Blocks, 4.1.2 Name, Role, Value, 2.5.5 Target Size",
            Self::HorizontalOverflow => "1.4.10 Reflow",
        }
    }
}

/// One check result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub check: Check,
    pub status: Status,
    pub summary: String,
    #[serde(default)]
    pub evidence: Vec<String>,
}

impl Verdict {
    pub fn new(check: Check, status: Status, summary: impl Into<String>) -> Self {
        Self { check, status, summary: summary.into(), evidence: Vec::new() }
    }

    pub fn passed(check: Check, summary: impl Into<String>) -> Self {
        Self::new(check, Status::Passed, summary)
    }

    pub fn failed(check: Check, summary: impl Into<String>) -> Self {
        Self::new(check, Status::Failed, summary)
    }

    pub fn warning(check: Check, summary: impl Into<String>) -> Self {
        Self::new(check, Status::Warning, summary)
    }

    pub fn error(check: Check, summary: impl Into<String>) -> Self {
        Self::new(check, Status::Error, summary)
    }

    pub fn with_evidence(mut self, evidence: Vec<String>) -> Self {
        self.evidence = evidence;
        self
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}]", self.check.title(), self.check.wcag_criteria())?;
        writeln!(f, "Status: {}", self.status)?;
        writeln!(f, "Details: {}", self.summary)?;
        for line in &self.evidence {
            writeln!(f, "  - {}", line)?;
        }
        Ok(())
    }
}

/// Destination for verdicts
pub trait ReportSink {
    fn record(&mut self, verdict: Verdict);
}

impl ReportSink for Vec<Verdict> {
    fn record(&mut self, verdict: Verdict) {
        self.push(verdict);
    }
}

/// Verdicts of one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub device: String,
    pub verdicts: Vec<Verdict>,
}

impl AuditReport {
    pub fn new(device: &str) -> Self {
        Self { device: device.to_string(), verdicts: Vec::new() }
    }

    pub fn get(&self, check: Check) -> Option<&Verdict> {
        self.verdicts.iter().find(|v| v.check == check)
    }

    /// Count by status: (passed, failed, warning, error)
    pub fn count_by_status(&self) -> (usize, usize, usize, usize) {
        let mut counts = (0, 0, 0, 0);
        for verdict in &self.verdicts {
            match verdict.status {
                Status::Passed => counts.0 += 1,
                Status::Failed => counts.1 += 1,
                Status::Warning => counts.2 += 1,
                Status::Error => counts.3 += 1,
            }
        }
        counts
    }

    /// No failures and no errors
    pub fn passes(&self) -> bool {
        !self.verdicts.iter().any(|v| matches!(v.status, Status::Failed | Status::Error))
    }
}

impl ReportSink for AuditReport {
    fn record(&mut self, verdict: Verdict) {
        tracing::info!("{}: {} - {}", verdict.check.title(), verdict.status, verdict.summary);
        self.verdicts.push(verdict);
    }
}
