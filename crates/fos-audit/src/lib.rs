//! fOS Audit
//!
//! Keyboard and mobile accessibility audits driven through focus shifts.
//!
//! The engine never sees the page's element list up front. It presses
//! Tab/Shift+Tab through a [`FocusHost`], observes what receives focus, and
//! works out loop closure and keyboard traps online. Stateless classifiers
//! grade what it observes against WCAG-derived rules.
//!
//! Features:
//! - Cycle-aware focus walks with explicit step budgets
//! - Keyboard trap detection in both directions
//! - Focus indicator, touch target, form input, viewport, and menu checks
//! - Concurrent audits of independent sessions
//!
//! # Example
//! ```rust,ignore
//! use fos_audit::{AuditConfig, DeviceProfile, PageAudit, Session, SimulatedHost};
//!
//! let config = AuditConfig::default();
//! let mut session = Session::new(host, DeviceProfile::iphone_15(), config.settle_timeout());
//! let report = smol::block_on(PageAudit::new(&config).report(&mut session));
//! ```

pub mod audit;
pub mod classify;
pub mod config;
pub mod css_value;
pub mod host;
pub mod session;
pub mod sim;
pub mod snapshot;
pub mod trap;
pub mod verdict;
pub mod walker;

pub use audit::{audit_sessions, KeyboardAudit, MobileAudit, PageAudit, KEYBOARD_CHECKS, MOBILE_CHECKS};
pub use config::{AuditConfig, ConfigError, MatchMode};
pub use host::{Direction, ElementQuery, FocusHost, HostError, LayoutMetrics};
pub use session::{DeviceProfile, Session};
pub use sim::{PageFixture, SimulatedHost};
pub use snapshot::{Geometry, NodeIdentity, NodeSnapshot, Role};
pub use trap::{Trap, TrapClassifier, TrapSignal};
pub use verdict::{AuditReport, Check, ReportSink, Status, Verdict};
pub use walker::{CycleAwareWalker, Step, Termination, Walk, WalkState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Audit setup error
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid page fixture: {0}")]
    Fixture(#[from] serde_json::Error),

    #[error("Host error: {0}")]
    Host(#[from] HostError),
}

/// Audit a JSON page fixture on each device, one session per device.
///
/// The viewport of every session is set to its device before the checks run.
pub fn audit_fixture(
    fixture: &str,
    config: &AuditConfig,
    devices: &[DeviceProfile],
) -> Result<Vec<AuditReport>, AuditError> {
    config.validate()?;
    let fixture = PageFixture::from_json(fixture)?;
    tracing::info!("Auditing {} on {} device(s)", fixture.url, devices.len());

    let mut sessions = Vec::with_capacity(devices.len());
    for device in devices {
        let mut session = Session::new(
            SimulatedHost::from_fixture(fixture.clone()),
            device.clone(),
            config.settle_timeout(),
        );
        smol::block_on(session.resize(device.width, device.height))?;
        sessions.push(session);
    }

    Ok(audit_sessions(&PageAudit::new(config), sessions))
}
