//! Audit Drivers
//!
//! Compose walks and classifiers into named checks.

pub mod keyboard;
pub mod mobile;
pub mod runner;

pub use keyboard::{KeyboardAudit, TrapOutcome, TrapWalk};
pub use mobile::MobileAudit;
pub use runner::{audit_sessions, PageAudit, KEYBOARD_CHECKS, MOBILE_CHECKS};
