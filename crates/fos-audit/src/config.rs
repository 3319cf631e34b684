//! Audit Configuration
//!
//! Every policy constant the checks use lives here, so widget-specific tuning
//! never touches the algorithms.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::trap::DEFAULT_TRAP_THRESHOLD;

/// How computed CSS and viewport strings are matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Substring rules over the raw strings
    #[default]
    Lenient,
    /// Parse into lengths, colors and directives first
    Typed,
}

/// Audit configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Consecutive no-move shifts tolerated before a trap is declared
    pub trap_threshold: u32,

    /// Upper bound for any single host call, settle included (ms)
    pub settle_timeout_ms: u64,

    /// Step budget of the tab navigation and focus visibility walks
    pub navigation_budget: usize,

    /// Step budget of the forward trap walk
    pub forward_trap_budget: usize,

    /// Forward shifts issued before the backward trap walk
    pub backward_prime_steps: usize,

    /// Step budget of the backward trap walk
    pub backward_trap_budget: usize,

    /// Tab stops searched for an activatable link or button
    pub activation_probe_steps: usize,

    /// Tab stops searched for skip links
    pub skip_link_probe_steps: usize,

    /// Minimum touch target edge (px)
    pub min_target_size: f64,

    /// Font size below which text counts as small (px)
    pub min_font_size: f64,

    /// Small text passes while `small < tolerance * good`
    pub small_text_tolerance: f64,

    /// Allowed document overflow past the viewport width (px)
    pub overflow_tolerance: f64,

    pub css_matching: MatchMode,

    /// Input types considered suitable for mobile keyboards
    pub recognized_input_types: Vec<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            trap_threshold: DEFAULT_TRAP_THRESHOLD,
            settle_timeout_ms: 5_000,
            navigation_budget: 150,
            forward_trap_budget: 100,
            backward_prime_steps: 20,
            backward_trap_budget: 30,
            activation_probe_steps: 15,
            skip_link_probe_steps: 10,
            min_target_size: 44.0, // WCAG 2.5.5
            min_font_size: 14.0,
            small_text_tolerance: 0.10,
            overflow_tolerance: 10.0,
            css_matching: MatchMode::Lenient,
            recognized_input_types: ["email", "tel", "number", "url", "search", "text", "password"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl AuditConfig {
    /// Parse a (possibly partial) JSON config; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trap_threshold == 0 {
            return Err(invalid("trap_threshold", "must be at least 1"));
        }
        if self.settle_timeout_ms == 0 {
            return Err(invalid("settle_timeout_ms", "must be positive"));
        }
        if !(self.small_text_tolerance > 0.0 && self.small_text_tolerance <= 1.0) {
            return Err(invalid("small_text_tolerance", "must be in (0, 1]"));
        }
        if self.min_target_size <= 0.0 {
            return Err(invalid("min_target_size", "must be positive"));
        }

        let budgets = [
            ("navigation_budget", self.navigation_budget),
            ("forward_trap_budget", self.forward_trap_budget),
            ("backward_trap_budget", self.backward_trap_budget),
            ("activation_probe_steps", self.activation_probe_steps),
            ("skip_link_probe_steps", self.skip_link_probe_steps),
        ];
        for (field, value) in budgets {
            if value == 0 {
                return Err(invalid(field, "step budgets must be positive"));
            }
        }

        Ok(())
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AuditConfig::from_json(r#"{ "trap_threshold": 5, "css_matching": "typed" }"#).unwrap();

        assert_eq!(config.trap_threshold, 5);
        assert_eq!(config.css_matching, MatchMode::Typed);
        assert_eq!(config.navigation_budget, 150);
        assert_eq!(config.recognized_input_types.len(), 7);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            AuditConfig::from_json(r#"{ "trap_threshold": 0 }"#),
            Err(ConfigError::Invalid { field: "trap_threshold", .. })
        ));
        assert!(matches!(
            AuditConfig::from_json(r#"{ "small_text_tolerance": 1.5 }"#),
            Err(ConfigError::Invalid { field: "small_text_tolerance", .. })
        ));
        assert!(matches!(AuditConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }
}
