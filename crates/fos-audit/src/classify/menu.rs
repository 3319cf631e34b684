//! Mobile Menu Completeness

use super::touch_target::meets_minimum;
use crate::snapshot::NodeSnapshot;

/// Missing piece of a menu toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuDefect {
    AccessibleName,
    AriaExpanded,
    TargetSize,
}

impl MenuDefect {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AccessibleName => "accessible name",
            Self::AriaExpanded => "aria-expanded",
            Self::TargetSize => "touch target size",
        }
    }
}

/// Menu verdict
#[derive(Debug, Clone, PartialEq)]
pub enum MenuCompleteness {
    /// No candidate toggle on the page
    Absent,
    Checked { findings: Vec<String>, missing: Vec<MenuDefect> },
}

impl MenuCompleteness {
    pub fn passed(&self) -> bool {
        matches!(self, Self::Checked { missing, .. } if missing.is_empty())
    }
}

pub fn classify(candidate: Option<&NodeSnapshot>, min_size: f64) -> MenuCompleteness {
    let Some(menu) = candidate else {
        return MenuCompleteness::Absent;
    };

    let mut findings = vec!["Found mobile menu".to_string()];
    let mut missing = Vec::new();

    let name = menu.non_empty_attr("aria-label").or_else(|| {
        let text = menu.text.trim();
        (!text.is_empty()).then_some(text)
    });
    match name {
        Some(name) => findings.push(format!("Has accessible name: {}", name)),
        None => {
            findings.push("Missing accessible name".to_string());
            missing.push(MenuDefect::AccessibleName);
        }
    }

    match menu.attr("aria-expanded") {
        Some(state) => findings.push(format!("Has aria-expanded: {}", state)),
        None => {
            findings.push("Missing aria-expanded".to_string());
            missing.push(MenuDefect::AriaExpanded);
        }
    }

    if meets_minimum(menu.geometry, min_size) {
        findings.push(format!("Meets touch size: {}", menu.geometry));
    } else {
        findings.push(format!("Too small: {}", menu.geometry));
        missing.push(MenuDefect::TargetSize);
    }

    MenuCompleteness::Checked { findings, missing }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_menu() {
        assert_eq!(classify(None, 44.0), MenuCompleteness::Absent);
        assert!(!classify(None, 44.0).passed());
    }

    #[test]
    fn test_only_aria_expanded_missing() {
        let menu = NodeSnapshot::new("m", "button").with_attr("aria-label", "Open menu").with_size(44.0, 44.0);

        match classify(Some(&menu), 44.0) {
            MenuCompleteness::Checked { missing, findings } => {
                assert_eq!(missing, vec![MenuDefect::AriaExpanded]);
                assert!(findings.contains(&"Has accessible name: Open menu".to_string()));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_text_counts_as_name() {
        let menu = NodeSnapshot::new("m", "button")
            .with_text("Menu")
            .with_attr("aria-expanded", "false")
            .with_size(48.0, 48.0);
        assert!(classify(Some(&menu), 44.0).passed());
    }

    #[test]
    fn test_every_defect_recorded() {
        let menu = NodeSnapshot::new("m", "div").with_attr("aria-label", "").with_size(24.0, 24.0);
        match classify(Some(&menu), 44.0) {
            MenuCompleteness::Checked { missing, .. } => assert_eq!(missing.len(), 3),
            other => panic!("unexpected {:?}", other),
        }
    }
}
