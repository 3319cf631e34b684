//! Form Input Semantics
//!
//! An input needs a label and a type that summons a suitable on-screen
//! keyboard. Placeholder text counts as a (weaker) label.

use crate::snapshot::NodeSnapshot;

/// Independent sub-check failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDefect {
    NoLabel,
    BadType,
}

impl InputDefect {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoLabel => "no label",
            Self::BadType => "bad type",
        }
    }
}

/// Result for one input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSemantics {
    pub defects: Vec<InputDefect>,
}

impl InputSemantics {
    pub fn passed(&self) -> bool {
        self.defects.is_empty()
    }

    /// `Input type=tel (no label)(bad type)` style line
    pub fn describe(&self, node: &NodeSnapshot) -> String {
        let reasons: String = self.defects.iter().map(|d| format!("({})", d.label())).collect();
        format!("Input type={} {}", node.attr("type").unwrap_or("[none]"), reasons)
    }
}

/// `has_external_label`: a `label[for=<id>]` was found for this node's id
pub fn classify(node: &NodeSnapshot, has_external_label: bool, recognized_types: &[String]) -> InputSemantics {
    let mut defects = Vec::new();

    let labelled = has_external_label || node.non_empty_attr("placeholder").is_some();
    if !labelled {
        defects.push(InputDefect::NoLabel);
    }

    let type_ok = node
        .attr("type")
        .map_or(false, |t| recognized_types.iter().any(|r| r == t));
    if !type_ok {
        defects.push(InputDefect::BadType);
    }

    InputSemantics { defects }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuditConfig;

    fn types() -> Vec<String> {
        AuditConfig::default().recognized_input_types
    }

    #[test]
    fn test_placeholder_satisfies_label() {
        let node = NodeSnapshot::new("i", "input").with_attr("type", "email").with_attr("placeholder", "Email");
        assert!(classify(&node, false, &types()).passed());
    }

    #[test]
    fn test_defects_recorded_independently() {
        let node = NodeSnapshot::new("i", "input").with_attr("type", "checkbox");
        let result = classify(&node, false, &types());

        assert_eq!(result.defects, vec![InputDefect::NoLabel, InputDefect::BadType]);
        assert_eq!(result.describe(&node), "Input type=checkbox (no label)(bad type)");
    }

    #[test]
    fn test_external_label_and_missing_type() {
        let node = NodeSnapshot::new("i", "input").with_attr("id", "zip");
        let result = classify(&node, true, &types());
        assert_eq!(result.defects, vec![InputDefect::BadType]);
    }
}
