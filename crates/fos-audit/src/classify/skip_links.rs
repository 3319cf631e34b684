//! Skip Link Detection
//!
//! Skip links have to sit among the first few tab stops to be useful.

use crate::snapshot::NodeSnapshot;

/// Skip link destinations the audit looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipTarget {
    MainContent,
    Footer,
}

impl SkipTarget {
    pub const ALL: [SkipTarget; 2] = [SkipTarget::MainContent, SkipTarget::Footer];

    pub fn label(&self) -> &'static str {
        match self {
            Self::MainContent => "Skip to Content/Main",
            Self::Footer => "Skip to Footer",
        }
    }

    fn phrases(&self) -> &'static [&'static str] {
        match self {
            Self::MainContent => &["skip to content", "skip to main"],
            Self::Footer => &["skip to footer"],
        }
    }
}

/// Skip targets a tab stop links to, by visible text or aria-label
pub fn skip_targets(node: &NodeSnapshot) -> Vec<SkipTarget> {
    let text = node.text.to_lowercase();
    let aria = node.attr("aria-label").unwrap_or("").to_lowercase();

    SkipTarget::ALL
        .into_iter()
        .filter(|target| {
            target
                .phrases()
                .iter()
                .any(|phrase| text.contains(phrase) || aria.contains(phrase))
        })
        .collect()
}

/// Targets found across the probed stops
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipLinkScan {
    pub found: Vec<SkipTarget>,
}

impl SkipLinkScan {
    pub fn add(&mut self, node: &NodeSnapshot) {
        for target in skip_targets(node) {
            if !self.found.contains(&target) {
                self.found.push(target);
            }
        }
    }

    pub fn missing(&self) -> Vec<SkipTarget> {
        SkipTarget::ALL.into_iter().filter(|t| !self.found.contains(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_aria_label() {
        let by_text = NodeSnapshot::new("1", "a").with_text("Skip to main content");
        let by_aria = NodeSnapshot::new("2", "a").with_attr("aria-label", "Skip to Footer");
        let plain = NodeSnapshot::new("3", "a").with_text("Home");

        assert_eq!(skip_targets(&by_text), vec![SkipTarget::MainContent]);
        assert_eq!(skip_targets(&by_aria), vec![SkipTarget::Footer]);
        assert!(skip_targets(&plain).is_empty());
    }

    #[test]
    fn test_scan_missing() {
        let mut scan = SkipLinkScan::default();
        scan.add(&NodeSnapshot::new("1", "a").with_text("Skip to content"));
        scan.add(&NodeSnapshot::new("2", "a").with_text("Skip to content"));

        assert_eq!(scan.found, vec![SkipTarget::MainContent]);
        assert_eq!(scan.missing(), vec![SkipTarget::Footer]);
    }
}
