//! Keyboard Focusability
//!
//! Interactive elements must stay in the tab order: no negative tabindex, and
//! links need an href to be focusable at all.

use crate::snapshot::{NodeSnapshot, Role};

/// Parsed `tabindex`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    /// Attribute absent or unparsable; default focusability applies
    Default,
    /// Negative value: focusable only from script
    Removed(i32),
    /// `0` or positive
    Sequential(i32),
}

impl TabIndex {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().parse::<i32>()) {
            Some(Ok(n)) if n < 0 => Self::Removed(n),
            Some(Ok(n)) => Self::Sequential(n),
            _ => Self::Default,
        }
    }

    pub fn in_tab_order(&self) -> bool {
        !matches!(self, Self::Removed(_))
    }
}

/// Why an interactive element is unreachable by keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unreachable {
    NegativeTabIndex,
    MissingHref,
}

pub fn classify(node: &NodeSnapshot) -> Result<(), Unreachable> {
    if !TabIndex::parse(node.attr("tabindex")).in_tab_order() {
        return Err(Unreachable::NegativeTabIndex);
    }
    if node.role == Role::Link && node.non_empty_attr("href").is_none() {
        return Err(Unreachable::MissingHref);
    }
    Ok(())
}

/// Counts and report lines over a page's interactive elements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FocusabilityTally {
    pub links: usize,
    pub buttons: usize,
    pub inputs: usize,
    pub focusable: usize,
    pub negative_tabindex: usize,
    pub missing_href: usize,
    pub elements: Vec<String>,
    pub failures: Vec<String>,
}

impl FocusabilityTally {
    pub fn add(&mut self, node: &NodeSnapshot) {
        match node.role {
            Role::Link => self.links += 1,
            Role::Button => self.buttons += 1,
            Role::Input => self.inputs += 1,
            Role::Generic => {}
        }

        let desc = node.describe();
        match classify(node) {
            Ok(()) => {
                self.focusable += 1;
                self.elements.push(format!("{} - ACCESSIBLE", desc));
            }
            Err(Unreachable::NegativeTabIndex) => {
                self.negative_tabindex += 1;
                self.elements.push(format!("{} [tabindex=-1] - NOT ACCESSIBLE", desc));
                self.failures.push(format!("{} with tabindex=-1 | HTML: {}", node.role.label(), node.html_snippet()));
            }
            Err(Unreachable::MissingHref) => {
                self.missing_href += 1;
                self.elements.push(format!("{} [NO HREF] - NOT ACCESSIBLE", desc));
                self.failures.push(format!("link without href | HTML: {}", node.html_snippet()));
            }
        }
    }

    pub fn total(&self) -> usize {
        self.links + self.buttons + self.inputs
    }

    pub fn inaccessible(&self) -> usize {
        self.negative_tabindex + self.missing_href
    }
}
