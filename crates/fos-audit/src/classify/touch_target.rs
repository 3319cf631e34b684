//! Touch Target Size

use crate::snapshot::{Geometry, NodeSnapshot, Role};

/// Size verdict for one node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchTarget {
    pub role: Role,
    pub geometry: Geometry,
    pub passed: bool,
}

/// Both edges must reach `min_size`; role only matters for reporting
pub fn meets_minimum(geometry: Geometry, min_size: f64) -> bool {
    geometry.width >= min_size && geometry.height >= min_size
}

pub fn classify(node: &NodeSnapshot, min_size: f64) -> TouchTarget {
    TouchTarget {
        role: node.role,
        geometry: node.geometry,
        passed: meets_minimum(node.geometry, min_size),
    }
}

/// Failures bucketed by role
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchTargetTally {
    pub passed: usize,
    pub links: Vec<String>,
    pub buttons: Vec<String>,
    pub inputs: Vec<String>,
    pub other: Vec<String>,
}

impl TouchTargetTally {
    pub fn add(&mut self, node: &NodeSnapshot, target: TouchTarget) {
        if target.passed {
            self.passed += 1;
            return;
        }

        let text = node.text.trim();
        let text = if text.is_empty() { "[No text]".to_string() } else { crate::snapshot::truncate(text, 30) };
        let line = format!("{} - {} - {}", node.tag, text, target.geometry);

        match target.role {
            Role::Link => self.links.push(line),
            Role::Button => self.buttons.push(line),
            Role::Input => self.inputs.push(line),
            Role::Generic => self.other.push(line),
        }
    }

    pub fn failed(&self) -> usize {
        self.links.len() + self.buttons.len() + self.inputs.len() + self.other.len()
    }

    /// Failure lines grouped by role
    pub fn evidence(&self) -> Vec<String> {
        let groups = [("Links", &self.links), ("Buttons", &self.buttons), ("Inputs", &self.inputs), ("Other", &self.other)];
        let mut out = Vec::new();
        for (label, lines) in groups {
            if lines.is_empty() {
                continue;
            }
            out.push(format!("{} below minimum: {}", label, lines.len()));
            out.extend(lines.iter().cloned());
        }
        out
    }
}
