//! Text Readability
//!
//! Small text is tolerated as long as it stays a small fraction of the
//! readable text on the page.

use crate::css_value::Length;
use crate::snapshot::{truncate, NodeSnapshot};

/// Size bucket of one text block
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextSize {
    Small(f64),
    Readable(f64),
}

/// Bucket a displayed, enabled, non-empty text block by its computed font size.
/// `None` for blocks that are not checked or whose size does not parse.
pub fn text_size(node: &NodeSnapshot, min_font_size: f64) -> Option<TextSize> {
    if !node.is_classifiable() || node.text.trim().is_empty() {
        return None;
    }
    let px = Length::parse(node.style_value("font-size"))?.to_px()?;
    Some(if px < min_font_size { TextSize::Small(px) } else { TextSize::Readable(px) })
}

/// `small == 0 || small < tolerance * good`
pub fn ratio_passes(small: usize, good: usize, tolerance: f64) -> bool {
    small == 0 || (small as f64) < tolerance * good as f64
}

/// Running counts over a page's text blocks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadabilityTally {
    pub small: usize,
    pub good: usize,
    pub issues: Vec<String>,
}

impl ReadabilityTally {
    pub fn add(&mut self, node: &NodeSnapshot, min_font_size: f64) {
        match text_size(node, min_font_size) {
            Some(TextSize::Small(_)) => {
                self.small += 1;
                self.issues.push(format!(
                    "{} - {}",
                    node.style_value("font-size"),
                    truncate(node.text.trim(), 30)
                ));
            }
            Some(TextSize::Readable(_)) => self.good += 1,
            None => {}
        }
    }

    pub fn passes(&self, tolerance: f64) -> bool {
        ratio_passes(self.small, self.good, tolerance)
    }
}
