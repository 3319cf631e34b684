//! Visible Focus Indicator
//!
//! A focused node has a visible indicator if any of three weak signals fires:
//! an outline, a colored box shadow, or a colored border.

use crate::config::MatchMode;
use crate::css_value::{self, Length, Line, LineStyle};
use crate::snapshot::NodeSnapshot;

/// Which signals fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusSignals {
    pub outline: bool,
    pub box_shadow: bool,
    pub border: bool,
}

impl FocusSignals {
    pub fn visible(&self) -> bool {
        self.outline || self.box_shadow || self.border
    }
}

/// Classify the computed style of a focused node
pub fn focus_signals(node: &NodeSnapshot, mode: MatchMode) -> FocusSignals {
    let outline = node.style_value("outline");
    let outline_width = node.style_value("outline-width");
    let box_shadow = node.style_value("box-shadow");
    let border = node.style_value("border");

    match mode {
        MatchMode::Lenient => FocusSignals {
            outline: !outline.contains("none") && outline_width != "0px",
            box_shadow: box_shadow.contains("rgb") && box_shadow != "rgba(0, 0, 0, 0)",
            border: border.contains("rgb"),
        },
        MatchMode::Typed => FocusSignals {
            outline: typed_outline(outline, outline_width),
            box_shadow: css_value::shadow_is_visible(box_shadow),
            border: Line::parse(border).is_painted(),
        },
    }
}

pub fn has_visible_focus(node: &NodeSnapshot, mode: MatchMode) -> bool {
    focus_signals(node, mode).visible()
}

fn typed_outline(outline: &str, outline_width: &str) -> bool {
    let mut line = Line::parse(outline);
    if let Some(width) = Length::parse(outline_width) {
        line.width = Some(width);
    }
    // Computed outlines always carry a style; an empty value means the host
    // did not report one.
    if line.style.is_none() {
        line.style = Some(LineStyle::None);
    }
    line.is_painted()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focused(outline: &str, width: &str, shadow: &str, border: &str) -> NodeSnapshot {
        NodeSnapshot::new("n", "a")
            .with_style("outline", outline)
            .with_style("outline-width", width)
            .with_style("box-shadow", shadow)
            .with_style("border", border)
    }

    #[test]
    fn test_outline_signal() {
        let node = focused("rgb(0, 95, 204) auto 1px", "1px", "none", "");
        let signals = focus_signals(&node, MatchMode::Lenient);
        assert!(signals.outline);
        assert!(!signals.box_shadow);
        assert!(has_visible_focus(&node, MatchMode::Typed));
    }

    #[test]
    fn test_no_indicator() {
        let node = focused("rgb(0, 0, 0) none 0px", "0px", "none", "");
        assert!(!has_visible_focus(&node, MatchMode::Lenient));
        assert!(!has_visible_focus(&node, MatchMode::Typed));
    }

    #[test]
    fn test_transparent_shadow_is_not_a_signal() {
        let node = focused("none", "0px", "rgba(0, 0, 0, 0)", "");
        assert!(!focus_signals(&node, MatchMode::Lenient).box_shadow);

        let ring = focused("none", "0px", "rgb(0, 95, 204) 0px 0px 0px 3px", "");
        assert!(focus_signals(&ring, MatchMode::Lenient).box_shadow);
        assert!(focus_signals(&ring, MatchMode::Typed).box_shadow);
    }

    #[test]
    fn test_lenient_border_overmatches() {
        // Computed borders always carry a color, so the substring rule fires
        // even for a zero-width border. The typed mode does not.
        let node = focused("none", "0px", "none", "0px none rgb(33, 37, 41)");
        assert!(focus_signals(&node, MatchMode::Lenient).border);
        assert!(!focus_signals(&node, MatchMode::Typed).border);
    }
}
