//! Viewport Zoom Policy
//!
//! A page must declare a viewport and must not stop users from zooming.

use crate::config::MatchMode;

/// Why a viewport declaration blocks zoom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomRestriction {
    UserScalableDisabled,
    MaximumScaleCapped,
}

impl ZoomRestriction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::UserScalableDisabled => "user-scalable=no prevents zoom",
            Self::MaximumScaleCapped => "maximum-scale=1.0 prevents zoom",
        }
    }
}

/// Viewport verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewportPolicy {
    Missing,
    Restricted(Vec<ZoomRestriction>),
    Allowed,
}

impl ViewportPolicy {
    pub fn passed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Evaluate the content of `meta[name=viewport]`, `None` if the page has none
pub fn evaluate(content: Option<&str>, mode: MatchMode) -> ViewportPolicy {
    let Some(content) = content else {
        return ViewportPolicy::Missing;
    };

    let restrictions = match mode {
        MatchMode::Lenient => lenient(content),
        MatchMode::Typed => typed(content),
    };

    if restrictions.is_empty() {
        ViewportPolicy::Allowed
    } else {
        ViewportPolicy::Restricted(restrictions)
    }
}

fn lenient(content: &str) -> Vec<ZoomRestriction> {
    let mut out = Vec::new();
    if content.contains("user-scalable=no") || content.contains("user-scalable=0") {
        out.push(ZoomRestriction::UserScalableDisabled);
    }
    // Also matches maximum-scale=1.0 and, imprecisely, maximum-scale=10.
    if content.contains("maximum-scale=1") {
        out.push(ZoomRestriction::MaximumScaleCapped);
    }
    out
}

fn typed(content: &str) -> Vec<ZoomRestriction> {
    let mut out = Vec::new();
    for (key, value) in directives(content) {
        match key.as_str() {
            "user-scalable" if value == "no" || value == "0" => {
                out.push(ZoomRestriction::UserScalableDisabled);
            }
            "maximum-scale" if value.parse::<f64>().map_or(false, |scale| scale <= 1.0) => {
                out.push(ZoomRestriction::MaximumScaleCapped);
            }
            _ => {}
        }
    }
    out.dedup();
    out
}

/// `key=value` pairs separated by commas or semicolons, lowercased
pub fn directives(content: &str) -> Vec<(String, String)> {
    content
        .split(|c: char| c == ',' || c == ';')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            Some((key.trim().to_ascii_lowercase(), value.trim().to_ascii_lowercase()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_declaration() {
        assert_eq!(evaluate(None, MatchMode::Lenient), ViewportPolicy::Missing);
    }

    #[test]
    fn test_user_scalable_no_fails() {
        for mode in [MatchMode::Lenient, MatchMode::Typed] {
            let policy = evaluate(Some("width=device-width, user-scalable=no"), mode);
            assert_eq!(policy, ViewportPolicy::Restricted(vec![ZoomRestriction::UserScalableDisabled]));
        }
    }

    #[test]
    fn test_initial_scale_passes() {
        for mode in [MatchMode::Lenient, MatchMode::Typed] {
            assert!(evaluate(Some("width=device-width, initial-scale=1.0"), mode).passed());
        }
    }

    #[test]
    fn test_maximum_scale() {
        let capped = "width=device-width, initial-scale=1, maximum-scale=1.0";
        assert!(!evaluate(Some(capped), MatchMode::Lenient).passed());
        assert!(!evaluate(Some(capped), MatchMode::Typed).passed());

        // The substring rule cannot tell 10 from 1.
        let generous = "width=device-width, maximum-scale=10";
        assert!(!evaluate(Some(generous), MatchMode::Lenient).passed());
        assert!(evaluate(Some(generous), MatchMode::Typed).passed());
    }

    #[test]
    fn test_directives() {
        assert_eq!(
            directives("width=device-width; User-Scalable = NO"),
            vec![
                ("width".to_string(), "device-width".to_string()),
                ("user-scalable".to_string(), "no".to_string()),
            ]
        );
    }
}
