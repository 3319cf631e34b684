//! Node Snapshots
//!
//! Immutable reads of one focusable element's observable state.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque element handle, valid only for equality within one walk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeIdentity(String);

impl NodeIdentity {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }
}

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeIdentity {
    fn from(handle: &str) -> Self {
        Self::new(handle)
    }
}

/// Semantic kind of a focusable element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Link,
    Button,
    Input,
    #[default]
    Generic,
}

impl Role {
    /// Map an HTML tag name to a role
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "a" => Self::Link,
            "button" => Self::Button,
            "input" | "textarea" | "select" => Self::Input,
            _ => Self::Generic,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Button => "button",
            Self::Input => "input",
            Self::Generic => "generic",
        }
    }
}

/// Rendered size in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}px", self.width, self.height)
    }
}

/// One element's state at one observation instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub identity: NodeIdentity,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub geometry: Geometry,
    /// Present attributes only; a missing key is an absent attribute
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Computed style values
    #[serde(default)]
    pub style: BTreeMap<String, String>,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_true")]
    pub displayed: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl NodeSnapshot {
    /// Create a displayed, enabled snapshot for `tag`
    pub fn new(identity: impl Into<String>, tag: &str) -> Self {
        Self {
            identity: NodeIdentity::new(identity),
            role: Role::from_tag(tag),
            tag: tag.to_ascii_lowercase(),
            geometry: Geometry::default(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            text: String::new(),
            displayed: true,
            enabled: true,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.geometry = Geometry::new(width, height);
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_style(mut self, property: &str, value: &str) -> Self {
        self.style.insert(property.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Attribute value, `None` when the attribute is absent
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attribute value, `None` when absent or empty
    pub fn non_empty_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).filter(|v| !v.trim().is_empty())
    }

    /// Computed style value, empty when the host reported none
    pub fn style_value(&self, property: &str) -> &str {
        self.style.get(property).map_or("", String::as_str)
    }

    /// Whether the node takes part in classification at all
    pub fn is_classifiable(&self) -> bool {
        self.displayed && self.enabled
    }

    pub fn is_document_body(&self) -> bool {
        self.tag.eq_ignore_ascii_case("body")
    }

    /// Short human description used in evidence lines
    pub fn describe(&self) -> String {
        let mut out = if self.tag.is_empty() {
            self.role.label().to_string()
        } else {
            self.tag.clone()
        };

        if let Some(id) = self.non_empty_attr("id") {
            out.push_str(&format!(" (id={})", id));
        }

        let text = self.text.trim();
        if !text.is_empty() {
            out.push_str(&format!(" - Text: \"{}\"", truncate(text, 50)));
        }

        if self.role == Role::Link {
            if let Some(href) = self.attr("href") {
                out.push_str(&format!(" [href: {}]", truncate(href, 60)));
            }
        }

        out
    }

    /// Reconstructed markup of the element for failure details
    pub fn html_snippet(&self) -> String {
        let tag = if self.tag.is_empty() { "element" } else { self.tag.as_str() };
        let mut open = format!("<{}", tag);
        for name in ["id", "class", "type", "href", "tabindex"] {
            if let Some(value) = self.attr(name) {
                open.push_str(&format!(" {}=\"{}\"", name, value));
            }
        }
        open.push('>');

        if self.role == Role::Input {
            return open;
        }

        let text = self.text.trim();
        let body = if text.is_empty() { "[No text]" } else { text };
        format!("{}{}</{}>", open, body, tag)
    }
}

/// Truncate to `max` characters, appending an ellipsis when shortened
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_tag() {
        assert_eq!(Role::from_tag("A"), Role::Link);
        assert_eq!(Role::from_tag("button"), Role::Button);
        assert_eq!(Role::from_tag("input"), Role::Input);
        assert_eq!(Role::from_tag("div"), Role::Generic);
    }

    #[test]
    fn test_attribute_absence() {
        let node = NodeSnapshot::new("n1", "input").with_attr("placeholder", "  ");

        assert_eq!(node.attr("type"), None);
        assert_eq!(node.attr("placeholder"), Some("  "));
        assert_eq!(node.non_empty_attr("placeholder"), None);
        assert_eq!(node.style_value("outline"), "");
    }

    #[test]
    fn test_describe_truncates() {
        let long = "x".repeat(80);
        let node = NodeSnapshot::new("n1", "a")
            .with_attr("id", "promo")
            .with_attr("href", "/sale")
            .with_text(&long);

        let desc = node.describe();
        assert!(desc.starts_with("a (id=promo) - Text: \""));
        assert!(desc.contains(&format!("{}...", "x".repeat(50))));
        assert!(desc.ends_with("[href: /sale]"));
    }

    #[test]
    fn test_html_snippet() {
        let link = NodeSnapshot::new("n1", "a").with_attr("href", "/cart");
        assert_eq!(link.html_snippet(), "<a href=\"/cart\">[No text]</a>");

        let input = NodeSnapshot::new("n2", "input").with_attr("type", "email");
        assert_eq!(input.html_snippet(), "<input type=\"email\">");
    }
}
