//! Focus Host Contract
//!
//! The page-side collaborator the engine drives. The engine never enumerates
//! elements on its own; it shifts focus and observes what the host reports.

use serde::{Deserialize, Serialize};

use crate::snapshot::{NodeIdentity, NodeSnapshot};

/// Focus shift direction (Tab / Shift+Tab)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn key_label(&self) -> &'static str {
        match self {
            Self::Forward => "Tab",
            Self::Backward => "Shift+Tab",
        }
    }
}

/// Typed stand-in for the CSS selectors the checks query with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementQuery {
    /// `a`
    Links,
    /// `button`
    Buttons,
    /// `input`
    Inputs,
    /// `a, button, input`
    Interactive,
    /// `a, button` (orientation probe)
    LinksAndButtons,
    /// `p, span, div`
    TextBlocks,
    /// `button[aria-label*='menu'], [class*='hamburger'], [class*='menu-toggle']`
    MenuToggles,
    /// `[class*='carousel'], [class*='slider']`
    Carousels,
    /// `[class*='carousel'] button, [class*='next'], [class*='prev']`
    CarouselControls,
}

/// Page width measurements for the overflow check
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutMetrics {
    /// `window.innerWidth`
    pub viewport_width: f64,
    /// `document.documentElement.scrollWidth`
    pub document_width: f64,
}

/// Host communication error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error("Stale element reference: {0}")]
    StaleElement(NodeIdentity),

    #[error("Host session lost: {0}")]
    Disconnected(String),

    #[error("Host did not respond within {0:?}")]
    Timeout(std::time::Duration),

    #[error("Navigation failed: {0}")]
    Navigation(String),
}

impl HostError {
    /// Stale reads are skipped; everything else aborts the current check
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleElement(_))
    }
}

/// A live page session the audit can drive.
///
/// Implementations wrap a browser automation channel (CDP, WebDriver) or an
/// in-memory model such as [`crate::sim::SimulatedHost`]. Methods are async so
/// remote hosts can suspend; the engine awaits each call before issuing the
/// next one and bounds every call with the session timeout.
#[allow(async_fn_in_trait)]
pub trait FocusHost {
    /// Currently focused node. Must not move focus.
    async fn active(&mut self) -> Result<NodeSnapshot, HostError>;

    /// Move focus one stop in `direction`
    async fn shift_focus(&mut self, direction: Direction) -> Result<(), HostError>;

    /// Wait for layout, animation and async focus moves to finish
    async fn settle(&mut self) -> Result<(), HostError> {
        Ok(())
    }

    /// Content of `meta[name=viewport]`, `None` when the page has none
    async fn viewport_meta(&mut self) -> Result<Option<String>, HostError>;

    /// Number of elements matching `query`
    async fn count(&mut self, query: ElementQuery) -> Result<usize, HostError>;

    /// Snapshots of all elements matching `query`, in document order
    async fn query(&mut self, query: ElementQuery) -> Result<Vec<NodeSnapshot>, HostError>;

    /// Whether a `label[for=id]` exists
    async fn label_exists_for(&mut self, id: &str) -> Result<bool, HostError>;

    /// Current viewport (width, height)
    async fn viewport_size(&mut self) -> Result<(u32, u32), HostError>;

    async fn set_viewport_size(&mut self, width: u32, height: u32) -> Result<(), HostError>;

    /// Navigate to the audited URL again, resetting focus to the document
    async fn reload(&mut self) -> Result<(), HostError>;

    /// Press Enter on the focused node
    async fn activate(&mut self) -> Result<(), HostError>;

    async fn current_url(&mut self) -> Result<String, HostError>;

    async fn layout_metrics(&mut self) -> Result<LayoutMetrics, HostError>;
}
