//! Simulated Focus Host
//!
//! In-memory page model driven like a browser tab. Focus order follows the
//! HTML sequential navigation rules: positive tabindex values first in
//! ascending order, then natively focusable elements and `tabindex=0` in
//! document order. Tab past the last stop hands focus back to the body, and the
//! next Tab re-enters at the first stop.
//!
//! Pages load from a JSON [`PageFixture`]; traps, stale handles and host
//! failures can be injected for tests.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::classify::TabIndex;
use crate::host::{Direction, ElementQuery, FocusHost, HostError, LayoutMetrics};
use crate::snapshot::{NodeIdentity, NodeSnapshot, Role};

/// Hold count that never runs out
pub const HOLD_FOREVER: u32 = u32::MAX;

/// Serializable description of one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFixture {
    pub url: String,
    /// Every element of interest, in document order
    pub elements: Vec<NodeSnapshot>,
    /// Explicit focus order; derived from `elements` when empty
    pub tab_order: Vec<NodeIdentity>,
    /// Content of `meta[name=viewport]`
    pub viewport_meta: Option<String>,
    /// Ids referenced by a `label[for]`
    pub labels: Vec<String>,
    /// Query results that cannot be derived from attributes alone
    pub queries: HashMap<ElementQuery, Vec<NodeIdentity>>,
    /// Counts reported while the viewport is wider than tall
    pub landscape_counts: HashMap<ElementQuery, usize>,
    /// Scroll width of the document; the viewport width when absent
    pub document_width: Option<f64>,
    /// Identity -> URL loaded when that element is activated
    pub navigations: HashMap<NodeIdentity, String>,
    /// Identity -> number of shifts the element swallows before releasing focus
    pub holds: HashMap<NodeIdentity, u32>,
    /// Elements whose handles go stale when read
    pub stale: Vec<NodeIdentity>,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for PageFixture {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            elements: Vec::new(),
            tab_order: Vec::new(),
            viewport_meta: None,
            labels: Vec::new(),
            queries: HashMap::new(),
            landscape_counts: HashMap::new(),
            document_width: None,
            navigations: HashMap::new(),
            holds: HashMap::new(),
            stale: Vec::new(),
            viewport_width: 393,
            viewport_height: 852,
        }
    }
}

impl PageFixture {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn element(&self, identity: &NodeIdentity) -> Option<usize> {
        self.elements.iter().position(|e| &e.identity == identity)
    }

    /// Element indices in sequential focus order
    fn focus_order(&self) -> Vec<usize> {
        if !self.tab_order.is_empty() {
            return self.tab_order.iter().filter_map(|id| self.element(id)).collect();
        }

        let mut positive = Vec::new();
        let mut natural = Vec::new();
        for (index, element) in self.elements.iter().enumerate() {
            if !element.is_classifiable() {
                continue;
            }
            match TabIndex::parse(element.attr("tabindex")) {
                TabIndex::Removed(_) => {}
                TabIndex::Sequential(n) if n > 0 => positive.push((n, index)),
                TabIndex::Sequential(_) => natural.push(index),
                TabIndex::Default if natively_focusable(element) => natural.push(index),
                TabIndex::Default => {}
            }
        }

        // Stable, so equal tabindex values keep document order
        positive.sort_by_key(|(n, _)| *n);
        positive.into_iter().map(|(_, index)| index).chain(natural).collect()
    }

    fn matches(element: &NodeSnapshot, query: ElementQuery) -> bool {
        let class = element.attr("class").unwrap_or("");
        match query {
            ElementQuery::Links => element.role == Role::Link,
            ElementQuery::Buttons => element.role == Role::Button,
            ElementQuery::Inputs => element.tag == "input",
            ElementQuery::Interactive => {
                matches!(element.role, Role::Link | Role::Button) || element.tag == "input"
            }
            ElementQuery::LinksAndButtons => matches!(element.role, Role::Link | Role::Button),
            ElementQuery::TextBlocks => matches!(element.tag.as_str(), "p" | "span" | "div"),
            ElementQuery::MenuToggles => {
                (element.role == Role::Button
                    && element.attr("aria-label").is_some_and(|l| l.contains("menu")))
                    || class.contains("hamburger")
                    || class.contains("menu-toggle")
            }
            ElementQuery::Carousels => class.contains("carousel") || class.contains("slider"),
            ElementQuery::CarouselControls => {
                (element.role == Role::Button && class.contains("carousel"))
                    || class.contains("next")
                    || class.contains("prev")
            }
        }
    }
}

fn natively_focusable(element: &NodeSnapshot) -> bool {
    match element.role {
        Role::Link => element.non_empty_attr("href").is_some(),
        Role::Button | Role::Input => true,
        Role::Generic => false,
    }
}

/// In-memory [`FocusHost`]
#[derive(Debug, Clone)]
pub struct SimulatedHost {
    fixture: PageFixture,
    order: Vec<usize>,
    /// Position in `order`; `None` while the document body has focus
    focused: Option<usize>,
    body: NodeSnapshot,
    stale: HashSet<NodeIdentity>,
    holds: HashMap<NodeIdentity, u32>,
    viewport: (u32, u32),
    url: String,
    shifts: usize,
    disconnect_after: Option<usize>,
    disconnected: bool,
    hang_on_settle: bool,
}

impl SimulatedHost {
    /// Page with the given elements, focus on the document body
    pub fn new(elements: Vec<NodeSnapshot>) -> Self {
        Self::from_fixture(PageFixture { elements, ..PageFixture::default() })
    }

    pub fn from_fixture(fixture: PageFixture) -> Self {
        let order = fixture.focus_order();
        let stale = fixture.stale.iter().cloned().collect();
        let holds = fixture.holds.clone();
        let viewport = (fixture.viewport_width, fixture.viewport_height);
        let url = fixture.url.clone();

        Self {
            fixture,
            order,
            focused: None,
            body: NodeSnapshot::new("body", "body"),
            stale,
            holds,
            viewport,
            url,
            shifts: 0,
            disconnect_after: None,
            disconnected: false,
            hang_on_settle: false,
        }
    }

    pub fn fixture(&self) -> &PageFixture {
        &self.fixture
    }

    /// Focus the `position`-th stop of the focus order
    pub fn focus_index(&mut self, position: usize) {
        if position < self.order.len() {
            self.focused = Some(position);
        }
    }

    /// Focus shifts requested so far, including swallowed ones
    pub fn shift_count(&self) -> usize {
        self.shifts
    }

    /// Identity of the focused element, `None` on the body
    pub fn focused(&self) -> Option<&NodeIdentity> {
        self.focused
            .map(|position| &self.fixture.elements[self.order[position]].identity)
    }

    pub fn mark_stale(&mut self, identity: &str) {
        let identity = NodeIdentity::from(identity);
        self.fixture.stale.push(identity.clone());
        self.stale.insert(identity);
    }

    /// Make `identity` keep focus for the next `shifts` shifts away from it.
    /// [`HOLD_FOREVER`] never releases.
    pub fn hold_focus(&mut self, identity: &str, shifts: u32) {
        let identity = NodeIdentity::from(identity);
        self.fixture.holds.insert(identity.clone(), shifts);
        self.holds.insert(identity, shifts);
    }

    /// Let `shifts` focus shifts succeed, then drop the session
    pub fn disconnect_after(&mut self, shifts: usize) {
        self.disconnect_after = Some(shifts);
    }

    /// Never finish settling
    pub fn hang_on_settle(&mut self) {
        self.hang_on_settle = true;
    }

    fn connected(&self) -> Result<(), HostError> {
        if self.disconnected {
            Err(HostError::Disconnected("simulated session closed".to_string()))
        } else {
            Ok(())
        }
    }

    fn landscape(&self) -> bool {
        self.viewport.0 > self.viewport.1
    }

    fn resolve(&self, query: ElementQuery) -> Vec<NodeSnapshot> {
        match self.fixture.queries.get(&query) {
            Some(ids) => ids
                .iter()
                .filter_map(|id| self.fixture.element(id))
                .map(|index| self.fixture.elements[index].clone())
                .collect(),
            None => self
                .fixture
                .elements
                .iter()
                .filter(|e| PageFixture::matches(e, query))
                .cloned()
                .collect(),
        }
    }

    /// Swallow the shift if the focused element is holding focus
    fn consume_hold(&mut self) -> bool {
        let Some(identity) = self.focused().cloned() else {
            return false;
        };
        match self.holds.get_mut(&identity) {
            Some(remaining) if *remaining > 0 => {
                if *remaining != HOLD_FOREVER {
                    *remaining -= 1;
                }
                true
            }
            _ => false,
        }
    }
}

impl FocusHost for SimulatedHost {
    async fn active(&mut self) -> Result<NodeSnapshot, HostError> {
        self.connected()?;
        let Some(position) = self.focused else {
            return Ok(self.body.clone());
        };

        let element = &self.fixture.elements[self.order[position]];
        if self.stale.contains(&element.identity) {
            return Err(HostError::StaleElement(element.identity.clone()));
        }
        Ok(element.clone())
    }

    async fn shift_focus(&mut self, direction: Direction) -> Result<(), HostError> {
        self.connected()?;
        if self.disconnect_after.is_some_and(|limit| self.shifts >= limit) {
            self.disconnected = true;
            return Err(HostError::Disconnected(format!("dropped after {} shifts", self.shifts)));
        }
        self.shifts += 1;

        if self.order.is_empty() || self.consume_hold() {
            return Ok(());
        }

        // Focus leaves the document past either end of the order and
        // re-enters from the body on the next shift.
        let last = self.order.len() - 1;
        self.focused = match (direction, self.focused) {
            (Direction::Forward, Some(p)) if p < last => Some(p + 1),
            (Direction::Forward, Some(_)) => None,
            (Direction::Forward, None) => Some(0),
            (Direction::Backward, Some(p)) if p > 0 => Some(p - 1),
            (Direction::Backward, Some(_)) => None,
            (Direction::Backward, None) => Some(last),
        };
        Ok(())
    }

    async fn settle(&mut self) -> Result<(), HostError> {
        self.connected()?;
        if self.hang_on_settle {
            smol::Timer::never().await;
        }
        Ok(())
    }

    async fn viewport_meta(&mut self) -> Result<Option<String>, HostError> {
        self.connected()?;
        Ok(self.fixture.viewport_meta.clone())
    }

    async fn count(&mut self, query: ElementQuery) -> Result<usize, HostError> {
        self.connected()?;
        if self.landscape() {
            if let Some(count) = self.fixture.landscape_counts.get(&query) {
                return Ok(*count);
            }
        }
        Ok(self.resolve(query).len())
    }

    async fn query(&mut self, query: ElementQuery) -> Result<Vec<NodeSnapshot>, HostError> {
        self.connected()?;
        Ok(self.resolve(query))
    }

    async fn label_exists_for(&mut self, id: &str) -> Result<bool, HostError> {
        self.connected()?;
        Ok(self.fixture.labels.iter().any(|label| label == id))
    }

    async fn viewport_size(&mut self) -> Result<(u32, u32), HostError> {
        self.connected()?;
        Ok(self.viewport)
    }

    async fn set_viewport_size(&mut self, width: u32, height: u32) -> Result<(), HostError> {
        self.connected()?;
        self.viewport = (width, height);
        Ok(())
    }

    async fn reload(&mut self) -> Result<(), HostError> {
        self.connected()?;
        self.focused = None;
        self.holds = self.fixture.holds.clone();
        self.url = self.fixture.url.clone();
        Ok(())
    }

    async fn activate(&mut self) -> Result<(), HostError> {
        self.connected()?;
        let target = self.focused().and_then(|id| self.fixture.navigations.get(id)).cloned();
        if let Some(target) = target {
            tracing::debug!("Simulated navigation to {}", target);
            self.url = target;
            self.focused = None;
        }
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String, HostError> {
        self.connected()?;
        Ok(self.url.clone())
    }

    async fn layout_metrics(&mut self) -> Result<LayoutMetrics, HostError> {
        self.connected()?;
        let viewport_width = self.viewport.0 as f64;
        Ok(LayoutMetrics {
            viewport_width,
            document_width: self.fixture.document_width.unwrap_or(viewport_width),
        })
    }
}
