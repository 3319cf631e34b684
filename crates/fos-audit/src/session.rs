//! Audit Session
//!
//! Explicit per-page context: one host, the emulated device, and the bound on
//! how long any host call may take. Walks borrow the session mutably, so only
//! one walk can drive a given focus cursor at a time.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::host::{Direction, ElementQuery, FocusHost, HostError, LayoutMetrics};
use crate::snapshot::NodeSnapshot;

/// Emulated device viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
}

impl DeviceProfile {
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self { name: name.to_string(), width, height, pixel_ratio: 3.0 }
    }

    pub fn iphone_15() -> Self { Self::new("iPhone 15", 393, 852) }
    pub fn galaxy_s21() -> Self { Self::new("Samsung Galaxy S21", 360, 800) }
    pub fn ipad() -> Self { Self::new("iPad", 768, 1024) }

    /// Portrait presets
    pub fn presets() -> Vec<Self> {
        vec![Self::iphone_15(), Self::galaxy_s21(), Self::ipad()]
    }

    /// Same device with width and height swapped
    pub fn rotated(&self) -> Self {
        Self { width: self.height, height: self.width, ..self.clone() }
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::iphone_15()
    }
}

/// Race a host call against the timeout
async fn bounded<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, HostError>>,
) -> Result<T, HostError> {
    smol::future::or(call, async move {
        smol::Timer::after(limit).await;
        Err(HostError::Timeout(limit))
    })
    .await
}

/// One audited page session
#[derive(Debug)]
pub struct Session<H> {
    host: H,
    device: DeviceProfile,
    timeout: Duration,
}

impl<H: FocusHost> Session<H> {
    pub fn new(host: H, device: DeviceProfile, timeout: Duration) -> Self {
        Self { host, device, timeout }
    }

    pub fn device(&self) -> &DeviceProfile {
        &self.device
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub async fn active(&mut self) -> Result<NodeSnapshot, HostError> {
        bounded(self.timeout, self.host.active()).await
    }

    /// Shift focus and wait for the page to settle
    pub async fn shift(&mut self, direction: Direction) -> Result<(), HostError> {
        bounded(self.timeout, self.host.shift_focus(direction)).await?;
        self.settle().await
    }

    pub async fn settle(&mut self) -> Result<(), HostError> {
        bounded(self.timeout, self.host.settle()).await
    }

    pub async fn viewport_meta(&mut self) -> Result<Option<String>, HostError> {
        bounded(self.timeout, self.host.viewport_meta()).await
    }

    pub async fn count(&mut self, query: ElementQuery) -> Result<usize, HostError> {
        bounded(self.timeout, self.host.count(query)).await
    }

    pub async fn query(&mut self, query: ElementQuery) -> Result<Vec<NodeSnapshot>, HostError> {
        bounded(self.timeout, self.host.query(query)).await
    }

    pub async fn label_exists_for(&mut self, id: &str) -> Result<bool, HostError> {
        bounded(self.timeout, self.host.label_exists_for(id)).await
    }

    pub async fn viewport_size(&mut self) -> Result<(u32, u32), HostError> {
        bounded(self.timeout, self.host.viewport_size()).await
    }

    /// Resize the viewport and wait for relayout
    pub async fn resize(&mut self, width: u32, height: u32) -> Result<(), HostError> {
        bounded(self.timeout, self.host.set_viewport_size(width, height)).await?;
        self.settle().await
    }

    /// Reload the page and wait for it to settle
    pub async fn reload(&mut self) -> Result<(), HostError> {
        tracing::debug!("Reloading page for {}", self.device.name);
        bounded(self.timeout, self.host.reload()).await?;
        self.settle().await
    }

    /// Activate the focused node and wait for the resulting action
    pub async fn activate(&mut self) -> Result<(), HostError> {
        bounded(self.timeout, self.host.activate()).await?;
        self.settle().await
    }

    pub async fn current_url(&mut self) -> Result<String, HostError> {
        bounded(self.timeout, self.host.current_url()).await
    }

    pub async fn layout_metrics(&mut self) -> Result<LayoutMetrics, HostError> {
        bounded(self.timeout, self.host.layout_metrics()).await
    }
}
