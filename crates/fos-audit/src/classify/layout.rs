//! Layout Checks
//!
//! Orientation support, horizontal overflow, and single-pointer alternatives
//! for carousel gestures.

use crate::host::LayoutMetrics;

/// Interactive elements must exist in both orientations; the counts need not match
pub fn orientation_passes(portrait: usize, landscape: usize) -> bool {
    portrait > 0 && landscape > 0
}

/// Pixels by which the document overflows the viewport beyond `tolerance`,
/// `None` when it fits
pub fn horizontal_overflow(metrics: LayoutMetrics, tolerance: f64) -> Option<f64> {
    (metrics.document_width > metrics.viewport_width + tolerance)
        .then(|| metrics.document_width - metrics.viewport_width)
}

/// Carousel gesture alternatives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureSupport {
    /// No carousel or slider on the page
    NoCarousel,
    /// Carousels present without previous/next controls
    MissingControls { carousels: usize },
    Controlled { carousels: usize, controls: usize },
}

pub fn gesture_support(carousels: usize, controls: usize) -> GestureSupport {
    match (carousels, controls) {
        (0, _) => GestureSupport::NoCarousel,
        (carousels, 0) => GestureSupport::MissingControls { carousels },
        (carousels, controls) => GestureSupport::Controlled { carousels, controls },
    }
}
