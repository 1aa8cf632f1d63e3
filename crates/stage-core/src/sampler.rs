//! Scroll sampling.
//!
//! The host reports raw offsets on every scroll/resize notification; this
//! module turns them into the metrics the rest of the engine reads. Nothing
//! here can fail: a page without overflow simply reports zero.

/// Scroll position and total scrollable distance, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    pub offset_px: f64,
    pub max_offset_px: f64,
}

impl ScrollMetrics {
    pub fn new(offset_px: f64, max_offset_px: f64) -> Self {
        let max_offset_px = if max_offset_px.is_finite() {
            max_offset_px.max(0.0)
        } else {
            0.0
        };
        let offset_px = if offset_px.is_finite() { offset_px } else { 0.0 };
        Self {
            offset_px,
            max_offset_px,
        }
    }

    /// `offset / max` clamped to [0, 1]; 0 when nothing scrolls.
    #[inline]
    pub fn normalized(&self) -> f64 {
        if self.max_offset_px <= 0.0 {
            return 0.0;
        }
        (self.offset_px / self.max_offset_px).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn is_scrollable(&self) -> bool {
        self.max_offset_px > 0.0
    }

    /// Pixel offset for a normalized position.
    #[inline]
    pub fn offset_for(&self, normalized: f64) -> f64 {
        normalized.clamp(0.0, 1.0) * self.max_offset_px
    }
}

/// Visible viewport size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// Element box in document coordinates (independent of scroll).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SectionGeometry {
    pub top_px: f64,
    pub height_px: f64,
}

/// Holds the latest metrics between ticks.
#[derive(Clone, Debug, Default)]
pub struct ScrollSampler {
    latest: ScrollMetrics,
    viewport: Viewport,
}

impl ScrollSampler {
    pub fn sample(&mut self, offset_px: f64, max_offset_px: f64, viewport: Viewport) {
        self.latest = ScrollMetrics::new(offset_px, max_offset_px);
        self.viewport = viewport;
    }

    pub fn metrics(&self) -> ScrollMetrics {
        self.latest
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn normalized(&self) -> f64 {
        self.latest.normalized()
    }
}
