//! Viewport pinning: a section is held in place for `extent_px` of scroll
//! while that scroll distance drives its timeline progress.

use crate::anchor::TriggerAnchor;
use crate::constants::{SCRUB_SETTLE_EPSILON, SCRUB_TAU_PER_LAG_SEC};
use crate::error::StageError;
use crate::sampler::{SectionGeometry, Viewport};
use std::time::Duration;

/// Extra scroll distance consumed while pinned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Extent {
    Px(f32),
    /// Percentage of viewport height (`+=130%`).
    ViewportPercent(f32),
}

impl Extent {
    pub fn resolve(self, viewport: Viewport) -> f64 {
        match self {
            Extent::Px(px) => px as f64,
            Extent::ViewportPercent(pct) => viewport.height as f64 * pct as f64 / 100.0,
        }
    }

    fn raw(self) -> f32 {
        match self {
            Extent::Px(v) | Extent::ViewportPercent(v) => v,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinSpec {
    pub trigger: TriggerAnchor,
    pub extent: Extent,
    /// 0 tracks scroll exactly; 1 is the smoothest (and laggiest).
    pub scrub_lag: f32,
}

impl PinSpec {
    pub fn new(trigger: &str, extent: Extent, scrub_lag: f32) -> Result<Self, StageError> {
        if !(0.0..=1.0).contains(&scrub_lag) {
            return Err(StageError::InvalidScrubLag(scrub_lag));
        }
        let raw = extent.raw();
        if !raw.is_finite() || raw <= 0.0 {
            return Err(StageError::InvalidExtent(raw));
        }
        Ok(Self {
            trigger: trigger.parse()?,
            extent,
            scrub_lag,
        })
    }

    /// Resolve against real geometry once the section is laid out.
    pub fn window(&self, geometry: SectionGeometry, viewport: Viewport) -> PinWindow {
        PinWindow {
            start_px: self.trigger.scroll_offset(geometry, viewport),
            extent_px: self.extent.resolve(viewport).max(1.0),
        }
    }
}

/// Document scroll span during which a section is pinned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinWindow {
    pub start_px: f64,
    pub extent_px: f64,
}

impl PinWindow {
    #[inline]
    pub fn end_px(&self) -> f64 {
        self.start_px + self.extent_px
    }

    #[inline]
    pub fn contains(&self, offset_px: f64) -> bool {
        offset_px >= self.start_px && offset_px <= self.end_px()
    }

    /// Raw (undamped) timeline progress for a scroll offset.
    #[inline]
    pub fn progress(&self, offset_px: f64) -> f32 {
        ((offset_px - self.start_px) / self.extent_px).clamp(0.0, 1.0) as f32
    }

    /// Translation that keeps the section visually fixed: the scroll consumed
    /// so far inside the window, so the page resumes from the section's end.
    #[inline]
    pub fn pin_offset(&self, offset_px: f64) -> f64 {
        (offset_px - self.start_px).clamp(0.0, self.extent_px)
    }

    pub fn overlaps(&self, other: &PinWindow) -> bool {
        self.start_px < other.end_px() && other.start_px < self.end_px()
    }
}

/// Index pairs (in the given order) of windows whose spans overlap.
pub fn find_overlaps(windows: &[PinWindow]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for i in 0..windows.len() {
        for j in (i + 1)..windows.len() {
            if windows[i].overlaps(&windows[j]) {
                out.push((i, j));
            }
        }
    }
    out
}

/// Damped follower of raw scroll progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrubbedProgress {
    current: f32,
}

impl ScrubbedProgress {
    pub fn at(progress: f32) -> Self {
        Self { current: progress }
    }

    pub fn value(&self) -> f32 {
        self.current
    }

    /// Approach `target` exponentially; lag 0 jumps straight there.
    pub fn step(&mut self, target: f32, dt: Duration, scrub_lag: f32) -> f32 {
        let tau = scrub_lag * SCRUB_TAU_PER_LAG_SEC;
        if tau <= 0.0 {
            self.current = target;
            return self.current;
        }
        let alpha = 1.0 - (-dt.as_secs_f32() / tau).exp();
        self.current += (target - self.current) * alpha;
        if (target - self.current).abs() < SCRUB_SETTLE_EPSILON {
            self.current = target;
        }
        self.current
    }
}
