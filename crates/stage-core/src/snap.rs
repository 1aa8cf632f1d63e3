//! Page-level snap coordination.
//!
//! After the settle delay the stage turns every registered pin window into a
//! normalized [`PinnedRange`]. Once native scrolling goes idle the
//! coordinator asks [`SnapRegistry::snap_to`] where the page should rest and,
//! if that differs from where it is, eases the scroll there.

use crate::constants::{
    SCROLL_SETTLE_IDLE, SNAP_BUFFER, SNAP_DURATION_MAX_SEC, SNAP_DURATION_MIN_SEC,
    SNAP_EDGE_EPSILON, SNAP_MIN_DISTANCE_PX, SNAP_SEC_PER_UNIT, SNAP_TAKEOVER_PX,
};
use crate::easing::Ease;
use crate::pin::PinWindow;
use crate::sampler::ScrollMetrics;
use smallvec::SmallVec;
use std::time::Duration;

/// A pin window in normalized scroll space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinnedRange {
    pub start: f64,
    pub end: f64,
    pub center: f64,
}

impl PinnedRange {
    pub fn new(start: f64, end: f64) -> Self {
        let start = start.clamp(0.0, 1.0);
        let end = end.clamp(start, 1.0);
        Self {
            start,
            end,
            center: start + (end - start) * 0.5,
        }
    }

    pub fn from_window(window: &PinWindow, max_offset_px: f64) -> Self {
        Self::new(
            window.start_px / max_offset_px,
            window.end_px() / max_offset_px,
        )
    }

    /// Whether `value` lies inside the range widened by the snap buffer.
    /// Both edges are inclusive.
    #[inline]
    pub fn buffer_contains(&self, value: f64) -> bool {
        value >= self.start - SNAP_BUFFER - SNAP_EDGE_EPSILON
            && value <= self.end + SNAP_BUFFER + SNAP_EDGE_EPSILON
    }
}

/// Pinned ranges sorted ascending by start. Never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapRegistry {
    ranges: SmallVec<[PinnedRange; 8]>,
}

impl SnapRegistry {
    /// `None` when nothing scrolls or nothing is pinned.
    pub fn build(windows: &[PinWindow], max_offset_px: f64) -> Option<Self> {
        if !(max_offset_px > 0.0) {
            return None;
        }
        Self::from_ranges(
            windows
                .iter()
                .map(|w| PinnedRange::from_window(w, max_offset_px)),
        )
    }

    pub fn from_ranges(ranges: impl IntoIterator<Item = PinnedRange>) -> Option<Self> {
        let mut ranges: SmallVec<[PinnedRange; 8]> = ranges.into_iter().collect();
        if ranges.is_empty() {
            return None;
        }
        ranges.sort_by(|a, b| a.start.total_cmp(&b.start));
        Some(Self { ranges })
    }

    pub fn ranges(&self) -> &[PinnedRange] {
        &self.ranges
    }

    /// Identity outside every buffered range. Inside any buffer, the center of
    /// the range nearest to `value` across the whole registry; on a distance
    /// tie the earlier range wins.
    pub fn snap_to(&self, value: f64) -> f64 {
        if !self.ranges.iter().any(|r| r.buffer_contains(value)) {
            return value;
        }
        let mut best = self.ranges[0].center;
        for r in &self.ranges[1..] {
            if (r.center - value).abs() < (best - value).abs() {
                best = r.center;
            }
        }
        best
    }
}

/// Settle tween parameters applied when a snap fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapSettle {
    pub min: Duration,
    pub max: Duration,
    pub delay: Duration,
    pub ease: Ease,
}

impl Default for SnapSettle {
    fn default() -> Self {
        Self {
            min: Duration::from_secs_f64(SNAP_DURATION_MIN_SEC),
            max: Duration::from_secs_f64(SNAP_DURATION_MAX_SEC),
            delay: Duration::ZERO,
            ease: Ease::Power2Out,
        }
    }
}

impl SnapSettle {
    /// Longer hops take longer, within `[min, max]`.
    pub fn duration_for(&self, normalized_distance: f64) -> Duration {
        let secs = normalized_distance.abs() * SNAP_SEC_PER_UNIT;
        Duration::from_secs_f64(secs.clamp(self.min.as_secs_f64(), self.max.as_secs_f64()))
    }
}

/// In-flight corrective scroll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapAnimation {
    pub from_px: f64,
    pub to_px: f64,
    pub started: Duration,
    pub duration: Duration,
    pub ease: Ease,
}

impl SnapAnimation {
    /// Scroll offset at `now` and whether the animation has finished.
    pub fn sample(&self, now: Duration) -> (f64, bool) {
        let elapsed = now.saturating_sub(self.started).as_secs_f64();
        let total = self.duration.as_secs_f64().max(f64::EPSILON);
        let t = (elapsed / total).min(1.0);
        let eased = self.ease.apply_f64(t);
        (self.from_px + (self.to_px - self.from_px) * eased, t >= 1.0)
    }
}

/// Installed once; afterwards turns scroll-idle moments into snap targets.
#[derive(Debug, Default)]
pub struct SnapCoordinator {
    registry: Option<SnapRegistry>,
    built_for_max_px: f64,
    settle: SnapSettle,
    last_scroll: Option<Duration>,
    active: Option<SnapAnimation>,
    // Offset the in-flight snap last asked the page to scroll to.
    written_px: f64,
}

impl SnapCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_installed(&self) -> bool {
        self.registry.is_some()
    }

    pub fn registry(&self) -> Option<&SnapRegistry> {
        self.registry.as_ref()
    }

    pub fn settle(&self) -> SnapSettle {
        self.settle
    }

    /// Build the range registry from resolved windows. Returns whether the
    /// coordinator is now installed; later calls are ignored.
    pub fn install(&mut self, windows: &[PinWindow], metrics: ScrollMetrics) -> bool {
        if self.registry.is_some() {
            return true;
        }
        match SnapRegistry::build(windows, metrics.max_offset_px) {
            Some(registry) => {
                log::info!(
                    "[snap] installed with {} pinned ranges over {:.0}px",
                    registry.ranges().len(),
                    metrics.max_offset_px
                );
                self.registry = Some(registry);
                self.built_for_max_px = metrics.max_offset_px;
                true
            }
            None => {
                log::debug!(
                    "[snap] skipped: {} windows, max offset {:.0}px",
                    windows.len(),
                    metrics.max_offset_px
                );
                false
            }
        }
    }

    /// Max offset the registry was normalized against.
    pub fn built_for_max_px(&self) -> f64 {
        self.built_for_max_px
    }

    pub fn note_scroll(&mut self, now: Duration) {
        self.last_scroll = Some(now);
    }

    /// User input takes over from an in-flight snap.
    pub fn cancel(&mut self) {
        if self.active.take().is_some() {
            log::debug!("[snap] cancelled by user input");
        }
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Scroll offset to apply this frame, if any.
    pub fn poll(&mut self, metrics: ScrollMetrics, now: Duration) -> Option<f64> {
        let registry = self.registry.as_ref()?;

        if let Some(anim) = self.active {
            if (metrics.offset_px - self.written_px).abs() > SNAP_TAKEOVER_PX {
                self.active = None;
                log::debug!(
                    "[snap] page moved to {:.0}px outside the snap; yielding",
                    metrics.offset_px
                );
                return None;
            }
            let (offset, done) = anim.sample(now);
            if done {
                self.active = None;
                self.last_scroll = None;
            }
            self.written_px = offset;
            return Some(offset);
        }

        let last = self.last_scroll?;
        if now.saturating_sub(last) < SCROLL_SETTLE_IDLE + self.settle.delay {
            return None;
        }
        self.last_scroll = None;
        if !metrics.is_scrollable() {
            return None;
        }

        let value = metrics.normalized();
        let target = registry.snap_to(value);
        let to_px = metrics.offset_for(target);
        if (to_px - metrics.offset_px).abs() < SNAP_MIN_DISTANCE_PX {
            return None;
        }
        let anim = SnapAnimation {
            from_px: metrics.offset_px,
            to_px,
            started: now,
            duration: self.settle.duration_for(target - value),
            ease: self.settle.ease,
        };
        log::debug!(
            "[snap] {:.3} -> {:.3} over {:?}",
            value,
            target,
            anim.duration
        );
        self.active = Some(anim);
        self.written_px = anim.sample(now).0;
        Some(self.written_px)
    }
}
