//! Scrubbed drift for imagery inside flowing sections.

use crate::anchor::TriggerAnchor;
use crate::error::StageError;
use crate::host::ElementHost;
use crate::pin::ScrubbedProgress;
use crate::sampler::Viewport;
use crate::style::{Frame, Property, TargetKey};
use std::time::Duration;

#[derive(Clone, Copy, Debug)]
pub struct ParallaxBlueprint {
    pub target: TargetKey,
    pub trigger_element: TargetKey,
    pub start: &'static str,
    pub end: &'static str,
    pub from_px: f32,
    pub to_px: f32,
    pub scrub_lag: f32,
}

impl ParallaxBlueprint {
    /// Drift from -12px to 12px while `trigger_element` crosses the viewport.
    pub const fn drift(target: TargetKey, trigger_element: TargetKey) -> Self {
        Self {
            target,
            trigger_element,
            start: "top bottom",
            end: "bottom top",
            from_px: -12.0,
            to_px: 12.0,
            scrub_lag: 0.5,
        }
    }
}

pub struct ParallaxTrack {
    blueprint: ParallaxBlueprint,
    start: TriggerAnchor,
    end: TriggerAnchor,
    start_px: f64,
    end_px: f64,
    progress: ScrubbedProgress,
    last: Option<f32>,
}

impl ParallaxTrack {
    pub fn setup(
        blueprint: &ParallaxBlueprint,
        host: &dyn ElementHost,
        viewport: Viewport,
    ) -> Result<Option<Self>, StageError> {
        if !blueprint.scrub_lag.is_finite() || blueprint.scrub_lag < 0.0 {
            return Err(StageError::InvalidScrubLag(blueprint.scrub_lag));
        }
        let start: TriggerAnchor = blueprint.start.parse()?;
        let end: TriggerAnchor = blueprint.end.parse()?;
        if !host.is_resolved(blueprint.target) {
            return Ok(None);
        }
        let mut track = Self {
            blueprint: *blueprint,
            start,
            end,
            start_px: 0.0,
            end_px: 0.0,
            progress: ScrubbedProgress::default(),
            last: None,
        };
        if !track.measure(host, viewport) {
            return Ok(None);
        }
        Ok(Some(track))
    }

    fn measure(&mut self, host: &dyn ElementHost, viewport: Viewport) -> bool {
        let Some(geometry) = host.geometry(self.blueprint.trigger_element) else {
            return false;
        };
        self.start_px = self.start.scroll_offset(geometry, viewport);
        self.end_px = self.end.scroll_offset(geometry, viewport);
        true
    }

    pub fn target(&self) -> TargetKey {
        self.blueprint.target
    }

    pub fn relayout(&mut self, host: &dyn ElementHost, viewport: Viewport) {
        self.measure(host, viewport);
    }

    fn raw_progress(&self, offset_px: f64) -> f32 {
        let span = self.end_px - self.start_px;
        if span <= 0.0 {
            return if offset_px >= self.end_px { 1.0 } else { 0.0 };
        }
        ((offset_px - self.start_px) / span).clamp(0.0, 1.0) as f32
    }

    /// Emits a frame only when the drifted value moves.
    pub fn tick(&mut self, offset_px: f64, dt: Duration) -> Option<Frame> {
        let target = self.raw_progress(offset_px);
        let p = if self.last.is_none() {
            self.progress = ScrubbedProgress::at(target);
            target
        } else {
            self.progress.step(target, dt, self.blueprint.scrub_lag)
        };
        let y = self.blueprint.from_px + (self.blueprint.to_px - self.blueprint.from_px) * p;
        if self.last == Some(y) {
            return None;
        }
        self.last = Some(y);
        let mut frame = Frame::new();
        frame.set(self.blueprint.target, Property::Y, y);
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::SectionGeometry;

    const VP: Viewport = Viewport {
        width: 1000.0,
        height: 800.0,
    };

    struct Step;

    impl ElementHost for Step {
        fn geometry(&self, key: TargetKey) -> Option<SectionGeometry> {
            matches!(key, "step" | "image").then_some(SectionGeometry {
                top_px: 2000.0,
                height_px: 400.0,
            })
        }
    }

    fn track() -> ParallaxTrack {
        ParallaxTrack::setup(&ParallaxBlueprint::drift("image", "step"), &Step, VP)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn spans_viewport_entry_to_exit() {
        let t = track();
        // top hits bottom of viewport at 2000 - 800; bottom passes top at 2400.
        assert_eq!(t.start_px, 1200.0);
        assert_eq!(t.end_px, 2400.0);
        assert_eq!(t.raw_progress(1800.0), 0.5);
    }

    #[test]
    fn first_tick_jumps_then_smooths() {
        let mut t = track();
        let f = t.tick(0.0, Duration::ZERO).unwrap();
        assert_eq!(f.get("image").unwrap().translate.y, -12.0);
        assert!(t.tick(0.0, Duration::from_millis(16)).is_none());

        let y = t.tick(2400.0, Duration::from_millis(16)).unwrap().get("image").unwrap().translate.y;
        assert!(y > -12.0 && y < 12.0, "lagging behind the scroll: {y}");
        let mut last = y;
        for _ in 0..300 {
            if let Some(f) = t.tick(2400.0, Duration::from_millis(16)) {
                last = f.get("image").unwrap().translate.y;
            }
        }
        assert!((last - 12.0).abs() < 1e-3);
    }

    #[test]
    fn unmounted_image_is_skipped() {
        let bp = ParallaxBlueprint::drift("missing", "step");
        assert!(ParallaxTrack::setup(&bp, &Step, VP).unwrap().is_none());
    }
}
