//! One-shot reveals for flowing (non-pinned) content.
//!
//! A reveal plays forward when its trigger element crosses a viewport line
//! going down and plays back to the hidden state when the page scrolls back
//! above it. Values are sampled from playhead position, so repeated
//! crossings land on the same end state.

use crate::anchor::TriggerAnchor;
use crate::easing::Ease;
use crate::error::StageError;
use crate::host::ElementHost;
use crate::sampler::Viewport;
use crate::style::{Frame, Property, TargetKey, Value};
use crate::timeline::{Keyframe, Timeline};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealTrack {
    pub property: Property,
    pub from: Value,
    pub to: Value,
}

impl RevealTrack {
    pub const fn new(property: Property, from: Value, to: Value) -> Self {
        Self { property, from, to }
    }
}

/// Fade-and-rise used by most flowing content.
pub const fn rise(px: f32) -> [RevealTrack; 2] {
    [
        RevealTrack::new(Property::Y, Value::Px(px), Value::Px(0.0)),
        RevealTrack::new(Property::Opacity, Value::Unit(0.0), Value::Unit(1.0)),
    ]
}

#[derive(Clone, Copy, Debug)]
pub struct RevealBlueprint {
    pub target: TargetKey,
    /// Element whose position fires the reveal; usually the target itself.
    pub trigger_element: TargetKey,
    pub trigger: &'static str,
    pub tracks: &'static [RevealTrack],
    pub duration_sec: f32,
    pub delay_sec: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Playback {
    Idle,
    Forward,
    Reverse,
}

pub struct FlowingReveal {
    target: TargetKey,
    trigger_element: TargetKey,
    anchor: TriggerAnchor,
    timeline: Timeline,
    duration_sec: f32,
    delay_sec: f32,
    trigger_px: f64,
    progress: f32,
    delay_left: f32,
    playback: Playback,
    past: bool,
    dirty: bool,
}

impl FlowingReveal {
    pub fn setup(
        blueprint: &RevealBlueprint,
        host: &dyn ElementHost,
        viewport: Viewport,
    ) -> Result<Option<Self>, StageError> {
        let anchor: TriggerAnchor = blueprint.trigger.parse()?;
        let timeline = Timeline::new(blueprint.tracks.iter().map(|t| Keyframe {
            target: blueprint.target,
            property: t.property,
            start: 0.0,
            end: 1.0,
            from: t.from,
            to: t.to,
            ease: Ease::Power2Out,
        }))?;
        if !host.is_resolved(blueprint.target) {
            log::debug!("[reveal] #{} not mounted; skipping", blueprint.target);
            return Ok(None);
        }
        let Some(geometry) = host.geometry(blueprint.trigger_element) else {
            log::debug!("[reveal] trigger #{} not mounted; skipping", blueprint.trigger_element);
            return Ok(None);
        };
        Ok(Some(Self {
            target: blueprint.target,
            trigger_element: blueprint.trigger_element,
            anchor,
            timeline,
            duration_sec: blueprint.duration_sec.max(f32::EPSILON),
            delay_sec: blueprint.delay_sec.max(0.0),
            trigger_px: anchor.scroll_offset(geometry, viewport),
            progress: 0.0,
            delay_left: 0.0,
            playback: Playback::Idle,
            past: false,
            dirty: true,
        }))
    }

    pub fn target(&self) -> TargetKey {
        self.target
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn relayout(&mut self, host: &dyn ElementHost, viewport: Viewport) {
        if let Some(geometry) = host.geometry(self.trigger_element) {
            self.trigger_px = self.anchor.scroll_offset(geometry, viewport);
        }
    }

    /// Advance one tick. Returns a frame only when the element changed.
    pub fn tick(&mut self, offset_px: f64, dt: Duration, viewport: Viewport) -> Option<Frame> {
        let past = offset_px >= self.trigger_px;
        if past != self.past {
            self.past = past;
            if past {
                if self.progress <= 0.0 {
                    self.delay_left = self.delay_sec;
                }
                self.playback = Playback::Forward;
            } else {
                self.delay_left = 0.0;
                self.playback = Playback::Reverse;
            }
        }

        let mut step = dt.as_secs_f32();
        match self.playback {
            Playback::Idle => {}
            Playback::Forward => {
                if self.delay_left > 0.0 {
                    let used = step.min(self.delay_left);
                    self.delay_left -= used;
                    step -= used;
                }
                if step > 0.0 {
                    self.progress = (self.progress + step / self.duration_sec).min(1.0);
                    self.dirty = true;
                }
                if self.progress >= 1.0 {
                    self.playback = Playback::Idle;
                }
            }
            Playback::Reverse => {
                self.progress = (self.progress - step / self.duration_sec).max(0.0);
                self.dirty = true;
                if self.progress <= 0.0 {
                    self.playback = Playback::Idle;
                }
            }
        }

        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.timeline.sample(self.progress, viewport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::SectionGeometry;

    const VP: Viewport = Viewport {
        width: 1000.0,
        height: 1000.0,
    };
    const DT: Duration = Duration::from_millis(16);
    const RISE: [RevealTrack; 2] = rise(40.0);

    const CARD: RevealBlueprint = RevealBlueprint {
        target: "card",
        trigger_element: "card",
        trigger: "top 80%",
        tracks: &RISE,
        duration_sec: 0.8,
        delay_sec: 0.2,
    };

    struct OneCard;

    impl ElementHost for OneCard {
        fn geometry(&self, key: TargetKey) -> Option<SectionGeometry> {
            (key == "card").then_some(SectionGeometry {
                top_px: 3000.0,
                height_px: 400.0,
            })
        }
    }

    fn settle(r: &mut FlowingReveal, offset: f64) -> Option<Frame> {
        let mut last = None;
        for _ in 0..200 {
            if let Some(f) = r.tick(offset, DT, VP) {
                last = Some(f);
            }
        }
        last
    }

    #[test]
    fn first_tick_renders_hidden_state() {
        let mut r = FlowingReveal::setup(&CARD, &OneCard, VP).unwrap().unwrap();
        let f = r.tick(0.0, DT, VP).unwrap();
        let s = f.get("card").unwrap();
        assert_eq!((s.translate.y, s.opacity), (40.0, 0.0));
        assert!(r.tick(0.0, DT, VP).is_none(), "idle reveals stay quiet");
    }

    #[test]
    fn plays_forward_after_its_delay_and_reverses_above_threshold() {
        let mut r = FlowingReveal::setup(&CARD, &OneCard, VP).unwrap().unwrap();
        // Trigger line: 3000 - 0.8 * 1000 = 2200.
        r.tick(2199.0, DT, VP);
        assert_eq!(r.playback(), Playback::Idle);
        r.tick(2200.0, DT, VP);
        assert_eq!(r.playback(), Playback::Forward);
        assert_eq!(r.progress(), 0.0, "still inside the delay");
        let shown = settle(&mut r, 2400.0).unwrap();
        assert_eq!(shown.get("card").unwrap().opacity, 1.0);
        assert_eq!(r.playback(), Playback::Idle);

        let hidden = settle(&mut r, 1000.0).unwrap();
        assert_eq!(hidden.get("card").unwrap().translate.y, 40.0);
        assert_eq!(r.progress(), 0.0);
    }

    #[test]
    fn repeated_crossings_land_on_identical_end_states() {
        let mut r = FlowingReveal::setup(&CARD, &OneCard, VP).unwrap().unwrap();
        let first = settle(&mut r, 2500.0).unwrap();
        settle(&mut r, 100.0);
        let second = settle(&mut r, 2500.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn partial_reverse_resumes_without_delay() {
        let mut r = FlowingReveal::setup(&CARD, &OneCard, VP).unwrap().unwrap();
        for _ in 0..30 {
            r.tick(2500.0, DT, VP);
        }
        for _ in 0..5 {
            r.tick(100.0, DT, VP);
        }
        let before = r.progress();
        assert!(before > 0.0);
        r.tick(2500.0, DT, VP);
        assert!(r.progress() > before);
    }

    #[test]
    fn missing_target_is_skipped() {
        let bp = RevealBlueprint {
            target: "ghost",
            ..CARD
        };
        assert!(FlowingReveal::setup(&bp, &OneCard, VP).unwrap().is_none());
    }
}
