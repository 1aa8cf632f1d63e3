//! Time-driven entrance that plays once on page load.

use crate::easing::Ease;
use crate::error::StageError;
use crate::sampler::Viewport;
use crate::style::{Frame, Property, TargetKey, Value};
use crate::timeline::{Keyframe, Timeline};
use std::time::Duration;

/// Tween row in seconds. Sibling targets start `stagger_sec` apart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntroRow {
    pub targets: &'static [TargetKey],
    pub at_sec: f32,
    pub duration_sec: f32,
    pub stagger_sec: f32,
    pub property: Property,
    pub from: Value,
    pub to: Value,
}

impl IntroRow {
    pub const fn new(
        targets: &'static [TargetKey],
        at_sec: f32,
        duration_sec: f32,
        property: Property,
        from: Value,
        to: Value,
    ) -> Self {
        Self {
            targets,
            at_sec,
            duration_sec,
            stagger_sec: 0.0,
            property,
            from,
            to,
        }
    }

    pub const fn stagger(self, stagger_sec: f32) -> Self {
        Self {
            stagger_sec,
            ..self
        }
    }

    fn end_sec(&self) -> f32 {
        let last = self.targets.len().saturating_sub(1) as f32;
        self.at_sec + self.stagger_sec * last + self.duration_sec
    }
}

pub struct IntroSequence {
    timeline: Timeline,
    total: Duration,
    started: Option<Duration>,
}

impl IntroSequence {
    pub fn new(rows: &[IntroRow]) -> Result<Self, StageError> {
        let total = rows.iter().map(IntroRow::end_sec).fold(0.0f32, f32::max);
        let mut keyframes = Vec::new();
        if total > 0.0 {
            for row in rows {
                for (i, &target) in row.targets.iter().enumerate() {
                    let start = row.at_sec + row.stagger_sec * i as f32;
                    keyframes.push(Keyframe {
                        target,
                        property: row.property,
                        start: start / total,
                        end: ((start + row.duration_sec) / total).min(1.0),
                        from: row.from,
                        to: row.to,
                        ease: Ease::Power2Out,
                    });
                }
            }
        }
        Ok(Self {
            timeline: Timeline::new(keyframes)?,
            total: Duration::from_secs_f32(total.max(0.0)),
            started: None,
        })
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn targets(&self) -> Vec<TargetKey> {
        self.timeline.targets()
    }

    pub fn start(&mut self, now: Duration) {
        log::debug!("[stage] intro started ({:.2}s)", self.total.as_secs_f32());
        self.started = Some(now);
    }

    pub fn is_running(&self, now: Duration) -> bool {
        self.started
            .is_some_and(|t0| now.saturating_sub(t0) < self.total)
    }

    /// Styles at `now`, or `None` before start and once finished.
    pub fn sample(&self, now: Duration, viewport: Viewport) -> Option<Frame> {
        let t0 = self.started?;
        let elapsed = now.saturating_sub(t0);
        if elapsed >= self.total || self.total.is_zero() {
            return None;
        }
        let p = elapsed.as_secs_f32() / self.total.as_secs_f32();
        Some(self.timeline.sample(p, viewport))
    }

    /// Final resting styles.
    pub fn end_frame(&self, viewport: Viewport) -> Frame {
        self.timeline.sample(1.0, viewport)
    }
}
