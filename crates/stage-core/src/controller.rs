//! Pinned section controller.
//!
//! One data-driven controller serves every pinned section: it is configured
//! by a [`PinnedBlueprint`] (pin spec plus keyframe table) and turns the
//! sampled scroll offset into a styled [`Frame`] each tick.

use crate::easing::{lerp, Ease};
use crate::error::StageError;
use crate::host::ElementHost;
use crate::pin::{Extent, PinSpec, PinWindow, ScrubbedProgress};
use crate::registry::{PinRegistration, PinRegistry};
use crate::sampler::Viewport;
use crate::style::{Frame, Property, TargetKey};
use crate::timeline::{KeyframeRow, Phase, Timeline};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionState {
    Unpinned,
    Entering,
    Settled,
    Exiting,
}

impl SectionState {
    pub fn resolve(pinned: bool, progress: f32) -> SectionState {
        if !pinned {
            return SectionState::Unpinned;
        }
        match Phase::of(progress) {
            Phase::Entrance => SectionState::Entering,
            Phase::Settle => SectionState::Settled,
            Phase::Exit => SectionState::Exiting,
        }
    }
}

/// Low-amplitude idle loop that runs only while a section is settled.
/// Each target yoyos between `rest` and `low` once per `period_sec`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLoop {
    pub targets: &'static [TargetKey],
    pub property: Property,
    pub rest: f32,
    pub low: f32,
    pub period_sec: f32,
    pub stagger_sec: f32,
    pub ease: Ease,
}

impl AmbientLoop {
    pub fn sample(&self, elapsed: Duration) -> Frame {
        let secs = elapsed.as_secs_f32();
        let mut frame = Frame::new();
        for (i, &target) in self.targets.iter().enumerate() {
            let local = (secs - self.stagger_sec * i as f32).max(0.0) / self.period_sec;
            let cycle = local % 2.0;
            let leg = if cycle <= 1.0 { cycle } else { 2.0 - cycle };
            frame.set(
                target,
                self.property,
                lerp(self.rest, self.low, self.ease.apply(leg)),
            );
        }
        frame
    }

    pub fn rest_frame(&self) -> Frame {
        let mut frame = Frame::new();
        for &target in self.targets {
            frame.set(target, self.property, self.rest);
        }
        frame
    }
}

/// Declarative description of one pinned section.
#[derive(Clone, Copy, Debug)]
pub struct PinnedBlueprint {
    pub name: &'static str,
    /// Element that gets pinned.
    pub section: TargetKey,
    pub trigger: &'static str,
    pub extent: Extent,
    pub scrub_lag: f32,
    pub rows: &'static [KeyframeRow],
    pub ambient: Option<AmbientLoop>,
}

pub struct PinnedController {
    name: &'static str,
    section: TargetKey,
    spec: PinSpec,
    timeline: Timeline,
    ambient: Option<AmbientLoop>,
    window: PinWindow,
    scrub: ScrubbedProgress,
    state: SectionState,
    ambient_since: Option<Duration>,
    // Dropping the controller releases its slot.
    registration: PinRegistration,
}

impl PinnedController {
    /// Validate the blueprint, resolve geometry and register the pin window.
    ///
    /// `Ok(None)` when any element is not mounted yet: the section simply
    /// stays static.
    pub fn setup(
        blueprint: &PinnedBlueprint,
        host: &dyn ElementHost,
        viewport: Viewport,
        registry: &PinRegistry,
    ) -> Result<Option<Self>, StageError> {
        let spec = PinSpec::new(blueprint.trigger, blueprint.extent, blueprint.scrub_lag)?;
        let timeline = Timeline::phased(blueprint.rows)?;

        let Some(geometry) = host.geometry(blueprint.section) else {
            log::debug!("[stage] {} not mounted; skipping", blueprint.name);
            return Ok(None);
        };
        let ambient_targets = blueprint.ambient.iter().flat_map(|a| a.targets.iter().copied());
        if let Some(missing) = timeline
            .targets()
            .into_iter()
            .chain(ambient_targets)
            .find(|t| !host.is_resolved(*t))
        {
            log::debug!(
                "[stage] {} is missing #{}; skipping",
                blueprint.name,
                missing
            );
            return Ok(None);
        }

        let window = spec.window(geometry, viewport);
        let registration = registry.register(blueprint.name, window);
        Ok(Some(Self {
            name: blueprint.name,
            section: blueprint.section,
            spec,
            timeline,
            ambient: blueprint.ambient,
            window,
            scrub: ScrubbedProgress::default(),
            state: SectionState::Unpinned,
            ambient_since: None,
            registration,
        }))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn window(&self) -> PinWindow {
        self.window
    }

    pub fn state(&self) -> SectionState {
        self.state
    }

    pub fn progress(&self) -> f32 {
        self.scrub.value()
    }

    pub fn is_ambient_running(&self) -> bool {
        self.ambient_since.is_some()
    }

    /// Re-resolve the pin window after a resize or reflow.
    pub fn relayout(&mut self, host: &dyn ElementHost, viewport: Viewport) {
        if let Some(geometry) = host.geometry(self.section) {
            self.window = self.spec.window(geometry, viewport);
            self.registration.update(self.window);
        }
    }

    pub fn tick(&mut self, offset_px: f64, dt: Duration, now: Duration, viewport: Viewport) -> Frame {
        let raw = self.window.progress(offset_px);
        let progress = self.scrub.step(raw, dt, self.spec.scrub_lag);
        let next = SectionState::resolve(self.window.contains(offset_px), progress);
        if next != self.state {
            self.transition(next, now);
        }

        let mut frame = self.timeline.sample(progress, viewport);
        frame.set(
            self.section,
            Property::Y,
            self.window.pin_offset(offset_px) as f32,
        );
        if let Some(ambient) = &self.ambient {
            match self.ambient_since {
                Some(since) => frame.merge(ambient.sample(now.saturating_sub(since))),
                None => frame.merge(ambient.rest_frame()),
            }
        }
        frame
    }

    fn transition(&mut self, next: SectionState, now: Duration) {
        log::debug!("[stage] {} {:?} -> {:?}", self.name, self.state, next);
        if self.ambient.is_some() {
            if next == SectionState::Settled {
                self.ambient_since = Some(now);
            } else if self.state == SectionState::Settled {
                self.ambient_since = None;
            }
        }
        self.state = next;
    }

    /// Tear down: stop the ambient loop and release the pin registration.
    /// Returns every element whose inline style the host should clear.
    pub fn release(self) -> Vec<TargetKey> {
        let mut targets = self.timeline.targets();
        targets.push(self.section);
        if let Some(ambient) = &self.ambient {
            targets.extend(ambient.targets.iter().copied());
        }
        log::debug!("[stage] {} released", self.name);
        targets
    }
}
