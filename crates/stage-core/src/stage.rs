//! Page-level orchestrator.
//!
//! The stage owns every controller, the pin registry and the snap
//! coordinator. The frontend feeds it sampled scroll metrics once per frame
//! and applies the returned [`StageOutput`].

use crate::catalog::Catalog;
use crate::config::MotionConfig;
use crate::controller::PinnedController;
use crate::counter::MetricCounter;
use crate::host::ElementHost;
use crate::intro::IntroSequence;
use crate::parallax::ParallaxTrack;
use crate::pin::{find_overlaps, PinWindow};
use crate::registry::PinRegistry;
use crate::reveal::FlowingReveal;
use crate::sampler::{ScrollMetrics, Viewport};
use crate::snap::SnapCoordinator;
use crate::style::{Frame, TargetKey};
use std::time::Duration;

/// Everything the frontend should apply after one tick.
#[derive(Debug, Default)]
pub struct StageOutput {
    pub styles: Frame,
    pub texts: Vec<(TargetKey, String)>,
    pub scroll_to: Option<f64>,
}

pub struct Stage {
    config: MotionConfig,
    viewport: Viewport,
    registry: PinRegistry,
    pinned: Vec<PinnedController>,
    reveals: Vec<FlowingReveal>,
    parallax: Vec<ParallaxTrack>,
    counters: Vec<MetricCounter>,
    intro: Option<IntroSequence>,
    snap: SnapCoordinator,
    last_tick: Option<Duration>,
    stale_reported: bool,
    // Overlapping pin windows as last reported, by section name.
    overlaps: Vec<(&'static str, &'static str)>,
}

impl Stage {
    pub fn new(config: MotionConfig, viewport: Viewport) -> Self {
        Self {
            config,
            viewport,
            registry: PinRegistry::new(),
            pinned: Vec::new(),
            reveals: Vec::new(),
            parallax: Vec::new(),
            counters: Vec::new(),
            intro: None,
            snap: SnapCoordinator::new(),
            last_tick: None,
            stale_reported: false,
            overlaps: Vec::new(),
        }
    }

    pub fn config(&self) -> MotionConfig {
        self.config
    }

    pub fn registry(&self) -> &PinRegistry {
        &self.registry
    }

    pub fn snap(&self) -> &SnapCoordinator {
        &self.snap
    }

    pub fn pinned(&self) -> &[PinnedController] {
        &self.pinned
    }

    /// Pairs of pinned sections whose windows currently overlap.
    pub fn overlaps(&self) -> &[(&'static str, &'static str)] {
        &self.overlaps
    }

    /// Set up every controller the catalog names. Sections whose elements
    /// are missing or whose tables are invalid are skipped.
    pub fn mount(&mut self, catalog: &Catalog, host: &dyn ElementHost, now: Duration) {
        let vp = self.viewport;

        if !catalog.intro.is_empty() {
            match IntroSequence::new(catalog.intro) {
                Ok(intro) if intro.targets().iter().all(|t| host.is_resolved(*t)) => {
                    let mut intro = intro;
                    intro.start(now);
                    self.intro = Some(intro);
                }
                Ok(_) => log::debug!("[stage] intro targets missing; skipping"),
                Err(e) => log::warn!("[stage] intro rejected: {e}"),
            }
        }

        if !self.config.scroll_animations {
            log::info!("[stage] scroll animations disabled");
            return;
        }

        for bp in &catalog.pinned {
            match PinnedController::setup(bp, host, vp, &self.registry) {
                Ok(Some(c)) => self.pinned.push(c),
                Ok(None) => {}
                Err(e) => log::warn!("[stage] {} rejected: {e}", bp.name),
            }
        }
        self.report_overlaps();

        for bp in &catalog.reveals {
            match FlowingReveal::setup(bp, host, vp) {
                Ok(Some(r)) => self.reveals.push(r),
                Ok(None) => {}
                Err(e) => log::warn!("[reveal] #{} rejected: {e}", bp.target),
            }
        }
        for bp in &catalog.parallax {
            match ParallaxTrack::setup(bp, host, vp) {
                Ok(Some(p)) => self.parallax.push(p),
                Ok(None) => {}
                Err(e) => log::warn!("[reveal] parallax #{} rejected: {e}", bp.target),
            }
        }
        for bp in &catalog.counters {
            match MetricCounter::setup(bp, host, vp) {
                Ok(Some(c)) => self.counters.push(c),
                Ok(None) => {}
                Err(e) => log::warn!("[reveal] counter #{} rejected: {e}", bp.target),
            }
        }

        log::info!(
            "[stage] mounted {} pinned, {} reveals, {} parallax, {} counters",
            self.pinned.len(),
            self.reveals.len(),
            self.parallax.len(),
            self.counters.len()
        );
    }

    /// Warns about overlapping pin windows when the set differs from the
    /// last report. Returns whether anything was logged.
    fn report_overlaps(&mut self) -> bool {
        let entries = self.registry.windows();
        let windows: Vec<PinWindow> = entries.iter().map(|(_, w)| *w).collect();
        let found = find_overlaps(&windows);
        let names: Vec<_> = found.iter().map(|&(a, b)| (entries[a].0, entries[b].0)).collect();
        if names == self.overlaps {
            return false;
        }
        self.overlaps = names;
        if self.overlaps.is_empty() {
            log::info!("[pin] pin windows no longer overlap");
            return true;
        }
        for (a, b) in found {
            log::warn!(
                "[pin] {} and {} overlap ({:.0}..{:.0}px vs {:.0}..{:.0}px)",
                entries[a].0,
                entries[b].0,
                windows[a].start_px,
                windows[a].end_px(),
                windows[b].start_px,
                windows[b].end_px()
            );
        }
        true
    }

    /// Re-resolve geometry after a resize or reflow. The snap registry is
    /// left as built.
    pub fn relayout(&mut self, host: &dyn ElementHost, viewport: Viewport) {
        self.viewport = viewport;
        for c in &mut self.pinned {
            c.relayout(host, viewport);
        }
        for r in &mut self.reveals {
            r.relayout(host, viewport);
        }
        for p in &mut self.parallax {
            p.relayout(host, viewport);
        }
        for c in &mut self.counters {
            c.relayout(host, viewport);
        }
        self.report_overlaps();
    }

    /// Build the snap registry from the windows registered so far.
    pub fn install_snap(&mut self, metrics: ScrollMetrics) -> bool {
        if !self.config.scroll_animations {
            return false;
        }
        let windows: Vec<PinWindow> = self.registry.windows().into_iter().map(|(_, w)| w).collect();
        self.snap.install(&windows, metrics)
    }

    pub fn note_scroll(&mut self, now: Duration) {
        self.snap.note_scroll(now);
    }

    /// Wheel or touch input from the user.
    pub fn note_user_input(&mut self) {
        self.snap.cancel();
    }

    pub fn tick(&mut self, metrics: ScrollMetrics, now: Duration) -> StageOutput {
        let dt = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last_tick = Some(now);
        let vp = self.viewport;
        let offset = metrics.offset_px;
        let mut out = StageOutput::default();

        let mut intro_frame = None;
        if let Some(intro) = self.intro.take() {
            match intro.sample(now, vp) {
                Some(frame) => {
                    intro_frame = Some(frame);
                    self.intro = Some(intro);
                }
                None => {
                    out.styles.merge(intro.end_frame(vp));
                    log::debug!("[stage] intro finished");
                }
            }
        }

        for c in &mut self.pinned {
            out.styles.merge(c.tick(offset, dt, now, vp));
        }
        for r in &mut self.reveals {
            if let Some(frame) = r.tick(offset, dt, vp) {
                out.styles.merge(frame);
            }
        }
        for p in &mut self.parallax {
            if let Some(frame) = p.tick(offset, dt) {
                out.styles.merge(frame);
            }
        }
        for c in &mut self.counters {
            if let Some(text) = c.tick(offset, dt) {
                out.texts.push((c.target(), text));
            }
        }
        if let Some(frame) = intro_frame {
            out.styles.merge(frame);
        }

        if self.snap.is_installed() {
            if !self.stale_reported
                && (metrics.max_offset_px - self.snap.built_for_max_px()).abs() >= 1.0
            {
                log::debug!(
                    "[snap] registry built for {:.0}px, page now {:.0}px",
                    self.snap.built_for_max_px(),
                    metrics.max_offset_px
                );
                self.stale_reported = true;
            }
            out.scroll_to = self.snap.poll(metrics, now);
        }
        out
    }

    /// Tear everything down. Returns the elements whose inline styles the
    /// frontend should clear.
    pub fn unmount(&mut self) -> Vec<TargetKey> {
        let mut targets: Vec<TargetKey> = Vec::new();
        for c in self.pinned.drain(..) {
            targets.extend(c.release());
        }
        targets.extend(self.reveals.drain(..).map(|r| r.target()));
        targets.extend(self.parallax.drain(..).map(|p| p.target()));
        if let Some(intro) = self.intro.take() {
            targets.extend(intro.targets());
        }
        self.counters.clear();
        self.snap.cancel();
        targets.sort_unstable();
        targets.dedup();
        log::info!("[stage] unmounted ({} elements)", targets.len());
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PINNED;
    use crate::sampler::SectionGeometry;
    use fnv::FnvHashMap;

    const VP: Viewport = Viewport {
        width: 1000.0,
        height: 1000.0,
    };

    /// Every element exists; sections stack at their declared tops.
    struct Page {
        sections: FnvHashMap<TargetKey, SectionGeometry>,
    }

    impl ElementHost for Page {
        fn geometry(&self, key: TargetKey) -> Option<SectionGeometry> {
            Some(self.sections.get(key).copied().unwrap_or(SectionGeometry {
                top_px: 50_000.0,
                height_px: 100.0,
            }))
        }
    }

    fn page(tops: &[(TargetKey, f64)]) -> Page {
        Page {
            sections: tops
                .iter()
                .map(|&(k, top)| {
                    (
                        k,
                        SectionGeometry {
                            top_px: top,
                            height_px: 1000.0,
                        },
                    )
                })
                .collect(),
        }
    }

    fn pinned_only() -> Catalog {
        Catalog {
            pinned: PINNED[1..3].to_vec(),
            ..Catalog::empty()
        }
    }

    #[test]
    fn disabled_flag_mounts_only_the_intro() {
        let config = MotionConfig {
            scroll_animations: false,
        };
        let mut stage = Stage::new(config, VP);
        stage.mount(&Catalog::site(), &page(&[]), Duration::ZERO);
        assert!(stage.pinned().is_empty());
        assert!(stage.registry().is_empty());
        assert!(!stage.install_snap(ScrollMetrics::new(0.0, 10_000.0)));

        let out = stage.tick(ScrollMetrics::new(0.0, 10_000.0), Duration::ZERO);
        let photo = out.styles.get("hero-photo").unwrap();
        assert_eq!(photo.translate.x, -600.0);
        assert_eq!(out.scroll_to, None);
    }

    #[test]
    fn intro_settles_to_rest_state() {
        let config = MotionConfig {
            scroll_animations: false,
        };
        let mut stage = Stage::new(config, VP);
        stage.mount(&Catalog::site(), &page(&[]), Duration::ZERO);
        stage.tick(ScrollMetrics::new(0.0, 1.0), Duration::ZERO);
        let out = stage.tick(ScrollMetrics::new(0.0, 1.0), Duration::from_secs(5));
        let photo = out.styles.get("hero-photo").unwrap();
        assert_eq!((photo.translate.x, photo.opacity), (0.0, 1.0));
        let out = stage.tick(ScrollMetrics::new(0.0, 1.0), Duration::from_secs(6));
        assert!(out.styles.get("hero-photo").is_none());
    }

    #[test]
    fn mounting_registers_pins_and_unmount_releases() {
        let mut stage = Stage::new(MotionConfig::default(), VP);
        let host = page(&[("agents", 1000.0), ("workflows", 3300.0)]);
        stage.mount(&pinned_only(), &host, Duration::ZERO);
        assert_eq!(stage.registry().len(), 2);

        let targets = stage.unmount();
        assert!(stage.registry().is_empty());
        assert!(targets.contains(&"agents"));
        assert!(targets.contains(&"workflows-photo"));
    }

    #[test]
    fn snap_installs_once_and_pulls_toward_center() {
        let mut stage = Stage::new(MotionConfig::default(), VP);
        let host = page(&[("agents", 1000.0), ("workflows", 3300.0)]);
        stage.mount(&pinned_only(), &host, Duration::ZERO);
        let metrics = ScrollMetrics::new(0.0, 10_000.0);
        assert!(stage.install_snap(metrics));
        let ranges = stage.snap().registry().unwrap().ranges().len();
        assert_eq!(ranges, 2);

        // Agents pins over 1000..2300px, center 1650px (0.165).
        let mut offset = 1100.0;
        stage.note_scroll(Duration::from_secs(1));
        let near = ScrollMetrics::new(offset, 10_000.0);
        assert_eq!(stage.tick(near, Duration::from_secs(1)).scroll_to, None);
        for ms in (1200..3000).step_by(16) {
            let metrics = ScrollMetrics::new(offset, 10_000.0);
            if let Some(y) = stage.tick(metrics, Duration::from_millis(ms)).scroll_to {
                offset = y;
            }
        }
        assert!((offset - 1650.0).abs() < 1e-6, "{offset}");
    }

    #[test]
    fn user_input_cancels_snap() {
        let mut stage = Stage::new(MotionConfig::default(), VP);
        let host = page(&[("agents", 1000.0), ("workflows", 3300.0)]);
        stage.mount(&pinned_only(), &host, Duration::ZERO);
        let metrics = ScrollMetrics::new(1100.0, 10_000.0);
        stage.install_snap(metrics);
        stage.note_scroll(Duration::ZERO);
        assert!(stage.tick(metrics, Duration::from_millis(500)).scroll_to.is_some());
        stage.note_user_input();
        assert!(!stage.snap().is_animating());
    }

    #[test]
    fn overlapping_pins_still_mount() {
        let mut stage = Stage::new(MotionConfig::default(), VP);
        let host = page(&[("agents", 1000.0), ("workflows", 1500.0)]);
        stage.mount(&pinned_only(), &host, Duration::ZERO);
        assert_eq!(stage.pinned().len(), 2);
        assert_eq!(stage.overlaps(), &[("agents", "workflows")]);
    }

    #[test]
    fn repeated_resizes_report_an_overlap_once() {
        let mut stage = Stage::new(MotionConfig::default(), VP);
        let bad = page(&[("agents", 1000.0), ("workflows", 1500.0)]);
        stage.mount(&pinned_only(), &bad, Duration::ZERO);
        for _ in 0..5 {
            stage.relayout(&bad, VP);
        }
        assert!(!stage.report_overlaps(), "same overlap is not re-logged");

        let good = page(&[("agents", 1000.0), ("workflows", 3300.0)]);
        stage.relayout(&good, VP);
        assert!(stage.overlaps().is_empty());
        stage.relayout(&bad, VP);
        assert_eq!(stage.overlaps().len(), 1);
        assert!(!stage.report_overlaps());
    }

    #[test]
    fn relayout_moves_pins_but_keeps_snap_registry() {
        let mut stage = Stage::new(MotionConfig::default(), VP);
        let host = page(&[("agents", 1000.0), ("workflows", 3300.0)]);
        stage.mount(&pinned_only(), &host, Duration::ZERO);
        assert!(stage.install_snap(ScrollMetrics::new(0.0, 10_000.0)));
        let ranges = stage.snap().registry().unwrap().clone();

        let narrow = Viewport {
            width: 600.0,
            height: 800.0,
        };
        let moved = page(&[("agents", 1400.0), ("workflows", 3800.0)]);
        stage.relayout(&moved, narrow);

        let agents = stage.pinned()[0].window();
        assert_eq!(agents.start_px, 1400.0);
        assert!((agents.extent_px - 1040.0).abs() < 1e-9);
        let registered: Vec<f64> = stage
            .registry()
            .windows()
            .iter()
            .map(|(_, w)| w.start_px)
            .collect();
        assert_eq!(registered, vec![1400.0, 3800.0]);

        assert!(stage.install_snap(ScrollMetrics::new(0.0, 12_000.0)));
        assert_eq!(stage.snap().registry(), Some(&ranges));
        assert_eq!(stage.snap().built_for_max_px(), 10_000.0);
    }
}
