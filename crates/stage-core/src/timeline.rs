//! Keyframed timelines sampled by progress rather than wall-clock time.
//!
//! A pinned section declares its animation as a table of [`KeyframeRow`]s,
//! each tied to the entrance or exit phase. [`Timeline::sample`] is a pure
//! function of progress, so scrolling backward replays the same values.

use crate::constants::{ENTRANCE_END, EXIT_START};
use crate::easing::{lerp, Ease};
use crate::error::StageError;
use crate::sampler::Viewport;
use crate::style::{Frame, Property, TargetKey, Value};
use fnv::FnvHashMap;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// `[0, 0.3)`: elements travel in.
    Entrance,
    /// `[0.3, 0.7)`: resting state is held.
    Settle,
    /// `[0.7, 1.0]`: elements travel out.
    Exit,
}

impl Phase {
    pub fn of(progress: f32) -> Phase {
        if progress < ENTRANCE_END {
            Phase::Entrance
        } else if progress < EXIT_START {
            Phase::Settle
        } else {
            Phase::Exit
        }
    }

    pub fn bounds(self) -> (f32, f32) {
        match self {
            Phase::Entrance => (0.0, ENTRANCE_END),
            Phase::Settle => (ENTRANCE_END, EXIT_START),
            Phase::Exit => (EXIT_START, 1.0),
        }
    }
}

/// One tween of one property of one element over `[start, end]` progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    pub target: TargetKey,
    pub property: Property,
    pub start: f32,
    pub end: f32,
    pub from: Value,
    pub to: Value,
    pub ease: Ease,
}

impl Keyframe {
    fn value_at(&self, progress: f32, viewport: Viewport) -> f32 {
        let local = (progress - self.start) / (self.end - self.start);
        lerp(
            self.from.resolve(viewport),
            self.to.resolve(viewport),
            self.ease.apply(local),
        )
    }
}

/// Declarative table row: a property tween for one or more sibling targets,
/// starting at `at` and running to the end of its phase. Siblings start
/// `stagger` apart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyframeRow {
    pub phase: Phase,
    pub targets: &'static [TargetKey],
    pub at: f32,
    pub stagger: f32,
    pub property: Property,
    pub from: Value,
    pub to: Value,
    pub ease: Ease,
}

impl KeyframeRow {
    pub const fn enter(
        targets: &'static [TargetKey],
        at: f32,
        property: Property,
        from: Value,
        to: Value,
    ) -> Self {
        Self {
            phase: Phase::Entrance,
            targets,
            at,
            stagger: 0.0,
            property,
            from,
            to,
            ease: Ease::Linear,
        }
    }

    pub const fn exit(
        targets: &'static [TargetKey],
        at: f32,
        property: Property,
        from: Value,
        to: Value,
    ) -> Self {
        Self {
            phase: Phase::Exit,
            targets,
            at,
            stagger: 0.0,
            property,
            from,
            to,
            ease: Ease::Power2In,
        }
    }

    pub const fn stagger(self, stagger: f32) -> Self {
        Self { stagger, ..self }
    }

    fn keyframes(&self) -> Result<SmallVec<[Keyframe; 4]>, StageError> {
        let (phase_start, phase_end) = self.phase.bounds();
        let mut out = SmallVec::new();
        for (i, &target) in self.targets.iter().enumerate() {
            let property = self.property.name();
            if self.phase == Phase::Settle {
                return Err(StageError::KeyedSettle { target, property });
            }
            let start = self.at + self.stagger * i as f32;
            if !(phase_start..phase_end).contains(&start) {
                return Err(StageError::OutsidePhase {
                    target,
                    property,
                    start,
                });
            }
            out.push(Keyframe {
                target,
                property: self.property,
                start,
                end: phase_end,
                from: self.from,
                to: self.to,
                ease: self.ease,
            });
        }
        Ok(out)
    }
}

#[derive(Clone, Debug)]
struct Track {
    target: TargetKey,
    property: Property,
    keyframes: SmallVec<[Keyframe; 2]>,
}

impl Track {
    /// Before the first keyframe the track shows its first `from`; between
    /// keyframes it holds the last `to`.
    fn value_at(&self, progress: f32, viewport: Viewport) -> f32 {
        let mut value = self.keyframes[0].from.resolve(viewport);
        for kf in &self.keyframes {
            if progress < kf.start {
                break;
            }
            if progress >= kf.end {
                value = kf.to.resolve(viewport);
            } else {
                return kf.value_at(progress, viewport);
            }
        }
        value
    }
}

#[derive(Clone, Debug, Default)]
pub struct Timeline {
    tracks: Vec<Track>,
}

impl Timeline {
    /// Build from raw keyframes spanning `[0, 1]`.
    pub fn new(keyframes: impl IntoIterator<Item = Keyframe>) -> Result<Self, StageError> {
        let mut grouped: FnvHashMap<(TargetKey, Property), SmallVec<[Keyframe; 2]>> =
            FnvHashMap::default();
        for kf in keyframes {
            let (target, property) = (kf.target, kf.property.name());
            if !(kf.end > kf.start) {
                return Err(StageError::EmptySpan { target, property });
            }
            if kf.start < 0.0 || kf.end > 1.0 {
                return Err(StageError::OutsidePhase {
                    target,
                    property,
                    start: kf.start,
                });
            }
            grouped
                .entry((kf.target, kf.property))
                .or_default()
                .push(kf);
        }

        let mut tracks = Vec::with_capacity(grouped.len());
        for ((target, property), mut keyframes) in grouped {
            keyframes.sort_by(|a, b| a.start.total_cmp(&b.start));
            if keyframes.windows(2).any(|w| w[1].start < w[0].end) {
                return Err(StageError::OverlappingKeyframes {
                    target,
                    property: property.name(),
                });
            }
            tracks.push(Track {
                target,
                property,
                keyframes,
            });
        }
        tracks.sort_by(|a, b| (a.target, a.property).cmp(&(b.target, b.property)));
        Ok(Self { tracks })
    }

    /// Build from a phased table (entrance and exit rows only).
    pub fn phased(rows: &[KeyframeRow]) -> Result<Self, StageError> {
        let mut keyframes = Vec::new();
        for row in rows {
            keyframes.extend(row.keyframes()?);
        }
        Self::new(keyframes)
    }

    pub fn sample(&self, progress: f32, viewport: Viewport) -> Frame {
        let progress = progress.clamp(0.0, 1.0);
        let mut frame = Frame::new();
        for track in &self.tracks {
            frame.set(track.target, track.property, track.value_at(progress, viewport));
        }
        frame
    }

    /// Every target this timeline animates, deduplicated, in sorted order.
    pub fn targets(&self) -> Vec<TargetKey> {
        let mut targets: Vec<TargetKey> = self.tracks.iter().map(|t| t.target).collect();
        targets.dedup();
        targets
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Property::*;

    const VP: Viewport = Viewport {
        width: 1000.0,
        height: 800.0,
    };

    fn rows() -> Vec<KeyframeRow> {
        vec![
            KeyframeRow::enter(&["photo"], 0.0, X, Value::Vw(60.0), Value::Px(0.0)),
            KeyframeRow::enter(&["photo"], 0.0, Opacity, Value::Unit(0.0), Value::Unit(1.0)),
            KeyframeRow::enter(&["h0", "h1"], 0.08, X, Value::Vw(-40.0), Value::Px(0.0))
                .stagger(0.02),
            KeyframeRow::exit(&["photo"], 0.7, X, Value::Px(0.0), Value::Vw(18.0)),
            KeyframeRow::exit(&["photo"], 0.72, Opacity, Value::Unit(1.0), Value::Unit(0.0)),
        ]
    }

    #[test]
    fn phase_of_progress() {
        assert_eq!(Phase::of(0.0), Phase::Entrance);
        assert_eq!(Phase::of(0.2999), Phase::Entrance);
        assert_eq!(Phase::of(0.3), Phase::Settle);
        assert_eq!(Phase::of(0.6999), Phase::Settle);
        assert_eq!(Phase::of(0.7), Phase::Exit);
        assert_eq!(Phase::of(1.0), Phase::Exit);
    }

    #[test]
    fn entrance_runs_from_offscreen_to_rest() {
        let tl = Timeline::phased(&rows()).unwrap();
        let start = tl.sample(0.0, VP);
        assert_eq!(start.get("photo").unwrap().translate.x, 600.0);
        assert_eq!(start.get("photo").unwrap().opacity, 0.0);
        let mid = tl.sample(0.15, VP);
        assert!((mid.get("photo").unwrap().translate.x - 300.0).abs() < 1e-3);
        let rest = tl.sample(0.5, VP);
        assert_eq!(rest.get("photo").unwrap().translate.x, 0.0);
        assert_eq!(rest.get("photo").unwrap().opacity, 1.0);
        assert_eq!(rest.get("h1").unwrap().translate.x, 0.0);
    }

    #[test]
    fn staggered_siblings_start_apart() {
        let tl = Timeline::phased(&rows()).unwrap();
        let f = tl.sample(0.09, VP);
        let h0 = f.get("h0").unwrap().translate.x;
        let h1 = f.get("h1").unwrap().translate.x;
        assert!(h0 > -400.0, "h0 should have started moving");
        assert_eq!(h1, -400.0, "h1 waits for its stagger");
    }

    #[test]
    fn exit_accelerates_and_offsets_by_property() {
        let tl = Timeline::phased(&rows()).unwrap();
        let f = tl.sample(0.71, VP);
        let photo = f.get("photo").unwrap();
        assert!(photo.translate.x > 0.0);
        assert_eq!(photo.opacity, 1.0, "opacity exit starts at 0.72");
        let halfway = tl.sample(0.85, VP).get("photo").unwrap().translate.x;
        assert!(halfway < 90.0, "power2-in stays below linear midpoint");
        let end = tl.sample(1.0, VP);
        assert!((end.get("photo").unwrap().translate.x - 180.0).abs() < 1e-3);
        assert_eq!(end.get("photo").unwrap().opacity, 0.0);
    }

    #[test]
    fn sampling_is_a_pure_function_of_progress() {
        let tl = Timeline::phased(&rows()).unwrap();
        let initial = tl.sample(0.0, VP);
        for p in [0.1, 0.4, 0.8, 1.0, 0.55, 0.2] {
            let _ = tl.sample(p, VP);
        }
        assert_eq!(tl.sample(0.0, VP), initial);
    }

    #[test]
    fn settle_rows_are_rejected() {
        let row = KeyframeRow {
            phase: Phase::Settle,
            ..KeyframeRow::enter(&["dot"], 0.4, Scale, Value::Unit(0.0), Value::Unit(1.0))
        };
        assert!(matches!(
            Timeline::phased(&[row]),
            Err(StageError::KeyedSettle { .. })
        ));
    }

    #[test]
    fn start_outside_phase_is_rejected() {
        let late = KeyframeRow::enter(&["dot"], 0.35, Scale, Value::Unit(0.0), Value::Unit(1.0));
        assert!(matches!(
            Timeline::phased(&[late]),
            Err(StageError::OutsidePhase { .. })
        ));
        let staggered_out =
            KeyframeRow::enter(&["a", "b", "c"], 0.2, Y, Value::Px(20.0), Value::Px(0.0))
                .stagger(0.06);
        assert!(Timeline::phased(&[staggered_out]).is_err());
    }

    #[test]
    fn overlapping_rows_for_one_track_are_rejected() {
        let a = KeyframeRow::enter(&["badge"], 0.05, Y, Value::Px(20.0), Value::Px(0.0));
        let b = KeyframeRow::enter(&["badge"], 0.1, Y, Value::Px(10.0), Value::Px(0.0));
        assert!(matches!(
            Timeline::phased(&[a, b]),
            Err(StageError::OverlappingKeyframes { .. })
        ));
    }

    #[test]
    fn raw_keyframes_need_a_span() {
        let kf = Keyframe {
            target: "img",
            property: Y,
            start: 0.5,
            end: 0.5,
            from: Value::Px(0.0),
            to: Value::Px(1.0),
            ease: Ease::Linear,
        };
        assert!(matches!(Timeline::new([kf]), Err(StageError::EmptySpan { .. })));
    }

    #[test]
    fn targets_are_deduplicated() {
        let tl = Timeline::phased(&rows()).unwrap();
        assert_eq!(tl.targets(), vec!["h0", "h1", "photo"]);
    }
}
