//! Choreography tables for the site.
//!
//! Every target is an element id. Pinned sections follow the same shape:
//! photo panel, hairline, badge, headline lines, body copy and an accent
//! dot, entering during the first phase and leaving during the last.

use crate::constants::{
    AMBIENT_LOW_SCALE, AMBIENT_PERIOD_SEC, AMBIENT_STAGGER_SEC, REVEAL_CARD_DURATION_SEC,
    REVEAL_DURATION_SEC,
};
use crate::controller::{AmbientLoop, PinnedBlueprint};
use crate::counter::CounterBlueprint;
use crate::easing::Ease;
use crate::intro::IntroRow;
use crate::parallax::ParallaxBlueprint;
use crate::pin::Extent;
use crate::reveal::{rise, RevealBlueprint, RevealTrack};
use crate::style::Property::{Opacity, Scale, ScaleY, X, Y};
use crate::style::TargetKey;
use crate::style::Value::{Px, Unit, Vh, Vw};
use crate::timeline::KeyframeRow;

const PIN_TRIGGER: &str = "top top";
const PIN_SCRUB: f32 = 0.6;
const HEADLINE_STAGGER: f32 = 0.02;

const fn show(targets: &'static [TargetKey], at: f32) -> KeyframeRow {
    KeyframeRow::enter(targets, at, Opacity, Unit(0.0), Unit(1.0))
}

const fn hide(targets: &'static [TargetKey], at: f32) -> KeyframeRow {
    KeyframeRow::exit(targets, at, Opacity, Unit(1.0), Unit(0.0))
}

// Hero

const HERO_PHOTO: &[TargetKey] = &["hero-photo"];
const HERO_HAIRLINE: &[TargetKey] = &["hero-hairline"];
const HERO_BADGE: &[TargetKey] = &["hero-badge"];
const HERO_HEADLINES: &[TargetKey] = &["hero-headline-0", "hero-headline-1", "hero-headline-2"];
const HERO_SUBHEAD: &[TargetKey] = &["hero-subhead"];
const HERO_CTA: &[TargetKey] = &["hero-cta"];
const HERO_DOT: &[TargetKey] = &["hero-dot"];

/// Hero is already visible from the intro, so it only has an exit.
const HERO_ROWS: &[KeyframeRow] = &[
    KeyframeRow::exit(HERO_HEADLINES, 0.7, X, Px(0.0), Vw(18.0)),
    hide(HERO_HEADLINES, 0.7),
    KeyframeRow::exit(HERO_SUBHEAD, 0.72, X, Px(0.0), Vw(14.0)),
    hide(HERO_SUBHEAD, 0.72),
    KeyframeRow::exit(HERO_CTA, 0.74, X, Px(0.0), Vw(12.0)),
    hide(HERO_CTA, 0.74),
    KeyframeRow::exit(HERO_BADGE, 0.7, X, Px(0.0), Vw(10.0)),
    hide(HERO_BADGE, 0.7),
    KeyframeRow::exit(HERO_PHOTO, 0.7, X, Px(0.0), Vw(-18.0)),
    hide(HERO_PHOTO, 0.7),
    KeyframeRow::exit(HERO_HAIRLINE, 0.75, ScaleY, Unit(1.0), Unit(0.0)),
    hide(HERO_HAIRLINE, 0.75),
    KeyframeRow::exit(HERO_DOT, 0.8, Scale, Unit(1.0), Unit(0.0)),
    hide(HERO_DOT, 0.8),
];

const HERO_INTRO: &[IntroRow] = &[
    IntroRow::new(HERO_PHOTO, 0.0, 1.0, X, Vw(-60.0), Px(0.0)),
    IntroRow::new(HERO_PHOTO, 0.0, 1.0, Opacity, Unit(0.0), Unit(1.0)),
    IntroRow::new(HERO_HAIRLINE, 0.2, 0.8, ScaleY, Unit(0.0), Unit(1.0)),
    IntroRow::new(HERO_BADGE, 0.3, 0.6, Y, Px(20.0), Px(0.0)),
    IntroRow::new(HERO_BADGE, 0.3, 0.6, Opacity, Unit(0.0), Unit(1.0)),
    IntroRow::new(HERO_HEADLINES, 0.35, 0.7, Y, Px(40.0), Px(0.0)).stagger(0.06),
    IntroRow::new(HERO_HEADLINES, 0.35, 0.7, Opacity, Unit(0.0), Unit(1.0)).stagger(0.06),
    IntroRow::new(HERO_SUBHEAD, 0.5, 0.6, Y, Px(24.0), Px(0.0)),
    IntroRow::new(HERO_SUBHEAD, 0.5, 0.6, Opacity, Unit(0.0), Unit(1.0)),
    IntroRow::new(HERO_CTA, 0.58, 0.6, Y, Px(24.0), Px(0.0)),
    IntroRow::new(HERO_CTA, 0.58, 0.6, Opacity, Unit(0.0), Unit(1.0)),
    IntroRow::new(HERO_DOT, 0.7, 0.4, Scale, Unit(0.0), Unit(1.0)),
    IntroRow::new(HERO_DOT, 0.7, 0.4, Opacity, Unit(0.0), Unit(1.0)),
];

// Agents: photo enters from the right, copy leaves upward.

const AGENTS_PHOTO: &[TargetKey] = &["agents-photo"];
const AGENTS_HAIRLINE: &[TargetKey] = &["agents-hairline"];
const AGENTS_BADGE: &[TargetKey] = &["agents-badge"];
const AGENTS_HEADLINES: &[TargetKey] = &["agents-headline-0", "agents-headline-1"];
const AGENTS_BODY: &[TargetKey] = &["agents-body"];
const AGENTS_DOT: &[TargetKey] = &["agents-dot"];

const AGENTS_ROWS: &[KeyframeRow] = &[
    KeyframeRow::enter(AGENTS_PHOTO, 0.0, X, Vw(60.0), Px(0.0)),
    show(AGENTS_PHOTO, 0.0),
    KeyframeRow::enter(AGENTS_HAIRLINE, 0.05, ScaleY, Unit(0.0), Unit(1.0)),
    KeyframeRow::enter(AGENTS_BADGE, 0.08, Y, Px(20.0), Px(0.0)),
    show(AGENTS_BADGE, 0.08),
    KeyframeRow::enter(AGENTS_HEADLINES, 0.08, X, Vw(-40.0), Px(0.0)).stagger(HEADLINE_STAGGER),
    show(AGENTS_HEADLINES, 0.08).stagger(HEADLINE_STAGGER),
    KeyframeRow::enter(AGENTS_BODY, 0.12, Y, Px(24.0), Px(0.0)),
    show(AGENTS_BODY, 0.12),
    KeyframeRow::enter(AGENTS_DOT, 0.2, Scale, Unit(0.0), Unit(1.0)),
    show(AGENTS_DOT, 0.2),
    KeyframeRow::exit(AGENTS_PHOTO, 0.7, X, Px(0.0), Vw(18.0)),
    hide(AGENTS_PHOTO, 0.7),
    KeyframeRow::exit(AGENTS_HAIRLINE, 0.7, ScaleY, Unit(1.0), Unit(0.0)),
    KeyframeRow::exit(AGENTS_HEADLINES, 0.7, Y, Px(0.0), Vh(-10.0)),
    hide(AGENTS_HEADLINES, 0.7),
    KeyframeRow::exit(AGENTS_BODY, 0.72, Y, Px(0.0), Vh(-6.0)),
    hide(AGENTS_BODY, 0.72),
    KeyframeRow::exit(AGENTS_BADGE, 0.7, Y, Px(0.0), Vh(-4.0)),
    hide(AGENTS_BADGE, 0.7),
    KeyframeRow::exit(AGENTS_DOT, 0.75, Scale, Unit(1.0), Unit(0.0)),
    hide(AGENTS_DOT, 0.75),
];

// Workflows mirrors agents: photo from the left, copy leaves downward.

const WORKFLOWS_PHOTO: &[TargetKey] = &["workflows-photo"];
const WORKFLOWS_HAIRLINE: &[TargetKey] = &["workflows-hairline"];
const WORKFLOWS_BADGE: &[TargetKey] = &["workflows-badge"];
const WORKFLOWS_HEADLINES: &[TargetKey] = &["workflows-headline-0", "workflows-headline-1"];
const WORKFLOWS_BODY: &[TargetKey] = &["workflows-body"];
const WORKFLOWS_DOT: &[TargetKey] = &["workflows-dot"];

const WORKFLOWS_ROWS: &[KeyframeRow] = &[
    KeyframeRow::enter(WORKFLOWS_PHOTO, 0.0, X, Vw(-60.0), Px(0.0)),
    show(WORKFLOWS_PHOTO, 0.0),
    KeyframeRow::enter(WORKFLOWS_HAIRLINE, 0.05, ScaleY, Unit(0.0), Unit(1.0)),
    KeyframeRow::enter(WORKFLOWS_BADGE, 0.08, Y, Px(20.0), Px(0.0)),
    show(WORKFLOWS_BADGE, 0.08),
    KeyframeRow::enter(WORKFLOWS_HEADLINES, 0.08, X, Vw(40.0), Px(0.0)).stagger(HEADLINE_STAGGER),
    show(WORKFLOWS_HEADLINES, 0.08).stagger(HEADLINE_STAGGER),
    KeyframeRow::enter(WORKFLOWS_BODY, 0.12, Y, Px(24.0), Px(0.0)),
    show(WORKFLOWS_BODY, 0.12),
    KeyframeRow::enter(WORKFLOWS_DOT, 0.2, Scale, Unit(0.0), Unit(1.0)),
    show(WORKFLOWS_DOT, 0.2),
    KeyframeRow::exit(WORKFLOWS_PHOTO, 0.7, X, Px(0.0), Vw(-18.0)),
    hide(WORKFLOWS_PHOTO, 0.7),
    KeyframeRow::exit(WORKFLOWS_HAIRLINE, 0.7, ScaleY, Unit(1.0), Unit(0.0)),
    KeyframeRow::exit(WORKFLOWS_HEADLINES, 0.7, Y, Px(0.0), Vh(10.0)),
    hide(WORKFLOWS_HEADLINES, 0.7),
    KeyframeRow::exit(WORKFLOWS_BODY, 0.72, Y, Px(0.0), Vh(6.0)),
    hide(WORKFLOWS_BODY, 0.72),
    KeyframeRow::exit(WORKFLOWS_BADGE, 0.7, Y, Px(0.0), Vh(4.0)),
    hide(WORKFLOWS_BADGE, 0.7),
    KeyframeRow::exit(WORKFLOWS_DOT, 0.75, Scale, Unit(1.0), Unit(0.0)),
    hide(WORKFLOWS_DOT, 0.75),
];

// Voice: agents layout plus the wave panel and its idle loop.

const VOICE_PHOTO: &[TargetKey] = &["voice-photo"];
const VOICE_HAIRLINE: &[TargetKey] = &["voice-hairline"];
const VOICE_BADGE: &[TargetKey] = &["voice-badge"];
const VOICE_HEADLINES: &[TargetKey] = &["voice-headline-0", "voice-headline-1"];
const VOICE_BODY: &[TargetKey] = &["voice-body"];
const VOICE_DOT: &[TargetKey] = &["voice-dot"];
const VOICE_WAVE: &[TargetKey] = &["voice-wave"];
pub const VOICE_WAVE_BARS: &[TargetKey] = &[
    "voice-wave-bar-0",
    "voice-wave-bar-1",
    "voice-wave-bar-2",
    "voice-wave-bar-3",
    "voice-wave-bar-4",
];

const VOICE_ROWS: &[KeyframeRow] = &[
    KeyframeRow::enter(VOICE_PHOTO, 0.0, X, Vw(60.0), Px(0.0)),
    show(VOICE_PHOTO, 0.0),
    KeyframeRow::enter(VOICE_HAIRLINE, 0.05, ScaleY, Unit(0.0), Unit(1.0)),
    KeyframeRow::enter(VOICE_BADGE, 0.08, Y, Px(20.0), Px(0.0)),
    show(VOICE_BADGE, 0.08),
    KeyframeRow::enter(VOICE_HEADLINES, 0.08, X, Vw(-40.0), Px(0.0)).stagger(HEADLINE_STAGGER),
    show(VOICE_HEADLINES, 0.08).stagger(HEADLINE_STAGGER),
    KeyframeRow::enter(VOICE_BODY, 0.12, Y, Px(24.0), Px(0.0)),
    show(VOICE_BODY, 0.12),
    KeyframeRow::enter(VOICE_DOT, 0.2, Scale, Unit(0.0), Unit(1.0)),
    show(VOICE_DOT, 0.2),
    show(VOICE_WAVE, 0.25),
    KeyframeRow::exit(VOICE_PHOTO, 0.7, X, Px(0.0), Vw(18.0)),
    hide(VOICE_PHOTO, 0.7),
    KeyframeRow::exit(VOICE_HAIRLINE, 0.7, ScaleY, Unit(1.0), Unit(0.0)),
    KeyframeRow::exit(VOICE_HEADLINES, 0.7, Y, Px(0.0), Vh(-10.0)),
    hide(VOICE_HEADLINES, 0.7),
    KeyframeRow::exit(VOICE_BODY, 0.72, Y, Px(0.0), Vh(-6.0)),
    hide(VOICE_BODY, 0.72),
    KeyframeRow::exit(VOICE_BADGE, 0.7, Y, Px(0.0), Vh(-4.0)),
    hide(VOICE_BADGE, 0.7),
    KeyframeRow::exit(VOICE_DOT, 0.75, Scale, Unit(1.0), Unit(0.0)),
    hide(VOICE_DOT, 0.75),
    hide(VOICE_WAVE, 0.7),
];

const VOICE_AMBIENT: AmbientLoop = AmbientLoop {
    targets: VOICE_WAVE_BARS,
    property: ScaleY,
    rest: 1.0,
    low: AMBIENT_LOW_SCALE,
    period_sec: AMBIENT_PERIOD_SEC,
    stagger_sec: AMBIENT_STAGGER_SEC,
    ease: Ease::SineInOut,
};

// Metrics

const METRICS_PHOTO: &[TargetKey] = &["metrics-photo"];
const METRICS_HAIRLINE: &[TargetKey] = &["metrics-hairline"];
const METRICS_BADGE: &[TargetKey] = &["metrics-badge"];
const METRICS_HEADLINES: &[TargetKey] = &["metrics-headline-0", "metrics-headline-1"];
const METRICS_VALUES: &[TargetKey] = &["metrics-values"];
const METRICS_CTA: &[TargetKey] = &["metrics-cta"];

const METRICS_ROWS: &[KeyframeRow] = &[
    KeyframeRow::enter(METRICS_PHOTO, 0.0, X, Vw(-60.0), Px(0.0)),
    show(METRICS_PHOTO, 0.0),
    KeyframeRow::enter(METRICS_HAIRLINE, 0.05, ScaleY, Unit(0.0), Unit(1.0)),
    KeyframeRow::enter(METRICS_BADGE, 0.08, Y, Px(20.0), Px(0.0)),
    show(METRICS_BADGE, 0.08),
    KeyframeRow::enter(METRICS_HEADLINES, 0.08, X, Vw(40.0), Px(0.0)).stagger(HEADLINE_STAGGER),
    show(METRICS_HEADLINES, 0.08).stagger(HEADLINE_STAGGER),
    KeyframeRow::enter(METRICS_VALUES, 0.12, Y, Px(30.0), Px(0.0)),
    show(METRICS_VALUES, 0.12),
    KeyframeRow::enter(METRICS_CTA, 0.18, Y, Px(20.0), Px(0.0)),
    show(METRICS_CTA, 0.18),
    KeyframeRow::exit(METRICS_PHOTO, 0.7, X, Px(0.0), Vw(-10.0)),
    hide(METRICS_PHOTO, 0.7),
    KeyframeRow::exit(METRICS_HAIRLINE, 0.7, ScaleY, Unit(1.0), Unit(0.0)),
    KeyframeRow::exit(METRICS_HEADLINES, 0.7, Y, Px(0.0), Vh(-8.0)),
    hide(METRICS_HEADLINES, 0.7),
    KeyframeRow::exit(METRICS_VALUES, 0.72, Y, Px(0.0), Vh(6.0)),
    hide(METRICS_VALUES, 0.72),
    KeyframeRow::exit(METRICS_CTA, 0.74, Y, Px(0.0), Vh(4.0)),
    hide(METRICS_CTA, 0.74),
    KeyframeRow::exit(METRICS_BADGE, 0.7, Y, Px(0.0), Vh(-4.0)),
    hide(METRICS_BADGE, 0.7),
];

const fn pinned(
    name: &'static str,
    extent_pct: f32,
    rows: &'static [KeyframeRow],
    ambient: Option<AmbientLoop>,
) -> PinnedBlueprint {
    PinnedBlueprint {
        name,
        section: name,
        trigger: PIN_TRIGGER,
        extent: Extent::ViewportPercent(extent_pct),
        scrub_lag: PIN_SCRUB,
        rows,
        ambient,
    }
}

pub const PINNED: &[PinnedBlueprint] = &[
    pinned("hero", 130.0, HERO_ROWS, None),
    pinned("agents", 130.0, AGENTS_ROWS, None),
    pinned("workflows", 130.0, WORKFLOWS_ROWS, None),
    pinned("voice", 130.0, VOICE_ROWS, Some(VOICE_AMBIENT)),
    pinned("metrics", 120.0, METRICS_ROWS, None),
];

// Flowing sections

static HEADING_RISE: [RevealTrack; 2] = rise(24.0);
static CARD_RISE: [RevealTrack; 2] = rise(40.0);
static TILE_RISE: [RevealTrack; 2] = rise(30.0);
static LOGO_RISE: [RevealTrack; 2] = rise(20.0);
static FADE_IN: [RevealTrack; 1] = [RevealTrack {
    property: Opacity,
    from: Unit(0.0),
    to: Unit(1.0),
}];

const SERVICE_CARDS: &[TargetKey] = &[
    "services-card-0",
    "services-card-1",
    "services-card-2",
    "services-card-3",
    "services-card-4",
    "services-card-5",
];
const INDUSTRY_CARDS: &[TargetKey] = &[
    "industries-card-0",
    "industries-card-1",
    "industries-card-2",
    "industries-card-3",
    "industries-card-4",
    "industries-card-5",
];
const CLIENT_LOGOS: &[TargetKey] = &[
    "clients-logo-0",
    "clients-logo-1",
    "clients-logo-2",
    "clients-logo-3",
    "clients-logo-4",
    "clients-logo-5",
    "clients-logo-6",
    "clients-logo-7",
];
const PROCESS_STEPS: &[TargetKey] = &["process-step-0", "process-step-1", "process-step-2"];
const PROCESS_CONTENT: &[TargetKey] =
    &["process-content-0", "process-content-1", "process-content-2"];
const PROCESS_IMAGES: &[TargetKey] = &["process-image-0", "process-image-1", "process-image-2"];

const fn reveal(
    target: TargetKey,
    trigger: &'static str,
    tracks: &'static [RevealTrack],
    duration_sec: f32,
) -> RevealBlueprint {
    RevealBlueprint {
        target,
        trigger_element: target,
        trigger,
        tracks,
        duration_sec,
        delay_sec: 0.0,
    }
}

fn heading(target: TargetKey) -> RevealBlueprint {
    reveal(target, "top 80%", &HEADING_RISE, REVEAL_DURATION_SEC)
}

/// One reveal per sibling, each delayed `step_sec` more than the previous.
fn staggered(
    targets: &'static [TargetKey],
    trigger: &'static str,
    tracks: &'static [RevealTrack],
    duration_sec: f32,
    step_sec: f32,
) -> impl Iterator<Item = RevealBlueprint> {
    targets.iter().enumerate().map(move |(i, &target)| RevealBlueprint {
        delay_sec: step_sec * i as f32,
        ..reveal(target, trigger, tracks, duration_sec)
    })
}

/// Everything the stage mounts for one page.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub pinned: Vec<PinnedBlueprint>,
    pub intro: &'static [IntroRow],
    pub reveals: Vec<RevealBlueprint>,
    pub parallax: Vec<ParallaxBlueprint>,
    pub counters: Vec<CounterBlueprint>,
}

impl Catalog {
    pub fn site() -> Self {
        let mut reveals = vec![heading("services-heading")];
        reveals.extend(staggered(SERVICE_CARDS, "top 80%", &CARD_RISE, REVEAL_DURATION_SEC, 0.1));
        reveals.push(heading("industries-heading"));
        reveals.extend(staggered(
            INDUSTRY_CARDS,
            "top 85%",
            &TILE_RISE,
            REVEAL_CARD_DURATION_SEC,
            0.08,
        ));
        reveals.push(heading("clients-heading"));
        reveals.extend(staggered(
            CLIENT_LOGOS,
            "top 85%",
            &LOGO_RISE,
            REVEAL_CARD_DURATION_SEC,
            0.05,
        ));
        reveals.push(heading("process-heading"));
        for (&content, &step) in PROCESS_CONTENT.iter().zip(PROCESS_STEPS) {
            reveals.push(RevealBlueprint {
                trigger_element: step,
                ..reveal(content, "top 75%", &CARD_RISE, REVEAL_DURATION_SEC)
            });
        }
        reveals.push(heading("contact-heading"));
        reveals.push(reveal("contact-form", "top 75%", &CARD_RISE, REVEAL_DURATION_SEC));
        reveals.push(reveal("contact-footer", "top 90%", &FADE_IN, REVEAL_DURATION_SEC));

        let mut parallax: Vec<_> = PROCESS_IMAGES
            .iter()
            .zip(PROCESS_STEPS)
            .map(|(&image, &step)| ParallaxBlueprint::drift(image, step))
            .collect();
        parallax.push(ParallaxBlueprint::drift("contact-image", "contact"));

        let counters = ["24/7", "-40%", "+3.2×"]
            .into_iter()
            .zip(["metric-0", "metric-1", "metric-2"])
            .enumerate()
            .map(|(index, (value, target))| CounterBlueprint {
                target,
                value,
                index,
            })
            .collect();

        Self {
            pinned: PINNED.to_vec(),
            intro: HERO_INTRO,
            reveals,
            parallax,
            counters,
        }
    }

    /// Empty catalog; handy for pages that carry only part of the site.
    pub fn empty() -> Self {
        Self {
            pinned: Vec::new(),
            intro: &[],
            reveals: Vec::new(),
            parallax: Vec::new(),
            counters: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intro::IntroSequence;
    use crate::timeline::Timeline;

    #[test]
    fn every_pinned_table_validates() {
        for bp in PINNED {
            Timeline::phased(bp.rows).unwrap_or_else(|e| panic!("{}: {e}", bp.name));
        }
    }

    #[test]
    fn intro_validates_and_runs_just_over_a_second() {
        let intro = IntroSequence::new(HERO_INTRO).unwrap();
        let secs = intro.total().as_secs_f32();
        assert!((secs - 1.18).abs() < 1e-3, "{secs}");
    }

    #[test]
    fn site_counts() {
        let site = Catalog::site();
        assert_eq!(site.pinned.len(), 5);
        // 5 headings + 6 + 6 + 8 cards + 3 steps + form + footer
        assert_eq!(site.reveals.len(), 5 + 6 + 6 + 8 + 3 + 2);
        assert_eq!(site.parallax.len(), 4);
        assert_eq!(site.counters.len(), 3);
        assert_eq!(site.counters[2].value, "+3.2×");
    }

    #[test]
    fn card_delays_step_by_index() {
        let site = Catalog::site();
        let card = |id: &str| site.reveals.iter().find(|r| r.target == id).unwrap();
        assert_eq!(card("services-card-0").delay_sec, 0.0);
        assert!((card("services-card-3").delay_sec - 0.3).abs() < 1e-6);
        assert!((card("clients-logo-7").delay_sec - 0.35).abs() < 1e-6);
        assert_eq!(card("process-content-1").trigger_element, "process-step-1");
    }
}
