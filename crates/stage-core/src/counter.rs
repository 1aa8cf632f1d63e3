//! Count-up metrics.
//!
//! A metric label such as `"+3.2×"` is split into prefix, magnitude and
//! suffix; once its trigger is crossed the magnitude counts up from zero.
//! Labels that are not a single quantity (`"24/7"`) render verbatim.

use crate::anchor::TriggerAnchor;
use crate::constants::{COUNTER_DURATION_SEC, COUNTER_STAGGER_SEC};
use crate::easing::Ease;
use crate::error::StageError;
use crate::host::ElementHost;
use crate::sampler::Viewport;
use crate::style::TargetKey;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub enum MetricDisplay {
    Literal(String),
    Numeric {
        prefix: String,
        magnitude: f64,
        suffix: String,
        decimals: usize,
    },
}

impl MetricDisplay {
    pub fn parse(value: &str) -> MetricDisplay {
        let literal = || MetricDisplay::Literal(value.to_string());
        let Some(first) = value.find(|c: char| c.is_ascii_digit()) else {
            return literal();
        };
        let (prefix, rest) = value.split_at(first);
        let end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, suffix) = rest.split_at(end);
        if suffix.chars().any(|c| c.is_ascii_digit()) {
            return literal();
        }
        let Ok(magnitude) = number.parse::<f64>() else {
            return literal();
        };
        let decimals = if value.contains('×') { 1 } else { 0 };
        MetricDisplay::Numeric {
            prefix: prefix.to_string(),
            magnitude,
            suffix: suffix.to_string(),
            decimals,
        }
    }

    /// Text shown at `fraction` of the way through the count.
    pub fn render(&self, fraction: f64) -> String {
        match self {
            MetricDisplay::Literal(s) => s.clone(),
            MetricDisplay::Numeric {
                prefix,
                magnitude,
                suffix,
                decimals,
            } => {
                let v = magnitude * fraction.clamp(0.0, 1.0);
                let shown = if *decimals == 0 { v.round() } else { v };
                format!("{prefix}{shown:.decimals$}{suffix}", decimals = *decimals)
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CounterBlueprint {
    pub target: TargetKey,
    pub value: &'static str,
    pub index: usize,
}

impl CounterBlueprint {
    pub const TRIGGER: &'static str = "top 80%";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CounterState {
    Waiting,
    Running,
    Done,
}

pub struct MetricCounter {
    target: TargetKey,
    display: MetricDisplay,
    anchor: TriggerAnchor,
    trigger_px: f64,
    delay: f64,
    elapsed: f64,
    state: CounterState,
    last: Option<String>,
}

impl MetricCounter {
    pub fn setup(
        blueprint: &CounterBlueprint,
        host: &dyn ElementHost,
        viewport: Viewport,
    ) -> Result<Option<Self>, StageError> {
        let anchor: TriggerAnchor = CounterBlueprint::TRIGGER.parse()?;
        let Some(geometry) = host.geometry(blueprint.target) else {
            return Ok(None);
        };
        Ok(Some(Self {
            target: blueprint.target,
            display: MetricDisplay::parse(blueprint.value),
            anchor,
            trigger_px: anchor.scroll_offset(geometry, viewport),
            delay: blueprint.index as f64 * COUNTER_STAGGER_SEC,
            elapsed: 0.0,
            state: CounterState::Waiting,
            last: None,
        }))
    }

    pub fn target(&self) -> TargetKey {
        self.target
    }

    pub fn is_done(&self) -> bool {
        self.state == CounterState::Done
    }

    pub fn relayout(&mut self, host: &dyn ElementHost, viewport: Viewport) {
        if let Some(geometry) = host.geometry(self.target) {
            self.trigger_px = self.anchor.scroll_offset(geometry, viewport);
        }
    }

    /// Returns new text for the element, if it changed this tick. The
    /// count runs once; scrolling back up leaves the final value in place.
    pub fn tick(&mut self, offset_px: f64, dt: Duration) -> Option<String> {
        match self.state {
            CounterState::Done => return None,
            CounterState::Waiting => {
                if offset_px < self.trigger_px {
                    return None;
                }
                log::debug!("[reveal] counting #{}", self.target);
                self.state = CounterState::Running;
            }
            CounterState::Running => self.elapsed += dt.as_secs_f64(),
        }

        let t = self.elapsed - self.delay;
        if t < 0.0 {
            return None;
        }
        let linear = (t / COUNTER_DURATION_SEC).min(1.0);
        if linear >= 1.0 {
            self.state = CounterState::Done;
        }
        let text = self.display.render(Ease::Power2Out.apply_f64(linear));
        if self.last.as_deref() == Some(text.as_str()) {
            return None;
        }
        self.last = Some(text.clone());
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::SectionGeometry;

    #[test]
    fn parses_signed_and_multiplier_values() {
        assert_eq!(
            MetricDisplay::parse("+3.2×"),
            MetricDisplay::Numeric {
                prefix: "+".into(),
                magnitude: 3.2,
                suffix: "×".into(),
                decimals: 1
            }
        );
        assert_eq!(
            MetricDisplay::parse("-40%"),
            MetricDisplay::Numeric {
                prefix: "-".into(),
                magnitude: 40.0,
                suffix: "%".into(),
                decimals: 0
            }
        );
    }

    #[test]
    fn compound_values_stay_literal() {
        assert_eq!(
            MetricDisplay::parse("24/7"),
            MetricDisplay::Literal("24/7".into())
        );
        assert_eq!(
            MetricDisplay::parse("n/a"),
            MetricDisplay::Literal("n/a".into())
        );
    }

    #[test]
    fn renders_final_value_exactly() {
        assert_eq!(MetricDisplay::parse("+3.2×").render(1.0), "+3.2×");
        assert_eq!(MetricDisplay::parse("-40%").render(1.0), "-40%");
        assert_eq!(MetricDisplay::parse("24/7").render(0.3), "24/7");
        assert_eq!(MetricDisplay::parse("-40%").render(0.0), "-0%");
        assert_eq!(MetricDisplay::parse("-40%").render(0.5), "-20%");
    }

    struct Metric;

    impl ElementHost for Metric {
        fn geometry(&self, _key: TargetKey) -> Option<SectionGeometry> {
            Some(SectionGeometry {
                top_px: 1000.0,
                height_px: 100.0,
            })
        }
    }

    const VP: Viewport = Viewport {
        width: 1000.0,
        height: 1000.0,
    };

    #[test]
    fn counts_once_after_delay() {
        let bp = CounterBlueprint {
            target: "m",
            value: "-40%",
            index: 2,
        };
        let mut c = MetricCounter::setup(&bp, &Metric, VP).unwrap().unwrap();
        let dt = Duration::from_millis(50);
        assert_eq!(c.tick(0.0, dt), None, "above the trigger line");

        // Trigger line is 1000 - 800 = 200. Delay 0.3s = 6 ticks.
        let mut texts = Vec::new();
        for _ in 0..100 {
            if let Some(t) = c.tick(250.0, dt) {
                texts.push(t);
            }
        }
        assert!(c.is_done());
        assert_eq!(texts.last().map(String::as_str), Some("-40%"));
        assert!(texts.len() > 5, "counts through intermediate values");

        assert_eq!(c.tick(0.0, dt), None);
        assert_eq!(c.tick(250.0, dt), None, "never replays");
    }
}
