/// Easing curves used by the page. Named after the curves designers pick in
/// motion tools; `Linear` is what scrubbed entrances use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Linear,
    /// Accelerating; used by every exit.
    Power2In,
    /// Decelerating; used by reveals, counters, the intro and snap settles.
    Power2Out,
    SineInOut,
}

impl Ease {
    /// Map `t` in [0, 1] to eased progress. Input is clamped.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power2In => t * t * t,
            Ease::Power2Out => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Ease::SineInOut => -((std::f32::consts::PI * t).cos() - 1.0) / 2.0,
        }
    }

    #[inline]
    pub fn apply_f64(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power2In => t * t * t,
            Ease::Power2Out => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Ease::SineInOut => -((std::f64::consts::PI * t).cos() - 1.0) / 2.0,
        }
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_hit_both_endpoints() {
        for ease in [Ease::Linear, Ease::Power2In, Ease::Power2Out, Ease::SineInOut] {
            assert!(ease.apply(0.0).abs() < 1e-6, "{ease:?} at 0");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-6, "{ease:?} at 1");
        }
    }

    #[test]
    fn power2_in_lags_and_power2_out_leads() {
        assert!(Ease::Power2In.apply(0.5) < 0.5);
        assert!(Ease::Power2Out.apply(0.5) > 0.5);
        assert!((Ease::Power2Out.apply_f64(0.5) - Ease::Power2Out.apply(0.5) as f64).abs() < 1e-6);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Ease::Linear.apply(-2.0), 0.0);
        assert_eq!(Ease::Power2Out.apply(3.0), 1.0);
    }
}
