use crate::constants::ENABLE_SCROLL_ANIMATIONS;

/// Runtime motion switches.
///
/// `scroll_animations` gates pinning, scrub, snap and reveals. The load intro
/// always plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionConfig {
    pub scroll_animations: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            scroll_animations: ENABLE_SCROLL_ANIMATIONS,
        }
    }
}

impl MotionConfig {
    /// Apply a page-level override such as `data-scroll-animations="off"`.
    /// Unknown values keep the compiled default.
    pub fn from_attribute(value: Option<&str>) -> Self {
        let mut config = Self::default();
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("off" | "false" | "0") => config.scroll_animations = false,
            Some("on" | "true" | "1") => config.scroll_animations = true,
            Some(other) => log::warn!("[stage] ignoring data-scroll-animations={other:?}"),
            None => {}
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_overrides() {
        assert!(!MotionConfig::from_attribute(Some("off")).scroll_animations);
        assert!(!MotionConfig::from_attribute(Some(" FALSE ")).scroll_animations);
        assert!(MotionConfig::from_attribute(Some("on")).scroll_animations);
        assert_eq!(MotionConfig::from_attribute(None), MotionConfig::default());
        assert_eq!(
            MotionConfig::from_attribute(Some("sometimes")),
            MotionConfig::default()
        );
    }
}
