use thiserror::Error;

/// Validation failures raised while turning section tables into live state.
///
/// None of these reach the page: callers log them and skip the section.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StageError {
    #[error("scrub lag {0} is outside [0, 1]")]
    InvalidScrubLag(f32),

    #[error("pin extent must be positive and finite (got {0})")]
    InvalidExtent(f32),

    #[error("unrecognised trigger anchor {0:?}")]
    InvalidAnchor(String),

    #[error("keyframe for {target}.{property} starts at {start}, outside its phase")]
    OutsidePhase {
        target: &'static str,
        property: &'static str,
        start: f32,
    },

    #[error("settle phase holds its state; {target}.{property} cannot be keyed there")]
    KeyedSettle {
        target: &'static str,
        property: &'static str,
    },

    #[error("keyframes for {target}.{property} overlap within one phase")]
    OverlappingKeyframes {
        target: &'static str,
        property: &'static str,
    },

    #[error("keyframe for {target}.{property} has an empty span")]
    EmptySpan {
        target: &'static str,
        property: &'static str,
    },
}
