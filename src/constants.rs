/// DOM wiring constants for the web frontend.
///
/// Kept free of web-sys types so host tests can `include!` this file.
// <html data-scroll-animations="off"> turns scroll-bound motion off
pub const MOTION_ATTRIBUTE: &str = "data-scroll-animations";

// Inline style properties owned by the stage
pub const TRANSFORM_PROPERTY: &str = "transform";
pub const OPACITY_PROPERTY: &str = "opacity";
pub const SPACER_PROPERTY: &str = "margin-bottom"; // reserves the pinned scroll distance

// Keys that scroll the page natively; pressing one cancels an in-flight snap
pub const SCROLL_KEYS: &[&str] = &[
    "ArrowUp", "ArrowDown", "PageUp", "PageDown", "Home", "End", " ",
];

#[inline]
pub fn is_scroll_key(key: &str) -> bool {
    SCROLL_KEYS.contains(&key)
}

/// CSS pixel length, rounded to whole pixels.
#[inline]
pub fn px(value: f64) -> String {
    format!("{}px", value.round() as i64)
}
