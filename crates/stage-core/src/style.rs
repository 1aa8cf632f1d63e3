//! Animated visual properties and the per-frame style set handed to the host.

use crate::sampler::Viewport;
use fnv::FnvHashMap;
use glam::Vec2;

/// Host-side element identifier (the element's DOM id).
pub type TargetKey = &'static str;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    X,
    Y,
    Opacity,
    Scale,
    ScaleY,
}

impl Property {
    pub fn name(self) -> &'static str {
        match self {
            Property::X => "x",
            Property::Y => "y",
            Property::Opacity => "opacity",
            Property::Scale => "scale",
            Property::ScaleY => "scaleY",
        }
    }
}

/// Keyframe value with its unit; viewport units resolve per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Px(f32),
    Vw(f32),
    Vh(f32),
    Unit(f32),
}

impl Value {
    #[inline]
    pub fn resolve(self, viewport: Viewport) -> f32 {
        match self {
            Value::Px(v) | Value::Unit(v) => v,
            Value::Vw(v) => v * viewport.width / 100.0,
            Value::Vh(v) => v * viewport.height / 100.0,
        }
    }
}

/// Resolved style for one element. Defaults are the element's natural state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementStyle {
    pub translate: Vec2,
    pub opacity: f32,
    pub scale: f32,
    pub scale_y: f32,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            opacity: 1.0,
            scale: 1.0,
            scale_y: 1.0,
        }
    }
}

impl ElementStyle {
    pub fn set(&mut self, property: Property, value: f32) {
        match property {
            Property::X => self.translate.x = value,
            Property::Y => self.translate.y = value,
            Property::Opacity => self.opacity = value,
            Property::Scale => self.scale = value,
            Property::ScaleY => self.scale_y = value,
        }
    }

    pub fn get(&self, property: Property) -> f32 {
        match property {
            Property::X => self.translate.x,
            Property::Y => self.translate.y,
            Property::Opacity => self.opacity,
            Property::Scale => self.scale,
            Property::ScaleY => self.scale_y,
        }
    }

    /// CSS `transform` value for this style.
    pub fn css_transform(&self) -> String {
        format!(
            "translate3d({:.2}px, {:.2}px, 0) scale({:.4}) scaleY({:.4})",
            self.translate.x, self.translate.y, self.scale, self.scale_y
        )
    }
}

/// Styles produced by one tick, keyed by target.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    styles: FnvHashMap<TargetKey, ElementStyle>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, target: TargetKey) -> Option<&ElementStyle> {
        self.styles.get(target)
    }

    /// Style for `target`, created at its natural state if absent.
    pub fn entry(&mut self, target: TargetKey) -> &mut ElementStyle {
        self.styles.entry(target).or_default()
    }

    pub fn set(&mut self, target: TargetKey, property: Property, value: f32) {
        self.entry(target).set(property, value);
    }

    /// Later frames win for every target they carry.
    pub fn merge(&mut self, other: Frame) {
        self.styles.extend(other.styles);
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TargetKey, &ElementStyle)> {
        self.styles.iter().map(|(k, v)| (*k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_units_resolve_against_size() {
        let vp = Viewport {
            width: 1000.0,
            height: 500.0,
        };
        assert_eq!(Value::Vw(60.0).resolve(vp), 600.0);
        assert_eq!(Value::Vh(-10.0).resolve(vp), -50.0);
        assert_eq!(Value::Px(24.0).resolve(vp), 24.0);
    }

    #[test]
    fn merge_overrides_whole_targets() {
        let mut a = Frame::new();
        a.set("photo", Property::Opacity, 0.2);
        a.set("dot", Property::Scale, 0.5);
        let mut b = Frame::new();
        b.set("photo", Property::X, 10.0);
        a.merge(b);
        let photo = a.get("photo").unwrap();
        assert_eq!(photo.translate.x, 10.0);
        assert_eq!(photo.opacity, 1.0);
        assert_eq!(a.get("dot").unwrap().scale, 0.5);
    }

    #[test]
    fn css_transform_lists_every_component() {
        let mut s = ElementStyle::default();
        s.set(Property::Y, -12.0);
        s.set(Property::ScaleY, 0.6);
        assert_eq!(
            s.css_transform(),
            "translate3d(0.00px, -12.00px, 0) scale(1.0000) scaleY(0.6000)"
        );
    }
}
