//! Trigger anchors: "<element edge> <viewport line>" pairs such as
//! `"top top"` or `"top 80%"`. An anchor resolves to the scroll offset at
//! which the element edge meets the viewport line.

use crate::error::StageError;
use crate::sampler::{SectionGeometry, Viewport};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edge {
    Top,
    Center,
    Bottom,
}

impl Edge {
    fn fraction(self) -> f64 {
        match self {
            Edge::Top => 0.0,
            Edge::Center => 0.5,
            Edge::Bottom => 1.0,
        }
    }
}

/// Line in the viewport, as a fraction of its height from the top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportLine(pub f64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerAnchor {
    pub element: Edge,
    pub viewport: ViewportLine,
}

impl TriggerAnchor {
    pub const TOP_TOP: TriggerAnchor = TriggerAnchor {
        element: Edge::Top,
        viewport: ViewportLine(0.0),
    };

    /// Scroll offset at which this anchor fires for `geometry`.
    pub fn scroll_offset(&self, geometry: SectionGeometry, viewport: Viewport) -> f64 {
        let edge_y = geometry.top_px + geometry.height_px * self.element.fraction();
        edge_y - viewport.height as f64 * self.viewport.0
    }
}

fn parse_edge(word: &str) -> Option<Edge> {
    match word {
        "top" => Some(Edge::Top),
        "center" => Some(Edge::Center),
        "bottom" => Some(Edge::Bottom),
        _ => None,
    }
}

fn parse_line(word: &str) -> Option<ViewportLine> {
    if let Some(edge) = parse_edge(word) {
        return Some(ViewportLine(edge.fraction()));
    }
    let pct = word.strip_suffix('%')?.parse::<f64>().ok()?;
    pct.is_finite().then_some(ViewportLine(pct / 100.0))
}

impl FromStr for TriggerAnchor {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let parsed = match (words.next(), words.next(), words.next()) {
            (Some(el), Some(vp), None) => parse_edge(el).zip(parse_line(vp)),
            _ => None,
        };
        parsed
            .map(|(element, viewport)| TriggerAnchor { element, viewport })
            .ok_or_else(|| StageError::InvalidAnchor(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport {
        width: 1000.0,
        height: 800.0,
    };

    #[test]
    fn parses_keyword_and_percent_lines() {
        assert_eq!("top top".parse::<TriggerAnchor>(), Ok(TriggerAnchor::TOP_TOP));
        let a: TriggerAnchor = "top 80%".parse().unwrap();
        assert_eq!(a.element, Edge::Top);
        assert!((a.viewport.0 - 0.8).abs() < 1e-12);
        let b: TriggerAnchor = "bottom top".parse().unwrap();
        assert_eq!(b.element, Edge::Bottom);
        assert_eq!(b.viewport.0, 0.0);
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "top", "middle top", "top 80", "top top top", "top x%"] {
            assert!(bad.parse::<TriggerAnchor>().is_err(), "{bad:?} parsed");
        }
    }

    #[test]
    fn resolves_scroll_offsets() {
        let geo = SectionGeometry {
            top_px: 2000.0,
            height_px: 600.0,
        };
        assert_eq!(TriggerAnchor::TOP_TOP.scroll_offset(geo, VP), 2000.0);
        let reveal: TriggerAnchor = "top 80%".parse().unwrap();
        assert!((reveal.scroll_offset(geo, VP) - 1360.0).abs() < 1e-9);
        let leave: TriggerAnchor = "bottom top".parse().unwrap();
        assert_eq!(leave.scroll_offset(geo, VP), 2600.0);
        let enter: TriggerAnchor = "top bottom".parse().unwrap();
        assert_eq!(enter.scroll_offset(geo, VP), 1200.0);
    }
}
