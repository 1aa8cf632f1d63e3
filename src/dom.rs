use crate::constants::{
    px, MOTION_ATTRIBUTE, OPACITY_PROPERTY, SPACER_PROPERTY, TRANSFORM_PROPERTY,
};
use stage_core::controller::PinnedBlueprint;
use stage_core::{ElementHost, ElementStyle, ScrollMetrics, SectionGeometry, Stage, TargetKey, Viewport};
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
fn html_element(document: &web::Document, id: &str) -> Option<web::HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
}

/// Element lookups by id against the live document.
#[derive(Clone)]
pub struct DomHost {
    document: web::Document,
}

impl DomHost {
    pub fn new(document: web::Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &web::Document {
        &self.document
    }
}

impl ElementHost for DomHost {
    /// Layout box from the offset chain, which ignores the transforms the
    /// stage itself applies.
    fn geometry(&self, key: TargetKey) -> Option<SectionGeometry> {
        let el = html_element(&self.document, key)?;
        let mut top = 0.0;
        let mut node = Some(el.clone());
        while let Some(n) = node {
            top += n.offset_top() as f64;
            node = n
                .offset_parent()
                .and_then(|p| p.dyn_into::<web::HtmlElement>().ok());
        }
        Some(SectionGeometry {
            top_px: top,
            height_px: el.offset_height() as f64,
        })
    }

    fn is_resolved(&self, key: TargetKey) -> bool {
        self.document.get_element_by_id(key).is_some()
    }
}

pub fn viewport(window: &web::Window) -> Viewport {
    let read = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    Viewport {
        width: read(window.inner_width()),
        height: read(window.inner_height()),
    }
}

pub fn scroll_metrics(window: &web::Window) -> Option<ScrollMetrics> {
    let root = window.document()?.document_element()?;
    let offset = window.scroll_y().ok()?;
    let inner = window.inner_height().ok()?.as_f64()?;
    Some(ScrollMetrics::new(offset, root.scroll_height() as f64 - inner))
}

pub fn motion_attribute(document: &web::Document) -> Option<String> {
    document.document_element()?.get_attribute(MOTION_ATTRIBUTE)
}

pub fn apply_style(document: &web::Document, key: TargetKey, style: &ElementStyle) {
    if let Some(el) = html_element(document, key) {
        let css = el.style();
        _ = css.set_property(TRANSFORM_PROPERTY, &style.css_transform());
        _ = css.set_property(OPACITY_PROPERTY, &format!("{:.4}", style.opacity));
    }
}

pub fn set_text(document: &web::Document, key: TargetKey, text: &str) {
    if let Some(el) = document.get_element_by_id(key) {
        el.set_text_content(Some(text));
    }
}

/// Reserve each pinned section's scroll distance below it.
pub fn apply_pin_spacers(document: &web::Document, pinned: &[PinnedBlueprint], vp: Viewport) {
    for bp in pinned {
        if let Some(el) = html_element(document, bp.section) {
            _ = el
                .style()
                .set_property(SPACER_PROPERTY, &px(bp.extent.resolve(vp)));
        }
    }
}

pub fn clear_styles(document: &web::Document, keys: &[TargetKey]) {
    for &key in keys {
        if let Some(el) = html_element(document, key) {
            let css = el.style();
            for prop in [TRANSFORM_PROPERTY, OPACITY_PROPERTY, SPACER_PROPERTY] {
                _ = css.remove_property(prop);
            }
        }
    }
}

/// Re-measure after a resize: spacers first, then every controller.
pub fn relayout(stage: &mut Stage, pinned: &[PinnedBlueprint], host: &DomHost, window: &web::Window) {
    let vp = viewport(window);
    if stage.config().scroll_animations {
        apply_pin_spacers(host.document(), pinned, vp);
    }
    stage.relayout(host, vp);
}
