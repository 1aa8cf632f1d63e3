use crate::dom;
use fnv::FnvHashMap;
use instant::Instant;
use stage_core::{ElementStyle, ScrollSampler, Stage, TargetKey};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Monotonic page clock shared by listeners and the frame loop.
#[derive(Clone, Copy)]
pub struct Clock {
    origin: Instant,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    #[inline]
    pub fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

pub struct FrameContext {
    pub window: web::Window,
    pub document: web::Document,
    pub stage: Rc<RefCell<Stage>>,
    pub clock: Clock,
    pub sampler: ScrollSampler,
    // Last style written per element; unchanged styles are not rewritten.
    pub applied: FnvHashMap<TargetKey, ElementStyle>,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let Some(raw) = dom::scroll_metrics(&self.window) else {
            return;
        };
        self.sampler
            .sample(raw.offset_px, raw.max_offset_px, dom::viewport(&self.window));
        let metrics = self.sampler.metrics();
        // Release the stage before touching the page; scrolling re-enters
        // listeners that borrow it.
        let out = self.stage.borrow_mut().tick(metrics, self.clock.now());

        for (key, style) in out.styles.iter() {
            if self.applied.get(key) == Some(style) {
                continue;
            }
            dom::apply_style(&self.document, key, style);
            self.applied.insert(key, *style);
        }
        for (key, text) in &out.texts {
            dom::set_text(&self.document, key, text);
        }
        if let Some(y) = out.scroll_to {
            let x = self.window.scroll_x().unwrap_or(0.0);
            self.window.scroll_to_with_x_and_y(x, y);
        }
    }
}

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Running `requestAnimationFrame` loop.
pub struct RafLoop {
    tick: Tick,
    handle: Rc<Cell<Option<i32>>>,
}

impl RafLoop {
    pub fn stop(self) {
        if let (Some(w), Some(id)) = (web::window(), self.handle.get()) {
            _ = w.cancel_animation_frame(id);
        }
        // Breaks the closure's reference back to itself.
        self.tick.borrow_mut().take();
        log::debug!("[stage] frame loop stopped");
    }
}

fn request_frame(tick: &Tick) -> Option<i32> {
    let window = web::window()?;
    let slot = tick.borrow();
    let closure = slot.as_ref()?;
    window
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .ok()
}

pub fn start_loop(mut frame_ctx: FrameContext) -> RafLoop {
    let tick: Tick = Rc::new(RefCell::new(None));
    let handle = Rc::new(Cell::new(None));
    let tick_clone = tick.clone();
    let handle_clone = handle.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.frame();
        handle_clone.set(request_frame(&tick_clone));
    }) as Box<dyn FnMut()>));
    handle.set(request_frame(&tick));
    RafLoop { tick, handle }
}
