use crate::constants::is_scroll_key;
use crate::dom::{self, DomHost};
use crate::frame::Clock;
use stage_core::controller::PinnedBlueprint;
use stage_core::Stage;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// DOM listener that is removed again when dropped.
pub struct ListenerGuard {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl ListenerGuard {
    pub fn listen(
        target: &web::EventTarget,
        event: &'static str,
        passive: bool,
        handler: impl FnMut(web::Event) + 'static,
    ) -> Option<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        let options = web::AddEventListenerOptions::new();
        options.set_passive(passive);
        if let Err(e) = target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        ) {
            log::warn!("[stage] could not listen for {event}: {e:?}");
            return None;
        }
        Some(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// Pending `setTimeout`; cleared on drop.
pub struct Timeout {
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn schedule(delay_ms: i32, handler: impl FnMut() + 'static) -> Option<Self> {
        let window = web::window()?;
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms,
            )
            .ok()?;
        Some(Self {
            handle,
            _closure: closure,
        })
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        if let Some(w) = web::window() {
            w.clear_timeout_with_handle(self.handle);
        }
    }
}

pub struct PageWiring {
    pub window: web::Window,
    pub stage: Rc<RefCell<Stage>>,
    pub pinned: Rc<Vec<PinnedBlueprint>>,
    pub host: DomHost,
    pub clock: Clock,
}

/// Scroll, resize and user-input listeners for the page session.
pub fn wire_page(w: PageWiring) -> Vec<ListenerGuard> {
    let target: &web::EventTarget = w.window.as_ref();
    let mut guards = Vec::new();

    let stage = w.stage.clone();
    let clock = w.clock;
    guards.extend(ListenerGuard::listen(target, "scroll", true, move |_| {
        stage.borrow_mut().note_scroll(clock.now());
    }));

    let stage = w.stage.clone();
    let window = w.window.clone();
    let pinned = w.pinned.clone();
    let host = w.host.clone();
    guards.extend(ListenerGuard::listen(target, "resize", true, move |_| {
        dom::relayout(&mut stage.borrow_mut(), &pinned, &host, &window);
    }));

    for event in ["wheel", "touchstart"] {
        let stage = w.stage.clone();
        guards.extend(ListenerGuard::listen(target, event, true, move |_| {
            stage.borrow_mut().note_user_input();
        }));
    }

    let stage = w.stage.clone();
    guards.extend(ListenerGuard::listen(target, "keydown", true, move |e| {
        if let Some(ke) = e.dyn_ref::<web::KeyboardEvent>() {
            if is_scroll_key(&ke.key()) {
                stage.borrow_mut().note_user_input();
            }
        }
    }));

    log::debug!("[stage] {} page listeners attached", guards.len());
    guards
}
