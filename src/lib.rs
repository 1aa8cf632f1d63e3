#![cfg(target_arch = "wasm32")]
use stage_core::constants::SNAP_SETTLE_DELAY;
use stage_core::{Catalog, MotionConfig, Stage};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;

/// Everything one page view holds on to; dropped on `pagehide`.
struct Session {
    document: web::Document,
    stage: Rc<RefCell<Stage>>,
    raf: frame::RafLoop,
    listeners: Vec<events::ListenerGuard>,
    settle: Option<events::Timeout>,
}

impl Session {
    fn teardown(self) {
        drop(self.settle);
        drop(self.listeners);
        self.raf.stop();
        let targets = self.stage.borrow_mut().unmount();
        dom::clear_styles(&self.document, &targets);
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("stage-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let config = MotionConfig::from_attribute(dom::motion_attribute(&document).as_deref());
    let catalog = Catalog::site();
    let pinned = Rc::new(catalog.pinned.clone());
    let host = dom::DomHost::new(document.clone());
    let clock = frame::Clock::new();
    let vp = dom::viewport(&window);

    if config.scroll_animations {
        dom::apply_pin_spacers(&document, &pinned, vp);
    }
    let stage = Rc::new(RefCell::new(Stage::new(config, vp)));
    stage.borrow_mut().mount(&catalog, &host, clock.now());

    let raf = frame::start_loop(frame::FrameContext {
        window: window.clone(),
        document: document.clone(),
        stage: stage.clone(),
        clock,
        sampler: Default::default(),
        applied: Default::default(),
    });

    let listeners = events::wire_page(events::PageWiring {
        window: window.clone(),
        stage: stage.clone(),
        pinned: pinned.clone(),
        host: host.clone(),
        clock,
    });

    // Pin geometry is read once the layout has settled.
    let settle = if config.scroll_animations {
        let stage_settle = stage.clone();
        let window_settle = window.clone();
        events::Timeout::schedule(SNAP_SETTLE_DELAY.as_millis() as i32, move || {
            match dom::scroll_metrics(&window_settle) {
                Some(metrics) => {
                    stage_settle.borrow_mut().install_snap(metrics);
                }
                None => log::debug!("[snap] no scroll metrics; not installing"),
            }
        })
    } else {
        None
    };

    let session = Rc::new(RefCell::new(Some(Session {
        document,
        stage,
        raf,
        listeners,
        settle,
    })));

    // Fires once per page view; the session drops everything else it holds.
    let pagehide = Closure::once(move || {
        if let Some(s) = session.borrow_mut().take() {
            s.teardown();
            log::info!("[stage] torn down");
        }
    });
    let options = web::AddEventListenerOptions::new();
    options.set_once(true);
    window
        .add_event_listener_with_callback_and_add_event_listener_options(
            "pagehide",
            pagehide.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(|e| anyhow::anyhow!("pagehide listener: {:?}", e))?;
    pagehide.forget();

    Ok(())
}
