//! WASM bindings for the treemap-core library.
//!
//! Two entry points are exposed to JavaScript:
//! - `TreemapApp`: headless controller driven by the host's clock, returning
//!   JSON snapshots
//! - `run`: mounts the svg into the page and drives it with
//!   `requestAnimationFrame`

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{MouseEvent, Performance};

use crate::config::{AppConfig, ConfigError};
use crate::dom::{ClickListener, SvgSurface};
use crate::interaction::Controller;
use crate::output::SceneOutput;
use crate::render::ElementId;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn console_log(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

/// Forwards `log` records to the browser console.
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}", record.level(), record.args());
        match record.level() {
            log::Level::Error => console_error(&line),
            _ => console_log(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn init_logging(level: log::LevelFilter) {
    // A second call only adjusts the level.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

fn load_config(config_json: Option<String>) -> Result<AppConfig, ConfigError> {
    match config_json {
        Some(json) if !json.trim().is_empty() => AppConfig::from_json(&json),
        _ => Ok(AppConfig::default()),
    }
}

fn to_js(err: ConfigError) -> JsValue {
    let message = err.to_string();
    console_error(&message);
    JsValue::from_str(&message)
}

fn seeded_rng(cfg: &AppConfig) -> SmallRng {
    let seed = cfg.seed.unwrap_or_else(|| (js_sys::Math::random() * u64::MAX as f64) as u64);
    SmallRng::seed_from_u64(seed)
}

/// Headless controller; the host passes `now` in milliseconds.
#[wasm_bindgen]
pub struct TreemapApp {
    controller: Controller,
}

#[wasm_bindgen]
impl TreemapApp {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, config_json: Option<String>) -> Result<TreemapApp, JsValue> {
        let cfg = load_config(config_json).map_err(to_js)?;
        init_logging(cfg.log_level());
        let mut controller = cfg.build_controller(width, height, seeded_rng(&cfg)).map_err(to_js)?;
        controller.start(0.0);
        Ok(TreemapApp { controller })
    }

    /// Returns false when `id` names no rendered cell.
    pub fn click(&mut self, id: f64, now: f64) -> bool {
        if !(id.is_finite() && id >= 0.0) {
            log::debug!("click with invalid id {id} ignored");
            return false;
        }
        self.controller.click(ElementId(id as u64), now)
    }

    /// Advance to `now` and return the resulting snapshot.
    pub fn tick(&mut self, now: f64) -> String {
        self.controller.tick(now);
        self.snapshot()
    }

    pub fn snapshot(&self) -> String {
        SceneOutput::from_controller(&self.controller).to_json()
    }
}

struct Runtime {
    controller: Controller,
    surface: SvgSurface,
    performance: Performance,
}

impl Runtime {
    fn sync(&mut self, weak: &Weak<RefCell<Runtime>>) -> Result<(), JsValue> {
        let listener = |id: ElementId| click_listener(weak.clone(), id);
        self.surface.sync(self.controller.scene(), &listener)
    }
}

fn click_listener(weak: Weak<RefCell<Runtime>>, id: ElementId) -> ClickListener {
    Closure::wrap(Box::new(move |_e: MouseEvent| {
        if let Some(rt) = weak.upgrade() {
            let mut rt = rt.borrow_mut();
            let now = rt.performance.now();
            rt.controller.click(id, now);
        }
    }) as Box<dyn FnMut(MouseEvent)>)
}

/// Mount the treemap into the page and start the frame loop.
#[wasm_bindgen]
pub fn run(config_json: Option<String>) -> Result<(), JsValue> {
    let cfg = load_config(config_json).map_err(to_js)?;
    init_logging(cfg.log_level());

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let performance = window.performance().ok_or_else(|| JsValue::from_str("no performance"))?;

    let viewport_w = window.inner_width()?.as_f64().unwrap_or(0.0);
    let viewport_h = window.inner_height()?.as_f64().unwrap_or(0.0);
    let (width, height) = cfg.canvas_size(viewport_w, viewport_h);

    let mut controller = cfg.build_controller(width, height, seeded_rng(&cfg)).map_err(to_js)?;
    controller.start(performance.now());
    let surface = SvgSurface::mount(document, &cfg, width, height)?;

    let runtime = Rc::new(RefCell::new(Runtime { controller, surface, performance }));
    let weak = Rc::downgrade(&runtime);
    runtime.borrow_mut().sync(&weak)?;

    let frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let frame_loop = frame.clone();
    let window_loop = window.clone();
    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        {
            let mut rt = runtime.borrow_mut();
            rt.controller.tick(now);
            if let Err(err) = rt.sync(&weak) {
                log::error!("svg sync failed: {err:?}");
            }
        }
        if let Some(cb) = frame_loop.borrow().as_ref() {
            if window_loop.request_animation_frame(cb.as_ref().unchecked_ref()).is_err() {
                log::error!("requestAnimationFrame failed, stopping");
            }
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(cb) = frame.borrow().as_ref() {
        window.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }
    Ok(())
}
