use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::{closure::Closure, prelude::*, JsCast};
use web_sys::{window, AddEventListenerOptions, Event, EventTarget, HtmlCanvasElement, Window};

use super::events;
use super::gl::{WebGlBackend, QUAD_VERTEX, RIPPLE_FRAGMENT};
use crate::config::{EffectConfig, PlatformProfile};
use crate::effect::Effect;
use crate::error::{RenderError, Result};

/// A DOM listener that is removed again when dropped.
pub(crate) struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub(crate) fn add(
        target: &EventTarget,
        kind: &'static str,
        callback: Closure<dyn FnMut(Event)>,
        options: Option<&AddEventListenerOptions>,
    ) -> Result<Self> {
        let f: &js_sys::Function = callback.as_ref().unchecked_ref();
        if let Some(opts) = options {
            target.add_event_listener_with_callback_and_add_event_listener_options(kind, f, opts)?;
        } else {
            target.add_event_listener_with_callback(kind, f)?;
        }
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// Owns the effect plus every browser hook that drives it. Event and frame
/// closures only hold a `Weak` back to it, so dropping the runtime (or
/// calling `teardown`) releases the GL context and all listeners.
pub(crate) struct Runtime {
    effect: RefCell<Option<Effect<WebGlBackend>>>,
    listeners: RefCell<Vec<Listener>>,
    frame: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    frame_id: Cell<Option<i32>>,
}

impl Runtime {
    /// Run `f` against the live effect; `None` once torn down.
    pub(crate) fn with_effect<R>(&self, f: impl FnOnce(&mut Effect<WebGlBackend>) -> R) -> Option<R> {
        self.effect.borrow_mut().as_mut().map(f)
    }

    pub(crate) fn push_listener(&self, listener: Listener) {
        self.listeners.borrow_mut().push(listener);
    }

    fn schedule_frame(&self) -> Result<()> {
        let win = window().ok_or(RenderError::Host("no window".into()))?;
        let slot = self.frame.borrow();
        let Some(cb) = slot.as_ref() else {
            return Ok(());
        };
        let id = win.request_animation_frame(cb.as_ref().unchecked_ref())?;
        self.frame_id.set(Some(id));
        Ok(())
    }

    /// Stop the effect, unhook every listener and release GPU resources.
    pub(crate) fn teardown(&self) {
        let effect = self.effect.borrow_mut().take();
        if let Some(mut effect) = effect {
            effect.stop();
        }
        self.listeners.borrow_mut().clear();
        if let Some(id) = self.frame_id.take() {
            if let Some(win) = window() {
                let _ = win.cancel_animation_frame(id);
            }
        }
        self.frame.borrow_mut().take();
    }

    /// Fatal error from inside a callback: freeze the effect now, unhook on a
    /// later task so no closure is dropped while it runs.
    pub(crate) fn abort(self: &Rc<Self>, err: RenderError) {
        log::error!("effect aborted: {err}");
        self.with_effect(|effect| effect.stop());
        let weak = Rc::downgrade(self);
        let cb = Closure::once_into_js(move || {
            if let Some(rt) = weak.upgrade() {
                rt.teardown();
            }
        });
        if let Some(win) = window() {
            let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), 0);
        }
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Handle returned to JavaScript for a mounted effect. Dropping it (or
/// calling `stop`) tears the effect down.
#[wasm_bindgen]
pub struct RippleHandle {
    runtime: Rc<Runtime>,
}

#[wasm_bindgen]
impl RippleHandle {
    /// Flush the feedback buffer, same as pressing the clean button.
    pub fn clear(&self) {
        self.runtime.with_effect(|effect| effect.clear(now_ms()));
    }

    /// Remove all listeners, stop the frame loop and free the GL resources.
    /// The last presented frame stays on screen.
    pub fn stop(&self) {
        self.runtime.teardown();
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.runtime
            .with_effect(|effect| effect.is_running())
            .unwrap_or(false)
    }
}

/// Attach the effect to `canvas` and start the animation loop.
pub fn mount(canvas: HtmlCanvasElement, config: EffectConfig) -> Result<RippleHandle> {
    let win = window().ok_or(RenderError::Host("no window".into()))?;
    let document = win.document().ok_or(RenderError::Host("no document".into()))?;

    let profile = resolve_profile(&win, &canvas);
    log::debug!("platform profile: {profile:?}");

    let vertex = script_text(&document, config.vertex_script_id).unwrap_or_else(|| QUAD_VERTEX.to_owned());
    let fragment =
        script_text(&document, config.fragment_script_id).unwrap_or_else(|| RIPPLE_FRAGMENT.to_owned());
    let backend = WebGlBackend::new(canvas, &vertex, &fragment)?;

    let seeds = Box::new(|| (js_sys::Math::random() as f32).min(0.999_999_9));
    let (w, h) = viewport_size(&win)?;
    let effect = Effect::new(backend, profile, config, seeds, win.device_pixel_ratio(), w, h)?;

    let runtime = Rc::new(Runtime {
        effect: RefCell::new(Some(effect)),
        listeners: RefCell::new(Vec::new()),
        frame: RefCell::new(None),
        frame_id: Cell::new(None),
    });

    events::install(&win, &document, &runtime)?;
    start_loop(&runtime)?;

    log::info!("ripple canvas mounted ({} fps cap)", profile.target_fps());
    Ok(RippleHandle { runtime })
}

fn start_loop(runtime: &Rc<Runtime>) -> Result<()> {
    // The frame closure lives in the runtime and re-requests itself each
    // frame. Every call is a yield back to the browser; teardown cancels the
    // pending request and drops the closure.
    let weak: Weak<Runtime> = Rc::downgrade(runtime);
    let cb = Closure::wrap(Box::new(move |now: f64| {
        let Some(rt) = weak.upgrade() else { return };
        rt.frame_id.set(None);
        match rt.with_effect(|effect| effect.frame(now)) {
            None => return,
            Some(Err(err)) => return rt.abort(err),
            Some(Ok(_)) => {}
        }
        if let Err(err) = rt.schedule_frame() {
            rt.abort(err);
        }
    }) as Box<dyn FnMut(f64)>);

    *runtime.frame.borrow_mut() = Some(cb);
    runtime.schedule_frame()
}

fn resolve_profile(win: &Window, canvas: &HtmlCanvasElement) -> PlatformProfile {
    if let Some(profile) = canvas
        .get_attribute("data-constrained")
        .and_then(|v| PlatformProfile::from_attribute(&v))
    {
        return profile;
    }
    let ua = win.navigator().user_agent().unwrap_or_default();
    PlatformProfile::from_user_agent(&ua)
}

fn script_text(document: &web_sys::Document, id: &str) -> Option<String> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.text_content())
        .filter(|src| !src.trim().is_empty())
}

pub(crate) fn viewport_size(win: &Window) -> Result<(u32, u32)> {
    let w = win.inner_width()?.as_f64().unwrap_or(1.0);
    let h = win.inner_height()?.as_f64().unwrap_or(1.0);
    Ok((w.max(1.0) as u32, h.max(1.0) as u32))
}

pub(crate) fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_default()
}
