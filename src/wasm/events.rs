//! DOM event wiring: pointer input, the clean button, viewport changes and the
//! unattended demo ripple.
//!
//! Every listener holds a `Weak<Runtime>` and is owned by the runtime, so
//! teardown unhooks them all.

use std::rc::{Rc, Weak};

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{AddEventListenerOptions, Document, Event, MouseEvent, TouchEvent, Window};

use super::render::{now_ms, viewport_size, Listener, Runtime};
use crate::error::Result;

type Handler = Closure<dyn FnMut(Event)>;

/// Wrap `f` so it only runs while the runtime is alive.
fn handler(runtime: &Rc<Runtime>, mut f: impl FnMut(&Rc<Runtime>, Event) + 'static) -> Handler {
    let weak: Weak<Runtime> = Rc::downgrade(runtime);
    Closure::wrap(Box::new(move |e: Event| {
        if let Some(rt) = weak.upgrade() {
            f(&rt, e);
        }
    }) as Box<dyn FnMut(Event)>)
}

pub(crate) fn install(win: &Window, document: &Document, runtime: &Rc<Runtime>) -> Result<()> {
    // Mouse press
    let click = handler(runtime, |rt, e| {
        let Some(e) = e.dyn_ref::<MouseEvent>() else { return };
        let Some(win) = web_sys::window() else { return };
        let Ok((w, h)) = viewport_size(&win) else { return };
        let (px, py) = (e.page_x() as f64, e.page_y() as f64);
        rt.with_effect(|effect| effect.press(px, py, w as f64, h as f64));
    });
    runtime.push_listener(Listener::add(win, "click", click, None)?);

    // Touch start; once seen, mouse presses are ignored for the session.
    let touch = handler(runtime, |rt, e| {
        let Some(e) = e.dyn_ref::<TouchEvent>() else { return };
        let Some(t) = e.target_touches().get(0) else { return };
        let Some(win) = web_sys::window() else { return };
        let Ok((w, h)) = viewport_size(&win) else { return };
        let (px, py) = (t.page_x() as f64, t.page_y() as f64);
        rt.with_effect(|effect| effect.touch_start(px, py, w as f64, h as f64));
    });
    let passive = AddEventListenerOptions::new();
    passive.set_passive(true);
    runtime.push_listener(Listener::add(win, "touchstart", touch, Some(&passive))?);

    // Clean button
    let Some((selector, demo)) =
        runtime.with_effect(|effect| (effect.config().clear_selector, effect.config().demo_pointer))
    else {
        return Ok(());
    };
    match document.query_selector(selector)? {
        Some(button) => {
            let clean = handler(runtime, |rt, _| {
                rt.with_effect(|effect| effect.clear(now_ms()));
            });
            runtime.push_listener(Listener::add(&button, "click", clean, None)?);
        }
        None => log::warn!("no clear control matches '{selector}'"),
    }

    // Resize canvas to fit window
    let resize = handler(runtime, |rt, _| {
        let Some(win) = web_sys::window() else { return };
        let Ok((w, h)) = viewport_size(&win) else { return };
        let dpr = win.device_pixel_ratio();
        if let Some(Err(err)) = rt.with_effect(|effect| effect.relayout(w, h, dpr, now_ms())) {
            rt.abort(err);
        }
    });
    runtime.push_listener(Listener::add(win, "resize", resize, None)?);

    // Demo ripple
    if let Some((delay_ms, x, y)) = demo {
        let weak = Rc::downgrade(runtime);
        let cb = Closure::once_into_js(move || {
            if let Some(rt) = weak.upgrade() {
                rt.with_effect(|effect| effect.record_pointer(x, y));
            }
        });
        win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay_ms)?;
    }

    Ok(())
}
