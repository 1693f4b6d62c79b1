//! Pointer-driven feedback ripple for a browser canvas.
//!
//! The core (pointer state, scheduling, uniforms, the ping-pong pipeline) is
//! platform neutral and tested on the host. WebGL2 and DOM wiring only compile
//! for `wasm32`.

pub mod config;
pub mod effect;
pub mod error;
pub mod input;
pub mod pipeline;
pub mod pointer;
pub mod scheduler;
pub mod surface;
pub mod targets;
pub mod uniforms;

pub use config::{EffectConfig, PlatformProfile};
pub use effect::Effect;
pub use error::RenderError;
pub use pipeline::{RenderBackend, ShaderPipeline};
pub use pointer::PointerState;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod events;
    mod gl;
    mod render;

    pub use render::RippleHandle;

    use crate::config::EffectConfig;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        crate::init_logging();

        let config = EffectConfig::default();
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let Some(canvas) = document.get_element_by_id(config.canvas_id) else {
            log::warn!("#{} not found; waiting for mount_canvas()", config.canvas_id);
            return Ok(());
        };
        let canvas = canvas.dyn_into::<web_sys::HtmlCanvasElement>()?;

        // The page owns this effect for its whole lifetime.
        let handle = render::mount(canvas, config)?;
        std::mem::forget(handle);
        Ok(())
    }

    /// Mount the effect on an arbitrary canvas, for pages that build their
    /// own DOM.
    #[wasm_bindgen]
    pub fn mount_canvas(canvas: web_sys::HtmlCanvasElement) -> Result<RippleHandle, JsValue> {
        render::mount(canvas, EffectConfig::default()).map_err(JsValue::from)
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{mount_canvas, RippleHandle};

/// Install the logger for the current target. Safe to call more than once.
pub fn init_logging() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);
        } else {
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or("info"),
            )
            .try_init();
        }
    }
}
