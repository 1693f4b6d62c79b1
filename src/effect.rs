//! The mounted effect: pointer state, frame cap, surface and pipeline wired
//! together the way the page drives them.
//!
//! Everything here is host-agnostic; the browser layer only feeds it
//! timestamps, viewport sizes and page coordinates.

use crate::config::{EffectConfig, PlatformProfile};
use crate::error::Result;
use crate::input::InputRouter;
use crate::pipeline::{RenderBackend, ShaderPipeline};
use crate::pointer::PointerState;
use crate::scheduler::{FrameScheduler, Tick};
use crate::surface::SurfaceManager;
use crate::uniforms::SeedSource;

pub struct Effect<B: RenderBackend> {
    config: EffectConfig,
    pointer: PointerState,
    router: InputRouter,
    scheduler: FrameScheduler,
    surface: SurfaceManager,
    pipeline: ShaderPipeline<B>,
    running: bool,
}

impl<B: RenderBackend> Effect<B> {
    /// Build the pipeline and size it to the initial viewport.
    pub fn new(
        backend: B,
        profile: PlatformProfile,
        config: EffectConfig,
        seeds: Box<dyn SeedSource>,
        device_pixel_ratio: f64,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let (x, y) = config.initial_pointer;
        let pointer = PointerState::new(x, y);
        let mut pipeline = ShaderPipeline::new(backend, &pointer, seeds);

        let mut surface = SurfaceManager::new(profile);
        surface.configure(device_pixel_ratio);
        surface.resize(&mut pipeline, width, height)?;

        Ok(Self {
            scheduler: FrameScheduler::new(surface.profile().target_fps()),
            config,
            pointer,
            router: InputRouter::new(),
            surface,
            pipeline,
            running: true,
        })
    }

    /// One host animation tick. Returns whether a frame was drawn.
    pub fn frame(&mut self, now_ms: f64) -> Result<bool> {
        if !self.running {
            return Ok(false);
        }
        self.pointer.settle(now_ms);
        match self.scheduler.tick(now_ms) {
            Tick::Waiting => Ok(false),
            Tick::Advance(dt) => {
                self.pipeline.advance(dt, &mut self.pointer)?;
                Ok(true)
            }
        }
    }

    /// Viewport changed: re-clamp density, rebuild targets, flush the trails.
    pub fn relayout(&mut self, width: u32, height: u32, device_pixel_ratio: f64, now_ms: f64) -> Result<()> {
        if !self.running {
            return Ok(());
        }
        self.surface.configure(device_pixel_ratio);
        self.surface.resize(&mut self.pipeline, width, height)?;
        self.pointer.request_clear(now_ms, self.config.resize_hold_ms);
        Ok(())
    }

    /// Mouse press in page pixels against a `view_w × view_h` viewport.
    pub fn press(&mut self, px: f64, py: f64, view_w: f64, view_h: f64) -> bool {
        self.running && self.router.press(&mut self.pointer, px, py, view_w, view_h)
    }

    pub fn touch_start(&mut self, px: f64, py: f64, view_w: f64, view_h: f64) {
        if self.running {
            self.router
                .touch_start(&mut self.pointer, px, py, view_w, view_h);
        }
    }

    /// Place the pointer directly in normalized coordinates.
    pub fn record_pointer(&mut self, x: f32, y: f32) {
        if self.running {
            self.pointer.record_pointer(x, y);
        }
    }

    /// The clean control.
    pub fn clear(&mut self, now_ms: f64) {
        if self.running {
            self.pointer.request_clear(now_ms, self.config.clear_hold_ms);
        }
    }

    /// Stop reacting to ticks and input. Resources go away with the value.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("effect stopped");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn surface(&self) -> &SurfaceManager {
        &self.surface
    }

    pub fn pipeline(&self) -> &ShaderPipeline<B> {
        &self.pipeline
    }
}
