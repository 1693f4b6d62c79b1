//! Visible surface sizing and render-target lifetime.

use crate::config::PlatformProfile;
use crate::error::Result;
use crate::pipeline::{RenderBackend, ShaderPipeline};
use crate::targets::Extent;

#[derive(Debug, Clone)]
pub struct SurfaceManager {
    profile: PlatformProfile,
    pixel_ratio: f64,
    viewport: Option<Extent>,
}

impl SurfaceManager {
    pub fn new(profile: PlatformProfile) -> Self {
        Self {
            profile,
            pixel_ratio: 1.0,
            viewport: None,
        }
    }

    /// Clamp the device pixel ratio to the profile's ceiling. Returns the ratio
    /// that will be used for the drawing buffer.
    pub fn configure(&mut self, device_pixel_ratio: f64) -> f64 {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        self.pixel_ratio = dpr.min(self.profile.pixel_ratio_cap());
        self.pixel_ratio
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn viewport(&self) -> Option<Extent> {
        self.viewport
    }

    pub fn profile(&self) -> PlatformProfile {
        self.profile
    }

    /// Apply a new viewport: resize the surface, update the aspect ratio and
    /// swap in a freshly allocated (scaled) target pair.
    pub fn resize<B: RenderBackend>(
        &mut self,
        pipeline: &mut ShaderPipeline<B>,
        width: u32,
        height: u32,
    ) -> Result<Extent> {
        let viewport = Extent::new(width, height);
        let buffers = viewport.scaled(self.profile.buffer_scale());

        pipeline
            .backend_mut()
            .resize_surface(viewport, self.pixel_ratio);
        pipeline.set_aspect_ratio(viewport.aspect_ratio());
        pipeline.rebuild_targets(buffers)?;

        log::info!(
            "viewport {}x{} @{:.2}x, feedback buffers {}x{}",
            viewport.width,
            viewport.height,
            self.pixel_ratio,
            buffers.width,
            buffers.height
        );
        self.viewport = Some(viewport);
        Ok(buffers)
    }
}
