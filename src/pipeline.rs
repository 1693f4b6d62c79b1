//! Feedback shader pipeline.
//!
//! Every frame the distortion program samples the front target (last frame's
//! result) and writes into the back target; the back target is then
//! composited onto the visible surface and the pair rotates. Because each
//! frame distorts the accumulated image, a single press grows into a trailing
//! ripple instead of a static displacement.

use crate::error::{RenderError, Result};
use crate::pointer::PointerState;
use crate::targets::{Extent, RenderTargetPair};
use crate::uniforms::{SeedSource, ShaderUniforms};

/// Graphics operations the pipeline needs. Targets release their GPU
/// resources when dropped.
pub trait RenderBackend {
    type Target;

    fn create_target(&mut self, extent: Extent) -> Result<Self::Target>;

    /// Resize the visible drawing buffer to `extent` CSS pixels at `pixel_ratio`.
    fn resize_surface(&mut self, extent: Extent, pixel_ratio: f64);

    /// Distortion pass: sample `source`, write `dest`.
    fn draw_feedback(
        &mut self,
        uniforms: &ShaderUniforms,
        source: &Self::Target,
        dest: &Self::Target,
    ) -> Result<()>;

    /// Composite pass: copy `source` onto the visible surface.
    fn draw_composite(&mut self, source: &Self::Target) -> Result<()>;
}

pub struct ShaderPipeline<B: RenderBackend> {
    backend: B,
    uniforms: ShaderUniforms,
    targets: Option<RenderTargetPair<B::Target>>,
    seeds: Box<dyn SeedSource>,
}

impl<B: RenderBackend> ShaderPipeline<B> {
    pub fn new(backend: B, pointer: &PointerState, mut seeds: Box<dyn SeedSource>) -> Self {
        let uniforms = ShaderUniforms::new(pointer, 1.0, seeds.as_mut());
        Self {
            backend,
            uniforms,
            targets: None,
            seeds,
        }
    }

    pub fn uniforms(&self) -> &ShaderUniforms {
        &self.uniforms
    }

    pub fn targets(&self) -> Option<&RenderTargetPair<B::Target>> {
        self.targets.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn set_aspect_ratio(&mut self, ratio: f32) {
        self.uniforms.aspect_ratio = ratio;
    }

    /// Release the current pair, then allocate a fresh one at `extent`.
    pub fn rebuild_targets(&mut self, extent: Extent) -> Result<()> {
        // Drop the stale pair before touching the backend.
        self.targets = None;
        let front = self.backend.create_target(extent)?;
        let back = self.backend.create_target(extent)?;
        self.targets = Some(RenderTargetPair::new(front, back, extent));
        Ok(())
    }

    /// Run one frame: update uniforms, feedback pass, composite pass, swap.
    pub fn advance(&mut self, dt_seconds: f32, pointer: &mut PointerState) -> Result<()> {
        let targets = self.targets.as_mut().ok_or(RenderError::TargetsNotAllocated)?;

        self.uniforms.update(dt_seconds, pointer, self.seeds.as_mut());

        self.backend
            .draw_feedback(&self.uniforms, targets.front(), targets.back())?;
        self.backend.draw_composite(targets.back())?;

        targets.swap();
        Ok(())
    }
}
