//! Uniform set of the distortion program and its per-frame update rule.

use crate::pointer::PointerState;

/// GLSL names the distortion program is expected to declare.
pub mod names {
    pub const STOP_TIME: &str = "u_stop_time";
    pub const STOP_RANDOMIZER: &str = "u_stop_randomizer";
    pub const CURSOR: &str = "u_cursor";
    pub const RATIO: &str = "u_ratio";
    pub const TEXTURE: &str = "u_texture";
    pub const CLEAN: &str = "u_clean";
}

/// Source of uniform random numbers in `[0, 1)`.
pub trait SeedSource {
    fn next_unit(&mut self) -> f32;
}

impl<F: FnMut() -> f32> SeedSource for F {
    fn next_unit(&mut self) -> f32 {
        self()
    }
}

/// CPU-side copy of the distortion uniforms. The feedback texture is bound by
/// the backend and is not mirrored here.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderUniforms {
    /// Seconds since the last consumed trigger.
    pub elapsed_since_trigger: f32,
    pub trigger_seed: [f32; 2],
    /// Texture-space cursor (Y grows upwards).
    pub cursor: [f32; 2],
    pub aspect_ratio: f32,
    /// 0 suppresses feedback for the frame, 1 keeps it.
    pub clear_mix: f32,
}

impl ShaderUniforms {
    pub fn new(pointer: &PointerState, aspect_ratio: f32, seeds: &mut dyn SeedSource) -> Self {
        Self {
            elapsed_since_trigger: 0.0,
            trigger_seed: [seeds.next_unit(), seeds.next_unit()],
            cursor: [pointer.x, pointer.y],
            aspect_ratio,
            clear_mix: 1.0,
        }
    }

    /// Fold one frame of pointer state into the uniforms. Consumes the pending
    /// trigger, if any.
    pub fn update(&mut self, dt_seconds: f32, pointer: &mut PointerState, seeds: &mut dyn SeedSource) {
        self.clear_mix = if pointer.clear_requested { 0.0 } else { 1.0 };

        if pointer.take_trigger() {
            self.cursor = [pointer.x, 1.0 - pointer.y];
            self.trigger_seed = [seeds.next_unit(), seeds.next_unit()];
            self.elapsed_since_trigger = 0.0;
        }

        self.elapsed_since_trigger += dt_seconds.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> impl FnMut() -> f32 {
        let mut n = 0u32;
        move || {
            n += 1;
            (n as f32 * 0.1).fract()
        }
    }

    #[test]
    fn trigger_flips_y_and_resets_time() {
        let mut seeds = counter();
        let mut pointer = PointerState::new(0.66, 0.3);
        let mut u = ShaderUniforms::new(&pointer, 1.0, &mut seeds);
        u.elapsed_since_trigger = 4.0;

        u.update(0.0, &mut pointer, &mut seeds);
        assert_eq!(u.cursor[0], 0.66);
        assert!((u.cursor[1] - 0.7).abs() < 1e-6);
        assert_eq!(u.elapsed_since_trigger, 0.0);
        assert!(!pointer.triggered);
        assert!((u.trigger_seed[0] - 0.3).abs() < 1e-6);
        assert!((u.trigger_seed[1] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn time_accumulates_without_trigger() {
        let mut seeds = counter();
        let mut pointer = PointerState::new(0.2, 0.2);
        let mut u = ShaderUniforms::new(&pointer, 1.0, &mut seeds);
        u.update(0.5, &mut pointer, &mut seeds);
        let cursor = u.cursor;
        u.update(0.25, &mut pointer, &mut seeds);
        u.update(0.25, &mut pointer, &mut seeds);
        assert_eq!(u.elapsed_since_trigger, 1.0);
        assert_eq!(u.cursor, cursor);
    }

    #[test]
    fn clear_mix_follows_flag() {
        let mut seeds = counter();
        let mut pointer = PointerState::default();
        let mut u = ShaderUniforms::new(&pointer, 1.0, &mut seeds);
        pointer.request_clear(0.0, 60.0);
        u.update(0.016, &mut pointer, &mut seeds);
        assert_eq!(u.clear_mix, 0.0);
        pointer.settle(60.0);
        u.update(0.016, &mut pointer, &mut seeds);
        assert_eq!(u.clear_mix, 1.0);
    }
}
