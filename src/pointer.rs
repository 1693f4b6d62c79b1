//! Pointer state shared between the input handlers and the render loop.
//!
//! Coordinates are normalized to the viewport with the origin at the top-left.
//! Nothing here validates ranges; values outside `[0, 1]` pass straight through
//! to the shader.

/// Latest pointer sample plus the two one-shot flags consumed by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    /// Set by every new press/touch; cleared by the pipeline once consumed.
    pub triggered: bool,
    /// True while a clear pulse is active.
    pub clear_requested: bool,
    clear_deadline: Option<f64>,
}

impl PointerState {
    /// A pointer parked at `(x, y)` with a pending trigger, so the very first
    /// frame already paints.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            triggered: true,
            clear_requested: false,
            clear_deadline: None,
        }
    }

    pub fn record_pointer(&mut self, nx: f32, ny: f32) {
        self.x = nx;
        self.y = ny;
        self.triggered = true;
    }

    /// Raise the clear flag until `now_ms + hold_ms`. Overlapping requests keep
    /// the later deadline.
    pub fn request_clear(&mut self, now_ms: f64, hold_ms: f64) {
        let deadline = now_ms + hold_ms;
        self.clear_requested = true;
        self.clear_deadline = Some(match self.clear_deadline {
            Some(current) => current.max(deadline),
            None => deadline,
        });
    }

    /// Drop the clear flag once its deadline has passed. Called on every host
    /// tick, including ticks the scheduler skips.
    pub fn settle(&mut self, now_ms: f64) {
        if let Some(deadline) = self.clear_deadline {
            if now_ms >= deadline {
                self.clear_requested = false;
                self.clear_deadline = None;
            }
        }
    }

    /// Hands out the pending trigger exactly once.
    pub fn take_trigger(&mut self) -> bool {
        std::mem::take(&mut self.triggered)
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new(0.5, 0.5)
    }
}
