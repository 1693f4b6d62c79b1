//! Frame-rate cap for the host-driven animation loop.

/// Outcome of a single host tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// Interval not yet elapsed; nothing to draw.
    Waiting,
    /// Draw a frame; carries seconds since the previous accepted frame.
    Advance(f32),
}

/// Coalesces animation-frame callbacks down to a target rate. Timestamps are
/// `requestAnimationFrame` milliseconds.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval_ms: f64,
    last_accepted_ms: f64,
    started: bool,
}

impl FrameScheduler {
    pub fn new(target_fps: f64) -> Self {
        let interval_ms = if target_fps > 0.0 { 1000.0 / target_fps } else { 0.0 };
        Self {
            interval_ms,
            last_accepted_ms: 0.0,
            started: false,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn tick(&mut self, now_ms: f64) -> Tick {
        if now_ms - self.last_accepted_ms < self.interval_ms {
            log::trace!("frame skipped by fps cap at {now_ms:.1}ms");
            return Tick::Waiting;
        }

        // The clock starts on the first accepted frame, so it reports zero.
        let dt_ms = if self.started {
            now_ms - self.last_accepted_ms
        } else {
            0.0
        };
        self.started = true;
        self.last_accepted_ms = now_ms;
        Tick::Advance((dt_ms / 1000.0) as f32)
    }
}
