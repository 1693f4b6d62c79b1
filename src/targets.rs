//! Ping-pong pair of off-screen render targets.

/// Pixel dimensions of a surface or buffer. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Scale both dimensions, flooring and keeping at least one pixel.
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(
            (self.width as f64 * factor).floor() as u32,
            (self.height as f64 * factor).floor() as u32,
        )
    }

    pub fn aspect_ratio(self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Two equally sized targets. `front` holds the most recently written frame and
/// is read by the next feedback pass; `back` is written next.
#[derive(Debug)]
pub struct RenderTargetPair<T> {
    front: T,
    back: T,
    extent: Extent,
}

impl<T> RenderTargetPair<T> {
    pub fn new(front: T, back: T, extent: Extent) -> Self {
        Self { front, back, extent }
    }

    pub fn front(&self) -> &T {
        &self.front
    }

    pub fn back(&self) -> &T {
        &self.back
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
    }
}
