//! Routes raw page events into [`PointerState`].

use crate::pointer::PointerState;

/// Which input modality the session has settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Modality {
    #[default]
    Mouse,
    Touch,
}

/// Normalizes page coordinates and enforces the first-touch-wins rule: once a
/// touch has been seen, mouse presses are ignored for the rest of the session.
#[derive(Debug, Default)]
pub struct InputRouter {
    modality: Modality,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    /// Mouse press at page pixel `(px, py)`. Returns whether it was accepted.
    pub fn press(
        &mut self,
        pointer: &mut PointerState,
        px: f64,
        py: f64,
        view_w: f64,
        view_h: f64,
    ) -> bool {
        if self.modality == Modality::Touch {
            return false;
        }
        let (nx, ny) = normalize(px, py, view_w, view_h);
        pointer.record_pointer(nx, ny);
        true
    }

    pub fn touch_start(
        &mut self,
        pointer: &mut PointerState,
        px: f64,
        py: f64,
        view_w: f64,
        view_h: f64,
    ) {
        if self.modality != Modality::Touch {
            log::debug!("touch input observed; ignoring mouse presses from now on");
            self.modality = Modality::Touch;
        }
        let (nx, ny) = normalize(px, py, view_w, view_h);
        pointer.record_pointer(nx, ny);
    }
}

fn normalize(px: f64, py: f64, view_w: f64, view_h: f64) -> (f32, f32) {
    let w = if view_w > 0.0 { view_w } else { 1.0 };
    let h = if view_h > 0.0 { view_h } else { 1.0 };
    ((px / w) as f32, (py / h) as f32)
}
