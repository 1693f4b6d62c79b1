#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use ripple_canvas::error::Result;
use ripple_canvas::targets::Extent;
use ripple_canvas::uniforms::ShaderUniforms;
use ripple_canvas::RenderBackend;

/// What the backend saw, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Created(u32, Extent),
    Released(u32),
    Surface(Extent, f64),
    Feedback { source: u32, dest: u32, uniforms: ShaderUniforms },
    Composite(u32),
}

pub type Journal = Rc<RefCell<Vec<Event>>>;

pub struct Target {
    pub id: u32,
    journal: Journal,
}

impl Drop for Target {
    fn drop(&mut self) {
        self.journal.borrow_mut().push(Event::Released(self.id));
    }
}

#[derive(Default)]
pub struct RecordingBackend {
    next_id: u32,
    pub journal: Journal,
}

impl RecordingBackend {
    pub fn events(&self) -> Vec<Event> {
        self.journal.borrow().clone()
    }

    pub fn feedback_uniforms(&self) -> Vec<ShaderUniforms> {
        self.journal
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Feedback { uniforms, .. } => Some(uniforms.clone()),
                _ => None,
            })
            .collect()
    }
}

impl RenderBackend for RecordingBackend {
    type Target = Target;

    fn create_target(&mut self, extent: Extent) -> Result<Target> {
        self.next_id += 1;
        self.journal
            .borrow_mut()
            .push(Event::Created(self.next_id, extent));
        Ok(Target {
            id: self.next_id,
            journal: self.journal.clone(),
        })
    }

    fn resize_surface(&mut self, extent: Extent, pixel_ratio: f64) {
        self.journal
            .borrow_mut()
            .push(Event::Surface(extent, pixel_ratio));
    }

    fn draw_feedback(&mut self, uniforms: &ShaderUniforms, source: &Target, dest: &Target) -> Result<()> {
        self.journal.borrow_mut().push(Event::Feedback {
            source: source.id,
            dest: dest.id,
            uniforms: uniforms.clone(),
        });
        Ok(())
    }

    fn draw_composite(&mut self, source: &Target) -> Result<()> {
        self.journal.borrow_mut().push(Event::Composite(source.id));
        Ok(())
    }
}

/// Deterministic seeds cycling through a fixed table.
pub fn seeds() -> impl FnMut() -> f32 + 'static {
    let table = [0.125f32, 0.5, 0.875, 0.25, 0.0, 0.999];
    let mut i = 0;
    move || {
        let v = table[i % table.len()];
        i += 1;
        v
    }
}
