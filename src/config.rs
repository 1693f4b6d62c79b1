//! Runtime configuration.
//!
//! The only knob the page really has is whether it runs on a resource
//! constrained device; everything quality related hangs off that flag.

/// Quality settings derived from the "constrained platform" flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformProfile {
    pub constrained: bool,
}

impl PlatformProfile {
    pub const fn new(constrained: bool) -> Self {
        Self { constrained }
    }

    /// Best-effort detection from `navigator.userAgent`. Only Android is
    /// treated as constrained.
    pub fn from_user_agent(user_agent: &str) -> Self {
        Self::new(user_agent.to_ascii_lowercase().contains("android"))
    }

    /// Parse a `data-constrained` attribute value. Unknown values yield `None`
    /// so the caller can fall back to sniffing.
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(Self::new(true)),
            "false" | "0" | "no" => Some(Self::new(false)),
            _ => None,
        }
    }

    /// Upper bound for `devicePixelRatio`.
    pub fn pixel_ratio_cap(&self) -> f64 {
        if self.constrained {
            1.25
        } else {
            2.0
        }
    }

    /// Feedback buffer resolution relative to the viewport.
    pub fn buffer_scale(&self) -> f64 {
        if self.constrained {
            0.6
        } else {
            1.0
        }
    }

    pub fn target_fps(&self) -> f64 {
        if self.constrained {
            30.0
        } else {
            60.0
        }
    }

    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.target_fps()
    }
}

impl Default for PlatformProfile {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Page wiring and timing constants.
#[derive(Debug, Clone)]
pub struct EffectConfig {
    pub canvas_id: &'static str,
    pub clear_selector: &'static str,
    pub vertex_script_id: &'static str,
    pub fragment_script_id: &'static str,
    /// How long the clear control suppresses feedback.
    pub clear_hold_ms: f64,
    /// Clear pulse issued after a relayout.
    pub resize_hold_ms: f64,
    pub initial_pointer: (f32, f32),
    /// Unattended second ripple: `(delay_ms, x, y)`.
    pub demo_pointer: Option<(i32, f32, f32)>,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            canvas_id: "canvas",
            clear_selector: ".clean-btn",
            vertex_script_id: "vertexShader",
            fragment_script_id: "fragmentShader",
            clear_hold_ms: 60.0,
            resize_hold_ms: 100.0,
            initial_pointer: (0.66, 0.3),
            demo_pointer: Some((700, 0.75, 0.5)),
        }
    }
}
