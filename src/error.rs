/// Failures raised while setting up or driving the effect. All of them are
/// fatal for the session: the animation loop stops and the page keeps the last
/// presented frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("element '{0}' not found")]
    MissingElement(String),
    #[error("WebGL2 not supported")]
    ContextUnavailable,
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: &'static str, log: String },
    #[error("program failed to link: {0}")]
    ProgramLink(String),
    #[error("failed to allocate {0}")]
    Allocation(&'static str),
    #[error("framebuffer incomplete: 0x{0:x}")]
    FramebufferIncomplete(u32),
    #[error("render targets not allocated; resize must run before the first frame")]
    TargetsNotAllocated,
    #[error("host error: {0}")]
    Host(String),
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;

#[cfg(target_arch = "wasm32")]
impl From<RenderError> for wasm_bindgen::JsValue {
    fn from(err: RenderError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for RenderError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        RenderError::Host(format!("{value:?}"))
    }
}
