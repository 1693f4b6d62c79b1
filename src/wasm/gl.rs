use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlContextAttributes,
    WebGlFramebuffer, WebGlPowerPreference, WebGlProgram, WebGlShader, WebGlTexture,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::error::{RenderError, Result};
use crate::pipeline::RenderBackend;
use crate::targets::Extent;
use crate::uniforms::{names, ShaderUniforms};

pub const QUAD_VERTEX: &str = include_str!("shaders/quad.vert");
pub const RIPPLE_FRAGMENT: &str = include_str!("shaders/ripple.frag");
const COMPOSITE_FRAGMENT: &str = include_str!("shaders/composite.frag");

const POSITION_ATTRIB: u32 = 0;
const UV_ATTRIB: u32 = 1;

// Two triangles covering clip space: x, y, u, v.
#[rustfmt::skip]
const QUAD: [f32; 24] = [
    -1.0, -1.0, 0.0, 0.0,
     1.0, -1.0, 1.0, 0.0,
     1.0,  1.0, 1.0, 1.0,
    -1.0, -1.0, 0.0, 0.0,
     1.0,  1.0, 1.0, 1.0,
    -1.0,  1.0, 0.0, 1.0,
];

/// Off-screen colour buffer. Deletes its GL objects on drop.
pub struct GlTarget {
    gl: GL,
    framebuffer: WebGlFramebuffer,
    texture: WebGlTexture,
    extent: Extent,
}

impl Drop for GlTarget {
    fn drop(&mut self) {
        self.gl.delete_framebuffer(Some(&self.framebuffer));
        self.gl.delete_texture(Some(&self.texture));
    }
}

struct RippleLocations {
    stop_time: Option<WebGlUniformLocation>,
    stop_randomizer: Option<WebGlUniformLocation>,
    cursor: Option<WebGlUniformLocation>,
    ratio: Option<WebGlUniformLocation>,
    texture: Option<WebGlUniformLocation>,
    clean: Option<WebGlUniformLocation>,
}

impl RippleLocations {
    fn lookup(gl: &GL, program: &WebGlProgram) -> Self {
        // Unused uniforms are optimised out by the driver; a missing location
        // just turns the matching upload into a no-op.
        Self {
            stop_time: gl.get_uniform_location(program, names::STOP_TIME),
            stop_randomizer: gl.get_uniform_location(program, names::STOP_RANDOMIZER),
            cursor: gl.get_uniform_location(program, names::CURSOR),
            ratio: gl.get_uniform_location(program, names::RATIO),
            texture: gl.get_uniform_location(program, names::TEXTURE),
            clean: gl.get_uniform_location(program, names::CLEAN),
        }
    }
}

/// WebGL2 implementation of the feedback pipeline's backend.
pub struct WebGlBackend {
    gl: GL,
    canvas: HtmlCanvasElement,
    ripple: WebGlProgram,
    ripple_locations: RippleLocations,
    composite: WebGlProgram,
    composite_source: Option<WebGlUniformLocation>,
    quad: WebGlVertexArrayObject,
    _quad_buffer: WebGlBuffer,
    drawing_buffer: Extent,
}

impl WebGlBackend {
    pub fn new(canvas: HtmlCanvasElement, vertex_src: &str, fragment_src: &str) -> Result<Self> {
        let attrs = WebGlContextAttributes::new();
        attrs.set_alpha(true);
        attrs.set_power_preference(WebGlPowerPreference::HighPerformance);

        let gl: GL = canvas
            .get_context_with_context_options("webgl2", &attrs)?
            .ok_or(RenderError::ContextUnavailable)?
            .dyn_into()
            .map_err(|_| RenderError::ContextUnavailable)?;

        let ripple = link_program(&gl, vertex_src, fragment_src)?;
        let ripple_locations = RippleLocations::lookup(&gl, &ripple);
        let composite = link_program(&gl, QUAD_VERTEX, COMPOSITE_FRAGMENT)?;
        let composite_source = gl.get_uniform_location(&composite, "u_source");
        let (quad, quad_buffer) = create_quad(&gl)?;

        let drawing_buffer = Extent::new(canvas.width(), canvas.height());
        Ok(Self {
            gl,
            canvas,
            ripple,
            ripple_locations,
            composite,
            composite_source,
            quad,
            _quad_buffer: quad_buffer,
            drawing_buffer,
        })
    }

    fn draw_quad(&self, program: &WebGlProgram, sampler: Option<&WebGlUniformLocation>, source: &GlTarget) {
        let gl = &self.gl;
        gl.use_program(Some(program));
        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, Some(&source.texture));
        gl.uniform1i(sampler, 0);
        gl.bind_vertex_array(Some(&self.quad));
        gl.draw_arrays(GL::TRIANGLES, 0, 6);
        gl.bind_vertex_array(None);
        gl.bind_texture(GL::TEXTURE_2D, None);
    }
}

impl RenderBackend for WebGlBackend {
    type Target = GlTarget;

    fn create_target(&mut self, extent: Extent) -> Result<GlTarget> {
        let gl = &self.gl;
        let texture = gl.create_texture().ok_or(RenderError::Allocation("texture"))?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
        let upload = gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0,
            GL::RGBA8 as i32,
            extent.width as i32,
            extent.height as i32,
            0,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            None,
        );
        if let Err(err) = upload {
            gl.bind_texture(GL::TEXTURE_2D, None);
            gl.delete_texture(Some(&texture));
            return Err(err.into());
        }

        let framebuffer = match gl.create_framebuffer() {
            Some(fb) => fb,
            None => {
                gl.bind_texture(GL::TEXTURE_2D, None);
                gl.delete_texture(Some(&texture));
                return Err(RenderError::Allocation("framebuffer"));
            }
        };
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&framebuffer));
        gl.framebuffer_texture_2d(
            GL::FRAMEBUFFER,
            GL::COLOR_ATTACHMENT0,
            GL::TEXTURE_2D,
            Some(&texture),
            0,
        );
        let status = gl.check_framebuffer_status(GL::FRAMEBUFFER);
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        gl.bind_texture(GL::TEXTURE_2D, None);

        let target = GlTarget {
            gl: gl.clone(),
            framebuffer,
            texture,
            extent,
        };
        if status != GL::FRAMEBUFFER_COMPLETE {
            return Err(RenderError::FramebufferIncomplete(status));
        }
        Ok(target)
    }

    fn resize_surface(&mut self, extent: Extent, pixel_ratio: f64) {
        let buffer = Extent::new(
            (extent.width as f64 * pixel_ratio).floor() as u32,
            (extent.height as f64 * pixel_ratio).floor() as u32,
        );
        self.canvas.set_width(buffer.width);
        self.canvas.set_height(buffer.height);
        let style = self.canvas.style();
        // Style failures only affect layout, never the drawing buffer.
        let _ = style.set_property("width", &format!("{}px", extent.width));
        let _ = style.set_property("height", &format!("{}px", extent.height));
        self.drawing_buffer = buffer;
    }

    fn draw_feedback(&mut self, uniforms: &ShaderUniforms, source: &GlTarget, dest: &GlTarget) -> Result<()> {
        let gl = &self.gl;
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&dest.framebuffer));
        gl.viewport(0, 0, dest.extent.width as i32, dest.extent.height as i32);

        gl.use_program(Some(&self.ripple));
        let loc = &self.ripple_locations;
        gl.uniform1f(loc.stop_time.as_ref(), uniforms.elapsed_since_trigger);
        gl.uniform2f(
            loc.stop_randomizer.as_ref(),
            uniforms.trigger_seed[0],
            uniforms.trigger_seed[1],
        );
        gl.uniform2f(loc.cursor.as_ref(), uniforms.cursor[0], uniforms.cursor[1]);
        gl.uniform1f(loc.ratio.as_ref(), uniforms.aspect_ratio);
        gl.uniform1f(loc.clean.as_ref(), uniforms.clear_mix);

        self.draw_quad(&self.ripple, loc.texture.as_ref(), source);
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        check_context(gl)
    }

    fn draw_composite(&mut self, source: &GlTarget) -> Result<()> {
        let gl = &self.gl;
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        gl.viewport(
            0,
            0,
            self.drawing_buffer.width as i32,
            self.drawing_buffer.height as i32,
        );
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT);
        self.draw_quad(&self.composite, self.composite_source.as_ref(), source);
        check_context(gl)
    }
}

fn check_context(gl: &GL) -> Result<()> {
    if gl.is_context_lost() {
        return Err(RenderError::ContextUnavailable);
    }
    Ok(())
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let stage = if kind == GL::VERTEX_SHADER { "vertex" } else { "fragment" };
    let shader = gl.create_shader(kind).ok_or(RenderError::Allocation("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let ok = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(RenderError::ShaderCompile { stage, log })
    }
}

fn link_program(gl: &GL, vertex_src: &str, fragment_src: &str) -> Result<WebGlProgram> {
    let vertex = compile_shader(gl, GL::VERTEX_SHADER, vertex_src)?;
    let fragment = compile_shader(gl, GL::FRAGMENT_SHADER, fragment_src)?;
    let program = gl.create_program().ok_or(RenderError::Allocation("program"))?;

    gl.attach_shader(&program, &vertex);
    gl.attach_shader(&program, &fragment);
    gl.bind_attrib_location(&program, POSITION_ATTRIB, "a_position");
    gl.bind_attrib_location(&program, UV_ATTRIB, "a_uv");
    gl.link_program(&program);

    // Shaders are no longer needed once linked (or failed to link).
    gl.delete_shader(Some(&vertex));
    gl.delete_shader(Some(&fragment));

    let ok = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(RenderError::ProgramLink(log))
    }
}

fn create_quad(gl: &GL) -> Result<(WebGlVertexArrayObject, WebGlBuffer)> {
    let vao = gl
        .create_vertex_array()
        .ok_or(RenderError::Allocation("vertex array"))?;
    let buffer = gl.create_buffer().ok_or(RenderError::Allocation("buffer"))?;

    gl.bind_vertex_array(Some(&vao));
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    let vertices = js_sys::Float32Array::from(&QUAD[..]);
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &vertices, GL::STATIC_DRAW);

    let stride = 4 * std::mem::size_of::<f32>() as i32;
    gl.enable_vertex_attrib_array(POSITION_ATTRIB);
    gl.vertex_attrib_pointer_with_i32(POSITION_ATTRIB, 2, GL::FLOAT, false, stride, 0);
    gl.enable_vertex_attrib_array(UV_ATTRIB);
    gl.vertex_attrib_pointer_with_i32(UV_ATTRIB, 2, GL::FLOAT, false, stride, 8);

    gl.bind_vertex_array(None);
    gl.bind_buffer(GL::ARRAY_BUFFER, None);
    Ok((vao, buffer))
}
