// compositor.rs - WebGL2 scene pass + reveal pass
//
// Scene planes are drawn back to front into an offscreen target, which the
// reveal pass samples while drawing a full-screen triangle to the canvas.

use web_sys::{HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlTexture, WebGlVertexArrayObject};

use super::program::{ATTR_POSITION, ATTR_UV, Program};
use super::target::RenderTarget;
use super::texture;
use crate::app::{Compositor, Frame};
use crate::error::{GalleryError, Result};
use crate::gallery::Material;
use crate::geometry::{PlaneGeometry, STRIDE};
use crate::reveal;
use crate::viewport::Viewport;

const PLANE_VERT: &str = include_str!("../shaders/plane.vert");
const PLANE_FRAG: &str = include_str!("../shaders/plane.frag");
const STEM_VERT: &str = include_str!("../shaders/stem.vert");
const BASIC_FRAG: &str = include_str!("../shaders/basic.frag");

const PLANE_UNIFORMS: &[&str] = &[
    "projectionMatrix",
    "modelViewMatrix",
    "uTexture",
    "uOffset",
    "uAlpha",
    "uPosition",
];
const REVEAL_UNIFORMS: &[&str] = &[
    "tDiffuse",
    "resolution",
    "uMouse",
    "uVelo",
    "uRadius",
    "uBorder",
    "uShift",
];

const FULLSCREEN_TRIANGLE: [f32; 6] = [-1.0, -1.0, 3.0, -1.0, -1.0, 3.0];

struct Mesh {
    vao: WebGlVertexArrayObject,
    // Kept alive with the VAO that references them.
    _buffers: Vec<WebGlBuffer>,
    count: i32,
}

pub struct GlCompositor {
    gl: GL,
    canvas: HtmlCanvasElement,
    distorted: Program,
    basic: Program,
    reveal: Program,
    plane: Mesh,
    screen: Mesh,
    target: RenderTarget,
    textures: Vec<WebGlTexture>,
}

impl GlCompositor {
    pub fn new(gl: GL, canvas: HtmlCanvasElement, viewport: &Viewport, segments: u32) -> Result<Self> {
        let distorted = Program::new(&gl, PLANE_VERT, PLANE_FRAG, PLANE_UNIFORMS)?;
        let basic = Program::new(&gl, STEM_VERT, BASIC_FRAG, PLANE_UNIFORMS)?;
        let reveal = Program::new(&gl, reveal::VERTEX_SHADER, reveal::FRAGMENT_SHADER, REVEAL_UNIFORMS)?;

        let plane = plane_mesh(&gl, &PlaneGeometry::new(1.0, 1.0, segments, segments))?;
        let screen = screen_mesh(&gl)?;

        let (w, h) = viewport.buffer_size();
        let target = RenderTarget::new(&gl, w, h)?;

        let mut compositor = Self {
            gl,
            canvas,
            distorted,
            basic,
            reveal,
            plane,
            screen,
            target,
            textures: Vec::new(),
        };
        compositor.resize(viewport)?;
        Ok(compositor)
    }

    /// Queue a texture for the next slot. Call in the same order slots are added.
    pub fn add_texture(&mut self, src: &str) -> Result<()> {
        let texture = texture::load(&self.gl, src)?;
        self.textures.push(texture);
        Ok(())
    }

    fn draw_scene(&self, frame: &Frame<'_>) {
        let gl = &self.gl;
        self.target.bind(gl);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);

        gl.enable(GL::BLEND);
        gl.blend_func_separate(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA, GL::ONE, GL::ONE_MINUS_SRC_ALPHA);
        gl.enable(GL::DEPTH_TEST);
        gl.depth_mask(false);
        gl.disable(GL::CULL_FACE);

        let projection = frame.camera.projection().to_cols_array();
        let view = frame.camera.view();

        gl.bind_vertex_array(Some(&self.plane.vao));
        gl.active_texture(GL::TEXTURE0);

        for idx in frame.draw_order() {
            let Some(texture) = self.textures.get(idx) else {
                log::trace!("slot {} has no texture", idx);
                continue;
            };
            let layer = &frame.slots[idx].layer;
            let program = match layer.material() {
                Material::Distorted => &self.distorted,
                Material::Basic => &self.basic,
            };
            program.bind(gl);

            let model_view = (view * layer.transform().matrix()).to_cols_array();
            let u = layer.uniforms();
            gl.uniform_matrix4fv_with_f32_array(program.loc("projectionMatrix"), false, &projection);
            gl.uniform_matrix4fv_with_f32_array(program.loc("modelViewMatrix"), false, &model_view);
            gl.uniform2f(program.loc("uOffset"), u.offset.x, u.offset.y);
            gl.uniform1f(program.loc("uAlpha"), u.alpha);
            gl.uniform3f(program.loc("uPosition"), u.position.x, u.position.y, u.position.z);
            gl.uniform1i(program.loc("uTexture"), 0);
            gl.bind_texture(GL::TEXTURE_2D, Some(texture));

            gl.draw_elements_with_i32(GL::TRIANGLES, self.plane.count, GL::UNSIGNED_SHORT, 0);
        }

        gl.depth_mask(true);
        gl.disable(GL::DEPTH_TEST);
        gl.disable(GL::BLEND);
    }

    fn draw_reveal(&self, frame: &Frame<'_>) {
        let gl = &self.gl;
        let pass = frame.reveal;
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        gl.viewport(0, 0, self.canvas.width() as i32, self.canvas.height() as i32);

        self.reveal.bind(gl);
        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, Some(self.target.texture()));
        gl.uniform1i(self.reveal.loc("tDiffuse"), 0);
        gl.uniform2f(self.reveal.loc("resolution"), pass.resolution.x, pass.resolution.y);
        gl.uniform2f(self.reveal.loc("uMouse"), pass.mouse.x, pass.mouse.y);
        gl.uniform1f(self.reveal.loc("uVelo"), pass.velocity);
        gl.uniform1f(self.reveal.loc("uRadius"), pass.settings.radius);
        gl.uniform1f(self.reveal.loc("uBorder"), pass.settings.border);
        let [r, g, b] = pass.settings.channel_shift;
        gl.uniform3f(self.reveal.loc("uShift"), r, g, b);

        gl.bind_vertex_array(Some(&self.screen.vao));
        gl.draw_arrays(GL::TRIANGLES, 0, self.screen.count);
        gl.bind_vertex_array(None);
    }
}

impl Compositor for GlCompositor {
    fn resize(&mut self, viewport: &Viewport) -> Result<()> {
        let (w, h) = viewport.buffer_size();
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", viewport.width))?;
        style.set_property("height", &format!("{}px", viewport.height))?;
        self.target.resize(&self.gl, w, h)
    }

    fn render(&mut self, frame: &Frame<'_>) -> Result<()> {
        if self.gl.is_context_lost() {
            return Err(GalleryError::ContextUnavailable);
        }
        self.draw_scene(frame);
        self.draw_reveal(frame);
        Ok(())
    }

    fn release(&mut self) {
        for texture in self.textures.drain(..) {
            self.gl.delete_texture(Some(&texture));
        }
        self.canvas.remove();
    }
}

fn upload_f32(gl: &GL, target: u32, data: &[f32]) -> Result<WebGlBuffer> {
    let buffer = gl.create_buffer().ok_or(GalleryError::Resource("buffer"))?;
    gl.bind_buffer(target, Some(&buffer));
    // SAFETY: the view is consumed by buffer_data before any allocation.
    unsafe {
        let view = js_sys::Float32Array::view(data);
        gl.buffer_data_with_array_buffer_view(target, &view, GL::STATIC_DRAW);
    }
    Ok(buffer)
}

fn plane_mesh(gl: &GL, geometry: &PlaneGeometry) -> Result<Mesh> {
    let vao = gl.create_vertex_array().ok_or(GalleryError::Resource("vertex array"))?;
    gl.bind_vertex_array(Some(&vao));

    let vbo = upload_f32(gl, GL::ARRAY_BUFFER, &geometry.vertices)?;
    let stride = (STRIDE * 4) as i32;
    gl.enable_vertex_attrib_array(ATTR_POSITION);
    gl.vertex_attrib_pointer_with_i32(ATTR_POSITION, 3, GL::FLOAT, false, stride, 0);
    gl.enable_vertex_attrib_array(ATTR_UV);
    gl.vertex_attrib_pointer_with_i32(ATTR_UV, 2, GL::FLOAT, false, stride, 12);

    let ibo = gl.create_buffer().ok_or(GalleryError::Resource("buffer"))?;
    gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&ibo));
    // SAFETY: as above.
    unsafe {
        let view = js_sys::Uint16Array::view(&geometry.indices);
        gl.buffer_data_with_array_buffer_view(GL::ELEMENT_ARRAY_BUFFER, &view, GL::STATIC_DRAW);
    }

    gl.bind_vertex_array(None);
    Ok(Mesh {
        vao,
        _buffers: vec![vbo, ibo],
        count: geometry.index_count() as i32,
    })
}

fn screen_mesh(gl: &GL) -> Result<Mesh> {
    let vao = gl.create_vertex_array().ok_or(GalleryError::Resource("vertex array"))?;
    gl.bind_vertex_array(Some(&vao));
    let vbo = upload_f32(gl, GL::ARRAY_BUFFER, &FULLSCREEN_TRIANGLE)?;
    gl.enable_vertex_attrib_array(ATTR_POSITION);
    gl.vertex_attrib_pointer_with_i32(ATTR_POSITION, 2, GL::FLOAT, false, 0, 0);
    gl.bind_vertex_array(None);
    Ok(Mesh {
        vao,
        _buffers: vec![vbo],
        count: 3,
    })
}
