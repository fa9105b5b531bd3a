// program.rs - Shader program with cached uniform locations

use web_sys::{WebGl2RenderingContext as GL, WebGlProgram, WebGlShader, WebGlUniformLocation};

use crate::error::{GalleryError, Result};

pub const ATTR_POSITION: u32 = 0;
pub const ATTR_UV: u32 = 1;

pub struct Program {
    program: WebGlProgram,
    uniforms: Vec<(&'static str, Option<WebGlUniformLocation>)>,
}

impl Program {
    pub fn new(gl: &GL, vert_src: &str, frag_src: &str, uniforms: &[&'static str]) -> Result<Self> {
        let program = link_program(gl, vert_src, frag_src)?;
        // Unused uniforms are stripped by the driver and come back as None.
        let uniforms = uniforms
            .iter()
            .map(|&name| (name, gl.get_uniform_location(&program, name)))
            .collect();
        Ok(Self { program, uniforms })
    }

    pub fn bind(&self, gl: &GL) {
        gl.use_program(Some(&self.program));
    }

    pub fn loc(&self, name: &str) -> Option<&WebGlUniformLocation> {
        self.uniforms
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, loc)| loc.as_ref())
    }
}

fn compile_shader(gl: &GL, src: &str, shader_type: u32) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or(GalleryError::Resource("shader"))?;
    gl.shader_source(&shader, src);
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
        Err(GalleryError::Shader(log))
    }
}

fn link_program(gl: &GL, vert_src: &str, frag_src: &str) -> Result<WebGlProgram> {
    let vert = compile_shader(gl, vert_src, GL::VERTEX_SHADER)?;
    let frag = compile_shader(gl, frag_src, GL::FRAGMENT_SHADER)?;
    let prog = gl.create_program().ok_or(GalleryError::Resource("program"))?;
    gl.attach_shader(&prog, &vert);
    gl.attach_shader(&prog, &frag);
    gl.bind_attrib_location(&prog, ATTR_POSITION, "position");
    gl.bind_attrib_location(&prog, ATTR_UV, "uv");
    gl.link_program(&prog);

    // Shaders are owned by the program once linked.
    gl.delete_shader(Some(&vert));
    gl.delete_shader(Some(&frag));

    let ok = gl
        .get_program_parameter(&prog, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(prog)
    } else {
        let log = gl.get_program_info_log(&prog).unwrap_or_default();
        gl.delete_program(Some(&prog));
        Err(GalleryError::Link(log))
    }
}
