// target.rs - Offscreen colour + depth target for the scene pass

use web_sys::{WebGl2RenderingContext as GL, WebGlFramebuffer, WebGlRenderbuffer, WebGlTexture};

use crate::error::{GalleryError, Result};

pub struct RenderTarget {
    framebuffer: WebGlFramebuffer,
    color: WebGlTexture,
    depth: WebGlRenderbuffer,
    width: u32,
    height: u32,
}

impl RenderTarget {
    pub fn new(gl: &GL, width: u32, height: u32) -> Result<Self> {
        let framebuffer = gl.create_framebuffer().ok_or(GalleryError::Resource("framebuffer"))?;
        let color = gl.create_texture().ok_or(GalleryError::Resource("target texture"))?;
        let depth = gl.create_renderbuffer().ok_or(GalleryError::Resource("renderbuffer"))?;

        let mut target = Self { framebuffer, color, depth, width: 0, height: 0 };
        target.resize(gl, width, height)?;
        Ok(target)
    }

    pub fn resize(&mut self, gl: &GL, width: u32, height: u32) -> Result<()> {
        if self.width == width && self.height == height {
            return Ok(());
        }
        self.width = width;
        self.height = height;

        gl.bind_texture(GL::TEXTURE_2D, Some(&self.color));
        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0,
            GL::RGBA as i32,
            width as i32,
            height as i32,
            0,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            None,
        )?;
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);

        gl.bind_renderbuffer(GL::RENDERBUFFER, Some(&self.depth));
        gl.renderbuffer_storage(GL::RENDERBUFFER, GL::DEPTH_COMPONENT16, width as i32, height as i32);

        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.framebuffer));
        gl.framebuffer_texture_2d(GL::FRAMEBUFFER, GL::COLOR_ATTACHMENT0, GL::TEXTURE_2D, Some(&self.color), 0);
        gl.framebuffer_renderbuffer(GL::FRAMEBUFFER, GL::DEPTH_ATTACHMENT, GL::RENDERBUFFER, Some(&self.depth));
        let status = gl.check_framebuffer_status(GL::FRAMEBUFFER);
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);

        if status != GL::FRAMEBUFFER_COMPLETE {
            return Err(GalleryError::Resource("complete framebuffer"));
        }
        Ok(())
    }

    pub fn bind(&self, gl: &GL) {
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.framebuffer));
        gl.viewport(0, 0, self.width as i32, self.height as i32);
    }

    pub fn texture(&self) -> &WebGlTexture {
        &self.color
    }
}
