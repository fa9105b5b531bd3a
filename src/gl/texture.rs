// texture.rs - Image textures loaded from element sources
//
// A texture starts as a single transparent texel and is filled in when the
// image finishes loading. A failed load leaves the placeholder in place.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{HtmlImageElement, WebGl2RenderingContext as GL, WebGlTexture};

use crate::error::{GalleryError, Result};

const PLACEHOLDER: [u8; 4] = [0, 0, 0, 0];

pub fn load(gl: &GL, src: &str) -> Result<WebGlTexture> {
    let texture = gl.create_texture().ok_or(GalleryError::Resource("texture"))?;
    gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
    gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        1,
        1,
        0,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        Some(&PLACEHOLDER[..]),
    )?;
    set_params(gl, false);

    let image = HtmlImageElement::new()?;
    image.set_cross_origin(Some("anonymous"));

    let onload = {
        let gl = gl.clone();
        let texture = texture.clone();
        let image = image.clone();
        let src = src.to_owned();
        Closure::once_into_js(move || {
            if let Err(e) = upload(&gl, &texture, &image) {
                log::warn!("texture upload failed for {}: {:?}", src, e);
            }
        })
    };
    let onerror = {
        let src = src.to_owned();
        Closure::once_into_js(move || {
            log::warn!("could not load image {}", src);
        })
    };
    image.set_onload(Some(onload.unchecked_ref()));
    image.set_onerror(Some(onerror.unchecked_ref()));
    image.set_src(src);

    Ok(texture)
}

fn upload(gl: &GL, texture: &WebGlTexture, image: &HtmlImageElement) -> std::result::Result<(), wasm_bindgen::JsValue> {
    gl.bind_texture(GL::TEXTURE_2D, Some(texture));
    // Image rows start at the top; uv v=1 is the top of the plane.
    gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 1);
    gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        image,
    )?;
    gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 0);
    gl.generate_mipmap(GL::TEXTURE_2D);
    set_params(gl, true);
    log::debug!("texture ready {}x{}", image.natural_width(), image.natural_height());
    Ok(())
}

fn set_params(gl: &GL, mipmapped: bool) {
    let min = if mipmapped { GL::LINEAR_MIPMAP_LINEAR } else { GL::LINEAR };
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, min as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
}
