use wasm_bindgen::prelude::*;

// ============================================================================
// PARALLAX GALLERY - DOM images re-projected onto WebGL planes
// ============================================================================

pub mod app;
pub mod config;
pub mod error;
pub mod gallery;
pub mod geometry;
pub mod pointer;
pub mod reveal;
pub mod run_loop;
pub mod scroll;
pub mod viewport;

#[cfg(target_arch = "wasm32")]
mod gl;
#[cfg(target_arch = "wasm32")]
mod web;

pub use app::{App, Compositor, Frame, Page, SourceId};
pub use config::Settings;
pub use error::GalleryError;
pub use run_loop::{CancelToken, LoopState, RunLoop};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

/// Mount-time overrides. Anything left unset keeps its default.
#[wasm_bindgen]
#[derive(Clone, Debug, Default)]
pub struct GalleryOptions {
    settings: Settings,
}

#[wasm_bindgen]
impl GalleryOptions {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    #[wasm_bindgen(js_name = setEase)]
    pub fn set_ease(&mut self, ease: f32) { self.settings.ease = ease; }

    #[wasm_bindgen(js_name = setPerspective)]
    pub fn set_perspective(&mut self, perspective: f32) { self.settings.perspective = perspective; }

    #[wasm_bindgen(js_name = setDistortion)]
    pub fn set_distortion(&mut self, strength: f32) { self.settings.distortion_strength = strength; }

    #[wasm_bindgen(js_name = setTilt)]
    pub fn set_tilt(&mut self, factor: f32) { self.settings.tilt_factor = factor; }

    #[wasm_bindgen(js_name = setRevealRadius)]
    pub fn set_reveal_radius(&mut self, radius: f32) { self.settings.reveal.radius = radius; }

    #[wasm_bindgen(js_name = setRevealBorder)]
    pub fn set_reveal_border(&mut self, border: f32) { self.settings.reveal.border = border; }

    #[wasm_bindgen(js_name = setScrollable)]
    pub fn set_scrollable(&mut self, selector: String) { self.settings.selectors.scrollable = selector; }

    #[wasm_bindgen(js_name = setContainer)]
    pub fn set_container(&mut self, selector: String) { self.settings.selectors.container = selector; }

    #[wasm_bindgen(js_name = setGallery)]
    pub fn set_gallery(&mut self, selector: String) { self.settings.selectors.gallery = selector; }

    #[wasm_bindgen(js_name = setStem)]
    pub fn set_stem(&mut self, id: String) { self.settings.selectors.stem_id = id; }
}

impl GalleryOptions {
    pub fn into_settings(self) -> Settings {
        self.settings
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct ParallaxGallery {
    inner: web::Mounted,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl ParallaxGallery {
    pub fn mount(options: Option<GalleryOptions>) -> Result<ParallaxGallery, JsValue> {
        let settings = options.map(GalleryOptions::into_settings).unwrap_or_default();
        let inner = web::mount(settings)?;
        Ok(Self { inner })
    }

    pub fn stop(&mut self) {
        self.inner.stop();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool { self.inner.is_running() }

    #[wasm_bindgen(js_name = frameCount)]
    pub fn frame_count(&self) -> f64 { self.inner.frame_count() as f64 }

    #[wasm_bindgen(js_name = itemCount)]
    pub fn item_count(&self) -> usize { self.inner.item_count() }
}
