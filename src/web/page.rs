// page.rs - `Page` over the live document

use web_sys::{Element, HtmlElement, Window};

use crate::app::{Page, SourceId};
use crate::gallery::Rect;
use crate::viewport::Viewport;

pub struct DomPage {
    window: Window,
    body: HtmlElement,
    scrollable: HtmlElement,
    sources: Vec<Element>,
}

impl DomPage {
    pub fn new(window: Window, body: HtmlElement, scrollable: HtmlElement) -> Self {
        Self { window, body, scrollable, sources: Vec::new() }
    }

    pub fn add_source(&mut self, element: Element) -> SourceId {
        self.sources.push(element);
        self.sources.len() - 1
    }
}

pub fn window_viewport(window: &Window) -> Viewport {
    let dim = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(1.0).max(1.0) as f32
    };
    Viewport::new(
        dim(window.inner_width()),
        dim(window.inner_height()),
        window.device_pixel_ratio() as f32,
    )
}

impl Page for DomPage {
    fn viewport(&self) -> Viewport {
        window_viewport(&self.window)
    }

    fn scroll_y(&self) -> f32 {
        self.window.scroll_y().unwrap_or(0.0) as f32
    }

    fn rect(&self, source: SourceId) -> Option<Rect> {
        let el = self.sources.get(source)?;
        if !el.is_connected() {
            return None;
        }
        let r = el.get_bounding_client_rect();
        Some(Rect::new(r.left() as f32, r.top() as f32, r.width() as f32, r.height() as f32))
    }

    fn translate_content(&mut self, transform: &str) {
        if let Err(e) = self.scrollable.style().set_property("transform", transform) {
            log::warn!("could not set scroll transform: {:?}", e);
        }
    }

    fn sync_scroll_height(&mut self) {
        let height = self.scrollable.get_bounding_client_rect().height();
        if let Err(e) = self.body.style().set_property("height", &format!("{}px", height)) {
            log::warn!("could not set body height: {:?}", e);
        }
    }

    fn reset(&mut self) {
        if let Err(e) = self.scrollable.style().remove_property("transform") {
            log::warn!("could not clear scroll transform: {:?}", e);
        }
        if let Err(e) = self.body.style().remove_property("height") {
            log::warn!("could not clear body height: {:?}", e);
        }
    }
}
