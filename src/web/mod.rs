// web/ - Browser wiring
//
// Builds the app from the document, hooks window events and drives frames
// from requestAnimationFrame until the cancel token is set.

mod page;

use page::DomPage;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, Event, EventTarget, HtmlCanvasElement, HtmlElement, HtmlImageElement, MouseEvent, WebGl2RenderingContext as GL, Window};

use crate::app::{App, Page};
use crate::config::Settings;
use crate::error::{GalleryError, Result};
use crate::gallery::{ItemConfig, image_source};
use crate::gl::GlCompositor;
use crate::run_loop::{CancelToken, LoopState, RunLoop};

struct State {
    app: App,
    page: DomPage,
    compositor: GlCompositor,
    run: RunLoop,
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// Handle on the self-rescheduling frame closure. The closure lives in
/// `slot` and captures a clone of it, so the cycle is only broken by `cancel`.
struct FrameLoop {
    window: Window,
    pending: Rc<Cell<Option<i32>>>,
    slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl FrameLoop {
    fn cancel(self) {
        if let Some(id) = self.pending.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
        match self.slot.try_borrow_mut() {
            Ok(mut slot) => drop(slot.take()),
            Err(_) => log::warn!("frame closure busy, not released"),
        }
    }
}

/// A running gallery. Dropping it stops the loop and restores the page.
pub struct Mounted {
    token: CancelToken,
    state: Rc<RefCell<State>>,
    listeners: Vec<Listener>,
    frame_loop: Option<FrameLoop>,
}

impl Mounted {
    pub fn stop(&mut self) {
        self.token.cancel();
        let Some(frame_loop) = self.frame_loop.take() else {
            return;
        };
        frame_loop.cancel();

        for l in self.listeners.drain(..) {
            if let Err(e) = l
                .target
                .remove_event_listener_with_callback(l.kind, l.closure.as_ref().unchecked_ref())
            {
                log::warn!("could not remove {} listener: {:?}", l.kind, e);
            }
        }

        match self.state.try_borrow_mut() {
            Ok(mut s) => {
                let State { app, page, compositor, .. } = &mut *s;
                app.teardown(page, compositor);
            }
            Err(_) => log::warn!("gallery state busy, page not restored"),
        }
        log::info!("gallery stopped after {} frames", self.frame_count());
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn frame_count(&self) -> u64 {
        self.state.try_borrow().map(|s| s.run.frames()).unwrap_or(0)
    }

    pub fn item_count(&self) -> usize {
        self.state.try_borrow().map(|s| s.app.slots().len()).unwrap_or(0)
    }
}

impl Drop for Mounted {
    fn drop(&mut self) {
        self.stop();
    }
}

pub fn mount(settings: Settings) -> Result<Mounted> {
    settings.validate()?;

    let window = web_sys::window().ok_or(GalleryError::NoWindow)?;
    let document = window.document().ok_or(GalleryError::NoDocument)?;
    let body = document.body().ok_or_else(|| GalleryError::MissingElement("body".into()))?;
    let scrollable: HtmlElement = query(&document, &settings.selectors.scrollable)?
        .dyn_into()
        .map_err(|_| GalleryError::MissingElement(settings.selectors.scrollable.clone()))?;
    let container = query(&document, &settings.selectors.container)?;

    let mut page = DomPage::new(window.clone(), body, scrollable);
    page.sync_scroll_height();
    let viewport = page.viewport();

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| GalleryError::Resource("canvas"))?;
    container.append_child(&canvas)?;
    let gl = context(&canvas)?;

    let mut app = App::new(settings.clone(), viewport)?;
    let mut compositor = GlCompositor::new(gl, canvas, &viewport, settings.plane_segments)?;

    let images = document.query_selector_all(&settings.selectors.gallery)?;
    for i in 0..images.length() {
        let Some(el) = images.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let Some(src) = image_src(&el) else {
            log::warn!("skipping gallery element {} without an image source", i);
            continue;
        };
        let config = ItemConfig::from_class_name(&el.class_name());
        let source = page.add_source(el);
        let Some(rect) = page.rect(source) else { continue };
        compositor.add_texture(&src)?;
        app.add_item(source, config, rect);
    }

    match document.get_element_by_id(&settings.selectors.stem_id) {
        Some(el) => match image_src(&el) {
            Some(src) => {
                let source = page.add_source(el);
                if let Some(rect) = page.rect(source) {
                    compositor.add_texture(&src)?;
                    app.add_stem(source, rect);
                }
            }
            None => log::warn!("#{} has no image source", settings.selectors.stem_id),
        },
        None => log::warn!("no #{} element, rendering without stem", settings.selectors.stem_id),
    }

    log::info!(
        "gallery mounted: {} layers, {}x{} @{}",
        app.slots().len(),
        viewport.width,
        viewport.height,
        viewport.pixel_ratio
    );

    let token = CancelToken::new();
    let state = Rc::new(RefCell::new(State {
        app,
        page,
        compositor,
        run: RunLoop::new(token.clone()),
    }));

    let mut listeners = Vec::new();

    let resize = {
        let state = state.clone();
        Closure::wrap(Box::new(move |_: Event| {
            let Ok(mut s) = state.try_borrow_mut() else { return };
            let State { app, page, compositor, .. } = &mut *s;
            if let Err(e) = app.resize(page, compositor) {
                log::error!("resize failed: {}", e);
            }
        }) as Box<dyn FnMut(Event)>)
    };
    listeners.push(listen(window.as_ref(), "resize", resize)?);

    let mousemove = {
        let state = state.clone();
        Closure::wrap(Box::new(move |e: Event| {
            let Some(e) = e.dyn_ref::<MouseEvent>() else { return };
            if let Ok(mut s) = state.try_borrow_mut() {
                s.app.pointer_moved(e.client_x() as f32, e.client_y() as f32);
            }
        }) as Box<dyn FnMut(Event)>)
    };
    listeners.push(listen(document.as_ref(), "mousemove", mousemove)?);

    let frame_loop = start_loop(window, state.clone())?;

    Ok(Mounted { token, state, listeners, frame_loop: Some(frame_loop) })
}

fn query(document: &Document, selector: &str) -> Result<Element> {
    document
        .query_selector(selector)?
        .ok_or_else(|| GalleryError::MissingElement(selector.to_owned()))
}

fn context(canvas: &HtmlCanvasElement) -> Result<GL> {
    let options = js_sys::Object::new();
    js_sys::Reflect::set(&options, &"antialias".into(), &true.into())?;
    js_sys::Reflect::set(&options, &"alpha".into(), &true.into())?;
    canvas
        .get_context_with_context_options("webgl2", &options)?
        .ok_or(GalleryError::ContextUnavailable)?
        .dyn_into::<GL>()
        .map_err(|_| GalleryError::ContextUnavailable)
}

fn image_src(el: &Element) -> Option<String> {
    let src = match el.dyn_ref::<HtmlImageElement>() {
        Some(img) => Some(img.src()),
        None => el.get_attribute("src"),
    };
    image_source([src, el.get_attribute("data-src")])
}

fn listen(target: &EventTarget, kind: &'static str, closure: Closure<dyn FnMut(Event)>) -> Result<Listener> {
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    Ok(Listener { target: target.clone(), kind, closure })
}

fn start_loop(window: Window, state: Rc<RefCell<State>>) -> Result<FrameLoop> {
    let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let pending = Rc::new(Cell::new(None));

    let f = slot.clone();
    let id = pending.clone();
    let win = window.clone();
    *slot.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        id.set(None);
        let next = match state.try_borrow_mut() {
            Ok(mut s) => {
                let State { app, page, compositor, run } = &mut *s;
                match run.tick(app, page, compositor) {
                    Ok(next) => next,
                    Err(e) if e.is_fatal() => {
                        log::error!("frame failed, stopping: {}", e);
                        LoopState::Stopped
                    }
                    Err(e) => {
                        log::error!("frame failed: {}", e);
                        if run.token().is_cancelled() { LoopState::Stopped } else { LoopState::Running }
                    }
                }
            }
            Err(_) => LoopState::Running,
        };

        if next == LoopState::Running {
            if let Some(cb) = f.borrow().as_ref() {
                match win.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(handle) => id.set(Some(handle)),
                    Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
                }
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(cb) = slot.borrow().as_ref() {
        pending.set(Some(window.request_animation_frame(cb.as_ref().unchecked_ref())?));
    }
    Ok(FrameLoop { window, pending, slot })
}
