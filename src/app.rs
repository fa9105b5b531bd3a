// app.rs - Gallery state and the per-frame pipeline
//
// All mutable state lives in `App`. The DOM and the GPU sit behind `Page` and
// `Compositor` so a frame can be stepped without a browser.
//
// Frame order:
//   1. ease scroll toward the native offset, translate the content
//   2. re-project every layer from its element's live rect
//   3. push the pointer into the reveal pass
//   4. composite

use crate::config::Settings;
use crate::error::Result;
use crate::gallery::{FrameContext, ItemConfig, Layer, MeshItem, Rect, Stem};
use crate::pointer::PointerState;
use crate::reveal::RevealPass;
use crate::scroll::ScrollState;
use crate::viewport::{Camera, Viewport};

/// Index of a source element known to the `Page`.
pub type SourceId = usize;

/// Read/write access to the document.
pub trait Page {
    fn viewport(&self) -> Viewport;
    fn scroll_y(&self) -> f32;
    /// Live bounding rect, or `None` if the element is gone.
    fn rect(&self, source: SourceId) -> Option<Rect>;
    fn translate_content(&mut self, transform: &str);
    /// Make the document as tall as the scrollable content.
    fn sync_scroll_height(&mut self);
    /// Drop the transform and height set above so native scrolling works again.
    fn reset(&mut self);
}

/// Draws a finished frame.
pub trait Compositor {
    fn resize(&mut self, viewport: &Viewport) -> Result<()>;
    fn render(&mut self, frame: &Frame<'_>) -> Result<()>;
    /// Take the drawing surface off the page and free GPU resources.
    fn release(&mut self);
}

pub struct Slot {
    pub source: SourceId,
    pub layer: Box<dyn Layer>,
}

pub struct Frame<'a> {
    pub camera: &'a Camera,
    pub reveal: &'a RevealPass,
    pub slots: &'a [Slot],
}

impl Frame<'_> {
    /// Slot indices back to front. Equal depths keep insertion order.
    pub fn draw_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.slots.len()).collect();
        order.sort_by(|&a, &b| {
            self.slots[a]
                .layer
                .depth()
                .total_cmp(&self.slots[b].layer.depth())
        });
        order
    }
}

pub struct App {
    settings: Settings,
    scroll: ScrollState,
    pointer: PointerState,
    viewport: Viewport,
    camera: Camera,
    reveal: RevealPass,
    slots: Vec<Slot>,
}

impl App {
    pub fn new(settings: Settings, viewport: Viewport) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            scroll: ScrollState::new(settings.ease),
            pointer: PointerState::default(),
            camera: Camera::new(&viewport, &settings),
            reveal: RevealPass::new(&viewport, settings.reveal),
            viewport,
            settings,
            slots: Vec::new(),
        })
    }

    fn context(&self) -> FrameContext<'_> {
        FrameContext {
            viewport: &self.viewport,
            scroll: &self.scroll,
            settings: &self.settings,
        }
    }

    pub fn add_item(&mut self, source: SourceId, config: ItemConfig, rect: Rect) -> usize {
        let item = MeshItem::new(config, rect, &self.context());
        self.push(source, Box::new(item))
    }

    pub fn add_stem(&mut self, source: SourceId, rect: Rect) -> usize {
        let stem = Stem::new(rect, &self.context());
        self.push(source, Box::new(stem))
    }

    fn push(&mut self, source: SourceId, layer: Box<dyn Layer>) -> usize {
        self.slots.push(Slot { source, layer });
        self.slots.len() - 1
    }

    pub fn pointer_moved(&mut self, client_x: f32, client_y: f32) {
        self.pointer = PointerState::from_client(client_x, client_y, &self.viewport);
    }

    pub fn resize<P: Page, C: Compositor>(&mut self, page: &mut P, compositor: &mut C) -> Result<()> {
        page.sync_scroll_height();
        self.viewport = page.viewport();
        self.camera.resize(&self.viewport);
        self.reveal.resize(&self.viewport);
        log::debug!(
            "resize {}x{} @{} fov {:.2}",
            self.viewport.width,
            self.viewport.height,
            self.viewport.pixel_ratio,
            self.camera.fov
        );
        compositor.resize(&self.viewport)
    }

    pub fn frame<P: Page, C: Compositor>(&mut self, page: &mut P, compositor: &mut C) -> Result<()> {
        self.scroll.update(page.scroll_y());
        page.translate_content(&self.scroll.transform());

        let ctx = FrameContext {
            viewport: &self.viewport,
            scroll: &self.scroll,
            settings: &self.settings,
        };
        for slot in self.slots.iter_mut() {
            match page.rect(slot.source) {
                Some(rect) => slot.layer.render(rect, &ctx),
                None => log::trace!("source {} has no rect, keeping last placement", slot.source),
            }
        }

        self.reveal.set_pointer(&self.pointer);

        compositor.render(&Frame {
            camera: &self.camera,
            reveal: &self.reveal,
            slots: &self.slots,
        })
    }

    /// Hand the page back in its native state. Layers are kept so counts
    /// stay readable after a stop.
    pub fn teardown<P: Page, C: Compositor>(&mut self, page: &mut P, compositor: &mut C) {
        page.reset();
        compositor.release();
        log::debug!("torn down {} layers", self.slots.len());
    }

    pub fn scroll(&self) -> &ScrollState { &self.scroll }
    pub fn pointer(&self) -> &PointerState { &self.pointer }
    pub fn viewport(&self) -> &Viewport { &self.viewport }
    pub fn camera(&self) -> &Camera { &self.camera }
    pub fn reveal(&self) -> &RevealPass { &self.reveal }
    pub fn slots(&self) -> &[Slot] { &self.slots }
}
