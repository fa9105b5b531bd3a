// Drives the gallery pipeline with an in-memory page and a recording
// compositor, one frame at a time.

use std::collections::HashMap;

use glam::{Vec2, Vec3};
use parallax_gallery::gallery::{ItemConfig, Material, Rect};
use parallax_gallery::viewport::Viewport;
use parallax_gallery::{App, CancelToken, Compositor, Frame, GalleryError, LoopState, Page, RunLoop, Settings, SourceId};

struct FakePage {
    viewport: Viewport,
    scroll_y: f32,
    content_height: f32,
    body_height: f32,
    // Document-space rects; `rect` shifts them by the eased offset.
    boxes: HashMap<SourceId, Rect>,
    translated: f32,
    transforms: Vec<String>,
    restored: bool,
}

impl FakePage {
    fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Viewport::new(width, height, 1.0),
            scroll_y: 0.0,
            content_height: 3000.0,
            body_height: 0.0,
            boxes: HashMap::new(),
            translated: 0.0,
            transforms: Vec::new(),
            restored: false,
        }
    }
}

impl Page for FakePage {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    fn rect(&self, source: SourceId) -> Option<Rect> {
        self.boxes.get(&source).map(|r| Rect { top: r.top - self.translated, ..*r })
    }

    fn translate_content(&mut self, transform: &str) {
        let px = transform
            .trim_start_matches("translate3d(0,")
            .split("px")
            .next()
            .and_then(|v| v.parse::<f32>().ok())
            .unwrap();
        self.translated = -px;
        self.transforms.push(transform.to_owned());
    }

    fn sync_scroll_height(&mut self) {
        self.body_height = self.content_height;
    }

    fn reset(&mut self) {
        self.translated = 0.0;
        self.body_height = 0.0;
        self.restored = true;
    }
}

#[derive(Default)]
struct Recorder {
    frames: Vec<Snapshot>,
    resized: Vec<(u32, u32)>,
    fail_next: Option<GalleryError>,
    released: bool,
}

struct Snapshot {
    order: Vec<usize>,
    positions: Vec<Vec3>,
    materials: Vec<Material>,
    mouse: Vec2,
    aspect: f32,
}

impl Compositor for Recorder {
    fn resize(&mut self, viewport: &Viewport) -> Result<(), GalleryError> {
        self.resized.push(viewport.buffer_size());
        Ok(())
    }

    fn render(&mut self, frame: &Frame<'_>) -> Result<(), GalleryError> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        self.frames.push(Snapshot {
            order: frame.draw_order(),
            positions: frame.slots.iter().map(|s| s.layer.transform().position).collect(),
            materials: frame.slots.iter().map(|s| s.layer.material()).collect(),
            mouse: frame.reveal.mouse,
            aspect: frame.camera.aspect,
        });
        Ok(())
    }

    fn release(&mut self) {
        self.released = true;
    }
}

fn gallery() -> (App, FakePage) {
    let mut page = FakePage::new(1000.0, 500.0);
    page.boxes.insert(0, Rect::new(100.0, 100.0, 300.0, 200.0));
    page.boxes.insert(1, Rect::new(500.0, 600.0, 300.0, 200.0));
    page.boxes.insert(2, Rect::new(480.0, 0.0, 40.0, 2000.0));
    page.boxes.insert(3, Rect::new(200.0, 900.0, 100.0, 100.0));

    let mut app = App::new(Settings::default(), page.viewport).unwrap();
    for (source, classes) in [(0, "mesh"), (1, "mesh static right"), (3, "mesh front")] {
        let rect = page.rect(source).unwrap();
        app.add_item(source, ItemConfig::from_class_name(classes), rect);
    }
    let stem_rect = page.rect(2).unwrap();
    app.add_stem(2, stem_rect);
    (app, page)
}

#[test]
fn steps_exact_frame_count() {
    let (mut app, mut page) = gallery();
    let mut rec = Recorder::default();
    let mut run = RunLoop::new(CancelToken::new());

    let ran = run.run_frames(10, &mut app, &mut page, &mut rec).unwrap();
    assert_eq!(ran, 10);
    assert_eq!(run.frames(), 10);
    assert_eq!(rec.frames.len(), 10);
    assert_eq!(page.transforms.len(), 10);
}

#[test]
fn scroll_eases_and_planes_follow() {
    let (mut app, mut page) = gallery();
    let mut rec = Recorder::default();
    let mut run = RunLoop::new(CancelToken::new());

    page.scroll_y = 400.0;
    run.run_frames(1, &mut app, &mut page, &mut rec).unwrap();
    assert!((app.scroll().current - 30.0).abs() < 1e-3);
    assert_eq!(app.scroll().target, 400.0);
    assert_eq!(page.transforms[0], format!("translate3d(0,{}px, 0)", -app.scroll().current));

    // item 0 started 100px from the top: centre y = -100 + 250 - 100
    let y0 = rec.frames[0].positions[0].y;
    assert!((y0 - (50.0 + app.scroll().current)).abs() < 1e-3);

    let mut prev = app.scroll().current;
    run.run_frames(300, &mut app, &mut page, &mut rec).unwrap();
    assert!(app.scroll().current > prev);
    assert!((app.scroll().current - 400.0).abs() < 1e-2);
    prev = rec.frames.last().unwrap().positions[0].y;
    assert!((prev - 450.0).abs() < 1e-1);
}

#[test]
fn cancel_stops_after_current_frame() {
    let (mut app, mut page) = gallery();
    let mut rec = Recorder::default();
    let token = CancelToken::new();
    let mut run = RunLoop::new(token.clone());

    assert_eq!(run.tick(&mut app, &mut page, &mut rec).unwrap(), LoopState::Running);
    token.cancel();
    assert_eq!(run.tick(&mut app, &mut page, &mut rec).unwrap(), LoopState::Stopped);
    assert_eq!(run.run_frames(5, &mut app, &mut page, &mut rec).unwrap(), 0);
    assert_eq!(rec.frames.len(), 1);
}

#[test]
fn draws_back_to_front_with_stem_over_gallery() {
    let (mut app, mut page) = gallery();
    let mut rec = Recorder::default();
    RunLoop::new(CancelToken::new())
        .run_frames(1, &mut app, &mut page, &mut rec)
        .unwrap();

    let snap = &rec.frames[0];
    // slots: 0 mid(-1), 1 static(-2), 2 front(8), 3 stem(3)
    assert_eq!(snap.positions.iter().map(|p| p.z).collect::<Vec<_>>(), vec![-1.0f32, -2.0, 8.0, 3.0]);
    assert_eq!(snap.order, vec![1, 0, 3, 2]);
    assert_eq!(snap.materials[3], Material::Basic);
    assert!(snap.materials[..3].iter().all(|m| *m == Material::Distorted));
}

#[test]
fn pointer_reaches_reveal_pass_each_frame() {
    let (mut app, mut page) = gallery();
    let mut rec = Recorder::default();
    let mut run = RunLoop::new(CancelToken::new());

    run.run_frames(1, &mut app, &mut page, &mut rec).unwrap();
    assert_eq!(rec.frames[0].mouse, Vec2::ZERO);

    app.pointer_moved(500.0, 250.0);
    run.run_frames(1, &mut app, &mut page, &mut rec).unwrap();
    assert_eq!(rec.frames[1].mouse, Vec2::new(0.5, 0.5));
    assert_eq!(app.pointer().as_vec2(), Vec2::new(0.5, 0.5));
    assert_eq!(app.reveal().resolution, Vec2::new(1.0, 0.5));
    assert!(app.reveal().mask(Vec2::new(0.5, 0.5)) > 0.0);
}

#[test]
fn resize_updates_camera_and_surface() {
    let (mut app, mut page) = gallery();
    let mut rec = Recorder::default();

    page.viewport = Viewport::new(640.0, 960.0, 2.0);
    page.content_height = 4200.0;
    app.resize(&mut page, &mut rec).unwrap();

    assert_eq!(app.camera().aspect, 640.0 / 960.0);
    assert_eq!(rec.resized, vec![(1280, 1920)]);
    assert_eq!(page.body_height, 4200.0);
    assert_eq!(app.reveal().resolution, Vec2::new(1.0, 1.5));

    RunLoop::new(CancelToken::new())
        .run_frames(1, &mut app, &mut page, &mut rec)
        .unwrap();
    assert_eq!(rec.frames[0].aspect, 640.0 / 960.0);
}

#[test]
fn missing_source_keeps_last_placement() {
    let (mut app, mut page) = gallery();
    let mut rec = Recorder::default();
    let mut run = RunLoop::new(CancelToken::new());

    run.run_frames(1, &mut app, &mut page, &mut rec).unwrap();
    let before = rec.frames[0].positions[3];

    page.boxes.remove(&2);
    page.scroll_y = 800.0;
    run.run_frames(3, &mut app, &mut page, &mut rec).unwrap();
    assert_eq!(rec.frames.len(), 4);
    assert_eq!(rec.frames[3].positions[3], before);
    assert_ne!(rec.frames[3].positions[0], rec.frames[0].positions[0]);
}

#[test]
fn render_error_surfaces_but_frame_is_counted() {
    let (mut app, mut page) = gallery();
    let mut rec = Recorder { fail_next: Some(GalleryError::Js("draw".into())), ..Recorder::default() };
    let mut run = RunLoop::new(CancelToken::new());

    assert!(matches!(run.tick(&mut app, &mut page, &mut rec), Err(GalleryError::Js(_))));
    assert_eq!(run.frames(), 1);
    assert_eq!(run.tick(&mut app, &mut page, &mut rec).unwrap(), LoopState::Running);
}

#[test]
fn context_loss_stops_the_loop() {
    let (mut app, mut page) = gallery();
    let mut rec = Recorder { fail_next: Some(GalleryError::ContextUnavailable), ..Recorder::default() };
    let token = CancelToken::new();
    let mut run = RunLoop::new(token.clone());

    assert!(matches!(
        run.tick(&mut app, &mut page, &mut rec),
        Err(GalleryError::ContextUnavailable)
    ));
    assert!(token.is_cancelled());
    assert_eq!(run.tick(&mut app, &mut page, &mut rec).unwrap(), LoopState::Stopped);
    assert_eq!(run.frames(), 1);
    assert!(rec.frames.is_empty());
}

#[test]
fn teardown_restores_the_page() {
    let (mut app, mut page) = gallery();
    let mut rec = Recorder::default();
    let token = CancelToken::new();
    let mut run = RunLoop::new(token.clone());

    app.resize(&mut page, &mut rec).unwrap();
    page.scroll_y = 600.0;
    run.run_frames(5, &mut app, &mut page, &mut rec).unwrap();
    assert!(page.translated > 0.0);
    assert_eq!(page.body_height, 3000.0);

    token.cancel();
    app.teardown(&mut page, &mut rec);
    assert!(page.restored);
    assert_eq!(page.translated, 0.0);
    assert_eq!(page.body_height, 0.0);
    assert!(rec.released);
    assert_eq!(app.slots().len(), 4);
    assert_eq!(run.run_frames(1, &mut app, &mut page, &mut rec).unwrap(), 0);
}

#[test]
fn invalid_settings_are_rejected() {
    let settings = Settings { ease: 0.0, ..Settings::default() };
    assert!(matches!(
        App::new(settings, Viewport::new(800.0, 600.0, 1.0)),
        Err(GalleryError::InvalidSetting(_))
    ));
}
