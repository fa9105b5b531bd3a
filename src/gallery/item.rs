// item.rs - Gallery image plane
//
// Depth pushes the plane toward or away from the camera and the size is
// compensated by (1 - depth / perspective), so background items grow and
// foreground items shrink relative to their DOM box.

use glam::{Vec2, Vec3};

use super::{FrameContext, ItemConfig, Layer, Material, PlaneUniforms, Rect, Transform};

pub struct MeshItem {
    config: ItemConfig,
    offset: Vec2,
    size: Vec2,
    transform: Transform,
    uniforms: PlaneUniforms,
}

impl MeshItem {
    pub fn new(config: ItemConfig, rect: Rect, ctx: &FrameContext<'_>) -> Self {
        let mut item = Self {
            config,
            offset: Vec2::ZERO,
            size: Vec2::ZERO,
            transform: Transform::default(),
            uniforms: PlaneUniforms::default(),
        };
        item.measure(rect, ctx);
        item.place();
        item
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    fn measure(&mut self, rect: Rect, ctx: &FrameContext<'_>) {
        let k = 1.0 - self.config.depth() / ctx.settings.perspective;
        self.size = Vec2::new(rect.width * k, rect.height * k);
        self.offset = rect.world_center(ctx.viewport);
    }

    fn place(&mut self) {
        self.transform.position = Vec3::new(self.offset.x, self.offset.y, self.config.depth());
        self.transform.scale = Vec3::new(self.size.x, self.size.y, 1.0);
    }
}

impl Layer for MeshItem {
    fn render(&mut self, rect: Rect, ctx: &FrameContext<'_>) {
        self.measure(rect, ctx);
        // Tilt follows last frame's height, before the new position lands.
        self.transform.rotation_y =
            self.config.rotation.sign() * self.transform.position.y * ctx.settings.tilt_factor;
        self.place();
        self.uniforms.offset = ctx.distortion();
        self.uniforms.position = self.transform.position;
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn uniforms(&self) -> &PlaneUniforms {
        &self.uniforms
    }

    fn material(&self) -> Material {
        Material::Distorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::scroll::ScrollState;
    use crate::viewport::Viewport;

    fn with_ctx<R>(scroll: ScrollState, f: impl FnOnce(&FrameContext<'_>) -> R) -> R {
        let vp = Viewport::new(1000.0, 500.0, 1.0);
        let settings = Settings::default();
        let ctx = FrameContext { viewport: &vp, scroll: &scroll, settings: &settings };
        f(&ctx)
    }

    #[test]
    fn depth_scales_size() {
        let rect = Rect::new(100.0, 100.0, 300.0, 200.0);
        with_ctx(ScrollState::default(), |ctx| {
            let back = MeshItem::new(ItemConfig::from_class_name("static"), rect, ctx);
            assert!((back.size().x - 360.0).abs() < 1e-3);
            assert!((back.size().y - 240.0).abs() < 1e-3);

            let base = MeshItem::new(ItemConfig::from_class_name(""), rect, ctx);
            assert!((base.size().x - 330.0).abs() < 1e-3);

            let front = MeshItem::new(ItemConfig::from_class_name("front"), rect, ctx);
            assert!((front.size().x - 60.0).abs() < 1e-3);
            assert!((front.size().y - 40.0).abs() < 1e-3);
        });
    }

    #[test]
    fn placement_follows_rect() {
        with_ctx(ScrollState::default(), |ctx| {
            let mut item = MeshItem::new(ItemConfig::default(), Rect::new(0.0, 0.0, 100.0, 100.0), ctx);
            item.render(Rect::new(450.0, 200.0, 100.0, 100.0), ctx);
            let t = item.transform();
            assert_eq!(t.position, Vec3::new(0.0, 0.0, -1.0));
            assert!((t.scale.x - 110.0).abs() < 1e-3);
            assert_eq!(t.scale.z, 1.0);
            assert_eq!(item.uniforms().position, t.position);
        });
    }

    #[test]
    fn tilt_uses_previous_height() {
        with_ctx(ScrollState::default(), |ctx| {
            // starts 200 units above centre
            let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
            let mut left = MeshItem::new(ItemConfig::from_class_name(""), rect, ctx);
            let mut right = MeshItem::new(ItemConfig::from_class_name("right"), rect, ctx);
            let y0 = left.transform().position.y;
            assert_eq!(y0, 200.0);

            let moved = Rect::new(0.0, 300.0, 100.0, 100.0);
            left.render(moved, ctx);
            right.render(moved, ctx);
            assert!((left.transform().rotation_y + 200.0 * 1e-5).abs() < 1e-7);
            assert!((right.transform().rotation_y - 200.0 * 1e-5).abs() < 1e-7);

            left.render(moved, ctx);
            assert!((left.transform().rotation_y - 100.0 * 1e-5).abs() < 1e-7);
        });
    }

    #[test]
    fn scroll_lag_bends_vertically() {
        let scroll = ScrollState { target: 1000.0, current: 900.0, ease: 0.075 };
        with_ctx(scroll, |ctx| {
            let mut item = MeshItem::new(ItemConfig::default(), Rect::default(), ctx);
            item.render(Rect::default(), ctx);
            assert_eq!(item.uniforms().offset.x, 0.0);
            assert!((item.uniforms().offset.y + 0.03).abs() < 1e-6);
            assert_eq!(item.uniforms().alpha, 1.0);
        });
    }
}
