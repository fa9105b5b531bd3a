// stem.rs - Decorative stem plane
//
// Same DOM re-projection as a gallery item but pinned at a fixed depth in
// front of the gallery stack, untilted and unscaled.

use glam::{Vec2, Vec3};

use super::{FrameContext, Layer, Material, PlaneUniforms, Rect, Transform};

pub struct Stem {
    depth: f32,
    offset: Vec2,
    size: Vec2,
    transform: Transform,
    uniforms: PlaneUniforms,
}

impl Stem {
    pub fn new(rect: Rect, ctx: &FrameContext<'_>) -> Self {
        let mut stem = Self {
            depth: ctx.settings.stem_depth,
            offset: Vec2::ZERO,
            size: Vec2::ZERO,
            transform: Transform::default(),
            uniforms: PlaneUniforms::default(),
        };
        stem.measure(rect, ctx);
        stem.place();
        stem
    }

    fn measure(&mut self, rect: Rect, ctx: &FrameContext<'_>) {
        self.size = Vec2::new(rect.width, rect.height);
        self.offset = rect.world_center(ctx.viewport);
    }

    fn place(&mut self) {
        self.transform.position = Vec3::new(self.offset.x, self.offset.y, self.depth);
        self.transform.scale = Vec3::new(self.size.x, self.size.y, 1.0);
    }
}

impl Layer for Stem {
    fn render(&mut self, rect: Rect, ctx: &FrameContext<'_>) {
        self.measure(rect, ctx);
        self.place();
        self.uniforms.offset = ctx.distortion();
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn uniforms(&self) -> &PlaneUniforms {
        &self.uniforms
    }

    fn material(&self) -> Material {
        Material::Basic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::scroll::ScrollState;
    use crate::viewport::Viewport;

    #[test]
    fn fixed_depth_no_scaling_no_tilt() {
        let vp = Viewport::new(1000.0, 500.0, 1.0);
        let scroll = ScrollState { target: 50.0, current: 0.0, ease: 0.075 };
        let settings = Settings::default();
        let ctx = FrameContext { viewport: &vp, scroll: &scroll, settings: &settings };

        let mut stem = Stem::new(Rect::new(0.0, 0.0, 40.0, 400.0), &ctx);
        stem.render(Rect::new(480.0, -500.0, 40.0, 400.0), &ctx);

        let t = stem.transform();
        assert_eq!(t.position, Vec3::new(0.0, 550.0, 3.0));
        assert_eq!(t.scale, Vec3::new(40.0, 400.0, 1.0));
        assert_eq!(t.rotation_y, 0.0);
        assert_eq!(stem.depth(), 3.0);
        assert_eq!(stem.material(), Material::Basic);
        assert!((stem.uniforms().offset.y + 0.015).abs() < 1e-6);
    }
}
