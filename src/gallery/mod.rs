// gallery/ - Planes mirrored from DOM elements
//
// Each layer re-projects its source element's bounding box every frame.
// The DOM layout is authoritative; a plane never moves on its own.

mod item;
mod layout;
mod stem;

pub use item::MeshItem;
pub use layout::{DepthLayer, ItemConfig, RotationDirection, image_source};
pub use stem::Stem;

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::config::Settings;
use crate::scroll::ScrollState;
use crate::viewport::Viewport;

/// Bounding client rect of a source element, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    /// Centre of the rect in world units: origin at the viewport centre, y up.
    pub fn world_center(&self, viewport: &Viewport) -> Vec2 {
        Vec2::new(
            self.left - viewport.width / 2.0 + self.width / 2.0,
            -self.top + viewport.height / 2.0 - self.height / 2.0,
        )
    }
}

/// Everything a layer reads while updating.
pub struct FrameContext<'a> {
    pub viewport: &'a Viewport,
    pub scroll: &'a ScrollState,
    pub settings: &'a Settings,
}

impl FrameContext<'_> {
    /// `uOffset` for the current scroll lag. Horizontal stays zero.
    pub fn distortion(&self) -> Vec2 {
        Vec2::new(0.0, -self.scroll.velocity() * self.settings.distortion_strength)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub scale: Vec3,
    pub rotation_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation_y: 0.0,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            Quat::from_rotation_y(self.rotation_y),
            self.position,
        )
    }
}

/// Per-plane shader inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneUniforms {
    /// Distortion strength.
    pub offset: Vec2,
    /// Opacity.
    pub alpha: f32,
    pub position: Vec3,
}

impl Default for PlaneUniforms {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            alpha: 1.0,
            position: Vec3::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Material {
    /// Scroll-bent plane with an RGB split.
    Distorted,
    /// Flat textured plane.
    Basic,
}

pub trait Layer {
    fn render(&mut self, rect: Rect, ctx: &FrameContext<'_>);
    fn transform(&self) -> &Transform;
    fn uniforms(&self) -> &PlaneUniforms;
    fn material(&self) -> Material;

    fn depth(&self) -> f32 {
        self.transform().position.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn world_center_is_viewport_relative() {
        let vp = Viewport::new(1000.0, 500.0, 1.0);
        // rect centred on screen
        assert_eq!(Rect::new(400.0, 200.0, 200.0, 100.0).world_center(&vp), Vec2::ZERO);
        // top-left corner box
        assert_eq!(
            Rect::new(0.0, 0.0, 100.0, 50.0).world_center(&vp),
            Vec2::new(-450.0, 225.0)
        );
    }

    #[test]
    fn distortion_is_vertical_only() {
        let vp = Viewport::new(800.0, 600.0, 1.0);
        let scroll = ScrollState { target: 200.0, current: 100.0, ease: 0.075 };
        let settings = Settings::default();
        let ctx = FrameContext { viewport: &vp, scroll: &scroll, settings: &settings };
        let d = ctx.distortion();
        assert_eq!(d.x, 0.0);
        assert!((d.y + 0.03).abs() < 1e-6);
    }

    #[test]
    fn transform_scales_then_translates() {
        let t = Transform {
            position: Vec3::new(10.0, -5.0, 2.0),
            scale: Vec3::new(200.0, 100.0, 1.0),
            rotation_y: 0.0,
        };
        let corner = t.matrix() * Vec4::new(0.5, 0.5, 0.0, 1.0);
        assert_eq!(corner, Vec4::new(110.0, 45.0, 2.0, 1.0));
    }
}
