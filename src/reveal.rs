// reveal.rs - Pointer reveal post-process
//
// Full-screen pass over the rendered scene. A soft dot centred on the pointer
// pushes the sample UV for each colour channel a little further than the
// previous one, which splits the channels into a chromatic ripple.
//
// `mask` and `channel_offsets` mirror `shaders/reveal.frag` one-to-one.

use glam::Vec2;

use crate::config::RevealSettings;
use crate::pointer::PointerState;
use crate::viewport::Viewport;

pub const VERTEX_SHADER: &str = include_str!("shaders/reveal.vert");
pub const FRAGMENT_SHADER: &str = include_str!("shaders/reveal.frag");

/// GLSL `smoothstep`, including the reversed-edge form the pass relies on.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealPass {
    pub resolution: Vec2,
    pub mouse: Vec2,
    // Scroll-driven strength; the shader declares it but nothing drives it yet.
    pub velocity: f32,
    pub settings: RevealSettings,
}

impl RevealPass {
    pub fn new(viewport: &Viewport, settings: RevealSettings) -> Self {
        let mut pass = Self {
            resolution: Vec2::ONE,
            mouse: Vec2::ZERO,
            velocity: 0.0,
            settings,
        };
        pass.resize(viewport);
        pass
    }

    pub fn resize(&mut self, viewport: &Viewport) {
        self.resolution = Vec2::new(1.0, viewport.height / viewport.width);
    }

    pub fn set_pointer(&mut self, pointer: &PointerState) {
        self.mouse = pointer.as_vec2();
    }

    /// Falloff at `uv`: peaks at the pointer and reaches 0 at
    /// `radius + border` in resolution-scaled units.
    pub fn mask(&self, uv: Vec2) -> f32 {
        let d = ((uv - self.mouse) * self.resolution).length();
        let RevealSettings { radius, border, .. } = self.settings;
        smoothstep(radius + border, radius - border, d)
    }

    /// UV shift applied to the red, green and blue samples for mask `c`.
    /// Each channel continues from the previous one's shifted UV.
    pub fn channel_offsets(&self, c: f32) -> [f32; 3] {
        let [r, g, b] = self.settings.channel_shift;
        [c * r, c * (r + g), c * (r + g + b)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass(w: f32, h: f32) -> RevealPass {
        RevealPass::new(&Viewport::new(w, h, 1.0), RevealSettings::default())
    }

    #[test]
    fn resolution_is_height_over_width() {
        assert_eq!(pass(1000.0, 500.0).resolution, Vec2::new(1.0, 0.5));

        let mut p = pass(1000.0, 500.0);
        p.resize(&Viewport::new(400.0, 800.0, 1.0));
        assert_eq!(p.resolution, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn mask_peaks_at_pointer() {
        let mut p = pass(1000.0, 500.0);
        p.set_pointer(&PointerState { x: 0.5, y: 0.5 });
        let peak = p.mask(Vec2::new(0.5, 0.5));
        // smoothstep(0.2, -0.2, 0) sits halfway between its edges
        assert!((peak - 0.5).abs() < 1e-6);
        for uv in [Vec2::new(0.55, 0.5), Vec2::new(0.5, 0.6), Vec2::new(0.4, 0.45)] {
            assert!(p.mask(uv) < peak);
        }
    }

    #[test]
    fn mask_vanishes_beyond_border() {
        let mut p = pass(1000.0, 500.0);
        p.set_pointer(&PointerState { x: 0.5, y: 0.5 });
        assert_eq!(p.mask(Vec2::new(0.71, 0.5)), 0.0);
        assert_eq!(p.mask(Vec2::new(0.9, 0.5)), 0.0);
        assert_eq!(p.mask(Vec2::new(0.0, 0.0)), 0.0);
        assert!(p.mask(Vec2::new(0.69, 0.5)) > 0.0);
    }

    #[test]
    fn vertical_reach_is_scaled_by_resolution() {
        let mut p = pass(1000.0, 500.0);
        p.set_pointer(&PointerState { x: 0.5, y: 0.5 });
        // 0.3 in v is 0.15 after scaling by 0.5, still inside the border
        assert!(p.mask(Vec2::new(0.5, 0.8)) > 0.0);
        assert_eq!(p.mask(Vec2::new(0.5, 0.91)), 0.0);
    }

    #[test]
    fn channel_offsets_accumulate() {
        let p = pass(1000.0, 500.0);
        let [r, g, b] = p.channel_offsets(0.5);
        assert!((r - 0.025).abs() < 1e-6);
        assert!((g - 0.05125).abs() < 1e-6);
        assert!((b - 0.07875).abs() < 1e-6);
        assert_eq!(p.channel_offsets(0.0), [0.0; 3]);
    }
}
