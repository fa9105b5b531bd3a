// pointer.rs - Normalised pointer position
//
// Stored in UV space: x grows to the right, y grows upward, both in [0, 1]
// across the window.

use glam::Vec2;

use crate::viewport::Viewport;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

impl PointerState {
    /// From `clientX`/`clientY` of a mouse event.
    pub fn from_client(client_x: f32, client_y: f32, viewport: &Viewport) -> Self {
        Self {
            x: client_x / viewport.width,
            y: 1.0 - client_y / viewport.height,
        }
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flips_vertical_axis() {
        let vp = Viewport::new(1000.0, 500.0, 1.0);
        assert_eq!(PointerState::from_client(0.0, 0.0, &vp), PointerState { x: 0.0, y: 1.0 });
        assert_eq!(PointerState::from_client(500.0, 250.0, &vp), PointerState { x: 0.5, y: 0.5 });
        assert_eq!(PointerState::from_client(1000.0, 500.0, &vp), PointerState { x: 1.0, y: 0.0 });
    }
}
