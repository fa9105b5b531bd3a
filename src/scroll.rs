// scroll.rs - Eased smooth scroll
//
// The native scroll offset is the target; the rendered offset chases it a
// fixed fraction per frame. The page content is translated by the eased value
// so visual scroll is decoupled from native scroll.

use crate::config::EASE;

#[inline]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start * (1.0 - t) + end * t
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollState {
    pub target: f32,
    pub current: f32,
    pub ease: f32,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new(EASE)
    }
}

impl ScrollState {
    pub fn new(ease: f32) -> Self {
        Self { target: 0.0, current: 0.0, ease }
    }

    /// Advance one frame toward `scroll_y`. Returns the eased offset.
    pub fn update(&mut self, scroll_y: f32) -> f32 {
        self.target = scroll_y;
        self.current = lerp(self.current, self.target, self.ease);
        self.current
    }

    /// How far the eased offset lags behind the native one.
    #[inline]
    pub fn velocity(&self) -> f32 {
        self.target - self.current
    }

    /// CSS transform applied to the scrollable container.
    pub fn transform(&self) -> String {
        format!("translate3d(0,{}px, 0)", -self.current)
    }
}
