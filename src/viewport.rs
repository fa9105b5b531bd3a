// viewport.rs - Window dimensions and the pixel-aligned camera
//
// The camera sits `perspective` units in front of the z=0 plane with a fov
// chosen so one world unit at z=0 is exactly one CSS pixel.

use glam::{Mat4, Vec3};

use crate::config::Settings;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub aspect_ratio: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            aspect_ratio: width / height,
            pixel_ratio,
        }
    }

    /// Drawing buffer size in device pixels.
    pub fn buffer_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round().max(1.0) as u32,
            (self.height * self.pixel_ratio).round().max(1.0) as u32,
        )
    }
}

/// Vertical field of view, in degrees, that maps `height` pixels onto the
/// plane `perspective` units away.
pub fn fov_for(height: f32, perspective: f32) -> f32 {
    (2.0 * (height / 2.0 / perspective).atan()).to_degrees()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub z: f32,
}

impl Camera {
    pub fn new(viewport: &Viewport, settings: &Settings) -> Self {
        Self {
            fov: fov_for(viewport.height, settings.perspective),
            aspect: viewport.aspect_ratio,
            near: settings.near,
            far: settings.far,
            z: settings.perspective,
        }
    }

    pub fn resize(&mut self, viewport: &Viewport) {
        self.fov = fov_for(viewport.height, self.z);
        self.aspect = viewport.aspect_ratio;
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.z))
    }
}
