// config.rs - Tunable constants and DOM selectors
//
// Everything the gallery reads at mount time lives here so the JS side can
// override it through `GalleryOptions` before anything is built.

use crate::error::GalleryError;

// Scroll easing
pub const EASE: f32 = 0.075;

// Camera
pub const PERSPECTIVE: f32 = 10.0;
pub const NEAR: f32 = 1.0;
pub const FAR: f32 = 1000.0;

// Planes
pub const DISTORTION_STRENGTH: f32 = 0.0003;
pub const TILT_FACTOR: f32 = 1e-5;
pub const STEM_DEPTH: f32 = 3.0;
pub const PLANE_SEGMENTS: u32 = 100;

// Reveal
pub const REVEAL_RADIUS: f32 = 0.0;
pub const REVEAL_BORDER: f32 = 0.2;
pub const CHANNEL_SHIFT: [f32; 3] = [0.05, 0.0525, 0.055];

#[derive(Clone, Debug, PartialEq)]
pub struct Selectors {
    pub scrollable: String,
    pub container: String,
    pub gallery: String,
    pub stem_id: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            scrollable: ".scrollable".into(),
            container: "main".into(),
            gallery: ".mesh".into(),
            stem_id: "stem".into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealSettings {
    pub radius: f32,
    pub border: f32,
    pub channel_shift: [f32; 3],
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            radius: REVEAL_RADIUS,
            border: REVEAL_BORDER,
            channel_shift: CHANNEL_SHIFT,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub ease: f32,
    pub perspective: f32,
    pub near: f32,
    pub far: f32,
    pub distortion_strength: f32,
    pub tilt_factor: f32,
    pub stem_depth: f32,
    pub plane_segments: u32,
    pub reveal: RevealSettings,
    pub selectors: Selectors,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ease: EASE,
            perspective: PERSPECTIVE,
            near: NEAR,
            far: FAR,
            distortion_strength: DISTORTION_STRENGTH,
            tilt_factor: TILT_FACTOR,
            stem_depth: STEM_DEPTH,
            plane_segments: PLANE_SEGMENTS,
            reveal: RevealSettings::default(),
            selectors: Selectors::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), GalleryError> {
        if !(self.ease > 0.0 && self.ease <= 1.0) {
            return Err(GalleryError::InvalidSetting(format!(
                "ease must be in (0, 1], got {}",
                self.ease
            )));
        }
        if !(self.perspective > 0.0) {
            return Err(GalleryError::InvalidSetting(format!(
                "perspective must be positive, got {}",
                self.perspective
            )));
        }
        if !(self.near > 0.0 && self.near < self.far) {
            return Err(GalleryError::InvalidSetting(format!(
                "clip planes must satisfy 0 < near < far, got {}..{}",
                self.near, self.far
            )));
        }
        if self.plane_segments == 0 || self.plane_segments > 255 {
            // (segments + 1)^2 vertices must stay addressable by u16 indices
            return Err(GalleryError::InvalidSetting(format!(
                "plane segments must be in 1..=255, got {}",
                self.plane_segments
            )));
        }
        if !(self.reveal.border > 0.0) {
            return Err(GalleryError::InvalidSetting(format!(
                "reveal border must be positive, got {}",
                self.reveal.border
            )));
        }
        Ok(())
    }
}
