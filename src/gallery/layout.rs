// layout.rs - Per-item placement config
//
// Resolved once at mount from the element's class list. Depth and rotation
// are independent: `front` wins over `static`, `right` only flips the tilt.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DepthLayer {
    /// Behind the base plane (`static`).
    Background,
    #[default]
    Midground,
    /// In front of the camera plane (`front`).
    Foreground,
}

impl DepthLayer {
    pub fn depth(self) -> f32 {
        match self {
            DepthLayer::Background => -2.0,
            DepthLayer::Midground => -1.0,
            DepthLayer::Foreground => 8.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RotationDirection {
    #[default]
    Left,
    Right,
}

impl RotationDirection {
    pub fn sign(self) -> f32 {
        match self {
            RotationDirection::Left => -1.0,
            RotationDirection::Right => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemConfig {
    pub depth_layer: DepthLayer,
    pub rotation: RotationDirection,
}

impl ItemConfig {
    pub fn from_classes<'a>(classes: impl IntoIterator<Item = &'a str>) -> Self {
        let mut front = false;
        let mut back = false;
        let mut rotation = RotationDirection::Left;

        for class in classes {
            match class {
                "front" => front = true,
                "static" | "staticimg" => back = true,
                "right" => rotation = RotationDirection::Right,
                _ => {}
            }
        }

        let depth_layer = if front {
            DepthLayer::Foreground
        } else if back {
            DepthLayer::Background
        } else {
            DepthLayer::Midground
        };

        Self { depth_layer, rotation }
    }

    /// From a raw `class` attribute.
    pub fn from_class_name(class_name: &str) -> Self {
        Self::from_classes(class_name.split_whitespace())
    }

    #[inline]
    pub fn depth(&self) -> f32 {
        self.depth_layer.depth()
    }
}

/// First usable image URL among an element's candidates (`src`, then
/// `data-src`). Blank values count as missing.
pub fn image_source<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|src| !src.trim().is_empty())
}
