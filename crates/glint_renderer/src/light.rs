//! Point light and global ambient term.

use glint_math::Vec3;
use serde::Deserialize;

/// A single point light plus the ambient intensity applied to every surface.
///
/// Lights are per-frame input: changing one never requires rebuilding the
/// [`SceneBuffer`](crate::SceneBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Light {
    pub position: Vec3,
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    #[serde(default = "default_ambient_intensity")]
    pub ambient_intensity: f32,
}

impl Light {
    /// Create a new point light.
    pub fn new(position: Vec3, intensity: f32, ambient_intensity: f32) -> Self {
        Self {
            position,
            intensity,
            ambient_intensity,
        }
    }

    /// Parse a light from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 4.0, 0.0), default_intensity(), default_ambient_intensity())
    }
}

const fn default_intensity() -> f32 {
    1.0
}

const fn default_ambient_intensity() -> f32 {
    0.1
}
