//! Per-pixel entry point.

use glint_math::Ray;

use crate::primitive::Color;
use crate::tracer::{trace, Trace, TraceSettings};
use crate::{Light, SceneBuffer};

/// Everything one render pass reads, bundled for per-pixel calls.
///
/// The kernel only borrows the scene, so the scene cannot be rebuilt while a pass
/// holding a kernel is in flight. It is `Send + Sync` and can be shared freely
/// across worker threads.
#[derive(Debug, Clone, Copy)]
pub struct RenderKernel<'a> {
    scene: &'a SceneBuffer,
    light: &'a Light,
    settings: TraceSettings,
}

impl<'a> RenderKernel<'a> {
    /// Create a kernel with the default bounce limit and sky color.
    pub fn new(scene: &'a SceneBuffer, light: &'a Light) -> Self {
        Self::with_settings(scene, light, TraceSettings::default())
    }

    pub fn with_settings(
        scene: &'a SceneBuffer,
        light: &'a Light,
        settings: TraceSettings,
    ) -> Self {
        Self {
            scene,
            light,
            settings,
        }
    }

    pub fn scene(&self) -> &'a SceneBuffer {
        self.scene
    }

    pub fn settings(&self) -> &TraceSettings {
        &self.settings
    }

    /// Color seen along a camera ray.
    ///
    /// The direction does not need to be normalized. The result is not clamped;
    /// values above 1.0 are left for the presentation layer.
    pub fn shade(&self, pixel_ray: Ray) -> Color {
        self.trace(pixel_ray).color
    }

    /// Like [`RenderKernel::shade`] but also reports how the trace ended.
    pub fn trace(&self, pixel_ray: Ray) -> Trace {
        trace(self.scene, self.light, pixel_ray.normalized(), &self.settings)
    }
}
