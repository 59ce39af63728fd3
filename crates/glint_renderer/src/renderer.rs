//! Render pass driver and image output.
//!
//! Every pixel is an independent [`RenderKernel::shade`] call. Pixels are grouped
//! into buckets and the buckets are rendered in parallel with rayon. Colors stay
//! unbounded floats until [`color_to_rgba`] clamps them for display.

use std::path::Path;
use std::time::Instant;

use glint_math::Interval;
use rayon::prelude::*;
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::{Camera, Color, ConfigError, Light, RenderConfig, RenderKernel, SceneBuffer};

/// Errors that can occur when writing a rendered image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Pixel buffer does not match {width}x{height}")]
    SizeMismatch { width: u32, height: u32 },
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    // Apply gamma correction and convert to 0-255
    let r = (255.0 * Interval::UNIT.clamp(linear_to_gamma(color.x))) as u8;
    let g = (255.0 * Interval::UNIT.clamp(linear_to_gamma(color.y))) as u8;
    let b = (255.0 * Interval::UNIT.clamp(linear_to_gamma(color.z))) as u8;
    [r, g, b, 255]
}

/// Render a single pixel.
pub fn render_pixel(camera: &Camera, kernel: &RenderKernel<'_>, x: u32, y: u32) -> Color {
    kernel.shade(camera.get_ray(x, y))
}

/// Simple image buffer for storing render output.
#[derive(Debug)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn blit(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            let rgba = color_to_rgba(*color);
            bytes.extend_from_slice(&rgba);
        }
        bytes
    }

    /// Write the image as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), OutputError> {
        let image = image::RgbaImage::from_raw(self.width, self.height, self.to_rgba()).ok_or(
            OutputError::SizeMismatch {
                width: self.width,
                height: self.height,
            },
        )?;
        image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

/// Render the whole image.
///
/// The camera must already be initialized at the configured resolution. Buckets
/// are rendered in parallel and share the scene read-only.
pub fn render(
    camera: &Camera,
    scene: &SceneBuffer,
    light: &Light,
    config: &RenderConfig,
) -> Result<ImageBuffer, ConfigError> {
    config.validate()?;
    let (width, height) = (config.width, config.height);
    if (camera.image_width, camera.image_height) != (width, height) {
        return Err(ConfigError::ResolutionMismatch {
            camera: (camera.image_width, camera.image_height),
            config: (width, height),
        });
    }

    let start = Instant::now();
    let kernel = RenderKernel::with_settings(scene, light, config.trace_settings());
    let buckets = generate_buckets(width, height, config.bucket_size);

    log::info!(
        "Rendering {}x{} in {} buckets ({} primitives, {} bounces max)",
        width,
        height,
        buckets.len(),
        scene.primitive_count(),
        config.max_bounces
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| BucketResult::new(*bucket, render_bucket(bucket, camera, &kernel)))
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.blit(result);
    }

    log::info!("Render finished in {:?}", start.elapsed());
    Ok(image)
}
