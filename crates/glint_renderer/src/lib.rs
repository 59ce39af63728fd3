//! Glint Renderer - brute-force Whitted ray tracing
//!
//! Traces camera rays against spheres and triangles packed into a flat,
//! fixed-layout record buffer, and shades hits with Phong lighting, hard
//! shadows, mirror reflection and glass refraction.
//!
//! Each pixel is evaluated independently; the packed scene is read-only for the
//! duration of a render pass.

mod primitive;
mod intersect;
mod scene_buffer;
mod light;
mod shadow;
mod tracer;
mod kernel;
mod camera;
mod config;
mod renderer;
mod bucket;

pub use primitive::{
    Color, Material, MaterialKind, Primitive, PrimitiveKind, Shape, GLASS_REFRACTIVE_INDEX,
};
pub use intersect::{intersect_sphere, intersect_triangle, HIT_EPSILON};
pub use scene_buffer::{
    PackedPrimitive, Record, SceneBuffer, SceneError, SceneResult, DEFAULT_CAPACITY,
};
pub use light::Light;
pub use shadow::is_occluded;
pub use tracer::{
    nearest_hit, shade, trace, Hit, Trace, TraceOutcome, TraceSettings, MAX_BOUNCES, SKY_COLOR,
    VACUUM_REFRACTIVE_INDEX,
};
pub use kernel::RenderKernel;
pub use camera::Camera;
pub use config::{ConfigError, RenderConfig};
pub use renderer::{color_to_rgba, render, render_pixel, ImageBuffer, OutputError};
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};

/// Re-export Vec3 and common math types from glint_math
pub use glint_math::{Interval, Ray, Vec3, Vec4};
