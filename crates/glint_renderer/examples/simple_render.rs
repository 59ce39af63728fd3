//! Simple ray tracer example.
//!
//! Renders a small scene of spheres and a triangle floor and saves it as a PNG.
//! An optional JSON render config can be passed as the first argument.

use anyhow::{Context, Result};
use glint_renderer::{
    render, Camera, Color, Light, Material, MaterialKind, Primitive, RenderConfig, SceneBuffer,
    Vec3,
};

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config {}", path))?;
            RenderConfig::from_json(&json)?
        }
        None => RenderConfig {
            width: 640,
            height: 480,
            ..Default::default()
        },
    };

    // Build the scene
    let primitives = build_scene();
    let scene = SceneBuffer::build_with_capacity(&primitives, config.scene_capacity)
        .context("Scene does not fit in the record buffer")?;

    let light = Light::new(Vec3::new(1.0, 20.0, 20.0), 1.0, 0.1);

    let mut camera = Camera::new()
        .with_resolution(config.width, config.height)
        .with_position(Vec3::new(0.0, 3.0, 20.0), Vec3::new(0.0, 1.0, 0.0), Vec3::Y)
        .with_fov(45.0);
    camera.initialize();

    let image = render(&camera, &scene, &light, &config)?;

    let filename = "output.png";
    image.save_png(filename)?;
    log::info!("Saved to {}", filename);

    Ok(())
}

fn build_scene() -> Vec<Primitive> {
    let floor = Material::new(MaterialKind::Normal, Color::new(0.5, 0.5, 0.5));
    let size = 12.0;

    vec![
        // Floor, two triangles facing up
        Primitive::triangle(
            Vec3::new(-size, -1.0, size),
            Vec3::new(size, -1.0, size),
            Vec3::new(size, -1.0, -size),
            floor,
        ),
        Primitive::triangle(
            Vec3::new(-size, -1.0, size),
            Vec3::new(size, -1.0, -size),
            Vec3::new(-size, -1.0, -size),
            floor,
        ),
        Primitive::sphere(
            Vec3::new(-3.0, 1.0, 0.0),
            2.0,
            Material::new(MaterialKind::Normal, Color::new(0.8, 0.2, 0.1))
                .with_ambient(Color::new(0.4, 0.1, 0.05))
                .with_specular(0.6, 32.0),
        ),
        Primitive::sphere(
            Vec3::new(3.0, 1.0, -2.0),
            2.0,
            Material::new(MaterialKind::Mirror, Color::new(0.1, 0.1, 0.1))
                .with_specular(0.8, 64.0),
        ),
        Primitive::sphere(
            Vec3::new(0.5, 0.0, 4.0),
            1.0,
            Material::new(MaterialKind::Glass, Color::ZERO).with_specular(0.9, 128.0),
        ),
    ]
}
