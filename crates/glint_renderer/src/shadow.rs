//! Hard shadow test toward the point light.

use glint_math::{Interval, Ray, Vec3};

use crate::intersect::HIT_EPSILON;
use crate::primitive::MaterialKind;
use crate::{Light, SceneBuffer};

/// Returns true if something opaque lies between `point` and the light.
///
/// `excluded` is skipped (normally the primitive `point` lies on). Glass never
/// blocks the light. The first blocker found ends the search; hits are not sorted.
pub fn is_occluded(
    point: Vec3,
    excluded: Option<usize>,
    scene: &SceneBuffer,
    light: &Light,
) -> bool {
    let to_light = light.position - point;
    let distance = to_light.length();
    if distance == 0.0 {
        return false;
    }

    let ray = Ray::new(point, to_light / distance);
    let window = Interval::new(HIT_EPSILON, distance);

    scene
        .views()
        .filter(|primitive| Some(primitive.index()) != excluded)
        .filter(|primitive| primitive.material_kind() != MaterialKind::Glass)
        .any(|primitive| {
            primitive
                .intersect(&ray)
                .is_some_and(|t| window.surrounds(t))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Material, Primitive};

    fn light() -> Light {
        Light::new(Vec3::new(0.0, 10.0, 0.0), 1.0, 0.1)
    }

    #[test]
    fn test_not_occluded_when_everything_is_behind() {
        let scene = SceneBuffer::build(&[
            Primitive::sphere(Vec3::new(0.0, -5.0, 0.0), 1.0, Material::default()),
            Primitive::sphere(Vec3::new(3.0, -2.0, 0.0), 0.5, Material::default()),
            Primitive::triangle(
                Vec3::new(-1.0, -3.0, -1.0),
                Vec3::new(0.0, -3.0, 1.0),
                Vec3::new(1.0, -3.0, -1.0),
                Material::default(),
            ),
        ])
        .unwrap();

        assert!(!is_occluded(Vec3::ZERO, None, &scene, &light()));
    }

    #[test]
    fn test_occluded_by_opaque_sphere() {
        let scene = SceneBuffer::build(&[Primitive::sphere(
            Vec3::new(0.0, 5.0, 0.0),
            1.0,
            Material::default(),
        )])
        .unwrap();

        assert!(is_occluded(Vec3::ZERO, None, &scene, &light()));
    }

    #[test]
    fn test_glass_casts_no_shadow() {
        let scene = SceneBuffer::build(&[Primitive::sphere(
            Vec3::new(0.0, 5.0, 0.0),
            1.0,
            Material::new(MaterialKind::Glass, Color::ZERO),
        )])
        .unwrap();

        assert!(!is_occluded(Vec3::ZERO, None, &scene, &light()));
    }

    #[test]
    fn test_excluded_primitive_skipped() {
        let scene = SceneBuffer::build(&[Primitive::sphere(
            Vec3::new(0.0, 5.0, 0.0),
            1.0,
            Material::default(),
        )])
        .unwrap();

        assert!(!is_occluded(Vec3::ZERO, Some(0), &scene, &light()));
    }

    #[test]
    fn test_blocker_beyond_light_ignored() {
        let scene = SceneBuffer::build(&[Primitive::sphere(
            Vec3::new(0.0, 15.0, 0.0),
            1.0,
            Material::default(),
        )])
        .unwrap();

        assert!(!is_occluded(Vec3::ZERO, None, &scene, &light()));
    }
}
