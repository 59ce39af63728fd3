//! Bounded bounce loop: nearest hit, Phong shading, mirror and glass continuation.
//!
//! Color accumulates additively. Every surface the ray touches adds its full Phong
//! term and a miss adds the sky color; nothing is attenuated by path throughput.

use glint_math::{Interval, Ray, Vec3};

use crate::intersect::HIT_EPSILON;
use crate::primitive::{Color, MaterialKind};
use crate::scene_buffer::PackedPrimitive;
use crate::shadow::is_occluded;
use crate::{Light, SceneBuffer};

/// Maximum number of loop iterations per camera ray.
pub const MAX_BOUNCES: u32 = 4;

/// Color added when a ray leaves the scene.
pub const SKY_COLOR: Color = Vec3::ONE;

/// Refractive index of the space between primitives.
pub const VACUUM_REFRACTIVE_INDEX: f32 = 1.0;

/// Distance a refracted ray is pushed along its new direction.
const REFRACTION_NUDGE: f32 = 1e-3;

/// Floor applied to `dot(R, V)` before raising it to the specular exponent.
const SPECULAR_FLOOR: f32 = 1e-5;

/// Tracer settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceSettings {
    /// Hard upper bound on loop iterations
    pub max_bounces: u32,
    /// Background color added on a miss
    pub sky_color: Color,
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self {
            max_bounces: MAX_BOUNCES,
            sky_color: SKY_COLOR,
        }
    }
}

/// How a trace ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOutcome {
    /// The ray left the scene and picked up the sky color.
    Sky,
    /// The ray stopped on a normal (opaque, non-mirror) surface.
    Surface,
    /// The iteration limit was reached while still bouncing.
    Exhausted,
}

/// Result of tracing one camera ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trace {
    pub color: Color,
    /// Number of mirror reflections and glass refractions taken
    pub bounces: u32,
    pub outcome: TraceOutcome,
}

/// Nearest intersection along a ray.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub primitive: PackedPrimitive<'a>,
    pub t: f32,
}

/// State carried from one iteration of the bounce loop to the next.
struct TraceState {
    ray: Ray,
    color: Color,
    /// Primitive skipped by the next nearest-hit search
    excluded: Option<usize>,
    /// Medium the ray currently travels through
    active_refractive_index: f32,
    /// Glass primitive most recently refracted through
    last_refracted: Option<usize>,
    bounces: u32,
}

impl TraceState {
    fn new(ray: Ray) -> Self {
        Self {
            ray,
            color: Color::ZERO,
            excluded: None,
            active_refractive_index: VACUUM_REFRACTIVE_INDEX,
            last_refracted: None,
            bounces: 0,
        }
    }

    /// Continue through a glass surface at `point`, switching media.
    fn refract_through(&mut self, index: usize, refractive_index: f32, point: Vec3, normal: Vec3) {
        // Leaving the primitive we last entered means stepping back into vacuum.
        let target = if self.last_refracted == Some(index) {
            VACUUM_REFRACTIVE_INDEX
        } else {
            refractive_index
        };
        let ratio = self.active_refractive_index / target;
        let refracted = refract(self.ray.direction, normal, ratio).normalize_or_zero();

        self.ray = Ray::new(point + refracted * REFRACTION_NUDGE, refracted);
        self.active_refractive_index = target;
        self.last_refracted = Some(index);
        self.excluded = None;
    }

    fn finish(self, outcome: TraceOutcome) -> Trace {
        Trace {
            color: self.color,
            bounces: self.bounces,
            outcome,
        }
    }
}

/// Find the closest primitive hit by `ray`, skipping `excluded`.
///
/// Ties keep the primitive that comes first in insertion order.
pub fn nearest_hit<'a>(
    scene: &'a SceneBuffer,
    ray: &Ray,
    excluded: Option<usize>,
) -> Option<Hit<'a>> {
    let mut closest: Option<Hit<'a>> = None;
    let mut closest_so_far = f32::INFINITY;

    for primitive in scene.views() {
        if Some(primitive.index()) == excluded {
            continue;
        }
        let Some(t) = primitive.intersect(ray) else {
            continue;
        };
        if Interval::new(HIT_EPSILON, closest_so_far).surrounds(t) {
            closest_so_far = t;
            closest = Some(Hit { primitive, t });
        }
    }

    closest
}

/// Trace a ray through the scene. The ray direction must be unit length.
pub fn trace(scene: &SceneBuffer, light: &Light, ray: Ray, settings: &TraceSettings) -> Trace {
    let mut state = TraceState::new(ray);

    for _ in 0..settings.max_bounces {
        let Some(hit) = nearest_hit(scene, &state.ray, state.excluded) else {
            state.color += settings.sky_color;
            return state.finish(TraceOutcome::Sky);
        };

        let direction = state.ray.direction;
        let point = state.ray.at(hit.t);
        let normal = facing_normal(hit.primitive.normal_at(point), direction);

        state.color += shade(&hit.primitive, point, normal, -direction, scene, light);

        let index = hit.primitive.index();
        match hit.primitive.material_kind() {
            MaterialKind::Normal => return state.finish(TraceOutcome::Surface),
            MaterialKind::Mirror => {
                state.ray = Ray::new(point, reflect(direction, normal));
                state.excluded = Some(index);
            }
            MaterialKind::Glass => {
                state.refract_through(index, hit.primitive.refractive_index(), point, normal);
            }
        }
        state.bounces += 1;
    }

    state.finish(TraceOutcome::Exhausted)
}

/// Phong shading of a single surface point.
///
/// `normal` must face the viewer and `view` points from the surface back toward
/// the ray origin. Unlit or shadowed points get the ambient term only.
pub fn shade(
    primitive: &PackedPrimitive<'_>,
    point: Vec3,
    normal: Vec3,
    view: Vec3,
    scene: &SceneBuffer,
    light: &Light,
) -> Color {
    let ambient = light.ambient_intensity * primitive.ambient();

    let to_light = (light.position - point).normalize_or_zero();
    let n_dot_l = normal.dot(to_light);
    if n_dot_l < 0.0 || is_occluded(point, Some(primitive.index()), scene, light) {
        return ambient;
    }

    let diffuse = primitive.diffuse() * n_dot_l.max(0.0);
    let reflected = reflect(-to_light, normal);
    let specular = primitive.specular_coefficient()
        * reflected
            .dot(view)
            .max(SPECULAR_FLOOR)
            .powf(primitive.specular_exponent());

    light.intensity * (diffuse + Color::splat(specular)) + ambient
}

/// Flip `normal` so it opposes the incoming direction.
#[inline]
fn facing_normal(normal: Vec3, incoming: Vec3) -> Vec3 {
    if normal.dot(-incoming) < 0.0 {
        -normal
    } else {
        normal
    }
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface whose normal opposes it.
///
/// Applied unconditionally: past the critical angle the perpendicular term is
/// still used and no total internal reflection happens.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
