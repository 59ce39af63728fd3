//! Scene primitives: spheres and triangles with an attached Phong material.
//!
//! These are the API-level descriptions callers hand to
//! [`SceneBuffer::build`](crate::SceneBuffer::build). The tracer never sees them
//! directly; it reads the packed records instead.

use glint_math::Vec3;

/// Color type alias (RGB, unbounded above 1.0)
pub type Color = Vec3;

/// Index of refraction used for every glass primitive.
pub const GLASS_REFRACTIVE_INDEX: f32 = 1.4;

/// How a surface continues the ray after it has been shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Shade and stop.
    Normal,
    /// Shade, then reflect about the surface normal.
    Mirror,
    /// Shade, then refract into (or out of) the primitive.
    Glass,
}

impl MaterialKind {
    /// Numeric discriminant stored in the scene buffer.
    pub fn index(self) -> u32 {
        match self {
            MaterialKind::Normal => 0,
            MaterialKind::Mirror => 1,
            MaterialKind::Glass => 2,
        }
    }

    /// Inverse of [`MaterialKind::index`].
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(MaterialKind::Normal),
            1 => Some(MaterialKind::Mirror),
            2 => Some(MaterialKind::Glass),
            _ => None,
        }
    }

    /// Refractive index implied by the kind; only glass has a meaningful one.
    pub fn refractive_index(self) -> f32 {
        match self {
            MaterialKind::Glass => GLASS_REFRACTIVE_INDEX,
            MaterialKind::Normal | MaterialKind::Mirror => 0.0,
        }
    }
}

/// Surface appearance shared by both primitive shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub ambient: Color,
    pub diffuse: Color,
    pub specular_coefficient: f32,
    pub specular_exponent: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kind: MaterialKind::Normal,
            ambient: Color::splat(0.1),
            diffuse: Color::splat(0.5), // Grey default
            specular_coefficient: 0.0,
            specular_exponent: 1.0,
        }
    }
}

impl Material {
    /// A plain diffuse material with the same ambient and diffuse color.
    pub fn new(kind: MaterialKind, color: Color) -> Self {
        Self {
            kind,
            ambient: color,
            diffuse: color,
            ..Default::default()
        }
    }

    /// Set the Phong specular highlight.
    pub fn with_specular(mut self, coefficient: f32, exponent: f32) -> Self {
        self.specular_coefficient = coefficient;
        self.specular_exponent = exponent;
        self
    }

    /// Set the ambient color separately from the diffuse one.
    pub fn with_ambient(mut self, ambient: Color) -> Self {
        self.ambient = ambient;
        self
    }

    /// Refractive index of this material (0 unless glass).
    pub fn refractive_index(&self) -> f32 {
        self.kind.refractive_index()
    }
}

/// Geometry of a primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { center: Vec3, radius: f32 },
    /// Single-sided; the visible face is the one `(b - a) x (c - a)` points toward.
    Triangle { a: Vec3, b: Vec3, c: Vec3 },
}

/// Numeric primitive discriminant stored in the scene buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Triangle = 0,
    Sphere = 1,
}

impl PrimitiveKind {
    /// Number of 4-wide records a primitive of this kind occupies.
    pub fn record_count(self) -> usize {
        match self {
            PrimitiveKind::Sphere => 4,
            PrimitiveKind::Triangle => 6,
        }
    }
}

/// A sphere or triangle with its material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive {
    pub shape: Shape,
    pub material: Material,
}

impl Primitive {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn sphere(center: Vec3, radius: f32, material: Material) -> Self {
        Self {
            shape: Shape::Sphere {
                center,
                radius: radius.max(0.0),
            },
            material,
        }
    }

    /// Create a new triangle from three vertices.
    pub fn triangle(a: Vec3, b: Vec3, c: Vec3, material: Material) -> Self {
        Self {
            shape: Shape::Triangle { a, b, c },
            material,
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        match self.shape {
            Shape::Sphere { .. } => PrimitiveKind::Sphere,
            Shape::Triangle { .. } => PrimitiveKind::Triangle,
        }
    }

    /// Number of records this primitive occupies once packed.
    pub fn record_count(&self) -> usize {
        self.kind().record_count()
    }
}
