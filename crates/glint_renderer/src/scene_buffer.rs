//! Flat packed scene encoding.
//!
//! A scene is stored as two arrays: a pointer table with one entry per primitive,
//! and a record array of 4-wide float records. Each primitive owns a contiguous
//! run of records:
//!
//! | offset | content |
//! |---|---|
//! | +0 | (kind, material kind, refractive index, color multiplier) |
//! | +1 | (ambient.rgb, specular coefficient) |
//! | +2 | (diffuse.rgb, specular exponent) |
//! | +3 | sphere: (center.xyz, radius); triangle: (a.xyz, 0) |
//! | +4 | triangle only: (b.xyz, 0) |
//! | +5 | triangle only: (c.xyz, 0) |
//!
//! Kind is 0 for triangles and 1 for spheres. The layout is fixed so the buffer
//! can be handed as-is to a data-parallel backend; on the CPU it is shared
//! read-only across render threads.

use glint_math::{Ray, Vec3, Vec4};
use thiserror::Error;

use crate::intersect::{intersect_sphere, intersect_triangle, sphere_normal, triangle_normal};
use crate::primitive::{Color, Material, MaterialKind, Primitive, PrimitiveKind, Shape};

/// Default record capacity of a scene buffer.
pub const DEFAULT_CAPACITY: usize = 1024;

/// One 4-wide slot of the record array.
pub type Record = Vec4;

/// Errors that can occur while building or decoding a scene buffer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Scene needs {required} records but the buffer holds at most {capacity}")]
    CapacityExceeded { required: usize, capacity: usize },

    #[error("Unknown primitive kind discriminant: {0}")]
    UnknownPrimitiveKind(f32),

    #[error("Unknown material kind discriminant: {0}")]
    UnknownMaterialKind(f32),

    #[error("Primitive index {index} out of range (scene has {count})")]
    PrimitiveOutOfRange { index: usize, count: usize },
}

/// Result type for scene buffer operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Packed, read-only scene: pointer table plus record array.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneBuffer {
    pointers: Vec<u32>,
    records: Vec<Record>,
    capacity: usize,
}

impl SceneBuffer {
    /// Pack an ordered primitive list using the default capacity.
    pub fn build(primitives: &[Primitive]) -> SceneResult<Self> {
        Self::build_with_capacity(primitives, DEFAULT_CAPACITY)
    }

    /// Pack an ordered primitive list, failing if it needs more than `capacity` records.
    ///
    /// Nothing is written when the scene does not fit; the caller decides whether
    /// to drop primitives or retry with a larger capacity.
    pub fn build_with_capacity(primitives: &[Primitive], capacity: usize) -> SceneResult<Self> {
        let required: usize = primitives.iter().map(Primitive::record_count).sum();
        if required > capacity {
            log::warn!(
                "Rejecting scene of {} primitives: {} records exceed capacity {}",
                primitives.len(),
                required,
                capacity
            );
            return Err(SceneError::CapacityExceeded { required, capacity });
        }

        let mut pointers = Vec::with_capacity(primitives.len());
        let mut records = Vec::with_capacity(required);

        for primitive in primitives {
            pointers.push(records.len() as u32);
            encode(primitive, &mut records);
        }

        let spheres = primitives
            .iter()
            .filter(|p| p.kind() == PrimitiveKind::Sphere)
            .count();
        log::info!(
            "Packed {} primitives ({} spheres, {} triangles) into {}/{} records",
            primitives.len(),
            spheres,
            primitives.len() - spheres,
            records.len(),
            capacity
        );

        Ok(Self {
            pointers,
            records,
            capacity,
        })
    }

    /// Number of primitives in the scene.
    pub fn primitive_count(&self) -> usize {
        self.pointers.len()
    }

    /// Total number of records in use.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Record capacity the buffer was built against.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    /// Starting record offset of primitive `index`.
    pub fn pointer(&self, index: usize) -> Option<usize> {
        self.pointers.get(index).map(|&p| p as usize)
    }

    /// Read the record at `pointer + offset`, or `None` past the end of the
    /// record array. Reading past the end of a primitive's own run is a caller error.
    #[inline]
    pub fn record_at(&self, pointer: usize, offset: usize) -> Option<Record> {
        self.records.get(pointer + offset).copied()
    }

    /// The pointer table as laid out for upload.
    pub fn pointer_table(&self) -> &[u32] {
        &self.pointers
    }

    /// The record array as raw bytes (16 bytes per record).
    pub fn record_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.records)
    }

    /// Packed view of primitive `index`.
    pub fn view(&self, index: usize) -> Option<PackedPrimitive<'_>> {
        let start = self.pointer(index)?;
        let header = self.records[start];
        let kind = packed_kind(header.x);
        Some(PackedPrimitive {
            index,
            records: &self.records[start..start + kind.record_count()],
        })
    }

    /// Iterate over every primitive in insertion order.
    pub fn views(&self) -> impl Iterator<Item = PackedPrimitive<'_>> + '_ {
        (0..self.primitive_count()).filter_map(move |index| self.view(index))
    }

    /// Decode primitive `index` back into its API-level description.
    pub fn primitive(&self, index: usize) -> SceneResult<Primitive> {
        let records = self
            .view(index)
            .ok_or(SceneError::PrimitiveOutOfRange {
                index,
                count: self.primitive_count(),
            })?
            .records;

        let header = records[0];
        let kind = match header.x {
            k if k == PrimitiveKind::Triangle as u32 as f32 => PrimitiveKind::Triangle,
            k if k == PrimitiveKind::Sphere as u32 as f32 => PrimitiveKind::Sphere,
            k => return Err(SceneError::UnknownPrimitiveKind(k)),
        };
        let material_kind = decode_material_kind(header.y)
            .ok_or(SceneError::UnknownMaterialKind(header.y))?;

        let ambient = records[1];
        let diffuse = records[2];
        let material = Material {
            kind: material_kind,
            ambient: ambient.truncate(),
            diffuse: diffuse.truncate(),
            specular_coefficient: ambient.w,
            specular_exponent: diffuse.w,
        };

        let shape = match kind {
            PrimitiveKind::Sphere => {
                let center_radius = records[3];
                Shape::Sphere {
                    center: center_radius.truncate(),
                    radius: center_radius.w,
                }
            }
            PrimitiveKind::Triangle => Shape::Triangle {
                a: records[3].truncate(),
                b: records[4].truncate(),
                c: records[5].truncate(),
            },
        };

        Ok(Primitive { shape, material })
    }
}

/// Append the records of one primitive.
fn encode(primitive: &Primitive, records: &mut Vec<Record>) {
    let material = &primitive.material;

    records.push(Vec4::new(
        primitive.kind() as u32 as f32,
        material.kind.index() as f32,
        material.refractive_index(),
        1.0,
    ));
    records.push(material.ambient.extend(material.specular_coefficient));
    records.push(material.diffuse.extend(material.specular_exponent));

    match primitive.shape {
        Shape::Sphere { center, radius } => {
            records.push(center.extend(radius));
        }
        Shape::Triangle { a, b, c } => {
            records.push(a.extend(0.0));
            records.push(b.extend(0.0));
            records.push(c.extend(0.0));
        }
    }
}

/// Kind dispatch used on the hot path: anything below one half is a triangle.
#[inline]
fn packed_kind(discriminant: f32) -> PrimitiveKind {
    if discriminant < 0.5 {
        PrimitiveKind::Triangle
    } else {
        PrimitiveKind::Sphere
    }
}

fn decode_material_kind(discriminant: f32) -> Option<MaterialKind> {
    if discriminant < 0.0 || discriminant.fract() != 0.0 {
        return None;
    }
    MaterialKind::from_index(discriminant as u32)
}

/// Borrowed view of one primitive's record run.
#[derive(Debug, Clone, Copy)]
pub struct PackedPrimitive<'a> {
    index: usize,
    records: &'a [Record],
}

impl<'a> PackedPrimitive<'a> {
    /// Insertion-order index of this primitive.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> PrimitiveKind {
        packed_kind(self.records[0].x)
    }

    pub fn material_kind(&self) -> MaterialKind {
        decode_material_kind(self.records[0].y).unwrap_or(MaterialKind::Normal)
    }

    pub fn refractive_index(&self) -> f32 {
        self.records[0].z
    }

    pub fn color_multiplier(&self) -> f32 {
        self.records[0].w
    }

    pub fn ambient(&self) -> Color {
        self.records[1].truncate()
    }

    pub fn specular_coefficient(&self) -> f32 {
        self.records[1].w
    }

    pub fn diffuse(&self) -> Color {
        self.records[2].truncate()
    }

    pub fn specular_exponent(&self) -> f32 {
        self.records[2].w
    }

    /// Hit distance along `ray`, if any.
    #[inline]
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        match self.kind() {
            PrimitiveKind::Sphere => {
                let center_radius = self.records[3];
                intersect_sphere(center_radius.truncate(), center_radius.w, ray)
            }
            PrimitiveKind::Triangle => intersect_triangle(
                self.records[3].truncate(),
                self.records[4].truncate(),
                self.records[5].truncate(),
                ray,
            ),
        }
    }

    /// Outward unit normal at a point on the surface.
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        match self.kind() {
            PrimitiveKind::Sphere => sphere_normal(self.records[3].truncate(), point),
            PrimitiveKind::Triangle => triangle_normal(
                self.records[3].truncate(),
                self.records[4].truncate(),
                self.records[5].truncate(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_primitives() -> Vec<Primitive> {
        vec![
            Primitive::sphere(
                Vec3::new(0.0, 1.0, -2.0),
                0.75,
                Material::new(MaterialKind::Normal, Color::new(0.8, 0.2, 0.1))
                    .with_specular(0.5, 32.0),
            ),
            Primitive::triangle(
                Vec3::new(-1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, -1.0),
                Material::new(MaterialKind::Mirror, Color::splat(0.3))
                    .with_ambient(Color::new(0.01, 0.02, 0.03)),
            ),
            Primitive::sphere(
                Vec3::new(2.5, -0.5, 1.0),
                1.25,
                Material::new(MaterialKind::Glass, Color::ZERO).with_specular(0.9, 128.0),
            ),
        ]
    }

    #[test]
    fn test_record_count_and_pointers() {
        let scene = SceneBuffer::build(&sample_primitives()).unwrap();

        // 2 spheres * 4 + 1 triangle * 6
        assert_eq!(scene.record_count(), 14);
        assert_eq!(scene.primitive_count(), 3);
        assert_eq!(scene.pointer_table(), &[0, 4, 10]);
        assert_eq!(scene.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_roundtrip_reproduces_primitives() {
        let primitives = sample_primitives();
        let scene = SceneBuffer::build(&primitives).unwrap();

        for (index, original) in primitives.iter().enumerate() {
            assert_eq!(&scene.primitive(index).unwrap(), original);
        }
    }

    #[test]
    fn test_header_record_layout() {
        let scene = SceneBuffer::build(&sample_primitives()).unwrap();

        assert_eq!(scene.record_at(0, 0), Some(Vec4::new(1.0, 0.0, 0.0, 1.0)));
        assert_eq!(scene.record_at(4, 0), Some(Vec4::new(0.0, 1.0, 0.0, 1.0)));
        assert_eq!(scene.record_at(10, 0), Some(Vec4::new(1.0, 2.0, 1.4, 1.0)));

        // Geometry
        assert_eq!(scene.record_at(0, 3), Some(Vec4::new(0.0, 1.0, -2.0, 0.75)));
        assert_eq!(scene.record_at(4, 5), Some(Vec4::new(0.0, 0.0, -1.0, 0.0)));
    }

    #[test]
    fn test_record_at_past_end_is_none() {
        let scene = SceneBuffer::build(&sample_primitives()).unwrap();
        let last = scene.record_count() - 1;

        assert!(scene.record_at(last, 0).is_some());
        assert_eq!(scene.record_at(last, 1), None);
        assert_eq!(scene.record_at(scene.capacity(), 0), None);
    }

    #[test]
    fn test_capacity_exceeded() {
        let sphere = Primitive::sphere(Vec3::ZERO, 1.0, Material::default());
        let primitives = vec![sphere; 257]; // 1028 records

        let err = SceneBuffer::build(&primitives).unwrap_err();
        assert_eq!(
            err,
            SceneError::CapacityExceeded {
                required: 1028,
                capacity: 1024
            }
        );

        // Exactly at the limit is fine
        let scene = SceneBuffer::build(&primitives[..256]).unwrap();
        assert_eq!(scene.record_count(), 1024);
    }

    #[test]
    fn test_custom_capacity() {
        let primitives = sample_primitives();
        assert!(SceneBuffer::build_with_capacity(&primitives, 13).is_err());
        assert!(SceneBuffer::build_with_capacity(&primitives, 14).is_ok());
    }

    #[test]
    fn test_empty_scene() {
        let scene = SceneBuffer::build(&[]).unwrap();
        assert!(scene.is_empty());
        assert_eq!(scene.record_count(), 0);
        assert_eq!(scene.views().count(), 0);
    }

    #[test]
    fn test_primitive_out_of_range() {
        let scene = SceneBuffer::build(&sample_primitives()).unwrap();
        assert_eq!(
            scene.primitive(3),
            Err(SceneError::PrimitiveOutOfRange { index: 3, count: 3 })
        );
    }

    #[test]
    fn test_views_decode_materials() {
        let scene = SceneBuffer::build(&sample_primitives()).unwrap();
        let views: Vec<_> = scene.views().collect();

        assert_eq!(views.len(), 3);
        assert_eq!(views[0].kind(), PrimitiveKind::Sphere);
        assert_eq!(views[1].kind(), PrimitiveKind::Triangle);
        assert_eq!(views[1].material_kind(), MaterialKind::Mirror);
        assert_eq!(views[2].material_kind(), MaterialKind::Glass);
        assert_eq!(views[2].refractive_index(), 1.4);
        assert_eq!(views[0].specular_exponent(), 32.0);
        assert_eq!(views[1].ambient(), Color::new(0.01, 0.02, 0.03));
        assert_eq!(views[2].index(), 2);
        assert_eq!(views[2].color_multiplier(), 1.0);
    }

    #[test]
    fn test_record_bytes() {
        let scene = SceneBuffer::build(&sample_primitives()).unwrap();
        assert_eq!(scene.record_bytes().len(), 14 * 16);
    }
}
