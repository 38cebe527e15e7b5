use std::sync::Arc;

use quarry_geom::{Aabb, Quat, Transform, Vec3};

/// Triangle indices of a cuboid built from `Aabb::corners` order.
const CUBOID_INDICES: [u32; 36] = [
    0, 2, 1, 1, 2, 3, // -z
    4, 5, 6, 5, 7, 6, // +z
    0, 4, 2, 2, 4, 6, // -x
    1, 3, 5, 3, 7, 5, // +x
    0, 1, 4, 1, 5, 4, // -y
    2, 6, 3, 3, 6, 7, // +y
];

/// Immutable template geometry shared between instances.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shape {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl Shape {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Axis-aligned box centred on the origin.
    pub fn cuboid(half_extents: Vec3) -> Self {
        let aabb = Aabb::from_center_half_extents(Vec3::ZERO, half_extents);
        Self {
            positions: aabb.corners().to_vec(),
            indices: CUBOID_INDICES.to_vec(),
        }
    }

    /// Oriented box as stored by model files: half extents, rotation, centre.
    pub fn from_box_collider(half_extents: Vec3, rotation: Quat, position: Vec3) -> Self {
        let mut shape = Self::cuboid(half_extents);
        let t = Transform::from_rotation_translation(rotation.normalized(), position);
        for p in &mut shape.positions {
            *p = t.apply_point(*p);
        }
        shape
    }

    pub fn centroid(&self) -> Vec3 {
        centroid(&self.positions)
    }
}

/// A placed copy of a `Shape`. `transformed_positions` is scratch space
/// recomputed by `update` and always has the template's length.
#[derive(Clone, Debug)]
pub struct ShapeInstance {
    pub shape: Arc<Shape>,
    pub transform: Transform,
    pub transformed_positions: Vec<Vec3>,
}

impl ShapeInstance {
    pub fn new(shape: Arc<Shape>, transform: Transform) -> Self {
        let mut inst = Self {
            transformed_positions: Vec::with_capacity(shape.positions.len()),
            shape,
            transform,
        };
        inst.update();
        inst
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.update();
    }

    pub fn update(&mut self) {
        self.transformed_positions.clear();
        self.transformed_positions.extend(
            self.shape
                .positions
                .iter()
                .map(|p| self.transform.apply_point(*p)),
        );
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.transformed_positions
    }
}

pub(crate) fn centroid(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return Vec3::ZERO;
    }
    let sum = points.iter().fold(Vec3::ZERO, |acc, p| acc + *p);
    sum / points.len() as f32
}
