use quarry_geom::{Aabb, Vec3};

use crate::vertex::ColorVertex;

/// Corner pairs of the twelve cube edges, in `Aabb::corners` numbering.
const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (2, 3),
    (4, 5),
    (6, 7),
    (0, 2),
    (1, 3),
    (4, 6),
    (5, 7),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Line list around the unit cell at the origin, pushed out by `inflate`.
pub fn block_outline_vertices(inflate: f32, color: u32) -> Vec<ColorVertex> {
    let cell = Aabb::new(Vec3::splat(-inflate), Vec3::splat(1.0 + inflate));
    let c = cell.corners();
    CUBE_EDGES
        .iter()
        .flat_map(|&(a, b)| [c[a], c[b]])
        .map(|p| ColorVertex {
            position: p.to_array(),
            color,
        })
        .collect()
}

/// Triangle list for an indexed shape. Out-of-range indices are skipped.
pub fn shape_color_vertices(positions: &[Vec3], indices: &[u32], color: u32) -> Vec<ColorVertex> {
    indices
        .iter()
        .filter_map(|&i| positions.get(i as usize))
        .map(|p| ColorVertex {
            position: p.to_array(),
            color,
        })
        .collect()
}
