use quarry_geom::Vec3;
use serde::{Deserialize, Serialize};

use crate::CHUNK_WIDTH;

const W: i32 = CHUNK_WIDTH as i32;

/// Horizontal extent in blocks, each way from the origin, that world points
/// are clamped to. Chunk arithmetic around it stays far from `i32` overflow.
pub const WORLD_LIMIT: i32 = 1 << 30;

/// Horizontal chunk grid position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing the world point, rounding toward negative infinity.
    /// Coordinates beyond `WORLD_LIMIT` are clamped to it; NaN maps to 0.
    #[inline]
    pub fn from_world(p: Vec3) -> Self {
        let clamp = |v: f32| (v.floor() as i32).clamp(-WORLD_LIMIT, WORLD_LIMIT);
        Self::from_block(clamp(p.x), clamp(p.z))
    }

    /// Chunk containing the world block column `(wx, wz)`.
    #[inline]
    pub fn from_block(wx: i32, wz: i32) -> Self {
        Self::new(wx.div_euclid(W), wz.div_euclid(W))
    }

    #[inline]
    pub fn manhattan(self, other: ChunkPos) -> i32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.z.abs_diff(other.z))
            .min(i32::MAX as u32) as i32
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.z.saturating_add(dz))
    }

    #[inline]
    pub fn neighbor(self, side: Lateral) -> Self {
        let (dx, dz) = side.offset();
        self.offset(dx, dz)
    }

    /// World block coordinate of local `(0, 0)`.
    #[inline]
    pub fn origin_block(self) -> (i32, i32) {
        (self.x.saturating_mul(W), self.z.saturating_mul(W))
    }

    #[inline]
    pub fn world_origin(self) -> Vec3 {
        let (bx, bz) = self.origin_block();
        Vec3::new(bx as f32, 0.0, bz as f32)
    }
}

impl From<(i32, i32)> for ChunkPos {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

/// The four horizontal neighbours. Discriminants index `neighbors_exist`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lateral {
    PosX = 0,
    NegX = 1,
    PosZ = 2,
    NegZ = 3,
}

impl Lateral {
    pub const ALL: [Lateral; 4] = [Lateral::PosX, Lateral::NegX, Lateral::PosZ, Lateral::NegZ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Lateral::PosX => (1, 0),
            Lateral::NegX => (-1, 0),
            Lateral::PosZ => (0, 1),
            Lateral::NegZ => (0, -1),
        }
    }

    #[inline]
    pub fn opposite(self) -> Lateral {
        match self {
            Lateral::PosX => Lateral::NegX,
            Lateral::NegX => Lateral::PosX,
            Lateral::PosZ => Lateral::NegZ,
            Lateral::NegZ => Lateral::PosZ,
        }
    }
}
