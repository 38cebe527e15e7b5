//! Block values, the fixed block type table, and cube faces.
#![forbid(unsafe_code)]

mod face;

pub use face::Face;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum BlockId {
    Air = 0,
    Bedrock = 1,
    Stone = 2,
    Dirt = 3,
    Grass = 4,
    Log = 5,
    Glass = 6,
    Brick = 7,
}

impl BlockId {
    pub const ALL: [BlockId; 8] = [
        BlockId::Air,
        BlockId::Bedrock,
        BlockId::Stone,
        BlockId::Dirt,
        BlockId::Grass,
        BlockId::Log,
        BlockId::Glass,
        BlockId::Brick,
    ];

    #[inline]
    pub fn from_u8(id: u8) -> Option<BlockId> {
        Self::ALL.get(id as usize).copied()
    }

    #[inline]
    pub fn block_type(self) -> &'static BlockType {
        &BLOCK_TYPES[self as usize]
    }

    /// Base colour before per-cell jitter.
    pub fn base_color(self) -> [u8; 3] {
        match self {
            BlockId::Air => [0, 0, 0],
            BlockId::Bedrock => [60, 60, 64],
            BlockId::Stone => [128, 128, 132],
            BlockId::Dirt => [134, 96, 67],
            BlockId::Grass => [96, 160, 72],
            BlockId::Log => [110, 84, 52],
            BlockId::Glass => [220, 235, 240],
            BlockId::Brick => [170, 74, 60],
        }
    }
}

/// One voxel cell: type id plus an RGB tint. Four bytes, plain value.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Block {
    pub id: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Block {
    pub const AIR: Block = Block {
        id: BlockId::Air as u8,
        r: 0,
        g: 0,
        b: 0,
    };

    #[inline]
    pub const fn new(id: BlockId, rgb: [u8; 3]) -> Self {
        Self {
            id: id as u8,
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
        }
    }

    /// Block of `id` with its untinted base colour.
    #[inline]
    pub fn plain(id: BlockId) -> Self {
        Self::new(id, id.base_color())
    }

    #[inline]
    pub fn kind(self) -> Option<BlockId> {
        BlockId::from_u8(self.id)
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self.id == BlockId::Air as u8
    }

    /// Unknown ids are treated as opaque.
    #[inline]
    pub fn is_transparent(self) -> bool {
        self.kind().is_some_and(|k| k.block_type().transparent)
    }

    /// RGBA packed little-endian with full alpha, as vertex colours expect.
    #[inline]
    pub fn packed_color(self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, 0xff])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockType {
    pub name: &'static str,
    pub transparent: bool,
    /// Atlas tile `[column, row]` per face, indexed by `Face::index`.
    pub faces: [[u8; 2]; 6],
}

impl BlockType {
    #[inline]
    pub fn tile(&self, face: Face) -> [u8; 2] {
        self.faces[face.index()]
    }
}

const fn uniform(name: &'static str, transparent: bool, tile: [u8; 2]) -> BlockType {
    BlockType {
        name,
        transparent,
        faces: [tile; 6],
    }
}

/// Tiles per row and column of the block atlas.
pub const ATLAS_TILES: u8 = 16;

pub static BLOCK_TYPES: [BlockType; 8] = [
    uniform("air", true, [0, 0]),
    uniform("bedrock", false, [1, 1]),
    uniform("stone", false, [1, 0]),
    uniform("dirt", false, [2, 0]),
    BlockType {
        name: "grass",
        transparent: false,
        // top, bottom, then four sides
        faces: [[0, 0], [2, 0], [3, 0], [3, 0], [3, 0], [3, 0]],
    },
    BlockType {
        name: "log",
        transparent: false,
        faces: [[5, 1], [5, 1], [4, 1], [4, 1], [4, 1], [4, 1]],
    },
    uniform("glass", true, [1, 3]),
    uniform("brick", false, [7, 0]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_is_four_bytes() {
        assert_eq!(std::mem::size_of::<Block>(), 4);
        let zeroed: Block = bytemuck::Zeroable::zeroed();
        assert_eq!(zeroed, Block::AIR);
    }

    #[test]
    fn table_matches_ids() {
        for id in BlockId::ALL {
            assert_eq!(BlockId::from_u8(id as u8), Some(id));
        }
        assert_eq!(BlockId::Grass.block_type().name, "grass");
        assert!(BlockId::Air.block_type().transparent);
        assert!(BlockId::Glass.block_type().transparent);
        assert!(!BlockId::Stone.block_type().transparent);
        assert_eq!(BlockId::from_u8(8), None);
    }

    #[test]
    fn unknown_id_is_opaque() {
        let b = Block {
            id: 200,
            r: 1,
            g: 2,
            b: 3,
        };
        assert!(!b.is_transparent());
        assert!(!b.is_air());
    }

    #[test]
    fn grass_top_differs_from_sides() {
        let t = BlockId::Grass.block_type();
        assert_ne!(t.tile(Face::PosY), t.tile(Face::PosX));
        assert_eq!(t.tile(Face::NegY), BlockId::Dirt.block_type().tile(Face::NegY));
    }

    #[test]
    fn packed_color_is_rgba_le() {
        let b = Block::new(BlockId::Brick, [0x11, 0x22, 0x33]);
        assert_eq!(b.packed_color(), 0xff33_2211);
    }
}
