//! Chunk block storage and in-place generation.
#![forbid(unsafe_code)]

use quarry_blocks::{Block, BlockId};
use quarry_world::{
    CHUNK_HEIGHT, CHUNK_VOLUME, CHUNK_WIDTH, ChunkPos, Lateral, Noise2d, TerrainGen,
};

/// A 16x16x256 column of blocks. `H` is the mesh handle type of the render
/// side; the chunk only stores it.
#[derive(Debug)]
pub struct Chunk<H> {
    pub pos: ChunkPos,
    /// Indexed by `Lateral::index`.
    pub neighbors_exist: [bool; 4],
    pub blocks: Box<[Block]>,
    pub mesh: Option<H>,
}

#[inline]
pub const fn idx(x: usize, y: usize, z: usize) -> usize {
    y * CHUNK_WIDTH * CHUNK_WIDTH + z * CHUNK_WIDTH + x
}

impl<H> Chunk<H> {
    /// All-air storage with no neighbours and no mesh.
    pub fn new_zeroed(pos: ChunkPos) -> Self {
        Self {
            pos,
            neighbors_exist: [false; 4],
            blocks: vec![Block::AIR; CHUNK_VOLUME].into_boxed_slice(),
            mesh: None,
        }
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks[idx(x, y, z)]
    }

    /// `None` outside the chunk bounds.
    #[inline]
    pub fn get_local_checked(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        let w = CHUNK_WIDTH as i32;
        if x < 0 || z < 0 || y < 0 || x >= w || z >= w || y >= CHUNK_HEIGHT as i32 {
            return None;
        }
        Some(self.get_local(x as usize, y as usize, z as usize))
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, b: Block) {
        self.blocks[idx(x, y, z)] = b;
    }

    #[inline]
    pub fn neighbor_exists(&self, side: Lateral) -> bool {
        self.neighbors_exist[side.index()]
    }

    #[inline]
    pub fn set_neighbor_exists(&mut self, side: Lateral, exists: bool) {
        self.neighbors_exist[side.index()] = exists;
    }

    pub fn count(&self, id: BlockId) -> usize {
        self.blocks.iter().filter(|b| b.id == id as u8).count()
    }

    /// Overwrites every cell with terrain for `pos`. Storage is reused; the
    /// neighbour flags are cleared and the mesh slot is left to the caller.
    pub fn generate<N: Noise2d>(&mut self, pos: ChunkPos, terrain: &TerrainGen<N>) {
        self.pos = pos;
        self.neighbors_exist = [false; 4];
        self.blocks.fill(Block::AIR);

        let (bx, bz) = pos.origin_block();
        let trunk = terrain.params.trunk_height.max(0);
        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                let wx = bx + x as i32;
                let wz = bz + z as i32;
                let h = terrain.height_at(wx, wz);
                for y in 0..=h {
                    let id = terrain.block_at(y, h);
                    let rgb = terrain.color_at(id, wx, y, wz);
                    self.blocks[idx(x, y as usize, z)] = Block::new(id, rgb);
                }

                let interior = (1..CHUNK_WIDTH - 1).contains(&x) && (1..CHUNK_WIDTH - 1).contains(&z);
                if interior && trunk > 0 && terrain.tree_at(wx, wz) {
                    let top = (h + trunk).min(CHUNK_HEIGHT as i32 - 1);
                    for y in h + 1..=top {
                        let rgb = terrain.color_at(BlockId::Log, wx, y, wz);
                        self.blocks[idx(x, y as usize, z)] = Block::new(BlockId::Log, rgb);
                    }
                }
            }
        }
    }
}
