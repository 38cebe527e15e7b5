//! Chunk coordinates, streaming order, and terrain generation rules.
#![forbid(unsafe_code)]

pub mod coord;
pub mod spiral;
pub mod worldgen;

pub use coord::{ChunkPos, Lateral, WORLD_LIMIT};
pub use spiral::ManhattanSpiral;
pub use worldgen::{ConstantNoise, Noise2d, TerrainGen, TerrainNoise, WorldGenParams};

pub const CHUNK_WIDTH: usize = 16;
pub const CHUNK_HEIGHT: usize = 256;
pub const CHUNK_VOLUME: usize = CHUNK_WIDTH * CHUNK_WIDTH * CHUNK_HEIGHT;
