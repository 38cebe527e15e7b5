//! Chunk streaming, block edits, and ray picking over the resident world.
#![forbid(unsafe_code)]

pub mod raycast;
mod store;

pub use raycast::{Visit, VoxelHit, raycast_first_hit, raycast_visit};
pub use store::{
    ChunkStore, Created, DrawItem, RayHit, Storage, StoreStats, StreamParams, StreamReport,
};
