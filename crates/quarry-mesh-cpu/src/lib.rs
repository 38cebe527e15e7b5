//! CPU chunk mesher, vertex layouts, and the mesh builder seam.
#![forbid(unsafe_code)]

mod builder;
mod chunk;
mod outline;
mod vertex;

pub use builder::{HeadlessMeshBuilder, MeshBuilder, MeshId};
pub use chunk::{append_block_face, build_chunk_vertices, face_visible, replace_mesh};
pub use outline::{block_outline_vertices, shape_color_vertices};
pub use vertex::{ColorVertex, TextureColorVertex};

/// Vertices per emitted block face (two triangles).
pub const VERTS_PER_FACE: usize = 6;
