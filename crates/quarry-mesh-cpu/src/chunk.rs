use quarry_blocks::{ATLAS_TILES, Block, BlockType, Face};
use quarry_chunk::Chunk;
use quarry_world::{CHUNK_HEIGHT, CHUNK_WIDTH, Lateral};

use crate::builder::MeshBuilder;
use crate::vertex::TextureColorVertex;

const W: i32 = CHUNK_WIDTH as i32;
const H: i32 = CHUNK_HEIGHT as i32;

/// Per-corner UVs inside one atlas tile, matching `Face::corners` order.
const TILE_UV: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

/// Appends the two triangles of one face of the block at local `(x, y, z)`.
pub fn append_block_face(
    out: &mut Vec<TextureColorVertex>,
    x: usize,
    y: usize,
    z: usize,
    face: Face,
    bt: &BlockType,
    color: u32,
) {
    let [col, row] = bt.tile(face);
    let inv = 1.0 / ATLAS_TILES as f32;
    let corners = face.corners();
    let vert = |i: usize| {
        let c = corners[i];
        let uv = TILE_UV[i];
        TextureColorVertex {
            position: [x as f32 + c[0], y as f32 + c[1], z as f32 + c[2]],
            texcoord: [(col as f32 + uv[0]) * inv, (row as f32 + uv[1]) * inv],
            color,
        }
    };
    out.extend([vert(0), vert(1), vert(2), vert(0), vert(2), vert(3)]);
}

fn lateral_of(face: Face) -> Option<Lateral> {
    match face {
        Face::PosX => Some(Lateral::PosX),
        Face::NegX => Some(Lateral::NegX),
        Face::PosZ => Some(Lateral::PosZ),
        Face::NegZ => Some(Lateral::NegZ),
        Face::PosY | Face::NegY => None,
    }
}

/// Whether the face of the block at local `(x, y, z)` is exposed.
///
/// Inside the chunk the neighbouring cell decides. Above the top layer is air
/// and below the bottom layer is solid. Across a lateral edge the face shows
/// only when that neighbour is flagged present and its cell is transparent.
pub fn face_visible<Hd>(
    chunk: &Chunk<Hd>,
    neighbors: &[Option<&Chunk<Hd>>; 4],
    x: usize,
    y: usize,
    z: usize,
    face: Face,
) -> bool {
    let [dx, dy, dz] = face.delta();
    let (nx, ny, nz) = (x as i32 + dx, y as i32 + dy, z as i32 + dz);
    if ny >= H {
        return true;
    }
    if ny < 0 {
        return false;
    }
    if (0..W).contains(&nx) && (0..W).contains(&nz) {
        return chunk
            .get_local(nx as usize, ny as usize, nz as usize)
            .is_transparent();
    }
    let Some(side) = lateral_of(face) else {
        return false;
    };
    if !chunk.neighbor_exists(side) {
        return false;
    }
    match neighbors[side.index()] {
        Some(n) => {
            let lx = nx.rem_euclid(W) as usize;
            let lz = nz.rem_euclid(W) as usize;
            n.get_local(lx, ny as usize, lz).is_transparent()
        }
        None => false,
    }
}

/// Emits every visible face of every non-air block into `out` (cleared first).
/// Positions are chunk-local.
pub fn build_chunk_vertices<Hd>(
    chunk: &Chunk<Hd>,
    neighbors: &[Option<&Chunk<Hd>>; 4],
    out: &mut Vec<TextureColorVertex>,
) {
    out.clear();
    for y in 0..CHUNK_HEIGHT {
        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                let b: Block = chunk.get_local(x, y, z);
                if b.is_air() {
                    continue;
                }
                let Some(kind) = b.kind() else { continue };
                let bt = kind.block_type();
                let color = b.packed_color();
                for face in Face::ALL {
                    if face_visible(chunk, neighbors, x, y, z, face) {
                        append_block_face(out, x, y, z, face, bt, color);
                    }
                }
            }
        }
    }
}

/// Destroys the previous handle, then uploads `verts`. An empty list leaves
/// the slot empty.
pub fn replace_mesh<B: MeshBuilder>(
    slot: &mut Option<B::Handle>,
    verts: &[TextureColorVertex],
    builder: &mut B,
) {
    if let Some(old) = slot.take() {
        builder.destroy_mesh(old);
    }
    if !verts.is_empty() {
        *slot = Some(builder.build_mesh(verts));
    }
}
