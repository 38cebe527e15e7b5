use quarry_blocks::{Block, BlockId};
use quarry_chunk::Chunk;
use quarry_geom::Vec3;
use quarry_hashlist::LinkedHashList;
use quarry_mesh_cpu::{MeshBuilder, TextureColorVertex, build_chunk_vertices, replace_mesh};
use quarry_world::{
    CHUNK_HEIGHT, CHUNK_WIDTH, ChunkPos, Lateral, ManhattanSpiral, Noise2d, TerrainGen,
    TerrainNoise,
};
use serde::Deserialize;

use crate::raycast::{Visit, raycast_visit};

const W: i32 = CHUNK_WIDTH as i32;

/// Streaming window, read from the `[stream]` table.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamParams {
    /// Manhattan radius in chunks kept around the focal chunk.
    pub radius: u32,
    pub max_new_chunks_per_frame: u32,
    pub sort_draw_list: bool,
}

impl Default for StreamParams {
    fn default() -> Self {
        Self {
            radius: 16,
            max_new_chunks_per_frame: 1,
            sort_draw_list: false,
        }
    }
}

/// Where the storage of a newly created chunk came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Storage {
    Fresh,
    Recycled(ChunkPos),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Created {
    pub pos: ChunkPos,
    pub storage: Storage,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamReport {
    pub center: ChunkPos,
    pub created: Vec<Created>,
    /// Spiral positions examined this pass.
    pub visited: usize,
    pub remeshed: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub generated: u64,
    pub allocated: u64,
    pub recycled: u64,
    pub remeshed: u64,
    pub edits: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub block: Block,
    pub pos: [i32; 3],
    pub normal: [i32; 3],
    pub t: f32,
}

impl RayHit {
    /// Cell in front of the hit face, where a placed block goes.
    #[inline]
    pub fn place_pos(&self) -> [i32; 3] {
        [
            self.pos[0] + self.normal[0],
            self.pos[1] + self.normal[1],
            self.pos[2] + self.normal[2],
        ]
    }
}

pub struct DrawItem<'a, H> {
    pub pos: ChunkPos,
    pub offset: Vec3,
    pub mesh: &'a H,
}

/// Resident chunks keyed by position, oldest first. Owns all chunk storage.
pub struct ChunkStore<H, N: Noise2d = TerrainNoise> {
    chunks: LinkedHashList<ChunkPos, Chunk<H>>,
    terrain: TerrainGen<N>,
    params: StreamParams,
    scratch: Vec<TextureColorVertex>,
    stats: StoreStats,
}

fn split_world(p: [i32; 3]) -> Option<(ChunkPos, usize, usize, usize)> {
    if p[1] < 0 || p[1] >= CHUNK_HEIGHT as i32 {
        return None;
    }
    let pos = ChunkPos::from_block(p[0], p[2]);
    Some((
        pos,
        p[0].rem_euclid(W) as usize,
        p[1] as usize,
        p[2].rem_euclid(W) as usize,
    ))
}

impl<H, N: Noise2d> ChunkStore<H, N> {
    pub fn new(params: StreamParams, terrain: TerrainGen<N>) -> Self {
        Self {
            chunks: LinkedHashList::new(),
            terrain,
            params,
            scratch: Vec::new(),
            stats: StoreStats::default(),
        }
    }

    #[inline]
    pub fn params(&self) -> &StreamParams {
        &self.params
    }

    #[inline]
    pub fn terrain(&self) -> &TerrainGen<N> {
        &self.terrain
    }

    #[inline]
    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    #[inline]
    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    #[inline]
    pub fn chunk(&self, pos: ChunkPos) -> Option<&Chunk<H>> {
        self.chunks.get(&pos)
    }

    /// Resident positions, oldest first.
    pub fn positions(&self) -> impl Iterator<Item = ChunkPos> + '_ {
        self.chunks.keys().copied()
    }

    /// One streaming pass around `focal`. Walks the spiral out to the
    /// configured radius and creates missing chunks until the per-frame
    /// budget is spent.
    pub fn stream<B>(&mut self, focal: Vec3, builder: &mut B) -> StreamReport
    where
        B: MeshBuilder<Handle = H>,
    {
        let center = ChunkPos::from_world(focal);
        let mut report = StreamReport {
            center,
            ..StreamReport::default()
        };
        let budget = self.params.max_new_chunks_per_frame as usize;
        for (radius, pos) in ManhattanSpiral::new(center) {
            if radius > self.params.radius || report.created.len() >= budget {
                break;
            }
            report.visited += 1;
            if self.chunks.contains_key(&pos) {
                continue;
            }
            let (storage, remeshed) = self.load_chunk(pos, center, builder);
            report.remeshed += remeshed;
            report.created.push(Created { pos, storage });
        }
        log::trace!(
            "stream center=({}, {}) visited={} created={} resident={}",
            center.x,
            center.z,
            report.visited,
            report.created.len(),
            self.chunks.len()
        );
        report
    }

    /// Takes storage for a new chunk: the oldest resident chunk farther than
    /// the radius from `focal_chunk` is evicted and handed back, otherwise a
    /// zeroed chunk is allocated. Residents that bordered the evicted chunk
    /// are remeshed.
    pub fn acquire_storage<B>(&mut self, focal_chunk: ChunkPos, builder: &mut B) -> (Chunk<H>, Storage)
    where
        B: MeshBuilder<Handle = H>,
    {
        let radius = self.params.radius as i32;
        let victim = self
            .chunks
            .find_first(|pos, _| pos.manhattan(focal_chunk) > radius)
            .and_then(|id| self.chunks.remove(id));
        match victim {
            Some((old, mut chunk)) => {
                if let Some(h) = chunk.mesh.take() {
                    builder.destroy_mesh(h);
                }
                let mut dirty = Vec::with_capacity(4);
                for side in Lateral::ALL {
                    let npos = old.neighbor(side);
                    if let Some(n) = self.chunks.get_mut(&npos) {
                        if n.neighbor_exists(side.opposite()) {
                            n.set_neighbor_exists(side.opposite(), false);
                            dirty.push(npos);
                        }
                    }
                }
                // edge faces toward the evicted chunk are hidden again
                for p in dirty {
                    self.remesh(p, builder);
                }
                self.stats.recycled += 1;
                (chunk, Storage::Recycled(old))
            }
            None => {
                self.stats.allocated += 1;
                (Chunk::new_zeroed(focal_chunk), Storage::Fresh)
            }
        }
    }

    /// Creates the chunk at `pos` regardless of the frame budget: acquires
    /// storage, generates terrain, links neighbours and meshes. Returns the
    /// storage origin and the number of meshes rebuilt, counting neighbours of
    /// an evicted chunk.
    pub fn load_chunk<B>(&mut self, pos: ChunkPos, focal_chunk: ChunkPos, builder: &mut B) -> (Storage, usize)
    where
        B: MeshBuilder<Handle = H>,
    {
        let remeshed_before = self.stats.remeshed;
        let (mut chunk, storage) = self.acquire_storage(focal_chunk, builder);
        chunk.generate(pos, &self.terrain);
        self.stats.generated += 1;
        match storage {
            Storage::Recycled(old) => log::debug!(
                "chunk ({}, {}) generated in storage of ({}, {})",
                pos.x,
                pos.z,
                old.x,
                old.z
            ),
            Storage::Fresh => log::debug!("chunk ({}, {}) generated in fresh storage", pos.x, pos.z),
        }
        self.chunks.insert(pos, chunk);

        let mut dirty = vec![pos];
        for side in Lateral::ALL {
            let npos = pos.neighbor(side);
            let present = match self.chunks.get_mut(&npos) {
                Some(n) => {
                    if !n.neighbor_exists(side.opposite()) {
                        n.set_neighbor_exists(side.opposite(), true);
                        dirty.push(npos);
                    }
                    true
                }
                None => false,
            };
            if let Some(c) = self.chunks.get_mut(&pos) {
                c.set_neighbor_exists(side, present);
            }
        }
        for p in dirty {
            self.remesh(p, builder);
        }
        (storage, (self.stats.remeshed - remeshed_before) as usize)
    }

    /// Rebuilds the mesh of the chunk at `pos` from its current neighbours.
    pub fn remesh<B>(&mut self, pos: ChunkPos, builder: &mut B) -> bool
    where
        B: MeshBuilder<Handle = H>,
    {
        let Some(id) = self.chunks.get_checked(&pos) else {
            return false;
        };
        {
            let Some(chunk) = self.chunks.value(id) else {
                return false;
            };
            let neighbors = Lateral::ALL.map(|side| self.chunks.get(&pos.neighbor(side)));
            build_chunk_vertices(chunk, &neighbors, &mut self.scratch);
        }
        let Some(chunk) = self.chunks.value_mut(id) else {
            return false;
        };
        replace_mesh(&mut chunk.mesh, &self.scratch, builder);
        self.stats.remeshed += 1;
        true
    }

    /// Chunks with a mesh and their world offsets. Insertion order, or
    /// farthest first from `focal` when `sort` is set.
    pub fn draw_list(&self, focal: Vec3, sort: bool) -> Vec<DrawItem<'_, H>> {
        let mut items: Vec<DrawItem<'_, H>> = self
            .chunks
            .iter()
            .filter_map(|(pos, chunk)| {
                chunk.mesh.as_ref().map(|mesh| DrawItem {
                    pos: *pos,
                    offset: pos.world_origin(),
                    mesh,
                })
            })
            .collect();
        if sort {
            let center = ChunkPos::from_world(focal);
            items.sort_by_key(|item| std::cmp::Reverse(item.pos.manhattan(center)));
        }
        items
    }

    /// Block at a world cell. `None` when the chunk is absent or `y` is out of range.
    pub fn get_block(&self, world: [i32; 3]) -> Option<Block> {
        let (pos, x, y, z) = split_world(world)?;
        self.chunks.get(&pos).map(|c| c.get_local(x, y, z))
    }

    /// Writes a block and remeshes the chunk plus any loaded neighbour sharing
    /// the touched edge. Returns `false` when the cell is not loaded.
    pub fn set_block<B>(&mut self, world: [i32; 3], id: BlockId, builder: &mut B) -> bool
    where
        B: MeshBuilder<Handle = H>,
    {
        let Some((pos, x, y, z)) = split_world(world) else {
            return false;
        };
        let block = if id == BlockId::Air {
            Block::AIR
        } else {
            Block::new(id, self.terrain.color_at(id, world[0], world[1], world[2]))
        };
        let Some(chunk) = self.chunks.get_mut(&pos) else {
            return false;
        };
        chunk.set_local(x, y, z, block);
        self.stats.edits += 1;

        self.remesh(pos, builder);
        let last = CHUNK_WIDTH - 1;
        let touched = [
            (x == last, Lateral::PosX),
            (x == 0, Lateral::NegX),
            (z == last, Lateral::PosZ),
            (z == 0, Lateral::NegZ),
        ];
        for (edge, side) in touched {
            if edge {
                self.remesh(pos.neighbor(side), builder);
            }
        }
        true
    }

    /// Walks the grid from `origin` along `ray`; the ray's length is the
    /// reach. Cells above or below the world are air, and the walk ends there
    /// once the ray points away from the world; entering a chunk that is not
    /// loaded also ends the walk with no hit.
    pub fn cast_ray(&self, origin: Vec3, ray: Vec3) -> Option<RayHit> {
        let mut cached: Option<(ChunkPos, &Chunk<H>)> = None;
        let hit = raycast_visit(origin, ray, ray.length(), |cell| {
            let Some((pos, x, y, z)) = split_world(cell) else {
                // outside the height range and not heading back into it
                let leaving = (cell[1] >= 0 && ray.y >= 0.0) || (cell[1] < 0 && ray.y <= 0.0);
                return if leaving { Visit::Stop } else { Visit::Empty };
            };
            let chunk = match cached {
                Some((p, c)) if p == pos => c,
                _ => match self.chunks.get_checked(&pos).and_then(|id| self.chunks.value(id)) {
                    Some(c) => {
                        cached = Some((pos, c));
                        c
                    }
                    None => return Visit::Stop,
                },
            };
            let b = chunk.get_local(x, y, z);
            if b.is_air() { Visit::Empty } else { Visit::Hit(b) }
        })?;
        Some(RayHit {
            block: hit.value,
            pos: hit.pos,
            normal: hit.normal,
            t: hit.t,
        })
    }

    /// Destroys every mesh and drops all chunks.
    pub fn clear<B>(&mut self, builder: &mut B)
    where
        B: MeshBuilder<Handle = H>,
    {
        while let Some(id) = self.chunks.first() {
            if let Some((_, mut chunk)) = self.chunks.remove(id) {
                if let Some(h) = chunk.mesh.take() {
                    builder.destroy_mesh(h);
                }
            }
        }
        self.chunks.clear();
    }
}
