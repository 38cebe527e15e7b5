use quarry_blocks::BlockId;
use quarry_geom::Vec3;
use quarry_mesh_cpu::{HeadlessMeshBuilder, MeshId};
use quarry_runtime::{ChunkStore, Storage, StreamParams};
use quarry_world::{ChunkPos, ConstantNoise, Lateral, TerrainGen, WorldGenParams};

fn flat_store(radius: u32, budget: u32) -> ChunkStore<MeshId, ConstantNoise> {
    let params = StreamParams {
        radius,
        max_new_chunks_per_frame: budget,
        sort_draw_list: false,
    };
    let world = WorldGenParams {
        tree_chance: 0.0,
        ..WorldGenParams::default()
    };
    ChunkStore::new(params, TerrainGen::with_noise(world, ConstantNoise(0.0)))
}

fn chunk_center(x: i32, z: i32) -> Vec3 {
    Vec3::new(x as f32 * 16.0 + 8.0, 70.0, z as f32 * 16.0 + 8.0)
}

#[test]
fn eviction_takes_oldest_out_of_radius_first() {
    let mut b = HeadlessMeshBuilder::new();
    let mut store = flat_store(2, 1);
    let origin = ChunkPos::new(0, 0);
    for x in 0..4 {
        let (storage, _) = store.load_chunk(ChunkPos::new(x, 0), origin, &mut b);
        assert_eq!(storage, Storage::Fresh);
    }
    let focal = ChunkPos::new(5, 0);
    let order: Vec<Storage> = (0..4).map(|_| store.acquire_storage(focal, &mut b).1).collect();
    assert_eq!(
        order,
        vec![
            Storage::Recycled(ChunkPos::new(0, 0)),
            Storage::Recycled(ChunkPos::new(1, 0)),
            Storage::Recycled(ChunkPos::new(2, 0)),
            Storage::Fresh,
        ]
    );
    // (3, 0) is within distance 2 of (5, 0) and stays
    assert_eq!(store.positions().collect::<Vec<_>>(), vec![ChunkPos::new(3, 0)]);
    // its neighbour flag toward the evicted (2, 0) is cleared
    let kept = store.chunk(ChunkPos::new(3, 0)).unwrap();
    assert!(!kept.neighbor_exists(Lateral::NegX));
    // evicted meshes were destroyed
    assert_eq!(b.live_count(), 1);
}

fn mesh_vertices(store: &ChunkStore<MeshId, ConstantNoise>, b: &HeadlessMeshBuilder, pos: ChunkPos) -> usize {
    store
        .chunk(pos)
        .and_then(|c| c.mesh)
        .and_then(|id| b.vertex_count(id))
        .unwrap_or(0)
}

#[test]
fn eviction_remeshes_bordering_residents() {
    let mut b = HeadlessMeshBuilder::new();
    let mut store = flat_store(1, 5);
    store.stream(chunk_center(0, 0), &mut b);
    let o = ChunkPos::new(0, 0);
    let plain = mesh_vertices(&store, &b, o);

    // opening a cell just across the +x edge exposes one face of (0, 0)
    assert!(store.set_block([16, 63, 5], BlockId::Air, &mut b));
    assert_eq!(mesh_vertices(&store, &b, o), plain + 6);

    let report = store.stream(chunk_center(-1, 0), &mut b);
    assert!(!store.contains(ChunkPos::new(1, 0)));
    assert!(report.created.iter().any(|c| c.storage == Storage::Recycled(ChunkPos::new(1, 0))));
    let kept = store.chunk(o).unwrap();
    assert!(!kept.neighbor_exists(Lateral::PosX));
    // the face toward the evicted chunk is gone from the uploaded mesh
    assert_eq!(mesh_vertices(&store, &b, o), plain);
}

#[test]
fn at_most_one_chunk_per_frame() {
    let mut b = HeadlessMeshBuilder::new();
    let mut store = flat_store(2, 1);
    let mut total = 0;
    for frame in 0..20 {
        let before = store.len();
        let report = store.stream(chunk_center(0, 0), &mut b);
        assert!(report.created.len() <= 1, "frame {frame}");
        assert!(store.len() - before <= 1);
        total += report.created.len();
    }
    // 1 + 4 + 8 positions within radius 2
    assert_eq!(total, 13);
    assert_eq!(store.len(), 13);
}

#[test]
fn stream_fills_in_spiral_order() {
    let mut b = HeadlessMeshBuilder::new();
    let mut store = flat_store(1, 1);
    let mut created = Vec::new();
    for _ in 0..6 {
        created.extend(store.stream(chunk_center(0, 0), &mut b).created.into_iter().map(|c| c.pos));
    }
    assert_eq!(
        created,
        vec![
            ChunkPos::new(0, 0),
            ChunkPos::new(1, 0),
            ChunkPos::new(0, 1),
            ChunkPos::new(-1, 0),
            ChunkPos::new(0, -1),
        ]
    );
}

#[test]
fn moving_focal_recycles_storage() {
    let mut b = HeadlessMeshBuilder::new();
    let mut store = flat_store(1, 5);
    store.stream(chunk_center(0, 0), &mut b);
    assert_eq!(store.len(), 5);
    let report = store.stream(chunk_center(3, 0), &mut b);
    assert_eq!(report.created.len(), 5);
    assert!(
        report
            .created
            .iter()
            .all(|c| matches!(c.storage, Storage::Recycled(_)))
    );
    assert_eq!(store.len(), 5);
    assert_eq!(store.stats().allocated, 5);
    assert!(store.positions().all(|p| p.manhattan(ChunkPos::new(3, 0)) <= 1));
    // one live mesh per resident chunk
    assert_eq!(b.live_count(), store.len());
}

#[test]
fn neighbor_flags_follow_residency() {
    let mut b = HeadlessMeshBuilder::new();
    let mut store = flat_store(4, 1);
    let o = ChunkPos::new(0, 0);
    store.load_chunk(o, o, &mut b);
    assert_eq!(store.chunk(o).unwrap().neighbors_exist, [false; 4]);
    store.load_chunk(ChunkPos::new(1, 0), o, &mut b);
    assert!(store.chunk(o).unwrap().neighbor_exists(Lateral::PosX));
    assert!(store.chunk(ChunkPos::new(1, 0)).unwrap().neighbor_exists(Lateral::NegX));
}

#[test]
fn draw_list_sorts_far_to_near() {
    let mut b = HeadlessMeshBuilder::new();
    let mut store = flat_store(2, 13);
    store.stream(chunk_center(0, 0), &mut b);
    let items = store.draw_list(chunk_center(0, 0), true);
    assert_eq!(items.len(), 13);
    let d: Vec<i32> = items.iter().map(|i| i.pos.manhattan(ChunkPos::new(0, 0))).collect();
    assert!(d.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(items[12].pos, ChunkPos::new(0, 0));
    assert_eq!(items[0].offset.x, items[0].pos.x as f32 * 16.0);

    let plain = store.draw_list(chunk_center(0, 0), false);
    assert_eq!(plain[0].pos, ChunkPos::new(0, 0));
}

#[test]
fn edits_remesh_and_read_back() {
    let mut b = HeadlessMeshBuilder::new();
    let mut store = flat_store(1, 5);
    store.stream(chunk_center(0, 0), &mut b);
    let before = store.stats().remeshed;

    assert!(store.set_block([15, 65, 3], BlockId::Brick, &mut b));
    assert_eq!(store.get_block([15, 65, 3]).and_then(|b| b.kind()), Some(BlockId::Brick));
    // own chunk plus the +x neighbour across the edge
    assert_eq!(store.stats().remeshed - before, 2);

    assert!(!store.set_block([15, 256, 3], BlockId::Brick, &mut b));
    assert!(!store.set_block([100, 65, 3], BlockId::Brick, &mut b));
    assert_eq!(store.get_block([0, -1, 0]), None);
}

#[test]
fn clear_destroys_every_mesh() {
    let mut b = HeadlessMeshBuilder::new();
    let mut store = flat_store(2, 13);
    store.stream(chunk_center(0, 0), &mut b);
    assert!(b.live_count() > 0);
    store.clear(&mut b);
    assert!(store.is_empty());
    assert_eq!(b.live_count(), 0);
}
