use proptest::prelude::*;
use quarry_chunk::{Chunk, idx};
use quarry_world::{CHUNK_HEIGHT, CHUNK_VOLUME, CHUNK_WIDTH, ChunkPos, TerrainGen, WorldGenParams};

fn chunk_coord() -> impl Strategy<Value = ChunkPos> {
    (-10_000i32..10_000, -10_000i32..10_000).prop_map(|(x, z)| ChunkPos::new(x, z))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    // regenerating recycled storage must match fresh storage exactly
    #[test]
    fn recycled_storage_matches_fresh(a in chunk_coord(), b in chunk_coord(), seed in any::<i32>()) {
        let terrain = TerrainGen::from_params(WorldGenParams { seed, ..WorldGenParams::default() });

        let mut recycled: Chunk<u32> = Chunk::new_zeroed(a);
        recycled.generate(a, &terrain);
        recycled.neighbors_exist = [true; 4];
        recycled.generate(b, &terrain);

        let mut fresh: Chunk<u32> = Chunk::new_zeroed(b);
        fresh.generate(b, &terrain);

        prop_assert_eq!(recycled.neighbors_exist, [false; 4]);
        prop_assert!(recycled.blocks == fresh.blocks);
    }

    #[test]
    fn idx_is_a_bijection(x in 0usize..CHUNK_WIDTH, y in 0usize..CHUNK_HEIGHT, z in 0usize..CHUNK_WIDTH) {
        let i = idx(x, y, z);
        prop_assert!(i < CHUNK_VOLUME);
        prop_assert_eq!(i % CHUNK_WIDTH, x);
        prop_assert_eq!((i / CHUNK_WIDTH) % CHUNK_WIDTH, z);
        prop_assert_eq!(i / (CHUNK_WIDTH * CHUNK_WIDTH), y);
    }

    #[test]
    fn every_column_has_bedrock_and_one_grass(c in chunk_coord()) {
        let terrain = TerrainGen::from_params(WorldGenParams::default());
        let mut ch: Chunk<()> = Chunk::new_zeroed(c);
        ch.generate(c, &terrain);
        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                prop_assert_eq!(ch.get_local(x, 0, z).id, quarry_blocks::BlockId::Bedrock as u8);
                let grass = (0..CHUNK_HEIGHT)
                    .filter(|&y| ch.get_local(x, y, z).id == quarry_blocks::BlockId::Grass as u8)
                    .count();
                prop_assert_eq!(grass, 1);
            }
        }
    }
}
