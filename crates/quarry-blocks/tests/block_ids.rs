use proptest::prelude::*;
use quarry_blocks::{Block, BlockId};
use serde::Deserialize;

#[derive(Deserialize)]
struct Pick {
    place: BlockId,
}

#[test]
fn block_id_reads_from_toml_by_name() {
    let p: Pick = toml::from_str(r#"place = "glass""#).unwrap();
    assert_eq!(p.place, BlockId::Glass);
    assert!(toml::from_str::<Pick>(r#"place = "lava""#).is_err());
}

proptest! {
    #[test]
    fn raw_ids_resolve_only_inside_table(id in any::<u8>()) {
        let b = Block { id, r: 0, g: 0, b: 0 };
        prop_assert_eq!(b.kind().is_some(), (id as usize) < BlockId::ALL.len());
        if b.is_transparent() {
            prop_assert!(matches!(b.kind(), Some(BlockId::Air) | Some(BlockId::Glass)));
        }
    }
}
