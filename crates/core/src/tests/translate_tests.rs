use super::*;
use crate::model::{Position, SpawnEntry};

fn nested(depth: usize, leaf: ItemId) -> Item {
    let mut item = Item::new(leaf);
    for level in 0..depth {
        item = Item::new(1_000 + level as ItemId).with_contents(vec![item]);
    }
    item
}

#[test]
fn mapping_resolver_rewrites_ids_and_names_everywhere() {
    let mapping = VersionMapping::new("a", "b")
        .with_item(10, 11)
        .with_item(20, 21)
        .with_item(30, 31)
        .with_name("Demon", "Greater Demon")
        .with_name("Sam", "Samuel");

    let mut tile = Tile::new(1, 2, 7)
        .with_ground(Item::new(10))
        .with_items(vec![Item::new(20).with_contents(vec![Item::new(30)])])
        .with_monsters(vec![Creature::named("Demon")]);
    tile.npc = Some(Creature::named("Sam"));
    tile.spawn_monster = Some(SpawnArea {
        center: Some(Position::new(1, 2, 7)),
        radius: 3,
        entries: vec![SpawnEntry::named("Demon"), SpawnEntry::named("Rat")],
    });
    tile.spawn_npc = Some(SpawnArea {
        center: None,
        radius: 1,
        entries: vec![SpawnEntry::named("Sam")],
    });

    let mut translator = TileTranslator::new(&mapping, 8);
    let out = translator.translate_tile(&tile).expect("translate");

    assert_eq!(out.ground.as_ref().map(|g| g.id), Some(11));
    assert_eq!(out.items[0].id, 21);
    assert_eq!(out.items[0].items[0].id, 31);
    assert_eq!(out.monsters[0].name, "Greater Demon");
    assert_eq!(out.npc.as_ref().map(|n| n.name.as_str()), Some("Samuel"));
    let spawn = out.spawn_monster.as_ref().expect("spawn monster");
    assert_eq!(spawn.entries[0].name, "Greater Demon");
    assert_eq!(spawn.entries[1].name, "Rat");
    assert_eq!(spawn.radius, 3);
    assert_eq!(
        out.spawn_npc.as_ref().map(|s| s.entries[0].name.as_str()),
        Some("Samuel")
    );
    assert!(!out.modified);

    let stats = translator.stats();
    assert_eq!(stats.tiles, 1);
    assert_eq!(stats.items_visited, 3);
    assert_eq!(stats.items_remapped, 3);
    assert_eq!(stats.names_visited, 5);
    assert_eq!(stats.names_remapped, 4);

    assert_eq!(tile.ground.as_ref().map(|g| g.id), Some(10), "input untouched");
}

#[test]
fn translation_preserves_item_attributes() {
    let mapping = VersionMapping::new("a", "b").with_item(10, 11);
    let mut item = Item::new(10).with_count(5);
    item.text = Some("hello".to_string());
    item.action_id = Some(1000);
    item.unique_id = Some(2000);
    item.destination = Some(Position::new(100, 200, 7));
    item.depot_id = Some(3);
    item.house_door_id = Some(4);
    item.attribute_map = vec![crate::model::ItemAttribute {
        key: "weight".to_string(),
        kind: 1,
        raw: vec![1, 2],
    }];

    let mut translator = TileTranslator::new(&mapping, 8);
    let out = translator.translate_item(&item, 0).expect("translate");
    assert_eq!(out, item.with_id(11));
}

#[test]
fn depth_limit_rejects_overly_nested_containers() {
    let mapping = VersionMapping::new("a", "b");
    let mut translator = TileTranslator::new(&mapping, 2);
    translator
        .translate_item(&nested(2, 7), 0)
        .expect("two container levels fit");

    let err = translator
        .translate_item(&nested(3, 7), 0)
        .expect_err("three container levels exceed the limit");
    assert!(matches!(err, ClipError::NestingTooDeep { limit: 2 }));
}

#[test]
fn mark_modified_flags_output_tiles() {
    let mapping = VersionMapping::new("a", "b");
    let mut translator = TileTranslator::new(&mapping, 4).mark_modified(true);
    let out = translator
        .translate_tiles(&[Tile::new(0, 0, 7), Tile::new(1, 0, 7)])
        .expect("translate");
    assert!(out.iter().all(|tile| tile.modified));
}

#[test]
fn content_resolver_never_renames_creatures() {
    let index = ContentHashIndex::new();
    let resolver = ContentResolver::new(&index, "a", "b", CandidatePolicy::default());
    assert_eq!(resolver.resolve_creature("Dragon"), None);
    assert_eq!(resolver.resolve_item(5), None);
}

#[test]
fn candidate_policies_are_deterministic() {
    let first = AssetKey::new("v3", 300);
    let second = AssetKey::new("v2", 250);
    let third = AssetKey::new("v2", 200);
    let candidates = vec![&first, &second, &third];

    assert_eq!(
        CandidatePolicy::FirstRegistered.select(&candidates, "v2"),
        Some(&first)
    );
    assert_eq!(
        CandidatePolicy::TargetScopeFirst.select(&candidates, "v2"),
        Some(&second)
    );
    assert_eq!(
        CandidatePolicy::TargetScopeFirst.select(&candidates, "v9"),
        Some(&first)
    );
    assert_eq!(
        CandidatePolicy::TargetScopeOnly.select(&candidates, "v2"),
        Some(&second)
    );
    assert_eq!(CandidatePolicy::TargetScopeOnly.select(&candidates, "v9"), None);
    assert_eq!(
        CandidatePolicy::LowestKey.select(&candidates, "v3"),
        Some(&third)
    );
    assert_eq!(CandidatePolicy::LowestKey.select(&[], "v3"), None);
}
