mod common;

use map_content_migration::{
    ClipError, Item, MigrationConfig, MigrationContext, StructuredClipboard, Tile, VersionMapping,
    VersionTable,
};

use common::{spawn_tile, two_revision_index};

#[test]
fn structured_paste_translates_by_content_hash() {
    let index = two_revision_index();
    let mut clipboard = StructuredClipboard::new();
    clipboard
        .copy(&[Tile::new(5, 5, 7).with_ground(Item::new(100))], "v1")
        .expect("copy");

    let pasted = clipboard.paste("v2", Some(&index)).expect("paste");
    assert_eq!(pasted[0].ground.as_ref().map(|g| g.id), Some(200));
}

#[test]
fn structured_paste_translates_container_and_child_separately() {
    let index = two_revision_index();
    let mut clipboard = StructuredClipboard::new();
    let chest = Item::new(100).with_contents(vec![Item::new(300)]);
    clipboard
        .copy(&[Tile::new(5, 5, 7).with_items(vec![chest])], "v1")
        .expect("copy");

    let pasted = clipboard.paste("v2", Some(&index)).expect("paste");
    assert_eq!(pasted[0].items[0].id, 200);
    assert_eq!(pasted[0].items[0].items[0].id, 400);
}

#[test]
fn structured_paste_round_trips_back_to_source_revision() {
    let index = two_revision_index();
    let mut clipboard = StructuredClipboard::new();
    clipboard.copy(&[spawn_tile()], "v1").expect("copy v1");
    let forward = clipboard.paste("v2", Some(&index)).expect("paste v2");

    clipboard.copy(&forward, "v2").expect("copy v2");
    let back = clipboard.paste("v1", Some(&index)).expect("paste v1");
    let mut expected = spawn_tile();
    expected.modified = true;
    assert_eq!(back, vec![expected]);
}

#[test]
fn paste_before_copy_is_empty_clipboard() {
    let clipboard = StructuredClipboard::new();
    let index = two_revision_index();
    assert!(matches!(
        clipboard.paste("v2", Some(&index)),
        Err(ClipError::EmptyClipboard)
    ));
}

#[test]
fn mapping_fallback_and_reverse_synthesis() {
    let mut table = VersionTable::new();
    assert_eq!(table.translate_item(100, "A", "B"), 100);

    table.add(VersionMapping::new("A", "B").with_item(100, 200));
    assert_eq!(table.translate_item(100, "A", "B"), 200);
    assert_eq!(table.translate_item(101, "A", "B"), 101);

    let reverse = table.resolve("B", "A").expect("inverse").clone();
    assert_eq!(reverse.item_map.into_iter().collect::<Vec<_>>(), vec![(200, 100)]);
}

#[test]
fn flat_path_moves_spawn_tile_between_instances() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mappings = dir.path().join("mappings.json");
    std::fs::write(
        &mappings,
        r#"{
            "v1->v2": {
                "items": { "100": 200, "300": 400 },
                "creatures": { "Demon": "Demon Lord", "Sam": "Samuel" }
            }
        }"#,
    )
    .expect("write mappings");
    let config_path = dir.path().join("mcm.toml");
    std::fs::write(&config_path, "mapping_file = \"mappings.json\"\ncompress = true\n")
        .expect("write config");

    let config = MigrationConfig::load(&config_path).expect("config");
    let mut sender = MigrationContext::from_config(config.clone());
    let mut receiver = MigrationContext::from_config(config);

    sender.clipboard.copy(&[spawn_tile()], "v1").expect("copy");
    let text = sender.export_clipboard().expect("export");

    let decoded = receiver.import_clipboard(&text, "v2").expect("import");
    let tile = &decoded.tiles[0];
    assert_eq!(decoded.source_revision, "v1");
    assert!(decoded.checksum_ok);
    assert_eq!(tile.ground.as_ref().map(|g| g.id), Some(200));
    assert_eq!(tile.items[0].id, 400);
    assert_eq!(tile.monsters[0].name, "Demon Lord");
    assert_eq!(tile.npc.as_ref().map(|n| n.name.as_str()), Some("Samuel"));
    assert_eq!(
        tile.spawn_monster.as_ref().map(|s| s.entries[0].name.as_str()),
        Some("Demon Lord")
    );
    assert_eq!(tile.house_id, Some(12));
    assert_eq!(tile.map_flags, 0x4);

    let back = receiver.import_clipboard(&text, "v1").expect("same revision");
    assert_eq!(back.tiles, vec![spawn_tile()]);
}
