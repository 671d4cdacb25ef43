#![allow(dead_code)]

use map_content_migration::{ContentHashIndex, Creature, Item, SpawnArea, SpawnEntry, Tile};

/// Solid-colour RGBA raster of the given size.
pub fn solid(rgba: [u8; 4], width: u32, height: u32) -> Vec<u8> {
    rgba.repeat((width * height) as usize)
}

/// Index with a shared stone sprite (100 in v1, 200 in v2) and a shared
/// torch sprite (300 in v1, 400 in v2).
pub fn two_revision_index() -> ContentHashIndex {
    let stone = solid([0x80, 0x80, 0x80, 0xff], 32, 32);
    let torch = solid([0xff, 0xa0, 0x00, 0xff], 32, 32);
    let mut index = ContentHashIndex::new();
    index.register("v1", 100, &stone, 32, 32).expect("stone v1");
    index.register("v2", 200, &stone, 32, 32).expect("stone v2");
    index.register("v1", 300, &torch, 32, 32).expect("torch v1");
    index.register("v2", 400, &torch, 32, 32).expect("torch v2");
    index
}

pub fn spawn_tile() -> Tile {
    let mut tile = Tile::new(1000, 1000, 7)
        .with_ground(Item::new(100))
        .with_items(vec![Item::new(300)])
        .with_monsters(vec![Creature::named("Demon")]);
    tile.npc = Some(Creature::named("Sam"));
    tile.spawn_monster = Some(SpawnArea {
        center: None,
        radius: 3,
        entries: vec![SpawnEntry::named("Demon")],
    });
    tile.house_id = Some(12);
    tile.map_flags = 0x4;
    tile
}
