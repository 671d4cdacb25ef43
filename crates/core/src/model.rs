//! Map content records shared by both clipboard orchestrators.
//!
//! The same schema is used for in-memory snapshots and for the clipboard wire
//! payload, so parsing happens once at the serialization boundary and the
//! translator walks typed fields instead of looking up names in loose maps.
//!
//! # Contracts
//! - **Invariant**: `Item::items` is the ordered content of a container, bottom first.
//! - **Invariant**: `Tile::extra` is carried verbatim; nothing in this crate reads it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Numeric identifier of an item type within one content revision.
pub type ItemId = u32;

/// Absolute map position (teleport destinations, spawn centers).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: u16,
    pub y: u16,
    pub z: u8,
}

impl Position {
    pub const fn new(x: u16, y: u16, z: u8) -> Self {
        Self { x, y, z }
    }
}

/// Raw attribute-map entry, kept as bytes for round-trip fidelity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAttribute {
    pub key: String,
    pub kind: u8,
    pub raw: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Visual id, if the host tracks one. Never translated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Position>,
    /// Container contents.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_map: Vec<ItemAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depot_id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_door_id: Option<u8>,
}

impl Item {
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_count(mut self, count: u16) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_contents(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    pub fn is_container(&self) -> bool {
        !self.items.is_empty()
    }

    /// Rebuilds the item under a new id, keeping every other attribute.
    pub fn with_id(&self, id: ItemId) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }
}

/// A monster or NPC standing on a tile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawn_time: Option<u32>,
}

impl Creature {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One creature slot inside a spawn area, relative to the spawn center.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub name: String,
    #[serde(default)]
    pub dx: i32,
    #[serde(default)]
    pub dy: i32,
    #[serde(default)]
    pub spawn_time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

impl SpawnEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Spawn marker anchored on a tile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnArea {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Position>,
    #[serde(default)]
    pub radius: u32,
    #[serde(default, alias = "monsters", alias = "npcs")]
    pub entries: Vec<SpawnEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub x: u16,
    pub y: u16,
    pub z: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground: Option<Item>,
    /// Stacked items, bottom to top.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_id: Option<u32>,
    #[serde(default)]
    pub map_flags: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zones: Vec<u16>,
    #[serde(default)]
    pub modified: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub monsters: Vec<Creature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npc: Option<Creature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawn_monster: Option<SpawnArea>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawn_npc: Option<SpawnArea>,
    /// Collaborator fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Tile {
    pub fn new(x: u16, y: u16, z: u8) -> Self {
        Self {
            x,
            y,
            z,
            ..Self::default()
        }
    }

    pub fn with_ground(mut self, ground: Item) -> Self {
        self.ground = Some(ground);
        self
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    pub fn with_monsters(mut self, monsters: Vec<Creature>) -> Self {
        self.monsters = monsters;
        self
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y, self.z)
    }

    /// Ground followed by the stacked items.
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.ground.iter().chain(self.items.iter())
    }
}
