//! Structure-preserving identifier translation over tile snapshots.
//!
//! Both orchestrators drive the same [`TileTranslator`]; they differ only in
//! the [`IdResolver`] they plug in. A resolver miss always keeps the original
//! value.

use serde::{Deserialize, Serialize};

use crate::content_index::{AssetKey, ContentHashIndex};
use crate::error::{ClipError, ClipResult};
use crate::mapping::VersionMapping;
use crate::model::{Creature, Item, ItemId, SpawnArea, Tile};

/// Answers "what is this identifier called in the target revision".
pub trait IdResolver {
    fn resolve_item(&self, id: ItemId) -> Option<ItemId>;

    fn resolve_creature(&self, _name: &str) -> Option<&str> {
        None
    }
}

impl IdResolver for VersionMapping {
    fn resolve_item(&self, id: ItemId) -> Option<ItemId> {
        self.item_map.get(&id).copied()
    }

    fn resolve_creature(&self, name: &str) -> Option<&str> {
        self.name_map.get(name).map(String::as_str)
    }
}

/// How to pick among several visually identical candidates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidatePolicy {
    /// First candidate in index registration order.
    #[default]
    FirstRegistered,
    /// First candidate registered under the paste target revision, else
    /// the first registered one.
    TargetScopeFirst,
    /// First candidate registered under the paste target revision. With
    /// none, the id is left unchanged.
    TargetScopeOnly,
    /// Smallest `(scope, asset_id)`.
    LowestKey,
}

impl CandidatePolicy {
    pub fn select<'a>(
        &self,
        candidates: &[&'a AssetKey],
        target_scope: &str,
    ) -> Option<&'a AssetKey> {
        match self {
            CandidatePolicy::FirstRegistered => candidates.first().copied(),
            CandidatePolicy::TargetScopeFirst => candidates
                .iter()
                .find(|key| key.scope == target_scope)
                .or_else(|| candidates.first())
                .copied(),
            CandidatePolicy::TargetScopeOnly => candidates
                .iter()
                .find(|key| key.scope == target_scope)
                .copied(),
            CandidatePolicy::LowestKey => candidates.iter().min().copied(),
        }
    }
}

/// Resolves item ids through content-hash equivalence.
///
/// Creatures are never renamed: outfit translation is not implemented.
#[derive(Debug)]
pub struct ContentResolver<'a> {
    index: &'a ContentHashIndex,
    source_scope: &'a str,
    target_scope: &'a str,
    policy: CandidatePolicy,
}

impl<'a> ContentResolver<'a> {
    pub fn new(
        index: &'a ContentHashIndex,
        source_scope: &'a str,
        target_scope: &'a str,
        policy: CandidatePolicy,
    ) -> Self {
        Self {
            index,
            source_scope,
            target_scope,
            policy,
        }
    }
}

impl IdResolver for ContentResolver<'_> {
    fn resolve_item(&self, id: ItemId) -> Option<ItemId> {
        let candidates = self.index.equivalents_of(self.source_scope, id);
        self.policy
            .select(&candidates, self.target_scope)
            .map(|key| key.asset_id)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TranslationStats {
    pub tiles: usize,
    pub items_visited: usize,
    pub items_remapped: usize,
    pub names_visited: usize,
    pub names_remapped: usize,
}

/// Rebuilds tiles with every item id and creature name passed through a resolver.
///
/// Container contents are translated before the container itself. Nesting
/// is bounded by `max_depth`.
pub struct TileTranslator<'r, R: IdResolver + ?Sized> {
    resolver: &'r R,
    max_depth: usize,
    mark_modified: bool,
    stats: TranslationStats,
}

impl<'r, R: IdResolver + ?Sized> TileTranslator<'r, R> {
    pub fn new(resolver: &'r R, max_depth: usize) -> Self {
        Self {
            resolver,
            max_depth,
            mark_modified: false,
            stats: TranslationStats::default(),
        }
    }

    /// Flag every produced tile as modified.
    pub fn mark_modified(mut self, mark: bool) -> Self {
        self.mark_modified = mark;
        self
    }

    pub fn stats(&self) -> TranslationStats {
        self.stats
    }

    pub fn translate_tiles(&mut self, tiles: &[Tile]) -> ClipResult<Vec<Tile>> {
        tiles.iter().map(|tile| self.translate_tile(tile)).collect()
    }

    pub fn translate_tile(&mut self, tile: &Tile) -> ClipResult<Tile> {
        let ground = match &tile.ground {
            Some(ground) => Some(self.translate_item(ground, 0)?),
            None => None,
        };
        let items = tile
            .items
            .iter()
            .map(|item| self.translate_item(item, 0))
            .collect::<ClipResult<Vec<_>>>()?;
        let monsters = tile
            .monsters
            .iter()
            .map(|monster| self.translate_creature(monster))
            .collect();
        let npc = tile.npc.as_ref().map(|npc| self.translate_creature(npc));
        let spawn_monster = tile
            .spawn_monster
            .as_ref()
            .map(|spawn| self.translate_spawn(spawn));
        let spawn_npc = tile
            .spawn_npc
            .as_ref()
            .map(|spawn| self.translate_spawn(spawn));

        self.stats.tiles += 1;
        Ok(Tile {
            x: tile.x,
            y: tile.y,
            z: tile.z,
            ground,
            items,
            house_id: tile.house_id,
            map_flags: tile.map_flags,
            zones: tile.zones.clone(),
            modified: tile.modified || self.mark_modified,
            monsters,
            npc,
            spawn_monster,
            spawn_npc,
            extra: tile.extra.clone(),
        })
    }

    pub fn translate_item(&mut self, item: &Item, depth: usize) -> ClipResult<Item> {
        if item.is_container() && depth >= self.max_depth {
            return Err(ClipError::NestingTooDeep {
                limit: self.max_depth,
            });
        }
        let contents = item
            .items
            .iter()
            .map(|child| self.translate_item(child, depth + 1))
            .collect::<ClipResult<Vec<_>>>()?;

        self.stats.items_visited += 1;
        let id = match self.resolver.resolve_item(item.id) {
            Some(id) if id != item.id => {
                self.stats.items_remapped += 1;
                id
            }
            _ => item.id,
        };
        Ok(Item {
            id,
            client_id: item.client_id,
            subtype: item.subtype,
            count: item.count,
            text: item.text.clone(),
            description: item.description.clone(),
            action_id: item.action_id,
            unique_id: item.unique_id,
            destination: item.destination,
            items: contents,
            attribute_map: item.attribute_map.clone(),
            depot_id: item.depot_id,
            house_door_id: item.house_door_id,
        })
    }

    fn translate_creature(&mut self, creature: &Creature) -> Creature {
        Creature {
            name: self.translate_name(&creature.name),
            ..creature.clone()
        }
    }

    fn translate_spawn(&mut self, spawn: &SpawnArea) -> SpawnArea {
        let entries = spawn
            .entries
            .iter()
            .map(|entry| {
                let mut entry = entry.clone();
                entry.name = self.translate_name(&entry.name);
                entry
            })
            .collect();
        SpawnArea {
            entries,
            ..spawn.clone()
        }
    }

    fn translate_name(&mut self, name: &str) -> String {
        let resolver = self.resolver;
        self.stats.names_visited += 1;
        match resolver.resolve_creature(name) {
            Some(mapped) if mapped != name => {
                self.stats.names_remapped += 1;
                mapped.to_string()
            }
            _ => name.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "tests/translate_tests.rs"]
mod tests;
