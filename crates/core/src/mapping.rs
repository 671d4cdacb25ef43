//! Explicit item/creature translation tables between content revisions.
//!
//! Mapping files are JSON objects keyed by `"<from>-><to>"`:
//!
//! ```json
//! {
//!   "10.98->12.90": {
//!     "items": { "2160": 2161 },
//!     "creatures": { "Demon": "Greater Demon" }
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::MappingError;
use crate::model::ItemId;

const PAIR_SEPARATOR: &str = "->";

/// Translation pairs for one ordered `(from, to)` revision pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VersionMapping {
    pub from_revision: String,
    pub to_revision: String,
    pub item_map: BTreeMap<ItemId, ItemId>,
    pub name_map: BTreeMap<String, String>,
}

impl VersionMapping {
    pub fn new(from_revision: impl Into<String>, to_revision: impl Into<String>) -> Self {
        Self {
            from_revision: from_revision.into(),
            to_revision: to_revision.into(),
            ..Self::default()
        }
    }

    pub fn with_item(mut self, from: ItemId, to: ItemId) -> Self {
        self.item_map.insert(from, to);
        self
    }

    pub fn with_name(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.name_map.insert(from.into(), to.into());
        self
    }

    pub fn translate_item(&self, id: ItemId) -> ItemId {
        self.item_map.get(&id).copied().unwrap_or(id)
    }

    pub fn translate_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.name_map.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Swaps keys and values. When several keys share a value, the largest
    /// key wins because entries are visited in ascending order.
    pub fn inverted(&self) -> Self {
        Self {
            from_revision: self.to_revision.clone(),
            to_revision: self.from_revision.clone(),
            item_map: self.item_map.iter().map(|(k, v)| (*v, *k)).collect(),
            name_map: self
                .name_map
                .iter()
                .map(|(k, v)| (v.clone(), k.clone()))
                .collect(),
        }
    }

    fn pair_key(&self) -> (String, String) {
        (self.from_revision.clone(), self.to_revision.clone())
    }
}

#[derive(Debug, Deserialize)]
struct MappingFileEntry {
    #[serde(default)]
    items: BTreeMap<String, ItemId>,
    #[serde(default)]
    creatures: BTreeMap<String, String>,
}

/// All known revision mappings plus the lazily derived inverses.
///
/// Not synchronized: `resolve` fills the inverse cache, so callers sharing a
/// table across threads must serialize access themselves.
#[derive(Debug, Default)]
pub struct VersionTable {
    mappings: HashMap<(String, String), VersionMapping>,
    reverse_cache: HashMap<(String, String), VersionMapping>,
}

impl VersionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads mappings from a JSON file, reporting failure through the return flag.
    ///
    /// On failure the table keeps its prior contents.
    pub fn load_from_file(&mut self, path: &Path) -> bool {
        match self.try_load_from_file(path) {
            Ok(count) => {
                info!(path = %path.display(), count, "loaded version mappings");
                true
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to load version mappings");
                false
            }
        }
    }

    pub fn try_load_from_file(&mut self, path: &Path) -> Result<usize, MappingError> {
        let raw = std::fs::read_to_string(path)?;
        self.load_from_str(&raw)
    }

    /// Parses every entry before committing any of them.
    pub fn load_from_str(&mut self, raw: &str) -> Result<usize, MappingError> {
        let entries: BTreeMap<String, serde_json::Value> = serde_json::from_str(raw)?;
        let mut staged = Vec::with_capacity(entries.len());
        for (pair, value) in entries {
            let Some((from, to)) = pair.split_once(PAIR_SEPARATOR) else {
                continue;
            };
            let entry: MappingFileEntry = serde_json::from_value(value)?;
            let mut mapping = VersionMapping::new(from.trim(), to.trim());
            for (raw_id, target) in entry.items {
                let source = raw_id
                    .trim()
                    .parse::<ItemId>()
                    .map_err(|_| MappingError::InvalidItemId {
                        pair: pair.clone(),
                        raw: raw_id.clone(),
                    })?;
                mapping.item_map.insert(source, target);
            }
            mapping.name_map = entry.creatures;
            staged.push(mapping);
        }
        let count = staged.len();
        for mapping in staged {
            self.add(mapping);
        }
        Ok(count)
    }

    /// Adds or wholesale-replaces the mapping for its `(from, to)` pair.
    pub fn add(&mut self, mapping: VersionMapping) {
        let (from, to) = mapping.pair_key();
        self.reverse_cache.remove(&(to.clone(), from.clone()));
        self.mappings.insert((from, to), mapping);
    }

    /// Direct mapping first, then the cached or freshly derived inverse of
    /// the reverse pair.
    pub fn resolve(&mut self, from: &str, to: &str) -> Option<&VersionMapping> {
        let key = (from.to_string(), to.to_string());
        if self.mappings.contains_key(&key) {
            return self.mappings.get(&key);
        }
        if !self.reverse_cache.contains_key(&key) {
            let reverse_key = (to.to_string(), from.to_string());
            let inverse = self.mappings.get(&reverse_key)?.inverted();
            self.reverse_cache.insert(key.clone(), inverse);
        }
        self.reverse_cache.get(&key)
    }

    pub fn translate_item(&mut self, id: ItemId, from: &str, to: &str) -> ItemId {
        if from == to {
            return id;
        }
        self.resolve(from, to)
            .map(|mapping| mapping.translate_item(id))
            .unwrap_or(id)
    }

    pub fn translate_name(&mut self, name: &str, from: &str, to: &str) -> String {
        if from == to {
            return name.to_string();
        }
        self.resolve(from, to)
            .map(|mapping| mapping.translate_name(name).to_string())
            .unwrap_or_else(|| name.to_string())
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn cached_inverses(&self) -> usize {
        self.reverse_cache.len()
    }
}

#[cfg(test)]
#[path = "tests/mapping_tests.rs"]
mod tests;
