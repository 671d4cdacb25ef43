//! Content-addressed index of visual assets across content revisions.
//!
//! Two assets are equivalent when their pixel data and dimensions hash to the
//! same value, whatever their numeric ids or revision scopes are. This is exact
//! content addressing only; near-duplicates are never matched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::IndexError;
use crate::model::ItemId;

/// SHA-256 over `width (u32 LE) || height (u32 LE) || rgba pixels`.
pub type ContentHash = [u8; 32];

const BYTES_PER_PIXEL: usize = 4;

/// Identity of an asset within one revision.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetKey {
    pub scope: String,
    pub asset_id: ItemId,
}

impl AssetKey {
    pub fn new(scope: impl Into<String>, asset_id: ItemId) -> Self {
        Self {
            scope: scope.into(),
            asset_id,
        }
    }
}

impl std::fmt::Display for AssetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.scope, self.asset_id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub key: AssetKey,
    pub content_hash: ContentHash,
}

/// Computes the content hash of an RGBA raster.
pub fn compute_content_hash(
    pixels: &[u8],
    width: u32,
    height: u32,
) -> Result<ContentHash, IndexError> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|area| area.checked_mul(BYTES_PER_PIXEL))
        .unwrap_or(usize::MAX);
    if pixels.len() != expected {
        return Err(IndexError::DimensionMismatch {
            width,
            height,
            expected,
            actual: pixels.len(),
        });
    }
    let mut hasher = Sha256::new();
    hasher.update(width.to_le_bytes());
    hasher.update(height.to_le_bytes());
    hasher.update(pixels);
    Ok(hasher.finalize().into())
}

pub fn content_hash_hex(hash: &ContentHash) -> String {
    let mut output = String::with_capacity(hash.len() * 2);
    for byte in hash {
        use std::fmt::Write as _;
        let _ = write!(&mut output, "{byte:02x}");
    }
    output
}

/// Bidirectional table: `(scope, id) -> hash` and `hash -> [(scope, id)]`.
///
/// Buckets keep registration order, which is the iteration order
/// [`ContentHashIndex::find_equivalents`] reports.
#[derive(Debug, Default, Clone)]
pub struct ContentHashIndex {
    by_key: HashMap<AssetKey, ContentHash>,
    by_hash: HashMap<ContentHash, Vec<AssetKey>>,
}

impl ContentHashIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes and registers an RGBA raster under `(scope, asset_id)`.
    ///
    /// Registering the same key again replaces its previous hash.
    pub fn register(
        &mut self,
        scope: &str,
        asset_id: ItemId,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Result<ContentHash, IndexError> {
        let hash = compute_content_hash(pixels, width, height)?;
        self.register_hash(scope, asset_id, hash);
        Ok(hash)
    }

    /// Registers a precomputed hash.
    pub fn register_hash(&mut self, scope: &str, asset_id: ItemId, hash: ContentHash) {
        let key = AssetKey::new(scope, asset_id);
        if let Some(previous) = self.by_key.insert(key.clone(), hash) {
            if previous == hash {
                return;
            }
            self.detach(&key, &previous);
        }
        self.by_hash.entry(hash).or_default().push(key);
    }

    pub fn hash_of(&self, scope: &str, asset_id: ItemId) -> Option<ContentHash> {
        self.by_key.get(&AssetKey::new(scope, asset_id)).copied()
    }

    /// Every registered asset with this hash, across all scopes.
    pub fn find_equivalents(&self, hash: &ContentHash) -> &[AssetKey] {
        self.by_hash.get(hash).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Assets visually identical to `(scope, asset_id)`, excluding itself.
    pub fn equivalents_of(&self, scope: &str, asset_id: ItemId) -> Vec<&AssetKey> {
        let Some(hash) = self.hash_of(scope, asset_id) else {
            return Vec::new();
        };
        self.find_equivalents(&hash)
            .iter()
            .filter(|key| !(key.scope == scope && key.asset_id == asset_id))
            .collect()
    }

    pub fn records(&self) -> impl Iterator<Item = AssetRecord> + '_ {
        self.by_key.iter().map(|(key, hash)| AssetRecord {
            key: key.clone(),
            content_hash: *hash,
        })
    }

    /// Distinct scopes, sorted.
    pub fn scopes(&self) -> Vec<&str> {
        let mut scopes: Vec<&str> = self.by_key.keys().map(|key| key.scope.as_str()).collect();
        scopes.sort_unstable();
        scopes.dedup();
        scopes
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_key.clear();
        self.by_hash.clear();
    }

    fn detach(&mut self, key: &AssetKey, hash: &ContentHash) {
        if let Some(bucket) = self.by_hash.get_mut(hash) {
            bucket.retain(|existing| existing != key);
            if bucket.is_empty() {
                self.by_hash.remove(hash);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/content_index_tests.rs"]
mod tests;
