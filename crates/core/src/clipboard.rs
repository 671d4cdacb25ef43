//! Single-slot clipboard that migrates pasted tiles by visual equivalence.
//!
//! # Contracts
//! - **Postcondition**: a successful `copy` owns deep copies; later edits to
//!   the caller's tiles never reach the snapshot.
//! - **Invariant**: `paste` never mutates the stored snapshot.
//! - A second `copy` replaces the previous snapshot without warning.

use serde::Serialize;
use tracing::debug;

use crate::content_index::ContentHashIndex;
use crate::error::{ClipError, ClipResult};
use crate::model::Tile;
use crate::resource::CodecLimits;
use crate::translate::{CandidatePolicy, ContentResolver, TileTranslator};

/// The owned copy captured by the last successful `copy`.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipboardSnapshot {
    pub tiles: Vec<Tile>,
    pub source_revision: String,
    pub tile_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClipboardStats {
    pub tile_count: usize,
    pub source_revision: String,
    pub has_data: bool,
}

#[derive(Debug, Default)]
pub struct StructuredClipboard {
    snapshot: Option<ClipboardSnapshot>,
    policy: CandidatePolicy,
    limits: CodecLimits,
}

impl StructuredClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: CandidatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_limits(mut self, limits: CodecLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn policy(&self) -> CandidatePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: CandidatePolicy) {
        self.policy = policy;
    }

    /// Stores deep copies of `tiles`, returning how many were copied.
    pub fn copy(&mut self, tiles: &[Tile], source_revision: &str) -> ClipResult<usize> {
        if tiles.is_empty() {
            return Err(ClipError::EmptyCopy);
        }
        let tiles = tiles.to_vec();
        let tile_count = tiles.len();
        self.snapshot = Some(ClipboardSnapshot {
            tiles,
            source_revision: source_revision.to_string(),
            tile_count,
        });
        debug!(tile_count, source_revision, "copied tiles to clipboard");
        Ok(tile_count)
    }

    /// Returns fresh tiles for `target_revision`.
    ///
    /// Without an index, or when the revisions match, the stored tiles come
    /// back unchanged. Otherwise every item id (container contents first) is
    /// swapped for a visually identical asset when one exists.
    pub fn paste(
        &self,
        target_revision: &str,
        index: Option<&ContentHashIndex>,
    ) -> ClipResult<Vec<Tile>> {
        let snapshot = self.snapshot.as_ref().ok_or(ClipError::EmptyClipboard)?;
        let Some(index) = index else {
            return Ok(snapshot.tiles.clone());
        };
        if snapshot.source_revision == target_revision {
            return Ok(snapshot.tiles.clone());
        }

        let resolver = ContentResolver::new(
            index,
            &snapshot.source_revision,
            target_revision,
            self.policy,
        );
        let mut translator =
            TileTranslator::new(&resolver, self.limits.max_container_depth).mark_modified(true);
        let tiles = translator.translate_tiles(&snapshot.tiles)?;
        let stats = translator.stats();
        debug!(
            tiles = stats.tiles,
            remapped = stats.items_remapped,
            from = %snapshot.source_revision,
            to = target_revision,
            "pasted tiles across revisions"
        );
        Ok(tiles)
    }

    pub fn snapshot(&self) -> Option<&ClipboardSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn has_data(&self) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(|snapshot| !snapshot.tiles.is_empty())
    }

    pub fn clear(&mut self) {
        self.snapshot = None;
    }

    pub fn stats(&self) -> ClipboardStats {
        match &self.snapshot {
            Some(snapshot) => ClipboardStats {
                tile_count: snapshot.tile_count,
                source_revision: snapshot.source_revision.clone(),
                has_data: true,
            },
            None => ClipboardStats {
                tile_count: 0,
                source_revision: String::new(),
                has_data: false,
            },
        }
    }
}

#[cfg(test)]
#[path = "tests/clipboard_tests.rs"]
mod tests;
