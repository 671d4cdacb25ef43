//! Session state shared by the migration operations.
//!
//! One [`MigrationContext`] owns the mapping table, the content index and both
//! orchestrators. Callers pass it explicitly wherever migration happens.

use tracing::warn;

use crate::clipboard::StructuredClipboard;
use crate::codec::{self, DecodedClipboard};
use crate::config::MigrationConfig;
use crate::content_index::ContentHashIndex;
use crate::cross_clipboard::CrossClipboard;
use crate::error::{ClipError, ClipResult};
use crate::mapping::VersionTable;
use crate::model::Tile;

#[derive(Debug, Default)]
pub struct MigrationContext {
    pub config: MigrationConfig,
    pub table: VersionTable,
    pub index: ContentHashIndex,
    pub clipboard: StructuredClipboard,
    pub cross: CrossClipboard,
}

impl MigrationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context from `config`. A mapping file that cannot be read or
    /// parsed is logged and leaves the table empty.
    pub fn from_config(config: MigrationConfig) -> Self {
        let mut table = VersionTable::new();
        if let Some(path) = &config.mapping_file {
            if !table.load_from_file(path) {
                warn!(path = %path.display(), "continuing without version mappings");
            }
        }
        Self {
            table,
            index: ContentHashIndex::new(),
            clipboard: StructuredClipboard::new()
                .with_policy(config.candidate_policy)
                .with_limits(config.limits),
            cross: CrossClipboard::new(config.limits),
            config,
        }
    }

    /// Pastes the structured clipboard into `target_revision` using the
    /// context's content index.
    pub fn paste(&self, target_revision: &str) -> ClipResult<Vec<Tile>> {
        self.clipboard.paste(target_revision, Some(&self.index))
    }

    /// Serializes the structured clipboard snapshot into the text form.
    pub fn export_clipboard(&mut self) -> ClipResult<String> {
        let snapshot = self.clipboard.snapshot().ok_or(ClipError::EmptyClipboard)?;
        let bytes = self.cross.write(
            &snapshot.tiles,
            &snapshot.source_revision,
            self.config.compress,
        )?;
        Ok(codec::to_text(&bytes))
    }

    /// Decodes clipboard text for `target_revision`, translating through the
    /// context's mapping table.
    pub fn import_clipboard(
        &mut self,
        text: &str,
        target_revision: &str,
    ) -> ClipResult<DecodedClipboard> {
        self.cross
            .read_text(text, target_revision, Some(&mut self.table))
    }
}

#[cfg(test)]
#[path = "tests/context_tests.rs"]
mod tests;
