//! Flat clipboard orchestrator: serializes tiles for another editor instance
//! and retranslates them on the way back in through a version mapping table.

use serde::Serialize;
use tracing::debug;

use crate::codec::{self, ClipboardCodec, DecodedClipboard, MappingProvider};
use crate::error::ClipResult;
use crate::model::Tile;
use crate::resource::CodecLimits;

/// Running counters for one orchestrator instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CrossClipboardStats {
    pub writes: u64,
    pub reads: u64,
    /// Item ids and creature names passed through a mapping on read.
    pub translations: u64,
    pub checksum_mismatches: u64,
}

#[derive(Debug, Default)]
pub struct CrossClipboard {
    codec: ClipboardCodec,
    stats: CrossClipboardStats,
}

impl CrossClipboard {
    pub fn new(limits: CodecLimits) -> Self {
        Self {
            codec: ClipboardCodec::new(limits),
            stats: CrossClipboardStats::default(),
        }
    }

    pub fn codec(&self) -> &ClipboardCodec {
        &self.codec
    }

    pub fn write(&mut self, tiles: &[Tile], source_revision: &str, compress: bool) -> ClipResult<Vec<u8>> {
        let bytes = self.codec.encode(tiles, source_revision, compress)?;
        self.stats.writes += 1;
        debug!(
            tiles = tiles.len(),
            bytes = bytes.len(),
            compress,
            "wrote cross-version clipboard"
        );
        Ok(bytes)
    }

    pub fn read(
        &mut self,
        bytes: &[u8],
        target_revision: &str,
        provider: Option<&mut dyn MappingProvider>,
    ) -> ClipResult<DecodedClipboard> {
        let decoded = self.codec.decode(bytes, target_revision, provider)?;
        self.stats.reads += 1;
        if let Some(translation) = &decoded.translation {
            self.stats.translations +=
                (translation.items_visited + translation.names_visited) as u64;
        }
        if !decoded.checksum_ok {
            self.stats.checksum_mismatches += 1;
        }
        Ok(decoded)
    }

    /// Encodes `tiles` straight into the text clipboard form.
    pub fn write_text(&mut self, tiles: &[Tile], source_revision: &str, compress: bool) -> ClipResult<String> {
        let bytes = self.write(tiles, source_revision, compress)?;
        Ok(codec::to_text(&bytes))
    }

    pub fn read_text(
        &mut self,
        text: &str,
        target_revision: &str,
        provider: Option<&mut dyn MappingProvider>,
    ) -> ClipResult<DecodedClipboard> {
        let bytes = codec::from_text(text)?;
        self.read(&bytes, target_revision, provider)
    }

    pub fn stats(&self) -> CrossClipboardStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CrossClipboardStats::default();
    }
}

#[cfg(test)]
#[path = "tests/cross_clipboard_tests.rs"]
mod tests;
