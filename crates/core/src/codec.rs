//! Binary clipboard wire format.
//!
//! Layout: a fixed 48-byte little-endian header followed by a JSON tile list,
//! optionally zlib-compressed. The header CRC32 covers the uncompressed payload.
//!
//! | Offset | Size | Field |
//! |---|---|---|
//! | 0 | 6 | magic |
//! | 6 | 1 | format version |
//! | 7 | 32 | revision tag, zero padded |
//! | 39 | 4 | tile count |
//! | 43 | 1 | compressed flag |
//! | 44 | 4 | CRC32 |

use std::io::{Read, Write};

use base64::Engine as _;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ClipError, ClipResult};
use crate::mapping::{VersionMapping, VersionTable};
use crate::model::Tile;
use crate::resource::CodecLimits;
use crate::translate::{TileTranslator, TranslationStats};
use crate::version::{
    CLIPBOARD_FORMAT_VERSION, CLIPBOARD_HEADER_LEN, CLIPBOARD_MAGIC, CLIPBOARD_MAGIC_PREFIX_LEN,
    CLIPBOARD_TEXT_TAG, COMPRESSION_LEVEL, REVISION_TAG_LEN,
};

const REVISION_OFFSET: usize = 7;
const COUNT_OFFSET: usize = REVISION_OFFSET + REVISION_TAG_LEN;
const COMPRESSED_OFFSET: usize = COUNT_OFFSET + 4;
const CHECKSUM_OFFSET: usize = COMPRESSED_OFFSET + 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClipboardHeader {
    pub magic: [u8; 6],
    pub format_version: u8,
    pub source_revision: String,
    pub tile_count: u32,
    pub compressed: bool,
    /// CRC32 of the uncompressed payload.
    pub checksum: u32,
}

impl ClipboardHeader {
    pub fn new(source_revision: &str, tile_count: u32, compressed: bool, checksum: u32) -> Self {
        Self {
            magic: CLIPBOARD_MAGIC,
            format_version: CLIPBOARD_FORMAT_VERSION,
            source_revision: truncate_to_char_boundary(source_revision, REVISION_TAG_LEN)
                .to_string(),
            tile_count,
            compressed,
            checksum,
        }
    }

    /// Packs the header; a revision tag longer than 32 bytes is cut at the
    /// last whole character that fits.
    pub fn pack(&self) -> [u8; CLIPBOARD_HEADER_LEN] {
        let mut out = [0u8; CLIPBOARD_HEADER_LEN];
        out[0..REVISION_OFFSET - 1].copy_from_slice(&self.magic);
        out[REVISION_OFFSET - 1] = self.format_version;
        let revision = truncate_to_char_boundary(&self.source_revision, REVISION_TAG_LEN);
        out[REVISION_OFFSET..REVISION_OFFSET + revision.len()]
            .copy_from_slice(revision.as_bytes());
        out[COUNT_OFFSET..COMPRESSED_OFFSET].copy_from_slice(&self.tile_count.to_le_bytes());
        out[COMPRESSED_OFFSET] = u8::from(self.compressed);
        out[CHECKSUM_OFFSET..CLIPBOARD_HEADER_LEN].copy_from_slice(&self.checksum.to_le_bytes());
        out
    }

    /// Returns `None` for short input or a foreign magic prefix.
    pub fn unpack(input: &[u8]) -> Option<Self> {
        let raw = input.get(..CLIPBOARD_HEADER_LEN)?;
        if raw[..CLIPBOARD_MAGIC_PREFIX_LEN] != CLIPBOARD_MAGIC[..CLIPBOARD_MAGIC_PREFIX_LEN] {
            return None;
        }
        let mut magic = [0u8; 6];
        magic.copy_from_slice(&raw[0..6]);
        let tag = &raw[REVISION_OFFSET..COUNT_OFFSET];
        let tag_len = tag.iter().rposition(|byte| *byte != 0).map_or(0, |last| last + 1);
        Some(Self {
            magic,
            format_version: raw[REVISION_OFFSET - 1],
            source_revision: decode_revision_tag(&tag[..tag_len]),
            tile_count: read_u32(&raw[COUNT_OFFSET..COMPRESSED_OFFSET]),
            compressed: raw[COMPRESSED_OFFSET] != 0,
            checksum: read_u32(&raw[CHECKSUM_OFFSET..CLIPBOARD_HEADER_LEN]),
        })
    }
}

/// Source of revision mappings consulted while decoding.
pub trait MappingProvider {
    fn mapping(&mut self, from: &str, to: &str) -> Option<&VersionMapping>;
}

impl MappingProvider for VersionTable {
    fn mapping(&mut self, from: &str, to: &str) -> Option<&VersionMapping> {
        self.resolve(from, to)
    }
}

/// Result of decoding a clipboard buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedClipboard {
    pub header: ClipboardHeader,
    pub tiles: Vec<Tile>,
    pub source_revision: String,
    /// False when the recomputed CRC32 differs from the header. Decoding still
    /// completes; callers decide whether to discard the content.
    pub checksum_ok: bool,
    pub translation: Option<TranslationStats>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ClipboardCodec {
    limits: CodecLimits,
}

impl ClipboardCodec {
    pub fn new(limits: CodecLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> CodecLimits {
        self.limits
    }

    pub fn encode(&self, tiles: &[Tile], revision: &str, compress: bool) -> ClipResult<Vec<u8>> {
        let tile_count =
            u32::try_from(tiles.len()).map_err(|_| ClipError::TooManyTiles(tiles.len()))?;
        let payload =
            serde_json::to_vec(tiles).map_err(|err| ClipError::Serialization(err.to_string()))?;
        let checksum = crc32fast::hash(&payload);
        let body = if compress {
            deflate(&payload)?
        } else {
            payload
        };

        let header = ClipboardHeader::new(revision, tile_count, compress, checksum);
        let mut output = Vec::with_capacity(CLIPBOARD_HEADER_LEN + body.len());
        output.extend_from_slice(&header.pack());
        output.extend_from_slice(&body);
        Ok(output)
    }

    /// Decodes a clipboard buffer and, when the revisions differ and a provider
    /// is given, retranslates every id and creature name.
    ///
    /// An empty `target_revision` disables translation.
    pub fn decode(
        &self,
        input: &[u8],
        target_revision: &str,
        provider: Option<&mut dyn MappingProvider>,
    ) -> ClipResult<DecodedClipboard> {
        let header = ClipboardHeader::unpack(input).ok_or_else(|| {
            if input.len() < CLIPBOARD_HEADER_LEN {
                ClipError::Format(format!(
                    "need {CLIPBOARD_HEADER_LEN} header bytes, got {}",
                    input.len()
                ))
            } else {
                ClipError::Format("magic prefix mismatch".to_string())
            }
        })?;
        let body = &input[CLIPBOARD_HEADER_LEN..];
        let payload = if header.compressed {
            inflate(body, self.limits.max_payload_bytes)?
        } else if body.len() > self.limits.max_payload_bytes {
            return Err(ClipError::PayloadTooLarge {
                limit: self.limits.max_payload_bytes,
            });
        } else {
            body.to_vec()
        };

        let actual = crc32fast::hash(&payload);
        let checksum_ok = actual == header.checksum;
        if !checksum_ok {
            warn!(
                expected = %format!("{:08x}", header.checksum),
                actual = %format!("{actual:08x}"),
                "clipboard checksum mismatch"
            );
        }

        let tiles: Vec<Tile> = serde_json::from_slice(&payload)
            .map_err(|err| ClipError::Serialization(err.to_string()))?;
        if tiles.len() != header.tile_count as usize {
            debug!(
                declared = header.tile_count,
                decoded = tiles.len(),
                "clipboard tile count differs from header"
            );
        }

        let source_revision = header.source_revision.clone();
        let mut decoded = DecodedClipboard {
            header,
            tiles,
            source_revision,
            checksum_ok,
            translation: None,
        };

        if target_revision.is_empty() || target_revision == decoded.source_revision {
            return Ok(decoded);
        }
        let Some(provider) = provider else {
            debug!("no mapping provider, skipping id translation");
            return Ok(decoded);
        };
        let Some(mapping) = provider.mapping(&decoded.source_revision, target_revision) else {
            debug!(
                from = %decoded.source_revision,
                to = target_revision,
                "no mapping for revision pair"
            );
            return Ok(decoded);
        };

        let mut translator = TileTranslator::new(mapping, self.limits.max_container_depth);
        decoded.tiles = translator.translate_tiles(&decoded.tiles)?;
        let stats = translator.stats();
        debug!(
            tiles = stats.tiles,
            from = %decoded.source_revision,
            to = target_revision,
            "translated clipboard tiles"
        );
        decoded.translation = Some(stats);
        Ok(decoded)
    }
}

/// Wraps clipboard bytes for text-only clipboards: `"<TAG>:" + base64`.
pub fn to_text(bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("{CLIPBOARD_TEXT_TAG}:{encoded}")
}

pub fn from_text(text: &str) -> ClipResult<Vec<u8>> {
    let encoded = text
        .trim()
        .strip_prefix(CLIPBOARD_TEXT_TAG)
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or(ClipError::NotClipboardText {
            tag: CLIPBOARD_TEXT_TAG,
        })?;
    Ok(base64::engine::general_purpose::STANDARD.decode(encoded)?)
}

fn deflate(payload: &[u8]) -> ClipResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(COMPRESSION_LEVEL));
    encoder
        .write_all(payload)
        .map_err(|err| ClipError::Serialization(format!("compression failed: {err}")))?;
    encoder
        .finish()
        .map_err(|err| ClipError::Serialization(format!("compression failed: {err}")))
}

fn inflate(body: &[u8], limit: usize) -> ClipResult<Vec<u8>> {
    let mut output = Vec::new();
    ZlibDecoder::new(body)
        .take(limit as u64 + 1)
        .read_to_end(&mut output)
        .map_err(|err| ClipError::Decompress(err.to_string()))?;
    if output.len() > limit {
        return Err(ClipError::PayloadTooLarge { limit });
    }
    Ok(output)
}

fn truncate_to_char_boundary(value: &str, max_len: usize) -> &str {
    if value.len() <= max_len {
        return value;
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

/// UTF-8 decode that drops invalid sequences, such as a character cut off
/// by a foreign writer's truncation.
fn decode_revision_tag(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(err) => {
                let (valid, rest) = bytes.split_at(err.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                match err.error_len() {
                    Some(len) => bytes = &rest[len..],
                    None => return out,
                }
            }
        }
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}

#[cfg(test)]
#[path = "tests/codec_tests.rs"]
mod tests;
