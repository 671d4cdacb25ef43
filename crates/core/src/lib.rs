mod clipboard;
mod codec;
mod config;
mod content_index;
mod context;
mod correction;
mod cross_clipboard;
mod error;
mod mapping;
mod model;
mod resource;
mod translate;
mod version;

pub use clipboard::{ClipboardSnapshot, ClipboardStats, StructuredClipboard};
pub use codec::{
    from_text, to_text, ClipboardCodec, ClipboardHeader, DecodedClipboard, MappingProvider,
};
pub use config::MigrationConfig;
pub use content_index::{
    compute_content_hash, content_hash_hex, AssetKey, AssetRecord, ContentHash, ContentHashIndex,
};
pub use context::MigrationContext;
pub use correction::{Correction, CorrectionMethod, IdCorrector};
pub use cross_clipboard::{CrossClipboard, CrossClipboardStats};
pub use error::{ClipError, ClipResult, ConfigError, IndexError, MappingError};
pub use mapping::{VersionMapping, VersionTable};
pub use model::{Creature, Item, ItemAttribute, ItemId, Position, SpawnArea, SpawnEntry, Tile};
pub use resource::CodecLimits;
pub use translate::{
    CandidatePolicy, ContentResolver, IdResolver, TileTranslator, TranslationStats,
};
pub use version::{
    CLIPBOARD_FORMAT_VERSION, CLIPBOARD_HEADER_LEN, CLIPBOARD_MAGIC, CLIPBOARD_MIME_TYPE,
    CLIPBOARD_TEXT_TAG,
};
