use miette::Diagnostic;
use thiserror::Error;

pub type ClipResult<T> = Result<T, ClipError>;

/// Failures surfaced by the clipboard codec and the two orchestrators.
///
/// Identifier lookup misses are never represented here: they resolve to the
/// original value inside the translator.
#[derive(Debug, Error, Diagnostic)]
pub enum ClipError {
    #[error("invalid clipboard header: {0}")]
    #[diagnostic(code("mcm.format"))]
    Format(String),
    #[error("clipboard payload could not be inflated: {0}")]
    #[diagnostic(code("mcm.decompress"))]
    Decompress(String),
    #[error("clipboard payload exceeds {limit} bytes")]
    #[diagnostic(
        code("mcm.payload_too_large"),
        help("raise `limits.max_payload_bytes` if this payload is trusted")
    )]
    PayloadTooLarge { limit: usize },
    #[error("clipboard payload serialization failed: {0}")]
    #[diagnostic(code("mcm.serialization"))]
    Serialization(String),
    #[error("too many tiles for a clipboard header: {0}")]
    #[diagnostic(code("mcm.too_many_tiles"))]
    TooManyTiles(usize),
    #[error("no tiles to copy")]
    #[diagnostic(code("mcm.empty_copy"))]
    EmptyCopy,
    #[error("clipboard is empty")]
    #[diagnostic(code("mcm.empty_clipboard"), help("copy a selection before pasting"))]
    EmptyClipboard,
    #[error("container nesting exceeds depth limit {limit}")]
    #[diagnostic(code("mcm.nesting_too_deep"))]
    NestingTooDeep { limit: usize },
    #[error("text does not carry the '{tag}:' clipboard prefix")]
    #[diagnostic(code("mcm.not_clipboard_text"))]
    NotClipboardText { tag: &'static str },
    #[error("invalid base64 clipboard text: {0}")]
    #[diagnostic(code("mcm.base64"))]
    Base64(#[from] base64::DecodeError),
}

/// Errors raised while loading a version mapping file.
#[derive(Debug, Error, Diagnostic)]
pub enum MappingError {
    #[error("mapping file io error: {0}")]
    #[diagnostic(code("mapping::io"))]
    Io(#[from] std::io::Error),
    #[error("failed to parse mapping file: {0}")]
    #[diagnostic(code("mapping::parse"))]
    Parse(#[from] serde_json::Error),
    #[error("mapping '{pair}' has a non-numeric item id '{raw}'")]
    #[diagnostic(code("mapping::invalid_item_id"))]
    InvalidItemId { pair: String, raw: String },
}

/// Errors raised while registering assets in the content hash index.
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum IndexError {
    #[error("pixel data size mismatch: expected {expected} bytes for {width}x{height}, got {actual}")]
    #[diagnostic(code("index::dimension_mismatch"))]
    DimensionMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Errors raised while loading a migration config file.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    #[diagnostic(code("config::io"))]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    #[diagnostic(code("config::parse"))]
    Parse(#[from] toml::de::Error),
}
