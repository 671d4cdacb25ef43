//! Wire format constants for the cross-instance clipboard.
//!
//! The header layout is fixed; bump [`CLIPBOARD_FORMAT_VERSION`] when the
//! payload schema changes incompatibly.

/// Magic prefix: five fixed bytes plus a format marker byte.
pub const CLIPBOARD_MAGIC: [u8; 6] = *b"MAPCB\x01";

/// Number of leading magic bytes that must match for a header to be accepted.
pub const CLIPBOARD_MAGIC_PREFIX_LEN: usize = 5;

/// Current serialization format version written into new headers.
pub const CLIPBOARD_FORMAT_VERSION: u8 = 2;

/// Total size of a packed clipboard header.
pub const CLIPBOARD_HEADER_LEN: usize = 48;

/// Width of the zero-padded revision tag field.
pub const REVISION_TAG_LEN: usize = 32;

/// Prefix of the text-safe clipboard form (`"<TAG>:" + base64`).
pub const CLIPBOARD_TEXT_TAG: &str = "MAPCB";

/// MIME type hosts register for the binary clipboard form.
pub const CLIPBOARD_MIME_TYPE: &str = "application/x-map-content-clipboard";

/// zlib level used when compressing payloads.
pub const COMPRESSION_LEVEL: u32 = 6;
