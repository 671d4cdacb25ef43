use serde::{Deserialize, Serialize};

/// Bounds applied while decoding and translating clipboard content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecLimits {
    /// Cap on the inflated payload size.
    pub max_payload_bytes: usize,
    /// Deepest container nesting the translator will walk.
    pub max_container_depth: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_payload_bytes: 64 * 1024 * 1024,
            max_container_depth: 32,
        }
    }
}
