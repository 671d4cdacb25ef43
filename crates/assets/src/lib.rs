use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use map_content_migration::{compute_content_hash, ContentHash, ContentHashIndex, IndexError, ItemId};
use thiserror::Error;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct SpriteLimits {
    pub max_bytes: u64,
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for SpriteLimits {
    fn default() -> Self {
        Self {
            max_bytes: 4 * 1024 * 1024,
            max_width: 1024,
            max_height: 1024,
        }
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sprite path traversal blocked")]
    Traversal,
    #[error("unsupported sprite extension: {0}")]
    UnsupportedExtension(String),
    #[error("sprite too large: {size} bytes (max {max})")]
    TooLarge { size: u64, max: u64 },
    #[error("sprite dimensions {width}x{height} exceed limit {max_width}x{max_height}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },
    #[error("image decode error: {0}")]
    Decode(String),
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Read-only view over one revision's sprite directory.
///
/// Sprites are `<asset_id>.png` files directly under the root.
#[derive(Debug)]
pub struct SpriteStore {
    root: PathBuf,
    allowed_extensions: HashSet<String>,
    limits: SpriteLimits,
}

impl SpriteStore {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            allowed_extensions: ["png"].into_iter().map(|ext| ext.to_string()).collect(),
            limits: SpriteLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: SpriteLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads a sprite and decodes it to RGBA8.
    pub fn load_sprite(&self, sprite_path: &str) -> Result<LoadedSprite, AssetError> {
        let rel = sanitize_rel_path(Path::new(sprite_path))?;
        let extension = rel
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|value| value.to_lowercase())
            .ok_or_else(|| AssetError::UnsupportedExtension(sprite_path.to_string()))?;
        if !self.allowed_extensions.contains(&extension) {
            return Err(AssetError::UnsupportedExtension(sprite_path.to_string()));
        }

        let full_path = self.root.join(&rel);
        let resolved = full_path.canonicalize()?;
        if !resolved.starts_with(self.root.canonicalize()?) {
            return Err(AssetError::Traversal);
        }

        let bytes = fs::read(&resolved)?;
        let size = bytes.len() as u64;
        if size > self.limits.max_bytes {
            return Err(AssetError::TooLarge {
                size,
                max: self.limits.max_bytes,
            });
        }

        let image =
            image::load_from_memory(&bytes).map_err(|err| AssetError::Decode(err.to_string()))?;
        let rgba = image.to_rgba8();
        let (width, height) = (rgba.width(), rgba.height());
        if width > self.limits.max_width || height > self.limits.max_height {
            return Err(AssetError::InvalidDimensions {
                width,
                height,
                max_width: self.limits.max_width,
                max_height: self.limits.max_height,
            });
        }
        Ok(LoadedSprite {
            name: sprite_path.to_string(),
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// Sprite files whose stem parses as an asset id, ordered by id.
    pub fn sprite_files(&self) -> Result<Vec<(ItemId, String)>, AssetError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            let is_sprite = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| self.allowed_extensions.contains(&ext.to_lowercase()));
            if !is_sprite {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let stem = path.file_stem().and_then(|stem| stem.to_str()).unwrap_or("");
            match stem.parse::<ItemId>() {
                Ok(id) => files.push((id, file_name.to_string())),
                Err(_) => debug!(file = file_name, "skipping sprite without numeric id"),
            }
        }
        files.sort_unstable_by_key(|(id, _)| *id);
        Ok(files)
    }

    /// Decodes every sprite and registers it in `index` under `scope`,
    /// returning how many were registered.
    pub fn register_into(
        &self,
        index: &mut ContentHashIndex,
        scope: &str,
    ) -> Result<usize, AssetError> {
        let files = self.sprite_files()?;
        for (id, file_name) in &files {
            let sprite = self.load_sprite(file_name)?;
            index.register(scope, *id, &sprite.pixels, sprite.width, sprite.height)?;
        }
        debug!(scope, count = files.len(), root = %self.root.display(), "registered sprites");
        Ok(files.len())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedSprite {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major.
    pub pixels: Vec<u8>,
}

impl LoadedSprite {
    pub fn content_hash(&self) -> Result<ContentHash, IndexError> {
        compute_content_hash(&self.pixels, self.width, self.height)
    }
}

pub fn sanitize_rel_path(rel: &Path) -> Result<PathBuf, AssetError> {
    use std::path::Component::*;
    let mut out = PathBuf::new();
    for component in rel.components() {
        match component {
            CurDir => {}
            Normal(part) => out.push(part),
            ParentDir | RootDir | Prefix(_) => return Err(AssetError::Traversal),
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
