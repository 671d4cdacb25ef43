use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::resource::CodecLimits;
use crate::translate::CandidatePolicy;

/// Settings for a migration session, read from a TOML file.
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// JSON version mapping file. Relative paths resolve against the
    /// directory of the config file.
    pub mapping_file: Option<PathBuf>,
    pub compress: bool,
    pub candidate_policy: CandidatePolicy,
    pub limits: CodecLimits,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            mapping_file: None,
            compress: true,
            candidate_policy: CandidatePolicy::default(),
            limits: CodecLimits::default(),
        }
    }
}

impl MigrationConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        if let (Some(mapping), Some(base)) = (config.mapping_file.as_ref(), path.parent()) {
            if mapping.is_relative() {
                config.mapping_file = Some(base.join(mapping));
            }
        }
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
