// SPDX-License-Identifier: GPL-3.0-only

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stratis::{StratisFilesystem, StratisPool};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error for {path:?}: {reason}")]
    Io { path: PathBuf, reason: String },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Storage section of a provisioning config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default)]
    pub stratis_pools: Vec<StratisPool>,
    #[serde(default)]
    pub stratis_filesystems: Vec<StratisFilesystem>,
}

impl StorageConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;
        Self::from_toml_str(&raw)
    }

    /// True when neither pools nor filesystems are requested.
    pub fn has_no_stratis(&self) -> bool {
        self.stratis_pools.is_empty() && self.stratis_filesystems.is_empty()
    }

    /// Every device reference across all pools, in config order.
    ///
    /// Duplicates are kept; the resolver is expected to be idempotent.
    pub fn stratis_pool_devices(&self) -> Vec<String> {
        self.stratis_pools
            .iter()
            .flat_map(|pool| pool.devices.iter().cloned())
            .collect()
    }
}
