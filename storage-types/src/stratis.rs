// SPDX-License-Identifier: GPL-3.0-only

//! Stratis pool and filesystem models.

use serde::{Deserialize, Serialize};

/// A Stratis pool and the block devices it is created on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StratisPool {
    pub name: String,
    /// Device references in the order they are handed to `stratis pool create`.
    #[serde(default)]
    pub devices: Vec<String>,
}

impl StratisPool {
    pub fn new<I, S>(name: impl Into<String>, devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            devices: devices.into_iter().map(Into::into).collect(),
        }
    }
}

/// A filesystem created inside an existing (or just created) pool.
///
/// `pool_name` is not checked against the configured pools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StratisFilesystem {
    pub name: String,
    pub pool_name: String,
}

impl StratisFilesystem {
    pub fn new(name: impl Into<String>, pool_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pool_name: pool_name.into(),
        }
    }
}
