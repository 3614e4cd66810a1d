// SPDX-License-Identifier: GPL-3.0-only

//! Runtime settings for the system seams, loaded from TOML.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SysError};

pub const DEFAULT_ALIAS_ROOT: &str = "/run/storage-provision/dev_aliases";
const DEFAULT_DEVICE_TIMEOUT_SECS: u64 = 90;
const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SysSettings {
    /// Directory under which device aliases are created.
    pub alias_root: PathBuf,
    /// How long to wait for each device to appear.
    pub device_timeout_secs: u64,
    pub poll_interval_ms: u64,
    /// Run `udevadm settle` before waiting on devices.
    pub settle: bool,
    pub tools: ToolOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolOverrides {
    pub stratis: Option<PathBuf>,
    pub mdadm: Option<PathBuf>,
    pub udevadm: Option<PathBuf>,
}

impl Default for SysSettings {
    fn default() -> Self {
        Self {
            alias_root: PathBuf::from(DEFAULT_ALIAS_ROOT),
            device_timeout_secs: DEFAULT_DEVICE_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            settle: true,
            tools: ToolOverrides::default(),
        }
    }
}

impl SysSettings {
    pub fn from_toml_str(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|error| SysError::Settings {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;

        Self::from_toml_str(&raw).map_err(|error| SysError::Settings {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })
    }

    pub fn device_timeout(&self) -> Duration {
        Duration::from_secs(self.device_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let settings = SysSettings::from_toml_str("").unwrap();
        assert_eq!(settings, SysSettings::default());
        assert_eq!(settings.device_timeout(), Duration::from_secs(90));
        assert!(settings.settle);
    }

    #[test]
    fn parses_partial_overrides() {
        let settings = SysSettings::from_toml_str(
            r#"
            alias_root = "/tmp/aliases"
            settle = false

            [tools]
            stratis = "/usr/local/bin/stratis"
            "#,
        )
        .unwrap();

        assert_eq!(settings.alias_root, PathBuf::from("/tmp/aliases"));
        assert!(!settings.settle);
        assert_eq!(settings.poll_interval_ms, 100);
        assert_eq!(
            settings.tools.stratis,
            Some(PathBuf::from("/usr/local/bin/stratis"))
        );
        assert_eq!(settings.tools.mdadm, None);
    }

    #[test]
    fn zero_poll_interval_is_clamped() {
        let settings = SysSettings {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(settings.poll_interval(), Duration::from_millis(1));
    }

    #[test]
    fn load_wraps_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "device_timeout_secs = \"soon\"").unwrap();

        let error = SysSettings::load(&path).unwrap_err();
        assert!(matches!(error, SysError::Settings { .. }));
    }

    #[test]
    fn loads_bundled_sample_settings() {
        let path =
            Path::new(env!("CARGO_MANIFEST_DIR")).join("../resources/configs/settings.toml");
        let settings = SysSettings::load(&path).unwrap();
        assert_eq!(settings.alias_root, PathBuf::from(DEFAULT_ALIAS_ROOT));
    }
}
