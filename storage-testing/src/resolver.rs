// SPDX-License-Identifier: GPL-3.0-only

use std::cell::RefCell;
use std::path::PathBuf;
use std::time::Duration;

use storage_sys::{DeviceAliasResolver, Result, StageLogger, SysError, device_alias};

/// One recorded call to `DeviceAliasResolver::resolve_and_alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveCall {
    pub devices: Vec<String>,
    pub purpose: String,
}

/// In-memory resolver: every device is present unless marked missing.
pub struct FakeResolver {
    alias_root: PathBuf,
    missing: Vec<String>,
    calls: RefCell<Vec<ResolveCall>>,
    aliased: RefCell<Vec<String>>,
}

impl Default for FakeResolver {
    fn default() -> Self {
        Self::new("/run/test-aliases")
    }
}

impl FakeResolver {
    pub fn new(alias_root: impl Into<PathBuf>) -> Self {
        Self {
            alias_root: alias_root.into(),
            missing: Vec::new(),
            calls: RefCell::new(Vec::new()),
            aliased: RefCell::new(Vec::new()),
        }
    }

    /// Make `device` never appear.
    pub fn with_missing(mut self, device: &str) -> Self {
        self.missing.push(device.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ResolveCall> {
        self.calls.borrow().clone()
    }

    /// Devices an alias was created for, in creation order.
    pub fn alias_creations(&self) -> Vec<String> {
        self.aliased.borrow().clone()
    }
}

impl DeviceAliasResolver for FakeResolver {
    fn resolve_and_alias(
        &self,
        logger: &StageLogger,
        devices: &[String],
        purpose: &str,
    ) -> Result<()> {
        self.calls.borrow_mut().push(ResolveCall {
            devices: devices.to_vec(),
            purpose: purpose.to_string(),
        });

        if let Some(device) = devices.iter().find(|device| self.missing.contains(device)) {
            return Err(SysError::DeviceTimeout {
                device: device.clone(),
                timeout: Duration::ZERO,
            });
        }

        let mut aliased = self.aliased.borrow_mut();
        for device in devices {
            if !aliased.contains(device) {
                logger.debug(format_args!("fake alias for {device:?}"));
                aliased.push(device.clone());
            }
        }
        Ok(())
    }

    fn alias_of(&self, device: &str) -> String {
        device_alias(&self.alias_root, device)
            .to_string_lossy()
            .into_owned()
    }
}
