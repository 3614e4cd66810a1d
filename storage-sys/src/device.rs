// SPDX-License-Identifier: GPL-3.0-only

//! Waiting on block devices and giving them stable aliases
//!
//! Stages never pass user-supplied device references to destructive tools
//! directly. Each reference is first waited on, then aliased under
//! `alias_root` by a symlink to its canonical node, and the alias is what
//! ends up on the command line.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::os::unix::fs::symlink;
use std::path::{Component, Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use crate::command::CommandRunner;
use crate::error::{Result, SysError};
use crate::logger::StageLogger;
use crate::settings::SysSettings;
use crate::tools::{Tool, ToolPaths};

pub trait DeviceAliasResolver {
    /// Block until every device exists, then alias each of them.
    ///
    /// Repeated references are resolved once and share one alias.
    fn resolve_and_alias(
        &self,
        logger: &StageLogger,
        devices: &[String],
        purpose: &str,
    ) -> Result<()>;

    /// Alias for `device`, valid after a successful `resolve_and_alias`.
    fn alias_of(&self, device: &str) -> String;
}

/// Alias path for `device` under `root`.
///
/// The device path is lexically cleaned first, so `/dev/../dev/sda` and
/// `/dev/sda` share an alias.
pub fn device_alias(root: &Path, device: &str) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in Path::new(device).components() {
        match component {
            Component::Normal(part) => cleaned.push(part),
            Component::ParentDir => {
                cleaned.pop();
            }
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
        }
    }
    root.join(cleaned)
}

fn unique_devices(devices: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    devices
        .iter()
        .map(String::as_str)
        .filter(|device| seen.insert(*device))
        .collect()
}

/// Resolver backed by udev settling, device-node polling and symlinks.
pub struct UdevAliasResolver<'a> {
    runner: &'a dyn CommandRunner,
    tools: &'a ToolPaths,
    alias_root: PathBuf,
    timeout: Duration,
    poll_interval: Duration,
    settle: bool,
    dry_run: bool,
}

impl<'a> UdevAliasResolver<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        tools: &'a ToolPaths,
        settings: &SysSettings,
    ) -> Self {
        Self {
            runner,
            tools,
            alias_root: settings.alias_root.clone(),
            timeout: settings.device_timeout(),
            poll_interval: settings.poll_interval(),
            settle: settings.settle,
            dry_run: false,
        }
    }

    /// Log what would be waited on and aliased without touching anything.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn settle_udev(&self, logger: &StageLogger) -> Result<()> {
        self.runner
            .run(
                logger,
                self.tools.program(Tool::Udevadm),
                &["settle".to_string()],
                "waiting for udev to settle",
            )
            .map(|_| ())
    }

    fn wait_for_device(&self, device: &str) -> Result<()> {
        let path = Path::new(device);
        // A timeout too large to represent as an instant never expires.
        let deadline = Instant::now().checked_add(self.timeout);

        loop {
            if path.exists() {
                return Ok(());
            }

            let pause = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(SysError::DeviceTimeout {
                            device: device.to_string(),
                            timeout: self.timeout,
                        });
                    }
                    self.poll_interval.min(deadline - now)
                }
                None => self.poll_interval,
            };

            thread::sleep(pause);
        }
    }

    fn create_alias(&self, logger: &StageLogger, device: &str) -> Result<PathBuf> {
        let alias = device_alias(&self.alias_root, device);
        let alias_error = |reason: String| SysError::Alias {
            device: device.to_string(),
            alias: alias.clone(),
            reason,
        };

        let target = fs::canonicalize(device)
            .map_err(|error| alias_error(format!("cannot resolve device: {error}")))?;

        match fs::remove_file(&alias) {
            Ok(()) => logger.warn(format_args!("replaced stale device alias {alias:?}")),
            Err(error) if error.kind() == ErrorKind::NotFound => {}
            Err(error) => return Err(alias_error(format!("cannot remove stale alias: {error}"))),
        }

        if let Some(parent) = alias.parent() {
            fs::create_dir_all(parent)
                .map_err(|error| alias_error(format!("cannot create alias directory: {error}")))?;
        }

        symlink(&target, &alias)
            .map_err(|error| alias_error(format!("cannot create symlink: {error}")))?;

        logger.info(format_args!(
            "created device alias for {device:?}: {:?} -> {:?}",
            alias, target
        ));
        Ok(alias)
    }
}

impl DeviceAliasResolver for UdevAliasResolver<'_> {
    fn resolve_and_alias(
        &self,
        logger: &StageLogger,
        devices: &[String],
        purpose: &str,
    ) -> Result<()> {
        let devices = unique_devices(devices);
        if devices.is_empty() {
            return Ok(());
        }

        if self.dry_run {
            logger.info(format_args!(
                "dry run: would wait on {purpose} devices {devices:?} and alias them under {:?}",
                self.alias_root
            ));
            return Ok(());
        }

        if self.settle {
            self.settle_udev(logger)?;
        }

        logger.log_op(
            &format!("waiting for {purpose} devices {devices:?}"),
            || devices.iter().try_for_each(|device| self.wait_for_device(device)),
        )?;

        for device in devices {
            self.create_alias(logger, device)?;
        }

        Ok(())
    }

    fn alias_of(&self, device: &str) -> String {
        device_alias(&self.alias_root, device)
            .to_string_lossy()
            .into_owned()
    }
}
