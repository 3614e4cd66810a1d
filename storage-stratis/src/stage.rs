// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use storage_sys::{CommandRunner, DeviceAliasResolver, StageLogger, Tool, ToolPaths, render};
use storage_types::{StorageConfig, StratisFilesystem, StratisPool};

use crate::commands::{
    filesystem_create_args, filesystem_description, pool_create_args, pool_description,
};
use crate::error::{ProvisionError, Result};

/// Purpose tag passed to the resolver for Stratis pool devices.
pub const STRATIS_PURPOSE: &str = "stratis";

const LOG_SCOPE: &str = "createStratis";

/// A command the stage would issue, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCommand {
    pub description: String,
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl PlannedCommand {
    pub fn rendered(&self) -> String {
        render(&self.program, &self.args)
    }
}

/// Stratis pool/filesystem creation step.
///
/// Holds only borrowed seams; the config snapshot and logging context are
/// passed per invocation.
pub struct StratisStage<'a> {
    runner: &'a dyn CommandRunner,
    resolver: &'a dyn DeviceAliasResolver,
    tools: &'a ToolPaths,
}

impl<'a> StratisStage<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        resolver: &'a dyn DeviceAliasResolver,
        tools: &'a ToolPaths,
    ) -> Self {
        Self {
            runner,
            resolver,
            tools,
        }
    }

    /// Create every configured pool, then every configured filesystem.
    ///
    /// Returns at the first failure. Resources created before it are left in place.
    pub fn create_stratis_filesystems(
        &self,
        logger: &StageLogger,
        config: &StorageConfig,
    ) -> Result<()> {
        if config.has_no_stratis() {
            return Ok(());
        }

        let logger = logger.scoped(LOG_SCOPE);

        let devices = config.stratis_pool_devices();
        self.resolver
            .resolve_and_alias(&logger, &devices, STRATIS_PURPOSE)
            .map_err(|source| ProvisionError::Resolution {
                purpose: STRATIS_PURPOSE.to_string(),
                source,
            })?;

        for pool in &config.stratis_pools {
            self.create_pool(&logger, pool)?;
        }

        for filesystem in &config.stratis_filesystems {
            self.create_filesystem(&logger, filesystem)?;
        }

        Ok(())
    }

    /// Commands a successful run would issue, without resolving or running anything.
    ///
    /// Pool arguments use `alias_of`, which is only meaningful on the real
    /// system after resolution.
    pub fn plan(&self, config: &StorageConfig) -> Vec<PlannedCommand> {
        let program = self.tools.program(Tool::Stratis).to_path_buf();
        let pools = config.stratis_pools.iter().map(|pool| PlannedCommand {
            description: pool_description(pool),
            program: program.clone(),
            args: pool_create_args(pool, self.resolver),
        });
        let filesystems = config
            .stratis_filesystems
            .iter()
            .map(|filesystem| PlannedCommand {
                description: filesystem_description(filesystem),
                program: program.clone(),
                args: filesystem_create_args(filesystem),
            });
        pools.chain(filesystems).collect()
    }

    fn create_pool(&self, logger: &StageLogger, pool: &StratisPool) -> Result<()> {
        let args = pool_create_args(pool, self.resolver);
        self.runner
            .run(
                logger,
                self.tools.program(Tool::Stratis),
                &args,
                &pool_description(pool),
            )
            .map_err(|source| ProvisionError::PoolCreation {
                pool: pool.name.clone(),
                source,
            })?;
        Ok(())
    }

    fn create_filesystem(
        &self,
        logger: &StageLogger,
        filesystem: &StratisFilesystem,
    ) -> Result<()> {
        let args = filesystem_create_args(filesystem);
        self.runner
            .run(
                logger,
                self.tools.program(Tool::Stratis),
                &args,
                &filesystem_description(filesystem),
            )
            .map_err(|source| ProvisionError::FilesystemCreation {
                filesystem: filesystem.name.clone(),
                source,
            })?;
        Ok(())
    }
}

/// Shorthand for `StratisStage::new(..).create_stratis_filesystems(..)`.
pub fn create_stratis_filesystems(
    runner: &dyn CommandRunner,
    resolver: &dyn DeviceAliasResolver,
    tools: &ToolPaths,
    logger: &StageLogger,
    config: &StorageConfig,
) -> Result<()> {
    StratisStage::new(runner, resolver, tools).create_stratis_filesystems(logger, config)
}
