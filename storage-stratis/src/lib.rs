// SPDX-License-Identifier: GPL-3.0-only

//! Stratis provisioning stage
//!
//! Creates the Stratis pools and filesystems described by a `StorageConfig`,
//! in two strict tiers: every pool device is waited on and aliased first,
//! then pools are created in config order, then filesystems in config
//! order. The first failure aborts the stage; nothing is rolled back.

pub mod commands;
pub mod error;
pub mod stage;

pub use error::{ProvisionError, ProvisionErrorKind, Result};
pub use stage::{PlannedCommand, STRATIS_PURPOSE, StratisStage, create_stratis_filesystems};

// Re-export the config model the stage consumes
pub use storage_types::{StorageConfig, StratisFilesystem, StratisPool};
