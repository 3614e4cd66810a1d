// SPDX-License-Identifier: GPL-3.0-only

//! Declarative storage models consumed by the provisioning stages
//!
//! These types mirror the `storage` section of a provisioning config:
//!
//! - `StratisPool` → a pool name plus the block devices backing it
//! - `StratisFilesystem` → a filesystem created inside a named pool
//!
//! `StorageConfig` is the read-only snapshot handed to a stage. Loading it
//! from TOML is provided here; semantic validation is not.

pub mod config;
pub mod stratis;

pub use config::{ConfigError, Result, StorageConfig};
pub use stratis::{StratisFilesystem, StratisPool};
