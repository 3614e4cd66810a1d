// SPDX-License-Identifier: GPL-3.0-only

//! Argument vectors for the `stratis` CLI.

use storage_sys::DeviceAliasResolver;
use storage_types::{StratisFilesystem, StratisPool};

/// `pool create <name> <alias>...`, aliases in the pool's device order.
///
/// The stratis CLI takes the pool name ahead of the block devices.
pub fn pool_create_args(pool: &StratisPool, resolver: &dyn DeviceAliasResolver) -> Vec<String> {
    let mut args = vec!["pool".to_string(), "create".to_string(), pool.name.clone()];
    args.extend(pool.devices.iter().map(|device| resolver.alias_of(device)));
    args
}

/// `filesystem create <pool> <name>`.
pub fn filesystem_create_args(filesystem: &StratisFilesystem) -> Vec<String> {
    vec![
        "filesystem".to_string(),
        "create".to_string(),
        filesystem.pool_name.clone(),
        filesystem.name.clone(),
    ]
}

pub fn pool_description(pool: &StratisPool) -> String {
    format!("creating Stratis pool {:?}", pool.name)
}

pub fn filesystem_description(filesystem: &StratisFilesystem) -> String {
    format!("creating Stratis filesystem {:?}", filesystem.name)
}
