// SPDX-License-Identifier: GPL-3.0-only

//! Low-level system operations for storage provisioning
//!
//! This crate holds the seams a provisioning stage talks to, together with
//! their production implementations:
//! - Running external tools (`CommandRunner`, `SystemCommandRunner`)
//! - Mapping logical tools to executables (`ToolPaths`)
//! - Waiting on block devices and aliasing them (`DeviceAliasResolver`)
//! - Scoped, explicitly passed logging context (`StageLogger`)
//!
//! These operations require elevated privileges when not in dry-run mode.

pub mod command;
pub mod device;
pub mod error;
pub mod logger;
pub mod settings;
pub mod tools;

pub use command::{CommandOutput, CommandRunner, SystemCommandRunner, render};
pub use device::{DeviceAliasResolver, UdevAliasResolver, device_alias};
pub use error::{Result, SysError};
pub use logger::StageLogger;
pub use settings::{SysSettings, ToolOverrides};
pub use tools::{Tool, ToolPaths};
