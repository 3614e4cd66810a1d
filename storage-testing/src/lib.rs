// SPDX-License-Identifier: GPL-3.0-only

//! Test doubles for the system seams in `storage-sys`
//!
//! `RecordingRunner` stands in for `CommandRunner` and `FakeResolver` for
//! `DeviceAliasResolver`. Both record every call so tests can assert on
//! ordering and fail-fast behavior without touching real devices.

pub mod cmd;
pub mod resolver;

pub use cmd::{Invocation, RecordingRunner};
pub use resolver::{FakeResolver, ResolveCall};
