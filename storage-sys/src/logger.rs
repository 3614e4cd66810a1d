// SPDX-License-Identifier: GPL-3.0-only

//! Scoped logging context for provisioning stages
//!
//! A `StageLogger` is an explicit value, not process-wide state: entering a
//! scope returns a child logger carrying the extended prefix, and the scope
//! ends when that child is dropped. Every event is forwarded to `tracing`
//! with the joined prefix attached as the `prefix` field.

use std::fmt::Display;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageLogger {
    scopes: Vec<String>,
}

impl StageLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Child logger with `name` appended to the prefix.
    pub fn scoped(&self, name: impl Into<String>) -> Self {
        let mut scopes = self.scopes.clone();
        scopes.push(name.into());
        Self { scopes }
    }

    /// Scopes joined by `/`, empty at the root.
    pub fn prefix(&self) -> String {
        self.scopes.join("/")
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn debug(&self, message: impl Display) {
        tracing::debug!(prefix = %self.prefix(), "{message}");
    }

    pub fn info(&self, message: impl Display) {
        tracing::info!(prefix = %self.prefix(), "{message}");
    }

    pub fn warn(&self, message: impl Display) {
        tracing::warn!(prefix = %self.prefix(), "{message}");
    }

    pub fn error(&self, message: impl Display) {
        tracing::error!(prefix = %self.prefix(), "{message}");
    }

    /// Run `op`, logging `[started]` before and `[finished]`/`[failed]` after.
    pub fn log_op<T, E, F>(&self, description: &str, op: F) -> Result<T, E>
    where
        E: Display,
        F: FnOnce() -> Result<T, E>,
    {
        self.info(format_args!("[started]  {description}"));
        match op() {
            Ok(value) => {
                self.info(format_args!("[finished] {description}"));
                Ok(value)
            }
            Err(error) => {
                self.error(format_args!("[failed]   {description}: {error}"));
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StageLogger;

    #[test]
    fn scopes_nest_without_touching_the_parent() {
        let root = StageLogger::new();
        let stage = root.scoped("disks");
        let step = stage.scoped("createStratis");

        assert_eq!(root.prefix(), "");
        assert_eq!(stage.prefix(), "disks");
        assert_eq!(step.prefix(), "disks/createStratis");
        assert_eq!(step.depth(), 2);
    }

    #[test]
    fn log_op_passes_results_through() {
        let logger = StageLogger::new().scoped("test");
        let ok: Result<u8, String> = logger.log_op("ok op", || Ok(7));
        let failed: Result<u8, String> = logger.log_op("bad op", || Err("boom".to_string()));

        assert_eq!(ok, Ok(7));
        assert_eq!(failed, Err("boom".to_string()));
    }
}
