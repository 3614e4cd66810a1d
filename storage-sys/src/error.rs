// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Error types for system-level operations
#[derive(Error, Debug)]
pub enum SysError {
    #[error("failed to launch {program:?}: {source}")]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("command failed: {command} ({}); stderr: {stderr}", exit_label(.status))]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("device {device:?} did not appear within {timeout:?}")]
    DeviceTimeout { device: String, timeout: Duration },

    #[error("failed to create alias {alias:?} for {device:?}: {reason}")]
    Alias {
        device: String,
        alias: PathBuf,
        reason: String,
    },

    #[error("tool {tool} not found: {reason}")]
    ToolNotFound { tool: &'static str, reason: String },

    #[error("settings error for {path:?}: {reason}")]
    Settings { path: PathBuf, reason: String },
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Result type alias for system operations
pub type Result<T> = std::result::Result<T, SysError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failure_names_exit_code() {
        let error = SysError::CommandFailed {
            command: "stratis pool create p1 /dev/sda".to_string(),
            status: Some(1),
            stderr: "pool exists".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("stratis pool create p1 /dev/sda"));
        assert!(message.contains("exit code 1"));
        assert!(message.contains("pool exists"));
    }

    #[test]
    fn signal_termination_is_labelled() {
        let error = SysError::CommandFailed {
            command: "stratis".to_string(),
            status: None,
            stderr: String::new(),
        };
        assert!(error.to_string().contains("terminated by signal"));
    }
}
