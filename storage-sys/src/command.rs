// SPDX-License-Identifier: GPL-3.0-only

//! External command execution
//!
//! `CommandRunner` is the single seam through which provisioning stages touch
//! real devices. The runner owns logging of each attempt and its outcome.

use std::path::Path;
use std::process::Command;

use crate::error::{Result, SysError};
use crate::logger::StageLogger;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    pub executed: bool,
}

pub trait CommandRunner {
    /// Run `program` with `args`, blocking until it exits.
    ///
    /// A launch failure or non-zero exit is returned as an error.
    fn run(
        &self,
        logger: &StageLogger,
        program: &Path,
        args: &[String],
        description: &str,
    ) -> Result<CommandOutput>;
}

/// Render a command line for logs and error messages.
pub fn render(program: &Path, args: &[String]) -> String {
    let program = program.display().to_string();
    if args.is_empty() {
        program
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Runs commands with `std::process::Command`.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner {
    dry_run: bool,
}

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner that logs every command but executes none of them.
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn execute(
        &self,
        logger: &StageLogger,
        program: &Path,
        args: &[String],
    ) -> Result<CommandOutput> {
        let rendered = render(program, args);
        logger.debug(format_args!("executing: {rendered}"));

        if self.dry_run {
            return Ok(CommandOutput {
                command: rendered,
                executed: false,
                ..Default::default()
            });
        }

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| SysError::Launch {
                program: program.to_path_buf(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !stdout.trim().is_empty() {
            logger.debug(format_args!("stdout: {}", stdout.trim_end()));
        }
        if !stderr.trim().is_empty() {
            logger.debug(format_args!("stderr: {}", stderr.trim_end()));
        }

        if !output.status.success() {
            return Err(SysError::CommandFailed {
                command: rendered,
                status: output.status.code(),
                stderr,
            });
        }

        Ok(CommandOutput {
            command: rendered,
            stdout,
            stderr,
            executed: true,
        })
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(
        &self,
        logger: &StageLogger,
        program: &Path,
        args: &[String],
        description: &str,
    ) -> Result<CommandOutput> {
        logger.log_op(description, || self.execute(logger, program, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn formats_command_context() {
        let rendered = render(
            Path::new("stratis"),
            &args(&["pool", "create", "p1", "/dev/sda"]),
        );
        assert_eq!(rendered, "stratis pool create p1 /dev/sda");
        assert_eq!(render(Path::new("udevadm"), &[]), "udevadm");
    }

    #[test]
    fn dry_run_does_not_execute() {
        let runner = SystemCommandRunner::dry_run();
        let outcome = runner
            .run(
                &StageLogger::new(),
                Path::new("/nonexistent/stratis"),
                &args(&["pool", "create"]),
                "creating Stratis pool \"p1\"",
            )
            .unwrap();
        assert!(!outcome.executed);
        assert_eq!(outcome.command, "/nonexistent/stratis pool create");
    }

    #[test]
    fn missing_program_is_a_launch_failure() {
        let error = SystemCommandRunner::new()
            .run(
                &StageLogger::new(),
                Path::new("/nonexistent/stratis"),
                &[],
                "launching nothing",
            )
            .unwrap_err();
        assert!(matches!(error, SysError::Launch { .. }));
    }

    #[test]
    fn non_zero_exit_is_reported_with_stderr() {
        let error = SystemCommandRunner::new()
            .run(
                &StageLogger::new(),
                Path::new("sh"),
                &args(&["-c", "echo nope >&2; exit 3"]),
                "failing shell",
            )
            .unwrap_err();
        match error {
            SysError::CommandFailed { status, stderr, .. } => {
                assert_eq!(status, Some(3));
                assert_eq!(stderr.trim(), "nope");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn captures_stdout_on_success() {
        let outcome = SystemCommandRunner::new()
            .run(
                &StageLogger::new(),
                Path::new("sh"),
                &args(&["-c", "echo ready"]),
                "succeeding shell",
            )
            .unwrap();
        assert!(outcome.executed);
        assert_eq!(outcome.stdout.trim(), "ready");
    }
}
