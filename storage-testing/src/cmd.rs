// SPDX-License-Identifier: GPL-3.0-only

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use storage_sys::{CommandOutput, CommandRunner, Result, StageLogger, SysError, render};

/// One recorded call to `CommandRunner::run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub description: String,
    /// Logger prefix the call was made under.
    pub prefix: String,
}

impl Invocation {
    pub fn rendered(&self) -> String {
        render(&self.program, &self.args)
    }

    /// `args` as `&str`s, for terse comparisons.
    pub fn argv(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }
}

type FailurePredicate = Box<dyn Fn(&Invocation) -> bool>;

/// Records invocations and succeeds unless a failure predicate matches.
#[derive(Default)]
pub struct RecordingRunner {
    invocations: RefCell<Vec<Invocation>>,
    failures: Vec<FailurePredicate>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every invocation matching `predicate` with a non-zero exit.
    pub fn fail_when(mut self, predicate: impl Fn(&Invocation) -> bool + 'static) -> Self {
        self.failures.push(Box::new(predicate));
        self
    }

    /// Fail `stratis pool create <pool> ...`.
    pub fn fail_on_pool(self, pool: &str) -> Self {
        let pool = pool.to_string();
        self.fail_when(move |invocation| {
            matches!(invocation.argv().as_slice(), ["pool", "create", name, ..] if *name == pool)
        })
    }

    /// Fail `stratis filesystem create <pool> <filesystem>`.
    pub fn fail_on_filesystem(self, filesystem: &str) -> Self {
        let filesystem = filesystem.to_string();
        self.fail_when(move |invocation| {
            matches!(
                invocation.argv().as_slice(),
                ["filesystem", "create", _, name] if *name == filesystem
            )
        })
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.invocations.borrow().len()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(
        &self,
        logger: &StageLogger,
        program: &Path,
        args: &[String],
        description: &str,
    ) -> Result<CommandOutput> {
        let invocation = Invocation {
            program: program.to_path_buf(),
            args: args.to_vec(),
            description: description.to_string(),
            prefix: logger.prefix(),
        };
        let fails = self.failures.iter().any(|predicate| predicate(&invocation));
        let command = invocation.rendered();
        self.invocations.borrow_mut().push(invocation);

        logger.log_op(description, || {
            if fails {
                Err(SysError::CommandFailed {
                    command: command.clone(),
                    status: Some(1),
                    stderr: "injected failure".to_string(),
                })
            } else {
                Ok(CommandOutput {
                    command: command.clone(),
                    executed: true,
                    ..Default::default()
                })
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn records_calls_in_order() {
        let runner = RecordingRunner::new();
        let logger = StageLogger::new().scoped("test");

        runner
            .run(&logger, Path::new("a"), &args(&["1"]), "first")
            .unwrap();
        runner
            .run(&logger, Path::new("b"), &args(&["2"]), "second")
            .unwrap();

        let calls = runner.invocations();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].rendered(), "a 1");
        assert_eq!(calls[1].description, "second");
        assert_eq!(calls[1].prefix, "test");
    }

    #[test]
    fn pool_failure_only_matches_that_pool() {
        let runner = RecordingRunner::new().fail_on_pool("p2");
        let logger = StageLogger::new();

        assert!(
            runner
                .run(&logger, Path::new("stratis"), &args(&["pool", "create", "p1", "/d"]), "p1")
                .is_ok()
        );
        assert!(
            runner
                .run(&logger, Path::new("stratis"), &args(&["pool", "create", "p2", "/d"]), "p2")
                .is_err()
        );
        assert!(
            runner
                .run(
                    &logger,
                    Path::new("stratis"),
                    &args(&["filesystem", "create", "p2", "fs"]),
                    "fs"
                )
                .is_ok()
        );
        assert_eq!(runner.count(), 3);
    }

    #[test]
    fn filesystem_failure_matches_filesystem_name() {
        let runner = RecordingRunner::new().fail_on_filesystem("fs1");
        let error = runner
            .run(
                &StageLogger::new(),
                Path::new("stratis"),
                &args(&["filesystem", "create", "p1", "fs1"]),
                "fs1",
            )
            .unwrap_err();
        assert!(matches!(error, SysError::CommandFailed { status: Some(1), .. }));
    }
}
