// Copyright (c) The flaky-tracker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plans for rerunning a single test to confirm flakiness.
//!
//! Nothing here executes tests: a [`RerunPlan`] only describes the command that would be run and
//! what would be done with its output.

use crate::write_str::WriteStr;
use owo_colors::{OwoColorize, Style};
use std::io;

/// The package a rerun targets if none is specified.
pub const DEFAULT_RERUN_PACKAGE: &str = "./...";

/// The number of reruns if none is specified.
pub const DEFAULT_RERUN_COUNT: usize = 10;

/// A description of how a single test would be rerun.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RerunPlan {
    test_name: String,
    package: String,
    num_runs: usize,
}

impl RerunPlan {
    /// Creates a new plan.
    pub fn new(test_name: impl Into<String>, package: impl Into<String>, num_runs: usize) -> Self {
        Self {
            test_name: test_name.into(),
            package: package.into(),
            num_runs,
        }
    }

    /// The test to rerun.
    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    /// The package containing the test.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// How many times the test would be run.
    pub fn num_runs(&self) -> usize {
        self.num_runs
    }

    /// Returns the command that would be run for each attempt.
    ///
    /// The test name is anchored so that tests sharing a prefix are not selected.
    pub fn command(&self) -> Vec<String> {
        vec![
            "go".to_owned(),
            "test".to_owned(),
            "-v".to_owned(),
            "-run".to_owned(),
            format!("^{}$", self.test_name),
            self.package.clone(),
        ]
    }

    /// Writes a human-readable description of this plan.
    pub fn write(&self, colorize: bool, writer: &mut dyn WriteStr) -> io::Result<()> {
        let bold = if colorize {
            Style::new().bold()
        } else {
            Style::new()
        };

        writeln!(
            writer,
            "rerun plan for test {} in package {} ({} {}):",
            self.test_name.style(bold),
            self.package.style(bold),
            self.num_runs.style(bold),
            if self.num_runs == 1 { "run" } else { "runs" },
        )?;
        writeln!(
            writer,
            "  1. build the package under test\n  \
               2. execute `{}` repeatedly\n  \
               3. capture the output of each run and parse it like `analyze` does\n  \
               4. report how consistently the test passed across runs",
            shell_words::join(self.command()).style(bold),
        )?;
        writeln!(
            writer,
            "(tests are not executed: rerunning is not implemented yet)"
        )?;
        writer.write_str_flush()
    }
}
