// Copyright (c) The flaky-tracker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Individual test outcomes observed in a test log.

use chrono::{DateTime, Local};
use std::{fmt, time::Duration};

/// The outcome of a single test execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum TestStatus {
    /// The test passed.
    Pass,

    /// The test failed.
    Fail,

    /// The test was skipped.
    Skip,
}

impl TestStatus {
    /// Parses the status as spelled in test logs (`PASS`, `FAIL` or `SKIP`).
    pub fn from_log_str(s: &str) -> Option<Self> {
        match s {
            "PASS" => Some(Self::Pass),
            "FAIL" => Some(Self::Fail),
            "SKIP" => Some(Self::Skip),
            _ => None,
        }
    }

    /// Returns the status as spelled in test logs.
    pub fn as_log_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
        }
    }

    /// Returns true if this status counts as a failure.
    pub fn is_failure(self) -> bool {
        self == Self::Fail
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_log_str())
    }
}

/// One observed outcome of one test execution.
///
/// Produced by [`parse_test_log`](crate::parser::parse_test_log).
#[derive(Clone, Debug, PartialEq)]
pub struct TestResult {
    /// The name of the test, unique within a package for a given run.
    pub name: String,

    /// The outcome.
    pub status: TestStatus,

    /// How long the test took, as reported by the test runner.
    pub duration: Duration,

    /// When this result was parsed. This is not derived from the log contents.
    pub timestamp: DateTime<Local>,

    /// The package the test belongs to.
    ///
    /// This is `None` if no package summary line was seen in the same source.
    pub package: Option<String>,
}
