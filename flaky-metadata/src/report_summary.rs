// Copyright (c) The flaky-tracker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

/// Root element for a serializable flakiness report.
///
/// Produced by `flaky-tracker analyze --message-format json`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub struct FlakyReportSummary {
    /// The failure rate a test had to exceed to be reported.
    pub threshold: f64,

    /// The number of individual test results that were analyzed, across all inputs.
    pub total_results: usize,

    /// The tests identified as flaky, ordered by descending flakiness score.
    ///
    /// Ties are ordered by package, then by name.
    pub flaky_tests: Vec<FlakyTestSummary>,
}

impl FlakyReportSummary {
    /// Creates a new summary.
    pub fn new(threshold: f64, total_results: usize, flaky_tests: Vec<FlakyTestSummary>) -> Self {
        Self {
            threshold,
            total_results,
            flaky_tests,
        }
    }
}

/// A single test identified as flaky.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FlakyTestSummary {
    /// The name of the test.
    pub name: String,

    /// The package the test belongs to.
    ///
    /// This is `None` if no package could be attributed to the test.
    pub package: Option<String>,

    /// The number of times the test was observed.
    pub total_runs: usize,

    /// The number of observed runs that failed.
    pub failures: usize,

    /// `failures / total_runs`, in the range `[0, 1]`.
    pub flakiness_score: f64,
}
