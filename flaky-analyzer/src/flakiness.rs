// Copyright (c) The flaky-tracker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reduction of test results into per-test flakiness statistics.
//!
//! Results are grouped by their (package, name) identity. A test is considered flaky if its
//! failure rate across all observed runs exceeds a threshold.

use crate::test_result::TestResult;
use flaky_metadata::FlakyTestSummary;
use std::{cmp::Ordering, collections::BTreeMap};

/// The identity of a test across runs.
///
/// Ordered by package, then by name. Unattributed tests sort first.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TestKey {
    /// The package the test belongs to, if known.
    pub package: Option<String>,

    /// The name of the test.
    pub name: String,
}

impl TestKey {
    /// Returns the identity of the test that produced this result.
    pub fn from_result(result: &TestResult) -> Self {
        Self {
            package: result.package.clone(),
            name: result.name.clone(),
        }
    }
}

/// Run counters for a single test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunCounts {
    /// The number of results observed for this test.
    pub total_runs: usize,

    /// The number of those results that were failures.
    pub failures: usize,
}

impl RunCounts {
    /// Returns `failures / total_runs`, or 0 if no runs were observed.
    pub fn flakiness_score(&self) -> f64 {
        if self.total_runs == 0 {
            0.0
        } else {
            self.failures as f64 / self.total_runs as f64
        }
    }

    fn record(&mut self, result: &TestResult) {
        self.total_runs += 1;
        if result.status.is_failure() {
            self.failures += 1;
        }
    }
}

/// A test identified as flaky.
#[derive(Clone, Debug, PartialEq)]
pub struct FlakyTest {
    /// The name of the test.
    pub name: String,

    /// The package the test belongs to, if known.
    pub package: Option<String>,

    /// The number of results observed for this test.
    pub total_runs: usize,

    /// The number of those results that were failures.
    pub failures: usize,

    /// `failures / total_runs`, in the range `[0, 1]`.
    pub flakiness_score: f64,
}

impl FlakyTest {
    fn new(key: &TestKey, counts: RunCounts) -> Self {
        Self {
            name: key.name.clone(),
            package: key.package.clone(),
            total_runs: counts.total_runs,
            failures: counts.failures,
            flakiness_score: counts.flakiness_score(),
        }
    }

    /// Returns a serializable form of this test.
    pub fn to_summary(&self) -> FlakyTestSummary {
        FlakyTestSummary {
            name: self.name.clone(),
            package: self.package.clone(),
            total_runs: self.total_runs,
            failures: self.failures,
            flakiness_score: self.flakiness_score,
        }
    }

    /// Ranking order: most flaky first, ties broken by package and then name.
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .flakiness_score
            .total_cmp(&self.flakiness_score)
            .then_with(|| self.package.cmp(&other.package))
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// Run counts for every test observed, keyed by identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TestHistories {
    histories: BTreeMap<TestKey, RunCounts>,
}

impl TestHistories {
    /// Groups results by test identity. The order of `results` does not matter.
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a TestResult>) -> Self {
        let mut histories = BTreeMap::<TestKey, RunCounts>::new();
        for result in results {
            histories
                .entry(TestKey::from_result(result))
                .or_default()
                .record(result);
        }
        Self { histories }
    }

    /// Returns the number of distinct tests observed.
    pub fn len(&self) -> usize {
        self.histories.len()
    }

    /// Returns true if no tests were observed.
    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    /// Returns the run counts for a test, if it was observed.
    pub fn get(&self, key: &TestKey) -> Option<RunCounts> {
        self.histories.get(key).copied()
    }

    /// Iterates over all tests in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (&TestKey, RunCounts)> + '_ {
        self.histories.iter().map(|(key, counts)| (key, *counts))
    }

    /// Returns the total number of results across all tests.
    pub fn total_runs(&self) -> usize {
        self.histories.values().map(|counts| counts.total_runs).sum()
    }

    /// Returns the tests whose failure rate is strictly greater than `threshold`, most flaky
    /// first.
    ///
    /// A test with no failures is never returned, even if `threshold` is negative. `threshold` is
    /// not validated: values at or above 1 simply produce an empty list.
    pub fn flaky_tests(&self, threshold: f64) -> Vec<FlakyTest> {
        let mut flaky_tests: Vec<_> = self
            .histories
            .iter()
            .filter(|(_, counts)| counts.failures > 0 && counts.flakiness_score() > threshold)
            .map(|(key, counts)| FlakyTest::new(key, *counts))
            .collect();
        flaky_tests.sort_by(FlakyTest::rank_cmp);
        flaky_tests
    }
}

/// Computes the flaky tests among `results`.
///
/// This is a shortcut for [`TestHistories::from_results`] followed by
/// [`TestHistories::flaky_tests`].
pub fn aggregate(results: &[TestResult], threshold: f64) -> Vec<FlakyTest> {
    TestHistories::from_results(results).flaky_tests(threshold)
}
