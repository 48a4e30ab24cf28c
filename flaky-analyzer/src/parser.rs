// Copyright (c) The flaky-tracker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing of line-oriented test runner output.
//!
//! Two kinds of lines are recognized, and everything else is ignored:
//!
//! ```text
//! --- PASS: TestName (0.01s)                      <- an individual test result
//! ok      example.com/pkg    0.005s               <- a package summary
//! FAIL    example.com/pkg2   0.120s [build failed]
//! ```
//!
//! Each test result is attributed to the package named by the most recent summary line. Results
//! seen before any summary line are attributed to the first summary line that follows them, once
//! the whole source has been read.

use crate::{
    errors::{DurationParseError, ParseLogError},
    test_result::{TestResult, TestStatus},
};
use camino::Utf8PathBuf;
use chrono::Local;
use regex::Regex;
use std::{fmt, io::BufRead, sync::LazyLock, time::Duration};
use tracing::{debug, warn};

/// Where a test log was read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogSource {
    /// Standard input.
    Stdin,

    /// A file on disk.
    File(Utf8PathBuf),
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("<stdin>"),
            Self::File(path) => write!(f, "`{path}`"),
        }
    }
}

// The duration is matched loosely so that malformed durations are reported rather than silently
// ignored. parse_duration only accepts what `[\d.]+` would have matched.
static RESULT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^--- (PASS|FAIL|SKIP): (.+) \(([^()\s]+)s\)$").expect("result regex is valid")
});

static SUMMARY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(ok|FAIL|SKIP)\s+(\S+)\s+([\d.]+)s(?:\s+\[build failed\])?$")
        .expect("summary regex is valid")
});

/// A single line of a test log, classified by shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLine<'a> {
    /// An individual test result, e.g. `--- PASS: TestName (0.01s)`.
    TestResult {
        /// The outcome of the test.
        status: TestStatus,

        /// The test name.
        name: &'a str,

        /// The duration in seconds, not yet parsed.
        duration: &'a str,
    },

    /// A package summary, e.g. `ok  example.com/pkg  0.005s`.
    PackageSummary {
        /// The package path.
        package: &'a str,
    },

    /// Any other line.
    Other,
}

impl<'a> LogLine<'a> {
    /// Classifies a line. Result lines take precedence over summary lines.
    pub fn classify(line: &'a str) -> Self {
        if let Some(captures) = RESULT_LINE.captures(line) {
            let (_, [status, name, duration]) = captures.extract();
            if let Some(status) = TestStatus::from_log_str(status) {
                return Self::TestResult {
                    status,
                    name,
                    duration,
                };
            }
        }

        if let Some(captures) = SUMMARY_LINE.captures(line) {
            let (_, [_status, package, _duration]) = captures.extract();
            return Self::PackageSummary { package };
        }

        Self::Other
    }
}

/// Parses a duration in decimal seconds, as printed in result lines.
///
/// Only digits and `.` are accepted: signs, exponents and special values like `inf` are errors.
/// Durations too large to be represented saturate to [`Duration::MAX`].
pub fn parse_duration(s: &str) -> Result<Duration, DurationParseError> {
    if !s.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return Err(DurationParseError::InvalidCharacters);
    }
    let secs: f64 = s.parse().map_err(DurationParseError::NotANumber)?;
    // secs is non-negative here, so the only possible failure is overflow.
    Ok(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
}

/// Parses test results out of a single test log.
///
/// Lines are processed one at a time. A result line with a malformed duration is skipped with a
/// warning. An error reading from `reader` aborts parsing.
///
/// Package attribution never crosses source boundaries: parse each source separately, then
/// concatenate the results.
pub fn parse_test_log(
    log_source: &LogSource,
    reader: impl BufRead,
) -> Result<Vec<TestResult>, ParseLogError> {
    let state = reader
        .lines()
        .try_fold(ScanState::default(), |state, line| {
            line.map(|line| state.scan_line(log_source, &line))
        })
        .map_err(|error| ParseLogError::new(log_source.clone(), error))?;

    let results = state.finish();
    debug!("parsed {} test results from {log_source}", results.len());
    Ok(results)
}

#[derive(Debug, Default)]
struct ScanState {
    current_package: Option<String>,
    first_package: Option<String>,
    results: Vec<TestResult>,
}

impl ScanState {
    fn scan_line(mut self, log_source: &LogSource, line: &str) -> Self {
        match LogLine::classify(line) {
            LogLine::TestResult {
                status,
                name,
                duration,
            } => match parse_duration(duration) {
                Ok(duration) => self.results.push(TestResult {
                    name: name.to_owned(),
                    status,
                    duration,
                    timestamp: Local::now(),
                    package: self.current_package.clone(),
                }),
                Err(error) => {
                    warn!(
                        "could not parse duration `{duration}` for test `{name}` \
                         in {log_source}: {error}, skipping"
                    );
                }
            },
            LogLine::PackageSummary { package } => {
                if self.first_package.is_none() {
                    self.first_package = Some(package.to_owned());
                }
                self.current_package = Some(package.to_owned());
            }
            LogLine::Other => {}
        }
        self
    }

    fn finish(self) -> Vec<TestResult> {
        let Self {
            first_package,
            mut results,
            ..
        } = self;
        if let Some(first_package) = first_package {
            backfill(&mut results, &first_package);
        }
        results
    }
}

/// Attributes results printed before their package's summary line.
///
/// The package context is never cleared once set, so unattributed results can only appear at the
/// start of a source, before the first summary line.
fn backfill(results: &mut [TestResult], first_package: &str) {
    for result in results
        .iter_mut()
        .take_while(|result| result.package.is_none())
    {
        result.package = Some(first_package.to_owned());
    }
}
