// Copyright (c) The flaky-tracker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by flaky-tracker.

use crate::parser::LogSource;
use std::num::ParseFloatError;
use thiserror::Error;

/// An error that occurred while reading a test log.
///
/// Returned by [`parse_test_log`](crate::parser::parse_test_log). Reading is aborted as soon as
/// this happens, and no results are returned for the source.
#[derive(Debug, Error)]
#[error("error reading test log from {log_source}")]
#[non_exhaustive]
pub struct ParseLogError {
    log_source: LogSource,
    #[source]
    error: std::io::Error,
}

impl ParseLogError {
    pub(crate) fn new(log_source: LogSource, error: std::io::Error) -> Self {
        Self { log_source, error }
    }

    /// Returns the source that could not be read.
    pub fn log_source(&self) -> &LogSource {
        &self.log_source
    }
}

/// The duration of an individual test result line could not be interpreted.
///
/// This is not fatal: the line is skipped with a warning and parsing continues.
#[derive(Clone, Debug, Error)]
pub enum DurationParseError {
    /// The duration contained something other than digits and `.`, such as a sign or an
    /// exponent.
    #[error("expected only digits and `.`")]
    InvalidCharacters,

    /// The duration was made up of digits and `.`, but was not a decimal number.
    #[error("not a decimal number")]
    NotANumber(#[source] ParseFloatError),
}

/// An error that occurs while writing a report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteReportError {
    /// An error occurred while writing the report to the provided output.
    #[error("error writing to output")]
    Io(#[source] std::io::Error),

    /// An error occurred while serializing JSON.
    #[error("error serializing to JSON")]
    Json(#[source] serde_json::Error),
}
