// Copyright (c) The flaky-tracker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING_TARGET, StderrStyles};
use camino::Utf8PathBuf;
use flaky_analyzer::errors::{ParseLogError, WriteReportError};
use flaky_metadata::FlakyExitCode;
use owo_colors::OwoColorize;
use std::error::Error;
use thiserror::Error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An error that is expected to happen in normal operation, such as a missing input file.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("failed to open input file")]
    InputOpenError {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("failed to read test log")]
    ParseLogError {
        #[from]
        err: ParseLogError,
    },
    #[error("failed to write report")]
    WriteReportError {
        #[from]
        err: WriteReportError,
    },
    #[error("failed to write rerun plan")]
    WriteRerunPlanError {
        #[source]
        err: std::io::Error,
    },
}

impl ExpectedError {
    pub(crate) fn input_open_error(path: impl Into<Utf8PathBuf>, err: std::io::Error) -> Self {
        Self::InputOpenError {
            path: path.into(),
            err,
        }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::InputOpenError { .. } | Self::ParseLogError { .. } => {
                FlakyExitCode::INPUT_READ_FAILED
            }
            Self::WriteReportError { .. } | Self::WriteRerunPlanError { .. } => {
                FlakyExitCode::WRITE_OUTPUT_ERROR
            }
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match &self {
            Self::InputOpenError { path, err } => {
                tracing::error!("error opening file `{}`", path.style(styles.bold));
                Some(err as &dyn Error)
            }
            Self::ParseLogError { err } => {
                tracing::error!("{err}");
                err.source()
            }
            Self::WriteReportError { err } => {
                tracing::error!("failed to write report to output");
                Some(err as &dyn Error)
            }
            Self::WriteRerunPlanError { err } => {
                tracing::error!("failed to write rerun plan to output");
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            tracing::error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
