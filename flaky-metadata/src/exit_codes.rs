// Copyright (c) The flaky-tracker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `flaky-tracker` failures.
///
/// `flaky-tracker` runs may fail for a variety of reasons. This structure documents the exit codes
/// that may occur in case of expected failures.
///
/// Finding flaky tests is not a failure: `flaky-tracker analyze` exits with [`Self::OK`]
/// regardless of how many flaky tests were identified.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum FlakyExitCode {}

impl FlakyExitCode {
    /// No errors occurred and flaky-tracker exited normally.
    pub const OK: i32 = 0;

    /// An input file could not be opened, or an input stream could not be read.
    pub const INPUT_READ_FAILED: i32 = 1;

    /// Writing data to stdout or stderr produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
