// Copyright (c) The flaky-tracker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for [flaky-tracker](https://crates.io/crates/flaky-tracker).
//!
//! The flow of operations is read-then-reduce:
//!
//! 1. Each input source is parsed independently with [`parser::parse_test_log`], producing an
//!    ordered list of [`TestResult`](test_result::TestResult)s attributed to packages.
//! 2. The results from all sources are concatenated and reduced into per-test statistics by
//!    [`flakiness::TestHistories`].
//! 3. Tests whose failure rate exceeds a threshold are written out by
//!    [`reporter::FlakyReport`].

pub mod errors;
pub mod flakiness;
pub mod parser;
pub mod reporter;
pub mod rerun;
pub mod test_result;
pub mod write_str;
