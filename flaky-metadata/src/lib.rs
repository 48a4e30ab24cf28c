// Copyright (c) The flaky-tracker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Machine-readable output for [flaky-tracker](https://crates.io/crates/flaky-tracker).
//!
//! This crate contains the documented exit codes for `flaky-tracker` along with the types
//! produced by `flaky-tracker analyze --message-format json`.

mod exit_codes;
mod report_summary;

pub use exit_codes::*;
pub use report_summary::*;
