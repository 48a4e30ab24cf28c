// Copyright (c) The flaky-tracker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Find flaky tests by analyzing test runner output.
//!
//! `flaky-tracker analyze` reads the output of one or more test runs (`go test -v` style), and
//! reports the tests whose failure rate across those runs exceeds a threshold.
//!
//! ```text
//! go test -v ./... > run-1.log
//! go test -v ./... > run-2.log
//! flaky-tracker analyze run-1.log run-2.log
//! ```

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::OutputWriter;
