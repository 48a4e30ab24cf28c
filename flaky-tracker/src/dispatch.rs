// Copyright (c) The flaky-tracker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ExpectedError, Result,
    output::{OutputContext, OutputOpts, OutputWriter},
};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use flaky_analyzer::{
    parser::{LogSource, parse_test_log},
    reporter::{FlakyReport, ReportFormat},
    rerun::{DEFAULT_RERUN_COUNT, DEFAULT_RERUN_PACKAGE, RerunPlan},
    test_result::TestResult,
};
use flaky_metadata::FlakyExitCode;
use std::{fs::File, io::BufReader};
use tracing::{info, warn};

/// The failure rate above which a test is reported as flaky, if not otherwise specified.
const DEFAULT_THRESHOLD: f64 = 0.1;

/// Find flaky tests by analyzing test runner output.
///
/// flaky-tracker reads the output of `go test -v` style test runs and identifies tests that
/// sometimes pass and sometimes fail.
#[derive(Debug, Parser)]
#[command(
    name = "flaky-tracker",
    version,
    styles = crate::output::clap_styles(),
    max_term_width = 100,
)]
pub struct FlakyTrackerApp {
    #[clap(flatten)]
    output: OutputOpts,

    #[clap(subcommand)]
    command: Command,
}

impl FlakyTrackerApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app.
    pub fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        match self.command {
            Command::Analyze(opts) => opts.exec(output, output_writer),
            Command::Rerun(opts) => opts.exec(output, output_writer),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze test output for flaky tests
    ///
    /// Reads one or more test output files (for example, from `go test -v`), and reports tests
    /// whose failure rate across all runs exceeds the threshold.
    ///
    /// If no files are given, test output is read from standard input:
    ///
    ///   go test -v ./... | flaky-tracker analyze
    Analyze(AnalyzeOpts),

    /// Describe how a test would be rerun to confirm flakiness
    ///
    /// This prints the command that would be run repeatedly for the test. Tests are not
    /// executed.
    Rerun(RerunOpts),
}

#[derive(Debug, Args)]
struct AnalyzeOpts {
    /// Test output files to analyze [default: standard input]
    #[arg(value_name = "FILE")]
    files: Vec<Utf8PathBuf>,

    /// Report tests whose failure rate is strictly greater than this (between 0 and 1)
    #[arg(
        long,
        default_value_t = DEFAULT_THRESHOLD,
        env = "FLAKY_TRACKER_THRESHOLD",
        value_name = "RATE"
    )]
    threshold: f64,

    /// Output format
    #[arg(
        short = 'T',
        long,
        value_enum,
        default_value_t,
        help_heading = "OUTPUT OPTIONS",
        value_name = "FMT"
    )]
    message_format: MessageFormatOpts,
}

impl AnalyzeOpts {
    fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        if !(0.0..1.0).contains(&self.threshold) {
            warn!(
                "threshold {} is outside the range [0, 1): no tests or every failing test \
                 may be reported",
                self.threshold
            );
        }

        let results = self.read_results()?;
        if output.verbose {
            info!(
                "analyzing {} test results from {} {}",
                results.len(),
                self.source_count(),
                if self.source_count() == 1 {
                    "source"
                } else {
                    "sources"
                },
            );
        }

        let report = FlakyReport::new(&results, self.threshold);
        let mut writer = output_writer.stdout_writer();
        report.write(
            self.message_format.into(),
            output.colorize_stdout(),
            &mut writer,
        )?;

        Ok(FlakyExitCode::OK)
    }

    fn source_count(&self) -> usize {
        self.files.len().max(1)
    }

    /// Parses every source in order, then concatenates the results.
    fn read_results(&self) -> Result<Vec<TestResult>> {
        if self.files.is_empty() {
            info!("reading test output from standard input (press Ctrl-D to finish)");
            let stdin = std::io::stdin().lock();
            return Ok(parse_test_log(&LogSource::Stdin, stdin)?);
        }

        let mut results = Vec::new();
        for path in &self.files {
            let file = File::open(path)
                .map_err(|err| ExpectedError::input_open_error(path.clone(), err))?;
            results.extend(parse_test_log(
                &LogSource::File(path.clone()),
                BufReader::new(file),
            )?);
        }
        Ok(results)
    }
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum MessageFormatOpts {
    #[default]
    Human,
    Json,
    JsonPretty,
}

impl From<MessageFormatOpts> for ReportFormat {
    fn from(opts: MessageFormatOpts) -> Self {
        match opts {
            MessageFormatOpts::Human => Self::Human,
            MessageFormatOpts::Json => Self::Json,
            MessageFormatOpts::JsonPretty => Self::JsonPretty,
        }
    }
}

#[derive(Debug, Args)]
struct RerunOpts {
    /// Name of the test to rerun
    #[arg(value_name = "TEST_NAME")]
    test_name: String,

    /// Number of times to rerun the test
    #[arg(short = 'n', long, default_value_t = DEFAULT_RERUN_COUNT, value_name = "N")]
    num_runs: usize,

    /// Package containing the test
    #[arg(short = 'p', long, default_value = DEFAULT_RERUN_PACKAGE, value_name = "PACKAGE")]
    package: String,
}

impl RerunOpts {
    fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        let plan = RerunPlan::new(self.test_name, self.package, self.num_runs);
        plan.write(output.colorize_stdout(), &mut output_writer.stdout_writer())
            .map_err(|err| ExpectedError::WriteRerunPlanError { err })?;
        Ok(FlakyExitCode::OK)
    }
}
