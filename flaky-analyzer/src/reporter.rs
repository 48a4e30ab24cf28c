// Copyright (c) The flaky-tracker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reporting of flaky tests.
//!
//! The main structure in this module is [`FlakyReport`].

use crate::{
    errors::WriteReportError,
    flakiness::{FlakyTest, TestHistories},
    test_result::TestResult,
    write_str::WriteStr,
};
use flaky_metadata::FlakyReportSummary;
use owo_colors::{OwoColorize, Style};
use std::io;

const NAME_WIDTH: usize = 50;
const PACKAGE_WIDTH: usize = 20;
const SCORE_WIDTH: usize = 16;
const COUNT_WIDTH: usize = 10;
const RULE_WIDTH: usize = NAME_WIDTH + PACKAGE_WIDTH + SCORE_WIDTH + 2 * COUNT_WIDTH + 4;

/// The format in which a report is written.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// A human-readable table.
    #[default]
    Human,

    /// Machine-readable JSON, on a single line.
    Json,

    /// Machine-readable JSON, pretty-printed.
    JsonPretty,
}

/// The outcome of analyzing a set of test results.
#[derive(Clone, Debug)]
pub struct FlakyReport {
    threshold: f64,
    total_results: usize,
    flaky_tests: Vec<FlakyTest>,
}

impl FlakyReport {
    /// Analyzes `results`, flagging tests whose failure rate is strictly greater than
    /// `threshold`.
    ///
    /// `results` should be the concatenation of every parsed source, in source order.
    pub fn new(results: &[TestResult], threshold: f64) -> Self {
        let histories = TestHistories::from_results(results);
        Self {
            threshold,
            total_results: histories.total_runs(),
            flaky_tests: histories.flaky_tests(threshold),
        }
    }

    /// Returns the threshold used to flag tests.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the number of test results analyzed.
    pub fn total_results(&self) -> usize {
        self.total_results
    }

    /// Returns the flaky tests, most flaky first.
    pub fn flaky_tests(&self) -> &[FlakyTest] {
        &self.flaky_tests
    }

    /// Returns a serializable form of this report.
    pub fn to_summary(&self) -> FlakyReportSummary {
        FlakyReportSummary::new(
            self.threshold,
            self.total_results,
            self.flaky_tests.iter().map(FlakyTest::to_summary).collect(),
        )
    }

    /// Writes this report to `writer` in the given format.
    pub fn write(
        &self,
        format: ReportFormat,
        colorize: bool,
        writer: &mut dyn WriteStr,
    ) -> Result<(), WriteReportError> {
        match format {
            ReportFormat::Human => {
                let mut styles = Styles::default();
                if colorize {
                    styles.colorize();
                }
                self.write_human(&styles, writer)
                    .map_err(WriteReportError::Io)?;
            }
            ReportFormat::Json | ReportFormat::JsonPretty => {
                let summary = self.to_summary();
                let json = if format == ReportFormat::JsonPretty {
                    serde_json::to_string_pretty(&summary)
                } else {
                    serde_json::to_string(&summary)
                }
                .map_err(WriteReportError::Json)?;
                writeln!(writer, "{json}").map_err(WriteReportError::Io)?;
            }
        }

        writer.write_str_flush().map_err(WriteReportError::Io)
    }

    fn write_human(&self, styles: &Styles, writer: &mut dyn WriteStr) -> io::Result<()> {
        if self.total_results == 0 {
            return writeln!(writer, "No test results found to analyze.");
        }

        writeln!(
            writer,
            "\n{}",
            "--- Flaky Test Report ---".style(styles.heading)
        )?;

        let threshold_percent = self.threshold * 100.0;
        if self.flaky_tests.is_empty() {
            return writeln!(
                writer,
                "No tests identified as flaky (threshold: {threshold_percent:.0}% failure rate)."
            );
        }

        writeln!(
            writer,
            "Identified {} potentially flaky {} (threshold: {threshold_percent:.0}% failure rate):",
            self.flaky_tests.len().style(styles.count),
            tests_str(self.flaky_tests.len()),
        )?;

        let header = format!(
            "{:<NAME_WIDTH$} {:<PACKAGE_WIDTH$} {:<SCORE_WIDTH$} {:<COUNT_WIDTH$} {}",
            "TEST NAME", "PACKAGE", "FLAKINESS SCORE", "FAILURES", "TOTAL RUNS",
        );
        writeln!(writer, "{}", header.style(styles.heading))?;
        writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;

        for test in &self.flaky_tests {
            // Pad before styling so that escape codes don't count towards the width.
            let name = format!("{:<NAME_WIDTH$}", test.name);
            let package = format!(
                "{:<PACKAGE_WIDTH$}",
                test.package.as_deref().unwrap_or("-")
            );
            let score = format!(
                "{:<SCORE_WIDTH$}",
                format!("{:.2}%", test.flakiness_score * 100.0)
            );
            writeln!(
                writer,
                "{} {} {} {:<COUNT_WIDTH$} {}",
                name.style(styles.test_name),
                package.style(styles.package),
                score.style(styles.score),
                test.failures,
                test.total_runs,
            )?;
        }

        Ok(())
    }
}

fn tests_str(count: usize) -> &'static str {
    if count == 1 { "test" } else { "tests" }
}

#[derive(Clone, Debug, Default)]
struct Styles {
    heading: Style,
    count: Style,
    test_name: Style,
    package: Style,
    score: Style,
}

impl Styles {
    fn colorize(&mut self) {
        self.heading = Style::new().bold();
        self.count = Style::new().bold();
        self.test_name = Style::new().blue().bold();
        self.package = Style::new().magenta();
        self.score = Style::new().red().bold();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_result::TestStatus;
    use chrono::Local;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn result(package: Option<&str>, name: &str, status: TestStatus) -> TestResult {
        TestResult {
            name: name.to_owned(),
            status,
            duration: Duration::from_millis(1),
            timestamp: Local::now(),
            package: package.map(str::to_owned),
        }
    }

    fn sample_results() -> Vec<TestResult> {
        vec![
            result(Some("example.com/pkg"), "TestFlaky", TestStatus::Pass),
            result(Some("example.com/pkg"), "TestFlaky", TestStatus::Fail),
            result(Some("example.com/pkg"), "TestStable", TestStatus::Pass),
            result(Some("example.com/pkg"), "TestStable", TestStatus::Pass),
            result(None, "TestOrphan", TestStatus::Fail),
            result(None, "TestOrphan", TestStatus::Pass),
            result(None, "TestOrphan", TestStatus::Pass),
            result(None, "TestOrphan", TestStatus::Skip),
        ]
    }

    fn write_to_string(report: &FlakyReport, format: ReportFormat, colorize: bool) -> String {
        let mut output = String::new();
        report
            .write(format, colorize, &mut output)
            .expect("writing to a string succeeded");
        output
    }

    #[test]
    fn human_report() {
        let report = FlakyReport::new(&sample_results(), 0.1);
        assert_eq!(report.total_results(), 8);

        let output = write_to_string(&report, ReportFormat::Human, false);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 7, "output:\n{output}");
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "--- Flaky Test Report ---");
        assert_eq!(
            lines[2],
            "Identified 2 potentially flaky tests (threshold: 10% failure rate):"
        );
        assert_eq!(lines[4], "-".repeat(RULE_WIDTH));

        let header = lines[3];
        let package_column = header.find("PACKAGE").unwrap();
        let score_column = header.find("FLAKINESS SCORE").unwrap();
        let failures_column = header.find("FAILURES").unwrap();
        let runs_column = header.find("TOTAL RUNS").unwrap();
        assert_eq!(package_column, NAME_WIDTH + 1);

        let rows = [
            (lines[5], "TestFlaky", "example.com/pkg", "50.00%", "1", "2"),
            (lines[6], "TestOrphan", "-", "25.00%", "1", "4"),
        ];
        for (row, name, package, score, failures, runs) in rows {
            assert!(row.starts_with(name), "row `{row}` starts with {name}");
            assert_eq!(&row[package_column..package_column + package.len()], package);
            assert_eq!(&row[score_column..score_column + score.len()], score);
            assert_eq!(
                &row[failures_column..failures_column + failures.len()],
                failures
            );
            assert_eq!(&row[runs_column..], runs);
        }
    }

    #[test]
    fn human_report_without_flaky_tests() {
        let report = FlakyReport::new(&sample_results(), 0.5);
        assert_eq!(
            write_to_string(&report, ReportFormat::Human, false),
            "\n--- Flaky Test Report ---\n\
             No tests identified as flaky (threshold: 50% failure rate).\n"
        );
    }

    #[test]
    fn human_report_single_test() {
        let results = vec![result(Some("pkg"), "TestOnce", TestStatus::Fail)];
        let report = FlakyReport::new(&results, 0.1);
        let output = write_to_string(&report, ReportFormat::Human, false);
        assert!(
            output.contains("Identified 1 potentially flaky test (threshold: 10% failure rate):"),
            "output:\n{output}"
        );
    }

    #[test]
    fn human_report_no_results() {
        let report = FlakyReport::new(&[], 0.1);
        assert_eq!(
            write_to_string(&report, ReportFormat::Human, false),
            "No test results found to analyze.\n"
        );
    }

    #[test]
    fn human_report_colorized() {
        let report = FlakyReport::new(&sample_results(), 0.1);
        let plain = write_to_string(&report, ReportFormat::Human, false);
        let colored = write_to_string(&report, ReportFormat::Human, true);
        assert!(!plain.contains('\u{1b}'));
        assert!(colored.contains('\u{1b}'));
    }

    #[test]
    fn json_report() {
        let report = FlakyReport::new(&sample_results(), 0.1);

        for format in [ReportFormat::Json, ReportFormat::JsonPretty] {
            let output = write_to_string(&report, format, true);
            assert!(output.ends_with('\n'));
            assert!(!output.contains('\u{1b}'));
            if format == ReportFormat::Json {
                assert_eq!(output.lines().count(), 1);
            }

            let summary: FlakyReportSummary =
                serde_json::from_str(&output).expect("output is valid JSON");
            assert_eq!(summary, report.to_summary());
            assert_eq!(summary.total_results, 8);
            let names: Vec<_> = summary
                .flaky_tests
                .iter()
                .map(|test| test.name.as_str())
                .collect();
            assert_eq!(names, ["TestFlaky", "TestOrphan"]);
        }
    }
}
