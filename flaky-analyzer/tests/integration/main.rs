// Copyright (c) The flaky-tracker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: test logs are parsed, combined and reported the way `flaky-tracker analyze`
//! does it.

use camino::Utf8PathBuf;
use flaky_analyzer::{
    parser::{LogSource, parse_test_log},
    reporter::{FlakyReport, ReportFormat},
    test_result::{TestResult, TestStatus},
};
use indoc::indoc;
use pretty_assertions::assert_eq;
use test_case::test_case;

fn parse(name: &str, log: &str) -> Vec<TestResult> {
    parse_test_log(&LogSource::File(Utf8PathBuf::from(name)), log.as_bytes())
        .expect("parsing from memory succeeded")
}

fn flaky_rows(report: &FlakyReport) -> Vec<(Option<&str>, &str, usize, usize)> {
    report
        .flaky_tests()
        .iter()
        .map(|test| {
            (
                test.package.as_deref(),
                test.name.as_str(),
                test.failures,
                test.total_runs,
            )
        })
        .collect()
}

fn ten_percent_log() -> String {
    let mut log = "ok      pkg    0.1s\n".to_owned();
    for _ in 0..9 {
        log.push_str("--- PASS: T1 (0.01s)\n");
    }
    log.push_str("--- FAIL: T1 (0.00s)\n");
    log
}

#[test_case(0.1, false ; "exactly at threshold")]
#[test_case(0.05, true ; "below failure rate")]
#[test_case(0.0, true ; "zero threshold")]
fn failure_rate_must_exceed_threshold(threshold: f64, flagged: bool) {
    let results = parse("run.log", &ten_percent_log());
    assert_eq!(results.len(), 10);

    let report = FlakyReport::new(&results, threshold);
    let expected = if flagged {
        vec![(Some("pkg"), "T1", 1, 10)]
    } else {
        vec![]
    };
    assert_eq!(flaky_rows(&report), expected);
}

#[test]
fn empty_log() {
    let results = parse("empty.log", "");
    assert!(results.is_empty());

    let report = FlakyReport::new(&results, 0.1);
    assert_eq!(report.total_results(), 0);
    assert!(report.flaky_tests().is_empty());
}

#[test]
fn malformed_duration_is_skipped() {
    let results = parse(
        "run.log",
        indoc! {"
            === RUN   TestA
            --- PASS: TestA (abc s)
            --- FAIL: TestA (abcs)
            --- PASS: TestA (0.02s)
            --- FAIL: TestB (0.10s)
            ok      example.com/pkg    0.200s
        "},
    );

    let parsed: Vec<_> = results
        .iter()
        .map(|result| (result.name.as_str(), result.status, result.package.as_deref()))
        .collect();
    assert_eq!(
        parsed,
        [
            ("TestA", TestStatus::Pass, Some("example.com/pkg")),
            ("TestB", TestStatus::Fail, Some("example.com/pkg")),
        ]
    );
}

#[test]
fn packages_do_not_leak_across_logs() {
    let mut results = parse(
        "first.log",
        indoc! {"
            --- FAIL: TestShared (0.01s)
            --- PASS: TestShared (0.01s)
        "},
    );
    results.extend(parse(
        "second.log",
        indoc! {"
            ok      example.com/second    0.100s
            --- FAIL: TestShared (0.02s)
            --- PASS: TestOther (0.02s)
        "},
    ));

    let packages: Vec<_> = results
        .iter()
        .map(|result| result.package.as_deref())
        .collect();
    assert_eq!(
        packages,
        [None, None, Some("example.com/second"), Some("example.com/second")]
    );

    let report = FlakyReport::new(&results, 0.1);
    assert_eq!(report.total_results(), 4);
    assert_eq!(
        flaky_rows(&report),
        [
            (Some("example.com/second"), "TestShared", 1, 1),
            (None, "TestShared", 1, 2),
        ]
    );
}

#[test]
fn repeated_runs_of_a_package() {
    let run = indoc! {"
        === RUN   TestStable
        --- PASS: TestStable (0.00s)
        === RUN   TestFlaky
        --- FAIL: TestFlaky (0.31s)
        FAIL
        FAIL    example.com/net    0.412s
    "};
    let passing_run = indoc! {"
        --- PASS: TestStable (0.00s)
        --- PASS: TestFlaky (0.29s)
        PASS
        ok      example.com/net    0.388s
    "};

    let mut results = parse("run-1.log", run);
    for index in 2..=4 {
        results.extend(parse(&format!("run-{index}.log"), passing_run));
    }

    let report = FlakyReport::new(&results, 0.1);
    assert_eq!(
        flaky_rows(&report),
        [(Some("example.com/net"), "TestFlaky", 1, 4)]
    );

    let mut output = String::new();
    report
        .write(ReportFormat::Human, false, &mut output)
        .expect("writing to a string succeeded");
    assert!(
        output.contains("Identified 1 potentially flaky test (threshold: 10% failure rate):"),
        "output:\n{output}"
    );
    let row = output.lines().last().expect("report has rows");
    let fields: Vec<_> = row.split_whitespace().collect();
    assert_eq!(fields, ["TestFlaky", "example.com/net", "25.00%", "1", "4"]);
}
