// SPDX-License-Identifier: MIT OR Apache-2.0
//! Integration tests for the `agui` CLI binary.

use assert_cmd::Command;
use predicates::str::{contains, starts_with};
use std::io::Write;

fn agui() -> Command {
    Command::cargo_bin("agui").expect("binary `agui` should be built")
}

fn write_log(lines: &[&str]) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(f, "{line}").unwrap();
    }
    f
}

// ── Help & version ──────────────────────────────────────────────────

#[test]
fn help_flag_prints_usage() {
    agui()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("validate"))
        .stdout(contains("compliance"))
        .stdout(contains("schema"));
}

#[test]
fn version_flag_prints_version() {
    agui()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

// ── validate: normative output contract ─────────────────────────────

#[test]
fn validate_full_message_and_tool_lifecycle_is_valid() {
    let log = write_log(&[
        r#"{"type":"RUN_STARTED","threadId":"t","runId":"r","timestamp":1700000000000}"#,
        r#"{"type":"TEXT_MESSAGE_START","messageId":"m1","role":"user","timestamp":1700000000001}"#,
        r#"{"type":"TEXT_MESSAGE_CONTENT","messageId":"m1","delta":"Hello, ","timestamp":1700000000002}"#,
        r#"{"type":"TEXT_MESSAGE_CONTENT","messageId":"m1","delta":"world!","timestamp":1700000000003}"#,
        r#"{"type":"TEXT_MESSAGE_END","messageId":"m1","timestamp":1700000000004}"#,
        r#"{"type":"TOOL_CALL_START","toolCallId":"t1","toolCallName":"weather","parentMessageId":"m1","timestamp":1700000000005}"#,
        r#"{"type":"TOOL_CALL_ARGS","toolCallId":"t1","delta":"{\"loc\":\"SF\"}","timestamp":1700000000006}"#,
        r#"{"type":"TOOL_CALL_END","toolCallId":"t1","timestamp":1700000000007}"#,
        r#"{"type":"RUN_FINISHED","threadId":"t","runId":"r","timestamp":1700000000008}"#,
    ]);
    agui()
        .arg("validate")
        .arg(log.path())
        .assert()
        .success()
        .stdout(starts_with("VALID"));
}

#[test]
fn validate_duplicate_run_start_is_invalid() {
    let log = write_log(&[
        r#"{"type":"RUN_STARTED","threadId":"t","runId":"r"}"#,
        r#"{"type":"RUN_STARTED","threadId":"t","runId":"r"}"#,
    ]);
    agui()
        .arg("validate")
        .arg(log.path())
        .assert()
        .failure()
        .code(1)
        .stdout(starts_with("INVALID"));
}

#[test]
fn validate_events_after_finish_reports_event_ordering_violation() {
    let log = write_log(&[
        r#"{"type":"RUN_STARTED","threadId":"t","runId":"r"}"#,
        r#"{"type":"RUN_FINISHED","threadId":"t","runId":"r"}"#,
        r#"{"type":"STEP_STARTED","stepName":"s"}"#,
    ]);
    agui()
        .arg("validate")
        .arg(log.path())
        .assert()
        .failure()
        .stdout(contains("EVENT_ORDERING").or(contains("after RUN_FINISHED")));
}

#[test]
fn validate_empty_log_is_valid() {
    let log = write_log(&[]);
    agui()
        .arg("validate")
        .arg(log.path())
        .assert()
        .success()
        .stdout(starts_with("VALID"));
}

#[test]
fn validate_markdown_format_renders_markdown_report() {
    let log = write_log(&[r#"{"type":"TEXT_MESSAGE_CONTENT","messageId":"m1","delta":"hi"}"#]);
    agui()
        .args(["validate", "--format", "markdown"])
        .arg(log.path())
        .assert()
        .failure()
        .stdout(contains('#').or(contains("MESSAGE_LIFECYCLE")));
}

// ── compliance ───────────────────────────────────────────────────────

#[test]
fn compliance_on_clean_run_reports_zero_issues() {
    let log = write_log(&[
        r#"{"type":"RUN_STARTED","threadId":"t","runId":"r","timestamp":1700000000000}"#,
        r#"{"type":"RUN_FINISHED","threadId":"t","runId":"r","timestamp":1700000000001}"#,
    ]);
    agui()
        .arg("compliance")
        .arg(log.path())
        .assert()
        .success()
        .stdout(contains("compliance issues: 0"));
}

// ── schema ───────────────────────────────────────────────────────────

#[test]
fn schema_tool_call_start_includes_parent_message_id() {
    agui()
        .args(["schema", "tool-call-start"])
        .assert()
        .success()
        .stdout(contains("toolCallId"))
        .stdout(contains("parentMessageId"));
}

#[test]
fn schema_custom_includes_name_field() {
    agui()
        .args(["schema", "custom"])
        .assert()
        .success()
        .stdout(contains("name"));
}
