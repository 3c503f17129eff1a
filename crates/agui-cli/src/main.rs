// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
//! Companion inspection tool for AG-UI event logs, external to the core
//! crates (spec §6: "the core has none [CLI]"). Reads newline-delimited
//! JSON event logs, runs them through the validator and compliance
//! checker, and prints human- or machine-readable reports.

use std::path::{Path, PathBuf};

use agui_core::{Event, EventKind};
use agui_diagnostics::{ErrorReporter, ReportFormat as DiagReportFormat};
use agui_protocol::decode_json_str;
use agui_sequence::SequenceTracker;
use agui_validate::{ValidationResult, ValidatorConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Exit code used when the subcommand's own check (e.g. sequence
/// validity) fails; distinct from a usage error, which clap exits with
/// automatically.
const EXIT_CHECK_FAILED: i32 = 1;

#[derive(Parser, Debug)]
#[command(name = "agui", version, about = "AG-UI event protocol inspection CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging.
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a newline-delimited JSON event log.
    Validate {
        /// Path to the event log (one JSON event per line).
        file: PathBuf,

        /// Report rendering format.
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,

        /// Run permissively instead of strictly.
        #[arg(long)]
        permissive: bool,
    },

    /// Check a newline-delimited JSON event log for protocol compliance.
    Compliance {
        /// Path to the event log (one JSON event per line).
        file: PathBuf,

        /// Report rendering format.
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
    },

    /// Print the JSON schema for a given event kind's payload.
    Schema {
        /// Which event kind's schema to print.
        #[arg(value_enum)]
        kind: KindArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Text,
    Markdown,
}

impl From<FormatArg> for DiagReportFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Json => DiagReportFormat::Json,
            FormatArg::Text => DiagReportFormat::Text,
            FormatArg::Markdown => DiagReportFormat::Markdown,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
#[allow(clippy::enum_variant_names)]
enum KindArg {
    RunStarted,
    RunFinished,
    RunError,
    StepStarted,
    StepFinished,
    TextMessageStart,
    TextMessageContent,
    TextMessageEnd,
    ToolCallStart,
    ToolCallArgs,
    ToolCallEnd,
    StateSnapshot,
    StateDelta,
    MessagesSnapshot,
    Raw,
    Custom,
}

impl From<KindArg> for EventKind {
    fn from(v: KindArg) -> Self {
        match v {
            KindArg::RunStarted => EventKind::RunStarted,
            KindArg::RunFinished => EventKind::RunFinished,
            KindArg::RunError => EventKind::RunError,
            KindArg::StepStarted => EventKind::StepStarted,
            KindArg::StepFinished => EventKind::StepFinished,
            KindArg::TextMessageStart => EventKind::TextMessageStart,
            KindArg::TextMessageContent => EventKind::TextMessageContent,
            KindArg::TextMessageEnd => EventKind::TextMessageEnd,
            KindArg::ToolCallStart => EventKind::ToolCallStart,
            KindArg::ToolCallArgs => EventKind::ToolCallArgs,
            KindArg::ToolCallEnd => EventKind::ToolCallEnd,
            KindArg::StateSnapshot => EventKind::StateSnapshot,
            KindArg::StateDelta => EventKind::StateDelta,
            KindArg::MessagesSnapshot => EventKind::MessagesSnapshot,
            KindArg::Raw => EventKind::Raw,
            KindArg::Custom => EventKind::Custom,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("agui=debug")
    } else {
        EnvFilter::new("agui=info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Validate { file, format, permissive } => cmd_validate(&file, format, permissive),
        Commands::Compliance { file, format } => cmd_compliance(&file, format),
        Commands::Schema { kind } => cmd_schema(kind.into()),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(EXIT_CHECK_FAILED);
    }
}

/// Read a newline-delimited JSON event log, decoding every non-blank
/// line. A decode failure on any line aborts with a contextualized
/// error rather than skipping the bad line silently.
fn read_event_log(path: &Path) -> Result<Vec<Event>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read event log '{}'", path.display()))?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(lineno, line)| {
            decode_json_str(line).with_context(|| format!("decode event at line {}", lineno + 1))
        })
        .collect()
}

fn cmd_validate(path: &Path, format: FormatArg, permissive: bool) -> Result<()> {
    let events = read_event_log(path)?;

    let config = if permissive {
        ValidatorConfig::permissive()
    } else {
        ValidatorConfig::strict()
    };
    let mut tracker = SequenceTracker::with_config(config, 10_000);

    let mut result = ValidationResult::empty();
    for event in &events {
        result.merge(tracker.process_event(event.clone()));
    }

    let reporter = ErrorReporter::new();
    let metrics = tracker.validator().get_metrics();
    let report = reporter.generate_report(&result, Some(events.as_slice()), Some(&metrics));

    if result.is_valid {
        println!("VALID");
    } else {
        println!("INVALID ({} error(s))", result.errors.len());
    }
    println!("{}", reporter.format(&report, format.into()));

    if !result.is_valid {
        std::process::exit(EXIT_CHECK_FAILED);
    }
    Ok(())
}

fn cmd_compliance(path: &Path, format: FormatArg) -> Result<()> {
    let events = read_event_log(path)?;
    let mut tracker = SequenceTracker::new();
    for event in events {
        tracker.process_event(event);
    }

    let report = tracker.check_sequence_compliance();
    match DiagReportFormat::from(format) {
        DiagReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        DiagReportFormat::Text | DiagReportFormat::Markdown => {
            println!("compliance issues: {}", report.issues.len());
            for issue in &report.issues {
                println!("  [{:?}] {}", issue.severity, issue.message);
            }
        }
    }

    if report.has_errors() {
        std::process::exit(EXIT_CHECK_FAILED);
    }
    Ok(())
}

fn cmd_schema(kind: EventKind) -> Result<()> {
    let full = schemars::schema_for!(Event);
    let full_json = serde_json::to_value(&full)?;
    let subschema = find_variant_schema(&full_json, kind.wire_name())
        .with_context(|| format!("no schema found for event kind {}", kind.wire_name()))?;
    println!("{}", serde_json::to_string_pretty(&subschema)?);
    Ok(())
}

/// `Event` is a single internally-tagged enum, not sixteen separate Rust
/// types, so `schemars` emits one schema with a `oneOf`/`anyOf` branch per
/// variant. Find the branch whose `type` const matches this kind's wire
/// name.
fn find_variant_schema(full: &serde_json::Value, wire_name: &str) -> Option<serde_json::Value> {
    let branches = full
        .get("oneOf")
        .or_else(|| full.get("anyOf"))
        .and_then(|v| v.as_array())?;
    branches
        .iter()
        .find(|branch| branch_matches_wire_name(branch, wire_name))
        .cloned()
}

fn branch_matches_wire_name(branch: &serde_json::Value, wire_name: &str) -> bool {
    let Some(properties) = branch.get("properties").and_then(|p| p.as_object()) else {
        return false;
    };
    properties
        .get("type")
        .and_then(|t| t.get("const"))
        .and_then(|c| c.as_str())
        == Some(wire_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_cmd::Command;
    use predicates::prelude::*;
    use std::io::Write;

    fn write_log(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(f, "{line}").unwrap();
        }
        f
    }

    #[test]
    fn validate_minimal_valid_run_prints_valid_and_exits_zero() {
        let log = write_log(&[
            r#"{"type":"RUN_STARTED","threadId":"t1","runId":"r1","timestamp":1700000000000}"#,
            r#"{"type":"RUN_FINISHED","threadId":"t1","runId":"r1","timestamp":1700000000001}"#,
        ]);
        Command::cargo_bin("agui")
            .unwrap()
            .arg("validate")
            .arg(log.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("VALID").and(predicate::str::starts_with("VALID")));
    }

    #[test]
    fn validate_orphan_content_prints_invalid_and_exits_nonzero() {
        let log = write_log(&[
            r#"{"type":"RUN_STARTED","threadId":"t","runId":"r"}"#,
            r#"{"type":"TEXT_MESSAGE_CONTENT","messageId":"m1","delta":"hi"}"#,
        ]);
        Command::cargo_bin("agui")
            .unwrap()
            .arg("validate")
            .arg(log.path())
            .assert()
            .failure()
            .code(EXIT_CHECK_FAILED)
            .stdout(predicate::str::starts_with("INVALID"));
    }

    #[test]
    fn schema_prints_run_started_payload_fields() {
        Command::cargo_bin("agui")
            .unwrap()
            .args(["schema", "run-started"])
            .assert()
            .success()
            .stdout(predicate::str::contains("threadId"))
            .stdout(predicate::str::contains("runId"));
    }

    #[test]
    fn compliance_reports_zero_issues_for_clean_run() {
        let log = write_log(&[
            r#"{"type":"RUN_STARTED","threadId":"t","runId":"r","timestamp":1700000000000}"#,
            r#"{"type":"RUN_FINISHED","threadId":"t","runId":"r","timestamp":1700000000001}"#,
        ]);
        Command::cargo_bin("agui")
            .unwrap()
            .arg("compliance")
            .arg(log.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("compliance issues: 0"));
    }

    #[test]
    fn find_variant_schema_locates_run_started_branch() {
        let full = schemars::schema_for!(Event);
        let full_json = serde_json::to_value(&full).unwrap();
        let branch = find_variant_schema(&full_json, "RUN_STARTED").unwrap();
        assert!(branch.get("properties").unwrap().get("threadId").is_some());
    }
}
