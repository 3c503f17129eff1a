// SPDX-License-Identifier: MIT OR Apache-2.0
//! The three render targets for [`crate::ErrorReport`].

use std::fmt::Write as _;

use crate::ErrorReport;

pub(crate) fn to_json(report: &ErrorReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\":\"failed to render report: {e}\"}}"))
}

pub(crate) fn to_text(report: &ErrorReport) -> String {
    let mut out = String::new();
    let s = &report.summary;
    let _ = writeln!(
        out,
        "{} event(s), {} error(s), {} warning(s), {} info (error rate {:.1}%)",
        s.event_count,
        s.error_count,
        s.warning_count,
        s.info_count,
        s.error_rate * 100.0
    );
    if let Some(rule_id) = &s.most_common_rule_id {
        let _ = writeln!(out, "most common rule: {rule_id}");
    }
    if !report.enhanced_errors.is_empty() {
        out.push('\n');
        for enhanced in &report.enhanced_errors {
            let _ = writeln!(
                out,
                "[{}] {}: {}",
                enhanced.error.severity, enhanced.error.rule_id, enhanced.error.message
            );
        }
    }
    if !report.recommendations.is_empty() {
        out.push_str("\nrecommendations:\n");
        for rec in &report.recommendations {
            let _ = writeln!(out, "  (p{}) {}: {}", rec.priority, rec.rule_id, rec.text);
        }
    }
    out
}

pub(crate) fn to_markdown(report: &ErrorReport) -> String {
    let mut out = String::new();
    let s = &report.summary;
    out.push_str("# Validation report\n\n");
    let _ = writeln!(
        out,
        "- events: {}\n- errors: {}\n- warnings: {}\n- info: {}\n- error rate: {:.1}%",
        s.event_count,
        s.error_count,
        s.warning_count,
        s.info_count,
        s.error_rate * 100.0
    );
    if let Some(rule_id) = &s.most_common_rule_id {
        let _ = writeln!(out, "- most common rule: `{rule_id}`");
    }

    if !report.enhanced_errors.is_empty() {
        out.push_str("\n## Findings\n\n| severity | rule | message |\n|---|---|---|\n");
        for enhanced in &report.enhanced_errors {
            let _ = writeln!(
                out,
                "| {} | `{}` | {} |",
                enhanced.error.severity, enhanced.error.rule_id, enhanced.error.message
            );
        }
    }

    if !report.recommendations.is_empty() {
        out.push_str("\n## Recommendations\n\n");
        for rec in &report.recommendations {
            let _ = writeln!(out, "- **P{}** `{}`: {}", rec.priority, rec.rule_id, rec.text);
        }
    }
    out
}
