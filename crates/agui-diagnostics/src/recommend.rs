// SPDX-License-Identifier: MIT OR Apache-2.0
//! Priority-ordered remediation recommendations for well-known rule ids.

use agui_validate::{Severity, ValidationError};
use serde::Serialize;

/// A remediation recommendation surfaced for one or more findings.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    /// Rule id this recommendation addresses.
    pub rule_id: String,
    /// 1 (highest) to 3 (lowest); errors from well-known rules outrank
    /// everything else.
    pub priority: u8,
    /// Actionable guidance text.
    pub text: String,
    /// How many findings from this rule triggered the recommendation.
    pub occurrence_count: usize,
}

fn guidance(rule_id: &str) -> Option<&'static str> {
    match rule_id {
        "MESSAGE_LIFECYCLE" => {
            Some("Always emit TEXT_MESSAGE_START before any TEXT_MESSAGE_CONTENT, and TEXT_MESSAGE_END to close it.")
        }
        "TOOL_CALL_LIFECYCLE" => {
            Some("Always emit TOOL_CALL_START before any TOOL_CALL_ARGS, and TOOL_CALL_END to close it.")
        }
        "RUN_LIFECYCLE" => {
            Some("Ensure exactly one RUN_STARTED precedes any RUN_FINISHED or RUN_ERROR for a given run id.")
        }
        _ => None,
    }
}

pub(crate) fn recommend(findings: &[&ValidationError]) -> Vec<Recommendation> {
    let mut by_rule: std::collections::BTreeMap<&str, (usize, Severity)> = std::collections::BTreeMap::new();
    for finding in findings {
        let entry = by_rule.entry(finding.rule_id.as_str()).or_insert((0, finding.severity));
        entry.0 += 1;
        if finding.severity > entry.1 {
            entry.1 = finding.severity;
        }
    }

    let mut recommendations: Vec<Recommendation> = by_rule
        .into_iter()
        .filter_map(|(rule_id, (count, severity))| {
            let text = guidance(rule_id)?;
            let priority = match (rule_id, severity) {
                (_, Severity::Error) => 1,
                (_, Severity::Warning) => 2,
                (_, Severity::Info) => 3,
            };
            Some(Recommendation {
                rule_id: rule_id.to_string(),
                priority,
                text: text.to_string(),
                occurrence_count: count,
            })
        })
        .collect();
    recommendations.sort_by_key(|r| r.priority);
    recommendations
}
