// SPDX-License-Identifier: MIT OR Apache-2.0
//! Assembly of [`ErrorReport`] from a [`ValidationResult`].

use std::collections::BTreeMap;

use agui_core::{Event, EventKind};
use agui_validate::{Severity, ValidationError, ValidationMetrics, ValidationResult};
use serde::Serialize;

use crate::{event_primary_id, nearby_context, recommend, ErrorReporter};

/// Aggregate counts and rates across a [`ValidationResult`].
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    /// Total events the result covers.
    pub event_count: usize,
    /// Total error-severity findings.
    pub error_count: usize,
    /// Total warning-severity findings.
    pub warning_count: usize,
    /// Total info-severity findings.
    pub info_count: usize,
    /// `error_count / event_count`, 0.0 if `event_count` is 0.
    pub error_rate: f64,
    /// The rule id with the most findings, if any findings exist.
    pub most_common_rule_id: Option<String>,
    /// Finding counts keyed by event kind (`wire_name`).
    pub counts_by_kind: BTreeMap<String, usize>,
    /// Finding counts keyed by rule id.
    pub counts_by_rule: BTreeMap<String, usize>,
}

/// One finding enriched with surrounding context.
#[derive(Debug, Clone, Serialize)]
pub struct EnhancedError {
    /// The underlying finding.
    pub error: ValidationError,
    /// Kind of the event immediately before the offending one, if known.
    pub previous_event_kind: Option<EventKind>,
    /// Kind of the event immediately after the offending one, if known.
    pub next_event_kind: Option<EventKind>,
    /// Kinds of the few events immediately preceding the offending one,
    /// oldest first, for a quick "what just happened" window.
    pub recent_kinds: Vec<EventKind>,
    /// JSON of the offending event, present only when the reporter is
    /// in verbose mode and the event could be located.
    pub event_json: Option<serde_json::Value>,
}

/// Findings grouped by `rule_id:kind`.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedError {
    /// The `rule_id:kind` group key.
    pub key: String,
    /// Findings in this group.
    pub errors: Vec<ValidationError>,
}

/// A complete, render-ready validation report (spec §4.7).
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    /// Aggregate counts and rates.
    pub summary: ReportSummary,
    /// Every error/warning/info finding, enriched with context, in the
    /// order the underlying result recorded them.
    pub enhanced_errors: Vec<EnhancedError>,
    /// Findings grouped by `rule_id:kind`.
    pub grouped_errors: Vec<GroupedError>,
    /// `(key, value)` environment tags (OS, arch, engine version).
    pub environment: Vec<(String, String)>,
    /// Remediation recommendations, highest priority first.
    pub recommendations: Vec<recommend::Recommendation>,
    /// Average per-event validation latency in microseconds, if metrics
    /// were supplied.
    pub average_latency_micros: Option<u128>,
}

const RECENT_WINDOW: usize = 3;

pub(crate) fn build(
    reporter: &ErrorReporter,
    result: &ValidationResult,
    events: Option<&[Event]>,
    metrics: Option<&ValidationMetrics>,
) -> ErrorReport {
    let all: Vec<&ValidationError> = result
        .errors
        .iter()
        .chain(result.warnings.iter())
        .chain(result.information.iter())
        .collect();

    let mut counts_by_kind = BTreeMap::new();
    let mut counts_by_rule = BTreeMap::new();
    for finding in &all {
        if let Some(kind) = finding.event_kind {
            *counts_by_kind.entry(kind.to_string()).or_insert(0usize) += 1;
        }
        *counts_by_rule.entry(finding.rule_id.clone()).or_insert(0usize) += 1;
    }
    let most_common_rule_id = counts_by_rule
        .iter()
        .max_by_key(|(_, count)| **count)
        .map(|(id, _)| id.clone());

    let summary = ReportSummary {
        event_count: result.event_count,
        error_count: result.errors.len(),
        warning_count: result.warnings.len(),
        info_count: result.information.len(),
        error_rate: if result.event_count == 0 {
            0.0
        } else {
            result.errors.len() as f64 / result.event_count as f64
        },
        most_common_rule_id,
        counts_by_kind,
        counts_by_rule,
    };

    let enhanced_errors = all.iter().map(|e| enhance(reporter, e, events)).collect();

    let mut groups: BTreeMap<String, Vec<ValidationError>> = BTreeMap::new();
    for finding in &all {
        let kind_tag = finding.event_kind.map(|k| k.to_string()).unwrap_or_else(|| "UNKNOWN".to_string());
        let key = format!("{}:{}", finding.rule_id, kind_tag);
        groups.entry(key).or_default().push((*finding).clone());
    }
    let grouped_errors = groups
        .into_iter()
        .map(|(key, errors)| GroupedError { key, errors })
        .collect();

    ErrorReport {
        summary,
        enhanced_errors,
        grouped_errors,
        environment: crate::environment_tags(),
        recommendations: recommend::recommend(&all),
        average_latency_micros: metrics.map(|m| m.average_latency().as_micros()),
    }
}

fn enhance(reporter: &ErrorReporter, finding: &ValidationError, events: Option<&[Event]>) -> EnhancedError {
    let (previous, next) = nearby_context(events, finding.event_id.as_deref());

    let recent_kinds = events
        .zip(finding.event_id.as_deref())
        .and_then(|(events, id)| {
            let index = events.iter().position(|e| event_primary_id(e).as_deref() == Some(id))?;
            let start = index.saturating_sub(RECENT_WINDOW);
            Some(events[start..index].iter().map(Event::kind).collect())
        })
        .unwrap_or_default();

    let event_json = if reporter.verbose {
        events
            .zip(finding.event_id.as_deref())
            .and_then(|(events, id)| events.iter().find(|e| event_primary_id(e).as_deref() == Some(id)))
            .and_then(|event| serde_json::to_value(event).ok())
    } else {
        None
    };

    EnhancedError {
        error: finding.clone(),
        previous_event_kind: previous.map(Event::kind),
        next_event_kind: next.map(Event::kind),
        recent_kinds,
        event_json,
    }
}
