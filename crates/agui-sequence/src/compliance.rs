// SPDX-License-Identifier: MIT OR Apache-2.0
//! [`ComplianceReport`]: a point-in-time health check over a tracker's
//! history and live state, distinct from [`agui_validate::ValidationError`]
//! (channel 2 of spec §7's three-channel error model) — compliance issues
//! are produced on demand, not raised during streaming validation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use agui_core::{Event, EventKind};
use agui_validate::Severity;

use crate::SequenceTracker;

/// What kind of compliance issue was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceIssueKind {
    /// A message started but never ended, active longer than the
    /// configured warning threshold.
    OrphanedMessage,
    /// A tool call started but never ended, active longer than the
    /// configured warning threshold.
    OrphanedToolCall,
    /// A run started but never terminated, active longer than the
    /// configured error threshold.
    IncompleteRun,
    /// The first retained event was not `RUN_STARTED`.
    SequenceDidNotOpenWithRunStarted,
    /// A non-`RUN_ERROR` event was retained after `RUN_FINISHED`.
    EventAfterRunFinished,
}

/// One compliance finding.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceIssue {
    /// What kind of issue this is.
    pub kind: ComplianceIssueKind,
    /// The id of the affected entity (run id, message id, tool-call id),
    /// if the issue is entity-scoped.
    pub entity_id: Option<String>,
    /// How serious this finding is.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// How long the entity has been active, for age-based issues.
    pub age_secs: Option<u64>,
}

/// The result of [`SequenceTracker::check_sequence_compliance`].
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReport {
    /// When this report was generated.
    pub generated_at: DateTime<Utc>,
    /// Every issue found, in the order the checks ran.
    pub issues: Vec<ComplianceIssue>,
}

impl ComplianceReport {
    /// Whether any `Error`-severity issue was found.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }
}

pub(crate) fn check(tracker: &SequenceTracker) -> ComplianceReport {
    let mut issues = Vec::new();

    for (message_id, started_at) in tracker.message_started_at() {
        let age = started_at.elapsed();
        if age >= tracker.orphan_age_warning() {
            issues.push(ComplianceIssue {
                kind: ComplianceIssueKind::OrphanedMessage,
                entity_id: Some(message_id.clone()),
                severity: Severity::Warning,
                message: format!("message {message_id} has been active for {}s without ending", age.as_secs()),
                age_secs: Some(age.as_secs()),
            });
        }
    }

    for (tool_call_id, started_at) in tracker.tool_started_at() {
        let age = started_at.elapsed();
        if age >= tracker.orphan_age_warning() {
            issues.push(ComplianceIssue {
                kind: ComplianceIssueKind::OrphanedToolCall,
                entity_id: Some(tool_call_id.clone()),
                severity: Severity::Warning,
                message: format!("tool call {tool_call_id} has been active for {}s without ending", age.as_secs()),
                age_secs: Some(age.as_secs()),
            });
        }
    }

    for (run_id, started_at) in tracker.run_started_at() {
        let age = started_at.elapsed();
        if age >= tracker.incomplete_run_age_error() {
            issues.push(ComplianceIssue {
                kind: ComplianceIssueKind::IncompleteRun,
                entity_id: Some(run_id.clone()),
                severity: Severity::Error,
                message: format!("run {run_id} has been active for {}s without finishing or erroring", age.as_secs()),
                age_secs: Some(age.as_secs()),
            });
        }
    }

    check_protocol_shape(tracker.history(), &mut issues);

    ComplianceReport {
        generated_at: Utc::now(),
        issues,
    }
}

fn check_protocol_shape(history: &std::collections::VecDeque<Event>, issues: &mut Vec<ComplianceIssue>) {
    if let Some(first) = history.front()
        && first.kind() != EventKind::RunStarted
    {
        issues.push(ComplianceIssue {
            kind: ComplianceIssueKind::SequenceDidNotOpenWithRunStarted,
            entity_id: None,
            severity: Severity::Error,
            message: format!("retained history opens with {} instead of RUN_STARTED", first.kind()),
            age_secs: None,
        });
    }

    let mut finished = false;
    for event in history {
        if finished && event.kind() != EventKind::RunError {
            issues.push(ComplianceIssue {
                kind: ComplianceIssueKind::EventAfterRunFinished,
                entity_id: None,
                severity: Severity::Error,
                message: format!("{} retained after RUN_FINISHED", event.kind()),
                age_secs: None,
            });
        }
        match event.kind() {
            EventKind::RunFinished => finished = true,
            EventKind::RunStarted => finished = false,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now_ms() -> i64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_millis() as i64
    }

    #[test]
    fn fresh_tracker_reports_no_issues() {
        let tracker = SequenceTracker::new();
        assert!(tracker.check_sequence_compliance().issues.is_empty());
    }

    #[test]
    fn incomplete_run_past_threshold_is_an_error() {
        use std::time::Duration;
        let mut tracker = SequenceTracker::new().with_age_thresholds(Duration::from_secs(3600), Duration::ZERO);
        let mut started = Event::run_started("t", "r1");
        started.set_timestamp(now_ms());
        tracker.process_event(started);
        let report = tracker.check_sequence_compliance();
        assert!(report.has_errors());
        assert!(report
            .issues
            .iter()
            .any(|i| i.kind == ComplianceIssueKind::IncompleteRun && i.entity_id.as_deref() == Some("r1")));
    }

    #[test]
    fn well_formed_run_produces_no_issues() {
        let mut tracker = SequenceTracker::new();
        let mut started = Event::run_started("t", "r1");
        started.set_timestamp(now_ms());
        tracker.process_event(started);
        let mut finished = Event::run_finished("t", "r1");
        finished.set_timestamp(now_ms());
        tracker.process_event(finished);
        assert!(tracker.check_sequence_compliance().issues.is_empty());
    }
}
