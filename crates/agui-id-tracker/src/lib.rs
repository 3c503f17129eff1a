// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
#![warn(missing_docs)]
//! Order-independent structural check of AG-UI event id triplets
//! (message start/content/end, tool-call start/args/end) and pairs (run
//! start/end, step start/finish), per spec §4.5.
//!
//! Unlike `agui-validate`'s streaming validator, [`IdTracker`] doesn't
//! care about temporal order: it indexes every occurrence by id as events
//! arrive, then [`IdTracker::validate_id_consistency`] inspects the whole
//! index at once, finding orphans, duplicates, and incompleteness that a
//! purely sequential pass could miss (e.g. content for a message whose
//! start appears later in a replayed or reordered log).

use std::collections::HashMap;

use agui_core::{Event, EventKind};
use agui_validate::{Severity, ValidationError};

/// Occurrence counts for one triplet-shaped entity (message or tool call):
/// how many times its id appeared in a start, middle (content/args), and
/// end event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TripletCounts {
    /// Number of start events seen for this id.
    pub starts: u32,
    /// Number of content/args events seen for this id.
    pub middles: u32,
    /// Number of end events seen for this id.
    pub ends: u32,
}

/// Occurrence counts for one pair-shaped entity (run or step): how many
/// times its id appeared in a start and end (finish/error) event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairCounts {
    /// Number of start events seen for this id.
    pub starts: u32,
    /// Number of end events seen for this id.
    pub ends: u32,
}

/// Indexes every tracked event by id, independent of arrival order, then
/// reports structural findings across the whole index.
#[derive(Debug, Clone, Default)]
pub struct IdTracker {
    messages: HashMap<String, TripletCounts>,
    tools: HashMap<String, TripletCounts>,
    runs: HashMap<String, PairCounts>,
    steps: HashMap<String, PairCounts>,
    /// `RUN_ERROR` events carrying no `run_id` at all; tracked separately
    /// since they have nothing to index by id (spec §9 open question: an
    /// id-less `RUN_ERROR` is always permitted).
    run_errors_without_id: u32,
    kind_counts: HashMap<EventKind, u64>,
}

impl IdTracker {
    /// A fresh, empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index one event. Call this for every event in a stream, in any
    /// order; [`Self::validate_id_consistency`] doesn't assume anything
    /// about the order `track` was called in.
    pub fn track(&mut self, event: &Event) {
        *self.kind_counts.entry(event.kind()).or_default() += 1;
        match event {
            Event::RunStarted { run_id, .. } => {
                self.runs.entry(run_id.clone()).or_default().starts += 1;
            }
            Event::RunFinished { run_id, .. } => {
                self.runs.entry(run_id.clone()).or_default().ends += 1;
            }
            Event::RunError { run_id, .. } => match run_id {
                Some(id) if !id.is_empty() => {
                    self.runs.entry(id.clone()).or_default().ends += 1;
                }
                _ => self.run_errors_without_id += 1,
            },
            Event::StepStarted { step_name, .. } => {
                self.steps.entry(step_name.clone()).or_default().starts += 1;
            }
            Event::StepFinished { step_name, .. } => {
                self.steps.entry(step_name.clone()).or_default().ends += 1;
            }
            Event::TextMessageStart { message_id, .. } => {
                self.messages.entry(message_id.clone()).or_default().starts += 1;
            }
            Event::TextMessageContent { message_id, .. } => {
                self.messages.entry(message_id.clone()).or_default().middles += 1;
            }
            Event::TextMessageEnd { message_id, .. } => {
                self.messages.entry(message_id.clone()).or_default().ends += 1;
            }
            Event::ToolCallStart { tool_call_id, .. } => {
                self.tools.entry(tool_call_id.clone()).or_default().starts += 1;
            }
            Event::ToolCallArgs { tool_call_id, .. } => {
                self.tools.entry(tool_call_id.clone()).or_default().middles += 1;
            }
            Event::ToolCallEnd { tool_call_id, .. } => {
                self.tools.entry(tool_call_id.clone()).or_default().ends += 1;
            }
            Event::StateSnapshot { .. }
            | Event::StateDelta { .. }
            | Event::MessagesSnapshot { .. }
            | Event::Raw { .. }
            | Event::Custom { .. } => {}
        }
    }

    /// Index every event in `events`, in order.
    pub fn track_all<'a>(&mut self, events: impl IntoIterator<Item = &'a Event>) {
        for event in events {
            self.track(event);
        }
    }

    /// Triplet occurrence counts for a message id, if it was seen at all.
    #[must_use]
    pub fn message_counts(&self, message_id: &str) -> Option<TripletCounts> {
        self.messages.get(message_id).copied()
    }

    /// Triplet occurrence counts for a tool-call id, if it was seen at all.
    #[must_use]
    pub fn tool_counts(&self, tool_call_id: &str) -> Option<TripletCounts> {
        self.tools.get(tool_call_id).copied()
    }

    /// Pair occurrence counts for a run id, if it was seen at all.
    #[must_use]
    pub fn run_counts(&self, run_id: &str) -> Option<PairCounts> {
        self.runs.get(run_id).copied()
    }

    /// Pair occurrence counts for a step name, if it was seen at all.
    #[must_use]
    pub fn step_counts(&self, step_name: &str) -> Option<PairCounts> {
        self.steps.get(step_name).copied()
    }

    /// Multiset of tracked events by kind; equals the count of `track`
    /// calls per kind.
    #[must_use]
    pub fn statistics(&self) -> HashMap<EventKind, u64> {
        self.kind_counts.clone()
    }

    /// Run every structural check against the current index, independent
    /// of the order events were tracked in.
    #[must_use]
    pub fn validate_id_consistency(&self) -> Vec<ValidationError> {
        let mut out = Vec::new();
        self.check_triplets(&self.messages, "MESSAGE", &mut out);
        self.check_triplets(&self.tools, "TOOL", &mut out);
        self.check_pairs(&self.runs, "RUN", &mut out);
        self.check_pairs(&self.steps, "STEP", &mut out);
        out
    }

    fn check_triplets(
        &self,
        index: &HashMap<String, TripletCounts>,
        prefix: &str,
        out: &mut Vec<ValidationError>,
    ) {
        for (id, counts) in index {
            if counts.starts == 0 && (counts.middles > 0 || counts.ends > 0) {
                out.push(ValidationError::new(
                    format!("{prefix}_ORPHANED_CONTENT"),
                    Severity::Error,
                    format!("{prefix} {id} has content/args/end but no start"),
                ));
            }
            if counts.starts > 0 && counts.ends == 0 {
                out.push(ValidationError::new(
                    format!("{prefix}_INCOMPLETE"),
                    Severity::Warning,
                    format!("{prefix} {id} was started but never ended"),
                ));
            }
            if counts.ends > 0 && counts.middles == 0 {
                out.push(ValidationError::new(
                    format!("{prefix}_EMPTY_END"),
                    Severity::Warning,
                    format!("{prefix} {id} ended without any content/args"),
                ));
            }
            if counts.starts > 1 {
                out.push(ValidationError::new(
                    format!("{prefix}_DUPLICATE_START"),
                    Severity::Error,
                    format!("{prefix} {id} has {} start events", counts.starts),
                ));
            }
        }
    }

    fn check_pairs(&self, index: &HashMap<String, PairCounts>, prefix: &str, out: &mut Vec<ValidationError>) {
        for (id, counts) in index {
            if counts.starts == 0 && counts.ends > 0 {
                out.push(ValidationError::new(
                    format!("{prefix}_ORPHANED_END"),
                    Severity::Error,
                    format!("{prefix} {id} finished/errored but was never started"),
                ));
            }
            if counts.starts > 0 && counts.ends == 0 {
                out.push(ValidationError::new(
                    format!("{prefix}_INCOMPLETE"),
                    Severity::Warning,
                    format!("{prefix} {id} was started but never finished"),
                ));
            }
            if counts.starts > 1 {
                out.push(ValidationError::new(
                    format!("{prefix}_DUPLICATE_START"),
                    Severity::Error,
                    format!("{prefix} {id} has {} start events", counts.starts),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orphan_message_content_is_an_error() {
        let mut tracker = IdTracker::new();
        tracker.track(&Event::text_message_content("m1", "hi"));
        let findings = tracker.validate_id_consistency();
        assert!(findings
            .iter()
            .any(|f| f.rule_id == "MESSAGE_ORPHANED_CONTENT" && f.severity == Severity::Error));
    }

    #[test]
    fn incomplete_tool_call_is_a_warning() {
        let mut tracker = IdTracker::new();
        tracker.track(&Event::tool_call_start("t1", "weather", None));
        let findings = tracker.validate_id_consistency();
        assert!(findings
            .iter()
            .any(|f| f.rule_id == "TOOL_INCOMPLETE" && f.severity == Severity::Warning));
    }

    #[test]
    fn orphan_run_finish_is_an_error() {
        let mut tracker = IdTracker::new();
        tracker.track(&Event::run_finished("t", "r1"));
        let findings = tracker.validate_id_consistency();
        assert!(findings
            .iter()
            .any(|f| f.rule_id == "RUN_ORPHANED_END" && f.severity == Severity::Error));
    }

    #[test]
    fn run_error_without_run_id_is_not_flagged_as_orphaned() {
        let mut tracker = IdTracker::new();
        tracker.track(&Event::run_error("boom", None, None));
        assert_eq!(tracker.run_errors_without_id, 1);
        assert!(tracker.validate_id_consistency().is_empty());
    }

    #[test]
    fn duplicate_starts_are_flagged_regardless_of_order() {
        let mut tracker = IdTracker::new();
        tracker.track(&Event::run_started("t", "r1"));
        tracker.track(&Event::run_finished("t", "r1"));
        tracker.track(&Event::run_started("t", "r1"));
        let findings = tracker.validate_id_consistency();
        assert!(findings.iter().any(|f| f.rule_id == "RUN_DUPLICATE_START"));
    }

    #[test]
    fn well_formed_triplet_produces_no_findings() {
        let mut tracker = IdTracker::new();
        tracker.track_all(&[
            Event::text_message_start("m1", None),
            Event::text_message_content("m1", "hi"),
            Event::text_message_end("m1"),
        ]);
        assert!(tracker.validate_id_consistency().is_empty());
        assert_eq!(
            tracker.message_counts("m1"),
            Some(TripletCounts {
                starts: 1,
                middles: 1,
                ends: 1
            })
        );
    }

    #[test]
    fn statistics_match_multiset_counts_by_kind() {
        let mut tracker = IdTracker::new();
        tracker.track_all(&[
            Event::run_started("t", "r"),
            Event::run_started("t", "r2"),
            Event::run_finished("t", "r"),
        ]);
        let stats = tracker.statistics();
        assert_eq!(stats[&EventKind::RunStarted], 2);
        assert_eq!(stats[&EventKind::RunFinished], 1);
    }

    #[test]
    fn empty_end_without_content_is_a_warning() {
        let mut tracker = IdTracker::new();
        tracker.track_all(&[
            Event::text_message_start("m1", None),
            Event::text_message_end("m1"),
        ]);
        let findings = tracker.validate_id_consistency();
        assert!(findings.iter().any(|f| f.rule_id == "MESSAGE_EMPTY_END"));
    }
}
