// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
#![warn(missing_docs)]
//! Ring-buffered event history, query indices over that history, and
//! protocol-compliance reporting (spec's sequence-tracking component).
//!
//! [`SequenceTracker`] owns a [`agui_validate::Validator`] and feeds it
//! events one at a time, using [`agui_validate::Validator::get_state`]'s
//! `event_count` to decide whether the incoming event is the very first
//! of a brand-new sequence (in which case the conflated
//! `validate_event` ordering check applies) or a continuation (in which
//! case `validate_isolated_event` is used so every later event isn't
//! mistakenly held to "must be RUN_STARTED").

mod compliance;
mod history;

pub use compliance::{ComplianceIssue, ComplianceIssueKind, ComplianceReport};
pub use history::SequenceInfo;

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use agui_core::{Event, EventKind};
use agui_validate::{Severity, Validator, ValidationResult, ValidatorConfig};

/// Age past which an orphaned (active, never finished) message or tool
/// call is reported as a compliance warning.
pub const DEFAULT_ORPHAN_AGE_WARNING: Duration = Duration::from_secs(60 * 60);
/// Age past which an incomplete (started, never finished) run is
/// reported as a compliance error.
pub const DEFAULT_INCOMPLETE_RUN_AGE_ERROR: Duration = Duration::from_secs(24 * 60 * 60);

/// Streaming history + compliance tracker over one validator's worth of
/// sequence state.
pub struct SequenceTracker {
    validator: Validator,
    history: VecDeque<Event>,
    max_history_size: usize,
    orphan_age_warning: Duration,
    incomplete_run_age_error: Duration,
    run_started_at: HashMap<String, Instant>,
    message_started_at: HashMap<String, Instant>,
    tool_started_at: HashMap<String, Instant>,
}

impl SequenceTracker {
    /// A tracker over a `STRICT` validator, default history size
    /// (10,000) and default compliance age thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::strict(), 10_000)
    }

    /// A tracker built from an explicit validator configuration and
    /// maximum history size (oldest events evicted once exceeded).
    #[must_use]
    pub fn with_config(config: ValidatorConfig, max_history_size: usize) -> Self {
        Self {
            validator: Validator::new(config),
            history: VecDeque::with_capacity(max_history_size.min(1024)),
            max_history_size,
            orphan_age_warning: DEFAULT_ORPHAN_AGE_WARNING,
            incomplete_run_age_error: DEFAULT_INCOMPLETE_RUN_AGE_ERROR,
            run_started_at: HashMap::new(),
            message_started_at: HashMap::new(),
            tool_started_at: HashMap::new(),
        }
    }

    /// Override the orphan/incomplete age thresholds used by
    /// [`Self::check_sequence_compliance`].
    #[must_use]
    pub fn with_age_thresholds(mut self, orphan_age_warning: Duration, incomplete_run_age_error: Duration) -> Self {
        self.orphan_age_warning = orphan_age_warning;
        self.incomplete_run_age_error = incomplete_run_age_error;
        self
    }

    /// Feed one event through validation, recording start times for age
    /// tracking and appending it to history if accepted. Rejected events
    /// are reported but never stored.
    pub fn process_event(&mut self, event: Event) -> ValidationResult {
        let is_first = self.validator.get_state().event_count == 0;
        let result = if is_first {
            self.validator.validate_event(&event)
        } else {
            self.validator.validate_isolated_event(&event)
        };
        if result.is_valid {
            self.note_start_stop(&event);
            self.push_history(event);
        }
        result
    }

    fn note_start_stop(&mut self, event: &Event) {
        let now = Instant::now();
        match event {
            Event::RunStarted { run_id, .. } => {
                self.run_started_at.insert(run_id.clone(), now);
            }
            Event::RunFinished { run_id, .. } | Event::RunError { run_id: Some(run_id), .. } => {
                self.run_started_at.remove(run_id);
            }
            Event::TextMessageStart { message_id, .. } => {
                self.message_started_at.insert(message_id.clone(), now);
            }
            Event::TextMessageEnd { message_id, .. } => {
                self.message_started_at.remove(message_id);
            }
            Event::ToolCallStart { tool_call_id, .. } => {
                self.tool_started_at.insert(tool_call_id.clone(), now);
            }
            Event::ToolCallEnd { tool_call_id, .. } => {
                self.tool_started_at.remove(tool_call_id);
            }
            _ => {}
        }
    }

    fn push_history(&mut self, event: Event) {
        if self.history.len() >= self.max_history_size {
            self.history.pop_front();
        }
        self.history.push_back(event);
    }

    /// The events currently retained in history, oldest first.
    #[must_use]
    pub fn history(&self) -> &VecDeque<Event> {
        &self.history
    }

    /// Events in history whose index falls in `start..end` (clamped).
    #[must_use]
    pub fn events_in_range(&self, start: usize, end: usize) -> Vec<&Event> {
        let end = end.min(self.history.len());
        if start >= end {
            return Vec::new();
        }
        self.history.iter().skip(start).take(end - start).collect()
    }

    /// Events in history of a given kind, in original order.
    #[must_use]
    pub fn events_by_kind(&self, kind: EventKind) -> Vec<&Event> {
        self.history.iter().filter(|e| e.kind() == kind).collect()
    }

    /// Events in history that reference this run id, in original order.
    #[must_use]
    pub fn events_by_run_id(&self, run_id: &str) -> Vec<&Event> {
        self.history
            .iter()
            .filter(|e| match e {
                Event::RunStarted { run_id: id, .. } | Event::RunFinished { run_id: id, .. } => id == run_id,
                Event::RunError { run_id: Some(id), .. } => id == run_id,
                _ => false,
            })
            .collect()
    }

    /// Events in history that reference this message id, in original
    /// order.
    #[must_use]
    pub fn events_by_message_id(&self, message_id: &str) -> Vec<&Event> {
        self.history
            .iter()
            .filter(|e| match e {
                Event::TextMessageStart { message_id: id, .. }
                | Event::TextMessageContent { message_id: id, .. }
                | Event::TextMessageEnd { message_id: id, .. } => id == message_id,
                _ => false,
            })
            .collect()
    }

    /// Events in history that reference this tool-call id, in original
    /// order.
    #[must_use]
    pub fn events_by_tool_call_id(&self, tool_call_id: &str) -> Vec<&Event> {
        self.history
            .iter()
            .filter(|e| match e {
                Event::ToolCallStart { tool_call_id: id, .. }
                | Event::ToolCallArgs { tool_call_id: id, .. }
                | Event::ToolCallEnd { tool_call_id: id, .. } => id == tool_call_id,
                _ => false,
            })
            .collect()
    }

    /// The most recently retained event, if any.
    #[must_use]
    pub fn last_event(&self) -> Option<&Event> {
        self.history.back()
    }

    /// Summary statistics over the current history.
    #[must_use]
    pub fn sequence_info(&self) -> SequenceInfo {
        history::sequence_info(&self.history, self.max_history_size)
    }

    /// Evaluate compliance over the current history and live state:
    /// protocol-ordering violations, orphaned messages/tool calls older
    /// than the warning threshold, and incomplete runs older than the
    /// error threshold.
    #[must_use]
    pub fn check_sequence_compliance(&self) -> ComplianceReport {
        compliance::check(self)
    }

    /// Access the underlying validator, e.g. to register extra rules or
    /// inspect metrics.
    #[must_use]
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub(crate) fn orphan_age_warning(&self) -> Duration {
        self.orphan_age_warning
    }

    pub(crate) fn incomplete_run_age_error(&self) -> Duration {
        self.incomplete_run_age_error
    }

    pub(crate) fn run_started_at(&self) -> &HashMap<String, Instant> {
        &self.run_started_at
    }

    pub(crate) fn message_started_at(&self) -> &HashMap<String, Instant> {
        &self.message_started_at
    }

    pub(crate) fn tool_started_at(&self) -> &HashMap<String, Instant> {
        &self.tool_started_at
    }
}

impl Default for SequenceTracker {
    fn default() -> Self {
        Self::new()
    }
}
