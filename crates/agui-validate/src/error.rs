// SPDX-License-Identifier: MIT OR Apache-2.0
//! [`ValidationError`]: a single rule finding, aggregated (never thrown)
//! into a [`crate::ValidationResult`].

use std::collections::BTreeMap;

use agui_core::EventKind;
use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// A single finding produced by a rule against one event.
///
/// This is the structured diagnostic unit for channel 2 of the three-channel
/// error model (spec §7): build/encode/decode errors are returned directly
/// and never become a `ValidationError`; compliance issues are a distinct
/// type (`agui_sequence::ComplianceIssue`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Stable identifier of the rule that produced this finding, e.g.
    /// `"MESSAGE_LIFECYCLE"` or `"MESSAGE_ORPHANED_CONTENT"`.
    pub rule_id: String,
    /// The identifier of the offending event's primary entity, if any
    /// (`run_id`, `message_id`, `tool_call_id`, ...).
    pub event_id: Option<String>,
    /// The kind of the offending event.
    pub event_kind: Option<EventKind>,
    /// Human-readable description of the violation.
    pub message: String,
    /// How serious this finding is.
    pub severity: Severity,
    /// Free-form structured context (field name, observed value, ...),
    /// kept as an ordered map so rendering is deterministic.
    pub context: BTreeMap<String, String>,
    /// Actionable remediation hints, shown in diagnostic reports.
    pub suggestions: Vec<String>,
    /// Unix-millisecond time the finding was produced, if the caller
    /// supplied a clock; `None` keeps the engine fully deterministic for
    /// property tests that don't care about wall-clock time.
    pub timestamp: Option<i64>,
}

impl ValidationError {
    /// Build a finding with no context/suggestions/timestamp; the common
    /// case for rules that don't need them.
    #[must_use]
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            event_id: None,
            event_kind: None,
            message: message.into(),
            severity,
            context: BTreeMap::new(),
            suggestions: Vec::new(),
            timestamp: None,
        }
    }

    /// Attach the offending event's kind and primary id.
    #[must_use]
    pub fn with_event(mut self, kind: EventKind, id: impl Into<String>) -> Self {
        self.event_kind = Some(kind);
        self.event_id = Some(id.into());
        self
    }

    /// Attach a single context key/value pair.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Attach a remediation suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}
