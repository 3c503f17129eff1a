// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ordering and lifecycle rules: `RUN_LIFECYCLE`, `EVENT_ORDERING`,
//! `EVENT_SEQUENCE`, `MESSAGE_LIFECYCLE`, `MESSAGE_NESTING`,
//! `TOOL_CALL_LIFECYCLE`, `TOOL_CALL_NESTING`.

use agui_core::{Event, EventKind};

use crate::context::ValidationContext;
use crate::error::ValidationError;
use crate::rule::Rule;
use crate::severity::Severity;
use crate::state::{Phase, ValidationState};

/// Forbids re-starting an active or finished run; rejects finish/error
/// without a prior start (when a `run_id` is present); requires `message`
/// on `RUN_ERROR`.
pub struct RunLifecycleRule;

impl Rule for RunLifecycleRule {
    fn id(&self) -> &str {
        "RUN_LIFECYCLE"
    }
    fn description(&self) -> &str {
        "run start/finish/error lifecycle pairing"
    }
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(
        &self,
        event: &Event,
        state: &ValidationState,
        _ctx: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        let mut out = Vec::new();
        match event {
            Event::RunStarted { run_id, .. } => {
                if state.active_runs.contains_key(run_id) {
                    out.push(
                        ValidationError::new(
                            self.id(),
                            self.default_severity(),
                            format!("Run {run_id} is already started"),
                        )
                        .with_event(EventKind::RunStarted, run_id),
                    );
                } else if state.finished_runs.contains_key(run_id) {
                    out.push(
                        ValidationError::new(
                            self.id(),
                            self.default_severity(),
                            format!("Run {run_id} has already finished and cannot restart"),
                        )
                        .with_event(EventKind::RunStarted, run_id),
                    );
                }
            }
            Event::RunFinished { run_id, .. } => {
                if !state.active_runs.contains_key(run_id) {
                    out.push(
                        ValidationError::new(
                            self.id(),
                            self.default_severity(),
                            format!("Run {run_id} was not started"),
                        )
                        .with_event(EventKind::RunFinished, run_id),
                    );
                }
            }
            Event::RunError { message, run_id, .. } => {
                if message.is_empty() {
                    out.push(ValidationError::new(
                        self.id(),
                        self.default_severity(),
                        "RUN_ERROR requires a non-empty message",
                    ));
                }
                // Open question (spec §9): a RUN_ERROR with no run_id is
                // permitted unconditionally; only a *present* run_id is
                // checked against active runs.
                if let Some(run_id) = run_id
                    && !run_id.is_empty()
                    && !state.active_runs.contains_key(run_id)
                {
                    out.push(
                        ValidationError::new(
                            self.id(),
                            self.default_severity(),
                            format!("Run {run_id} was not started"),
                        )
                        .with_event(EventKind::RunError, run_id),
                    );
                }
            }
            _ => {}
        }
        out
    }
}

/// First event of a sequence must be `RUN_STARTED`; after `RUN_FINISHED`
/// only `RUN_ERROR` is permitted.
pub struct EventOrderingRule;

impl Rule for EventOrderingRule {
    fn id(&self) -> &str {
        "EVENT_ORDERING"
    }
    fn description(&self) -> &str {
        "sequence must open with RUN_STARTED and stop after RUN_FINISHED"
    }
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(
        &self,
        event: &Event,
        state: &ValidationState,
        ctx: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        if ctx.flags.skip_sequence_validation {
            return Vec::new();
        }
        let mut out = Vec::new();
        if ctx.event_index == 0 && !ctx.skip_ordering && event.kind() != EventKind::RunStarted {
            out.push(ValidationError::new(
                self.id(),
                self.default_severity(),
                format!(
                    "first event of a sequence must be RUN_STARTED, got {}",
                    event.kind()
                ),
            ));
        }
        if state.current_phase == Phase::Finished && event.kind() != EventKind::RunError {
            out.push(ValidationError::new(
                self.id(),
                self.default_severity(),
                format!("{} is not permitted after RUN_FINISHED", event.kind()),
            ));
        }
        out
    }
}

/// Step start/finish pairing and unique active step names.
pub struct EventSequenceRule;

impl Rule for EventSequenceRule {
    fn id(&self) -> &str {
        "EVENT_SEQUENCE"
    }
    fn description(&self) -> &str {
        "step start/finish pairing"
    }
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(
        &self,
        event: &Event,
        state: &ValidationState,
        ctx: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        if ctx.flags.skip_sequence_validation {
            return Vec::new();
        }
        let mut out = Vec::new();
        match event {
            Event::StepStarted { step_name, .. } => {
                if state.active_steps.contains(step_name) {
                    out.push(ValidationError::new(
                        self.id(),
                        self.default_severity(),
                        format!("step {step_name} is already active"),
                    ));
                }
            }
            Event::StepFinished { step_name, .. } => {
                if !state.active_steps.contains(step_name) {
                    out.push(ValidationError::new(
                        self.id(),
                        self.default_severity(),
                        format!("step {step_name} was not started"),
                    ));
                }
            }
            _ => {}
        }
        out
    }
}

/// Message start/content/end pairing; non-empty deltas.
pub struct MessageLifecycleRule;

impl Rule for MessageLifecycleRule {
    fn id(&self) -> &str {
        "MESSAGE_LIFECYCLE"
    }
    fn description(&self) -> &str {
        "message start/content/end pairing"
    }
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(
        &self,
        event: &Event,
        state: &ValidationState,
        _ctx: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        let mut out = Vec::new();
        match event {
            Event::TextMessageContent { message_id, delta, .. } => {
                if !state.active_messages.contains_key(message_id) {
                    out.push(
                        ValidationError::new(
                            self.id(),
                            self.default_severity(),
                            format!(
                                "Cannot add content to message {message_id} that was not started"
                            ),
                        )
                        .with_event(EventKind::TextMessageContent, message_id),
                    );
                }
                if delta.is_empty() {
                    out.push(ValidationError::new(
                        self.id(),
                        self.default_severity(),
                        "TEXT_MESSAGE_CONTENT requires a non-empty delta",
                    ));
                }
            }
            Event::TextMessageEnd { message_id, .. } => {
                if !state.active_messages.contains_key(message_id) {
                    out.push(
                        ValidationError::new(
                            self.id(),
                            self.default_severity(),
                            format!("Message {message_id} was not started"),
                        )
                        .with_event(EventKind::TextMessageEnd, message_id),
                    );
                }
            }
            _ => {}
        }
        out
    }
}

/// Placeholder for future parent-message nesting checks. Currently a
/// no-op: the protocol has no nested-message construct yet to validate.
pub struct MessageNestingRule;

impl Rule for MessageNestingRule {
    fn id(&self) -> &str {
        "MESSAGE_NESTING"
    }
    fn description(&self) -> &str {
        "reserved for future parent-message nesting checks"
    }
    fn default_severity(&self) -> Severity {
        Severity::Error
    }
    fn check(
        &self,
        _event: &Event,
        _state: &ValidationState,
        _ctx: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        Vec::new()
    }
}

/// Tool-call start/args/end pairing; required ids and tool name.
pub struct ToolCallLifecycleRule;

impl Rule for ToolCallLifecycleRule {
    fn id(&self) -> &str {
        "TOOL_CALL_LIFECYCLE"
    }
    fn description(&self) -> &str {
        "tool call start/args/end pairing"
    }
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(
        &self,
        event: &Event,
        state: &ValidationState,
        ctx: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        let mut out = Vec::new();
        match event {
            Event::ToolCallStart {
                tool_call_id,
                tool_call_name,
                ..
            } => {
                if tool_call_name.is_empty() && !ctx.flags.allow_empty_ids {
                    out.push(
                        ValidationError::new(
                            self.id(),
                            self.default_severity(),
                            "TOOL_CALL_START requires a non-empty toolCallName",
                        )
                        .with_event(EventKind::ToolCallStart, tool_call_id),
                    );
                }
            }
            Event::ToolCallArgs { tool_call_id, delta, .. } => {
                if !state.active_tools.contains_key(tool_call_id) {
                    out.push(
                        ValidationError::new(
                            self.id(),
                            self.default_severity(),
                            format!(
                                "Cannot add args to tool call {tool_call_id} that was not started"
                            ),
                        )
                        .with_event(EventKind::ToolCallArgs, tool_call_id),
                    );
                }
                if delta.is_empty() {
                    out.push(ValidationError::new(
                        self.id(),
                        self.default_severity(),
                        "TOOL_CALL_ARGS requires a non-empty delta",
                    ));
                }
            }
            Event::ToolCallEnd { tool_call_id, .. } => {
                if !state.active_tools.contains_key(tool_call_id) {
                    out.push(
                        ValidationError::new(
                            self.id(),
                            self.default_severity(),
                            format!("Tool call {tool_call_id} was not started"),
                        )
                        .with_event(EventKind::ToolCallEnd, tool_call_id),
                    );
                }
            }
            _ => {}
        }
        out
    }
}

/// `parent_message_id`, if set on `TOOL_CALL_START`, must refer to an
/// active or finished message.
pub struct ToolCallNestingRule;

impl Rule for ToolCallNestingRule {
    fn id(&self) -> &str {
        "TOOL_CALL_NESTING"
    }
    fn description(&self) -> &str {
        "tool call parent_message_id must resolve to a known message"
    }
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(
        &self,
        event: &Event,
        state: &ValidationState,
        _ctx: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        if let Event::ToolCallStart {
            tool_call_id,
            parent_message_id: Some(parent_id),
            ..
        } = event
            && !state.active_messages.contains_key(parent_id)
            && !state.finished_messages.contains_key(parent_id)
        {
            return vec![
                ValidationError::new(
                    self.id(),
                    self.default_severity(),
                    format!("parentMessageId {parent_id} does not refer to a known message"),
                )
                .with_event(EventKind::ToolCallStart, tool_call_id),
            ];
        }
        Vec::new()
    }
}
