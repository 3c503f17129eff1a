// SPDX-License-Identifier: MIT OR Apache-2.0
//! Identifier rules: `ID_CONSISTENCY` (reserved), `ID_FORMAT`, `ID_UNIQUENESS`.

use agui_core::Event;

use crate::context::ValidationContext;
use crate::error::ValidationError;
use crate::rule::Rule;
use crate::severity::Severity;
use crate::state::ValidationState;

/// Reserved for cross-sequence identifier checks; those are handled by
/// `agui-id-tracker`'s whole-sequence, order-independent analysis instead.
/// This rule is a no-op placeholder kept so `CUSTOM` configurations can
/// still list it by id without erroring.
pub struct IdConsistencyRule;

impl Rule for IdConsistencyRule {
    fn id(&self) -> &str {
        "ID_CONSISTENCY"
    }
    fn description(&self) -> &str {
        "reserved; see agui-id-tracker for cross-sequence id checks"
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

fn is_well_formed_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Identifiers must match `[A-Za-z0-9_-]+`.
pub struct IdFormatRule;

impl Rule for IdFormatRule {
    fn id(&self) -> &str {
        "ID_FORMAT"
    }
    fn description(&self) -> &str {
        "identifiers must match [A-Za-z0-9_-]+"
    }
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(
        &self,
        event: &Event,
        _state: &ValidationState,
        ctx: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        if ctx.flags.skip_field_validation {
            return Vec::new();
        }
        let ids: Vec<(&str, &str)> = match event {
            Event::RunStarted { thread_id, run_id, .. }
            | Event::RunFinished { thread_id, run_id, .. } => {
                vec![("threadId", thread_id.as_str()), ("runId", run_id.as_str())]
            }
            Event::RunError { run_id: Some(run_id), .. } => vec![("runId", run_id.as_str())],
            Event::StepStarted { step_name, .. } | Event::StepFinished { step_name, .. } => {
                vec![("stepName", step_name.as_str())]
            }
            Event::TextMessageStart { message_id, .. }
            | Event::TextMessageContent { message_id, .. }
            | Event::TextMessageEnd { message_id, .. } => {
                vec![("messageId", message_id.as_str())]
            }
            Event::ToolCallStart { tool_call_id, .. }
            | Event::ToolCallArgs { tool_call_id, .. }
            | Event::ToolCallEnd { tool_call_id, .. } => {
                vec![("toolCallId", tool_call_id.as_str())]
            }
            _ => Vec::new(),
        };

        ids.into_iter()
            .filter(|(_, id)| !(id.is_empty() && ctx.flags.allow_empty_ids))
            .filter(|(_, id)| !is_well_formed_id(id))
            .map(|(field, id)| {
                ValidationError::new(
                    self.id(),
                    self.default_severity(),
                    format!("{field} {id:?} does not match [A-Za-z0-9_-]+"),
                )
                .with_context("field", field)
            })
            .collect()
    }
}

/// Rejects a second start event for an id already active.
pub struct IdUniquenessRule;

impl Rule for IdUniquenessRule {
    fn id(&self) -> &str {
        "ID_UNIQUENESS"
    }
    fn description(&self) -> &str {
        "a started id must not already be active"
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
        let collision = match event {
            Event::RunStarted { run_id, .. } => state.active_runs.contains_key(run_id),
            Event::TextMessageStart { message_id, .. } => {
                state.active_messages.contains_key(message_id)
            }
            Event::ToolCallStart { tool_call_id, .. } => {
                state.active_tools.contains_key(tool_call_id)
            }
            Event::StepStarted { step_name, .. } => state.active_steps.contains(step_name),
            _ => false,
        };
        if collision {
            vec![ValidationError::new(
                self.id(),
                self.default_severity(),
                format!("{} id is already active", event.kind()),
            )]
        } else {
            Vec::new()
        }
    }
}
