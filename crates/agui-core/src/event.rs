// SPDX-License-Identifier: MIT OR Apache-2.0
//! The polymorphic [`Event`] type: one tagged variant per [`EventKind`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::kind::EventKind;
use crate::message::Message;
use crate::patch::JsonPatchOperation;

/// Errors produced while building or validating an [`Event`] directly
/// (outside of decoding). Returned straight to the caller — never
/// aggregated into a validation report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    /// A required field for this event kind is missing or empty.
    #[error("{kind}: missing required field `{field}`")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
    /// A field's value violates a structural constraint.
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
    /// `timestamp_ms` was present but not positive.
    #[error("timestamp must be positive, got {0}")]
    NonPositiveTimestamp(i64),
    /// The builder's `build()` was called without ever selecting a kind.
    #[error("EventBuilder::build() called with no event kind selected")]
    NoKindSelected,
}

/// Fields common to every event: currently just the optional timestamp.
/// Flattened into each variant's wire representation so the `timestamp`
/// key sits beside `type` and the kind-specific payload fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EventBase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// A single AG-UI protocol event.
///
/// Discriminated by the wire `type` field (see [`EventKind`]); each variant
/// carries exactly the required/optional payload fields spec'd for that
/// kind, plus the flattened [`EventBase`] (`timestamp`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    RunStarted {
        #[serde(rename = "threadId")]
        thread_id: String,
        #[serde(rename = "runId")]
        run_id: String,
        #[serde(flatten)]
        base: EventBase,
    },
    RunFinished {
        #[serde(rename = "threadId")]
        thread_id: String,
        #[serde(rename = "runId")]
        run_id: String,
        #[serde(flatten)]
        base: EventBase,
    },
    RunError {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
        #[serde(
            default,
            rename = "runId",
            skip_serializing_if = "Option::is_none"
        )]
        run_id: Option<String>,
        #[serde(flatten)]
        base: EventBase,
    },
    StepStarted {
        #[serde(rename = "stepName")]
        step_name: String,
        #[serde(flatten)]
        base: EventBase,
    },
    StepFinished {
        #[serde(rename = "stepName")]
        step_name: String,
        #[serde(flatten)]
        base: EventBase,
    },
    TextMessageStart {
        #[serde(rename = "messageId")]
        message_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<String>,
        #[serde(flatten)]
        base: EventBase,
    },
    TextMessageContent {
        #[serde(rename = "messageId")]
        message_id: String,
        delta: String,
        #[serde(flatten)]
        base: EventBase,
    },
    TextMessageEnd {
        #[serde(rename = "messageId")]
        message_id: String,
        #[serde(flatten)]
        base: EventBase,
    },
    ToolCallStart {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,
        #[serde(rename = "toolCallName")]
        tool_call_name: String,
        #[serde(
            default,
            rename = "parentMessageId",
            skip_serializing_if = "Option::is_none"
        )]
        parent_message_id: Option<String>,
        #[serde(flatten)]
        base: EventBase,
    },
    ToolCallArgs {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,
        delta: String,
        #[serde(flatten)]
        base: EventBase,
    },
    ToolCallEnd {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,
        #[serde(flatten)]
        base: EventBase,
    },
    StateSnapshot {
        snapshot: JsonValue,
        #[serde(flatten)]
        base: EventBase,
    },
    StateDelta {
        delta: Vec<JsonPatchOperation>,
        #[serde(flatten)]
        base: EventBase,
    },
    MessagesSnapshot {
        messages: Vec<Message>,
        #[serde(flatten)]
        base: EventBase,
    },
    Raw {
        event: JsonValue,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<String>,
        #[serde(flatten)]
        base: EventBase,
    },
    Custom {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<JsonValue>,
        #[serde(flatten)]
        base: EventBase,
    },
}

impl Event {
    /// The event's kind discriminant.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Event::RunStarted { .. } => EventKind::RunStarted,
            Event::RunFinished { .. } => EventKind::RunFinished,
            Event::RunError { .. } => EventKind::RunError,
            Event::StepStarted { .. } => EventKind::StepStarted,
            Event::StepFinished { .. } => EventKind::StepFinished,
            Event::TextMessageStart { .. } => EventKind::TextMessageStart,
            Event::TextMessageContent { .. } => EventKind::TextMessageContent,
            Event::TextMessageEnd { .. } => EventKind::TextMessageEnd,
            Event::ToolCallStart { .. } => EventKind::ToolCallStart,
            Event::ToolCallArgs { .. } => EventKind::ToolCallArgs,
            Event::ToolCallEnd { .. } => EventKind::ToolCallEnd,
            Event::StateSnapshot { .. } => EventKind::StateSnapshot,
            Event::StateDelta { .. } => EventKind::StateDelta,
            Event::MessagesSnapshot { .. } => EventKind::MessagesSnapshot,
            Event::Raw { .. } => EventKind::Raw,
            Event::Custom { .. } => EventKind::Custom,
        }
    }

    /// The event's optional timestamp, in Unix milliseconds.
    #[must_use]
    pub fn timestamp(&self) -> Option<i64> {
        self.base().timestamp
    }

    /// Overwrite the event's timestamp.
    pub fn set_timestamp(&mut self, timestamp_ms: i64) {
        self.base_mut().timestamp = Some(timestamp_ms);
    }

    fn base(&self) -> &EventBase {
        match self {
            Event::RunStarted { base, .. }
            | Event::RunFinished { base, .. }
            | Event::RunError { base, .. }
            | Event::StepStarted { base, .. }
            | Event::StepFinished { base, .. }
            | Event::TextMessageStart { base, .. }
            | Event::TextMessageContent { base, .. }
            | Event::TextMessageEnd { base, .. }
            | Event::ToolCallStart { base, .. }
            | Event::ToolCallArgs { base, .. }
            | Event::ToolCallEnd { base, .. }
            | Event::StateSnapshot { base, .. }
            | Event::StateDelta { base, .. }
            | Event::MessagesSnapshot { base, .. }
            | Event::Raw { base, .. }
            | Event::Custom { base, .. } => base,
        }
    }

    fn base_mut(&mut self) -> &mut EventBase {
        match self {
            Event::RunStarted { base, .. }
            | Event::RunFinished { base, .. }
            | Event::RunError { base, .. }
            | Event::StepStarted { base, .. }
            | Event::StepFinished { base, .. }
            | Event::TextMessageStart { base, .. }
            | Event::TextMessageContent { base, .. }
            | Event::TextMessageEnd { base, .. }
            | Event::ToolCallStart { base, .. }
            | Event::ToolCallArgs { base, .. }
            | Event::ToolCallEnd { base, .. }
            | Event::StateSnapshot { base, .. }
            | Event::StateDelta { base, .. }
            | Event::MessagesSnapshot { base, .. }
            | Event::Raw { base, .. }
            | Event::Custom { base, .. } => base,
        }
    }

    /// Validate the required/optional payload contract for this event's
    /// kind (spec §4.1), plus the timestamp-positivity and JSON-Patch
    /// constraints that apply across all kinds.
    pub fn validate(&self) -> Result<(), EventError> {
        if let Some(ts) = self.timestamp()
            && ts <= 0
        {
            return Err(EventError::NonPositiveTimestamp(ts));
        }

        match self {
            Event::RunStarted { thread_id, run_id, .. }
            | Event::RunFinished { thread_id, run_id, .. } => {
                require_non_empty("RUN_STARTED/RUN_FINISHED", "threadId", thread_id)?;
                require_non_empty("RUN_STARTED/RUN_FINISHED", "runId", run_id)?;
            }
            Event::RunError { message, .. } => {
                require_non_empty("RUN_ERROR", "message", message)?;
            }
            Event::StepStarted { step_name, .. } | Event::StepFinished { step_name, .. } => {
                require_non_empty("STEP_STARTED/STEP_FINISHED", "stepName", step_name)?;
            }
            Event::TextMessageStart { message_id, .. } => {
                require_non_empty("TEXT_MESSAGE_START", "messageId", message_id)?;
            }
            Event::TextMessageContent { message_id, delta, .. } => {
                require_non_empty("TEXT_MESSAGE_CONTENT", "messageId", message_id)?;
                require_non_empty("TEXT_MESSAGE_CONTENT", "delta", delta)?;
            }
            Event::TextMessageEnd { message_id, .. } => {
                require_non_empty("TEXT_MESSAGE_END", "messageId", message_id)?;
            }
            Event::ToolCallStart {
                tool_call_id,
                tool_call_name,
                ..
            } => {
                require_non_empty("TOOL_CALL_START", "toolCallId", tool_call_id)?;
                require_non_empty("TOOL_CALL_START", "toolCallName", tool_call_name)?;
            }
            Event::ToolCallArgs { tool_call_id, delta, .. } => {
                require_non_empty("TOOL_CALL_ARGS", "toolCallId", tool_call_id)?;
                require_non_empty("TOOL_CALL_ARGS", "delta", delta)?;
            }
            Event::ToolCallEnd { tool_call_id, .. } => {
                require_non_empty("TOOL_CALL_END", "toolCallId", tool_call_id)?;
            }
            Event::StateSnapshot { snapshot, .. } => {
                if snapshot.is_null() {
                    return Err(EventError::MissingField {
                        kind: "STATE_SNAPSHOT",
                        field: "snapshot",
                    });
                }
            }
            Event::StateDelta { delta, .. } => {
                if delta.is_empty() {
                    return Err(EventError::MissingField {
                        kind: "STATE_DELTA",
                        field: "delta",
                    });
                }
                for op in delta {
                    op.validate()?;
                }
            }
            Event::MessagesSnapshot { messages, .. } => {
                for m in messages {
                    m.validate()?;
                }
            }
            Event::Raw { event, .. } => {
                if event.is_null() {
                    return Err(EventError::MissingField {
                        kind: "RAW",
                        field: "event",
                    });
                }
            }
            Event::Custom { name, .. } => {
                require_non_empty("CUSTOM", "name", name)?;
            }
        }
        Ok(())
    }
}

impl Event {
    /// Build a `RUN_STARTED` event. No timestamp; call [`Event::set_timestamp`]
    /// or go through [`crate::builder::EventBuilder`] if auto-timestamping and
    /// auto-id generation are wanted.
    #[must_use]
    pub fn run_started(thread_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        Event::RunStarted {
            thread_id: thread_id.into(),
            run_id: run_id.into(),
            base: EventBase::default(),
        }
    }

    #[must_use]
    pub fn run_finished(thread_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        Event::RunFinished {
            thread_id: thread_id.into(),
            run_id: run_id.into(),
            base: EventBase::default(),
        }
    }

    #[must_use]
    pub fn run_error(
        message: impl Into<String>,
        code: Option<String>,
        run_id: Option<String>,
    ) -> Self {
        Event::RunError {
            message: message.into(),
            code,
            run_id,
            base: EventBase::default(),
        }
    }

    #[must_use]
    pub fn step_started(step_name: impl Into<String>) -> Self {
        Event::StepStarted {
            step_name: step_name.into(),
            base: EventBase::default(),
        }
    }

    #[must_use]
    pub fn step_finished(step_name: impl Into<String>) -> Self {
        Event::StepFinished {
            step_name: step_name.into(),
            base: EventBase::default(),
        }
    }

    #[must_use]
    pub fn text_message_start(message_id: impl Into<String>, role: Option<String>) -> Self {
        Event::TextMessageStart {
            message_id: message_id.into(),
            role,
            base: EventBase::default(),
        }
    }

    #[must_use]
    pub fn text_message_content(message_id: impl Into<String>, delta: impl Into<String>) -> Self {
        Event::TextMessageContent {
            message_id: message_id.into(),
            delta: delta.into(),
            base: EventBase::default(),
        }
    }

    #[must_use]
    pub fn text_message_end(message_id: impl Into<String>) -> Self {
        Event::TextMessageEnd {
            message_id: message_id.into(),
            base: EventBase::default(),
        }
    }

    #[must_use]
    pub fn tool_call_start(
        tool_call_id: impl Into<String>,
        tool_call_name: impl Into<String>,
        parent_message_id: Option<String>,
    ) -> Self {
        Event::ToolCallStart {
            tool_call_id: tool_call_id.into(),
            tool_call_name: tool_call_name.into(),
            parent_message_id,
            base: EventBase::default(),
        }
    }

    #[must_use]
    pub fn tool_call_args(tool_call_id: impl Into<String>, delta: impl Into<String>) -> Self {
        Event::ToolCallArgs {
            tool_call_id: tool_call_id.into(),
            delta: delta.into(),
            base: EventBase::default(),
        }
    }

    #[must_use]
    pub fn tool_call_end(tool_call_id: impl Into<String>) -> Self {
        Event::ToolCallEnd {
            tool_call_id: tool_call_id.into(),
            base: EventBase::default(),
        }
    }

    #[must_use]
    pub fn state_snapshot(snapshot: JsonValue) -> Self {
        Event::StateSnapshot {
            snapshot,
            base: EventBase::default(),
        }
    }

    #[must_use]
    pub fn state_delta(delta: Vec<JsonPatchOperation>) -> Self {
        Event::StateDelta {
            delta,
            base: EventBase::default(),
        }
    }

    #[must_use]
    pub fn messages_snapshot(messages: Vec<Message>) -> Self {
        Event::MessagesSnapshot {
            messages,
            base: EventBase::default(),
        }
    }

    #[must_use]
    pub fn raw(event: JsonValue, source: Option<String>) -> Self {
        Event::Raw {
            event,
            source,
            base: EventBase::default(),
        }
    }

    #[must_use]
    pub fn custom(name: impl Into<String>, value: Option<JsonValue>) -> Self {
        Event::Custom {
            name: name.into(),
            value,
            base: EventBase::default(),
        }
    }
}

fn require_non_empty(kind: &'static str, field: &'static str, value: &str) -> Result<(), EventError> {
    if value.is_empty() {
        Err(EventError::MissingField { kind, field })
    } else {
        Ok(())
    }
}
