// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fluent [`EventBuilder`]: accumulate fields, then dispatch on kind.

use serde_json::Value as JsonValue;

use crate::event::{Event, EventBase, EventError};
use crate::id;
use crate::kind::EventKind;
use crate::message::Message;
use crate::patch::JsonPatchOperation;

/// Accumulates fields for any event kind and assembles the matching
/// [`Event`] variant on [`EventBuilder::build`]. Unlike the per-kind
/// constructors on [`Event`], the builder doesn't know which fields it will
/// need until [`EventBuilder::kind`] is called — it is the right tool when
/// the kind is chosen dynamically (e.g. replaying a generic event log).
#[derive(Debug, Default, Clone)]
pub struct EventBuilder {
    kind: Option<EventKind>,
    timestamp: Option<i64>,
    thread_id: Option<String>,
    run_id: Option<String>,
    message: Option<String>,
    code: Option<String>,
    step_name: Option<String>,
    message_id: Option<String>,
    role: Option<String>,
    delta_text: Option<String>,
    tool_call_id: Option<String>,
    tool_call_name: Option<String>,
    parent_message_id: Option<String>,
    snapshot: Option<JsonValue>,
    patch_ops: Option<Vec<JsonPatchOperation>>,
    messages: Option<Vec<Message>>,
    raw_event: Option<JsonValue>,
    source: Option<String>,
    name: Option<String>,
    value: Option<JsonValue>,
}

impl EventBuilder {
    /// Start a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the event kind to assemble on [`Self::build`].
    #[must_use]
    pub fn kind(mut self, kind: EventKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn timestamp(mut self, timestamp_ms: i64) -> Self {
        self.timestamp = Some(timestamp_ms);
        self
    }

    #[must_use]
    pub fn thread_id(mut self, v: impl Into<String>) -> Self {
        self.thread_id = Some(v.into());
        self
    }

    #[must_use]
    pub fn run_id(mut self, v: impl Into<String>) -> Self {
        self.run_id = Some(v.into());
        self
    }

    #[must_use]
    pub fn message(mut self, v: impl Into<String>) -> Self {
        self.message = Some(v.into());
        self
    }

    #[must_use]
    pub fn code(mut self, v: impl Into<String>) -> Self {
        self.code = Some(v.into());
        self
    }

    #[must_use]
    pub fn step_name(mut self, v: impl Into<String>) -> Self {
        self.step_name = Some(v.into());
        self
    }

    #[must_use]
    pub fn message_id(mut self, v: impl Into<String>) -> Self {
        self.message_id = Some(v.into());
        self
    }

    #[must_use]
    pub fn role(mut self, v: impl Into<String>) -> Self {
        self.role = Some(v.into());
        self
    }

    #[must_use]
    pub fn delta(mut self, v: impl Into<String>) -> Self {
        self.delta_text = Some(v.into());
        self
    }

    #[must_use]
    pub fn tool_call_id(mut self, v: impl Into<String>) -> Self {
        self.tool_call_id = Some(v.into());
        self
    }

    #[must_use]
    pub fn tool_call_name(mut self, v: impl Into<String>) -> Self {
        self.tool_call_name = Some(v.into());
        self
    }

    #[must_use]
    pub fn parent_message_id(mut self, v: impl Into<String>) -> Self {
        self.parent_message_id = Some(v.into());
        self
    }

    #[must_use]
    pub fn snapshot(mut self, v: JsonValue) -> Self {
        self.snapshot = Some(v);
        self
    }

    #[must_use]
    pub fn patch_ops(mut self, v: Vec<JsonPatchOperation>) -> Self {
        self.patch_ops = Some(v);
        self
    }

    #[must_use]
    pub fn messages(mut self, v: Vec<Message>) -> Self {
        self.messages = Some(v);
        self
    }

    #[must_use]
    pub fn raw_event(mut self, v: JsonValue) -> Self {
        self.raw_event = Some(v);
        self
    }

    #[must_use]
    pub fn source(mut self, v: impl Into<String>) -> Self {
        self.source = Some(v.into());
        self
    }

    #[must_use]
    pub fn name(mut self, v: impl Into<String>) -> Self {
        self.name = Some(v.into());
        self
    }

    #[must_use]
    pub fn value(mut self, v: JsonValue) -> Self {
        self.value = Some(v);
        self
    }

    /// Assemble the selected kind, auto-generating ids for fields left
    /// empty where the kind supports it, timestamp the result if unset,
    /// then run [`Event::validate`]. Returns [`EventError::NoKindSelected`]
    /// if [`Self::kind`] was never called.
    pub fn build(self) -> Result<Event, EventError> {
        let kind = self.kind.ok_or(EventError::NoKindSelected)?;
        let base = EventBase {
            timestamp: Some(self.timestamp.unwrap_or_else(now_ms)),
        };

        let event = match kind {
            EventKind::RunStarted => Event::RunStarted {
                thread_id: self.thread_id.unwrap_or_else(id::generate_thread_id),
                run_id: non_empty_or_generated(self.run_id, id::generate_run_id),
                base,
            },
            EventKind::RunFinished => Event::RunFinished {
                thread_id: self.thread_id.unwrap_or_default(),
                run_id: self.run_id.unwrap_or_default(),
                base,
            },
            EventKind::RunError => Event::RunError {
                message: self.message.unwrap_or_default(),
                code: self.code,
                run_id: self.run_id,
                base,
            },
            EventKind::StepStarted => Event::StepStarted {
                step_name: non_empty_or_generated(self.step_name, id::generate_step_name),
                base,
            },
            EventKind::StepFinished => Event::StepFinished {
                step_name: self.step_name.unwrap_or_default(),
                base,
            },
            EventKind::TextMessageStart => Event::TextMessageStart {
                message_id: non_empty_or_generated(self.message_id, id::generate_message_id),
                role: self.role,
                base,
            },
            EventKind::TextMessageContent => Event::TextMessageContent {
                message_id: self.message_id.unwrap_or_default(),
                delta: self.delta_text.unwrap_or_default(),
                base,
            },
            EventKind::TextMessageEnd => Event::TextMessageEnd {
                message_id: self.message_id.unwrap_or_default(),
                base,
            },
            EventKind::ToolCallStart => Event::ToolCallStart {
                tool_call_id: non_empty_or_generated(self.tool_call_id, id::generate_tool_call_id),
                tool_call_name: self.tool_call_name.unwrap_or_default(),
                parent_message_id: self.parent_message_id,
                base,
            },
            EventKind::ToolCallArgs => Event::ToolCallArgs {
                tool_call_id: self.tool_call_id.unwrap_or_default(),
                delta: self.delta_text.unwrap_or_default(),
                base,
            },
            EventKind::ToolCallEnd => Event::ToolCallEnd {
                tool_call_id: self.tool_call_id.unwrap_or_default(),
                base,
            },
            EventKind::StateSnapshot => Event::StateSnapshot {
                snapshot: self.snapshot.unwrap_or(JsonValue::Null),
                base,
            },
            EventKind::StateDelta => Event::StateDelta {
                delta: self.patch_ops.unwrap_or_default(),
                base,
            },
            EventKind::MessagesSnapshot => Event::MessagesSnapshot {
                messages: self.messages.unwrap_or_default(),
                base,
            },
            EventKind::Raw => Event::Raw {
                event: self.raw_event.unwrap_or(JsonValue::Null),
                source: self.source,
                base,
            },
            EventKind::Custom => Event::Custom {
                name: self.name.unwrap_or_default(),
                value: self.value,
                base,
            },
        };

        event.validate()?;
        Ok(event)
    }
}

fn non_empty_or_generated(value: Option<String>, generate: fn() -> String) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => generate(),
    }
}

/// Current time in Unix milliseconds. Builder-internal only; the rest of
/// the crate is deliberately clock-free so validation stays deterministic.
fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(1)
}
