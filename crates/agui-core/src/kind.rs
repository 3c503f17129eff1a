// SPDX-License-Identifier: MIT OR Apache-2.0
//! The closed, 16-member event kind enumeration.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Discriminant of an [`crate::Event`] variant.
///
/// This enumeration is closed: schema evolution beyond these 16 members is
/// out of scope (see the crate-level docs). Adding a variant here is a
/// breaking change to the wire protocol, not a routine addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    RunStarted,
    RunFinished,
    RunError,
    StepStarted,
    StepFinished,
    TextMessageStart,
    TextMessageContent,
    TextMessageEnd,
    ToolCallStart,
    ToolCallArgs,
    ToolCallEnd,
    StateSnapshot,
    StateDelta,
    MessagesSnapshot,
    Raw,
    Custom,
}

impl EventKind {
    /// All 16 kinds, in declaration order.
    pub const ALL: [EventKind; 16] = [
        EventKind::RunStarted,
        EventKind::RunFinished,
        EventKind::RunError,
        EventKind::StepStarted,
        EventKind::StepFinished,
        EventKind::TextMessageStart,
        EventKind::TextMessageContent,
        EventKind::TextMessageEnd,
        EventKind::ToolCallStart,
        EventKind::ToolCallArgs,
        EventKind::ToolCallEnd,
        EventKind::StateSnapshot,
        EventKind::StateDelta,
        EventKind::MessagesSnapshot,
        EventKind::Raw,
        EventKind::Custom,
    ];

    /// The exact `SCREAMING_SNAKE_CASE` wire value used in the `type` field.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            EventKind::RunStarted => "RUN_STARTED",
            EventKind::RunFinished => "RUN_FINISHED",
            EventKind::RunError => "RUN_ERROR",
            EventKind::StepStarted => "STEP_STARTED",
            EventKind::StepFinished => "STEP_FINISHED",
            EventKind::TextMessageStart => "TEXT_MESSAGE_START",
            EventKind::TextMessageContent => "TEXT_MESSAGE_CONTENT",
            EventKind::TextMessageEnd => "TEXT_MESSAGE_END",
            EventKind::ToolCallStart => "TOOL_CALL_START",
            EventKind::ToolCallArgs => "TOOL_CALL_ARGS",
            EventKind::ToolCallEnd => "TOOL_CALL_END",
            EventKind::StateSnapshot => "STATE_SNAPSHOT",
            EventKind::StateDelta => "STATE_DELTA",
            EventKind::MessagesSnapshot => "MESSAGES_SNAPSHOT",
            EventKind::Raw => "RAW",
            EventKind::Custom => "CUSTOM",
        }
    }

    /// Parse a wire-format `type` value back into a kind. Returns `None` for
    /// anything outside the closed 16-member enumeration.
    #[must_use]
    pub fn from_wire_name(s: &str) -> Option<EventKind> {
        EventKind::ALL.into_iter().find(|k| k.wire_name() == s)
    }

    /// The id-field prefix used by [`crate::builder::EventBuilder`] auto-generation
    /// for identifiers this kind introduces, if any.
    #[must_use]
    pub fn id_prefix(self) -> Option<&'static str> {
        match self {
            EventKind::RunStarted => Some("run-"),
            EventKind::StepStarted | EventKind::StepFinished => Some("step-"),
            EventKind::TextMessageStart => Some("msg-"),
            EventKind::ToolCallStart => Some("tool-"),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_name_round_trips_for_every_kind() {
        for kind in EventKind::ALL {
            let name = kind.wire_name();
            assert_eq!(EventKind::from_wire_name(name), Some(kind));
        }
    }

    #[test]
    fn unknown_wire_name_is_none() {
        assert_eq!(EventKind::from_wire_name("NOT_A_KIND"), None);
        assert_eq!(EventKind::from_wire_name("text_message_chunk"), None);
    }

    #[test]
    fn exactly_sixteen_kinds() {
        assert_eq!(EventKind::ALL.len(), 16);
    }
}
