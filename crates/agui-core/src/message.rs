// SPDX-License-Identifier: MIT OR Apache-2.0
//! Chat messages and tool calls carried by `MESSAGES_SNAPSHOT` events.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::EventError;

/// A function call made by a [`Message`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

/// A tool call attached to an assistant [`Message`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: FunctionCall,
}

impl ToolCall {
    /// Build a `function`-typed tool call, the only call type the protocol
    /// currently defines.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }

    fn validate(&self) -> Result<(), EventError> {
        if self.id.is_empty() {
            return Err(EventError::InvalidField {
                field: "tool_calls[].id",
                reason: "tool call id must not be empty".into(),
            });
        }
        if self.call_type.is_empty() {
            return Err(EventError::InvalidField {
                field: "tool_calls[].type",
                reason: "tool call type must not be empty".into(),
            });
        }
        if self.function.name.is_empty() {
            return Err(EventError::InvalidField {
                field: "tool_calls[].function.name",
                reason: "tool call function name must not be empty".into(),
            });
        }
        Ok(())
    }
}

/// A single message in a `MESSAGES_SNAPSHOT` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Message {
    pub id: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        rename = "toolCallId",
        skip_serializing_if = "Option::is_none"
    )]
    pub tool_call_id: Option<String>,
    #[serde(default, rename = "toolCalls", skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl Message {
    /// Validate the `id`/`role` required-field contract plus the nested
    /// tool-call contract from spec §4.1 (`id`, `type`, `function.name`).
    pub fn validate(&self) -> Result<(), EventError> {
        if self.id.is_empty() {
            return Err(EventError::InvalidField {
                field: "messages[].id",
                reason: "message id must not be empty".into(),
            });
        }
        if self.role.is_empty() {
            return Err(EventError::InvalidField {
                field: "messages[].role",
                reason: "message role must not be empty".into(),
            });
        }
        for tool_call in &self.tool_calls {
            tool_call.validate()?;
        }
        Ok(())
    }
}
