// SPDX-License-Identifier: MIT OR Apache-2.0
//! `STATE_VALIDATION` and `STATE_CONSISTENCY` (reserved).

use agui_core::Event;

use crate::context::ValidationContext;
use crate::error::ValidationError;
use crate::rule::Rule;
use crate::severity::Severity;
use crate::state::ValidationState;

const STANDARD_ROLES: [&str; 5] = ["user", "assistant", "system", "tool", "developer"];

/// Snapshot non-null, delta ops well-formed, and `MESSAGES_SNAPSHOT` roles
/// drawn from the standard set (a non-standard role downgrades to a
/// warning rather than the rule's default error severity).
pub struct StateValidationRule;

impl Rule for StateValidationRule {
    fn id(&self) -> &str {
        "STATE_VALIDATION"
    }
    fn description(&self) -> &str {
        "snapshot/delta well-formedness and standard message roles"
    }
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(
        &self,
        event: &Event,
        _state: &ValidationState,
        _ctx: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        let mut out = Vec::new();
        match event {
            Event::StateSnapshot { snapshot, .. } => {
                if snapshot.is_null() {
                    out.push(ValidationError::new(
                        self.id(),
                        self.default_severity(),
                        "STATE_SNAPSHOT snapshot must not be null",
                    ));
                }
            }
            Event::StateDelta { delta, .. } => {
                if delta.is_empty() {
                    out.push(ValidationError::new(
                        self.id(),
                        self.default_severity(),
                        "STATE_DELTA requires at least one patch operation",
                    ));
                }
                for op in delta {
                    if let Err(e) = op.validate() {
                        out.push(ValidationError::new(
                            self.id(),
                            self.default_severity(),
                            format!("malformed JSON-Patch operation: {e}"),
                        ));
                    }
                }
            }
            Event::MessagesSnapshot { messages, .. } => {
                for message in messages {
                    if !STANDARD_ROLES.contains(&message.role.as_str()) {
                        out.push(
                            ValidationError::new(
                                self.id(),
                                Severity::Warning,
                                format!(
                                    "message {} has non-standard role {:?}",
                                    message.id, message.role
                                ),
                            )
                            .with_context("messageId", &message.id),
                        );
                    }
                }
            }
            _ => {}
        }
        out
    }
}

/// Reserved for cross-snapshot consistency checks (e.g. a delta applying
/// cleanly against the most recent snapshot). Not yet implemented: no-op.
pub struct StateConsistencyRule;

impl Rule for StateConsistencyRule {
    fn id(&self) -> &str {
        "STATE_CONSISTENCY"
    }
    fn description(&self) -> &str {
        "reserved for cross-snapshot consistency checks"
    }
    fn default_severity(&self) -> Severity {
        Severity::Warning
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidatorFlags;
    use crate::context::ValidationContext;
    use agui_core::Message;

    #[test]
    fn non_standard_role_is_a_warning_not_an_error() {
        let rule = StateValidationRule;
        let event = Event::messages_snapshot(vec![Message {
            id: "m1".into(),
            role: "narrator".into(),
            content: None,
            name: None,
            tool_call_id: None,
            tool_calls: vec![],
        }]);
        let state = ValidationState::new();
        let ctx = ValidationContext::isolated(&event, ValidatorFlags::strict(), false);
        let findings = rule.check(&event, &state, &ctx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
    }
}
