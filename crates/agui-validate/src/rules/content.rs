// SPDX-License-Identifier: MIT OR Apache-2.0
//! Content and timestamp rules: `MESSAGE_CONTENT`, `TOOL_CALL_CONTENT`,
//! `CONTENT_VALIDATION`, `TIMESTAMP_VALIDATION`.

use agui_core::Event;

use crate::context::ValidationContext;
use crate::error::ValidationError;
use crate::rule::Rule;
use crate::severity::Severity;
use crate::state::ValidationState;

const MESSAGE_DELTA_SOFT_LIMIT: usize = 10_000;
const TOOL_ARGS_SOFT_LIMIT: usize = 50_000;
const MAX_LINE_LENGTH: usize = 1_000;

/// Soft limits on `TEXT_MESSAGE_CONTENT.delta`: length over 10 000 chars,
/// or embedded control bytes.
pub struct MessageContentRule;

impl Rule for MessageContentRule {
    fn id(&self) -> &str {
        "MESSAGE_CONTENT"
    }
    fn description(&self) -> &str {
        "soft limits on message content deltas"
    }
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(
        &self,
        event: &Event,
        _state: &ValidationState,
        _ctx: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        let Event::TextMessageContent { delta, .. } = event else {
            return Vec::new();
        };
        let mut out = Vec::new();
        if delta.chars().count() > MESSAGE_DELTA_SOFT_LIMIT {
            out.push(ValidationError::new(
                self.id(),
                self.default_severity(),
                format!(
                    "message content delta is {} chars, over the {MESSAGE_DELTA_SOFT_LIMIT}-char soft limit",
                    delta.chars().count()
                ),
            ));
        }
        if has_control_bytes(delta) {
            out.push(ValidationError::new(
                self.id(),
                self.default_severity(),
                "message content delta contains control bytes",
            ));
        }
        out
    }
}

/// Soft limit on `TOOL_CALL_ARGS.delta`: length over 50 000 chars.
pub struct ToolCallContentRule;

impl Rule for ToolCallContentRule {
    fn id(&self) -> &str {
        "TOOL_CALL_CONTENT"
    }
    fn description(&self) -> &str {
        "soft limit on tool call args deltas"
    }
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(
        &self,
        event: &Event,
        _state: &ValidationState,
        _ctx: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        let Event::ToolCallArgs { delta, .. } = event else {
            return Vec::new();
        };
        if delta.chars().count() > TOOL_ARGS_SOFT_LIMIT {
            vec![ValidationError::new(
                self.id(),
                self.default_severity(),
                format!(
                    "tool call args delta is {} chars, over the {TOOL_ARGS_SOFT_LIMIT}-char soft limit",
                    delta.chars().count()
                ),
            )]
        } else {
            Vec::new()
        }
    }
}

/// Null bytes, lines over 1000 chars, and a `javascript:` URI heuristic,
/// applied to every free-text payload field across event kinds.
pub struct ContentValidationRule;

impl Rule for ContentValidationRule {
    fn id(&self) -> &str {
        "CONTENT_VALIDATION"
    }
    fn description(&self) -> &str {
        "null bytes, overlong lines, and javascript: URI heuristic"
    }
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(
        &self,
        event: &Event,
        _state: &ValidationState,
        _ctx: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        let texts: Vec<&str> = match event {
            Event::TextMessageContent { delta, .. } => vec![delta.as_str()],
            Event::ToolCallArgs { delta, .. } => vec![delta.as_str()],
            Event::RunError { message, .. } => vec![message.as_str()],
            Event::Custom { name, .. } => vec![name.as_str()],
            Event::MessagesSnapshot { messages, .. } => messages
                .iter()
                .filter_map(|m| m.content.as_deref())
                .collect(),
            _ => Vec::new(),
        };

        let mut out = Vec::new();
        for text in texts {
            if text.contains('\0') {
                out.push(ValidationError::new(
                    self.id(),
                    self.default_severity(),
                    "payload text contains a null byte",
                ));
            }
            if text.lines().any(|l| l.chars().count() > MAX_LINE_LENGTH) {
                out.push(ValidationError::new(
                    self.id(),
                    self.default_severity(),
                    format!("payload text has a line over {MAX_LINE_LENGTH} chars"),
                ));
            }
            if text.to_ascii_lowercase().contains("javascript:") {
                out.push(ValidationError::new(
                    self.id(),
                    self.default_severity(),
                    "payload text contains a javascript: URI",
                ));
            }
        }
        out
    }
}

/// Timestamp presence, 5-second future / 24-hour past skew bounds, and
/// monotonicity across the sequence.
///
/// Per spec §8's property ("in strict mode, every event with
/// `timestamp = None` or `timestamp <= 0` yields an error"), a missing or
/// non-positive timestamp is reported at [`Severity::Error`] rather than
/// this rule's own [`Self::default_severity`] — the same per-finding
/// override pattern `STATE_VALIDATION` uses for a non-standard role.
/// Skew and monotonicity findings stay at the rule's default `Warning`.
pub struct TimestampValidationRule;

impl Rule for TimestampValidationRule {
    fn id(&self) -> &str {
        "TIMESTAMP_VALIDATION"
    }
    fn description(&self) -> &str {
        "timestamp presence, skew bounds, and monotonicity"
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
        if ctx.flags.skip_timestamp_validation {
            return Vec::new();
        }
        let mut out = Vec::new();
        let Some(ts) = event.timestamp() else {
            out.push(ValidationError::new(
                self.id(),
                Severity::Error,
                "event has no timestamp",
            ));
            return out;
        };
        if ts <= 0 {
            out.push(ValidationError::new(
                self.id(),
                Severity::Error,
                format!("timestamp {ts} is not positive"),
            ));
            return out;
        }

        let now_ms = current_unix_millis();
        const FIVE_SECONDS_MS: i64 = 5_000;
        const TWENTY_FOUR_HOURS_MS: i64 = 24 * 60 * 60 * 1000;
        if ts > now_ms + FIVE_SECONDS_MS {
            out.push(ValidationError::new(
                self.id(),
                self.default_severity(),
                format!("timestamp {ts} is more than 5 seconds in the future"),
            ));
        }
        if ts < now_ms - TWENTY_FOUR_HOURS_MS {
            out.push(ValidationError::new(
                self.id(),
                self.default_severity(),
                format!("timestamp {ts} is more than 24 hours in the past"),
            ));
        }

        if let Some(prev) = ctx.previous_event()
            && let Some(prev_ts) = prev.timestamp()
            && ts < prev_ts
        {
            out.push(ValidationError::new(
                self.id(),
                self.default_severity(),
                format!("timestamp {ts} is earlier than the previous event's {prev_ts}"),
            ));
        }
        out
    }
}

fn has_control_bytes(s: &str) -> bool {
    s.bytes().any(|b| b < 0x20 && b != b'\n' && b != b'\t' && b != b'\r')
}

fn current_unix_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidatorFlags;
    use crate::context::ValidationContext;

    #[test]
    fn message_content_over_limit_warns() {
        let rule = MessageContentRule;
        let delta = "a".repeat(MESSAGE_DELTA_SOFT_LIMIT + 1);
        let event = Event::text_message_content("m1", delta);
        let state = ValidationState::new();
        let ctx = ValidationContext::isolated(&event, ValidatorFlags::strict(), false);
        assert_eq!(rule.check(&event, &state, &ctx).len(), 1);
    }

    #[test]
    fn message_content_at_limit_is_silent() {
        let rule = MessageContentRule;
        let delta = "a".repeat(MESSAGE_DELTA_SOFT_LIMIT);
        let event = Event::text_message_content("m1", delta);
        let state = ValidationState::new();
        let ctx = ValidationContext::isolated(&event, ValidatorFlags::strict(), false);
        assert!(rule.check(&event, &state, &ctx).is_empty());
    }

    #[test]
    fn tool_call_args_over_limit_warns() {
        let rule = ToolCallContentRule;
        let delta = "a".repeat(TOOL_ARGS_SOFT_LIMIT + 1);
        let event = Event::tool_call_args("t1", delta);
        let state = ValidationState::new();
        let ctx = ValidationContext::isolated(&event, ValidatorFlags::strict(), false);
        assert_eq!(rule.check(&event, &state, &ctx).len(), 1);
    }

    #[test]
    fn missing_timestamp_errors_in_strict_mode() {
        let rule = TimestampValidationRule;
        let event = Event::step_started("s");
        let state = ValidationState::new();
        let ctx = ValidationContext::isolated(&event, ValidatorFlags::strict(), false);
        let findings = rule.check(&event, &state, &ctx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn non_positive_timestamp_errors_in_strict_mode() {
        let rule = TimestampValidationRule;
        let mut event = Event::step_started("s");
        event.set_timestamp(0);
        let state = ValidationState::new();
        let ctx = ValidationContext::isolated(&event, ValidatorFlags::strict(), false);
        let findings = rule.check(&event, &state, &ctx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn missing_timestamp_is_skipped_when_flag_set() {
        let rule = TimestampValidationRule;
        let event = Event::step_started("s");
        let state = ValidationState::new();
        let ctx = ValidationContext::isolated(&event, ValidatorFlags::permissive(), false);
        assert!(rule.check(&event, &state, &ctx).is_empty());
    }

    #[test]
    fn javascript_uri_is_flagged() {
        let rule = ContentValidationRule;
        let event = Event::text_message_content("m1", "click javascript:alert(1)");
        let state = ValidationState::new();
        let ctx = ValidationContext::isolated(&event, ValidatorFlags::strict(), false);
        assert!(!rule.check(&event, &state, &ctx).is_empty());
    }
}
