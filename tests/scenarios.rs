// SPDX-License-Identifier: MIT OR Apache-2.0
//! The concrete end-to-end scenarios every sibling AG-UI SDK is expected
//! to agree on: a minimal valid run, a handful of named protocol
//! violations, a full message+tool-call lifecycle, duplicate starts, and
//! the JSON wire-format contract for a single event.

use agui_core::{Event, EventKind};
use agui_protocol::{decode_json_str, encode_json};
use agui_validate::{Severity, Validator};

/// Current Unix-millisecond time, for stamping events so
/// `TIMESTAMP_VALIDATION`'s skew check stays silent regardless of when
/// this test actually runs.
fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_millis() as i64
}

#[test]
fn scenario_1_valid_minimal_run() {
    let mut started = Event::run_started("t1", "r1");
    started.set_timestamp(now_ms());
    let mut finished = Event::run_finished("t1", "r1");
    finished.set_timestamp(now_ms());

    let validator = Validator::strict();
    let result = validator.validate_sequence(&[started, finished]);

    assert!(result.is_valid);
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
    assert_eq!(result.event_count, 2);

    let state = validator.get_state();
    assert_eq!(state.current_phase, agui_validate::Phase::Finished);
    assert!(state.active_runs.is_empty());
    assert!(state.finished_runs.contains_key("r1"));
}

#[test]
fn scenario_2_orphan_message_content() {
    let validator = Validator::strict();
    let result = validator.validate_sequence(&[
        Event::run_started("t", "r"),
        Event::text_message_content("m1", "hi"),
    ]);

    assert!(!result.is_valid);
    assert!(result.errors.iter().any(|e| e.rule_id == "MESSAGE_LIFECYCLE"
        && e.message.contains("m1")
        && e.message.to_lowercase().contains("not started")));
}

#[test]
fn scenario_3_events_after_finish() {
    let validator = Validator::strict();
    let result = validator.validate_sequence(&[
        Event::run_started("t", "r"),
        Event::run_finished("t", "r"),
        Event::step_started("s"),
    ]);

    assert!(!result.is_valid);
    assert!(result
        .errors
        .iter()
        .any(|e| e.rule_id == "EVENT_ORDERING" && e.message.contains("RUN_FINISHED")));
}

#[test]
fn scenario_4_full_message_lifecycle_with_tool_call() {
    let validator = Validator::strict();
    let base = now_ms();
    let mut events = [
        Event::run_started("t", "r"),
        Event::text_message_start("m1", Some("user".into())),
        Event::text_message_content("m1", "Hello, "),
        Event::text_message_content("m1", "world!"),
        Event::text_message_end("m1"),
        Event::tool_call_start("t1", "weather", Some("m1".into())),
        Event::tool_call_args("t1", r#"{"loc":"SF"}"#),
        Event::tool_call_end("t1"),
        Event::run_finished("t", "r"),
    ];
    for (i, event) in events.iter_mut().enumerate() {
        event.set_timestamp(base + i as i64);
    }
    let result = validator.validate_sequence(&events);

    assert!(result.is_valid, "unexpected errors: {:?}", result.errors);

    let state = validator.get_state();
    assert!(state.active_messages.is_empty());
    assert!(state.active_tools.is_empty());
    assert!(state.finished_messages.contains_key("m1"));
    assert!(state.finished_tools.contains_key("t1"));
}

#[test]
fn scenario_5_duplicate_run_start() {
    let validator = Validator::strict();
    let result = validator.validate_sequence(&[
        Event::run_started("t", "r"),
        Event::run_started("t", "r"),
    ]);

    assert!(!result.is_valid);
    assert!(result
        .errors
        .iter()
        .any(|e| e.rule_id == "RUN_LIFECYCLE" && e.message.contains("already started")));
}

#[test]
fn scenario_6_json_round_trip_has_exact_camel_case_keys() {
    let mut event = Event::run_started("thread-123", "run-456");
    event.set_timestamp(1_672_531_200_000);

    let json = encode_json(&event).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    let mut expected = vec!["type", "timestamp", "threadId", "runId"];
    expected.sort_unstable();
    assert_eq!(keys, expected);

    let decoded = decode_json_str(&json).unwrap();
    assert_eq!(decoded, event);
}

#[test]
fn empty_sequence_is_valid_with_zero_events() {
    let validator = Validator::strict();
    let result = validator.validate_sequence(&[]);
    assert!(result.is_valid);
    assert_eq!(result.errors.len(), 0);
    assert_eq!(result.event_count, 0);
}

#[test]
fn content_delta_boundary_at_ten_thousand_chars() {
    let validator = Validator::strict();
    let at_limit = "a".repeat(10_000);
    let over_limit = "a".repeat(10_001);

    let result = validator.validate_sequence(&[
        Event::run_started("t", "r"),
        Event::text_message_start("m1", None),
        Event::text_message_content("m1", at_limit),
    ]);
    assert!(!result
        .warnings
        .iter()
        .any(|w| w.rule_id == "MESSAGE_CONTENT"));

    let validator = Validator::strict();
    let result = validator.validate_sequence(&[
        Event::run_started("t", "r"),
        Event::text_message_start("m1", None),
        Event::text_message_content("m1", over_limit),
    ]);
    assert!(result.warnings.iter().any(|w| w.rule_id == "MESSAGE_CONTENT"));
}

#[test]
fn rejected_event_leaves_state_unchanged() {
    let validator = Validator::strict();
    let before = validator.get_state();
    let result = validator.validate_event(&Event::text_message_content("m1", "hi"));
    assert!(!result.is_valid);
    let after = validator.get_state();
    assert_eq!(before.event_count, after.event_count);
    assert!(after.active_messages.is_empty());
}

#[test]
fn every_event_kind_decodes_back_to_its_own_kind() {
    for kind in EventKind::ALL {
        let event = match kind {
            EventKind::RunStarted => Event::run_started("t", "r"),
            EventKind::RunFinished => Event::run_finished("t", "r"),
            EventKind::RunError => Event::run_error("boom", None, None),
            EventKind::StepStarted => Event::step_started("s"),
            EventKind::StepFinished => Event::step_finished("s"),
            EventKind::TextMessageStart => Event::text_message_start("m", None),
            EventKind::TextMessageContent => Event::text_message_content("m", "d"),
            EventKind::TextMessageEnd => Event::text_message_end("m"),
            EventKind::ToolCallStart => Event::tool_call_start("t", "n", None),
            EventKind::ToolCallArgs => Event::tool_call_args("t", "d"),
            EventKind::ToolCallEnd => Event::tool_call_end("t"),
            EventKind::StateSnapshot => Event::state_snapshot(serde_json::json!({})),
            EventKind::StateDelta => Event::state_delta(vec![agui_core::JsonPatchOperation::Remove {
                path: "/a".into(),
            }]),
            EventKind::MessagesSnapshot => Event::messages_snapshot(vec![]),
            EventKind::Raw => Event::raw(serde_json::json!(true), None),
            EventKind::Custom => Event::custom("n", None),
        };
        assert_eq!(event.kind(), kind);
    }
}

#[test]
fn validate_sequence_is_deterministic_across_repeated_runs() {
    let events = [
        Event::run_started("t", "r"),
        Event::text_message_start("m1", Some("assistant".into())),
        Event::text_message_content("m1", "hi"),
        Event::text_message_end("m1"),
        Event::run_finished("t", "r"),
    ];

    let first = Validator::strict().validate_sequence(&events);
    let second = Validator::strict().validate_sequence(&events);
    assert_eq!(first.is_valid, second.is_valid);
    assert_eq!(first.errors.len(), second.errors.len());
    assert_eq!(first.event_count, second.event_count);
}

#[test]
fn severity_ordering_info_below_warning_below_error() {
    assert!(Severity::Info < Severity::Warning);
    assert!(Severity::Warning < Severity::Error);
}
