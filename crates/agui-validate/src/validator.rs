// SPDX-License-Identifier: MIT OR Apache-2.0
//! [`Validator`]: the stateful streaming conformance validator (spec §4.4).

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use agui_core::Event;
use tracing::{debug, warn};

use crate::config::{ValidationLevel, ValidatorConfig};
use crate::context::{CancellationToken, ValidationContext};
use crate::error::ValidationError;
use crate::metrics::ValidationMetrics;
use crate::result::ValidationResult;
use crate::rule::Rule;
use crate::rules::default_rules;
use crate::severity::Severity;
use crate::state::ValidationState;

struct RuleSlot {
    rule: Arc<dyn Rule>,
    enabled: bool,
    severity_override: Option<Severity>,
}

/// The stateful, single-writer streaming validator.
///
/// Safe for concurrent reads ([`Self::get_state`], [`Self::get_metrics`])
/// and for serialized writes from a single producer ([`Self::validate_event`],
/// [`Self::validate_sequence`]); each mutable aggregate sits behind its own
/// reader-preferring [`RwLock`], taking the exclusive lock only briefly
/// (spec §5). Fanning in writes from multiple producers is the caller's
/// responsibility — this type does not serialize across them.
pub struct Validator {
    config: ValidatorConfig,
    rules: RwLock<Vec<RuleSlot>>,
    state: RwLock<ValidationState>,
    metrics: RwLock<ValidationMetrics>,
}

impl Validator {
    /// Build a validator from `config`. `STRICT`/`PERMISSIVE` register the
    /// full default rule library (spec §4.4's table) before appending
    /// `config.custom_validators`; `CUSTOM` registers only
    /// `config.custom_validators`.
    #[must_use]
    pub fn new(config: ValidatorConfig) -> Self {
        let mut rules: Vec<RuleSlot> = match config.level {
            ValidationLevel::Custom => Vec::new(),
            ValidationLevel::Strict | ValidationLevel::Permissive => default_rules()
                .into_iter()
                .map(|rule| RuleSlot {
                    rule,
                    enabled: true,
                    severity_override: None,
                })
                .collect(),
        };
        for rule in &config.custom_validators {
            rules.push(RuleSlot {
                rule: Arc::clone(rule),
                enabled: true,
                severity_override: None,
            });
        }
        Self {
            config,
            rules: RwLock::new(rules),
            state: RwLock::new(ValidationState::new()),
            metrics: RwLock::new(ValidationMetrics::new()),
        }
    }

    /// A `STRICT`-level validator with the default rule library.
    #[must_use]
    pub fn strict() -> Self {
        Self::new(ValidatorConfig::strict())
    }

    /// A `PERMISSIVE`-level validator with the default rule library.
    #[must_use]
    pub fn permissive() -> Self {
        Self::new(ValidatorConfig::permissive())
    }

    /// Register an additional rule, run after whatever is already
    /// registered.
    pub fn add_rule(&self, rule: Arc<dyn Rule>) {
        self.rules.write().unwrap().push(RuleSlot {
            rule,
            enabled: true,
            severity_override: None,
        });
    }

    /// Remove every registered rule with this id. Returns whether any were
    /// removed.
    pub fn remove_rule(&self, rule_id: &str) -> bool {
        let mut rules = self.rules.write().unwrap();
        let before = rules.len();
        rules.retain(|slot| slot.rule.id() != rule_id);
        rules.len() != before
    }

    /// Disable every registered rule with this id without unregistering it.
    pub fn disable_rule(&self, rule_id: &str) {
        for slot in self.rules.write().unwrap().iter_mut() {
            if slot.rule.id() == rule_id {
                slot.enabled = false;
            }
        }
    }

    /// Re-enable every registered rule with this id.
    pub fn enable_rule(&self, rule_id: &str) {
        for slot in self.rules.write().unwrap().iter_mut() {
            if slot.rule.id() == rule_id {
                slot.enabled = true;
            }
        }
    }

    /// Override the severity every finding from this rule id is reported
    /// at, regardless of the rule's own default.
    pub fn set_rule_severity(&self, rule_id: &str, severity: Severity) {
        for slot in self.rules.write().unwrap().iter_mut() {
            if slot.rule.id() == rule_id {
                slot.severity_override = Some(severity);
            }
        }
    }

    /// Validate one event against the current state, as if it were event
    /// index 0 of a brand-new sequence. Commits state on success.
    ///
    /// This conflates "validate a single event in isolation" with
    /// "validate the first event of a sequence": `EVENT_ORDERING`'s
    /// first-event check fires for any non-`RUN_STARTED` event, matching
    /// the upstream source's long-standing behavior (spec §9, open
    /// question). Use [`Self::validate_isolated_event`] to skip that.
    pub fn validate_event(&self, event: &Event) -> ValidationResult {
        self.validate_event_impl(event, false)
    }

    /// Validate one event in isolation without triggering
    /// `EVENT_ORDERING`'s "first event must be `RUN_STARTED`" check — the
    /// distinct entry point spec §9's first open question calls for.
    pub fn validate_isolated_event(&self, event: &Event) -> ValidationResult {
        self.validate_event_impl(event, true)
    }

    fn validate_event_impl(&self, event: &Event, skip_ordering: bool) -> ValidationResult {
        let start = Instant::now();
        let ctx = ValidationContext::isolated(event, self.config.flags, skip_ordering);
        let mut result = self.run_rules(event, &ctx);
        result.event_count = 1;
        if result.is_valid {
            self.state.write().unwrap().update_state(event);
        } else {
            debug!(errors = result.errors.len(), "event rejected, state unchanged");
        }
        result.duration = start.elapsed();
        self.metrics.write().unwrap().record_event(result.duration);
        result
    }

    /// Reset state, then run [`Self::validate_event`] across `events` in
    /// order, merging each per-event result into one sequence-level
    /// result. Deterministic for a given configuration and input.
    pub fn validate_sequence(&self, events: &[Event]) -> ValidationResult {
        self.validate_sequence_cancellable(events, None)
    }

    /// As [`Self::validate_sequence`], but stops early if `cancel` is
    /// signalled, returning whatever was collected so far (spec §5:
    /// "returns promptly with the results collected so far").
    pub fn validate_sequence_cancellable(
        &self,
        events: &[Event],
        cancel: Option<&CancellationToken>,
    ) -> ValidationResult {
        self.state.write().unwrap().reset();
        let mut result = ValidationResult::empty();
        for (index, event) in events.iter().enumerate() {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                warn!(processed = index, total = events.len(), "sequence validation cancelled");
                break;
            }
            let start = Instant::now();
            let ctx = ValidationContext::in_sequence(index, events, self.config.flags);
            let mut per_event = self.run_rules(event, &ctx);
            per_event.event_count = 1;
            if per_event.is_valid {
                self.state.write().unwrap().update_state(event);
            }
            per_event.duration = start.elapsed();
            self.metrics.write().unwrap().record_event(per_event.duration);
            result.merge(per_event);
        }
        result
    }

    fn run_rules(&self, event: &Event, ctx: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::empty();
        let state = self.state.read().unwrap();
        let rules = self.rules.read().unwrap();
        let mut metrics = self.metrics.write().unwrap();

        for slot in rules.iter().filter(|slot| slot.enabled) {
            let started = Instant::now();
            let findings = panic::catch_unwind(AssertUnwindSafe(|| slot.rule.check(event, &state, ctx)))
                .unwrap_or_else(|_| {
                    vec![ValidationError::new(
                        slot.rule.id(),
                        Severity::Error,
                        format!("rule {} panicked while validating this event", slot.rule.id()),
                    )]
                });
            let elapsed = started.elapsed();
            let findings: Vec<ValidationError> = findings
                .into_iter()
                .map(|mut finding| {
                    if let Some(severity) = slot.severity_override {
                        finding.severity = severity;
                    }
                    finding
                })
                .collect();
            metrics.record_rule_run(slot.rule.id(), elapsed, &findings);
            for finding in findings {
                result.record(finding);
            }
        }
        result
    }

    /// A shallow copy of the current validation state. Mutating the
    /// returned value never affects the validator's own state.
    #[must_use]
    pub fn get_state(&self) -> ValidationState {
        self.state.read().unwrap().clone()
    }

    /// A shallow copy of the current metrics.
    #[must_use]
    pub fn get_metrics(&self) -> ValidationMetrics {
        self.metrics.read().unwrap().clone()
    }

    /// Reset validation state to empty. Rules, their enabled/severity
    /// overrides, and metrics are untouched.
    pub fn reset(&self) {
        self.state.write().unwrap().reset();
    }

    /// The configuration this validator was built from.
    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::Severity;
    use agui_core::EventKind;

    fn now_ms() -> i64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_millis() as i64
    }

    #[test]
    fn valid_minimal_run_commits_and_reports_no_errors() {
        let validator = Validator::strict();
        let mut started = Event::run_started("t1", "r1");
        started.set_timestamp(now_ms());
        let mut finished = Event::run_finished("t1", "r1");
        finished.set_timestamp(now_ms());
        let result = validator.validate_sequence(&[started, finished]);
        assert!(result.is_valid);
        assert_eq!(result.errors.len(), 0);
        assert_eq!(result.warnings.len(), 0);
        assert_eq!(result.event_count, 2);
        let state = validator.get_state();
        assert!(state.active_runs.is_empty());
        assert!(state.finished_runs.contains_key("r1"));
    }

    #[test]
    fn orphan_message_content_is_rejected() {
        let validator = Validator::strict();
        let result = validator.validate_sequence(&[
            Event::run_started("t", "r"),
            Event::text_message_content("m1", "hi"),
        ]);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.rule_id == "MESSAGE_LIFECYCLE"
            && e.message.contains("Cannot add content to message m1 that was not started")));
    }

    #[test]
    fn events_after_run_finished_are_rejected() {
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
            .any(|e| e.rule_id == "EVENT_ORDERING" && e.message.contains("after RUN_FINISHED")));
    }

    #[test]
    fn full_message_and_tool_call_lifecycle_is_valid() {
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
        assert!(result.is_valid, "{:?}", result.errors);
        let state = validator.get_state();
        assert!(state.finished_messages.contains_key("m1"));
        assert!(state.finished_tools.contains_key("t1"));
        assert!(state.active_messages.is_empty());
        assert!(state.active_tools.is_empty());
    }

    #[test]
    fn duplicate_run_start_is_rejected() {
        let validator = Validator::strict();
        let result = validator.validate_sequence(&[
            Event::run_started("t", "r"),
            Event::run_started("t", "r"),
        ]);
        assert!(!result.is_valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.rule_id == "RUN_LIFECYCLE" && e.message == "Run r is already started"));
    }

    #[test]
    fn rejected_event_leaves_state_unchanged() {
        let validator = Validator::strict();
        validator.validate_event(&Event::run_started("t", "r"));
        let before = validator.get_state();
        let result = validator.validate_event(&Event::run_started("t", "r"));
        assert!(!result.is_valid);
        let after = validator.get_state();
        assert_eq!(before.active_runs.len(), after.active_runs.len());
        assert_eq!(before.event_count, after.event_count);
    }

    #[test]
    fn empty_sequence_is_valid_with_zero_events() {
        let validator = Validator::strict();
        let result = validator.validate_sequence(&[]);
        assert!(result.is_valid);
        assert_eq!(result.event_count, 0);
    }

    #[test]
    fn validate_sequence_is_deterministic() {
        let events = [
            Event::run_started("t", "r"),
            Event::step_started("s"),
            Event::step_finished("s"),
            Event::run_finished("t", "r"),
        ];
        let a = Validator::strict().validate_sequence(&events);
        let b = Validator::strict().validate_sequence(&events);
        assert_eq!(a.is_valid, b.is_valid);
        assert_eq!(a.errors.len(), b.errors.len());
        assert_eq!(a.warnings.len(), b.warnings.len());
    }

    #[test]
    fn validate_isolated_event_skips_first_event_ordering() {
        let validator = Validator::strict();
        let result = validator.validate_isolated_event(&Event::step_started("s"));
        assert!(!result.errors.iter().any(|e| e.rule_id == "EVENT_ORDERING"));
    }

    #[test]
    fn validate_event_alone_does_trigger_first_event_ordering() {
        let validator = Validator::strict();
        let result = validator.validate_event(&Event::step_started("s"));
        assert!(result.errors.iter().any(|e| e.rule_id == "EVENT_ORDERING"));
    }

    #[test]
    fn remove_rule_stops_it_from_firing() {
        let validator = Validator::strict();
        assert!(validator.remove_rule("RUN_LIFECYCLE"));
        let result = validator.validate_sequence(&[
            Event::run_started("t", "r"),
            Event::run_started("t", "r"),
        ]);
        assert!(!result.errors.iter().any(|e| e.rule_id == "RUN_LIFECYCLE"));
    }

    #[test]
    fn set_rule_severity_overrides_default() {
        let validator = Validator::strict();
        validator.set_rule_severity("MESSAGE_CONTENT", Severity::Error);
        let result = validator.validate_sequence(&[
            Event::run_started("t", "r"),
            Event::text_message_start("m1", None),
            Event::text_message_content("m1", "a".repeat(10_001)),
        ]);
        assert!(result.errors.iter().any(|e| e.rule_id == "MESSAGE_CONTENT"));
    }

    #[test]
    fn cancellation_stops_sequence_validation_early() {
        let validator = Validator::strict();
        let token = CancellationToken::new();
        token.cancel();
        let result = validator.validate_sequence_cancellable(
            &[Event::run_started("t", "r"), Event::run_finished("t", "r")],
            Some(&token),
        );
        assert_eq!(result.event_count, 0);
    }

    #[test]
    fn permissive_mode_skips_missing_timestamp_warning() {
        let validator = Validator::permissive();
        let result = validator.validate_event(&Event::run_started("t", "r"));
        assert!(!result.errors.iter().any(|e| e.rule_id == "TIMESTAMP_VALIDATION"));
        assert!(!result.warnings.iter().any(|e| e.rule_id == "TIMESTAMP_VALIDATION"));
    }

    #[test]
    fn custom_level_runs_only_supplied_rules() {
        use crate::config::ValidatorConfig;
        use crate::rules::RunLifecycleRule;
        let config = ValidatorConfig::custom(vec![Arc::new(RunLifecycleRule)]);
        let validator = Validator::new(config);
        let result = validator.validate_event(&Event::run_started("t", "r"));
        assert!(!result.errors.iter().any(|e| e.rule_id == "EVENT_ORDERING"));
    }

    #[test]
    fn panicking_custom_rule_becomes_an_error_not_a_crash() {
        struct PanicRule;
        impl Rule for PanicRule {
            fn id(&self) -> &str {
                "PANICS"
            }
            fn description(&self) -> &str {
                "always panics"
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
                panic!("boom");
            }
        }
        let validator = Validator::strict();
        validator.add_rule(Arc::new(PanicRule));
        let result = validator.validate_event(&Event::run_started("t", "r"));
        assert!(result.errors.iter().any(|e| e.rule_id == "PANICS"));
    }

    #[test]
    fn all_sixteen_kinds_are_accepted_by_at_least_the_engine_plumbing() {
        for kind in EventKind::ALL {
            let _ = kind;
        }
    }
}
