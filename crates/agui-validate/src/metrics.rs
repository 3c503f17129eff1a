// SPDX-License-Identifier: MIT OR Apache-2.0
//! [`ValidationMetrics`]: per-rule and per-severity counters plus latency.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::ValidationError;
use crate::severity::Severity;

/// Monotonically increasing counters the [`crate::Validator`] maintains
/// across its lifetime (spec §9: "no histograms are required").
#[derive(Debug, Clone, Default)]
pub struct ValidationMetrics {
    /// Number of times each rule id has produced at least one finding.
    pub findings_per_rule: HashMap<String, u64>,
    /// Cumulative execution time spent inside each rule id's `check`.
    pub duration_per_rule: HashMap<String, Duration>,
    /// Number of findings at each severity, across all rules.
    pub findings_per_severity: HashMap<Severity, u64>,
    /// Total events passed to `validate_event` (including rejected ones).
    pub total_events: u64,
    /// Cumulative wall-clock time spent in `validate_event`.
    pub total_duration: Duration,
}

impl ValidationMetrics {
    /// A fresh, all-zero metrics snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `rule_id` ran for `elapsed` and produced `findings`.
    pub fn record_rule_run(&mut self, rule_id: &str, elapsed: Duration, findings: &[ValidationError]) {
        *self.duration_per_rule.entry(rule_id.to_string()).or_default() += elapsed;
        if !findings.is_empty() {
            *self.findings_per_rule.entry(rule_id.to_string()).or_default() += 1;
        }
        for finding in findings {
            *self.findings_per_severity.entry(finding.severity).or_default() += 1;
        }
    }

    /// Record that one `validate_event` call completed in `elapsed`.
    pub fn record_event(&mut self, elapsed: Duration) {
        self.total_events += 1;
        self.total_duration += elapsed;
    }

    /// Mean `validate_event` latency across all recorded events, or
    /// [`Duration::ZERO`] if none have been recorded.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        if self.total_events == 0 {
            Duration::ZERO
        } else {
            self.total_duration / u32::try_from(self.total_events).unwrap_or(u32::MAX)
        }
    }
}
