// SPDX-License-Identifier: MIT OR Apache-2.0
//! [`ValidationResult`]: the outcome of one `validate_event`/`validate_sequence` call.

use std::time::Duration;

use crate::error::ValidationError;
use crate::severity::Severity;

/// Outcome of validating one event, or a whole sequence.
///
/// `validate_event`/`validate_sequence` never throw on a rule violation:
/// every finding lands in one of `errors`/`warnings`/`information` here,
/// ordered by rule-then-event evaluation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    /// `true` iff `errors` is empty.
    pub is_valid: bool,
    /// Hard violations. A non-empty list suppresses the state commit for
    /// the event that produced them.
    pub errors: Vec<ValidationError>,
    /// Soft violations; the event still commits.
    pub warnings: Vec<ValidationError>,
    /// Non-actionable notes.
    pub information: Vec<ValidationError>,
    /// Number of events this result covers (1 for `validate_event`, the
    /// processed prefix length for `validate_sequence`).
    pub event_count: usize,
    /// Wall-clock time spent producing this result.
    pub duration: Duration,
}

impl ValidationResult {
    /// An empty, valid result covering zero events.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            is_valid: true,
            ..Self::default()
        }
    }

    /// File one finding into the bucket matching its severity, updating
    /// `is_valid` if it was an error.
    pub fn record(&mut self, finding: ValidationError) {
        match finding.severity {
            Severity::Error => {
                self.is_valid = false;
                self.errors.push(finding);
            }
            Severity::Warning => self.warnings.push(finding),
            Severity::Info => self.information.push(finding),
        }
    }

    /// Merge another result's findings into this one, summing event counts
    /// and durations. Used to fold per-event results into a sequence-level
    /// result.
    pub fn merge(&mut self, other: ValidationResult) {
        self.is_valid &= other.is_valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.information.extend(other.information);
        self.event_count += other.event_count;
        self.duration += other.duration;
    }

    /// Total finding count across all three severities.
    #[must_use]
    pub fn total_findings(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.information.len()
    }
}
