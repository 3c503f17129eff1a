// SPDX-License-Identifier: MIT OR Apache-2.0
//! Severity levels a rule finding can carry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious a rule finding is. Only [`Severity::Error`] flips
/// [`crate::ValidationResult::is_valid`] to `false` and suppresses the
/// state commit for the offending event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational note; no conformance impact.
    Info,
    /// Soft violation worth surfacing, but the event still commits.
    Warning,
    /// Hard protocol violation; the event's state commit is suppressed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}
