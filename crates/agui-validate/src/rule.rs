// SPDX-License-Identifier: MIT OR Apache-2.0
//! The [`Rule`] trait pluggable rules implement.

use agui_core::Event;

use crate::context::ValidationContext;
use crate::error::ValidationError;
use crate::severity::Severity;
use crate::state::ValidationState;

/// A pluggable predicate run against one event plus the surrounding state.
///
/// Rules are invoked in registration order (spec §5: "rule execution order
/// is deterministic and equal to rule insertion order"). A rule may return
/// zero or more findings; each finding's severity is independent, so a
/// single rule can simultaneously emit both a warning and (on a different
/// check) an error for the same event.
///
/// Implementations must not panic; if one does, [`crate::Validator`] traps
/// it and converts it into a single `ERROR`-severity [`ValidationError`]
/// (spec §7) rather than propagating it.
pub trait Rule: Send + Sync {
    /// Stable identifier, e.g. `"RUN_LIFECYCLE"`. Used for `remove_rule`,
    /// metrics keys, and each finding's `rule_id` unless a finding
    /// explicitly overrides it with a more specific sub-id (as the
    /// ID-relationship tracker's findings do).
    fn id(&self) -> &str;

    /// One-line human description, shown in rule listings and reports.
    fn description(&self) -> &str;

    /// Severity to apply to findings that don't specify their own. Most
    /// rules report at this single severity; a few (documented per rule)
    /// downgrade specific findings (e.g. a non-standard role in
    /// `STATE_VALIDATION` is a warning even though the rule's default is
    /// error).
    fn default_severity(&self) -> Severity;

    /// Inspect `event` against `state` and `ctx`, returning zero or more
    /// findings. Must not mutate `state` — only [`crate::Validator`]
    /// commits state, and only after a clean validation pass.
    fn check(
        &self,
        event: &Event,
        state: &ValidationState,
        ctx: &ValidationContext<'_>,
    ) -> Vec<ValidationError>;
}
