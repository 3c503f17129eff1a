// SPDX-License-Identifier: MIT OR Apache-2.0
//! The default 17-rule library (spec §4.4's table), grouped by concern.

mod content;
mod custom_event;
mod ids;
mod lifecycle;
mod state_rules;

use std::sync::Arc;

pub use content::{ContentValidationRule, MessageContentRule, TimestampValidationRule, ToolCallContentRule};
pub use custom_event::CustomEventRule;
pub use ids::{IdConsistencyRule, IdFormatRule, IdUniquenessRule};
pub use lifecycle::{
    EventOrderingRule, EventSequenceRule, MessageLifecycleRule, MessageNestingRule,
    RunLifecycleRule, ToolCallLifecycleRule, ToolCallNestingRule,
};
pub use state_rules::{StateConsistencyRule, StateValidationRule};

use crate::rule::Rule;

/// The complete built-in rule set, in the insertion order a fresh
/// `STRICT`/`PERMISSIVE` [`crate::Validator`] registers them. `CUSTOM`
/// level skips this entirely in favor of
/// [`crate::config::ValidatorConfig::custom_validators`].
#[must_use]
pub fn default_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(RunLifecycleRule),
        Arc::new(EventOrderingRule),
        Arc::new(EventSequenceRule),
        Arc::new(MessageLifecycleRule),
        Arc::new(MessageContentRule),
        Arc::new(MessageNestingRule),
        Arc::new(ToolCallLifecycleRule),
        Arc::new(ToolCallContentRule),
        Arc::new(ToolCallNestingRule),
        Arc::new(IdConsistencyRule),
        Arc::new(IdFormatRule),
        Arc::new(IdUniquenessRule),
        Arc::new(StateValidationRule),
        Arc::new(StateConsistencyRule),
        Arc::new(ContentValidationRule),
        Arc::new(TimestampValidationRule),
        Arc::new(CustomEventRule),
    ]
}
