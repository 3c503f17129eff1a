// SPDX-License-Identifier: MIT OR Apache-2.0
//! `CUSTOM_EVENT`: covers both `CUSTOM` (name required, reserved names
//! warn, value must be JSON-serializable — trivially true for a typed
//! `serde_json::Value`) and `RAW` (`event` must not be null).

use agui_core::Event;

use crate::context::ValidationContext;
use crate::error::ValidationError;
use crate::rule::Rule;
use crate::severity::Severity;
use crate::state::ValidationState;

const RESERVED_CUSTOM_NAMES: [&str; 4] = ["system", "internal", "reserved", "ag-ui"];

/// See module docs.
pub struct CustomEventRule;

impl Rule for CustomEventRule {
    fn id(&self) -> &str {
        "CUSTOM_EVENT"
    }
    fn description(&self) -> &str {
        "CUSTOM name requirements and RAW non-null payload"
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
            Event::Custom { name, .. } => {
                if name.is_empty() {
                    out.push(ValidationError::new(
                        self.id(),
                        self.default_severity(),
                        "CUSTOM requires a non-empty name",
                    ));
                } else if RESERVED_CUSTOM_NAMES.contains(&name.to_ascii_lowercase().as_str()) {
                    out.push(ValidationError::new(
                        self.id(),
                        Severity::Warning,
                        format!("CUSTOM name {name:?} is reserved"),
                    ));
                }
            }
            Event::Raw { event: raw, .. } => {
                if raw.is_null() {
                    out.push(ValidationError::new(
                        self.id(),
                        self.default_severity(),
                        "RAW event payload must not be null",
                    ));
                }
            }
            _ => {}
        }
        out
    }
}
