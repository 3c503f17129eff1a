// SPDX-License-Identifier: MIT OR Apache-2.0
//! [`ValidatorConfig`]: level, flags, and custom validators for a [`crate::Validator`].

use std::sync::Arc;

use crate::rule::Rule;

/// Overall strictness preset (spec §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationLevel {
    /// Requires timestamps and runs all default rules at their default
    /// severities.
    #[default]
    Strict,
    /// Relaxes ID-presence and timestamp requirements; still enforces kind
    /// and payload constraints needed for safety.
    Permissive,
    /// Runs only the user-supplied rule list; no default rules are added.
    Custom,
}

/// Fine-grained toggles layered on top of [`ValidationLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorFlags {
    /// Skip `TIMESTAMP_VALIDATION`.
    pub skip_timestamp_validation: bool,
    /// Skip `EVENT_ORDERING`/`EVENT_SEQUENCE` rules.
    pub skip_sequence_validation: bool,
    /// Skip `ID_FORMAT`/field-shape rules beyond the mandatory ones.
    pub skip_field_validation: bool,
    /// Treat an empty identifier as acceptable rather than an `ID_FORMAT`
    /// violation.
    pub allow_empty_ids: bool,
    /// Treat an otherwise-unparseable event kind as ignorable rather than
    /// an error (only consulted by external decoders; the closed
    /// [`agui_core::EventKind`] enumeration means this never applies to
    /// events already decoded into an [`agui_core::Event`]).
    pub allow_unknown_event_types: bool,
}

impl ValidatorFlags {
    /// Flags matching [`ValidationLevel::Strict`]: nothing relaxed.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            skip_timestamp_validation: false,
            skip_sequence_validation: false,
            skip_field_validation: false,
            allow_empty_ids: false,
            allow_unknown_event_types: false,
        }
    }

    /// Flags matching [`ValidationLevel::Permissive`].
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            skip_timestamp_validation: true,
            skip_sequence_validation: false,
            skip_field_validation: false,
            allow_empty_ids: true,
            allow_unknown_event_types: true,
        }
    }
}

impl Default for ValidatorFlags {
    fn default() -> Self {
        Self::strict()
    }
}

/// Configuration for a [`crate::Validator`].
#[derive(Clone)]
pub struct ValidatorConfig {
    /// Strictness preset; seeds [`Self::flags`] if not overridden.
    pub level: ValidationLevel,
    /// Fine-grained toggles.
    pub flags: ValidatorFlags,
    /// Additional rules run after the built-in default rule set (or, under
    /// [`ValidationLevel::Custom`], the only rules run at all).
    pub custom_validators: Vec<Arc<dyn Rule>>,
}

impl ValidatorConfig {
    /// `STRICT` level with no custom validators.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            level: ValidationLevel::Strict,
            flags: ValidatorFlags::strict(),
            custom_validators: Vec::new(),
        }
    }

    /// `PERMISSIVE` level with no custom validators.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            level: ValidationLevel::Permissive,
            flags: ValidatorFlags::permissive(),
            custom_validators: Vec::new(),
        }
    }

    /// `CUSTOM` level running only `validators`.
    #[must_use]
    pub fn custom(validators: Vec<Arc<dyn Rule>>) -> Self {
        Self {
            level: ValidationLevel::Custom,
            flags: ValidatorFlags::strict(),
            custom_validators: validators,
        }
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::strict()
    }
}
