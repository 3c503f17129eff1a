// SPDX-License-Identifier: MIT OR Apache-2.0
//! The process-wide default [`Validator`], for callers that don't want to
//! thread an explicit instance through module-level helpers (spec §5, §9:
//! "the only globally mutable resource is an optional process-wide default
//! validator ... replaceable atomically and readable lock-free once
//! installed").
//!
//! New code should prefer constructing and passing a [`Validator`]
//! explicitly; this exists for call sites (scripts, REPLs, quick checks)
//! that don't have one to hand.

use std::sync::{Arc, OnceLock, RwLock};

use agui_core::Event;

use crate::result::ValidationResult;
use crate::validator::Validator;

static DEFAULT: OnceLock<RwLock<Arc<Validator>>> = OnceLock::new();

/// Install `validator` as the process-wide default, replacing whatever was
/// installed before. Safe to call from any thread at any time; readers
/// never observe a torn or partially-replaced handle.
pub fn install_default_validator(validator: Validator) {
    let handle = Arc::new(validator);
    match DEFAULT.get() {
        Some(slot) => *slot.write().unwrap() = handle,
        None => {
            let _ = DEFAULT.set(RwLock::new(handle));
        }
    }
}

/// The current process-wide default validator, lazily initialized to
/// [`Validator::strict`] on first access if nothing was installed.
#[must_use]
pub fn default_validator() -> Arc<Validator> {
    Arc::clone(&DEFAULT.get_or_init(|| RwLock::new(Arc::new(Validator::strict()))).read().unwrap())
}

/// Tear down the default validator, reinstalling a fresh `STRICT` instance.
/// Intended for test isolation between cases that install their own
/// default.
pub fn reset_default_validator() {
    install_default_validator(Validator::strict());
}

/// `default_validator().validate_event(event)` — a module-level
/// convenience for callers without their own [`Validator`] handle.
pub fn validate_event(event: &Event) -> ValidationResult {
    default_validator().validate_event(event)
}

/// `default_validator().validate_sequence(events)`.
pub fn validate_sequence(events: &[Event]) -> ValidationResult {
    default_validator().validate_sequence(events)
}
