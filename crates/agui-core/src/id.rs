// SPDX-License-Identifier: MIT OR Apache-2.0
//! Auto-generated identifiers for [`crate::builder::EventBuilder`].
//!
//! Generated ids are short opaque strings: a per-kind prefix followed by a
//! UUIDv4's hex digits (122 bits of entropy, comfortably above the ≥64-bit
//! floor). The prefix is the only deterministic part of the id; callers must
//! never parse structure out of the random suffix.

use uuid::Uuid;

/// Generate an id of the form `<prefix><32 hex digits>`, e.g. `run-3fa85f...`.
#[must_use]
pub fn generate_id(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + 32);
    out.push_str(prefix);
    out.push_str(&Uuid::new_v4().simple().to_string());
    out
}

/// Generate a run id (`run-` prefix).
#[must_use]
pub fn generate_run_id() -> String {
    generate_id("run-")
}

/// Generate a thread id (`thread-` prefix).
#[must_use]
pub fn generate_thread_id() -> String {
    generate_id("thread-")
}

/// Generate a message id (`msg-` prefix).
#[must_use]
pub fn generate_message_id() -> String {
    generate_id("msg-")
}

/// Generate a tool-call id (`tool-` prefix).
#[must_use]
pub fn generate_tool_call_id() -> String {
    generate_id("tool-")
}

/// Generate a step name (`step-` prefix). Step names are not otherwise
/// structured, but the builder treats an unset step name as auto-generable
/// like the other identifier kinds.
#[must_use]
pub fn generate_step_name() -> String {
    generate_id("step-")
}
