// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
#![warn(missing_docs)]
//! Canonical event model for the AG-UI protocol: the sixteen event kinds,
//! their payload contracts, JSON-Patch operations, chat messages, auto-id
//! generation, and the fluent [`builder::EventBuilder`].
//!
//! This crate owns the *shape* of an event and its construction-time
//! validity. Wire encoding lives in `agui-protocol`; streaming conformance
//! (ordering, lifecycle, sequencing across many events) lives in
//! `agui-validate`.

pub mod builder;
pub mod event;
pub mod id;
pub mod kind;
pub mod message;
pub mod patch;

pub use builder::EventBuilder;
pub use event::{Event, EventBase, EventError};
pub use id::{
    generate_id, generate_message_id, generate_run_id, generate_step_name,
    generate_thread_id, generate_tool_call_id,
};
pub use kind::EventKind;
pub use message::{FunctionCall, Message, ToolCall};
pub use patch::JsonPatchOperation;
