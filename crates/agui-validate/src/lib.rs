// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
#![warn(missing_docs)]
//! Stateful streaming conformance validator for AG-UI event sequences: a
//! deterministic state machine (active/finished runs, messages, tool
//! calls, steps) driven by a pluggable, deterministically ordered rule
//! engine, with severities, metrics, and rich diagnostics (spec §4.4).
//!
//! This crate owns *sequence-level* conformance. Cross-sequence,
//! order-independent structural checks (orphans, duplicates,
//! incompleteness) live in `agui-id-tracker`; ring-buffered history and
//! compliance reporting live in `agui-sequence`.

pub mod config;
pub mod context;
pub mod default;
pub mod error;
pub mod metrics;
pub mod result;
pub mod rule;
pub mod rules;
pub mod severity;
pub mod state;
pub mod validator;

pub use config::{ValidationLevel, ValidatorConfig, ValidatorFlags};
pub use context::{CancellationToken, ValidationContext};
pub use default::{default_validator, install_default_validator, reset_default_validator};
pub use error::ValidationError;
pub use metrics::ValidationMetrics;
pub use result::ValidationResult;
pub use rule::Rule;
pub use severity::Severity;
pub use state::{MessageState, Phase, RunState, ToolState, ValidationState};
pub use validator::Validator;
