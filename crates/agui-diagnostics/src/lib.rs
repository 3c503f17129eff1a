// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
#![warn(missing_docs)]
//! Builds human-facing [`ErrorReport`]s from a
//! [`agui_validate::ValidationResult`] and renders them to JSON, plain
//! text, or markdown (spec §4.7).

mod recommend;
mod render;
mod report;

pub use recommend::Recommendation;
pub use report::{EnhancedError, ErrorReport, GroupedError, ReportSummary};

use agui_core::Event;
use agui_validate::{ValidationMetrics, ValidationResult};

/// Output format for [`ErrorReporter::format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Pretty-printed JSON.
    Json,
    /// Plain, unstyled text.
    Text,
    /// GitHub-flavored markdown.
    Markdown,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(ReportFormat::Json),
            "text" => Ok(ReportFormat::Text),
            "markdown" => Ok(ReportFormat::Markdown),
            other => Err(format!("unknown report format {other:?}, expected json, text, or markdown")),
        }
    }
}

/// Stateless builder of [`ErrorReport`]s from validation results.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorReporter {
    /// Include the offending event's JSON payload in each enhanced error.
    pub verbose: bool,
}

impl ErrorReporter {
    /// A reporter with `verbose` off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A reporter that includes the offending event's JSON payload in
    /// every enhanced error.
    #[must_use]
    pub fn verbose() -> Self {
        Self { verbose: true }
    }

    /// Build a full report from `result`, optionally enriched with the
    /// event sequence it was produced against (for previous/next event
    /// context) and accumulated metrics.
    #[must_use]
    pub fn generate_report(
        &self,
        result: &ValidationResult,
        events: Option<&[Event]>,
        metrics: Option<&ValidationMetrics>,
    ) -> ErrorReport {
        report::build(self, result, events, metrics)
    }

    /// Render a previously built report to the given format.
    #[must_use]
    pub fn format(&self, report: &ErrorReport, format: ReportFormat) -> String {
        match format {
            ReportFormat::Json => render::to_json(report),
            ReportFormat::Text => render::to_text(report),
            ReportFormat::Markdown => render::to_markdown(report),
        }
    }
}

pub(crate) fn environment_tags() -> Vec<(String, String)> {
    vec![
        ("os".to_string(), std::env::consts::OS.to_string()),
        ("arch".to_string(), std::env::consts::ARCH.to_string()),
        ("agui_version".to_string(), env!("CARGO_PKG_VERSION").to_string()),
    ]
}

pub(crate) fn nearby_context<'a>(
    events: Option<&'a [Event]>,
    event_id: Option<&str>,
) -> (Option<&'a Event>, Option<&'a Event>) {
    let (Some(events), Some(id)) = (events, event_id) else {
        return (None, None);
    };
    let Some(index) = events.iter().position(|e| event_primary_id(e).as_deref() == Some(id)) else {
        return (None, None);
    };
    let previous = index.checked_sub(1).and_then(|i| events.get(i));
    let next = events.get(index + 1);
    (previous, next)
}

/// Best-effort extraction of the entity id an event is primarily about,
/// matching the ids rules attach via `ValidationError::with_event`.
pub(crate) fn event_primary_id(event: &Event) -> Option<String> {
    match event {
        Event::RunStarted { run_id, .. } | Event::RunFinished { run_id, .. } => Some(run_id.clone()),
        Event::RunError { run_id, .. } => run_id.clone(),
        Event::StepStarted { step_name, .. } | Event::StepFinished { step_name, .. } => Some(step_name.clone()),
        Event::TextMessageStart { message_id, .. }
        | Event::TextMessageContent { message_id, .. }
        | Event::TextMessageEnd { message_id, .. } => Some(message_id.clone()),
        Event::ToolCallStart { tool_call_id, .. }
        | Event::ToolCallArgs { tool_call_id, .. }
        | Event::ToolCallEnd { tool_call_id, .. } => Some(tool_call_id.clone()),
        Event::StateSnapshot { .. } | Event::StateDelta { .. } | Event::MessagesSnapshot { .. } => None,
        Event::Raw { .. } => None,
        Event::Custom { name, .. } => Some(name.clone()),
    }
}
