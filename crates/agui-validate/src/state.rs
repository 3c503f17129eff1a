// SPDX-License-Identifier: MIT OR Apache-2.0
//! [`ValidationState`]: the mutable state machine a [`crate::Validator`] owns.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use agui_core::Event;
use serde::Serialize;

/// Overall run-lifecycle phase, derived from the most recent run
/// start/finish/error (spec §3 invariant 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Phase {
    /// No run has started yet.
    #[default]
    Init,
    /// At least one run has started and none has terminated since.
    Running,
    /// The most recent run terminated via `RUN_FINISHED`.
    Finished,
    /// The most recent run terminated via `RUN_ERROR`.
    Error,
}

/// Per-run tracked state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunState {
    /// The run's id.
    pub run_id: String,
    /// The thread id the run started under, if known (absent for a run
    /// that terminated via `RUN_ERROR` with no prior `RUN_STARTED`).
    pub thread_id: Option<String>,
    /// Number of `STEP_STARTED` events observed while this run was active.
    pub step_count: u64,
}

/// Per-message tracked state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageState {
    /// The message's id.
    pub message_id: String,
    /// The role supplied on `TEXT_MESSAGE_START`, if any.
    pub role: Option<String>,
    /// Whether the message is still between start and end.
    pub is_active: bool,
    /// Number of `TEXT_MESSAGE_CONTENT` events observed.
    pub content_count: u64,
}

/// Per-tool-call tracked state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolState {
    /// The tool call's id.
    pub tool_call_id: String,
    /// The tool name supplied on `TOOL_CALL_START`.
    pub tool_name: String,
    /// The parent message id, if any.
    pub parent_message_id: Option<String>,
    /// Whether the tool call is still between start and end.
    pub is_active: bool,
    /// Number of `TOOL_CALL_ARGS` events observed.
    pub args_count: u64,
}

/// The validator's mutable state machine (spec §3).
///
/// Invariants, upheld between any two successful `update_state` calls:
/// 1. For each identifier, membership in `active_*` and `finished_*` is
///    disjoint.
/// 2. A finished run never re-enters `active_runs`.
/// 3. `phase == Running` iff at least one run has started and none has
///    terminated since; `Finished`/`Error` reflect the most recent
///    termination.
/// 4. `event_count` equals the number of successful `update_state` calls.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationState {
    /// Current run-lifecycle phase.
    pub current_phase: Phase,
    /// Runs that have started but not yet terminated.
    pub active_runs: HashMap<String, RunState>,
    /// Runs that have terminated (via finish or error).
    pub finished_runs: HashMap<String, RunState>,
    /// Messages currently between start and end.
    pub active_messages: HashMap<String, MessageState>,
    /// Messages that have ended.
    pub finished_messages: HashMap<String, MessageState>,
    /// Tool calls currently between start and end.
    pub active_tools: HashMap<String, ToolState>,
    /// Tool calls that have ended.
    pub finished_tools: HashMap<String, ToolState>,
    /// Names of steps currently between start and finish.
    pub active_steps: HashSet<String>,
    /// Number of events successfully committed.
    pub event_count: u64,
    /// Wall-clock time of the first committed event, if any.
    #[serde(skip)]
    pub start_time: Option<Instant>,
    /// Wall-clock time of the most recently committed event.
    #[serde(skip)]
    pub last_event_time: Option<Instant>,
}

impl ValidationState {
    /// A fresh, empty state: `Init` phase, all maps empty, zero events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to a fresh, empty state in place.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Apply the state-transition table from spec §4.4 for `event`. Callers
    /// (the [`crate::Validator`]) must only invoke this after a validation
    /// pass produced zero errors — this method performs no validation of
    /// its own and always "succeeds" in the sense of mutating state, which
    /// is why the validator gates the call rather than this function.
    pub fn update_state(&mut self, event: &Event) {
        let now = Instant::now();
        if self.start_time.is_none() {
            self.start_time = Some(now);
        }
        self.last_event_time = Some(now);
        self.event_count += 1;

        match event {
            Event::RunStarted {
                thread_id, run_id, ..
            } => {
                self.active_runs.insert(
                    run_id.clone(),
                    RunState {
                        run_id: run_id.clone(),
                        thread_id: Some(thread_id.clone()),
                        step_count: 0,
                    },
                );
                self.current_phase = Phase::Running;
            }
            Event::RunFinished { run_id, .. } => {
                if let Some(run) = self.active_runs.remove(run_id) {
                    self.finished_runs.insert(run_id.clone(), run);
                } else {
                    self.finished_runs.insert(
                        run_id.clone(),
                        RunState {
                            run_id: run_id.clone(),
                            thread_id: None,
                            step_count: 0,
                        },
                    );
                }
                self.current_phase = Phase::Finished;
            }
            Event::RunError { run_id, .. } => {
                if let Some(run_id) = run_id {
                    if let Some(run) = self.active_runs.remove(run_id) {
                        self.finished_runs.insert(run_id.clone(), run);
                    } else {
                        self.finished_runs.insert(
                            run_id.clone(),
                            RunState {
                                run_id: run_id.clone(),
                                thread_id: None,
                                step_count: 0,
                            },
                        );
                    }
                }
                self.current_phase = Phase::Error;
            }
            Event::StepStarted { step_name, .. } => {
                self.active_steps.insert(step_name.clone());
                for run in self.active_runs.values_mut() {
                    run.step_count += 1;
                }
            }
            Event::StepFinished { step_name, .. } => {
                self.active_steps.remove(step_name);
            }
            Event::TextMessageStart { message_id, role, .. } => {
                self.active_messages.insert(
                    message_id.clone(),
                    MessageState {
                        message_id: message_id.clone(),
                        role: role.clone(),
                        is_active: true,
                        content_count: 0,
                    },
                );
            }
            Event::TextMessageContent { message_id, .. } => {
                if let Some(m) = self.active_messages.get_mut(message_id) {
                    m.content_count += 1;
                }
            }
            Event::TextMessageEnd { message_id, .. } => {
                if let Some(mut m) = self.active_messages.remove(message_id) {
                    m.is_active = false;
                    self.finished_messages.insert(message_id.clone(), m);
                }
            }
            Event::ToolCallStart {
                tool_call_id,
                tool_call_name,
                parent_message_id,
                ..
            } => {
                self.active_tools.insert(
                    tool_call_id.clone(),
                    ToolState {
                        tool_call_id: tool_call_id.clone(),
                        tool_name: tool_call_name.clone(),
                        parent_message_id: parent_message_id.clone(),
                        is_active: true,
                        args_count: 0,
                    },
                );
            }
            Event::ToolCallArgs { tool_call_id, .. } => {
                if let Some(t) = self.active_tools.get_mut(tool_call_id) {
                    t.args_count += 1;
                }
            }
            Event::ToolCallEnd { tool_call_id, .. } => {
                if let Some(mut t) = self.active_tools.remove(tool_call_id) {
                    t.is_active = false;
                    self.finished_tools.insert(tool_call_id.clone(), t);
                }
            }
            Event::StateSnapshot { .. }
            | Event::StateDelta { .. }
            | Event::MessagesSnapshot { .. }
            | Event::Raw { .. }
            | Event::Custom { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_started_then_finished_moves_active_to_finished() {
        let mut state = ValidationState::new();
        state.update_state(&Event::run_started("t1", "r1"));
        assert_eq!(state.current_phase, Phase::Running);
        assert!(state.active_runs.contains_key("r1"));
        state.update_state(&Event::run_finished("t1", "r1"));
        assert_eq!(state.current_phase, Phase::Finished);
        assert!(!state.active_runs.contains_key("r1"));
        assert!(state.finished_runs.contains_key("r1"));
        assert_eq!(state.event_count, 2);
    }

    #[test]
    fn active_and_finished_are_disjoint_for_messages() {
        let mut state = ValidationState::new();
        state.update_state(&Event::text_message_start("m1", None));
        state.update_state(&Event::text_message_content("m1", "hi"));
        state.update_state(&Event::text_message_end("m1"));
        assert!(!state.active_messages.contains_key("m1"));
        assert_eq!(state.finished_messages["m1"].content_count, 1);
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = ValidationState::new();
        state.update_state(&Event::run_started("t", "r"));
        state.reset();
        assert_eq!(state.event_count, 0);
        assert_eq!(state.current_phase, Phase::Init);
        assert!(state.active_runs.is_empty());
    }

    #[test]
    fn step_started_increments_step_count_on_active_runs() {
        let mut state = ValidationState::new();
        state.update_state(&Event::run_started("t", "r"));
        state.update_state(&Event::step_started("plan"));
        assert_eq!(state.active_runs["r"].step_count, 1);
    }
}
