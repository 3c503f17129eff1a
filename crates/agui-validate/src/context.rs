// SPDX-License-Identifier: MIT OR Apache-2.0
//! [`ValidationContext`] and [`CancellationToken`]: what a rule sees beyond
//! the event it's checking, and how long-running sequence validation can be
//! cut short (spec §5).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use agui_core::Event;

use crate::config::ValidatorFlags;

/// Everything a [`crate::Rule`] can see besides the event and the mutable
/// [`crate::ValidationState`]: its position in the sequence, the full
/// sequence (for rules that need neighbors), and the active flags.
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Zero-based index of the event being validated within
    /// [`Self::event_sequence`].
    pub event_index: usize,
    /// The full sequence this event belongs to. For an isolated
    /// `validate_event` call this is a single-element slice containing
    /// just that event.
    pub event_sequence: &'a [Event],
    /// Active validator flags.
    pub flags: ValidatorFlags,
    /// See [`crate::Validator::validate_isolated_event`]: when `true`, the
    /// `EVENT_ORDERING` rule's "first event must be `RUN_STARTED`" check is
    /// skipped even though `event_index == 0`. This resolves the spec's
    /// first open design question (§9) in favor of option (a): a distinct
    /// entry point rather than silently changing `validate_event`'s
    /// long-standing conflated behavior.
    pub skip_ordering: bool,
}

impl<'a> ValidationContext<'a> {
    /// Build a context for validating a single event outside of a sequence.
    #[must_use]
    pub fn isolated(event: &'a Event, flags: ValidatorFlags, skip_ordering: bool) -> Self {
        Self {
            event_index: 0,
            event_sequence: std::slice::from_ref(event),
            flags,
            skip_ordering,
        }
    }

    /// Build a context for validating the event at `event_index` within
    /// `event_sequence`.
    #[must_use]
    pub fn in_sequence(
        event_index: usize,
        event_sequence: &'a [Event],
        flags: ValidatorFlags,
    ) -> Self {
        Self {
            event_index,
            event_sequence,
            flags,
            skip_ordering: false,
        }
    }

    /// The event immediately preceding this one in the sequence, if any.
    #[must_use]
    pub fn previous_event(&self) -> Option<&'a Event> {
        self.event_index.checked_sub(1).and_then(|i| self.event_sequence.get(i))
    }
}

/// A cheaply cloneable flag a caller can flip from another thread to cut a
/// long-running `validate_sequence` short. The method returns promptly with
/// whatever results were collected so far.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A fresh, not-yet-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether [`Self::cancel`] has been called on this token or a clone of it.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
