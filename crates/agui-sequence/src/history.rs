// SPDX-License-Identifier: MIT OR Apache-2.0
//! Summary statistics over a tracker's retained history.

use std::collections::VecDeque;

use agui_core::{Event, EventKind};
use serde::Serialize;

/// Snapshot summary of a [`crate::SequenceTracker`]'s current history.
#[derive(Debug, Clone, Serialize)]
pub struct SequenceInfo {
    /// Number of events currently retained.
    pub event_count: usize,
    /// Configured maximum; `event_count == capacity` means eviction has
    /// started (or is about to).
    pub capacity: usize,
    /// Counts of retained events by kind.
    pub counts_by_kind: Vec<(EventKind, u64)>,
    /// Timestamp of the oldest retained event, if any carried one.
    pub earliest_timestamp: Option<i64>,
    /// Timestamp of the newest retained event, if any carried one.
    pub latest_timestamp: Option<i64>,
}

pub(crate) fn sequence_info(history: &VecDeque<Event>, capacity: usize) -> SequenceInfo {
    let mut counts = std::collections::BTreeMap::new();
    for event in history {
        *counts.entry(event.kind()).or_insert(0u64) += 1;
    }
    SequenceInfo {
        event_count: history.len(),
        capacity,
        counts_by_kind: counts.into_iter().collect(),
        earliest_timestamp: history.front().and_then(Event::timestamp),
        latest_timestamp: history.back().and_then(Event::timestamp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_kind_tally_retained_events() {
        let mut history = VecDeque::new();
        history.push_back(Event::run_started("t", "r"));
        history.push_back(Event::run_finished("t", "r"));
        let info = sequence_info(&history, 10);
        assert_eq!(info.event_count, 2);
        assert_eq!(info.counts_by_kind.len(), 2);
    }
}
