//! Current and all-time streaks over the day records.
//!
//! A streak is a run of qualifying records counted backward from the most
//! recent date in the store. Only dates that are present are inspected: an
//! unrecorded calendar day between two qualifying records does not break the
//! run.

use crate::history::{DayRecord, HistoryStore};
use serde::{Deserialize, Serialize};

/// Minimum completion rate for a day to count.
pub const COMPLETION_THRESHOLD: f64 = 0.6;

/// Alternatively, a day counts when at least this many prayers were done.
pub const PRAYER_THRESHOLD: u32 = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    pub streak: u32,
    pub max_streak: u32,
}

pub fn qualifies(record: &DayRecord) -> bool {
    record.completion_rate() >= COMPLETION_THRESHOLD || record.prayers_done() >= PRAYER_THRESHOLD
}

/// Length of the qualifying run ending at the most recent present date.
pub fn current_streak(history: &HistoryStore) -> u32 {
    history
        .records()
        .rev()
        .take_while(|(_, rec)| qualifies(rec))
        .count() as u32
}

/// Compute the current streak and ratchet the store's longest streak up to it.
pub fn compute(history: &mut HistoryStore) -> StreakSummary {
    let streak = current_streak(history);
    let max_streak = history.ratchet_longest(streak);
    StreakSummary { streak, max_streak }
}
