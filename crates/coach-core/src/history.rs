//! Per-day completion records keyed by ISO date.
//!
//! `HistoryStore` is the serialisable value: the `byDate` map plus the
//! ratcheting `longestStreak`. `DayRecordStore` binds a store to its file
//! and saves the whole store after every mutation.

use crate::error::{CoachError, Result};
use crate::paths;
use crate::plan::Task;
use crate::streak::{self, StreakSummary};
use crate::summary::{self, RollingSummary, SummaryWindow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Upper bound of `prayersDone`; the checklist has five daily prayers.
pub const MAX_PRAYERS: u32 = 5;

/// Round to two decimals, the precision rates are stored at.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// DayRecord
// ---------------------------------------------------------------------------

/// Completion state for one calendar day.
///
/// `points` and `completion_rate` are derived from `done` and the plan's task
/// list on every toggle; they have no setters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    #[serde(default)]
    pub(crate) done: BTreeMap<String, bool>,
    #[serde(default)]
    pub(crate) points: u32,
    #[serde(default)]
    pub(crate) completion_rate: f64,
    #[serde(default)]
    pub(crate) prayers_done: u32,
}

impl DayRecord {
    pub fn done(&self) -> &BTreeMap<String, bool> {
        &self.done
    }

    pub fn is_done(&self, task_id: &str) -> bool {
        self.done.get(task_id).copied().unwrap_or(false)
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn completion_rate(&self) -> f64 {
        self.completion_rate
    }

    pub fn prayers_done(&self) -> u32 {
        self.prayers_done
    }

    /// Number of tasks in `tasks` flagged done.
    pub fn done_count(&self, tasks: &[Task]) -> usize {
        tasks.iter().filter(|t| self.is_done(&t.id)).count()
    }

    fn recompute(&mut self, tasks: &[Task]) {
        self.points = tasks
            .iter()
            .filter(|t| self.is_done(&t.id))
            .fold(0u32, |acc, t| acc.saturating_add(t.points));
        // Only flags for tasks on the list count, so the rate stays within [0, 1]
        // even if an earlier plan for the same date left other ids behind.
        self.completion_rate = if tasks.is_empty() {
            0.0
        } else {
            round2(self.done_count(tasks) as f64 / tasks.len() as f64)
        };
    }
}

// ---------------------------------------------------------------------------
// HistoryStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStore {
    #[serde(default)]
    pub(crate) by_date: BTreeMap<String, DayRecord>,
    #[serde(default)]
    pub(crate) longest_streak: u32,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn get(&self, date: &str) -> Option<&DayRecord> {
        self.by_date.get(date)
    }

    /// Dates in ascending order; ISO keys sort chronologically.
    pub fn dates(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.by_date.keys().map(String::as_str)
    }

    /// `(date, record)` pairs in ascending date order.
    pub fn records(&self) -> impl DoubleEndedIterator<Item = (&str, &DayRecord)> + ExactSizeIterator {
        self.by_date.iter().map(|(d, r)| (d.as_str(), r))
    }

    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    /// Raise `longestStreak` to `candidate` if larger. Never lowers it.
    pub(crate) fn ratchet_longest(&mut self, candidate: u32) -> u32 {
        self.longest_streak = self.longest_streak.max(candidate);
        self.longest_streak
    }

    pub fn get_or_create(&mut self, date: &str) -> &mut DayRecord {
        self.by_date.entry(date.to_string()).or_default()
    }

    /// Set one task flag and recompute points and completion rate from
    /// scratch against `tasks`.
    pub fn set_task_done(
        &mut self,
        date: &str,
        task_id: &str,
        is_done: bool,
        tasks: &[Task],
    ) -> &DayRecord {
        let record = self.get_or_create(date);
        record.done.insert(task_id.to_string(), is_done);
        record.recompute(tasks);
        record
    }

    pub fn set_prayers_done(&mut self, date: &str, count: u32) -> Result<&DayRecord> {
        if count > MAX_PRAYERS {
            return Err(CoachError::PrayerCountOutOfRange(count));
        }
        let record = self.get_or_create(date);
        record.prayers_done = count;
        Ok(record)
    }

    /// Remove a day entirely. `longestStreak` is left untouched.
    pub fn delete(&mut self, date: &str) -> Option<DayRecord> {
        self.by_date.remove(date)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load from `path`. A missing, unreadable or corrupt file yields an
    /// empty store rather than an error.
    pub fn load_or_default(path: &Path) -> Self {
        let text = match crate::io::read_optional(path) {
            Ok(Some(text)) => text,
            Ok(None) => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "history store unreadable, starting empty");
                return Self::default();
            }
        };
        match Self::from_json(&text) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "history store corrupt, starting empty");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        crate::io::atomic_write(path, self.to_json()?.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// DayRecordStore
// ---------------------------------------------------------------------------

/// A `HistoryStore` bound to `<root>/.coach/history-store.json`.
///
/// Every mutating call is followed by a full-store save.
#[derive(Debug)]
pub struct DayRecordStore {
    path: PathBuf,
    history: HistoryStore,
}

impl DayRecordStore {
    pub fn open(root: &Path) -> Self {
        let path = paths::history_path(root);
        let history = HistoryStore::load_or_default(&path);
        tracing::debug!(days = history.len(), "history store loaded");
        Self { path, history }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn get(&self, date: &str) -> Option<&DayRecord> {
        self.history.get(date)
    }

    pub fn get_or_create(&mut self, date: &str) -> Result<DayRecord> {
        paths::validate_date_key(date)?;
        let record = self.history.get_or_create(date).clone();
        self.save()?;
        Ok(record)
    }

    pub fn set_task_done(
        &mut self,
        date: &str,
        task_id: &str,
        is_done: bool,
        tasks: &[Task],
    ) -> Result<DayRecord> {
        paths::validate_date_key(date)?;
        let record = self
            .history
            .set_task_done(date, task_id, is_done, tasks)
            .clone();
        self.save()?;
        Ok(record)
    }

    pub fn set_prayers_done(&mut self, date: &str, count: u32) -> Result<DayRecord> {
        paths::validate_date_key(date)?;
        let record = self.history.set_prayers_done(date, count)?.clone();
        self.save()?;
        Ok(record)
    }

    /// Remove `date`; returns whether a record existed.
    pub fn delete(&mut self, date: &str) -> Result<bool> {
        let existed = self.history.delete(date).is_some();
        self.save()?;
        Ok(existed)
    }

    /// Current and longest streak. Persists the store when the ratchet moved.
    pub fn streak(&mut self) -> Result<StreakSummary> {
        let before = self.history.longest_streak();
        let summary = streak::compute(&mut self.history);
        if summary.max_streak != before {
            self.save()?;
        }
        Ok(summary)
    }

    pub fn summarize(&mut self, today: NaiveDate, window: SummaryWindow) -> Result<RollingSummary> {
        let before = self.history.longest_streak();
        let summary = summary::summarize(&mut self.history, today, window);
        if summary.max_streak != before {
            self.save()?;
        }
        Ok(summary)
    }

    fn save(&self) -> Result<()> {
        self.history.save(&self.path)?;
        tracing::debug!(path = %self.path.display(), days = self.history.len(), "history store saved");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tasks() -> Vec<Task> {
        vec![
            Task::new("a", "Warm up", 5),
            Task::new("b", "Quick win", 10),
            Task::new("c", "Deep work", 20),
        ]
    }

    fn expected(store: &HistoryStore, date: &str, tasks: &[Task]) -> (u32, f64) {
        let rec = store.get(date).unwrap();
        let done: Vec<&Task> = tasks.iter().filter(|t| rec.is_done(&t.id)).collect();
        let points = done.iter().map(|t| t.points).sum();
        let rate = if tasks.is_empty() {
            0.0
        } else {
            round2(done.len() as f64 / tasks.len() as f64)
        };
        (points, rate)
    }

    #[test]
    fn get_or_create_inserts_empty_record() {
        let mut store = HistoryStore::new();
        let rec = store.get_or_create("2024-01-01").clone();
        assert_eq!(rec, DayRecord::default());
        assert_eq!(store.len(), 1);
        store.get_or_create("2024-01-01");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn huge_point_values_saturate() {
        let tasks = vec![Task::new("big", "Huge", u32::MAX), Task::new("one", "Tiny", 1)];
        let mut store = HistoryStore::new();
        store.set_task_done("2024-01-01", "big", true, &tasks);
        let rec = store.set_task_done("2024-01-01", "one", true, &tasks);
        assert_eq!(rec.points(), u32::MAX);
        assert_eq!(rec.completion_rate(), 1.0);

        let rec = store.set_task_done("2024-01-01", "big", false, &tasks);
        assert_eq!(rec.points(), 1);
    }

    #[test]
    fn toggles_never_drift_from_recomputation() {
        let tasks = tasks();
        let mut store = HistoryStore::new();
        let sequence = [
            ("a", true),
            ("c", true),
            ("a", false),
            ("b", true),
            ("b", true),
            ("c", false),
            ("a", true),
            ("c", true),
        ];
        for (id, done) in sequence {
            let rec = store.set_task_done("2024-01-01", id, done, &tasks).clone();
            let (points, rate) = expected(&store, "2024-01-01", &tasks);
            assert_eq!(rec.points(), points);
            assert_eq!(rec.completion_rate(), rate);
        }
        let rec = store.get("2024-01-01").unwrap();
        assert_eq!(rec.points(), 35);
        assert_eq!(rec.completion_rate(), 1.0);
    }

    #[test]
    fn completion_rate_rounds_to_two_decimals() {
        let tasks = tasks();
        let mut store = HistoryStore::new();
        let rec = store.set_task_done("2024-01-01", "a", true, &tasks);
        assert_eq!(rec.completion_rate(), 0.33);
        let rec = store.set_task_done("2024-01-01", "b", true, &tasks);
        assert_eq!(rec.completion_rate(), 0.67);
    }

    #[test]
    fn same_toggle_twice_is_idempotent() {
        let tasks = tasks();
        let mut store = HistoryStore::new();
        let first = store.set_task_done("2024-01-01", "b", true, &tasks).clone();
        let second = store.set_task_done("2024-01-01", "b", true, &tasks).clone();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_task_list_means_zero_rate() {
        let mut store = HistoryStore::new();
        let rec = store.set_task_done("2024-01-01", "ghost", true, &[]);
        assert_eq!(rec.completion_rate(), 0.0);
        assert_eq!(rec.points(), 0);
        assert!(rec.is_done("ghost"));
    }

    #[test]
    fn prayers_set_directly_and_bounded() {
        let mut store = HistoryStore::new();
        assert_eq!(store.set_prayers_done("2024-01-01", 4).unwrap().prayers_done(), 4);
        assert!(matches!(
            store.set_prayers_done("2024-01-01", 6),
            Err(CoachError::PrayerCountOutOfRange(6))
        ));
        assert_eq!(store.get("2024-01-01").unwrap().prayers_done(), 4);
    }

    #[test]
    fn delete_keeps_longest_streak() {
        let mut store = HistoryStore::new();
        store.get_or_create("2024-01-01");
        store.ratchet_longest(3);
        assert!(store.delete("2024-01-01").is_some());
        assert!(store.delete("2024-01-01").is_none());
        assert_eq!(store.longest_streak(), 3);
    }

    #[test]
    fn json_roundtrip_is_identical() {
        let tasks = tasks();
        let mut store = HistoryStore::new();
        store.set_task_done("2024-01-01", "a", true, &tasks);
        store.set_task_done("2024-01-02", "c", true, &tasks);
        store.set_prayers_done("2024-01-02", 5).unwrap();
        store.ratchet_longest(2);
        let text = store.to_json().unwrap();
        assert_eq!(HistoryStore::from_json(&text).unwrap(), store);
    }

    #[test]
    fn durable_form_uses_camel_case_field_names() {
        let mut store = HistoryStore::new();
        store.set_prayers_done("2024-01-01", 2).unwrap();
        let value: serde_json::Value = serde_json::from_str(&store.to_json().unwrap()).unwrap();
        let day = &value["byDate"]["2024-01-01"];
        assert_eq!(day["prayersDone"], 2);
        assert_eq!(day["completionRate"], 0.0);
        assert_eq!(value["longestStreak"], 0);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::load_or_default(&dir.path().join("nope.json"));
        assert_eq!(store, HistoryStore::default());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history-store.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(HistoryStore::load_or_default(&path), HistoryStore::default());
        std::fs::write(&path, "null").unwrap();
        assert_eq!(HistoryStore::load_or_default(&path), HistoryStore::default());
    }

    #[test]
    fn partial_records_fill_defaults() {
        let store = HistoryStore::from_json(
            r#"{"byDate":{"2024-01-01":{"completionRate":0.5,"points":10}}}"#,
        )
        .unwrap();
        let rec = store.get("2024-01-01").unwrap();
        assert_eq!(rec.prayers_done(), 0);
        assert!(rec.done().is_empty());
        assert_eq!(store.longest_streak(), 0);
    }

    #[test]
    fn record_store_saves_after_each_mutation() {
        let dir = TempDir::new().unwrap();
        let tasks = tasks();
        let mut store = DayRecordStore::open(dir.path());
        store.get_or_create("2024-01-01").unwrap();
        store.set_task_done("2024-01-01", "c", true, &tasks).unwrap();
        store.set_prayers_done("2024-01-01", 3).unwrap();

        let reloaded = DayRecordStore::open(dir.path());
        let rec = reloaded.get("2024-01-01").unwrap();
        assert_eq!(rec.points(), 20);
        assert_eq!(rec.prayers_done(), 3);

        let mut store = reloaded;
        assert!(store.delete("2024-01-01").unwrap());
        assert!(DayRecordStore::open(dir.path()).get("2024-01-01").is_none());
    }

    #[test]
    fn record_store_rejects_bad_dates() {
        let dir = TempDir::new().unwrap();
        let mut store = DayRecordStore::open(dir.path());
        assert!(matches!(
            store.get_or_create("yesterday"),
            Err(CoachError::InvalidDate(_))
        ));
        assert!(store.history().is_empty());
    }

    #[test]
    fn record_store_persists_ratchet() {
        let dir = TempDir::new().unwrap();
        let tasks = vec![Task::new("a", "only", 5)];
        let mut store = DayRecordStore::open(dir.path());
        store.set_task_done("2024-01-01", "a", true, &tasks).unwrap();
        store.set_task_done("2024-01-02", "a", true, &tasks).unwrap();
        assert_eq!(store.streak().unwrap().max_streak, 2);
        assert_eq!(DayRecordStore::open(dir.path()).history().longest_streak(), 2);
    }
}
