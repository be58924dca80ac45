//! The active plan and the toggles that update its day record.
//!
//! A `PlanSession` owns the `DayRecordStore` and the currently active plan.
//! Because each CLI invocation is a fresh process, the active plan and the set
//! of checked prayers are persisted to `.coach/session.json` between calls.

use crate::error::{CoachError, Result};
use crate::history::{DayRecord, DayRecordStore, MAX_PRAYERS};
use crate::paths;
use crate::plan::Plan;
use crate::streak;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub plan: Option<Plan>,
    #[serde(default)]
    pub prayers_checked: BTreeSet<String>,
}

impl SessionState {
    /// Missing or corrupt session files yield an empty session.
    pub fn load_or_default(path: &Path) -> Self {
        match crate::io::read_optional(path) {
            Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "session file corrupt, starting without a plan");
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "session file unreadable, starting without a plan");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// DayStats
// ---------------------------------------------------------------------------

/// Headline numbers for the active plan's day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayStats {
    pub tasks: usize,
    pub done: usize,
    pub points: u32,
    pub completion_rate: f64,
    pub prayers_done: u32,
    pub streak: u32,
}

// ---------------------------------------------------------------------------
// PlanSession
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct PlanSession {
    session_path: PathBuf,
    store: DayRecordStore,
    state: SessionState,
}

impl PlanSession {
    pub fn open(root: &Path) -> Self {
        let session_path = paths::session_path(root);
        Self {
            store: DayRecordStore::open(root),
            state: SessionState::load_or_default(&session_path),
            session_path,
        }
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.state.plan.as_ref()
    }

    pub fn store(&self) -> &DayRecordStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DayRecordStore {
        &mut self.store
    }

    /// The day record for the active plan's date.
    pub fn record(&self) -> Option<&DayRecord> {
        self.plan().and_then(|p| self.store.get(&p.date))
    }

    pub fn is_prayer_checked(&self, name: &str) -> bool {
        self.state.prayers_checked.contains(name)
    }

    /// Install `plan` as the active plan and make sure its day has a record.
    ///
    /// Prayer checks carry over when the new plan is for the same date as the
    /// previous one, so regenerating mid-day does not lose them.
    pub fn activate(&mut self, plan: Plan) -> Result<DayRecord> {
        paths::validate_date_key(&plan.date)?;
        let same_day = self.plan().is_some_and(|p| p.date == plan.date);
        let checked = if same_day {
            std::mem::take(&mut self.state.prayers_checked)
                .into_iter()
                .filter(|name| plan.prayer_name(name).is_some())
                .collect()
        } else {
            BTreeSet::new()
        };

        let record = self.store.get_or_create(&plan.date)?;
        tracing::info!(date = %plan.date, tasks = plan.tasks.len(), "plan activated");
        self.state = SessionState {
            plan: Some(plan),
            prayers_checked: checked,
        };
        self.save()?;
        Ok(record)
    }

    /// Mark a task of the active plan done or not done.
    pub fn toggle_task(&mut self, task_id: &str, is_done: bool) -> Result<DayRecord> {
        let plan = self.state.plan.as_ref().ok_or(CoachError::NoActivePlan)?;
        if plan.task(task_id).is_none() {
            return Err(CoachError::TaskNotFound(task_id.to_string()));
        }
        let record = self
            .store
            .set_task_done(&plan.date, task_id, is_done, &plan.tasks)?;
        tracing::info!(date = %plan.date, task = task_id, done = is_done, points = record.points(), "task toggled");
        Ok(record)
    }

    /// Check or uncheck a prayer, then store the number of checked prayers.
    pub fn toggle_prayer(&mut self, name: &str, is_done: bool) -> Result<DayRecord> {
        let plan = self.state.plan.as_ref().ok_or(CoachError::NoActivePlan)?;
        let canonical = plan
            .prayer_name(name)
            .ok_or_else(|| CoachError::PrayerNotFound(name.to_string()))?
            .to_string();

        if is_done {
            self.state.prayers_checked.insert(canonical.clone());
        } else {
            self.state.prayers_checked.remove(&canonical);
        }
        let count = plan
            .prayer_checklist
            .items
            .iter()
            .map(|p| p.name.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|n| self.state.prayers_checked.contains(*n))
            .count() as u32;

        let date = plan.date.clone();
        let record = self.store.set_prayers_done(&date, count.min(MAX_PRAYERS))?;
        self.save()?;
        tracing::info!(date = %date, prayer = %canonical, done = is_done, count, "prayer toggled");
        Ok(record)
    }

    pub fn stats(&mut self) -> Result<Option<DayStats>> {
        let Some(plan) = self.state.plan.as_ref() else {
            return Ok(None);
        };
        let record = self.store.get(&plan.date).cloned().unwrap_or_default();
        let tasks = plan.tasks.len();
        let done = record.done_count(&plan.tasks);
        let streak = self.store.streak()?.streak;
        Ok(Some(DayStats {
            tasks,
            done,
            points: record.points(),
            completion_rate: record.completion_rate(),
            prayers_done: record.prayers_done(),
            streak,
        }))
    }

    /// Delete the record for `day`. If the active plan is for that day it is
    /// deactivated too. Returns whether a record existed.
    pub fn reset_day(&mut self, day: NaiveDate) -> Result<bool> {
        let key = paths::date_key(day);
        let existed = self.store.delete(&key)?;
        if self.plan().is_some_and(|p| p.date == key) {
            self.state = SessionState::default();
            self.save()?;
        }
        tracing::info!(date = %key, existed, "day reset");
        Ok(existed)
    }

    pub fn export(&self, dir: &Path) -> Result<PathBuf> {
        self.plan().ok_or(CoachError::NoActivePlan)?.export(dir)
    }

    /// Whether the day of the active plan currently counts toward the streak.
    pub fn day_qualifies(&self) -> bool {
        self.record().is_some_and(streak::qualifies)
    }

    fn save(&self) -> Result<()> {
        self.state.save(&self.session_path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
