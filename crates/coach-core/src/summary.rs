//! Rolling completion summary fed into plan generation.
//!
//! The default window is the last seven *present* dates, not seven calendar
//! days: with sparse history it compresses to the last seven records. The
//! `CalendarDays` window instead looks at the seven calendar days ending
//! today and counts unrecorded days as zero.

use crate::history::{round2, DayRecord, HistoryStore};
use crate::paths::date_key;
use crate::streak;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

pub const WINDOW_LEN: usize = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryWindow {
    #[default]
    PresentDates,
    CalendarDays,
}

impl std::fmt::Display for SummaryWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryWindow::PresentDates => write!(f, "present_dates"),
            SummaryWindow::CalendarDays => write!(f, "calendar_days"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingSummary {
    #[serde(rename = "last7Rate")]
    pub last7_rate: f64,
    pub y_rate: f64,
    pub streak: u32,
    pub max_streak: u32,
}

/// The last `n` present dates with their records, oldest first.
pub fn recent_days(history: &HistoryStore, n: usize) -> Vec<(&str, &DayRecord)> {
    let skip = history.len().saturating_sub(n);
    history.records().skip(skip).collect()
}

pub fn summarize(history: &mut HistoryStore, today: NaiveDate, window: SummaryWindow) -> RollingSummary {
    let (last7_rate, y_rate) = match window {
        SummaryWindow::PresentDates => present_rates(history, today),
        SummaryWindow::CalendarDays => calendar_rates(history, today),
    };
    let st = streak::compute(history);
    RollingSummary {
        last7_rate,
        y_rate,
        streak: st.streak,
        max_streak: st.max_streak,
    }
}

fn present_rates(history: &HistoryStore, today: NaiveDate) -> (f64, f64) {
    let window = recent_days(history, WINDOW_LEN);
    if window.is_empty() {
        return (0.0, 0.0);
    }
    let mean = window.iter().map(|(_, r)| r.completion_rate()).sum::<f64>() / window.len() as f64;

    let today_key = date_key(today);
    let yesterday = match window.as_slice() {
        [.., (last, _)] if *last == today_key => window.iter().rev().nth(1),
        _ => window.last(),
    };
    let y_rate = yesterday.map(|(_, r)| r.completion_rate()).unwrap_or(0.0);
    (round2(mean), round2(y_rate))
}

fn calendar_rates(history: &HistoryStore, today: NaiveDate) -> (f64, f64) {
    let rate_on = |offset: u64| {
        today
            .checked_sub_days(Days::new(offset))
            .and_then(|d| history.get(&date_key(d)))
            .map(|r| r.completion_rate())
            .unwrap_or(0.0)
    };
    let total: f64 = (0..WINDOW_LEN as u64).map(rate_on).sum();
    (round2(total / WINDOW_LEN as f64), round2(rate_on(1)))
}
