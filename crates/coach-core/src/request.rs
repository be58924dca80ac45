//! The structured request sent to the plan generator.

use crate::config::{Config, Goals, Preferences, KNOWN_CONTEXTS};
use crate::paths::date_key;
use crate::summary::RollingSummary;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SLEEP_HOURS: f32 = 7.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub date: String,
    pub goals: Goals,
    pub preferences: Preferences,
    pub history: HistoryContext,
    pub mood_today: Mood,
    pub today_time_blocks: Vec<TimeBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryContext {
    pub streak_days: u32,
    pub longest_streak: u32,
    pub last_7d_completion_rate: f64,
    pub yesterday_completion_rate: f64,
    pub recent_notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mood {
    pub valence: String,
    pub energy: String,
    pub sleep_hours: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub block: String,
    pub minutes: u32,
}

/// Per-invocation inputs. `None` falls back to the configured value.
#[derive(Debug, Clone, Default)]
pub struct GenerationInputs {
    pub notes: String,
    pub valence: Option<String>,
    pub energy: Option<String>,
    pub sleep_hours: Option<f32>,
    pub morning_minutes: Option<u32>,
    pub afternoon_minutes: Option<u32>,
    pub evening_minutes: Option<u32>,
    pub max_daily_minutes: Option<u32>,
    pub contexts: Vec<String>,
    pub difficulty_target: Option<String>,
}

impl GenerationRequest {
    pub fn build(
        config: &Config,
        summary: &RollingSummary,
        today: NaiveDate,
        inputs: GenerationInputs,
    ) -> Self {
        let mut preferences = config.preferences.clone();
        if let Some(m) = inputs.max_daily_minutes.filter(|m| *m > 0) {
            preferences.max_daily_minutes = m;
        }
        if !inputs.contexts.is_empty() {
            preferences.available_contexts = inputs.contexts;
        }
        if preferences.available_contexts.is_empty() {
            preferences.available_contexts = KNOWN_CONTEXTS.iter().map(|s| s.to_string()).collect();
        }
        if let Some(d) = inputs.difficulty_target {
            preferences.difficulty_target = d;
        }

        let blocks = &config.time_blocks;
        Self {
            date: date_key(today),
            goals: config.goals.clone(),
            preferences,
            history: HistoryContext {
                streak_days: summary.streak,
                longest_streak: summary.max_streak,
                last_7d_completion_rate: summary.last7_rate,
                yesterday_completion_rate: summary.y_rate,
                recent_notes: inputs.notes,
            },
            mood_today: Mood {
                valence: inputs.valence.unwrap_or_else(|| "neutral".to_string()),
                energy: inputs.energy.unwrap_or_else(|| "medium".to_string()),
                sleep_hours: inputs.sleep_hours.unwrap_or(DEFAULT_SLEEP_HOURS),
            },
            today_time_blocks: vec![
                TimeBlock {
                    block: "morning".to_string(),
                    minutes: inputs.morning_minutes.unwrap_or(blocks.morning),
                },
                TimeBlock {
                    block: "afternoon".to_string(),
                    minutes: inputs.afternoon_minutes.unwrap_or(blocks.afternoon),
                },
                TimeBlock {
                    block: "evening".to_string(),
                    minutes: inputs.evening_minutes.unwrap_or(blocks.evening),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        crate::paths::parse_date("2024-06-01").unwrap()
    }

    #[test]
    fn defaults_come_from_config() {
        let summary = RollingSummary {
            last7_rate: 0.62,
            y_rate: 0.5,
            streak: 3,
            max_streak: 8,
        };
        let req = GenerationRequest::build(&Config::default(), &summary, today(), GenerationInputs::default());
        assert_eq!(req.date, "2024-06-01");
        assert_eq!(req.preferences.max_daily_minutes, 90);
        assert_eq!(req.preferences.available_contexts, vec!["home", "online", "outdoor"]);
        assert_eq!(req.history.streak_days, 3);
        assert_eq!(req.history.longest_streak, 8);
        assert_eq!(req.history.last_7d_completion_rate, 0.62);
        assert_eq!(req.mood_today.sleep_hours, 7.0);
        assert_eq!(req.today_time_blocks.len(), 3);
        assert!(req.today_time_blocks.iter().all(|b| b.minutes == 0));
    }

    #[test]
    fn inputs_override_config() {
        let inputs = GenerationInputs {
            notes: "blocked on routing".to_string(),
            valence: Some("low".to_string()),
            sleep_hours: Some(5.5),
            morning_minutes: Some(20),
            max_daily_minutes: Some(30),
            contexts: vec!["home".to_string()],
            difficulty_target: Some("decrease".to_string()),
            ..Default::default()
        };
        let req = GenerationRequest::build(&Config::default(), &RollingSummary::default(), today(), inputs);
        assert_eq!(req.preferences.max_daily_minutes, 30);
        assert_eq!(req.preferences.available_contexts, vec!["home"]);
        assert_eq!(req.preferences.difficulty_target, "decrease");
        assert_eq!(req.history.recent_notes, "blocked on routing");
        assert_eq!(req.mood_today.valence, "low");
        assert_eq!(req.mood_today.energy, "medium");
        assert_eq!(req.today_time_blocks[0].minutes, 20);
    }

    #[test]
    fn zero_max_minutes_falls_back() {
        let inputs = GenerationInputs {
            max_daily_minutes: Some(0),
            ..Default::default()
        };
        let req = GenerationRequest::build(&Config::default(), &RollingSummary::default(), today(), inputs);
        assert_eq!(req.preferences.max_daily_minutes, 90);
    }

    #[test]
    fn serializes_wire_field_names() {
        let req = GenerationRequest::build(&Config::default(), &RollingSummary::default(), today(), GenerationInputs::default());
        let v = serde_json::to_value(&req).unwrap();
        assert!(v["history"]["yesterday_completion_rate"].is_number());
        assert_eq!(v["today_time_blocks"][1]["block"], "afternoon");
        assert_eq!(v["goals"]["frustration_control"], true);
    }
}
