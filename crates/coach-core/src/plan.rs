//! The generated daily plan.
//!
//! The shape mirrors the JSON object the plan generator is asked to return.
//! Apart from `date`, every field is optional on the wire and defaults when
//! absent: the plan is only accessed structurally, never validated. Fields
//! this crate does not model are kept in `extra` so an exported plan is the
//! document the generator produced.

use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: PlanSummary,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<Task>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prayer_checklist: PrayerChecklist,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adjustments: Adjustments,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weekly_alignment: WeeklyAlignment,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    #[serde(default, deserialize_with = "lenient_string")]
    pub theme: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub compound_effect_note: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub total_estimated_minutes: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub why_it_matters: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub steps: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub success_criteria: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub est_minutes: u32,
    #[serde(default = "default_difficulty", deserialize_with = "lenient_difficulty")]
    pub difficulty_1to5: u8,
    #[serde(default, deserialize_with = "lenient_string")]
    pub context: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub requires_materials: Vec<String>,
    #[serde(default = "default_streak_weight", deserialize_with = "lenient_streak_weight")]
    pub streak_weight: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub points: u32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes_for_reflection: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_difficulty() -> u8 {
    1
}

fn default_streak_weight() -> u32 {
    1
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, points: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            difficulty_1to5: default_difficulty(),
            streak_weight: default_streak_weight(),
            points,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrayerChecklist {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<PrayerItem>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub consistency_tip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrayerItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Adjustments {
    #[serde(default, deserialize_with = "lenient_string")]
    pub difficulty_change: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAlignment {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub week_focus: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub friday_review_prompt: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sunday_planning_prompt: String,
}

// ---------------------------------------------------------------------------
// Lenient field decoding
// ---------------------------------------------------------------------------
//
// Generated plans are loosely typed: `null` for absent values, numeric ids,
// fractional points. Each field falls back to its default instead of failing
// the whole plan.

fn null_as_default<'de, D, T>(d: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let opt: Option<T> = Option::deserialize(d)?;
    Ok(opt.unwrap_or_default())
}

fn lenient_string<'de, D>(d: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(Value::deserialize(d)?))
}

fn lenient_strings<'de, D>(d: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter(|v| !v.is_null())
            .map(value_to_string)
            .collect(),
        Value::Null => Vec::new(),
        other => vec![value_to_string(other)],
    })
}

fn lenient_u32<'de, D>(d: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_u32(&Value::deserialize(d)?).unwrap_or_default())
}

fn lenient_difficulty<'de, D>(d: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_u32(&Value::deserialize(d)?)
        .map(|n| n.min(u32::from(u8::MAX)) as u8)
        .unwrap_or_else(default_difficulty))
}

fn lenient_streak_weight<'de, D>(d: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_u32(&Value::deserialize(d)?).unwrap_or_else(default_streak_weight))
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Whole, non-negative number from a JSON number or numeric string. Fractions
/// round to nearest; out-of-range values saturate.
fn value_to_u32(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return Some(u.min(u64::from(u32::MAX)) as u32);
            }
            n.as_f64()?
        }
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    Some(n.round().clamp(0.0, f64::from(u32::MAX)) as u32)
}

impl Plan {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            summary: PlanSummary::default(),
            tasks: Vec::new(),
            prayer_checklist: PrayerChecklist::default(),
            adjustments: Adjustments::default(),
            weekly_alignment: WeeklyAlignment::default(),
            extra: Map::new(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Case-insensitive prayer lookup, returning the name as the plan spells it.
    pub fn prayer_name(&self, name: &str) -> Option<&str> {
        self.prayer_checklist
            .items
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
            .map(|p| p.name.as_str())
    }

    /// Write the plan as pretty JSON to `dir/plan-<date>.json`.
    pub fn export(&self, dir: &Path) -> Result<PathBuf> {
        let path = paths::plan_export_path(dir, &self.date);
        let data = serde_json::to_string_pretty(self)?;
        crate::io::atomic_write(&path, data.as_bytes())?;
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FULL_PLAN: &str = r#"{
        "date": "2024-05-01",
        "summary": { "theme": "Small wins", "compound_effect_note": "Adds up", "total_estimated_minutes": 45 },
        "tasks": [
            {
                "id": "t1",
                "category": "warmup",
                "title": "Stretch",
                "why_it_matters": "Wakes you up",
                "steps": ["stand", "reach"],
                "success_criteria": "2 minutes done",
                "est_minutes": 2,
                "difficulty_1to5": 1,
                "context": "home",
                "requires_materials": [],
                "streak_weight": 1,
                "points": 5,
                "notes_for_reflection": "How do you feel?"
            },
            { "id": "t2", "category": "pcb", "title": "Place footprints", "points": 15, "est_minutes": 30 }
        ],
        "prayer_checklist": {
            "items": [
                {"name": "Fajr", "tip": "Set an alarm"},
                {"name": "Dhuhr", "tip": ""},
                {"name": "Asr", "tip": ""},
                {"name": "Maghrib", "tip": ""},
                {"name": "Isha", "tip": ""}
            ],
            "consistency_tip": "Anchor to meals"
        },
        "adjustments": { "difficulty_change": "maintain", "reason": "steady week" },
        "weekly_alignment": {
            "week_focus": ["footprints"],
            "friday_review_prompt": "What stuck?",
            "sunday_planning_prompt": "What next?"
        }
    }"#;

    #[test]
    fn parses_full_plan() {
        let plan = Plan::from_json(FULL_PLAN).unwrap();
        assert_eq!(plan.date, "2024-05-01");
        assert_eq!(plan.summary.total_estimated_minutes, 45);
        assert_eq!(plan.tasks.len(), 2);
        assert_eq!(plan.tasks[0].steps, vec!["stand", "reach"]);
        assert_eq!(plan.tasks[1].points, 15);
        assert_eq!(plan.tasks[1].difficulty_1to5, 1);
        assert_eq!(plan.prayer_checklist.items.len(), 5);
        assert_eq!(plan.adjustments.difficulty_change, "maintain");
        assert_eq!(plan.weekly_alignment.week_focus, vec!["footprints"]);
    }

    #[test]
    fn minimal_plan_defaults_everything_but_date() {
        let plan = Plan::from_json(r#"{"date":"2024-05-02"}"#).unwrap();
        assert!(plan.tasks.is_empty());
        assert!(plan.prayer_checklist.items.is_empty());
        assert_eq!(plan.summary.theme, "");
    }

    #[test]
    fn missing_date_is_rejected() {
        assert!(Plan::from_json(r#"{"tasks":[]}"#).is_err());
    }

    #[test]
    fn unknown_fields_survive_export() {
        let text = r#"{"date":"2024-05-03","mood_note":"tired","tasks":[{"id":"a","points":5,"bonus":true}]}"#;
        let plan = Plan::from_json(text).unwrap();
        let back: Value = serde_json::to_value(&plan).unwrap();
        assert_eq!(back["mood_note"], "tired");
        assert_eq!(back["tasks"][0]["bonus"], true);
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let text = r#"{
            "date": "2024-05-04",
            "summary": null,
            "tasks": [{
                "id": "t1", "title": null, "steps": null, "est_minutes": null,
                "difficulty_1to5": null, "streak_weight": null, "points": null
            }],
            "prayer_checklist": { "items": [{ "tip": "early" }], "consistency_tip": null },
            "weekly_alignment": { "week_focus": ["a", null, "b"] }
        }"#;
        let plan = Plan::from_json(text).unwrap();
        let task = &plan.tasks[0];
        assert_eq!(task.title, "");
        assert!(task.steps.is_empty());
        assert_eq!(task.est_minutes, 0);
        assert_eq!(task.difficulty_1to5, 1);
        assert_eq!(task.streak_weight, 1);
        assert_eq!(task.points, 0);
        assert_eq!(plan.summary.total_estimated_minutes, 0);
        assert_eq!(plan.prayer_checklist.items[0].name, "");
        assert_eq!(plan.prayer_checklist.items[0].tip, "early");
        assert_eq!(plan.weekly_alignment.week_focus, vec!["a", "b"]);
    }

    #[test]
    fn numeric_ids_become_strings() {
        let text = r#"{"date":"2024-05-05","tasks":[{"id":1,"points":3},{"id":"2","points":4}]}"#;
        let plan = Plan::from_json(text).unwrap();
        assert_eq!(plan.tasks[0].id, "1");
        assert_eq!(plan.task("1").map(|t| t.points), Some(3));
        assert_eq!(plan.task("2").map(|t| t.points), Some(4));
    }

    #[test]
    fn loose_numbers_are_rounded_and_clamped() {
        let text = r#"{"date":"2024-05-06","tasks":[
            {"id":"a","points":7.5,"est_minutes":"12","difficulty_1to5":900},
            {"id":"b","points":-3,"est_minutes":"soon"},
            {"id":"c","points":1e12}
        ]}"#;
        let plan = Plan::from_json(text).unwrap();
        assert_eq!(plan.tasks[0].points, 8);
        assert_eq!(plan.tasks[0].est_minutes, 12);
        assert_eq!(plan.tasks[0].difficulty_1to5, u8::MAX);
        assert_eq!(plan.tasks[1].points, 0);
        assert_eq!(plan.tasks[1].est_minutes, 0);
        assert_eq!(plan.tasks[2].points, u32::MAX);
    }

    #[test]
    fn prayer_lookup_ignores_case() {
        let plan = Plan::from_json(FULL_PLAN).unwrap();
        assert_eq!(plan.prayer_name("fajr"), Some("Fajr"));
        assert_eq!(plan.prayer_name("ISHA"), Some("Isha"));
        assert_eq!(plan.prayer_name("Tahajjud"), None);
    }

    #[test]
    fn export_writes_dated_file() {
        let dir = TempDir::new().unwrap();
        let plan = Plan::from_json(FULL_PLAN).unwrap();
        let path = plan.export(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("plan-2024-05-01.json"));
        let reloaded = Plan::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded, plan);
    }
}
