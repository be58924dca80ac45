use crate::output::{percent, print_json, print_table};
use coach_core::{history::DayRecordStore, summary};
use std::path::Path;

const DAYS_SHOWN: usize = 7;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = DayRecordStore::open(root);
    let days = summary::recent_days(store.history(), DAYS_SHOWN);

    if json {
        let entries: Vec<serde_json::Value> = days
            .iter()
            .map(|(date, record)| {
                serde_json::json!({
                    "date": date,
                    "points": record.points(),
                    "completionRate": record.completion_rate(),
                    "prayersDone": record.prayers_done(),
                })
            })
            .collect();
        print_json(&entries)?;
        return Ok(());
    }

    if days.is_empty() {
        println!("No history yet.");
        return Ok(());
    }

    // Newest first, like a log.
    let rows = days
        .iter()
        .rev()
        .map(|(date, record)| {
            vec![
                date.to_string(),
                percent(record.completion_rate()),
                record.points().to_string(),
                format!("{}/5", record.prayers_done()),
            ]
        })
        .collect();
    print_table(&["DATE", "DONE", "POINTS", "PRAYERS"], rows);
    Ok(())
}
