use crate::output::{percent, print_json};
use anyhow::Context;
use chrono::NaiveDate;
use coach_core::{config::Config, session::PlanSession};
use std::path::Path;

pub fn run(root: &Path, today: NaiveDate, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let mut session = PlanSession::open(root);
    let stats = session.stats().context("failed to compute day stats")?;
    let summary = session
        .store_mut()
        .summarize(today, config.summary_window)
        .context("failed to summarize history")?;
    let plan_date = session.plan().map(|p| p.date.clone());

    if json {
        print_json(&serde_json::json!({
            "date": plan_date,
            "day": stats,
            "summary": summary,
            "window": config.summary_window.to_string(),
        }))?;
        return Ok(());
    }

    match (plan_date, stats) {
        (Some(date), Some(stats)) => {
            println!("Day:        {date}");
            println!("Tasks:      {}/{} done", stats.done, stats.tasks);
            println!("Points:     {}", stats.points);
            println!("Completion: {}", percent(stats.completion_rate));
            println!("Prayers:    {}/5", stats.prayers_done);
            let mark = if session.day_qualifies() { " (today counts)" } else { "" };
            println!("Streak:     {} days{mark}", stats.streak);
        }
        _ => println!("No active plan. Run 'coach generate'."),
    }

    println!();
    println!("Last 7 ({}): {}", config.summary_window, percent(summary.last7_rate));
    println!("Yesterday:   {}", percent(summary.y_rate));
    println!("Streak:      {} (best {})", summary.streak, summary.max_streak);
    Ok(())
}
