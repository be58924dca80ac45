use crate::output::print_json;
use anyhow::Context;
use chrono::NaiveDate;
use coach_core::{paths, session::PlanSession};
use std::path::Path;

pub fn run(root: &Path, today: NaiveDate, yes: bool, json: bool) -> anyhow::Result<()> {
    let date = paths::date_key(today);
    if !yes {
        anyhow::bail!("this deletes the record for {date}; re-run with --yes to confirm");
    }

    let mut session = PlanSession::open(root);
    let existed = session
        .reset_day(today)
        .with_context(|| format!("failed to reset {date}"))?;

    if json {
        print_json(&serde_json::json!({ "date": date, "deleted": existed }))?;
    } else if existed {
        println!("Cleared record for {date}.");
    } else {
        println!("No record for {date}.");
    }
    Ok(())
}
