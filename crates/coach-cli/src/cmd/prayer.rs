use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use coach_core::session::PlanSession;
use std::path::Path;

#[derive(Subcommand)]
pub enum PrayerSubcommand {
    /// Check a prayer (e.g. Fajr)
    Done { name: String },
    /// Uncheck a prayer
    Undo { name: String },
}

pub fn run(root: &Path, subcmd: PrayerSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        PrayerSubcommand::Done { name } => toggle(root, &name, true, json),
        PrayerSubcommand::Undo { name } => toggle(root, &name, false, json),
    }
}

fn toggle(root: &Path, name: &str, done: bool, json: bool) -> anyhow::Result<()> {
    let mut session = PlanSession::open(root);
    let record = session
        .toggle_prayer(name, done)
        .with_context(|| format!("cannot update prayer '{name}'"))?;

    if json {
        print_json(&serde_json::json!({
            "prayer": name,
            "done": done,
            "prayers_done": record.prayers_done(),
        }))?;
    } else {
        let verb = if done { "Checked" } else { "Unchecked" };
        println!("{verb} {name} — {}/5 prayers", record.prayers_done());
    }
    Ok(())
}
