use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use coach_core::session::PlanSession;
use std::path::Path;

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// Mark a task done
    Done { task_id: String },
    /// Mark a task not done
    Undo { task_id: String },
}

pub fn run(root: &Path, subcmd: TaskSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TaskSubcommand::Done { task_id } => toggle(root, &task_id, true, json),
        TaskSubcommand::Undo { task_id } => toggle(root, &task_id, false, json),
    }
}

fn toggle(root: &Path, task_id: &str, done: bool, json: bool) -> anyhow::Result<()> {
    let mut session = PlanSession::open(root);
    let record = session
        .toggle_task(task_id, done)
        .with_context(|| format!("cannot update task '{task_id}'"))?;
    let total = session.plan().map(|p| p.tasks.len()).unwrap_or(0);
    let done_count = session
        .plan()
        .map(|p| record.done_count(&p.tasks))
        .unwrap_or(0);

    if json {
        print_json(&serde_json::json!({
            "task_id": task_id,
            "done": done,
            "record": record,
        }))?;
    } else {
        let verb = if done { "Completed" } else { "Reopened" };
        println!(
            "{verb} task [{task_id}] — {done_count}/{total} done, {} pts",
            record.points()
        );
    }
    Ok(())
}
