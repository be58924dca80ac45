use crate::output::{checkbox, print_json};
use coach_core::{plan::Plan, session::PlanSession};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let session = PlanSession::open(root);

    if json {
        print_json(&serde_json::json!({
            "plan": session.plan(),
            "record": session.record(),
        }))?;
        return Ok(());
    }

    match session.plan() {
        Some(plan) => print_plan(&session, plan),
        None => println!("No active plan. Run 'coach generate'."),
    }
    Ok(())
}

pub fn print_plan(session: &PlanSession, plan: &Plan) {
    let record = session.record();
    let is_done = |id: &str| record.is_some_and(|r| r.is_done(id));

    println!("Plan for {}", plan.date);
    if !plan.summary.theme.is_empty() {
        println!("Theme:    {}", plan.summary.theme);
    }
    if !plan.summary.compound_effect_note.is_empty() {
        println!("Compound: {}", plan.summary.compound_effect_note);
    }
    println!("Minutes:  {}", plan.summary.total_estimated_minutes);

    println!();
    println!("Tasks:");
    for task in &plan.tasks {
        println!(
            "  {} {:<10} {}  [{} | {} | diff {} | {} min | +{} pts]",
            checkbox(is_done(&task.id)),
            task.id,
            task.title,
            task.category,
            task.context,
            task.difficulty_1to5,
            task.est_minutes,
            task.points,
        );
        if !task.why_it_matters.is_empty() {
            println!("      why: {}", task.why_it_matters);
        }
        for (i, step) in task.steps.iter().enumerate() {
            println!("      {}. {}", i + 1, step);
        }
        if !task.success_criteria.is_empty() {
            println!("      done when: {}", task.success_criteria);
        }
        if !task.notes_for_reflection.is_empty() {
            println!("      reflect: {}", task.notes_for_reflection);
        }
    }

    if !plan.prayer_checklist.items.is_empty() {
        println!();
        println!("Prayers:");
        for p in &plan.prayer_checklist.items {
            let tip = if p.tip.is_empty() {
                String::new()
            } else {
                format!("  ({})", p.tip)
            };
            println!("  {} {}{}", checkbox(session.is_prayer_checked(&p.name)), p.name, tip);
        }
        if !plan.prayer_checklist.consistency_tip.is_empty() {
            println!("  tip: {}", plan.prayer_checklist.consistency_tip);
        }
    }

    let weekly = &plan.weekly_alignment;
    if !weekly.week_focus.is_empty() {
        println!();
        println!("This week:");
        for f in &weekly.week_focus {
            println!("  - {f}");
        }
        if !weekly.friday_review_prompt.is_empty() {
            println!("  Friday review:   {}", weekly.friday_review_prompt);
        }
        if !weekly.sunday_planning_prompt.is_empty() {
            println!("  Sunday planning: {}", weekly.sunday_planning_prompt);
        }
    }

    if !plan.adjustments.difficulty_change.is_empty() {
        println!();
        println!(
            "Difficulty: {} ({})",
            plan.adjustments.difficulty_change, plan.adjustments.reason
        );
    }
}
