use crate::output::print_json;
use anyhow::Context;
use clap::Args;
use chrono::NaiveDate;
use coach_agent::{AgentError, GeminiClient, PlanGenerator};
use coach_core::{
    config::Config,
    credential,
    lock::GenerationLock,
    request::{GenerationInputs, GenerationRequest},
    session::PlanSession,
    CoachError,
};
use std::path::Path;
use std::time::Duration;

#[derive(Args)]
pub struct GenerateArgs {
    /// Recent notes for the coach (e.g. "blocked on footprint library")
    #[arg(long, default_value = "")]
    notes: String,

    /// Mood valence (e.g. low, neutral, good)
    #[arg(long)]
    valence: Option<String>,

    /// Energy level (e.g. low, medium, high)
    #[arg(long)]
    energy: Option<String>,

    /// Hours slept last night
    #[arg(long)]
    sleep: Option<f32>,

    /// Free minutes this morning
    #[arg(long)]
    morning: Option<u32>,

    /// Free minutes this afternoon
    #[arg(long)]
    afternoon: Option<u32>,

    /// Free minutes this evening
    #[arg(long)]
    evening: Option<u32>,

    /// Maximum minutes for the whole plan
    #[arg(long)]
    max_minutes: Option<u32>,

    /// Available context (repeatable): home, online, outdoor
    #[arg(long = "context")]
    contexts: Vec<String>,

    /// Difficulty target (decrease, maintain, increase)
    #[arg(long)]
    difficulty: Option<String>,

    /// Override the generator base URL
    #[arg(long, env = "COACH_API_BASE_URL")]
    base_url: Option<String>,
}

pub fn run(root: &Path, today: NaiveDate, args: GenerateArgs, json: bool) -> anyhow::Result<()> {
    let mut config = Config::load(root).context("failed to load config")?;
    if let Some(url) = args.base_url.clone() {
        config.generator.base_url = url;
    }
    let key = credential::require(root)?;

    let stale_after = Duration::from_secs(config.generator.timeout_secs.saturating_mul(2).max(1));
    let _lock = GenerationLock::acquire(root, stale_after).map_err(|e| match e {
        CoachError::GenerationInProgress => {
            anyhow::anyhow!("a plan generation is already running; wait for it to finish")
        }
        other => anyhow::Error::new(other).context("failed to acquire generation lock"),
    })?;

    let mut session = PlanSession::open(root);
    let summary = session
        .store_mut()
        .summarize(today, config.summary_window)
        .context("failed to summarize history")?;
    let request = GenerationRequest::build(&config, &summary, today, args.into_inputs());

    let client = GeminiClient::new(key, &config.generator)?;
    let plan = block_on(client.generate(&request))?.map_err(describe)?;

    session
        .activate(plan)
        .context("failed to activate generated plan")?;

    if json {
        print_json(&serde_json::json!({
            "plan": session.plan(),
            "record": session.record(),
        }))?;
        return Ok(());
    }
    if let Some(plan) = session.plan() {
        super::plan::print_plan(&session, plan);
    }
    Ok(())
}

impl GenerateArgs {
    fn into_inputs(self) -> GenerationInputs {
        GenerationInputs {
            notes: self.notes,
            valence: self.valence,
            energy: self.energy,
            sleep_hours: self.sleep,
            morning_minutes: self.morning,
            afternoon_minutes: self.afternoon,
            evening_minutes: self.evening,
            max_daily_minutes: self.max_minutes,
            contexts: self.contexts,
            difficulty_target: self.difficulty,
        }
    }
}

fn describe(e: AgentError) -> anyhow::Error {
    if e.is_upstream() {
        anyhow::Error::new(e).context("plan generation failed")
    } else {
        anyhow::Error::new(e)
    }
}

fn block_on<F: std::future::Future>(fut: F) -> anyhow::Result<F::Output> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    Ok(rt.block_on(fut))
}
