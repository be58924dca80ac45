use crate::output::print_json;
use anyhow::Context;
use clap::{Subcommand, ValueEnum};
use coach_core::config::{Config, WarnLevel};
use coach_core::summary::SummaryWindow;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration
    Show,

    /// Validate the config for common mistakes
    Validate,

    /// Choose how the 7-day completion rate is windowed
    Window {
        #[arg(value_enum)]
        mode: WindowArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum WindowArg {
    /// The last seven recorded days
    PresentDates,
    /// The seven calendar days ending today; missing days count as zero
    CalendarDays,
}

impl From<WindowArg> for SummaryWindow {
    fn from(arg: WindowArg) -> Self {
        match arg {
            WindowArg::PresentDates => SummaryWindow::PresentDates,
            WindowArg::CalendarDays => SummaryWindow::CalendarDays,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
        ConfigSubcommand::Window { mode } => set_window(root, mode.into(), json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    if json {
        print_json(&config)?;
    } else {
        let yaml = serde_yaml::to_string(&config).context("failed to render config")?;
        print!("{yaml}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}

fn set_window(root: &Path, window: SummaryWindow, json: bool) -> anyhow::Result<()> {
    let mut config = Config::load(root).context("failed to load config")?;
    config.summary_window = window;
    config.save(root).context("failed to save config")?;

    if json {
        print_json(&serde_json::json!({ "summary_window": window.to_string() }))?;
    } else {
        println!("Summary window set to {window}.");
    }
    Ok(())
}
