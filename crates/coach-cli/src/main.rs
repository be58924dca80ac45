mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand, generate::GenerateArgs, key::KeySubcommand,
    prayer::PrayerSubcommand, task::TaskSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "coach",
    about = "Daily micro-task coach — generate a plan, tick tasks and prayers, track streaks",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data root holding .coach/ (default: nearest .coach/ upward, else home)
    #[arg(long, global = true, env = "COACH_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Override today's date (YYYY-MM-DD)
    #[arg(long, global = true, env = "COACH_TODAY")]
    today: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the plan generator API key
    Key {
        #[command(subcommand)]
        subcommand: KeySubcommand,
    },

    /// Generate today's plan and make it the active plan
    Generate(GenerateArgs),

    /// Show the active plan
    Plan,

    /// Mark tasks of the active plan done or not done
    Task {
        #[command(subcommand)]
        subcommand: TaskSubcommand,
    },

    /// Check or uncheck prayers of the active plan
    Prayer {
        #[command(subcommand)]
        subcommand: PrayerSubcommand,
    },

    /// Show today's progress, streaks and recent completion rates
    Status,

    /// Show the last 7 recorded days
    History,

    /// Write the active plan to plan-<date>.json
    Export {
        /// Output directory (default: current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Clear today's record
    Reset {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Show, validate and change configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Generate(_) => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = root::resolve_today(cli.today.as_deref()).and_then(|today| match cli.command {
        Commands::Key { subcommand } => cmd::key::run(&root, subcommand, cli.json),
        Commands::Generate(args) => cmd::generate::run(&root, today, args, cli.json),
        Commands::Plan => cmd::plan::run(&root, cli.json),
        Commands::Task { subcommand } => cmd::task::run(&root, subcommand, cli.json),
        Commands::Prayer { subcommand } => cmd::prayer::run(&root, subcommand, cli.json),
        Commands::Status => cmd::status::run(&root, today, cli.json),
        Commands::History => cmd::history::run(&root, cli.json),
        Commands::Export { out } => cmd::export::run(&root, out.as_deref(), cli.json),
        Commands::Reset { yes } => cmd::reset::run(&root, today, yes, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
