use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use coach_core::credential;
use std::path::Path;

#[derive(Subcommand)]
pub enum KeySubcommand {
    /// Store the API key locally
    Set {
        key: String,
        /// Save even if the key does not look like a generative-language key
        #[arg(long)]
        force: bool,
    },
    /// Show whether a key is configured (masked)
    Show,
    /// Remove the stored key
    Clear,
}

pub fn run(root: &Path, subcmd: KeySubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        KeySubcommand::Set { key, force } => set(root, &key, force, json),
        KeySubcommand::Show => show(root, json),
        KeySubcommand::Clear => clear(root, json),
    }
}

fn set(root: &Path, key: &str, force: bool, json: bool) -> anyhow::Result<()> {
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("API key is empty");
    }
    if !credential::looks_like_api_key(key) && !force {
        anyhow::bail!("the key does not look like a generative-language key (expected 'AI…'); pass --force to save anyway");
    }
    credential::save(root, key).context("failed to save API key")?;

    if json {
        print_json(&serde_json::json!({ "saved": true, "key": credential::mask(key) }))?;
    } else {
        println!("API key saved locally.");
    }
    Ok(())
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let key = credential::load(root).context("failed to read API key")?;

    if json {
        print_json(&serde_json::json!({
            "configured": key.is_some(),
            "key": key.as_deref().map(credential::mask),
        }))?;
        return Ok(());
    }

    match key {
        Some(k) => println!("API key: {}", credential::mask(&k)),
        None => println!("No API key configured. Run 'coach key set <KEY>'."),
    }
    Ok(())
}

fn clear(root: &Path, json: bool) -> anyhow::Result<()> {
    credential::clear(root).context("failed to remove API key")?;

    if json {
        print_json(&serde_json::json!({ "cleared": true }))?;
    } else {
        println!("API key removed.");
    }
    Ok(())
}
