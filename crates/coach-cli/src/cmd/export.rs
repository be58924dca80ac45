use crate::output::print_json;
use anyhow::Context;
use coach_core::session::PlanSession;
use std::path::Path;

pub fn run(root: &Path, out: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let session = PlanSession::open(root);
    let dir = out.unwrap_or_else(|| Path::new("."));
    let path = session.export(dir).context("failed to export plan")?;

    if json {
        print_json(&serde_json::json!({ "path": path }))?;
    } else {
        println!("Exported plan to {}", path.display());
    }
    Ok(())
}
