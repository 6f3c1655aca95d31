use anyhow::Result;
use std::path::PathBuf;

use release_gate::init;

pub fn handle_init(path: Option<PathBuf>, force: bool, quiet: bool) -> Result<i32> {
    match &path {
        Some(path) => init::generate_policy_at_path(path, force)?,
        None => init::generate_policy(force)?,
    }

    if !quiet {
        let written = path.unwrap_or_else(|| PathBuf::from(release_gate::config::DEFAULT_POLICY_PATH));
        println!("✅ Reference policy written to {}", written.display());
    }

    Ok(0)
}
