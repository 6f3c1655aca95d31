use anyhow::Result;
use std::path::PathBuf;

use release_gate::config::GateConfig;
use release_gate::load_policy;

pub fn handle_policy(policy: Option<PathBuf>, show: bool, validate: bool, config: &GateConfig) -> Result<i32> {
    if !show && !validate {
        eprintln!("Use --show or --validate");
        return Ok(1);
    }

    let path = policy.unwrap_or_else(|| config.policy_path());
    let loaded = match load_policy(&path) {
        Ok(loaded) => loaded,
        Err(e) => {
            let problems = e.problems();
            if problems.is_empty() {
                eprintln!("Policy validation failed: {}", e);
            } else {
                eprintln!(
                    "Policy validation failed: {} problems in {}",
                    problems.len(),
                    path.display()
                );
                for problem in problems {
                    eprintln!("  - {}", problem);
                }
            }
            return Ok(1);
        }
    };

    if show {
        println!("{}", serde_json::to_string_pretty(loaded.document())?);
    }

    if validate {
        println!(
            "Policy is valid: version {}, {} patterns, {} scan paths",
            loaded.version,
            loaded.rules.len(),
            loaded.scan_paths.len()
        );
    }

    Ok(0)
}
