use anyhow::Result;

use crate::cli::{ConfigSourceArgs, ProfileArg, ScanArgs};
use crate::commands::scan::{emit, run_scan, summarize};
use crate::commands::validate::{run_validation, selected_profile};
use release_gate::config::GateConfig;
use release_gate::exit_code;

pub fn handle_check(
    args: ScanArgs,
    profile: Option<ProfileArg>,
    source: ConfigSourceArgs,
    exit_zero: bool,
    quiet: bool,
    config: &GateConfig,
) -> Result<i32> {
    let mut report = run_scan(&args, config)?;
    summarize(&report, quiet);

    match selected_profile(profile, config)? {
        Some(profile) => {
            let result = run_validation(profile, &source, config)?;
            if !result.is_passing() && !quiet {
                eprintln!(
                    "Configuration invalid for profile '{}': {} problems",
                    result.profile,
                    result.problem_count()
                );
            }
            report.config_validation = Some(result);
        }
        None => tracing::debug!("no runtime profile selected, skipping configuration validation"),
    }

    emit(&report, &args, config, quiet)?;

    let code = exit_code(&report);
    if code != 0 && !exit_zero {
        eprintln!("Exiting with error: release gate failed");
        return Ok(code);
    }
    Ok(0)
}
