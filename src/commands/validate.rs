use anyhow::Result;

use crate::cli::{ConfigSourceArgs, ProfileArg};
use release_gate::config::GateConfig;
use release_gate::output::format_validation_text;
use release_gate::profile::source::{from_process_env, load_env_file, load_toml_config};
use release_gate::{validate, ConfigMap, ConfigValidationResult, ProfileName};

pub fn handle_validate(
    profile: Option<ProfileArg>,
    source: ConfigSourceArgs,
    json: bool,
    quiet: bool,
    config: &GateConfig,
) -> Result<i32> {
    let profile = match selected_profile(profile, config)? {
        Some(profile) => profile,
        None => anyhow::bail!("No runtime profile selected. Pass --profile or set `profile` in release-gate.toml"),
    };

    let result = run_validation(profile, &source, config)?;

    if !quiet {
        if json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print!("{}", format_validation_text(&result));
        }
    }

    if result.is_passing() {
        Ok(0)
    } else {
        if !quiet {
            eprintln!(
                "Configuration invalid for profile '{}': {} problems",
                result.profile,
                result.problem_count()
            );
        }
        Ok(1)
    }
}

pub fn selected_profile(profile: Option<ProfileArg>, config: &GateConfig) -> Result<Option<ProfileName>> {
    match profile {
        Some(profile) => Ok(Some(profile.into())),
        None => config.profile(),
    }
}

pub fn run_validation(
    profile: ProfileName,
    source: &ConfigSourceArgs,
    config: &GateConfig,
) -> Result<ConfigValidationResult> {
    let values = collect_values(source)?;
    let runtime_profile = config.runtime_profile(profile);
    Ok(validate(&runtime_profile, &values))
}

/// Merge the configured sources; later sources win: TOML, `.env`, process env
pub fn collect_values(source: &ConfigSourceArgs) -> Result<ConfigMap> {
    let mut values = ConfigMap::new();

    if let Some(path) = &source.config {
        values.extend(load_toml_config(path)?);
    }
    if let Some(path) = &source.env_file {
        values.extend(load_env_file(path)?);
    }
    if source.from_env {
        values.extend(from_process_env());
    }

    if values.is_empty() {
        tracing::warn!("no configuration values supplied; every required field will be reported missing");
    }
    Ok(values)
}
