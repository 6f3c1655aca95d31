use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::cli::ScanArgs;
use release_gate::config::GateConfig;
use release_gate::output::emit_report;
use release_gate::{exit_code, load_policy, OutputFormat, ScanOptions, ScanReport, Scanner};

pub fn handle_scan(args: ScanArgs, exit_zero: bool, quiet: bool, config: &GateConfig) -> Result<i32> {
    let report = run_scan(&args, config)?;
    summarize(&report, quiet);
    emit(&report, &args, config, quiet)?;

    let code = exit_code(&report);
    if code != 0 && !exit_zero {
        eprintln!("Exiting with error due to forbidden patterns");
        return Ok(code);
    }
    Ok(0)
}

/// Load the policy and scan the tree, CLI flags overriding `release-gate.toml`
pub fn run_scan(args: &ScanArgs, config: &GateConfig) -> Result<ScanReport> {
    let policy_path = args.policy.clone().unwrap_or_else(|| config.policy_path());
    let policy = load_policy(&policy_path)?;
    tracing::info!(
        path = %policy_path.display(),
        version = %policy.version,
        rules = policy.rules.len(),
        "policy loaded"
    );

    let options = ScanOptions {
        root: args.root.clone().unwrap_or_else(|| config.root()),
        threads: args.threads.unwrap_or_else(|| config.threads()),
        budget: match args.budget_secs {
            Some(0) => None,
            Some(secs) => Some(std::time::Duration::from_secs(secs)),
            None => config.budget(),
        },
        max_excerpt_len: config.max_excerpt_len(),
    };

    let report = Scanner::new(&policy, options)
        .run()
        .context("Scan did not complete")?;
    tracing::info!(
        files = report.scanned_file_count,
        violations = report.violations.len(),
        duration_ms = report.duration_ms,
        "scan finished"
    );
    Ok(report)
}

pub fn summarize(report: &ScanReport, quiet: bool) {
    if quiet || report.violations.is_empty() {
        return;
    }
    eprintln!(
        "Violations found: {} total ({} errors, {} warnings)",
        report.violations.len(),
        report.error_count(),
        report.warning_count()
    );
}

pub fn emit(report: &ScanReport, args: &ScanArgs, config: &GateConfig, quiet: bool) -> Result<()> {
    let format = match args.format {
        Some(format) => OutputFormat::from(format),
        None => config.output_format()?,
    };
    let output: Option<PathBuf> = args.output.clone().or_else(|| config.output.clone());
    emit_report(report, format, output.as_deref(), quiet)
}
