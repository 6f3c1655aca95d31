use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::policy::Severity;
use crate::profile::ConfigValidationResult;
use crate::report::{ScanReport, Violation};

/// Where `both` writes the JSON report when no output path is given
pub const DEFAULT_REPORT_PATH: &str = "release-gate-report.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
    Both,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "both" => Ok(OutputFormat::Both),
            other => Err(anyhow::anyhow!(
                "Unknown output format '{}' (expected text, json or both)",
                other
            )),
        }
    }
}

/// Emit `report` in `format`.
///
/// `text` and `json` go to `output` when given, stdout otherwise. `both`
/// writes JSON to `output` (or [`DEFAULT_REPORT_PATH`]) and echoes the text
/// report to stdout. `quiet` only silences stdout.
pub fn emit_report(
    report: &ScanReport,
    format: OutputFormat,
    output: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    match format {
        OutputFormat::Text => deliver(&format_text_report(report), output, quiet),
        OutputFormat::Json => deliver(&format_json_report(report)?, output, quiet),
        OutputFormat::Both => {
            let path = output
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH));
            write_file(&path, &format_json_report(report)?)?;
            tracing::info!(path = %path.display(), "wrote JSON report");
            if !quiet {
                println!("{}", format_text_report(report));
            }
            Ok(())
        }
    }
}

fn deliver(content: &str, output: Option<&Path>, quiet: bool) -> Result<()> {
    match output {
        Some(path) => write_file(path, content),
        None => {
            if !quiet {
                println!("{}", content);
            }
            Ok(())
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory: {}", parent.display()))?;
    }
    fs::write(path, content)
        .with_context(|| format!("Failed to write report: {}", path.display()))
}

pub fn format_json_report(report: &ScanReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize scan report")
}

/// Human-readable report: errors before warnings, grouped by file
pub fn format_text_report(report: &ScanReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "🔍 Release Gate Scan (policy v{})\n",
        report.policy_version
    ));
    output.push_str(&format!(
        "📄 {} files scanned in {}ms\n",
        report.scanned_file_count, report.duration_ms
    ));
    output.push_str(&format!(
        "🚫 {} errors  ⚠️ {} warnings\n",
        report.error_count(),
        report.warning_count()
    ));

    if report.violations.is_empty() {
        output.push_str("\n✅ No violations found!\n");
    }

    for severity in Severity::ALL {
        let group: Vec<&Violation> = report
            .violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect();
        if group.is_empty() {
            continue;
        }

        let heading = match severity {
            Severity::Error => "Errors",
            Severity::Warning => "Warnings",
        };
        output.push_str(&format!("\n{} ({}):\n", heading, group.len()));

        let mut current_file: Option<&str> = None;
        for violation in group {
            if current_file != Some(violation.file.as_str()) {
                output.push_str(&format!("  {}\n", violation.file));
                current_file = Some(violation.file.as_str());
            }
            output.push_str(&format!(
                "    {:>5}  [{}] {}\n",
                violation.line, violation.pattern_id, violation.message
            ));
            if !violation.excerpt.is_empty() {
                output.push_str(&format!("           │ {}\n", violation.excerpt));
            }
        }
    }

    if !report.warnings.is_empty() {
        output.push_str(&format!("\nScan warnings ({}):\n", report.warnings.len()));
        for warning in &report.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    if let Some(validation) = &report.config_validation {
        output.push('\n');
        output.push_str(&format_validation_text(validation));
    }

    output
}

pub fn format_validation_text(result: &ConfigValidationResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("⚙️  Runtime profile '{}'\n", result.profile));

    if !result.missing_fields.is_empty() {
        output.push_str(&format!(
            "  🚫 Missing required fields ({}):\n",
            result.missing_fields.len()
        ));
        for field in &result.missing_fields {
            output.push_str(&format!("     - {}\n", field));
        }
    }

    if !result.placeholder_violations.is_empty() {
        output.push_str(&format!(
            "  🚫 Placeholder secrets ({}):\n",
            result.placeholder_violations.len()
        ));
        for violation in &result.placeholder_violations {
            output.push_str(&format!(
                "     - {} matches placeholder '{}'\n",
                violation.field, violation.matched_pattern
            ));
        }
    }

    for warning in &result.canonical_key_warnings {
        output.push_str(&format!(
            "  ⚠️  {} is deprecated, use {}\n",
            warning.deprecated_key, warning.canonical_key
        ));
    }

    if result.is_passing() {
        output.push_str("  ✅ Configuration is valid\n");
    }

    output
}
