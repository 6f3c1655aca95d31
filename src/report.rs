use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::policy::Severity;
use crate::profile::ConfigValidationResult;

/// One rule match on one line of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Path relative to the repository root, `/`-separated
    pub file: String,
    /// 1-indexed
    pub line: usize,
    pub pattern_id: String,
    pub severity: Severity,
    pub message: String,
    pub excerpt: String,
}

impl Violation {
    fn sort_key(&self) -> (&str, usize, &str) {
        (self.file.as_str(), self.line, self.pattern_id.as_str())
    }
}

/// Run facts gathered by the scanner alongside its violations
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub policy_version: String,
    pub scanned_file_count: usize,
    pub skipped_binary_count: usize,
    pub warnings: Vec<String>,
    pub duration: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub timestamp: DateTime<Utc>,
    pub policy_version: String,
    pub scanned_file_count: usize,
    pub skipped_binary_count: usize,
    pub violations: Vec<Violation>,
    pub violations_by_severity: IndexMap<Severity, usize>,
    /// Missing scan roots and unreadable files; never fatal
    pub warnings: Vec<String>,
    pub duration_ms: u64,
    /// Runtime profile validation (only when a profile was checked)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_validation: Option<ConfigValidationResult>,
}

impl ScanReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.violations_by_severity.get(&severity).copied().unwrap_or(0)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Whether the gate lets this build through
    pub fn passed(&self) -> bool {
        self.error_count() == 0
            && self
                .config_validation
                .as_ref()
                .is_none_or(ConfigValidationResult::is_passing)
    }
}

/// Sort violations into their reporting order and count them per severity
pub fn aggregate(mut violations: Vec<Violation>, stats: RunStats) -> ScanReport {
    violations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let violations_by_severity = count_by_severity(&violations);

    let mut warnings = stats.warnings;
    warnings.sort();
    warnings.dedup();

    ScanReport {
        timestamp: Utc::now(),
        policy_version: stats.policy_version,
        scanned_file_count: stats.scanned_file_count,
        skipped_binary_count: stats.skipped_binary_count,
        violations,
        violations_by_severity,
        warnings,
        duration_ms: u64::try_from(stats.duration.as_millis()).unwrap_or(u64::MAX),
        config_validation: None,
    }
}

/// Count per severity, zero entries included, in `Severity::ALL` order
pub fn count_by_severity(violations: &[Violation]) -> IndexMap<Severity, usize> {
    let mut errors = 0;
    let mut warnings = 0;

    for violation in violations {
        let slot = match violation.severity {
            Severity::Error => &mut errors,
            Severity::Warning => &mut warnings,
        };
        *slot += 1;
    }

    let mut counts = IndexMap::with_capacity(Severity::ALL.len());
    for severity in Severity::ALL {
        let count = match severity {
            Severity::Error => errors,
            Severity::Warning => warnings,
        };
        counts.insert(severity, count);
    }
    counts
}

/// Process exit code for a finished run: 0 only when nothing blocks the release.
/// Warnings never change it.
pub fn exit_code(report: &ScanReport) -> i32 {
    if report.passed() {
        0
    } else {
        1
    }
}
