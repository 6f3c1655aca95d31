use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Severity of a forbidden pattern: errors fail the gate, warnings are reported only
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Every severity in reporting order (errors first)
    pub const ALL: [Severity; 2] = [Severity::Error, Severity::Warning];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    /// Parse the raw policy string; anything but `error`/`warning` is rejected
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `forbiddenPatterns` entry exactly as written in the policy document.
///
/// Fields default to empty and severity stays a raw string so that a broken
/// rule is reported by validation together with every other problem instead
/// of failing the JSON parse on the first one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PatternRuleSpec {
    #[serde(default)]
    pub id: String,
    /// Regular expression, evaluated against one line at a time
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub severity: String,
}

/// The versioned policy document driving exclusions and pattern matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDocument {
    #[serde(default)]
    pub version: String,
    /// Directory roots to scan, relative to the repository root
    #[serde(default)]
    pub scan_paths: Vec<String>,
    /// Globs removing files (and whole directories) from scanning
    #[serde(default)]
    pub exclusions: Vec<String>,
    #[serde(default)]
    pub forbidden_patterns: Vec<PatternRuleSpec>,
    /// Pattern id -> globs of files exempt from that single pattern
    #[serde(default)]
    pub allowed_exceptions: BTreeMap<String, Vec<String>>,
}
