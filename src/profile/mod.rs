//! Runtime profile validation.
//!
//! A profile names the configuration keys a deployment must set and the
//! placeholder values that must never reach it. Validation always reports
//! every problem at once: missing keys, placeholder secrets and legacy key
//! names are accumulated into one [`ConfigValidationResult`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub mod source;

/// Flat key -> value configuration snapshot (environment, `.env`, TOML)
pub type ConfigMap = BTreeMap<String, String>;

/// Legacy key names and the canonical key each one maps onto
pub const CANONICAL_KEYS: &[(&str, &str)] = &[("DATABASE_URL", "DATABASE_PATH")];

pub const PROD_REQUIRED_FIELDS: &[&str] = &["DATABASE_PATH", "STORE_ID", "JWT_SECRET"];

pub const PROD_PLACEHOLDER_PATTERNS: &[&str] = &[
    "CHANGE_ME",
    "CHANGEME",
    "REPLACE_ME",
    "secret123",
    "your-secret-here",
    "dev-secret",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileName {
    Dev,
    Demo,
    Prod,
}

impl ProfileName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileName::Dev => "dev",
            ProfileName::Demo => "demo",
            ProfileName::Prod => "prod",
        }
    }
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(ProfileName::Dev),
            "demo" => Ok(ProfileName::Demo),
            "prod" => Ok(ProfileName::Prod),
            other => Err(anyhow::anyhow!(
                "Unknown profile '{}' (expected dev, demo or prod)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeProfile {
    pub name: ProfileName,
    /// Keys that must be present and non-empty, checked in this order
    pub required_fields: Vec<String>,
    /// Case-insensitive substrings marking a value as a stand-in secret
    pub placeholder_patterns: Vec<String>,
}

impl RuntimeProfile {
    /// Built-in definition: only `prod` requires fields and rejects placeholders
    pub fn builtin(name: ProfileName) -> Self {
        let (required_fields, placeholder_patterns): (&[&str], &[&str]) = match name {
            ProfileName::Dev | ProfileName::Demo => (&[], &[]),
            ProfileName::Prod => (PROD_REQUIRED_FIELDS, PROD_PLACEHOLDER_PATTERNS),
        };

        Self {
            name,
            required_fields: required_fields.iter().map(|s| s.to_string()).collect(),
            placeholder_patterns: placeholder_patterns.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderViolation {
    pub field: String,
    pub matched_pattern: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalKeyWarning {
    pub deprecated_key: String,
    pub canonical_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigValidationResult {
    pub profile: ProfileName,
    pub missing_fields: Vec<String>,
    pub placeholder_violations: Vec<PlaceholderViolation>,
    /// Informational only, never fails validation
    pub canonical_key_warnings: Vec<CanonicalKeyWarning>,
}

impl ConfigValidationResult {
    pub fn is_passing(&self) -> bool {
        self.missing_fields.is_empty() && self.placeholder_violations.is_empty()
    }

    /// Number of problems that fail validation
    pub fn problem_count(&self) -> usize {
        self.missing_fields.len() + self.placeholder_violations.len()
    }
}

/// Validate `config` against `profile`, aggregating every problem
pub fn validate(profile: &RuntimeProfile, config: &ConfigMap) -> ConfigValidationResult {
    let (effective, canonical_key_warnings) = resolve_canonical_keys(config);

    let missing_fields = profile
        .required_fields
        .iter()
        .filter(|field| {
            effective
                .get(field.as_str())
                .is_none_or(|value| value.trim().is_empty())
        })
        .cloned()
        .collect();

    let patterns: Vec<(&str, String)> = profile
        .placeholder_patterns
        .iter()
        .filter(|pattern| !pattern.is_empty())
        .map(|pattern| (pattern.as_str(), pattern.to_lowercase()))
        .collect();

    let first_placeholder = |value: &str| {
        let value = value.to_lowercase();
        patterns
            .iter()
            .find(|(_, needle)| value.contains(needle.as_str()))
            .map(|(pattern, _)| pattern.to_string())
    };

    let mut placeholder_violations = Vec::new();
    for (field, value) in &effective {
        if let Some(matched_pattern) = first_placeholder(value.as_str()) {
            placeholder_violations.push(PlaceholderViolation {
                field: field.clone(),
                matched_pattern,
            });
        }
    }

    // Legacy values shadowed by their canonical key are still deployed config
    for (deprecated, canonical) in CANONICAL_KEYS {
        let Some(legacy_value) = config.get(*deprecated) else {
            continue;
        };
        if !config.contains_key(*canonical) {
            continue;
        }
        if let Some(matched_pattern) = first_placeholder(legacy_value.as_str()) {
            placeholder_violations.push(PlaceholderViolation {
                field: deprecated.to_string(),
                matched_pattern,
            });
        }
    }

    let result = ConfigValidationResult {
        profile: profile.name,
        missing_fields,
        placeholder_violations,
        canonical_key_warnings,
    };

    tracing::debug!(
        profile = %profile.name,
        missing = result.missing_fields.len(),
        placeholders = result.placeholder_violations.len(),
        deprecated = result.canonical_key_warnings.len(),
        "validated runtime configuration"
    );

    result
}

/// Fold legacy keys onto their canonical names.
///
/// A legacy value is adopted (with a warning) only when the canonical key is
/// absent; when both are set the canonical value wins. Legacy keys never
/// appear in the returned map.
pub fn resolve_canonical_keys(config: &ConfigMap) -> (ConfigMap, Vec<CanonicalKeyWarning>) {
    let mut effective = config.clone();
    let mut warnings = Vec::new();

    for (deprecated, canonical) in CANONICAL_KEYS {
        let Some(legacy_value) = effective.remove(*deprecated) else {
            continue;
        };
        if effective.contains_key(*canonical) {
            continue;
        }

        tracing::warn!(
            deprecated_key = %deprecated,
            canonical_key = %canonical,
            "deprecated configuration key in use"
        );
        effective.insert(canonical.to_string(), legacy_value);
        warnings.push(CanonicalKeyWarning {
            deprecated_key: deprecated.to_string(),
            canonical_key: canonical.to_string(),
        });
    }

    (effective, warnings)
}
