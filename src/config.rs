use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Context, Result};

use crate::output::OutputFormat;
use crate::profile::{ProfileName, RuntimeProfile};
use crate::scanner::DEFAULT_MAX_EXCERPT_LEN;

pub const CONFIG_FILE_NAME: &str = "release-gate.toml";
pub const DEFAULT_POLICY_PATH: &str = "release-policy.json";
pub const DEFAULT_BUDGET_SECS: u64 = 300;

/// Settings read from `release-gate.toml`; every CLI flag overrides its field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GateConfig {
    /// Policy document path
    pub policy: Option<PathBuf>,

    /// Repository root scan paths are relative to
    pub root: Option<PathBuf>,

    /// Output format (text, json, both)
    pub format: Option<String>,

    /// Report output path
    pub output: Option<PathBuf>,

    /// Runtime profile checked by `check` (dev, demo, prod)
    pub profile: Option<String>,

    /// Scan budget in seconds; 0 disables it
    pub budget_secs: Option<u64>,

    /// Scanner worker count; 0 means one per core
    pub threads: Option<usize>,

    pub max_excerpt_len: Option<usize>,

    /// Per-profile overrides of the built-in definitions
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileOverride>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileOverride {
    pub required_fields: Option<Vec<String>>,
    pub placeholder_patterns: Option<Vec<String>>,
}

impl GateConfig {
    pub fn policy_path(&self) -> PathBuf {
        self.policy
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_POLICY_PATH))
    }

    pub fn root(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        match self.format.as_deref() {
            Some(format) => format.parse(),
            None => Ok(OutputFormat::Text),
        }
    }

    pub fn profile(&self) -> Result<Option<ProfileName>> {
        self.profile.as_deref().map(str::parse).transpose()
    }

    pub fn budget(&self) -> Option<Duration> {
        match self.budget_secs.unwrap_or(DEFAULT_BUDGET_SECS) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }

    pub fn max_excerpt_len(&self) -> usize {
        self.max_excerpt_len.unwrap_or(DEFAULT_MAX_EXCERPT_LEN)
    }

    /// Built-in profile with any `[profiles.<name>]` overrides applied
    pub fn runtime_profile(&self, name: ProfileName) -> RuntimeProfile {
        let mut profile = RuntimeProfile::builtin(name);
        if let Some(overrides) = self.profiles.get(name.as_str()) {
            if let Some(required) = &overrides.required_fields {
                profile.required_fields = required.clone();
            }
            if let Some(patterns) = &overrides.placeholder_patterns {
                profile.placeholder_patterns = patterns.clone();
            }
        }
        profile
    }
}

/// Load `release-gate.toml` from the current directory, or defaults when absent
pub fn load_config() -> Result<GateConfig> {
    let config_path = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        return Ok(GateConfig::default());
    }

    load_config_from(&config_path)
}

/// Load an explicitly named settings file; a missing file is an error
pub fn load_config_from<P: AsRef<Path>>(path: P) -> Result<GateConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}: {}", CONFIG_FILE_NAME, path.display()))?;

    let config: GateConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, path.display()))?;

    for name in config.profiles.keys() {
        name.parse::<ProfileName>()
            .with_context(|| format!("Invalid [profiles.{}] section in {}", name, path.display()))?;
    }

    Ok(config)
}
