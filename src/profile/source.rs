use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::ConfigMap;

/// Load a `.env` style file: `KEY=VALUE` lines, `#` comments, optional
/// `export ` prefix and matching single or double quotes around the value.
pub fn load_env_file<P: AsRef<Path>>(path: P) -> Result<ConfigMap> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read env file: {}", path.display()))?;

    parse_env(&content).with_context(|| format!("Failed to parse env file: {}", path.display()))
}

pub fn parse_env(content: &str) -> Result<ConfigMap> {
    let mut config = ConfigMap::new();

    for (idx, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("line {}: expected KEY=VALUE", idx + 1))?;

        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("line {}: empty key", idx + 1);
        }

        config.insert(key.to_string(), unquote(value.trim()).to_string());
    }

    Ok(config)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Load a flat TOML table; scalar values are stringified, nested tables and
/// arrays are rejected.
pub fn load_toml_config<P: AsRef<Path>>(path: P) -> Result<ConfigMap> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_config(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

pub fn parse_toml_config(content: &str) -> Result<ConfigMap> {
    let table: toml::Table = toml::from_str(content)?;
    let mut config = ConfigMap::new();

    for (key, value) in table {
        let value = match value {
            toml::Value::String(s) => s,
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Datetime(d) => d.to_string(),
            toml::Value::Array(_) | toml::Value::Table(_) => {
                anyhow::bail!("key '{}' must be a scalar value", key)
            }
        };
        config.insert(key, value);
    }

    Ok(config)
}

/// Snapshot of the process environment (non-UTF-8 entries are skipped)
pub fn from_process_env() -> ConfigMap {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}
