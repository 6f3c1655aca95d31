use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::DEFAULT_POLICY_PATH;

/// Reference policy: leaked demo credentials, legacy branding, insecure OAuth
/// redirect URIs and string-built SQL.
pub const REFERENCE_POLICY: &str = r##"{
  "version": "1.0.0",
  "scanPaths": [
    "backend/crates/server/src/handlers",
    "backend/crates",
    "frontend/src"
  ],
  "exclusions": [
    "archive/**",
    "**/tests/**",
    "**/*.test.ts",
    "**/node_modules/**",
    "**/target/**"
  ],
  "forbiddenPatterns": [
    {
      "id": "demo-credentials",
      "pattern": "(?i)(demo@example\\.com|admin:admin|password123|demo_password)",
      "message": "Demo credentials must not ship in production code",
      "severity": "error"
    },
    {
      "id": "legacy-branding",
      "pattern": "(?i)\\blegacy[ _-]?pos\\b",
      "message": "Legacy product branding should be replaced",
      "severity": "warning"
    },
    {
      "id": "insecure-oauth-redirect",
      "pattern": "(?i)redirect_uri[\"']?\\s*[:=]\\s*[\"']?http://",
      "message": "OAuth redirect URIs must use https",
      "severity": "error"
    },
    {
      "id": "sql-string-interpolation",
      "pattern": "(?i)(format!\\(\\s*\"\\s*(select|insert|update|delete)\\b[^\"]*\\{|`\\s*(select|insert|update|delete)\\b[^`]*\\$\\{)",
      "message": "SQL must use bound parameters, not string interpolation",
      "severity": "error"
    }
  ],
  "allowedExceptions": {
    "demo-credentials": [
      "**/fixtures/**",
      "**/examples/**"
    ]
  }
}
"##;

pub fn generate_policy(force: bool) -> Result<()> {
    generate_policy_at_path(DEFAULT_POLICY_PATH, force)
}

pub fn generate_policy_at_path<P: AsRef<Path>>(path: P, force: bool) -> Result<()> {
    let policy_path = path.as_ref();

    if policy_path.exists() && !force {
        return Err(anyhow::anyhow!(
            "{} already exists. Use --force to overwrite it.",
            policy_path.display()
        ));
    }

    if let Some(parent) = policy_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(policy_path, REFERENCE_POLICY)?;
    tracing::info!(path = %policy_path.display(), "wrote reference policy");

    Ok(())
}
