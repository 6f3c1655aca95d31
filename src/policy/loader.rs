use glob::Pattern;
use regex::bytes::Regex;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

use super::config::{PolicyDocument, Severity};
use super::matcher::{ExceptionResolver, PathGlobs};

/// Fatal policy problems; nothing is scanned when loading fails
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("failed to read policy {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse policy {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("policy {} is invalid ({} problems):\n  - {}", .path.display(), .problems.len(), .problems.join("\n  - "))]
    Invalid { path: PathBuf, problems: Vec<String> },
}

impl PolicyError {
    /// Every schema problem found, empty for read/parse failures
    pub fn problems(&self) -> &[String] {
        match self {
            PolicyError::Invalid { problems, .. } => problems,
            _ => &[],
        }
    }
}

/// A forbidden pattern with its regex compiled once at load time
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub id: String,
    pub regex: Regex,
    pub message: String,
    pub severity: Severity,
}

/// Validated, immutable policy shared by reference across the whole run
#[derive(Debug, Clone)]
pub struct Policy {
    pub version: String,
    pub scan_paths: Vec<String>,
    pub exclusions: PathGlobs,
    pub rules: Vec<PatternRule>,
    pub exceptions: ExceptionResolver,
    document: PolicyDocument,
}

impl Policy {
    /// The document this policy was built from
    pub fn document(&self) -> &PolicyDocument {
        &self.document
    }

    /// Validate a parsed document and compile it.
    ///
    /// Every problem is collected before failing so a broken policy is
    /// diagnosed in one pass. `origin` only labels the error.
    pub fn from_document(document: PolicyDocument, origin: &Path) -> Result<Self, PolicyError> {
        let mut problems = Vec::new();

        if document.version.trim().is_empty() {
            problems.push("version: must be a non-empty string".to_string());
        }

        if document.scan_paths.is_empty() {
            problems.push("scanPaths: at least one directory root is required".to_string());
        }
        for (idx, scan_path) in document.scan_paths.iter().enumerate() {
            if let Some(problem) = check_scan_path(scan_path) {
                problems.push(format!("scanPaths[{}]: {}", idx, problem));
            }
        }

        let exclusions = compile_globs("exclusions", &document.exclusions, &mut problems);

        let mut rules = Vec::with_capacity(document.forbidden_patterns.len());
        let mut seen_ids = HashSet::new();
        for (idx, spec) in document.forbidden_patterns.iter().enumerate() {
            let label = if spec.id.trim().is_empty() {
                format!("forbiddenPatterns[{}]", idx)
            } else {
                format!("forbiddenPatterns[{}] ({})", idx, spec.id)
            };

            if spec.id.trim().is_empty() {
                problems.push(format!("{}: id must be a non-empty string", label));
            } else if !seen_ids.insert(spec.id.as_str()) {
                problems.push(format!("{}: duplicate id '{}'", label, spec.id));
            }

            if spec.message.trim().is_empty() {
                problems.push(format!("{}: message must be a non-empty string", label));
            }

            let severity = Severity::parse(&spec.severity);
            if severity.is_none() {
                problems.push(format!(
                    "{}: severity '{}' is not one of: error, warning",
                    label, spec.severity
                ));
            }

            let regex = if spec.pattern.is_empty() {
                problems.push(format!("{}: pattern must be a non-empty regex", label));
                None
            } else {
                match Regex::new(&spec.pattern) {
                    Ok(regex) => Some(regex),
                    Err(err) => {
                        problems.push(format!("{}: pattern does not compile: {}", label, err));
                        None
                    }
                }
            };

            if let (Some(regex), Some(severity)) = (regex, severity) {
                rules.push(PatternRule {
                    id: spec.id.clone(),
                    regex,
                    message: spec.message.clone(),
                    severity,
                });
            }
        }

        let mut by_pattern = HashMap::new();
        for (pattern_id, globs) in &document.allowed_exceptions {
            if !seen_ids.contains(pattern_id.as_str()) {
                problems.push(format!(
                    "allowedExceptions.{}: no forbidden pattern has this id",
                    pattern_id
                ));
            }
            let field = format!("allowedExceptions.{}", pattern_id);
            by_pattern.insert(pattern_id.clone(), compile_globs(&field, globs, &mut problems));
        }

        if !problems.is_empty() {
            return Err(PolicyError::Invalid {
                path: origin.to_path_buf(),
                problems,
            });
        }

        Ok(Policy {
            version: document.version.clone(),
            scan_paths: document.scan_paths.clone(),
            exclusions,
            rules,
            exceptions: ExceptionResolver::new(by_pattern),
            document,
        })
    }
}

/// Read, parse and validate the policy document at `path`
pub fn load_policy<P: AsRef<Path>>(path: P) -> Result<Policy, PolicyError> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|source| PolicyError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let document: PolicyDocument =
        serde_json::from_str(&content).map_err(|source| PolicyError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let policy = Policy::from_document(document, path)?;
    tracing::debug!(
        policy = %path.display(),
        version = %policy.version,
        rules = policy.rules.len(),
        exclusions = policy.exclusions.len(),
        "loaded policy"
    );
    Ok(policy)
}

fn check_scan_path(scan_path: &str) -> Option<String> {
    if scan_path.trim().is_empty() {
        return Some("must be a non-empty string".to_string());
    }

    let path = Path::new(scan_path);
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Some(format!("'{}' must not leave the repository root", scan_path))
            }
            Component::RootDir | Component::Prefix(_) => {
                return Some(format!("'{}' must be relative to the repository root", scan_path))
            }
        }
    }

    if let Err(err) = Pattern::new(scan_path) {
        return Some(format!("'{}' is not glob-safe: {}", scan_path, err));
    }

    None
}

fn compile_globs(field: &str, raw: &[String], problems: &mut Vec<String>) -> PathGlobs {
    let mut patterns = Vec::with_capacity(raw.len());
    for (idx, glob) in raw.iter().enumerate() {
        if glob.trim().is_empty() {
            problems.push(format!("{}[{}]: must be a non-empty glob", field, idx));
            continue;
        }
        match Pattern::new(glob) {
            Ok(pattern) => patterns.push(pattern),
            Err(err) => problems.push(format!("{}[{}]: invalid glob '{}': {}", field, idx, glob, err)),
        }
    }
    PathGlobs::new(patterns)
}
