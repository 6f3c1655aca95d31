use std::fs;
use std::io;
use std::path::Path;

use crate::policy::PatternRule;
use crate::report::Violation;

/// Bytes inspected when deciding whether a file is binary
pub const BINARY_SNIFF_LEN: usize = 8 * 1024;

/// Outcome of matching one file
#[derive(Debug, Clone, PartialEq)]
pub enum FileMatch {
    Text(Vec<Violation>),
    /// Skipped without error
    Binary,
}

/// Read `file` (relative to `root`) and match it against every rule that is
/// not excepted for it. I/O errors are returned to the caller, which records
/// them as scan warnings.
pub fn match_file<F>(
    root: &Path,
    file: &str,
    rules: &[PatternRule],
    is_excepted: F,
    max_excerpt_len: usize,
) -> io::Result<FileMatch>
where
    F: Fn(&str, &str) -> bool,
{
    let content = fs::read(root.join(file))?;
    if is_binary(&content) {
        tracing::debug!(file = %file, "skipping binary file");
        return Ok(FileMatch::Binary);
    }

    Ok(FileMatch::Text(match_content(
        file,
        &content,
        rules,
        is_excepted,
        max_excerpt_len,
    )))
}

/// Match raw file content line by line.
///
/// A rule yields at most one violation per line; different rules on the same
/// line each yield their own. Exceptions are resolved once per (rule, file).
pub fn match_content<F>(
    file: &str,
    content: &[u8],
    rules: &[PatternRule],
    is_excepted: F,
    max_excerpt_len: usize,
) -> Vec<Violation>
where
    F: Fn(&str, &str) -> bool,
{
    let active: Vec<&PatternRule> = rules
        .iter()
        .filter(|rule| {
            let excepted = is_excepted(rule.id.as_str(), file);
            if excepted {
                tracing::debug!(file = %file, rule = %rule.id, "rule suppressed by allowed exception");
            }
            !excepted
        })
        .collect();

    if active.is_empty() || content.is_empty() {
        return Vec::new();
    }

    // A final newline terminates the last line, it does not start a new one
    let body = content.strip_suffix(b"\n").unwrap_or(content);

    let mut violations = Vec::new();
    for (idx, line) in body.split(|&b| b == b'\n').enumerate() {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        for rule in &active {
            if rule.regex.is_match(line) {
                violations.push(Violation {
                    file: file.to_string(),
                    line: idx + 1,
                    pattern_id: rule.id.clone(),
                    severity: rule.severity,
                    message: rule.message.clone(),
                    excerpt: excerpt(line, max_excerpt_len),
                });
            }
        }
    }
    violations
}

pub fn is_binary(content: &[u8]) -> bool {
    let sniff = &content[..content.len().min(BINARY_SNIFF_LEN)];
    sniff.contains(&0)
}

/// Trimmed, lossily decoded line bounded to `max_len` characters
pub fn excerpt(line: &[u8], max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }

    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.chars().count() <= max_len {
        return text.to_string();
    }

    let mut bounded: String = text.chars().take(max_len.saturating_sub(1)).collect();
    bounded.push('…');
    bounded
}
