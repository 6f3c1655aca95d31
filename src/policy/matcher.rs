use glob::{MatchOptions, Pattern};
use std::collections::HashMap;

/// `*` stays inside one path segment; `**` crosses directories
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled set of path globs matched against `/`-separated repository paths
#[derive(Debug, Clone, Default)]
pub struct PathGlobs {
    patterns: Vec<Pattern>,
}

impl PathGlobs {
    pub fn new(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }

    /// Compile raw glob strings, failing on the first invalid one
    pub fn compile<S: AsRef<str>>(raw: &[S]) -> Result<Self, glob::PatternError> {
        let patterns = raw
            .iter()
            .map(|glob| Pattern::new(glob.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when `path` or any of its ancestor directories matches a glob.
    ///
    /// Checking ancestors makes `archive` and `archive/**` both remove
    /// everything below `archive/`, however deep.
    pub fn matches(&self, path: &str) -> bool {
        if self.is_empty() {
            return false;
        }

        let mut candidate = path.trim_end_matches('/');
        loop {
            if !candidate.is_empty() && self.matches_exact(candidate) {
                return true;
            }
            match candidate.rfind('/') {
                Some(idx) => candidate = &candidate[..idx],
                None => return false,
            }
        }
    }

    fn matches_exact(&self, path: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(path, MATCH_OPTIONS))
    }
}

/// Per-pattern allow-list: files matching a pattern's globs are exempt from
/// that pattern only. Pure lookup, safe to share across matcher workers.
#[derive(Debug, Clone, Default)]
pub struct ExceptionResolver {
    by_pattern: HashMap<String, PathGlobs>,
}

impl ExceptionResolver {
    pub fn new(by_pattern: HashMap<String, PathGlobs>) -> Self {
        Self { by_pattern }
    }

    /// Whether `file` is exempt from the rule `pattern_id`
    pub fn is_excepted(&self, pattern_id: &str, file: &str) -> bool {
        self.by_pattern
            .get(pattern_id)
            .is_some_and(|globs| globs.matches(file))
    }
}
