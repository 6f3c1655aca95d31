//! Forbidden-pattern scanning.
//!
//! Files are enumerated once, matched in parallel on a bounded rayon pool and
//! handed to the report aggregator only after every worker has finished.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::policy::Policy;
use crate::report::{aggregate, RunStats, ScanReport, Violation};

pub mod matcher;
pub mod walker;

pub use matcher::{match_content, match_file, FileMatch};
pub use walker::{enumerate_files, Enumeration};

pub const DEFAULT_MAX_EXCERPT_LEN: usize = 160;

/// Fatal scan failures; a failed scan never produces a report
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("scan budget of {budget_ms}ms exceeded after {scanned} of {total} files; refusing to report a partial scan")]
    BudgetExceeded {
        budget_ms: u64,
        scanned: usize,
        total: usize,
    },

    #[error("failed to start scan workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Repository root every policy path is relative to
    pub root: PathBuf,
    /// Worker count; 0 uses one worker per available core
    pub threads: usize,
    /// Soft budget for the whole scan; `None` disables it
    pub budget: Option<Duration>,
    pub max_excerpt_len: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            threads: 0,
            budget: None,
            max_excerpt_len: DEFAULT_MAX_EXCERPT_LEN,
        }
    }
}

pub struct Scanner<'a> {
    policy: &'a Policy,
    options: ScanOptions,
}

impl<'a> Scanner<'a> {
    pub fn new(policy: &'a Policy, options: ScanOptions) -> Self {
        Self { policy, options }
    }

    /// Scan the tree and build the report.
    ///
    /// Fails closed: when the budget runs out before every file was matched
    /// the run is an error, never a partial "clean" report.
    pub fn run(&self) -> Result<ScanReport, ScanError> {
        let start = Instant::now();
        let deadline = self.options.budget.map(|budget| start + budget);

        let enumeration = enumerate_files(
            &self.options.root,
            &self.policy.scan_paths,
            &self.policy.exclusions,
        );
        let total = enumeration.files.len();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.threads)
            .build()?;

        let violations: Mutex<Vec<Violation>> = Mutex::new(Vec::new());
        let warnings: Mutex<Vec<String>> = Mutex::new(enumeration.warnings);
        let processed = AtomicUsize::new(0);
        let scanned = AtomicUsize::new(0);
        let binary = AtomicUsize::new(0);
        let out_of_budget = AtomicBool::new(false);

        pool.install(|| {
            enumeration.files.par_iter().for_each(|file| {
                if out_of_budget.load(Ordering::Relaxed) {
                    return;
                }
                if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                    out_of_budget.store(true, Ordering::Relaxed);
                    return;
                }

                let outcome = match_file(
                    &self.options.root,
                    file,
                    &self.policy.rules,
                    |pattern_id, path| self.policy.exceptions.is_excepted(pattern_id, path),
                    self.options.max_excerpt_len,
                );

                match outcome {
                    Ok(FileMatch::Text(found)) => {
                        scanned.fetch_add(1, Ordering::Relaxed);
                        if !found.is_empty() {
                            tracing::debug!(file = %file, violations = found.len(), "violations found");
                            violations
                                .lock()
                                .unwrap_or_else(PoisonError::into_inner)
                                .extend(found);
                        }
                    }
                    Ok(FileMatch::Binary) => {
                        binary.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(err) => {
                        tracing::warn!(file = %file, error = %err, "failed to read file");
                        warnings
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push(format!("unreadable file {}: {}", file, err));
                    }
                }
                processed.fetch_add(1, Ordering::Relaxed);
            });
        });

        let processed = processed.into_inner();
        if out_of_budget.into_inner() || processed < total {
            let budget_ms = self
                .options
                .budget
                .map(|budget| u64::try_from(budget.as_millis()).unwrap_or(u64::MAX))
                .unwrap_or(0);
            return Err(ScanError::BudgetExceeded {
                budget_ms,
                scanned: processed,
                total,
            });
        }

        let stats = RunStats {
            policy_version: self.policy.version.clone(),
            scanned_file_count: scanned.into_inner(),
            skipped_binary_count: binary.into_inner(),
            warnings: warnings.into_inner().unwrap_or_else(PoisonError::into_inner),
            duration: start.elapsed(),
        };

        let report = aggregate(
            violations.into_inner().unwrap_or_else(PoisonError::into_inner),
            stats,
        );

        tracing::info!(
            files = report.scanned_file_count,
            errors = report.error_count(),
            warnings = report.warning_count(),
            duration_ms = report.duration_ms,
            "scan complete"
        );

        Ok(report)
    }
}
