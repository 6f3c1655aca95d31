pub mod config;
pub mod loader;
pub mod matcher;

// Re-export main types
pub use config::{PatternRuleSpec, PolicyDocument, Severity};
pub use loader::{load_policy, PatternRule, Policy, PolicyError};
pub use matcher::{ExceptionResolver, PathGlobs};
