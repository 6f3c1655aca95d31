pub mod config;
pub mod init;
pub mod logging;
pub mod output;
pub mod policy;
pub mod profile;
pub mod report;
pub mod scanner;

// Re-export main types for easy access
pub use output::OutputFormat;
pub use policy::{load_policy, Policy, PolicyError, Severity};
pub use profile::{validate, ConfigMap, ConfigValidationResult, ProfileName, RuntimeProfile};
pub use report::{aggregate, exit_code, ScanReport, Violation};
pub use scanner::{ScanError, ScanOptions, Scanner};
