use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "release-gate")]
#[command(about = "Block releases that ship forbidden patterns or placeholder secrets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Settings file (default: ./release-gate.toml when present)
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan source directories for forbidden patterns
    Scan {
        #[command(flatten)]
        scan: ScanArgs,

        /// Exit with code 0 even when errors are found
        #[arg(long)]
        exit_zero: bool,
    },
    /// Validate runtime configuration against a profile
    Validate {
        /// Runtime profile
        #[arg(short, long)]
        profile: Option<ProfileArg>,

        #[command(flatten)]
        source: ConfigSourceArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Scan, then validate the runtime profile when one is selected
    Check {
        #[command(flatten)]
        scan: ScanArgs,

        /// Runtime profile
        #[arg(short, long)]
        profile: Option<ProfileArg>,

        #[command(flatten)]
        source: ConfigSourceArgs,

        /// Exit with code 0 even when the gate fails
        #[arg(long)]
        exit_zero: bool,
    },
    /// Write the reference policy document
    Init {
        /// Destination (default: release-policy.json)
        path: Option<PathBuf>,

        /// Overwrite an existing policy
        #[arg(long)]
        force: bool,
    },
    /// Show or validate the policy document
    Policy {
        /// Policy document path
        #[arg(long)]
        policy: Option<PathBuf>,

        /// Show the parsed policy
        #[arg(long)]
        show: bool,

        /// Validate the policy
        #[arg(long)]
        validate: bool,
    },
}

#[derive(Args, Clone, Default)]
pub struct ScanArgs {
    /// Policy document path
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Repository root (default: current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Output format
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file (default: stdout; `both` defaults to release-gate-report.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Scan budget in seconds (0 disables it)
    #[arg(long)]
    pub budget_secs: Option<u64>,

    /// Worker threads (0 = one per core)
    #[arg(long)]
    pub threads: Option<usize>,
}

#[derive(Args, Clone, Default)]
pub struct ConfigSourceArgs {
    /// `.env` style file with KEY=VALUE lines
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Flat TOML table of configuration values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Read values from the process environment (highest precedence)
    #[arg(long)]
    pub from_env: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Both,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ProfileArg {
    Dev,
    Demo,
    Prod,
}

impl From<OutputFormat> for release_gate::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => release_gate::OutputFormat::Text,
            OutputFormat::Json => release_gate::OutputFormat::Json,
            OutputFormat::Both => release_gate::OutputFormat::Both,
        }
    }
}

impl From<ProfileArg> for release_gate::ProfileName {
    fn from(profile: ProfileArg) -> Self {
        match profile {
            ProfileArg::Dev => release_gate::ProfileName::Dev,
            ProfileArg::Demo => release_gate::ProfileName::Demo,
            ProfileArg::Prod => release_gate::ProfileName::Prod,
        }
    }
}
