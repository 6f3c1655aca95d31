use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{handle_check, handle_init, handle_policy, handle_scan, handle_validate, load_settings};
use release_gate::logging::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let quiet = cli.quiet;
    let config_file = cli.config_file.as_deref();

    let code = match cli.command {
        Commands::Scan { scan, exit_zero } => {
            handle_scan(scan, exit_zero, quiet, &load_settings(config_file)?)?
        }
        Commands::Validate { profile, source, json } => {
            handle_validate(profile, source, json, quiet, &load_settings(config_file)?)?
        }
        Commands::Check { scan, profile, source, exit_zero } => {
            handle_check(scan, profile, source, exit_zero, quiet, &load_settings(config_file)?)?
        }
        Commands::Init { path, force } => handle_init(path, force, quiet)?,
        Commands::Policy { policy, show, validate } => {
            handle_policy(policy, show, validate, &load_settings(config_file)?)?
        }
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
