pub mod check;
pub mod init;
pub mod policy;
pub mod scan;
pub mod validate;

pub use check::handle_check;
pub use init::handle_init;
pub use policy::handle_policy;
pub use scan::handle_scan;
pub use validate::handle_validate;

use anyhow::Result;
use std::path::Path;

use release_gate::config::{load_config, load_config_from, GateConfig};

/// `--config-file` when given, otherwise `./release-gate.toml` if present
pub fn load_settings(config_file: Option<&Path>) -> Result<GateConfig> {
    match config_file {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
}
