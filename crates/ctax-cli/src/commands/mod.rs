//! Subcommands of the `ctax` binary.

pub mod batch;
pub mod config;
pub mod extract;

use std::path::Path;

use tracing::debug;

use ctax_core::CtaxConfig;

/// Load the configuration named on the command line, else the user's
/// configuration file if one exists, else the defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CtaxConfig> {
    if let Some(path) = config_path {
        return Ok(CtaxConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using configuration from {}", default_path.display());
        Ok(CtaxConfig::from_file(&default_path)?)
    } else {
        Ok(CtaxConfig::default())
    }
}
