//! CLI-side config resolution: the layered file/env config from
//! `smartcity-config` with `GlobalOpts` flags applied on top.

use std::path::PathBuf;

use smartcity_config::Config;
use smartcity_core::CoreConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file this invocation reads (`--config` or the platform default).
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(smartcity_config::config_path)
}

/// Load the file + env config and apply CLI flag overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = smartcity_config::load_config_from(&config_path(global))?;

    if let Some(ref base_url) = global.base_url {
        cfg.api.base_url.clone_from(base_url);
    }
    if let Some(timeout_ms) = global.timeout_ms {
        cfg.api.timeout_ms = timeout_ms;
    }
    if let Some(ref favorites_file) = global.favorites_file {
        cfg.storage.favorites_file = Some(favorites_file.clone());
    }
    Ok(cfg)
}

/// Resolve the `CoreConfig` used to build the repository.
pub fn resolve(global: &GlobalOpts) -> Result<CoreConfig, CliError> {
    let cfg = load(global)?;
    let core = cfg.to_core_config()?;
    tracing::debug!(
        base_url = %core.base_url,
        timeout_ms = cfg.api.timeout_ms,
        favorites = %core.favorites_file.display(),
        "resolved configuration"
    );
    Ok(core)
}
