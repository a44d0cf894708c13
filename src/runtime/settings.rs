use anyhow::{Context, Result, anyhow};
use tracing::debug;

use crate::CliArgs;
use crate::config;

/// Load settings and layer the command-line overrides on top.
///
/// A broken config is fatal: falling back to defaults would quietly build a
/// different catalog.
pub fn load_settings(cli: &CliArgs) -> Result<config::Settings> {
    let mut settings = config::Settings::load().context("Failed to load configuration")?;
    apply_overrides(&mut settings, cli);
    settings
        .validate()
        .map_err(|msg| anyhow!("Invalid configuration: {msg}"))?;
    debug!("Effective settings: {:?}", settings);
    Ok(settings)
}

fn apply_overrides(settings: &mut config::Settings, cli: &CliArgs) {
    if let Some(p) = &cli.dataset {
        settings.paths.dataset = p.clone();
    }
    if let Some(p) = &cli.curated {
        settings.paths.curated = p.clone();
    }
    if let Some(p) = &cli.output {
        settings.paths.output = p.clone();
    }
    if let Some(seed) = cli.seed {
        settings.selection.seed = seed;
    }
    if let Some(size) = cli.catalog_size {
        settings.selection.catalog_size = size;
    }
}
