use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod catalog;
mod config;
mod dataset;
mod error;
mod runtime;
mod selection;

#[cfg(test)]
mod test_support;

/// Build the decade-balanced blind-test song catalog.
///
/// Flags override the config file (`SONG_CATALOG_CONFIG_PATH` or
/// `~/.config/song-catalog/config.toml`) and `SONG_CATALOG__*` variables.
#[derive(Parser, Debug)]
#[command(name = "song-catalog", version)]
pub struct CliArgs {
    /// Primary dataset (CSV with header row).
    #[arg(long, value_name = "CSV")]
    pub dataset: Option<PathBuf>,

    /// Curated supplemental list (TSV with header row).
    #[arg(long, value_name = "TSV")]
    pub curated: Option<PathBuf>,

    /// Where to write the catalog JSON.
    #[arg(long, short, value_name = "JSON")]
    pub output: Option<PathBuf>,

    /// Seed for every random draw of the run.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of songs the catalog should reach.
    #[arg(long)]
    pub catalog_size: Option<usize>,
}

fn main() -> Result<()> {
    let cli = CliArgs::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .init();

    runtime::run(&cli)
}
