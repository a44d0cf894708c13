use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::CliArgs;

mod pipeline;
mod settings;

pub use pipeline::build_catalog;

pub fn run(cli: &CliArgs) -> Result<()> {
    let settings = settings::load_settings(cli)?;
    let output = settings.paths.output.clone();

    let (catalog, summary) = build_catalog(&settings, Utc::now())?;
    info!(
        "Catalog ready: {} selected ({} kept, {} same-song duplicates), {} of {} curated, {} padded",
        summary.selected,
        summary.merge.primary,
        summary.merge.primary_duplicates,
        summary.merge.curated_added,
        summary.curated_rows,
        summary.merge.padded
    );

    catalog
        .write_to(&output)
        .with_context(|| format!("Failed to write catalog to {}", output.display()))?;

    println!("Wrote {} songs to {}", catalog.songs.len(), output.display());
    Ok(())
}
