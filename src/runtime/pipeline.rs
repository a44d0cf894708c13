use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::catalog::{
    Catalog, CatalogEntry, CatalogMerger, EntryEnricher, MergeReport, SourceFiles, StageCounts,
};
use crate::config::Settings;
use crate::dataset::{self, LoadReport};
use crate::error::CatalogError;
use crate::selection::select_by_decade;

/// Stage counters of one run, used for the catalog metadata and notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub load: LoadReport,
    pub selected: usize,
    pub curated_rows: usize,
    pub merge: MergeReport,
}

impl RunSummary {
    pub fn counts(&self) -> StageCounts {
        StageCounts {
            loaded: self.load.accepted,
            selected: self.selected,
            curated: self.merge.curated_added,
            padded: self.merge.padded,
        }
    }
}

/// Run every stage and return the finished catalog without writing it.
///
/// One generator seeded from the settings drives both the decade sampling
/// and the padding shuffle, in that order.
pub fn build_catalog(
    settings: &Settings,
    generated_at: DateTime<Utc>,
) -> Result<(Catalog, RunSummary), CatalogError> {
    let paths = &settings.paths;
    for (kind, path) in [("dataset", &paths.dataset), ("curated list", &paths.curated)] {
        if !path.is_file() {
            return Err(CatalogError::MissingSource {
                kind,
                path: path.clone(),
            });
        }
    }

    let loaded = dataset::load_records_from_path(&paths.dataset, &settings.selection)?;
    let curated_rows = dataset::load_curated_from_path(&paths.curated)?;

    let mut rng = StdRng::seed_from_u64(settings.selection.seed);
    let selection = select_by_decade(&loaded.records, &settings.selection.decades, &mut rng);
    if selection.is_empty() {
        warn!("No dataset record matched any decade quota");
    }
    for pick in &selection.decades {
        debug!(
            "{}s: {} of {} requested from {} candidates",
            pick.decade,
            pick.records.len(),
            pick.quota,
            pick.available
        );
    }
    info!("Selected {} records across {} decades", selection.len(), selection.decades.len());

    let enricher = EntryEnricher::new(&settings.enrichment);
    let primary = selection
        .records()
        .map(|r| enricher.from_record(r))
        .collect::<Result<Vec<CatalogEntry>, _>>()?;

    let mut merger = CatalogMerger::new(primary);
    merger.add_curated(curated_rows.iter().map(|row| enricher.from_curated(row)));
    merger.pad_from_pool(
        &loaded.records,
        settings.selection.catalog_size,
        &enricher,
        &mut rng,
    )?;
    let (entries, merge) = merger.finish();

    let summary = RunSummary {
        load: loaded.report,
        selected: selection.len(),
        curated_rows: curated_rows.len(),
        merge,
    };

    let catalog = Catalog::assemble(
        entries,
        generated_at,
        SourceFiles {
            dataset: paths.dataset.clone(),
            curated: paths.curated.clone(),
        },
        settings.selection.seed,
        summary.counts(),
        notes(settings, &summary),
    );
    Ok((catalog, summary))
}

fn notes(settings: &Settings, summary: &RunSummary) -> Vec<String> {
    let mut notes = settings.output.notes.clone();
    notes.push(format!(
        "Dataset rows kept: {} (skipped: {})",
        summary.load.accepted,
        summary.load.skipped()
    ));
    notes.push(format!("Selected by decade quota: {}", summary.selected));
    notes.push(format!(
        "Curated entries added: {}",
        summary.merge.curated_added
    ));
    notes.push(format!(
        "Curated duplicates skipped: {}",
        summary.merge.curated_duplicates
    ));
    notes.push(format!("Padding entries added: {}", summary.merge.padded));
    notes
}
