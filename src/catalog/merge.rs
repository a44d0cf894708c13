use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::dataset::RawRecord;
use crate::error::CatalogError;

use super::enrich::EntryEnricher;
use super::entry::{CatalogEntry, DedupKey};

/// Counters reported in the catalog notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub primary: usize,
    pub primary_duplicates: usize,
    pub curated_added: usize,
    pub curated_duplicates: usize,
    pub padded: usize,
}

/// Accumulates entries from several sources, keeping the first entry seen
/// for every [`DedupKey`].
#[derive(Debug, Default)]
pub struct CatalogMerger {
    keys: HashSet<DedupKey>,
    entries: Vec<CatalogEntry>,
    report: MergeReport,
}

impl CatalogMerger {
    /// Start from the entries built for the decade selection.
    pub fn new(primary: Vec<CatalogEntry>) -> Self {
        let mut merger = Self::default();
        for entry in primary {
            if merger.push(entry) {
                merger.report.primary += 1;
            } else {
                merger.report.primary_duplicates += 1;
            }
        }
        merger
    }

    fn push(&mut self, entry: CatalogEntry) -> bool {
        if !self.keys.insert(entry.dedup_key()) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Append curated entries; a curated song already present is dropped and counted.
    pub fn add_curated(&mut self, curated: impl IntoIterator<Item = CatalogEntry>) {
        for entry in curated {
            let id = entry.id.clone();
            if self.push(entry) {
                self.report.curated_added += 1;
            } else {
                debug!("Skipping curated duplicate {}", id);
                self.report.curated_duplicates += 1;
            }
        }
        info!(
            "Merged {} curated entries ({} duplicates skipped)",
            self.report.curated_added, self.report.curated_duplicates
        );
    }

    /// Top the catalog up to `target` with shuffled records from `pool` whose
    /// song is not in the catalog yet.
    pub fn pad_from_pool<R: Rng + ?Sized>(
        &mut self,
        pool: &[RawRecord],
        target: usize,
        enricher: &EntryEnricher<'_>,
        rng: &mut R,
    ) -> Result<(), CatalogError> {
        if self.entries.len() >= target {
            return Ok(());
        }

        let mut candidates: Vec<&RawRecord> = pool
            .iter()
            .filter(|r| !self.keys.contains(&r.dedup_key()))
            .collect();
        candidates.shuffle(rng);

        for record in candidates {
            if self.entries.len() >= target {
                break;
            }
            if self.keys.contains(&record.dedup_key()) {
                continue;
            }
            let entry = enricher.from_record(record)?;
            self.push(entry);
            self.report.padded += 1;
        }

        if self.entries.len() < target {
            warn!(
                "Catalog has {} entries, short of the {} target",
                self.entries.len(),
                target
            );
        } else {
            info!("Padded catalog with {} extra records", self.report.padded);
        }
        Ok(())
    }

    pub fn finish(self) -> (Vec<CatalogEntry>, MergeReport) {
        (self.entries, self.report)
    }
}
