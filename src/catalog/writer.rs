use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::CatalogError;

use super::entry::CatalogEntry;

/// Input files the catalog was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFiles {
    pub dataset: PathBuf,
    pub curated: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub by_decade: BTreeMap<u16, usize>,
    pub by_primary_genre: BTreeMap<String, usize>,
    pub by_language: BTreeMap<String, usize>,
}

impl Breakdown {
    pub fn of(entries: &[CatalogEntry]) -> Self {
        let mut breakdown = Self::default();
        for entry in entries {
            *breakdown.by_decade.entry(entry.decade()).or_insert(0) += 1;
            *breakdown
                .by_primary_genre
                .entry(entry.primary_genre.clone())
                .or_insert(0) += 1;
            *breakdown
                .by_language
                .entry(entry.language.clone())
                .or_insert(0) += 1;
        }
        breakdown
    }
}

/// Records contributed by each stage of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCounts {
    /// Dataset rows that passed the load filters.
    pub loaded: usize,
    pub selected: usize,
    /// Curated rows that made it in after deduplication.
    pub curated: usize,
    pub padded: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMetadata {
    pub generated_at: String,
    pub source_files: SourceFiles,
    pub seed: u64,
    pub counts: StageCounts,
    pub record_count: usize,
    pub notes: Vec<String>,
    pub breakdown: Breakdown,
}

/// The persisted document: metadata plus songs ordered by year, then title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub metadata: CatalogMetadata,
    pub songs: Vec<CatalogEntry>,
}

impl Catalog {
    /// Sort `songs` and derive the summary metadata from them.
    pub fn assemble(
        mut songs: Vec<CatalogEntry>,
        generated_at: DateTime<Utc>,
        source_files: SourceFiles,
        seed: u64,
        counts: StageCounts,
        notes: Vec<String>,
    ) -> Self {
        songs.sort_by(|a, b| {
            a.release_year
                .cmp(&b.release_year)
                .then_with(|| a.title.cmp(&b.title))
        });

        let metadata = CatalogMetadata {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            source_files,
            seed,
            counts,
            record_count: songs.len(),
            notes,
            breakdown: Breakdown::of(&songs),
        };
        Self { metadata, songs }
    }

    /// Pretty-printed JSON document, newline terminated.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Write the catalog to `path`, replacing any previous file atomically.
    ///
    /// The document goes to a temporary file next to `path` first, so an
    /// error leaves the previous catalog (or nothing) in place.
    pub fn write_to(&self, path: &Path) -> Result<(), CatalogError> {
        let json = self.to_json()?;

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| CatalogError::Io(e.error))?;
        Ok(())
    }
}
