use std::path::PathBuf;

use serde::Deserialize;

/// Top-level generator settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/song-catalog/config.toml` or `~/.config/song-catalog/config.toml`
///
/// Precedence (highest wins):
/// 1) Command-line flags
/// 2) Environment variables (prefix `SONG_CATALOG__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub paths: PathSettings,
    pub selection: SelectionSettings,
    pub enrichment: EnrichmentSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Primary tabular dataset (comma-separated, with header row).
    pub dataset: PathBuf,
    /// Hand-curated supplemental list (tab-separated, with header row).
    pub curated: PathBuf,
    /// Destination of the generated catalog document.
    pub output: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("data/raw/spotify_songs_2020-01-21.csv"),
            curated: PathBuf::from("data/manual-french-songs.tsv"),
            output: PathBuf::from("data/song-catalog.json"),
        }
    }
}

/// Quota for one decade bucket.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub struct DecadeQuota {
    /// First year of the decade (a multiple of 10).
    pub decade: u16,
    pub quota: usize,
}

impl DecadeQuota {
    pub const fn new(decade: u16, quota: usize) -> Self {
        Self { decade, quota }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    /// Seed of the single random source shared by sampling and padding.
    pub seed: u64,
    /// Global number of entries the final catalog should reach.
    pub catalog_size: usize,
    /// Releases before this year are discarded while loading.
    pub min_year: u16,
    /// Decades processed in this order; a decade missing here is never loaded.
    pub decades: Vec<DecadeQuota>,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            catalog_size: 3000,
            min_year: 1960,
            decades: vec![
                DecadeQuota::new(1960, 150),
                DecadeQuota::new(1970, 350),
                DecadeQuota::new(1980, 400),
                DecadeQuota::new(1990, 500),
                DecadeQuota::new(2000, 600),
                DecadeQuota::new(2010, 800),
                DecadeQuota::new(2020, 100),
            ],
        }
    }
}

impl SelectionSettings {
    /// Quota configured for `decade`, if it is targeted at all.
    pub fn quota_for(&self, decade: u16) -> Option<usize> {
        self.decades
            .iter()
            .find(|d| d.decade == decade)
            .map(|d| d.quota)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichmentSettings {
    /// Dataset entries with a popularity strictly below this are flagged niche.
    pub niche_threshold: u32,
    /// Default playback clip offset (seconds).
    pub clip_start_seconds: u32,
    /// Default playback clip length (seconds).
    pub clip_duration_seconds: u32,
    /// Provenance tag stamped on entries built from the primary dataset.
    pub dataset_source_tag: String,
    /// Provenance tag stamped on entries built from the curated list.
    pub curated_source_tag: String,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            niche_threshold: 45,
            clip_start_seconds: 30,
            clip_duration_seconds: 45,
            dataset_source_tag: "spotify-tidytuesday-2020-01-21".to_string(),
            curated_source_tag: "manual-french-classics".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Free-text notes copied verbatim into the catalog metadata.
    ///
    /// Counters computed during the run are appended after these.
    pub notes: Vec<String>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            notes: vec![
                "Base dataset built from the Spotify + TidyTuesday 2020-01-21 playlists (pop, rock, latin, rap, r&b, edm).".to_string(),
                "Filtered out soundtrack/anime keywords and releases before 1960.".to_string(),
                "Added manually curated French classics spanning 1960-2021.".to_string(),
            ],
        }
    }
}
