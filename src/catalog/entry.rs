use serde::{Deserialize, Serialize};

/// Normalized `(title, artist)` pair identifying "the same song" across sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey {
    title: String,
    artist: String,
}

impl DedupKey {
    pub fn new(title: &str, artist: &str) -> Self {
        Self {
            title: title.trim().to_lowercase(),
            artist: artist.trim().to_lowercase(),
        }
    }
}

/// How much the `language` of an entry can be trusted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageConfidence {
    /// Guessed from the artist name or genre.
    Heuristic,
    /// Stated by whoever assembled the curated list.
    Curated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub danceability: f64,
    pub energy: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub valence: f64,
    pub tempo: f64,
}

/// Ready-made lookup strings per streaming provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHints {
    pub youtube: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spotify: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deezer: Option<String>,
}

/// Portion of the track played during a blind test.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipWindow {
    pub start_seconds: u32,
    pub duration_seconds: u32,
}

/// Where a dataset entry came from inside the source dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMeta {
    pub playlist_id: String,
    pub playlist_name: String,
}

/// One song of the catalog. Built once by the enricher, never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub release_year: u16,
    pub release_date: String,
    pub primary_genre: String,
    pub sub_genre: String,
    pub language: String,
    pub origin_markets: Vec<String>,
    pub duration_seconds: Option<f64>,
    pub bpm: Option<f64>,
    pub audio_features: Option<AudioFeatures>,
    pub popularity: Option<u32>,
    pub niche: bool,
    pub source: String,
    pub available_providers: Vec<String>,
    pub search_hints: SearchHints,
    pub clip: ClipWindow,
    pub language_confidence: LanguageConfidence,
    pub tags: Vec<String>,
    pub dataset_meta: Option<DatasetMeta>,
}

impl CatalogEntry {
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(&self.title, &self.artist)
    }

    pub fn decade(&self) -> u16 {
        self.release_year / 10 * 10
    }
}
