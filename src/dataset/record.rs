use serde::Deserialize;

use crate::catalog::DedupKey;

/// One row of the primary dataset, exactly as read.
///
/// Numeric columns stay textual here; they are only parsed for the records
/// that end up in the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub track_id: String,
    pub track_name: String,
    pub track_artist: String,
    pub track_popularity: String,
    pub track_album_name: String,
    pub track_album_release_date: String,
    pub playlist_name: String,
    pub playlist_id: String,
    pub playlist_genre: String,
    pub playlist_subgenre: String,
    pub danceability: String,
    pub energy: String,
    pub speechiness: String,
    pub acousticness: String,
    pub instrumentalness: String,
    pub liveness: String,
    pub valence: String,
    pub tempo: String,
    pub duration_ms: String,

    /// Set by the loader from `track_album_release_date`.
    #[serde(skip)]
    pub release_year: u16,
    /// `release_year` rounded down to a multiple of ten.
    #[serde(skip)]
    pub decade: u16,
}

impl RawRecord {
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(&self.track_name, &self.track_artist)
    }
}

/// Dataset columns the loader refuses to run without.
pub(crate) const REQUIRED_COLUMNS: &[&str] = &[
    "track_id",
    "track_name",
    "track_artist",
    "track_popularity",
    "track_album_name",
    "track_album_release_date",
    "playlist_name",
    "playlist_id",
    "playlist_genre",
    "playlist_subgenre",
    "danceability",
    "energy",
    "speechiness",
    "acousticness",
    "instrumentalness",
    "liveness",
    "valence",
    "tempo",
    "duration_ms",
];

/// One row of the hand-curated supplemental list.
#[derive(Debug, Clone, Deserialize)]
pub struct CuratedRow {
    pub year: u16,
    pub artist: String,
    pub title: String,
    pub album: String,
    pub primary_genre: String,
    pub subgenre: String,
    pub language: String,
    #[serde(default)]
    pub youtube_hint: String,
    #[serde(default)]
    pub clip_start_seconds: Option<u32>,
    #[serde(default)]
    pub clip_duration_seconds: Option<u32>,
}
