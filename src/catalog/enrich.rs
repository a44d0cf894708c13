use std::collections::BTreeSet;

use crate::config::EnrichmentSettings;
use crate::dataset::{CuratedRow, RawRecord};
use crate::error::CatalogError;

use super::entry::{
    AudioFeatures, CatalogEntry, ClipWindow, DatasetMeta, LanguageConfidence, SearchHints,
};

/// Lower-case fragments of artist names known to sing in French.
///
/// Plain substring match, so short names (`air`, `tal`, `sch`) also catch
/// unrelated artists. Good enough for tagging, not for anything stricter.
const FRENCH_ARTIST_FRAGMENTS: &[&str] = &[
    "stromae",
    "angele",
    "aya nakamura",
    "indila",
    "christine and the queens",
    "orelsan",
    "soprano",
    "jul",
    "nekfeu",
    "pnl",
    "maitre gims",
    "maître gims",
    "gims",
    "black m",
    "clara luciani",
    "louane",
    "vianney",
    "camelia jordana",
    "camélia jordana",
    "mc solaar",
    "iam",
    "ntm",
    "yelle",
    "booba",
    "keny arkana",
    "lomepal",
    "hoshi",
    "bigflo & oli",
    "alonzo",
    "kaaris",
    "sch",
    "sexion d'assaut",
    "dadju",
    "phoenix",
    "justice",
    "caravan palace",
    "daft punk",
    "air",
    "david guetta",
    "madeon",
    "petit biscuit",
    "kavinsky",
    "breakbot",
    "yuksek",
    "rone",
    "cassius",
    "charlotte gainsbourg",
    "vanessa paradis",
    "indochine",
    "noir desir",
    "tryo",
    "manau",
    "louise attaque",
    "jacques brel",
    "serge gainsbourg",
    "francis cabrel",
    "jean-jacques goldman",
    "mylene farmer",
    "zaz",
    "zazie",
    "patrick bruel",
    "renaud",
    "benabar",
    "bénabar",
    "raphael",
    "raphäel",
    "calogero",
    "kyo",
    "diam's",
    "vitaa",
    "jenifer",
    "amel bent",
    "chimene badi",
    "chimène badi",
    "tal",
    "bb brunes",
    "suprême ntm",
    "suprême n.t.m",
];

/// Genre labels that imply a language when the artist is not recognized.
const GENRE_LANGUAGE_HINTS: &[(&str, &str)] = &[("latin", "es")];

pub const DEFAULT_LANGUAGE: &str = "en";

/// Tag used instead of the bare language code for French curated rows.
const FRANCOPHONE_TAG: &str = "francophone";

/// Best-effort language of a dataset track.
pub fn detect_language(artist: &str, genre: &str) -> &'static str {
    let artist = artist.to_lowercase();
    if FRENCH_ARTIST_FRAGMENTS
        .iter()
        .any(|fragment| artist.contains(fragment))
    {
        return "fr";
    }
    GENRE_LANGUAGE_HINTS
        .iter()
        .find(|(hint, _)| *hint == genre)
        .map(|(_, language)| *language)
        .unwrap_or(DEFAULT_LANGUAGE)
}

/// Markets where a song in `language` is expected to be recognized.
pub fn origin_markets(language: &str) -> Vec<String> {
    let markets: &[&str] = match language {
        "fr" => &["FR", "BE", "CA"],
        "es" => &["ES", "MX", "AR"],
        _ => &["GLOBAL"],
    };
    markets.iter().map(|m| m.to_string()).collect()
}

/// Lower-case `artist title year`, every run of other characters collapsed to `-`.
pub fn slugify(artist: &str, title: &str, year: u16) -> String {
    let source = format!("{artist} {title} {year}").to_lowercase();
    let mut slug = String::with_capacity(source.len());
    let mut pending_dash = false;
    for c in source.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Round to `places` decimals from the exact binary value, ties to even.
///
/// `100.005` is stored just below the tie and comes out as `100.0`, while an
/// exactly representable tie such as `100.125` goes to `100.12`.
fn round_to(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}

fn sorted_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    tags.into_iter()
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Maps dataset records and curated rows onto [`CatalogEntry`].
pub struct EntryEnricher<'a> {
    settings: &'a EnrichmentSettings,
}

impl<'a> EntryEnricher<'a> {
    pub fn new(settings: &'a EnrichmentSettings) -> Self {
        Self { settings }
    }

    fn default_clip(&self) -> ClipWindow {
        ClipWindow {
            start_seconds: self.settings.clip_start_seconds,
            duration_seconds: self.settings.clip_duration_seconds,
        }
    }

    /// Build the entry for a selected dataset record.
    ///
    /// Fails when a numeric column cannot be parsed; a half-filled entry is
    /// never produced.
    pub fn from_record(&self, record: &RawRecord) -> Result<CatalogEntry, CatalogError> {
        let id = record.track_id.as_str();
        let number = |field: &'static str, value: &str| -> Result<f64, CatalogError> {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| CatalogError::invalid_field(id, field, value))
        };

        let language = detect_language(&record.track_artist, &record.playlist_genre);
        let duration_seconds = round_to(number("duration_ms", &record.duration_ms)? / 1000.0, 2);
        let bpm = round_to(number("tempo", &record.tempo)?, 3);

        let popularity = match record.track_popularity.trim() {
            "" => None,
            value => Some(
                value
                    .parse::<u32>()
                    .map_err(|_| CatalogError::invalid_field(id, "track_popularity", value))?,
            ),
        };
        let niche = popularity.is_some_and(|p| p < self.settings.niche_threshold);

        let audio_features = AudioFeatures {
            danceability: number("danceability", &record.danceability)?,
            energy: number("energy", &record.energy)?,
            speechiness: number("speechiness", &record.speechiness)?,
            acousticness: number("acousticness", &record.acousticness)?,
            instrumentalness: number("instrumentalness", &record.instrumentalness)?,
            liveness: number("liveness", &record.liveness)?,
            valence: number("valence", &record.valence)?,
            tempo: bpm,
        };

        let query = format!("{} {}", record.track_artist, record.track_name);

        Ok(CatalogEntry {
            id: format!("spotify:{id}"),
            title: record.track_name.clone(),
            artist: record.track_artist.clone(),
            album: record.track_album_name.clone(),
            release_year: record.release_year,
            release_date: record.track_album_release_date.clone(),
            primary_genre: record.playlist_genre.clone(),
            sub_genre: record.playlist_subgenre.clone(),
            language: language.to_string(),
            origin_markets: origin_markets(language),
            duration_seconds: Some(duration_seconds),
            bpm: Some(bpm),
            audio_features: Some(audio_features),
            popularity,
            niche,
            source: self.settings.dataset_source_tag.clone(),
            available_providers: to_strings(&["spotify", "youtube", "deezer"]),
            search_hints: SearchHints {
                youtube: query.clone(),
                spotify: Some(format!("spotify:track:{id}")),
                deezer: Some(query),
            },
            clip: self.default_clip(),
            language_confidence: LanguageConfidence::Heuristic,
            tags: sorted_tags([
                record.playlist_genre.as_str(),
                record.playlist_subgenre.as_str(),
                language,
            ]),
            dataset_meta: Some(DatasetMeta {
                playlist_id: record.playlist_id.clone(),
                playlist_name: record.playlist_name.clone(),
            }),
        })
    }

    /// Build the entry for a curated row. Curated rows carry no audio analysis.
    pub fn from_curated(&self, row: &CuratedRow) -> CatalogEntry {
        let language = row.language.trim();
        let language_tag = if language == "fr" {
            FRANCOPHONE_TAG
        } else {
            language
        };
        let youtube = match row.youtube_hint.trim() {
            "" => format!("{} {}", row.artist, row.title),
            hint => hint.to_string(),
        };
        let default_clip = self.default_clip();

        CatalogEntry {
            id: format!("manual:{}", slugify(&row.artist, &row.title, row.year)),
            title: row.title.clone(),
            artist: row.artist.clone(),
            album: row.album.clone(),
            release_year: row.year,
            release_date: format!("{}-01-01", row.year),
            primary_genre: row.primary_genre.clone(),
            sub_genre: row.subgenre.clone(),
            language: language.to_string(),
            origin_markets: origin_markets(language),
            duration_seconds: None,
            bpm: None,
            audio_features: None,
            popularity: None,
            niche: false,
            source: self.settings.curated_source_tag.clone(),
            available_providers: to_strings(&["youtube", "deezer", "manual"]),
            search_hints: SearchHints {
                youtube,
                spotify: None,
                deezer: None,
            },
            clip: ClipWindow {
                start_seconds: row.clip_start_seconds.unwrap_or(default_clip.start_seconds),
                duration_seconds: row
                    .clip_duration_seconds
                    .unwrap_or(default_clip.duration_seconds),
            },
            language_confidence: LanguageConfidence::Curated,
            tags: sorted_tags([row.primary_genre.as_str(), row.subgenre.as_str(), language_tag]),
            dataset_meta: None,
        }
    }
}
