use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::config::EnrichmentSettings;
use crate::dataset::{CuratedRow, RawRecord};
use crate::error::CatalogError;
use crate::test_support::{genre_block, record};

fn curated(year: u16, artist: &str, title: &str, language: &str) -> CuratedRow {
    CuratedRow {
        year,
        artist: artist.to_string(),
        title: title.to_string(),
        album: format!("{title} LP"),
        primary_genre: "pop".to_string(),
        subgenre: "chanson".to_string(),
        language: language.to_string(),
        youtube_hint: format!("{artist} {title} official"),
        clip_start_seconds: None,
        clip_duration_seconds: None,
    }
}

fn source_files() -> SourceFiles {
    SourceFiles {
        dataset: "data/songs.csv".into(),
        curated: "data/curated.tsv".into(),
    }
}

#[test]
fn dedup_key_ignores_case_and_surrounding_space() {
    assert_eq!(
        DedupKey::new("  La Vie En Rose ", "EDITH PIAF"),
        DedupKey::new("la vie en rose", "Edith Piaf  ")
    );
    assert_ne!(
        DedupKey::new("La Vie en rose", "Edith Piaf"),
        DedupKey::new("La Vie en rose", "Grace Jones")
    );
}

#[test]
fn language_detection_uses_artist_then_genre_then_default() {
    assert_eq!(detect_language("Daft Punk", "edm"), "fr");
    assert_eq!(detect_language("STROMAE", "pop"), "fr");
    assert_eq!(detect_language("Shakira", "latin"), "es");
    assert_eq!(detect_language("Queen", "rock"), "en");
}

#[test]
fn origin_markets_follow_language() {
    assert_eq!(origin_markets("fr"), vec!["FR", "BE", "CA"]);
    assert_eq!(origin_markets("es"), vec!["ES", "MX", "AR"]);
    assert_eq!(origin_markets("en"), vec!["GLOBAL"]);
    assert_eq!(origin_markets("de"), vec!["GLOBAL"]);
}

#[test]
fn slugify_collapses_everything_but_ascii_alphanumerics() {
    assert_eq!(
        slugify("Édith Piaf", "Non, je ne regrette rien", 1960),
        "dith-piaf-non-je-ne-regrette-rien-1960"
    );
    assert_eq!(slugify("  M  ", "!!Qui de nous deux??", 2003), "m-qui-de-nous-deux-2003");
}

#[test]
fn record_enrichment_derives_numeric_fields() {
    let settings = EnrichmentSettings::default();
    let enricher = EntryEnricher::new(&settings);
    let mut raw = record("6f807x0ima9a1j3VPbc7VN", "Memories", "Maroon 5", "2019-12-06", "pop");
    raw.duration_ms = "189052".to_string();
    raw.tempo = "90.9734".to_string();
    raw.track_popularity = "44".to_string();

    let entry = enricher.from_record(&raw).unwrap();
    assert_eq!(entry.id, "spotify:6f807x0ima9a1j3VPbc7VN");
    assert_eq!(entry.release_year, 2019);
    assert_eq!(entry.release_date, "2019-12-06");
    assert_eq!(entry.duration_seconds, Some(189.05));
    assert_eq!(entry.bpm, Some(90.973));
    assert_eq!(entry.popularity, Some(44));
    assert!(entry.niche);
    assert_eq!(entry.language, "en");
    assert_eq!(entry.origin_markets, vec!["GLOBAL"]);
    assert_eq!(entry.language_confidence, LanguageConfidence::Heuristic);
    assert_eq!(entry.source, "spotify-tidytuesday-2020-01-21");
    assert_eq!(entry.available_providers, vec!["spotify", "youtube", "deezer"]);
    assert_eq!(entry.search_hints.youtube, "Maroon 5 Memories");
    assert_eq!(entry.search_hints.deezer.as_deref(), Some("Maroon 5 Memories"));
    assert_eq!(
        entry.search_hints.spotify.as_deref(),
        Some("spotify:track:6f807x0ima9a1j3VPbc7VN")
    );
    assert_eq!(
        entry.clip,
        ClipWindow {
            start_seconds: 30,
            duration_seconds: 45
        }
    );
    assert_eq!(entry.tags, vec!["en", "pop", "pop classic"]);
    let features = entry.audio_features.unwrap();
    assert_eq!(features.tempo, 90.973);
    assert_eq!(features.energy, 0.916);
    assert_eq!(
        entry.dataset_meta,
        Some(DatasetMeta {
            playlist_id: "pl-pop".to_string(),
            playlist_name: "pop hits".to_string(),
        })
    );

    // Decimal ties resolve on the stored binary value, exact ties to even.
    for (duration_ms, seconds) in [("100005", 100.0), ("100125", 100.12), ("100375", 100.38)] {
        raw.duration_ms = duration_ms.to_string();
        let entry = enricher.from_record(&raw).unwrap();
        assert_eq!(entry.duration_seconds, Some(seconds), "{duration_ms} ms");
    }
}

#[test]
fn popularity_threshold_is_strict_and_blank_is_not_niche() {
    let settings = EnrichmentSettings::default();
    let enricher = EntryEnricher::new(&settings);

    let mut raw = record("a", "Song", "Band", "1999-01-01", "rock");
    raw.track_popularity = "45".to_string();
    assert!(!enricher.from_record(&raw).unwrap().niche);

    raw.track_popularity = String::new();
    let entry = enricher.from_record(&raw).unwrap();
    assert_eq!(entry.popularity, None);
    assert!(!entry.niche);
}

#[test]
fn tags_are_deduplicated() {
    let settings = EnrichmentSettings::default();
    let enricher = EntryEnricher::new(&settings);
    let mut raw = record("a", "Song", "Band", "1999-01-01", "latin");
    raw.playlist_subgenre = "latin".to_string();
    let entry = enricher.from_record(&raw).unwrap();
    assert_eq!(entry.tags, vec!["es", "latin"]);
}

#[test]
fn unparseable_numbers_fail_enrichment() {
    let settings = EnrichmentSettings::default();
    let enricher = EntryEnricher::new(&settings);
    let mut raw = record("bad", "Song", "Band", "1999-01-01", "rock");
    raw.duration_ms = "three minutes".to_string();
    match enricher.from_record(&raw) {
        Err(CatalogError::InvalidField { id, field, .. }) => {
            assert_eq!(id, "bad");
            assert_eq!(field, "duration_ms");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn curated_enrichment_uses_curated_defaults() {
    let settings = EnrichmentSettings::default();
    let enricher = EntryEnricher::new(&settings);
    let entry = enricher.from_curated(&curated(1966, "Jacques Dutronc", "Et moi, et moi, et moi", "fr"));

    assert_eq!(entry.id, "manual:jacques-dutronc-et-moi-et-moi-et-moi-1966");
    assert_eq!(entry.release_date, "1966-01-01");
    assert_eq!(entry.origin_markets, vec!["FR", "BE", "CA"]);
    assert_eq!(entry.language_confidence, LanguageConfidence::Curated);
    assert_eq!(entry.source, "manual-french-classics");
    assert_eq!(entry.available_providers, vec!["youtube", "deezer", "manual"]);
    assert_eq!(entry.tags, vec!["chanson", "francophone", "pop"]);
    assert_eq!(
        entry.search_hints.youtube,
        "Jacques Dutronc Et moi, et moi, et moi official"
    );
    assert!(entry.search_hints.spotify.is_none());
    assert!(entry.duration_seconds.is_none());
    assert!(entry.audio_features.is_none());
    assert!(entry.dataset_meta.is_none());
    assert!(!entry.niche);
}

#[test]
fn curated_clip_window_and_blank_hint_fallback() {
    let settings = EnrichmentSettings::default();
    let enricher = EntryEnricher::new(&settings);
    let mut row = curated(1984, "Indochine", "3e sexe", "fr");
    row.youtube_hint = "  ".to_string();
    row.clip_start_seconds = Some(62);

    let entry = enricher.from_curated(&row);
    assert_eq!(entry.search_hints.youtube, "Indochine 3e sexe");
    assert_eq!(entry.clip.start_seconds, 62);
    assert_eq!(entry.clip.duration_seconds, 45);
}

#[test]
fn later_duplicate_is_dropped_and_counted() {
    let settings = EnrichmentSettings::default();
    let enricher = EntryEnricher::new(&settings);
    let primary = vec![
        enricher
            .from_record(&record("a", "Ça plane pour moi", "Plastic Bertrand", "1977-01-01", "rock"))
            .unwrap(),
    ];
    let mut merger = CatalogMerger::new(primary);
    merger.add_curated([
        enricher.from_curated(&curated(1977, " plastic bertrand", "ÇA PLANE POUR MOI ", "fr")),
        enricher.from_curated(&curated(1978, "Plastic Bertrand", "Sha La La La Lee", "fr")),
    ]);

    let (entries, report) = merger.finish();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, "spotify:a");
    assert_eq!(report.curated_added, 1);
    assert_eq!(report.curated_duplicates, 1);
}

#[test]
fn same_song_twice_in_primary_keeps_the_first() {
    let settings = EnrichmentSettings::default();
    let enricher = EntryEnricher::new(&settings);
    let primary = vec![
        enricher.from_record(&record("a", "Song", "Band", "1990-01-01", "pop")).unwrap(),
        enricher.from_record(&record("b", "song", "BAND", "1992-01-01", "rock")).unwrap(),
    ];
    let (entries, report) = CatalogMerger::new(primary).finish();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, "spotify:a");
    assert_eq!(report.primary, 1);
    assert_eq!(report.primary_duplicates, 1);
}

#[test]
fn padding_reaches_the_target_without_duplicate_songs() {
    let settings = EnrichmentSettings::default();
    let enricher = EntryEnricher::new(&settings);

    let mut pool = genre_block("p", "pop", 2005, 20);
    // Same song as p0 under a different id: must never be added twice.
    pool.push(record("clone", "P SONG 0", "p artist 0", "2006-01-01", "pop"));

    let primary = vec![enricher.from_record(&pool[0]).unwrap()];
    let mut merger = CatalogMerger::new(primary);
    let mut rng = StdRng::seed_from_u64(42);
    merger.pad_from_pool(&pool, 15, &enricher, &mut rng).unwrap();

    let (entries, report) = merger.finish();
    assert_eq!(entries.len(), 15);
    assert_eq!(report.padded, 14);
    let keys: HashSet<DedupKey> = entries.iter().map(|e| e.dedup_key()).collect();
    assert_eq!(keys.len(), entries.len());
    assert!(entries.iter().all(|e| e.id != "spotify:clone"));
}

#[test]
fn padding_stops_when_the_pool_runs_dry() {
    let settings = EnrichmentSettings::default();
    let enricher = EntryEnricher::new(&settings);
    let pool: Vec<RawRecord> = genre_block("r", "rock", 1975, 4);

    let mut merger = CatalogMerger::new(Vec::new());
    let mut rng = StdRng::seed_from_u64(1);
    merger.pad_from_pool(&pool, 10, &enricher, &mut rng).unwrap();
    let (entries, report) = merger.finish();
    assert_eq!(entries.len(), 4);
    assert_eq!(report.padded, 4);
}

#[test]
fn padding_is_a_no_op_once_the_target_is_met() {
    let settings = EnrichmentSettings::default();
    let enricher = EntryEnricher::new(&settings);
    let pool = genre_block("r", "rock", 1975, 4);
    let primary = pool
        .iter()
        .take(2)
        .map(|r| enricher.from_record(r).unwrap())
        .collect();

    let mut merger = CatalogMerger::new(primary);
    let mut rng = StdRng::seed_from_u64(1);
    merger.pad_from_pool(&pool, 2, &enricher, &mut rng).unwrap();
    assert_eq!(merger.finish().1.padded, 0);
}

#[test]
fn assemble_sorts_by_year_then_title_and_counts() {
    let settings = EnrichmentSettings::default();
    let enricher = EntryEnricher::new(&settings);
    let songs = vec![
        enricher.from_record(&record("1", "Zebra", "Band", "1994-01-01", "rock")).unwrap(),
        enricher.from_record(&record("2", "Alpha", "Band", "1994-03-01", "pop")).unwrap(),
        enricher.from_record(&record("3", "Mango", "Band", "1971-01-01", "latin")).unwrap(),
        enricher.from_curated(&curated(1994, "Zazie", "Zen", "fr")),
    ];
    let generated_at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
    let catalog = Catalog::assemble(songs, generated_at, source_files(), 42, StageCounts::default(), vec!["note".into()]);

    let titles: Vec<&str> = catalog.songs.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Mango", "Alpha", "Zebra", "Zen"]);

    let meta = &catalog.metadata;
    assert_eq!(meta.generated_at, "2024-05-01T08:30:00Z");
    assert_eq!(meta.record_count, 4);
    assert_eq!(meta.seed, 42);
    assert_eq!(meta.breakdown.by_decade[&1970], 1);
    assert_eq!(meta.breakdown.by_decade[&1990], 3);
    assert_eq!(meta.breakdown.by_primary_genre["pop"], 2);
    assert_eq!(meta.breakdown.by_language["es"], 1);
    assert_eq!(meta.breakdown.by_language["fr"], 1);
    assert_eq!(meta.breakdown.by_language["en"], 2);
}

#[test]
fn json_layout_uses_camel_case_and_string_decade_keys() {
    let settings = EnrichmentSettings::default();
    let enricher = EntryEnricher::new(&settings);
    let songs = vec![enricher.from_curated(&curated(1968, "France Gall", "Bébé requin", "fr"))];
    let generated_at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let catalog = Catalog::assemble(songs, generated_at, source_files(), 42, StageCounts::default(), vec![]);

    let json = catalog.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["metadata"]["breakdown"]["byDecade"]["1960"], 1);
    assert_eq!(value["metadata"]["sourceFiles"]["curated"], "data/curated.tsv");
    let song = &value["songs"][0];
    assert_eq!(song["releaseYear"], 1968);
    assert_eq!(song["subGenre"], "chanson");
    assert_eq!(song["languageConfidence"], "curated");
    assert_eq!(song["clip"]["startSeconds"], 30);
    assert!(song["audioFeatures"].is_null());
    assert!(song["searchHints"].get("spotify").is_none());
    assert!(json.contains("Bébé requin"));
}

#[test]
fn write_to_creates_directories_and_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("catalog.json");

    let settings = EnrichmentSettings::default();
    let enricher = EntryEnricher::new(&settings);
    let songs = vec![enricher.from_record(&record("x", "Song", "Band", "2001-01-01", "edm")).unwrap()];
    let generated_at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let catalog = Catalog::assemble(songs, generated_at, source_files(), 42, StageCounts::default(), vec![]);

    catalog.write_to(&path).unwrap();
    let read_back: Catalog = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(read_back.metadata, catalog.metadata);
    assert_eq!(read_back.songs.len(), 1);
    assert_eq!(read_back.songs[0].id, "spotify:x");
    assert_eq!(read_back.songs[0].tags, catalog.songs[0].tags);

    let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("catalog.json")]);
}
