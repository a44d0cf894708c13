//! Fixture builders shared by the unit tests.

use crate::dataset::{RawRecord, decade_of, parse_year};

pub const DATASET_HEADER: &str = "track_id,track_name,track_artist,track_popularity,track_album_id,track_album_name,track_album_release_date,playlist_name,playlist_id,playlist_genre,playlist_subgenre,danceability,energy,key,loudness,mode,speechiness,acousticness,instrumentalness,liveness,valence,tempo,duration_ms";

pub const CURATED_HEADER: &str = "year\tartist\ttitle\talbum\tprimary_genre\tsubgenre\tlanguage\tyoutube_hint";

/// A fully populated, already decade-tagged record.
pub fn record(id: &str, title: &str, artist: &str, date: &str, genre: &str) -> RawRecord {
    let release_year = parse_year(date).unwrap_or(0);
    RawRecord {
        track_id: id.to_string(),
        track_name: title.to_string(),
        track_artist: artist.to_string(),
        track_popularity: "60".to_string(),
        track_album_name: format!("{title} (Album)"),
        track_album_release_date: date.to_string(),
        playlist_name: format!("{genre} hits"),
        playlist_id: format!("pl-{genre}"),
        playlist_genre: genre.to_string(),
        playlist_subgenre: format!("{genre} classic"),
        danceability: "0.748".to_string(),
        energy: "0.916".to_string(),
        speechiness: "0.0583".to_string(),
        acousticness: "0.102".to_string(),
        instrumentalness: "0".to_string(),
        liveness: "0.0653".to_string(),
        valence: "0.518".to_string(),
        tempo: "122.0364".to_string(),
        duration_ms: "194754".to_string(),
        release_year,
        decade: decade_of(release_year),
    }
}

/// `count` records of one genre in one decade, ids prefixed with `prefix`.
pub fn genre_block(prefix: &str, genre: &str, year: u16, count: usize) -> Vec<RawRecord> {
    (0..count)
        .map(|i| {
            record(
                &format!("{prefix}{i}"),
                &format!("{prefix} song {i}"),
                &format!("{prefix} artist {i}"),
                &format!("{year}-05-01"),
                genre,
            )
        })
        .collect()
}

/// One CSV data line with the given leading fields and neutral audio columns.
pub fn dataset_line(id: &str, title: &str, artist: &str, album: &str, date: &str, genre: &str) -> String {
    format!(
        "{id},{title},{artist},55,alb-{id},{album},{date},{genre} mix,pl-{genre},{genre},{genre} sub,0.5,0.6,5,-6.2,1,0.04,0.1,0.0,0.12,0.4,120.5,200000"
    )
}

pub fn dataset_csv(lines: &[String]) -> String {
    let mut out = String::from(DATASET_HEADER);
    for line in lines {
        out.push('\n');
        out.push_str(line);
    }
    out.push('\n');
    out
}

pub fn curated_tsv(rows: &[&str]) -> String {
    let mut out = String::from(CURATED_HEADER);
    for row in rows {
        out.push('\n');
        out.push_str(row);
    }
    out.push('\n');
    out
}
