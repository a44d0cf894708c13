use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::config::SelectionSettings;
use crate::error::CatalogError;

use super::record::{CuratedRow, REQUIRED_COLUMNS, RawRecord};

/// Title/album fragments marking film, series and anime tie-ins.
///
/// Matched case-insensitively as plain substrings, so short entries such as
/// `ost` also hit words that merely contain them.
const SOUNDTRACK_KEYWORDS: &[&str] = &[
    "motion picture",
    "soundtrack",
    "ost",
    "original score",
    "original film",
    "from the film",
    "from \u{201c}",
    "from \"",
    "anime",
    "animé",
    "opening theme",
    "ending theme",
    "netflix film",
    "pixar",
    "marvel",
    "score version",
];

/// Why a dataset row was left out. Counted, never raised.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Malformed,
    InvalidYear,
    UntargetedDecade,
    Soundtrack,
    DuplicateId,
}

/// Tally of what happened to every dataset row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub accepted: usize,
    pub malformed: usize,
    pub invalid_year: usize,
    pub untargeted_decade: usize,
    pub soundtrack: usize,
    pub duplicate_id: usize,
}

impl LoadReport {
    fn record_skip(&mut self, reason: SkipReason) {
        let slot = match reason {
            SkipReason::Malformed => &mut self.malformed,
            SkipReason::InvalidYear => &mut self.invalid_year,
            SkipReason::UntargetedDecade => &mut self.untargeted_decade,
            SkipReason::Soundtrack => &mut self.soundtrack,
            SkipReason::DuplicateId => &mut self.duplicate_id,
        };
        *slot += 1;
    }

    pub fn skipped(&self) -> usize {
        self.malformed + self.invalid_year + self.untargeted_decade + self.soundtrack + self.duplicate_id
    }
}

/// Filtered, decade-tagged records in source order.
#[derive(Debug, Clone, Default)]
pub struct LoadedDataset {
    pub records: Vec<RawRecord>,
    pub report: LoadReport,
}

/// Extract the release year from an ISO-prefixed date (`1984`, `1984-06`, `1984-06-04`).
pub fn parse_year(date: &str) -> Option<u16> {
    let year = date.trim().split('-').next()?;
    if year.is_empty() || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    year.parse().ok()
}

pub fn decade_of(year: u16) -> u16 {
    year / 10 * 10
}

/// Whether a title/album pair looks like soundtrack or media tie-in content.
pub fn is_soundtrack(title: &str, album: &str) -> bool {
    let combined = format!("{title} {album}").to_lowercase();
    SOUNDTRACK_KEYWORDS
        .iter()
        .any(|keyword| combined.contains(keyword))
}

fn classify(
    record: &RawRecord,
    seen_ids: &HashSet<String>,
    selection: &SelectionSettings,
) -> Result<(u16, u16), SkipReason> {
    if seen_ids.contains(&record.track_id) {
        return Err(SkipReason::DuplicateId);
    }
    let year = parse_year(&record.track_album_release_date)
        .filter(|y| *y >= selection.min_year)
        .ok_or(SkipReason::InvalidYear)?;
    let decade = decade_of(year);
    if selection.quota_for(decade).is_none() {
        return Err(SkipReason::UntargetedDecade);
    }
    if is_soundtrack(&record.track_name, &record.track_album_name) {
        return Err(SkipReason::Soundtrack);
    }
    Ok((year, decade))
}

/// Read the primary dataset, keeping rows with a usable year inside a targeted
/// decade that are not soundtracks and whose id has not been accepted yet.
pub fn load_records<R: Read>(
    reader: R,
    selection: &SelectionSettings,
) -> Result<LoadedDataset, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new().from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for &column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(CatalogError::MissingColumn {
                kind: "dataset",
                column,
            });
        }
    }

    let mut loaded = LoadedDataset::default();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for (row, result) in csv_reader.deserialize::<RawRecord>().enumerate() {
        let mut record = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("Skipping malformed dataset row {}: {}", row + 1, e);
                loaded.report.record_skip(SkipReason::Malformed);
                continue;
            }
        };

        match classify(&record, &seen_ids, selection) {
            Ok((year, decade)) => {
                record.release_year = year;
                record.decade = decade;
                seen_ids.insert(record.track_id.clone());
                loaded.records.push(record);
                loaded.report.accepted += 1;
            }
            Err(reason) => {
                debug!("Skipping dataset row {} ({}): {:?}", row + 1, record.track_id, reason);
                loaded.report.record_skip(reason);
            }
        }
    }

    Ok(loaded)
}

/// [`load_records`] on a file, failing up front when it does not exist.
pub fn load_records_from_path(
    path: &Path,
    selection: &SelectionSettings,
) -> Result<LoadedDataset, CatalogError> {
    let file = open_source(path, "dataset")?;
    let loaded = load_records(file, selection)?;
    info!(
        "Loaded {} records from {} ({} skipped)",
        loaded.report.accepted,
        path.display(),
        loaded.report.skipped()
    );
    Ok(loaded)
}

/// Read the tab-separated curated list.
///
/// A row whose year is not an integer, or whose title or artist is blank,
/// fails the whole load with the file line it sits on.
pub fn load_curated<R: Read>(reader: R) -> Result<Vec<CuratedRow>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let year_column = headers.iter().position(|h| h == "year");

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        // Header is line 1, so the first data row is line 2.
        let line = record
            .position()
            .map_or(rows.len() as u64 + 2, |p| p.line());

        if let Some(year) = year_column.and_then(|i| record.get(i)) {
            if year.parse::<u16>().is_err() {
                return Err(CatalogError::InvalidCuratedRow {
                    line,
                    reason: format!("year {year:?} is not an integer"),
                });
            }
        }

        let row: CuratedRow = record.deserialize(Some(&headers))?;
        if row.title.trim().is_empty() || row.artist.trim().is_empty() {
            return Err(CatalogError::InvalidCuratedRow {
                line,
                reason: "title and artist must not be blank".to_string(),
            });
        }
        rows.push(row);
    }
    Ok(rows)
}

pub fn load_curated_from_path(path: &Path) -> Result<Vec<CuratedRow>, CatalogError> {
    let file = open_source(path, "curated list")?;
    let rows = load_curated(file)?;
    info!("Loaded {} curated rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn open_source(path: &Path, kind: &'static str) -> Result<File, CatalogError> {
    if !path.is_file() {
        return Err(CatalogError::MissingSource {
            kind,
            path: path.to_path_buf(),
        });
    }
    Ok(File::open(path)?)
}
