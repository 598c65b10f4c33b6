//! CSV ingestion for season results and schedule files
//!
//! Season files follow the schedule-results export layout: the first five
//! columns are date, away team, away points, home team, home points.
//! Schedule files are matched by header name instead, since templates
//! vary. Rows missing a parsable date or score are dropped, not patched.

use chrono::NaiveDate;
use std::path::Path;

use crate::{HoopsError, Result};

/// A parsed game row, team names still raw (un-normalized)
#[derive(Debug, Clone)]
pub struct RawGame {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
}

/// A parsed schedule row: a future matchup without scores
#[derive(Debug, Clone)]
pub struct RawMatchup {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
}

/// Result of reading a season file
#[derive(Debug)]
pub struct SeasonImport {
    pub games: Vec<RawGame>,
    /// Rows dropped for missing/unparsable date or scores
    pub dropped: usize,
}

/// Result of reading a schedule file
#[derive(Debug)]
pub struct ScheduleImport {
    pub matchups: Vec<RawMatchup>,
    pub dropped: usize,
}

/// Read one season of completed games.
///
/// Only the first five columns are consumed; extra columns (overtime
/// markers, attendance, notes) are ignored.
pub fn read_season_csv<P: AsRef<Path>>(path: P) -> Result<SeasonImport> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path.as_ref())?;

    let mut games = Vec::new();
    let mut dropped = 0;

    for record in reader.records() {
        let record = record?;
        let parsed = (|| {
            let date = parse_date(record.get(0)?)?;
            let away_team = clean_name(record.get(1)?)?;
            let away_score = parse_score(record.get(2)?)?;
            let home_team = clean_name(record.get(3)?)?;
            let home_score = parse_score(record.get(4)?)?;
            Some(RawGame {
                date,
                home_team,
                away_team,
                home_score,
                away_score,
            })
        })();

        match parsed {
            Some(game) => games.push(game),
            None => dropped += 1,
        }
    }

    Ok(SeasonImport { games, dropped })
}

/// Read a schedule of future matchups.
///
/// Columns are located by header name (case-insensitive): a date column,
/// an away/visitor column, and a home column.
pub fn read_schedule_csv<P: AsRef<Path>>(path: P) -> Result<ScheduleImport> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path.as_ref())?;

    let headers = reader.headers()?.clone();
    let date_idx = find_column(&headers, &["date"])?;
    let away_idx = find_column(&headers, &["away", "visitor", "away_team"])?;
    let home_idx = find_column(&headers, &["home", "home_team"])?;

    let mut matchups = Vec::new();
    let mut dropped = 0;

    for record in reader.records() {
        let record = record?;
        let parsed = (|| {
            let date = parse_date(record.get(date_idx)?)?;
            let away_team = clean_name(record.get(away_idx)?)?;
            let home_team = clean_name(record.get(home_idx)?)?;
            Some(RawMatchup {
                date,
                home_team,
                away_team,
            })
        })();

        match parsed {
            Some(matchup) => matchups.push(matchup),
            None => dropped += 1,
        }
    }

    Ok(ScheduleImport { matchups, dropped })
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Result<usize> {
    headers
        .iter()
        .position(|h| {
            let h = h.trim().to_lowercase();
            names.iter().any(|n| h == *n)
        })
        .ok_or_else(|| {
            HoopsError::Parse(format!(
                "no column matching any of [{}] in schedule file",
                names.join(", ")
            ))
        })
}

/// Parse a date in the formats the source exports actually use
fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    const FORMATS: [&str; 5] = [
        "%Y-%m-%d",
        "%m/%d/%Y",
        "%a, %b %e, %Y",
        "%a %b %e %Y",
        "%b %e %Y",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

fn parse_score(value: &str) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    // Some exports carry scores as floats; accept those when integral
    value
        .parse::<u32>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().map(|v| v.round() as u32))
}

fn clean_name(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(value.to_string())
    }
}
