//! ATCF deck file parsing.
//!
//! Deck files are line-oriented, comma-separated fixed-column records.
//! The columns used here:
//!
//! ```text
//! SH, 16, 2020091500,   , BEST,   0, 200S,  800E,  45,  990, TS, ..., GABEKILE, ...
//! 0   1   2                4          6      7     8    9    10       27
//! ```
//!
//! Latitude and longitude are tenths of a degree with an N/S or E/W
//! suffix. Malformed lines are recoverable: callers log and skip them.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::{DeckError, Result};

/// A single storm observation from a deck file.
#[derive(Debug, Clone, PartialEq)]
pub struct StormFix {
    /// Hour-quantized synoptic time.
    pub synoptic_time: DateTime<Utc>,
    /// Two-letter basin code (e.g. "SH", "AL").
    pub basin: String,
    /// Storm number within the basin, 1-99.
    pub storm_num: u8,
    /// Storm name, when the advisory carried one.
    pub storm_name: Option<String>,
    /// Center latitude, degrees north.
    pub lat: f64,
    /// Center longitude, degrees east.
    pub lon: f64,
    /// Intensity class (e.g. "TS", "HU"), when present.
    pub intensity: Option<String>,
}

// Column offsets into the comma-separated record.
const COL_BASIN: usize = 0;
const COL_NUM: usize = 1;
const COL_TIME: usize = 2;
const COL_LAT: usize = 6;
const COL_LON: usize = 7;
const COL_INTENSITY: usize = 10;
const COL_NAME: usize = 27;

/// Parse one deck line into a [`StormFix`].
pub fn parse_deck_line(line: &str, line_no: usize) -> Result<StormFix> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() <= COL_LON {
        return Err(DeckError::Parse {
            line: line_no,
            reason: format!("expected at least {} fields, got {}", COL_LON + 1, fields.len()),
        });
    }

    let basin = fields[COL_BASIN].to_uppercase();
    if basin.len() != 2 || !basin.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DeckError::Parse {
            line: line_no,
            reason: format!("invalid basin code '{}'", fields[COL_BASIN]),
        });
    }

    let storm_num: u8 = fields[COL_NUM].parse().map_err(|_| DeckError::Parse {
        line: line_no,
        reason: format!("invalid storm number '{}'", fields[COL_NUM]),
    })?;
    if storm_num == 0 || storm_num > 99 {
        return Err(DeckError::Parse {
            line: line_no,
            reason: format!("storm number {storm_num} out of range 1-99"),
        });
    }

    let synoptic_time =
        sat_common::parse_synoptic(fields[COL_TIME]).map_err(|e| DeckError::Parse {
            line: line_no,
            reason: e.to_string(),
        })?;

    let lat = parse_hemisphere_coord(fields[COL_LAT], 'N', 'S').ok_or_else(|| {
        DeckError::Parse {
            line: line_no,
            reason: format!("invalid latitude '{}'", fields[COL_LAT]),
        }
    })?;
    let lon = parse_hemisphere_coord(fields[COL_LON], 'E', 'W').ok_or_else(|| {
        DeckError::Parse {
            line: line_no,
            reason: format!("invalid longitude '{}'", fields[COL_LON]),
        }
    })?;

    let intensity = fields
        .get(COL_INTENSITY)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    let storm_name = fields
        .get(COL_NAME)
        .filter(|s| !s.is_empty() && **s != "INVEST")
        .map(|s| s.to_uppercase());

    Ok(StormFix {
        synoptic_time,
        basin,
        storm_num,
        storm_name,
        lat,
        lon,
        intensity,
    })
}

/// Parse `"200S"` / `"0800E"` style tenth-of-degree coordinates.
fn parse_hemisphere_coord(s: &str, positive: char, negative: char) -> Option<f64> {
    // The suffix may be a multibyte char; split at its byte offset.
    let (idx, suffix) = s.char_indices().last()?;
    let tenths: f64 = s[..idx].trim().parse().ok()?;
    let sign = if suffix.eq_ignore_ascii_case(&positive) {
        1.0
    } else if suffix.eq_ignore_ascii_case(&negative) {
        -1.0
    } else {
        return None;
    };
    Some(sign * tenths / 10.0)
}

/// Parse a deck file into storm fixes, preserving file order.
///
/// Malformed lines are logged at warn level and skipped; a deck with no
/// valid fixes yields an empty list, not an error.
pub fn parse_deck(path: &Path) -> Result<Vec<StormFix>> {
    let text = fs::read_to_string(path)?;
    let mut fixes = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_deck_line(line, idx + 1) {
            Ok(fix) => fixes.push(fix),
            Err(e) => warn!(deck = %path.display(), error = %e, "skipping malformed deck line"),
        }
    }
    Ok(fixes)
}

/// Derive the storm year from a deck filename, e.g. `bsh162020.dat` -> 2020.
pub fn storm_year_from_filename(path: &Path) -> Result<i32> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| DeckError::BadFilename(path.display().to_string()))?;

    let digits: String = stem
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    if digits.len() < 4 {
        return Err(DeckError::BadFilename(path.display().to_string()));
    }
    let year: i32 = digits[digits.len() - 4..]
        .parse()
        .map_err(|_| DeckError::BadFilename(path.display().to_string()))?;
    if !(1850..=2200).contains(&year) {
        return Err(DeckError::BadFilename(path.display().to_string()));
    }
    Ok(year)
}

/// The storm name shared across all fixes of a storm: the name from the
/// last named advisory. Falls back to `"unnamed"` for unnamed systems.
///
/// Using the final name stabilizes sector names even when intermediate
/// advisories disagreed.
pub fn final_storm_name(fixes: &[StormFix]) -> String {
    fixes
        .iter()
        .rev()
        .find_map(|f| f.storm_name.clone())
        .unwrap_or_else(|| "unnamed".to_string())
}
