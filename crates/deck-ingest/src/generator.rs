//! Dynamic sector generation from deck files.
//!
//! Every synoptic fix in a deck becomes one storm-centered sector record.
//! The grid geometry is constant across all fixes of a storm so that the
//! resulting animation frames share a stable pixel grid.

use std::path::{Path, PathBuf};

use chrono::Datelike;
use tracing::{debug, info, warn};

use sector_catalog::{
    CatalogStore, DynamicSector, MetaValue, ProjectionSpec, SectorInfo, SectorType, Shape,
};

use crate::deck::{parse_deck, StormFix};
use crate::error::Result;

/// Grid geometry and write policy for generated sectors.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Grid width in pixels.
    pub width: usize,
    /// Grid height in pixels.
    pub height: usize,
    /// Pixel size in meters (square pixels).
    pub pixel_size_m: f64,
    /// Overwrite existing catalog entries. With duplicates in one deck,
    /// `true` means last write wins; `false` means first write wins.
    pub force: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        // TODO: load the default grid geometry from the deployment sector
        // configuration instead of hardcoding it here.
        Self {
            width: 1400,
            height: 1400,
            pixel_size_m: 1000.0,
            force: false,
        }
    }
}

/// Generate one sector record per synoptic fix in a deck file.
///
/// Records are written in increasing synoptic-time order (ties broken by
/// sector name). Fixes that fail sector construction are logged and
/// skipped; write I/O failures abort the run. A deck with no valid fixes
/// returns an empty list.
pub fn generate(
    deck_path: &Path,
    output_dir: &Path,
    storm_year: i32,
    final_storm_name: &str,
    config: &GeneratorConfig,
) -> Result<Vec<PathBuf>> {
    let mut fixes = parse_deck(deck_path)?;
    if fixes.is_empty() {
        warn!(deck = %deck_path.display(), "deck produced no valid fixes, nothing to do");
        return Ok(Vec::new());
    }

    fixes.sort_by(|a, b| {
        a.synoptic_time
            .cmp(&b.synoptic_time)
            .then_with(|| sector_name(a, storm_year, final_storm_name)
                .cmp(&sector_name(b, storm_year, final_storm_name)))
    });

    let mut written = Vec::new();
    for fix in &fixes {
        let name = sector_name(fix, storm_year, final_storm_name);
        let sector = match build_sector(fix, &name, storm_year, final_storm_name, config) {
            Ok(sector) => sector,
            Err(e) => {
                warn!(deck = %deck_path.display(), sector = %name, error = %e,
                      "skipping fix that failed sector construction");
                continue;
            }
        };

        let filename = format!(
            "{}_{}.yaml",
            name,
            sat_common::format_compact(&fix.synoptic_time)
        );
        let path = output_dir.join(filename);
        // Duplicate synoptic times in one deck target the same file; report
        // each written path once.
        for path in CatalogStore::write(&sector, &path, config.force)? {
            if !written.contains(&path) {
                written.push(path);
            }
        }
    }

    info!(
        deck = %deck_path.display(),
        fixes = fixes.len(),
        written = written.len(),
        "generated dynamic sectors"
    );
    Ok(written)
}

/// Catalog name for one fix: `tc{year}{basin}{num}{final_name}` lowercased.
fn sector_name(fix: &StormFix, storm_year: i32, final_storm_name: &str) -> String {
    format!(
        "tc{}{}{:02}{}",
        storm_year, fix.basin, fix.storm_num, final_storm_name
    )
    .to_lowercase()
}

fn build_sector(
    fix: &StormFix,
    name: &str,
    storm_year: i32,
    final_storm_name: &str,
    config: &GeneratorConfig,
) -> Result<DynamicSector> {
    let (start, end) = sat_common::validity_window(fix.synoptic_time);

    let mut info = SectorInfo::new();
    info.insert("storm_year".into(), MetaValue::Int(storm_year as i64));
    info.insert("storm_basin".into(), MetaValue::Str(fix.basin.clone()));
    info.insert("storm_num".into(), MetaValue::Int(fix.storm_num as i64));
    info.insert(
        "storm_name".into(),
        MetaValue::Str(final_storm_name.to_uppercase()),
    );
    info.insert(
        "synoptic_time".into(),
        MetaValue::Datetime(fix.synoptic_time),
    );
    if let Some(intensity) = &fix.intensity {
        info.insert("storm_intensity".into(), MetaValue::Str(intensity.clone()));
    }

    debug!(
        sector = name,
        year = fix.synoptic_time.year(),
        lat = fix.lat,
        lon = fix.lon,
        "building storm-centered sector"
    );

    let sector = DynamicSector::new(
        name,
        ProjectionSpec::laea(fix.lat, fix.lon),
        Shape {
            width: config.width,
            height: config.height,
        },
        [config.pixel_size_m, config.pixel_size_m],
        [0.0, 0.0],
    )?
    .tag_dynamic(SectorType::Atcf, start, end, info)?;

    Ok(sector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::fs;
    use tempfile::TempDir;
    use test_utils::decks::{write_sample_deck, GABEKILE_DECK};

    #[test]
    fn test_generate_two_fixes() {
        let dir = TempDir::new().unwrap();
        let deck = write_sample_deck(dir.path(), "bsh162020.dat", GABEKILE_DECK);
        let out = dir.path().join("sectors");

        let written = generate(&deck, &out, 2020, "GABEKILE", &GeneratorConfig::default()).unwrap();
        assert_eq!(written.len(), 2);
        for path in &written {
            let name = path.file_name().unwrap().to_str().unwrap();
            assert!(name.starts_with("tc2020sh16gabekile"), "got {name}");
        }

        let first = CatalogStore::read(&written[0]).unwrap();
        assert_eq!(first.sector_type, SectorType::Atcf);
        assert_eq!(
            first.start,
            Utc.with_ymd_and_hms(2020, 9, 15, 0, 0, 0).unwrap()
        );
        assert_eq!(
            first.end,
            Utc.with_ymd_and_hms(2020, 9, 15, 6, 0, 0).unwrap()
        );
        assert!((first.projection.lat_0 + 20.0).abs() < 1e-9);
        assert!((first.projection.lon_0 - 80.0).abs() < 1e-9);

        let second = CatalogStore::read(&written[1]).unwrap();
        assert!(second.start > first.start);
        assert!((second.projection.lat_0 + 20.5).abs() < 1e-9);
        assert!((second.projection.lon_0 - 81.0).abs() < 1e-9);
    }

    #[test]
    fn test_generate_is_time_ordered() {
        let dir = TempDir::new().unwrap();
        // Fixes deliberately out of order in the file.
        let reversed = {
            let mut lines: Vec<&str> = GABEKILE_DECK.trim().lines().collect();
            lines.reverse();
            lines.join("\n")
        };
        let deck = write_sample_deck(dir.path(), "bsh162020.dat", &reversed);
        let out = dir.path().join("sectors");

        let written = generate(&deck, &out, 2020, "GABEKILE", &GeneratorConfig::default()).unwrap();
        let times: Vec<DynamicSector> = written
            .iter()
            .map(|p| CatalogStore::read(p).unwrap())
            .collect();
        assert!(times.windows(2).all(|w| w[0].start < w[1].start));
    }

    #[test]
    fn test_generate_empty_deck_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let deck = write_sample_deck(dir.path(), "bsh162020.dat", "not, a, valid, line\n");
        let out = dir.path().join("sectors");

        let written = generate(&deck, &out, 2020, "GABEKILE", &GeneratorConfig::default()).unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn test_generate_skips_existing_without_force() {
        let dir = TempDir::new().unwrap();
        let deck = write_sample_deck(dir.path(), "bsh162020.dat", GABEKILE_DECK);
        let out = dir.path().join("sectors");
        let config = GeneratorConfig::default();

        let first_run = generate(&deck, &out, 2020, "GABEKILE", &config).unwrap();
        let second_run = generate(&deck, &out, 2020, "GABEKILE", &config).unwrap();
        assert_eq!(first_run.len(), 2);
        assert!(second_run.is_empty());

        let forced = GeneratorConfig {
            force: true,
            ..config
        };
        let third_run = generate(&deck, &out, 2020, "GABEKILE", &forced).unwrap();
        assert_eq!(third_run.len(), 2);
    }

    #[test]
    fn test_duplicate_synoptic_time_write_policy() {
        // Two fixes at the same synoptic time target the same catalog file:
        // first write wins by default, last write wins under force.
        let duplicated = "\
SH, 16, 2020091500,   , BEST,   0, 200S,  800E,  45,  990, TS,  34, NEQ,  100,  100,   80,   90, 1010,  150,  30,  55,   0,   L,   0,    ,   0,   0, GABEKILE, D,
SH, 16, 2020091500,   , BEST,   0, 210S,  820E,  50,  985, TS,  34, NEQ,  100,  100,   80,   90, 1010,  150,  30,  55,   0,   L,   0,    ,   0,   0, GABEKILE, D,
";
        let dir = TempDir::new().unwrap();
        let deck = write_sample_deck(dir.path(), "bsh162020.dat", duplicated);

        let out = dir.path().join("first-wins");
        let written = generate(&deck, &out, 2020, "GABEKILE", &GeneratorConfig::default()).unwrap();
        assert_eq!(written.len(), 1);
        let sector = CatalogStore::read(&written[0]).unwrap();
        assert!((sector.projection.lat_0 + 20.0).abs() < 1e-9);

        let forced = GeneratorConfig {
            force: true,
            ..GeneratorConfig::default()
        };
        let out = dir.path().join("last-wins");
        let written = generate(&deck, &out, 2020, "GABEKILE", &forced).unwrap();
        assert_eq!(written.len(), 1);
        let sector = CatalogStore::read(&written[0]).unwrap();
        assert!((sector.projection.lat_0 + 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_sector_grid_is_stable_across_fixes() {
        let dir = TempDir::new().unwrap();
        let deck = write_sample_deck(dir.path(), "bsh162020.dat", GABEKILE_DECK);
        let out = dir.path().join("sectors");

        let written = generate(&deck, &out, 2020, "GABEKILE", &GeneratorConfig::default()).unwrap();
        let sectors: Vec<DynamicSector> = written
            .iter()
            .map(|p| CatalogStore::read(p).unwrap())
            .collect();

        assert!(sectors
            .windows(2)
            .all(|w| w[0].shape == w[1].shape && w[0].resolution == w[1].resolution));
        // Extent spans the full grid at every fix.
        for s in &sectors {
            let span = s.area_extent.upper_right_xy[0] - s.area_extent.lower_left_xy[0];
            assert!((span - 1400.0 * 1000.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_catalog_files_are_readable_yaml() {
        let dir = TempDir::new().unwrap();
        let deck = write_sample_deck(dir.path(), "bsh162020.dat", GABEKILE_DECK);
        let out = dir.path().join("sectors");

        let written = generate(&deck, &out, 2020, "GABEKILE", &GeneratorConfig::default()).unwrap();
        let text = fs::read_to_string(&written[0]).unwrap();
        assert!(text.starts_with("tc2020sh16gabekile:"));
        assert!(text.contains("sector_type: atcf"));
        assert!(text.contains("proj: laea"));
    }
}
