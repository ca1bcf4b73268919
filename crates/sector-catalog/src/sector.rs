//! Dynamic sector records.
//!
//! A [`DynamicSector`] bundles a projection, a pixel grid, a projected
//! extent, and descriptive metadata for one validity interval. The
//! `area_extent` field is functionally determined by (center, shape,
//! resolution); every mutator that touches one of those recomputes the
//! extent so the record can never go stale.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::projection::ProjectionSpec;

/// Kind of sector. Dynamic kinds follow a moving phenomenon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectorType {
    Static,
    Atcf,
    Pyrocb,
    Atmosriver,
    Volcano,
}

impl fmt::Display for SectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SectorType::Static => "static",
            SectorType::Atcf => "atcf",
            SectorType::Pyrocb => "pyrocb",
            SectorType::Atmosriver => "atmosriver",
            SectorType::Volcano => "volcano",
        };
        write!(f, "{s}")
    }
}

impl FromStr for SectorType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "static" => Ok(SectorType::Static),
            "atcf" => Ok(SectorType::Atcf),
            "pyrocb" => Ok(SectorType::Pyrocb),
            "atmosriver" => Ok(SectorType::Atmosriver),
            "volcano" => Ok(SectorType::Volcano),
            other => Err(CatalogError::InvalidSectorType(other.to_string())),
        }
    }
}

/// A typed metadata scalar carried in `sector_info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Datetime(DateTime<Utc>),
    Str(String),
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Bool(b) => write!(f, "{b}"),
            MetaValue::Int(i) => write!(f, "{i}"),
            MetaValue::Float(v) => write!(f, "{v}"),
            MetaValue::Datetime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            MetaValue::Str(s) => write!(f, "{s}"),
        }
    }
}

/// Metadata bag attached to a sector record.
pub type SectorInfo = BTreeMap<String, MetaValue>;

/// Pixel grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub width: usize,
    pub height: usize,
}

/// Projected extent in meters, derived from center/shape/resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaExtent {
    pub lower_left_xy: [f64; 2],
    pub upper_right_xy: [f64; 2],
}

/// A time-windowed geospatial window with projection and pixel grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicSector {
    /// Unique catalog name; serialized as the top-level map key, not as
    /// a record field.
    #[serde(skip)]
    pub name: String,
    pub sector_type: SectorType,
    #[serde(rename = "sector_start_datetime")]
    pub start: DateTime<Utc>,
    #[serde(rename = "sector_end_datetime")]
    pub end: DateTime<Utc>,
    pub description: String,
    pub sector_info: SectorInfo,
    pub projection: ProjectionSpec,
    /// Center offset in projected coordinates (x, y meters).
    pub center: [f64; 2],
    /// Pixel resolution in meters (x, y).
    pub resolution: [f64; 2],
    pub shape: Shape,
    pub area_extent: AreaExtent,
}

/// Keys that must be present in `sector_info` for ATCF sectors.
const ATCF_REQUIRED_INFO: [&str; 5] = [
    "storm_year",
    "storm_basin",
    "storm_num",
    "storm_name",
    "synoptic_time",
];

impl DynamicSector {
    /// Build an untagged sector record with a computed extent.
    ///
    /// The record defaults to `static` with an unbounded validity
    /// interval; call [`DynamicSector::tag_dynamic`] to attach a sector
    /// type, validity window, and metadata.
    pub fn new(
        name: impl Into<String>,
        projection: ProjectionSpec,
        shape: Shape,
        resolution: [f64; 2],
        center: [f64; 2],
    ) -> Result<Self> {
        if shape.width == 0 || shape.height == 0 {
            return Err(CatalogError::InvalidGeometry(format!(
                "shape must be strictly positive, got {}x{}",
                shape.width, shape.height
            )));
        }
        if !(resolution[0] > 0.0 && resolution[1] > 0.0)
            || !resolution[0].is_finite()
            || !resolution[1].is_finite()
        {
            return Err(CatalogError::InvalidGeometry(format!(
                "pixel resolution must be strictly positive, got {:?}",
                resolution
            )));
        }

        let name = name.into();
        let area_extent = compute_extent(center, shape, resolution);
        Ok(Self {
            description: name.clone(),
            name,
            sector_type: SectorType::Static,
            start: DateTime::<Utc>::MIN_UTC,
            end: DateTime::<Utc>::MAX_UTC,
            sector_info: SectorInfo::new(),
            projection,
            center,
            resolution,
            shape,
            area_extent,
        })
    }

    /// Attach a sector type, validity interval, and metadata bag.
    ///
    /// ATCF sectors require `storm_year`, `storm_basin`, `storm_num`,
    /// `storm_name`, and `synoptic_time` in `info`; the description is
    /// derived from those. The other dynamic kinds describe themselves by
    /// name and start time; `static` keeps the name as description.
    pub fn tag_dynamic(
        mut self,
        sector_type: SectorType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        info: SectorInfo,
    ) -> Result<Self> {
        self.description = match sector_type {
            SectorType::Atcf => {
                for key in ATCF_REQUIRED_INFO {
                    if !info.contains_key(key) {
                        return Err(CatalogError::MissingInfo {
                            key,
                            sector_type: sector_type.to_string(),
                        });
                    }
                }
                format!(
                    "TC{} {}{} {} {}",
                    info["storm_year"],
                    info["storm_basin"],
                    info["storm_num"],
                    info["storm_name"],
                    info["synoptic_time"],
                )
            }
            SectorType::Pyrocb | SectorType::Atmosriver | SectorType::Volcano => {
                format!("{} at {}", self.name, sat_common::format_compact(&start))
            }
            SectorType::Static => self.name.clone(),
        };
        self.sector_type = sector_type;
        self.start = start;
        self.end = end;
        self.sector_info = info;
        Ok(self)
    }

    /// Change the pixel grid, recomputing the extent.
    pub fn set_shape(&mut self, shape: Shape) -> Result<()> {
        if shape.width == 0 || shape.height == 0 {
            return Err(CatalogError::InvalidGeometry(format!(
                "shape must be strictly positive, got {}x{}",
                shape.width, shape.height
            )));
        }
        self.shape = shape;
        self.area_extent = compute_extent(self.center, self.shape, self.resolution);
        Ok(())
    }

    /// Change the pixel resolution, recomputing the extent.
    pub fn set_resolution(&mut self, resolution: [f64; 2]) -> Result<()> {
        if !(resolution[0] > 0.0 && resolution[1] > 0.0) {
            return Err(CatalogError::InvalidGeometry(format!(
                "pixel resolution must be strictly positive, got {:?}",
                resolution
            )));
        }
        self.resolution = resolution;
        self.area_extent = compute_extent(self.center, self.shape, self.resolution);
        Ok(())
    }

    /// Change the projected center offset, recomputing the extent.
    pub fn set_center(&mut self, center: [f64; 2]) {
        self.center = center;
        self.area_extent = compute_extent(self.center, self.shape, self.resolution);
    }
}

fn compute_extent(center: [f64; 2], shape: Shape, resolution: [f64; 2]) -> AreaExtent {
    let half_w = shape.width as f64 * resolution[0] / 2.0;
    let half_h = shape.height as f64 * resolution[1] / 2.0;
    AreaExtent {
        lower_left_xy: [center[0] - half_w, center[1] - half_h],
        upper_right_xy: [center[0] + half_w, center[1] + half_h],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_sector() -> DynamicSector {
        DynamicSector::new(
            "tc2020sh16gabekile",
            ProjectionSpec::laea(-20.0, 80.0),
            Shape {
                width: 1400,
                height: 1400,
            },
            [1000.0, 1000.0],
            [0.0, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn test_extent_matches_shape_times_resolution() {
        let sector = sample_sector();
        let ext = sector.area_extent;

        let span_x = ext.upper_right_xy[0] - ext.lower_left_xy[0];
        let span_y = ext.upper_right_xy[1] - ext.lower_left_xy[1];
        assert!((span_x - 1400.0 * 1000.0).abs() < 1e-6);
        assert!((span_y - 1400.0 * 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_extent_recomputed_on_mutation() {
        let mut sector = sample_sector();
        sector.set_center([5000.0, -2500.0]);

        assert!((sector.area_extent.lower_left_xy[0] - (5000.0 - 700_000.0)).abs() < 1e-6);
        assert!((sector.area_extent.upper_right_xy[1] - (-2500.0 + 700_000.0)).abs() < 1e-6);

        sector
            .set_shape(Shape {
                width: 700,
                height: 700,
            })
            .unwrap();
        let span_x = sector.area_extent.upper_right_xy[0] - sector.area_extent.lower_left_xy[0];
        assert!((span_x - 700.0 * 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_shape_rejected() {
        let result = DynamicSector::new(
            "bad",
            ProjectionSpec::laea(0.0, 0.0),
            Shape {
                width: 0,
                height: 100,
            },
            [1000.0, 1000.0],
            [0.0, 0.0],
        );
        assert!(matches!(result, Err(CatalogError::InvalidGeometry(_))));
    }

    #[test]
    fn test_negative_resolution_rejected() {
        let result = DynamicSector::new(
            "bad",
            ProjectionSpec::laea(0.0, 0.0),
            Shape {
                width: 100,
                height: 100,
            },
            [-1000.0, 1000.0],
            [0.0, 0.0],
        );
        assert!(matches!(result, Err(CatalogError::InvalidGeometry(_))));
    }

    #[test]
    fn test_tag_atcf_requires_storm_info() {
        let start = Utc.with_ymd_and_hms(2020, 9, 15, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2020, 9, 15, 6, 0, 0).unwrap();

        let err = sample_sector()
            .tag_dynamic(SectorType::Atcf, start, end, SectorInfo::new())
            .unwrap_err();
        assert!(matches!(err, CatalogError::MissingInfo { .. }));
    }

    #[test]
    fn test_tag_atcf_description() {
        let start = Utc.with_ymd_and_hms(2020, 9, 15, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2020, 9, 15, 6, 0, 0).unwrap();

        let mut info = SectorInfo::new();
        info.insert("storm_year".into(), MetaValue::Int(2020));
        info.insert("storm_basin".into(), MetaValue::Str("SH".into()));
        info.insert("storm_num".into(), MetaValue::Int(16));
        info.insert("storm_name".into(), MetaValue::Str("GABEKILE".into()));
        info.insert("synoptic_time".into(), MetaValue::Datetime(start));

        let sector = sample_sector()
            .tag_dynamic(SectorType::Atcf, start, end, info)
            .unwrap();
        assert_eq!(
            sector.description,
            "TC2020 SH16 GABEKILE 2020-09-15 00:00:00"
        );
        assert_eq!(sector.sector_type, SectorType::Atcf);
        assert_eq!(sector.start, start);
        assert_eq!(sector.end, end);
    }

    #[test]
    fn test_tag_volcano_description() {
        let start = Utc.with_ymd_and_hms(2021, 4, 10, 12, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2021, 4, 10, 18, 0, 0).unwrap();

        let sector = DynamicSector::new(
            "soufriere",
            ProjectionSpec::laea(13.3, -61.2),
            Shape {
                width: 512,
                height: 512,
            },
            [2000.0, 2000.0],
            [0.0, 0.0],
        )
        .unwrap()
        .tag_dynamic(SectorType::Volcano, start, end, SectorInfo::new())
        .unwrap();

        assert_eq!(sector.description, "soufriere at 20210410T12Z");
    }

    #[test]
    fn test_sector_type_from_str() {
        assert_eq!("atcf".parse::<SectorType>().unwrap(), SectorType::Atcf);
        assert_eq!("PyroCb".parse::<SectorType>().unwrap(), SectorType::Pyrocb);
        assert!(matches!(
            "tornado".parse::<SectorType>(),
            Err(CatalogError::InvalidSectorType(_))
        ));
    }
}
