//! Spatial coverage over a fixed reference grid
//!
//! The project footprint is approximated by a square split into a 5 x 5
//! grid centred on the site. Coverage is a flat allowance per sensor plus a
//! fixed share when satellite data exists. Cells not covered are counted
//! from the coverage figure; when more than five are uncovered the first
//! few are reported as gaps to direct new deployments.

use heapless::Vec as BoundedVec;
use serde::{Deserialize, Serialize};

use crate::constants::readiness::*;
use crate::constants::EPSILON;
use crate::location::{GeoPoint, SiteLocation};

/// Kilometres per degree of latitude
const KM_PER_DEGREE: f64 = 111.32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpatialConfig {
    pub coverage_per_sensor: f64,
    pub satellite_coverage: f64,
    /// Uncovered cells above which gaps are reported
    pub uncovered_cells_threshold: usize,
    pub min_coverage_pct: f64,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            coverage_per_sensor: COVERAGE_PER_SENSOR,
            satellite_coverage: SATELLITE_COVERAGE,
            uncovered_cells_threshold: UNCOVERED_CELLS_THRESHOLD,
            min_coverage_pct: MIN_SPATIAL_COVERAGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapPriority {
    Critical,
    High,
}

/// One uncovered grid cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialGap {
    pub row: usize,
    pub col: usize,
    /// Approximate centre of the cell
    pub center: GeoPoint,
    pub priority: GapPriority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialCoverageInfo {
    pub sensor_count: usize,
    /// Sensors per hectare
    pub sensor_density: f64,
    pub satellite_available: bool,
    /// Effective coverage in [0, 100]
    pub coverage_pct: f64,
    pub uncovered_cells: usize,
    pub gaps: BoundedVec<SpatialGap, MAX_SPATIAL_GAPS>,
}

impl SpatialCoverageInfo {
    pub fn is_adequate(&self, config: &SpatialConfig) -> bool {
        self.coverage_pct >= config.min_coverage_pct
    }
}

pub fn assess_spatial_coverage(
    site: &SiteLocation,
    area_ha: f64,
    sensor_count: usize,
    satellite_available: bool,
    config: &SpatialConfig,
) -> SpatialCoverageInfo {
    let satellite_share = if satellite_available { config.satellite_coverage } else { 0.0 };
    let coverage_pct = (sensor_count as f64 * config.coverage_per_sensor + satellite_share).clamp(0.0, 100.0);

    let uncovered_cells = (GRID_CELLS as f64 * (1.0 - coverage_pct / 100.0)).round() as usize;
    let uncovered_cells = uncovered_cells.min(GRID_CELLS);

    let mut gaps = BoundedVec::new();
    if uncovered_cells > config.uncovered_cells_threshold {
        let covered = GRID_CELLS - uncovered_cells;
        let cell_deg = cell_size_degrees(area_ha);
        for (n, cell) in (covered..GRID_CELLS).take(MAX_SPATIAL_GAPS).enumerate() {
            let (row, col) = (cell / GRID_SIDE, cell % GRID_SIDE);
            let gap = SpatialGap {
                row,
                col,
                center: cell_center(site, row, col, cell_deg),
                priority: if n == 0 { GapPriority::Critical } else { GapPriority::High },
            };
            if gaps.push(gap).is_err() {
                break;
            }
        }
    }

    SpatialCoverageInfo {
        sensor_count,
        sensor_density: sensor_count as f64 / (area_ha + EPSILON),
        satellite_available,
        coverage_pct,
        uncovered_cells,
        gaps,
    }
}

fn cell_size_degrees(area_ha: f64) -> f64 {
    // 1 km² = 100 ha
    let side_km = (area_ha.max(0.0) / 100.0).sqrt();
    side_km / GRID_SIDE as f64 / KM_PER_DEGREE
}

fn cell_center(site: &SiteLocation, row: usize, col: usize, cell_deg: f64) -> GeoPoint {
    let half = (GRID_SIDE / 2) as f64;
    GeoPoint::new(
        (site.point.latitude + (half - row as f64) * cell_deg).clamp(-90.0, 90.0),
        (site.point.longitude + (col as f64 - half) * cell_deg).clamp(-180.0, 180.0),
    )
}
