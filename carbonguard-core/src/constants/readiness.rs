//! Carbon Accounting and Readiness Constants

// ===== CARBON =====

/// Default annual sequestration rate when no biomass estimate exists (t C/ha/yr).
///
/// Conservative blue-carbon literature value.
pub const BASELINE_SEQUESTRATION_RATE: f64 = 3.5;

/// Fraction of dry biomass that is carbon.
///
/// Source: IPCC default carbon fraction.
pub const CARBON_FRACTION: f64 = 0.5;

/// Molecular mass ratio CO2 / C.
pub const CO2_PER_CARBON: f64 = 44.0 / 12.0;

/// Confidence (%) reported when the estimate falls back to the baseline rate.
pub const BASELINE_CONFIDENCE: f64 = 70.0;

// ===== SPATIAL COVERAGE =====

/// Cells in the fixed spatial reference grid (5 x 5).
pub const GRID_CELLS: usize = 25;

/// Side length of the reference grid.
pub const GRID_SIDE: usize = 5;

/// Coverage points contributed by each sensor.
pub const COVERAGE_PER_SENSOR: f64 = 5.0;

/// Coverage points contributed by satellite availability.
pub const SATELLITE_COVERAGE: f64 = 40.0;

/// Uncovered cells above which representative gaps are reported.
pub const UNCOVERED_CELLS_THRESHOLD: usize = 5;

/// Most representative spatial gaps reported.
pub const MAX_SPATIAL_GAPS: usize = 3;

// ===== TEMPORAL =====

/// Consistency points deducted per pair of misaligned sources.
pub const MISALIGNED_PAIR_PENALTY: f64 = 10.0;

/// Minimum temporal coverage (%) for alignment and readiness.
pub const MIN_TEMPORAL_COVERAGE: f64 = 80.0;

/// Minimum temporal consistency score for alignment.
pub const MIN_TEMPORAL_CONSISTENCY: f64 = 80.0;

// ===== READINESS =====

/// Minimum overall data quality and cross-source consistency to be ready.
pub const READINESS_THRESHOLD: f64 = 70.0;

/// Number of readiness criteria.
pub const READINESS_CRITERIA: usize = 5;

/// Spatial coverage (%) below which sensor deployment is recommended.
pub const MIN_SPATIAL_COVERAGE: f64 = 50.0;
