//! # Configuration Constants
//!
//! Centralized constants for the Waterman pipeline.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point tolerances and the factors that scale them
//! - **Limits**: Minimum hull input size, the recommended radius ceiling and
//!   recursion stack sizes
//! - **Snapshot**: [`GlobalConfig`], the validated set of tunables

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Machine epsilon for `f64`.
///
/// QuickHull derives its distance tolerance from this value and the
/// magnitude of the input coordinates.
///
/// # Example
///
/// ```rust
/// use config::constants::DOUBLE_PRECISION;
/// assert_eq!(DOUBLE_PRECISION, f64::EPSILON);
/// ```
pub const DOUBLE_PRECISION: f64 = f64::EPSILON;

/// Factor applied to `DOUBLE_PRECISION * (max|x| + max|y| + max|z|)` when
/// the hull tolerance is computed automatically.
pub const AUTOMATIC_TOLERANCE_FACTOR: f64 = 3.0;

/// Multiple of the distance tolerance a candidate simplex vertex must clear
/// before the input is accepted as non-collinear / non-coplanar.
///
/// # Example
///
/// ```rust
/// use config::constants::SIMPLEX_TOLERANCE_FACTOR;
///
/// let tol = 1e-12;
/// let farthest_from_line = 5e-11;
/// let collinear = farthest_from_line <= SIMPLEX_TOLERANCE_FACTOR * tol;
/// assert!(collinear);
/// ```
pub const SIMPLEX_TOLERANCE_FACTOR: f64 = 100.0;

/// Multiple of the distance tolerance used by the post-build validity check.
pub const CHECK_TOLERANCE_FACTOR: f64 = 10.0;

/// Once a point is farther than this multiple of the tolerance above a new
/// face, the search for a better face is abandoned.
pub const CLAIM_EARLY_EXIT_FACTOR: f64 = 1000.0;

/// Factor of `characteristic_length * DOUBLE_PRECISION` below which a face
/// is treated as small and its normal is stabilised.
pub const SMALL_FACE_AREA_FACTOR: f64 = 1000.0;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Minimum number of points that can span a 3D hull.
pub const MIN_HULL_POINTS: usize = 4;

/// Radius above which hosts should warn before building.
///
/// The lattice grows with the cube of the radius and hull construction is
/// worse than linear in the point count. The core does not enforce it.
///
/// # Example
///
/// ```rust
/// use config::constants::RECOMMENDED_MAX_RADIUS;
///
/// let radius = 12.0;
/// assert!(radius <= RECOMMENDED_MAX_RADIUS);
/// ```
pub const RECOMMENDED_MAX_RADIUS: f64 = 64.0;

/// Remaining stack below which the recursive horizon search switches to a
/// freshly allocated segment through the `stacker` crate.
///
/// # Examples
/// ```
/// use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
/// assert!(STACKER_RED_ZONE_BYTES < STACKER_STACK_SIZE_BYTES);
/// ```
pub const STACKER_RED_ZONE_BYTES: usize = 64 * 1024;

/// Size of each stack segment `stacker` allocates once the red zone is hit.
pub const STACKER_STACK_SIZE_BYTES: usize = 1024 * 1024;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Computes the automatic hull distance tolerance from the largest absolute
/// coordinate on each axis.
///
/// # Example
///
/// ```rust
/// use config::constants::{automatic_tolerance, DOUBLE_PRECISION};
///
/// let tol = automatic_tolerance(1.0, 1.0, 1.0);
/// assert_eq!(tol, 9.0 * DOUBLE_PRECISION);
/// ```
#[inline]
pub fn automatic_tolerance(max_abs_x: f64, max_abs_y: f64, max_abs_z: f64) -> f64 {
    AUTOMATIC_TOLERANCE_FACTOR * DOUBLE_PRECISION * (max_abs_x + max_abs_y + max_abs_z)
}

// =============================================================================
// CONFIGURATION SNAPSHOT
// =============================================================================

/// Immutable snapshot of the tunables shared between crates.
///
/// # Examples
/// ```
/// use config::constants::GlobalConfig;
/// let config = GlobalConfig::default();
/// assert!(config.distance_tolerance.is_none());
/// assert!(!config.normalize_output);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlobalConfig {
    /// Explicit hull distance tolerance. `None` derives it from the input.
    pub distance_tolerance: Option<f64>,
    /// Whether exported coordinates are rescaled by their overall range.
    pub normalize_output: bool,
}

impl GlobalConfig {
    /// Builds a configuration, rejecting tolerances that are not strictly
    /// positive and finite.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GlobalConfig;
    /// let cfg = GlobalConfig::new(Some(1.0e-9), true).expect("valid config");
    /// assert_eq!(cfg.distance_tolerance, Some(1.0e-9));
    /// assert!(GlobalConfig::new(Some(-1.0), false).is_err());
    /// ```
    pub fn new(distance_tolerance: Option<f64>, normalize_output: bool) -> Result<Self, ConfigError> {
        if let Some(tolerance) = distance_tolerance {
            if !tolerance.is_finite() || tolerance <= 0.0 {
                return Err(ConfigError::InvalidTolerance(tolerance));
            }
        }
        Ok(Self {
            distance_tolerance,
            normalize_output,
        })
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Raised when an explicit tolerance is zero, negative or not finite.
    InvalidTolerance(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "distance tolerance must be positive and finite: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests;
