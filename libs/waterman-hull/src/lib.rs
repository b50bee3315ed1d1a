//! # Waterman Hull
//!
//! Convex hull construction for Waterman polyhedra.
//!
//! ## Pipeline
//!
//! ```text
//! radius → waterman_lattice::generate → QuickHull → Polyhedron → export
//! ```
//!
//! ## Example
//!
//! ```rust
//! use waterman_hull::waterman_polyhedron;
//!
//! let cuboctahedron = waterman_polyhedron(std::f64::consts::SQRT_2).unwrap();
//! assert_eq!(cuboctahedron.num_vertices(), 12);
//! assert_eq!(cuboctahedron.num_faces(), 14);
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod polyhedron;
pub mod quickhull;

pub use config::HullConfig;
pub use error::{HullError, HullResult};
pub use polyhedron::{FaceIndexing, Polyhedron};
pub use quickhull::QuickHull;

use glam::DVec3;
use log::{debug, warn};

/// Result of a build in the shape hosts consume: a polyhedron when the
/// build succeeded, otherwise the reason it did not.
#[derive(Debug, Clone, PartialEq)]
pub struct HullOutcome {
    pub polyhedron: Option<Polyhedron>,
    pub error: Option<HullError>,
}

impl HullOutcome {
    pub fn is_valid(&self) -> bool {
        self.polyhedron.is_some()
    }
}

impl From<HullResult<Polyhedron>> for HullOutcome {
    fn from(result: HullResult<Polyhedron>) -> Self {
        match result {
            Ok(polyhedron) => Self {
                polyhedron: Some(polyhedron),
                error: None,
            },
            Err(error) => Self {
                polyhedron: None,
                error: Some(error),
            },
        }
    }
}

/// Builds the hull of `points` with an automatic tolerance.
///
/// ```rust
/// use glam::DVec3;
/// use waterman_hull::build_hull;
///
/// let outcome = build_hull(&[DVec3::ZERO, DVec3::X, DVec3::Y]);
/// assert!(!outcome.is_valid());
/// ```
pub fn build_hull(points: &[DVec3]) -> HullOutcome {
    QuickHull::new().build(points).into()
}

/// Generates the lattice for `radius` and returns its convex hull.
///
/// ## Errors
///
/// - [`HullError::InvalidInput`] when the radius yields no points
/// - [`HullError::DegenerateCloud`] when the points do not span a volume
///   (any radius below √2)
pub fn waterman_polyhedron(radius: f64) -> HullResult<Polyhedron> {
    waterman_polyhedron_with(radius, &HullConfig::default())
}

/// [`waterman_polyhedron`] with an explicit configuration.
pub fn waterman_polyhedron_with(radius: f64, config: &HullConfig) -> HullResult<Polyhedron> {
    let cloud = waterman_lattice::generate(radius);
    waterman_polyhedron_of(radius, &cloud, config)
}

/// Hull of a lattice `cloud` already generated for `radius`.
///
/// ```rust
/// use waterman_hull::{waterman_polyhedron_of, HullConfig};
///
/// let cloud = waterman_lattice::generate(2.0);
/// let octahedron = waterman_polyhedron_of(2.0, &cloud, &HullConfig::default()).unwrap();
/// assert_eq!(cloud.len(), 19);
/// assert_eq!(octahedron.num_vertices(), 6);
/// ```
pub fn waterman_polyhedron_of(radius: f64, cloud: &[DVec3], config: &HullConfig) -> HullResult<Polyhedron> {
    if cloud.is_empty() {
        warn!("radius {radius} yields no lattice points");
        return Err(HullError::InvalidInput { radius });
    }
    debug!("radius {radius}: {} lattice points", cloud.len());

    let polyhedron = QuickHull::with_config(*config).build(cloud)?;
    debug!(
        "radius {radius}: {} vertices, {} faces",
        polyhedron.num_vertices(),
        polyhedron.num_faces()
    );
    Ok(polyhedron)
}
