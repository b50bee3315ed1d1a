//! # Waterman Lattice
//!
//! Enumerates the points of the face-centred cubic lattice (integer points
//! with an even coordinate sum) that lie inside or on a sphere.
//!
//! ## Architecture
//!
//! ```text
//! radius → waterman-lattice (PointCloud) → waterman-hull (Polyhedron)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use waterman_lattice::generate;
//!
//! let cloud = generate(2.0);
//! assert_eq!(cloud.len(), 19);
//! assert!(cloud.iter().all(|p| p.length_squared() <= 4.0));
//! ```

mod scan;

pub use scan::{admits, count, generate, generate_about};

use glam::DVec3;

/// Lattice points in enumeration order (x, then y, then z ascending).
pub type PointCloud = Vec<DVec3>;
