//! # Sphere Scan
//!
//! Nested integer sweep over a sphere with FCC parity pruning.
//!
//! ## Algorithm
//!
//! 1. Sweep `x` over the integers of `[cx - r, cx + r]`
//! 2. For each `x`, sweep `y` over the chord left by `R = r² - (x - cx)²`
//! 3. For each `(x, y)`, the remaining `Ry = R - (y - cy)²` bounds `z`
//! 4. Align the first `z` so that `x + y + z` is even and step by 2

use crate::PointCloud;
use config::constants::RECOMMENDED_MAX_RADIUS;
use glam::DVec3;
use log::{debug, trace, warn};

/// Enumerates the Waterman points of a sphere centred at the origin.
///
/// Returns an empty cloud for a radius that is not strictly positive or not
/// finite.
///
/// # Example
///
/// ```rust
/// use waterman_lattice::generate;
///
/// assert!(generate(0.0).is_empty());
/// assert_eq!(generate(1.0).len(), 1); // only the origin has an even sum
/// ```
pub fn generate(radius: f64) -> PointCloud {
    generate_about(radius, DVec3::ZERO)
}

/// Enumerates the Waterman points of a sphere with an arbitrary center.
///
/// Parity is always taken on the absolute lattice coordinates, so moving
/// the center selects a different window of the same lattice.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use waterman_lattice::{generate, generate_about};
///
/// assert_eq!(generate_about(3.0, DVec3::ZERO), generate(3.0));
/// let shifted = generate_about(1.0, DVec3::new(1.0, 0.0, 0.0));
/// assert!(shifted.iter().all(|p| (p.x + p.y + p.z) as i64 % 2 == 0));
/// ```
pub fn generate_about(radius: f64, center: DVec3) -> PointCloud {
    let mut cloud = Vec::new();
    scan(radius, center, |point| cloud.push(point));
    debug!("lattice scan r={radius} center={center:?}: {} points", cloud.len());
    cloud
}

/// Counts the points [`generate`] would emit without storing them.
///
/// # Example
///
/// ```rust
/// use waterman_lattice::{count, generate};
///
/// assert_eq!(count(4.0), generate(4.0).len());
/// ```
pub fn count(radius: f64) -> usize {
    let mut total = 0;
    scan(radius, DVec3::ZERO, |_| total += 1);
    total
}

/// Returns true if `point` is one of the points the scan of this sphere
/// emits: integer coordinates, even coordinate sum, within or on the sphere.
pub fn admits(radius: f64, center: DVec3, point: DVec3) -> bool {
    if !is_scannable(radius, center) || point != point.round() {
        return false;
    }
    let sum = point.x + point.y + point.z;
    if sum.rem_euclid(2.0) != 0.0 {
        return false;
    }
    let d = point - center;
    radius * radius - d.x * d.x - d.y * d.y - d.z * d.z >= 0.0
}

fn is_scannable(radius: f64, center: DVec3) -> bool {
    radius.is_finite() && radius > 0.0 && center.is_finite()
}

/// Drives the sweep, handing every admissible point to `emit`.
fn scan(radius: f64, center: DVec3, mut emit: impl FnMut(DVec3)) {
    if !is_scannable(radius, center) {
        debug!("lattice scan skipped for radius {radius} center {center:?}");
        return;
    }
    if radius > RECOMMENDED_MAX_RADIUS {
        warn!("radius {radius} exceeds the recommended maximum {RECOMMENDED_MAX_RADIUS}");
    }

    let radius2 = radius * radius;
    let x_first = (center.x - radius).ceil() as i64;
    let x_last = (center.x + radius).floor() as i64;

    for x in x_first..=x_last {
        let dx = x as f64 - center.x;
        let r_yz = radius2 - dx * dx;
        if r_yz < 0.0 {
            continue;
        }

        let s = r_yz.sqrt();
        let y_first = (center.y - s).ceil() as i64;
        let y_last = (center.y + s).floor() as i64;

        for y in y_first..=y_last {
            let dy = y as f64 - center.y;
            let r_z = r_yz - dy * dy;
            if r_z < 0.0 {
                continue;
            }

            let Some((z_first, z_last)) = z_column(x, y, r_z, center.z) else {
                trace!("column ({x}, {y}) rejected by parity");
                continue;
            };
            for z in (z_first..=z_last).step_by(2) {
                emit(DVec3::new(x as f64, y as f64, z as f64));
            }
        }
    }
}

/// Computes the parity-aligned `z` bounds of the `(x, y)` column.
///
/// `None` means the column's single tangent candidate has the wrong parity.
/// An empty range (`first > last`) is returned when no aligned `z` fits.
fn z_column(x: i64, y: i64, r_z: f64, cz: f64) -> Option<(i64, i64)> {
    if r_z == 0.0 && cz == cz.floor() {
        let c = cz as i64;
        return ((x + y + c).rem_euclid(2) == 0).then_some((c, c));
    }

    let s = r_z.sqrt();
    let mut first = (cz - s).ceil() as i64;
    let mut last = (cz + s).floor() as i64;

    // sqrt may round up onto an integer that lies just outside the sphere
    if sq(first as f64 - cz) > r_z {
        first += 1;
    }
    if sq(last as f64 - cz) > r_z {
        last -= 1;
    }

    // step inward so the aligned start never leaves the sphere
    if (first - (x + y)).rem_euclid(2) != 0 {
        first += 1;
    }
    Some((first, last))
}

#[inline]
fn sq(v: f64) -> f64 {
    v * v
}
