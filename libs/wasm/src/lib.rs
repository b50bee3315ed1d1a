//! WASM-facing entry points for the Waterman pipeline.
//!
//! This crate is compiled to a `cdylib` and consumed from JavaScript via
//! `wasm-bindgen`, or from native hosts through the C functions in [`ffi`].
//! Native tests use `generate_waterman_internal`, which exposes Rust error
//! types directly.
//!
//! ```
//! let handle = waterman_wasm::generate_waterman(2.0, false);
//! assert!(handle.is_valid());
//! assert_eq!(handle.vertex_count(), 6);
//! ```

use config::constants::RECOMMENDED_MAX_RADIUS;
use log::warn;
use wasm_bindgen::prelude::*;
use waterman_hull::{export::PolyhedronBuffers, waterman_polyhedron_with, HullConfig, HullResult};

pub mod ffi;
mod handle;

pub use handle::PolyhedronHandle;

/// Installs a panic hook that forwards Rust panics to the browser console.
///
/// # Examples
/// ```no_run
/// // In JavaScript: import and call once at startup.
/// // import { init_panic_hook } from "waterman-wasm";
/// // init_panic_hook();
/// ```
#[wasm_bindgen]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Radius above which hosts should ask before building.
///
/// # Examples
/// ```
/// assert!(waterman_wasm::recommended_max_radius() > 2.0);
/// ```
#[wasm_bindgen]
pub fn recommended_max_radius() -> f64 {
    RECOMMENDED_MAX_RADIUS
}

/// Number of lattice points a radius produces, without building anything.
///
/// # Examples
/// ```
/// assert_eq!(waterman_wasm::lattice_point_count(2.0), 19);
/// ```
#[wasm_bindgen]
pub fn lattice_point_count(radius: f64) -> usize {
    waterman_lattice::count(radius)
}

/// Builds the Waterman polyhedron for `radius`.
///
/// Never fails: a radius without a valid hull yields a handle whose
/// `is_valid()` is false and whose buffers are empty.
///
/// # Examples
/// ```no_run
/// // In JavaScript:
/// // const poly = generate_waterman(5.0, true);
/// // if (poly.is_valid()) {
/// //   const coords = poly.coords();   // Float64Array
/// //   const faces = poly.faces();     // Uint32Array, count-prefixed
/// // }
/// // poly.release();
/// ```
#[wasm_bindgen]
pub fn generate_waterman(radius: f64, normalize: bool) -> PolyhedronHandle {
    match generate_waterman_internal(radius, normalize) {
        Ok(handle) => handle,
        Err(err) => {
            warn!("radius {radius}: {err}");
            PolyhedronHandle::invalid(err.to_string())
        }
    }
}

/// Host-only helper returning the build error instead of an invalid handle.
///
/// # Examples
/// ```
/// let handle = waterman_wasm::generate_waterman_internal(1.5, false).unwrap();
/// assert_eq!(handle.face_count(), 14);
/// assert!(waterman_wasm::generate_waterman_internal(-1.0, false).is_err());
/// ```
pub fn generate_waterman_internal(radius: f64, normalize: bool) -> HullResult<PolyhedronHandle> {
    let config = HullConfig::new(None, normalize)?;
    let polyhedron = waterman_polyhedron_with(radius, &config)?;
    Ok(PolyhedronHandle::from_buffers(
        PolyhedronBuffers::with_config(&polyhedron, &config),
        waterman_hull::export::triangle_indices(&polyhedron),
    ))
}
