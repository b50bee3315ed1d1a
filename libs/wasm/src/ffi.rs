//! C entry points for native hosts.
//!
//! [`waterman_generate`] hands ownership of two heap buffers to the caller.
//! Each must be returned exactly once through the matching free function,
//! with the length it was handed out with.

use std::ptr;

use log::warn;
use waterman_hull::export::PolyhedronBuffers;
use waterman_hull::{waterman_polyhedron_with, HullConfig, HullResult};

/// Buffers of one build. Pointers are null when the build failed or the
/// buffer is empty.
#[repr(C)]
#[derive(Debug)]
pub struct WatermanBuffers {
    pub valid: bool,
    pub coords: *mut f64,
    pub coords_len: usize,
    pub faces: *mut i64,
    pub faces_len: usize,
    pub vertex_count: usize,
    pub face_count: usize,
}

impl WatermanBuffers {
    fn invalid() -> Self {
        Self {
            valid: false,
            coords: ptr::null_mut(),
            coords_len: 0,
            faces: ptr::null_mut(),
            faces_len: 0,
            vertex_count: 0,
            face_count: 0,
        }
    }
}

fn into_raw<T>(buffer: Vec<T>) -> (*mut T, usize) {
    if buffer.is_empty() {
        return (ptr::null_mut(), 0);
    }
    let len = buffer.len();
    (Box::into_raw(buffer.into_boxed_slice()) as *mut T, len)
}

/// # Safety
///
/// `ptr` must be null or come from `into_raw` with the same `len`, and not
/// have been freed yet.
unsafe fn free_raw<T>(ptr: *mut T, len: usize) {
    if ptr.is_null() {
        return;
    }
    drop(Box::from_raw(ptr::slice_from_raw_parts_mut(ptr, len)));
}

/// Builds the Waterman polyhedron for `radius` and returns its coordinate
/// and count-prefixed face buffers.
#[no_mangle]
pub extern "C" fn waterman_generate(radius: f64, normalize: bool) -> WatermanBuffers {
    let buffers = match export(radius, normalize) {
        Ok(buffers) => buffers,
        Err(err) => {
            warn!("radius {radius}: {err}");
            return WatermanBuffers::invalid();
        }
    };

    let faces = buffers.faces.into_iter().map(|i| i as i64).collect();
    let (coords, coords_len) = into_raw(buffers.coords);
    let (faces, faces_len) = into_raw(faces);
    WatermanBuffers {
        valid: true,
        coords,
        coords_len,
        faces,
        faces_len,
        vertex_count: buffers.vertex_count,
        face_count: buffers.face_count,
    }
}

fn export(radius: f64, normalize: bool) -> HullResult<PolyhedronBuffers> {
    let config = HullConfig::new(None, normalize)?;
    let polyhedron = waterman_polyhedron_with(radius, &config)?;
    Ok(PolyhedronBuffers::with_config(&polyhedron, &config))
}

/// Releases a coordinate buffer returned by [`waterman_generate`].
///
/// # Safety
///
/// `ptr` and `len` must be the `coords` / `coords_len` pair of one
/// [`WatermanBuffers`], passed here at most once. Null is ignored.
#[no_mangle]
pub unsafe extern "C" fn waterman_free_coords(ptr: *mut f64, len: usize) {
    free_raw(ptr, len);
}

/// Releases a face buffer returned by [`waterman_generate`].
///
/// # Safety
///
/// `ptr` and `len` must be the `faces` / `faces_len` pair of one
/// [`WatermanBuffers`], passed here at most once. Null is ignored.
#[no_mangle]
pub unsafe extern "C" fn waterman_free_faces(ptr: *mut i64, len: usize) {
    free_raw(ptr, len);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_and_free_octahedron() {
        let out = waterman_generate(2.0, false);
        assert!(out.valid);
        assert_eq!(out.vertex_count, 6);
        assert_eq!(out.face_count, 8);
        assert_eq!(out.coords_len, 18);
        assert_eq!(out.faces_len, 32);

        let faces = unsafe { std::slice::from_raw_parts(out.faces, out.faces_len) };
        assert!(faces.chunks(4).all(|record| record[0] == 3));

        unsafe {
            waterman_free_coords(out.coords, out.coords_len);
            waterman_free_faces(out.faces, out.faces_len);
        }
    }

    #[test]
    fn normalized_coords_fit_unit_range() {
        let out = waterman_generate(3.0, true);
        let coords = unsafe { std::slice::from_raw_parts(out.coords, out.coords_len) };
        let (lo, hi) = coords
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &c| (lo.min(c), hi.max(c)));
        assert!((hi - lo - 1.0).abs() < 1e-12);
        unsafe {
            waterman_free_coords(out.coords, out.coords_len);
            waterman_free_faces(out.faces, out.faces_len);
        }
    }

    #[test]
    fn invalid_radius_returns_null_buffers() {
        let out = waterman_generate(0.5, false);
        assert!(!out.valid);
        assert!(out.coords.is_null());
        assert!(out.faces.is_null());
        unsafe {
            waterman_free_coords(out.coords, out.coords_len);
            waterman_free_faces(out.faces, out.faces_len);
        }
    }
}
