//! # Polyhedron Handle
//!
//! WASM-friendly owner of the exported buffers of one build.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use waterman_hull::export::PolyhedronBuffers;

/// A handle to polyhedron data that can be accessed from JavaScript.
///
/// # Example (JavaScript)
///
/// ```javascript
/// const poly = generate_waterman(3.0, true);
///
/// // Triangulated view for Three.js
/// const geometry = new THREE.BufferGeometry();
/// geometry.setAttribute('position', new THREE.BufferAttribute(poly.coords(), 3));
/// geometry.setIndex(new THREE.BufferAttribute(poly.triangle_indices(), 1));
///
/// // Hand the buffers back once uploaded
/// poly.release();
/// ```
#[wasm_bindgen]
#[derive(Debug, Clone, Serialize)]
pub struct PolyhedronHandle {
    valid: bool,
    error: Option<String>,
    /// Vertex positions as [x, y, z, x, y, z, ...]
    coords: Vec<f64>,
    /// Count-prefixed polygon faces
    faces: Vec<u32>,
    /// Fan triangulation as [i0, i1, i2, ...]
    #[serde(skip)]
    triangles: Vec<u32>,
    vertex_count: usize,
    face_count: usize,
}

#[wasm_bindgen]
impl PolyhedronHandle {
    /// Returns true if the radius produced a valid hull.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns why the build failed, if it did.
    pub fn error(&self) -> Option<String> {
        self.error.clone()
    }

    /// Returns the number of hull vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Returns the number of polygon faces.
    pub fn face_count(&self) -> usize {
        self.face_count
    }

    /// Returns the vertex buffer as a Float64Array.
    ///
    /// Length: vertex_count * 3
    pub fn coords(&self) -> Vec<f64> {
        self.coords.clone()
    }

    /// Returns the count-prefixed face buffer as a Uint32Array.
    ///
    /// Length: face_count + sum of face sizes
    pub fn faces(&self) -> Vec<u32> {
        self.faces.clone()
    }

    /// Returns the fan-triangulated index buffer as a Uint32Array.
    pub fn triangle_indices(&self) -> Vec<u32> {
        self.triangles.clone()
    }

    /// Serializes validity, counts and buffers as JSON.
    ///
    /// # Errors
    /// Returns a JavaScript error if serialization fails.
    pub fn to_json(&self) -> Result<String, JsValue> {
        self.to_json_internal()
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Consumes the handle and frees its buffers.
    pub fn release(self) {}
}

impl PolyhedronHandle {
    /// Wraps exported buffers of a valid build.
    pub fn from_buffers(buffers: PolyhedronBuffers, triangles: Vec<u32>) -> Self {
        Self {
            valid: true,
            error: None,
            coords: buffers.coords,
            faces: buffers.faces.into_iter().map(|i| i as u32).collect(),
            triangles,
            vertex_count: buffers.vertex_count,
            face_count: buffers.face_count,
        }
    }

    /// Empty handle for a failed build.
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
            coords: Vec::new(),
            faces: Vec::new(),
            triangles: Vec::new(),
            vertex_count: 0,
            face_count: 0,
        }
    }

    /// JSON form usable without a JavaScript host.
    pub fn to_json_internal(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
