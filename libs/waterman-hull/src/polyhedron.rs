//! # Polyhedron
//!
//! Read-only result of a hull build: the hull vertices and their polygon
//! faces.
//!
//! ## Invariants
//!
//! - Every vertex is referenced by at least one face
//! - Every face has at least three in-bounds indices, counter-clockwise seen
//!   from outside
//! - Every undirected edge is used by exactly two faces, once per direction
//! - V − E + F = 2

use std::collections::{BTreeSet, HashSet};

use config::constants::CHECK_TOLERANCE_FACTOR;
use glam::DVec3;
use serde::Serialize;

use crate::error::{HullError, HullResult};

/// Convex polyhedron with polygon faces.
///
/// ## Example
///
/// ```rust
/// use waterman_hull::waterman_polyhedron;
///
/// let octahedron = waterman_polyhedron(2.0).unwrap();
/// assert_eq!(octahedron.num_vertices(), 6);
/// assert_eq!(octahedron.num_faces(), 8);
/// assert_eq!(octahedron.edges().len(), 12);
/// assert!(octahedron.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyhedron {
    vertices: Vec<DVec3>,
    faces: Vec<Vec<usize>>,
    vertex_point_indices: Vec<usize>,
    distance_tolerance: f64,
}

/// Output conventions for [`Polyhedron::faces_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceIndexing {
    /// Reverse every face so it reads clockwise from outside.
    pub clockwise: bool,
    /// Add one to every index.
    pub one_based: bool,
    /// Index into the input cloud instead of the hull vertices.
    pub point_relative: bool,
}

impl Polyhedron {
    pub(crate) fn from_parts(
        vertices: Vec<DVec3>,
        faces: Vec<Vec<usize>>,
        vertex_point_indices: Vec<usize>,
        distance_tolerance: f64,
    ) -> Self {
        Self {
            vertices,
            faces,
            vertex_point_indices,
            distance_tolerance,
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Hull vertices in input order.
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Faces as counter-clockwise index loops into [`Self::vertices`].
    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// For each hull vertex, its index in the input cloud.
    pub fn vertex_point_indices(&self) -> &[usize] {
        &self.vertex_point_indices
    }

    /// Distance tolerance the hull was built with.
    pub fn distance_tolerance(&self) -> f64 {
        self.distance_tolerance
    }

    // =========================================================================
    // DERIVED VIEWS
    // =========================================================================

    /// Unique undirected edges as `(i, j)` with `i < j`, sorted.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges = BTreeSet::new();
        for face in &self.faces {
            for (a, b) in face_edges(face) {
                edges.insert((a.min(b), a.max(b)));
            }
        }
        edges.into_iter().collect()
    }

    /// Faces resolved to coordinate loops.
    pub fn face_polygons(&self) -> Vec<Vec<DVec3>> {
        self.faces
            .iter()
            .map(|face| face.iter().map(|&i| self.vertices[i]).collect())
            .collect()
    }

    /// Fan triangulation of every face, keeping the winding.
    ///
    /// ```rust
    /// use waterman_hull::waterman_polyhedron;
    ///
    /// let cuboctahedron = waterman_polyhedron(1.5).unwrap();
    /// // 8 triangles plus 6 squares split in two
    /// assert_eq!(cuboctahedron.triangles().len(), 20);
    /// ```
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        self.faces
            .iter()
            .flat_map(|face| (1..face.len().saturating_sub(1)).map(move |k| [face[0], face[k], face[k + 1]]))
            .collect()
    }

    /// Face lists rewritten according to `indexing`.
    pub fn faces_with(&self, indexing: FaceIndexing) -> Vec<Vec<usize>> {
        self.faces
            .iter()
            .map(|face| {
                let mut out: Vec<usize> = face
                    .iter()
                    .map(|&i| {
                        let idx = if indexing.point_relative {
                            self.vertex_point_indices[i]
                        } else {
                            i
                        };
                        if indexing.one_based {
                            idx + 1
                        } else {
                            idx
                        }
                    })
                    .collect();
                if indexing.clockwise {
                    // keep the first vertex in place
                    out[1..].reverse();
                }
                out
            })
            .collect()
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    /// Checks the hull against its own vertices at the default check
    /// tolerance.
    pub fn is_valid(&self) -> bool {
        self.check(&self.vertices, CHECK_TOLERANCE_FACTOR * self.distance_tolerance)
            .is_ok()
    }

    /// Verifies the topology of the hull and that no point of `points` lies
    /// more than `tolerance` outside any face.
    ///
    /// ## Errors
    ///
    /// [`HullError::NumericalInconsistency`] describing the first violation.
    pub fn check(&self, points: &[DVec3], tolerance: f64) -> HullResult<()> {
        let n = self.vertices.len();
        if self.vertex_point_indices.len() != n {
            return Err(HullError::inconsistent("vertex index map does not match vertex count"));
        }

        let mut referenced = vec![false; n];
        let mut directed = HashSet::new();
        for (f, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(HullError::inconsistent(format!("face {f} has {} vertices", face.len())));
            }
            for &i in face {
                if i >= n {
                    return Err(HullError::inconsistent(format!("face {f} references vertex {i} of {n}")));
                }
                referenced[i] = true;
            }
            for edge in face_edges(face) {
                if !directed.insert(edge) {
                    return Err(HullError::inconsistent(format!(
                        "edge {} -> {} used twice in the same direction",
                        edge.0, edge.1
                    )));
                }
            }
        }
        if let Some(i) = referenced.iter().position(|r| !r) {
            return Err(HullError::inconsistent(format!("vertex {i} is not on any face")));
        }
        if let Some(&(a, b)) = directed.iter().find(|&&(a, b)| !directed.contains(&(b, a))) {
            return Err(HullError::inconsistent(format!("edge {a} -> {b} has no twin")));
        }

        let euler = n as i64 - (directed.len() / 2) as i64 + self.faces.len() as i64;
        if euler != 2 {
            return Err(HullError::inconsistent(format!("Euler characteristic is {euler}")));
        }

        for (f, face) in self.faces.iter().enumerate() {
            let (normal, centroid) = self.newell_plane(face).ok_or_else(|| {
                HullError::inconsistent(format!("face {f} has zero area"))
            })?;
            for &i in face {
                let off = normal.dot(self.vertices[i] - centroid).abs();
                if off > tolerance {
                    return Err(HullError::inconsistent(format!("face {f} is not planar ({off:e})")));
                }
            }
            for (i, &p) in points.iter().enumerate() {
                let dist = normal.dot(p - centroid);
                if dist > tolerance {
                    return Err(HullError::inconsistent(format!(
                        "point {i} is {dist:e} outside face {f}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Unit normal and centroid of a face.
    fn newell_plane(&self, face: &[usize]) -> Option<(DVec3, DVec3)> {
        let centroid = face.iter().map(|&i| self.vertices[i]).sum::<DVec3>() / face.len() as f64;
        let normal = face_edges(face)
            .map(|(a, b)| (self.vertices[a] - centroid).cross(self.vertices[b] - centroid))
            .sum::<DVec3>();
        normal.try_normalize().map(|n| (n, centroid))
    }
}

/// Directed edges of a face loop, closing back to the first vertex.
fn face_edges(face: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    face.iter()
        .zip(face.iter().cycle().skip(1))
        .map(|(&a, &b)| (a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> Polyhedron {
        Polyhedron::from_parts(
            vec![
                DVec3::ZERO,
                DVec3::X,
                DVec3::Y,
                DVec3::Z,
            ],
            vec![vec![0, 2, 1], vec![0, 1, 3], vec![1, 2, 3], vec![0, 3, 2]],
            vec![0, 1, 2, 3],
            1e-12,
        )
    }

    #[test]
    fn test_tetrahedron_is_valid() {
        let tet = tetrahedron();
        assert!(tet.is_valid());
        assert_eq!(tet.edges().len(), 6);
    }

    #[test]
    fn test_point_outside_fails_check() {
        let tet = tetrahedron();
        let outside = [DVec3::new(1.0, 1.0, 1.0)];
        let err = tet.check(&outside, 1e-9).unwrap_err();
        assert!(err.to_string().contains("outside"));
    }

    #[test]
    fn test_inverted_face_fails_check() {
        let mut tet = tetrahedron();
        tet.faces[0] = vec![0, 1, 2];
        assert!(!tet.is_valid());
    }

    #[test]
    fn test_unreferenced_vertex_fails_check() {
        let mut tet = tetrahedron();
        tet.vertices.push(DVec3::splat(0.1));
        tet.vertex_point_indices.push(4);
        let err = tet.check(&[], 1e-9).unwrap_err();
        assert!(err.to_string().contains("not on any face"));
    }

    #[test]
    fn test_triangles_fan_each_face() {
        let square_pyramid = Polyhedron::from_parts(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(1.0, 1.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
                DVec3::new(0.5, 0.5, 1.0),
            ],
            vec![
                vec![0, 3, 2, 1],
                vec![0, 1, 4],
                vec![1, 2, 4],
                vec![2, 3, 4],
                vec![3, 0, 4],
            ],
            vec![0, 1, 2, 3, 4],
            1e-12,
        );
        assert!(square_pyramid.is_valid());
        let tris = square_pyramid.triangles();
        assert_eq!(tris.len(), 6);
        assert_eq!(tris[0], [0, 3, 2]);
        assert_eq!(tris[1], [0, 2, 1]);
    }

    #[test]
    fn test_faces_with_flags() {
        let mut tet = tetrahedron();
        tet.vertex_point_indices = vec![10, 11, 12, 13];

        let cw = tet.faces_with(FaceIndexing {
            clockwise: true,
            ..Default::default()
        });
        assert_eq!(cw[0], vec![0, 1, 2]);

        let one = tet.faces_with(FaceIndexing {
            one_based: true,
            ..Default::default()
        });
        assert_eq!(one[0], vec![1, 3, 2]);

        let rel = tet.faces_with(FaceIndexing {
            point_relative: true,
            one_based: true,
            clockwise: false,
        });
        assert_eq!(rel[1], vec![11, 12, 14]);
    }

    #[test]
    fn test_serializes_vertices_as_arrays() {
        let json = serde_json::to_value(tetrahedron()).unwrap();
        assert_eq!(json["vertices"][1], serde_json::json!([1.0, 0.0, 0.0]));
        assert_eq!(json["faces"][0], serde_json::json!([0, 2, 1]));
    }
}
