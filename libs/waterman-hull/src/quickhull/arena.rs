//! Index-based half-edge storage for the hull under construction.
//!
//! Faces, half-edges and vertices live in flat vectors and refer to each
//! other by id. Nothing is ever removed while a hull is being built; faces
//! that leave the hull are marked [`FaceMark::Deleted`] and dropped when the
//! result is extracted.

use glam::DVec3;

use crate::error::{HullError, HullResult};

/// Index of an input point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

/// Index of a half-edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HalfEdgeId(pub usize);

/// Index of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub usize);

/// Input point plus the face currently claiming it.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub point: DVec3,
    pub face: Option<FaceId>,
}

/// Directed edge ending at `head`; its tail is the head of `prev`.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    pub head: VertexId,
    pub face: FaceId,
    pub next: HalfEdgeId,
    pub prev: HalfEdgeId,
    pub opposite: Option<HalfEdgeId>,
}

/// Lifecycle of a face during construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceMark {
    Visible,
    NonConvex,
    Deleted,
}

/// Convex polygon of the hull with its cached plane.
#[derive(Debug, Clone)]
pub struct Face {
    pub he0: HalfEdgeId,
    pub normal: DVec3,
    pub centroid: DVec3,
    /// Length of the unnormalised fan normal (twice the polygon area).
    pub area: f64,
    pub plane_offset: f64,
    pub num_verts: usize,
    pub mark: FaceMark,
    /// Points above this face, waiting to be added.
    pub outside: Vec<VertexId>,
}

#[derive(Debug, Default)]
pub struct Arena {
    pub vertices: Vec<Vertex>,
    pub half_edges: Vec<HalfEdge>,
    pub faces: Vec<Face>,
}

impl Arena {
    pub fn new(points: &[DVec3]) -> Self {
        Self {
            vertices: points
                .iter()
                .map(|&point| Vertex { point, face: None })
                .collect(),
            half_edges: Vec::with_capacity(points.len() * 6),
            faces: Vec::with_capacity(points.len() * 2),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn point(&self, v: VertexId) -> DVec3 {
        self.vertices[v.0].point
    }

    #[inline]
    pub fn he(&self, h: HalfEdgeId) -> &HalfEdge {
        &self.half_edges[h.0]
    }

    #[inline]
    pub fn he_mut(&mut self, h: HalfEdgeId) -> &mut HalfEdge {
        &mut self.half_edges[h.0]
    }

    #[inline]
    pub fn face(&self, f: FaceId) -> &Face {
        &self.faces[f.0]
    }

    #[inline]
    pub fn face_mut(&mut self, f: FaceId) -> &mut Face {
        &mut self.faces[f.0]
    }

    #[inline]
    pub fn head(&self, h: HalfEdgeId) -> VertexId {
        self.he(h).head
    }

    #[inline]
    pub fn tail(&self, h: HalfEdgeId) -> VertexId {
        self.head(self.he(h).prev)
    }

    #[inline]
    pub fn next(&self, h: HalfEdgeId) -> HalfEdgeId {
        self.he(h).next
    }

    #[inline]
    pub fn prev(&self, h: HalfEdgeId) -> HalfEdgeId {
        self.he(h).prev
    }

    /// Twin of `h`. Every half-edge of a closed hull has one; an unpaired
    /// edge means the mesh was torn.
    #[inline]
    pub fn opposite(&self, h: HalfEdgeId) -> HullResult<HalfEdgeId> {
        self.he(h)
            .opposite
            .ok_or_else(|| HullError::inconsistent(format!("half-edge {} has no twin", h.0)))
    }

    #[inline]
    pub fn opposite_face(&self, h: HalfEdgeId) -> HullResult<FaceId> {
        Ok(self.he(self.opposite(h)?).face)
    }

    pub fn set_opposite(&mut self, a: HalfEdgeId, b: HalfEdgeId) {
        self.he_mut(a).opposite = Some(b);
        self.he_mut(b).opposite = Some(a);
    }

    pub fn live_faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len())
            .map(FaceId)
            .filter(move |&f| self.face(f).mark == FaceMark::Visible)
    }

    /// Half-edges of the loop starting at `start`, in `next` order.
    pub fn loop_from(&self, start: HalfEdgeId) -> Vec<HalfEdgeId> {
        let mut edges = vec![start];
        let mut he = self.next(start);
        while he != start {
            edges.push(he);
            he = self.next(he);
        }
        edges
    }

    pub fn face_edges(&self, f: FaceId) -> Vec<HalfEdgeId> {
        self.loop_from(self.face(f).he0)
    }

    /// The `i`-th half-edge from `he0`, walking backwards for negative `i`.
    pub fn edge_at(&self, f: FaceId, i: isize) -> HalfEdgeId {
        let mut he = self.face(f).he0;
        if i >= 0 {
            for _ in 0..i {
                he = self.next(he);
            }
        } else {
            for _ in 0..(-i) {
                he = self.prev(he);
            }
        }
        he
    }

    // -------------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------------

    #[inline]
    pub fn distance_to_plane(&self, f: FaceId, p: DVec3) -> f64 {
        let face = self.face(f);
        face.normal.dot(p) - face.plane_offset
    }

    /// Distance from the plane of `h`'s face to the centroid of the face on
    /// the other side of `h`. Negative when the edge is convex.
    pub fn opp_face_distance(&self, h: HalfEdgeId) -> HullResult<f64> {
        let centroid = self.face(self.opposite_face(h)?).centroid;
        Ok(self.distance_to_plane(self.he(h).face, centroid))
    }

    pub fn length_squared(&self, h: HalfEdgeId) -> f64 {
        (self.point(self.head(h)) - self.point(self.tail(h))).length_squared()
    }

    /// Creates a triangle `v0, v1, v2` (counter-clockwise seen from the
    /// front). Edge `i` ends at `v_i`.
    pub fn create_triangle(&mut self, v0: VertexId, v1: VertexId, v2: VertexId, min_area: f64) -> FaceId {
        let f = FaceId(self.faces.len());
        let base = self.half_edges.len();
        let ids = [HalfEdgeId(base), HalfEdgeId(base + 1), HalfEdgeId(base + 2)];

        for (i, head) in [v0, v1, v2].into_iter().enumerate() {
            self.half_edges.push(HalfEdge {
                head,
                face: f,
                next: ids[(i + 1) % 3],
                prev: ids[(i + 2) % 3],
                opposite: None,
            });
        }

        self.faces.push(Face {
            he0: ids[0],
            normal: DVec3::ZERO,
            centroid: DVec3::ZERO,
            area: 0.0,
            plane_offset: 0.0,
            num_verts: 3,
            mark: FaceMark::Visible,
            outside: Vec::new(),
        });
        self.compute_normal_and_centroid(f, min_area);
        f
    }

    /// Recomputes normal, area, vertex count, centroid and plane offset.
    ///
    /// Faces whose area falls below `min_area` get their normal projected
    /// off the longest edge, which is the direction a sliver's fan normal
    /// is least reliable in.
    pub fn compute_normal_and_centroid(&mut self, f: FaceId, min_area: f64) {
        let edges = self.face_edges(f);
        if edges.len() < 3 {
            // collapsed loop; left for the consistency check to report
            self.face_mut(f).num_verts = edges.len();
            return;
        }
        let p0 = self.point(self.head(edges[0]));

        let mut normal = DVec3::ZERO;
        let mut d2 = self.point(self.head(edges[1])) - p0;
        for &he in &edges[2..] {
            let d1 = d2;
            d2 = self.point(self.head(he)) - p0;
            normal += d1.cross(d2);
        }
        let area = normal.length();
        let mut normal = normal / area;

        if area < min_area {
            let longest = edges
                .iter()
                .copied()
                .max_by(|&a, &b| self.length_squared(a).total_cmp(&self.length_squared(b)))
                .unwrap_or(edges[0]);
            let u = (self.point(self.head(longest)) - self.point(self.tail(longest))).normalize();
            normal = (normal - normal.dot(u) * u).normalize();
        }

        let centroid = edges
            .iter()
            .map(|&he| self.point(self.head(he)))
            .sum::<DVec3>()
            / edges.len() as f64;

        let face = self.face_mut(f);
        face.normal = normal;
        face.area = area;
        face.num_verts = edges.len();
        face.centroid = centroid;
        face.plane_offset = normal.dot(centroid);
    }

    /// Vertex ids of a face in loop order.
    pub fn face_vertices(&self, f: FaceId) -> Vec<VertexId> {
        self.face_edges(f).into_iter().map(|he| self.head(he)).collect()
    }
}
