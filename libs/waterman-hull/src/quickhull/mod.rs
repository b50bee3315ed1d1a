//! # QuickHull
//!
//! Incremental 3D convex hull with coplanar face merging.
//!
//! ## Algorithm
//!
//! 1. Find the extreme point on each axis and derive the distance tolerance
//! 2. Build an initial tetrahedron and hand every other point to the face it
//!    is farthest above
//! 3. While a face owns outside points:
//!    - take its farthest point as the eye
//!    - delete every face the eye sees and collect the horizon
//!    - close the hole with a cone of triangles to the eye
//!    - merge faces that are not clearly convex (larger face first, then
//!      either face)
//!    - reassign the orphaned points to the new faces
//! 4. Renumber the surviving vertices in input order and self-check
//!
//! ## References
//!
//! - [QuickHull Paper](https://www.cise.ufl.edu/~ungor/courses/fall06/papers/QuickHull.pdf)
//! - [Wikipedia: Quickhull](https://en.wikipedia.org/wiki/Quickhull)

mod arena;
mod merge;
mod verify;


use std::collections::VecDeque;

use config::constants::{
    automatic_tolerance, CHECK_TOLERANCE_FACTOR, CLAIM_EARLY_EXIT_FACTOR, DOUBLE_PRECISION,
    MIN_HULL_POINTS, SIMPLEX_TOLERANCE_FACTOR, SMALL_FACE_AREA_FACTOR, STACKER_RED_ZONE_BYTES,
    STACKER_STACK_SIZE_BYTES,
};
use glam::DVec3;
use log::{debug, trace, warn};

use self::arena::{Arena, FaceId, FaceMark, HalfEdgeId, VertexId};
use crate::config::HullConfig;
use crate::error::{HullError, HullResult};
use crate::polyhedron::Polyhedron;

// =============================================================================
// PUBLIC API
// =============================================================================

/// Convex hull builder.
///
/// ## Example
///
/// ```rust
/// use glam::DVec3;
/// use waterman_hull::QuickHull;
///
/// let points = [
///     DVec3::new(0.0, 0.0, 0.0),
///     DVec3::new(1.0, 0.0, 0.0),
///     DVec3::new(0.0, 1.0, 0.0),
///     DVec3::new(0.0, 0.0, 1.0),
///     DVec3::new(0.2, 0.2, 0.2),
/// ];
/// let hull = QuickHull::new().build(&points).unwrap();
/// assert_eq!(hull.num_vertices(), 4);
/// assert_eq!(hull.num_faces(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct QuickHull {
    config: HullConfig,
}

impl QuickHull {
    /// Builder with an automatic distance tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder using the given configuration.
    pub fn with_config(config: HullConfig) -> Self {
        Self { config }
    }

    /// The configuration this builder was created with.
    pub fn config(&self) -> &HullConfig {
        &self.config
    }

    /// Computes the convex hull of `points`.
    ///
    /// ## Errors
    ///
    /// - [`HullError::DegenerateCloud`] for fewer than four points, non-finite
    ///   coordinates, or points that are coincident, collinear or coplanar
    /// - [`HullError::NumericalInconsistency`] when the finished hull fails
    ///   its self-check
    pub fn build(&self, points: &[DVec3]) -> HullResult<Polyhedron> {
        if points.len() < MIN_HULL_POINTS {
            warn!("hull needs at least {MIN_HULL_POINTS} points, got {}", points.len());
            return Err(HullError::degenerate(format!(
                "{} points, at least {MIN_HULL_POINTS} required",
                points.len()
            )));
        }
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(HullError::degenerate(format!("point {i} is not finite")));
        }

        let mut builder = Builder::new(points, &self.config);
        builder.create_initial_simplex().map_err(|err| {
            warn!("{err}");
            err
        })?;

        let mut iterations = 0usize;
        while let Some(eye) = builder.next_point_to_add() {
            builder.add_point_to_hull(eye)?;
            iterations += 1;
        }
        debug!(
            "hull of {} points built in {iterations} iterations (tolerance {:e})",
            points.len(),
            builder.tolerance
        );

        let check_tol = CHECK_TOLERANCE_FACTOR * builder.tolerance;
        builder.arena.check_faces(check_tol)?;
        let polyhedron = builder.into_polyhedron();
        polyhedron.check(points, check_tol)?;
        Ok(polyhedron)
    }
}

// =============================================================================
// BUILD STATE
// =============================================================================

/// How strictly a face pair must be convex to escape a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergeRule {
    /// Judged from the larger face only; otherwise the face is marked for
    /// the second pass.
    LargerFace,
    /// Merge unless clearly convex with respect to both faces.
    EitherFace,
}

/// Extreme vertices along each axis.
struct Extremes {
    max: [VertexId; 3],
    min: [VertexId; 3],
}

struct Builder {
    arena: Arena,
    extremes: Extremes,
    tolerance: f64,
    min_area: f64,
    /// Faces whose outside list went from empty to non-empty, oldest first.
    claimed: VecDeque<FaceId>,
    unclaimed: Vec<VertexId>,
}

impl Builder {
    fn new(points: &[DVec3], config: &HullConfig) -> Self {
        let arena = Arena::new(points);

        let mut max_pt = points[0];
        let mut min_pt = points[0];
        let mut extremes = Extremes {
            max: [VertexId(0); 3],
            min: [VertexId(0); 3],
        };
        for (i, p) in points.iter().enumerate().skip(1) {
            for axis in 0..3 {
                if p[axis] > max_pt[axis] {
                    max_pt[axis] = p[axis];
                    extremes.max[axis] = VertexId(i);
                } else if p[axis] < min_pt[axis] {
                    min_pt[axis] = p[axis];
                    extremes.min[axis] = VertexId(i);
                }
            }
        }

        let char_length = (max_pt - min_pt).max_element();
        let abs_max = max_pt.abs().max(min_pt.abs());
        let tolerance = config
            .distance_tolerance
            .unwrap_or_else(|| automatic_tolerance(abs_max.x, abs_max.y, abs_max.z));

        Self {
            arena,
            extremes,
            tolerance,
            min_area: SMALL_FACE_AREA_FACTOR * char_length * DOUBLE_PRECISION,
            claimed: VecDeque::new(),
            unclaimed: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Outside sets
    // -------------------------------------------------------------------------

    fn add_point_to_face(&mut self, v: VertexId, f: FaceId) {
        self.arena.vertices[v.0].face = Some(f);
        let outside = &mut self.arena.face_mut(f).outside;
        if outside.is_empty() {
            self.claimed.push_back(f);
        }
        outside.push(v);
    }

    fn remove_point_from_face(&mut self, v: VertexId, f: FaceId) {
        let outside = &mut self.arena.face_mut(f).outside;
        if let Some(pos) = outside.iter().position(|&x| x == v) {
            outside.remove(pos);
        }
        self.arena.vertices[v.0].face = None;
    }

    /// Releases the outside points of `f`, handing those above
    /// `absorbing` to it and leaving the rest unclaimed.
    fn delete_face_points(&mut self, f: FaceId, absorbing: Option<FaceId>) {
        let points = std::mem::take(&mut self.arena.face_mut(f).outside);
        for v in points {
            self.arena.vertices[v.0].face = None;
            match absorbing {
                Some(target) if self.arena.distance_to_plane(target, self.arena.point(v)) > self.tolerance => {
                    self.add_point_to_face(v, target);
                }
                _ => self.unclaimed.push(v),
            }
        }
    }

    // -------------------------------------------------------------------------
    // Initial simplex
    // -------------------------------------------------------------------------

    fn create_initial_simplex(&mut self) -> HullResult<()> {
        let tol = self.tolerance;
        let point = |v: VertexId| self.arena.point(v);

        let mut max = 0.0;
        let mut imax = 0;
        for axis in 0..3 {
            let diff = point(self.extremes.max[axis])[axis] - point(self.extremes.min[axis])[axis];
            if diff > max {
                max = diff;
                imax = axis;
            }
        }
        if max <= tol {
            return Err(HullError::degenerate("input points appear to be coincident"));
        }

        // widest one-axis separation
        let v0 = self.extremes.max[imax];
        let v1 = self.extremes.min[imax];

        // farthest from the line v0 v1
        let p0 = point(v0);
        let u01 = (point(v1) - p0).normalize();
        let mut max_sqr = 0.0;
        let mut third = None;
        for (i, vertex) in self.arena.vertices.iter().enumerate() {
            let xprod = u01.cross(vertex.point - p0);
            let len_sqr = xprod.length_squared();
            if len_sqr > max_sqr && i != v0.0 && i != v1.0 {
                max_sqr = len_sqr;
                third = Some((VertexId(i), xprod));
            }
        }
        let (v2, normal) = match third {
            Some((v2, xprod)) if max_sqr.sqrt() > SIMPLEX_TOLERANCE_FACTOR * tol => (v2, xprod.normalize()),
            _ => return Err(HullError::degenerate("input points appear to be collinear")),
        };

        // farthest from the plane through v0 v1 v2
        let d0 = point(v2).dot(normal);
        let mut max_dist = 0.0;
        let mut fourth = None;
        for (i, vertex) in self.arena.vertices.iter().enumerate() {
            let dist = (vertex.point.dot(normal) - d0).abs();
            if dist > max_dist && i != v0.0 && i != v1.0 && i != v2.0 {
                max_dist = dist;
                fourth = Some(VertexId(i));
            }
        }
        let v3 = match fourth {
            Some(v3) if max_dist > SIMPLEX_TOLERANCE_FACTOR * tol => v3,
            _ => return Err(HullError::degenerate("input points appear to be coplanar")),
        };
        trace!("initial simplex {} {} {} {}", v0.0, v1.0, v2.0, v3.0);

        let min_area = self.min_area;
        let below = point(v3).dot(normal) - d0 < 0.0;
        let arena = &mut self.arena;
        let tris = if below {
            let tris = [
                arena.create_triangle(v0, v1, v2, min_area),
                arena.create_triangle(v3, v1, v0, min_area),
                arena.create_triangle(v3, v2, v1, min_area),
                arena.create_triangle(v3, v0, v2, min_area),
            ];
            for i in 0..3 {
                let k = (i + 1) % 3;
                let (a, b) = (arena.edge_at(tris[i + 1], 1), arena.edge_at(tris[k + 1], 0));
                arena.set_opposite(a, b);
                let (a, b) = (arena.edge_at(tris[i + 1], 2), arena.edge_at(tris[0], k as isize));
                arena.set_opposite(a, b);
            }
            tris
        } else {
            let tris = [
                arena.create_triangle(v0, v2, v1, min_area),
                arena.create_triangle(v3, v0, v1, min_area),
                arena.create_triangle(v3, v1, v2, min_area),
                arena.create_triangle(v3, v2, v0, min_area),
            ];
            for i in 0..3 {
                let k = (i + 1) % 3;
                let (a, b) = (arena.edge_at(tris[i + 1], 0), arena.edge_at(tris[k + 1], 1));
                arena.set_opposite(a, b);
                let (a, b) = (arena.edge_at(tris[i + 1], 2), arena.edge_at(tris[0], ((3 - i) % 3) as isize));
                arena.set_opposite(a, b);
            }
            tris
        };

        for i in 0..self.arena.vertices.len() {
            let v = VertexId(i);
            if v == v0 || v == v1 || v == v2 || v == v3 {
                continue;
            }
            let p = self.arena.point(v);
            let mut max_dist = tol;
            let mut max_face = None;
            for &f in &tris {
                let dist = self.arena.distance_to_plane(f, p);
                if dist > max_dist {
                    max_dist = dist;
                    max_face = Some(f);
                }
            }
            if let Some(f) = max_face {
                self.add_point_to_face(v, f);
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Main loop
    // -------------------------------------------------------------------------

    /// Farthest outside point of the oldest face that still owns any.
    fn next_point_to_add(&mut self) -> Option<VertexId> {
        while let Some(&f) = self.claimed.front() {
            let face = self.arena.face(f);
            if face.mark == FaceMark::Deleted || face.outside.is_empty() {
                self.claimed.pop_front();
                continue;
            }
            let mut eye = None;
            let mut max_dist = 0.0;
            for &v in &face.outside {
                let dist = self.arena.distance_to_plane(f, self.arena.point(v));
                if dist > max_dist {
                    max_dist = dist;
                    eye = Some(v);
                }
            }
            return eye;
        }
        None
    }

    fn add_point_to_hull(&mut self, eye: VertexId) -> HullResult<()> {
        self.unclaimed.clear();

        let eye_face = self.arena.vertices[eye.0]
            .face
            .ok_or_else(|| HullError::inconsistent(format!("eye point {} has no face", eye.0)))?;
        self.remove_point_from_face(eye, eye_face);

        let eye_point = self.arena.point(eye);
        let mut horizon = Vec::new();
        self.calculate_horizon(eye_point, None, eye_face, &mut horizon)?;
        trace!("eye {} sees a horizon of {} edges", eye.0, horizon.len());

        let new_faces = self.add_new_faces(eye, &horizon)?;

        for &f in &new_faces {
            if self.arena.face(f).mark == FaceMark::Visible {
                while self.do_adjacent_merge(f, MergeRule::LargerFace)? {}
            }
        }
        for &f in &new_faces {
            if self.arena.face(f).mark == FaceMark::NonConvex {
                self.arena.face_mut(f).mark = FaceMark::Visible;
                while self.do_adjacent_merge(f, MergeRule::EitherFace)? {}
            }
        }

        self.resolve_unclaimed_points(&new_faces);
        Ok(())
    }

    /// Deletes `f` and every face visible from `eye` reachable from it,
    /// collecting the boundary of the visible region in loop order.
    ///
    /// `crossed` is the edge of `f` the search entered through.
    fn calculate_horizon(
        &mut self,
        eye: DVec3,
        crossed: Option<HalfEdgeId>,
        f: FaceId,
        horizon: &mut Vec<HalfEdgeId>,
    ) -> HullResult<()> {
        stacker::maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            self.delete_face_points(f, None);
            self.arena.face_mut(f).mark = FaceMark::Deleted;

            let edges = match crossed {
                None => self.arena.face_edges(f),
                Some(entry) => {
                    let mut edges = self.arena.loop_from(self.arena.next(entry));
                    edges.pop();
                    edges
                }
            };

            for edge in edges {
                let opp = self.arena.opposite_face(edge)?;
                if self.arena.face(opp).mark != FaceMark::Visible {
                    continue;
                }
                if self.arena.distance_to_plane(opp, eye) > self.tolerance {
                    let twin = self.arena.opposite(edge)?;
                    self.calculate_horizon(eye, Some(twin), opp, horizon)?;
                } else {
                    horizon.push(edge);
                }
            }
            Ok(())
        })
    }

    /// Closes the hole left by the visible faces with one triangle per
    /// horizon edge, all meeting at `eye`.
    fn add_new_faces(&mut self, eye: VertexId, horizon: &[HalfEdgeId]) -> HullResult<Vec<FaceId>> {
        let mut new_faces = Vec::with_capacity(horizon.len());
        let mut first_side = None;
        let mut prev_side: Option<HalfEdgeId> = None;

        for &he in horizon {
            let (tail, head) = (self.arena.tail(he), self.arena.head(he));
            let f = self.arena.create_triangle(eye, tail, head, self.min_area);

            let outer = self.arena.opposite(he)?;
            let base = self.arena.edge_at(f, -1);
            self.arena.set_opposite(base, outer);

            let side = self.arena.face(f).he0;
            match prev_side {
                Some(prev) => {
                    let next = self.arena.next(side);
                    self.arena.set_opposite(next, prev);
                }
                None => first_side = Some(side),
            }
            new_faces.push(f);
            prev_side = Some(side);
        }

        match (first_side, prev_side) {
            (Some(first), Some(last)) => {
                let next = self.arena.next(first);
                self.arena.set_opposite(next, last);
                Ok(new_faces)
            }
            _ => Err(HullError::inconsistent(format!("eye point {} has an empty horizon", eye.0))),
        }
    }

    /// Merges `face` with the first neighbour `rule` rejects as convex.
    /// Returns whether a merge happened.
    fn do_adjacent_merge(&mut self, face: FaceId, rule: MergeRule) -> HullResult<bool> {
        let tol = self.tolerance;
        let mut convex = true;

        for hedge in self.arena.face_edges(face) {
            let twin = self.arena.opposite(hedge)?;
            let across = self.arena.opp_face_distance(hedge)?;
            let back = self.arena.opp_face_distance(twin)?;

            let merge = match rule {
                MergeRule::EitherFace => across > -tol || back > -tol,
                MergeRule::LargerFace => {
                    let opp_face = self.arena.opposite_face(hedge)?;
                    let (larger, smaller) = if self.arena.face(face).area > self.arena.face(opp_face).area {
                        (across, back)
                    } else {
                        (back, across)
                    };
                    if larger > -tol {
                        true
                    } else {
                        if smaller > -tol {
                            convex = false;
                        }
                        false
                    }
                }
            };

            if merge {
                let discarded = self.arena.merge_adjacent_face(face, hedge, self.min_area)?;
                trace!("face {} absorbed {:?}", face.0, discarded);
                for f in discarded {
                    self.delete_face_points(f, Some(face));
                }
                return Ok(true);
            }
        }

        if !convex {
            self.arena.face_mut(face).mark = FaceMark::NonConvex;
        }
        Ok(false)
    }

    /// Hands each orphaned point to the new face it is farthest above.
    /// Points above none of them are inside the hull and dropped.
    fn resolve_unclaimed_points(&mut self, new_faces: &[FaceId]) {
        let early_exit = CLAIM_EARLY_EXIT_FACTOR * self.tolerance;
        for v in std::mem::take(&mut self.unclaimed) {
            let p = self.arena.point(v);
            let mut max_dist = self.tolerance;
            let mut max_face = None;
            for &f in new_faces {
                if self.arena.face(f).mark != FaceMark::Visible {
                    continue;
                }
                let dist = self.arena.distance_to_plane(f, p);
                if dist > max_dist {
                    max_dist = dist;
                    max_face = Some(f);
                }
                if max_dist > early_exit {
                    break;
                }
            }
            if let Some(f) = max_face {
                self.add_point_to_face(v, f);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Extraction
    // -------------------------------------------------------------------------

    /// Keeps the live faces and renumbers their vertices in input order.
    fn into_polyhedron(self) -> Polyhedron {
        let faces: Vec<Vec<VertexId>> = self
            .arena
            .live_faces()
            .map(|f| self.arena.face_vertices(f))
            .collect();

        let mut new_index = vec![None; self.arena.vertices.len()];
        for &v in faces.iter().flatten() {
            new_index[v.0] = Some(0);
        }

        let mut vertex_point_indices = Vec::new();
        for (i, slot) in new_index.iter_mut().enumerate() {
            if slot.is_some() {
                *slot = Some(vertex_point_indices.len());
                vertex_point_indices.push(i);
            }
        }

        let vertices = vertex_point_indices
            .iter()
            .map(|&i| self.arena.vertices[i].point)
            .collect();
        let faces = faces
            .into_iter()
            .map(|face| face.into_iter().filter_map(|v| new_index[v.0]).collect())
            .collect();

        Polyhedron::from_parts(vertices, faces, vertex_point_indices, self.tolerance)
    }
}
