//! Half-edge level self-check run on a finished hull.

use super::arena::{Arena, FaceId, FaceMark};
use crate::error::{HullError, HullResult};

impl Arena {
    /// Verifies that a live face is a closed loop of at least three edges,
    /// every edge has a reciprocal twin on a live face, and the face is
    /// convex with respect to each neighbour within `tol`.
    pub fn check_face(&self, f: FaceId, tol: f64) -> HullResult<()> {
        let edges = self.face_edges(f);
        let face = self.face(f);

        if edges.len() < 3 {
            return Err(HullError::inconsistent(format!("face {} has {} vertices", f.0, edges.len())));
        }
        if edges.len() != face.num_verts {
            return Err(HullError::inconsistent(format!(
                "face {} caches {} vertices but loops over {}",
                f.0,
                face.num_verts,
                edges.len()
            )));
        }

        for &he in &edges {
            if self.he(he).face != f {
                return Err(HullError::inconsistent(format!("half-edge {} left behind on face {}", he.0, f.0)));
            }
            let Some(twin) = self.he(he).opposite else {
                return Err(HullError::inconsistent(format!("face {}: half-edge {} has no twin", f.0, he.0)));
            };
            if self.he(twin).opposite != Some(he) {
                return Err(HullError::inconsistent(format!("face {}: twin of {} is not reciprocal", f.0, he.0)));
            }
            if self.head(twin) != self.tail(he) || self.head(he) != self.tail(twin) {
                return Err(HullError::inconsistent(format!("face {}: half-edge {} reflected by wrong edge", f.0, he.0)));
            }
            let neighbour = self.he(twin).face;
            if self.face(neighbour).mark == FaceMark::Deleted {
                return Err(HullError::inconsistent(format!("face {}: neighbour {} is not on the hull", f.0, neighbour.0)));
            }
            if self.opp_face_distance(he)? > tol || self.opp_face_distance(twin)? > tol {
                return Err(HullError::inconsistent(format!("face {} is non-convex with {}", f.0, neighbour.0)));
            }
            if self.opposite_face(self.next(he))? == neighbour {
                return Err(HullError::inconsistent(format!(
                    "face {}: redundant vertex {}",
                    f.0,
                    self.head(he).0
                )));
            }
        }
        Ok(())
    }

    /// Runs [`Arena::check_face`] on every face still on the hull.
    pub fn check_faces(&self, tol: f64) -> HullResult<()> {
        self.live_faces().try_for_each(|f| self.check_face(f, tol))
    }
}
