//! Face merging.
//!
//! Two faces sharing a run of edges are fused into one polygon by splicing
//! their half-edge loops. Splicing can leave a vertex with both of its edges
//! on the same neighbour; [`Arena::connect_half_edges`] removes that
//! redundant vertex, swallowing the neighbour entirely when it is a triangle.

use super::arena::{Arena, FaceId, FaceMark, HalfEdgeId};
use crate::error::HullResult;

impl Arena {
    /// Absorbs the face across `hedge_adj` into `face`.
    ///
    /// Returns every face deleted by the merge: the absorbed neighbour and
    /// up to two triangles removed while fixing redundant vertices.
    pub fn merge_adjacent_face(
        &mut self,
        face: FaceId,
        hedge_adj: HalfEdgeId,
        min_area: f64,
    ) -> HullResult<Vec<FaceId>> {
        let opp_face = self.opposite_face(hedge_adj)?;
        let mut discarded = vec![opp_face];
        self.face_mut(opp_face).mark = FaceMark::Deleted;

        let hedge_opp = self.opposite(hedge_adj)?;

        let mut adj_prev = self.prev(hedge_adj);
        let mut adj_next = self.next(hedge_adj);
        let mut opp_prev = self.prev(hedge_opp);
        let mut opp_next = self.next(hedge_opp);

        // widen the shared run in both directions
        while self.opposite_face(adj_prev)? == opp_face {
            adj_prev = self.prev(adj_prev);
            opp_next = self.next(opp_next);
        }
        while self.opposite_face(adj_next)? == opp_face {
            opp_prev = self.prev(opp_prev);
            adj_next = self.next(adj_next);
        }

        // hand the neighbour's remaining edges over
        let stop = self.next(opp_prev);
        let mut he = opp_next;
        while he != stop {
            self.he_mut(he).face = face;
            he = self.next(he);
        }

        if hedge_adj == self.face(face).he0 {
            self.face_mut(face).he0 = adj_next;
        }

        if let Some(f) = self.connect_half_edges(face, opp_prev, adj_next, min_area)? {
            discarded.push(f);
        }
        if let Some(f) = self.connect_half_edges(face, adj_prev, opp_next, min_area)? {
            discarded.push(f);
        }

        self.compute_normal_and_centroid(face, min_area);
        Ok(discarded)
    }

    /// Links `hedge_prev → hedge` inside `face`, dropping the vertex between
    /// them when both edges border the same neighbour.
    fn connect_half_edges(
        &mut self,
        face: FaceId,
        hedge_prev: HalfEdgeId,
        hedge: HalfEdgeId,
        min_area: f64,
    ) -> HullResult<Option<FaceId>> {
        let opp_face = self.opposite_face(hedge)?;
        if self.opposite_face(hedge_prev)? != opp_face {
            self.he_mut(hedge_prev).next = hedge;
            self.he_mut(hedge).prev = hedge_prev;
            return Ok(None);
        }

        let mut discarded = None;

        if hedge_prev == self.face(face).he0 {
            self.face_mut(face).he0 = hedge;
        }

        let hedge_opp = if self.face(opp_face).num_verts == 3 {
            // the neighbour collapses to nothing
            self.face_mut(opp_face).mark = FaceMark::Deleted;
            discarded = Some(opp_face);
            let inner = self.prev(self.opposite(hedge)?);
            self.opposite(inner)?
        } else {
            let hedge_opp = self.next(self.opposite(hedge)?);
            if self.face(opp_face).he0 == self.prev(hedge_opp) {
                self.face_mut(opp_face).he0 = hedge_opp;
            }
            let skip_to = self.prev(self.prev(hedge_opp));
            self.he_mut(hedge_opp).prev = skip_to;
            self.he_mut(skip_to).next = hedge_opp;
            hedge_opp
        };

        let before = self.prev(hedge_prev);
        self.he_mut(hedge).prev = before;
        self.he_mut(before).next = hedge;
        self.set_opposite(hedge, hedge_opp);

        self.compute_normal_and_centroid(opp_face, min_area);
        Ok(discarded)
    }
}
