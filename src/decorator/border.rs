//! Operations that create or remove faces along the border.

use tracing::trace;

use crate::{
    error::Error,
    handle::HalfedgeHandle,
};
use super::{reject, Decorator};


impl<P> Decorator<'_, P> {
    /// Removes the face of `h` without removing any edge: the boundary cycle
    /// of the face becomes a border cycle. Returns `h`.
    pub fn make_hole(&mut self, h: HalfedgeHandle) -> Result<HalfedgeHandle, Error> {
        const OP: &str = "make_hole";
        self.require_halfedge(OP, h)?;

        let f = match self.face(h) {
            Some(f) => f,
            None => return reject(OP, "`h` is already a border halfedge"),
        };

        self.set_cycle_face(h, None);
        self.faces_erase(f);

        trace!(?h, ?f, "made hole");
        Ok(h)
    }

    /// Closes the border cycle of `h` with a new face. Returns `h`.
    pub fn fill_hole(&mut self, h: HalfedgeHandle) -> Result<HalfedgeHandle, Error> {
        const OP: &str = "fill_hole";
        self.require_halfedge(OP, h)?;

        if !self.is_border(h) {
            return reject(OP, "`h` is not a border halfedge");
        }
        self.require_room(OP, 0, 0, 1)?;

        let f = self.faces_push_back(h);
        self.set_cycle_face(h, Some(f));

        trace!(?h, ?f, "filled hole");
        Ok(h)
    }

    /// Checks the preconditions shared by `add_face_to_border` and
    /// `add_vertex_and_face_to_border`.
    fn check_border_pair(
        &self,
        op: &'static str,
        h: HalfedgeHandle,
        g: HalfedgeHandle,
    ) -> Result<(), Error> {
        self.require_halfedge(op, h)?;
        self.require_halfedge(op, g)?;

        if !self.is_border(h) || !self.is_border(g) {
            return reject(op, "`h` and `g` have to be border halfedges");
        }
        if h == g {
            return reject(op, "`h` and `g` are the same halfedge");
        }
        if !self.halfedges_around_face(h).any(|x| x == g) {
            return reject(op, "`g` is not on the border cycle of `h`");
        }

        Ok(())
    }

    /// Adds a new edge from `t(h)` to `t(g)` and a new face bounded by the
    /// border halfedges `n(h)` up to `g` plus the new edge. Returns the new
    /// halfedge incident to the new face.
    ///
    /// ```text
    ///       g        (new face)         n(h)
    ///   o <----- o <----- ... <----- o <----- o
    ///            \                   ^
    ///             \____ returned ____/
    ///
    ///   the rest of the cycle (h -> new -> n(g)) stays border
    /// ```
    ///
    /// Preconditions: `h` and `g` are distinct border halfedges of the same
    /// border cycle and `n(h) != g`.
    pub fn add_face_to_border(
        &mut self,
        h: HalfedgeHandle,
        g: HalfedgeHandle,
    ) -> Result<HalfedgeHandle, Error> {
        const OP: &str = "add_face_to_border";
        self.check_border_pair(OP, h, g)?;
        if self.next(h) == g {
            return reject(OP, "`g` directly follows `h`");
        }
        self.require_room(OP, 0, 1, 1)?;

        let (hn, gn) = (self.next(h), self.next(g));
        let (from, to) = (self.vertex(h), self.vertex(g));
        let x = self.edges_push_back(from, to);
        let xo = x.opposite();

        self.link(g, xo);
        self.link(xo, hn);
        self.link(h, x);
        self.link(x, gn);

        let f = self.faces_push_back(xo);
        self.set_cycle_face(xo, Some(f));

        trace!(?h, ?g, ?f, "added face to border");
        Ok(xo)
    }

    /// Adds a new vertex with two new edges and a new face bounded by the
    /// border halfedges `n(h)` up to `g` and the two new edges. Returns the
    /// new halfedge pointing from `t(g)` to the new vertex (on the new face).
    ///
    /// The border cycle continues `h -> (t(h) to new vertex) ->
    /// (new vertex to t(g)) -> n(g)` afterwards.
    ///
    /// Preconditions: `h` and `g` are distinct border halfedges of the same
    /// border cycle.
    pub fn add_vertex_and_face_to_border(
        &mut self,
        h: HalfedgeHandle,
        g: HalfedgeHandle,
        point: P,
    ) -> Result<HalfedgeHandle, Error> {
        const OP: &str = "add_vertex_and_face_to_border";
        self.check_border_pair(OP, h, g)?;
        self.require_room(OP, 1, 2, 1)?;

        let (hn, gn) = (self.next(h), self.next(g));
        let (th, tg) = (self.vertex(h), self.vertex(g));

        let w = self.vertices_push_back(point);
        let a = self.edges_push_back(tg, w);
        let b = self.edges_push_back(w, th);
        let (ao, bo) = (a.opposite(), b.opposite());

        self.link(g, a);
        self.link(a, b);
        self.link(b, hn);
        self.link(h, bo);
        self.link(bo, ao);
        self.link(ao, gn);

        let f = self.faces_push_back(a);
        self.set_cycle_face(a, Some(f));
        self.set_vertex_halfedge(w, Some(bo));

        trace!(?h, ?g, ?w, "added vertex and face to border");
        Ok(a)
    }

    /// Removes the face of `h`. Its boundary becomes border; edges that are
    /// border on both sides afterwards are removed, as are vertices left
    /// without any edge by that.
    pub fn erase_face(&mut self, h: HalfedgeHandle) -> Result<(), Error> {
        const OP: &str = "erase_face";
        self.require_halfedge(OP, h)?;

        let f = match self.face(h) {
            Some(f) => f,
            None => return reject(OP, "`h` is a border halfedge"),
        };

        let cycle = self.cycle(h);
        self.set_cycle_face(h, None);
        self.faces_erase(f);

        let mut removed_edges = 0;
        let mut removed_vertices = 0;
        for x in cycle {
            if !self.contains_halfedge(x) || !self.is_border(x.opposite()) {
                continue;
            }

            for v in self.unlink_edge(x) {
                self.vertices_erase(v);
                removed_vertices += 1;
            }
            removed_edges += 1;
        }

        trace!(?h, ?f, removed_edges, removed_vertices, "erased face");
        Ok(())
    }
}
