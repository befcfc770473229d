//! Topological editing operations on top of a [`HalfedgeDS`].
//!
//! The [`Decorator`] borrows the data structure mutably and offers the
//! editing operations. All of them check their preconditions completely
//! before modifying anything: if an operation returns an error, the data
//! structure is unchanged.
//!
//! The [`ConstDecorator`] only needs a shared reference and offers the read
//! only queries: validity checks, shape predicates and component counting.
//!
//! Notation used in comments and diagrams throughout this module: `n(h)`,
//! `p(h)` and `o(h)` are `next`, `prev` and `opposite` of `h`; `t(h)` is the
//! vertex `h` points to and `s(h)` the vertex it starts at.

use std::ops::{Deref, DerefMut};

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    error::Error,
    handle::{FaceHandle, HalfedgeHandle, VertexHandle},
    hds::HalfedgeDS,
};

mod border;
mod components;
mod euler;
mod shapes;
mod valid;
#[cfg(test)]
mod tests;

pub use self::valid::Violation;


/// Short list of halfedges, used for cycles and rotations which are small in
/// typical meshes.
pub(crate) type HalfedgeList = SmallVec<[HalfedgeHandle; 8]>;


// ===============================================================================================
// ===== Decorator types
// ===============================================================================================

/// Mutable access to the editing operations. Obtained via
/// [`HalfedgeDS::decorator`].
///
/// Dereferences to the underlying `HalfedgeDS`, so navigation is available
/// directly on the decorator.
#[derive(Debug)]
pub struct Decorator<'a, P> {
    hds: &'a mut HalfedgeDS<P>,
}

/// Read-only queries. Obtained via [`HalfedgeDS::const_decorator`] or
/// [`Decorator::as_const`].
#[derive(Debug)]
pub struct ConstDecorator<'a, P> {
    hds: &'a HalfedgeDS<P>,
}

impl<P> Clone for ConstDecorator<'_, P> {
    fn clone(&self) -> Self {
        Self { hds: self.hds }
    }
}

impl<P> Copy for ConstDecorator<'_, P> {}

impl<'a, P> Decorator<'a, P> {
    pub(crate) fn new(hds: &'a mut HalfedgeDS<P>) -> Self {
        Self { hds }
    }

    pub fn as_const(&self) -> ConstDecorator<'_, P> {
        ConstDecorator::new(self.hds)
    }
}

impl<'a, P> ConstDecorator<'a, P> {
    pub(crate) fn new(hds: &'a HalfedgeDS<P>) -> Self {
        Self { hds }
    }
}

impl<P> Deref for Decorator<'_, P> {
    type Target = HalfedgeDS<P>;

    fn deref(&self) -> &Self::Target {
        self.hds
    }
}

impl<P> DerefMut for Decorator<'_, P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.hds
    }
}

impl<P> Deref for ConstDecorator<'_, P> {
    type Target = HalfedgeDS<P>;

    fn deref(&self) -> &Self::Target {
        self.hds
    }
}



// ===============================================================================================
// ===== Helpers shared by all operations
// ===============================================================================================

/// Logs and returns a precondition error.
pub(crate) fn reject<T>(op: &'static str, reason: &'static str) -> Result<T, Error> {
    debug!(op, reason, "rejected topological operation");
    Err(Error::Precondition { op, reason })
}

impl<P> HalfedgeDS<P> {
    pub(crate) fn require_halfedge(&self, op: &'static str, h: HalfedgeHandle) -> Result<(), Error> {
        if self.contains_halfedge(h) {
            Ok(())
        } else {
            debug!(op, ?h, "rejected dead halfedge");
            Err(Error::DeadHalfedge { op, handle: h })
        }
    }

    pub(crate) fn require_face(&self, op: &'static str, f: FaceHandle) -> Result<(), Error> {
        if self.contains_face(f) {
            Ok(())
        } else {
            debug!(op, ?f, "rejected dead face");
            Err(Error::DeadFace { op, handle: f })
        }
    }

    /// Makes sure the given number of vertices, edges and faces can be
    /// created.
    pub(crate) fn require_room(
        &self,
        op: &'static str,
        vertices: usize,
        edges: usize,
        faces: usize,
    ) -> Result<(), Error> {
        if self.has_room(vertices, edges, faces) {
            Ok(())
        } else {
            debug!(op, vertices, edges, faces, "handle space exhausted");
            Err(Error::CapacityExhausted { op })
        }
    }

    /// All halfedges on the cycle of `h`, starting with `h`.
    pub(crate) fn cycle(&self, h: HalfedgeHandle) -> HalfedgeList {
        self.halfedges_around_face(h).collect()
    }

    /// All halfedges pointing to `t(h)`, starting with `h`.
    pub(crate) fn rotation(&self, h: HalfedgeHandle) -> HalfedgeList {
        self.halfedges_around_vertex(h).collect()
    }

    /// Assigns `f` to every halfedge on the cycle of `h`.
    pub(crate) fn set_cycle_face(&mut self, h: HalfedgeHandle, f: Option<FaceHandle>) {
        for x in self.cycle(h) {
            self.set_face(x, f);
        }
    }

    /// Makes `v` the target of all given halfedges.
    pub(crate) fn retarget(&mut self, halfedges: &[HalfedgeHandle], v: VertexHandle) {
        for &x in halfedges {
            self.set_vertex(x, v);
        }
    }

    /// Removes the edge of `h` from its cycles by linking around it, fixes
    /// the vertex anchors and erases the edge. Faces are not touched.
    ///
    /// Handles antennas (`n(h) == o(h)`), free-standing segments and loop
    /// edges (`n(h) == h`). Returns the vertices that became isolated.
    pub(crate) fn unlink_edge(&mut self, h: HalfedgeHandle) -> SmallVec<[VertexHandle; 2]> {
        let g = h.opposite();
        let doomed = |x: HalfedgeHandle| x == h || x == g;
        let (v, u) = (self.vertex(h), self.vertex(g));

        // The halfedges that still end in `v` (resp. `u`) afterwards. The
        // rotation is walked backwards so that `p(o(h))` comes first.
        let v_rest = self.rotation(h).into_iter().rev().find(|&x| !doomed(x));
        let u_rest = self.rotation(g).into_iter().rev().find(|&x| !doomed(x));

        //        hp        h         hn
        //   ... ----> (u) ----> (v) ----> ...
        //   ... <---- (u) <---- (v) <---- ...
        //        gn        g         gp
        //
        // Every surviving predecessor `y` of the edge continues with the
        // halfedge that follows `n(y)` in the rotation around its target.
        // When the edge is a loop that one is doomed as well, so rotate once
        // more.
        let splices = [self.prev(h), self.prev(g)]
            .iter()
            .filter(|&&y| !doomed(y))
            .map(|&y| {
                let mut z = self.next(self.next(y).opposite());
                if doomed(z) {
                    z = self.next(z.opposite());
                }
                (y, z)
            })
            .collect::<SmallVec<[_; 2]>>();
        for (y, z) in splices {
            self.link(y, z);
        }

        if self.vertex_halfedge(v).map_or(false, |x| doomed(x)) {
            self.set_vertex_halfedge(v, v_rest);
        }
        if self.vertex_halfedge(u).map_or(false, |x| doomed(x)) {
            self.set_vertex_halfedge(u, u_rest);
        }

        let mut isolated = SmallVec::new();
        if v_rest.is_none() {
            isolated.push(v);
        }
        if u_rest.is_none() && u != v {
            isolated.push(u);
        }

        self.edges_erase(h);
        isolated
    }
}



// ===============================================================================================
// ===== Primitive builders and whole-structure operations
// ===============================================================================================

impl<P> Decorator<'_, P> {
    /// Creates a loop: one vertex, one edge whose halves `h` and `o(h)` are
    /// their own `next`, and two new faces (one on each half). Returns `h`.
    ///
    /// ```text
    ///      h
    ///    .---.
    ///    |   |
    ///    '-->(v)
    /// ```
    pub fn create_loop(&mut self, point: P) -> Result<HalfedgeHandle, Error> {
        self.require_room("create_loop", 1, 1, 2)?;

        let v = self.vertices_push_back(point);
        let h = self.edges_push_back(v, v);
        let g = h.opposite();
        self.link(h, h);
        self.link(g, g);

        let fh = self.faces_push_back(h);
        let fg = self.faces_push_back(g);
        self.set_face(h, Some(fh));
        self.set_face(g, Some(fg));
        self.set_vertex_halfedge(v, Some(h));

        trace!(?h, "created loop");
        Ok(h)
    }

    /// Creates a segment: two vertices, one edge from `p` to `q` whose halves
    /// form a two-cycle and one new face shared by both halves. Returns the
    /// half pointing to `q`.
    pub fn create_segment(&mut self, p: P, q: P) -> Result<HalfedgeHandle, Error> {
        self.require_room("create_segment", 2, 1, 1)?;

        let v = self.vertices_push_back(p);
        let w = self.vertices_push_back(q);
        let h = self.edges_push_back(v, w);
        let g = h.opposite();

        let f = self.faces_push_back(h);
        self.set_face(h, Some(f));
        self.set_face(g, Some(f));
        self.set_vertex_halfedge(w, Some(h));
        self.set_vertex_halfedge(v, Some(g));

        trace!(?h, "created segment");
        Ok(h)
    }

    /// Creates an isolated triangle `p -> q -> r` with the border on the
    /// outside. Returns the inner halfedge from `p` to `q`.
    pub fn make_triangle(&mut self, p: P, q: P, r: P) -> Result<HalfedgeHandle, Error> {
        self.require_room("make_triangle", 3, 3, 1)?;
        Ok(self.make_triangle_unchecked(p, q, r))
    }

    fn make_triangle_unchecked(&mut self, p: P, q: P, r: P) -> HalfedgeHandle {
        //             v2
        //            ^  \
        //        i2 /    \ i1
        //          /  f   \
        //         /        v
        //       v0 -------> v1
        //             i0
        let v0 = self.vertices_push_back(p);
        let v1 = self.vertices_push_back(q);
        let v2 = self.vertices_push_back(r);
        let i0 = self.edges_push_back(v0, v1);
        let i1 = self.edges_push_back(v1, v2);
        let i2 = self.edges_push_back(v2, v0);

        self.link(i0, i1);
        self.link(i1, i2);
        self.link(i2, i0);
        self.link(i0.opposite(), i2.opposite());
        self.link(i2.opposite(), i1.opposite());
        self.link(i1.opposite(), i0.opposite());

        let f = self.faces_push_back(i0);
        self.set_cycle_face(i0, Some(f));

        // Border halfedges as anchors.
        self.set_vertex_halfedge(v0, Some(i0.opposite()));
        self.set_vertex_halfedge(v1, Some(i1.opposite()));
        self.set_vertex_halfedge(v2, Some(i2.opposite()));

        i0
    }

    /// Creates a closed tetrahedron with the four given points. The triangle
    /// `p -> q -> r` is one of its faces; the returned halfedge points from
    /// `p` to `q`.
    pub fn make_tetrahedron(&mut self, p: P, q: P, r: P, s: P) -> Result<HalfedgeHandle, Error> {
        self.require_room("make_tetrahedron", 4, 6, 4)?;

        let h = self.make_triangle_unchecked(p, q, r);
        let b0 = h.opposite();
        let next = self.next(b0);
        self.add_vertex_and_face_to_border(b0, next, s)?;

        let (prev, next) = (self.prev(b0), self.next(b0));
        self.add_face_to_border(prev, next)?;
        self.fill_hole(prev)?;

        trace!(?h, "created tetrahedron");
        Ok(h)
    }

    /// Reverses the orientation of every cycle. Border halfedges stay border
    /// halfedges, every halfedge keeps its face.
    pub fn inside_out(&mut self) {
        // Read everything first, as every write would change what the next
        // read sees.
        let halfedges = self.halfedges()
            .map(|h| (h, self.source(h), self.next(h), self.prev(h)))
            .collect::<Vec<_>>();
        let anchors = self.vertices()
            .map(|v| (v, self.vertex_halfedge(v).map(|a| self.next(a))))
            .collect::<Vec<_>>();

        for (h, source, next, prev) in halfedges {
            let rec = self.he_mut(h);
            rec.vertex = source;
            rec.next = prev;
            rec.prev = next;
        }
        for (v, anchor) in anchors {
            self.set_vertex_halfedge(v, anchor);
        }

        trace!("turned inside out");
    }
}
