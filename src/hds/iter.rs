//! Iterators over the containers and circulators around faces and vertices.
//!
//! All of them are lazy and `Clone`, so a sequence can be restarted by
//! cloning the iterator before consuming it.

use crate::{
    handle::{EdgeHandle, FaceHandle, HalfedgeHandle, Opt, VertexHandle},
    list::Handles,
};
use super::{Face, HalfedgeDS, Halfedge, Vertex};


// ===============================================================================================
// ===== Container order iterators
// ===============================================================================================

impl<P> HalfedgeDS<P> {
    /// All vertices in container order.
    pub fn vertices(&self) -> Vertices<'_, P> {
        Vertices { inner: self.vertices.handles() }
    }

    /// All halfedges in container order. Both halves of an edge are yielded
    /// right after one another, the lower index first.
    pub fn halfedges(&self) -> Halfedges<'_> {
        Halfedges::new(self.edges.handles(), None)
    }

    /// All edges in container order.
    pub fn edges(&self) -> Edges<'_> {
        Edges::new(self.edges.handles(), None)
    }

    /// All faces in container order.
    pub fn faces(&self) -> Faces<'_> {
        Faces { inner: self.faces.handles() }
    }

    /// The points of all vertices in container order.
    pub fn points(&self) -> Points<'_, P> {
        Points { hds: self, inner: self.vertices.handles() }
    }
}

/// See [`HalfedgeDS::vertices`].
pub struct Vertices<'a, P> {
    inner: Handles<'a, VertexHandle, Vertex<P>>,
}

impl<P> Clone for Vertices<'_, P> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<P> Iterator for Vertices<'_, P> {
    type Item = VertexHandle;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// See [`HalfedgeDS::points`].
pub struct Points<'a, P> {
    hds: &'a HalfedgeDS<P>,
    inner: Handles<'a, VertexHandle, Vertex<P>>,
}

impl<P> Clone for Points<'_, P> {
    fn clone(&self) -> Self {
        Self { hds: self.hds, inner: self.inner.clone() }
    }
}

impl<'a, P> Iterator for Points<'a, P> {
    type Item = &'a P;

    fn next(&mut self) -> Option<Self::Item> {
        let hds = self.hds;
        self.inner.next().map(|v| hds.point(v))
    }
}

/// See [`HalfedgeDS::edges`].
#[derive(Clone)]
pub struct Edges<'a> {
    inner: Handles<'a, EdgeHandle, [Halfedge; 2]>,
    stop: Opt<EdgeHandle>,
}

impl<'a> Edges<'a> {
    /// Yields the edges of `inner` up to (excluding) `stop`.
    pub(super) fn new(
        inner: Handles<'a, EdgeHandle, [Halfedge; 2]>,
        stop: Option<EdgeHandle>,
    ) -> Self {
        Self { inner, stop: stop.into() }
    }
}

impl Iterator for Edges<'_> {
    type Item = EdgeHandle;

    fn next(&mut self) -> Option<Self::Item> {
        let e = self.inner.next()?;
        if self.stop == Opt::some(e) {
            self.inner.exhaust();
            return None;
        }
        Some(e)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.inner.size_hint();
        if self.stop.is_some() {
            (0, upper)
        } else {
            (lower, upper)
        }
    }
}

/// See [`HalfedgeDS::faces`].
#[derive(Clone)]
pub struct Faces<'a> {
    inner: Handles<'a, FaceHandle, Face>,
}

impl Iterator for Faces<'_> {
    type Item = FaceHandle;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Halfedges of a run of edges in container order. Used by
/// [`HalfedgeDS::halfedges`] and [`HalfedgeDS::non_border_halfedges`].
#[derive(Clone)]
pub struct Halfedges<'a> {
    edges: Handles<'a, EdgeHandle, [Halfedge; 2]>,
    stop: Opt<EdgeHandle>,
    upper: Option<HalfedgeHandle>,
    done: bool,
}

impl<'a> Halfedges<'a> {
    pub(super) fn new(
        edges: Handles<'a, EdgeHandle, [Halfedge; 2]>,
        stop: Option<EdgeHandle>,
    ) -> Self {
        Self {
            edges,
            stop: stop.into(),
            upper: None,
            done: false,
        }
    }
}

impl Iterator for Halfedges<'_> {
    type Item = HalfedgeHandle;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(upper) = self.upper.take() {
            return Some(upper);
        }

        if self.done {
            return None;
        }

        let e = self.edges.next()?;
        if self.stop == Opt::some(e) {
            self.done = true;
            return None;
        }

        let [lower, upper] = e.halfedges();
        self.upper = Some(upper);
        Some(lower)
    }
}


// ===============================================================================================
// ===== Border block iterators
// ===============================================================================================

/// See [`HalfedgeDS::border_halfedges`].
pub struct BorderHalfedges<'a, P> {
    pub(super) hds: &'a HalfedgeDS<P>,
    pub(super) edges: Handles<'a, EdgeHandle, [Halfedge; 2]>,
    pub(super) upper: Option<HalfedgeHandle>,
}

impl<P> Clone for BorderHalfedges<'_, P> {
    fn clone(&self) -> Self {
        Self { hds: self.hds, edges: self.edges.clone(), upper: self.upper }
    }
}

impl<P> Iterator for BorderHalfedges<'_, P> {
    type Item = HalfedgeHandle;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(upper) = self.upper.take() {
            return Some(upper);
        }

        loop {
            let [lower, upper] = self.edges.next()?.halfedges();
            match (self.hds.is_border(lower), self.hds.is_border(upper)) {
                (true, true) => {
                    self.upper = Some(upper);
                    return Some(lower);
                }
                (true, false) => return Some(lower),
                (false, true) => return Some(upper),

                // Stale cache: the edge is not a border edge anymore.
                (false, false) => continue,
            }
        }
    }
}

/// See [`HalfedgeDS::border_edges`].
#[derive(Clone)]
pub struct BorderEdges<'a> {
    pub(super) edges: Handles<'a, EdgeHandle, [Halfedge; 2]>,
}

impl Iterator for BorderEdges<'_> {
    type Item = EdgeHandle;

    fn next(&mut self) -> Option<Self::Item> {
        self.edges.next()
    }
}


// ===============================================================================================
// ===== Circulators
// ===============================================================================================

/// Circulates along the `next` cycle of a halfedge. Yields the start halfedge
/// first.
#[derive(Debug)]
pub enum FaceCirculator<'a, P> {
    Empty,
    NonEmpty {
        hds: &'a HalfedgeDS<P>,
        current: HalfedgeHandle,
        start: HalfedgeHandle,
    },
}

impl<'a, P> FaceCirculator<'a, P> {
    pub(super) fn new(hds: &'a HalfedgeDS<P>, start: HalfedgeHandle) -> Self {
        FaceCirculator::NonEmpty { hds, current: start, start }
    }
}

impl<P> Clone for FaceCirculator<'_, P> {
    fn clone(&self) -> Self {
        match *self {
            FaceCirculator::Empty => FaceCirculator::Empty,
            FaceCirculator::NonEmpty { hds, current, start } => {
                FaceCirculator::NonEmpty { hds, current, start }
            }
        }
    }
}

impl<P> Iterator for FaceCirculator<'_, P> {
    type Item = HalfedgeHandle;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        match *self {
            FaceCirculator::Empty => None,
            FaceCirculator::NonEmpty { hds, ref mut current, start } => {
                let out = *current;

                // If we reached the start again, we are done.
                let next = hds.next(out);
                if next == start {
                    *self = FaceCirculator::Empty;
                } else {
                    *current = next;
                }

                Some(out)
            }
        }
    }
}

/// Circulates around the target vertex of a halfedge, yielding all halfedges
/// pointing to that vertex (`h`, `opposite(next(h))`, ...).
#[derive(Debug)]
pub enum VertexCirculator<'a, P> {
    Empty,
    NonEmpty {
        hds: &'a HalfedgeDS<P>,
        current: HalfedgeHandle,
        start: HalfedgeHandle,
    },
}

impl<'a, P> VertexCirculator<'a, P> {
    pub(super) fn new(hds: &'a HalfedgeDS<P>, start: HalfedgeHandle) -> Self {
        VertexCirculator::NonEmpty { hds, current: start, start }
    }
}

impl<P> Clone for VertexCirculator<'_, P> {
    fn clone(&self) -> Self {
        match *self {
            VertexCirculator::Empty => VertexCirculator::Empty,
            VertexCirculator::NonEmpty { hds, current, start } => {
                VertexCirculator::NonEmpty { hds, current, start }
            }
        }
    }
}

impl<P> Iterator for VertexCirculator<'_, P> {
    type Item = HalfedgeHandle;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        match *self {
            VertexCirculator::Empty => None,
            VertexCirculator::NonEmpty { hds, ref mut current, start } => {
                let out = *current;

                let next = hds.next(out).opposite();
                if next == start {
                    *self = VertexCirculator::Empty;
                } else {
                    *current = next;
                }

                Some(out)
            }
        }
    }
}
