//! The halfedge data structure itself: storage, navigation and raw container
//! operations.

// # Some notes for developers about this implementation
//
// - Halfedges are stored per edge: the edge container holds `[Halfedge; 2]`
//   and the halfedge handles of edge `e` are `2e` and `2e + 1`. Twins are
//   thus never stored explicitly and an edge can only be allocated or freed
//   as a whole.
// - All three containers are `InPlaceList`s. Handles are slot indices plus
//   the generation of the slot. Freed slots are reused by later pushes with
//   a bumped generation, which is what makes stale handles detectable. Both
//   halves of an edge carry the generation of the edge slot.
// - Vertex anchors point *to* the vertex (incoming halfedge), face anchors
//   lie on the boundary cycle of the face.
// - Nothing in here repairs references when elements are erased. That's the
//   job of the decorator.

use std::{fmt, mem};

use cgmath::Point3;
use tracing::trace;

use crate::{
    decorator::{ConstDecorator, Decorator},
    handle::{hsize, EdgeHandle, FaceHandle, HalfedgeHandle, Handle, Opt, VertexHandle},
    list::InPlaceList,
};

mod border;
mod iter;

pub use self::iter::{
    BorderEdges, BorderHalfedges, Edges, FaceCirculator, Faces, Halfedges, Points,
    VertexCirculator, Vertices,
};



// ===============================================================================================
// ===== Types stored inside the data structure
// ===============================================================================================

/// Data stored per vertex.
#[derive(Clone)]
pub(crate) struct Vertex<P> {
    /// One halfedge pointing to this vertex, `None` for isolated vertices.
    pub(crate) halfedge: Opt<HalfedgeHandle>,
    pub(crate) point: P,
}

/// Data stored per halfedge.
#[derive(Clone, Copy)]
pub(crate) struct Halfedge {
    pub(crate) next: HalfedgeHandle,
    pub(crate) prev: HalfedgeHandle,

    /// The vertex this halfedge points to.
    pub(crate) vertex: VertexHandle,

    /// The face this halfedge belongs to or `None` if it's a border halfedge.
    pub(crate) face: Opt<FaceHandle>,
}

/// Data stored per face.
#[derive(Clone, Copy)]
pub(crate) struct Face {
    /// One (arbitrary) halfedge of the boundary cycle.
    pub(crate) halfedge: HalfedgeHandle,
}

/// Cached result of the last `normalize_border`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BorderCache {
    pub(crate) first_edge: Opt<EdgeHandle>,
    pub(crate) halfedges: usize,
    pub(crate) edges: usize,
}

impl BorderCache {
    fn empty() -> Self {
        Self {
            first_edge: Opt::none(),
            halfedges: 0,
            edges: 0,
        }
    }
}

impl<P: fmt::Debug> fmt::Debug for Vertex<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Vertex {{ halfedge: {:?}, point: {:?} }}", self.halfedge, self.point)
    }
}

impl fmt::Debug for Halfedge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Halfedge {{ vertex: {:5} next: {:6} prev: {:6} face: {:?} }}",
            format!("{:?},", self.vertex),
            format!("{:?},", self.next),
            format!("{:?},", self.prev),
            self.face,
        )
    }
}

impl fmt::Debug for Face {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Face {{ halfedge: {:?} }}", self.halfedge)
    }
}



// ===============================================================================================
// ===== The data structure
// ===============================================================================================

/// A halfedge data structure (also known as *doubly connected edge list*)
/// for orientable, possibly bordered 2-manifold polygon surfaces.
///
/// The structure stores vertices (each with a point of type `P`), edges (a
/// pair of opposite halfedges) and faces. The border is not stored as face:
/// a halfedge without a face is a border halfedge.
///
/// This type only offers raw container operations and navigation. Editing
/// operations that keep the structure consistent live in the
/// [`Decorator`], obtained via [`HalfedgeDS::decorator`].
///
/// Handles stay valid until the element they refer to is erased. The slot of
/// an erased element is reused later, but under a new generation: the old
/// handle is never considered live again (see [`Handle::generation`]).
///
/// # Panics
///
/// Navigation methods panic when passed a handle that does not refer to a
/// live element, just like indexing a slice out of bounds does. Push
/// operations panic when the handle index space (`hsize`) is exhausted.
#[derive(Clone)]
pub struct HalfedgeDS<P = Point3<f64>> {
    vertices: InPlaceList<VertexHandle, Vertex<P>>,
    edges: InPlaceList<EdgeHandle, [Halfedge; 2]>,
    faces: InPlaceList<FaceHandle, Face>,
    pub(crate) border: BorderCache,
}

impl<P> HalfedgeDS<P> {
    /// Creates an empty data structure.
    pub fn new() -> Self {
        Self::with_capacity(0, 0, 0)
    }

    /// Creates an empty data structure with space for the given number of
    /// vertices, halfedges and faces.
    pub fn with_capacity(vertices: usize, halfedges: usize, faces: usize) -> Self {
        Self {
            vertices: InPlaceList::with_capacity(vertices),
            edges: InPlaceList::with_capacity((halfedges + 1) / 2),
            faces: InPlaceList::with_capacity(faces),
            border: BorderCache::empty(),
        }
    }

    /// Reserves space for the given number of additional vertices, halfedges
    /// and faces. Existing handles are not affected.
    pub fn reserve(&mut self, vertices: usize, halfedges: usize, faces: usize) {
        self.vertices.reserve(vertices);
        self.edges.reserve((halfedges + 1) / 2);
        self.faces.reserve(faces);
    }

    /// Returns the decorator offering the editing operations.
    pub fn decorator(&mut self) -> Decorator<'_, P> {
        Decorator::new(self)
    }

    /// Returns the read-only decorator (validity checks and queries).
    pub fn const_decorator(&self) -> ConstDecorator<'_, P> {
        ConstDecorator::new(self)
    }


    // ===== Sizes ================================================================================

    pub fn size_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of halfedges. Always even.
    pub fn size_of_halfedges(&self) -> usize {
        2 * self.edges.len()
    }

    pub fn size_of_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn size_of_faces(&self) -> usize {
        self.faces.len()
    }

    /// Returns `true` if there are no vertices, edges and faces.
    pub fn is_empty(&self) -> bool {
        self.vertices.len() == 0 && self.edges.len() == 0 && self.faces.len() == 0
    }

    pub fn capacity_of_vertices(&self) -> usize {
        self.vertices.capacity()
    }

    pub fn capacity_of_halfedges(&self) -> usize {
        2 * self.edges.capacity()
    }

    pub fn capacity_of_faces(&self) -> usize {
        self.faces.capacity()
    }

    /// Bytes used by the data structure (live elements only).
    pub fn bytes(&self) -> usize {
        mem::size_of::<Self>() + self.vertices.bytes() + self.edges.bytes() + self.faces.bytes()
    }

    /// Bytes allocated by the data structure.
    pub fn bytes_reserved(&self) -> usize {
        mem::size_of::<Self>()
            + self.vertices.bytes_reserved()
            + self.edges.bytes_reserved()
            + self.faces.bytes_reserved()
    }

    /// Returns `true` if all of the given numbers of elements can still be
    /// created without exhausting the handle index space. Free slots are
    /// used up first.
    pub(crate) fn has_room(&self, vertices: usize, edges: usize, faces: usize) -> bool {
        let max = hsize::max_value() as usize;
        let fits = |next: usize, n: usize| next.checked_add(n).map_or(false, |end| end < max);

        fits(self.vertices.next_push_index(), vertices.saturating_sub(self.vertices.free_slots()))
            && fits(self.faces.next_push_index(), faces.saturating_sub(self.faces.free_slots()))
            && fits(
                2 * self.edges.next_push_index(),
                2 * edges.saturating_sub(self.edges.free_slots()),
            )
    }


    // ===== Liveness =============================================================================

    pub fn contains_vertex(&self, v: VertexHandle) -> bool {
        self.vertices.contains(v)
    }

    pub fn contains_halfedge(&self, h: HalfedgeHandle) -> bool {
        self.edges.contains(h.edge())
    }

    pub fn contains_face(&self, f: FaceHandle) -> bool {
        self.faces.contains(f)
    }


    // ===== Navigation ===========================================================================

    #[inline]
    pub(crate) fn he(&self, h: HalfedgeHandle) -> &Halfedge {
        &self.edges[h.edge()][h.side()]
    }

    #[inline]
    pub(crate) fn he_mut(&mut self, h: HalfedgeHandle) -> &mut Halfedge {
        &mut self.edges[h.edge()][h.side()]
    }

    /// Like `he`, but returns `None` for dead handles.
    pub(crate) fn try_he(&self, h: HalfedgeHandle) -> Option<&Halfedge> {
        self.edges.get(h.edge()).map(|pair| &pair[h.side()])
    }

    pub(crate) fn try_vertex_record(&self, v: VertexHandle) -> Option<&Vertex<P>> {
        self.vertices.get(v)
    }

    pub(crate) fn try_face_record(&self, f: FaceHandle) -> Option<&Face> {
        self.faces.get(f)
    }

    /// The next halfedge along the cycle of `h`.
    #[inline]
    pub fn next(&self, h: HalfedgeHandle) -> HalfedgeHandle {
        self.he(h).next
    }

    /// The previous halfedge along the cycle of `h`.
    #[inline]
    pub fn prev(&self, h: HalfedgeHandle) -> HalfedgeHandle {
        self.he(h).prev
    }

    /// The antiparallel twin of `h`. Pure handle arithmetic.
    #[inline(always)]
    pub fn opposite(&self, h: HalfedgeHandle) -> HalfedgeHandle {
        h.opposite()
    }

    /// The vertex `h` points to.
    #[inline]
    pub fn vertex(&self, h: HalfedgeHandle) -> VertexHandle {
        self.he(h).vertex
    }

    /// The vertex `h` starts at.
    #[inline]
    pub fn source(&self, h: HalfedgeHandle) -> VertexHandle {
        self.he(h.opposite()).vertex
    }

    /// The face of `h` or `None` if `h` is a border halfedge.
    #[inline]
    pub fn face(&self, h: HalfedgeHandle) -> Option<FaceHandle> {
        self.he(h).face.into_option()
    }

    #[inline]
    pub fn is_border(&self, h: HalfedgeHandle) -> bool {
        self.he(h).face.is_none()
    }

    /// Returns `true` if at least one half of the edge of `h` is a border
    /// halfedge.
    pub fn is_border_edge(&self, h: HalfedgeHandle) -> bool {
        self.is_border(h) || self.is_border(h.opposite())
    }

    /// The anchor of `v`: one halfedge pointing to `v`. `None` for isolated
    /// vertices.
    pub fn vertex_halfedge(&self, v: VertexHandle) -> Option<HalfedgeHandle> {
        self.vertices[v].halfedge.into_option()
    }

    /// The anchor of `f`: one halfedge of its boundary cycle.
    pub fn face_halfedge(&self, f: FaceHandle) -> HalfedgeHandle {
        self.faces[f].halfedge
    }

    pub fn point(&self, v: VertexHandle) -> &P {
        &self.vertices[v].point
    }

    pub fn point_mut(&mut self, v: VertexHandle) -> &mut P {
        &mut self.vertices[v].point
    }

    /// Number of halfedges pointing to `v`.
    pub fn vertex_degree(&self, v: VertexHandle) -> usize {
        match self.vertex_halfedge(v) {
            None => 0,
            Some(h) => self.halfedges_around_vertex(h).count(),
        }
    }

    /// Number of halfedges on the boundary cycle of `f`.
    pub fn face_degree(&self, f: FaceHandle) -> usize {
        self.halfedges_around_face(self.face_halfedge(f)).count()
    }

    /// Number of halfedges on the cycle of `h`.
    pub(crate) fn cycle_len(&self, h: HalfedgeHandle) -> usize {
        self.halfedges_around_face(h).count()
    }

    /// Circulates along the cycle of `h` (following `next`), starting with
    /// `h`. Works for border cycles as well.
    pub fn halfedges_around_face(&self, h: HalfedgeHandle) -> FaceCirculator<'_, P> {
        FaceCirculator::new(self, h)
    }

    /// Circulates around the target vertex of `h`, yielding all halfedges
    /// pointing to that vertex, starting with `h`.
    pub fn halfedges_around_vertex(&self, h: HalfedgeHandle) -> VertexCirculator<'_, P> {
        VertexCirculator::new(self, h)
    }


    // ===== Raw setters ==========================================================================
    //
    // These don't maintain any invariant. They are meant for modifiers and
    // for the decorator.

    /// Sets `next(h) = n` and `prev(n) = h`.
    #[inline]
    pub fn link(&mut self, h: HalfedgeHandle, n: HalfedgeHandle) {
        self.he_mut(h).next = n;
        self.he_mut(n).prev = h;
    }

    #[inline]
    pub fn set_vertex(&mut self, h: HalfedgeHandle, v: VertexHandle) {
        self.he_mut(h).vertex = v;
    }

    #[inline]
    pub fn set_face(&mut self, h: HalfedgeHandle, f: Option<FaceHandle>) {
        self.he_mut(h).face = f.into();
    }

    #[inline]
    pub fn set_vertex_halfedge(&mut self, v: VertexHandle, h: Option<HalfedgeHandle>) {
        self.vertices[v].halfedge = h.into();
    }

    #[inline]
    pub fn set_face_halfedge(&mut self, f: FaceHandle, h: HalfedgeHandle) {
        self.faces[f].halfedge = h;
    }


    // ===== Insertion ============================================================================

    /// Appends an isolated vertex.
    pub fn vertices_push_back(&mut self, point: P) -> VertexHandle {
        let v = self.vertices.push_back(Vertex {
            halfedge: Opt::none(),
            point,
        });
        trace!(?v, "pushed vertex");
        v
    }

    /// Appends a new edge from `from` to `to` and returns the halfedge
    /// pointing to `to`.
    ///
    /// Both halves are border halfedges and form a two-cycle (each one is
    /// `next` and `prev` of the other). The vertex anchors are not touched.
    pub fn edges_push_back(&mut self, from: VertexHandle, to: VertexHandle) -> HalfedgeHandle {
        // Make sure the upper half is representable before touching anything.
        let e = self.edges.next_handle();
        HalfedgeHandle::from_usize(2 * e.to_usize() + 1);

        let [h, g] = e.halfedges();
        let pushed = self.edges.push_back([
            Halfedge { next: g, prev: g, vertex: to, face: Opt::none() },
            Halfedge { next: h, prev: h, vertex: from, face: Opt::none() },
        ]);
        debug_assert_eq!(pushed, e);

        trace!(?h, ?from, ?to, "pushed edge");
        h
    }

    /// Appends a face with the given anchor. The `face` fields of the cycle
    /// are not touched.
    pub fn faces_push_back(&mut self, halfedge: HalfedgeHandle) -> FaceHandle {
        let f = self.faces.push_back(Face { halfedge });
        trace!(?f, ?halfedge, "pushed face");
        f
    }


    // ===== Removal ==============================================================================
    //
    // None of these repair references to the removed element.

    pub fn vertices_pop_front(&mut self) -> Option<VertexHandle> {
        self.vertices.pop_front().map(|(v, _)| v)
    }

    pub fn vertices_pop_back(&mut self) -> Option<VertexHandle> {
        self.vertices.pop_back().map(|(v, _)| v)
    }

    pub fn edges_pop_front(&mut self) -> Option<EdgeHandle> {
        let e = self.edges.first()?;
        self.edges_erase(e.halfedge());
        Some(e)
    }

    pub fn edges_pop_back(&mut self) -> Option<EdgeHandle> {
        let e = self.edges.last()?;
        self.edges_erase(e.halfedge());
        Some(e)
    }

    pub fn faces_pop_front(&mut self) -> Option<FaceHandle> {
        self.faces.pop_front().map(|(f, _)| f)
    }

    pub fn faces_pop_back(&mut self) -> Option<FaceHandle> {
        self.faces.pop_back().map(|(f, _)| f)
    }

    /// Removes the vertex. Returns `false` if it did not exist.
    pub fn vertices_erase(&mut self, v: VertexHandle) -> bool {
        trace!(?v, "erasing vertex");
        self.vertices.remove(v).is_some()
    }

    /// Removes the edge of `h` (both halves). Returns `false` if it did not
    /// exist.
    pub fn edges_erase(&mut self, h: HalfedgeHandle) -> bool {
        let e = h.edge();
        if self.border.first_edge == Opt::some(e) {
            self.border.first_edge = self.edges.next_of(e).into();
        }

        trace!(?e, "erasing edge");
        self.edges.remove(e).is_some()
    }

    /// Removes the face. Returns `false` if it did not exist.
    pub fn faces_erase(&mut self, f: FaceHandle) -> bool {
        trace!(?f, "erasing face");
        self.faces.remove(f).is_some()
    }

    /// Erases the vertices from `first` (inclusive) to `last` (exclusive) in
    /// container order. `last == None` means "up to the end". Returns the
    /// number of erased vertices.
    pub fn vertices_erase_range(&mut self, first: VertexHandle, last: Option<VertexHandle>) -> usize {
        let doomed = collect_range(self.vertices.handles_from(Some(first)), last);
        doomed.iter().filter(|&&v| self.vertices_erase(v)).count()
    }

    /// Like `vertices_erase_range`, but for edges. Both halves of `first` and
    /// `last` denote the same edge.
    pub fn edges_erase_range(
        &mut self,
        first: HalfedgeHandle,
        last: Option<HalfedgeHandle>,
    ) -> usize {
        let doomed = collect_range(
            self.edges.handles_from(Some(first.edge())),
            last.map(|h| h.edge()),
        );
        doomed.iter().filter(|&&e| self.edges_erase(e.halfedge())).count()
    }

    pub fn faces_erase_range(&mut self, first: FaceHandle, last: Option<FaceHandle>) -> usize {
        let doomed = collect_range(self.faces.handles_from(Some(first)), last);
        doomed.iter().filter(|&&f| self.faces_erase(f)).count()
    }

    pub fn vertices_clear(&mut self) {
        self.vertices.clear();
    }

    pub fn edges_clear(&mut self) {
        self.edges.clear();
        self.border = BorderCache::empty();
    }

    pub fn faces_clear(&mut self) {
        self.faces.clear();
    }

    /// Removes everything. Handle indices start at 0 again afterwards, but
    /// handles from before never become live again.
    pub fn clear(&mut self) {
        self.vertices_clear();
        self.edges_clear();
        self.faces_clear();
    }
}

fn collect_range<H: Handle>(iter: impl Iterator<Item = H>, last: Option<H>) -> Vec<H> {
    iter.take_while(|&h| Some(h) != last).collect()
}

impl<P> Default for HalfedgeDS<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: fmt::Debug> fmt::Debug for HalfedgeDS<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("HalfedgeDS")
            .field("vertices", &self.vertices)
            .field("edges", &self.edges)
            .field("faces", &self.faces)
            .finish()
    }
}
