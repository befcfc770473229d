//! Euler operators: operations that split or join faces, vertices and loops
//! and their inverses.

use fxhash::FxHashSet;
use smallvec::SmallVec;
use tracing::trace;

use crate::{
    error::Error,
    handle::{HalfedgeHandle, VertexHandle},
};
use super::{reject, Decorator, HalfedgeList};


// ===============================================================================================
// ===== Faces
// ===============================================================================================

impl<P> Decorator<'_, P> {
    /// Splits the face of `h` and `g` by a new edge from `t(h)` to `t(g)`.
    ///
    /// The cycle through `h` keeps the old face, the cycle through `g` gets
    /// a new face. Returns the new halfedge, which follows `h`.
    ///
    /// ```text
    ///         g                         g
    ///   o <-------- o             o <-------- o
    ///   |           ^             | \ x'      ^
    ///   |           |     =>      |  \        |
    ///   v           |             v   v x     |
    ///   o --------> o             o --------> o
    ///         h                         h
    /// ```
    ///
    /// Preconditions: `h` is not a border halfedge, `g` is on the cycle of
    /// `h`, `h != g`, `n(h) != g` and `n(g) != h`.
    pub fn split_face(&mut self, h: HalfedgeHandle, g: HalfedgeHandle) -> Result<HalfedgeHandle, Error> {
        const OP: &str = "split_face";
        self.require_halfedge(OP, h)?;
        self.require_halfedge(OP, g)?;

        let f = match self.face(h) {
            Some(f) => f,
            None => return reject(OP, "`h` is a border halfedge"),
        };
        if h == g {
            return reject(OP, "`h` and `g` are the same halfedge");
        }
        if self.next(h) == g || self.next(g) == h {
            return reject(OP, "`h` and `g` are adjacent on their cycle");
        }
        if !self.halfedges_around_face(h).any(|x| x == g) {
            return reject(OP, "`g` is not on the cycle of `h`");
        }
        self.require_room(OP, 0, 1, 1)?;

        let (hn, gn) = (self.next(h), self.next(g));
        let (from, to) = (self.vertex(h), self.vertex(g));
        let x = self.edges_push_back(from, to);
        let xo = x.opposite();

        self.link(h, x);
        self.link(x, gn);
        self.link(g, xo);
        self.link(xo, hn);

        self.set_face(x, Some(f));
        self.set_face_halfedge(f, h);
        let new_face = self.faces_push_back(xo);
        self.set_cycle_face(xo, Some(new_face));

        trace!(?h, ?g, ?x, "split face");
        Ok(x)
    }

    /// Removes the edge of `h` and merges the faces on both of its sides.
    ///
    /// `face(h)` survives while `face(o(h))` (if it is not the border) is
    /// erased. Returns `p(h)`, thus `join_face(split_face(h, g)) == h`. If
    /// `h` is a loop edge that forms a cycle of its own, `p(o(h))` is
    /// returned instead.
    ///
    /// Rejected if both sides of the edge belong to the same face (or both
    /// to the border): that is the case for bridges, antennas and
    /// free-standing border edges, where removing the edge would disconnect
    /// the boundary of the face. Also rejected if both halves are cycles of
    /// their own, as nothing would be left of the merged face.
    pub fn join_face(&mut self, h: HalfedgeHandle) -> Result<HalfedgeHandle, Error> {
        const OP: &str = "join_face";
        self.require_halfedge(OP, h)?;

        let g = h.opposite();
        let (fh, fg) = (self.face(h), self.face(g));
        if fh == fg {
            return reject(OP, "both sides of the edge belong to the same face");
        }

        let (hp, gp) = (self.prev(h), self.prev(g));
        if hp == h && gp == g {
            return reject(OP, "both halves of the loop edge are cycles of their own");
        }
        let keep = if hp == h { gp } else { hp };

        self.set_cycle_face(g, fh);
        if let Some(fh) = fh {
            self.set_face_halfedge(fh, keep);
        }
        let isolated = self.unlink_edge(h);
        debug_assert!(isolated.is_empty());

        if let Some(fg) = fg {
            self.faces_erase(fg);
        }

        trace!(?h, "joined faces");
        Ok(keep)
    }

    /// Rotates the edge of `h` inside the quadrilateral formed by the two
    /// triangles adjacent to it. Returns `h`, which now connects the two
    /// vertices that were opposite of the edge.
    ///
    /// ```text
    ///            Before                |                After
    ///            ------                |                -----
    ///              [C]                 |                 [C]
    ///             /   ^                |                / ^ | ^
    ///           c/     \d              |              c/  | |  \d
    ///           /  (X)  \              |              /   | |   \
    ///          v    a    \             |             v (X)a| |b(Y) \
    ///       [A] --------> [B]          |          [A]     | |     [B]
    ///          \    b    ^             |             \    | |     ^
    ///          e\  (Y)  /f             |             e\   | v    /f
    ///            v     /               |               v       /
    ///              [D]                 |                 [D]
    /// ```
    ///
    /// Preconditions: both sides are triangles (not the border) and the
    /// vertices `C` and `D` differ.
    pub fn flip_edge(&mut self, h: HalfedgeHandle) -> Result<HalfedgeHandle, Error> {
        const OP: &str = "flip_edge";
        self.require_halfedge(OP, h)?;

        let a = h;
        let b = h.opposite();
        let (f_above, f_below) = match (self.face(a), self.face(b)) {
            (Some(x), Some(y)) => (x, y),
            _ => return reject(OP, "edge is a border edge"),
        };
        if f_above == f_below || self.cycle_len(a) != 3 || self.cycle_len(b) != 3 {
            return reject(OP, "edge is not between two distinct triangles");
        }

        let d = self.next(a);
        let c = self.next(d);
        let e = self.next(b);
        let f = self.next(e);

        let v_right = self.vertex(a);
        let v_left = self.vertex(b);
        let v_above = self.vertex(d);
        let v_below = self.vertex(e);
        if v_above == v_below {
            return reject(OP, "the two triangles share their third vertex");
        }

        // Anchors pointing to the flipped edge have to be moved.
        if self.vertex_halfedge(v_left) == Some(b) {
            self.set_vertex_halfedge(v_left, Some(c));
        }
        if self.vertex_halfedge(v_right) == Some(a) {
            self.set_vertex_halfedge(v_right, Some(f));
        }

        self.set_vertex(a, v_above);
        self.set_vertex(b, v_below);
        self.link(a, c);
        self.link(c, e);
        self.link(e, a);
        self.link(b, f);
        self.link(f, d);
        self.link(d, b);

        self.set_face(e, Some(f_above));
        self.set_face(d, Some(f_below));
        self.set_face_halfedge(f_above, a);
        self.set_face_halfedge(f_below, b);

        trace!(?h, "flipped edge");
        Ok(h)
    }
}


// ===============================================================================================
// ===== Vertices
// ===============================================================================================

impl<P: Clone> Decorator<'_, P> {
    /// Splits the vertex `v = t(h) = t(g)` into two vertices connected by a
    /// new edge.
    ///
    /// `v` keeps `h` and the part of its rotation from `g` (exclusive) up to
    /// `h`. The new vertex (with a copy of the point of `v`) receives the
    /// rotation from `o(n(h))` up to `g` (inclusive). Returns the new
    /// halfedge pointing from the new vertex to `v`.
    pub fn split_vertex(&mut self, h: HalfedgeHandle, g: HalfedgeHandle) -> Result<HalfedgeHandle, Error> {
        const OP: &str = "split_vertex";
        self.require_halfedge(OP, h)?;
        self.require_halfedge(OP, g)?;

        if h == g {
            return reject(OP, "`h` and `g` are the same halfedge");
        }
        let v = self.vertex(h);
        if self.vertex(g) != v {
            return reject(OP, "`h` and `g` do not point to the same vertex");
        }
        self.require_room(OP, 1, 1, 0)?;

        // Collect the part of the rotation that moves to the new vertex.
        let moved = {
            let mut out = HalfedgeList::new();
            let mut x = self.next(h).opposite();
            loop {
                out.push(x);
                if x == g {
                    break out;
                }
                x = self.next(x).opposite();
            }
        };

        let point = self.point(v).clone();
        let w = self.vertices_push_back(point);
        let a = self.edges_push_back(w, v);
        let ao = a.opposite();

        let (hn, gn) = (self.next(h), self.next(g));
        self.link(h, ao);
        self.link(ao, hn);
        self.link(g, a);
        self.link(a, gn);

        let (fh, fg) = (self.face(h), self.face(g));
        self.set_face(ao, fh);
        self.set_face(a, fg);
        self.retarget(&moved, w);

        self.set_vertex_halfedge(w, Some(ao));
        self.set_vertex_halfedge(v, Some(a));

        trace!(?h, ?g, ?a, "split vertex");
        Ok(a)
    }

    /// Inserts a new vertex (with a copy of the point of `s(h)`) on the edge
    /// of `h`. Returns the new halfedge `x` with `n(x) == h`, which points
    /// to the new vertex.
    ///
    /// ```text
    ///             h                          x          h
    ///   (u) -----------> (v)   =>   (u) -------> (w) -------> (v)
    ///       <-----------                <-------     <-------
    ///             g                         x'          g
    /// ```
    pub fn split_edge(&mut self, h: HalfedgeHandle) -> Result<HalfedgeHandle, Error> {
        const OP: &str = "split_edge";
        self.require_halfedge(OP, h)?;
        self.require_room(OP, 1, 1, 0)?;

        let g = h.opposite();
        let u = self.vertex(g);
        let (hp, gn) = (self.prev(h), self.next(g));

        let point = self.point(u).clone();
        let w = self.vertices_push_back(point);
        let x = self.edges_push_back(u, w);
        let xo = x.opposite();

        if hp == g {
            // `u` only has this edge: g -> h becomes g -> x' -> x -> h.
            self.link(g, xo);
            self.link(xo, x);
            self.link(x, h);
        } else {
            self.link(hp, x);
            self.link(x, h);
            self.link(g, xo);
            self.link(xo, gn);
        }
        self.set_vertex(g, w);

        let (fh, fg) = (self.face(h), self.face(g));
        self.set_face(x, fh);
        self.set_face(xo, fg);

        if self.vertex_halfedge(u) == Some(g) {
            self.set_vertex_halfedge(u, Some(xo));
        }
        self.set_vertex_halfedge(w, Some(x));

        trace!(?h, ?x, "split edge");
        Ok(x)
    }
}

impl<P> Decorator<'_, P> {
    /// Contracts the edge of `h`: the edge and the vertex `s(h)` are removed,
    /// all halfedges pointing to `s(h)` point to `t(h)` afterwards.
    ///
    /// Returns `p(o(h))`, thus `join_vertex(split_vertex(h, g)) == h`.
    /// Rejected for loops and antennas.
    pub fn join_vertex(&mut self, h: HalfedgeHandle) -> Result<HalfedgeHandle, Error> {
        const OP: &str = "join_vertex";
        self.require_halfedge(OP, h)?;

        let g = h.opposite();
        let (v, w) = (self.vertex(h), self.vertex(g));
        if v == w {
            return reject(OP, "edge is a loop");
        }
        let (hp, hn, gp, gn) = (self.prev(h), self.next(h), self.prev(g), self.next(g));
        if hn == g || gn == h {
            return reject(OP, "edge is an antenna");
        }

        let moved = self.rotation(g).into_iter()
            .filter(|&x| x != g)
            .collect::<HalfedgeList>();
        self.retarget(&moved, v);

        self.link(hp, hn);
        self.link(gp, gn);

        if let Some(f) = self.face(h) {
            if self.face_halfedge(f) == h {
                self.set_face_halfedge(f, hp);
            }
        }
        if let Some(f) = self.face(g) {
            if self.face_halfedge(f) == g {
                self.set_face_halfedge(f, gp);
            }
        }
        if self.vertex_halfedge(v) == Some(h) {
            self.set_vertex_halfedge(v, Some(hp));
        }

        self.vertices_erase(w);
        self.edges_erase(h);

        trace!(?h, "joined vertices");
        Ok(gp)
    }
}


// ===============================================================================================
// ===== Center vertex
// ===============================================================================================

impl<P: Clone> Decorator<'_, P> {
    /// Triangulates the face of `h` by a new vertex connected to every vertex
    /// of the face. The point of the new vertex is a copy of the point of
    /// `t(h)`.
    ///
    /// The triangle containing `h` keeps the old face. Returns the new spoke
    /// `n(h)`, which points to the new vertex.
    pub fn create_center_vertex(&mut self, h: HalfedgeHandle) -> Result<HalfedgeHandle, Error> {
        const OP: &str = "create_center_vertex";
        self.require_halfedge(OP, h)?;

        let f = match self.face(h) {
            Some(f) => f,
            None => return reject(OP, "`h` is a border halfedge"),
        };
        let cycle = self.cycle(h);
        let n = cycle.len();
        self.require_room(OP, 1, n, n - 1)?;

        let point = self.point(self.vertex(h)).clone();
        let w = self.vertices_push_back(point);
        let spokes = cycle.iter()
            .map(|&c| {
                let from = self.vertex(c);
                self.edges_push_back(from, w)
            })
            .collect::<HalfedgeList>();

        // Triangle `k` is `c_k -> s_k -> o(s_{k-1}) -> c_k`.
        for k in 0..n {
            let c = cycle[k];
            let s = spokes[k];
            let back = spokes[(k + n - 1) % n].opposite();

            self.link(c, s);
            self.link(s, back);
            self.link(back, c);

            let face = if k == 0 { f } else { self.faces_push_back(c) };
            self.set_face(c, Some(face));
            self.set_face(s, Some(face));
            self.set_face(back, Some(face));
        }
        self.set_face_halfedge(f, h);
        self.set_vertex_halfedge(w, Some(spokes[0]));

        trace!(?h, degree = n, "created center vertex");
        Ok(spokes[0])
    }
}

impl<P> Decorator<'_, P> {
    /// Removes the vertex `t(g)` with all its edges and merges all faces
    /// around it into `face(g)`. Returns `p(g)`, thus
    /// `erase_center_vertex(create_center_vertex(h)) == h`.
    ///
    /// Preconditions: no face around the vertex is the border, each face
    /// appears only once around it, there are no loops and no other spoke
    /// than the two neighboring ones on any of the faces.
    pub fn erase_center_vertex(&mut self, g: HalfedgeHandle) -> Result<HalfedgeHandle, Error> {
        const OP: &str = "erase_center_vertex";
        self.require_halfedge(OP, g)?;

        let v = self.vertex(g);
        let f = match self.face(g) {
            Some(f) => f,
            None => return reject(OP, "`g` is a border halfedge"),
        };

        let spokes = self.rotation(g);
        let spoke_edges = spokes.iter().map(|s| s.edge()).collect::<FxHashSet<_>>();
        let mut faces = FxHashSet::default();
        let mut joints = SmallVec::<[(HalfedgeHandle, HalfedgeHandle); 8]>::new();
        for &r in &spokes {
            let face = match self.face(r) {
                Some(face) => face,
                None => return reject(OP, "a face around the vertex is the border"),
            };
            if !faces.insert(face) {
                return reject(OP, "a face appears twice around the vertex");
            }
            if self.vertex(r.opposite()) == v {
                return reject(OP, "the vertex has a loop");
            }

            let x = self.prev(r);
            let y = self.next(r.opposite());
            if spoke_edges.contains(&x.edge()) || spoke_edges.contains(&y.edge()) {
                return reject(OP, "a face around the vertex has no edge apart from spokes");
            }
            joints.push((x, y));
        }

        // Everything is checked, now the mutation.
        for &face in &faces {
            if face != f {
                let anchor = self.face_halfedge(face);
                self.set_cycle_face(anchor, Some(f));
                self.faces_erase(face);
            }
        }
        for (&r, &(x, _)) in spokes.iter().zip(&joints) {
            let u = self.vertex(r.opposite());
            if self.vertex_halfedge(u) == Some(r.opposite()) {
                self.set_vertex_halfedge(u, Some(x));
            }
        }
        for &(x, y) in &joints {
            self.link(x, y);
        }

        let result = joints[0].0;
        self.set_face_halfedge(f, result);
        for &r in &spokes {
            self.edges_erase(r);
        }
        self.vertices_erase(v);

        trace!(?g, degree = spokes.len(), "erased center vertex");
        Ok(result)
    }
}


// ===============================================================================================
// ===== Loops
// ===============================================================================================

/// The three halfedges of a triangle loop plus their replacements.
struct LoopCut {
    cycle: [HalfedgeHandle; 3],
    copies: [HalfedgeHandle; 3],
}

impl LoopCut {
    /// Maps the opposite halfedges of the cycle to their copies.
    fn replace(&self, x: HalfedgeHandle) -> HalfedgeHandle {
        self.cycle.iter()
            .position(|c| c.opposite() == x)
            .map(|i| self.copies[i])
            .unwrap_or(x)
    }
}

impl<P: Clone> Decorator<'_, P> {
    /// Cuts the surface along the closed loop of edges `h -> i -> j`.
    ///
    /// The side on which `h`, `i` and `j` lie keeps the three vertices. The
    /// other side gets copies of them and new edges replacing the opposites
    /// of `h`, `i` and `j`. Both cuts are closed with a new triangle: one
    /// formed by `o(h)`, `o(j)` and `o(i)`, the other formed by the opposites
    /// of the new edges. Returns the halfedge of the second triangle that
    /// corresponds to `h`. Thus `join_loop(o(h), split_loop(h, i, j))`
    /// glues the surface back together.
    ///
    /// Preconditions: the three halfedges form a cycle over three distinct
    /// vertices and all six faces on both sides are distinct (no border).
    pub fn split_loop(
        &mut self,
        h: HalfedgeHandle,
        i: HalfedgeHandle,
        j: HalfedgeHandle,
    ) -> Result<HalfedgeHandle, Error> {
        const OP: &str = "split_loop";
        let cycle = [h, i, j];
        for &x in &cycle {
            self.require_halfedge(OP, x)?;
        }

        for k in 0..3 {
            if self.vertex(cycle[k]) != self.source(cycle[(k + 1) % 3]) {
                return reject(OP, "`h`, `i` and `j` do not form a cycle");
            }
        }
        let corners = [self.vertex(j), self.vertex(h), self.vertex(i)];
        if corners[0] == corners[1] || corners[1] == corners[2] || corners[0] == corners[2] {
            return reject(OP, "the cycle does not have three distinct vertices");
        }

        let mut faces = FxHashSet::default();
        for &x in &cycle {
            for &y in &[x, x.opposite()] {
                match self.face(y) {
                    None => return reject(OP, "an edge of the cycle is a border edge"),
                    Some(f) if !faces.insert(f) => {
                        return reject(OP, "the faces around the cycle are not distinct");
                    }
                    Some(_) => {}
                }
            }
        }
        self.require_room(OP, 3, 3, 2)?;

        // The wedge of the other side at `t(cycle[k])`: the rotation from
        // `o(cycle[k + 1])` up to `cycle[k]` (exclusive).
        let wedges = (0..3).map(|k| {
            let stop = cycle[k];
            let mut out = HalfedgeList::new();
            let mut x = self.next(cycle[(k + 1) % 3].opposite()).opposite();
            while x != stop {
                out.push(x);
                x = self.next(x).opposite();
            }
            out
        }).collect::<SmallVec<[_; 3]>>();

        // New vertices: `copies_v[k]` is the copy of `t(cycle[k])`.
        let copies_v = (0..3).map(|k| {
            let point = self.point(self.vertex(cycle[k])).clone();
            self.vertices_push_back(point)
        }).collect::<SmallVec<[VertexHandle; 3]>>();

        // The copy of `o(cycle[k])` goes from the copy of `t(cycle[k])` to
        // the copy of `s(cycle[k])`.
        let copies = [
            self.edges_push_back(copies_v[0], copies_v[2]),
            self.edges_push_back(copies_v[1], copies_v[0]),
            self.edges_push_back(copies_v[2], copies_v[1]),
        ];
        let cut = LoopCut { cycle, copies };

        // Let the copies take over the role of the opposite halfedges.
        let links = (0..3).map(|k| {
            let o = cycle[k].opposite();
            (cut.replace(self.prev(o)), copies[k], cut.replace(self.next(o)), self.face(o), o)
        }).collect::<SmallVec<[_; 3]>>();
        for &(prev, copy, next, face, replaced) in &links {
            self.link(prev, copy);
            self.link(copy, next);
            self.set_face(copy, face);
            if let Some(face) = face {
                if self.face_halfedge(face) == replaced {
                    self.set_face_halfedge(face, copy);
                }
            }
        }
        for k in 0..3 {
            self.retarget(&wedges[k], copies_v[k]);
            self.set_vertex_halfedge(copies_v[k], Some(copies[(k + 1) % 3]));

            let v = self.vertex(cycle[k]);
            self.set_vertex_halfedge(v, Some(cycle[k]));
        }

        // Close the side of the original vertices: o(h) -> o(j) -> o(i).
        let [ho, io, jo] = [h.opposite(), i.opposite(), j.opposite()];
        self.link(ho, jo);
        self.link(jo, io);
        self.link(io, ho);
        let t1 = self.faces_push_back(ho);
        self.set_cycle_face(ho, Some(t1));

        // Close the side of the copies.
        let [ch, ci, cj] = [copies[0].opposite(), copies[1].opposite(), copies[2].opposite()];
        self.link(ch, ci);
        self.link(ci, cj);
        self.link(cj, ch);
        let t2 = self.faces_push_back(ch);
        self.set_cycle_face(ch, Some(t2));

        trace!(?h, ?i, ?j, "split loop");
        Ok(ch)
    }
}

impl<P> Decorator<'_, P> {
    /// Glues the boundaries of the faces of `h` and `g` together and removes
    /// both faces. `h` and `g` have to be antiparallel after gluing: `s(h)`
    /// is identified with `t(g)`. The vertices and edges of the face of `g`
    /// are removed. Returns `h`.
    ///
    /// Preconditions: the faces are distinct, not the border, have the same
    /// degree and do not share a vertex; each of them visits every vertex
    /// only once.
    pub fn join_loop(&mut self, h: HalfedgeHandle, g: HalfedgeHandle) -> Result<HalfedgeHandle, Error> {
        const OP: &str = "join_loop";
        self.require_halfedge(OP, h)?;
        self.require_halfedge(OP, g)?;

        let (fh, fg) = match (self.face(h), self.face(g)) {
            (Some(fh), Some(fg)) => (fh, fg),
            _ => return reject(OP, "`h` or `g` is a border halfedge"),
        };
        if fh == fg {
            return reject(OP, "`h` and `g` belong to the same face");
        }

        let hs = self.cycle(h);
        let gs = {
            let mut out = HalfedgeList::new();
            let mut x = g;
            for _ in 0..hs.len() {
                out.push(x);
                x = self.prev(x);
            }
            out
        };
        if self.cycle_len(g) != hs.len() {
            return reject(OP, "the faces have different degrees");
        }

        let hv = hs.iter().map(|&x| self.vertex(x)).collect::<FxHashSet<_>>();
        let gv = gs.iter().map(|&x| self.vertex(x)).collect::<FxHashSet<_>>();
        if hv.len() != hs.len() || gv.len() != gs.len() {
            return reject(OP, "a face visits a vertex twice");
        }
        if !hv.is_disjoint(&gv) {
            return reject(OP, "the faces share a vertex");
        }

        // Pairs `(h_k, g_k)` with `h_k = n^k(h)` and `g_k = p^k(g)`. `h_k`
        // takes over the role of `o(g_k)`, `t(g_k)` merges into `s(h_k)`.
        let doomed_opp = gs.iter().map(|g| g.opposite()).collect::<HalfedgeList>();
        let replace = |x: HalfedgeHandle| {
            doomed_opp.iter().position(|&o| o == x).map(|k| hs[k]).unwrap_or(x)
        };

        let links = (0..hs.len()).map(|k| {
            let o = doomed_opp[k];
            (replace(self.prev(o)), hs[k], replace(self.next(o)), self.face(o), o)
        }).collect::<SmallVec<[_; 8]>>();
        let merges = (0..hs.len()).map(|k| {
            let incoming = self.rotation(gs[k]).into_iter()
                .filter(|x| !doomed_opp.contains(x) && !gs.contains(x))
                .collect::<HalfedgeList>();
            (incoming, self.vertex(gs[k]), self.source(hs[k]))
        }).collect::<SmallVec<[_; 8]>>();

        for (incoming, _, keep) in &merges {
            self.retarget(incoming, *keep);
        }
        for &(prev, x, next, face, replaced) in &links {
            self.link(prev, x);
            self.link(x, next);
            self.set_face(x, face);
            if let Some(face) = face {
                if self.face_halfedge(face) == replaced {
                    self.set_face_halfedge(face, x);
                }
            }
        }
        // Anchors of the kept vertices are not affected: nothing pointing
        // to them is erased.
        for (_, gone, _) in &merges {
            self.vertices_erase(*gone);
        }
        for &x in &gs {
            self.edges_erase(x);
        }
        self.faces_erase(fh);
        self.faces_erase(fg);

        trace!(?h, ?g, "joined loop");
        Ok(h)
    }
}
