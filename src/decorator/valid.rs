//! Validity checks.
//!
//! These never panic, not even on a completely broken structure: all reads go
//! through accessors that tolerate dead handles.

use derive_more::Display;
use fxhash::{FxHashMap, FxHashSet};
use tracing::warn;

use crate::handle::{EdgeHandle, FaceHandle, HalfedgeHandle, VertexHandle};
use super::ConstDecorator;


/// One violated invariant found by [`ConstDecorator::check`] or
/// [`ConstDecorator::check_normalized_border`].
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Violation {
    // ----- Level 0 ------------------------------------------------------------------------------
    #[display(fmt = "`next` of {:?} is the dead halfedge {:?}", halfedge, next)]
    DeadNext {
        halfedge: HalfedgeHandle,
        next: HalfedgeHandle,
    },

    #[display(fmt = "`prev` of {:?} is the dead halfedge {:?}", halfedge, prev)]
    DeadPrev {
        halfedge: HalfedgeHandle,
        prev: HalfedgeHandle,
    },

    #[display(fmt = "`prev(next({:?}))` is {:?}", halfedge, found)]
    PrevNotInverse {
        halfedge: HalfedgeHandle,
        found: HalfedgeHandle,
    },

    #[display(fmt = "{:?} points to the dead vertex {:?}", halfedge, vertex)]
    DeadVertex {
        halfedge: HalfedgeHandle,
        vertex: VertexHandle,
    },

    #[display(fmt = "{:?} belongs to the dead face {:?}", halfedge, face)]
    DeadFace {
        halfedge: HalfedgeHandle,
        face: FaceHandle,
    },

    #[display(fmt = "odd number of halfedges ({})", _0)]
    OddHalfedgeCount(usize),

    // ----- Level 1 ------------------------------------------------------------------------------
    #[display(fmt = "anchor {:?} of {:?} is dead", halfedge, vertex)]
    DeadVertexAnchor {
        vertex: VertexHandle,
        halfedge: HalfedgeHandle,
    },

    #[display(fmt = "anchor {:?} of {:?} does not point to it", halfedge, vertex)]
    VertexAnchorMismatch {
        vertex: VertexHandle,
        halfedge: HalfedgeHandle,
    },

    #[display(fmt = "anchor {:?} of {:?} is dead", halfedge, face)]
    DeadFaceAnchor {
        face: FaceHandle,
        halfedge: HalfedgeHandle,
    },

    #[display(fmt = "anchor {:?} of {:?} belongs to another face", halfedge, face)]
    FaceAnchorMismatch {
        face: FaceHandle,
        halfedge: HalfedgeHandle,
    },

    // ----- Level 2 ------------------------------------------------------------------------------
    #[display(fmt = "rotation around {:?} reaches {:?}, which points elsewhere", vertex, halfedge)]
    RotationLeavesVertex {
        vertex: VertexHandle,
        halfedge: HalfedgeHandle,
    },

    #[display(
        fmt = "rotation around {:?} covers {} of the {} halfedges pointing to it",
        vertex,
        found,
        expected
    )]
    IncompleteRotation {
        vertex: VertexHandle,
        expected: usize,
        found: usize,
    },

    // ----- Level 3 ------------------------------------------------------------------------------
    #[display(fmt = "cycle of {:?} contains {:?}, which belongs to another face", face, halfedge)]
    FaceCycleMismatch {
        face: FaceHandle,
        halfedge: HalfedgeHandle,
    },

    #[display(fmt = "{:?} claims {:?}, but is not on its cycle", halfedge, face)]
    StrayHalfedge {
        halfedge: HalfedgeHandle,
        face: FaceHandle,
    },

    // ----- Border normalization -----------------------------------------------------------------
    #[display(fmt = "border block starts at {:?}, but the cached start is {:?}", found, cached)]
    BorderStartMismatch {
        found: Option<EdgeHandle>,
        cached: Option<EdgeHandle>,
    },

    #[display(fmt = "non-border edge {:?} inside the border block", _0)]
    BorderBlockInterrupted(EdgeHandle),

    #[display(
        fmt = "border counts are {}/{} (halfedges/edges), but {}/{} are cached",
        halfedges,
        edges,
        cached_halfedges,
        cached_edges
    )]
    BorderCountMismatch {
        halfedges: usize,
        edges: usize,
        cached_halfedges: usize,
        cached_edges: usize,
    },
}


impl<P> ConstDecorator<'_, P> {
    /// Checks the invariants of the data structure up to the given level:
    ///
    /// - 0: every `next`, `prev`, `vertex` and `face` reference is alive,
    ///   `prev` is the inverse of `next` and the number of halfedges is even.
    ///   As `next` is then a permutation, every cycle closes.
    /// - 1: vertex and face anchors are alive and refer back to their
    ///   element.
    /// - 2: the rotation around every vertex covers all halfedges pointing
    ///   to it.
    /// - 3: every face cycle consists of halfedges of that face only and
    ///   every halfedge of a face lies on the cycle of the face.
    ///
    /// Higher levels are only checked if all lower levels pass. Levels above
    /// 3 are the same as 3.
    pub fn check(&self, level: usize) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();

        self.check_structure(&mut violations);
        if level >= 1 && violations.is_empty() {
            self.check_anchors(&mut violations);
        }
        if level >= 2 && violations.is_empty() {
            self.check_rotations(&mut violations);
        }
        if level >= 3 && violations.is_empty() {
            self.check_faces(&mut violations);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Boolean version of [`check`][ConstDecorator::check]. If `verbose` is
    /// set, every violation is logged as warning.
    pub fn is_valid(&self, verbose: bool, level: usize) -> bool {
        report(self.check(level), verbose)
    }

    /// Checks that the border edges form one block at the end of the edge
    /// order and that the cached border counts are correct. Only meaningful
    /// directly after `normalize_border`.
    pub fn check_normalized_border(&self) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();
        let mut start = None;
        let mut halfedges = 0;
        let mut edges = 0;

        for e in self.edges() {
            let [lower, upper] = e.halfedges();
            let border = self.is_border(lower) as usize + self.is_border(upper) as usize;

            match (start, border) {
                (None, 0) => {}
                (None, _) => start = Some(e),
                (Some(_), 0) => violations.push(Violation::BorderBlockInterrupted(e)),
                (Some(_), _) => {}
            }
            if border > 0 {
                halfedges += border;
                edges += 1;
            }
        }

        let cached = self.first_border_edge();
        if start != cached {
            violations.push(Violation::BorderStartMismatch { found: start, cached });
        }
        if halfedges != self.size_of_border_halfedges() || edges != self.size_of_border_edges() {
            violations.push(Violation::BorderCountMismatch {
                halfedges,
                edges,
                cached_halfedges: self.size_of_border_halfedges(),
                cached_edges: self.size_of_border_edges(),
            });
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Boolean version of `check_normalized_border`.
    pub fn normalized_border_is_valid(&self, verbose: bool) -> bool {
        report(self.check_normalized_border(), verbose)
    }


    fn check_structure(&self, out: &mut Vec<Violation>) {
        if self.size_of_halfedges() % 2 != 0 {
            out.push(Violation::OddHalfedgeCount(self.size_of_halfedges()));
        }

        for h in self.halfedges() {
            let rec = match self.try_he(h) {
                Some(rec) => rec,
                None => continue,
            };

            match self.try_he(rec.next) {
                None => out.push(Violation::DeadNext { halfedge: h, next: rec.next }),
                Some(next) if next.prev != h => {
                    out.push(Violation::PrevNotInverse { halfedge: h, found: next.prev });
                }
                Some(_) => {}
            }
            if !self.contains_halfedge(rec.prev) {
                out.push(Violation::DeadPrev { halfedge: h, prev: rec.prev });
            }
            if !self.contains_vertex(rec.vertex) {
                out.push(Violation::DeadVertex { halfedge: h, vertex: rec.vertex });
            }
            if let Some(face) = rec.face.into_option() {
                if !self.contains_face(face) {
                    out.push(Violation::DeadFace { halfedge: h, face });
                }
            }
        }
    }

    fn check_anchors(&self, out: &mut Vec<Violation>) {
        for v in self.vertices() {
            let anchor = self.try_vertex_record(v).and_then(|rec| rec.halfedge.into_option());
            if let Some(halfedge) = anchor {
                match self.try_he(halfedge) {
                    None => out.push(Violation::DeadVertexAnchor { vertex: v, halfedge }),
                    Some(rec) if rec.vertex != v => {
                        out.push(Violation::VertexAnchorMismatch { vertex: v, halfedge });
                    }
                    Some(_) => {}
                }
            }
        }

        for f in self.faces() {
            let halfedge = match self.try_face_record(f) {
                Some(rec) => rec.halfedge,
                None => continue,
            };
            match self.try_he(halfedge) {
                None => out.push(Violation::DeadFaceAnchor { face: f, halfedge }),
                Some(rec) if rec.face.into_option() != Some(f) => {
                    out.push(Violation::FaceAnchorMismatch { face: f, halfedge });
                }
                Some(_) => {}
            }
        }
    }

    /// Requires levels 0 and 1 to pass.
    fn check_rotations(&self, out: &mut Vec<Violation>) {
        let mut incoming = FxHashMap::<VertexHandle, usize>::default();
        for h in self.halfedges() {
            *incoming.entry(self.vertex(h)).or_insert(0) += 1;
        }

        for v in self.vertices() {
            let expected = incoming.get(&v).cloned().unwrap_or(0);
            let mut found = 0;

            if let Some(anchor) = self.vertex_halfedge(v) {
                let mut x = anchor;
                loop {
                    if self.vertex(x) != v {
                        out.push(Violation::RotationLeavesVertex { vertex: v, halfedge: x });
                        break;
                    }
                    found += 1;

                    x = self.next(x).opposite();
                    if x == anchor || found > expected {
                        break;
                    }
                }
            }

            if found != expected {
                out.push(Violation::IncompleteRotation { vertex: v, expected, found });
            }
        }
    }

    /// Requires levels 0 and 1 to pass.
    fn check_faces(&self, out: &mut Vec<Violation>) {
        let mut visited = FxHashSet::default();

        for f in self.faces() {
            for x in self.halfedges_around_face(self.face_halfedge(f)) {
                visited.insert(x);
                if self.face(x) != Some(f) {
                    out.push(Violation::FaceCycleMismatch { face: f, halfedge: x });
                }
            }
        }

        for h in self.halfedges() {
            if let Some(face) = self.face(h) {
                if !visited.contains(&h) {
                    out.push(Violation::StrayHalfedge { halfedge: h, face });
                }
            }
        }
    }
}

fn report(result: Result<(), Vec<Violation>>, verbose: bool) -> bool {
    match result {
        Ok(()) => true,
        Err(violations) => {
            if verbose {
                for v in &violations {
                    warn!("{}", v);
                }
            }
            false
        }
    }
}
