//! Border normalization: moving all border edges to the end of the edge
//! order.

use tracing::debug;

use crate::handle::EdgeHandle;
use super::{
    iter::{BorderEdges, BorderHalfedges, Edges, Halfedges},
    BorderCache, HalfedgeDS,
};


impl<P> HalfedgeDS<P> {
    /// Reorders the edges such that all border edges (edges with at least
    /// one border halfedge) form one block at the end of the container order.
    ///
    /// The partition is stable: non-border and border edges each keep their
    /// relative order. Therefore, calling this twice yields the same order as
    /// calling it once. Handles are not changed. Runs in O(number of edges).
    ///
    /// Afterwards `size_of_border_halfedges`, `size_of_border_edges` and the
    /// border iterators reflect the current state, until the next edit.
    pub fn normalize_border(&mut self) {
        let border = self.edges.handles()
            .filter(|e| self.is_border_edge(e.halfedge()))
            .collect::<Vec<_>>();

        let mut halfedges = 0;
        for &e in &border {
            let [lower, upper] = e.halfedges();
            halfedges += self.is_border(lower) as usize + self.is_border(upper) as usize;
            self.edges.move_to_back(e);
        }

        self.border = BorderCache {
            first_edge: border.first().cloned().into(),
            halfedges,
            edges: border.len(),
        };
        debug!(
            border_edges = self.border.edges,
            border_halfedges = self.border.halfedges,
            "normalized border",
        );
    }

    /// Number of border halfedges, as computed by the last
    /// `normalize_border`. O(1).
    pub fn size_of_border_halfedges(&self) -> usize {
        self.border.halfedges
    }

    /// Number of edges with at least one border halfedge, as computed by the
    /// last `normalize_border`. O(1).
    pub fn size_of_border_edges(&self) -> usize {
        self.border.edges
    }

    /// The first edge of the border block, if any.
    pub fn first_border_edge(&self) -> Option<EdgeHandle> {
        self.border.first_edge.into_option()
    }

    /// All border halfedges of the border block.
    ///
    /// Only meaningful directly after `normalize_border`.
    pub fn border_halfedges(&self) -> BorderHalfedges<'_, P> {
        BorderHalfedges {
            hds: self,
            edges: self.edges.handles_from(self.first_border_edge()),
            upper: None,
        }
    }

    /// All edges of the border block.
    ///
    /// Only meaningful directly after `normalize_border`.
    pub fn border_edges(&self) -> BorderEdges<'_> {
        BorderEdges {
            edges: self.edges.handles_from(self.first_border_edge()),
        }
    }

    /// Every edge in front of the border block, i.e. every edge without
    /// border halfedge.
    ///
    /// Only meaningful directly after `normalize_border`. Without border
    /// block, these are all edges.
    pub fn non_border_edges(&self) -> Edges<'_> {
        Edges::new(self.edges.handles(), self.first_border_edge())
    }

    /// Both halfedges of every edge in front of the border block, i.e. of
    /// every edge without border halfedge.
    ///
    /// Only meaningful directly after `normalize_border`. Without border
    /// block, these are all halfedges.
    pub fn non_border_halfedges(&self) -> Halfedges<'_> {
        Halfedges::new(self.edges.handles(), self.first_border_edge())
    }
}
