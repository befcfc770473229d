//! Connected components: labeling, counting and removal.

use fxhash::FxHashSet;
use tracing::debug;

use crate::{
    error::Error,
    handle::{FaceHandle, HalfedgeHandle, VertexHandle},
    hds::HalfedgeDS,
};
use super::{ConstDecorator, Decorator};


/// All elements of one connected component.
#[derive(Debug, Default)]
pub(crate) struct Component {
    pub(crate) vertices: Vec<VertexHandle>,
    pub(crate) halfedges: Vec<HalfedgeHandle>,
    pub(crate) faces: Vec<FaceHandle>,
}

impl Component {
    /// Number of elements (vertices, halfedges and faces) of the component.
    pub(crate) fn size(&self) -> usize {
        self.vertices.len() + self.halfedges.len() + self.faces.len()
    }
}

impl<P> HalfedgeDS<P> {
    /// Collects the component of `start` by flood filling over `next`, `prev`
    /// and `opposite`. Marks everything it reaches in `visited`.
    pub(crate) fn flood_component(
        &self,
        start: HalfedgeHandle,
        visited: &mut FxHashSet<HalfedgeHandle>,
    ) -> Component {
        let mut out = Component::default();
        let mut seen_vertices = FxHashSet::default();
        let mut seen_faces = FxHashSet::default();

        let mut stack = vec![start];
        visited.insert(start);
        while let Some(h) = stack.pop() {
            out.halfedges.push(h);

            let v = self.vertex(h);
            if seen_vertices.insert(v) {
                out.vertices.push(v);
            }
            if let Some(f) = self.face(h) {
                if seen_faces.insert(f) {
                    out.faces.push(f);
                }
            }

            for &n in &[self.next(h), self.prev(h), h.opposite()] {
                if visited.insert(n) {
                    stack.push(n);
                }
            }
        }

        out
    }

    /// Labels all connected components. Components are discovered in the
    /// container order of the halfedges, followed by one component per
    /// isolated vertex (in vertex order).
    pub(crate) fn components(&self) -> Vec<Component> {
        let mut visited = FxHashSet::default();
        let mut out = Vec::new();

        for h in self.halfedges() {
            if !visited.contains(&h) {
                out.push(self.flood_component(h, &mut visited));
            }
        }
        for v in self.vertices() {
            if self.vertex_halfedge(v).is_none() {
                out.push(Component {
                    vertices: vec![v],
                    .. Component::default()
                });
            }
        }

        out
    }

    fn erase_component(&mut self, component: &Component) {
        for &f in &component.faces {
            self.faces_erase(f);
        }
        for &h in &component.halfedges {
            // Both halves are in the component, the second call is a no-op.
            self.edges_erase(h);
        }
        for &v in &component.vertices {
            self.vertices_erase(v);
        }
    }
}

impl<P> ConstDecorator<'_, P> {
    /// Number of connected components, counting isolated vertices as
    /// components of their own.
    pub fn count_connected_components(&self) -> usize {
        self.components().len()
    }
}

impl<P> Decorator<'_, P> {
    /// Erases all vertices, edges and faces connected to `h`.
    pub fn erase_connected_component(&mut self, h: HalfedgeHandle) -> Result<(), Error> {
        self.require_halfedge("erase_connected_component", h)?;

        let component = self.flood_component(h, &mut FxHashSet::default());
        debug!(
            ?h,
            vertices = component.vertices.len(),
            halfedges = component.halfedges.len(),
            faces = component.faces.len(),
            "erasing connected component",
        );
        self.erase_component(&component);

        Ok(())
    }

    /// Keeps the `k` largest connected components and erases all others.
    /// Returns the number of erased components.
    ///
    /// The size of a component is its number of vertices, halfedges and
    /// faces. Components of equal size are ordered by discovery (see
    /// `count_connected_components`), so the result is deterministic.
    pub fn keep_largest_connected_components(&mut self, k: usize) -> usize {
        let mut components = self.components();

        // Stable sort: ties keep the discovery order.
        components.sort_by(|a, b| b.size().cmp(&a.size()));

        let doomed = components.get(k..).unwrap_or(&[]);
        for component in doomed {
            self.erase_component(component);
        }

        debug!(kept = components.len() - doomed.len(), erased = doomed.len(), "pruned components");
        doomed.len()
    }
}
