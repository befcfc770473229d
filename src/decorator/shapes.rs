//! Predicates about the shape of the whole structure or of one component.

use fxhash::FxHashSet;

use crate::handle::HalfedgeHandle;
use super::ConstDecorator;


impl<P> ConstDecorator<'_, P> {
    /// No border halfedges at all.
    pub fn is_closed(&self) -> bool {
        self.halfedges().all(|h| !self.is_border(h))
    }

    /// Every vertex has degree 2.
    pub fn is_pure_bivalent(&self) -> bool {
        self.vertices().all(|v| self.vertex_degree(v) == 2)
    }

    /// Every vertex has degree 3.
    pub fn is_pure_trivalent(&self) -> bool {
        self.vertices().all(|v| self.vertex_degree(v) == 3)
    }

    /// Every face is a triangle. Border cycles are not considered.
    pub fn is_pure_triangle(&self) -> bool {
        self.faces().all(|f| self.face_degree(f) == 3)
    }

    /// Every face is a quad. Border cycles are not considered.
    pub fn is_pure_quad(&self) -> bool {
        self.faces().all(|f| self.face_degree(f) == 4)
    }

    /// Whether the component of `h` is an isolated triangle: three vertices,
    /// three edges, one face on one side and border on the other.
    pub fn is_triangle(&self, h: HalfedgeHandle) -> bool {
        if !self.contains_halfedge(h) {
            return false;
        }

        let component = self.flood_component(h, &mut FxHashSet::default());
        component.vertices.len() == 3
            && component.halfedges.len() == 6
            && component.faces.len() == 1
            && component.halfedges.iter().all(|&x| self.cycle_len(x) == 3)
            && component.halfedges.iter().filter(|&&x| self.is_border(x)).count() == 3
    }

    /// Whether the component of `h` is a closed tetrahedron: four vertices of
    /// degree 3, six edges and four triangles.
    pub fn is_tetrahedron(&self, h: HalfedgeHandle) -> bool {
        if !self.contains_halfedge(h) {
            return false;
        }

        let component = self.flood_component(h, &mut FxHashSet::default());
        component.vertices.len() == 4
            && component.halfedges.len() == 12
            && component.faces.len() == 4
            && component.halfedges.iter().all(|&x| !self.is_border(x))
            && component.faces.iter().all(|&f| self.face_degree(f) == 3)
            && component.vertices.iter().all(|&v| self.vertex_degree(v) == 3)
    }
}
