//! Building a [`HalfedgeDS`] from outside: the [`Modifier`] trait used by
//! [`HalfedgeDS::delegate`] and the [`FacetBuilder`] modifier.

use fxhash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::{
    error::{BuildError, Error},
    handle::{FaceHandle, HalfedgeHandle, VertexHandle},
    hds::HalfedgeDS,
};


/// Something that builds or edits a [`HalfedgeDS`] by working with the raw
/// container operations directly. Run via [`HalfedgeDS::delegate`], which
/// makes sure a failing or misbehaving modifier leaves no trace.
///
/// Implemented for closures as well:
///
/// ```
/// use hedra::{HalfedgeDS, BuildError};
///
/// let mut hds = HalfedgeDS::<[f32; 3]>::new();
/// hds.delegate(|hds: &mut HalfedgeDS<[f32; 3]>| -> Result<(), BuildError> {
///     hds.vertices_push_back([0.0, 0.0, 0.0]);
///     Ok(())
/// }).unwrap();
///
/// assert_eq!(hds.size_of_vertices(), 1);
/// ```
pub trait Modifier<P> {
    fn modify(&mut self, hds: &mut HalfedgeDS<P>) -> Result<(), BuildError>;
}

impl<P, F> Modifier<P> for F
where
    F: FnMut(&mut HalfedgeDS<P>) -> Result<(), BuildError>,
{
    fn modify(&mut self, hds: &mut HalfedgeDS<P>) -> Result<(), BuildError> {
        self(hds)
    }
}

impl<P: Clone> HalfedgeDS<P> {
    /// Runs the modifier and validates the result (level 3 of
    /// [`check`][crate::ConstDecorator::check]).
    ///
    /// If the modifier fails or leaves an invalid structure behind, the data
    /// structure is restored to exactly the state before the call and the
    /// error is returned.
    pub fn delegate<M: Modifier<P>>(&mut self, mut modifier: M) -> Result<(), Error> {
        let snapshot = self.clone();

        let result = modifier.modify(self).and_then(|()| {
            self.const_decorator().check(3).map_err(|violations| {
                let msg = violations.iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                BuildError::Inconsistent(msg)
            })
        });

        if let Err(e) = result {
            warn!(error = %e, "modifier failed, restoring previous state");
            *self = snapshot;
            return Err(e.into());
        }

        Ok(())
    }
}



// ===============================================================================================
// ===== FacetBuilder
// ===============================================================================================

/// Vertex indices of one facet.
type FacetIndices = SmallVec<[usize; 4]>;

/// Builds polygon surfaces from a list of points and a list of facets (each
/// facet given as a list of point indices in counter clockwise order).
///
/// The builder only buffers. Running it as [`Modifier`] adds all points as
/// new vertices and all facets as new faces, sharing edges between facets
/// where the same two points appear in opposite order. Everything not
/// covered by a facet is border.
///
/// ```
/// use hedra::{HalfedgeDS, FacetBuilder};
///
/// let mut b = FacetBuilder::new();
/// let v0 = b.vertex([0.0, 0.0]);
/// let v1 = b.vertex([1.0, 0.0]);
/// let v2 = b.vertex([1.0, 1.0]);
/// let v3 = b.vertex([0.0, 1.0]);
/// b.facet(&[v0, v1, v2]);
/// b.facet(&[v0, v2, v3]);
///
/// let mut hds = HalfedgeDS::<[f64; 2]>::new();
/// hds.delegate(b).unwrap();
/// assert_eq!(hds.size_of_edges(), 5);
/// assert_eq!(hds.size_of_faces(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct FacetBuilder<P> {
    points: Vec<P>,
    facets: Vec<FacetIndices>,
}

impl<P> FacetBuilder<P> {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            facets: Vec::new(),
        }
    }

    /// Buffers a point and returns its index.
    pub fn vertex(&mut self, point: P) -> usize {
        self.points.push(point);
        self.points.len() - 1
    }

    /// Buffers a facet and returns its index. Indices are checked when the
    /// builder runs.
    pub fn facet(&mut self, indices: &[usize]) -> usize {
        self.facets.push(indices.iter().cloned().collect());
        self.facets.len() - 1
    }

    pub fn num_vertices(&self) -> usize {
        self.points.len()
    }

    pub fn num_facets(&self) -> usize {
        self.facets.len()
    }

    /// Checks the facets on their own and returns the number of distinct
    /// edges they need.
    fn check_facets(&self) -> Result<usize, BuildError> {
        let mut edges = FxHashSet::default();

        for (facet, indices) in self.facets.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i >= self.points.len()) {
                return Err(BuildError::UnknownVertex { facet, index });
            }

            let distinct = indices.iter().collect::<FxHashSet<_>>().len();
            if indices.len() < 3 || distinct != indices.len() {
                return Err(BuildError::DegenerateFacet { facet });
            }

            for (&a, &b) in corners(indices) {
                edges.insert((a.min(b), a.max(b)));
            }
        }

        Ok(edges.len())
    }
}

impl<P> Default for FacetBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Pairs of consecutive indices, wrapping around.
fn corners<'a>(indices: &'a [usize]) -> impl Iterator<Item = (&'a usize, &'a usize)> + 'a {
    indices.iter().zip(indices.iter().cycle().skip(1))
}

impl<P: Clone> Modifier<P> for FacetBuilder<P> {
    fn modify(&mut self, hds: &mut HalfedgeDS<P>) -> Result<(), BuildError> {
        let num_edges = self.check_facets()?;
        if !hds.has_room(self.points.len(), num_edges, self.facets.len()) {
            return Err(BuildError::CapacityExhausted);
        }

        let vertices = self.points.iter()
            .map(|p| hds.vertices_push_back(p.clone()))
            .collect::<Vec<_>>();

        // Directed lookup: `(from, to)` to the halfedge from `from` to `to`.
        let mut directed = FxHashMap::<(VertexHandle, VertexHandle), HalfedgeHandle>::default();
        let mut facet_of = FxHashMap::<FaceHandle, usize>::default();

        for (facet, indices) in self.facets.iter().enumerate() {
            let mut cycle = SmallVec::<[HalfedgeHandle; 4]>::new();
            for (&a, &b) in corners(indices) {
                let (from, to) = (vertices[a], vertices[b]);
                let h = match directed.get(&(from, to)) {
                    Some(&h) if hds.face(h).is_some() => {
                        return Err(BuildError::NonManifoldEdge { facet });
                    }
                    Some(&h) => h,
                    None => {
                        let h = hds.edges_push_back(from, to);
                        directed.insert((from, to), h);
                        directed.insert((to, from), h.opposite());
                        h
                    }
                };
                cycle.push(h);
            }

            let f = hds.faces_push_back(cycle[0]);
            facet_of.insert(f, facet);
            for (&h, &next) in cycle.iter().zip(cycle.iter().cycle().skip(1)) {
                hds.set_face(h, Some(f));
                hds.link(h, next);
            }
        }

        // The facet of an edge, used to report errors at vertices.
        let facet_at = |hds: &HalfedgeDS<P>, h: HalfedgeHandle| {
            hds.face(h)
                .or_else(|| hds.face(h.opposite()))
                .and_then(|f| facet_of.get(&f).cloned())
                .unwrap_or(0)
        };

        // Link the border. At a manifold vertex, at most one border halfedge
        // leaves it.
        let mut border_out = FxHashMap::<VertexHandle, HalfedgeHandle>::default();
        let border = hds.halfedges().filter(|&h| hds.is_border(h)).collect::<Vec<_>>();
        for &h in &border {
            if border_out.insert(hds.source(h), h).is_some() {
                return Err(BuildError::NonManifoldVertex { facet: facet_at(hds, h) });
            }
        }
        for &h in &border {
            match border_out.get(&hds.vertex(h)) {
                Some(&next) => hds.link(h, next),
                None => return Err(BuildError::Inconsistent(
                    format!("no border halfedge leaves the target of {:?}", h),
                )),
            }
        }

        // Anchors, border halfedges preferred.
        let mut incoming = FxHashMap::<VertexHandle, usize>::default();
        let halfedges = hds.halfedges().collect::<Vec<_>>();
        for h in halfedges {
            let v = hds.vertex(h);
            *incoming.entry(v).or_insert(0) += 1;

            let replace = match hds.vertex_halfedge(v) {
                None => true,
                Some(anchor) => hds.is_border(h) && !hds.is_border(anchor),
            };
            if replace {
                hds.set_vertex_halfedge(v, Some(h));
            }
        }

        // Two fans sharing only a vertex: the rotation does not reach all
        // halfedges.
        for &v in &vertices {
            if let Some(anchor) = hds.vertex_halfedge(v) {
                let expected = incoming.get(&v).cloned().unwrap_or(0);
                if hds.vertex_degree(v) != expected {
                    return Err(BuildError::NonManifoldVertex { facet: facet_at(hds, anchor) });
                }
            }
        }

        debug!(
            vertices = vertices.len(),
            edges = directed.len() / 2,
            faces = self.facets.len(),
            "built facets",
        );
        Ok(())
    }
}
