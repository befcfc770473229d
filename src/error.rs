//! Error types.

use failure::Fail;

use crate::handle::{FaceHandle, HalfedgeHandle};


/// Errors of decorator operations and `HalfedgeDS::delegate`.
///
/// Whenever one of these is returned, the data structure is exactly as it was
/// before the call.
#[derive(Debug, Clone, PartialEq, Eq, Fail)]
pub enum Error {
    /// A topological precondition of the operation does not hold.
    #[fail(display = "precondition of `{}` violated: {}", op, reason)]
    Precondition {
        op: &'static str,
        reason: &'static str,
    },

    #[fail(display = "`{}` was given the dead or unknown halfedge {:?}", op, handle)]
    DeadHalfedge {
        op: &'static str,
        handle: HalfedgeHandle,
    },

    #[fail(display = "`{}` was given the dead or unknown face {:?}", op, handle)]
    DeadFace {
        op: &'static str,
        handle: FaceHandle,
    },

    /// Not enough handle indices left for the elements the operation would
    /// create.
    #[fail(display = "`{}` would exhaust the handle index space", op)]
    CapacityExhausted {
        op: &'static str,
    },

    #[fail(display = "construction failed: {}", _0)]
    Construction(#[fail(cause)] BuildError),
}

/// Errors reported by a [`Modifier`][crate::builder::Modifier].
#[derive(Debug, Clone, PartialEq, Eq, Fail)]
pub enum BuildError {
    #[fail(display = "facet {} refers to unknown vertex index {}", facet, index)]
    UnknownVertex {
        facet: usize,
        index: usize,
    },

    #[fail(
        display = "facet {} is degenerate (less than three vertices or a vertex \
            used twice)",
        facet
    )]
    DegenerateFacet {
        facet: usize,
    },

    #[fail(display = "facet {} would add a non-manifold edge", facet)]
    NonManifoldEdge {
        facet: usize,
    },

    #[fail(display = "facet {} would add a non-manifold vertex", facet)]
    NonManifoldVertex {
        facet: usize,
    },

    #[fail(display = "not enough handle indices left for the new elements")]
    CapacityExhausted,

    /// The result did not pass the validity check.
    #[fail(display = "inconsistent result: {}", _0)]
    Inconsistent(String),
}

impl From<BuildError> for Error {
    fn from(src: BuildError) -> Self {
        Error::Construction(src)
    }
}
