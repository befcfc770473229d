//! A halfedge data structure for orientable polygon surfaces, plus
//! topological editing operations on top of it.
//!
//! - [`HalfedgeDS`] stores vertices, edges (pairs of opposite halfedges) and
//!   faces and offers navigation and raw container operations.
//! - [`Decorator`] (via [`HalfedgeDS::decorator`]) offers editing operations
//!   that keep the structure consistent: Euler operations, hole filling,
//!   component removal and more.
//! - [`ConstDecorator`] (via [`HalfedgeDS::const_decorator`]) offers read
//!   only queries like validity checks.
//! - [`FacetBuilder`] builds surfaces from points and facets, run through
//!   [`HalfedgeDS::delegate`].
//!
//! ```
//! use hedra::HalfedgeDS;
//! use cgmath::Point3;
//!
//! let mut hds = HalfedgeDS::new();
//! let h = hds.decorator().make_tetrahedron(
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//! ).unwrap();
//!
//! assert_eq!(hds.size_of_faces(), 4);
//! assert!(hds.const_decorator().is_tetrahedron(h));
//! ```


#[cfg(test)]
#[macro_use]
mod test_utils;

pub mod builder;
pub mod decorator;
pub mod error;
pub mod handle;
pub mod hds;
mod list;

pub use self::{
    builder::{FacetBuilder, Modifier},
    decorator::{ConstDecorator, Decorator, Violation},
    error::{BuildError, Error},
    handle::{EdgeHandle, FaceHandle, HalfedgeHandle, Handle, VertexHandle},
    hds::HalfedgeDS,
};
