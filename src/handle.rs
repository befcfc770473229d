//! Handles to refer to mesh elements.
//!
//! Handles are small `Copy` index types. They don't borrow the data structure
//! and are only meaningful together with the `HalfedgeDS` that created them.
//! A handle stays valid until the element it refers to is erased.
//!
//! The slot of an erased element is handed out again by a later insertion.
//! To tell the new element apart from the old one, every handle carries the
//! *generation* of its slot next to the index. Each reuse bumps the
//! generation, so a stale handle keeps pointing to its old generation and is
//! no longer considered live.

use std::{fmt, hash::Hash};

use static_assertions::assert_eq_size;


/// The integer type used as index inside of handles.
///
/// This is `u32` by default. With the feature `large-handle` it's `u64`. The
/// maximum value is reserved to represent "no handle", so it never refers to
/// an element.
#[cfg(not(feature = "large-handle"))]
#[allow(non_camel_case_types)]
pub type hsize = u32;

#[cfg(feature = "large-handle")]
#[allow(non_camel_case_types)]
pub type hsize = u64;

/// Short alias for handles that might be absent. Same size as the handle
/// itself.
pub type Opt<H> = optional::Optioned<H>;


/// Common functionality of all handle types.
///
/// Every handle type reserves the maximum index as "none" sentinel, hence the
/// `Noned` bound.
pub trait Handle:
    'static + Copy + fmt::Debug + Eq + Ord + Hash + optional::Noned + optional::OptEq
{
    /// Creates a handle of generation 0 from the given index.
    #[inline(always)]
    fn new(idx: hsize) -> Self {
        Self::with_generation(idx, 0)
    }

    /// Creates a handle from the given index and slot generation.
    fn with_generation(idx: hsize, gen: hsize) -> Self;

    /// Returns the index of this handle.
    fn idx(&self) -> hsize;

    /// Returns the generation of the slot this handle was created for.
    fn generation(&self) -> hsize;

    /// Helper method to create a handle of generation 0 from a `usize`
    /// index.
    ///
    /// # Panics
    ///
    /// Panics if `raw` does not fit into `hsize` or is the reserved "none"
    /// value.
    #[inline(always)]
    fn from_usize(raw: usize) -> Self {
        Self::from_usize_gen(raw, 0)
    }

    /// Like `from_usize`, but with an explicit generation.
    #[inline(always)]
    fn from_usize_gen(raw: usize, gen: hsize) -> Self {
        assert!(
            raw < hsize::max_value() as usize,
            "handle index space exhausted (index {} does not fit into `hsize`)",
            raw,
        );
        Self::with_generation(raw as hsize, gen)
    }

    /// Helper method to get the index as `usize`.
    #[inline(always)]
    fn to_usize(&self) -> usize {
        self.idx() as usize
    }
}

macro_rules! make_handle_type {
    ($(#[$attr:meta])* $name:ident = $short:expr;) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name {
            idx: hsize,
            gen: hsize,
        }

        impl Handle for $name {
            #[inline(always)]
            fn with_generation(idx: hsize, gen: hsize) -> Self {
                $name { idx, gen }
            }

            #[inline(always)]
            fn idx(&self) -> hsize {
                self.idx
            }

            #[inline(always)]
            fn generation(&self) -> hsize {
                self.gen
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}{}", $short, self.idx)?;
                if self.gen != 0 {
                    write!(f, "@{}", self.gen)?;
                }
                Ok(())
            }
        }

        impl optional::Noned for $name {
            #[inline(always)]
            fn is_none(&self) -> bool {
                self.idx == hsize::max_value()
            }

            #[inline(always)]
            fn get_none() -> Self {
                $name { idx: hsize::max_value(), gen: 0 }
            }
        }

        impl optional::OptEq for $name {
            fn opt_eq(&self, other: &Self) -> bool {
                self == other
            }
        }

        assert_eq_size!($name, [hsize; 2]);
        assert_eq_size!(Opt<$name>, [hsize; 2]);
    };
}

make_handle_type! {
    /// A handle referring to a vertex.
    VertexHandle = "V";
}
make_handle_type! {
    /// A handle referring to a face.
    FaceHandle = "F";
}
make_handle_type! {
    /// A handle referring to a full edge, i.e. a pair of halfedges.
    EdgeHandle = "E";
}
make_handle_type! {
    /// A handle referring to one directed half of an edge.
    ///
    /// The two halves of the edge with index `e` have the indices `2e` and
    /// `2e + 1`. See [`HalfedgeHandle::opposite`].
    HalfedgeHandle = "H";
}

impl HalfedgeHandle {
    /// Returns the antiparallel halfedge of the same edge.
    ///
    /// Twins are always allocated together, with indices `2e` and `2e + 1`.
    /// Thus, we can simply flip the last bit of the index to get the twin.
    /// This does not check whether the halfedge exists.
    #[inline(always)]
    pub fn opposite(self) -> Self {
        Self { idx: self.idx ^ 1, gen: self.gen }
    }

    /// Returns the full edge this halfedge belongs to (integer division by
    /// two). Both share the generation of the edge slot.
    #[inline(always)]
    pub fn edge(self) -> EdgeHandle {
        EdgeHandle { idx: self.idx / 2, gen: self.gen }
    }

    /// Returns `0` for the lower and `1` for the upper half of an edge.
    #[inline(always)]
    pub(crate) fn side(self) -> usize {
        (self.idx & 1) as usize
    }
}

impl EdgeHandle {
    /// Returns the half of this edge with the lower index. Does not check
    /// whether the edge exists.
    #[inline(always)]
    pub fn halfedge(self) -> HalfedgeHandle {
        HalfedgeHandle { idx: self.idx * 2, gen: self.gen }
    }

    /// Returns both halves of this edge, lower index first.
    #[inline(always)]
    pub fn halfedges(self) -> [HalfedgeHandle; 2] {
        [self.halfedge(), self.halfedge().opposite()]
    }
}
