use std::fmt::Debug;

use cgmath::Point3;

use crate::{
    builder::FacetBuilder,
    handle::{Handle, HalfedgeHandle, VertexHandle},
    hds::HalfedgeDS,
};


/// Checks if the given code will trigger a panic. If it does, nothing happens
/// (except side effects of the given code). If no panic is caused by the given
/// code, this macro panics with a message.
#[allow(unused_macros)]
macro_rules! assert_panic {
    ($($body:tt)*) => {{
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            $($body)*
        }));
        if let Ok(x) = res {
            panic!(
                "expected panic for '{}', but got '{:?}' ",
                stringify!($($body)*),
                x,
            );
        }
    }}
}

/// Macro version of `cmp_rotated` with nicer error message.
#[allow(unused_macros)]
macro_rules! assert_rotated_eq {
    ($lhs:expr, $rhs:expr) => {{
        let lhs = $lhs;
        let rhs = $rhs;
        if crate::test_utils::cmp_rotated(&lhs, &rhs).is_err() {
            panic!(
                "assert_rotated_eq failed:\n\
                    |  left: {:?} ({})\n\
                    | right: {:?} ({})\n",
                lhs,
                stringify!($lhs),
                rhs,
                stringify!($rhs),
            );
        }
    }};
}

/// Asserts that the data structure passes all validity checks and prints all
/// violations otherwise.
#[allow(unused_macros)]
macro_rules! assert_valid {
    ($hds:expr) => {{
        if let Err(violations) = $hds.const_decorator().check(3) {
            let list = violations.iter()
                .map(|v| format!("  - {}", v))
                .collect::<Vec<_>>()
                .join("\n");
            panic!("`{}` is not valid:\n{}", stringify!($hds), list);
        }
    }};
}

/// Compares `actual` and `expected`. This function checks if both slices are
/// equal when treating them like a "ring". This means that if we can rotate
/// one slice so that it equals the other slice, we consider them equal.
/// `[a, b, c, d]` and `[b, c, d, a]` and `[d, a, b, c]` are all equal.
///
/// If the slices are equal, `Ok(())` is returned. Otherwise, `Err(rotated)` is
/// returned, where `rotated` is `expected` but potentially rotated by some
/// amount. This can be used to print in the error message as the returned
/// vector looks more similar to the `actual` value.
pub(crate) fn cmp_rotated<T: Debug + PartialEq + Clone>(
    actual: &[T],
    expected: &[T],
) -> Result<(), Vec<T>> {
    let mut rotated = expected.to_vec();

    if actual.len() != expected.len() {
        return Err(rotated);
    }

    if !actual.is_empty() {
        // Find the rotate-offset
        let pos = match actual.iter().position(|e| e == &expected[0]) {
            Some(pos) => pos,
            None => return Err(rotated),
        };

        // Align my rotating back
        rotated.rotate_right(pos);

        if actual != &rotated[..] {
            return Err(rotated);
        }
    }

    Ok(())
}



// ===============================================================================================
// ===== Fixtures
// ===============================================================================================

pub(crate) type Hds = HalfedgeDS<Point3<f64>>;

pub(crate) fn p(x: f64, y: f64, z: f64) -> Point3<f64> {
    Point3::new(x, y, z)
}

/// Handle of the `i`th vertex of a data structure that started empty.
pub(crate) fn v(i: usize) -> VertexHandle {
    VertexHandle::from_usize(i)
}

/// Builds a fresh data structure with the `FacetBuilder`.
pub(crate) fn build(points: &[[f64; 3]], facets: &[&[usize]]) -> Hds {
    let mut b = FacetBuilder::new();
    for &[x, y, z] in points {
        b.vertex(p(x, y, z));
    }
    for facet in facets {
        b.facet(facet);
    }

    let mut hds = Hds::new();
    hds.delegate(b).unwrap();
    hds
}

/// The halfedge from `from` to `to`.
pub(crate) fn find(hds: &Hds, from: VertexHandle, to: VertexHandle) -> HalfedgeHandle {
    hds.halfedges()
        .find(|&h| hds.source(h) == from && hds.vertex(h) == to)
        .unwrap_or_else(|| panic!("no halfedge from {:?} to {:?}", from, to))
}

/// Two triangles sharing the edge `V0 -- V2`.
///
/// ```text
///   V3 ------ V2
///    |      / |
///    |    /   |
///    |  /     |
///   V0 ------ V1
/// ```
pub(crate) fn two_triangles() -> Hds {
    build(
        &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
        &[&[0, 1, 2], &[0, 2, 3]],
    )
}

/// A single quad `V0 -> V1 -> V2 -> V3`.
pub(crate) fn quad() -> Hds {
    build(
        &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
        &[&[0, 1, 2, 3]],
    )
}

/// Triangular bipyramid: the triangle `V0, V1, V2` around the equator, `V3`
/// on top and `V4` at the bottom. Closed, 5 vertices, 9 edges, 6 faces.
pub(crate) fn bipyramid() -> Hds {
    build(
        &[
            [1.0, 0.0, 0.0],
            [-0.5, 0.87, 0.0],
            [-0.5, -0.87, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ],
        &[
            &[0, 1, 3],
            &[1, 2, 3],
            &[2, 0, 3],
            &[1, 0, 4],
            &[2, 1, 4],
            &[0, 2, 4],
        ],
    )
}

/// Textual dump of the complete state, for comparing before and after.
pub(crate) fn snapshot(hds: &Hds) -> String {
    format!("{:?}", hds)
}
