use crate::{
    error::Error,
    handle::HalfedgeHandle,
    test_utils::{bipyramid, build, find, p, quad, snapshot, two_triangles, v, Hds},
};
use super::Violation;


// ===============================================================================================
// ===== Primitive builders
// ===============================================================================================

#[test]
fn create_loop() {
    let mut hds = Hds::new();
    let h = hds.decorator().create_loop(p(0.0, 0.0, 0.0)).unwrap();

    assert_eq!(hds.size_of_vertices(), 1);
    assert_eq!(hds.size_of_halfedges(), 2);
    assert_eq!(hds.size_of_faces(), 2);
    assert_eq!(hds.next(h), h);
    assert_eq!(hds.next(h.opposite()), h.opposite());
    assert_ne!(hds.face(h), hds.face(h.opposite()));
    assert_valid!(hds);
}

#[test]
fn create_segment() {
    let mut hds = Hds::new();
    let h = hds.decorator().create_segment(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)).unwrap();

    assert_eq!(hds.size_of_vertices(), 2);
    assert_eq!(hds.size_of_faces(), 1);
    assert_eq!(hds.next(h), h.opposite());
    assert_eq!(hds.next(h.opposite()), h);
    assert_eq!(hds.face(h), hds.face(h.opposite()));
    assert_eq!(*hds.point(hds.vertex(h)), p(1.0, 0.0, 0.0));
    assert_valid!(hds);
}

#[test]
fn make_triangle() {
    let mut hds = Hds::new();
    let h = hds.decorator().make_triangle(
        p(0.0, 0.0, 0.0),
        p(1.0, 0.0, 0.0),
        p(0.0, 1.0, 0.0),
    ).unwrap();

    assert_valid!(hds);
    assert_eq!(hds.size_of_faces(), 1);
    assert_eq!(hds.size_of_halfedges(), 6);
    assert!(!hds.is_border(h));
    assert!(hds.is_border(h.opposite()));

    let d = hds.const_decorator();
    assert!(d.is_triangle(h));
    assert!(d.is_triangle(h.opposite()));
    assert!(!d.is_tetrahedron(h));
    assert!(!d.is_closed());
    assert!(d.is_pure_triangle());
    assert!(d.is_pure_bivalent());
}

#[test]
fn make_tetrahedron() {
    let mut hds = Hds::new();
    let h = hds.decorator().make_tetrahedron(
        p(0.0, 0.0, 0.0),
        p(1.0, 0.0, 0.0),
        p(0.0, 1.0, 0.0),
        p(0.0, 0.0, 1.0),
    ).unwrap();

    assert!(hds.const_decorator().is_valid(true, 0));
    assert_valid!(hds);
    assert_eq!(hds.size_of_vertices(), 4);
    assert_eq!(hds.size_of_halfedges(), 12);
    assert_eq!(hds.size_of_faces(), 4);
    assert_eq!(*hds.point(hds.source(h)), p(0.0, 0.0, 0.0));
    assert_eq!(*hds.point(hds.vertex(h)), p(1.0, 0.0, 0.0));

    let d = hds.const_decorator();
    assert!(d.is_tetrahedron(h));
    assert!(d.is_closed());
    assert!(d.is_pure_triangle());
    assert!(d.is_pure_trivalent());
    assert!(!d.is_pure_quad());

    hds.normalize_border();
    assert_eq!(hds.size_of_border_edges(), 0);
    assert_eq!(hds.size_of_border_halfedges(), 0);
}

#[test]
fn inside_out_twice_is_identity() {
    let mut hds = two_triangles();
    let before = snapshot(&hds);
    let h = find(&hds, v(0), v(1));

    hds.decorator().inside_out();
    assert_valid!(hds);

    // Same face, reversed orientation.
    assert_eq!(hds.source(h), v(1));
    assert_eq!(hds.vertex(h), v(0));
    assert!(!hds.is_border(h));
    let cycle = hds.halfedges_around_face(h).map(|x| hds.vertex(x)).collect::<Vec<_>>();
    assert_rotated_eq!(cycle, vec![v(0), v(2), v(1)]);

    hds.decorator().inside_out();
    assert_eq!(snapshot(&hds), before);
}



// ===============================================================================================
// ===== Faces
// ===============================================================================================

#[test]
fn split_face_then_join_face() {
    let mut hds = quad();
    let h = find(&hds, v(0), v(1));
    let g = find(&hds, v(2), v(3));
    let f = hds.face(h).unwrap();

    let x = hds.decorator().split_face(h, g).unwrap();
    assert_valid!(hds);
    assert_eq!(hds.size_of_faces(), 2);
    assert_eq!(hds.size_of_edges(), 5);
    assert_eq!(hds.next(h), x);
    assert_eq!(hds.source(x), v(1));
    assert_eq!(hds.vertex(x), v(3));
    assert_eq!(hds.face(h), Some(f));
    assert_eq!(hds.face(x), Some(f));
    assert_ne!(hds.face(g), Some(f));
    assert!(hds.const_decorator().is_pure_triangle());

    assert_eq!(hds.decorator().join_face(x).unwrap(), h);
    assert_valid!(hds);
    assert_eq!(hds.size_of_faces(), 1);
    assert_eq!(hds.size_of_halfedges(), 8);

    let cycle = hds.halfedges_around_face(h).map(|x| hds.vertex(x)).collect::<Vec<_>>();
    assert_rotated_eq!(cycle, vec![v(1), v(2), v(3), v(0)]);
}

#[test]
fn split_face_rejects_bad_arguments() {
    let mut hds = quad();
    let before = snapshot(&hds);
    let h = find(&hds, v(0), v(1));
    let adjacent = [find(&hds, v(1), v(2)), find(&hds, v(3), v(0))];
    let border = find(&hds, v(2), v(1));
    let outside = find(&hds, v(3), v(2));

    let mut d = hds.decorator();
    assert!(d.split_face(h, h).is_err());
    assert!(d.split_face(h, adjacent[0]).is_err());
    assert!(d.split_face(h, adjacent[1]).is_err());
    assert!(d.split_face(h.opposite(), border).is_err());
    assert!(d.split_face(h, outside).is_err());

    assert_eq!(snapshot(&hds), before);
}

#[test]
fn join_face_of_two_triangles() {
    let mut hds = two_triangles();
    assert_eq!(hds.size_of_halfedges(), 10);

    let h = find(&hds, v(0), v(2));
    let prev = hds.prev(h);
    assert_eq!(hds.decorator().join_face(h).unwrap(), prev);

    assert_valid!(hds);
    assert_eq!(hds.size_of_halfedges(), 8);
    assert_eq!(hds.size_of_faces(), 1);
    assert_eq!(hds.size_of_vertices(), 4);
    assert!(hds.const_decorator().is_pure_quad());
}

#[test]
fn join_face_rejects_same_face_on_both_sides() {
    let mut hds = Hds::new();
    let h = hds.decorator().create_segment(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)).unwrap();
    let before = snapshot(&hds);

    match hds.decorator().join_face(h) {
        Err(Error::Precondition { op, .. }) => assert_eq!(op, "join_face"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(snapshot(&hds), before);
}

#[test]
fn join_face_with_border() {
    let mut hds = Hds::new();
    let h = hds.decorator().make_triangle(
        p(0.0, 0.0, 0.0),
        p(1.0, 0.0, 0.0),
        p(0.0, 1.0, 0.0),
    ).unwrap();

    // The border side takes over the face: the remaining two edges are
    // border on one side and the face on the other.
    let g = h.opposite();
    hds.decorator().join_face(g).unwrap();
    assert_valid!(hds);
    assert_eq!(hds.size_of_faces(), 0);
    assert_eq!(hds.size_of_edges(), 2);
}

/// A triangle `v0 v1 v2` with a loop edge at `v1` inside of its face. The
/// returned half of the loop forms a cycle of its own with a new face, its
/// opposite sits in the cycle of the triangle between `i0` and `i1`.
fn triangle_with_loop() -> (Hds, HalfedgeHandle, HalfedgeHandle) {
    let mut hds = Hds::new();
    let i0 = hds.decorator().make_triangle(
        p(0.0, 0.0, 0.0),
        p(1.0, 0.0, 0.0),
        p(0.0, 1.0, 0.0),
    ).unwrap();
    let i1 = hds.next(i0);
    let f = hds.face(i0);
    let v1 = hds.vertex(i0);

    let a = hds.edges_push_back(v1, v1);
    let b = a.opposite();
    hds.link(a, a);
    let inner = hds.faces_push_back(a);
    hds.set_face(a, Some(inner));
    hds.link(i0, b);
    hds.link(b, i1);
    hds.set_face(b, f);

    assert_valid!(hds);
    (hds, i0, a)
}

#[test]
fn join_face_removes_loop_edge() {
    // The loop's own face survives.
    let (mut hds, i0, a) = triangle_with_loop();
    let inner = hds.face(a);
    assert_eq!(hds.decorator().join_face(a).unwrap(), i0);
    assert_valid!(hds);
    assert_eq!(hds.size_of_vertices(), 3);
    assert_eq!(hds.size_of_edges(), 3);
    assert_eq!(hds.size_of_faces(), 1);
    assert_eq!(hds.face(i0), inner);
    assert_eq!(hds.face_halfedge(inner.unwrap()), i0);
    assert!(hds.const_decorator().is_triangle(i0));

    // The triangle's face survives.
    let (mut hds, i0, a) = triangle_with_loop();
    let f = hds.face(i0);
    assert_eq!(hds.decorator().join_face(a.opposite()).unwrap(), i0);
    assert_valid!(hds);
    assert_eq!(hds.size_of_edges(), 3);
    assert_eq!(hds.size_of_faces(), 1);
    assert_eq!(hds.face(i0), f);
    assert!(hds.const_decorator().is_triangle(i0));
}

#[test]
fn join_face_rejects_isolated_loop() {
    let mut hds = Hds::new();
    let h = hds.decorator().create_loop(p(0.0, 0.0, 0.0)).unwrap();
    let before = snapshot(&hds);

    for &x in &[h, h.opposite()] {
        match hds.decorator().join_face(x) {
            Err(Error::Precondition { op, .. }) => assert_eq!(op, "join_face"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
    assert_eq!(snapshot(&hds), before);
    assert_valid!(hds);
}

#[test]
fn flip_edge() {
    let mut hds = two_triangles();
    let h = find(&hds, v(0), v(2));

    assert_eq!(hds.decorator().flip_edge(h).unwrap(), h);
    assert_valid!(hds);
    assert_eq!(hds.source(h), v(1));
    assert_eq!(hds.vertex(h), v(3));
    assert_eq!(hds.size_of_faces(), 2);
    assert_eq!(hds.vertex_degree(v(0)), 2);
    assert_eq!(hds.vertex_degree(v(1)), 3);
    assert!(hds.const_decorator().is_pure_triangle());

    hds.decorator().flip_edge(h).unwrap();
    assert_valid!(hds);
    assert_eq!(hds.source(h), v(2));
    assert_eq!(hds.vertex(h), v(0));
}

#[test]
fn flip_edge_rejects_border_edge() {
    let mut hds = two_triangles();
    let before = snapshot(&hds);

    let h = find(&hds, v(0), v(1));
    assert!(hds.decorator().flip_edge(h).is_err());
    assert!(hds.decorator().flip_edge(h.opposite()).is_err());
    assert_eq!(snapshot(&hds), before);
}



// ===============================================================================================
// ===== Vertices and edges
// ===============================================================================================

#[test]
fn split_vertex_then_join_vertex() {
    let mut hds = bipyramid();
    let h = find(&hds, v(1), v(3));
    let g = find(&hds, v(0), v(3));
    let cycle_before = hds.halfedges_around_face(h).collect::<Vec<_>>();

    let a = hds.decorator().split_vertex(h, g).unwrap();
    assert_valid!(hds);
    assert_eq!(hds.size_of_vertices(), 6);
    assert_eq!(hds.size_of_edges(), 10);
    assert_eq!(hds.size_of_faces(), 6);
    assert_eq!(hds.vertex(a), v(3));
    assert_eq!(hds.vertex(h), v(3));

    let w = hds.source(a);
    assert_eq!(hds.vertex(g), w);
    assert_eq!(*hds.point(w), *hds.point(v(3)));
    assert_eq!(hds.vertex_degree(w), 2);
    assert_eq!(hds.vertex_degree(v(3)), 3);

    assert_eq!(hds.decorator().join_vertex(a).unwrap(), h);
    assert_valid!(hds);
    assert_eq!(hds.size_of_vertices(), 5);
    assert_eq!(hds.size_of_edges(), 9);
    assert_eq!(hds.vertex(g), v(3));
    assert_eq!(hds.vertex_degree(v(3)), 3);
    assert_rotated_eq!(hds.halfedges_around_face(h).collect::<Vec<_>>(), cycle_before);
}

#[test]
fn join_vertex_rejects_loops_and_antennas() {
    let mut hds = Hds::new();
    let l = hds.decorator().create_loop(p(0.0, 0.0, 0.0)).unwrap();
    let s = hds.decorator().create_segment(p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)).unwrap();
    let before = snapshot(&hds);

    assert!(hds.decorator().join_vertex(l).is_err());
    assert!(hds.decorator().join_vertex(s).is_err());
    assert_eq!(snapshot(&hds), before);
}

#[test]
fn split_edge() {
    let mut hds = two_triangles();
    let h = find(&hds, v(0), v(1));
    let f = hds.face(h).unwrap();

    let x = hds.decorator().split_edge(h).unwrap();
    assert_valid!(hds);
    assert_eq!(hds.next(x), h);
    assert_eq!(hds.source(x), v(0));
    assert_eq!(hds.size_of_vertices(), 5);
    assert_eq!(hds.size_of_edges(), 6);
    assert_eq!(hds.face_degree(f), 4);
    assert_eq!(*hds.point(hds.vertex(x)), p(0.0, 0.0, 0.0));

    // Contracting the second half undoes the split.
    hds.decorator().join_vertex(h).unwrap();
    assert_valid!(hds);
    assert_eq!(hds.size_of_vertices(), 4);
    assert_eq!(hds.size_of_edges(), 5);
    assert_eq!(hds.face_degree(f), 3);
}

#[test]
fn split_edge_of_segment() {
    let mut hds = Hds::new();
    let h = hds.decorator().create_segment(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)).unwrap();

    let x = hds.decorator().split_edge(h).unwrap();
    assert_valid!(hds);
    assert_eq!(hds.next(x), h);
    assert_eq!(hds.size_of_vertices(), 3);
    assert_eq!(hds.cycle_len(h), 4);
}

#[test]
fn create_center_vertex_then_erase_it() {
    let mut hds = quad();
    let h = find(&hds, v(0), v(1));
    let f = hds.face(h).unwrap();

    let s = hds.decorator().create_center_vertex(h).unwrap();
    assert_valid!(hds);
    assert_eq!(hds.next(h), s);
    assert_eq!(hds.size_of_vertices(), 5);
    assert_eq!(hds.size_of_edges(), 8);
    assert_eq!(hds.size_of_faces(), 4);
    assert_eq!(hds.face(h), Some(f));
    assert_eq!(hds.vertex_degree(hds.vertex(s)), 4);
    assert_eq!(*hds.point(hds.vertex(s)), p(1.0, 0.0, 0.0));
    assert!(hds.const_decorator().is_pure_triangle());

    assert_eq!(hds.decorator().erase_center_vertex(s).unwrap(), h);
    assert_valid!(hds);
    assert_eq!(hds.size_of_vertices(), 4);
    assert_eq!(hds.size_of_edges(), 4);
    assert_eq!(hds.size_of_faces(), 1);
    assert_eq!(hds.face(h), Some(f));

    let cycle = hds.halfedges_around_face(h).map(|x| hds.vertex(x)).collect::<Vec<_>>();
    assert_rotated_eq!(cycle, vec![v(1), v(2), v(3), v(0)]);
}

#[test]
fn erase_center_vertex_rejects_border() {
    let mut hds = two_triangles();
    let before = snapshot(&hds);

    // V0 has the border in its rotation.
    let h = find(&hds, v(2), v(0));
    assert!(hds.decorator().erase_center_vertex(h).is_err());
    assert_eq!(snapshot(&hds), before);
}

#[test]
fn erase_center_vertex_of_bipyramid_apex() {
    let mut hds = bipyramid();
    let h = find(&hds, v(0), v(3));

    hds.decorator().erase_center_vertex(h).unwrap();
    assert_valid!(hds);
    assert_eq!(hds.size_of_vertices(), 4);
    assert_eq!(hds.size_of_faces(), 4);
    assert!(hds.const_decorator().is_closed());
}



// ===============================================================================================
// ===== Border operations
// ===============================================================================================

#[test]
fn make_hole_and_fill_hole() {
    let mut hds = two_triangles();
    let h = find(&hds, v(0), v(1));

    assert_eq!(hds.decorator().make_hole(h).unwrap(), h);
    assert_valid!(hds);
    assert_eq!(hds.size_of_faces(), 1);
    assert_eq!(hds.size_of_edges(), 5);
    assert!(hds.is_border(h));

    // Already a hole.
    assert!(hds.decorator().make_hole(h).is_err());

    assert_eq!(hds.decorator().fill_hole(h).unwrap(), h);
    assert_valid!(hds);
    assert_eq!(hds.size_of_faces(), 2);
    assert!(!hds.is_border(h));

    // Not a border halfedge anymore.
    assert!(hds.decorator().fill_hole(h).is_err());
}

#[test]
fn add_face_to_border() {
    let mut hds = quad();
    let h = find(&hds, v(1), v(0));
    let g = find(&hds, v(3), v(2));

    let x = hds.decorator().add_face_to_border(h, g).unwrap();
    assert_valid!(hds);
    assert_eq!(hds.size_of_faces(), 2);
    assert_eq!(hds.size_of_edges(), 5);
    assert_eq!(hds.source(x), v(2));
    assert_eq!(hds.vertex(x), v(0));
    assert_eq!(hds.face_degree(hds.face(x).unwrap()), 3);
    assert_eq!(hds.next(h), x.opposite());
}

#[test]
fn add_face_to_border_rejects_bad_arguments() {
    let mut hds = quad();
    let before = snapshot(&hds);
    let h = find(&hds, v(1), v(0));
    let following = find(&hds, v(0), v(3));
    let inner = find(&hds, v(2), v(3));

    let mut d = hds.decorator();
    assert!(d.add_face_to_border(h, h).is_err());
    assert!(d.add_face_to_border(h, following).is_err());
    assert!(d.add_face_to_border(h, inner).is_err());
    assert_eq!(snapshot(&hds), before);
}

#[test]
fn add_vertex_and_face_to_border() {
    let mut hds = Hds::new();
    let h = hds.decorator().make_triangle(
        p(0.0, 0.0, 0.0),
        p(1.0, 0.0, 0.0),
        p(0.0, 1.0, 0.0),
    ).unwrap();

    let b = h.opposite();
    let g = hds.next(b);
    let a = hds.decorator().add_vertex_and_face_to_border(b, g, p(1.0, 1.0, 0.0)).unwrap();
    assert_valid!(hds);
    assert_eq!(hds.size_of_vertices(), 4);
    assert_eq!(hds.size_of_edges(), 5);
    assert_eq!(hds.size_of_faces(), 2);
    assert_eq!(*hds.point(hds.vertex(a)), p(1.0, 1.0, 0.0));
    assert!(hds.is_border(b));
    assert!(!hds.is_border(g));
    assert!(hds.const_decorator().is_pure_triangle());
}

#[test]
fn erase_face_removes_dangling_edges_and_vertices() {
    let mut hds = two_triangles();
    let h = find(&hds, v(0), v(1));

    hds.decorator().erase_face(h).unwrap();
    assert_valid!(hds);
    assert_eq!(hds.size_of_faces(), 1);
    assert_eq!(hds.size_of_edges(), 3);
    assert_eq!(hds.size_of_vertices(), 3);
    assert!(!hds.contains_vertex(v(1)));
    assert!(hds.const_decorator().is_triangle(find(&hds, v(0), v(2))));
}

#[test]
fn erase_face_of_isolated_triangle() {
    let mut hds = Hds::new();
    let h = hds.decorator().make_triangle(
        p(0.0, 0.0, 0.0),
        p(1.0, 0.0, 0.0),
        p(0.0, 1.0, 0.0),
    ).unwrap();

    assert!(hds.decorator().erase_face(h.opposite()).is_err());
    hds.decorator().erase_face(h).unwrap();
    assert!(hds.is_empty());
}


#[test]
fn erase_face_of_loop() {
    let mut hds = Hds::new();
    let h = hds.decorator().create_loop(p(0.0, 0.0, 0.0)).unwrap();
    hds.decorator().make_hole(h.opposite()).unwrap();

    hds.decorator().erase_face(h).unwrap();
    assert_valid!(hds);
    assert!(hds.is_empty());
}

#[test]
fn erase_face_with_loop_edge_in_its_cycle() {
    let (mut hds, i0, a) = triangle_with_loop();
    hds.decorator().make_hole(a).unwrap();

    hds.decorator().erase_face(i0).unwrap();
    assert_valid!(hds);
    assert!(hds.is_empty());
}


// ===============================================================================================
// ===== Components
// ===============================================================================================

fn two_squares_and_triangle() -> Hds {
    build(
        &[
            [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0],
            [5.0, 0.0, 0.0], [6.0, 0.0, 0.0], [6.0, 1.0, 0.0], [5.0, 1.0, 0.0],
            [9.0, 0.0, 0.0], [10.0, 0.0, 0.0], [9.0, 1.0, 0.0],
        ],
        &[&[0, 1, 2, 3], &[4, 5, 6, 7], &[8, 9, 10]],
    )
}

#[test]
fn count_connected_components() {
    let mut hds = two_squares_and_triangle();
    assert_eq!(hds.const_decorator().count_connected_components(), 3);

    hds.vertices_push_back(p(0.0, 0.0, 9.0));
    assert_eq!(hds.const_decorator().count_connected_components(), 4);

    assert_eq!(Hds::new().const_decorator().count_connected_components(), 0);
}

#[test]
fn keep_largest_connected_components() {
    let mut hds = two_squares_and_triangle();

    assert_eq!(hds.decorator().keep_largest_connected_components(2), 1);
    assert_valid!(hds);
    assert_eq!(hds.size_of_faces(), 2);
    assert_eq!(hds.size_of_vertices(), 8);
    assert!(hds.const_decorator().is_pure_quad());
    assert_eq!(hds.const_decorator().count_connected_components(), 2);

    // Nothing left to remove.
    assert_eq!(hds.decorator().keep_largest_connected_components(2), 0);
}

#[test]
fn keep_largest_connected_components_is_deterministic() {
    let mut a = two_squares_and_triangle();
    let mut b = two_squares_and_triangle();

    // The squares have the same size: the first discovered one is kept.
    assert_eq!(a.decorator().keep_largest_connected_components(1), 2);
    assert_eq!(b.decorator().keep_largest_connected_components(1), 2);
    assert_eq!(snapshot(&a), snapshot(&b));
    assert!(a.contains_vertex(v(0)));
    assert!(!a.contains_vertex(v(4)));
}

#[test]
fn erase_connected_component() {
    let mut hds = two_squares_and_triangle();
    let h = find(&hds, v(8), v(9));

    hds.decorator().erase_connected_component(h).unwrap();
    assert_valid!(hds);
    assert_eq!(hds.const_decorator().count_connected_components(), 2);
    assert_eq!(hds.size_of_vertices(), 8);

    assert!(hds.decorator().erase_connected_component(h).is_err());
}



// ===============================================================================================
// ===== Loops
// ===============================================================================================

#[test]
fn split_loop_then_join_loop() {
    let mut hds = bipyramid();
    let h = find(&hds, v(0), v(1));
    let i = find(&hds, v(1), v(2));
    let j = find(&hds, v(2), v(0));

    let r = hds.decorator().split_loop(h, i, j).unwrap();
    assert_valid!(hds);
    assert_eq!(hds.size_of_vertices(), 8);
    assert_eq!(hds.size_of_edges(), 12);
    assert_eq!(hds.size_of_faces(), 8);

    let d = hds.const_decorator();
    assert_eq!(d.count_connected_components(), 2);
    assert!(d.is_tetrahedron(h));
    assert!(d.is_tetrahedron(h.opposite()));
    assert!(d.is_tetrahedron(r));
    assert!(d.is_closed());

    // The original vertices stay with the top.
    assert_eq!(hds.source(h), v(0));
    assert_eq!(hds.vertex(h), v(1));
    assert!(!(0..5).any(|k| hds.vertex(r) == v(k)));

    assert_eq!(hds.decorator().join_loop(h.opposite(), r).unwrap(), h.opposite());
    assert_valid!(hds);
    assert_eq!(hds.size_of_vertices(), 5);
    assert_eq!(hds.size_of_edges(), 9);
    assert_eq!(hds.size_of_faces(), 6);
    assert_eq!(hds.const_decorator().count_connected_components(), 1);
    assert!(hds.const_decorator().is_closed());
    assert_eq!(hds.vertex_degree(v(4)), 3);
    assert_eq!(hds.vertex_degree(v(0)), 4);
}

#[test]
fn split_loop_rejects_non_cycle() {
    let mut hds = bipyramid();
    let before = snapshot(&hds);
    let h = find(&hds, v(0), v(1));
    let i = find(&hds, v(1), v(3));
    let j = find(&hds, v(2), v(0));

    assert!(hds.decorator().split_loop(h, i, j).is_err());

    // A cycle around a single face has the same face on all three inner
    // sides.
    let k = find(&hds, v(3), v(0));
    assert!(hds.decorator().split_loop(h, i, k).is_err());
    assert_eq!(snapshot(&hds), before);
}

#[test]
fn join_loop_rejects_same_face() {
    let mut hds = bipyramid();
    let before = snapshot(&hds);
    let h = find(&hds, v(0), v(1));
    let next = hds.next(h);

    assert!(hds.decorator().join_loop(h, next).is_err());
    assert_eq!(snapshot(&hds), before);
}



// ===============================================================================================
// ===== Validity
// ===============================================================================================

#[test]
fn check_reports_violations_without_panicking() {
    let mut hds = two_triangles();
    let h = find(&hds, v(0), v(1));
    let f = hds.face(find(&hds, v(0), v(2))).unwrap();

    hds.faces_erase(f);
    let violations = hds.const_decorator().check(3).unwrap_err();
    assert!(violations.iter().any(|x| match x {
        Violation::DeadFace { face, .. } => *face == f,
        _ => false,
    }));
    assert!(violations[0].to_string().contains("dead face"));
    assert!(!hds.const_decorator().is_valid(true, 3));

    // Dead `next` reference.
    let mut hds = two_triangles();
    let g = find(&hds, v(1), v(2));
    hds.edges_erase(g);
    assert!(!hds.const_decorator().is_valid(false, 0));
    assert!(hds.contains_halfedge(h));
}

#[test]
fn check_levels() {
    let mut hds = two_triangles();
    let h = find(&hds, v(0), v(1));

    // Wrong face anchor: fine for level 0, not for level 1.
    let f = hds.face(h).unwrap();
    hds.set_face_halfedge(f, find(&hds, v(3), v(0)));
    assert!(hds.const_decorator().is_valid(false, 0));
    assert_eq!(
        hds.const_decorator().check(1),
        Err(vec![Violation::FaceAnchorMismatch { face: f, halfedge: find(&hds, v(3), v(0)) }]),
    );

    // Vertex without anchor: fine for level 1, not for level 2.
    let mut hds = two_triangles();
    hds.set_vertex_halfedge(v(1), None);
    assert!(hds.const_decorator().is_valid(false, 1));
    assert_eq!(
        hds.const_decorator().check(2),
        Err(vec![Violation::IncompleteRotation { vertex: v(1), expected: 2, found: 0 }]),
    );

    // Halfedge claiming the wrong face: fine for level 2, not for level 3.
    let mut hds = two_triangles();
    let f0 = hds.face(find(&hds, v(0), v(1))).unwrap();
    hds.set_face(find(&hds, v(2), v(3)), Some(f0));
    assert!(hds.const_decorator().is_valid(false, 2));
    assert!(!hds.const_decorator().is_valid(false, 3));
}

#[test]
fn operations_reject_dead_handles() {
    let mut hds = two_triangles();
    let h = find(&hds, v(0), v(1));
    hds.decorator().erase_face(h).unwrap();
    let before = snapshot(&hds);

    let mut d = hds.decorator();
    assert!(match d.split_edge(h) {
        Err(Error::DeadHalfedge { handle, .. }) => handle == h,
        _ => false,
    });
    assert!(d.join_face(h).is_err());
    assert!(d.flip_edge(h).is_err());
    assert!(d.make_hole(h).is_err());
    assert!(d.erase_center_vertex(h).is_err());
    assert_eq!(snapshot(&hds), before);
}
