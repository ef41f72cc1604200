mod util;

use surf_mesh::prelude::*;
use util::*;

#[test]
fn split_of_two_face_edge() {
    let mut mesh = unit_grid(4);
    let boundary = boundary_edge_count(&mesh);
    let (faces, verts) = (mesh.n_faces(), mesh.n_vertices());
    assert_eq!(mesh.edge_faces(5, 6).unwrap().len(), 2);

    let m = mesh.split_edge(5, 6).unwrap();
    assert_eq!(mesh.n_vertices(), verts + 1);
    assert_eq!(mesh.n_faces(), faces + 2);
    assert_eq!(mesh.vertex_faces(m).unwrap().len(), 4);
    assert_eq!(boundary_edge_count(&mesh), boundary);
    assert!(mesh.find_edge(5, 6).unwrap().is_none());
    assert!(mesh.validate_invariants().is_ok());
}

#[test]
fn split_preserves_area() {
    let mut mesh = unit_grid(4);
    let area = mesh.total_area();
    for (a, b) in [(0, 1), (5, 10), (14, 15), (6, 7)] {
        mesh.split_edge(a, b).unwrap();
    }
    assert_close(mesh.total_area(), area, 1e-12);

    // boundary split on a curved profile: the point leaves the plane
    let m = mesh.split_edge_at(1, 2, [1.5, -0.25, 0.0]).unwrap();
    assert_eq!(mesh.vertex(m).unwrap(), [1.5, -0.25, 0.0]);
    assert!(mesh.total_area() > area);
}

#[test]
fn collapse_then_split_is_not_inverse() {
    let mut mesh = unit_grid(3);
    let original_area = mesh.total_area();
    let faces = mesh.n_faces();
    let original = mesh.vertices().to_vec();
    assert_close(original_area, 4.0, 1e-12);

    let m = mesh.collapse_edge(4, 5).unwrap();
    assert_eq!(mesh.vertex(m).unwrap(), [1.5, 1.0, 0.0]);
    assert_eq!(mesh.n_faces(), faces - 2);
    assert!(mesh.vertex_faces(4).unwrap().is_empty());
    assert!(mesh.vertex_faces(5).unwrap().is_empty());
    assert_close(mesh.total_area(), 3.5, 1e-12);

    mesh.split_edge(m, 2).unwrap();
    mesh.fixate();
    assert_ne!(mesh.n_faces(), faces);
    assert_ne!(mesh.vertices(), &original[..]);
    assert!((mesh.total_area() - original_area).abs() > 0.1);
}

#[test]
fn collapse_keeps_orientation() {
    let mut mesh = unit_grid(4);
    mesh.collapse_edge(5, 6).unwrap();
    for f in mesh.faces() {
        assert!(mesh.face_normal(f).unwrap()[2] > 0.0);
    }
    assert!(mesh.validate_invariants().is_ok());
}

#[test]
fn collapse_rejects_link_violation() {
    // a fan of three triangles around vertex 0, closed on one side
    let mut mesh = MeshTopology::from_parts(
        vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.4, 0.4, 0.0],
        ],
        [[0, 1, 4], [0, 4, 2], [0, 2, 3], [1, 2, 4]],
    );
    // 0 and 1 share neighbour 2 through a non-incident face
    let before = mesh.clone();
    assert_eq!(
        mesh.collapse_edge(0, 1),
        Err(SurfMeshError::CollapseNonManifold { src: 0, dst: 1 })
    );
    assert_eq!(mesh.faces(), before.faces());
    assert_eq!(mesh.generation(), before.generation());
}

#[test]
fn collapse_rejects_fold_on_tetrahedron() {
    let mut mesh = MeshTopology::from_parts(
        vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
        [[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
    );
    assert!(mesh.validate_with(&ValidationOptions::strict()).is_ok());
    let before = mesh.clone();
    for (a, b) in [(0, 1), (1, 2), (2, 3)] {
        // apexes of every edge are joined by the opposite edge
        assert_eq!(
            mesh.collapse_edge(a, b),
            Err(SurfMeshError::CollapseNonManifold { src: a, dst: b })
        );
    }
    assert_eq!(mesh.n_vertices(), before.n_vertices());
    assert_eq!(mesh.faces(), before.faces());
    assert_eq!(mesh.edges(), before.edges());
    assert_eq!(mesh.generation(), before.generation());
}

#[test]
fn edits_fail_on_stale_maps() {
    let mut mesh = unit_grid(3);
    mesh.push_face_raw([0, 2, 6], 0);
    assert!(matches!(
        mesh.split_edge(0, 1),
        Err(SurfMeshError::StaleAdjacency { .. })
    ));
    assert!(matches!(
        mesh.collapse_edge(0, 1),
        Err(SurfMeshError::StaleAdjacency { .. })
    ));
    assert!(mesh.vertex_neighbors(0).is_err());
    mesh.rebuild_adjacency();
    assert!(mesh.split_edge(0, 1).is_ok());
}

#[test]
fn insert_and_remove_round_trip() {
    let mut mesh = unit_grid(3);
    let faces = mesh.faces().to_vec();
    let edges = mesh.edges().to_vec();
    let removed = mesh.remove_face([4, 5, 8]).unwrap().unwrap();
    assert_eq!(mesh.n_faces(), faces.len() - 1);
    assert!(mesh.insert_face(removed.vertices(), removed.tag()).unwrap());
    assert_eq!(mesh.faces(), &faces[..]);
    assert_eq!(mesh.edges(), &edges[..]);
    assert!(mesh.validate_invariants().is_ok());
}

#[test]
fn tokens_flow_into_edits() {
    let mut mesh = MeshTopology::with_token(MeshToken::new(42));
    for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
        mesh.push_vertex(p);
    }
    mesh.insert_face([0, 1, 2], 3).unwrap();
    let m = mesh.split_edge(0, 1).unwrap();
    assert!(mesh.faces().iter().all(|f| f.token() == MeshToken::new(42) && f.tag() == 3));
    assert!(mesh.edges().iter().all(|e| e.token() == MeshToken::new(42)));
    assert_eq!(mesh.vertex_degree(m).unwrap(), 3);
}
