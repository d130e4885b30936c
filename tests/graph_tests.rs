use mesh_brep::model_error::ModelError;
use mesh_brep::topology::entity_id::EntityId;
use mesh_brep::topology::graph::EntityGraph;
use mesh_brep::topology::kind::EntityKind;

/// A triangle of three open edges chained head-to-tail around one face side.
fn triangle_loop(graph: &mut EntityGraph) -> (EntityId, Vec<EntityId>) {
    let v: Vec<EntityId> = (0..3).map(|i| graph.build_vertex(Some(i))).collect();
    let edges = vec![
        graph.build_edge(Some(v[0]), Some(v[1])).unwrap(),
        graph.build_edge(Some(v[1]), Some(v[2])).unwrap(),
        graph.build_edge(Some(v[2]), Some(v[0])).unwrap(),
    ];
    let face = graph.build_face([None, None]).unwrap();
    (face, edges)
}

#[test]
fn ids_are_unique_and_ascending() {
    let mut graph = EntityGraph::new();
    let a = graph.build_vertex(None);
    let b = graph.build_vertex(None);
    let c = graph.build_region();
    assert!(a < b && b < c);
    assert_eq!(graph.count(EntityKind::Vertex), 2);
    assert_eq!(
        graph.iter(EntityKind::Vertex).collect::<Vec<_>>(),
        vec![a, b]
    );
}

#[test]
fn lookups_are_kind_checked() {
    let mut graph = EntityGraph::new();
    let vertex = graph.build_vertex(Some(0));
    assert!(graph.vertex(vertex).is_ok());
    assert!(matches!(
        graph.edge(vertex),
        Err(ModelError::KindMismatch { .. })
    ));
    let missing = EntityId::new(999).unwrap();
    assert!(matches!(
        graph.vertex(missing),
        Err(ModelError::EntityNotFound(_))
    ));
}

#[test]
fn building_an_edge_registers_vertex_uses() {
    let mut graph = EntityGraph::new();
    let v0 = graph.build_vertex(Some(0));
    let v1 = graph.build_vertex(Some(1));
    let edge = graph.build_edge(Some(v0), Some(v1)).unwrap();

    let record = graph.edge(edge).unwrap();
    assert_eq!(record.vertices, [Some(v0), Some(v1)]);
    // One forward and one reverse direction use.
    let [fwd, rev] = record.uses;
    assert!(graph.edge_use(fwd).unwrap().forward);
    assert!(!graph.edge_use(rev).unwrap().forward);

    assert_eq!(graph.vertex(v0).unwrap().uses.len(), 1);
    assert_eq!(graph.vertex(v0).unwrap().uses[0].end, 0);
    assert_eq!(graph.vertex(v1).unwrap().uses[0].end, 1);
}

#[test]
fn half_open_edges_are_rejected() {
    let mut graph = EntityGraph::new();
    let v0 = graph.build_vertex(Some(0));
    assert!(matches!(
        graph.build_edge(Some(v0), None),
        Err(ModelError::InvalidGeometry(_))
    ));
    assert!(graph.build_edge(None, None).is_ok());
}

#[test]
fn a_valid_chain_builds_a_loop() {
    let mut graph = EntityGraph::new();
    let (face, edges) = triangle_loop(&mut graph);
    let face_use = graph.face(face).unwrap().uses[0];

    let chain: Vec<(EntityId, bool)> = edges.iter().map(|&e| (e, true)).collect();
    let loop_id = graph.build_loop_use(face_use, &chain).unwrap();

    let loop_record = graph.loop_use(loop_id).unwrap();
    assert_eq!(loop_record.face_use, face_use);
    assert_eq!(loop_record.edge_uses.len(), 3);
    for &use_id in &loop_record.edge_uses {
        assert_eq!(graph.edge_use(use_id).unwrap().loop_use, Some(loop_id));
    }
    assert!(graph.face_use(face_use).unwrap().loop_uses.contains(&loop_id));
}

#[test]
fn a_broken_chain_is_an_open_loop() {
    let mut graph = EntityGraph::new();
    let (face, edges) = triangle_loop(&mut graph);
    let face_use = graph.face(face).unwrap().uses[0];

    // Reversing one edge breaks head-to-tail continuity.
    let chain = vec![(edges[0], true), (edges[1], false), (edges[2], true)];
    assert!(matches!(
        graph.build_loop_use(face_use, &chain),
        Err(ModelError::OpenLoop(_))
    ));
    // Nothing was claimed.
    for &edge in &edges {
        for use_id in graph.edge(edge).unwrap().uses {
            assert_eq!(graph.edge_use(use_id).unwrap().loop_use, None);
        }
    }
}

#[test]
fn a_claimed_edge_use_cannot_join_a_second_loop() {
    let mut graph = EntityGraph::new();
    let (face, edges) = triangle_loop(&mut graph);
    let [use0, use1] = graph.face(face).unwrap().uses;

    let chain: Vec<(EntityId, bool)> = edges.iter().map(|&e| (e, true)).collect();
    graph.build_loop_use(use0, &chain).unwrap();
    assert!(graph.build_loop_use(use1, &chain).is_err());
}

#[test]
fn a_loop_edge_is_a_singleton_loop() {
    let mut graph = EntityGraph::new();
    let edge = graph.build_edge(None, None).unwrap();
    let face = graph.build_face([None, None]).unwrap();
    let face_use = graph.face(face).unwrap().uses[0];
    let loop_id = graph.build_loop_use(face_use, &[(edge, true)]).unwrap();
    assert_eq!(graph.loop_use(loop_id).unwrap().edge_uses.len(), 1);
}

#[test]
fn faces_attach_to_region_shells() {
    let mut graph = EntityGraph::new();
    let region = graph.build_region();
    let face = graph.build_face([Some(region), None]).unwrap();

    let [side0, side1] = graph.face(face).unwrap().uses;
    let shell = graph.face_use(side0).unwrap().shell_use.unwrap();
    assert_eq!(graph.shell_use(shell).unwrap().region, region);
    assert!(graph.shell_use(shell).unwrap().face_uses.contains(&side0));
    assert_eq!(graph.face_use(side1).unwrap().shell_use, None);
}

#[test]
fn destruction_is_gated_on_live_references() {
    let mut graph = EntityGraph::new();
    let v0 = graph.build_vertex(Some(0));
    let v1 = graph.build_vertex(Some(1));
    let edge = graph.build_edge(Some(v0), Some(v1)).unwrap();

    // The vertices are referenced by the edge's uses.
    assert!(!graph.is_destroyable(v0));
    assert!(!graph.destroy(v0));
    assert!(graph.vertex(v0).is_ok());

    // Destroying the edge releases them.
    assert!(graph.destroy(edge));
    assert!(graph.edge(edge).is_err());
    assert!(graph.is_destroyable(v0));
    assert!(graph.destroy(v0));
    assert_eq!(graph.count(EntityKind::Vertex), 1);
}

#[test]
fn an_edge_chained_into_a_loop_is_not_destroyable() {
    let mut graph = EntityGraph::new();
    let (face, edges) = triangle_loop(&mut graph);
    let face_use = graph.face(face).unwrap().uses[0];
    let chain: Vec<(EntityId, bool)> = edges.iter().map(|&e| (e, true)).collect();
    graph.build_loop_use(face_use, &chain).unwrap();

    assert!(!graph.is_destroyable(edges[0]));
    // Destroying the face unchains the loop and frees the edges.
    assert!(graph.destroy(face));
    assert!(graph.is_destroyable(edges[0]));
}

#[test]
fn destroyed_ids_are_never_reused() {
    let mut graph = EntityGraph::new();
    let vertex = graph.build_vertex(None);
    assert!(graph.destroy(vertex));
    let next = graph.build_vertex(None);
    assert!(next > vertex);
}
