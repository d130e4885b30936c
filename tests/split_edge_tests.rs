use std::cell::RefCell;
use std::rc::Rc;

use mesh_brep::mesh::cell_type::CellType;
use mesh_brep::mesh::{MasterMesh, MeshCell};
use mesh_brep::model::Model;
use mesh_brep::ops::operator::ModelOperator;
use mesh_brep::ops::split_edge::EdgeSplitOperator;
use mesh_brep::topology::events::ModelEvent;
use mesh_brep::topology::kind::EntityKind;

fn segment(a: usize, b: usize) -> MeshCell {
    MeshCell {
        cell_type: CellType::Segment,
        points: vec![a, b],
    }
}

/// A polyline of `n` segments along the x axis, classified onto one open
/// edge spanning a vertex at point 0 and a vertex at point `n`.
fn open_edge_model(n: usize) -> (Model, mesh_brep::topology::entity_id::EntityId) {
    let points = (0..=n).map(|i| [i as f64, 0.0, 0.0]).collect();
    let cells = (0..n).map(|i| segment(i, i + 1)).collect();
    let mesh = MasterMesh::new(points, cells).unwrap();
    let mut model = Model::new(mesh);
    let v0 = model.build_vertex(Some(0));
    let v1 = model.build_vertex(Some(n));
    let edge = model.build_edge(Some(v0), Some(v1)).unwrap();
    let all: Vec<usize> = (0..n).collect();
    model.classification.classify_cells(edge, &all);
    (model, edge)
}

/// A ring of 10 segments classified onto one loop edge (no vertices).
fn loop_edge_model() -> (Model, mesh_brep::topology::entity_id::EntityId) {
    let n = 10;
    let points = (0..n)
        .map(|i| {
            let t = i as f64 / n as f64 * std::f64::consts::TAU;
            [t.cos(), t.sin(), 0.0]
        })
        .collect();
    let cells = (0..n).map(|i| segment(i, (i + 1) % n)).collect();
    let mesh = MasterMesh::new(points, cells).unwrap();
    let mut model = Model::new(mesh);
    let edge = model.build_edge(None, None).unwrap();
    let all: Vec<usize> = (0..n).collect();
    model.classification.classify_cells(edge, &all);
    (model, edge)
}

#[test]
fn open_split_conserves_cells_and_shares_the_new_vertex() {
    let (mut model, edge) = open_edge_model(4);
    let vertices_before = model.graph.count(EntityKind::Vertex);

    let mut split = EdgeSplitOperator::new(edge, 2);
    assert!(split.able_to_operate(&model));
    assert!(split.operate(&mut model));
    assert!(split.succeeded());

    let new_vertex = split.created_vertex().unwrap();
    let new_edge = split.created_edge().unwrap();
    assert_eq!(model.graph.count(EntityKind::Vertex), vertices_before + 1);

    // Cells 0,1 stay on the original edge; the walk from the far endpoint
    // claims 3 then 2 for the new edge.
    assert_eq!(model.classification.reverse_classification(edge), &[0, 1]);
    let mut walked = model.classification.reverse_classification(new_edge).to_vec();
    walked.sort_unstable();
    assert_eq!(walked, vec![2, 3]);
    assert_eq!(
        model.classification.cell_count(edge) + model.classification.cell_count(new_edge),
        4
    );

    // Both edges meet at the split vertex.
    assert_eq!(model.graph.edge(edge).unwrap().vertices[1], Some(new_vertex));
    assert!(
        model
            .graph
            .edge(new_edge)
            .unwrap()
            .vertices
            .contains(&Some(new_vertex))
    );
    assert_eq!(model.graph.vertex(new_vertex).unwrap().point, Some(2));
}

#[test]
fn open_split_publishes_boundary_and_split_events() {
    let (mut model, edge) = open_edge_model(4);
    let events: Rc<RefCell<Vec<ModelEvent>>> = Rc::default();
    let sink = Rc::clone(&events);
    model.subscribe(move |event| sink.borrow_mut().push(*event));

    let mut split = EdgeSplitOperator::new(edge, 2);
    assert!(split.operate(&mut model));

    let events = events.borrow();
    assert!(
        events
            .iter()
            .any(|e| matches!(e, ModelEvent::BoundaryModified(id) if *id == edge))
    );
    assert!(events.iter().any(|e| matches!(
        e,
        ModelEvent::Split { source, created_entity: Some(_), .. } if *source == edge
    )));
}

#[test]
fn loop_split_creates_one_vertex_and_no_edge() {
    let (mut model, edge) = loop_edge_model();
    let edges_before = model.graph.count(EntityKind::Edge);

    let mut split = EdgeSplitOperator::new(edge, 3);
    assert!(split.able_to_operate(&model));
    assert!(split.operate(&mut model));
    assert!(split.succeeded());

    let new_vertex = split.created_vertex().unwrap();
    assert_eq!(split.created_edge(), None);
    assert_eq!(model.graph.count(EntityKind::Edge), edges_before);
    assert_eq!(model.graph.count(EntityKind::Vertex), 1);

    // Both endpoint slots resolve to the single new vertex.
    let record = model.graph.edge(edge).unwrap();
    assert_eq!(record.vertices, [Some(new_vertex), Some(new_vertex)]);
    assert_eq!(model.classification.cell_count(edge), 10);
}

#[test]
fn loop_split_event_carries_no_created_entity() {
    let (mut model, edge) = loop_edge_model();
    let events: Rc<RefCell<Vec<ModelEvent>>> = Rc::default();
    let sink = Rc::clone(&events);
    model.subscribe(move |event| sink.borrow_mut().push(*event));

    let mut split = EdgeSplitOperator::new(edge, 3);
    assert!(split.operate(&mut model));
    assert!(events.borrow().iter().any(|e| matches!(
        e,
        ModelEvent::Split { source, created_entity: None, .. } if *source == edge
    )));
}

#[test]
fn split_at_an_endpoint_is_rejected() {
    let (model, edge) = open_edge_model(4);
    let split = EdgeSplitOperator::new(edge, 0);
    assert!(!split.able_to_operate(&model));
    let split = EdgeSplitOperator::new(edge, 4);
    assert!(!split.able_to_operate(&model));
}

#[test]
fn split_off_the_edge_is_rejected() {
    let (mut model, edge) = open_edge_model(4);
    // Point 2 loses both incident cells to another edge.
    let other = model.build_edge(None, None).unwrap();
    model.classification.classify_cells(other, &[1, 2]);
    let split = EdgeSplitOperator::new(edge, 2);
    assert!(!split.able_to_operate(&model));
}

#[test]
fn a_broken_walk_fails_the_split_but_leaves_the_vertex() {
    // Two segment chains 0-1-2 and 3-4-5 classified onto one edge: the
    // precondition at point 1 holds (two incident owned cells), but the walk
    // from the far endpoint at point 5 dies at the gap.
    let points = (0..6).map(|i| [i as f64, 0.0, 0.0]).collect();
    let cells = vec![segment(0, 1), segment(1, 2), segment(3, 4), segment(4, 5)];
    let mesh = MasterMesh::new(points, cells).unwrap();
    let mut model = Model::new(mesh);
    let v0 = model.build_vertex(Some(0));
    let v1 = model.build_vertex(Some(5));
    let edge = model.build_edge(Some(v0), Some(v1)).unwrap();
    model.classification.classify_cells(edge, &[0, 1, 2, 3]);
    let vertices_before = model.graph.count(EntityKind::Vertex);
    let edges_before = model.graph.count(EntityKind::Edge);

    let mut split = EdgeSplitOperator::new(edge, 1);
    assert!(split.able_to_operate(&model));
    assert!(!split.operate(&mut model));
    assert!(!split.succeeded());

    // Classification and endpoints are untouched; no new edge exists.
    assert_eq!(model.classification.reverse_classification(edge), &[0, 1, 2, 3]);
    assert_eq!(model.graph.edge(edge).unwrap().vertices, [Some(v0), Some(v1)]);
    assert_eq!(model.graph.count(EntityKind::Edge), edges_before);
    assert_eq!(split.created_edge(), None);

    // The vertex built before the walk stays behind.
    assert_eq!(model.graph.count(EntityKind::Vertex), vertices_before + 1);
    let leaked = split.created_vertex().unwrap();
    assert_eq!(model.graph.vertex(leaked).unwrap().point, Some(1));
    assert!(model.graph.vertex(leaked).unwrap().uses.is_empty());
}

#[test]
fn split_point_outside_mesh_is_rejected() {
    let (model, edge) = open_edge_model(4);
    let split = EdgeSplitOperator::new(edge, 99);
    assert!(!split.able_to_operate(&model));
}

#[test]
fn default_operator_is_rejected() {
    let (model, _) = open_edge_model(4);
    let split = EdgeSplitOperator::default();
    assert!(!split.able_to_operate(&model));
    assert!(!split.succeeded());
}
