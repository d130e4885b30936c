use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use mesh_brep::mesh::cell_type::CellType;
use mesh_brep::mesh::{MasterMesh, MeshCell};
use mesh_brep::model::Model;
use mesh_brep::ops::operator::ModelOperator;
use mesh_brep::ops::split_edge::EdgeSplitOperator;
use mesh_brep::ops::split_face::FaceSplitOperator;
use mesh_brep::topology::entity_id::EntityId;

/// A polyline of `n` segments classified onto one open edge.
fn polyline_model(n: usize) -> (Model, EntityId) {
    let points = (0..=n).map(|i| [i as f64, 0.0, 0.0]).collect();
    let cells = (0..n)
        .map(|i| MeshCell {
            cell_type: CellType::Segment,
            points: vec![i, i + 1],
        })
        .collect();
    let mesh = MasterMesh::new(points, cells).unwrap();
    let mut model = Model::new(mesh);
    let v0 = model.build_vertex(Some(0));
    let v1 = model.build_vertex(Some(n));
    let edge = model.build_edge(Some(v0), Some(v1)).unwrap();
    let all: Vec<usize> = (0..n).collect();
    model.classification.classify_cells(edge, &all);
    (model, edge)
}

/// A strip of `n` triangles folded sharply at the midpoint, classified onto
/// one face: two feature-angle components.
fn folded_strip_model(n: usize) -> (Model, EntityId) {
    let half = n / 2;
    let points: Vec<[f64; 3]> = (0..=n + 1)
        .map(|i| {
            let (row, col) = (i % 2, i / 2);
            if col <= half / 2 {
                [col as f64, row as f64, 0.0]
            } else {
                [(half / 2) as f64, row as f64, (col - half / 2) as f64]
            }
        })
        .collect();
    let cells = (0..n)
        .map(|i| MeshCell {
            cell_type: CellType::Triangle,
            points: if i % 2 == 0 {
                vec![i, i + 1, i + 2]
            } else {
                vec![i + 1, i, i + 2]
            },
        })
        .collect();
    let mesh = MasterMesh::new(points, cells).unwrap();
    let mut model = Model::new(mesh);
    let face = model.build_face([None, None]).unwrap();
    let all: Vec<usize> = (0..n).collect();
    model.classification.classify_cells(face, &all);
    (model, face)
}

fn bench_edge_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("edge_split");
    for &n in &[64usize, 512, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || polyline_model(n),
                |(mut model, edge)| {
                    let mut split = EdgeSplitOperator::new(edge, n / 2);
                    assert!(split.operate(&mut model));
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_face_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("face_split");
    for &n in &[64usize, 512, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || folded_strip_model(n),
                |(mut model, face)| {
                    let mut split = FaceSplitOperator::new(face, 45.0);
                    assert!(split.operate(&mut model));
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_edge_split, bench_face_split);
criterion_main!(benches);
