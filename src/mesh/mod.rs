//! Master geometry: the single shared mesh all classified cell lists index
//! into.
//!
//! The master mesh is immutable once built; derived incidence (point to
//! cells) is computed lazily and shared for the life of the mesh.

pub mod cell_type;
pub(crate) mod geometry;

pub use cell_type::CellType;

use std::collections::HashMap;

use once_cell::sync::OnceCell;

use crate::model_error::ModelError;
use geometry::{angle_between_degrees, polygon_area_vector};

/// One cell of the master mesh.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MeshCell {
    pub cell_type: CellType,
    /// Point indices, in the cell's boundary order for 2D cells.
    pub points: Vec<usize>,
}

/// The shared points-plus-cells mesh backing all classified geometry.
#[derive(Debug, Default)]
pub struct MasterMesh {
    points: Vec<[f64; 3]>,
    cells: Vec<MeshCell>,
    incidence: OnceCell<HashMap<usize, Vec<usize>>>,
}

impl MasterMesh {
    /// Builds a mesh, validating that every cell's point indices are in range
    /// and match the cell type's arity.
    pub fn new(points: Vec<[f64; 3]>, cells: Vec<MeshCell>) -> Result<Self, ModelError> {
        for cell in &cells {
            if let Some(expected) = cell.cell_type.vertex_count() {
                if cell.points.len() != expected {
                    return Err(ModelError::InvalidGeometry(format!(
                        "{:?} cell with {} points, expected {expected}",
                        cell.cell_type,
                        cell.points.len()
                    )));
                }
            }
            for &p in &cell.points {
                if p >= points.len() {
                    return Err(ModelError::PointOutOfRange {
                        point: p,
                        count: points.len(),
                    });
                }
            }
        }
        Ok(Self {
            points,
            cells,
            incidence: OnceCell::new(),
        })
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn point(&self, index: usize) -> Result<[f64; 3], ModelError> {
        self.points
            .get(index)
            .copied()
            .ok_or(ModelError::PointOutOfRange {
                point: index,
                count: self.points.len(),
            })
    }

    pub fn cell(&self, index: usize) -> Result<&MeshCell, ModelError> {
        self.cells.get(index).ok_or(ModelError::CellOutOfRange {
            cell: index,
            count: self.cells.len(),
        })
    }

    /// All cells incident to a point, ascending. Built lazily once.
    pub fn cells_using_point(&self, point: usize) -> &[usize] {
        let incidence = self.incidence.get_or_init(|| {
            let mut map: HashMap<usize, Vec<usize>> = HashMap::new();
            for (i, cell) in self.cells.iter().enumerate() {
                for &p in &cell.points {
                    map.entry(p).or_default().push(i);
                }
            }
            for list in map.values_mut() {
                list.sort_unstable();
                list.dedup();
            }
            map
        });
        incidence.get(&point).map_or(&[], Vec::as_slice)
    }

    /// For a segment cell, the endpoint opposite `point`.
    pub fn segment_other_end(&self, cell: usize, point: usize) -> Result<usize, ModelError> {
        let record = self.cell(cell)?;
        match (record.cell_type, record.points.as_slice()) {
            (CellType::Segment, &[a, b]) if a == point => Ok(b),
            (CellType::Segment, &[a, b]) if b == point => Ok(a),
            (CellType::Segment, _) => Err(ModelError::InvalidGeometry(format!(
                "point {point} is not an endpoint of segment cell {cell}"
            ))),
            (other, _) => Err(ModelError::InvalidGeometry(format!(
                "cell {cell} is a {other:?}, expected Segment"
            ))),
        }
    }

    /// Unit-direction area vector (unnormalized normal) of a 2D cell.
    pub fn cell_normal(&self, cell: usize) -> Result<[f64; 3], ModelError> {
        let record = self.cell(cell)?;
        if record.cell_type.dimension() != 2 {
            return Err(ModelError::InvalidGeometry(format!(
                "cell {cell} is {:?}, expected a 2D cell",
                record.cell_type
            )));
        }
        let coords: Vec<[f64; 3]> = record
            .points
            .iter()
            .map(|&p| self.point(p))
            .collect::<Result<_, _>>()?;
        Ok(polygon_area_vector(&coords))
    }

    /// Dihedral angle between two cells' normals, in degrees.
    pub fn normal_angle_degrees(&self, a: usize, b: usize) -> Result<f64, ModelError> {
        Ok(angle_between_degrees(
            self.cell_normal(a)?,
            self.cell_normal(b)?,
        ))
    }

    /// True when two 2D cells share a mesh edge (two consecutive boundary
    /// points in each).
    pub fn cells_share_edge(&self, a: usize, b: usize) -> Result<bool, ModelError> {
        let (ca, cb) = (self.cell(a)?, self.cell(b)?);
        let mut shared = 0usize;
        for &p in &ca.points {
            if cb.points.contains(&p) {
                shared += 1;
            }
        }
        Ok(shared >= 2)
    }
}
