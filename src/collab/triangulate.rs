//! Planar triangulation collaborator.
//!
//! A triangulator takes a planar straight-line graph (points, boundary
//! segments, hole seeds) plus optional quality constraints and produces a
//! triangle mesh. The kernel only consumes the interface; implementations
//! wrap whatever meshing engine the application links.

use crate::model_error::ModelError;

/// Result of one triangulation run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangulationOutput {
    pub points: Vec<[f64; 2]>,
    /// Point-index pairs along the (possibly refined) boundary.
    pub segments: Vec<[usize; 2]>,
    /// Point-index triples, counter-clockwise.
    pub triangles: Vec<[usize; 3]>,
}

impl TriangulationOutput {
    /// Rejects a run that produced nothing usable.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.points.is_empty() {
            return Err(ModelError::InvalidGeometry(
                "triangulation produced no points".into(),
            ));
        }
        if self.segments.is_empty() {
            return Err(ModelError::InvalidGeometry(
                "triangulation produced no segments".into(),
            ));
        }
        if self.triangles.is_empty() {
            return Err(ModelError::InvalidGeometry(
                "triangulation produced no triangles".into(),
            ));
        }
        Ok(())
    }
}

/// Interface to an external planar meshing engine.
///
/// Callers size the input with [`prepare`](Self::prepare), fill it with the
/// per-index setters, optionally toggle quality constraints, then call
/// [`triangulate`](Self::triangulate).
pub trait PlanarTriangulator {
    /// Allocates input storage for the given counts, clearing prior input.
    fn prepare(&mut self, points: usize, segments: usize, holes: usize);

    fn set_point(&mut self, index: usize, x: f64, y: f64) -> Result<(), ModelError>;

    /// A boundary segment between two input point indices.
    fn set_segment(&mut self, index: usize, a: usize, b: usize) -> Result<(), ModelError>;

    /// A seed point inside a hole to be left unmeshed.
    fn set_hole(&mut self, index: usize, x: f64, y: f64) -> Result<(), ModelError>;

    /// Enforce a minimum angle (degrees) on output triangles.
    fn set_minimum_angle(&mut self, degrees: Option<f64>);

    /// Enforce a maximum area on output triangles.
    fn set_maximum_area(&mut self, area: Option<f64>);

    /// Runs the engine; the returned output has already passed
    /// [`TriangulationOutput::validate`].
    fn triangulate(&mut self) -> Result<TriangulationOutput, ModelError>;
}
