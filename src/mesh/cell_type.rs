//! Cell type metadata for master-mesh cells.

/// Cell types the discrete kernel classifies.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CellType {
    /// 0D vertex cell.
    Vertex,
    /// 1D segment (curve cell).
    Segment,
    /// 2D simplex.
    Triangle,
    /// 2D tensor-product cell.
    Quadrilateral,
    /// 2D polygon with `n` vertices.
    Polygon(u8),
}

impl Default for CellType {
    fn default() -> Self {
        CellType::Vertex
    }
}

impl CellType {
    /// Topological dimension of the cell.
    pub fn dimension(self) -> u8 {
        match self {
            CellType::Vertex => 0,
            CellType::Segment => 1,
            CellType::Triangle | CellType::Quadrilateral | CellType::Polygon(_) => 2,
        }
    }

    /// Expected vertex count, when fixed by the type.
    pub fn vertex_count(self) -> Option<usize> {
        match self {
            CellType::Vertex => Some(1),
            CellType::Segment => Some(2),
            CellType::Triangle => Some(3),
            CellType::Quadrilateral => Some(4),
            CellType::Polygon(n) => Some(usize::from(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions() {
        assert_eq!(CellType::Segment.dimension(), 1);
        assert_eq!(CellType::Polygon(6).dimension(), 2);
        assert_eq!(CellType::Polygon(6).vertex_count(), Some(6));
    }
}
