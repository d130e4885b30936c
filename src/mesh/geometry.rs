//! Small geometric helpers over master-mesh coordinates.

const EPS: f64 = 1e-12;

#[inline]
pub(crate) fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub(crate) fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

/// Area vector of a planar polygon (Newell's method); robust for convex and
/// mildly non-convex cells. The magnitude is twice the area.
pub(crate) fn polygon_area_vector(points: &[[f64; 3]]) -> [f64; 3] {
    let mut n = [0.0; 3];
    for (i, a) in points.iter().enumerate() {
        let b = &points[(i + 1) % points.len()];
        n[0] += (a[1] - b[1]) * (a[2] + b[2]);
        n[1] += (a[2] - b[2]) * (a[0] + b[0]);
        n[2] += (a[0] - b[0]) * (a[1] + b[1]);
    }
    n
}

/// Angle between two direction vectors, in degrees within `[0, 180]`.
///
/// Degenerate (near-zero) vectors are treated as maximally dissimilar so a
/// collapsed cell never glues two components together.
pub(crate) fn angle_between_degrees(a: [f64; 3], b: [f64; 3]) -> f64 {
    let (na, nb) = (norm(a), norm(b));
    if na < EPS || nb < EPS {
        return 180.0;
    }
    let cos = (dot(a, b) / (na * nb)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_area_vector_points_up() {
        let n = polygon_area_vector(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        assert!(n[2] > 0.0);
        assert!((norm(n) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn angle_between_orthogonal_normals() {
        let a = [0.0, 0.0, 1.0];
        let b = [1.0, 0.0, 0.0];
        assert!((angle_between_degrees(a, b) - 90.0).abs() < 1e-9);
        assert_eq!(angle_between_degrees([0.0; 3], b), 180.0);
    }
}
