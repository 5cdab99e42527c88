/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons, in world
/// units. A point within this distance of a plane counts as lying on it.
pub const EPSILON: f64 = 1e-4;

/// Tolerance for normal-parallelism tests (`1 - |dot|` of unit normals).
pub const ANGULAR_EPSILON: f64 = 1e-6;

/// Arithmetic mean of a set of points. Returns the origin for an empty
/// slice.
#[must_use]
pub fn centroid(points: &[Point3]) -> Point3 {
    if points.is_empty() {
        return Point3::origin();
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    #[allow(clippy::cast_precision_loss)]
    Point3::from(sum / points.len() as f64)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn centroid_of_square() {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        let c = centroid(&pts);
        assert!((c - Point3::new(1.0, 1.0, 0.0)).norm() < EPSILON);
    }

    #[test]
    fn centroid_of_empty_is_origin() {
        assert_eq!(centroid(&[]), Point3::origin());
    }
}
