use tracing::debug;

use crate::error::{OperationError, Result};
use crate::math::Point3;
use crate::operations::creation::ConvexHull;
use crate::topology::Polyhedron;

/// Rounds every vertex position to a world grid and rebuilds the solid
/// from the snapped positions.
///
/// Rounding is half-away-from-zero on each axis, so `-0.5` on a unit
/// grid snaps to `-1`, symmetrically with `0.5` snapping to `1`.
/// Snapping may legitimately merge vertices; a snap that would collapse
/// the solid below a valid volume is rejected, leaving the original
/// untouched. Face payloads are reset by the rebuild.
pub struct SnapGrid {
    grid: f64,
}

impl SnapGrid {
    /// Creates a new `SnapGrid` operation with the given grid spacing.
    #[must_use]
    pub fn new(grid: f64) -> Self {
        Self { grid }
    }

    /// Executes the snap. Returns `Ok(false)` when snapping would
    /// degenerate the solid; the original is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid spacing is not positive.
    pub fn execute<P: Default>(&self, poly: &mut Polyhedron<P>) -> Result<bool> {
        if self.grid <= 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "grid spacing must be positive, got {}",
                self.grid
            ))
            .into());
        }
        if poly.is_empty() {
            return Ok(true);
        }

        let snapped: Vec<Point3> = poly
            .vertex_positions()
            .iter()
            .map(|q| {
                Point3::new(
                    snap(q.x, self.grid),
                    snap(q.y, self.grid),
                    snap(q.z, self.grid),
                )
            })
            .collect();
        let candidate: Polyhedron<P> = ConvexHull::new(snapped).execute();
        if candidate.is_empty() {
            debug!(grid = self.grid, "snap rejected: solid would degenerate");
            return Ok(false);
        }
        *poly = candidate;
        Ok(true)
    }
}

fn snap(value: f64, grid: f64) -> f64 {
    (value / grid).round() * grid
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Aabb;
    use crate::operations::creation::MakeCuboid;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn cuboid(min: Point3, max: Point3) -> Polyhedron {
        MakeCuboid::new(Aabb::new(min, max)).execute()
    }

    #[test]
    fn snapping_aligns_to_the_grid() {
        let mut solid = cuboid(p(0.1, -0.2, 0.3), p(0.9, 1.2, 1.6));
        let snapped = SnapGrid::new(1.0).execute(&mut solid).unwrap();
        assert!(snapped);
        let bounds = solid.bounds().unwrap();
        assert_relative_eq!((bounds.min - p(0.0, 0.0, 0.0)).norm(), 0.0, epsilon = 1e-12);
        assert_relative_eq!((bounds.max - p(1.0, 1.0, 2.0)).norm(), 0.0, epsilon = 1e-12);
        assert!(solid.validate().is_ok());
    }

    #[test]
    fn negative_halfway_coordinates_snap_away_from_zero() {
        let mut solid = cuboid(p(-0.5, -0.5, -0.5), p(0.5, 0.5, 0.5));
        assert!(SnapGrid::new(1.0).execute(&mut solid).unwrap());
        let bounds = solid.bounds().unwrap();
        assert_relative_eq!((bounds.min - p(-1.0, -1.0, -1.0)).norm(), 0.0, epsilon = 1e-12);
        assert_relative_eq!((bounds.max - p(1.0, 1.0, 1.0)).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn collapsing_snap_is_rejected() {
        let mut solid = cuboid(p(0.1, 0.1, 0.1), p(0.4, 0.4, 0.4));
        let before = solid.vertex_positions();
        let snapped = SnapGrid::new(1.0).execute(&mut solid).unwrap();
        assert!(!snapped);
        assert_eq!(solid.vertex_positions(), before);
    }

    #[test]
    fn non_positive_grid_is_an_error() {
        let mut solid = cuboid(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        assert!(SnapGrid::new(0.0).execute(&mut solid).is_err());
        assert!(SnapGrid::new(-4.0).execute(&mut solid).is_err());
    }
}
