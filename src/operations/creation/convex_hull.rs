use std::collections::HashSet;

use tracing::{debug, warn};

use crate::geometry::PointStatus;
use crate::math::{Point3, EPSILON};
use crate::operations::modification::merge_faces::merge_all_coplanar;
use crate::topology::{EdgeKey, FaceKey, HalfEdge, HalfEdgeKey, Polyhedron, VertexKey};

/// Builds the convex hull of a point set as a closed polyhedron.
///
/// Incremental construction: a tetrahedron over four extreme points,
/// then one visibility/horizon/cone pass per remaining point, and a
/// final fusion of coplanar neighbour faces. Fewer than four points, or
/// a collinear/coplanar set, yields the empty polyhedron.
///
/// The result is deterministic for a given input order.
pub struct ConvexHull {
    points: Vec<Point3>,
}

impl ConvexHull {
    /// Creates a new `ConvexHull` operation.
    #[must_use]
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// Executes the operation, building the hull.
    #[must_use]
    pub fn execute<P: Default>(&self) -> Polyhedron<P> {
        let Some(seed) = seed_tetrahedron(&self.points) else {
            debug!(points = self.points.len(), "degenerate hull input");
            return Polyhedron::new();
        };

        let mut poly = Polyhedron::new();
        let verts: Vec<VertexKey> = seed
            .iter()
            .map(|&i| poly.new_vertex(self.points[i]))
            .collect();
        poly.weave_faces(&[
            vec![verts[0], verts[1], verts[2]],
            vec![verts[0], verts[3], verts[1]],
            vec![verts[1], verts[3], verts[2]],
            vec![verts[2], verts[3], verts[0]],
        ]);

        for (i, &point) in self.points.iter().enumerate() {
            if !seed.contains(&i) {
                hull_insert_point(&mut poly, point);
            }
        }
        merge_all_coplanar(&mut poly, EPSILON);

        debug_assert!(poly.validate().is_ok());
        poly
    }
}

/// Four point indices spanning a non-degenerate tetrahedron, ordered so
/// the fourth lies below the plane of the first three. `None` when no
/// such tetrahedron exists.
fn seed_tetrahedron(points: &[Point3]) -> Option<[usize; 4]> {
    let first = *points.first()?;

    let (i1, _) = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, (p - first).norm()))
        .max_by(|a, b| a.1.total_cmp(&b.1))?;
    let dir = points[i1] - first;
    if dir.norm() < EPSILON {
        return None;
    }
    let dir = dir.normalize();

    let (i2, line_dist) = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, (p - first).cross(&dir).norm()))
        .max_by(|a, b| a.1.total_cmp(&b.1))?;
    if line_dist < EPSILON {
        return None;
    }

    let normal = (points[i1] - first).cross(&(points[i2] - first)).normalize();
    let (i3, plane_dist) = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, (p - first).dot(&normal)))
        .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))?;
    if plane_dist.abs() < EPSILON {
        return None;
    }

    // The fourth point must end up below the base triangle's plane.
    if plane_dist > 0.0 {
        Some([0, i2, i1, i3])
    } else {
        Some([0, i1, i2, i3])
    }
}

/// Grows a valid hull by one point: collect the faces the point sees,
/// walk their horizon, remove the visible region and re-cone it to the
/// point. Returns `false` (leaving the hull untouched) when the point
/// is already inside or on the hull.
pub(crate) fn hull_insert_point<P: Default>(poly: &mut Polyhedron<P>, point: Point3) -> bool {
    let visible: Vec<FaceKey> = poly
        .faces()
        .filter(|&f| {
            poly.faces[f].point_status(&poly.half_edges, &poly.vertices, &point, EPSILON)
                == PointStatus::Above
        })
        .collect();
    if visible.is_empty() {
        return false;
    }
    let visible_set: HashSet<FaceKey> = visible.iter().copied().collect();

    // Horizon: half-edges of visible faces whose twin looks at a
    // surviving face. Collected with endpoints while still attached.
    let mut horizon: Vec<(HalfEdgeKey, VertexKey, VertexKey)> = Vec::new();
    for &f in &visible {
        for h in poly.faces[f].boundary().iter(&poly.half_edges) {
            let surviving = poly
                .twin(h)
                .and_then(|t| poly.half_edges[t].face())
                .is_some_and(|g| !visible_set.contains(&g));
            if surviving {
                horizon.push((h, poly.half_edges[h].origin(), poly.destination(h)));
            }
        }
    }
    let Some(ordered) = order_horizon(&horizon) else {
        warn!("horizon of visible region is not a single loop; point skipped");
        return false;
    };

    for f in visible {
        poly.detach_face(f);
    }

    // Interior edges of the removed region have lost both faces.
    let dead_edges: Vec<EdgeKey> = poly
        .edges()
        .filter(|&e| {
            let edge = &poly.edges[e];
            poly.half_edges[edge.first()].face().is_none()
                && edge
                    .second()
                    .is_some_and(|s| poly.half_edges[s].face().is_none())
        })
        .collect();
    for e in dead_edges {
        let first = poly.edges[e].first();
        let second = poly.edges[e].second();
        poly.destroy_edge(e);
        poly.half_edges[first].set_edge(None);
        poly.destroy_half_edge(first);
        if let Some(second) = second {
            poly.half_edges[second].set_edge(None);
            poly.destroy_half_edge(second);
        }
    }
    let referenced: HashSet<VertexKey> = poly.half_edges.values().map(HalfEdge::origin).collect();
    let dead_vertices: Vec<VertexKey> = poly
        .vertices()
        .filter(|v| !referenced.contains(v))
        .collect();
    for v in dead_vertices {
        poly.destroy_vertex(v);
    }

    // Cone: one triangle per horizon edge, fanning to the new apex.
    let apex = poly.new_vertex(point);
    let n = ordered.len();
    let rims: Vec<HalfEdgeKey> = ordered
        .iter()
        .map(|&(_, _, dest)| poly.new_half_edge(dest))
        .collect();
    let spokes: Vec<HalfEdgeKey> = (0..n).map(|_| poly.new_half_edge(apex)).collect();
    for i in 0..n {
        poly.pair_half_edges(rims[i], spokes[(i + 1) % n]);
    }
    for (i, &(h, _, _)) in ordered.iter().enumerate() {
        poly.new_face(P::default(), &[h, rims[i], spokes[i]]);
    }
    poly.rebuild_leaving();
    true
}

/// Orders horizon half-edges into one origin-to-destination loop.
fn order_horizon(
    horizon: &[(HalfEdgeKey, VertexKey, VertexKey)],
) -> Option<Vec<(HalfEdgeKey, VertexKey, VertexKey)>> {
    let by_origin: std::collections::HashMap<VertexKey, usize> = horizon
        .iter()
        .enumerate()
        .map(|(i, &(_, origin, _))| (origin, i))
        .collect();
    if by_origin.len() != horizon.len() {
        return None;
    }

    let mut ordered = Vec::with_capacity(horizon.len());
    let mut cursor = 0usize;
    loop {
        ordered.push(horizon[cursor]);
        let dest = horizon[cursor].2;
        if dest == horizon[0].1 {
            break;
        }
        if ordered.len() > horizon.len() {
            return None;
        }
        cursor = *by_origin.get(&dest)?;
    }
    (ordered.len() == horizon.len()).then_some(ordered)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn cube_corners() -> Vec<Point3> {
        vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
            p(1.0, 0.0, 1.0),
            p(1.0, 1.0, 1.0),
            p(0.0, 1.0, 1.0),
        ]
    }

    #[test]
    fn tetrahedron_from_four_points() {
        let hull: Polyhedron = ConvexHull::new(vec![
            p(0.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
            p(0.0, 2.0, 0.0),
            p(0.0, 0.0, 2.0),
        ])
        .execute();
        assert_eq!(hull.face_count(), 4);
        assert_eq!(hull.vertex_count(), 4);
        assert_eq!(hull.edge_count(), 6);
        assert!(hull.validate().is_ok());
    }

    #[test]
    fn hull_of_cube_corners_is_the_cube() {
        let hull: Polyhedron = ConvexHull::new(cube_corners()).execute();
        assert_eq!(hull.face_count(), 6);
        assert_eq!(hull.vertex_count(), 8);
        assert_eq!(hull.edge_count(), 12);
        assert!(hull.validate().is_ok());
        for f in hull.faces() {
            assert_eq!(hull.face(f).unwrap().vertex_count(), 4);
        }

        let bounds = hull.bounds().unwrap();
        assert_relative_eq!((bounds.min - p(0.0, 0.0, 0.0)).norm(), 0.0, epsilon = EPSILON);
        assert_relative_eq!((bounds.max - p(1.0, 1.0, 1.0)).norm(), 0.0, epsilon = EPSILON);
    }

    #[test]
    fn interior_points_do_not_affect_the_hull() {
        let mut points = cube_corners();
        points.push(p(0.5, 0.5, 0.5));
        points.push(p(0.25, 0.75, 0.5));
        let hull: Polyhedron = ConvexHull::new(points).execute();
        assert_eq!(hull.face_count(), 6);
        assert_eq!(hull.vertex_count(), 8);
    }

    #[test]
    fn duplicate_points_collapse() {
        let mut points = cube_corners();
        points.extend(cube_corners());
        let hull: Polyhedron = ConvexHull::new(points).execute();
        assert_eq!(hull.vertex_count(), 8);
        assert!(hull.validate().is_ok());
    }

    #[test]
    fn collinear_input_yields_empty() {
        let hull: Polyhedron = ConvexHull::new(vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
            p(3.0, 0.0, 0.0),
        ])
        .execute();
        assert!(hull.is_empty());
    }

    #[test]
    fn coplanar_input_yields_empty() {
        let hull: Polyhedron = ConvexHull::new(vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.5, 0.5, 0.0),
        ])
        .execute();
        assert!(hull.is_empty());
    }

    #[test]
    fn too_few_points_yield_empty() {
        let hull: Polyhedron =
            ConvexHull::new(vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)]).execute();
        assert!(hull.is_empty());
    }

    #[test]
    fn octahedron_hull() {
        let hull: Polyhedron = ConvexHull::new(vec![
            p(1.0, 0.0, 0.0),
            p(-1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, -1.0, 0.0),
            p(0.0, 0.0, 1.0),
            p(0.0, 0.0, -1.0),
        ])
        .execute();
        assert_eq!(hull.face_count(), 8);
        assert_eq!(hull.vertex_count(), 6);
        assert_eq!(hull.edge_count(), 12);
        assert!(hull.validate().is_ok());
    }
}
