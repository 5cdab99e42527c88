use slotmap::SecondaryMap;
use tracing::{debug, trace};

use crate::geometry::{Plane, PointStatus};
use crate::math::EPSILON;
use crate::topology::{EdgeKey, FaceKey, HalfEdgeKey, Polyhedron, VertexKey};

use super::merge_faces::MergeFaces;

/// Outcome of clipping a polyhedron by a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipResult {
    /// The plane does not cut the solid; nothing changed.
    Unchanged,
    /// The solid was cut; the new cap face lies on the clip plane.
    Clipped(FaceKey),
    /// The whole solid lay above the plane; it is now empty.
    Emptied,
}

/// Removes the part of a convex solid lying above a plane and caps the
/// cut with a new face on that plane.
///
/// Vertices within the epsilon band around the plane classify as
/// on-plane and are never discarded, so a clip plane coincident with an
/// existing face is a no-op and shared vertices survive exactly.
///
/// Clipping that would leave no volume yields the empty polyhedron, not
/// an error; the caller checks the result.
pub struct ClipPlane {
    plane: Plane,
    epsilon: f64,
}

impl ClipPlane {
    /// Creates a clip operation with the kernel's default tolerance.
    #[must_use]
    pub fn new(plane: Plane) -> Self {
        Self::with_epsilon(plane, EPSILON)
    }

    /// Creates a clip operation with a caller-supplied on-plane
    /// half-width.
    #[must_use]
    pub fn with_epsilon(plane: Plane, epsilon: f64) -> Self {
        Self { plane, epsilon }
    }

    /// Executes the clip.
    ///
    /// The polyhedron is either transformed into a valid clipped solid,
    /// left untouched, or emptied; it is never left in a partial state.
    pub fn execute<P: Default>(&self, poly: &mut Polyhedron<P>) -> ClipResult {
        if poly.is_empty() {
            return ClipResult::Unchanged;
        }

        // 1. Classify every vertex against the clip plane.
        let mut status: SecondaryMap<VertexKey, PointStatus> = SecondaryMap::new();
        let mut above = 0usize;
        let mut below = 0usize;
        for v in poly.vertices() {
            let s = self
                .plane
                .point_status(&poly.vertices[v].position(), self.epsilon);
            match s {
                PointStatus::Above => above += 1,
                PointStatus::Below => below += 1,
                PointStatus::On => {}
            }
            status.insert(v, s);
        }

        // 2. Trivial cases.
        if above == 0 {
            trace!(below, "clip plane does not cut the solid");
            return ClipResult::Unchanged;
        }
        if below == 0 {
            debug!("clip plane removes the whole solid");
            poly.clear();
            return ClipResult::Emptied;
        }

        // 3. Split every edge that crosses the plane strictly; the new
        // vertices lie on the plane.
        let crossing: Vec<EdgeKey> = poly
            .edges()
            .filter(|&e| {
                let (a, b) = poly.edge_endpoints(e);
                matches!(
                    (status[a], status[b]),
                    (PointStatus::Above, PointStatus::Below)
                        | (PointStatus::Below, PointStatus::Above)
                )
            })
            .collect();
        for e in crossing {
            let (a, b) = poly.edge_endpoints(e);
            let pa = poly.vertices[a].position();
            let pb = poly.vertices[b].position();
            let t = self.plane.intersect_segment(&pa, &pb);
            let w = poly.split_edge(e, pa + (pb - pa) * t);
            status.insert(w, PointStatus::On);
        }

        // 4. Per face: drop faces with nothing below the plane, and
        // replace each crossing face's above arc with a seam half-edge.
        let face_keys: Vec<FaceKey> = poly.faces().collect();
        let mut seams = 0usize;
        for f in face_keys {
            let mut has_above = false;
            let mut has_below = false;
            for h in poly.faces[f].boundary().iter(&poly.half_edges) {
                match status[poly.half_edges[h].origin()] {
                    PointStatus::Above => has_above = true,
                    PointStatus::Below => has_below = true,
                    PointStatus::On => {}
                }
            }
            if !has_above {
                continue;
            }
            if has_below {
                self.replace_above_arc(poly, f, &status);
                seams += 1;
            } else {
                poly.detach_face(f);
            }
        }

        // 5. Destroy everything with an endpoint above the plane.
        let dead_edges: Vec<EdgeKey> = poly
            .edges()
            .filter(|&e| {
                let (a, b) = poly.edge_endpoints(e);
                status[a] == PointStatus::Above || status[b] == PointStatus::Above
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
        let dead_vertices: Vec<VertexKey> = poly
            .vertices()
            .filter(|&v| status[v] == PointStatus::Above)
            .collect();
        for v in dead_vertices {
            poly.destroy_vertex(v);
        }

        // 6. Chain the faceless on-plane half-edges into the cap face.
        let Some(cap) = Self::build_cap(poly) else {
            debug!("clip left no closed cap; solid is degenerate");
            poly.clear();
            return ClipResult::Emptied;
        };
        poly.rebuild_leaving();

        // 7. Fold faces coplanar with the cap into it.
        let merged = Self::merge_coplanar_neighbours(poly, cap, self.epsilon);

        debug!(
            seams,
            merged,
            faces = poly.face_count(),
            vertices = poly.vertex_count(),
            edges = poly.edge_count(),
            "clipped solid"
        );
        debug_assert!(poly.validate().is_ok());
        ClipResult::Clipped(cap)
    }

    /// Replaces the contiguous run of boundary half-edges with an
    /// above-plane endpoint by one new half-edge between the flanking
    /// on-plane vertices. The twin of that seam half-edge stays
    /// faceless for the cap to adopt.
    fn replace_above_arc<P>(
        &self,
        poly: &mut Polyhedron<P>,
        f: FaceKey,
        status: &SecondaryMap<VertexKey, PointStatus>,
    ) {
        let qualifies = |poly: &Polyhedron<P>, h: HalfEdgeKey| {
            status[poly.half_edges[h].origin()] == PointStatus::Above
                || status[poly.destination(h)] == PointStatus::Above
        };

        let Some(seed) = poly.faces[f]
            .boundary()
            .iter(&poly.half_edges)
            .find(|&h| qualifies(poly, h))
        else {
            debug_assert!(false, "face has no above arc");
            return;
        };

        let mut arc_start = seed;
        loop {
            let prev = poly.half_edges[arc_start].previous();
            if !qualifies(poly, prev) {
                break;
            }
            arc_start = prev;
            debug_assert_ne!(arc_start, seed, "above arc covers the whole boundary");
        }
        let mut arc_end = seed;
        loop {
            let next = poly.half_edges[arc_end].next();
            if !qualifies(poly, next) {
                break;
            }
            arc_end = next;
        }

        let v_from = poly.half_edges[arc_start].origin();
        let v_to = poly.destination(arc_end);
        debug_assert_eq!(status[v_from], PointStatus::On);
        debug_assert_eq!(status[v_to], PointStatus::On);

        let seam = poly.new_half_edge(v_from);
        let cap_side = poly.new_half_edge(v_to);
        poly.pair_half_edges(seam, cap_side);
        poly.faces[f].replace_boundary(&mut poly.half_edges, arc_start, arc_end, seam, 1);
    }

    /// Chains all faceless half-edges (their endpoints lie on the clip
    /// plane) into one cycle and builds the cap face from it. Returns
    /// `None` when no closed cycle of at least 3 half-edges exists.
    fn build_cap<P: Default>(poly: &mut Polyhedron<P>) -> Option<FaceKey> {
        let mut by_origin: SecondaryMap<VertexKey, HalfEdgeKey> = SecondaryMap::new();
        let mut orphans = 0usize;
        let mut start = None;
        for (h, half_edge) in &poly.half_edges {
            if half_edge.face().is_none() {
                by_origin.insert(half_edge.origin(), h);
                start.get_or_insert(h);
                orphans += 1;
            }
        }
        let start = start?;
        if orphans < 3 {
            return None;
        }

        let first_origin = poly.half_edges[start].origin();
        let mut chain = Vec::with_capacity(orphans);
        let mut cursor = start;
        loop {
            chain.push(cursor);
            // A detached half-edge has no usable links; its destination
            // is its twin's origin.
            let twin = poly.twin(cursor)?;
            let dest = poly.half_edges[twin].origin();
            if dest == first_origin {
                break;
            }
            if chain.len() > orphans {
                return None;
            }
            cursor = *by_origin.get(dest)?;
        }
        if chain.len() != orphans {
            return None;
        }

        let cap = poly.new_face(P::default(), &chain);
        debug_assert!(
            poly.faces[cap]
                .normal(&poly.half_edges, &poly.vertices)
                .norm() > 0.0
        );
        Some(cap)
    }

    /// Merges every face coplanar with the cap into the cap, repeating
    /// until no neighbour qualifies. Returns the number merged.
    fn merge_coplanar_neighbours<P: Default>(
        poly: &mut Polyhedron<P>,
        cap: FaceKey,
        epsilon: f64,
    ) -> usize {
        let mut merged = 0usize;
        loop {
            let neighbours: Vec<FaceKey> = poly.faces[cap]
                .boundary()
                .iter(&poly.half_edges)
                .filter_map(|h| poly.twin(h))
                .filter_map(|t| poly.half_edges[t].face())
                .collect();
            let candidate = neighbours.into_iter().find(|&n| {
                n != cap
                    && poly.faces[cap].coplanar(
                        &poly.half_edges,
                        &poly.vertices,
                        &poly.faces[n],
                        epsilon,
                    )
            });
            let Some(n) = candidate else {
                break;
            };
            if !matches!(MergeFaces::new(cap, n).execute(poly), Ok(true)) {
                break;
            }
            merged += 1;
        }
        merged
    }
}
