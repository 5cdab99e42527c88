use std::collections::HashSet;

use tracing::trace;

use crate::error::Result;
use crate::math::EPSILON;
use crate::topology::{FaceKey, HalfEdgeKey, Polyhedron, VertexKey};

/// Fuses two adjacent coplanar faces into one.
///
/// The faces must share a contiguous run of edges; the shared run is
/// dissolved, the second face's remaining boundary is spliced into the
/// first, and junction vertices left with only two collinear edges are
/// removed. Coplanarity is the caller's precondition (checked only by
/// the debug-time validation pass); merging non-coplanar faces breaks
/// the planarity invariant.
pub struct MergeFaces {
    keep: FaceKey,
    merge: FaceKey,
}

impl MergeFaces {
    /// Creates a merge of `merge` into `keep`.
    #[must_use]
    pub fn new(keep: FaceKey, merge: FaceKey) -> Self {
        Self { keep, merge }
    }

    /// Executes the merge. Returns `Ok(false)` when the faces share no
    /// edge (nothing to merge).
    ///
    /// # Errors
    ///
    /// Returns an error if either face key is stale.
    pub fn execute<P>(&self, poly: &mut Polyhedron<P>) -> Result<bool> {
        poly.face(self.keep)?;
        poly.face(self.merge)?;
        debug_assert_ne!(self.keep, self.merge);

        // Shared run: half-edges of `keep` whose twins belong to
        // `merge`.
        let shared: Vec<HalfEdgeKey> = poly.faces[self.keep]
            .boundary()
            .iter(&poly.half_edges)
            .filter(|&h| {
                poly.twin(h)
                    .and_then(|t| poly.half_edges[t].face())
                    == Some(self.merge)
            })
            .collect();
        if shared.is_empty() {
            return Ok(false);
        }
        let merge_len = poly.faces[self.merge].vertex_count();
        if shared.len() >= merge_len {
            // The faces are glued along the whole second boundary;
            // merging would not leave a valid loop.
            return Ok(false);
        }

        // Rotate to the start of the contiguous run.
        let shared_set: HashSet<HalfEdgeKey> = shared.iter().copied().collect();
        let Some(&run_first) = shared
            .iter()
            .find(|&&h| !shared_set.contains(&poly.half_edges[h].previous()))
        else {
            return Ok(false);
        };
        let mut run_last = run_first;
        let mut run_len = 1;
        while shared_set.contains(&poly.half_edges[run_last].next()) {
            run_last = poly.half_edges[run_last].next();
            run_len += 1;
        }
        debug_assert_eq!(run_len, shared.len(), "shared edges are not contiguous");

        let junction_start = poly.half_edges[run_first].origin();
        let junction_end = poly.destination(run_last);

        // The twins bound the same run from the other side, in reverse
        // order; everything after them in `merge` survives.
        let twin_of = |poly: &Polyhedron<P>, h| {
            poly.twin(h).unwrap_or_default()
        };
        let t_first = twin_of(poly, run_first);
        let t_last = twin_of(poly, run_last);
        let with_start = poly.half_edges[t_first].next();
        let with_count = merge_len - run_len;

        // Detach the twin run, then the survivors, leaving the
        // survivors as a faceless open chain ready to splice.
        poly.faces[self.merge].remove_from_boundary(&mut poly.half_edges, t_last, t_first);
        let survivors_last = poly.half_edges[with_start].previous();
        poly.faces[self.merge].remove_from_boundary(
            &mut poly.half_edges,
            with_start,
            survivors_last,
        );
        poly.faces[self.keep].replace_boundary(
            &mut poly.half_edges,
            run_first,
            run_last,
            with_start,
            with_count,
        );

        // Dissolve the shared edges.
        for h in shared {
            let twin = twin_of(poly, h);
            if let Some(edge) = poly.half_edges[h].edge() {
                poly.destroy_edge(edge);
            }
            poly.half_edges[h].set_edge(None);
            poly.half_edges[twin].set_edge(None);
            poly.destroy_half_edge(h);
            poly.destroy_half_edge(twin);
        }
        poly.detach_face(self.merge);

        for junction in [junction_start, junction_end] {
            remove_redundant_vertex(poly, junction);
        }
        poly.rebuild_leaving();

        trace!(keep = ?self.keep, merged = ?self.merge, "merged coplanar neighbour");
        debug_assert!(poly.validate().is_ok());
        Ok(true)
    }
}

/// Sweeps the whole solid, fusing every adjacent coplanar face pair
/// until none remains. Returns the number of merges performed.
pub(crate) fn merge_all_coplanar<P>(poly: &mut Polyhedron<P>, epsilon: f64) -> usize {
    let mut merged = 0usize;
    loop {
        let candidate = poly.edges().find_map(|e| {
            let edge = &poly.edges[e];
            let first = poly.half_edges[edge.first()].face()?;
            let second = poly.half_edges[edge.second()?].face()?;
            let coplanar = first != second
                && poly.faces[first].coplanar(
                    &poly.half_edges,
                    &poly.vertices,
                    &poly.faces[second],
                    epsilon,
                );
            coplanar.then_some((first, second))
        });
        let Some((keep, merge)) = candidate else {
            break;
        };
        if matches!(MergeFaces::new(keep, merge).execute(poly), Ok(true)) {
            merged += 1;
        } else {
            break;
        }
    }
    merged
}

/// Removes a vertex that joins exactly two edges running collinearly,
/// fusing the two edges into one. Returns `false` when the vertex does
/// not qualify.
fn remove_redundant_vertex<P>(poly: &mut Polyhedron<P>, vertex: VertexKey) -> bool {
    let outgoing: Vec<HalfEdgeKey> = poly
        .half_edges
        .iter()
        .filter(|(_, he)| he.origin() == vertex && he.face().is_some())
        .map(|(h, _)| h)
        .collect();
    if outgoing.len() != 2 {
        return false;
    }

    let h_out = outgoing[0];
    let h_in = poly.half_edges[h_out].previous();
    let a = poly.vertices[poly.half_edges[h_in].origin()].position();
    let b = poly.vertices[vertex].position();
    let c = poly.vertices[poly.destination(h_out)].position();
    if (b - a).cross(&(c - b)).norm() > EPSILON {
        return false;
    }

    let (Some(t_out), Some(t_in)) = (poly.twin(h_out), poly.twin(h_in)) else {
        return false;
    };
    debug_assert_eq!(outgoing[1], t_in);
    let (Some(f), Some(g)) = (poly.half_edges[h_out].face(), poly.half_edges[t_in].face())
    else {
        return false;
    };
    if poly.faces[f].vertex_count() <= 3 || poly.faces[g].vertex_count() <= 3 {
        return false;
    }

    poly.faces[f].remove_from_boundary(&mut poly.half_edges, h_out, h_out);
    poly.faces[g].remove_from_boundary(&mut poly.half_edges, t_in, t_in);

    // The surviving pair spans the fused edge: h_in with t_out.
    let Some(e_in) = poly.half_edges[h_in].edge() else {
        return false;
    };
    let e_out = poly.half_edges[h_out].edge();
    poly.edges[e_in].make_first(h_in);
    poly.edges[e_in].set_second(Some(t_out));
    poly.half_edges[t_out].set_edge(Some(e_in));
    if let Some(e_out) = e_out {
        poly.destroy_edge(e_out);
    }
    poly.half_edges[h_out].set_edge(None);
    poly.half_edges[t_in].set_edge(None);
    poly.destroy_half_edge(h_out);
    poly.destroy_half_edge(t_in);
    poly.destroy_vertex(vertex);
    true
}
