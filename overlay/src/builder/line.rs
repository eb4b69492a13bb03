use crate::{
    geometry::{Curve, Surface},
    graph::{EdgeIdx, HalfEdgeIdx, PlanarGraph},
    operation::{is_result_of_op, OverlayOp},
};

use super::is_covered_by_area;

/// Builds the result curves: line edges that the operation keeps and that
/// aren't already covered by a result surface.
///
/// Each noded edge becomes its own curve. Curves are not merged end to end.
pub fn build_lines(graph: &mut PlanarGraph, op: OverlayOp, surfaces: &[Surface]) -> Vec<Curve> {
    find_covered_line_edges(graph, surfaces);

    let mut line_edges = Vec::new();
    for de in graph.half_edges() {
        collect_line_edge(graph, de, op, &mut line_edges);
        collect_boundary_touch_edge(graph, de, op, &mut line_edges);
    }

    let curves: Vec<_> = line_edges
        .into_iter()
        .map(|e| {
            let edge = &mut graph.edges[e.0];
            edge.in_result = true;
            Curve {
                coords: edge.pts().to_vec(),
            }
        })
        .collect();
    log::debug!("built {} result curves", curves.len());
    curves
}

fn find_covered_line_edges(graph: &mut PlanarGraph, surfaces: &[Surface]) {
    for n in graph.node_indices() {
        graph.find_covered_line_edges(n);
    }

    // Line edges whose nodes didn't settle it (because no result area edge
    // meets them) are tested directly.
    for de in graph.half_edges() {
        if graph.des[de].is_line_edge() && graph.edge(de).covered.is_none() {
            let covered = is_covered_by_area(&graph.des[de].coord(), surfaces);
            graph.edge_mut(de).covered = Some(covered);
        }
    }
}

fn mark_visited(graph: &mut PlanarGraph, de: HalfEdgeIdx) {
    graph.des[de].visited = true;
    graph.des[de.sym()].visited = true;
}

fn collect_line_edge(
    graph: &mut PlanarGraph,
    de: HalfEdgeIdx,
    op: OverlayOp,
    out: &mut Vec<EdgeIdx>,
) {
    let d = &graph.des[de];
    if !d.is_line_edge() || d.visited {
        return;
    }
    let keep = is_result_of_op(d.label.location(0), d.label.location(1), op);
    if keep && !graph.edge(de).is_covered() {
        out.push(de.edge());
        mark_visited(graph, de);
    }
}

// In an intersection, the boundaries of two areas can touch along an edge
// without their interiors meeting. That edge is part of the result.
fn collect_boundary_touch_edge(
    graph: &mut PlanarGraph,
    de: HalfEdgeIdx,
    op: OverlayOp,
    out: &mut Vec<EdgeIdx>,
) {
    let d = &graph.des[de];
    if d.is_line_edge() || d.visited || d.is_interior_area_edge() || graph.edge(de).in_result {
        return;
    }
    if op == OverlayOp::Intersection
        && is_result_of_op(
            d.label.location(0),
            d.label.location(1),
            OverlayOp::Intersection,
        )
    {
        out.push(de.edge());
        mark_visited(graph, de);
    }
}
