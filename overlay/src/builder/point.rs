use crate::{
    geom::Coordinate,
    geometry::{Curve, Surface},
    graph::PlanarGraph,
    operation::{is_result_of_op, OverlayOp},
};

use super::is_covered_by_line_or_area;

/// Builds the result points: nodes that the operation keeps, that no result
/// edge passes through and that aren't covered by a result curve or surface.
///
/// Only isolated nodes can be result points, except in an intersection, where
/// two geometries can meet in a single point of their boundaries.
pub fn build_points(
    graph: &PlanarGraph,
    op: OverlayOp,
    curves: &[Curve],
    surfaces: &[Surface],
) -> Vec<Coordinate> {
    let mut ret = Vec::new();
    for n in graph.node_indices() {
        let node = &graph[n];
        if node.star.iter().any(|de| graph.edge(*de).in_result) {
            continue;
        }
        if !node.star.is_empty() && op != OverlayOp::Intersection {
            continue;
        }
        let label = &node.label;
        if is_result_of_op(label.location(0), label.location(1), op)
            && !is_covered_by_line_or_area(&node.coord, curves, surfaces)
        {
            ret.push(node.coord);
        }
    }
    log::debug!("built {} result points", ret.len());
    ret
}
