//! Overlay operations, and the pipeline that computes them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    builder,
    edge::EdgeList,
    geometry::{assemble, Geometry},
    geometry_graph::GeometryGraph,
    graph::PlanarGraph,
    label::Location,
    Error, Result,
};

/// A boolean operation on two geometries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlayOp {
    /// The points in both geometries.
    Intersection,
    /// The points in either geometry.
    Union,
    /// The points in the first geometry but not the second.
    Difference,
    /// The points in exactly one of the geometries.
    SymDifference,
}

impl OverlayOp {
    /// Every operation, in declaration order.
    pub const ALL: [OverlayOp; 4] = [
        OverlayOp::Intersection,
        OverlayOp::Union,
        OverlayOp::Difference,
        OverlayOp::SymDifference,
    ];

    fn name(self) -> &'static str {
        match self {
            OverlayOp::Intersection => "intersection",
            OverlayOp::Union => "union",
            OverlayOp::Difference => "difference",
            OverlayOp::SymDifference => "symdifference",
        }
    }
}

impl std::fmt::Display for OverlayOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OverlayOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        OverlayOp::ALL
            .into_iter()
            .find(|op| op.name() == lower)
            .ok_or_else(|| Error::UnknownOp(s.to_owned()))
    }
}

/// Decides whether a component belongs to the result, given its locations
/// relative to the two arguments. Being on the boundary counts as being
/// inside.
pub fn is_result_of_op(loc0: Option<Location>, loc1: Option<Location>, op: OverlayOp) -> bool {
    let inside = |loc: Option<Location>| {
        matches!(loc, Some(Location::Interior | Location::Boundary))
    };
    let (in0, in1) = (inside(loc0), inside(loc1));
    match op {
        OverlayOp::Intersection => in0 && in1,
        OverlayOp::Union => in0 || in1,
        OverlayOp::Difference => in0 && !in1,
        OverlayOp::SymDifference => in0 != in1,
    }
}

/// Computes `op` on two validated geometries.
pub(crate) fn compute_overlay(a: &Geometry, b: &Geometry, op: OverlayOp) -> Result<Option<Geometry>> {
    let args = [a, b];
    let mut arg0 = GeometryGraph::new(0, a);
    let mut arg1 = GeometryGraph::new(1, b);

    let mut graph = PlanarGraph::default();
    for arg in [&arg0, &arg1] {
        copy_points(&mut graph, arg);
    }

    arg0.compute_self_nodes();
    arg1.compute_self_nodes();
    arg0.compute_edge_intersections(&mut arg1);

    let mut split = Vec::new();
    arg0.compute_split_edges(&mut split);
    arg1.compute_split_edges(&mut split);

    let mut edge_list = EdgeList::default();
    let noded = split.len();
    for e in split {
        edge_list.insert_unique(e);
    }
    log::debug!("{op}: {noded} noded edges, {} after merging", edge_list.len());

    edge_list.compute_labels_from_depths();
    edge_list.replace_collapsed_edges();
    graph.add_edges(edge_list.into_edges())?;
    log::debug!(
        "{op}: graph has {} nodes and {} edges",
        graph.nodes.len(),
        graph.edges.len()
    );

    graph.compute_labelling(args)?;
    graph.label_incomplete_nodes(args);
    graph.find_result_area_edges(op);
    graph.cancel_duplicate_result_edges();

    let surfaces = builder::build_polygons(&mut graph)?;
    let curves = builder::build_lines(&mut graph, op, &surfaces);
    let points = builder::build_points(&graph, op, &curves, &surfaces);
    Ok(assemble(points, curves, surfaces))
}

// The argument's nodes carry its points and curve boundaries; they go into
// the overlay graph before noding adds anything else.
fn copy_points(graph: &mut PlanarGraph, arg: &GeometryGraph) {
    let index = arg.arg_index();
    for (coord, label) in arg.nodes() {
        let n = graph.add_node(*coord);
        if let Some(loc) = label.location(index) {
            graph[n].label.set_location(index, loc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Location::*;

    #[test]
    fn truth_table() {
        use OverlayOp::*;
        let cases = [
            (Some(Interior), Some(Interior), [true, true, false, false]),
            (Some(Interior), Some(Exterior), [false, true, true, true]),
            (Some(Exterior), Some(Boundary), [false, true, false, true]),
            (Some(Exterior), Some(Exterior), [false, false, false, false]),
            (Some(Boundary), None, [false, true, true, true]),
        ];
        for (loc0, loc1, expected) in cases {
            for (op, exp) in [Intersection, Union, Difference, SymDifference]
                .into_iter()
                .zip(expected)
            {
                assert_eq!(is_result_of_op(loc0, loc1, op), exp, "{loc0:?} {loc1:?} {op}");
            }
        }
    }

    #[test]
    fn parse_and_display() {
        for op in OverlayOp::ALL {
            assert_eq!(op.to_string().parse::<OverlayOp>(), Ok(op));
        }
        assert_eq!("Union".parse::<OverlayOp>(), Ok(OverlayOp::Union));
        assert_eq!(
            "xor".parse::<OverlayOp>(),
            Err(Error::UnknownOp("xor".to_owned()))
        );
    }
}
