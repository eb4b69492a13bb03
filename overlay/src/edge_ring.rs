//! Rings of linked result edges.

use crate::{
    geom::{is_ccw, Coordinate, Envelope},
    graph::{HalfEdgeIdx, PlanarGraph, RingIdx},
    Error, Result,
};

/// Maximal rings follow the `next` links, which turn as little as possible
/// at each node. Minimal rings follow `next_min` links and never touch
/// themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingKind {
    Maximal,
    Minimal,
}

#[derive(Clone, Debug)]
pub struct EdgeRing {
    pub edges: Vec<HalfEdgeIdx>,
    pub pts: Vec<Coordinate>,
    pub env: Envelope,
    pub is_hole: bool,
    /// For holes, the shell containing them.
    pub shell: Option<RingIdx>,
    /// For shells, their holes.
    pub holes: Vec<RingIdx>,
}

impl EdgeRing {
    /// Follows links from `start` until it comes back around, pushes the new
    /// ring onto `rings` and returns its index.
    pub fn build(
        graph: &mut PlanarGraph,
        rings: &mut Vec<EdgeRing>,
        start: HalfEdgeIdx,
        kind: RingKind,
    ) -> Result<RingIdx> {
        let idx = RingIdx(rings.len());
        let mut edges = Vec::new();
        let mut pts = Vec::new();

        let mut de = start;
        loop {
            let d = &mut graph.des[de];
            let coord = d.coord();
            let ring_slot = match kind {
                RingKind::Maximal => &mut d.edge_ring,
                RingKind::Minimal => &mut d.min_edge_ring,
            };
            if *ring_slot == Some(idx) {
                return Err(Error::topology(
                    "directed edge visited twice during ring-building",
                    coord,
                ));
            }
            *ring_slot = Some(idx);
            debug_assert!(d.label.is_area());
            let next = match kind {
                RingKind::Maximal => d.next,
                RingKind::Minimal => d.next_min,
            };

            edges.push(de);
            add_points(&mut pts, graph.edge(de).pts(), de.is_forward(), edges.len() == 1);

            de = next.ok_or_else(|| Error::topology("found null directed edge", coord))?;
            if de == start {
                break;
            }
        }

        log::trace!("built {kind:?} ring {} with {} edges", idx.0, edges.len());
        rings.push(EdgeRing {
            edges,
            is_hole: is_ccw(&pts),
            env: Envelope::of(&pts),
            pts,
            shell: None,
            holes: Vec::new(),
        });
        Ok(idx)
    }

    /// Twice the largest number of this ring's edges leaving any one node.
    /// A value above 2 means the ring touches itself.
    pub fn max_node_degree(&self, graph: &PlanarGraph, me: RingIdx) -> usize {
        self.edges
            .iter()
            .map(|de| graph.outgoing_degree(graph.des[*de].node, me))
            .max()
            .unwrap_or(0)
            * 2
    }
}

// Appends an edge's points in the direction of travel, skipping the point
// shared with the previous edge.
fn add_points(pts: &mut Vec<Coordinate>, edge_pts: &[Coordinate], forward: bool, is_first: bool) {
    let skip = usize::from(!is_first);
    if forward {
        pts.extend(edge_pts.iter().skip(skip));
    } else {
        pts.extend(edge_pts.iter().rev().skip(skip));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Edge;
    use crate::geom::tests::c;
    use crate::graph::EdgeIdx;
    use crate::label::{Label, Location};

    // A clockwise unit square split into two edges, with the interior on
    // the right.
    fn square_graph() -> PlanarGraph {
        let label = Label::area(0, Location::Boundary, Location::Exterior, Location::Interior);
        let mut g = PlanarGraph::default();
        g.add_edges(vec![
            Edge::new(vec![c(0.0, 0.0), c(0.0, 1.0), c(1.0, 1.0)], label),
            Edge::new(vec![c(1.0, 1.0), c(1.0, 0.0), c(0.0, 0.0)], label),
        ])
        .unwrap();
        g
    }

    #[test]
    fn maximal_ring() {
        let mut g = square_graph();
        let a = HalfEdgeIdx::forward(EdgeIdx(0));
        let b = HalfEdgeIdx::forward(EdgeIdx(1));
        g.des[a].next = Some(b);
        g.des[b].next = Some(a);

        let mut rings = Vec::new();
        let idx = EdgeRing::build(&mut g, &mut rings, a, RingKind::Maximal).unwrap();
        let ring = &rings[idx.0];
        assert_eq!(
            ring.pts,
            vec![c(0.0, 0.0), c(0.0, 1.0), c(1.0, 1.0), c(1.0, 0.0), c(0.0, 0.0)]
        );
        assert!(!ring.is_hole);
        assert_eq!(g.des[a].edge_ring, Some(idx));
        assert_eq!(g.des[b].edge_ring, Some(idx));
        assert_eq!(ring.max_node_degree(&g, idx), 2);
        assert_eq!(
            ring.env,
            Envelope {
                min_x: 0.0,
                max_x: 1.0,
                min_y: 0.0,
                max_y: 1.0,
            }
        );
    }

    #[test]
    fn reversed_ring_is_a_hole() {
        let mut g = square_graph();
        let a = HalfEdgeIdx::reverse(EdgeIdx(0));
        let b = HalfEdgeIdx::reverse(EdgeIdx(1));
        g.des[a].next = Some(b);
        g.des[b].next = Some(a);

        let mut rings = Vec::new();
        let idx = EdgeRing::build(&mut g, &mut rings, b, RingKind::Maximal).unwrap();
        let ring = &rings[idx.0];
        assert_eq!(
            ring.pts,
            vec![c(0.0, 0.0), c(1.0, 0.0), c(1.0, 1.0), c(0.0, 1.0), c(0.0, 0.0)]
        );
        assert!(ring.is_hole);
        assert_eq!(ring.edges, vec![b, a]);
    }

    #[test]
    fn broken_links_are_topology_errors() {
        let mut g = square_graph();
        let a = HalfEdgeIdx::forward(EdgeIdx(0));
        let mut rings = Vec::new();
        let err = EdgeRing::build(&mut g, &mut rings, a, RingKind::Maximal).unwrap_err();
        assert!(matches!(err, Error::Topology { .. }));

        let mut g = square_graph();
        let b = HalfEdgeIdx::forward(EdgeIdx(1));
        g.des[a].next = Some(b);
        g.des[b].next = Some(b);
        let err = EdgeRing::build(&mut g, &mut rings, a, RingKind::Maximal).unwrap_err();
        assert!(matches!(err, Error::Topology { .. }));
    }
}
