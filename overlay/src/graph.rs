//! The overlay graph.
//!
//! Every edge appears twice, once in each direction. Directed edges are
//! identified by a [`HalfEdgeIdx`] and all their state lives in a
//! [`HalfEdgeVec`], so that the links between them (`next`, `sym`, the
//! node they leave from) are plain indices.
//!
//! Each node keeps its outgoing directed edges (its "star") sorted
//! counter-clockwise by direction. Most of the labelling happens by walking
//! around stars.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::{
    edge::Edge,
    geom::{orientation, Coordinate, Orientation},
    geometry::Geometry,
    label::{Label, Location, Position},
    locate::{locate, locate_in_area},
    operation::{is_result_of_op, OverlayOp},
    Error, Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeIdx(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RingIdx(pub usize);

/// One direction of an edge.
///
/// The forward direction follows the edge's coordinates; the reverse
/// direction runs backwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HalfEdgeIdx {
    edge: EdgeIdx,
    forward: bool,
}

impl std::fmt::Debug for HalfEdgeIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.forward {
            write!(f, "e{}->", self.edge.0)
        } else {
            write!(f, "e{}<-", self.edge.0)
        }
    }
}

impl HalfEdgeIdx {
    pub fn forward(edge: EdgeIdx) -> Self {
        HalfEdgeIdx {
            edge,
            forward: true,
        }
    }

    pub fn reverse(edge: EdgeIdx) -> Self {
        HalfEdgeIdx {
            edge,
            forward: false,
        }
    }

    /// The same edge, in the other direction.
    pub fn sym(self) -> Self {
        HalfEdgeIdx {
            edge: self.edge,
            forward: !self.forward,
        }
    }

    pub fn edge(self) -> EdgeIdx {
        self.edge
    }

    pub fn is_forward(self) -> bool {
        self.forward
    }
}

/// Per-direction storage, indexed by [`HalfEdgeIdx`].
#[derive(Clone, Debug)]
pub struct HalfEdgeVec<T> {
    forward: Vec<T>,
    reverse: Vec<T>,
}

impl<T> Default for HalfEdgeVec<T> {
    fn default() -> Self {
        HalfEdgeVec {
            forward: Vec::new(),
            reverse: Vec::new(),
        }
    }
}

impl<T> HalfEdgeVec<T> {
    fn push(&mut self, forward: T, reverse: T) {
        self.forward.push(forward);
        self.reverse.push(reverse);
    }
}

impl<T> std::ops::Index<HalfEdgeIdx> for HalfEdgeVec<T> {
    type Output = T;

    fn index(&self, index: HalfEdgeIdx) -> &Self::Output {
        if index.forward {
            &self.forward[index.edge.0]
        } else {
            &self.reverse[index.edge.0]
        }
    }
}

impl<T> std::ops::IndexMut<HalfEdgeIdx> for HalfEdgeVec<T> {
    fn index_mut(&mut self, index: HalfEdgeIdx) -> &mut Self::Output {
        if index.forward {
            &mut self.forward[index.edge.0]
        } else {
            &mut self.reverse[index.edge.0]
        }
    }
}

#[derive(Clone, Debug)]
pub struct DirectedEdge {
    pub label: Label,
    /// The node this edge leaves from.
    pub node: NodeIdx,
    p0: Coordinate,
    p1: Coordinate,
    quadrant: u8,
    pub in_result: bool,
    pub visited: bool,
    pub next: Option<HalfEdgeIdx>,
    pub next_min: Option<HalfEdgeIdx>,
    pub edge_ring: Option<RingIdx>,
    pub min_edge_ring: Option<RingIdx>,
}

// The quadrant of a direction vector, counting counter-clockwise from the
// north-east.
fn quadrant(dx: f64, dy: f64) -> u8 {
    match (dx >= 0.0, dy >= 0.0) {
        (true, true) => 0,
        (false, true) => 1,
        (false, false) => 2,
        (true, false) => 3,
    }
}

impl DirectedEdge {
    fn new(node: NodeIdx, p0: Coordinate, p1: Coordinate, label: Label) -> Self {
        DirectedEdge {
            label,
            node,
            p0,
            p1,
            quadrant: quadrant(p1.x - p0.x, p1.y - p0.y),
            in_result: false,
            visited: false,
            next: None,
            next_min: None,
            edge_ring: None,
            min_edge_ring: None,
        }
    }

    pub fn coord(&self) -> Coordinate {
        self.p0
    }

    /// Compares directions, increasing counter-clockwise from the positive
    /// x axis.
    fn compare_direction(&self, other: &DirectedEdge) -> Ordering {
        let (dx, dy) = (self.p1.x - self.p0.x, self.p1.y - self.p0.y);
        let (odx, ody) = (other.p1.x - other.p0.x, other.p1.y - other.p0.y);
        if dx == odx && dy == ody {
            return Ordering::Equal;
        }
        self.quadrant
            .cmp(&other.quadrant)
            .then_with(|| match orientation(&other.p0, &other.p1, &self.p1) {
                Orientation::CounterClockwise => Ordering::Greater,
                Orientation::Clockwise => Ordering::Less,
                Orientation::Collinear => Ordering::Equal,
            })
    }

    /// Is this a line edge, or an area edge that's exterior on both sides?
    pub fn is_line_edge(&self) -> bool {
        let is_line = self.label.is_line(0) || self.label.is_line(1);
        let exterior_if_area = |geom| {
            !self.label.is_area_of(geom) || self.label.all_positions_equal(geom, Location::Exterior)
        };
        is_line && exterior_if_area(0) && exterior_if_area(1)
    }

    /// Is this edge inside both arguments' areas on both sides?
    pub fn is_interior_area_edge(&self) -> bool {
        (0..2).all(|geom| {
            self.label.is_area_of(geom)
                && self.label.side(geom, Position::Left) == Some(Location::Interior)
                && self.label.side(geom, Position::Right) == Some(Location::Interior)
        })
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub coord: Coordinate,
    pub label: Label,
    /// Outgoing directed edges, sorted counter-clockwise.
    pub star: Vec<HalfEdgeIdx>,
    /// The part of the star that touches the areal result, fixed once the
    /// result edges have been linked.
    pub result_area_edges: Vec<HalfEdgeIdx>,
}

#[derive(Debug, Default)]
pub struct PlanarGraph {
    pub edges: Vec<Edge>,
    pub des: HalfEdgeVec<DirectedEdge>,
    pub nodes: Vec<Node>,
    node_map: BTreeMap<Coordinate, NodeIdx>,
}

impl std::ops::Index<NodeIdx> for PlanarGraph {
    type Output = Node;

    fn index(&self, index: NodeIdx) -> &Node {
        &self.nodes[index.0]
    }
}

impl std::ops::IndexMut<NodeIdx> for PlanarGraph {
    fn index_mut(&mut self, index: NodeIdx) -> &mut Node {
        &mut self.nodes[index.0]
    }
}

impl PlanarGraph {
    /// Returns the node at `coord`, creating it if necessary.
    pub fn add_node(&mut self, coord: Coordinate) -> NodeIdx {
        if let Some(&idx) = self.node_map.get(&coord) {
            return idx;
        }
        let idx = NodeIdx(self.nodes.len());
        self.nodes.push(Node {
            coord,
            label: Label::default(),
            star: Vec::new(),
            result_area_edges: Vec::new(),
        });
        self.node_map.insert(coord, idx);
        idx
    }

    #[cfg(test)]
    pub fn find_node(&self, coord: &Coordinate) -> Option<NodeIdx> {
        self.node_map.get(coord).copied()
    }

    /// All nodes, in coordinate order.
    pub fn node_indices(&self) -> Vec<NodeIdx> {
        self.node_map.values().copied().collect()
    }

    /// All directed edges: each edge forwards, then backwards.
    pub fn half_edges(&self) -> impl Iterator<Item = HalfEdgeIdx> {
        (0..self.edges.len()).flat_map(|i| {
            let e = EdgeIdx(i);
            [HalfEdgeIdx::forward(e), HalfEdgeIdx::reverse(e)]
        })
    }

    pub fn edge(&self, de: HalfEdgeIdx) -> &Edge {
        &self.edges[de.edge.0]
    }

    pub fn edge_mut(&mut self, de: HalfEdgeIdx) -> &mut Edge {
        &mut self.edges[de.edge.0]
    }

    /// Adds edges, along with both their directed edges and their endpoint
    /// nodes, and sorts the stars of the nodes they touch.
    ///
    /// Two directed edges leaving a node in exactly the same direction can't
    /// both be labelled: only one of them would get a place in the star while
    /// its twin stayed in the star at the other end. Noding merges every such
    /// pair, so finding one means rounding has broken the topology.
    pub fn add_edges(&mut self, edges: Vec<Edge>) -> Result<()> {
        let mut touched = BTreeSet::new();
        for edge in edges {
            let idx = EdgeIdx(self.edges.len());
            let pts = edge.pts();
            let n = pts.len();
            let (start, second, penult, end) = (pts[0], pts[1], pts[n - 2], pts[n - 1]);

            let start_node = self.add_node(start);
            let end_node = self.add_node(end);
            self.des.push(
                DirectedEdge::new(start_node, start, second, edge.label),
                DirectedEdge::new(end_node, end, penult, edge.label.flipped()),
            );
            self[start_node].star.push(HalfEdgeIdx::forward(idx));
            self[end_node].star.push(HalfEdgeIdx::reverse(idx));
            touched.extend([start_node, end_node]);
            self.edges.push(edge);
        }

        for n in touched {
            let node = &mut self.nodes[n.0];
            let des = &self.des;
            node.star
                .sort_by(|a, b| des[*a].compare_direction(&des[*b]));
            let coincident = node
                .star
                .windows(2)
                .any(|w| des[w[0]].compare_direction(&des[w[1]]) == Ordering::Equal);
            if coincident {
                return Err(Error::topology(
                    "coincident directed edges in a node star",
                    node.coord,
                ));
            }
        }
        Ok(())
    }

    /// Labels the directed edges at every node, and the nodes themselves.
    pub fn compute_labelling(&mut self, args: [&Geometry; 2]) -> Result<()> {
        for n in self.node_indices() {
            self.compute_star_labelling(n, args)?;
        }

        // Each directed edge learns what its twin learned at the other end.
        for n in self.node_indices() {
            for de in self[n].star.clone() {
                let sym_label = self.des[de.sym()].label;
                self.des[de].label.merge(&sym_label);
            }
        }

        for n in self.node_indices() {
            let star_label = self.star_label(n);
            self[n].label.merge(&star_label);
        }
        Ok(())
    }

    fn compute_star_labelling(&mut self, n: NodeIdx, args: [&Geometry; 2]) -> Result<()> {
        let star = self[n].star.clone();
        let coord = self[n].coord;
        for geom in 0..2 {
            self.propagate_side_labels(&star, coord, geom)?;
        }

        // A line edge on an argument's boundary means that argument's area
        // collapsed here, and the node is outside its (non-existent) area.
        let mut has_collapse = [false; 2];
        for &de in &star {
            let label = &self.des[de].label;
            for (geom, collapse) in has_collapse.iter_mut().enumerate() {
                if label.is_line(geom) && label.location(geom) == Some(Location::Boundary) {
                    *collapse = true;
                }
            }
        }

        let mut area_location: [Option<Location>; 2] = [None; 2];
        for &de in &star {
            for geom in 0..2 {
                if !self.des[de].label.is_any_null(geom) {
                    continue;
                }
                let loc = if has_collapse[geom] {
                    Location::Exterior
                } else {
                    *area_location[geom].get_or_insert_with(|| locate_in_area(&coord, args[geom]))
                };
                self.des[de].label.set_all_if_null(geom, Some(loc));
            }
        }
        Ok(())
    }

    // Walks counter-clockwise around the star, filling in unknown locations
    // from the sides of the area edges of `geom`.
    fn propagate_side_labels(&mut self, star: &[HalfEdgeIdx], coord: Coordinate, geom: usize) -> Result<()> {
        // The region before the first edge is the region to the left of the
        // last area edge.
        let start_loc = star
            .iter()
            .map(|de| &self.des[*de].label)
            .filter(|label| label.is_area_of(geom))
            .filter_map(|label| label.side(geom, Position::Left))
            .last();
        let Some(mut curr) = start_loc else {
            return Ok(());
        };

        for &de in star {
            let label = &mut self.des[de].label;
            if label.location(geom).is_none() {
                label.set_location(geom, curr);
            }
            if !label.is_area_of(geom) {
                continue;
            }
            let left = label.side(geom, Position::Left);
            match label.side(geom, Position::Right) {
                Some(right) => {
                    if right != curr {
                        return Err(Error::topology("side location conflict", coord));
                    }
                    debug_assert!(left.is_some(), "found single null side");
                    if let Some(left) = left {
                        curr = left;
                    }
                }
                None => {
                    debug_assert!(left.is_none(), "found single null side");
                    label.set_side(geom, Position::Right, curr);
                    label.set_side(geom, Position::Left, curr);
                }
            }
        }
        Ok(())
    }

    // A node is in the interior of an argument if any incident edge is on or
    // in that argument.
    fn star_label(&self, n: NodeIdx) -> Label {
        let mut ret = Label::default();
        for de in &self[n].star {
            let edge_label = &self.edge(*de).label;
            for geom in 0..2 {
                if matches!(
                    edge_label.location(geom),
                    Some(Location::Interior | Location::Boundary)
                ) {
                    ret.set_location(geom, Location::Interior);
                }
            }
        }
        ret
    }

    /// Locates nodes that only one argument knew about relative to the other
    /// argument, and pushes node labels out to their stars.
    pub fn label_incomplete_nodes(&mut self, args: [&Geometry; 2]) {
        for n in self.node_indices() {
            let node = &mut self[n];
            if node.label.geometry_count() == 1 {
                let target = if node.label.is_null(0) { 0 } else { 1 };
                let loc = locate(&node.coord, args[target]);
                node.label.set_location(target, loc);
            }

            let node_label = self[n].label;
            for de in self[n].star.clone() {
                let label = &mut self.des[de].label;
                for geom in 0..2 {
                    label.set_all_if_null(geom, node_label.location(geom));
                }
            }
        }
    }

    /// Marks the area edges that have the result's interior on their right.
    pub fn find_result_area_edges(&mut self, op: OverlayOp) {
        for de in self.half_edges() {
            let d = &mut self.des[de];
            let label = d.label;
            if label.is_area()
                && !d.is_interior_area_edge()
                && is_result_of_op(
                    label.side(0, Position::Right),
                    label.side(1, Position::Right),
                    op,
                )
            {
                d.in_result = true;
            }
        }
    }

    /// If both directions of an edge are in the result, the result is on both
    /// sides and the edge isn't part of its boundary.
    pub fn cancel_duplicate_result_edges(&mut self) {
        for de in self.half_edges() {
            if self.des[de].in_result && self.des[de.sym()].in_result {
                self.des[de].in_result = false;
                self.des[de.sym()].in_result = false;
            }
        }
    }

    /// Links each result edge coming into `n` to the next result edge leaving
    /// it, turning clockwise.
    pub fn link_result_directed_edges(&mut self, n: NodeIdx) -> Result<()> {
        let result_area: Vec<HalfEdgeIdx> = self[n]
            .star
            .iter()
            .copied()
            .filter(|de| self.des[*de].in_result || self.des[de.sym()].in_result)
            .collect();
        self[n].result_area_edges = result_area.clone();

        let mut first_out = None;
        let mut incoming: Option<HalfEdgeIdx> = None;
        for next_out in result_area {
            let next_in = next_out.sym();
            if !self.des[next_out].label.is_area() {
                continue;
            }
            if first_out.is_none() && self.des[next_out].in_result {
                first_out = Some(next_out);
            }
            match incoming {
                None => {
                    if self.des[next_in].in_result {
                        incoming = Some(next_in);
                    }
                }
                Some(inc) => {
                    if self.des[next_out].in_result {
                        self.des[inc].next = Some(next_out);
                        incoming = None;
                    }
                }
            }
        }

        if let Some(inc) = incoming {
            let first = first_out
                .ok_or_else(|| Error::topology("no outgoing directed edge found", self[n].coord))?;
            self.des[inc].next = Some(first);
        }
        Ok(())
    }

    /// Links the edges of the maximal ring `ring` at `n` into minimal rings,
    /// which turn as sharply as possible.
    pub fn link_minimal_directed_edges(&mut self, n: NodeIdx, ring: RingIdx) -> Result<()> {
        let mut first_out = None;
        let mut incoming: Option<HalfEdgeIdx> = None;
        let result_area = self[n].result_area_edges.clone();
        // Going clockwise here, so that the rings turn the other way.
        for &next_out in result_area.iter().rev() {
            let next_in = next_out.sym();
            if first_out.is_none() && self.des[next_out].edge_ring == Some(ring) {
                first_out = Some(next_out);
            }
            match incoming {
                None => {
                    if self.des[next_in].edge_ring == Some(ring) {
                        incoming = Some(next_in);
                    }
                }
                Some(inc) => {
                    if self.des[next_out].edge_ring == Some(ring) {
                        self.des[inc].next_min = Some(next_out);
                        incoming = None;
                    }
                }
            }
        }

        if let Some(inc) = incoming {
            let first = first_out
                .ok_or_else(|| Error::topology("found null for first outgoing edge", self[n].coord))?;
            self.des[inc].next_min = Some(first);
        }
        Ok(())
    }

    /// The number of edges of `ring` leaving `n`.
    pub fn outgoing_degree(&self, n: NodeIdx, ring: RingIdx) -> usize {
        self[n]
            .star
            .iter()
            .filter(|de| self.des[**de].edge_ring == Some(ring))
            .count()
    }

    /// Decides which line edges at `n` are covered by the areal result, by
    /// walking around the star and tracking whether we're inside the result.
    pub fn find_covered_line_edges(&mut self, n: NodeIdx) {
        let star = self[n].star.clone();
        let start = star.iter().find_map(|&out| {
            let d = &self.des[out];
            if d.is_line_edge() {
                None
            } else if d.in_result {
                Some(Location::Interior)
            } else if self.des[out.sym()].in_result {
                Some(Location::Exterior)
            } else {
                None
            }
        });
        let Some(mut curr) = start else {
            return;
        };

        for out in star {
            if self.des[out].is_line_edge() {
                self.edge_mut(out).covered = Some(curr == Location::Interior);
            } else {
                if self.des[out].in_result {
                    curr = Location::Exterior;
                }
                if self.des[out.sym()].in_result {
                    curr = Location::Interior;
                }
            }
        }
    }
}
