//! Edges: labelled coordinate sequences, and the lists that node and
//! deduplicate them.

use std::collections::{BTreeMap, HashMap};

use ordered_float::OrderedFloat;

use crate::{
    geom::{remove_repeated_points, Coordinate, Envelope},
    intersection::edge_distance,
    label::{Depth, Label, Position},
};

/// A point where an edge is intersected, positioned along the edge by its
/// segment index and the distance along that segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeIntersection {
    pub coord: Coordinate,
    pub segment_index: usize,
    pub dist: f64,
}

/// The intersections of one edge, kept sorted along the edge and free of
/// duplicates.
#[derive(Clone, Debug, Default)]
pub struct EdgeIntersectionList {
    map: BTreeMap<(usize, OrderedFloat<f64>), Coordinate>,
}

impl EdgeIntersectionList {
    pub fn add(&mut self, coord: Coordinate, segment_index: usize, dist: f64) {
        self.map
            .entry((segment_index, OrderedFloat(dist)))
            .or_insert(coord);
    }

    pub fn iter(&self) -> impl Iterator<Item = EdgeIntersection> + '_ {
        self.map
            .iter()
            .map(|(&(segment_index, dist), &coord)| EdgeIntersection {
                coord,
                segment_index,
                dist: dist.0,
            })
    }
}

#[derive(Clone, Debug)]
pub struct Edge {
    pts: Vec<Coordinate>,
    env: Envelope,
    pub label: Label,
    pub depth: Depth,
    intersections: EdgeIntersectionList,
    pub in_result: bool,
    /// Whether a line edge is covered by the areal result; `None` until
    /// computed.
    pub covered: Option<bool>,
}

impl Edge {
    /// Creates an edge. `pts` must have at least two points.
    pub fn new(pts: Vec<Coordinate>, label: Label) -> Self {
        debug_assert!(pts.len() >= 2);
        Edge {
            env: Envelope::of(&pts),
            pts,
            label,
            depth: Depth::default(),
            intersections: EdgeIntersectionList::default(),
            in_result: false,
            covered: None,
        }
    }

    pub fn pts(&self) -> &[Coordinate] {
        &self.pts
    }

    pub fn envelope(&self) -> &Envelope {
        &self.env
    }

    pub fn is_closed(&self) -> bool {
        self.pts.first() == self.pts.last()
    }

    pub fn is_covered(&self) -> bool {
        self.covered == Some(true)
    }

    pub fn intersections(&self) -> impl Iterator<Item = EdgeIntersection> + '_ {
        self.intersections.iter()
    }

    /// Records that `pt` lies on segment `segment_index` of this edge.
    ///
    /// A point that coincides with the end of its segment is recorded as the
    /// start of the following segment instead, so that each vertex has a
    /// single position along the edge.
    pub fn add_intersection(&mut self, pt: Coordinate, segment_index: usize) {
        let mut seg = segment_index;
        let mut dist = edge_distance(&pt, &self.pts[seg], &self.pts[seg + 1]);
        let next = seg + 1;
        if next < self.pts.len() && pt == self.pts[next] {
            seg = next;
            dist = 0.0;
        }
        self.intersections.add(pt, seg, dist);
    }

    /// Splits this edge at its recorded intersections, pushing the pieces to
    /// `out`. Every piece carries this edge's label.
    pub fn add_split_edges(&mut self, out: &mut Vec<Edge>) {
        let last = self.pts.len() - 1;
        self.intersections.add(self.pts[0], 0, 0.0);
        self.intersections.add(self.pts[last], last, 0.0);

        let splits: Vec<_> = self.intersections.iter().collect();
        for pair in splits.windows(2) {
            if let Some(e) = self.split_edge(&pair[0], &pair[1]) {
                out.push(e);
            }
        }
    }

    fn split_edge(&self, ei0: &EdgeIntersection, ei1: &EdgeIntersection) -> Option<Edge> {
        let last_seg_start = &self.pts[ei1.segment_index];
        // The second intersection lands on a vertex exactly when it's at
        // distance zero, or when its coordinate is that vertex.
        let use_int_pt1 = ei1.dist > 0.0 || ei1.coord != *last_seg_start;

        let mut pts = Vec::with_capacity(ei1.segment_index - ei0.segment_index + 2);
        pts.push(ei0.coord);
        pts.extend_from_slice(&self.pts[ei0.segment_index + 1..=ei1.segment_index]);
        if use_int_pt1 {
            pts.push(ei1.coord);
        }
        let pts = remove_repeated_points(&pts);
        (pts.len() >= 2).then(|| Edge::new(pts, self.label))
    }

    /// Is this an area edge that has collapsed to a spike `a - b - a`?
    pub fn is_collapsed(&self) -> bool {
        self.label.is_area() && self.pts.len() == 3 && self.pts[0] == self.pts[2]
    }

    /// The line edge that replaces a collapsed area edge.
    pub fn collapsed_edge(&self) -> Edge {
        Edge::new(vec![self.pts[0], self.pts[1]], self.label.to_line_label())
    }
}

// A direction-independent key for a coordinate sequence: the sequence itself,
// or its reversal, whichever starts off smaller.
fn oriented_key(pts: &[Coordinate]) -> Vec<Coordinate> {
    let n = pts.len();
    let forward = (0..n / 2)
        .map(|i| pts[i].cmp(&pts[n - 1 - i]))
        .find(|o| o.is_ne())
        .map_or(true, |o| o.is_lt());
    if forward {
        pts.to_vec()
    } else {
        pts.iter().rev().copied().collect()
    }
}

/// The noded edges of both arguments, with coincident edges merged.
#[derive(Debug, Default)]
pub struct EdgeList {
    edges: Vec<Edge>,
    index: HashMap<Vec<Coordinate>, usize>,
}

impl EdgeList {
    /// Adds `edge`, unless an edge with the same coordinates (in either
    /// direction) is already present. In that case the labels are merged and
    /// the existing edge's depth counts both.
    pub fn insert_unique(&mut self, edge: Edge) {
        let key = oriented_key(edge.pts());
        if let Some(&i) = self.index.get(&key) {
            let existing = &mut self.edges[i];
            let label = if existing.pts == edge.pts {
                edge.label
            } else {
                edge.label.flipped()
            };
            if existing.depth.is_null() {
                let own = existing.label;
                existing.depth.add(&own);
            }
            existing.depth.add(&label);
            existing.label.merge(&label);
        } else {
            self.index.insert(key, self.edges.len());
            self.edges.push(edge);
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[cfg(test)]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Relabels merged area edges from their accumulated depths. An edge whose
    /// two sides end up at the same depth for some argument has collapsed to a
    /// line for that argument.
    pub fn compute_labels_from_depths(&mut self) {
        for e in &mut self.edges {
            if e.depth.is_null() {
                continue;
            }
            e.depth.normalize();
            for geom in 0..2 {
                if e.label.is_null(geom) || !e.label.is_area() || e.depth.is_null_for(geom) {
                    continue;
                }
                if e.depth.delta(geom) == 0 {
                    e.label.to_line(geom);
                } else {
                    debug_assert!(!e.depth.is_null_at(geom, Position::Left));
                    debug_assert!(!e.depth.is_null_at(geom, Position::Right));
                    let left = e.depth.location(geom, Position::Left);
                    let right = e.depth.location(geom, Position::Right);
                    e.label.set_side(geom, Position::Left, left);
                    e.label.set_side(geom, Position::Right, right);
                }
            }
        }
    }

    /// Swaps every collapsed area edge for a line edge. The replacements go to
    /// the end of the list.
    pub fn replace_collapsed_edges(&mut self) {
        let (collapsed, mut edges): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.edges).into_iter().partition(Edge::is_collapsed);
        edges.extend(collapsed.iter().map(Edge::collapsed_edge));
        self.edges = edges;
        self.index.clear();
    }

    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::tests::c;
    use crate::label::Location;

    fn area(geom: usize, pts: Vec<Coordinate>) -> Edge {
        Edge::new(
            pts,
            Label::area(geom, Location::Boundary, Location::Exterior, Location::Interior),
        )
    }

    #[test]
    fn intersection_at_vertex_is_normalized() {
        let mut e = Edge::new(
            vec![c(0.0, 0.0), c(1.0, 0.0), c(2.0, 0.0)],
            Label::line(0, Location::Interior),
        );
        e.add_intersection(c(1.0, 0.0), 0);
        e.add_intersection(c(1.0, 0.0), 1);
        let found: Vec<_> = e.intersections().collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].segment_index, 1);
        assert_eq!(found[0].dist, 0.0);
    }

    #[test]
    fn split_at_interior_points() {
        let mut e = Edge::new(
            vec![c(0.0, 0.0), c(4.0, 0.0), c(4.0, 4.0)],
            Label::line(0, Location::Interior),
        );
        e.add_intersection(c(2.0, 0.0), 0);
        e.add_intersection(c(4.0, 2.0), 1);
        let mut out = Vec::new();
        e.add_split_edges(&mut out);
        let pieces: Vec<_> = out.iter().map(|e| e.pts().to_vec()).collect();
        assert_eq!(
            pieces,
            vec![
                vec![c(0.0, 0.0), c(2.0, 0.0)],
                vec![c(2.0, 0.0), c(4.0, 0.0), c(4.0, 2.0)],
                vec![c(4.0, 2.0), c(4.0, 4.0)],
            ]
        );
    }

    #[test]
    fn split_without_intersections() {
        let pts = vec![c(0.0, 0.0), c(1.0, 0.0), c(1.0, 1.0)];
        let mut e = Edge::new(pts.clone(), Label::line(0, Location::Interior));
        let mut out = Vec::new();
        e.add_split_edges(&mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pts(), &pts[..]);
    }

    #[test]
    fn split_closed_ring_at_vertex() {
        let mut e = area(
            0,
            vec![c(0.0, 0.0), c(0.0, 1.0), c(1.0, 1.0), c(1.0, 0.0), c(0.0, 0.0)],
        );
        e.add_intersection(c(1.0, 1.0), 1);
        let mut out = Vec::new();
        e.add_split_edges(&mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].pts(), &[c(0.0, 0.0), c(0.0, 1.0), c(1.0, 1.0)]);
        assert_eq!(out[1].pts(), &[c(1.0, 1.0), c(1.0, 0.0), c(0.0, 0.0)]);
    }

    #[test]
    fn unique_insert_merges_reversed_edges() {
        let mut list = EdgeList::default();
        list.insert_unique(area(0, vec![c(0.0, 0.0), c(1.0, 0.0)]));
        list.insert_unique(area(1, vec![c(1.0, 0.0), c(0.0, 0.0)]));
        assert_eq!(list.len(), 1);
        let label = list.edges()[0].label;
        assert_eq!(label.side(0, Position::Left), Some(Location::Exterior));
        // The second edge was reversed relative to the first.
        assert_eq!(label.side(1, Position::Left), Some(Location::Interior));
        assert_eq!(label.side(1, Position::Right), Some(Location::Exterior));
    }

    #[test]
    fn opposite_shells_collapse_to_a_line() {
        // The same ring twice in one argument, with opposite orientations:
        // both sides are interior once, so the edge is really a line.
        let mut list = EdgeList::default();
        list.insert_unique(area(0, vec![c(0.0, 0.0), c(1.0, 0.0)]));
        list.insert_unique(area(0, vec![c(1.0, 0.0), c(0.0, 0.0)]));
        list.compute_labels_from_depths();
        let label = list.edges()[0].label;
        assert!(label.is_line(0));
        assert_eq!(label.location(0), Some(Location::Boundary));
    }

    #[test]
    fn same_shells_keep_area_sides() {
        let mut list = EdgeList::default();
        list.insert_unique(area(0, vec![c(0.0, 0.0), c(1.0, 0.0)]));
        list.insert_unique(area(1, vec![c(0.0, 0.0), c(1.0, 0.0)]));
        list.compute_labels_from_depths();
        let label = list.edges()[0].label;
        assert!(label.is_area());
        assert_eq!(label.side(0, Position::Right), Some(Location::Interior));
        assert_eq!(label.side(1, Position::Left), Some(Location::Exterior));
    }

    #[test]
    fn collapsed_edges_are_replaced() {
        let mut list = EdgeList::default();
        list.insert_unique(area(0, vec![c(0.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)]));
        list.insert_unique(area(0, vec![c(5.0, 0.0), c(6.0, 0.0)]));
        list.replace_collapsed_edges();
        let edges = list.into_edges();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[1].pts(), &[c(0.0, 0.0), c(1.0, 0.0)]);
        assert!(edges[1].label.is_line(0));
        assert_eq!(edges[1].label.location(0), Some(Location::Boundary));
    }
}
