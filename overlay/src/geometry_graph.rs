//! The graph of a single overlay argument.
//!
//! This turns one [`Geometry`] into labelled edges and nodes, and nodes the
//! edges: first against themselves, then against the other argument.

use std::collections::BTreeMap;

use crate::{
    edge::Edge,
    geom::{is_ccw, remove_repeated_points, Coordinate},
    geometry::{Curve, Geometry, PrimitiveRef, Surface},
    intersection,
    label::{Label, Location},
};

#[derive(Debug)]
pub struct GeometryGraph {
    arg_index: usize,
    pub edges: Vec<Edge>,
    nodes: BTreeMap<Coordinate, Label>,
}

impl GeometryGraph {
    pub fn new(arg_index: usize, geometry: &Geometry) -> Self {
        let mut ret = GeometryGraph {
            arg_index,
            edges: Vec::new(),
            nodes: BTreeMap::new(),
        };
        for prim in geometry.primitives() {
            match prim {
                PrimitiveRef::Point(p) => ret.insert_point(*p, Location::Interior),
                PrimitiveRef::Curve(c) => ret.add_curve(c),
                PrimitiveRef::Surface(s) => ret.add_surface(s),
            }
        }
        log::trace!(
            "argument {arg_index}: {} edges, {} nodes",
            ret.edges.len(),
            ret.nodes.len()
        );
        ret
    }

    pub fn arg_index(&self) -> usize {
        self.arg_index
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&Coordinate, &Label)> {
        self.nodes.iter()
    }

    fn add_surface(&mut self, surface: &Surface) {
        if surface.is_empty() {
            return;
        }
        self.add_ring(&surface.shell, Location::Exterior, Location::Interior);
        for hole in &surface.holes {
            // Holes have the interior on the other side.
            self.add_ring(hole, Location::Interior, Location::Exterior);
        }
    }

    // `cw_left` and `cw_right` are the locations to the left and right of the
    // ring if it's clockwise.
    fn add_ring(&mut self, ring: &[Coordinate], cw_left: Location, cw_right: Location) {
        let Some(&first) = ring.first() else {
            return;
        };
        let mut coords = remove_repeated_points(ring);
        if coords.last() != Some(&first) {
            coords.push(first);
        }
        if coords.len() < 4 {
            log::warn!("skipping ring with too few distinct points, starting at {first}");
            return;
        }

        let (left, right) = if is_ccw(&coords) {
            (cw_right, cw_left)
        } else {
            (cw_left, cw_right)
        };
        let label = Label::area(self.arg_index, Location::Boundary, left, right);
        self.edges.push(Edge::new(coords, label));
        self.insert_point(first, Location::Boundary);
    }

    fn add_curve(&mut self, curve: &Curve) {
        let coords = remove_repeated_points(&curve.coords);
        if coords.len() < 2 {
            if let Some(p) = coords.first() {
                log::warn!("skipping curve with a single distinct point at {p}");
            }
            return;
        }
        let (start, end) = (coords[0], coords[coords.len() - 1]);
        self.edges
            .push(Edge::new(coords, Label::line(self.arg_index, Location::Interior)));
        self.insert_boundary_point(start);
        self.insert_boundary_point(end);
    }

    fn insert_point(&mut self, coord: Coordinate, loc: Location) {
        self.nodes
            .entry(coord)
            .or_default()
            .set_location(self.arg_index, loc);
    }

    // Curve endpoints are on the boundary if an odd number of endpoints meet
    // there, and in the interior otherwise.
    fn insert_boundary_point(&mut self, coord: Coordinate) {
        let label = self.nodes.entry(coord).or_default();
        let loc = match label.location(self.arg_index) {
            Some(Location::Boundary) => Location::Interior,
            _ => Location::Boundary,
        };
        label.set_location(self.arg_index, loc);
    }

    fn is_boundary_node(&self, coord: &Coordinate) -> bool {
        self.nodes
            .get(coord)
            .and_then(|l| l.location(self.arg_index))
            == Some(Location::Boundary)
    }

    /// Nodes this argument's edges against each other.
    pub fn compute_self_nodes(&mut self) {
        let stats = intersection::self_intersect(&mut self.edges);
        log::debug!(
            "argument {}: self-noding ran {} tests, found {} intersections",
            self.arg_index,
            stats.tests,
            stats.intersections
        );

        let arg = self.arg_index;
        let found: Vec<(Coordinate, Option<Location>)> = self
            .edges
            .iter()
            .flat_map(|e| {
                let loc = e.label.location(arg);
                e.intersections().map(move |ei| (ei.coord, loc))
            })
            .collect();
        for (coord, loc) in found {
            if self.is_boundary_node(&coord) {
                continue;
            }
            match loc {
                Some(Location::Boundary) => self.insert_boundary_point(coord),
                Some(loc) => self.insert_point(coord, loc),
                None => {}
            }
        }
    }

    /// Nodes this argument's edges against the other argument's edges.
    pub fn compute_edge_intersections(&mut self, other: &mut GeometryGraph) {
        let stats = intersection::intersect_edge_sets(&mut self.edges, &mut other.edges);
        log::debug!(
            "arguments {} and {}: noding ran {} tests, found {} intersections ({} proper)",
            self.arg_index,
            other.arg_index,
            stats.tests,
            stats.intersections,
            stats.proper
        );
    }

    /// Splits every edge at its intersections.
    pub fn compute_split_edges(&mut self, out: &mut Vec<Edge>) {
        for e in &mut self.edges {
            e.add_split_edges(out);
        }
    }
}
