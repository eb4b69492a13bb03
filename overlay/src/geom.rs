use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// A point in the plane.
///
/// Coordinates compare exactly: there is no tolerance anywhere in this crate.
/// They are ordered by `x` and then by `y`, which is the order used to key
/// the nodes of a graph.
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
pub struct Coordinate {
    /// The horizontal coordinate.
    pub x: f64,
    /// The vertical coordinate.
    pub y: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    pub fn new(x: f64, y: f64) -> Self {
        Coordinate { x, y }
    }

    fn key(&self) -> (OrderedFloat<f64>, OrderedFloat<f64>) {
        (OrderedFloat(self.x), OrderedFloat(self.y))
    }
}

impl std::fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Coordinate {}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl std::hash::Hash for Coordinate {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Coordinate { x, y }
    }
}

/// An axis-aligned bounding box.
///
/// The default envelope is empty: it contains nothing and intersects nothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    #[allow(missing_docs)]
    pub min_x: f64,
    #[allow(missing_docs)]
    pub max_x: f64,
    #[allow(missing_docs)]
    pub min_y: f64,
    #[allow(missing_docs)]
    pub max_y: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Envelope {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }
}

impl Envelope {
    /// The smallest envelope containing all of `coords`.
    pub fn of<'a>(coords: impl IntoIterator<Item = &'a Coordinate>) -> Self {
        let mut env = Envelope::default();
        for c in coords {
            env.expand_to_include(c);
        }
        env
    }

    #[allow(missing_docs)]
    pub fn from_segment(p: &Coordinate, q: &Coordinate) -> Self {
        Envelope {
            min_x: p.x.min(q.x),
            max_x: p.x.max(q.x),
            min_y: p.y.min(q.y),
            max_y: p.y.max(q.y),
        }
    }

    /// An empty envelope contains no points, not even a single one.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x
    }

    /// Grows this envelope, if necessary, to contain `c`.
    pub fn expand_to_include(&mut self, c: &Coordinate) {
        self.min_x = self.min_x.min(c.x);
        self.max_x = self.max_x.max(c.x);
        self.min_y = self.min_y.min(c.y);
        self.max_y = self.max_y.max(c.y);
    }

    /// Do the two envelopes share at least one point?
    pub fn intersects(&self, other: &Envelope) -> bool {
        !(self.is_empty()
            || other.is_empty()
            || other.min_x > self.max_x
            || other.max_x < self.min_x
            || other.min_y > self.max_y
            || other.max_y < self.min_y)
    }

    #[allow(missing_docs)]
    pub fn contains_point(&self, p: &Coordinate) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Does this envelope contain `other`? Boundaries may touch.
    pub fn contains(&self, other: &Envelope) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// The width, or zero if empty.
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    /// The height, or zero if empty.
    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }
}

/// Which way three points turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Clockwise,
    Collinear,
    CounterClockwise,
}

/// The orientation of `r` relative to the directed line `p -> q`.
///
/// This is the only orientation predicate in the crate. Noding, ring
/// orientation, edge-star ordering and point-in-ring tests all go through it,
/// so that they can never disagree about a near-degenerate configuration.
pub fn orientation(p: &Coordinate, q: &Coordinate, r: &Coordinate) -> Orientation {
    let det = robust::orient2d(
        robust::Coord { x: p.x, y: p.y },
        robust::Coord { x: q.x, y: q.y },
        robust::Coord { x: r.x, y: r.y },
    );
    if det > 0.0 {
        Orientation::CounterClockwise
    } else if det < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Does the closed ring `ring` wind counter-clockwise?
///
/// `ring` must be closed (first point repeated at the end). Rings that are
/// flat or have fewer than three distinct points are reported as not
/// counter-clockwise.
pub fn is_ccw(ring: &[Coordinate]) -> bool {
    if ring.len() < 4 {
        return false;
    }
    let n = ring.len() - 1;

    // The highest point (and the first of them, if there are several) is
    // guaranteed to be a convex vertex of the ring.
    let mut hi = 0;
    for i in 1..n {
        if ring[i].y > ring[hi].y {
            hi = i;
        }
    }

    let mut prev = hi;
    loop {
        prev = (prev + n - 1) % n;
        if ring[prev] != ring[hi] || prev == hi {
            break;
        }
    }
    let mut next = hi;
    loop {
        next = (next + 1) % n;
        if ring[next] != ring[hi] || next == hi {
            break;
        }
    }

    if prev == hi || next == hi || ring[prev] == ring[next] {
        return false;
    }

    match orientation(&ring[prev], &ring[hi], &ring[next]) {
        // The three points are collinear; the ring goes straight up and back
        // down only if prev and next lie on opposite sides horizontally.
        Orientation::Collinear => ring[prev].x > ring[next].x,
        o => o == Orientation::CounterClockwise,
    }
}

/// Twice the signed area of a closed ring; positive for counter-clockwise rings.
pub fn signed_area_2(ring: &[Coordinate]) -> f64 {
    ring.windows(2)
        .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
        .sum()
}

/// Drops consecutive duplicate coordinates.
pub fn remove_repeated_points(coords: &[Coordinate]) -> Vec<Coordinate> {
    let mut ret: Vec<Coordinate> = Vec::with_capacity(coords.len());
    for c in coords {
        if ret.last() != Some(c) {
            ret.push(*c);
        }
    }
    ret
}

/// The first point of `test` that doesn't appear in `pts`.
pub fn point_not_in_list<'a>(test: &'a [Coordinate], pts: &[Coordinate]) -> Option<&'a Coordinate> {
    test.iter().find(|t| !pts.contains(t))
}
