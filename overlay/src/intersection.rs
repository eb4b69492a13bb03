//! Segment intersection and noding of edge sets.

use malachite::num::conversion::traits::RoundingFrom;
use malachite::rounding_modes::RoundingMode;
use malachite::Rational;

use crate::{
    edge::Edge,
    geom::{orientation, Coordinate, Envelope, Orientation},
};

/// How two segments intersect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SegmentIntersection {
    None,
    /// The segments meet in a single point. The intersection is "proper" if
    /// it lies in the interior of both segments.
    Point { pt: Coordinate, proper: bool },
    /// The segments overlap along a (non-degenerate) segment.
    Collinear([Coordinate; 2]),
}

impl SegmentIntersection {
    pub fn points(&self) -> &[Coordinate] {
        match self {
            SegmentIntersection::None => &[],
            SegmentIntersection::Point { pt, .. } => std::slice::from_ref(pt),
            SegmentIntersection::Collinear(pts) => pts,
        }
    }

    pub fn is_proper(&self) -> bool {
        matches!(self, SegmentIntersection::Point { proper: true, .. })
    }
}

/// Intersects the segments `p1 -- p2` and `q1 -- q2`.
///
/// Whenever an intersection point coincides with an input endpoint, the
/// endpoint itself is returned. Proper intersection points are computed
/// exactly and rounded to the nearest representable coordinate.
pub fn intersect_segments(
    p1: &Coordinate,
    p2: &Coordinate,
    q1: &Coordinate,
    q2: &Coordinate,
) -> SegmentIntersection {
    if !Envelope::from_segment(p1, p2).intersects(&Envelope::from_segment(q1, q2)) {
        return SegmentIntersection::None;
    }

    let pq1 = orientation(p1, p2, q1);
    let pq2 = orientation(p1, p2, q2);
    if pq1 == pq2 && pq1 != Orientation::Collinear {
        return SegmentIntersection::None;
    }

    let qp1 = orientation(q1, q2, p1);
    let qp2 = orientation(q1, q2, p2);
    if qp1 == qp2 && qp1 != Orientation::Collinear {
        return SegmentIntersection::None;
    }

    let collinear = [pq1, pq2, qp1, qp2]
        .iter()
        .all(|o| *o == Orientation::Collinear);
    if collinear {
        return collinear_intersection(p1, p2, q1, q2);
    }

    if [pq1, pq2, qp1, qp2].contains(&Orientation::Collinear) {
        // An endpoint of one segment lies on the other. Prefer the shared
        // endpoints, so that exact equality survives.
        let pt = if p1 == q1 || p1 == q2 {
            *p1
        } else if p2 == q1 || p2 == q2 {
            *p2
        } else if pq1 == Orientation::Collinear {
            *q1
        } else if pq2 == Orientation::Collinear {
            *q2
        } else if qp1 == Orientation::Collinear {
            *p1
        } else {
            *p2
        };
        SegmentIntersection::Point { pt, proper: false }
    } else {
        let pt = exact_intersection(p1, p2, q1, q2)
            .unwrap_or_else(|| approx_intersection(p1, p2, q1, q2));
        SegmentIntersection::Point { pt, proper: true }
    }
}

fn collinear_intersection(
    p1: &Coordinate,
    p2: &Coordinate,
    q1: &Coordinate,
    q2: &Coordinate,
) -> SegmentIntersection {
    let p_env = Envelope::from_segment(p1, p2);
    let q_env = Envelope::from_segment(q1, q2);
    let p1q1p2 = p_env.contains_point(q1);
    let p1q2p2 = p_env.contains_point(q2);
    let q1p1q2 = q_env.contains_point(p1);
    let q1p2q2 = q_env.contains_point(p2);

    let point_or_segment = |a: &Coordinate, b: &Coordinate, just_touching: bool| {
        if a == b && just_touching {
            SegmentIntersection::Point {
                pt: *a,
                proper: false,
            }
        } else {
            SegmentIntersection::Collinear([*a, *b])
        }
    };

    if p1q1p2 && p1q2p2 {
        SegmentIntersection::Collinear([*q1, *q2])
    } else if q1p1q2 && q1p2q2 {
        SegmentIntersection::Collinear([*p1, *p2])
    } else if p1q1p2 && q1p1q2 {
        point_or_segment(q1, p1, !p1q2p2 && !q1p2q2)
    } else if p1q1p2 && q1p2q2 {
        point_or_segment(q1, p2, !p1q2p2 && !q1p1q2)
    } else if p1q2p2 && q1p1q2 {
        point_or_segment(q2, p1, !p1q1p2 && !q1p2q2)
    } else if p1q2p2 && q1p2q2 {
        point_or_segment(q2, p2, !p1q1p2 && !q1p1q2)
    } else {
        SegmentIntersection::None
    }
}

fn exact(x: f64) -> Option<Rational> {
    Rational::try_from(x).ok()
}

fn nearest_f64(r: &Rational) -> f64 {
    f64::rounding_from(r, RoundingMode::Nearest).0
}

// Rounding to nearest is monotone, so the rounded point stays inside the
// envelopes of both segments.
fn exact_intersection(
    p1: &Coordinate,
    p2: &Coordinate,
    q1: &Coordinate,
    q2: &Coordinate,
) -> Option<Coordinate> {
    let (p1x, p1y) = (exact(p1.x)?, exact(p1.y)?);
    let (p2x, p2y) = (exact(p2.x)?, exact(p2.y)?);
    let (q1x, q1y) = (exact(q1.x)?, exact(q1.y)?);
    let (q2x, q2y) = (exact(q2.x)?, exact(q2.y)?);

    let dpx = &p2x - &p1x;
    let dpy = &p2y - &p1y;
    let dqx = &q2x - &q1x;
    let dqy = &q2y - &q1y;

    let denom = &dpx * &dqy - &dpy * &dqx;
    if denom == 0 {
        return None;
    }
    let t = ((&q1x - &p1x) * &dqy - (&q1y - &p1y) * &dqx) / denom;
    let x = p1x + &t * dpx;
    let y = p1y + t * dpy;
    Some(Coordinate::new(nearest_f64(&x), nearest_f64(&y)))
}

fn approx_intersection(
    p1: &Coordinate,
    p2: &Coordinate,
    q1: &Coordinate,
    q2: &Coordinate,
) -> Coordinate {
    let (dpx, dpy) = (p2.x - p1.x, p2.y - p1.y);
    let (dqx, dqy) = (q2.x - q1.x, q2.y - q1.y);
    let t = ((q1.x - p1.x) * dqy - (q1.y - p1.y) * dqx) / (dpx * dqy - dpy * dqx);
    let env = Envelope::from_segment(p1, p2);
    Coordinate::new(
        (p1.x + t * dpx).clamp(env.min_x, env.max_x),
        (p1.y + t * dpy).clamp(env.min_y, env.max_y),
    )
}

/// A distance-like measure of how far `p` lies along the segment `p0 -- p1`.
///
/// This isn't the euclidean distance, but it's monotone along the segment and
/// exact for points that coincide with the endpoints, which is all we need to
/// sort intersections along an edge.
pub fn edge_distance(p: &Coordinate, p0: &Coordinate, p1: &Coordinate) -> f64 {
    let dx = (p1.x - p0.x).abs();
    let dy = (p1.y - p0.y).abs();
    if p == p0 {
        0.0
    } else if p == p1 {
        dx.max(dy)
    } else {
        let pdx = (p.x - p0.x).abs();
        let pdy = (p.y - p0.y).abs();
        let dist = if dx > dy { pdx } else { pdy };
        if dist == 0.0 {
            pdx.max(pdy)
        } else {
            dist
        }
    }
}

/// Counters from one noding pass, for logging.
#[derive(Clone, Copy, Debug, Default)]
pub struct NodingStats {
    pub tests: usize,
    pub intersections: usize,
    pub proper: usize,
}

// An intersection found on edge `edge`, to be recorded once all the edges
// have been scanned.
struct Hit {
    edge: usize,
    segment: usize,
    pt: Coordinate,
}

/// Tests every pair of segments of one edge set, including pairs within a
/// single edge, and records the non-trivial intersections on the edges.
pub fn self_intersect(edges: &mut [Edge]) -> NodingStats {
    let mut stats = NodingStats::default();
    let mut hits = Vec::new();
    for i in 0..edges.len() {
        for j in i..edges.len() {
            if !edges[i].envelope().intersects(edges[j].envelope()) {
                continue;
            }
            intersect_edges(&edges[i], i, &edges[j], j, i == j, &mut stats, &mut hits);
        }
    }
    record(edges, &mut [], hits, Vec::new());
    stats
}

/// Tests every segment of `a` against every segment of `b`, recording the
/// intersections on both sides. Edges that meet the other set are no longer
/// isolated.
pub fn intersect_edge_sets(a: &mut [Edge], b: &mut [Edge]) -> NodingStats {
    let mut stats = NodingStats::default();
    let mut hits_a = Vec::new();
    let mut hits_b = Vec::new();
    for (i, ea) in a.iter().enumerate() {
        for (j, eb) in b.iter().enumerate() {
            if !ea.envelope().intersects(eb.envelope()) {
                continue;
            }
            let mut hits = Vec::new();
            intersect_edges(ea, i, eb, j, false, &mut stats, &mut hits);
            for (k, hit) in hits.into_iter().enumerate() {
                // `intersect_edges` emits hits in (first edge, second edge) order per point.
                if k % 2 == 0 {
                    hits_a.push(hit);
                } else {
                    hits_b.push(hit);
                }
            }
        }
    }
    record(a, b, hits_a, hits_b);
    stats
}

fn record(a: &mut [Edge], b: &mut [Edge], hits_a: Vec<Hit>, hits_b: Vec<Hit>) {
    for (edges, hits) in [(a, hits_a), (b, hits_b)] {
        for hit in hits {
            let edge = &mut edges[hit.edge];
            edge.add_intersection(hit.pt, hit.segment);
        }
    }
}

fn intersect_edges(
    e0: &Edge,
    i0: usize,
    e1: &Edge,
    i1: usize,
    same_edge: bool,
    stats: &mut NodingStats,
    hits: &mut Vec<Hit>,
) {
    let pts0 = e0.pts();
    let pts1 = e1.pts();
    for s0 in 0..pts0.len() - 1 {
        let start1 = if same_edge { s0 + 1 } else { 0 };
        for s1 in start1..pts1.len() - 1 {
            stats.tests += 1;
            let isect = intersect_segments(&pts0[s0], &pts0[s0 + 1], &pts1[s1], &pts1[s1 + 1]);
            if isect == SegmentIntersection::None {
                continue;
            }
            stats.intersections += 1;
            if same_edge && is_trivial(e0, s0, s1, &isect) {
                continue;
            }
            if isect.is_proper() {
                stats.proper += 1;
            }
            for pt in isect.points() {
                hits.push(Hit {
                    edge: i0,
                    segment: s0,
                    pt: *pt,
                });
                hits.push(Hit {
                    edge: i1,
                    segment: s1,
                    pt: *pt,
                });
            }
        }
    }
}

// Consecutive segments of an edge always meet at their shared vertex, and so
// do the first and last segments of a closed edge. Those meetings aren't
// self-intersections.
fn is_trivial(edge: &Edge, s0: usize, s1: usize, isect: &SegmentIntersection) -> bool {
    if isect.points().len() != 1 {
        return false;
    }
    let (lo, hi) = (s0.min(s1), s0.max(s1));
    if hi - lo == 1 {
        return true;
    }
    let last_segment = edge.pts().len() - 2;
    edge.is_closed() && lo == 0 && hi == last_segment
}
