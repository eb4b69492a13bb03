use std::collections::BTreeSet;

use assert_matches::assert_matches;
use ordered_float::OrderedFloat;
use overlay::{
    Coordinate, Crs, Curve, Error, Geometry, OverlayOp, Primitive, Referenced, Surface,
};

fn ccw_square(x: f64, y: f64, size: f64) -> Surface {
    Surface::new([(x, y), (x + size, y), (x + size, y + size), (x, y + size)])
}

/// A closed, clockwise square. Overlay results come out this way, so inputs
/// built like this can be compared exactly.
fn cw_square(x: f64, y: f64, size: f64) -> Surface {
    Surface::new([(x, y), (x, y + size), (x + size, y + size), (x + size, y), (x, y)])
}

fn vertices(ring: &[Coordinate]) -> BTreeSet<(OrderedFloat<f64>, OrderedFloat<f64>)> {
    ring.iter()
        .map(|c| (OrderedFloat(c.x), OrderedFloat(c.y)))
        .collect()
}

fn vertex_set(coords: &[(f64, f64)]) -> BTreeSet<(OrderedFloat<f64>, OrderedFloat<f64>)> {
    coords
        .iter()
        .map(|&(x, y)| (OrderedFloat(x), OrderedFloat(y)))
        .collect()
}

fn is_clockwise(ring: &[Coordinate]) -> bool {
    let twice_area: f64 = ring
        .windows(2)
        .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
        .sum();
    twice_area < 0.0
}

fn overlapping_squares() -> (Geometry, Geometry) {
    (
        Geometry::Surface(ccw_square(0.0, 0.0, 10.0)),
        Geometry::Surface(ccw_square(5.0, 5.0, 10.0)),
    )
}

#[test]
fn overlapping_squares_intersection() {
    let (a, b) = overlapping_squares();
    let result = overlay::intersection(&a, &b).unwrap().unwrap();
    let surface = assert_matches!(result, Geometry::Surface(s) => s);
    assert!(surface.holes.is_empty());
    assert_eq!(surface.area(), 25.0);
    assert_eq!(
        vertices(&surface.shell),
        vertex_set(&[(5.0, 5.0), (10.0, 5.0), (10.0, 10.0), (5.0, 10.0)])
    );
    assert_eq!(surface.shell.first(), surface.shell.last());
    assert!(is_clockwise(&surface.shell));
}

#[test]
fn overlapping_squares_union() {
    let (a, b) = overlapping_squares();
    let result = overlay::union(&a, &b).unwrap().unwrap();
    let surface = assert_matches!(result, Geometry::Surface(s) => s);
    assert!(surface.holes.is_empty());
    assert_eq!(surface.area(), 175.0);
    // The two crossing points become corners of the outline.
    assert_eq!(
        vertices(&surface.shell),
        vertex_set(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 5.0),
            (15.0, 5.0),
            (15.0, 15.0),
            (5.0, 15.0),
            (5.0, 10.0),
            (0.0, 10.0),
        ])
    );
    assert!(is_clockwise(&surface.shell));
}

#[test]
fn overlapping_squares_difference() {
    let (a, b) = overlapping_squares();
    let result = overlay::difference(&a, &b).unwrap().unwrap();
    let surface = assert_matches!(result, Geometry::Surface(s) => s);
    assert_eq!(surface.area(), 75.0);
    assert_eq!(
        vertices(&surface.shell),
        vertex_set(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 5.0),
            (5.0, 5.0),
            (5.0, 10.0),
            (0.0, 10.0),
        ])
    );
}

#[test]
fn overlapping_squares_sym_difference() {
    let (a, b) = overlapping_squares();
    let result = overlay::sym_difference(&a, &b).unwrap().unwrap();
    let surfaces = assert_matches!(result, Geometry::MultiSurface(s) => s);
    assert_eq!(surfaces.len(), 2);
    assert_eq!(surfaces.iter().map(Surface::area).sum::<f64>(), 150.0);
}

#[test]
fn surface_inside_a_hole_misses_the_donut() {
    let donut = Geometry::Surface(
        ccw_square(0.0, 0.0, 10.0).with_hole([(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0)]),
    );
    let inner = Geometry::Surface(ccw_square(4.0, 4.0, 2.0));
    assert_eq!(overlay::intersection(&donut, &inner), Ok(None));

    let union = overlay::union(&donut, &inner).unwrap().unwrap();
    let surfaces = assert_matches!(union, Geometry::MultiSurface(s) => s);
    assert_eq!(surfaces.len(), 2);
    assert_eq!(union_area(&surfaces), 100.0 - 16.0 + 4.0);
}

fn union_area(surfaces: &[Surface]) -> f64 {
    surfaces.iter().map(Surface::area).sum()
}

#[test]
fn disjoint_squares() {
    let a = cw_square(0.0, 0.0, 10.0);
    let b = cw_square(20.0, 0.0, 10.0);
    let ga = Geometry::Surface(a.clone());
    let gb = Geometry::Surface(b.clone());

    assert_eq!(overlay::intersection(&ga, &gb), Ok(None));
    let both = Ok(Some(Geometry::MultiSurface(vec![a.clone(), b])));
    assert_eq!(overlay::union(&ga, &gb), both);
    assert_eq!(overlay::sym_difference(&ga, &gb), both);
    assert_eq!(overlay::difference(&ga, &gb), Ok(Some(Geometry::Surface(a))));
}

#[test]
fn line_tangent_to_a_surface() {
    let v = Geometry::Curve(Curve::new([(-5.0, 20.0), (5.0, 10.0), (15.0, 20.0)]));
    let square = Geometry::Surface(ccw_square(0.0, 0.0, 10.0));
    assert_eq!(
        overlay::intersection(&v, &square),
        Ok(Some(Geometry::Point(Coordinate::new(5.0, 10.0))))
    );
}

/// The distinct vertices of a ring in order, without the closing point.
fn cycle(ring: &[Coordinate]) -> &[Coordinate] {
    match ring {
        [first, rest @ .., last] if first == last => &ring[..rest.len() + 1],
        _ => ring,
    }
}

/// Whether two rings visit the same vertices in the same cyclic order, in
/// either direction and from any starting vertex.
fn same_ring(a: &[Coordinate], b: &[Coordinate]) -> bool {
    let (a, b) = (cycle(a), cycle(b));
    if a.len() != b.len() {
        return false;
    }
    let n = a.len();
    let reversed: Vec<Coordinate> = b.iter().rev().copied().collect();
    [b, &reversed[..]]
        .iter()
        .any(|b| (0..n).any(|shift| (0..n).all(|i| a[i] == b[(i + shift) % n])))
}

fn same_surface(a: &Surface, b: &Surface) -> bool {
    same_ring(&a.shell, &b.shell)
        && a.holes.len() == b.holes.len()
        && a.holes.iter().all(|h| b.holes.iter().any(|k| same_ring(h, k)))
}

fn assert_idempotent(s: &Surface) {
    let g = Geometry::Surface(s.clone());
    for op in [OverlayOp::Intersection, OverlayOp::Union] {
        let result = overlay::overlay(&g, &g, op).unwrap().unwrap();
        let out = assert_matches!(result, Geometry::Surface(out) => out);
        assert!(same_surface(&out, s), "{op}: {out:?}");
        assert_eq!(out.shell.first(), out.shell.last());
        assert!(is_clockwise(&out.shell));
        assert!(out.holes.iter().all(|h| !is_clockwise(h)));
    }
    assert_eq!(overlay::difference(&g, &g), Ok(None));
    assert_eq!(overlay::sym_difference(&g, &g), Ok(None));
}

#[test]
fn ring_equivalence() {
    let ring = |pts: &[(f64, f64)]| -> Vec<Coordinate> {
        pts.iter().map(|&(x, y)| Coordinate::new(x, y)).collect()
    };
    let open = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
    let rotated_back = ring(&[(10.0, 0.0), (0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
    let twisted = ring(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)]);
    assert!(same_ring(&open, &rotated_back));
    assert!(same_ring(&rotated_back, &open));
    assert!(!same_ring(&open, &twisted));
    assert!(!same_ring(&open, &open[..3]));
}

#[test]
fn identical_surfaces() {
    assert_idempotent(&cw_square(0.0, 0.0, 10.0));
    // Open and counter-clockwise: the result is closed and clockwise, but it
    // visits the same corners.
    assert_idempotent(&ccw_square(0.0, 0.0, 10.0));
    assert_idempotent(&Surface::new([(0.0, 0.0), (4.0, 0.0), (4.0, 3.0), (2.0, 5.0), (0.0, 3.0)]));
}

#[test]
fn identical_holed_surfaces() {
    let ccw_hole = ccw_square(0.0, 0.0, 10.0).with_hole([(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0)]);
    assert_idempotent(&ccw_hole);

    let two_holes = cw_square(0.0, 0.0, 10.0)
        .with_hole([(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0), (1.0, 1.0)])
        .with_hole([(5.0, 5.0), (5.0, 8.0), (8.0, 8.0), (8.0, 5.0), (5.0, 5.0)]);
    assert_idempotent(&two_holes);
}

#[test]
fn identical_curves_and_points() {
    let segment = Geometry::Curve(Curve::new([(0.0, 0.0), (10.0, 0.0)]));
    assert_eq!(overlay::intersection(&segment, &segment), Ok(Some(segment.clone())));
    assert_eq!(overlay::union(&segment, &segment), Ok(Some(segment.clone())));

    // Overlaying a curve with itself nodes it at every vertex.
    let c = Geometry::Curve(Curve::new([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]));
    let pieces = Geometry::MultiCurve(vec![
        Curve::new([(0.0, 0.0), (10.0, 0.0)]),
        Curve::new([(10.0, 0.0), (10.0, 10.0)]),
    ]);
    assert_eq!(overlay::intersection(&c, &c), Ok(Some(pieces)));
    assert_eq!(overlay::difference(&c, &c), Ok(None));

    let pts = Geometry::MultiPoint(vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 5.0)]);
    assert_eq!(overlay::intersection(&pts, &pts), Ok(Some(pts.clone())));
    assert_eq!(overlay::sym_difference(&pts, &pts), Ok(None));
}

#[test]
fn shared_edge_intersection_is_a_curve() {
    let a = Geometry::Surface(ccw_square(0.0, 0.0, 10.0));
    let b = Geometry::Surface(ccw_square(10.0, 0.0, 10.0));
    assert_eq!(
        overlay::intersection(&a, &b),
        Ok(Some(Geometry::Curve(Curve::new([(10.0, 0.0), (10.0, 10.0)]))))
    );

    let union = overlay::union(&a, &b).unwrap().unwrap();
    let surface = assert_matches!(union, Geometry::Surface(s) => s);
    assert_eq!(surface.area(), 200.0);
}

#[test]
fn corner_touch_intersection_is_a_point() {
    let a = Geometry::Surface(ccw_square(0.0, 0.0, 5.0));
    let b = Geometry::Surface(ccw_square(5.0, 5.0, 5.0));
    assert_eq!(
        overlay::intersection(&a, &b),
        Ok(Some(Geometry::Point(Coordinate::new(5.0, 5.0))))
    );

    // Touching shells stay separate surfaces.
    let union = overlay::union(&a, &b).unwrap().unwrap();
    let surfaces = assert_matches!(union, Geometry::MultiSurface(s) => s);
    assert_eq!(surfaces.len(), 2);
    assert_eq!(union_area(&surfaces), 50.0);
}

#[test]
fn cutting_a_hole() {
    let outer = Geometry::Surface(cw_square(0.0, 0.0, 10.0));
    let inner = Geometry::Surface(cw_square(3.0, 3.0, 4.0));
    let result = overlay::difference(&outer, &inner).unwrap().unwrap();
    let surface = assert_matches!(result, Geometry::Surface(s) => s);
    assert_eq!(surface.area(), 84.0);
    assert_eq!(surface.holes.len(), 1);

    let hole = &surface.holes[0];
    assert!(!is_clockwise(hole));
    assert!(hole
        .iter()
        .all(|p| p.x > 0.0 && p.x < 10.0 && p.y > 0.0 && p.y < 10.0));
    assert_eq!(
        vertices(hole),
        vertex_set(&[(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0)])
    );
}

#[test]
fn empty_operands() {
    let s = Geometry::Surface(cw_square(0.0, 0.0, 10.0));
    let empty = Geometry::empty();
    assert_eq!(overlay::union(&s, &empty), Ok(Some(s.clone())));
    assert_eq!(overlay::union(&empty, &s), Ok(Some(s.clone())));
    assert_eq!(overlay::difference(&s, &empty), Ok(Some(s.clone())));
    assert_eq!(overlay::intersection(&s, &empty), Ok(None));
    assert_eq!(overlay::difference(&empty, &s), Ok(None));
    assert_eq!(overlay::union(&empty, &empty), Ok(None));

    let c = Geometry::Curve(Curve::new([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]));
    assert_eq!(overlay::union(&c, &Geometry::MultiSurface(vec![])), Ok(Some(c.clone())));
}

#[test]
fn line_through_a_surface() {
    let line = Geometry::Curve(Curve::new([(-5.0, 5.0), (15.0, 5.0)]));
    let square = Geometry::Surface(ccw_square(0.0, 0.0, 10.0));

    assert_eq!(
        overlay::intersection(&line, &square),
        Ok(Some(Geometry::Curve(Curve::new([(0.0, 5.0), (10.0, 5.0)]))))
    );
    assert_eq!(
        overlay::difference(&line, &square),
        Ok(Some(Geometry::MultiCurve(vec![
            Curve::new([(-5.0, 5.0), (0.0, 5.0)]),
            Curve::new([(10.0, 5.0), (15.0, 5.0)]),
        ])))
    );

    // The part of the line inside the square is swallowed by it.
    let union = overlay::union(&line, &square).unwrap().unwrap();
    let prims = assert_matches!(union, Geometry::Aggregate(p) => p);
    assert_eq!(prims.len(), 3);
    assert_matches!(&prims[0], Primitive::Curve(c) if c.coords == Curve::new([(-5.0, 5.0), (0.0, 5.0)]).coords);
    assert_matches!(&prims[1], Primitive::Curve(c) if c.coords == Curve::new([(10.0, 5.0), (15.0, 5.0)]).coords);
    assert_matches!(&prims[2], Primitive::Surface(s) if s.area() == 100.0);
}

// Result curves are not merged: every noded edge comes out as its own curve,
// even where two of them meet end to end.
#[test]
fn result_curves_are_not_merged() {
    let bowtie = Geometry::Curve(Curve::new([(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]));
    let result = overlay::union(&bowtie, &Geometry::empty()).unwrap().unwrap();
    let curves = assert_matches!(result, Geometry::MultiCurve(c) => c);
    assert_eq!(curves.len(), 3);
    let total: f64 = curves.iter().map(Curve::length).sum();
    assert!((total - (2.0 * 8f64.sqrt() + 2.0)).abs() < 1e-12);
}

#[test]
fn point_in_surface() {
    let square = Geometry::Surface(ccw_square(0.0, 0.0, 10.0));
    let pts = Geometry::MultiPoint(vec![
        Coordinate::new(5.0, 5.0),
        Coordinate::new(10.0, 3.0),
        Coordinate::new(20.0, 20.0),
    ]);
    assert_eq!(
        overlay::intersection(&pts, &square),
        Ok(Some(Geometry::MultiPoint(vec![
            Coordinate::new(5.0, 5.0),
            Coordinate::new(10.0, 3.0),
        ])))
    );
    assert_eq!(
        overlay::difference(&pts, &square),
        Ok(Some(Geometry::Point(Coordinate::new(20.0, 20.0))))
    );
}

#[test]
fn reference_systems_are_carried() {
    let (a, b) = overlapping_squares();
    let a = Referenced {
        geometry: a,
        crs: None,
    };
    let b = Referenced {
        geometry: b,
        crs: Some(Crs("EPSG:3857".to_owned())),
    };
    let result = overlay::overlay_referenced(&a, &b, OverlayOp::Intersection)
        .unwrap()
        .unwrap();
    assert_eq!(result.crs, Some(Crs("EPSG:3857".to_owned())));
    assert_eq!(result.geometry.area(), 25.0);

    let a = Referenced {
        crs: Some(Crs("EPSG:4326".to_owned())),
        ..a
    };
    let result = overlay::overlay_referenced(&a, &b, OverlayOp::Union)
        .unwrap()
        .unwrap();
    assert_eq!(result.crs, Some(Crs("EPSG:4326".to_owned())));
}

#[test]
fn invalid_operands() {
    let square = Geometry::Surface(ccw_square(0.0, 0.0, 10.0));
    let nan = Geometry::Point(Coordinate::new(f64::NAN, 0.0));
    assert_eq!(overlay::union(&square, &nan), Err(Error::NaN));

    let inf = Geometry::Curve(Curve::new([(0.0, 0.0), (f64::NEG_INFINITY, 1.0)]));
    assert_eq!(overlay::intersection(&inf, &square), Err(Error::Infinity));

    let mixed = Geometry::Aggregate(vec![
        Primitive::Point(Coordinate::new(1.0, 1.0)),
        Primitive::Surface(ccw_square(0.0, 0.0, 1.0)),
    ]);
    assert_matches!(
        overlay::union(&mixed, &square),
        Err(Error::UnsupportedInput { .. })
    );
}

#[test]
fn self_crossing_surface_is_a_topology_error() {
    let bowtie = Geometry::Surface(Surface::new([(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)]));
    let square = Geometry::Surface(ccw_square(2.0, 2.0, 6.0));
    for op in OverlayOp::ALL {
        assert_matches!(
            overlay::overlay(&bowtie, &square, op),
            Err(Error::Topology { at, .. }) if at == Coordinate::new(5.0, 5.0)
        );
    }
}
