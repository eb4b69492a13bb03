//! Locating points relative to geometries.

use crate::{
    geom::{orientation, Coordinate, Envelope, Orientation},
    geometry::{Curve, Geometry, PrimitiveRef, Surface},
    label::Location,
};

/// Locates `p` relative to a closed ring by counting crossings of a ray
/// going right from `p`. Points on the ring are on its boundary.
pub fn locate_in_ring(p: &Coordinate, ring: &[Coordinate]) -> Location {
    let mut crossings = 0;
    for w in ring.windows(2) {
        let (p1, p2) = (&w[0], &w[1]);

        // Segments entirely to the left of the point don't cross the ray.
        if p1.x < p.x && p2.x < p.x {
            continue;
        }
        if p == p2 {
            return Location::Boundary;
        }

        if p1.y == p.y && p2.y == p.y {
            // A horizontal segment at the height of the ray.
            let (min_x, max_x) = (p1.x.min(p2.x), p1.x.max(p2.x));
            if min_x <= p.x && p.x <= max_x {
                return Location::Boundary;
            }
            continue;
        }

        // Count segments that straddle the ray, including the upper endpoint
        // but not the lower one, so that vertices on the ray count once.
        if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
            let mut orient = orientation(p1, p2, p);
            if orient == Orientation::Collinear {
                return Location::Boundary;
            }
            if p2.y < p1.y {
                orient = match orient {
                    Orientation::Clockwise => Orientation::CounterClockwise,
                    _ => Orientation::Clockwise,
                };
            }
            if orient == Orientation::CounterClockwise {
                crossings += 1;
            }
        }
    }
    if crossings % 2 == 1 {
        Location::Interior
    } else {
        Location::Exterior
    }
}

fn is_on_line(p: &Coordinate, line: &[Coordinate]) -> bool {
    line.windows(2).any(|w| {
        Envelope::from_segment(&w[0], &w[1]).contains_point(p)
            && orientation(&w[0], &w[1], p) == Orientation::Collinear
    })
}

/// Locates `p` relative to a surface: inside the shell and outside all holes
/// is interior, on any ring is boundary.
pub fn locate_in_surface(p: &Coordinate, surface: &Surface) -> Location {
    if surface.is_empty() || !Envelope::of(&surface.shell).contains_point(p) {
        return Location::Exterior;
    }
    match locate_in_ring(p, &closed(&surface.shell)) {
        Location::Interior => {}
        other => return other,
    }
    for hole in &surface.holes {
        match locate_in_ring(p, &closed(hole)) {
            Location::Interior => return Location::Exterior,
            Location::Boundary => return Location::Boundary,
            Location::Exterior => {}
        }
    }
    Location::Interior
}

fn closed(ring: &[Coordinate]) -> std::borrow::Cow<'_, [Coordinate]> {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if first != last => {
            let mut ret = ring.to_vec();
            ret.push(*first);
            ret.into()
        }
        _ => ring.into(),
    }
}

/// Locates `p` relative to a curve. The endpoints of an open curve are its
/// boundary; a closed curve has no boundary.
pub fn locate_on_curve(p: &Coordinate, curve: &Curve) -> Location {
    let coords = &curve.coords;
    if coords.is_empty() || !Envelope::of(coords).contains_point(p) {
        return Location::Exterior;
    }
    if !curve.is_closed() && (Some(p) == coords.first() || Some(p) == coords.last()) {
        return Location::Boundary;
    }
    if coords.len() == 1 {
        return if coords[0] == *p {
            Location::Interior
        } else {
            Location::Exterior
        };
    }
    if is_on_line(p, coords) {
        Location::Interior
    } else {
        Location::Exterior
    }
}

pub fn locate_on_point(p: &Coordinate, pt: &Coordinate) -> Location {
    if p == pt {
        Location::Interior
    } else {
        Location::Exterior
    }
}

/// Locates `p` relative to an arbitrary geometry.
///
/// The components of a collection are combined with the "Mod-2" rule: a
/// point is on the boundary of the collection if it's on the boundary of an
/// odd number of its components.
pub fn locate(p: &Coordinate, geometry: &Geometry) -> Location {
    match geometry {
        Geometry::Curve(c) => return locate_on_curve(p, c),
        Geometry::Surface(s) => return locate_in_surface(p, s),
        _ => {}
    }

    let mut is_in = false;
    let mut boundaries = 0;
    for prim in geometry.primitives() {
        let loc = match prim {
            PrimitiveRef::Point(pt) => locate_on_point(p, pt),
            PrimitiveRef::Curve(c) => locate_on_curve(p, c),
            PrimitiveRef::Surface(s) => locate_in_surface(p, s),
        };
        match loc {
            Location::Interior => is_in = true,
            Location::Boundary => boundaries += 1,
            Location::Exterior => {}
        }
    }
    if boundaries % 2 == 1 {
        Location::Boundary
    } else if boundaries > 0 || is_in {
        Location::Interior
    } else {
        Location::Exterior
    }
}

/// Locates `p` relative to the surfaces of `geometry`, ignoring everything of
/// lower dimension.
pub fn locate_in_area(p: &Coordinate, geometry: &Geometry) -> Location {
    geometry
        .primitives()
        .into_iter()
        .filter_map(|prim| match prim {
            PrimitiveRef::Surface(s) => Some(locate_in_surface(p, s)),
            _ => None,
        })
        .find(|loc| *loc != Location::Exterior)
        .unwrap_or(Location::Exterior)
}
