//! Turning a labelled overlay graph into result geometry.
//!
//! Surfaces are built first, then curves (which must know which of their
//! edges lie inside the result surfaces), then points (which must know about
//! both).

mod line;
mod point;
mod polygon;

pub use line::build_lines;
pub use point::build_points;
pub use polygon::build_polygons;

use crate::{
    geom::Coordinate,
    geometry::{Curve, Surface},
    label::Location,
    locate::{locate_on_curve, locate_in_surface},
};

/// Is `p` inside or on one of `surfaces`?
pub fn is_covered_by_area(p: &Coordinate, surfaces: &[Surface]) -> bool {
    surfaces
        .iter()
        .any(|s| locate_in_surface(p, s) != Location::Exterior)
}

/// Is `p` on one of `curves`, or inside or on one of `surfaces`?
pub fn is_covered_by_line_or_area(p: &Coordinate, curves: &[Curve], surfaces: &[Surface]) -> bool {
    curves
        .iter()
        .any(|c| locate_on_curve(p, c) != Location::Exterior)
        || is_covered_by_area(p, surfaces)
}
