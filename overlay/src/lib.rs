#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod builder;
mod edge;
mod edge_ring;
mod geom;
mod geometry;
mod geometry_graph;
mod graph;
mod intersection;
mod label;
mod locate;
mod operation;

pub use geom::{Coordinate, Envelope};
pub use geometry::{Crs, Curve, Geometry, Primitive, PrimitiveRef, Referenced, Surface};
pub use label::Location;
pub use operation::OverlayOp;

/// Something went wrong while computing an overlay.
///
/// No partial results are ever returned: if an overlay fails, nothing comes
/// out of it.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// At least one of the input coordinates was not a number.
    #[error("input coordinate is not a number")]
    NaN,
    /// At least one of the input coordinates was infinite.
    #[error("input coordinate is infinite")]
    Infinity,
    /// An input mixes kinds of primitives that can't be overlaid together.
    #[error("unsupported input: an aggregate mixing {kinds}")]
    UnsupportedInput {
        /// The kinds of primitives that were mixed.
        kinds: String,
    },
    /// The overlay graph turned out to be inconsistent. This happens when the
    /// inputs are invalid (for example, self-intersecting surfaces) or when
    /// rounding of intersection points changed the topology.
    #[error("topology error: {message} at {at}")]
    Topology {
        /// What went wrong.
        message: String,
        /// Where it went wrong.
        at: Coordinate,
    },
    /// A string didn't name an overlay operation.
    #[error("unknown overlay operation {0:?}")]
    UnknownOp(String),
}

impl Error {
    pub(crate) fn topology(message: impl Into<String>, at: Coordinate) -> Self {
        Error::Topology {
            message: message.into(),
            at,
        }
    }
}

/// The result type of this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Computes a boolean operation between two geometries.
///
/// Returns `None` if the result is empty. Otherwise, the result is a single
/// primitive, a homogeneous collection, or an [`Geometry::Aggregate`] if it
/// contains primitives of different dimensions. Result shells are clockwise
/// and holes counter-clockwise.
pub fn overlay(a: &Geometry, b: &Geometry, op: OverlayOp) -> Result<Option<Geometry>> {
    a.validate()?;
    b.validate()?;
    log::debug!("computing {op}");
    operation::compute_overlay(a, b, op)
}

/// The points in both `a` and `b`.
pub fn intersection(a: &Geometry, b: &Geometry) -> Result<Option<Geometry>> {
    overlay(a, b, OverlayOp::Intersection)
}

/// The points in `a` or `b`.
pub fn union(a: &Geometry, b: &Geometry) -> Result<Option<Geometry>> {
    overlay(a, b, OverlayOp::Union)
}

/// The points in `a` but not in `b`.
pub fn difference(a: &Geometry, b: &Geometry) -> Result<Option<Geometry>> {
    overlay(a, b, OverlayOp::Difference)
}

/// The points in exactly one of `a` and `b`.
pub fn sym_difference(a: &Geometry, b: &Geometry) -> Result<Option<Geometry>> {
    overlay(a, b, OverlayOp::SymDifference)
}

/// Computes a boolean operation between two geometries that carry coordinate
/// reference systems.
///
/// The reference systems aren't checked against each other or interpreted in
/// any way: the result takes the first operand's, or the second operand's if
/// the first doesn't have one.
pub fn overlay_referenced(a: &Referenced, b: &Referenced, op: OverlayOp) -> Result<Option<Referenced>> {
    let crs = a.crs.clone().or_else(|| b.crs.clone());
    Ok(overlay(&a.geometry, &b.geometry, op)?.map(|geometry| Referenced { geometry, crs }))
}

/// Locates a point relative to a geometry: in its interior, on its boundary,
/// or outside it.
///
/// The boundary of a collection is determined by the "Mod-2" rule: a point is
/// on the boundary if it's on the boundary of an odd number of the
/// collection's members.
pub fn locate(p: &Coordinate, geometry: &Geometry) -> Location {
    locate::locate(p, geometry)
}
