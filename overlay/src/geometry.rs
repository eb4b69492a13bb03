//! The public geometry model.

use serde::{Deserialize, Serialize};

use crate::{
    geom::{signed_area_2, Coordinate, Envelope},
    Error, Result,
};

/// An open polyline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    /// The vertices, in order.
    pub coords: Vec<Coordinate>,
}

impl Curve {
    /// Creates a curve through the given vertices.
    pub fn new<C: Into<Coordinate>>(coords: impl IntoIterator<Item = C>) -> Self {
        Curve {
            coords: coords.into_iter().map(Into::into).collect(),
        }
    }

    /// Does this curve have no vertices at all?
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Does this curve end where it starts?
    pub fn is_closed(&self) -> bool {
        !self.coords.is_empty() && self.coords.first() == self.coords.last()
    }

    #[allow(missing_docs)]
    pub fn length(&self) -> f64 {
        self.coords
            .windows(2)
            .map(|w| (w[1].x - w[0].x).hypot(w[1].y - w[0].y))
            .sum()
    }
}

/// A polygon: one exterior ring and any number of holes.
///
/// Rings produced by an overlay are closed (the first coordinate is repeated
/// at the end), shells are clockwise and holes are counter-clockwise. Input
/// rings may be open or closed, and may wind either way.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// The exterior ring.
    pub shell: Vec<Coordinate>,
    /// The interior rings.
    pub holes: Vec<Vec<Coordinate>>,
}

impl Surface {
    /// Creates a surface without holes.
    pub fn new<C: Into<Coordinate>>(shell: impl IntoIterator<Item = C>) -> Self {
        Surface {
            shell: shell.into_iter().map(Into::into).collect(),
            holes: Vec::new(),
        }
    }

    /// Adds a hole.
    pub fn with_hole<C: Into<Coordinate>>(mut self, hole: impl IntoIterator<Item = C>) -> Self {
        self.holes.push(hole.into_iter().map(Into::into).collect());
        self
    }

    /// Does this surface have an empty shell?
    pub fn is_empty(&self) -> bool {
        self.shell.is_empty()
    }

    /// The shell, followed by the holes.
    pub fn rings(&self) -> impl Iterator<Item = &[Coordinate]> {
        std::iter::once(&self.shell[..]).chain(self.holes.iter().map(|h| &h[..]))
    }

    /// The enclosed area, which doesn't depend on the rings' orientations.
    pub fn area(&self) -> f64 {
        let ring_area = |ring: &[Coordinate]| {
            let closing = match (ring.first(), ring.last()) {
                (Some(a), Some(b)) if a != b => b.x * a.y - a.x * b.y,
                _ => 0.0,
            };
            (signed_area_2(ring) + closing).abs() / 2.0
        };
        ring_area(&self.shell[..]) - self.holes.iter().map(|h| ring_area(&h[..])).sum::<f64>()
    }
}

/// A single point, curve or surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Primitive {
    Point(Coordinate),
    Curve(Curve),
    Surface(Surface),
}

/// A borrowed [`Primitive`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum PrimitiveRef<'a> {
    Point(&'a Coordinate),
    Curve(&'a Curve),
    Surface(&'a Surface),
}

impl PrimitiveRef<'_> {
    /// 0 for points, 1 for curves and 2 for surfaces.
    pub fn dimension(&self) -> usize {
        match self {
            PrimitiveRef::Point(_) => 0,
            PrimitiveRef::Curve(_) => 1,
            PrimitiveRef::Surface(_) => 2,
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            PrimitiveRef::Point(_) => false,
            PrimitiveRef::Curve(c) => c.is_empty(),
            PrimitiveRef::Surface(s) => s.is_empty(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            PrimitiveRef::Point(_) => "points",
            PrimitiveRef::Curve(_) => "curves",
            PrimitiveRef::Surface(_) => "surfaces",
        }
    }
}

impl Primitive {
    /// Borrows this primitive.
    pub fn to_ref(&self) -> PrimitiveRef<'_> {
        match self {
            Primitive::Point(p) => PrimitiveRef::Point(p),
            Primitive::Curve(c) => PrimitiveRef::Curve(c),
            Primitive::Surface(s) => PrimitiveRef::Surface(s),
        }
    }
}

/// An overlay operand or result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// A single point.
    Point(Coordinate),
    /// A single curve.
    Curve(Curve),
    /// A single surface.
    Surface(Surface),
    /// Any number of points.
    MultiPoint(Vec<Coordinate>),
    /// Any number of curves.
    MultiCurve(Vec<Curve>),
    /// Any number of surfaces. As operands, they shouldn't overlap.
    MultiSurface(Vec<Surface>),
    /// A mix of primitives of different dimensions. Overlay results use this
    /// when they contain more than one kind of primitive.
    Aggregate(Vec<Primitive>),
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry::empty()
    }
}

impl Geometry {
    /// The empty geometry.
    pub fn empty() -> Geometry {
        Geometry::Aggregate(Vec::new())
    }

    /// All the primitives making up this geometry.
    pub fn primitives(&self) -> Vec<PrimitiveRef<'_>> {
        match self {
            Geometry::Point(p) => vec![PrimitiveRef::Point(p)],
            Geometry::Curve(c) => vec![PrimitiveRef::Curve(c)],
            Geometry::Surface(s) => vec![PrimitiveRef::Surface(s)],
            Geometry::MultiPoint(ps) => ps.iter().map(PrimitiveRef::Point).collect(),
            Geometry::MultiCurve(cs) => cs.iter().map(PrimitiveRef::Curve).collect(),
            Geometry::MultiSurface(ss) => ss.iter().map(PrimitiveRef::Surface).collect(),
            Geometry::Aggregate(prims) => prims.iter().map(Primitive::to_ref).collect(),
        }
    }

    /// Does this geometry have no points at all?
    pub fn is_empty(&self) -> bool {
        self.primitives().iter().all(PrimitiveRef::is_empty)
    }

    /// The largest dimension of the non-empty primitives, or `None` if this is empty.
    pub fn dimension(&self) -> Option<usize> {
        self.primitives()
            .iter()
            .filter(|p| !p.is_empty())
            .map(PrimitiveRef::dimension)
            .max()
    }

    /// The smallest axis-aligned box containing every vertex.
    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::default();
        for prim in self.primitives() {
            match prim {
                PrimitiveRef::Point(p) => env.expand_to_include(p),
                PrimitiveRef::Curve(c) => c.coords.iter().for_each(|p| env.expand_to_include(p)),
                PrimitiveRef::Surface(s) => s.shell.iter().for_each(|p| env.expand_to_include(p)),
            }
        }
        env
    }

    /// The total area of the surfaces.
    pub fn area(&self) -> f64 {
        self.primitives()
            .iter()
            .map(|p| match p {
                PrimitiveRef::Surface(s) => s.area(),
                _ => 0.0,
            })
            .sum()
    }

    /// Checks that this geometry can be an overlay operand: coordinates are
    /// finite and aggregates don't mix dimensions.
    pub(crate) fn validate(&self) -> Result<()> {
        let prims = self.primitives();
        let check = |c: &Coordinate| {
            if c.x.is_nan() || c.y.is_nan() {
                Err(Error::NaN)
            } else if c.x.is_infinite() || c.y.is_infinite() {
                Err(Error::Infinity)
            } else {
                Ok(())
            }
        };
        for prim in &prims {
            match prim {
                PrimitiveRef::Point(p) => check(*p)?,
                PrimitiveRef::Curve(c) => c.coords.iter().try_for_each(check)?,
                PrimitiveRef::Surface(s) => s.rings().flatten().try_for_each(check)?,
            }
        }

        if let Geometry::Aggregate(_) = self {
            let mut kinds: Vec<&'static str> = prims.iter().map(PrimitiveRef::kind).collect();
            kinds.sort_unstable();
            kinds.dedup();
            if kinds.len() > 1 {
                return Err(Error::UnsupportedInput {
                    kinds: kinds.join(" and "),
                });
            }
        }
        Ok(())
    }
}

/// Builds the result geometry from the output of the builders.
///
/// Returns `None` if there's nothing at all, a single primitive or a
/// homogeneous collection if there's only one kind of output, and an
/// aggregate (points, then curves, then surfaces) otherwise.
pub(crate) fn assemble(
    mut points: Vec<Coordinate>,
    mut curves: Vec<Curve>,
    mut surfaces: Vec<Surface>,
) -> Option<Geometry> {
    let kinds = [!points.is_empty(), !curves.is_empty(), !surfaces.is_empty()];
    match kinds {
        [false, false, false] => None,
        [true, false, false] if points.len() == 1 => points.pop().map(Geometry::Point),
        [true, false, false] => Some(Geometry::MultiPoint(points)),
        [false, true, false] if curves.len() == 1 => curves.pop().map(Geometry::Curve),
        [false, true, false] => Some(Geometry::MultiCurve(curves)),
        [false, false, true] if surfaces.len() == 1 => surfaces.pop().map(Geometry::Surface),
        [false, false, true] => Some(Geometry::MultiSurface(surfaces)),
        _ => Some(Geometry::Aggregate(
            points
                .into_iter()
                .map(Primitive::Point)
                .chain(curves.into_iter().map(Primitive::Curve))
                .chain(surfaces.into_iter().map(Primitive::Surface))
                .collect(),
        )),
    }
}

/// An opaque coordinate reference system identifier.
///
/// It's carried from the operands to the result and never interpreted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crs(pub String);

/// A geometry tagged with an optional coordinate reference system.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Referenced {
    pub geometry: Geometry,
    pub crs: Option<Crs>,
}
