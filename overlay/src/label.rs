//! Topological labels.
//!
//! Every edge, directed edge and node in an overlay graph carries a [`Label`]:
//! for each of the two arguments, where the component lies relative to that
//! argument. Edges of surfaces also know what lies on their left and right.

use serde::{Deserialize, Serialize};

/// Where something lies relative to a geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// Strictly inside.
    Interior,
    /// On the boundary. A curve's boundary is its two endpoints, unless it's
    /// closed, and a surface's boundary is its rings.
    Boundary,
    /// Neither inside nor on the boundary.
    Exterior,
}

impl Location {
    fn symbol(loc: Option<Location>) -> char {
        match loc {
            Some(Location::Interior) => 'i',
            Some(Location::Boundary) => 'b',
            Some(Location::Exterior) => 'e',
            None => '-',
        }
    }
}

/// A side of a directed edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    Left,
    Right,
}

impl Position {
    fn index(self) -> usize {
        match self {
            Position::Left => 0,
            Position::Right => 1,
        }
    }
}

/// The location of a graph component relative to one geometry.
///
/// A line location only knows where the component itself is. An area
/// location also records the left and right sides. A location whose entries
/// are all `None` is "null": nothing is known yet.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TopologyLocation {
    on: Option<Location>,
    // [left, right]; `None` for line locations.
    sides: Option<[Option<Location>; 2]>,
}

impl std::fmt::Debug for TopologyLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.sides {
            Some([left, right]) => write!(
                f,
                "{}{}{}",
                Location::symbol(left),
                Location::symbol(self.on),
                Location::symbol(right)
            ),
            None => write!(f, "{}", Location::symbol(self.on)),
        }
    }
}

impl TopologyLocation {
    pub fn line(on: Option<Location>) -> Self {
        TopologyLocation { on, sides: None }
    }

    pub fn area(on: Option<Location>, left: Option<Location>, right: Option<Location>) -> Self {
        TopologyLocation {
            on,
            sides: Some([left, right]),
        }
    }

    pub fn side(&self, pos: Position) -> Option<Location> {
        self.sides.and_then(|s| s[pos.index()])
    }

    /// Sets one side. Setting a side of a line location has no effect.
    pub fn set_side(&mut self, pos: Position, loc: Option<Location>) {
        debug_assert!(self.is_area(), "setting the side of a line location");
        if let Some(sides) = &mut self.sides {
            sides[pos.index()] = loc;
        }
    }

    fn entries(&self) -> impl Iterator<Item = Option<Location>> + '_ {
        std::iter::once(self.on).chain(self.sides.iter().flatten().copied())
    }

    fn entries_mut(&mut self) -> impl Iterator<Item = &mut Option<Location>> + '_ {
        std::iter::once(&mut self.on).chain(self.sides.iter_mut().flatten())
    }

    pub fn is_null(&self) -> bool {
        self.entries().all(|l| l.is_none())
    }

    pub fn is_any_null(&self) -> bool {
        self.entries().any(|l| l.is_none())
    }

    pub fn is_area(&self) -> bool {
        self.sides.is_some()
    }

    pub fn is_line(&self) -> bool {
        self.sides.is_none()
    }

    pub fn all_positions_equal(&self, loc: Location) -> bool {
        self.entries().all(|l| l == Some(loc))
    }

    /// Swaps the left and right sides.
    pub fn flipped(self) -> Self {
        TopologyLocation {
            on: self.on,
            sides: self.sides.map(|[l, r]| [r, l]),
        }
    }

    pub fn set_all_if_null(&mut self, loc: Option<Location>) {
        for entry in self.entries_mut() {
            if entry.is_none() {
                *entry = loc;
            }
        }
    }

    /// Fills in our unknown positions from `other`.
    ///
    /// Merging an area location into a line location turns it into an area
    /// location first.
    pub fn merge(&mut self, other: &TopologyLocation) {
        if other.is_area() && self.is_line() {
            self.sides = Some([None, None]);
        }
        if self.on.is_none() {
            self.on = other.on;
        }
        if let (Some(ours), Some(theirs)) = (&mut self.sides, other.sides) {
            for (o, t) in ours.iter_mut().zip(theirs) {
                if o.is_none() {
                    *o = t;
                }
            }
        }
    }

    pub fn to_line(&mut self) {
        self.sides = None;
    }
}

/// The locations of a graph component relative to both overlay arguments.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Label {
    elt: [TopologyLocation; 2],
}

impl std::fmt::Debug for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "A:{:?} B:{:?}", self.elt[0], self.elt[1])
    }
}

impl Label {
    /// A line label: `geom`'s location is `on`, the other argument is unknown.
    pub fn line(geom: usize, on: Location) -> Self {
        let mut ret = Label::default();
        ret.elt[geom].on = Some(on);
        ret
    }

    /// An area label for an edge of `geom`. The other argument gets an
    /// unknown area location.
    pub fn area(geom: usize, on: Location, left: Location, right: Location) -> Self {
        let mut elt = [TopologyLocation::area(None, None, None); 2];
        elt[geom] = TopologyLocation::area(Some(on), Some(left), Some(right));
        Label { elt }
    }

    /// The location of the component itself relative to `geom`.
    pub fn location(&self, geom: usize) -> Option<Location> {
        self.elt[geom].on
    }

    pub fn side(&self, geom: usize, pos: Position) -> Option<Location> {
        self.elt[geom].side(pos)
    }

    pub fn set_location(&mut self, geom: usize, loc: Location) {
        self.elt[geom].on = Some(loc);
    }

    pub fn set_side(&mut self, geom: usize, pos: Position, loc: Location) {
        self.elt[geom].set_side(pos, Some(loc));
    }

    pub fn set_all_if_null(&mut self, geom: usize, loc: Option<Location>) {
        self.elt[geom].set_all_if_null(loc);
    }

    pub fn is_null(&self, geom: usize) -> bool {
        self.elt[geom].is_null()
    }

    pub fn is_any_null(&self, geom: usize) -> bool {
        self.elt[geom].is_any_null()
    }

    /// Is this an area label for at least one argument?
    pub fn is_area(&self) -> bool {
        self.elt[0].is_area() || self.elt[1].is_area()
    }

    pub fn is_area_of(&self, geom: usize) -> bool {
        self.elt[geom].is_area()
    }

    pub fn is_line(&self, geom: usize) -> bool {
        self.elt[geom].is_line()
    }

    pub fn all_positions_equal(&self, geom: usize, loc: Location) -> bool {
        self.elt[geom].all_positions_equal(loc)
    }

    /// The number of arguments we know anything about.
    pub fn geometry_count(&self) -> usize {
        self.elt.iter().filter(|e| !e.is_null()).count()
    }

    /// The same label seen from the opposite direction: left and right are swapped.
    ///
    /// This returns a new label rather than flipping in place, so that a label
    /// shared by reference can never be flipped twice.
    pub fn flipped(&self) -> Label {
        Label {
            elt: [self.elt[0].flipped(), self.elt[1].flipped()],
        }
    }

    /// Turns the location for `geom` into a line location.
    pub fn to_line(&mut self, geom: usize) {
        self.elt[geom].to_line();
    }

    /// A label with only the `on` locations of this one, as line locations.
    pub fn to_line_label(&self) -> Label {
        Label {
            elt: [
                TopologyLocation::line(self.elt[0].on),
                TopologyLocation::line(self.elt[1].on),
            ],
        }
    }

    /// Fills in our unknown locations from `other`.
    pub fn merge(&mut self, other: &Label) {
        for (ours, theirs) in self.elt.iter_mut().zip(&other.elt) {
            ours.merge(theirs);
        }
    }
}

const NULL_DEPTH: i32 = -1;

/// Depth counters for an edge that may be the merge of several coincident
/// edges.
///
/// For each argument and side, this counts how many of the merged edges have
/// that argument's interior on that side. After normalization, a side has
/// depth 1 if it's interior and 0 if it's exterior; equal depths on both
/// sides mean the edges cancelled out and the area collapsed to a line.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Depth {
    // Indexed by argument and then by `Position::index`.
    depth: [[i32; 2]; 2],
}

impl Default for Depth {
    fn default() -> Self {
        Depth {
            depth: [[NULL_DEPTH; 2]; 2],
        }
    }
}

impl std::fmt::Debug for Depth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "A: {},{} B: {},{}",
            self.depth[0][0], self.depth[0][1], self.depth[1][0], self.depth[1][1]
        )
    }
}

impl Depth {
    fn depth_at(loc: Location) -> i32 {
        match loc {
            Location::Exterior => 0,
            Location::Interior => 1,
            Location::Boundary => NULL_DEPTH,
        }
    }

    #[cfg(test)]
    pub fn get(&self, geom: usize, pos: Position) -> i32 {
        self.depth[geom][pos.index()]
    }

    pub fn is_null(&self) -> bool {
        self.depth.iter().flatten().all(|&d| d == NULL_DEPTH)
    }

    pub fn is_null_for(&self, geom: usize) -> bool {
        self.depth[geom][Position::Left.index()] == NULL_DEPTH
    }

    pub fn is_null_at(&self, geom: usize, pos: Position) -> bool {
        self.depth[geom][pos.index()] == NULL_DEPTH
    }

    /// Accumulates the side locations of `label`.
    pub fn add(&mut self, label: &Label) {
        for geom in 0..2 {
            for pos in [Position::Left, Position::Right] {
                if let Some(loc @ (Location::Exterior | Location::Interior)) = label.side(geom, pos)
                {
                    let d = &mut self.depth[geom][pos.index()];
                    if *d == NULL_DEPTH {
                        *d = Depth::depth_at(loc);
                    } else {
                        *d += Depth::depth_at(loc);
                    }
                }
            }
        }
    }

    /// The change in depth from the left side to the right side.
    pub fn delta(&self, geom: usize) -> i32 {
        self.depth[geom][Position::Right.index()] - self.depth[geom][Position::Left.index()]
    }

    /// Normalizes depths so that the shallower side is at depth 0 and the
    /// deeper side (if any) at depth 1.
    pub fn normalize(&mut self) {
        for geom in 0..2 {
            if self.is_null_for(geom) {
                continue;
            }
            let sides = &mut self.depth[geom];
            let min = sides.iter().copied().min().unwrap_or(0).max(0);
            for d in sides {
                *d = i32::from(*d > min);
            }
        }
    }

    /// Even depth is exterior, odd depth is interior.
    pub fn location(&self, geom: usize, pos: Position) -> Location {
        if self.depth[geom][pos.index()] <= 0 {
            Location::Exterior
        } else {
            Location::Interior
        }
    }
}
