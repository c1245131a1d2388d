use smallvec::SmallVec;
use std::convert::From;
use std::fmt;

/// Position of a cell on the grid lattice. Row 0 is the northern edge, column 0 the western edge.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub row: u32,
    pub column: u32,
}

impl GridCoordinate {
    pub fn new(row: u32, column: u32) -> GridCoordinate {
        GridCoordinate { row, column }
    }
}

impl From<(u32, u32)> for GridCoordinate {
    fn from(row_column_pair: (u32, u32)) -> GridCoordinate {
        GridCoordinate::new(row_column_pair.0, row_column_pair.1)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "row: {}, column: {}", self.row, self.column)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::South,
                                          CompassPrimary::East,
                                          CompassPrimary::West];

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    #[inline]
    fn slot(self) -> usize {
        match self {
            CompassPrimary::North => 0,
            CompassPrimary::South => 1,
            CompassPrimary::East => 2,
            CompassPrimary::West => 3,
        }
    }
}

/// Creates a new `GridCoordinate` offset 1 cell away in the given direction.
/// Returns None if the coordinate is not representable (north of row 0 or west of column 0).
/// The result may still lie outside of any particular grid.
pub fn offset_coordinate(coord: GridCoordinate, dir: CompassPrimary) -> Option<GridCoordinate> {
    let (row, column) = (coord.row, coord.column);
    match dir {
        CompassPrimary::North => row.checked_sub(1).map(|r| GridCoordinate::new(r, column)),
        CompassPrimary::South => row.checked_add(1).map(|r| GridCoordinate::new(r, column)),
        CompassPrimary::East => column.checked_add(1).map(|c| GridCoordinate::new(row, c)),
        CompassPrimary::West => column.checked_sub(1).map(|c| GridCoordinate::new(row, c)),
    }
}

/// Stable handle of a cell within the arena of the `Grid` that created it.
///
/// Only meaningful for the grid it came from.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct CellIndex(usize);

impl CellIndex {
    #[inline]
    pub(crate) fn new(index: usize) -> CellIndex {
        CellIndex(index)
    }

    /// Position of the cell in the grid's row-major list of present cells.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

pub type CellSmallVec = SmallVec<[CellIndex; 4]>;

/// A grid cell: its coordinate, the adjacent cells in each direction and the cells it has
/// a passage (link) to.
///
/// Neighbours are wired once when the grid is built. Links are only changed through
/// `Grid::link` and `Grid::unlink` so that they stay symmetric.
#[derive(Debug, Clone)]
pub struct Cell {
    coordinate: GridCoordinate,
    neighbours: [Option<CellIndex>; 4],
    links: CellSmallVec,
}

impl Cell {
    pub(crate) fn new(coordinate: GridCoordinate) -> Cell {
        Cell {
            coordinate,
            neighbours: [None; 4],
            links: CellSmallVec::new(),
        }
    }

    #[inline]
    pub fn coordinate(&self) -> GridCoordinate {
        self.coordinate
    }

    #[inline]
    pub fn row(&self) -> u32 {
        self.coordinate.row
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.coordinate.column
    }

    #[inline]
    pub fn neighbour(&self, dir: CompassPrimary) -> Option<CellIndex> {
        self.neighbours[dir.slot()]
    }

    /// The adjacent cells, linked or not, in north, south, east, west order.
    pub fn neighbours(&self) -> CellSmallVec {
        self.neighbours.iter().filter_map(|n| *n).collect()
    }

    pub fn is_neighbour(&self, other: CellIndex) -> bool {
        self.neighbours.iter().any(|n| *n == Some(other))
    }

    /// Which direction `other` lies in, if it is adjacent.
    pub fn direction_to(&self, other: CellIndex) -> Option<CompassPrimary> {
        CompassPrimary::ALL.iter().cloned().find(|dir| self.neighbour(*dir) == Some(other))
    }

    /// Linked cells in the order the links were made.
    #[inline]
    pub fn links(&self) -> &[CellIndex] {
        &self.links
    }

    #[inline]
    pub fn is_linked(&self, other: CellIndex) -> bool {
        self.links.contains(&other)
    }

    pub(crate) fn set_neighbour(&mut self, dir: CompassPrimary, neighbour: Option<CellIndex>) {
        self.neighbours[dir.slot()] = neighbour;
    }

    /// Returns false if the link already existed.
    pub(crate) fn add_link(&mut self, other: CellIndex) -> bool {
        if self.is_linked(other) {
            false
        } else {
            self.links.push(other);
            true
        }
    }

    /// Returns false if there was no such link. Keeps the insertion order of the other links.
    pub(crate) fn remove_link(&mut self, other: CellIndex) -> bool {
        if let Some(position) = self.links.iter().position(|&c| c == other) {
            self.links.remove(position);
            true
        } else {
            false
        }
    }
}
