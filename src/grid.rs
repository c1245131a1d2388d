use std::fmt;
use std::ops::Index;
use std::rc::Rc;

use petgraph::graph::{NodeIndex, UnGraph};
use rand::Rng;

use crate::cells::{offset_coordinate, Cell, CellIndex, CellSmallVec, CompassPrimary, GridCoordinate};
use crate::errors::*;
use crate::grid_displays::GridDisplay;
use crate::masks::Mask;
use crate::units::{ColumnsCount, EdgesCount, NodesCount, RowsCount};


/// A rows * columns lattice of cells, some positions of which may be masked out.
///
/// The grid owns every cell in an arena of present cells, stored in row-major order, and
/// hands out `CellIndex` handles to them. The neighbour structure is fixed at construction;
/// only the links between cells change afterwards.
///
/// A grid is not thread safe (it is neither `Send` nor `Sync`); concurrent calls on the
/// same grid need external synchronisation.
pub struct Grid {
    rows: RowsCount,
    columns: ColumnsCount,
    cells: Vec<Cell>,
    slots: Vec<Option<CellIndex>>,
    row_offsets: Rc<Vec<usize>>,
    grid_display: Option<Rc<dyn GridDisplay>>,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: rows: {:?}, columns: {:?}, cells: {:?}, links: {:?}",
               self.rows, self.columns, self.size(), self.links_count())
    }
}

impl Grid {
    /// A grid with a cell at every position.
    ///
    /// Rows and columns are expected to fit in a `u32`, `grids::build` checks that for sizes from outside.
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> Grid {
        Grid::prepare_grid(rows, columns, |_| true)
    }

    /// A grid with cells only at the positions that are turned on in the mask.
    pub fn from_mask(mask: &Mask) -> Grid {
        Grid::prepare_grid(mask.rows(), mask.columns(), |coord| mask.is_on(coord))
    }

    fn prepare_grid<F>(rows: RowsCount, columns: ColumnsCount, is_present: F) -> Grid
        where F: Fn(GridCoordinate) -> bool
    {
        let (RowsCount(rows_count), ColumnsCount(columns_count)) = (rows, columns);
        let slots_count = rows_count * columns_count;

        let mut cells = Vec::with_capacity(slots_count);
        let mut slots = Vec::with_capacity(slots_count);
        let mut row_offsets = Vec::with_capacity(rows_count + 1);

        for row in 0..rows_count {
            row_offsets.push(cells.len());
            for column in 0..columns_count {
                let coord = GridCoordinate::new(row as u32, column as u32);
                if is_present(coord) {
                    slots.push(Some(CellIndex::new(cells.len())));
                    cells.push(Cell::new(coord));
                } else {
                    slots.push(None);
                }
            }
        }
        row_offsets.push(cells.len());

        let mut grid = Grid {
            rows,
            columns,
            cells,
            slots,
            row_offsets: Rc::new(row_offsets),
            grid_display: None,
        };
        grid.configure_cells();
        grid
    }

    // Wire up the north/south/east/west neighbours of every present cell.
    fn configure_cells(&mut self) {
        for index in 0..self.cells.len() {
            let coord = self.cells[index].coordinate();
            for dir in CompassPrimary::ALL.iter().cloned() {
                let neighbour = offset_coordinate(coord, dir).and_then(|c| self.cell_at(c));
                self.cells[index].set_neighbour(dir, neighbour);
            }
        }
    }

    #[inline]
    pub fn set_grid_display(&mut self, grid_display: Option<Rc<dyn GridDisplay>>) {
        self.grid_display = grid_display;
    }

    #[inline]
    pub fn grid_display(&self) -> &Option<Rc<dyn GridDisplay>> {
        &self.grid_display
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    /// Number of present (not masked out) cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of undirected links (passages) in the grid.
    pub fn links_count(&self) -> usize {
        self.cells.iter().map(|cell| cell.links().len()).sum::<usize>() / 2
    }

    /// The cell at a grid coordinate.
    /// Returns None if the coordinate is outside of the grid or masked out.
    pub fn cell_at(&self, coord: GridCoordinate) -> Option<CellIndex> {
        let (row, column) = (coord.row as usize, coord.column as usize);
        let (RowsCount(rows_count), ColumnsCount(columns_count)) = (self.rows, self.columns);
        if row < rows_count && column < columns_count {
            self.slots[row * columns_count + column]
        } else {
            None
        }
    }

    /// The cell one step away from a coordinate, if there is one.
    pub fn cell_at_offset(&self, coord: GridCoordinate, dir: CompassPrimary) -> Option<CellIndex> {
        offset_coordinate(coord, dir).and_then(|c| self.cell_at(c))
    }

    #[inline]
    pub fn cell(&self, index: CellIndex) -> Option<&Cell> {
        self.cells.get(index.index())
    }

    #[inline]
    pub fn contains(&self, index: CellIndex) -> bool {
        index.index() < self.cells.len()
    }

    /// Coordinate of a cell.
    ///
    /// Panics if the cell index is not from this grid.
    #[inline]
    pub fn coordinate(&self, index: CellIndex) -> GridCoordinate {
        self[index].coordinate()
    }

    /// A uniformly random cell, chosen among the present cells only.
    pub fn random_cell<R>(&self, rng: &mut R) -> Result<CellIndex>
        where R: Rng + ?Sized
    {
        if self.cells.is_empty() {
            bail!(ErrorKind::InvalidState("the grid has no cells to choose from".to_owned()));
        }
        Ok(CellIndex::new(rng.gen_range(0..self.cells.len())))
    }

    /// Link two adjacent cells with a passage, in both directions.
    ///
    /// Linking already linked cells does nothing. Linking cells that are not neighbours is an
    /// `InvalidOperation` error.
    pub fn link(&mut self, a: CellIndex, b: CellIndex) -> Result<()> {
        let adjacent = self.cell(a).map_or(false, |cell| cell.is_neighbour(b));
        if !adjacent {
            bail!(ErrorKind::InvalidOperation(format!("cannot link {} to {}: the cells are not adjacent",
                                                      self.describe(a),
                                                      self.describe(b))));
        }

        self.cells[a.index()].add_link(b);
        self.cells[b.index()].add_link(a);
        Ok(())
    }

    /// Unlink two cells, if the cells are valid and a link exists between them.
    /// Returns true if an unlink occurred.
    pub fn unlink(&mut self, a: CellIndex, b: CellIndex) -> bool {
        if self.is_linked(a, b) {
            self.cells[a.index()].remove_link(b);
            self.cells[b.index()].remove_link(a);
            true
        } else {
            false
        }
    }

    /// Cells that are linked to a particular cell by a passage, in the order the links were made.
    pub fn links(&self, index: CellIndex) -> &[CellIndex] {
        match self.cell(index) {
            Some(cell) => cell.links(),
            None => &[],
        }
    }

    /// Cells that are to the North, South, East or West of a particular cell, but not
    /// necessarily linked by a passage.
    pub fn neighbours(&self, index: CellIndex) -> CellSmallVec {
        self.cell(index).map(Cell::neighbours).unwrap_or_default()
    }

    pub fn neighbour(&self, index: CellIndex, direction: CompassPrimary) -> Option<CellIndex> {
        self.cell(index).and_then(|cell| cell.neighbour(direction))
    }

    /// Are two cells in the grid linked?
    pub fn is_linked(&self, a: CellIndex, b: CellIndex) -> bool {
        self.cell(a).map_or(false, |cell| cell.is_linked(b))
    }

    /// Is the cell linked to its neighbour in the given direction?
    /// False if there is no neighbour that way.
    pub fn is_neighbour_linked(&self, index: CellIndex, direction: CompassPrimary) -> bool {
        self.neighbour(index, direction)
            .map_or(false, |neighbour| self.is_linked(index, neighbour))
    }

    /// Cells with exactly one link.
    pub fn deadends(&self) -> Vec<CellIndex> {
        self.iter()
            .filter(|index| self[*index].links().len() == 1)
            .collect()
    }

    /// All present cells, top row to bottom row, west to east within a row.
    ///
    /// The iterator does not borrow the grid, so the grid can be linked while iterating.
    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter {
            current_cell_number: 0,
            cells_count: self.cells.len(),
        }
    }

    /// The present cells of each row, top row first.
    #[inline]
    pub fn iter_row(&self) -> RowIter {
        RowIter {
            row_offsets: self.row_offsets.clone(),
            current_row: 0,
        }
    }

    /// Every undirected link exactly once, as (lower index, higher index) pairs.
    pub fn iter_links<'a>(&'a self) -> impl Iterator<Item = (CellIndex, CellIndex)> + 'a {
        self.cells.iter().enumerate().flat_map(|(i, cell)| {
            let a = CellIndex::new(i);
            cell.links()
                .iter()
                .filter(move |b| a < **b)
                .map(move |b| (a, *b))
        })
    }

    /// The link structure as a petgraph graph, one node per present cell with the node index
    /// equal to the cell index, and one edge per link.
    pub fn links_graph(&self) -> UnGraph<GridCoordinate, ()> {
        let (NodesCount(nodes), EdgesCount(edges)) = self.graph_size();
        let mut graph = UnGraph::with_capacity(nodes, edges);
        for cell in &self.cells {
            let _ = graph.add_node(cell.coordinate());
        }
        for (a, b) in self.iter_links() {
            let _ = graph.add_edge(NodeIndex::new(a.index()), NodeIndex::new(b.index()), ());
        }
        graph
    }

    fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let cells_count = self.size();
        (NodesCount(cells_count), EdgesCount(cells_count.saturating_sub(1)))
    }

    fn describe(&self, index: CellIndex) -> String {
        match self.cell(index) {
            Some(cell) => format!("({})", cell.coordinate()),
            None => format!("{:?} (not in grid)", index),
        }
    }
}

impl Index<CellIndex> for Grid {
    type Output = Cell;

    fn index(&self, index: CellIndex) -> &Cell {
        &self.cells[index.index()]
    }
}

#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    cells_count: usize,
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = CellIndex;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let index = CellIndex::new(self.current_cell_number);
            self.current_cell_number += 1;
            Some(index)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

#[derive(Debug, Clone)]
pub struct RowIter {
    row_offsets: Rc<Vec<usize>>,
    current_row: usize,
}

impl ExactSizeIterator for RowIter {} // default impl using size_hint()
impl Iterator for RowIter {
    type Item = Vec<CellIndex>;

    fn next(&mut self) -> Option<Self::Item> {
        // row_offsets has one entry more than there are rows
        if self.current_row + 1 < self.row_offsets.len() {
            let (start, end) = (self.row_offsets[self.current_row],
                                self.row_offsets[self.current_row + 1]);
            self.current_row += 1;
            Some((start..end).map(CellIndex::new).collect())
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.row_offsets.len().saturating_sub(self.current_row + 1);
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
