use std::fmt;

use crate::cells::{CellIndex, CellSmallVec};
use crate::grid::Grid;
use crate::pathing::{Distances, MaxDistance};
use crate::units::{ColumnsCount, RowsCount};
use crate::utils;
use fnv::FnvHashSet;

const DEFAULT_CELL_BODY: &str = "   ";

/// What to draw inside a cell when a grid is rendered as text. Bodies are 3 characters wide.
pub trait GridDisplay {
    fn render_cell_body(&self, _: CellIndex) -> String {
        String::from(DEFAULT_CELL_BODY)
    }
}

impl<MaxDistanceT> GridDisplay for Distances<MaxDistanceT>
    where MaxDistanceT: MaxDistance
{
    fn render_cell_body(&self, cell: CellIndex) -> String {
        // Nothing holds these distances to the grid they were made from, so cells the
        // distances know nothing about are left blank.
        if let Some(d) = self.distance(cell) {
            // centre align, padding 3, lowercase hexadecimal
            format!("{:^3x}", d)
        } else {
            String::from(DEFAULT_CELL_BODY)
        }
    }
}


#[derive(Debug)]
pub struct PathDisplay {
    on_path_cells: FnvHashSet<CellIndex>,
}
impl PathDisplay {
    pub fn new(path: &[CellIndex]) -> Self {
        let mut on_path_cells = utils::fnv_hashset(path.len());
        on_path_cells.extend(path.iter().cloned());
        PathDisplay { on_path_cells }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, cell: CellIndex) -> String {
        if self.on_path_cells.contains(&cell) {
            String::from(" . ")
        } else {
            String::from(DEFAULT_CELL_BODY)
        }
    }
}


#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start_cells: CellSmallVec,
    end_cells: CellSmallVec,
}
impl StartEndPointsDisplay {
    pub fn new(starts: CellSmallVec, ends: CellSmallVec) -> StartEndPointsDisplay {
        StartEndPointsDisplay {
            start_cells: starts,
            end_cells: ends,
        }
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, cell: CellIndex) -> String {
        if self.start_cells.contains(&cell) {
            String::from(" S ")
        } else if self.end_cells.contains(&cell) {
            String::from(" E ")
        } else {
            String::from(DEFAULT_CELL_BODY)
        }
    }
}


const WALL_L: &str = "╴";
const WALL_R: &str = "╶";
const WALL_U: &str = "╵";
const WALL_D: &str = "╷";
const WALL_LR_3: &str = "───";
const WALL_LR: &str = "─";
const WALL_UD: &str = "│";
const WALL_LD: &str = "┐";
const WALL_RU: &str = "└";
const WALL_LU: &str = "┘";
const WALL_RD: &str = "┌";
const WALL_LRU: &str = "┴";
const WALL_LRD: &str = "┬";
const WALL_LRUD: &str = "┼";
const WALL_RUD: &str = "├";
const WALL_LUD: &str = "┤";

// Lattice positions are signed so that the positions just outside of the grid can be named.
// Those, and masked out positions, have no cell.
fn cell_at_position(grid: &Grid, row: i64, column: i64) -> Option<CellIndex> {
    if row < 0 || column < 0 {
        None
    } else {
        grid.cell_at((row as u32, column as u32).into())
    }
}

// A wall separates two positions unless both are cells linked by a passage, or neither is a cell.
fn is_wall_between(grid: &Grid, a: Option<CellIndex>, b: Option<CellIndex>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => !grid.is_linked(a, b),
        (None, None) => false,
        _ => true,
    }
}

// The wall west of the position (row, column).
fn is_vertical_wall(grid: &Grid, row: i64, column: i64) -> bool {
    is_wall_between(grid,
                    cell_at_position(grid, row, column - 1),
                    cell_at_position(grid, row, column))
}

// The wall north of the position (row, column).
fn is_horizontal_wall(grid: &Grid, row: i64, column: i64) -> bool {
    is_wall_between(grid,
                    cell_at_position(grid, row - 1, column),
                    cell_at_position(grid, row, column))
}

// The glyph where the corners of four positions meet, the north west corner of (row, column).
fn corner_glyph(grid: &Grid, row: i64, column: i64) -> &'static str {
    let show_up_section = is_vertical_wall(grid, row - 1, column);
    let show_down_section = is_vertical_wall(grid, row, column);
    let show_left_section = is_horizontal_wall(grid, row, column - 1);
    let show_right_section = is_horizontal_wall(grid, row, column);

    match (show_left_section, show_right_section, show_up_section, show_down_section) {
        (true, true, true, true) => WALL_LRUD,
        (true, true, true, false) => WALL_LRU,
        (true, true, false, true) => WALL_LRD,
        (true, false, true, true) => WALL_LUD,
        (false, true, true, true) => WALL_RUD,
        (true, true, false, false) => WALL_LR,
        (false, false, true, true) => WALL_UD,
        (false, true, true, false) => WALL_RU,
        (true, false, false, true) => WALL_LD,
        (true, false, true, false) => WALL_LU,
        (false, true, false, true) => WALL_RD,
        (true, false, false, false) => WALL_L,
        (false, true, false, false) => WALL_R,
        (false, false, true, false) => WALL_U,
        (false, false, false, true) => WALL_D,
        (false, false, false, false) => " ",
    }
}

/// Box drawing text rendering of the maze, one text line for every row of cells and one for
/// every row of walls.
///
/// Cell bodies come from the grid's `GridDisplay` if it has one. Masked out positions are left
/// blank, with walls drawn around the cells next to them.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let RowsCount(rows_count) = self.rows();
        let ColumnsCount(columns_count) = self.columns();
        let (rows_count, columns_count) = (rows_count as i64, columns_count as i64);

        let mut output = String::new();
        let mut push_line = |line: &str| {
            output.push_str(line.trim_end());
            output.push('\n');
        };

        for row in 0..(rows_count + 1) {

            // The walls and corners along the north side of the row
            let mut walls_render = String::new();
            for column in 0..(columns_count + 1) {
                walls_render.push_str(corner_glyph(self, row, column));
                if column < columns_count {
                    let wall = if is_horizontal_wall(self, row, column) { WALL_LR_3 } else { "   " };
                    walls_render.push_str(wall);
                }
            }
            push_line(&walls_render);

            if row == rows_count {
                break;
            }

            // The cell bodies of the row with the walls to the west of them
            let mut cells_render = String::new();
            for column in 0..(columns_count + 1) {
                let wall = if is_vertical_wall(self, row, column) { WALL_UD } else { " " };
                cells_render.push_str(wall);
                if column < columns_count {
                    let body = match (cell_at_position(self, row, column), self.grid_display()) {
                        (Some(cell), Some(displayer)) => displayer.render_cell_body(cell),
                        _ => String::from(DEFAULT_CELL_BODY),
                    };
                    cells_render.push_str(&body);
                }
            }
            push_line(&cells_render);
        }

        write!(f, "{}", output)
    }
}


#[cfg(test)]
mod tests {

    use std::rc::Rc;

    use smallvec::smallvec;

    use super::*;
    use crate::cells::GridCoordinate;
    use crate::grids::{masked_grid, rect_grid};
    use crate::masks::Mask;
    use crate::pathing::distances_from;

    fn corridor(columns: usize) -> Grid {
        let mut g = rect_grid(RowsCount(1), ColumnsCount(columns));
        for column in 1..columns {
            g.link(CellIndex::new(column - 1), CellIndex::new(column)).expect("Link Failed");
        }
        g
    }

    #[test]
    fn single_cell() {
        let g = rect_grid(RowsCount(1), ColumnsCount(1));
        assert_eq!(g.to_string(), "┌───┐\n│   │\n└───┘\n");
    }

    #[test]
    fn linked_pair() {
        let g = corridor(2);
        assert_eq!(g.to_string(), "┌───────┐\n│       │\n└───────┘\n");
    }

    #[test]
    fn unlinked_grid_has_every_wall() {
        let g = rect_grid(RowsCount(2), ColumnsCount(2));
        let expected = ["┌───┬───┐",
                        "│   │   │",
                        "├───┼───┤",
                        "│   │   │",
                        "└───┴───┘",
                        ""];
        assert_eq!(g.to_string(), expected.join("\n"));
    }

    #[test]
    fn partly_linked_grid() {
        let mut g = rect_grid(RowsCount(2), ColumnsCount(2));
        let gc = |r: usize, c: usize| CellIndex::new(r * 2 + c);
        g.link(gc(0, 0), gc(0, 1)).unwrap();
        g.link(gc(0, 0), gc(1, 0)).unwrap();
        g.link(gc(0, 1), gc(1, 1)).unwrap();
        let expected = ["┌───────┐",
                        "│       │",
                        "│   ╷   │",
                        "│   │   │",
                        "└───┴───┘",
                        ""];
        assert_eq!(g.to_string(), expected.join("\n"));
    }

    #[test]
    fn masked_positions_are_blank() {
        let mut mask = Mask::new(RowsCount(2), ColumnsCount(2));
        mask.set(GridCoordinate::new(0, 1), false);
        let g = masked_grid(&mask);
        let expected = ["┌───┐",
                        "│   │",
                        "├───┼───┐",
                        "│   │   │",
                        "└───┴───┘",
                        ""];
        assert_eq!(g.to_string(), expected.join("\n"));
    }

    #[test]
    fn distances_display() {
        let mut g = corridor(3);
        let distances = distances_from(&g, CellIndex::new(0)).unwrap();
        g.set_grid_display(Some(Rc::new(distances)));
        assert_eq!(g.to_string(), "┌───────────┐\n│ 0   1   2 │\n└───────────┘\n");
    }

    #[test]
    fn path_display() {
        let mut g = corridor(3);
        g.set_grid_display(Some(Rc::new(PathDisplay::new(&[CellIndex::new(1), CellIndex::new(2)]))));
        assert_eq!(g.to_string(), "┌───────────┐\n│     .   . │\n└───────────┘\n");
    }

    #[test]
    fn start_end_points_display() {
        let mut g = corridor(3);
        let display = StartEndPointsDisplay::new(smallvec![CellIndex::new(0)], smallvec![CellIndex::new(2)]);
        assert_eq!(display.render_cell_body(CellIndex::new(1)), "   ");
        g.set_grid_display(Some(Rc::new(display)));
        assert_eq!(g.to_string(), "┌───────────┐\n│ S       E │\n└───────────┘\n");
    }

    #[test]
    fn path_display_ignores_repeated_cells() {
        let display = PathDisplay::new(&[CellIndex::new(1), CellIndex::new(1), CellIndex::new(0)]);
        assert_eq!(display.on_path_cells.len(), 2);
        assert_eq!(display.render_cell_body(CellIndex::new(0)), " . ");
        assert_eq!(display.render_cell_body(CellIndex::new(2)), "   ");
    }
}
