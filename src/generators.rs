use std::fmt;
use std::str::FromStr;

use bit_set::BitSet;
use log::{debug, trace};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::cells::{CellIndex, CellSmallVec, CompassPrimary};
use crate::errors::*;
use crate::grid::Grid;

/// The maze generation algorithms, by name.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum MazeAlgorithm {
    BinaryTree,
    Sidewinder,
    AldousBroder,
    Wilsons,
    HuntAndKill,
    RecursiveBacktracker,
}

impl MazeAlgorithm {
    pub const ALL: [MazeAlgorithm; 6] = [MazeAlgorithm::BinaryTree,
                                         MazeAlgorithm::Sidewinder,
                                         MazeAlgorithm::AldousBroder,
                                         MazeAlgorithm::Wilsons,
                                         MazeAlgorithm::HuntAndKill,
                                         MazeAlgorithm::RecursiveBacktracker];

    pub fn name(self) -> &'static str {
        match self {
            MazeAlgorithm::BinaryTree => "binary-tree",
            MazeAlgorithm::Sidewinder => "sidewinder",
            MazeAlgorithm::AldousBroder => "aldous-broder",
            MazeAlgorithm::Wilsons => "wilsons",
            MazeAlgorithm::HuntAndKill => "hunt-and-kill",
            MazeAlgorithm::RecursiveBacktracker => "recursive-backtracker",
        }
    }

    /// Carve a maze into a grid that has no links yet.
    pub fn on<R>(self, grid: &mut Grid, rng: &mut R) -> Result<()>
        where R: Rng + ?Sized
    {
        debug!("Generating {} maze on {:?}", self, grid);
        match self {
            MazeAlgorithm::BinaryTree => binary_tree(grid, rng),
            MazeAlgorithm::Sidewinder => sidewinder(grid, rng),
            MazeAlgorithm::AldousBroder => aldous_broder(grid, rng),
            MazeAlgorithm::Wilsons => wilsons(grid, rng),
            MazeAlgorithm::HuntAndKill => hunt_and_kill(grid, rng),
            MazeAlgorithm::RecursiveBacktracker => recursive_backtracker(grid, rng, None),
        }?;
        debug!("Generated {} maze with {} links and {} deadends",
               self,
               grid.links_count(),
               grid.deadends().len());
        Ok(())
    }
}

impl fmt::Display for MazeAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MazeAlgorithm {
    type Err = Error;

    /// Case insensitive, ignoring any '-', '_' or ' ' separators, so "Hunt and kill" and
    /// "hunt_and_kill" both work. A few short forms are accepted too.
    fn from_str(name: &str) -> Result<MazeAlgorithm> {
        let squashed = name.chars()
            .filter(|c| !matches!(*c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();

        match squashed.as_str() {
            "binarytree" | "binary" => Ok(MazeAlgorithm::BinaryTree),
            "sidewinder" => Ok(MazeAlgorithm::Sidewinder),
            "aldousbroder" => Ok(MazeAlgorithm::AldousBroder),
            "wilsons" | "wilson" => Ok(MazeAlgorithm::Wilsons),
            "huntandkill" | "huntkill" => Ok(MazeAlgorithm::HuntAndKill),
            "recursivebacktracker" | "backtracker" => Ok(MazeAlgorithm::RecursiveBacktracker),
            _ => bail!(ErrorKind::UnknownAlgorithm(name.to_owned())),
        }
    }
}

/// Run the algorithm called `algorithm_name` on the grid.
///
/// Fails with `UnknownAlgorithm` if the name is not one of `MazeAlgorithm::ALL`.
pub fn apply<R>(algorithm_name: &str, grid: &mut Grid, rng: &mut R) -> Result<()>
    where R: Rng + ?Sized
{
    let algorithm = algorithm_name.parse::<MazeAlgorithm>()?;
    algorithm.on(grid, rng)
}

/// Apply the binary tree maze generation algorithm to a grid
/// It works simply by visiting each cell in the grid and choosing to carve a passage
/// north or east.
/// The two perpendicular directions are constant for the entire maze generation process,
/// otherwise we'd have a good way for generating many areas with no way in or out. We would not be
/// generating a perfect maze.
/// The mazes have a strong diagonal bias and an unbroken corridor along the northern and eastern walls.
pub fn binary_tree<R>(grid: &mut Grid, rng: &mut R) -> Result<()>
    where R: Rng + ?Sized
{
    for cell in grid.iter() {

        let neighbours = [CompassPrimary::North, CompassPrimary::East]
            .iter()
            .filter_map(|dir| grid.neighbour(cell, *dir))
            .collect::<CellSmallVec>();

        // Unless there are no neighbours, randomly choose a neighbour to connect.
        if let Some(&link_cell) = neighbours.choose(rng) {
            grid.link(cell, link_cell)?;
        }
    }
    Ok(())
}

/// Apply the sidewinder maze generation algorithm to the grid
/// Sidewinder visits the rows west to east. Like the simple binary tree algorithm it picks
/// from one of two directions. The difference is that one direction (east) just carves in that
/// direction but when we pick to move north we choose to carve a passage north in a random cell
/// selected from the most recent run of horizontal cells.
/// This algorithm will display a vertical bias, with most passages leading north.
/// Along the northern boundary there is no way north, so the whole row is one run.
pub fn sidewinder<R>(grid: &mut Grid, rng: &mut R) -> Result<()>
    where R: Rng + ?Sized
{
    for row in grid.iter_row() {
        let mut run = CellSmallVec::new();

        for cell in row {
            run.push(cell);

            let next_in_run_cell = grid.neighbour(cell, CompassPrimary::East);
            let at_eastern_boundary = next_in_run_cell.is_none();
            let at_northern_boundary = grid.neighbour(cell, CompassPrimary::North).is_none();

            let should_close_out = at_eastern_boundary ||
                                   (!at_northern_boundary && rng.gen_range(0..2) == 0); // coin flip

            if should_close_out {
                if let Some(&run_member) = run.choose(rng) {
                    if let Some(north_cell) = grid.neighbour(run_member, CompassPrimary::North) {
                        grid.link(run_member, north_cell)?;
                    }
                }
                run.clear();
            } else if let Some(east_cell) = next_in_run_cell {
                grid.link(cell, east_cell)?;
            }
        }
    }
    Ok(())
}

/// Apply the Aldous-Broder maze generation algorithm to the grid
/// A random walk from a random cell, carving a passage into every cell the walk enters for the first time.
/// The walk keeps going over visited cells until every cell has been entered, which makes it slow to finish
/// but the mazes are uniformly chosen from all the possible mazes.
///
/// Every cell has to be reachable. On a grid split up into islands by a mask the walk never ends, and on
/// a single isolated cell it fails with `InvalidState`.
pub fn aldous_broder<R>(grid: &mut Grid, rng: &mut R) -> Result<()>
    where R: Rng + ?Sized
{
    let mut cell = grid.random_cell(rng)?;
    let mut unvisited_count = grid.size() - 1;
    let mut steps = 0usize;

    while unvisited_count > 0 {
        let neighbour = random_neighbour(grid, cell, rng)?;

        if is_unvisited(grid, neighbour) {
            grid.link(cell, neighbour)?;
            unvisited_count -= 1;
        }

        cell = neighbour;
        steps += 1;
    }

    debug!("Aldous-Broder random walk of {} steps", steps);
    Ok(())
}

/// Apply Wilson's maze generation algorithm to the grid
/// One random cell starts off as the maze. Then random walks from random cells outside of the maze wander
/// until they bump into the maze, at which point the walked path is carved and joins the maze. Any loop the
/// walk makes is erased, so the path carved is loop free.
/// Like Aldous-Broder the mazes are uniform. It is slow to start, while the maze is small, and quick to finish.
///
/// Every cell has to be reachable. On a grid split up into islands by a mask a walk may never end, and on
/// a single isolated cell it fails with `InvalidState`.
pub fn wilsons<R>(grid: &mut Grid, rng: &mut R) -> Result<()>
    where R: Rng + ?Sized
{
    let first = grid.random_cell(rng)?;

    let mut unvisited: Vec<CellIndex> = grid.iter().filter(|cell| *cell != first).collect();
    let mut unvisited_set: BitSet = unvisited.iter().map(|cell| cell.index()).collect();
    // Where each unvisited cell sits in `unvisited`, so joining the maze is a swap_remove
    let mut unvisited_positions = vec![0; grid.size()];
    for (position, cell) in unvisited.iter().enumerate() {
        unvisited_positions[cell.index()] = position;
    }
    let mut walks = 0usize;

    while let Some(&start) = unvisited.choose(rng) {

        // Loop erased random walk until we hit a cell that is already part of the maze
        let mut path = vec![start];
        let mut cell = start;
        while unvisited_set.contains(cell.index()) {
            cell = random_neighbour(grid, cell, rng)?;

            if let Some(loop_start) = path.iter().position(|c| *c == cell) {
                path.truncate(loop_start + 1);
            } else {
                path.push(cell);
            }
        }

        for pair in path.windows(2) {
            grid.link(pair[0], pair[1])?;
        }

        // The final cell of the path was already visited
        for walked in &path[..path.len() - 1] {
            if unvisited_set.remove(walked.index()) {
                let position = unvisited_positions[walked.index()];
                let _ = unvisited.swap_remove(position);
                if let Some(moved) = unvisited.get(position) {
                    unvisited_positions[moved.index()] = position;
                }
            }
        }
        walks += 1;
    }

    debug!("Wilson's made {} loop erased random walks", walks);
    Ok(())
}

/// Apply the hunt and kill maze generation algorithm to the grid
/// A random walk that only ever steps into unvisited cells, carving as it goes (the kill). When the walk is
/// boxed in, the grid is scanned from the top row down for the first unvisited cell that touches a visited
/// cell (the hunt). That cell is linked to one of its visited neighbours and the walk carries on from there.
/// The mazes have long winding corridors with few dead ends.
///
/// On a grid split up into islands by a mask only the island the walk starts on is carved.
pub fn hunt_and_kill<R>(grid: &mut Grid, rng: &mut R) -> Result<()>
    where R: Rng + ?Sized
{
    let mut current = Some(grid.random_cell(rng)?);
    let mut hunts = 0usize;

    while let Some(cell) = current {

        let unvisited_neighbours = neighbours_by_visited(grid, cell, false);

        if let Some(&neighbour) = unvisited_neighbours.choose(rng) {
            grid.link(cell, neighbour)?;
            current = Some(neighbour);

        } else {
            // The hunt: find a target before changing anything
            let target = grid.iter().find_map(|candidate| {
                if is_unvisited(grid, candidate) {
                    let visited_neighbours = neighbours_by_visited(grid, candidate, true);
                    if !visited_neighbours.is_empty() {
                        return Some((candidate, visited_neighbours));
                    }
                }
                None
            });

            current = None;
            if let Some((hunted, visited_neighbours)) = target {
                if let Some(&neighbour) = visited_neighbours.choose(rng) {
                    trace!("Hunt found {}", grid.coordinate(hunted));
                    grid.link(hunted, neighbour)?;
                    current = Some(hunted);
                    hunts += 1;
                }
            }
        }
    }

    debug!("Hunt and kill needed {} hunts", hunts);
    Ok(())
}

/// Apply the recursive backtracker maze generation algorithm to the grid
/// A randomised depth first search: from the top of a stack of cells carve into a random unvisited
/// neighbour and push it, or pop when there is none. The stack starts with `start_at`, or a random cell.
/// The mazes have long twisty corridors and few dead ends, much like hunt and kill, but it needs memory
/// for the stack, which can grow as large as the grid.
pub fn recursive_backtracker<R>(grid: &mut Grid, rng: &mut R, start_at: Option<CellIndex>) -> Result<()>
    where R: Rng + ?Sized
{
    let start = match start_at {
        Some(cell) if grid.contains(cell) => cell,
        Some(cell) => bail!(ErrorKind::InvalidOperation(format!("{:?} is not a cell of the grid", cell))),
        None => grid.random_cell(rng)?,
    };

    let mut stack = vec![start];
    let mut deepest = 1;

    while let Some(&top) = stack.last() {
        let unvisited_neighbours = neighbours_by_visited(grid, top, false);

        if let Some(&neighbour) = unvisited_neighbours.choose(rng) {
            grid.link(top, neighbour)?;
            stack.push(neighbour);
            deepest = deepest.max(stack.len());
        } else {
            let _ = stack.pop();
        }
    }

    debug!("Recursive backtracker stack reached a depth of {}", deepest);
    Ok(())
}

// Not part of the maze yet.
#[inline]
fn is_unvisited(grid: &Grid, cell: CellIndex) -> bool {
    grid.links(cell).is_empty()
}

fn neighbours_by_visited(grid: &Grid, cell: CellIndex, visited: bool) -> CellSmallVec {
    grid.neighbours(cell)
        .into_iter()
        .filter(|c| is_unvisited(grid, *c) != visited)
        .collect()
}

fn random_neighbour<R>(grid: &Grid, cell: CellIndex, rng: &mut R) -> Result<CellIndex>
    where R: Rng + ?Sized
{
    match grid.neighbours(cell).choose(rng) {
        Some(&neighbour) => Ok(neighbour),
        None => bail!(ErrorKind::InvalidState(format!("the cell at {} has no neighbours to walk to",
                                                      grid.coordinate(cell)))),
    }
}


#[cfg(test)]
mod tests {

    use petgraph::algo::{connected_components, is_cyclic_undirected};
    use quickcheck::{quickcheck, TestResult};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::cells::GridCoordinate;
    use crate::grids::{masked_grid, rect_grid};
    use crate::masks::Mask;
    use crate::units::{ColumnsCount, RowsCount};

    fn is_perfect_maze(grid: &Grid) -> bool {
        let graph = grid.links_graph();
        grid.links_count() == grid.size() - 1 &&
        connected_components(&graph) == 1 &&
        !is_cyclic_undirected(&graph)
    }

    fn generated(algorithm: MazeAlgorithm, rows: usize, columns: usize, seed: u64) -> Grid {
        let mut grid = rect_grid(RowsCount(rows), ColumnsCount(columns));
        let mut rng = XorShiftRng::seed_from_u64(seed);
        algorithm.on(&mut grid, &mut rng).expect("generation failed");
        grid
    }

    #[test]
    fn every_algorithm_makes_perfect_mazes() {
        fn prop(rows: u8, columns: u8, seed: u64) -> TestResult {
            let (rows, columns) = ((rows % 10) as usize + 1, (columns % 10) as usize + 1);
            let all_perfect = MazeAlgorithm::ALL
                .iter()
                .all(|algorithm| is_perfect_maze(&generated(*algorithm, rows, columns, seed)));
            TestResult::from_bool(all_perfect)
        }
        quickcheck(prop as fn(u8, u8, u64) -> TestResult);
    }

    #[test]
    fn larger_perfect_mazes() {
        for algorithm in MazeAlgorithm::ALL.iter() {
            let grid = generated(*algorithm, 25, 40, 1234);
            assert!(is_perfect_maze(&grid), "{} failed", algorithm);
            assert_eq!(grid.links_count(), 999);
        }
    }

    #[test]
    fn wilsons_on_a_large_grid() {
        let grid = generated(MazeAlgorithm::Wilsons, 100, 100, 7);
        assert!(is_perfect_maze(&grid));
        assert_eq!(grid.links_count(), 100 * 100 - 1);
        assert!(grid.iter().all(|cell| !grid.links(cell).is_empty()));
    }

    #[test]
    fn same_seed_same_maze() {
        for algorithm in MazeAlgorithm::ALL.iter() {
            let links_a = generated(*algorithm, 8, 13, 99).iter_links().collect::<Vec<_>>();
            let links_b = generated(*algorithm, 8, 13, 99).iter_links().collect::<Vec<_>>();
            assert_eq!(links_a, links_b, "{} is not deterministic", algorithm);
        }
    }

    #[test]
    fn single_cell_grid_has_no_links() {
        for algorithm in MazeAlgorithm::ALL.iter() {
            let grid = generated(*algorithm, 1, 1, 5);
            assert_eq!(grid.size(), 1);
            assert_eq!(grid.links_count(), 0);
        }
    }

    #[test]
    fn fully_masked_grid() {
        let mut mask = Mask::new(RowsCount(3), ColumnsCount(3));
        for row in 0..3 {
            for column in 0..3 {
                mask.set(GridCoordinate::new(row, column), false);
            }
        }
        let mut rng = XorShiftRng::seed_from_u64(5);

        for algorithm in &[MazeAlgorithm::AldousBroder,
                           MazeAlgorithm::Wilsons,
                           MazeAlgorithm::HuntAndKill,
                           MazeAlgorithm::RecursiveBacktracker] {
            let mut grid = masked_grid(&mask);
            let err = algorithm.on(&mut grid, &mut rng).unwrap_err();
            assert!(matches!(*err.kind(), ErrorKind::InvalidState(_)), "{}", algorithm);
        }

        // nothing to visit
        for algorithm in &[MazeAlgorithm::BinaryTree, MazeAlgorithm::Sidewinder] {
            let mut grid = masked_grid(&mask);
            algorithm.on(&mut grid, &mut rng).unwrap();
            assert_eq!(grid.links_count(), 0);
        }
    }

    #[test]
    fn random_walks_cover_a_connected_mask() {
        // a 5x5 grid with a hole in the middle and the corners cut off
        let mut mask = Mask::new(RowsCount(5), ColumnsCount(5));
        for &(row, column) in &[(2, 2), (0, 0), (0, 4), (4, 0), (4, 4)] {
            mask.set(GridCoordinate::new(row, column), false);
        }

        for algorithm in &[MazeAlgorithm::AldousBroder,
                           MazeAlgorithm::Wilsons,
                           MazeAlgorithm::HuntAndKill,
                           MazeAlgorithm::RecursiveBacktracker] {
            for seed in 0..20 {
                let mut grid = masked_grid(&mask);
                let mut rng = XorShiftRng::seed_from_u64(seed);
                algorithm.on(&mut grid, &mut rng).unwrap();
                assert_eq!(grid.size(), 20);
                assert!(is_perfect_maze(&grid), "{} failed with seed {}", algorithm, seed);
                assert!(grid.cell_at(GridCoordinate::new(2, 2)).is_none());
            }
        }
    }

    #[test]
    fn isolated_cell_is_invalid_state() {
        // (0, 0) is cut off from (0, 2)
        let mut mask = Mask::new(RowsCount(1), ColumnsCount(3));
        mask.set(GridCoordinate::new(0, 1), false);
        let mut grid = masked_grid(&mask);
        let mut rng = XorShiftRng::seed_from_u64(0);
        let err = aldous_broder(&mut grid, &mut rng).unwrap_err();
        assert!(matches!(*err.kind(), ErrorKind::InvalidState(_)));
    }

    #[test]
    fn binary_tree_always_choosing_first() {
        let mut grid = rect_grid(RowsCount(2), ColumnsCount(2));
        let mut rng = StepRng::new(0, 0);
        binary_tree(&mut grid, &mut rng).unwrap();

        let gc = |r, c| grid.cell_at(GridCoordinate::new(r, c)).unwrap();
        assert!(grid.is_linked(gc(0, 0), gc(0, 1)));
        assert!(grid.is_linked(gc(0, 0), gc(1, 0)));
        assert!(grid.is_linked(gc(0, 1), gc(1, 1)));
        assert_eq!(grid.links_count(), 3);
        assert!(is_perfect_maze(&grid));
    }

    #[test]
    fn binary_tree_corridors_along_north_and_east() {
        let grid = generated(MazeAlgorithm::BinaryTree, 6, 6, 21);
        let top_row = grid.iter_row().next().unwrap();
        for pair in top_row.windows(2) {
            assert!(grid.is_linked(pair[0], pair[1]));
        }
        for row in 1..6 {
            let east_cell = grid.cell_at(GridCoordinate::new(row, 5)).unwrap();
            assert!(grid.is_neighbour_linked(east_cell, CompassPrimary::North));
        }
    }

    #[test]
    fn sidewinder_top_row_is_one_corridor() {
        let grid = generated(MazeAlgorithm::Sidewinder, 6, 9, 8);
        let top_row = grid.iter_row().next().unwrap();
        for pair in top_row.windows(2) {
            assert!(grid.is_linked(pair[0], pair[1]));
        }
    }

    #[test]
    fn recursive_backtracker_start_cell() {
        let mut grid = rect_grid(RowsCount(4), ColumnsCount(4));
        let mut rng = XorShiftRng::seed_from_u64(3);
        let start = grid.cell_at(GridCoordinate::new(3, 3)).unwrap();
        recursive_backtracker(&mut grid, &mut rng, Some(start)).unwrap();
        assert!(is_perfect_maze(&grid));

        let mut grid = rect_grid(RowsCount(4), ColumnsCount(4));
        let foreign = rect_grid(RowsCount(5), ColumnsCount(5)).cell_at(GridCoordinate::new(4, 4)).unwrap();
        let err = recursive_backtracker(&mut grid, &mut rng, Some(foreign)).unwrap_err();
        assert!(matches!(*err.kind(), ErrorKind::InvalidOperation(_)));
    }

    #[test]
    fn algorithm_names() {
        for algorithm in MazeAlgorithm::ALL.iter() {
            assert_eq!(algorithm.name().parse::<MazeAlgorithm>().unwrap(), *algorithm);
            assert_eq!(algorithm.to_string(), algorithm.name());
        }
        assert_eq!("Hunt and Kill".parse::<MazeAlgorithm>().unwrap(), MazeAlgorithm::HuntAndKill);
        assert_eq!("ALDOUS_BRODER".parse::<MazeAlgorithm>().unwrap(), MazeAlgorithm::AldousBroder);
        assert_eq!("binary".parse::<MazeAlgorithm>().unwrap(), MazeAlgorithm::BinaryTree);
        assert_eq!("wilson".parse::<MazeAlgorithm>().unwrap(), MazeAlgorithm::Wilsons);
    }

    #[test]
    fn apply_by_name() {
        let mut grid = rect_grid(RowsCount(5), ColumnsCount(5));
        let mut rng = XorShiftRng::seed_from_u64(17);
        apply("wilsons", &mut grid, &mut rng).unwrap();
        assert!(is_perfect_maze(&grid));

        let mut grid = rect_grid(RowsCount(5), ColumnsCount(5));
        let err = apply("eller", &mut grid, &mut rng).unwrap_err();
        match *err.kind() {
            ErrorKind::UnknownAlgorithm(ref name) => assert_eq!(name, "eller"),
            _ => panic!("expected an unknown algorithm error"),
        }
        assert_eq!(grid.links_count(), 0);
    }
}
