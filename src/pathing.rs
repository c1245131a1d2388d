use std::fmt::{Debug, Display, LowerHex};

use num::traits::{Bounded, CheckedAdd, One, Unsigned, Zero};
use smallvec::SmallVec;

use crate::cells::CellIndex;
use crate::grid::Grid;
use crate::utils;
use fnv::FnvHashMap;


// Trait (hack) used purely as a generic type parameter alias because it looks ugly to type this out each time
// Note generic parameter type aliases are not in the language.
// `type X = Y;` only works with concrete types.
pub trait MaxDistance
    : Zero + One + Bounded + Unsigned + CheckedAdd + Debug + Clone + Copy + Display + LowerHex + Ord
    {
}
impl<T: Zero + One + Bounded + Unsigned + CheckedAdd + Debug + Clone + Copy + Display + LowerHex + Ord> MaxDistance for T {}


/// Number of steps along the links of a grid from a root cell to every cell reachable from it.
///
/// Cells that cannot be reached from the root have no recorded distance.
#[derive(Debug, Clone)]
pub struct Distances<MaxDistanceT = u32> {
    root: CellIndex,
    distances: FnvHashMap<CellIndex, MaxDistanceT>,
    insertion_order: Vec<CellIndex>,
}

impl<MaxDistanceT> Distances<MaxDistanceT>
    where MaxDistanceT: MaxDistance
{
    /// Breadth first flood fill along the links of the grid, starting at `root`.
    ///
    /// None if the root is not a cell of the grid, or if some distance does not fit in
    /// `MaxDistanceT`.
    pub fn for_grid(grid: &Grid, root: CellIndex) -> Option<Distances<MaxDistanceT>> {
        if !grid.contains(root) {
            return None;
        }

        let mut distances = Self::with_root(root, grid.size());

        // The links are unweighted, so the first distance recorded for a cell is already the shortest and the
        // distances map doubles as the visited set.
        let mut frontier = vec![root];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell in &frontier {

                let distance_to_cell = distances.distance(*cell)?;
                for linked_cell in grid.links(*cell) {
                    if !distances.contains(*linked_cell) {
                        let next_distance = distance_to_cell.checked_add(&One::one())?;
                        distances.record(*linked_cell, next_distance);
                        new_frontier.push(*linked_cell);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(distances)
    }

    fn with_root(root: CellIndex, capacity: usize) -> Distances<MaxDistanceT> {
        let mut distances = Distances {
            root,
            distances: utils::fnv_hashmap(capacity),
            insertion_order: Vec::with_capacity(capacity),
        };
        distances.record(root, Zero::zero());
        distances
    }

    fn record(&mut self, cell: CellIndex, distance: MaxDistanceT) {
        if self.distances.insert(cell, distance).is_none() {
            self.insertion_order.push(cell);
        }
    }

    #[inline(always)]
    pub fn root(&self) -> CellIndex {
        self.root
    }

    #[inline(always)]
    pub fn distance(&self, cell: CellIndex) -> Option<MaxDistanceT> {
        self.distances.get(&cell).cloned()
    }

    #[inline(always)]
    pub fn contains(&self, cell: CellIndex) -> bool {
        self.distances.contains_key(&cell)
    }

    /// The cells with a recorded distance, in the order they were recorded.
    #[inline]
    pub fn cells(&self) -> &[CellIndex] {
        &self.insertion_order
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.insertion_order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.insertion_order.is_empty()
    }

    /// The cell furthest from the root and its distance.
    ///
    /// Ties go to the cell recorded first.
    pub fn max(&self) -> (CellIndex, MaxDistanceT) {
        let mut max_cell = self.root;
        let mut max_distance: MaxDistanceT = Zero::zero();
        for cell in &self.insertion_order {
            let distance = self.distances[cell];
            if distance > max_distance {
                max_cell = *cell;
                max_distance = distance;
            }
        }
        (max_cell, max_distance)
    }

    /// All the cells at the maximum distance from the root, in the order they were recorded.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[CellIndex; 8]> {
        let (_, furthest_distance) = self.max();
        self.insertion_order
            .iter()
            .cloned()
            .filter(|cell| self.distances[cell] == furthest_distance)
            .collect()
    }

    /// The distances of just the cells on a path from the root to `goal`, recorded in path
    /// order starting at the root.
    ///
    /// Walking back from the goal, each step takes the first link (in link order) that is
    /// closer to the root. On a perfect maze there is exactly one such link. On a maze with
    /// loops this picks one of the shortest paths.
    ///
    /// None if the goal has no recorded distance or the distances do not belong to `grid`.
    pub fn path_to(&self, grid: &Grid, goal: CellIndex) -> Option<Distances<MaxDistanceT>> {
        let mut current = goal;
        let mut current_distance = self.distance(goal)?;
        let mut breadcrumbs = vec![(goal, current_distance)];

        while current != self.root {
            let (closer, closer_distance) = grid.links(current)
                .iter()
                .filter_map(|linked| self.distance(*linked).map(|d| (*linked, d)))
                .find(|&(_, d)| d < current_distance)?;

            breadcrumbs.push((closer, closer_distance));
            current = closer;
            current_distance = closer_distance;
        }

        let mut path = Self::with_root(self.root, breadcrumbs.len());
        for (cell, distance) in breadcrumbs.into_iter().rev() {
            path.record(cell, distance);
        }
        Some(path)
    }
}

/// Distances from `root` counted in `u32` steps.
pub fn distances_from(grid: &Grid, root: CellIndex) -> Option<Distances> {
    Distances::for_grid(grid, root)
}

/// The cells on the path from the root of the distances to `end_point`, root first.
///
/// None if the end point is not reachable from the root.
pub fn shortest_path<MaxDistanceT>(grid: &Grid,
                                   distances_from_start: &Distances<MaxDistanceT>,
                                   end_point: CellIndex)
                                   -> Option<Vec<CellIndex>>
    where MaxDistanceT: MaxDistance
{
    distances_from_start.path_to(grid, end_point)
                        .map(|path| path.cells().to_vec())
}

/// Works only as long as we are looking at a perfect maze, otherwise you get back some arbitrary path back.
/// If a mask splits the grid into disconnected regions it is the longest path of the region holding the
/// first cell of the grid.
pub fn longest_path(grid: &Grid) -> Option<Vec<CellIndex>> {
    // Distances to everywhere from an arbitrary start cell
    let arbitrary_start_point = grid.iter().next()?;
    let first_distances = distances_from(grid, arbitrary_start_point)?;

    // The start of the longest path is just the point furthest away from an arbitrary initial point
    let (long_path_start, _) = first_distances.max();
    let distances_from_start = distances_from(grid, long_path_start)?;
    let (end_point, _) = distances_from_start.max();

    shortest_path(grid, &distances_from_start, end_point)
}
