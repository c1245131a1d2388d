use docopt::Docopt;
use error_chain::bail;
use itertools::Itertools;
use log::info;
use mazes::{
    cells::{CellIndex, GridCoordinate},
    generators::{self, MazeAlgorithm},
    grid::Grid,
    grid_displays::{GridDisplay, PathDisplay, StartEndPointsDisplay},
    grids,
    masks::Mask,
    pathing,
    renderers,
    units::{ColumnsCount, RowsCount},
};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use serde_derive::Deserialize;
use smallvec::smallvec;
use std::{
    fs::File,
    io,
    io::prelude::*,
    rc::Rc
};

const USAGE: &str = "Mazes

Usage:
    mazes_driver -h | --help
    mazes_driver --list-algorithms
    mazes_driver [<algorithm>] [options]

Algorithms:
    binary-tree, sidewinder, aldous-broder, wilsons, hunt-and-kill, recursive-backtracker.
    Case and separators do not matter, so 'Hunt_and_Kill' is hunt-and-kill.

Options:
    -h --help              Show this screen.
    --list-algorithms      Show the names of the maze generation algorithms.
    --grid-size=<n>        The grid size is n * n.
    --grid-width=<w>       The number of columns in the grid [default: 20].
    --grid-height=<h>      The number of rows in the grid [default: 20].
    --mask-file=<path>     Path to a mask image (e.g. png). Each pixel is a grid position, black pixels get no cell. The image size decides the grid size.
    --seed=<n>             Seed for the random number generator, to reproduce a maze. Random if not given.
    --start-row=<r>        Row of the cell that distances and paths start from.
    --start-column=<c>     Column of the cell that distances and paths start from.
    --show-distances       Show the distance from the start cell to every other cell in the text rendering.
    --show-path            Show a path. From the start cell to the cell furthest from it if a start is given, otherwise the longest path in the maze.
    --text-out=<path>      Output file path for a textual rendering of a maze, instead of printing it.
    --image-out=<path>     Output file path for an image rendering of a maze. Always PNG format.
    --cell-pixels=<n>      Pixel count to render one cell wall in a maze image [default: 25].
    --colour-distances     Indicate the distance from the start cell to any cell by the cell's background colour in the image.
";

const DEFAULT_ALGORITHM: &str = "recursive-backtracker";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    arg_algorithm: String,
    flag_list_algorithms: bool,
    flag_grid_size: Option<usize>,
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_mask_file: String,
    flag_seed: Option<u64>,
    flag_start_row: Option<u32>,
    flag_start_column: Option<u32>,
    flag_show_distances: bool,
    flag_show_path: bool,
    flag_text_out: String,
    flag_image_out: String,
    flag_cell_pixels: u32,
    flag_colour_distances: bool,
}

// We'll put our errors in an `errors` module, and other modules in
// this crate will `use errors::*;` to get access to everything
// `error_chain!` creates.
mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Mazes(::mazes::errors::Error, ::mazes::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    env_logger::init();

    let args: MazeArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    if args.flag_list_algorithms {
        println!("{}", MazeAlgorithm::ALL.iter().join("\n"));
        return Ok(());
    }

    let mask = if !args.flag_mask_file.is_empty() {
        Some(Mask::from_file(&args.flag_mask_file)
            .chain_err(|| format!("Failed to load mask file {}", args.flag_mask_file))?)
    } else {
        None
    };
    let (rows, columns) = grid_dimensions(&args, mask.as_ref());
    let mut maze_grid = grids::build(rows, columns, mask.as_ref())?;

    let seed = args.flag_seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("Maze seed {}", seed);
    let mut rng = XorShiftRng::seed_from_u64(seed);

    let algorithm_name = if args.arg_algorithm.is_empty() {
        DEFAULT_ALGORITHM
    } else {
        args.arg_algorithm.as_str()
    };
    generators::apply(algorithm_name, &mut maze_grid, &mut rng).map_err(|e| {
        if let mazes::errors::ErrorKind::UnknownAlgorithm(_) = *e.kind() {
            eprintln!("Known algorithms: {}", MazeAlgorithm::ALL.iter().join(", "));
        }
        e
    })?;

    let start = start_cell(&args, &maze_grid)?;
    let path = path_to_show(&maze_grid, start);

    // Distances from the start cell, or the first cell if no start is given
    let distances = match start.or_else(|| maze_grid.iter().next()) {
        Some(root) => pathing::distances_from(&maze_grid, root),
        None => None,
    };

    if !args.flag_image_out.is_empty() {
        let render_options = renderers::RenderOptionsBuilder::new()
            .cell_side_pixels_length(args.flag_cell_pixels)
            .colour_distances(args.flag_colour_distances)
            .distances(distances.as_ref())
            .path(if args.flag_show_path { Some(path.as_slice()) } else { None })
            .build();
        renderers::render_to_file(&maze_grid, &render_options, &args.flag_image_out)?;
    }

    let grid_display: Option<Rc<dyn GridDisplay>> = match distances {
        Some(distances) if args.flag_show_distances => Some(Rc::new(distances) as Rc<dyn GridDisplay>),
        _ if args.flag_show_path => Some(Rc::new(PathDisplay::new(&path)) as Rc<dyn GridDisplay>),
        _ => start.map(|start| {
            let ends = path.last().cloned().into_iter().collect();
            Rc::new(StartEndPointsDisplay::new(smallvec![start], ends)) as Rc<dyn GridDisplay>
        }),
    };
    maze_grid.set_grid_display(grid_display);

    if args.flag_text_out.is_empty() {
        println!("{}", maze_grid);
    } else {
        write_text_to_file(&maze_grid.to_string(), &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    println!("{} dead-ends", maze_grid.deadends().len());

    Ok(())
}

// A mask decides the size of the grid, otherwise the grid size options do.
fn grid_dimensions(maze_args: &MazeArgs, mask: Option<&Mask>) -> (RowsCount, ColumnsCount) {
    if let Some(m) = mask {
        (m.rows(), m.columns())
    } else if let Some(square_grid_size) = maze_args.flag_grid_size {
        (RowsCount(square_grid_size), ColumnsCount(square_grid_size))
    } else {
        (RowsCount(maze_args.flag_grid_height), ColumnsCount(maze_args.flag_grid_width))
    }
}

fn start_cell(maze_args: &MazeArgs, maze_grid: &Grid) -> Result<Option<CellIndex>> {
    match (maze_args.flag_start_row, maze_args.flag_start_column) {
        (Some(row), Some(column)) => {
            let cell = maze_grid.cell_at(GridCoordinate::new(row, column))
                .ok_or_else(|| format!("There is no cell at row {} column {} to start from", row, column))?;
            Ok(Some(cell))
        }
        (None, None) => Ok(None),
        _ => bail!("The start needs both --start-row and --start-column"),
    }
}

/// From the start to the cell furthest from it, or the longest path in the maze without a start.
fn path_to_show(maze_grid: &Grid, start: Option<CellIndex>) -> Vec<CellIndex> {
    let path = match start {
        Some(start) => pathing::distances_from(maze_grid, start).and_then(|distances| {
            let (furthest, _) = distances.max();
            pathing::shortest_path(maze_grid, &distances, furthest)
        }),
        None => pathing::longest_path(maze_grid),
    };
    path.unwrap_or_else(Vec::new)
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
