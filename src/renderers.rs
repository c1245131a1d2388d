use std::convert::TryFrom;
use std::path::Path;

use image::{Rgb, RgbImage};
use log::debug;

use crate::cells::{CellIndex, CompassPrimary};
use crate::errors::*;
use crate::grid::Grid;
use crate::pathing::Distances;
use crate::units::{ColumnsCount, RowsCount};

const WHITE: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const RED: Rgb<u8> = Rgb([0xff, 0, 0]);

const DEFAULT_CELL_SIDE_PIXELS: u32 = 25;

#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    cell_side_pixels_length: u32,
    colour_distances: bool,
    distances: Option<&'a Distances>,
    path: Option<&'a [CellIndex]>,
}

impl<'a> RenderOptions<'a> {
    #[inline]
    pub fn cell_side_pixels_length(&self) -> u32 {
        self.cell_side_pixels_length
    }
}

#[derive(Debug)]
pub struct RenderOptionsBuilder<'a> {
    options: RenderOptions<'a>,
}

impl<'a> Default for RenderOptionsBuilder<'a> {
    fn default() -> Self {
        RenderOptionsBuilder::new()
    }
}

impl<'a> RenderOptionsBuilder<'a> {
    pub fn new() -> RenderOptionsBuilder<'a> {
        RenderOptionsBuilder {
            options: RenderOptions {
                cell_side_pixels_length: DEFAULT_CELL_SIDE_PIXELS,
                colour_distances: false,
                distances: None,
                path: None,
            },
        }
    }

    /// Zero is treated as 1 pixel.
    pub fn cell_side_pixels_length(mut self, cell_side_pixels_length: u32) -> Self {
        self.options.cell_side_pixels_length = cell_side_pixels_length.max(1);
        self
    }

    /// Fill the background of each cell by its distance from the distances root, given `distances`.
    pub fn colour_distances(mut self, colour_distances: bool) -> Self {
        self.options.colour_distances = colour_distances;
        self
    }

    pub fn distances(mut self, distances: Option<&'a Distances>) -> Self {
        self.options.distances = distances;
        self
    }

    /// A line through the middle of the cells of a path.
    pub fn path(mut self, path: Option<&'a [CellIndex]>) -> Self {
        self.options.path = path;
        self
    }

    pub fn build(self) -> RenderOptions<'a> {
        self.options
    }
}

/// Background colour of a cell `distance` steps from the root when the furthest cell is `maximum`
/// steps away. Bright at the root, darkening to a deep green at the maximum distance.
pub fn distance_colour(distance: u32, maximum: u32) -> Rgb<u8> {
    let intensity = if maximum == 0 {
        1.0
    } else {
        f64::from(maximum.saturating_sub(distance)) / f64::from(maximum)
    };
    let dark = (255.0 * intensity).round() as u8;
    let bright = 128 + (127.0 * intensity).round() as u8;
    Rgb([dark, bright, dark])
}

/// Draw the maze on a white image with black walls. Masked out positions are left blank.
///
/// The image is `cell size * columns + 1` pixels wide and `cell size * rows + 1` pixels high, so
/// that both outer walls fit. Sizes that do not fit in a `u32` are an `InvalidOperation` error.
pub fn render_png(grid: &Grid, options: &RenderOptions) -> Result<RgbImage> {
    let cell_size = options.cell_side_pixels_length;
    let (RowsCount(rows), ColumnsCount(columns)) = (grid.rows(), grid.columns());
    let image_width = image_side_pixels(cell_size, columns)?;
    let image_height = image_side_pixels(cell_size, rows)?;
    let mut image = RgbImage::from_pixel(image_width, image_height, WHITE);

    // (x1, y1) top left corner, (x2, y2) bottom right corner
    let cell_bounds = |cell: CellIndex| {
        let coord = grid.coordinate(cell);
        let (x1, y1) = (coord.column * cell_size, coord.row * cell_size);
        (x1, y1, x1 + cell_size, y1 + cell_size)
    };

    if let (true, Some(distances)) = (options.colour_distances, options.distances) {
        let (_, maximum) = distances.max();
        for cell in grid.iter() {
            if let Some(distance) = distances.distance(cell) {
                let (x1, y1, x2, y2) = cell_bounds(cell);
                fill_rect(&mut image, x1, y1, x2, y2, distance_colour(distance, maximum));
            }
        }
    }

    for cell in grid.iter() {
        let (x1, y1, x2, y2) = cell_bounds(cell);

        // special cases north and west to handle the first row and column, and the edges of masked areas.
        if grid.neighbour(cell, CompassPrimary::North).is_none() {
            draw_horizontal_line(&mut image, x1, x2, y1, BLACK);
        }
        if grid.neighbour(cell, CompassPrimary::West).is_none() {
            draw_vertical_line(&mut image, x1, y1, y2, BLACK);
        }

        if !grid.is_neighbour_linked(cell, CompassPrimary::East) {
            draw_vertical_line(&mut image, x2, y1, y2, BLACK);
        }
        if !grid.is_neighbour_linked(cell, CompassPrimary::South) {
            draw_horizontal_line(&mut image, x1, x2, y2, BLACK);
        }
    }

    if let Some(path) = options.path {
        let centre = |cell: CellIndex| {
            let (x1, y1, _, _) = cell_bounds(cell);
            (x1 + cell_size / 2, y1 + cell_size / 2)
        };
        for pair in path.windows(2) {
            let ((ax, ay), (bx, by)) = (centre(pair[0]), centre(pair[1]));
            if ay == by {
                draw_horizontal_line(&mut image, ax.min(bx), ax.max(bx), ay, RED);
            } else {
                draw_vertical_line(&mut image, ax, ay.min(by), ay.max(by), RED);
            }
        }
    }

    Ok(image)
}

fn image_side_pixels(cell_size: u32, cells_count: usize) -> Result<u32> {
    u32::try_from(cells_count)
        .ok()
        .and_then(|cells| cell_size.checked_mul(cells))
        .and_then(|pixels| pixels.checked_add(1))
        .ok_or_else(|| {
            ErrorKind::InvalidOperation(format!("{} cells of {} pixels are too large for an image",
                                                cells_count,
                                                cell_size)).into()
        })
}

/// Render the maze and save it as an image, the format chosen by the file extension.
pub fn render_to_file<P: AsRef<Path>>(grid: &Grid, options: &RenderOptions, path: P) -> Result<()> {
    let path = path.as_ref();
    let image = render_png(grid, options)?;
    debug!("Saving {}x{} maze image to {}", image.width(), image.height(), path.display());
    image.save(path)
         .chain_err(|| format!("Failed to save maze image {}", path.display()))
}

// Lines include both end points. Anything off the image is clipped.
fn draw_horizontal_line(image: &mut RgbImage, x1: u32, x2: u32, y: u32, colour: Rgb<u8>) {
    if y < image.height() {
        for x in x1..=x2.min(image.width().saturating_sub(1)) {
            image.put_pixel(x, y, colour);
        }
    }
}

fn draw_vertical_line(image: &mut RgbImage, x: u32, y1: u32, y2: u32, colour: Rgb<u8>) {
    if x < image.width() {
        for y in y1..=y2.min(image.height().saturating_sub(1)) {
            image.put_pixel(x, y, colour);
        }
    }
}

fn fill_rect(image: &mut RgbImage, x1: u32, y1: u32, x2: u32, y2: u32, colour: Rgb<u8>) {
    for y in y1..y2.min(image.height()) {
        for x in x1..x2.min(image.width()) {
            image.put_pixel(x, y, colour);
        }
    }
}
