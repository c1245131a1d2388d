use std::path::Path;

use bit_set::BitSet;
use image::{DynamicImage, Rgba};
use log::debug;
use rand::Rng;

use crate::cells::GridCoordinate;
use crate::errors::*;
use crate::units::{ColumnsCount, RowsCount};

// A fully black, opaque pixel marks a position that gets no cell.
const EXCLUDED_PIXEL: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// A rows * columns on/off overlay deciding which positions of a grid get a cell.
///
/// The set bits are the positions that are turned off, so a blank mask is an empty set.
#[derive(Debug, Clone)]
pub struct Mask {
    masked_off: BitSet,
    rows: RowsCount,
    columns: ColumnsCount,
}

impl Mask {
    /// A blank mask, every position turned on.
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> Mask {
        Mask {
            masked_off: BitSet::with_capacity(rows.0 * columns.0),
            rows,
            columns,
        }
    }

    /// One position per pixel, row = y and column = x. Black pixels are turned off.
    pub fn from_image(data_image: &DynamicImage) -> Mask {
        let rgba_image = data_image.to_rgba8();
        let (width, height) = rgba_image.dimensions();
        let mut mask = Mask::new(RowsCount(height as usize), ColumnsCount(width as usize));

        for (x, y, pixel) in rgba_image.enumerate_pixels() {
            if *pixel == EXCLUDED_PIXEL {
                mask.set(GridCoordinate::new(y, x), false);
            }
        }

        debug!("Mask from {}x{} image, {} positions on", width, height, mask.count());
        mask
    }

    /// Decode an encoded image, e.g. the contents of a png file.
    pub fn from_bytes(encoded_image: &[u8]) -> Result<Mask> {
        let data_image = image::load_from_memory(encoded_image)?;
        Ok(Mask::from_image(&data_image))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Mask> {
        let path = path.as_ref();
        debug!("Loading mask image {}", path.display());
        let data_image = image::open(path)?;
        Ok(Mask::from_image(&data_image))
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    /// Is the position turned on? False for positions outside of the mask.
    pub fn is_on(&self, coord: GridCoordinate) -> bool {
        self.bit_index(coord)
            .map_or(false, |bit_index| !self.masked_off.contains(bit_index))
    }

    /// Turn a position on or off. Positions outside of the mask are ignored.
    pub fn set(&mut self, coord: GridCoordinate, on: bool) {
        if let Some(bit_index) = self.bit_index(coord) {
            if on {
                let _ = self.masked_off.remove(bit_index);
            } else {
                let _ = self.masked_off.insert(bit_index);
            }
        }
    }

    /// Number of positions turned on.
    pub fn count(&self) -> usize {
        self.rows.0 * self.columns.0 - self.masked_off.len()
    }

    /// A uniformly random position that is turned on, found by rejection sampling.
    ///
    /// Fails with `InvalidState` if every position is turned off.
    pub fn random_location<R>(&self, rng: &mut R) -> Result<GridCoordinate>
        where R: Rng + ?Sized
    {
        if self.count() == 0 {
            bail!(ErrorKind::InvalidState("the mask has no positions turned on".to_owned()));
        }

        loop {
            let row = rng.gen_range(0..self.rows.0) as u32;
            let column = rng.gen_range(0..self.columns.0) as u32;
            let coord = GridCoordinate::new(row, column);
            if self.is_on(coord) {
                return Ok(coord);
            }
        }
    }

    fn bit_index(&self, coord: GridCoordinate) -> Option<usize> {
        let (row, column) = (coord.row as usize, coord.column as usize);
        if row < self.rows.0 && column < self.columns.0 {
            Some(row * self.columns.0 + column)
        } else {
            None
        }
    }
}
