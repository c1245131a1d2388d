use log::debug;

use crate::errors::*;
use crate::grid::Grid;
use crate::masks::Mask;
use crate::units::{ColumnsCount, RowsCount};

/// A grid with a cell at every one of its `rows * columns` positions.
pub fn rect_grid(rows: RowsCount, columns: ColumnsCount) -> Grid {
    Grid::new(rows, columns)
}

/// A grid the size of the mask, with cells only where the mask is turned on.
pub fn masked_grid(mask: &Mask) -> Grid {
    Grid::from_mask(mask)
}

/// Build a grid for a maze, optionally shaped by a mask.
///
/// The mask has to be exactly `rows * columns` in size, otherwise this is an `InvalidState`
/// error. So are grids whose rows or columns do not fit in a `u32` coordinate, or whose
/// position count overflows.
pub fn build(rows: RowsCount, columns: ColumnsCount, mask: Option<&Mask>) -> Result<Grid> {
    let (RowsCount(rows_count), ColumnsCount(columns_count)) = (rows, columns);
    let max_side = u32::MAX as usize;
    if rows_count > max_side || columns_count > max_side || rows_count.checked_mul(columns_count).is_none() {
        bail!(ErrorKind::InvalidState(format!("a {}x{} grid is too large", rows_count, columns_count)));
    }

    let grid = match mask {
        Some(mask) => {
            if mask.rows() != rows || mask.columns() != columns {
                bail!(ErrorKind::InvalidState(format!("a {}x{} mask cannot shape a {}x{} grid",
                                                      mask.rows().0,
                                                      mask.columns().0,
                                                      rows.0,
                                                      columns.0)));
            }
            masked_grid(mask)
        }
        None => rect_grid(rows, columns),
    };
    debug!("Built {:?}", grid);
    Ok(grid)
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::cells::GridCoordinate;

    #[test]
    fn build_without_mask() {
        let grid = build(RowsCount(3), ColumnsCount(5), None).unwrap();
        assert_eq!(grid.size(), 15);
        assert_eq!(grid.links_count(), 0);
    }

    #[test]
    fn build_with_mask() {
        let mut mask = Mask::new(RowsCount(3), ColumnsCount(5));
        mask.set(GridCoordinate::new(0, 0), false);
        mask.set(GridCoordinate::new(2, 4), false);

        let grid = build(RowsCount(3), ColumnsCount(5), Some(&mask)).unwrap();
        assert_eq!(grid.size(), mask.count());
        assert_eq!(grid.size(), 13);
        assert!(grid.cell_at(GridCoordinate::new(0, 0)).is_none());
    }

    #[test]
    fn build_rejects_oversized_dimensions() {
        for &(rows, columns) in &[(usize::MAX / 2 + 1, 2),
                                  (0, u32::MAX as usize + 1),
                                  (u32::MAX as usize + 1, 0)] {
            let err = build(RowsCount(rows), ColumnsCount(columns), None).unwrap_err();
            assert!(matches!(*err.kind(), ErrorKind::InvalidState(_)), "{}x{}", rows, columns);
        }
    }

    #[test]
    fn build_with_mismatched_mask() {
        let mask = Mask::new(RowsCount(4), ColumnsCount(5));
        let err = build(RowsCount(3), ColumnsCount(5), Some(&mask)).unwrap_err();
        assert!(matches!(*err.kind(), ErrorKind::InvalidState(_)));
    }

    #[test]
    fn fully_masked_grid_is_empty() {
        let mut mask = Mask::new(RowsCount(2), ColumnsCount(2));
        for row in 0..2 {
            for column in 0..2 {
                mask.set(GridCoordinate::new(row, column), false);
            }
        }
        let grid = masked_grid(&mask);
        assert!(grid.is_empty());
        assert_eq!(grid.iter().count(), 0);
        assert_eq!(grid.iter_row().count(), 2);
    }
}
