//! Pure grid geometry: bounds, cell indexing and cardinal stepping.

use serde::{Deserialize, Serialize};

use crate::{CellCoord, Heading};

/// Dimensions of the rectangular playing field measured in cells.
///
/// Cells are indexed column-major (`column * rows + row`), which gives every
/// in-bounds cell a unique slot in dense lookup tables such as
/// [`OccupancyMask`](crate::OccupancyMask).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    columns: u32,
    rows: u32,
}

impl Grid {
    /// Creates a grid with the provided dimensions.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells, which is also the size of any dense lookup table.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Dense index of the cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }

        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let rows = usize::try_from(self.rows).ok()?;
        column.checked_mul(rows)?.checked_add(row)
    }

    /// Inverse of [`Grid::index`].
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<CellCoord> {
        if index >= self.cell_count() {
            return None;
        }

        let rows = usize::try_from(self.rows).ok()?;
        let column = u32::try_from(index / rows).ok()?;
        let row = u32::try_from(index % rows).ok()?;
        Some(CellCoord::new(column, row))
    }

    /// Cell reached by moving one step from `cell`, if it stays inside the grid.
    #[must_use]
    pub fn step(&self, cell: CellCoord, heading: Heading) -> Option<CellCoord> {
        let (column_delta, row_delta) = heading.delta();
        let column = cell.column().checked_add_signed(column_delta)?;
        let row = cell.row().checked_add_signed(row_delta)?;
        let next = CellCoord::new(column, row);
        self.in_bounds(next).then_some(next)
    }

    /// In-bounds cells one step away from `cell`, in [`Heading::ALL`] order.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
        let grid = *self;
        Heading::ALL
            .into_iter()
            .filter_map(move |heading| grid.step(cell, heading))
    }
}

/// Heading that moves `from` onto `to`, provided the two cells are unit adjacent.
#[must_use]
pub fn heading_between(from: CellCoord, to: CellCoord) -> Option<Heading> {
    let column_diff = from.column().abs_diff(to.column());
    let row_diff = from.row().abs_diff(to.row());
    if column_diff + row_diff != 1 {
        return None;
    }

    if column_diff == 1 {
        if to.column() > from.column() {
            Some(Heading::East)
        } else {
            Some(Heading::West)
        }
    } else if to.row() > from.row() {
        Some(Heading::South)
    } else {
        Some(Heading::North)
    }
}
