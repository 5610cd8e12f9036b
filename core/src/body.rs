//! Occupancy track describing the cells covered by the snake.

use std::collections::VecDeque;

use thiserror::Error;

use crate::{grid::heading_between, CellCoord, Grid, OccupancyMask};

/// Ordered run of occupied cells, tail first and head last.
///
/// The same type serves as the live body owned by the world and as the
/// simulated obstacle set carried by every pathfinder search state. Mutation
/// happens through [`Body::advance`], which pushes a head and pops the tail in
/// one step so the length never drifts while a path is simulated.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Body {
    grid: Grid,
    cells: VecDeque<CellCoord>,
    occupied: OccupancyMask,
}

impl Body {
    /// Builds a body from tail-first cells, checking every invariant.
    pub fn from_cells<I>(grid: Grid, cells: I) -> Result<Self, BodyError>
    where
        I: IntoIterator<Item = CellCoord>,
    {
        let cells: VecDeque<CellCoord> = cells.into_iter().collect();
        let mut occupied = OccupancyMask::with_capacity(grid.cell_count());
        for cell in &cells {
            if let Some(index) = grid.index(*cell) {
                let _ = occupied.insert(index);
            }
        }

        let body = Self {
            grid,
            cells,
            occupied,
        };
        body.validate()?;
        Ok(body)
    }

    /// Grid the body lives on.
    #[must_use]
    pub const fn grid(&self) -> Grid {
        self.grid
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the body holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Head-most cell.
    #[must_use]
    pub fn head(&self) -> CellCoord {
        self.cells[self.cells.len() - 1]
    }

    /// Tail-most cell.
    #[must_use]
    pub fn tail(&self) -> CellCoord {
        self.cells[0]
    }

    /// Iterator over the occupied cells from tail to head.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.iter().copied()
    }

    /// O(1) membership test keyed by [`Grid::index`].
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.occupied.contains(index)
    }

    /// Membership test for a cell; cells outside the grid are never occupied.
    #[must_use]
    pub fn contains_cell(&self, cell: CellCoord) -> bool {
        self.grid
            .index(cell)
            .is_some_and(|index| self.contains(index))
    }

    /// Dense indices of the occupied cells from tail to head.
    #[must_use]
    pub fn snapshot(&self) -> Vec<usize> {
        self.cells
            .iter()
            .filter_map(|cell| self.grid.index(*cell))
            .collect()
    }

    /// Pushes `new_head` and pops the tail, returning the released tail cell.
    ///
    /// Callers guarantee that `new_head` is adjacent to the current head and
    /// free; the body does not re-check either condition.
    pub fn advance(&mut self, new_head: CellCoord) -> CellCoord {
        self.cells.push_back(new_head);
        let tail = self.cells.pop_front().unwrap_or(new_head);
        self.release(tail);
        self.occupy(new_head);
        tail
    }

    /// Inverse of [`Body::advance`]: prepends `new_tail` and drops the head.
    ///
    /// Returns the head cell that was removed.
    pub fn retreat(&mut self, new_tail: CellCoord) -> CellCoord {
        self.cells.push_front(new_tail);
        let head = self.cells.pop_back().unwrap_or(new_tail);
        self.release(head);
        self.occupy(new_tail);
        head
    }

    /// Checks that the body is non-empty, in bounds, self-avoiding and connected.
    pub fn validate(&self) -> Result<(), BodyError> {
        if self.cells.is_empty() {
            return Err(BodyError::Empty);
        }

        let mut seen = OccupancyMask::with_capacity(self.grid.cell_count());
        let mut previous: Option<CellCoord> = None;
        for cell in self.cells() {
            let index = self.grid.index(cell).ok_or(BodyError::OutOfBounds { cell })?;
            if !seen.insert(index) {
                return Err(BodyError::Duplicate { cell });
            }

            if let Some(from) = previous {
                if heading_between(from, cell).is_none() {
                    return Err(BodyError::Disconnected { from, to: cell });
                }
            }
            previous = Some(cell);
        }

        if seen != self.occupied {
            return Err(BodyError::StaleOccupancy);
        }

        Ok(())
    }

    fn occupy(&mut self, cell: CellCoord) {
        if let Some(index) = self.grid.index(cell) {
            let _ = self.occupied.insert(index);
        }
    }

    fn release(&mut self, cell: CellCoord) {
        if let Some(index) = self.grid.index(cell) {
            let _ = self.occupied.remove(index);
        }
    }
}

/// Invariant violations detected by [`Body::validate`].
///
/// These indicate programming faults; no caller is expected to recover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum BodyError {
    /// The body holds no cells.
    #[error("body has no cells")]
    Empty,
    /// A cell lies outside the grid.
    #[error("body cell {cell} lies outside the grid")]
    OutOfBounds {
        /// Offending cell.
        cell: CellCoord,
    },
    /// A cell appears more than once.
    #[error("body cell {cell} appears more than once")]
    Duplicate {
        /// Repeated cell.
        cell: CellCoord,
    },
    /// Two consecutive cells are not unit adjacent.
    #[error("body cells {from} and {to} are not adjacent")]
    Disconnected {
        /// Tail-side cell of the broken link.
        from: CellCoord,
        /// Head-side cell of the broken link.
        to: CellCoord,
    },
    /// The membership bitset disagrees with the ordered cells.
    #[error("body occupancy bitset is out of sync with its cells")]
    StaleOccupancy,
}
