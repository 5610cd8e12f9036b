//! Result types produced by the pathfinder.

use thiserror::Error;

use crate::{Body, CellCoord, Heading};

/// Route from the snake's head to the food, together with the state the
/// search simulated for the moment of arrival.
///
/// The cells exclude the head the search started from and end on the food.
/// An empty path means the head already sat on the food.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Path {
    cells: Vec<CellCoord>,
    arrival_heading: Heading,
    arrival_body: Body,
}

impl Path {
    /// Bundles the walked cells with the heading and body at arrival.
    #[must_use]
    pub fn new(cells: Vec<CellCoord>, arrival_heading: Heading, arrival_body: Body) -> Self {
        Self {
            cells,
            arrival_heading,
            arrival_body,
        }
    }

    /// Cells to walk, in order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of steps in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the path contains no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Final cell of the path, if any.
    #[must_use]
    pub fn destination(&self) -> Option<CellCoord> {
        self.cells.last().copied()
    }

    /// Heading of the last step, or the starting heading for an empty path.
    #[must_use]
    pub const fn arrival_heading(&self) -> Heading {
        self.arrival_heading
    }

    /// Body the search simulated once the final cell is reached.
    #[must_use]
    pub const fn arrival_body(&self) -> &Body {
        &self.arrival_body
    }
}

/// The search space was exhausted before the food was reached.
///
/// This is the legitimate end of a run rather than a fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("no path from {head} to food at {food}")]
pub struct NoPathFound {
    /// Head cell the search started from.
    pub head: CellCoord,
    /// Food cell the search tried to reach.
    pub food: CellCoord,
}
