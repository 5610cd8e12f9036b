//! Live snake state machine driven by the world.

use snake_autopilot_core::{Body, BodyError, CellCoord, Grid, Heading, Path};

/// The snake's live body together with the heading it last committed to.
///
/// The body keeps the length it was laid out with for the whole run. The
/// heading changes only when food is reached; walking a path cell by cell
/// leaves it untouched so the next search starts from the heading the previous
/// search reported for the moment of arrival.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: Body,
    heading: Heading,
}

impl Snake {
    /// Lays out a straight snake of `length` cells travelling along `heading`.
    ///
    /// East and South start from the top-left corner; West and North start
    /// from the far edge so the head still points into the grid.
    pub fn laid_out(grid: Grid, length: u32, heading: Heading) -> Result<Self, BodyError> {
        let cells = (0..length).map(|offset| match heading {
            Heading::East => CellCoord::new(offset, 0),
            Heading::South => CellCoord::new(0, offset),
            Heading::West => {
                CellCoord::new(grid.columns().saturating_sub(1).saturating_sub(offset), 0)
            }
            Heading::North => {
                CellCoord::new(0, grid.rows().saturating_sub(1).saturating_sub(offset))
            }
        });
        let body = Body::from_cells(grid, cells)?;
        Ok(Self::from_body(body, heading))
    }

    /// Wraps an existing body.
    #[must_use]
    pub fn from_body(body: Body, heading: Heading) -> Self {
        Self { body, heading }
    }

    /// Cells currently covered by the snake.
    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Heading the next search starts from.
    #[must_use]
    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Head cell.
    #[must_use]
    pub fn head(&self) -> CellCoord {
        self.body.head()
    }

    /// Tail cell.
    #[must_use]
    pub fn tail(&self) -> CellCoord {
        self.body.tail()
    }

    /// Moves the head onto `cell` and returns the tail cell that was released.
    pub fn step_into(&mut self, cell: CellCoord) -> CellCoord {
        self.body.advance(cell)
    }

    /// Consumes the food under the head and adopts the arrival heading.
    ///
    /// The meal takes the place of this tick's forward step, so the body is
    /// neither moved nor grown.
    pub fn reached_food(&mut self, new_heading: Heading) {
        self.heading = new_heading;
    }
}

/// Path handed to the snake plus a cursor over the cells already walked.
#[derive(Clone, Debug)]
pub(crate) struct Route {
    path: Path,
    walked: usize,
}

impl Route {
    pub(crate) fn new(path: Path) -> Self {
        Self { path, walked: 0 }
    }

    pub(crate) fn next_cell(&self) -> Option<CellCoord> {
        self.path.cells().get(self.walked).copied()
    }

    pub(crate) fn mark_walked(&mut self) {
        self.walked = self.walked.saturating_add(1).min(self.path.len());
    }

    pub(crate) fn remaining(&self) -> usize {
        self.path.len() - self.walked
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}
