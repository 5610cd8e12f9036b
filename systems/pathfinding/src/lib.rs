#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Time-aware pathfinding from the snake's head to the food.
//!
//! The search walks hypothetical futures of the snake: every search state
//! carries the body as it would look after that many steps, so cells the tail
//! has already released are not treated as permanent obstacles.

use std::{cmp::Reverse, collections::BinaryHeap};

use log::{debug, info};
use snake_autopilot_core::{
    Body, CellCoord, Command, EndReason, Event, Heading, NoPathFound, OccupancyMask, Path,
};

/// Searches for a path using fresh scratch buffers.
///
/// See [`Pathfinder::find_path`].
pub fn find_path(
    head: CellCoord,
    heading: Heading,
    body: &Body,
    food: CellCoord,
) -> Result<Path, NoPathFound> {
    Pathfinder::default().find_path(head, heading, body, food)
}

/// Best-first search with reusable scratch buffers.
///
/// States are ranked by `manhattan(candidate, food) + manhattan(current,
/// candidate)`; the distance already travelled is not part of the key, so the
/// result is a valid path rather than a guaranteed shortest one. Equal keys are
/// expanded in insertion order. Visited cells are tracked once for the whole
/// search, which bounds it to one expansion per grid cell.
#[derive(Debug, Default)]
pub struct Pathfinder {
    nodes: Vec<SearchNode>,
    open: BinaryHeap<(Reverse<u32>, Reverse<usize>)>,
    visited: OccupancyMask,
    last_expansions: usize,
}

impl Pathfinder {
    /// Creates a pathfinder with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of states popped from the queue by the most recent search.
    #[must_use]
    pub fn last_expansions(&self) -> usize {
        self.last_expansions
    }

    /// Finds a path from `head` to `food` that never enters the body as it
    /// slides forward, and never reverses into the opposite of the heading.
    ///
    /// The returned [`Path`] carries the heading of its last step and the body
    /// simulated for the moment of arrival. When `head` already equals `food`
    /// the path is empty and both are returned unchanged.
    pub fn find_path(
        &mut self,
        head: CellCoord,
        heading: Heading,
        body: &Body,
        food: CellCoord,
    ) -> Result<Path, NoPathFound> {
        let grid = body.grid();
        self.nodes.clear();
        self.open.clear();
        self.visited.reset(grid.cell_count());
        self.last_expansions = 0;

        if head == food {
            return Ok(Path::new(Vec::new(), heading, body.clone()));
        }

        if let Some(index) = grid.index(head) {
            let _ = self.visited.insert(index);
        }
        self.nodes.push(SearchNode {
            cell: head,
            heading,
            parent: None,
            body: body.clone(),
        });
        self.open.push((Reverse(0), Reverse(0)));

        while let Some((_, Reverse(node_index))) = self.open.pop() {
            self.last_expansions += 1;

            let cell = self.nodes[node_index].cell;
            let arrived_with = self.nodes[node_index].heading;
            if cell == food {
                return Ok(self.reconstruct(node_index));
            }

            for candidate_heading in Heading::ALL {
                if candidate_heading == arrived_with.opposite() {
                    continue;
                }

                let Some(candidate) = grid.step(cell, candidate_heading) else {
                    continue;
                };
                let Some(candidate_index) = grid.index(candidate) else {
                    continue;
                };
                if self.visited.contains(candidate_index)
                    || self.nodes[node_index].body.contains(candidate_index)
                {
                    continue;
                }

                let mut simulated = self.nodes[node_index].body.clone();
                let _ = simulated.advance(candidate);
                let key = candidate.manhattan_distance(food) + cell.manhattan_distance(candidate);

                self.nodes.push(SearchNode {
                    cell: candidate,
                    heading: candidate_heading,
                    parent: Some(node_index),
                    body: simulated,
                });
                self.open.push((Reverse(key), Reverse(self.nodes.len() - 1)));
                let _ = self.visited.insert(candidate_index);
            }
        }

        Err(NoPathFound { head, food })
    }

    fn reconstruct(&mut self, goal_index: usize) -> Path {
        let mut cells = Vec::new();
        let mut cursor = goal_index;
        while let Some(parent) = self.nodes[cursor].parent {
            cells.push(self.nodes[cursor].cell);
            cursor = parent;
        }
        cells.reverse();

        let goal = self.nodes.swap_remove(goal_index);
        Path::new(cells, goal.heading, goal.body)
    }
}

#[derive(Clone, Debug)]
struct SearchNode {
    cell: CellCoord,
    heading: Heading,
    parent: Option<usize>,
    body: Body,
}

/// Pure system that answers every food placement with a path or a game over.
#[derive(Debug, Default)]
pub struct Pathfinding {
    pathfinder: Pathfinder,
}

impl Pathfinding {
    /// Creates the system with an idle pathfinder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expansion count of the most recent search.
    #[must_use]
    pub fn last_expansions(&self) -> usize {
        self.pathfinder.last_expansions()
    }

    /// Consumes world events and the live snake to emit path commands.
    ///
    /// Only the most recent [`Event::FoodPlaced`] in `events` triggers a
    /// search; any other batch produces no commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        body: &Body,
        heading: Heading,
        out: &mut Vec<Command>,
    ) {
        let Some(food) = events.iter().rev().find_map(|event| match event {
            Event::FoodPlaced { cell } => Some(*cell),
            _ => None,
        }) else {
            return;
        };

        match self.pathfinder.find_path(body.head(), heading, body, food) {
            Ok(path) => {
                debug!(
                    "path of {} cells to {food} after {} expansions",
                    path.len(),
                    self.pathfinder.last_expansions()
                );
                out.push(Command::AssignPath { path });
            }
            Err(error) => {
                info!(
                    "{error} after {} expansions",
                    self.pathfinder.last_expansions()
                );
                out.push(Command::EndRun {
                    reason: EndReason::NoPathFound,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_autopilot_core::Grid;

    fn body(grid: Grid, cells: &[(u32, u32)]) -> Body {
        Body::from_cells(
            grid,
            cells
                .iter()
                .map(|&(column, row)| CellCoord::new(column, row)),
        )
        .expect("valid body")
    }

    #[test]
    fn head_on_food_yields_an_empty_path() {
        let grid = Grid::new(4, 4);
        let body = body(grid, &[(0, 0), (1, 0)]);

        let path = find_path(body.head(), Heading::East, &body, body.head()).expect("path");

        assert!(path.is_empty());
        assert_eq!(path.arrival_heading(), Heading::East);
        assert_eq!(path.arrival_body(), &body);
    }

    #[test]
    fn straight_line_is_followed_when_unobstructed() {
        let grid = Grid::new(6, 1);
        let body = body(grid, &[(0, 0), (1, 0)]);

        let path = find_path(body.head(), Heading::East, &body, CellCoord::new(4, 0)).expect("path");

        assert_eq!(
            path.cells(),
            &[
                CellCoord::new(2, 0),
                CellCoord::new(3, 0),
                CellCoord::new(4, 0)
            ]
        );
        assert_eq!(path.arrival_heading(), Heading::East);
        assert_eq!(path.arrival_body(), &self::body(grid, &[(3, 0), (4, 0)]));
    }

    #[test]
    fn reconstruct_returns_cells_in_walking_order() {
        let grid = Grid::new(3, 3);
        let body = body(grid, &[(0, 0)]);
        let mut pathfinder = Pathfinder::new();

        let path = pathfinder
            .find_path(body.head(), Heading::South, &body, CellCoord::new(2, 2))
            .expect("path");

        assert_eq!(path.destination(), Some(CellCoord::new(2, 2)));
        assert_eq!(path.len(), 4);
        assert!(pathfinder.last_expansions() <= grid.cell_count());
    }

    #[test]
    fn system_ignores_batches_without_food() {
        let grid = Grid::new(4, 4);
        let body = body(grid, &[(0, 0), (1, 0)]);
        let mut system = Pathfinding::new();
        let mut commands = Vec::new();

        system.handle(
            &[Event::TimeAdvanced { tick: 1 }, Event::FoodNeeded],
            &body,
            Heading::East,
            &mut commands,
        );

        assert!(commands.is_empty());
    }
}
