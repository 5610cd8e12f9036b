#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative run state for the snake autopilot.

mod snake;

use snake_autopilot_core::{
    heading_between, CellCoord, Command, ConfigError, EndReason, Event, Grid, RunConfig,
    RunStatus,
};

use crate::snake::Route;
pub use crate::snake::Snake;

/// Represents the authoritative state of one autopilot run.
#[derive(Debug)]
pub struct World {
    config: RunConfig,
    grid: Grid,
    snake: Snake,
    food: Option<CellCoord>,
    route: Option<Route>,
    status: RunStatus,
    tick_index: u64,
}

impl World {
    /// Creates a world laid out according to the configuration.
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        let grid = config.validate()?;
        let snake = Snake::laid_out(grid, config.initial_length, config.initial_heading)?;
        Ok(Self {
            config,
            grid,
            snake,
            food: None,
            route: None,
            status: RunStatus::Running,
            tick_index: 0,
        })
    }

    fn advance(&mut self, out_events: &mut Vec<Event>) {
        if let Some(food) = self.food {
            if self.snake.head() == food {
                self.eat(food, out_events);
                return;
            }
        }

        let Some(route) = self.route.as_mut() else {
            return;
        };
        let Some(next_cell) = route.next_cell() else {
            return;
        };

        let from = self.snake.head();
        debug_assert!(
            heading_between(from, next_cell).is_some(),
            "route step {from} -> {next_cell} is not adjacent"
        );
        let vacated = self.snake.step_into(next_cell);
        route.mark_walked();
        out_events.push(Event::SnakeAdvanced {
            from,
            to: next_cell,
            vacated,
        });
    }

    fn eat(&mut self, food: CellCoord, out_events: &mut Vec<Event>) {
        let heading = match self.route.take() {
            Some(route) => {
                debug_assert_eq!(
                    self.snake.body(),
                    route.path().arrival_body(),
                    "live body diverged from the body simulated by the search"
                );
                route.path().arrival_heading()
            }
            None => self.snake.heading(),
        };

        self.snake.reached_food(heading);
        self.food = None;

        out_events.push(Event::FoodEaten {
            cell: food,
            heading,
        });
        out_events.push(Event::FoodNeeded);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(RunConfig::default()).expect("default run configuration is valid")
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// # Panics
///
/// Panics when asked to place food outside the grid or on the snake; both are
/// programming errors in the caller.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Configure { config } => match World::new(config) {
            Ok(fresh) => {
                *world = fresh;
                out_events.push(Event::RunStarted {
                    grid: world.grid,
                    head: world.snake.head(),
                    heading: world.snake.heading(),
                });
                out_events.push(Event::FoodNeeded);
            }
            Err(error) => out_events.push(Event::ConfigurationRejected { error }),
        },
        Command::Tick => {
            if world.status == RunStatus::GameOver {
                return;
            }

            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
            world.advance(out_events);
        }
        Command::PlaceFood { cell } => {
            if world.status == RunStatus::GameOver {
                return;
            }

            assert!(
                world.grid.in_bounds(cell) && !world.snake.body().contains_cell(cell),
                "food must be placed on a free cell, got {cell}"
            );
            world.food = Some(cell);
            world.route = None;
            out_events.push(Event::FoodPlaced { cell });
        }
        Command::AssignPath { path } => {
            if world.status == RunStatus::GameOver {
                return;
            }

            debug_assert!(
                path.cells()
                    .first()
                    .map_or(true, |first| heading_between(world.snake.head(), *first).is_some()),
                "path must start next to the head"
            );
            out_events.push(Event::PathAssigned {
                length: path.len(),
                arrival_heading: path.arrival_heading(),
            });
            world.route = Some(Route::new(path));
        }
        Command::EndRun { reason } => end_run(world, reason, out_events),
    }
}

fn end_run(world: &mut World, reason: EndReason, out_events: &mut Vec<Event>) {
    if world.status == RunStatus::GameOver {
        return;
    }

    world.status = RunStatus::GameOver;
    world.route = None;
    out_events.push(Event::GameOver { reason });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use snake_autopilot_core::{Body, CellCoord, Grid, Heading, RunConfig, RunStatus};

    use super::{Snake, World};

    /// Configuration the current run was started with.
    #[must_use]
    pub fn config(world: &World) -> &RunConfig {
        &world.config
    }

    /// Grid the run takes place on.
    #[must_use]
    pub fn grid(world: &World) -> Grid {
        world.grid
    }

    /// Provides read-only access to the snake.
    #[must_use]
    pub fn snake(world: &World) -> &Snake {
        &world.snake
    }

    /// Cells currently covered by the snake.
    #[must_use]
    pub fn body(world: &World) -> &Body {
        world.snake.body()
    }

    /// Cell occupied by the snake's head.
    #[must_use]
    pub fn head(world: &World) -> CellCoord {
        world.snake.head()
    }

    /// Heading the next search starts from.
    #[must_use]
    pub fn heading(world: &World) -> Heading {
        world.snake.heading()
    }

    /// Cell holding the food, if one is placed.
    #[must_use]
    pub fn food(world: &World) -> Option<CellCoord> {
        world.food
    }

    /// Whether the run is still going.
    #[must_use]
    pub fn status(world: &World) -> RunStatus {
        world.status
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Number of cells left on the active route.
    #[must_use]
    pub fn route_remaining(world: &World) -> usize {
        world.route.as_ref().map_or(0, |route| route.remaining())
    }
}

#[cfg(test)]
mod tests {
    use snake_autopilot_core::{Body, Heading, Path};

    use super::*;

    fn configured(config: RunConfig) -> (World, Vec<Event>) {
        let mut world = World::default();
        let mut events = Vec::new();
        apply(&mut world, Command::Configure { config }, &mut events);
        (world, events)
    }

    fn small_config() -> RunConfig {
        RunConfig {
            columns: 6,
            rows: 6,
            initial_length: 2,
            initial_heading: Heading::East,
            seed: 7,
        }
    }

    #[test]
    fn configure_lays_out_the_snake_and_requests_food() {
        let (world, events) = configured(small_config());

        assert_eq!(
            events,
            vec![
                Event::RunStarted {
                    grid: Grid::new(6, 6),
                    head: CellCoord::new(1, 0),
                    heading: Heading::East,
                },
                Event::FoodNeeded,
            ]
        );
        assert_eq!(query::body(&world).len(), 2);
        assert_eq!(query::food(&world), None);
        assert_eq!(query::status(&world), RunStatus::Running);
    }

    #[test]
    fn invalid_configuration_is_rejected_and_previous_run_kept() {
        let (mut world, _) = configured(small_config());
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Configure {
                config: RunConfig {
                    initial_length: 0,
                    ..small_config()
                },
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::ConfigurationRejected {
                error: ConfigError::EmptySnake
            }]
        );
        assert_eq!(query::grid(&world), Grid::new(6, 6));
    }

    #[test]
    fn tick_walks_the_route_and_eats_on_the_following_tick() {
        let (mut world, _) = configured(small_config());
        let grid = query::grid(&world);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceFood {
                cell: CellCoord::new(3, 0),
            },
            &mut events,
        );

        let mut arrival_body = query::body(&world).clone();
        let _ = arrival_body.advance(CellCoord::new(2, 0));
        let _ = arrival_body.advance(CellCoord::new(3, 0));
        let path = Path::new(
            vec![CellCoord::new(2, 0), CellCoord::new(3, 0)],
            Heading::East,
            arrival_body,
        );
        apply(&mut world, Command::AssignPath { path }, &mut events);
        assert_eq!(query::route_remaining(&world), 2);

        events.clear();
        apply(&mut world, Command::Tick, &mut events);
        apply(&mut world, Command::Tick, &mut events);
        assert_eq!(
            events,
            vec![
                Event::TimeAdvanced { tick: 1 },
                Event::SnakeAdvanced {
                    from: CellCoord::new(1, 0),
                    to: CellCoord::new(2, 0),
                    vacated: CellCoord::new(0, 0),
                },
                Event::TimeAdvanced { tick: 2 },
                Event::SnakeAdvanced {
                    from: CellCoord::new(2, 0),
                    to: CellCoord::new(3, 0),
                    vacated: CellCoord::new(1, 0),
                },
            ]
        );

        events.clear();
        apply(&mut world, Command::Tick, &mut events);
        assert_eq!(
            events,
            vec![
                Event::TimeAdvanced { tick: 3 },
                Event::FoodEaten {
                    cell: CellCoord::new(3, 0),
                    heading: Heading::East,
                },
                Event::FoodNeeded,
            ]
        );

        let expected = Body::from_cells(grid, [CellCoord::new(2, 0), CellCoord::new(3, 0)])
            .expect("expected body");
        assert_eq!(query::body(&world), &expected);
        assert_eq!(query::body(&world).len(), 2);
        assert_eq!(query::food(&world), None);
        assert_eq!(query::route_remaining(&world), 0);
    }

    #[test]
    fn default_world_is_laid_out_from_the_default_config() {
        let world = World::default();

        assert_eq!(query::config(&world), &RunConfig::default());
        assert_eq!(query::grid(&world), Grid::new(15, 15));
        assert_eq!(query::body(&world).len(), 2);
        assert_eq!(query::head(&world), CellCoord::new(1, 0));
        assert_eq!(query::heading(&world), Heading::East);
        assert_eq!(query::status(&world), RunStatus::Running);
    }

    #[test]
    fn game_over_is_emitted_once_and_freezes_the_run() {
        let (mut world, _) = configured(small_config());
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::EndRun {
                reason: EndReason::NoPathFound,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::EndRun {
                reason: EndReason::NoPathFound,
            },
            &mut events,
        );
        apply(&mut world, Command::Tick, &mut events);

        assert_eq!(
            events,
            vec![Event::GameOver {
                reason: EndReason::NoPathFound
            }]
        );
        assert_eq!(query::status(&world), RunStatus::GameOver);
        assert_eq!(query::tick_index(&world), 0);
    }

    #[test]
    #[should_panic(expected = "food must be placed on a free cell")]
    fn placing_food_on_the_body_fails_fast() {
        let (mut world, _) = configured(small_config());
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceFood {
                cell: CellCoord::new(0, 0),
            },
            &mut events,
        );
    }
}
