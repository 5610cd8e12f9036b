#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the snake autopilot.
//!
//! This crate defines the value types and the message surface that connect the
//! host, the authoritative world, and pure systems. Hosts submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, read immutable
//! views such as [`Body`], and respond exclusively with new command batches.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod body;
mod grid;
mod mask;
mod path;

pub use body::{Body, BodyError};
pub use grid::{heading_between, Grid};
pub use mask::OccupancyMask;
pub use path::{NoPathFound, Path};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Resets the world into a fresh run described by the configuration.
    Configure {
        /// Validated run configuration.
        config: RunConfig,
    },
    /// Advances the simulation by one discrete step.
    Tick,
    /// Places the food target onto a free cell.
    PlaceFood {
        /// Cell that receives the food.
        cell: CellCoord,
    },
    /// Hands a freshly computed path to the snake.
    AssignPath {
        /// Path leading from the current head to the food.
        path: Path,
    },
    /// Ends the run in the terminal state.
    EndRun {
        /// Why the run cannot continue.
        reason: EndReason,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Announces that a new run was configured.
    RunStarted {
        /// Grid the run takes place on.
        grid: Grid,
        /// Cell occupied by the snake's head.
        head: CellCoord,
        /// Heading the snake starts with.
        heading: Heading,
    },
    /// Indicates that the simulation advanced by one tick.
    TimeAdvanced {
        /// Number of ticks processed so far, including this one.
        tick: u64,
    },
    /// Confirms that the snake moved one cell along its route.
    SnakeAdvanced {
        /// Cell the head occupied before moving.
        from: CellCoord,
        /// Cell the head occupies after moving.
        to: CellCoord,
        /// Tail cell released by the move.
        vacated: CellCoord,
    },
    /// Requests a new food target from the placement system.
    FoodNeeded,
    /// Confirms that food was placed.
    FoodPlaced {
        /// Cell holding the food.
        cell: CellCoord,
    },
    /// Reports that the snake's head reached the food.
    FoodEaten {
        /// Cell that held the food.
        cell: CellCoord,
        /// Heading the snake adopted on arrival.
        heading: Heading,
    },
    /// Confirms that a new path was accepted.
    PathAssigned {
        /// Number of cells the snake will walk.
        length: usize,
        /// Heading in effect once the path is complete.
        arrival_heading: Heading,
    },
    /// Reports that a configuration request was refused; the previous run is kept.
    ConfigurationRejected {
        /// Why the configuration was refused.
        error: ConfigError,
    },
    /// Announces the terminal state. Emitted exactly once per run.
    GameOver {
        /// Why the run ended.
        reason: EndReason,
    },
}

/// Status reported to the host after every tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunStatus {
    /// The snake is still following paths.
    Running,
    /// The run reached its terminal state and ignores further ticks.
    GameOver,
}

/// Reasons a run can end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndReason {
    /// The pathfinder exhausted the search space without reaching the food.
    NoPathFound,
    /// The body covers every cell, so no food can be placed.
    BoardFull,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPathFound => f.write_str("no path to the food"),
            Self::BoardFull => f.write_str("no free cell left for food"),
        }
    }
}

/// Direction of travel expressed as one of four unit vectors.
///
/// Rows grow downwards, so [`Heading::South`] is `(0, 1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    /// Movement toward increasing row indices, `(0, 1)`.
    South,
    /// Movement toward decreasing row indices, `(0, -1)`.
    North,
    /// Movement toward increasing column indices, `(1, 0)`.
    East,
    /// Movement toward decreasing column indices, `(-1, 0)`.
    West,
}

impl Heading {
    /// Every heading in canonical expansion order.
    pub const ALL: [Heading; 4] = [Self::South, Self::North, Self::East, Self::West];

    /// Column and row delta applied by one step in this heading.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::South => (0, 1),
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }

    /// Heading pointing the other way; reversing into it is never allowed.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::South => Self::North,
            Self::North => Self::South,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Host-provided constants that stay fixed for the duration of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Number of cell columns.
    pub columns: u32,
    /// Number of cell rows.
    pub rows: u32,
    /// Number of cells the snake occupies when the run starts.
    pub initial_length: u32,
    /// Heading the snake starts with.
    pub initial_heading: Heading,
    /// Seed for the food placement generator.
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            columns: 15,
            rows: 15,
            initial_length: 2,
            initial_heading: Heading::East,
            seed: 0x5eed_f00d,
        }
    }
}

impl RunConfig {
    /// Checks the configuration and returns the grid it describes.
    pub fn validate(&self) -> Result<Grid, ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }

        if self.initial_length == 0 {
            return Err(ConfigError::EmptySnake);
        }

        let available = match self.initial_heading {
            Heading::East | Heading::West => self.columns,
            Heading::North | Heading::South => self.rows,
        };
        if self.initial_length > available {
            return Err(ConfigError::SnakeDoesNotFit {
                length: self.initial_length,
                heading: self.initial_heading,
                available,
            });
        }

        let grid = Grid::new(self.columns, self.rows);
        let length = usize::try_from(self.initial_length).unwrap_or(usize::MAX);
        if length >= grid.cell_count() {
            return Err(ConfigError::NoRoomForFood {
                length: self.initial_length,
                cells: grid.cell_count(),
            });
        }

        Ok(grid)
    }
}

/// Reasons a [`RunConfig`] is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum ConfigError {
    /// One of the grid dimensions is zero.
    #[error("grid must have at least one cell, got {columns}x{rows}")]
    EmptyGrid {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// The snake was configured without any cells.
    #[error("initial snake length must be at least one")]
    EmptySnake,
    /// The initial layout would leave the grid.
    #[error("a snake of length {length} heading {heading:?} needs {length} cells but only {available} fit")]
    SnakeDoesNotFit {
        /// Configured snake length.
        length: u32,
        /// Configured heading the body is laid out along.
        heading: Heading,
        /// Cells available along that axis.
        available: u32,
    },
    /// The snake would cover the whole grid.
    #[error("a snake of length {length} leaves no free cell for food on a grid of {cells} cells")]
    NoRoomForFood {
        /// Configured snake length.
        length: u32,
        /// Total cells in the grid.
        cells: usize,
    },
    /// The initial body could not be laid out.
    #[error("initial body is invalid: {0}")]
    InvalidLayout(#[from] BodyError),
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn opposite_headings_pair_up() {
        for heading in Heading::ALL {
            assert_ne!(heading, heading.opposite());
            assert_eq!(heading.opposite().opposite(), heading);
            let (dc, dr) = heading.delta();
            let (oc, or) = heading.opposite().delta();
            assert_eq!((dc + oc, dr + or), (0, 0));
        }
    }

    #[test]
    fn default_config_is_valid() {
        let grid = RunConfig::default().validate().expect("default config");
        assert_eq!(grid.cell_count(), 225);
    }

    #[test]
    fn config_rejects_empty_grid() {
        let config = RunConfig {
            columns: 0,
            ..RunConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyGrid {
                columns: 0,
                rows: 15
            })
        );
    }

    #[test]
    fn config_rejects_snake_longer_than_its_axis() {
        let config = RunConfig {
            columns: 10,
            rows: 3,
            initial_length: 4,
            initial_heading: Heading::South,
            seed: 1,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SnakeDoesNotFit { available: 3, .. })
        ));
    }

    #[test]
    fn config_rejects_snake_filling_the_grid() {
        let config = RunConfig {
            columns: 3,
            rows: 1,
            initial_length: 3,
            initial_heading: Heading::East,
            seed: 1,
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NoRoomForFood {
                length: 3,
                cells: 3
            })
        );
    }

    #[test]
    fn config_errors_can_be_collected_into_sets() {
        let errors: HashSet<ConfigError> = [
            ConfigError::EmptySnake,
            ConfigError::InvalidLayout(BodyError::Empty),
            ConfigError::InvalidLayout(BodyError::Duplicate {
                cell: CellCoord::new(1, 1),
            }),
            ConfigError::InvalidLayout(BodyError::Empty),
        ]
        .into_iter()
        .collect();

        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ConfigError::InvalidLayout(BodyError::Empty)));
    }

    #[test]
    fn config_loads_from_toml_with_defaults() {
        let config: RunConfig = toml::from_str(
            r#"
            columns = 6
            rows = 6
            initial_heading = "south"
            "#,
        )
        .expect("parse config");

        assert_eq!(config.columns, 6);
        assert_eq!(config.rows, 6);
        assert_eq!(config.initial_heading, Heading::South);
        assert_eq!(config.initial_length, RunConfig::default().initial_length);
    }

    #[test]
    fn config_rejects_unknown_fields() {
        let parsed: Result<RunConfig, _> = toml::from_str("colums = 6");
        assert!(parsed.is_err());
    }
}
