#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick-driven host interface that wires the world to its systems.
//!
//! A [`Session`] owns one [`World`] plus the food placement and pathfinding
//! systems. Every host tick applies [`Command::Tick`] and then pumps the
//! resulting events through the systems until they stop issuing commands, so
//! a meal, the next food placement and the next search all settle within the
//! tick that reached the food.

use log::{debug, info};
use snake_autopilot_core::{
    Body, CellCoord, Command, ConfigError, EndReason, Event, RunConfig, RunStatus,
};
use snake_autopilot_system_food::FoodPlacement;
use snake_autopilot_system_pathfinding::Pathfinding;
use snake_autopilot_world::{self as world, query, World};

/// Snapshot handed to renderers after each tick.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RenderState {
    /// Body cells ordered from tail to head.
    pub body: Vec<CellCoord>,
    /// Cell holding the food, if one is placed.
    pub food: Option<CellCoord>,
    /// Whether the run is still going.
    pub status: RunStatus,
}

/// Counters accumulated over the lifetime of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RunStats {
    /// Ticks the world has processed.
    pub ticks: u64,
    /// Food cells reached.
    pub meals: u64,
    /// Searches run, successful or not.
    pub searches: u64,
    /// Sum of the lengths of every path assigned.
    pub total_path_length: u64,
    /// Sum of the states expanded by every search.
    pub total_expansions: u64,
    /// Why the run ended, once it has.
    pub end_reason: Option<EndReason>,
}

/// One autopilot run together with the systems that drive it.
#[derive(Debug)]
pub struct Session {
    world: World,
    food: FoodPlacement,
    pathfinding: Pathfinding,
    stats: RunStats,
    events: Vec<Event>,
}

impl Session {
    /// Starts a run and settles it until the first path is assigned.
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        let mut world = World::default();
        let mut events = Vec::new();
        world::apply(&mut world, Command::Configure { config }, &mut events);
        if let Some(error) = events.iter().find_map(|event| match event {
            Event::ConfigurationRejected { error } => Some(*error),
            _ => None,
        }) {
            return Err(error);
        }

        info!(
            "starting {}x{} run with a snake of {} cells heading {:?}",
            config.columns, config.rows, config.initial_length, config.initial_heading
        );

        let mut session = Self {
            world,
            food: FoodPlacement::new(config.seed),
            pathfinding: Pathfinding::new(),
            stats: RunStats::default(),
            events: Vec::new(),
        };
        session.pump(events);
        Ok(session)
    }

    /// Advances the run by one tick and reports its status afterwards.
    ///
    /// Ticks after the run has ended are ignored and produce no events.
    pub fn tick(&mut self) -> RunStatus {
        self.events.clear();
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick, &mut events);
        self.pump(events);
        query::status(&self.world)
    }

    /// Body, food and status as they stand after the last tick.
    #[must_use]
    pub fn render_state(&self) -> RenderState {
        RenderState {
            body: query::body(&self.world).cells().collect(),
            food: query::food(&self.world),
            status: query::status(&self.world),
        }
    }

    /// Whether the run is still going.
    #[must_use]
    pub fn status(&self) -> RunStatus {
        query::status(&self.world)
    }

    /// Counters accumulated so far.
    #[must_use]
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Live body of the snake.
    #[must_use]
    pub fn body(&self) -> &Body {
        query::body(&self.world)
    }

    /// Read-only access to the underlying world for [`query`] functions.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events produced by the most recent call to [`Session::new`] or
    /// [`Session::tick`], in the order the world emitted them.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    fn pump(&mut self, pending_events: Vec<Event>) {
        let mut events = pending_events;

        loop {
            if events.is_empty() {
                break;
            }
            self.record(&events);

            let mut commands = Vec::new();
            self.food
                .handle(&events, query::body(&self.world), &mut commands);
            self.pathfinding.handle(
                &events,
                query::body(&self.world),
                query::heading(&self.world),
                &mut commands,
            );
            if events
                .iter()
                .any(|event| matches!(event, Event::FoodPlaced { .. }))
            {
                self.stats.searches += 1;
                self.stats.total_expansions += self.pathfinding.last_expansions() as u64;
            }

            if commands.is_empty() {
                break;
            }

            events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }

    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TimeAdvanced { tick } => self.stats.ticks = *tick,
                Event::FoodEaten { cell, .. } => {
                    self.stats.meals += 1;
                    debug!("ate food at {cell}, meal {}", self.stats.meals);
                }
                Event::PathAssigned { length, .. } => {
                    self.stats.total_path_length += *length as u64;
                }
                Event::GameOver { reason } => {
                    self.stats.end_reason = Some(*reason);
                    info!(
                        "run ended after {} ticks and {} meals: {reason}",
                        self.stats.ticks, self.stats.meals
                    );
                }
                _ => {}
            }
        }
        self.events.extend_from_slice(events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_autopilot_core::Heading;

    #[test]
    fn new_session_places_food_and_plans_a_route() {
        let session = Session::new(RunConfig::default()).expect("default config is valid");

        let state = session.render_state();
        let food = state.food.expect("food is placed before the first tick");
        assert!(!state.body.contains(&food));
        assert_eq!(state.status, RunStatus::Running);
        assert_eq!(session.stats().searches, 1);
        assert!(query::route_remaining(session.world()) > 0);
        assert!(matches!(
            session.events().first(),
            Some(Event::RunStarted { .. })
        ));
    }

    #[test]
    fn rejected_configuration_is_reported() {
        let result = Session::new(RunConfig {
            columns: 0,
            rows: 4,
            initial_length: 2,
            initial_heading: Heading::East,
            seed: 1,
        });

        assert_eq!(
            result.err(),
            Some(ConfigError::EmptyGrid {
                columns: 0,
                rows: 4
            })
        );
    }
}
