#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic food placement system.

use log::{debug, warn};
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use snake_autopilot_core::{Body, CellCoord, Command, EndReason, Event};

/// Picks a uniformly random cell that the body does not cover.
///
/// Candidates are drawn over the whole grid and redrawn while they land on the
/// body. Returns `None` when the body covers every cell, since no draw could
/// ever succeed.
pub fn place<R: Rng>(body: &Body, rng: &mut R) -> Option<CellCoord> {
    let grid = body.grid();
    if body.len() >= grid.cell_count() {
        return None;
    }

    loop {
        let candidate = CellCoord::new(
            rng.gen_range(0..grid.columns()),
            rng.gen_range(0..grid.rows()),
        );
        if !body.contains_cell(candidate) {
            return Some(candidate);
        }
    }
}

/// Pure system that answers food requests with placement commands.
#[derive(Debug)]
pub struct FoodPlacement {
    rng: ChaCha8Rng,
}

impl FoodPlacement {
    /// Creates the system with a generator seeded from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Consumes world events and the live body to emit placement commands.
    ///
    /// Each [`Event::FoodNeeded`] yields one [`Command::PlaceFood`], or a
    /// [`Command::EndRun`] when the body leaves no free cell.
    pub fn handle(&mut self, events: &[Event], body: &Body, out: &mut Vec<Command>) {
        let requests = events
            .iter()
            .filter(|event| matches!(event, Event::FoodNeeded))
            .count();

        for _ in 0..requests {
            match place(body, &mut self.rng) {
                Some(cell) => {
                    debug!("placing food at {cell}");
                    out.push(Command::PlaceFood { cell });
                }
                None => {
                    warn!("body covers all {} cells", body.len());
                    out.push(Command::EndRun {
                        reason: EndReason::BoardFull,
                    });
                    return;
                }
            }
        }
    }
}
