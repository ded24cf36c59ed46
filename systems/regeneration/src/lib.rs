#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic regeneration system that decides and reveals nearby caches.
//!
//! Whenever the player's cell changes, the system walks the square window of
//! cells around it, resolves the spawn trial for every cell the world has not
//! decided yet, and finally asks the world to refresh the visible caches.
//! Decided cells are never rolled again, so the world keeps its shape no matter
//! how often a neighborhood is regenerated.

use std::collections::HashSet;

use geocoin_core::{
    Command, Event, GridCell, SpawnDecision, SpawnLedger, DEFAULT_NEIGHBORHOOD_SIZE,
    DEFAULT_SPAWN_PROBABILITY,
};
use geocoin_luck::{initial_coin_count, spawn_trial};
use tracing::debug;

/// Configuration parameters required to construct the regeneration system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    neighborhood_size: u32,
    spawn_probability: f64,
}

impl Config {
    /// Creates a new configuration using the provided window radius and spawn odds.
    #[must_use]
    pub const fn new(neighborhood_size: u32, spawn_probability: f64) -> Self {
        Self {
            neighborhood_size,
            spawn_probability,
        }
    }

    /// Chebyshev radius of the regenerated window.
    #[must_use]
    pub const fn neighborhood_size(&self) -> u32 {
        self.neighborhood_size
    }

    /// Probability that an undecided cell receives a cache.
    #[must_use]
    pub const fn spawn_probability(&self) -> f64 {
        self.spawn_probability
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_NEIGHBORHOOD_SIZE, DEFAULT_SPAWN_PROBABILITY)
    }
}

/// Pure system that turns position changes into spawn decisions and refreshes.
#[derive(Debug)]
pub struct Regeneration {
    config: Config,
    pending: HashSet<GridCell>,
}

impl Regeneration {
    /// Creates a new regeneration system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pending: HashSet::new(),
        }
    }

    /// Configuration the system was created with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Consumes events and the spawn ledger to emit decision and refresh commands.
    pub fn handle<L>(&mut self, events: &[Event], ledger: &L, out: &mut Vec<Command>)
    where
        L: SpawnLedger + ?Sized,
    {
        self.pending.clear();
        for event in events {
            if let Some(center) = regeneration_center(event) {
                self.regenerate(center, ledger, out);
            }
        }
    }

    fn regenerate<L>(&mut self, center: GridCell, ledger: &L, out: &mut Vec<Command>)
    where
        L: SpawnLedger + ?Sized,
    {
        let radius = self.config.neighborhood_size;
        let mut decided = 0_usize;

        for cell in center.neighborhood(radius) {
            if ledger.is_decided(cell) || !self.pending.insert(cell) {
                continue;
            }

            out.push(Command::RecordSpawnDecision {
                cell,
                decision: self.decide(cell),
            });
            decided += 1;
        }

        debug!(%center, radius, decided, "neighborhood regenerated");
        out.push(Command::RefreshNeighborhood { center, radius });
    }

    fn decide(&self, cell: GridCell) -> SpawnDecision {
        if spawn_trial(cell, self.config.spawn_probability) {
            SpawnDecision::Spawn {
                coins: initial_coin_count(cell),
            }
        } else {
            SpawnDecision::Barren
        }
    }
}

impl Default for Regeneration {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn regeneration_center(event: &Event) -> Option<GridCell> {
    match event {
        Event::PlayerMoved { cell, .. }
        | Event::SessionRestored { cell, .. }
        | Event::SessionReset { cell, .. } => Some(*cell),
        Event::RegenerationRequested { center } => Some(*center),
        _ => None,
    }
}
