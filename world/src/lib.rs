#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Geocoin.
//!
//! The [`World`] owns the cell registry, the store of spawn decisions and the
//! player session. Every mutation flows through [`apply`], which validates the
//! command, applies it completely or not at all, and reports the outcome as
//! events.

mod cache;
pub mod registry;
mod session;
pub mod store;

use std::collections::BTreeMap;

use geocoin_core::{
    CellId, CollectError, Command, DepositError, Direction, Event, GeoCoord, GridCell, GridSpec,
    SpawnDecision, TrackingMode, WELCOME_BANNER,
};
use tracing::{debug, info, warn};

use self::{cache::Cache, session::PlayerSession};
pub use self::{registry::CellRegistry, store::WorldState};

/// Parameters required to construct a world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    grid: GridSpec,
    start: GeoCoord,
}

impl Config {
    /// Creates a configuration using the provided grid and starting position.
    #[must_use]
    pub const fn new(grid: GridSpec, start: GeoCoord) -> Self {
        Self { grid, start }
    }

    /// Grid mapping cells onto geographic coordinates.
    #[must_use]
    pub const fn grid(&self) -> GridSpec {
        self.grid
    }

    /// Position a fresh or reset session starts from.
    #[must_use]
    pub const fn start(&self) -> GeoCoord {
        self.start
    }
}

impl Default for Config {
    fn default() -> Self {
        let grid = GridSpec::default();
        Self::new(grid, grid.origin())
    }
}

/// Represents the authoritative Geocoin world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    start: GeoCoord,
    registry: CellRegistry,
    state: WorldState,
    player: PlayerSession,
    visible: BTreeMap<GridCell, CellId>,
}

impl World {
    /// Creates a new world with an empty store and the player at the start.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut registry = CellRegistry::new(config.grid());
        let _ = registry.cell_from_geo(config.start());
        Self {
            banner: WELCOME_BANNER,
            start: config.start(),
            registry,
            state: WorldState::new(),
            player: PlayerSession::new(config.start()),
            visible: BTreeMap::new(),
        }
    }

    fn relocate(&mut self, position: GeoCoord, out_events: &mut Vec<Event>) {
        let from = self.player.move_to(position);
        let id = self.registry.cell_from_geo(position);
        let cell = self.cell_coord(id, position);
        info!(%from, to = %position, %cell, "player moved");
        out_events.push(Event::PlayerMoved {
            from,
            to: position,
            cell,
        });
    }

    fn cell_coord(&self, id: CellId, position: GeoCoord) -> GridCell {
        self.registry
            .coord_of(id)
            .unwrap_or_else(|| self.registry.grid().cell_containing(position))
    }

    fn record_decision(
        &mut self,
        cell: GridCell,
        decision: SpawnDecision,
        out_events: &mut Vec<Event>,
    ) {
        let id = self.registry.intern(cell);
        if self.state.has(id) {
            debug!(%cell, "ignoring repeated spawn decision");
            return;
        }

        match decision {
            SpawnDecision::Spawn { coins } => {
                let cache = Cache::spawn(cell, coins);
                self.state.put(id, cache.snapshot());
                debug!(%cell, coins, "cache spawned");
                out_events.push(Event::CacheSpawned { cell, coins });
            }
            SpawnDecision::Barren => {
                self.state.record_barren(id);
                out_events.push(Event::SpawnTrialFailed { cell });
            }
        }
    }

    fn refresh_neighborhood(
        &mut self,
        center: GridCell,
        radius: u32,
        out_events: &mut Vec<Event>,
    ) {
        self.visible.clear();
        out_events.push(Event::NeighborhoodCleared);

        for cell in center.neighborhood(radius) {
            let Some(id) = self.registry.lookup(cell) else {
                continue;
            };
            let Some(snapshot) = self.state.get(id) else {
                continue;
            };
            let Some(bounds) = self.registry.bounds_of(id) else {
                continue;
            };

            let _ = self.visible.insert(cell, id);
            out_events.push(Event::CacheRevealed {
                cell,
                bounds,
                coins: snapshot.coins().to_vec(),
            });
        }
        debug!(%center, radius, visible = self.visible.len(), "neighborhood refreshed");
    }

    fn open_cache(&self, cell: GridCell) -> Option<(CellId, Cache)> {
        let id = self.visible.get(&cell).copied()?;
        let snapshot = self.state.get(id)?;
        Some((id, Cache::from_snapshot(cell, snapshot)))
    }

    fn collect(&mut self, cell: GridCell, out_events: &mut Vec<Event>) {
        let Some((id, mut cache)) = self.open_cache(cell) else {
            reject_collect(cell, CollectError::CacheNotVisible, out_events);
            return;
        };

        if !self.player.can_credit(cache.coin_count()) {
            reject_collect(cell, CollectError::PurseOverflow, out_events);
            return;
        }

        let amount = match cache.collect_all() {
            Ok(amount) => amount,
            Err(reason) => {
                reject_collect(cell, reason, out_events);
                return;
            }
        };

        let purse = self.player.credit(amount);
        self.state.put(id, cache.snapshot());
        info!(%cell, amount, purse, "coins collected");
        out_events.push(Event::CoinsCollected {
            cell,
            amount,
            purse,
        });
        out_events.push(Event::CacheUpdated {
            cell,
            coins: cache.coins().to_vec(),
        });
    }

    fn deposit(&mut self, cell: GridCell, amount: u32, out_events: &mut Vec<Event>) {
        if amount == 0 {
            reject_deposit(cell, DepositError::NonPositiveAmount, out_events);
            return;
        }

        let Some((id, mut cache)) = self.open_cache(cell) else {
            reject_deposit(cell, DepositError::CacheNotVisible, out_events);
            return;
        };

        let available = self.player.purse();
        if amount > available {
            reject_deposit(
                cell,
                DepositError::InsufficientCoins {
                    requested: amount,
                    available,
                },
                out_events,
            );
            return;
        }

        if let Err(reason) = cache.deposit(amount) {
            reject_deposit(cell, reason, out_events);
            return;
        }

        let purse = self.player.debit(amount);
        self.state.put(id, cache.snapshot());
        info!(%cell, amount, purse, "coins deposited");
        out_events.push(Event::CoinsDeposited {
            cell,
            amount,
            purse,
        });
        out_events.push(Event::CacheUpdated {
            cell,
            coins: cache.coins().to_vec(),
        });
    }

    fn set_tracking_mode(&mut self, mode: TrackingMode, out_events: &mut Vec<Event>) {
        if self.player.set_tracking(mode) {
            info!(?mode, "tracking mode changed");
            out_events.push(Event::TrackingModeChanged { mode });
        }
    }
}

fn reject_collect(cell: GridCell, reason: CollectError, out_events: &mut Vec<Event>) {
    warn!(%cell, %reason, "collect rejected");
    out_events.push(Event::CollectRejected { cell, reason });
}

fn reject_deposit(cell: GridCell, reason: DepositError, out_events: &mut Vec<Event>) {
    warn!(%cell, %reason, "deposit rejected");
    out_events.push(Event::DepositRejected { cell, reason });
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::MovePlayer { direction } => {
            let target = step_position(world, direction);
            world.relocate(target, out_events);
        }
        Command::RelocatePlayer { position } => {
            world.relocate(position, out_events);
        }
        Command::Regenerate { center } => {
            let _ = world.registry.intern(center);
            out_events.push(Event::RegenerationRequested { center });
        }
        Command::RecordSpawnDecision { cell, decision } => {
            world.record_decision(cell, decision, out_events);
        }
        Command::RefreshNeighborhood { center, radius } => {
            world.refresh_neighborhood(center, radius, out_events);
        }
        Command::Collect { cell } => world.collect(cell, out_events),
        Command::Deposit { cell, amount } => world.deposit(cell, amount, out_events),
        Command::SetTrackingMode { mode } => world.set_tracking_mode(mode, out_events),
        Command::ReportGeolocationFailure { reason } => {
            warn!(%reason, "geolocation unavailable");
            world.set_tracking_mode(TrackingMode::Manual, out_events);
            out_events.push(Event::GeolocationUnavailable { reason });
        }
        Command::RestorePlayer { blob } => {
            world.player.restore(&blob);
            let position = world.player.position();
            let id = world.registry.cell_from_geo(position);
            let cell = world.cell_coord(id, position);
            info!(%position, coins = blob.coins, "session restored");
            out_events.push(Event::SessionRestored { position, cell });
        }
        Command::ImportWorldState { state } => {
            let cells = state.cells.len();
            world.visible.clear();
            world.state.import_state(&mut world.registry, state);
            info!(cells, "world state imported");
            out_events.push(Event::NeighborhoodCleared);
            out_events.push(Event::WorldStateImported { cells });
        }
        Command::ResetSession => {
            world.state.clear();
            world.visible.clear();
            world.player.reset(world.start);
            let position = world.start;
            let id = world.registry.cell_from_geo(position);
            let cell = world.cell_coord(id, position);
            info!("session reset");
            out_events.push(Event::NeighborhoodCleared);
            out_events.push(Event::SessionReset { position, cell });
        }
    }
}

fn step_position(world: &World, direction: Direction) -> GeoCoord {
    let tile = world.registry.grid().tile_degrees();
    let (di, dj) = direction.cell_offset();
    world
        .player
        .position()
        .offset(f64::from(di) * tile, f64::from(dj) * tile)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use geocoin_core::{
        CacheSnapshot, GeoCoord, GridCell, GridSpec, SaveGame, SessionBlob, SpawnLedger,
        TrackingMode, WorldStateBlob,
    };

    use super::{CellRegistry, World, WorldState};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the grid definition.
    #[must_use]
    pub fn grid(world: &World) -> &GridSpec {
        world.registry.grid()
    }

    /// Provides read-only access to the cell registry.
    #[must_use]
    pub fn registry(world: &World) -> &CellRegistry {
        &world.registry
    }

    /// Provides read-only access to the store of spawn decisions.
    #[must_use]
    pub fn world_state(world: &World) -> &WorldState {
        &world.state
    }

    /// Current position of the player.
    #[must_use]
    pub fn player_position(world: &World) -> GeoCoord {
        world.player.position()
    }

    /// Cell containing the player.
    #[must_use]
    pub fn player_cell(world: &World) -> GridCell {
        world
            .registry
            .grid()
            .cell_containing(world.player.position())
    }

    /// Number of coins in the player's purse.
    #[must_use]
    pub fn purse(world: &World) -> u32 {
        world.player.purse()
    }

    /// Positions visited by the player, oldest first.
    #[must_use]
    pub fn history(world: &World) -> &[GeoCoord] {
        world.player.history()
    }

    /// Input source currently driving the player's position.
    #[must_use]
    pub fn tracking_mode(world: &World) -> TrackingMode {
        world.player.tracking()
    }

    /// Cells whose caches are currently revealed, in ascending order.
    #[must_use]
    pub fn visible_cells(world: &World) -> Vec<GridCell> {
        world.visible.keys().copied().collect()
    }

    /// Stored contents of the cache in `cell`, if one was spawned.
    #[must_use]
    pub fn cache_at(world: &World, cell: GridCell) -> Option<&CacheSnapshot> {
        world
            .registry
            .lookup(cell)
            .and_then(|id| world.state.get(id))
    }

    /// Captures a read-only view of recorded spawn decisions.
    #[must_use]
    pub fn spawn_ledger(world: &World) -> SpawnLedgerView<'_> {
        SpawnLedgerView {
            registry: &world.registry,
            state: &world.state,
        }
    }

    /// Exports every recorded decision.
    #[must_use]
    pub fn export_state(world: &World) -> WorldStateBlob {
        world.state.export_state(&world.registry)
    }

    /// Exports the player's position, purse and trail.
    #[must_use]
    pub fn session_blob(world: &World) -> SessionBlob {
        world.player.to_blob()
    }

    /// Exports everything required to resume the session later.
    #[must_use]
    pub fn save_game(world: &World) -> SaveGame {
        SaveGame {
            player: session_blob(world),
            world: export_state(world),
        }
    }

    /// Read-only view over recorded spawn decisions.
    #[derive(Clone, Copy, Debug)]
    pub struct SpawnLedgerView<'a> {
        registry: &'a CellRegistry,
        state: &'a WorldState,
    }

    impl SpawnLedger for SpawnLedgerView<'_> {
        fn is_decided(&self, cell: GridCell) -> bool {
            self.registry
                .lookup(cell)
                .is_some_and(|id| self.state.has(id))
        }
    }
}
