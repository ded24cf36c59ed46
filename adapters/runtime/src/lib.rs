#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Event pump connecting the Geocoin world, its systems and a renderer.
//!
//! Every interaction is turned into a typed [`Command`], applied to the world
//! and pumped through the regeneration system until no further commands are
//! produced. Only then is the resulting event batch presented.

mod geolocation;
mod store;

use std::collections::BTreeMap;

use anyhow::Result as AnyResult;
use geocoin_core::{
    parse_deposit_amount, Command, Direction, Event, GridCell, SaveGame, TrackingMode,
};
use geocoin_rendering::{CacheHandle, CachePresentation, Notice, PlayerPresentation, Renderer};
use geocoin_system_regeneration::{self as regeneration, Regeneration};
use geocoin_world::{self as world, query, World};
use tracing::{debug, info, warn};

pub use self::{
    geolocation::{PositionSource, Unsupported},
    store::{MemoryStore, SessionStore},
};

/// Upper bound on command rounds processed for a single submitted command.
const MAX_PUMP_ROUNDS: usize = 16;

/// Single-player game session bound to a renderer.
pub struct Runtime<R> {
    world: World,
    regeneration: Regeneration,
    renderer: R,
    watch: Option<Box<dyn PositionSource>>,
    handles: BTreeMap<CacheHandle, GridCell>,
    displayed: BTreeMap<GridCell, (CacheHandle, CachePresentation)>,
}

impl<R> std::fmt::Debug for Runtime<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("player", &query::player_position(&self.world))
            .field("purse", &query::purse(&self.world))
            .field("watching", &self.watch.is_some())
            .field("displayed", &self.displayed.len())
            .finish()
    }
}

impl<R: Renderer> Runtime<R> {
    /// Creates a runtime with an empty world.
    #[must_use]
    pub fn new(world: world::Config, regeneration: regeneration::Config, renderer: R) -> Self {
        Self {
            world: World::new(world),
            regeneration: Regeneration::new(regeneration),
            renderer,
            watch: None,
            handles: BTreeMap::new(),
            displayed: BTreeMap::new(),
        }
    }

    /// Read-only access to the world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the renderer.
    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable access to the renderer for output outside the event flow.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Caches currently displayed, keyed by the handle the renderer issued.
    pub fn displayed_caches(&self) -> impl Iterator<Item = (CacheHandle, &CachePresentation)> {
        self.displayed
            .values()
            .map(|(handle, presentation)| (*handle, presentation))
    }

    /// Loads the saved session from `store`, or starts a fresh one.
    pub fn start(&mut self, store: &mut dyn SessionStore) -> AnyResult<()> {
        info!("{}", query::welcome_banner(&self.world));
        match store.load_blob()? {
            Some(save) => {
                info!(
                    cells = save.world.cells.len(),
                    coins = save.player.coins,
                    "loaded saved session"
                );
                self.restore(save)
            }
            None => {
                info!("no saved session, starting fresh");
                let center = query::player_cell(&self.world);
                self.regenerate(center)
            }
        }
    }

    /// Replaces the running session with `save`.
    ///
    /// World and player are both restored before anything is presented.
    pub fn restore(&mut self, save: SaveGame) -> AnyResult<()> {
        let mut events = self.pump(Command::ImportWorldState { state: save.world });
        events.extend(self.pump(Command::RestorePlayer { blob: save.player }));
        self.present(&events)
    }

    /// Captures the running session.
    #[must_use]
    pub fn save_game(&self) -> SaveGame {
        query::save_game(&self.world)
    }

    /// Writes the running session to `store`.
    pub fn save(&self, store: &mut dyn SessionStore) -> AnyResult<()> {
        let save = self.save_game();
        store.save_blob(&save)?;
        info!(
            cells = save.world.cells.len(),
            coins = save.player.coins,
            "session saved"
        );
        Ok(())
    }

    /// Stops the geolocation watch and persists the session.
    pub fn shutdown(&mut self, store: &mut dyn SessionStore) -> AnyResult<()> {
        if self.watch.is_some() {
            self.stop_geolocation()?;
        }
        self.save(store)
    }

    /// Redecides and redisplays the neighborhood around `center`.
    pub fn regenerate(&mut self, center: GridCell) -> AnyResult<()> {
        self.dispatch(Command::Regenerate { center })
    }

    /// Moves the player one cell in `direction`.
    ///
    /// Manual movement takes over from an active geolocation watch.
    pub fn move_player(&mut self, direction: Direction) -> AnyResult<()> {
        if self.watch.is_some() {
            self.stop_geolocation()?;
        }
        self.dispatch(Command::MovePlayer { direction })
    }

    /// Handles a collect request coming from a displayed cache.
    pub fn on_collect(&mut self, handle: CacheHandle) -> AnyResult<()> {
        let Some(cell) = self.handles.get(&handle).copied() else {
            return self.reject_unknown(handle);
        };
        self.dispatch(Command::Collect { cell })
    }

    /// Handles a deposit request coming from a displayed cache.
    ///
    /// The amount is parsed before anything reaches the world, so malformed
    /// input never changes state.
    pub fn on_deposit(&mut self, handle: CacheHandle, amount_text: &str) -> AnyResult<()> {
        let Some(cell) = self.handles.get(&handle).copied() else {
            return self.reject_unknown(handle);
        };
        match parse_deposit_amount(amount_text) {
            Ok(amount) => self.dispatch(Command::Deposit { cell, amount }),
            Err(reason) => {
                warn!(%cell, %reason, "deposit input rejected");
                self.renderer
                    .notify(&Notice::DepositRejected { cell, reason })
            }
        }
    }

    fn reject_unknown(&mut self, handle: CacheHandle) -> AnyResult<()> {
        warn!(%handle, "interaction with unknown cache");
        self.renderer.notify(&Notice::UnknownCache { handle })
    }

    /// Subscribes to `source`, replacing any previous watch.
    pub fn start_geolocation(&mut self, source: Box<dyn PositionSource>) -> AnyResult<()> {
        if self.watch.replace(source).is_some() {
            debug!("replaced existing geolocation watch");
        }
        info!("geolocation watch started");
        self.dispatch(Command::SetTrackingMode {
            mode: TrackingMode::Geolocation,
        })
    }

    /// Drops the geolocation watch and returns to manual movement.
    pub fn stop_geolocation(&mut self) -> AnyResult<()> {
        if self.watch.take().is_some() {
            info!("geolocation watch stopped");
        }
        self.dispatch(Command::SetTrackingMode {
            mode: TrackingMode::Manual,
        })
    }

    /// Reports whether a geolocation watch is active.
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    /// Pulls up to `max_fixes` positions from the active watch.
    ///
    /// Each fix is applied as its own relocation. A failing source is dropped
    /// and the session continues in manual mode. Returns the number of fixes
    /// applied.
    pub fn poll_geolocation(&mut self, max_fixes: usize) -> AnyResult<usize> {
        let mut applied = 0;
        while applied < max_fixes {
            let Some(source) = self.watch.as_mut() else {
                break;
            };
            match source.next_fix() {
                Ok(position) => {
                    self.dispatch(Command::RelocatePlayer { position })?;
                    applied += 1;
                }
                Err(reason) => {
                    self.watch = None;
                    self.dispatch(Command::ReportGeolocationFailure { reason })?;
                    break;
                }
            }
        }
        Ok(applied)
    }

    /// Discards all progress and starts over at the configured start.
    pub fn reset(&mut self) -> AnyResult<()> {
        self.dispatch(Command::ResetSession)
    }

    /// Applies `command`, pumps the systems and presents the outcome.
    pub fn dispatch(&mut self, command: Command) -> AnyResult<()> {
        let events = self.pump(command);
        self.present(&events)
    }

    fn pump(&mut self, command: Command) -> Vec<Event> {
        let mut log = Vec::new();
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        for _ in 0..MAX_PUMP_ROUNDS {
            if events.is_empty() {
                break;
            }
            let mut commands = Vec::new();
            self.regeneration
                .handle(&events, &query::spawn_ledger(&self.world), &mut commands);
            log.append(&mut events);

            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }

        if !events.is_empty() {
            warn!(pending = events.len(), "command pump did not settle");
            log.append(&mut events);
        }
        log
    }

    fn present(&mut self, events: &[Event]) -> AnyResult<()> {
        let purse = query::purse(&self.world);
        let mut player_changed = false;

        for event in events {
            match event {
                Event::NeighborhoodCleared => {
                    self.renderer.remove_all()?;
                    self.handles.clear();
                    self.displayed.clear();
                }
                Event::CacheRevealed {
                    cell,
                    bounds,
                    coins,
                } => {
                    let presentation = CachePresentation::new(*cell, *bounds, coins.clone());
                    let handle = self.renderer.show_cache(&presentation)?;
                    let _ = self.handles.insert(handle, *cell);
                    let _ = self.displayed.insert(*cell, (handle, presentation));
                }
                Event::CacheUpdated { cell, coins } => {
                    if let Some((handle, presentation)) = self.displayed.get_mut(cell) {
                        *presentation = presentation.with_coins(coins.clone());
                        self.renderer.update_cache(*handle, presentation)?;
                    }
                }
                Event::PlayerMoved { .. }
                | Event::RegenerationRequested { .. }
                | Event::CoinsCollected { .. }
                | Event::CoinsDeposited { .. }
                | Event::TrackingModeChanged { .. }
                | Event::SessionRestored { .. }
                | Event::SessionReset { .. } => player_changed = true,
                _ => {}
            }

            if let Some(notice) = Notice::from_event(event, purse) {
                self.renderer.notify(&notice)?;
            }
        }

        if player_changed {
            let player = PlayerPresentation::new(
                query::player_position(&self.world),
                purse,
                query::history(&self.world),
                query::tracking_mode(&self.world),
            );
            self.renderer.show_player(&player)?;
        }
        Ok(())
    }
}
