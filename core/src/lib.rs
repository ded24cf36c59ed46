#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Geocoin engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query read-only
//! views such as [`SpawnLedger`], and respond exclusively with new command
//! batches.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Geocoin.";

/// Location where a fresh session starts when no configuration overrides it.
pub const DEFAULT_ORIGIN: GeoCoord = GeoCoord::new(36.989_493_795_784_01, -122.062_771_285_485_04);

/// Edge length of a single grid cell measured in degrees.
pub const DEFAULT_TILE_DEGREES: f64 = 1e-4;

/// Chebyshev radius of the window of cells considered around the player.
pub const DEFAULT_NEIGHBORHOOD_SIZE: u32 = 8;

/// Probability that an undecided cell receives a cache.
pub const DEFAULT_SPAWN_PROBABILITY: f64 = 0.1;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Moves the player a single cell in the provided direction.
    MovePlayer {
        /// Direction of travel.
        direction: Direction,
    },
    /// Moves the player to an absolute position reported by a geolocation fix.
    RelocatePlayer {
        /// Position reported by the geolocation source.
        position: GeoCoord,
    },
    /// Requests that the neighborhood around `center` is recomputed.
    Regenerate {
        /// Cell at the center of the window.
        center: GridCell,
    },
    /// Records the outcome of the spawn trial for a cell that was never decided.
    RecordSpawnDecision {
        /// Cell whose trial was resolved.
        cell: GridCell,
        /// Outcome of the trial.
        decision: SpawnDecision,
    },
    /// Recomputes the caches visible within the window around `center`.
    RefreshNeighborhood {
        /// Cell at the center of the window.
        center: GridCell,
        /// Chebyshev radius of the window.
        radius: u32,
    },
    /// Moves every coin from the cache at `cell` into the player's purse.
    Collect {
        /// Cell hosting the cache.
        cell: GridCell,
    },
    /// Moves `amount` coins from the player's purse into the cache at `cell`.
    Deposit {
        /// Cell hosting the cache.
        cell: GridCell,
        /// Number of coins to deposit.
        amount: u32,
    },
    /// Switches between manual movement and geolocation tracking.
    SetTrackingMode {
        /// Mode that should become active.
        mode: TrackingMode,
    },
    /// Reports that the geolocation source failed and manual mode resumes.
    ReportGeolocationFailure {
        /// Reason reported by the source.
        reason: GeolocationError,
    },
    /// Restores the player's position, purse and trail from a persisted blob.
    RestorePlayer {
        /// Persisted player state.
        blob: SessionBlob,
    },
    /// Replaces the stored cache decisions with a persisted snapshot.
    ImportWorldState {
        /// Persisted world state.
        state: WorldStateBlob,
    },
    /// Discards all progress and returns the player to the starting position.
    ResetSession,
}

/// Outcome of a spawn trial for a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnDecision {
    /// The trial succeeded and the cell receives a cache holding `coins` coins.
    Spawn {
        /// Initial number of coins minted into the cache.
        coins: u32,
    },
    /// The trial failed; the cell never holds a cache.
    Barren,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the player moved, either manually or through geolocation.
    PlayerMoved {
        /// Position before the move.
        from: GeoCoord,
        /// Position after the move.
        to: GeoCoord,
        /// Cell containing the new position.
        cell: GridCell,
    },
    /// Announces that a regeneration of the window around `center` was requested.
    RegenerationRequested {
        /// Cell at the center of the window.
        center: GridCell,
    },
    /// Confirms that a cache was created for a previously undecided cell.
    CacheSpawned {
        /// Cell hosting the new cache.
        cell: GridCell,
        /// Number of coins minted into the cache.
        coins: u32,
    },
    /// Confirms that a spawn trial failed and was recorded.
    SpawnTrialFailed {
        /// Cell that stays empty.
        cell: GridCell,
    },
    /// Signals that every previously revealed cache should be removed.
    NeighborhoodCleared,
    /// Reveals a cache that is visible around the player.
    CacheRevealed {
        /// Cell hosting the cache.
        cell: GridCell,
        /// Geographic rectangle covered by the cell.
        bounds: GeoBounds,
        /// Coins currently held by the cache.
        coins: Vec<Coin>,
    },
    /// Reports the new contents of a visible cache after a mutation.
    CacheUpdated {
        /// Cell hosting the cache.
        cell: GridCell,
        /// Coins currently held by the cache.
        coins: Vec<Coin>,
    },
    /// Confirms that coins moved from a cache into the purse.
    CoinsCollected {
        /// Cell hosting the cache.
        cell: GridCell,
        /// Number of coins collected.
        amount: u32,
        /// Purse balance after the transfer.
        purse: u32,
    },
    /// Reports that a collect request was rejected.
    CollectRejected {
        /// Cell targeted by the request.
        cell: GridCell,
        /// Specific reason the request failed.
        reason: CollectError,
    },
    /// Confirms that coins moved from the purse into a cache.
    CoinsDeposited {
        /// Cell hosting the cache.
        cell: GridCell,
        /// Number of coins deposited.
        amount: u32,
        /// Purse balance after the transfer.
        purse: u32,
    },
    /// Reports that a deposit request was rejected.
    DepositRejected {
        /// Cell targeted by the request.
        cell: GridCell,
        /// Specific reason the request failed.
        reason: DepositError,
    },
    /// Announces that the tracking mode changed.
    TrackingModeChanged {
        /// Mode that became active.
        mode: TrackingMode,
    },
    /// Reports that geolocation is unavailable and manual mode is active.
    GeolocationUnavailable {
        /// Reason reported by the source.
        reason: GeolocationError,
    },
    /// Confirms that stored cache decisions were replaced.
    WorldStateImported {
        /// Number of decided cells contained in the imported snapshot.
        cells: usize,
    },
    /// Confirms that the player state was restored from a persisted blob.
    SessionRestored {
        /// Restored position.
        position: GeoCoord,
        /// Cell containing the restored position.
        cell: GridCell,
    },
    /// Confirms that all progress was discarded.
    SessionReset {
        /// Starting position the player returned to.
        position: GeoCoord,
        /// Cell containing the starting position.
        cell: GridCell,
    },
}

/// Input source currently driving the player's position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackingMode {
    /// The player moves one cell at a time through explicit commands.
    Manual,
    /// The player follows fixes delivered by a geolocation source.
    Geolocation,
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward increasing latitude.
    North,
    /// Movement toward increasing longitude.
    East,
    /// Movement toward decreasing latitude.
    South,
    /// Movement toward decreasing longitude.
    West,
}

impl Direction {
    /// Offset of a single step measured in whole cells along the `(i, j)` axes.
    #[must_use]
    pub const fn cell_offset(self) -> (i32, i32) {
        match self {
            Self::North => (1, 0),
            Self::East => (0, 1),
            Self::South => (-1, 0),
            Self::West => (0, -1),
        }
    }
}

/// Geographic coordinate expressed in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoCoord {
    lat: f64,
    lng: f64,
}

impl GeoCoord {
    /// Creates a new coordinate from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Returns the coordinate shifted by the provided deltas.
    #[must_use]
    pub fn offset(self, delta_lat: f64, delta_lng: f64) -> Self {
        Self::new(self.lat + delta_lat, self.lng + delta_lng)
    }

    /// Flat `[lat, lng]` pair used by persisted blobs.
    #[must_use]
    pub const fn to_pair(self) -> [f64; 2] {
        [self.lat, self.lng]
    }

    /// Rebuilds a coordinate from a flat `[lat, lng]` pair.
    #[must_use]
    pub const fn from_pair(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl fmt::Display for GeoCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Axis-aligned geographic rectangle covered by a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    southwest: GeoCoord,
    northeast: GeoCoord,
}

impl GeoBounds {
    /// Creates a rectangle from its southwest and northeast corners.
    #[must_use]
    pub const fn new(southwest: GeoCoord, northeast: GeoCoord) -> Self {
        Self {
            southwest,
            northeast,
        }
    }

    /// Corner with the smallest latitude and longitude.
    #[must_use]
    pub const fn southwest(&self) -> GeoCoord {
        self.southwest
    }

    /// Corner with the largest latitude and longitude.
    #[must_use]
    pub const fn northeast(&self) -> GeoCoord {
        self.northeast
    }
}

/// Integer coordinates addressing a single cell of the infinite grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    i: i32,
    j: i32,
}

impl GridCell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// Index along the latitude axis.
    #[must_use]
    pub const fn i(&self) -> i32 {
        self.i
    }

    /// Index along the longitude axis.
    #[must_use]
    pub const fn j(&self) -> i32 {
        self.j
    }

    /// Stable textual key used to derive deterministic values for the cell.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{},{}", self.i, self.j)
    }

    /// Computes the Chebyshev distance between two cells.
    #[must_use]
    pub const fn chebyshev_distance(self, other: GridCell) -> u32 {
        let di = self.i.abs_diff(other.i);
        let dj = self.j.abs_diff(other.j);
        if di > dj {
            di
        } else {
            dj
        }
    }

    /// Iterates the square window of cells within `radius` of this cell.
    ///
    /// Cells are yielded row by row, starting from the smallest `i` and the
    /// smallest `j`, so the window has side `2 * radius + 1`.
    pub fn neighborhood(self, radius: u32) -> impl Iterator<Item = GridCell> {
        let radius = i32::try_from(radius).unwrap_or(i32::MAX);
        let columns = self.j.saturating_sub(radius)..=self.j.saturating_add(radius);
        (self.i.saturating_sub(radius)..=self.i.saturating_add(radius))
            .flat_map(move |i| columns.clone().map(move |j| GridCell::new(i, j)))
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

/// Maps between grid cells and geographic coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    origin: GeoCoord,
    tile_degrees: f64,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::new(DEFAULT_ORIGIN, DEFAULT_TILE_DEGREES)
    }
}

impl GridSpec {
    /// Creates a grid anchored at `origin` with square cells of `tile_degrees`.
    #[must_use]
    pub const fn new(origin: GeoCoord, tile_degrees: f64) -> Self {
        Self {
            origin,
            tile_degrees,
        }
    }

    /// Geographic position of cell `(0, 0)`.
    #[must_use]
    pub const fn origin(&self) -> GeoCoord {
        self.origin
    }

    /// Edge length of a cell in degrees.
    #[must_use]
    pub const fn tile_degrees(&self) -> f64 {
        self.tile_degrees
    }

    /// Cell whose origin corner lies nearest to `position`.
    #[must_use]
    pub fn cell_containing(&self, position: GeoCoord) -> GridCell {
        GridCell::new(
            self.axis_index(position.lat() - self.origin.lat()),
            self.axis_index(position.lng() - self.origin.lng()),
        )
    }

    /// Origin corner of `cell`, the southwest corner of its bounds.
    #[must_use]
    pub fn corner_of(&self, cell: GridCell) -> GeoCoord {
        self.origin.offset(
            f64::from(cell.i()) * self.tile_degrees,
            f64::from(cell.j()) * self.tile_degrees,
        )
    }

    /// Rectangle covered by `cell`.
    #[must_use]
    pub fn bounds_of(&self, cell: GridCell) -> GeoBounds {
        let southwest = self.corner_of(cell);
        GeoBounds::new(
            southwest,
            southwest.offset(self.tile_degrees, self.tile_degrees),
        )
    }

    fn axis_index(&self, delta: f64) -> i32 {
        if self.tile_degrees <= 0.0 || !self.tile_degrees.is_finite() {
            return 0;
        }
        // `as` saturates for out-of-range floats and maps NaN to zero.
        (delta / self.tile_degrees).round() as i32
    }
}

/// Stable handle allocated by the cell registry for a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u32);

impl CellId {
    /// Creates a new cell identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// A single coin, identified by the cell that minted it and a serial number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coin {
    cell: GridCell,
    serial: u32,
}

impl Coin {
    /// Creates a coin minted by `cell` with the provided serial.
    #[must_use]
    pub const fn new(cell: GridCell, serial: u32) -> Self {
        Self { cell, serial }
    }

    /// Cell whose cache minted the coin.
    #[must_use]
    pub const fn cell(&self) -> GridCell {
        self.cell
    }

    /// Serial number, unique within the minting cache only.
    #[must_use]
    pub const fn serial(&self) -> u32 {
        self.serial
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.cell.i(), self.cell.j(), self.serial)
    }
}

/// Persisted contents of a single cache.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    coins: Vec<Coin>,
    next_serial: u32,
}

impl CacheSnapshot {
    /// Creates a snapshot from its coins and the next serial to mint.
    #[must_use]
    pub fn from_parts(coins: Vec<Coin>, next_serial: u32) -> Self {
        Self { coins, next_serial }
    }

    /// Coins held by the cache in display order.
    #[must_use]
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Number of coins held by the cache.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coins.len()
    }

    /// Reports whether the cache holds no coins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Serial assigned to the next coin minted by the cache.
    #[must_use]
    pub const fn next_serial(&self) -> u32 {
        self.next_serial
    }
}

/// Flat persisted form of the player's session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionBlob {
    /// Current position as `[lat, lng]`.
    pub position: [f64; 2],
    /// Number of coins in the purse.
    pub coins: u32,
    /// Visited positions as `[lat, lng]` pairs, oldest first.
    pub history: Vec<[f64; 2]>,
}

/// Persisted spawn decision for a single cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellRecord {
    /// The cell hosts a cache with the provided contents.
    Cache(CacheSnapshot),
    /// The cell's spawn trial failed.
    Barren,
}

/// Persisted decision keyed by grid coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellEntry {
    /// Cell the decision belongs to.
    pub cell: GridCell,
    /// Recorded decision.
    pub record: CellRecord,
}

/// Serializable export of every recorded spawn decision.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldStateBlob {
    /// Decided cells in ascending grid order.
    pub cells: Vec<CellEntry>,
}

/// Complete persisted game: the player blob plus the world state export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveGame {
    /// Persisted player state.
    pub player: SessionBlob,
    /// Persisted cache decisions.
    pub world: WorldStateBlob,
}

/// Read-only access to recorded spawn decisions consumed by systems.
pub trait SpawnLedger {
    /// Reports whether a spawn decision was already recorded for `cell`.
    fn is_decided(&self, cell: GridCell) -> bool;
}

/// Reasons a collect request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum CollectError {
    /// No cache is currently open at the requested cell.
    #[error("there is no cache open at this cell")]
    CacheNotVisible,
    /// The cache holds no coins.
    #[error("this cache is empty")]
    CacheEmpty,
    /// The purse cannot hold the collected coins.
    #[error("your purse cannot hold that many coins")]
    PurseOverflow,
}

/// Reasons a deposit request may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum DepositError {
    /// The provided amount could not be parsed as a whole number.
    #[error("'{input}' is not a whole number of coins")]
    NotANumber {
        /// Raw text supplied by the player.
        input: String,
    },
    /// The amount was zero or negative.
    #[error("deposit a positive number of coins")]
    NonPositiveAmount,
    /// The amount exceeds the largest representable deposit.
    #[error("that amount is too large")]
    AmountTooLarge,
    /// The purse holds fewer coins than requested.
    #[error("you only have {available} coins but tried to deposit {requested}")]
    InsufficientCoins {
        /// Number of coins requested.
        requested: u32,
        /// Number of coins available in the purse.
        available: u32,
    },
    /// No cache is currently open at the requested cell.
    #[error("there is no cache open at this cell")]
    CacheNotVisible,
    /// The cache cannot mint any more coin serials.
    #[error("this cache cannot hold any more coins")]
    CacheFull,
}

/// Reasons a geolocation source may stop delivering fixes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum GeolocationError {
    /// The host offers no geolocation capability.
    #[error("geolocation is not supported here")]
    Unsupported,
    /// The player declined to share their location.
    #[error("permission to read the location was denied")]
    PermissionDenied,
    /// The source stopped producing fixes.
    #[error("the location signal was lost")]
    SignalLost,
}

/// Parses a deposit amount typed by the player.
///
/// Accepts surrounding whitespace and rejects anything that is not a positive
/// whole number without touching any state.
pub fn parse_deposit_amount(input: &str) -> Result<u32, DepositError> {
    let trimmed = input.trim();
    let value = trimmed
        .parse::<i64>()
        .map_err(|_| DepositError::NotANumber {
            input: trimmed.to_owned(),
        })?;
    if value <= 0 {
        return Err(DepositError::NonPositiveAmount);
    }
    u32::try_from(value).map_err(|_| DepositError::AmountTooLarge)
}

#[cfg(test)]
mod tests {
    use super::{
        parse_deposit_amount, CacheSnapshot, CellEntry, CellRecord, Coin, DepositError, Direction,
        GeoCoord, GridCell, GridSpec, SessionBlob, WorldStateBlob,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn chebyshev_distance_matches_expectation() {
        let origin = GridCell::new(1, 1);
        let destination = GridCell::new(4, -3);
        assert_eq!(origin.chebyshev_distance(destination), 4);
        assert_eq!(destination.chebyshev_distance(origin), 4);
    }

    #[test]
    fn neighborhood_covers_square_window_in_row_order() {
        let cells: Vec<GridCell> = GridCell::new(0, 0).neighborhood(1).collect();
        assert_eq!(cells.len(), 9);
        assert_eq!(cells.first(), Some(&GridCell::new(-1, -1)));
        assert_eq!(cells.get(1), Some(&GridCell::new(-1, 0)));
        assert_eq!(cells.last(), Some(&GridCell::new(1, 1)));
        assert!(cells
            .iter()
            .all(|cell| cell.chebyshev_distance(GridCell::new(0, 0)) <= 1));
    }

    #[test]
    fn neighborhood_with_zero_radius_is_center_only() {
        let cells: Vec<GridCell> = GridCell::new(7, -2).neighborhood(0).collect();
        assert_eq!(cells, vec![GridCell::new(7, -2)]);
    }

    #[test]
    fn corner_round_trips_through_cell_containing() {
        let grid = GridSpec::default();
        for i in -20..=20 {
            for j in [-1_000, -3, 0, 5, 12_345] {
                let cell = GridCell::new(i, j);
                assert_eq!(grid.cell_containing(grid.corner_of(cell)), cell);
            }
        }
    }

    #[test]
    fn bounds_span_a_single_tile() {
        let grid = GridSpec::new(GeoCoord::new(10.0, 20.0), 0.5);
        let bounds = grid.bounds_of(GridCell::new(2, -1));
        assert_eq!(bounds.southwest(), GeoCoord::new(11.0, 19.5));
        assert_eq!(bounds.northeast(), GeoCoord::new(11.5, 20.0));
    }

    #[test]
    fn cell_containing_rounds_to_nearest_corner() {
        let grid = GridSpec::new(GeoCoord::new(0.0, 0.0), 1.0);
        assert_eq!(
            grid.cell_containing(GeoCoord::new(2.4, -0.6)),
            GridCell::new(2, -1)
        );
    }

    #[test]
    fn cell_offsets_move_along_one_axis() {
        assert_eq!(Direction::North.cell_offset(), (1, 0));
        assert_eq!(Direction::South.cell_offset(), (-1, 0));
        assert_eq!(Direction::East.cell_offset(), (0, 1));
        assert_eq!(Direction::West.cell_offset(), (0, -1));
    }

    #[test]
    fn coin_displays_origin_and_serial() {
        let coin = Coin::new(GridCell::new(369_894, -1_220_627), 3);
        assert_eq!(coin.to_string(), "369894:-1220627#3");
    }

    #[test]
    fn deposit_amount_parsing_rejects_invalid_input() {
        assert_eq!(parse_deposit_amount(" 3 "), Ok(3));
        assert_eq!(
            parse_deposit_amount("three"),
            Err(DepositError::NotANumber {
                input: "three".to_owned()
            })
        );
        assert_eq!(parse_deposit_amount("2.5").ok(), None);
        assert_eq!(
            parse_deposit_amount("0"),
            Err(DepositError::NonPositiveAmount)
        );
        assert_eq!(
            parse_deposit_amount("-4"),
            Err(DepositError::NonPositiveAmount)
        );
        assert_eq!(
            parse_deposit_amount("99999999999"),
            Err(DepositError::AmountTooLarge)
        );
    }

    #[test]
    fn session_blob_round_trips_through_bincode() {
        let blob = SessionBlob {
            position: [36.9895, -122.0628],
            coins: 12,
            history: vec![[36.9895, -122.0628], [36.9896, -122.0628]],
        };
        assert_round_trip(&blob);
    }

    #[test]
    fn world_state_blob_round_trips_through_bincode() {
        let cell = GridCell::new(4, -9);
        let state = WorldStateBlob {
            cells: vec![
                CellEntry {
                    cell,
                    record: CellRecord::Cache(CacheSnapshot::from_parts(
                        vec![Coin::new(cell, 0), Coin::new(GridCell::new(1, 1), 7)],
                        1,
                    )),
                },
                CellEntry {
                    cell: GridCell::new(5, -9),
                    record: CellRecord::Barren,
                },
            ],
        };
        assert_round_trip(&state);
    }
}
