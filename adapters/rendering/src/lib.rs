#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Geocoin adapters.
//!
//! Renderers receive fully prepared presentations and never touch the world.
//! Geographic coordinates are mapped onto planar vectors with `x = lng` and
//! `y = lat`, so map backends can consume them without further conversion.

use std::fmt;

use anyhow::Result as AnyResult;
use geocoin_core::{
    Coin, CollectError, DepositError, Event, GeoBounds, GeoCoord, GeolocationError, GridCell,
    TrackingMode,
};
use glam::DVec2;

/// Converts a geographic coordinate into the planar form used by presentations.
#[must_use]
pub fn to_planar(coord: GeoCoord) -> DVec2 {
    DVec2::new(coord.lng(), coord.lat())
}

/// Opaque identifier a renderer hands out for every cache it displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheHandle(u64);

impl CacheHandle {
    /// Wraps a renderer-specific identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CacheHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rectangle and contents of a revealed cache.
#[derive(Clone, Debug, PartialEq)]
pub struct CachePresentation {
    /// Cell hosting the cache.
    pub cell: GridCell,
    /// Southwest corner in planar coordinates.
    pub southwest: DVec2,
    /// Northeast corner in planar coordinates.
    pub northeast: DVec2,
    /// Coins currently held, in display order.
    pub coins: Vec<Coin>,
}

impl CachePresentation {
    /// Builds a presentation for the cache covering `bounds`.
    #[must_use]
    pub fn new(cell: GridCell, bounds: GeoBounds, coins: Vec<Coin>) -> Self {
        Self {
            cell,
            southwest: to_planar(bounds.southwest()),
            northeast: to_planar(bounds.northeast()),
            coins,
        }
    }

    /// Returns a copy showing different contents inside the same rectangle.
    #[must_use]
    pub fn with_coins(&self, coins: Vec<Coin>) -> Self {
        Self {
            coins,
            ..self.clone()
        }
    }

    /// Midpoint of the cache rectangle.
    #[must_use]
    pub fn midpoint(&self) -> DVec2 {
        (self.southwest + self.northeast) * 0.5
    }

    /// Number of coins in the cache.
    #[must_use]
    pub fn coin_count(&self) -> usize {
        self.coins.len()
    }

    /// One-line description used in popups and listings.
    #[must_use]
    pub fn summary(&self) -> String {
        match self.coins.len() {
            0 => format!("Cache {} is empty", self.cell),
            1 => format!("Cache {} holds 1 coin", self.cell),
            count => format!("Cache {} holds {count} coins", self.cell),
        }
    }
}

/// Marker and status line describing the player.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Current position in planar coordinates.
    pub position: DVec2,
    /// Coins carried by the player.
    pub purse: u32,
    /// Positions visited so far, oldest first.
    pub trail: Vec<DVec2>,
    /// Input source currently driving the marker.
    pub tracking: TrackingMode,
}

impl PlayerPresentation {
    /// Builds a presentation from world-side values.
    #[must_use]
    pub fn new(position: GeoCoord, purse: u32, trail: &[GeoCoord], tracking: TrackingMode) -> Self {
        Self {
            position: to_planar(position),
            purse,
            trail: trail.iter().copied().map(to_planar).collect(),
            tracking,
        }
    }

    /// Status line shown next to the map.
    #[must_use]
    pub fn status(&self) -> String {
        match self.purse {
            0 => "No coins yet...".to_owned(),
            1 => "Player has 1 coin".to_owned(),
            purse => format!("Player has {purse} coins"),
        }
    }
}

/// Short message surfaced to the player after an interaction.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    /// Coins were moved from a cache into the purse.
    Collected {
        /// Cache the coins came from.
        cell: GridCell,
        /// Number of coins collected.
        amount: u32,
        /// Purse balance afterwards.
        purse: u32,
    },
    /// Coins were moved from the purse into a cache.
    Deposited {
        /// Cache that received the coins.
        cell: GridCell,
        /// Number of coins deposited.
        amount: u32,
        /// Purse balance afterwards.
        purse: u32,
    },
    /// A collection was refused.
    CollectRejected {
        /// Cache the player tried to empty.
        cell: GridCell,
        /// Why the collection was refused.
        reason: CollectError,
    },
    /// A deposit was refused, either by input validation or by the world.
    DepositRejected {
        /// Cache the player tried to fill.
        cell: GridCell,
        /// Why the deposit was refused.
        reason: DepositError,
    },
    /// Position updates now come from a different source.
    TrackingChanged {
        /// Newly active source.
        mode: TrackingMode,
    },
    /// Geolocation stopped working; the session continues manually.
    GeolocationUnavailable {
        /// Failure reported by the position source.
        reason: GeolocationError,
    },
    /// A saved session was loaded.
    SessionRestored {
        /// Purse balance after restoring.
        purse: u32,
    },
    /// All progress was discarded.
    SessionReset,
    /// The interaction referred to a cache that is no longer displayed.
    UnknownCache {
        /// Handle supplied by the front end.
        handle: CacheHandle,
    },
}

impl Notice {
    /// Translates a world event into a player-facing notice, if it warrants one.
    ///
    /// `purse` is the current balance, used for events that do not carry it.
    #[must_use]
    pub fn from_event(event: &Event, purse: u32) -> Option<Self> {
        let notice = match event {
            Event::CoinsCollected {
                cell,
                amount,
                purse,
            } => Self::Collected {
                cell: *cell,
                amount: *amount,
                purse: *purse,
            },
            Event::CoinsDeposited {
                cell,
                amount,
                purse,
            } => Self::Deposited {
                cell: *cell,
                amount: *amount,
                purse: *purse,
            },
            Event::CollectRejected { cell, reason } => Self::CollectRejected {
                cell: *cell,
                reason: *reason,
            },
            Event::DepositRejected { cell, reason } => Self::DepositRejected {
                cell: *cell,
                reason: reason.clone(),
            },
            Event::TrackingModeChanged { mode } => Self::TrackingChanged { mode: *mode },
            Event::GeolocationUnavailable { reason } => {
                Self::GeolocationUnavailable { reason: *reason }
            }
            Event::SessionRestored { .. } => Self::SessionRestored { purse },
            Event::SessionReset { .. } => Self::SessionReset,
            _ => return None,
        };
        Some(notice)
    }

    /// Reports whether the notice describes a refused action.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::CollectRejected { .. }
                | Self::DepositRejected { .. }
                | Self::GeolocationUnavailable { .. }
                | Self::UnknownCache { .. }
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collected {
                cell,
                amount,
                purse,
            } => write!(f, "Collected {amount} from {cell}; purse now {purse}"),
            Self::Deposited {
                cell,
                amount,
                purse,
            } => write!(f, "Deposited {amount} into {cell}; purse now {purse}"),
            Self::CollectRejected { cell, reason } => {
                write!(f, "Cannot collect from {cell}: {reason}")
            }
            Self::DepositRejected { cell, reason } => {
                write!(f, "Cannot deposit into {cell}: {reason}")
            }
            Self::TrackingChanged { mode } => match mode {
                TrackingMode::Manual => f.write_str("Manual movement enabled"),
                TrackingMode::Geolocation => f.write_str("Following device location"),
            },
            Self::GeolocationUnavailable { reason } => {
                write!(f, "Geolocation unavailable ({reason}); switched to manual movement")
            }
            Self::SessionRestored { purse } => {
                write!(f, "Welcome back! You carry {purse} coins")
            }
            Self::SessionReset => f.write_str("Session reset; all caches regenerate"),
            Self::UnknownCache { handle } => write!(f, "Cache {handle} is no longer on the map"),
        }
    }
}

/// Display surface capable of presenting Geocoin sessions.
///
/// Implementations only draw what they are given; all state lives in the
/// world.
pub trait Renderer {
    /// Draws a newly revealed cache and returns the handle interactions refer to.
    fn show_cache(&mut self, cache: &CachePresentation) -> AnyResult<CacheHandle>;

    /// Redraws a cache whose contents changed.
    fn update_cache(&mut self, handle: CacheHandle, cache: &CachePresentation) -> AnyResult<()>;

    /// Removes every cache rendering.
    fn remove_all(&mut self) -> AnyResult<()>;

    /// Moves the player marker and refreshes the status line.
    fn show_player(&mut self, player: &PlayerPresentation) -> AnyResult<()>;

    /// Surfaces a short message to the player.
    fn notify(&mut self, notice: &Notice) -> AnyResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> GeoBounds {
        GeoBounds::new(GeoCoord::new(1.0, 2.0), GeoCoord::new(1.5, 2.5))
    }

    #[test]
    fn presentations_map_longitude_to_x() {
        let cache = CachePresentation::new(GridCell::new(2, 4), bounds(), Vec::new());
        assert_eq!(cache.southwest, DVec2::new(2.0, 1.0));
        assert_eq!(cache.northeast, DVec2::new(2.5, 1.5));
        assert_eq!(cache.midpoint(), DVec2::new(2.25, 1.25));
    }

    #[test]
    fn cache_summary_counts_coins() {
        let cell = GridCell::new(1, -1);
        let empty = CachePresentation::new(cell, bounds(), Vec::new());
        assert_eq!(empty.summary(), "Cache (1, -1) is empty");

        let full = empty.with_coins(vec![Coin::new(cell, 0), Coin::new(cell, 1)]);
        assert_eq!(full.summary(), "Cache (1, -1) holds 2 coins");
        assert_eq!(full.southwest, empty.southwest);
    }

    #[test]
    fn player_status_reflects_purse() {
        let trail = [GeoCoord::new(0.0, 0.0), GeoCoord::new(0.0, 1.0)];
        let player = PlayerPresentation::new(trail[1], 0, &trail, TrackingMode::Manual);
        assert_eq!(player.status(), "No coins yet...");
        assert_eq!(player.trail, vec![DVec2::ZERO, DVec2::new(1.0, 0.0)]);

        let rich = PlayerPresentation {
            purse: 12,
            ..player
        };
        assert_eq!(rich.status(), "Player has 12 coins");
    }

    #[test]
    fn rejections_become_notices() {
        let cell = GridCell::new(0, 0);
        let notice = Notice::from_event(
            &Event::CollectRejected {
                cell,
                reason: CollectError::CacheEmpty,
            },
            3,
        )
        .expect("rejections are surfaced");
        assert!(notice.is_rejection());
        assert!(notice.to_string().starts_with("Cannot collect from (0, 0)"));
    }

    #[test]
    fn bookkeeping_events_are_silent() {
        assert!(Notice::from_event(&Event::NeighborhoodCleared, 0).is_none());
        assert!(Notice::from_event(
            &Event::SpawnTrialFailed {
                cell: GridCell::new(0, 0)
            },
            0
        )
        .is_none());
    }

    #[test]
    fn restored_notice_uses_current_purse() {
        let notice = Notice::from_event(
            &Event::SessionRestored {
                position: GeoCoord::new(0.0, 0.0),
                cell: GridCell::new(0, 0),
            },
            7,
        );
        assert_eq!(notice, Some(Notice::SessionRestored { purse: 7 }));
    }
}
