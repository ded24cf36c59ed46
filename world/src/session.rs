//! Player position, purse and trail.

use geocoin_core::{GeoCoord, SessionBlob, TrackingMode};

/// State owned by the single player of a session.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PlayerSession {
    position: GeoCoord,
    purse: u32,
    history: Vec<GeoCoord>,
    tracking: TrackingMode,
}

impl PlayerSession {
    /// Creates a session standing at `start` with an empty purse.
    pub(crate) fn new(start: GeoCoord) -> Self {
        Self {
            position: start,
            purse: 0,
            history: vec![start],
            tracking: TrackingMode::Manual,
        }
    }

    pub(crate) const fn position(&self) -> GeoCoord {
        self.position
    }

    pub(crate) const fn purse(&self) -> u32 {
        self.purse
    }

    pub(crate) fn history(&self) -> &[GeoCoord] {
        &self.history
    }

    pub(crate) const fn tracking(&self) -> TrackingMode {
        self.tracking
    }

    pub(crate) fn set_tracking(&mut self, mode: TrackingMode) -> bool {
        let changed = self.tracking != mode;
        self.tracking = mode;
        changed
    }

    /// Moves to `position`, appending it to the trail and returning the old position.
    pub(crate) fn move_to(&mut self, position: GeoCoord) -> GeoCoord {
        let previous = self.position;
        self.position = position;
        self.history.push(position);
        previous
    }

    /// Reports whether `amount` more coins fit into the purse.
    pub(crate) const fn can_credit(&self, amount: u32) -> bool {
        self.purse.checked_add(amount).is_some()
    }

    /// Adds coins to the purse, returning the new balance.
    pub(crate) fn credit(&mut self, amount: u32) -> u32 {
        self.purse = self.purse.saturating_add(amount);
        self.purse
    }

    /// Removes coins from the purse, returning the new balance.
    pub(crate) fn debit(&mut self, amount: u32) -> u32 {
        self.purse = self.purse.saturating_sub(amount);
        self.purse
    }

    /// Replaces position, purse and trail with the persisted values.
    ///
    /// The trail is taken verbatim, even when empty. The tracking mode is a
    /// property of the running session and is kept.
    pub(crate) fn restore(&mut self, blob: &SessionBlob) {
        self.position = GeoCoord::from_pair(blob.position);
        self.purse = blob.coins;
        self.history = blob.history.iter().copied().map(GeoCoord::from_pair).collect();
    }

    /// Discards all progress and returns to `start`.
    pub(crate) fn reset(&mut self, start: GeoCoord) {
        self.position = start;
        self.purse = 0;
        self.history = vec![start];
    }

    pub(crate) fn to_blob(&self) -> SessionBlob {
        SessionBlob {
            position: self.position.to_pair(),
            coins: self.purse,
            history: self.history.iter().map(|coord| coord.to_pair()).collect(),
        }
    }
}
