#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic luck derived from string keys.
//!
//! Every value is a pure function of its key: no seed, no shared state, and
//! identical output across processes and platforms. World generation draws all
//! of its randomness from here so the same cell always rolls the same way.

use geocoin_core::GridCell;
use sha2::{Digest, Sha256};

/// Suffix appended to a cell key when drawing the initial coin count.
pub const INITIAL_VALUE_LABEL: &str = "initialValue";

/// Upper bound of the initial coin count minted into a new cache.
pub const MAX_INITIAL_COINS: u32 = 10;

const MANTISSA_BITS: u32 = 53;

/// Maps `key` to a reproducible value in `[0, 1)`.
#[must_use]
pub fn luck(key: &str) -> f64 {
    let digest = Sha256::digest(key.as_bytes());
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    let bits = u64::from_le_bytes(bytes) >> (64 - MANTISSA_BITS);
    bits as f64 / (1_u64 << MANTISSA_BITS) as f64
}

/// Runs the Bernoulli spawn trial for `cell`.
#[must_use]
pub fn spawn_trial(cell: GridCell, probability: f64) -> bool {
    luck(&cell.key()) < probability
}

/// Draws the number of coins a freshly spawned cache in `cell` starts with.
///
/// The result always lies in `1..=MAX_INITIAL_COINS`.
#[must_use]
pub fn initial_coin_count(cell: GridCell) -> u32 {
    let key = format!("{},{INITIAL_VALUE_LABEL}", cell.key());
    let scaled = (luck(&key) * f64::from(MAX_INITIAL_COINS)).floor() as u32;
    scaled.min(MAX_INITIAL_COINS - 1) + 1
}
