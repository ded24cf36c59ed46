use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use geocoin_core::{
    GeoCoord, GridSpec, DEFAULT_NEIGHBORHOOD_SIZE, DEFAULT_ORIGIN, DEFAULT_SPAWN_PROBABILITY,
    DEFAULT_TILE_DEGREES,
};
use geocoin_system_regeneration as regeneration;
use geocoin_world as world;
use serde::Deserialize;

const DEFAULT_SAVE_PATH: &str = "geocoin-save.json";
const DEFAULT_WALK_SEED: u64 = 0x6765_6f63_6f69_6e;
/// Largest accepted neighborhood radius; every move walks `(2r + 1)^2` cells.
const MAX_NEIGHBORHOOD_SIZE: u32 = 64;

/// Source of position fixes used when the player enables geolocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum GeolocationSetting {
    /// A seeded random walk stands in for a device sensor.
    #[default]
    Simulated,
    /// The host reports that geolocation is not supported.
    Unsupported,
}

/// Game settings read from a TOML file; every field is optional.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    /// Latitude and longitude of cell `(0, 0)` and of the starting position.
    pub(crate) origin: [f64; 2],
    /// Edge length of a grid cell in degrees.
    pub(crate) tile_degrees: f64,
    /// Chebyshev radius of the regenerated neighborhood.
    pub(crate) neighborhood_size: u32,
    /// Probability that a cell receives a cache.
    pub(crate) spawn_probability: f64,
    /// Position source used by `gps on`.
    pub(crate) geolocation: GeolocationSetting,
    /// Seed of the simulated walk.
    pub(crate) walk_seed: u64,
    /// File the session is saved to.
    pub(crate) save_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_pair(),
            tile_degrees: DEFAULT_TILE_DEGREES,
            neighborhood_size: DEFAULT_NEIGHBORHOOD_SIZE,
            spawn_probability: DEFAULT_SPAWN_PROBABILITY,
            geolocation: GeolocationSetting::default(),
            walk_seed: DEFAULT_WALK_SEED,
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
        }
    }
}

impl GameConfig {
    /// Loads the configuration at `path`, or the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse config toml")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.tile_degrees.is_finite() && self.tile_degrees > 0.0) {
            bail!("tile_degrees must be a positive number, got {}", self.tile_degrees);
        }
        if self.neighborhood_size > MAX_NEIGHBORHOOD_SIZE {
            bail!(
                "neighborhood_size must be at most {MAX_NEIGHBORHOOD_SIZE}, got {}",
                self.neighborhood_size
            );
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            bail!(
                "spawn_probability must lie within 0..=1, got {}",
                self.spawn_probability
            );
        }
        let [lat, lng] = self.origin;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            bail!("origin {lat}, {lng} is not a valid coordinate");
        }
        Ok(())
    }

    pub(crate) fn origin(&self) -> GeoCoord {
        GeoCoord::from_pair(self.origin)
    }

    pub(crate) fn world(&self) -> world::Config {
        world::Config::new(GridSpec::new(self.origin(), self.tile_degrees), self.origin())
    }

    pub(crate) fn regeneration(&self) -> regeneration::Config {
        regeneration::Config::new(self.neighborhood_size, self.spawn_probability)
    }
}
