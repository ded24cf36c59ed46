use std::f64::consts::TAU;

use geocoin_core::{GeoCoord, GeolocationError};
use geocoin_runtime::{PositionSource, Unsupported};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{GameConfig, GeolocationSetting};

/// Random walk that stands in for a device sensor.
///
/// Each fix moves the position a fraction of `stride` degrees in a random
/// heading. The walk is fully determined by its seed.
#[derive(Clone, Debug)]
pub(crate) struct SimulatedWalk {
    rng: ChaCha8Rng,
    position: GeoCoord,
    stride: f64,
}

impl SimulatedWalk {
    pub(crate) fn new(seed: u64, start: GeoCoord, stride: f64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            position: start,
            stride,
        }
    }
}

impl PositionSource for SimulatedWalk {
    fn next_fix(&mut self) -> Result<GeoCoord, GeolocationError> {
        let heading = self.rng.gen_range(0.0..TAU);
        let distance = self.rng.gen_range(0.25..=1.0) * self.stride;
        self.position = self
            .position
            .offset(distance * heading.sin(), distance * heading.cos());
        Ok(self.position)
    }
}

/// Builds the position source selected by the configuration.
///
/// A simulated walk starts from `start` and strides roughly one cell per fix.
pub(crate) fn position_source(config: &GameConfig, start: GeoCoord) -> Box<dyn PositionSource> {
    match config.geolocation {
        GeolocationSetting::Simulated => Box::new(SimulatedWalk::new(
            config.walk_seed,
            start,
            config.tile_degrees,
        )),
        GeolocationSetting::Unsupported => Box::new(Unsupported),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixes(seed: u64, count: usize) -> Vec<GeoCoord> {
        let mut walk = SimulatedWalk::new(seed, GeoCoord::new(0.0, 0.0), 1e-4);
        (0..count)
            .map(|_| walk.next_fix().expect("simulated walks never fail"))
            .collect()
    }

    #[test]
    fn same_seed_walks_the_same_path() {
        assert_eq!(fixes(7, 20), fixes(7, 20));
        assert_ne!(fixes(7, 20), fixes(8, 20));
    }

    #[test]
    fn steps_stay_within_the_stride() {
        let path = fixes(3, 50);
        let mut previous = GeoCoord::new(0.0, 0.0);
        for fix in path {
            let distance = (fix.lat() - previous.lat()).hypot(fix.lng() - previous.lng());
            assert!(distance <= 1e-4 + 1e-12);
            assert!(distance >= 0.25e-4 - 1e-12);
            previous = fix;
        }
    }

    #[test]
    fn unsupported_setting_yields_failing_source() {
        let config = GameConfig {
            geolocation: GeolocationSetting::Unsupported,
            ..GameConfig::default()
        };
        let mut source = position_source(&config, config.origin());
        assert_eq!(source.next_fix(), Err(GeolocationError::Unsupported));
    }
}
