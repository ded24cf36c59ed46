//! Sources of device positions.

use geocoin_core::{GeoCoord, GeolocationError};

/// Stream of position fixes delivered by the host.
///
/// Sources are pulled lazily and cannot be restarted; once a source reports an
/// error it is dropped by the runtime.
pub trait PositionSource {
    /// Waits for the next position fix.
    fn next_fix(&mut self) -> Result<GeoCoord, GeolocationError>;
}

/// Source used on hosts without any geolocation capability.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unsupported;

impl PositionSource for Unsupported {
    fn next_fix(&mut self) -> Result<GeoCoord, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}
