//! # Coordinate Obfuscator
//!
//! Corners whose hosts opted into approximate visibility never expose their
//! true position. Instead of a stateful RNG, the jitter is derived from a
//! SHA-256 digest of the corner's id: the first two digest bytes become
//! signed unit factors for latitude and longitude, scaled by a fixed radius.
//!
//! Same id + same true coordinate ⇒ byte-identical output on every call, so
//! pins stay put across map pans and the engine remains parallel-safe with
//! no process-wide seed.
use sha2::{Digest, Sha256};

use crate::{
    geo::{meters_to_degrees_latitude, meters_to_degrees_longitude},
    models::{Coordinate, Visibility},
};

/// Maximum per-axis deviation of a displayed coordinate from the true one.
pub const OBFUSCATION_RADIUS_METERS: f64 = 150.0;

/// Coordinate actually returned to clients, computed once per corner per
/// query and discarded after response assembly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayCoordinate {
    pub coordinate: Coordinate,
    pub approximate: bool,
}

/// Resolves the coordinate a corner is displayed at. Exact corners pass
/// through untouched, no hashing performed.
pub fn display_coordinate(
    id: &str,
    true_coordinate: Coordinate,
    visibility: Visibility,
) -> DisplayCoordinate {
    match visibility {
        Visibility::Exact => DisplayCoordinate {
            coordinate: true_coordinate,
            approximate: false,
        },
        Visibility::Approximate => DisplayCoordinate {
            coordinate: jitter(id, true_coordinate),
            approximate: true,
        },
    }
}

fn jitter(id: &str, coordinate: Coordinate) -> Coordinate {
    let digest = Sha256::digest(id.as_bytes());
    let lat_factor = signed_unit(digest[0]);
    let lon_factor = signed_unit(digest[1]);

    Coordinate {
        latitude: coordinate.latitude
            + lat_factor * meters_to_degrees_latitude(OBFUSCATION_RADIUS_METERS),
        longitude: coordinate.longitude
            + lon_factor
                * meters_to_degrees_longitude(OBFUSCATION_RADIUS_METERS, coordinate.latitude),
    }
}

/// Maps a byte onto [-1, 1].
fn signed_unit(byte: u8) -> f64 {
    byte as f64 / 255.0 * 2.0 - 1.0
}
