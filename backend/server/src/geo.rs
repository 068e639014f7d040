//! # Geodesic Math
//!
//! Haversine distances, meters↔degrees conversions and bounding-box
//! arithmetic for the map engine.
//!
//! Longitude logic is antimeridian-aware throughout: a box with
//! `east < west` wraps around ±180° and containment/clamping switch to the
//! two-branch form instead of a plain interval test.
use crate::models::{BoundingBox, Coordinate};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

const METERS_PER_DEGREE_LATITUDE: f64 = 111_320.0;

/// Great-circle distance in kilometers between two WGS84 points.
pub fn haversine_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

pub fn meters_to_degrees_latitude(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE_LATITUDE
}

/// Longitude degrees shrink with latitude; the divisor is floored at 1 so the
/// conversion stays finite at the poles.
pub fn meters_to_degrees_longitude(meters: f64, at_latitude: f64) -> f64 {
    meters / (METERS_PER_DEGREE_LATITUDE * at_latitude.to_radians().cos()).max(1.0)
}

/// Grows a box symmetrically by `padding_meters`, clamped to the legal
/// coordinate ranges. The longitude delta is evaluated at the box's vertical
/// center. No-op for padding ≤ 0.
pub fn expand_bounding_box(bbox: BoundingBox, padding_meters: f64) -> BoundingBox {
    if padding_meters <= 0.0 {
        return bbox;
    }

    let lat_delta = meters_to_degrees_latitude(padding_meters);
    let center_latitude = (bbox.north + bbox.south) / 2.0;
    let lon_delta = meters_to_degrees_longitude(padding_meters, center_latitude);

    BoundingBox {
        north: (bbox.north + lat_delta).min(90.0),
        south: (bbox.south - lat_delta).max(-90.0),
        east: (bbox.east + lon_delta).min(180.0),
        west: (bbox.west - lon_delta).max(-180.0),
    }
}

pub fn is_within_bounding_box(point: Coordinate, bbox: &BoundingBox) -> bool {
    if point.latitude < bbox.south || point.latitude > bbox.north {
        return false;
    }

    if bbox.east >= bbox.west {
        point.longitude >= bbox.west && point.longitude <= bbox.east
    } else {
        point.longitude >= bbox.west || point.longitude <= bbox.east
    }
}

/// Pulls a point into the box. For an antimeridian-crossing box a point in
/// the excluded wedge snaps to whichever boundary is nearer in absolute
/// degrees.
pub fn clamp_point_to_bounding_box(point: Coordinate, bbox: &BoundingBox) -> Coordinate {
    let latitude = point.latitude.clamp(bbox.south, bbox.north);

    let longitude = if bbox.east >= bbox.west {
        point.longitude.clamp(bbox.west, bbox.east)
    } else if point.longitude >= bbox.west || point.longitude <= bbox.east {
        point.longitude
    } else if (point.longitude - bbox.west).abs() <= (point.longitude - bbox.east).abs() {
        bbox.west
    } else {
        bbox.east
    };

    Coordinate {
        latitude,
        longitude,
    }
}

/// Box centered on a point with roughly `radius_km` of slack on each side.
/// Used by the nearby-corners listing to pre-filter before exact distances.
pub fn bounding_box_around(center: Coordinate, radius_km: f64) -> BoundingBox {
    let radius_meters = radius_km.max(0.0) * 1000.0;
    let lat_delta = meters_to_degrees_latitude(radius_meters);
    let lon_delta = meters_to_degrees_longitude(radius_meters, center.latitude);

    BoundingBox {
        north: (center.latitude + lat_delta).min(90.0),
        south: (center.latitude - lat_delta).max(-90.0),
        east: (center.longitude + lon_delta).min(180.0),
        west: (center.longitude - lon_delta).max(-180.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate::new(latitude, longitude)
    }

    #[test]
    fn test_distance_zero_for_identical_points() {
        let p = point(-34.60, -58.38);
        assert_eq!(haversine_distance_km(p, p), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = point(-34.60, -58.38);
        let b = point(40.41, -3.70);
        assert_eq!(haversine_distance_km(a, b), haversine_distance_km(b, a));
    }

    #[test]
    fn test_known_distance_berlin_paris() {
        let berlin = point(52.5200, 13.4050);
        let paris = point(48.8566, 2.3522);
        let distance = haversine_distance_km(berlin, paris);
        assert!((distance - 878.0).abs() < 10.0);
    }

    #[test]
    fn test_distance_stable_across_antimeridian() {
        let a = point(0.0, 179.9);
        let b = point(0.0, -179.9);
        let distance = haversine_distance_km(a, b);
        assert!(distance < 30.0, "wrap-around distance was {distance}");
    }

    #[test]
    fn test_meters_to_degrees_latitude() {
        assert!((meters_to_degrees_latitude(111_320.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_meters_to_degrees_longitude_guards_poles() {
        let at_pole = meters_to_degrees_longitude(150.0, 90.0);
        assert!(at_pole <= 150.0);
        assert!(at_pole.is_finite());
    }

    #[test]
    fn test_expand_is_noop_for_non_positive_padding() {
        let bbox = BoundingBox {
            north: 1.0,
            south: -1.0,
            east: 1.0,
            west: -1.0,
        };

        assert_eq!(expand_bounding_box(bbox, 0.0), bbox);
        assert_eq!(expand_bounding_box(bbox, -10.0), bbox);
    }

    #[test]
    fn test_expand_grows_every_edge() {
        let bbox = BoundingBox {
            north: -34.58,
            south: -34.68,
            east: -58.36,
            west: -58.53,
        };

        let expanded = expand_bounding_box(bbox, 1500.0);
        assert!(expanded.north > bbox.north);
        assert!(expanded.south < bbox.south);
        assert!(expanded.east > bbox.east);
        assert!(expanded.west < bbox.west);
    }

    #[test]
    fn test_expand_clamps_to_legal_ranges() {
        let bbox = BoundingBox {
            north: 89.9999,
            south: -89.9999,
            east: 179.9999,
            west: -179.9999,
        };

        let expanded = expand_bounding_box(bbox, 5000.0);
        assert_eq!(expanded.north, 90.0);
        assert_eq!(expanded.south, -90.0);
        assert_eq!(expanded.east, 180.0);
        assert_eq!(expanded.west, -180.0);
    }

    #[test]
    fn test_containment_simple_box() {
        let bbox = BoundingBox {
            north: -34.54,
            south: -34.72,
            east: -58.36,
            west: -58.55,
        };

        assert!(is_within_bounding_box(point(-34.60, -58.43), &bbox));
        assert!(is_within_bounding_box(point(-34.54, -58.36), &bbox));
        assert!(!is_within_bounding_box(point(-34.50, -58.43), &bbox));
        assert!(!is_within_bounding_box(point(-34.60, -58.60), &bbox));
    }

    #[test]
    fn test_containment_antimeridian_box() {
        let bbox = BoundingBox {
            north: 10.0,
            south: -10.0,
            east: -170.0,
            west: 170.0,
        };

        assert!(is_within_bounding_box(point(0.0, 179.9), &bbox));
        assert!(is_within_bounding_box(point(0.0, -179.9), &bbox));
        assert!(is_within_bounding_box(point(0.0, 170.0), &bbox));
        assert!(is_within_bounding_box(point(0.0, -170.0), &bbox));
        assert!(!is_within_bounding_box(point(0.0, 0.0), &bbox));
        assert!(!is_within_bounding_box(point(20.0, 179.9), &bbox));
    }

    #[test]
    fn test_clamp_simple_box() {
        let bbox = BoundingBox {
            north: 1.0,
            south: -1.0,
            east: 1.0,
            west: -1.0,
        };

        let clamped = clamp_point_to_bounding_box(point(2.0, -3.0), &bbox);
        assert_eq!(clamped, point(1.0, -1.0));

        let inside = point(0.5, 0.5);
        assert_eq!(clamp_point_to_bounding_box(inside, &bbox), inside);
    }

    #[test]
    fn test_clamp_antimeridian_wedge_picks_nearer_edge() {
        let bbox = BoundingBox {
            north: 10.0,
            south: -10.0,
            east: -170.0,
            west: 170.0,
        };

        // inside the wrapped interval: untouched
        assert_eq!(
            clamp_point_to_bounding_box(point(0.0, 179.0), &bbox).longitude,
            179.0
        );
        // wedge, closer to the west edge
        assert_eq!(
            clamp_point_to_bounding_box(point(0.0, 10.0), &bbox).longitude,
            170.0
        );
        // wedge, closer to the east edge
        assert_eq!(
            clamp_point_to_bounding_box(point(0.0, -10.0), &bbox).longitude,
            -170.0
        );
    }

    #[test]
    fn test_bounding_box_around_contains_center() {
        let center = point(-34.6037, -58.3816);
        let bbox = bounding_box_around(center, 5.0);

        assert!(is_within_bounding_box(center, &bbox));
        assert!(bbox.north > center.latitude);
        assert!(bbox.south < center.latitude);
    }
}
