//! # Activity Layer
//!
//! Heatmap points derived from exchange metrics of the surviving corners.
//! Reuses each corner's already-resolved display coordinate, so the layer
//! never re-derives (or un-jitters) a position.
use crate::{corners::ProjectedCorner, models::ActivityPoint};

const MIN_INTENSITY: u32 = 1;
const MAX_INTENSITY: u32 = 5;

pub fn build_activity_points(survivors: &[ProjectedCorner]) -> Vec<ActivityPoint> {
    survivors.iter().filter_map(activity_point).collect()
}

fn activity_point(projected: &ProjectedCorner) -> Option<ActivityPoint> {
    let metrics = projected.corner.metrics.as_ref()?;

    // weekly volume drives the heatmap; fall back to the all-time count for
    // corners that were quiet this week
    let source = if metrics.weekly_exchanges > 0 {
        metrics.weekly_exchanges
    } else {
        metrics.total_exchanges
    };
    if source == 0 {
        return None;
    }

    Some(ActivityPoint {
        id: format!("{}-activity", projected.corner.id),
        lat: projected.display.coordinate.latitude,
        lon: projected.display.coordinate.longitude,
        intensity: source.clamp(MIN_INTENSITY, MAX_INTENSITY) as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            Corner, CornerAddress, CornerMetrics, CornerScope, CornerStatus, Coordinate,
            Visibility,
        },
        obfuscate::DisplayCoordinate,
    };

    fn projected(id: &str, metrics: Option<CornerMetrics>) -> ProjectedCorner {
        let coordinate = Coordinate::new(-34.60, -58.38);

        ProjectedCorner {
            corner: Corner {
                id: id.to_string(),
                name: "Rincón Barracas Sur".to_string(),
                scope: CornerScope::Public,
                status: CornerStatus::Active,
                draft: false,
                visibility: Visibility::Exact,
                coordinate: Some(coordinate),
                barrio: None,
                city: None,
                address: CornerAddress::default(),
                rules: None,
                themes: Vec::new(),
                photo_url: None,
                metrics,
            },
            display: DisplayCoordinate {
                coordinate,
                approximate: false,
            },
        }
    }

    fn metrics(weekly: u32, total: u32) -> Option<CornerMetrics> {
        Some(CornerMetrics {
            total_exchanges: total,
            weekly_exchanges: weekly,
            last_activity_at: None,
        })
    }

    #[test]
    fn test_weekly_count_drives_intensity() {
        let points = build_activity_points(&[projected("c-1", metrics(3, 40))]);

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].id, "c-1-activity");
        assert_eq!(points[0].intensity, 3);
    }

    #[test]
    fn test_total_count_is_the_fallback_and_clamps_high() {
        let points = build_activity_points(&[projected("c-1", metrics(0, 40))]);

        assert_eq!(points[0].intensity, 5);
    }

    #[test]
    fn test_intensity_clamps_low() {
        let points = build_activity_points(&[projected("c-1", metrics(1, 0))]);

        assert_eq!(points[0].intensity, 1);
    }

    #[test]
    fn test_quiet_corners_are_skipped() {
        let silent = projected("c-1", metrics(0, 0));
        let unmeasured = projected("c-2", None);

        assert!(build_activity_points(&[silent, unmeasured]).is_empty());
    }

    #[test]
    fn test_point_reuses_display_coordinate() {
        let mut jittered = projected("c-1", metrics(2, 10));
        jittered.display = DisplayCoordinate {
            coordinate: Coordinate::new(-34.601, -58.381),
            approximate: true,
        };

        let points = build_activity_points(&[jittered]);
        assert_eq!(points[0].lat, -34.601);
        assert_eq!(points[0].lon, -58.381);
    }
}
