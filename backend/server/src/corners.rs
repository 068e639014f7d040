//! # Corner Projection
//!
//! Turns raw corner records into displayable pins: resolves the display
//! coordinate (exact or jittered), pulls wandering approximate pins back into
//! the requested viewport, and applies the visibility filter chain. The
//! surviving set feeds the publication and activity layers, which reuse each
//! corner's already-resolved display coordinate.
use crate::{
    geo::{clamp_point_to_bounding_box, is_within_bounding_box},
    models::{BoundingBox, Corner, CornerPin, CornerScope, CornerStatus},
    obfuscate::{DisplayCoordinate, display_coordinate},
};

pub const DEFAULT_THEME: &str = "lectura comunitaria";
pub const DEFAULT_BARRIO_LABEL: &str = "Zona aproximada";
pub const DEFAULT_CITY: &str = "Buenos Aires";

/// A corner that survived filtering, with its per-query display coordinate.
#[derive(Debug, Clone)]
pub struct ProjectedCorner {
    pub corner: Corner,
    pub display: DisplayCoordinate,
}

impl ProjectedCorner {
    pub fn matches_search(&self, term: &str) -> bool {
        corner_matches_search(&self.corner, term)
    }

    pub fn synthesized_themes(&self) -> Vec<String> {
        synthesized_themes(&self.corner)
    }

    pub fn pin(&self) -> CornerPin {
        let corner = &self.corner;

        CornerPin {
            id: corner.id.clone(),
            name: corner.name.clone(),
            barrio: barrio_label(corner),
            city: corner
                .city
                .clone()
                .unwrap_or_else(|| DEFAULT_CITY.to_string()),
            lat: self.display.coordinate.latitude,
            lon: self.display.coordinate.longitude,
            last_signal_at: corner
                .metrics
                .as_ref()
                .and_then(|metrics| metrics.last_activity_at),
            photos: corner.photo_url.iter().cloned().collect(),
            rules: corner.rules.clone(),
            reference_point_label: self
                .display
                .approximate
                .then(|| corner.location_summary()),
            themes: synthesized_themes(corner),
            is_open_now: corner.status == CornerStatus::Active,
        }
    }
}

/// Filters and projects storage candidates, preserving storage order so the
/// assembled layers come out deterministic. `search` and `themes` must
/// already be trimmed and lowercased.
pub fn project_corners(
    candidates: Vec<Corner>,
    viewport: &BoundingBox,
    search: &str,
    themes: &[String],
    open_now: bool,
) -> Vec<ProjectedCorner> {
    candidates
        .into_iter()
        .filter_map(|corner| project_corner(corner, viewport, search, themes, open_now))
        .collect()
}

fn project_corner(
    corner: Corner,
    viewport: &BoundingBox,
    search: &str,
    themes: &[String],
    open_now: bool,
) -> Option<ProjectedCorner> {
    // no geometry, no pin; the query itself still succeeds
    let true_coordinate = corner.coordinate?;

    let mut display = display_coordinate(&corner.id, true_coordinate, corner.visibility);

    // jitter may push the pin past the viewport edge the user asked for;
    // clamp against the original box, not the padded fetch window
    if display.approximate && !is_within_bounding_box(display.coordinate, viewport) {
        display.coordinate = clamp_point_to_bounding_box(display.coordinate, viewport);
    }

    if corner.draft {
        return None;
    }
    if !search.is_empty() && !corner_matches_search(&corner, search) {
        return None;
    }
    if !themes.is_empty() && !has_theme_overlap(&corner.themes, themes) {
        return None;
    }
    if open_now && corner.status != CornerStatus::Active {
        return None;
    }

    Some(ProjectedCorner {
        corner,
        display,
    })
}

pub(crate) fn corner_matches_search(corner: &Corner, term: &str) -> bool {
    contains_ci(&corner.name, term)
        || contains_ci(&barrio_label(corner), term)
        || corner
            .address
            .street
            .as_deref()
            .is_some_and(|street| contains_ci(street, term))
}

/// Substring match against an already-lowercased term.
pub(crate) fn contains_ci(value: &str, term: &str) -> bool {
    value.to_lowercase().contains(term)
}

/// Case-insensitive set intersection; `filters` must already be lowercased.
pub(crate) fn has_theme_overlap(themes: &[String], filters: &[String]) -> bool {
    themes
        .iter()
        .any(|theme| filters.iter().any(|filter| theme.to_lowercase() == *filter))
}

/// barrio → postal code → fixed default.
fn barrio_label(corner: &Corner) -> String {
    corner
        .barrio
        .clone()
        .or_else(|| corner.address.postal_code.clone())
        .unwrap_or_else(|| DEFAULT_BARRIO_LABEL.to_string())
}

fn synthesized_themes(corner: &Corner) -> Vec<String> {
    vec![
        DEFAULT_THEME.to_string(),
        scope_tag(corner.scope).to_string(),
        status_tag(corner.status).to_string(),
    ]
}

fn scope_tag(scope: CornerScope) -> &'static str {
    match scope {
        CornerScope::Public => "espacio público",
        CornerScope::Semiprivate => "espacio semiprivado",
    }
}

fn status_tag(status: CornerStatus) -> &'static str {
    match status {
        CornerStatus::Active => "activo",
        CornerStatus::Paused => "en pausa",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CornerAddress, CornerMetrics, Coordinate, Visibility};

    const VIEWPORT: BoundingBox = BoundingBox {
        north: -34.54,
        south: -34.72,
        east: -58.36,
        west: -58.55,
    };

    fn corner(id: &str) -> Corner {
        Corner {
            id: id.to_string(),
            name: "Rincón Plaza Malabia".to_string(),
            scope: CornerScope::Public,
            status: CornerStatus::Active,
            draft: false,
            visibility: Visibility::Exact,
            coordinate: Some(Coordinate::new(-34.588, -58.430)),
            barrio: Some("Palermo".to_string()),
            city: Some("Buenos Aires".to_string()),
            address: CornerAddress {
                street: Some("Malabia".to_string()),
                number: Some("850".to_string()),
                unit: None,
                postal_code: Some("1414".to_string()),
            },
            rules: Some("Traé un libro y llevate otro.".to_string()),
            themes: vec!["Infancias".to_string(), "Poesía".to_string()],
            photo_url: Some("https://images.example.org/corner.jpg".to_string()),
            metrics: Some(CornerMetrics {
                total_exchanges: 32,
                weekly_exchanges: 4,
                last_activity_at: None,
            }),
        }
    }

    fn project_all(candidates: Vec<Corner>) -> Vec<ProjectedCorner> {
        project_corners(candidates, &VIEWPORT, "", &[], false)
    }

    #[test]
    fn test_corner_without_geometry_is_silently_excluded() {
        let mut missing = corner("corner-1");
        missing.coordinate = None;

        assert!(project_all(vec![missing]).is_empty());
    }

    #[test]
    fn test_draft_corner_is_excluded() {
        let mut draft = corner("corner-1");
        draft.draft = true;

        assert!(project_all(vec![draft]).is_empty());
    }

    #[test]
    fn test_search_matches_name_barrio_and_street() {
        let candidates = || vec![corner("corner-1")];

        for term in ["malabia", "palermo", "rincón"] {
            let survivors = project_corners(candidates(), &VIEWPORT, term, &[], false);
            assert_eq!(survivors.len(), 1, "term {term:?} should match");
        }

        let survivors = project_corners(candidates(), &VIEWPORT, "chacarita", &[], false);
        assert!(survivors.is_empty());
    }

    #[test]
    fn test_search_falls_back_to_postal_code_label() {
        let mut no_barrio = corner("corner-1");
        no_barrio.barrio = None;

        let survivors = project_corners(vec![no_barrio], &VIEWPORT, "1414", &[], false);
        assert_eq!(survivors.len(), 1);
    }

    #[test]
    fn test_theme_filter_intersects_corner_themes() {
        let matching = project_corners(
            vec![corner("corner-1")],
            &VIEWPORT,
            "",
            &["poesía".to_string()],
            false,
        );
        assert_eq!(matching.len(), 1);

        let disjoint = project_corners(
            vec![corner("corner-1")],
            &VIEWPORT,
            "",
            &["historia".to_string()],
            false,
        );
        assert!(disjoint.is_empty());
    }

    #[test]
    fn test_open_now_requires_active_status() {
        let mut paused = corner("corner-1");
        paused.status = CornerStatus::Paused;

        assert!(project_corners(vec![paused.clone()], &VIEWPORT, "", &[], true).is_empty());

        // without the toggle the paused corner still shows, marked closed
        let survivors = project_corners(vec![paused], &VIEWPORT, "", &[], false);
        assert_eq!(survivors.len(), 1);
        assert!(!survivors[0].pin().is_open_now);
    }

    #[test]
    fn test_exact_corner_keeps_true_coordinate() {
        let survivors = project_all(vec![corner("corner-1")]);
        let pin = survivors[0].pin();

        assert_eq!(pin.lat, -34.588);
        assert_eq!(pin.lon, -58.430);
        assert!(pin.reference_point_label.is_none());
    }

    #[test]
    fn test_approximate_corner_is_jittered_and_labeled() {
        let mut approx = corner("corner-1");
        approx.visibility = Visibility::Approximate;
        let true_point = approx.coordinate.unwrap();

        let survivors = project_all(vec![approx]);
        let pin = survivors[0].pin();

        assert!(pin.lat != true_point.latitude || pin.lon != true_point.longitude);
        assert_eq!(
            pin.reference_point_label.as_deref(),
            Some("Malabia · CP 1414")
        );
    }

    #[test]
    fn test_approximate_pin_is_clamped_into_viewport() {
        let mut approx = corner("corner-1");
        approx.visibility = Visibility::Approximate;
        // true position sits in the fetch padding just outside the viewport
        approx.coordinate = Some(Coordinate::new(-34.5391, -58.43));

        let survivors = project_all(vec![approx]);
        let display = survivors[0].display.coordinate;

        assert!(is_within_bounding_box(display, &VIEWPORT));
    }

    #[test]
    fn test_pin_fallback_labels() {
        let mut bare = corner("corner-1");
        bare.barrio = None;
        bare.city = None;
        bare.address.postal_code = None;
        bare.photo_url = None;
        bare.rules = None;
        bare.metrics = None;

        let pin = project_all(vec![bare])[0].pin();

        assert_eq!(pin.barrio, DEFAULT_BARRIO_LABEL);
        assert_eq!(pin.city, DEFAULT_CITY);
        assert!(pin.photos.is_empty());
        assert!(pin.rules.is_none());
        assert!(pin.last_signal_at.is_none());
    }

    #[test]
    fn test_pin_themes_are_synthesized() {
        let pin = project_all(vec![corner("corner-1")])[0].pin();

        assert_eq!(
            pin.themes,
            vec![
                DEFAULT_THEME.to_string(),
                "espacio público".to_string(),
                "activo".to_string(),
            ]
        );
    }
}
