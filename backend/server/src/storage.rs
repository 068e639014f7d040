//! # Storage Boundary
//!
//! The map engine consumes storage through two read-only queries: corners
//! whose true coordinates fall inside a (padded) window, and the public
//! non-draft listings attached to a set of corner ids. The relational
//! implementation lives in the repository layer outside this crate;
//! [`MemoryStore`] is the in-process implementation backing the demo server
//! and the tests, seeded with the Buenos Aires fixture dataset.
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

use crate::{
    geo::is_within_bounding_box,
    models::{
        BoundingBox, Corner, CornerAddress, CornerMetrics, CornerScope, CornerStatus, Coordinate,
        ListingKind, Publication, Visibility,
    },
};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Read-only collaborator contract. Both queries are plain reads with no
/// side effects.
#[async_trait]
pub trait CornerStore: Send + Sync {
    /// Corners (with embedded metrics and photo) whose true coordinates
    /// intersect the given window.
    async fn corners_within(&self, bounds: &BoundingBox) -> Result<Vec<Corner>, StorageError>;

    /// Public, non-draft listings attached to any of the given corners.
    async fn public_listings_for_corners(
        &self,
        corner_ids: &[String],
    ) -> Result<Vec<Publication>, StorageError>;
}

/// In-memory store. Holds the already-public projection the relational
/// repository query would return.
pub struct MemoryStore {
    corners: Vec<Corner>,
    listings: Vec<Publication>,
}

impl MemoryStore {
    pub fn new(corners: Vec<Corner>, listings: Vec<Publication>) -> Self {
        Self {
            corners,
            listings,
        }
    }

    /// The Buenos Aires fixture set used by the demo server.
    pub fn seeded() -> Self {
        Self::new(seed_corners(), seed_listings())
    }
}

#[async_trait]
impl CornerStore for MemoryStore {
    async fn corners_within(&self, bounds: &BoundingBox) -> Result<Vec<Corner>, StorageError> {
        Ok(self
            .corners
            .iter()
            .filter(|corner| {
                corner
                    .coordinate
                    .is_some_and(|point| is_within_bounding_box(point, bounds))
            })
            .cloned()
            .collect())
    }

    async fn public_listings_for_corners(
        &self,
        corner_ids: &[String],
    ) -> Result<Vec<Publication>, StorageError> {
        Ok(self
            .listings
            .iter()
            .filter(|listing| {
                listing
                    .corner_id
                    .as_ref()
                    .is_some_and(|id| corner_ids.contains(id))
            })
            .cloned()
            .collect())
    }
}

fn seed_corners() -> Vec<Corner> {
    vec![
        seed_corner(SeedCorner {
            id: "corner-1",
            name: "Rincón Plaza Malabia",
            barrio: "Palermo",
            street: "Malabia",
            number: "850",
            postal_code: "1414",
            coordinate: Coordinate::new(-34.58802, -58.43044),
            visibility: Visibility::Exact,
            status: CornerStatus::Active,
            themes: &["Infancias", "Narrativa contemporánea"],
            rules: Some("Traé un libro y llevate otro, dejá una nota para la comunidad."),
            photo: "https://images.entrelibros.org/corners/palermo-01.jpg",
            weekly: 4,
            total: 58,
            last_activity: Some(ts(2025, 10, 25, 12, 4)),
        }),
        seed_corner(SeedCorner {
            id: "corner-2",
            name: "Bibliorincón Parque Patricios",
            barrio: "Parque Patricios",
            street: "Monteagudo",
            number: "450",
            postal_code: "1247",
            coordinate: Coordinate::new(-34.63421, -58.40438),
            visibility: Visibility::Approximate,
            status: CornerStatus::Paused,
            themes: &["Historia", "Ensayo"],
            rules: None,
            photo: "https://images.entrelibros.org/corners/parque-patricios-01.jpg",
            weekly: 3,
            total: 21,
            last_activity: Some(ts(2025, 10, 24, 18, 36)),
        }),
        seed_corner(SeedCorner {
            id: "corner-3",
            name: "Club de Lectura Chacarita",
            barrio: "Chacarita",
            street: "Av. Federico Lacroze",
            number: "3100",
            postal_code: "1426",
            coordinate: Coordinate::new(-34.59561, -58.45673),
            visibility: Visibility::Exact,
            status: CornerStatus::Active,
            themes: &["Poesía", "Ciencia ficción"],
            rules: None,
            photo: "https://images.entrelibros.org/corners/chacarita-01.jpg",
            weekly: 5,
            total: 74,
            last_activity: Some(ts(2025, 10, 23, 9, 12)),
        }),
        seed_corner(SeedCorner {
            id: "corner-4",
            name: "Rincón Barracas Sur",
            barrio: "Barracas",
            street: "Av. Montes de Oca",
            number: "1800",
            postal_code: "1270",
            coordinate: Coordinate::new(-34.65628, -58.36792),
            visibility: Visibility::Exact,
            status: CornerStatus::Paused,
            themes: &["Infancias", "Historia"],
            rules: None,
            photo: "https://images.entrelibros.org/corners/barracas-01.jpg",
            weekly: 2,
            total: 15,
            last_activity: Some(ts(2025, 10, 20, 15, 20)),
        }),
        seed_corner(SeedCorner {
            id: "corner-5",
            name: "Punto de Lectura Villa Crespo",
            barrio: "Villa Crespo",
            street: "Scalabrini Ortiz",
            number: "700",
            postal_code: "1414",
            coordinate: Coordinate::new(-34.59983, -58.44126),
            visibility: Visibility::Approximate,
            status: CornerStatus::Active,
            themes: &["Narrativa contemporánea", "Poesía"],
            rules: None,
            photo: "https://images.entrelibros.org/corners/villa-crespo-01.jpg",
            weekly: 4,
            total: 39,
            last_activity: Some(ts(2025, 10, 26, 8, 50)),
        }),
    ]
}

fn seed_listings() -> Vec<Publication> {
    vec![
        seed_listing(
            "pub-1",
            "Los años felices",
            Some("Claudia Piñeiro"),
            ListingKind::Offer,
            false,
            false,
            "corner-1",
            Some("https://images.entrelibros.org/publications/anios-felices.jpg"),
        ),
        seed_listing(
            "pub-2",
            "Rayuela",
            Some("Julio Cortázar"),
            ListingKind::Offer,
            false,
            true,
            "corner-3",
            Some("https://images.entrelibros.org/publications/rayuela.jpg"),
        ),
        seed_listing(
            "pub-3",
            "La invención de Morel",
            Some("Adolfo Bioy Casares"),
            ListingKind::Offer,
            true,
            false,
            "corner-2",
            Some("https://images.entrelibros.org/publications/invencion-morel.jpg"),
        ),
        seed_listing(
            "pub-4",
            "El Eternauta",
            Some("Héctor Germán Oesterheld"),
            ListingKind::Want,
            false,
            false,
            "corner-5",
            None,
        ),
        seed_listing(
            "pub-5",
            "Breve historia argentina",
            Some("Felipe Pigna"),
            ListingKind::Offer,
            false,
            false,
            "corner-4",
            None,
        ),
        seed_listing(
            "pub-6",
            "Mujer en tránsito",
            Some("Gabriela Cabezón Cámara"),
            ListingKind::Offer,
            false,
            true,
            "corner-5",
            Some("https://images.entrelibros.org/publications/mujer-transito.jpg"),
        ),
    ]
}

struct SeedCorner {
    id: &'static str,
    name: &'static str,
    barrio: &'static str,
    street: &'static str,
    number: &'static str,
    postal_code: &'static str,
    coordinate: Coordinate,
    visibility: Visibility,
    status: CornerStatus,
    themes: &'static [&'static str],
    rules: Option<&'static str>,
    photo: &'static str,
    weekly: u32,
    total: u32,
    last_activity: Option<DateTime<Utc>>,
}

fn seed_corner(seed: SeedCorner) -> Corner {
    Corner {
        id: seed.id.to_string(),
        name: seed.name.to_string(),
        scope: CornerScope::Public,
        status: seed.status,
        draft: false,
        visibility: seed.visibility,
        coordinate: Some(seed.coordinate),
        barrio: Some(seed.barrio.to_string()),
        city: Some("Buenos Aires".to_string()),
        address: CornerAddress {
            street: Some(seed.street.to_string()),
            number: Some(seed.number.to_string()),
            unit: None,
            postal_code: Some(seed.postal_code.to_string()),
        },
        rules: seed.rules.map(str::to_string),
        themes: seed.themes.iter().map(|theme| theme.to_string()).collect(),
        photo_url: Some(seed.photo.to_string()),
        metrics: Some(CornerMetrics {
            total_exchanges: seed.total,
            weekly_exchanges: seed.weekly,
            last_activity_at: seed.last_activity,
        }),
    }
}

fn seed_listing(
    id: &str,
    title: &str,
    author: Option<&str>,
    kind: ListingKind,
    sale: bool,
    donation: bool,
    corner_id: &str,
    photo_url: Option<&str>,
) -> Publication {
    Publication {
        id: id.to_string(),
        title: title.to_string(),
        author: author.map(str::to_string),
        kind,
        sale,
        donation,
        corner_id: Some(corner_id.to_string()),
        photo_url: photo_url.map(str::to_string),
    }
}

fn ts(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
}
