use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::storage::StorageError;

/// Request-path failures. The `Display` string doubles as the message code
/// the frontend translates.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("map.errors.bbox_required")]
    BoundingBoxRequired,

    #[error("map.errors.query_required")]
    GeocodingQueryRequired,

    #[error("map.errors.geocoding_unavailable")]
    GeocodingUnavailable(#[from] reqwest::Error),

    #[error("map.errors.map_unavailable")]
    Storage(#[from] StorageError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::BoundingBoxRequired | AppError::GeocodingQueryRequired => {
                (StatusCode::BAD_REQUEST, "BadRequest")
            }
            AppError::GeocodingUnavailable(source) => {
                warn!("Geocoding request failed: {source}");
                (StatusCode::BAD_GATEWAY, "GeocodingUnavailable")
            }
            AppError::Storage(source) => {
                warn!("Map data generation failed: {source}");
                (StatusCode::INTERNAL_SERVER_ERROR, "MapGenerationFailed")
            }
        };

        (
            status,
            Json(json!({ "error": code, "message": self.to_string() })),
        )
            .into_response()
    }
}
