//! Backend for the EntreLibros community book exchange.
//!
//! The interesting part of this service is the map data pipeline: given a
//! viewport, search text and layer toggles it assembles corner pins,
//! publication pins and an activity heatmap in a single response.
//!
//!
//!
//! # Map Pipeline
//!
//! - Expand the requested viewport by a fetch padding so corners whose
//!   jittered position could land inside it are not missed at fetch time
//! - One storage read for candidate corners, then a pure projection pass:
//!   display coordinate (exact or obfuscated), filter chain, pin fields
//! - Corners that opted into approximate visibility get a deterministic
//!   SHA-256-derived jitter, so their true position never leaves the server
//!   and pins do not wander between pans
//! - Publications and the activity heatmap reuse the surviving corners and
//!   their already-resolved display coordinates
//!
//!
//!
//! # Privacy
//!
//! **Goal**: hosts share a corner without publishing their doorstep.
//!
//! - Approximate corners surface only the jittered coordinate plus a coarse
//!   address summary as the reference point
//! - The jitter is a pure function of the corner id, no RNG state to seed or
//!   sync between instances
//! - Listings attached to an approximate corner inherit the jittered
//!   position as well
//!
//!
//!
//! # Notes
//!
//! ## Storage
//! The engine only ever issues two read queries (corners in a window,
//! public listings for a set of corners), so the repository layer stays
//! behind the `CornerStore` trait and the demo deployment can run entirely
//! on the seeded in-memory fixture set.
//!
//! ## Setup
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! `````
//!
//! Run the server.
//! ```sh
//! RUST_LOG=info cargo run -p entrelibros
//! ```
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod activity;
pub mod community;
pub mod config;
pub mod corners;
pub mod error;
pub mod geo;
pub mod geocode;
pub mod map;
pub mod models;
pub mod obfuscate;
pub mod publications;
pub mod routes;
pub mod state;
pub mod storage;

use routes::{corners_map_handler, geocode_handler, map_handler, nearby_corners_handler};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new();

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/api/map", get(map_handler))
        .route("/api/map/geocode", get(geocode_handler))
        .route("/api/community/corners/nearby", get(nearby_corners_handler))
        .route("/api/community/corners/map", get(corners_map_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
