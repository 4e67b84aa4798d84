//! Loomline REST API server.
//!
//! Serves the product catalog, account auth, the admin back-office, image
//! uploads, and the Stream-backed support chat bridge.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod stream;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Request body cap: five 5 MiB files plus multipart framing.
const MAX_BODY_BYTES: usize = 30 * 1024 * 1024;

/// Build the full application router.
#[must_use]
pub fn app(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.config().upload_dir);

    Router::new()
        .merge(routes::health::router())
        .nest("/api/auth", routes::auth::router())
        .nest("/api/products", routes::products::router())
        .nest("/api/chat", routes::chat::router())
        .nest("/api/users", routes::users::router())
        .nest("/api/upload", routes::upload::router())
        // Uploaded images are reachable both directly and under the API
        // prefix, so clients behind a single proxy rule still resolve them.
        .nest_service("/uploads", uploads.clone())
        .nest_service("/api/uploads", uploads)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(&state.config().client_url))
        .layer(TraceLayer::new_for_http())
        .layer(sentry_tower::SentryHttpLayer::with_transaction())
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .with_state(state)
}

/// CORS for the browser storefront: one allowed origin from config.
fn cors_layer(client_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match client_url.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!(client_url, "CLIENT_URL is not a valid origin; CORS disabled");
            layer
        }
    }
}
