//! Formdesk template server
//!
//! JSON API for form templates plus a small upload store for page
//! backgrounds.
//!
//! | Route                              | Handler                     |
//! |------------------------------------|-----------------------------|
//! | `GET /health`                      | [`routes::health`]          |
//! | `GET /api/forms/templates`         | [`routes::list_templates`]  |
//! | `POST /api/forms/templates`        | [`routes::create_template`] |
//! | `GET /api/forms/templates/{id}`    | [`routes::get_template`]    |
//! | `PUT /api/forms/templates/{id}`    | [`routes::update_template`] |
//! | `DELETE /api/forms/templates/{id}` | [`routes::delete_template`] |
//! | `POST /api/forms/upload`           | [`routes::upload`]          |
//! | `GET /api/forms/uploads/{name}`    | [`routes::get_upload`]      |

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use state::{AppState, Upload};

/// Build the router with all middleware layers.
pub fn app(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/api/forms/templates",
            get(routes::list_templates).post(routes::create_template),
        )
        .route(
            "/api/forms/templates/{id}",
            get(routes::get_template)
                .put(routes::update_template)
                .delete(routes::delete_template),
        )
        .route("/api/forms/upload", post(routes::upload))
        .route("/api/forms/uploads/{name}", get(routes::get_upload))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
