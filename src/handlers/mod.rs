pub mod clusters;
pub mod dashboard;
pub mod sources;

use axum::{
    response::{IntoResponse, Redirect},
    http::StatusCode,
};

/// Root handler - redirect na dashboard
pub async fn index() -> impl IntoResponse {
    Redirect::to("/dashboard")
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub use sources::AppState;
