use axum::{ routing::get, Router };
use std::sync::Arc;

use crate::{ AppState, errors::{ ErrorMessage, HttpError } };

pub fn general_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .fallback(handler_404)
}

pub async fn handler_404() -> HttpError {
    HttpError::not_found(ErrorMessage::NotFound.to_string())
}

pub async fn root() -> &'static str {
    "Hello from volunteer management server..."
}

pub async fn health_check() -> &'static str {
    "OK"
}
