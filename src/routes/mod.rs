use std::sync::Arc;

use axum::Router;

use crate::{ AppState, middleware::cookies::cookie_layer };

pub mod api;
pub mod general_router;

use api::setup_complete_router;
use general_router::general_routes;

/// Main application router assembly function
pub fn create_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        // API routes (session, posts, requests)
        .merge(setup_complete_router(state))
        // General routes (health check, etc.)
        .merge(general_routes())
        // The cookie manager must wrap the auth middleware underneath it
        .layer(cookie_layer())
}
