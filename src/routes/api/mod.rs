use std::sync::Arc;

use axum::Router;

use crate::AppState;

pub mod posts;
pub mod requests;
pub mod session;

pub fn setup_complete_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .merge(session::session_routes())
        .merge(posts::post_routes(state.clone()))
        .merge(requests::request_routes(state))
}
