use std::sync::Arc;

use axum::{ extract::State, routing::{ get, post }, Json, Router };
use serde_json::{ json, Value };
use tower_cookies::Cookies;
use validator::Validate;

use crate::{
    dto::session_dtos::SessionRequest,
    errors::{ ErrorMessage, HttpError },
    middleware::cookies::{ remove_token_cookie, set_token_cookie },
    utils::token::create_token,
    AppState,
};

// SESSION ROUTER
pub fn session_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/session", post(create_session_handler))
        .route("/session/logout", get(logout_handler))
}

// ISSUE CREDENTIAL
pub async fn create_session_handler(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(body): Json<SessionRequest>
) -> Result<Json<Value>, HttpError> {
    body
        .validate()
        .map_err(|_| HttpError::bad_request(ErrorMessage::InvalidEmail.to_string()))?;

    let token = create_token(
        &body.email,
        state.config.database.jwt_secret.as_bytes(),
        state.config.database.jwt_expires_in
    ).map_err(|_| HttpError::server_error(ErrorMessage::InternalServerError.to_string()))?;

    set_token_cookie(
        &cookies,
        token,
        state.config.is_production(),
        state.config.database.jwt_expires_in
    );

    Ok(Json(json!({ "success": true })))
}

// REVOKE CREDENTIAL
pub async fn logout_handler(State(state): State<Arc<AppState>>, cookies: Cookies) -> Json<Value> {
    remove_token_cookie(&cookies, state.config.is_production());

    Json(json!({ "success": true }))
}
