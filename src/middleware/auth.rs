use std::sync::Arc;

use axum::{
    extract::{ Request, State },
    http::header,
    middleware::Next,
    response::IntoResponse,
};
use tower_cookies::Cookies;
use serde::{ Deserialize, Serialize };

use crate::{
    AppState,
    middleware::cookies::TOKEN_COOKIE_NAME,
    utils::token::decode_token,
    errors::{ ErrorMessage, HttpError },
};

// Container that holds the authenticated identity, attached to requests
// after successful verification.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthenticatedUser {
    pub email: String,
}

/// Verifies the bearer credential before any business logic runs. The
/// credential travels in the `token` cookie, with an `Authorization: Bearer`
/// header accepted as a fallback.
pub async fn auth(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    mut req: Request,
    next: Next
) -> Result<impl IntoResponse, HttpError> {
    let token = cookies
        .get(TOKEN_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| {
                    if auth_value.starts_with("Bearer ") {
                        Some(auth_value[7..].to_owned())
                    } else {
                        None
                    }
                })
        })
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::TokenNotProvided.to_string()))?;

    let email = match decode_token(token, state.config.database.jwt_secret.as_bytes()) {
        Ok(subject) => subject,
        Err(_) => {
            return Err(HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()));
        }
    };

    req.extensions_mut().insert(AuthenticatedUser { email });

    Ok(next.run(req).await)
}

/// Identity-scoped endpoints must only serve records belonging to the
/// authenticated identity. Mismatch is forbidden, distinct from
/// unauthenticated.
pub fn ensure_identity(user: &AuthenticatedUser, requested_email: &str) -> Result<(), HttpError> {
    if user.email != requested_email {
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }

    Ok(())
}
