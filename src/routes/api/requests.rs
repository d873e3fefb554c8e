use std::sync::Arc;

use axum::{
    extract::{ Path, Query, State },
    middleware,
    routing::{ get, post },
    Extension,
    Json,
    Router,
};
use validator::Validate;

use crate::{
    dto::{ request_dtos::{ CancelRequestQuery, CreateVolunteerRequest }, AckResponse },
    errors::HttpError,
    middleware::auth::{ auth, ensure_identity, AuthenticatedUser },
    models::VolunteerRequest,
    AppState,
};

// REQUEST ROUTER
pub fn request_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/requests", post(create_request_handler).delete(cancel_request_handler))
        .route("/requests/by-volunteer/{email}", get(get_requests_by_volunteer_handler))
        .layer(middleware::from_fn_with_state(state, auth))
}

// APPLY TO VOLUNTEER ON A POST
pub async fn create_request_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request_data): Json<CreateVolunteerRequest>
) -> Result<Json<VolunteerRequest>, HttpError> {
    request_data
        .validate()
        .map_err(|e| HttpError::bad_request(format!("Validation error: {}", e)))?;

    let request = state.ledger.apply(&user.email, request_data)?;

    Ok(Json(request))
}

// CANCEL A VOLUNTEER REQUEST
pub async fn cancel_request_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CancelRequestQuery>
) -> Result<Json<AckResponse>, HttpError> {
    state.ledger.cancel(query.id, query.post_id)?;

    Ok(Json(AckResponse::deleted(1)))
}

// GET REQUESTS BY VOLUNTEER
pub async fn get_requests_by_volunteer_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(email): Path<String>
) -> Result<Json<Vec<VolunteerRequest>>, HttpError> {
    ensure_identity(&user, &email)?;

    let requests = state.ledger.list_by_volunteer(&email)?;

    Ok(Json(requests))
}
