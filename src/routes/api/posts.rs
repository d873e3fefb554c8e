use std::sync::Arc;

use axum::{
    extract::{ Path, Query, State },
    middleware,
    routing::{ get, post },
    Extension,
    Json,
    Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{ post_dtos::{ CreatePostRequest, PostSearchQuery, UpdatePostRequest }, AckResponse },
    errors::{ ErrorMessage, HttpError },
    middleware::auth::{ auth, ensure_identity, AuthenticatedUser },
    models::{ NewPost, Post, UpdatePost },
    repositories::post_repository::PostRepository,
    AppState,
};

// POST ROUTER
pub fn post_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/posts", post(create_post_handler))
        .route(
            "/posts/{id}",
            get(get_post_by_id).put(update_post_handler).delete(delete_post_handler)
        )
        .route("/posts/by-organizer/{email}", get(get_posts_by_organizer_handler))
        .layer(middleware::from_fn_with_state(state, auth));

    Router::new()
        // Listing (with optional title search) is the one public read
        .route("/posts", get(get_posts))
        .merge(protected)
}

// GET ALL POSTS
pub async fn get_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PostSearchQuery>
) -> Result<Json<Vec<Post>>, HttpError> {
    let search = query.search.as_deref().filter(|term| !term.is_empty());

    let posts = PostRepository::list(&state.config.database.pool, search).map_err(|e|
        HttpError::server_error(e.to_string())
    )?;

    Ok(Json(posts))
}

// GET POST BY ID
pub async fn get_post_by_id(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>
) -> Result<Json<Post>, HttpError> {
    let post = PostRepository::get(&state.config.database.pool, post_id).map_err(|e|
        HttpError::server_error(e.to_string())
    )?;

    match post {
        Some(post) => Ok(Json(post)),
        None => Err(HttpError::not_found(ErrorMessage::PostNotFound.to_string())),
    }
}

// GET POSTS BY ORGANIZER
pub async fn get_posts_by_organizer_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(email): Path<String>
) -> Result<Json<Vec<Post>>, HttpError> {
    ensure_identity(&user, &email)?;

    let posts = PostRepository::list_by_organizer(&state.config.database.pool, &email).map_err(
        |e| HttpError::server_error(e.to_string())
    )?;

    Ok(Json(posts))
}

// CREATE NEW POST
pub async fn create_post_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(post_data): Json<CreatePostRequest>
) -> Result<Json<Post>, HttpError> {
    post_data
        .validate()
        .map_err(|e| HttpError::bad_request(format!("Validation error: {}", e)))?;

    // The organizer identity is the authenticated one, not whatever the
    // payload claims.
    let new_post = NewPost {
        title: post_data.title,
        description: post_data.description,
        category: post_data.category,
        location: post_data.location,
        thumbnail: post_data.thumbnail,
        deadline: post_data.deadline,
        organizer_name: post_data.organizer_name,
        organizer_email: user.email,
        slots_remaining: post_data.volunteers_needed,
    };

    let post = PostRepository::create(&state.config.database.pool, new_post).map_err(|e|
        HttpError::server_error(e.to_string())
    )?;

    Ok(Json(post))
}

// UPDATE POST BY ID (merge of the supplied fields)
pub async fn update_post_handler(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
    Json(update_data): Json<UpdatePostRequest>
) -> Result<Json<Post>, HttpError> {
    update_data
        .validate()
        .map_err(|e| HttpError::bad_request(format!("Validation error: {}", e)))?;

    let changes = UpdatePost {
        title: update_data.title,
        description: update_data.description,
        category: update_data.category,
        location: update_data.location,
        thumbnail: update_data.thumbnail,
        deadline: update_data.deadline,
        organizer_name: update_data.organizer_name,
        // Organizer capacity edits set the counter outright; deltas belong
        // to the request ledger alone.
        slots_remaining: update_data.volunteers_needed,
        // Stamped by the repository
        updated_at: None,
    };

    let updated = PostRepository::update(&state.config.database.pool, post_id, changes).map_err(
        |e| HttpError::server_error(e.to_string())
    )?;

    match updated {
        Some(post) => Ok(Json(post)),
        None => Err(HttpError::not_found(ErrorMessage::PostNotFound.to_string())),
    }
}

// DELETE POST BY ID
pub async fn delete_post_handler(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>
) -> Result<Json<AckResponse>, HttpError> {
    let deleted = PostRepository::delete(&state.config.database.pool, post_id).map_err(|e|
        HttpError::server_error(e.to_string())
    )?;

    Ok(Json(AckResponse::deleted(deleted)))
}
