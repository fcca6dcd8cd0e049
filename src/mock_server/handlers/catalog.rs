//! Season, category and directory handlers.

use axum::{
    extract::{Path, State},
    response::Response,
};

use super::{authorize, not_found, wrapped, SharedState};

/// GET /{api_key}/seasons
pub async fn list_seasons(
    State(state): State<SharedState>,
    Path(api_key): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &api_key) {
        return denied;
    }
    wrapped("season", &state.seasons)
}

/// GET /{api_key}/categories
pub async fn list_categories(
    State(state): State<SharedState>,
    Path(api_key): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &api_key) {
        return denied;
    }
    wrapped("category", &state.categories)
}

/// GET /{api_key}/directories
pub async fn list_directories(
    State(state): State<SharedState>,
    Path(api_key): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &api_key) {
        return denied;
    }
    wrapped("directory", &state.directories)
}

/// GET /{api_key}/directories/{directory_id}/events
pub async fn list_directory_events(
    State(state): State<SharedState>,
    Path((api_key, directory_id)): Path<(String, String)>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &api_key) {
        return denied;
    }
    match state.list_directory_events(&directory_id) {
        Some(events) => wrapped("event", events),
        None => not_found("Directory", &directory_id),
    }
}
