//! Event handlers, plus the event-scoped courses and divisions.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::{authorize, not_found, page_slice, wrapped, SharedState};
use crate::mock_server::state::EVENTS_PER_PAGE;

/// Query parameters for listing events.
#[derive(Debug, Default, Deserialize)]
pub struct ListEventsQuery {
    pub page: Option<u32>,
    pub archived: Option<bool>,
    pub season: Option<String>,
    pub category: Option<String>,
}

/// GET /{api_key}/events
///
/// Lists active events unless `archived=true`, which lists only archived
/// ones.
pub async fn list_events(
    State(state): State<SharedState>,
    Path(api_key): Path<String>,
    Query(query): Query<ListEventsQuery>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &api_key) {
        return denied;
    }

    let events = state.list_events(
        query.archived.unwrap_or(false),
        query.season.as_deref(),
        query.category.as_deref(),
    );
    let page = page_slice(&events, query.page, EVENTS_PER_PAGE, state.ignore_page);
    wrapped("event", page.iter().copied())
}

/// GET /{api_key}/events/{event_id}/courses
///
/// Unlike most endpoints, courses come as `{"courses": [...]}`.
pub async fn list_courses(
    State(state): State<SharedState>,
    Path((api_key, event_id)): Path<(String, String)>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &api_key) {
        return denied;
    }
    if state.get_event(&event_id).is_none() {
        return not_found("Event", &event_id);
    }

    let courses = state.courses.get(&event_id).cloned().unwrap_or_default();
    (StatusCode::OK, Json(json!({ "courses": courses }))).into_response()
}

/// GET /{api_key}/events/{event_id}/divisions
pub async fn list_divisions(
    State(state): State<SharedState>,
    Path((api_key, event_id)): Path<(String, String)>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &api_key) {
        return denied;
    }
    if state.get_event(&event_id).is_none() {
        return not_found("Event", &event_id);
    }
    wrapped("division", state.divisions.get(&event_id).into_iter().flatten())
}
