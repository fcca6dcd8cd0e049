//! Roster handlers.

use axum::{
    extract::{Path, Query, State},
    response::Response,
};

use super::{authorize, not_found, page_slice, wrapped, PageQuery, SharedState};
use crate::mock_server::state::ROSTER_PER_PAGE;

/// GET /{api_key}/events/{event_id}/roster
///
/// The real endpoint does not filter on `waitlist`; neither does this one.
pub async fn list_roster(
    State(state): State<SharedState>,
    Path((api_key, event_id)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &api_key) {
        return denied;
    }
    if state.get_event(&event_id).is_none() {
        return not_found("Event", &event_id);
    }

    let players = state.rosters.get(&event_id).map(Vec::as_slice).unwrap_or(&[]);
    wrapped(
        "member",
        page_slice(players, query.page, ROSTER_PER_PAGE, state.ignore_page),
    )
}

/// GET /{api_key}/master_roster
pub async fn list_master_roster(
    State(state): State<SharedState>,
    Path(api_key): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &api_key) {
        return denied;
    }
    wrapped(
        "member",
        page_slice(
            &state.master_roster,
            query.page,
            ROSTER_PER_PAGE,
            state.ignore_page,
        ),
    )
}
