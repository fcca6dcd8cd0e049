//! Round, tournament and tee sheet handlers.

use axum::{
    extract::{Path, State},
    response::Response,
};

use super::{authorize, not_found, wrapped, SharedState};

/// GET /{api_key}/events/{event_id}/rounds
pub async fn list_rounds(
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
    wrapped("round", state.rounds.get(&event_id).into_iter().flatten())
}

/// GET /{api_key}/events/{event_id}/rounds/{round_id}/tournaments
///
/// Tournaments are wrapped under `"event"`, as the API does.
pub async fn list_tournaments(
    State(state): State<SharedState>,
    Path((api_key, event_id, round_id)): Path<(String, String, String)>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &api_key) {
        return denied;
    }
    if !state.has_round(&event_id, &round_id) {
        return not_found("Round", &round_id);
    }
    wrapped(
        "event",
        state
            .tournaments
            .get(&(event_id, round_id))
            .into_iter()
            .flatten(),
    )
}

/// GET /{api_key}/events/{event_id}/rounds/{round_id}/tee_sheet
pub async fn get_tee_sheet(
    State(state): State<SharedState>,
    Path((api_key, event_id, round_id)): Path<(String, String, String)>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &api_key) {
        return denied;
    }
    if !state.has_round(&event_id, &round_id) {
        return not_found("Round", &round_id);
    }
    wrapped(
        "pairing_group",
        state
            .tee_sheets
            .get(&(event_id, round_id))
            .into_iter()
            .flatten(),
    )
}
