//! HTTP request handlers for the mock server.
//!
//! Every route sits under `/{api_key}/...`, mirroring the API's key-in-path
//! convention.

pub mod catalog;
pub mod events;
pub mod roster;
pub mod rounds;

pub use catalog::*;
pub use events::*;
pub use roster::*;
pub use rounds::*;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value as JsonValue};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;

pub type SharedState = Arc<RwLock<MockState>>;

/// Query parameters shared by paginated listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

/// Reject requests made under the wrong key.
pub(crate) fn authorize(state: &MockState, api_key: &str) -> Result<(), Response> {
    match &state.required_key {
        Some(required) if required != api_key => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Unauthorized",
                "message": "Invalid API key"
            })),
        )
            .into_response()),
        _ => Ok(()),
    }
}

/// The slice of `items` on a 1-indexed page.
pub(crate) fn page_slice<T>(items: &[T], page: Option<u32>, size: usize, ignore_page: bool) -> &[T] {
    if ignore_page {
        return items;
    }
    let page = page.unwrap_or(1).max(1) as usize;
    let start = (page - 1) * size;
    if start >= items.len() {
        return &[];
    }
    &items[start..(start + size).min(items.len())]
}

/// A 200 response with each item wrapped under `key`, e.g. `[{"event": {...}}]`.
pub(crate) fn wrapped<'a>(key: &str, items: impl IntoIterator<Item = &'a JsonValue>) -> Response {
    let body: Vec<JsonValue> = items
        .into_iter()
        .map(|item| {
            let mut wrapper = Map::new();
            wrapper.insert(key.to_string(), item.clone());
            JsonValue::Object(wrapper)
        })
        .collect();
    (StatusCode::OK, Json(body)).into_response()
}

pub(crate) fn not_found(what: &str, id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": format!("{what} not found"),
            "message": format!("No {} found with id: {}", what.to_lowercase(), id)
        })),
    )
        .into_response()
}
