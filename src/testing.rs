//! In-memory transport for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use crate::error::Result;
use crate::transport::{Method, QueryParams, Transport};

pub(crate) const TEST_KEY: &str = "test-key";

type Responder = dyn Fn(&str, &QueryParams) -> Result<JsonValue> + Send + Sync;

/// A recorded request.
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub path: String,
    pub query: QueryParams,
    pub credential: Option<String>,
}

/// Answers every request through a closure and records it.
pub(crate) struct ScriptedTransport {
    calls: Mutex<Vec<Call>>,
    respond: Box<Responder>,
}

impl ScriptedTransport {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&str, &QueryParams) -> Result<JsonValue> + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// Serves `pages[n - 1]` for `page=n`, an empty array past the end.
    pub fn paged(pages: Vec<Vec<JsonValue>>) -> Self {
        Self::new(move |_, query| Ok(JsonValue::Array(page_of(&pages, query))))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

/// The page a query asks for (page 1 when unspecified).
pub(crate) fn page_of(pages: &[Vec<JsonValue>], query: &QueryParams) -> Vec<JsonValue> {
    let page: usize = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    page.checked_sub(1)
        .and_then(|index| pages.get(index))
        .cloned()
        .unwrap_or_default()
}

/// `total` items with ids `{prefix}_1..`, split into pages of `per_page`.
pub(crate) fn paged_items(prefix: &str, total: usize, per_page: usize) -> Vec<Vec<JsonValue>> {
    let items: Vec<JsonValue> = (1..=total)
        .map(|i| json!({"id": format!("{prefix}_{i}"), "name": format!("{prefix} {i}")}))
        .collect();
    items.chunks(per_page).map(<[JsonValue]>::to_vec).collect()
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(
        &self,
        _method: Method,
        path: &str,
        query: &QueryParams,
        credential: Option<&str>,
    ) -> Result<JsonValue> {
        self.calls.lock().unwrap().push(Call {
            path: path.to_string(),
            query: query.clone(),
            credential: credential.map(str::to_string),
        });
        (self.respond)(path, query)
    }

    fn default_credential(&self) -> Option<String> {
        Some(TEST_KEY.to_string())
    }
}
