//! The request seam between the resource engine and the network.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::config;
use crate::error::Result;

/// Query parameters as sent on the wire.
pub type QueryParams = BTreeMap<String, String>;

/// HTTP method. The API surface is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
        }
    }
}

/// Executes one request against the API.
///
/// `path` starts with `/` and excludes the credential segment; the
/// implementation builds `{credential}{path}` under its base URL. Failures
/// are returned as-is to the caller; nothing above this trait retries them.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
        credential: Option<&str>,
    ) -> Result<JsonValue>;

    /// Credential used when a call does not supply one.
    fn default_credential(&self) -> Option<String> {
        config::current().api_key.clone()
    }
}

/// Picks the per-call credential override, else the transport's default.
pub(crate) fn effective_credential<T: Transport + ?Sized>(
    transport: &T,
    explicit: Option<&str>,
) -> Option<String> {
    explicit
        .map(str::to_string)
        .or_else(|| transport.default_credential())
}
